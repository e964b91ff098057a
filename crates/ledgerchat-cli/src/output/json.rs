use std::io;

use ledgerchat_client::contracts::envelope::failure_from_error;
use ledgerchat_client::{ClientError, SuccessEnvelope};
use serde::Serialize;

/// JSON output is the full success envelope, unchanged for every command.
pub fn render_success_json(success: &SuccessEnvelope) -> io::Result<String> {
    serialize_json_pretty(success)
}

pub fn render_error_json(error: &ClientError) -> io::Result<String> {
    serialize_json_pretty(&failure_from_error(error))
}

fn serialize_json_pretty<T>(value: &T) -> io::Result<String>
where
    T: Serialize,
{
    serde_json::to_string_pretty(value).map_err(io::Error::other)
}
