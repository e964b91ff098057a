use crate::ClientResult;
use crate::commands::common::require_text;
use crate::contracts::envelope::{SuccessEnvelope, success};
use crate::contracts::types::IntentData;
use crate::interpret::intent;

/// Intent detection needs no keyword table, so this never touches config.
pub fn run(text: &str) -> ClientResult<SuccessEnvelope> {
    let text = require_text(text, "intent")?;
    let data = IntentData {
        text: text.to_string(),
        intent: intent::classify(text).as_str().to_string(),
    };
    success("intent", data)
}
