use std::path::Path;

use serde_json::{Value, json};
use thiserror::Error;

pub(crate) const RECORD_EXAMPLE: &str = "午餐 120 元";

#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct ClientError {
    pub code: String,
    pub message: String,
    pub recovery_steps: Vec<String>,
    pub data: Option<Value>,
}

impl ClientError {
    pub fn new(code: &str, message: &str, recovery_steps: Vec<String>) -> Self {
        Self {
            code: code.to_string(),
            message: message.to_string(),
            recovery_steps,
            data: None,
        }
    }

    pub fn with_data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }

    pub fn invalid_argument(message: &str) -> Self {
        Self::invalid_argument_for_command(message, None)
    }

    pub fn invalid_argument_for_command(message: &str, command: Option<&str>) -> Self {
        let help_hint = match command {
            Some(cmd) => format!("Run `ledgerchat {cmd} --help` for usage."),
            None => "Run `ledgerchat --help` for usage.".to_string(),
        };
        let error = Self::new("invalid_argument", message, vec![help_hint]);
        if let Some(cmd) = command {
            return error.with_data(json!({
                "command_hint": cmd,
            }));
        }
        error
    }

    pub fn invalid_argument_with_recovery(message: &str, recovery_steps: Vec<String>) -> Self {
        Self::new("invalid_argument", message, recovery_steps)
    }

    pub fn empty_message(command: &str) -> Self {
        Self::invalid_argument_with_recovery(
            "請輸入訊息 (message text is empty).",
            vec![format!(
                "Pass the message as one quoted argument: `ledgerchat {command} \"{RECORD_EXAMPLE}\"`."
            )],
        )
        .with_data(json!({
            "command_hint": command,
        }))
    }

    pub fn amount_not_found(text: &str) -> Self {
        Self::new(
            "amount_not_found",
            &format!("抱歉，我無法識別金額。請用類似「{RECORD_EXAMPLE}」的格式。"),
            vec![
                format!("Rephrase the message with an explicit amount, e.g. `{RECORD_EXAMPLE}`."),
                "Amounts may be digits (120元, $120, NT$120) or Chinese numerals (五百塊)."
                    .to_string(),
            ],
        )
        .with_data(json!({
            "text": text,
        }))
    }

    pub fn keyword_table_missing(path: &Path) -> Self {
        let location = path.display().to_string();
        Self::new(
            "keyword_table_missing",
            &format!("Keyword table file `{location}` does not exist."),
            vec![
                format!("Create `{location}` or point `--keywords` at an existing JSON file."),
                "Unset `LEDGERCHAT_KEYWORDS` to fall back to the built-in table.".to_string(),
            ],
        )
        .with_data(json!({
            "path": location,
        }))
    }

    pub fn keyword_table_invalid(path: Option<&Path>, detail: &str) -> Self {
        let location = path.map(|value| value.display().to_string());
        let message = match &location {
            Some(value) => format!("Keyword table at `{value}` is invalid: {detail}"),
            None => format!("Keyword table is invalid: {detail}"),
        };
        Self::new(
            "keyword_table_invalid",
            &message,
            vec![
                "Each category needs a unique non-empty `name`, a `kind` of `income` or `expense`, and non-empty `keywords`.".to_string(),
                "Run `ledgerchat keywords --json` against the built-in table for a reference layout.".to_string(),
            ],
        )
        .with_data(json!({
            "path": location,
            "detail": detail,
        }))
    }

    pub fn internal_serialization(message: &str) -> Self {
        Self::new("internal_serialization_error", message, Vec::new())
    }

    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self.code.as_str(),
            "keyword_table_missing" | "keyword_table_invalid"
        )
    }
}

pub type ClientResult<T> = Result<T, ClientError>;
