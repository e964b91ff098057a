use ledgerchat_client::ClientError;
use serde_json::Value;

use super::format::key_value_rows;

pub fn render_error(error: &ClientError) -> String {
    let mut details = vec![
        ("Error:", error.code.clone()),
        ("Details:", error.message.clone()),
    ];
    // Echo the offending input so a rejected message or table file is visible.
    if let Some(text) = data_string(error, "text") {
        details.push(("Message:", text));
    }
    if let Some(path) = data_string(error, "path") {
        details.push(("File:", path));
    }

    let mut lines = vec!["Something went wrong, but it's easy to fix.".to_string(), String::new()];
    lines.extend(key_value_rows(&details, 2));
    lines.push(String::new());
    lines.push("What to do next:".to_string());

    if error.recovery_steps.is_empty() {
        lines.push("  1. Retry the command.".to_string());
    } else {
        for (index, step) in error.recovery_steps.iter().enumerate() {
            lines.push(format!("  {}. {step}", index + 1));
        }
    }

    lines.join("\n")
}

fn data_string(error: &ClientError, key: &str) -> Option<String> {
    error
        .data
        .as_ref()
        .and_then(|data| data.get(key))
        .and_then(Value::as_str)
        .map(str::to_string)
}
