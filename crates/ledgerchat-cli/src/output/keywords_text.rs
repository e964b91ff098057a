use std::io;

use serde_json::Value;

use super::format::key_value_rows;

pub fn render_keywords(data: &Value) -> io::Result<String> {
    let source = data
        .get("source")
        .and_then(Value::as_str)
        .ok_or_else(|| io::Error::other("keywords output requires source"))?;
    let categories = data
        .get("categories")
        .and_then(Value::as_array)
        .ok_or_else(|| io::Error::other("keywords output requires categories"))?;

    let mut lines = vec![format!("關鍵字表（來源：{source}）"), String::new()];

    let mut entries = Vec::with_capacity(categories.len());
    for category in categories {
        let name = category
            .get("name")
            .and_then(Value::as_str)
            .ok_or_else(|| io::Error::other("keyword category requires name"))?;
        let kind = match category.get("kind").and_then(Value::as_str) {
            Some("income") => "收入",
            _ => "支出",
        };
        let keywords = category
            .get("keywords")
            .and_then(Value::as_array)
            .map(|values| {
                values
                    .iter()
                    .filter_map(Value::as_str)
                    .collect::<Vec<_>>()
                    .join("、")
            })
            .unwrap_or_default();
        entries.push((name, format!("[{kind}] {keywords}")));
    }
    lines.extend(key_value_rows(&entries, 2));

    lines.push(String::new());
    lines.extend(key_value_rows(
        &[
            ("未分類支出", text_field(data, "fallback_expense")),
            ("未分類收入", text_field(data, "fallback_income")),
            ("收入標記", list_field(data, "income_markers")),
        ],
        2,
    ));

    Ok(lines.join("\n"))
}

fn text_field(data: &Value, key: &str) -> String {
    data.get(key)
        .and_then(Value::as_str)
        .unwrap_or("")
        .to_string()
}

fn list_field(data: &Value, key: &str) -> String {
    data.get(key)
        .and_then(Value::as_array)
        .map(|values| {
            values
                .iter()
                .filter_map(Value::as_str)
                .collect::<Vec<_>>()
                .join("、")
        })
        .unwrap_or_default()
}
