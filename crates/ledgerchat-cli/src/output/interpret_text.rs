use std::io;

use serde_json::Value;

use super::format::{format_amount, key_value_rows};

pub fn render_record(data: &Value) -> io::Result<String> {
    let mut lines = vec!["記帳內容：".to_string(), String::new()];
    lines.extend(record_rows(data)?);
    Ok(lines.join("\n"))
}

pub fn render_query(data: &Value) -> io::Result<String> {
    let mut lines = vec!["查詢條件：".to_string(), String::new()];
    lines.extend(query_rows(data)?);
    Ok(lines.join("\n"))
}

pub fn render_intent(data: &Value) -> io::Result<String> {
    let intent = required_str(data, "intent", "intent")?;
    Ok(format!("意圖：{} ({intent})", intent_label(intent)))
}

pub fn render_chat(data: &Value) -> io::Result<String> {
    let response_type = required_str(data, "response_type", "chat")?;
    match response_type {
        "confirmation" => {
            let record = data
                .get("record")
                .ok_or_else(|| io::Error::other("chat confirmation requires record"))?;
            let mut lines = vec!["好的，這筆記帳如下：".to_string(), String::new()];
            lines.extend(record_rows(record)?);
            Ok(lines.join("\n"))
        }
        "query_result" => {
            let query = data
                .get("query")
                .ok_or_else(|| io::Error::other("chat query_result requires query"))?;
            let mut lines = vec!["我會依以下條件查詢：".to_string(), String::new()];
            lines.extend(query_rows(query)?);
            Ok(lines.join("\n"))
        }
        "analysis" => {
            let analysis = data
                .get("analysis")
                .ok_or_else(|| io::Error::other("chat analysis requires analysis"))?;
            let text = required_str(analysis, "text", "chat")?;
            let handoff = required_str(analysis, "handoff", "chat")?;
            let mut lines = vec![
                "這是分析型問題，將交由摘要服務回答。".to_string(),
                String::new(),
            ];
            lines.extend(key_value_rows(
                &[("訊息", text.to_string()), ("處理者", handoff.to_string())],
                2,
            ));
            Ok(lines.join("\n"))
        }
        other => Err(io::Error::other(format!(
            "unsupported chat response type `{other}`"
        ))),
    }
}

fn record_rows(data: &Value) -> io::Result<Vec<String>> {
    let amount = match data.get("amount").and_then(Value::as_f64) {
        Some(value) => format_amount(value),
        None => "（未識別）".to_string(),
    };
    let kind = match required_str(data, "kind", "record")? {
        "income" => "收入",
        _ => "支出",
    };
    let category = required_str(data, "category", "record")?;
    let category = if data.get("category_matched").and_then(Value::as_bool) == Some(true) {
        category.to_string()
    } else {
        format!("{category}（未命中關鍵字）")
    };
    let date = required_str(data, "date", "record")?;
    let date = if required_str(data, "date_source", "record")? == "reference" {
        format!("{date}（未指定，使用今天）")
    } else {
        date.to_string()
    };
    let description = match required_str(data, "description", "record")? {
        "" => "（無）".to_string(),
        value => value.to_string(),
    };
    let confidence = data
        .get("confidence")
        .and_then(Value::as_f64)
        .ok_or_else(|| io::Error::other("record output requires confidence"))?;

    Ok(key_value_rows(
        &[
            ("金額", amount),
            ("類型", kind.to_string()),
            ("分類", category),
            ("日期", date),
            ("描述", description),
            ("信心度", format!("{confidence:.1}")),
        ],
        2,
    ))
}

fn query_rows(data: &Value) -> io::Result<Vec<String>> {
    let kind = required_str(data, "query_kind", "query")?;
    let category = data
        .get("category")
        .and_then(Value::as_str)
        .unwrap_or("全部");
    let period = required_str(data, "period", "query")?;
    let start = required_str(data, "start_date", "query")?;
    let end = required_str(data, "end_date", "query")?;
    let chart = data
        .get("chart_hint")
        .and_then(Value::as_str)
        .map_or("無", chart_label);

    Ok(key_value_rows(
        &[
            ("類型", format!("{} ({kind})", query_kind_label(kind))),
            ("分類", category.to_string()),
            ("期間", period_label(period).to_string()),
            ("日期範圍", format!("{start} ~ {end}")),
            ("圖表", chart.to_string()),
        ],
        2,
    ))
}

fn required_str<'a>(data: &'a Value, key: &str, command: &str) -> io::Result<&'a str> {
    data.get(key)
        .and_then(Value::as_str)
        .ok_or_else(|| io::Error::other(format!("{command} output requires {key}")))
}

fn intent_label(intent: &str) -> &'static str {
    match intent {
        "record" => "記帳",
        "query" => "查詢",
        _ => "分析",
    }
}

fn query_kind_label(kind: &str) -> &'static str {
    match kind {
        "trend" => "趨勢",
        "category" => "分類",
        "compare" => "比較",
        _ => "總覽",
    }
}

fn period_label(period: &str) -> &'static str {
    match period {
        "day" => "日",
        "week" => "週",
        "year" => "年",
        _ => "月",
    }
}

fn chart_label(chart: &str) -> &'static str {
    match chart {
        "pie" => "圓餅圖",
        "line" => "折線圖",
        "bar" => "長條圖",
        _ => "無",
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{render_chat, render_intent, render_query, render_record};

    fn lunch() -> serde_json::Value {
        json!({
            "text": "午餐 120 元",
            "amount": 120.0,
            "kind": "expense",
            "category": "餐飲",
            "category_matched": true,
            "date": "2024-03-15",
            "date_source": "reference",
            "reference_date": "2024-03-15",
            "description": "午餐",
            "confidence": 0.9
        })
    }

    #[test]
    fn record_text_uses_chinese_labels() {
        let rendered = render_record(&lunch());
        assert!(rendered.is_ok());
        if let Ok(text) = rendered {
            assert!(text.starts_with("記帳內容："));
            assert!(text.contains("  金額    NT$120"));
            assert!(text.contains("  類型    支出"));
            assert!(text.contains("  日期    2024-03-15（未指定，使用今天）"));
            assert!(text.contains("  信心度  0.9"));
        }
    }

    #[test]
    fn record_text_flags_missing_amount_and_fallback_category() {
        let mut data = lunch();
        data["amount"] = serde_json::Value::Null;
        data["category"] = json!("其他");
        data["category_matched"] = json!(false);
        let rendered = render_record(&data);
        assert!(rendered.is_ok());
        if let Ok(text) = rendered {
            assert!(text.contains("（未識別）"));
            assert!(text.contains("其他（未命中關鍵字）"));
        }
    }

    #[test]
    fn query_text_shows_range_and_chart() {
        let rendered = render_query(&json!({
            "text": "上個月餐飲花多少",
            "query_kind": "category",
            "category": "餐飲",
            "period": "month",
            "start_date": "2024-02-01",
            "end_date": "2024-02-29",
            "chart_hint": null,
            "reference_date": "2024-03-15"
        }));
        assert!(rendered.is_ok());
        if let Ok(text) = rendered {
            assert!(text.contains("分類 (category)"));
            assert!(text.contains("2024-02-01 ~ 2024-02-29"));
            assert!(text.contains("  圖表      無"));
        }
    }

    #[test]
    fn intent_and_chat_variants_render() {
        assert_eq!(
            render_intent(&json!({ "text": "你好", "intent": "analysis" })).ok(),
            Some("意圖：分析 (analysis)".to_string())
        );

        let confirmation = render_chat(&json!({
            "intent": "record",
            "response_type": "confirmation",
            "record": lunch()
        }));
        assert!(confirmation.is_ok());

        let analysis = render_chat(&json!({
            "intent": "analysis",
            "response_type": "analysis",
            "analysis": { "text": "我是不是花太多了", "handoff": "external_summarizer" }
        }));
        assert!(analysis.is_ok());
        if let Ok(text) = analysis {
            assert!(text.contains("external_summarizer"));
        }

        let broken = render_chat(&json!({ "intent": "record", "response_type": "confirmation" }));
        assert!(broken.is_err());
    }
}
