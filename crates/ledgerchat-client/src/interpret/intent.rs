use tracing::debug;

use crate::interpret::numeral;
use crate::interpret::types::IntentKind;

pub const QUERY_KEYWORDS: [&str; 8] = [
    "花了多少",
    "多少錢",
    "查詢",
    "統計",
    "報告",
    "報表",
    "趨勢",
    "分析圖",
];

pub const ANALYSIS_KEYWORDS: [&str; 7] = ["是不是", "應該", "建議", "幫我", "為什麼", "怎麼", "如何"];

pub struct IntentRule {
    pub name: &'static str,
    pub applies: fn(&str) -> bool,
    pub intent: IntentKind,
}

/// Checked in order. Query keywords pre-empt everything, including digits.
pub const INTENT_RULES: [IntentRule; 4] = [
    IntentRule {
        name: "query_keyword",
        applies: |text| contains_any(text, &QUERY_KEYWORDS),
        intent: IntentKind::Query,
    },
    IntentRule {
        name: "analysis_keyword",
        applies: |text| contains_any(text, &ANALYSIS_KEYWORDS),
        intent: IntentKind::Analysis,
    },
    IntentRule {
        name: "contains_digit",
        applies: |text| text.chars().any(|character| character.is_ascii_digit()),
        intent: IntentKind::Record,
    },
    IntentRule {
        name: "default",
        applies: |_| true,
        intent: IntentKind::Analysis,
    },
];

pub fn classify(text: &str) -> IntentKind {
    let text = numeral::fold_width(text);
    for rule in &INTENT_RULES {
        if (rule.applies)(&text) {
            debug!(rule = rule.name, intent = rule.intent.as_str(), "intent rule matched");
            return rule.intent;
        }
    }
    IntentKind::Analysis
}

fn contains_any(text: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|keyword| text.contains(keyword))
}

#[cfg(test)]
mod tests {
    use super::{INTENT_RULES, classify};
    use crate::interpret::types::IntentKind;

    #[test]
    fn digits_without_keywords_are_records() {
        assert_eq!(classify("午餐120元"), IntentKind::Record);
        assert_eq!(classify("捷運 35"), IntentKind::Record);
    }

    #[test]
    fn full_width_digits_count_as_digits() {
        assert_eq!(classify("午餐１２０元"), IntentKind::Record);
        assert_eq!(classify("每月存５０００應該夠嗎"), IntentKind::Analysis);
    }

    #[test]
    fn query_keywords_win_without_digits() {
        assert_eq!(classify("這個月花了多少"), IntentKind::Query);
        assert_eq!(classify("給我看報表"), IntentKind::Query);
    }

    #[test]
    fn query_keywords_preempt_digits_and_analysis() {
        assert_eq!(classify("3月花了多少"), IntentKind::Query);
        assert_eq!(classify("幫我查詢餐飲支出"), IntentKind::Query);
    }

    #[test]
    fn analysis_keywords_beat_digits() {
        assert_eq!(classify("我是不是花太多了"), IntentKind::Analysis);
        assert_eq!(classify("每月存5000應該夠嗎"), IntentKind::Analysis);
    }

    #[test]
    fn plain_chat_falls_back_to_analysis() {
        assert_eq!(classify("你好"), IntentKind::Analysis);
        assert_eq!(classify(""), IntentKind::Analysis);
    }

    #[test]
    fn rule_order_is_fixed() {
        let names: Vec<&str> = INTENT_RULES.iter().map(|rule| rule.name).collect();
        assert_eq!(
            names,
            vec!["query_keyword", "analysis_keyword", "contains_digit", "default"]
        );
    }
}
