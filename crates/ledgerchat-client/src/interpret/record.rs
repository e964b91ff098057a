use std::ops::Range;

use chrono::NaiveDate;
use tracing::debug;

use crate::interpret::segment::Segmenter;
use crate::interpret::table::CategoryKeywordTable;
use crate::interpret::types::{DateSource, EntryKind, ParsedRecord};
use crate::interpret::{amount, category, date, numeral};

/// Relative-date phrases removed from descriptions even when another rule
/// supplied the date.
const DATE_KEYWORDS: [&str; 10] = [
    "今天", "昨天", "前天", "今日", "昨日", "上週", "這週", "下週", "上個月", "這個月",
];

// Confidence is summed in tenths so 0.4 + 0.1 + 0.4 is exactly 0.9.
const AMOUNT_TENTHS: u8 = 4;
const DATE_TENTHS: u8 = 1;
const CATEGORY_TENTHS: u8 = 4;
const FALLBACK_CATEGORY_TENTHS: u8 = 1;

pub fn parse_record(
    text: &str,
    today: NaiveDate,
    table: &CategoryKeywordTable,
    segmenter: &dyn Segmenter,
) -> ParsedRecord {
    let raw_text = text;
    // Amount and date spans below index the folded text.
    let folded = numeral::fold_width(text);
    let text = folded.as_ref();
    let mut tenths: u8 = 0;

    let amount = amount::extract(text).filter(|value| *value > 0.0);
    if amount.is_some() {
        tenths += AMOUNT_TENTHS;
    }

    let date_hit = date::resolve_match(text, today);
    let (record_date, date_source) = match &date_hit {
        Some(hit) => (hit.date, DateSource::Explicit),
        None => (today, DateSource::Reference),
    };
    // Every record carries a usable date, explicit or defaulted.
    tenths += DATE_TENTHS;

    let matched = category::classify(text, table, segmenter);
    let category_matched = matched.is_some();
    let category = match matched {
        Some(name) => {
            tenths += CATEGORY_TENTHS;
            name
        }
        None => {
            tenths += FALLBACK_CATEGORY_TENTHS;
            table.fallback_for(text).to_string()
        }
    };
    let kind = if table.is_income(&category) {
        EntryKind::Income
    } else {
        EntryKind::Expense
    };

    let description = clean_description(text, date_hit.as_ref().map(|hit| hit.span.clone()));
    let confidence = (f64::from(tenths) / 10.0).clamp(0.0, 1.0);

    debug!(
        category = %category,
        kind = kind.as_str(),
        amount = ?amount,
        date = %record_date,
        confidence,
        "parsed record"
    );

    ParsedRecord {
        amount,
        kind,
        category,
        category_matched,
        date: record_date,
        date_source,
        description,
        confidence,
        raw_text: raw_text.to_string(),
    }
}

/// Strips amounts, the date phrase and leftover date keywords. `text` must be
/// the width-folded message the date span was taken from; amount and date
/// phrases are removed together so overlapping matches leave nothing behind.
pub fn clean_description(text: &str, date_span: Option<Range<usize>>) -> String {
    let mut spans = amount::amount_spans(text);
    spans.extend(date_span);
    let mut working = amount::blank_spans(text, &spans);
    for keyword in DATE_KEYWORDS {
        working = working.replace(keyword, "");
    }
    working.split_whitespace().collect::<Vec<&str>>().join(" ")
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::{clean_description, parse_record};
    use crate::interpret::segment::KeywordSegmenter;
    use crate::interpret::table::CategoryKeywordTable;
    use crate::interpret::types::{DateSource, EntryKind, ParsedRecord};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 15).unwrap_or_default()
    }

    fn parse(text: &str) -> ParsedRecord {
        let table = CategoryKeywordTable::builtin();
        let segmenter = KeywordSegmenter::from_table(&table);
        parse_record(text, today(), &table, &segmenter)
    }

    #[test]
    fn lunch_record_has_full_confidence_signals() {
        let record = parse("午餐 120 元");
        assert_eq!(record.amount, Some(120.0));
        assert_eq!(record.category, "餐飲");
        assert_eq!(record.kind, EntryKind::Expense);
        assert_eq!(record.date, today());
        assert_eq!(record.date_source, DateSource::Reference);
        assert_eq!(record.confidence, 0.9);
        assert_eq!(record.description, "午餐");
    }

    #[test]
    fn explicit_date_is_stripped_from_description() {
        let record = parse("昨天 晚餐 火鍋 $680");
        assert_eq!(record.date, NaiveDate::from_ymd_opt(2024, 3, 14).unwrap_or_default());
        assert_eq!(record.date_source, DateSource::Explicit);
        assert_eq!(record.amount, Some(680.0));
        assert_eq!(record.description, "晚餐 火鍋");
    }

    #[test]
    fn income_category_sets_income_kind() {
        let record = parse("發薪水 45000元");
        assert_eq!(record.category, "薪資");
        assert_eq!(record.kind, EntryKind::Income);
    }

    #[test]
    fn unmatched_text_falls_back_by_income_marker() {
        let expense = parse("雜七雜八 200元");
        assert_eq!(expense.category, "其他");
        assert!(!expense.category_matched);
        assert_eq!(expense.kind, EntryKind::Expense);
        assert_eq!(expense.confidence, 0.6);

        let income = parse("額外收入 3000元");
        assert_eq!(income.category, "其他收入");
        assert_eq!(income.kind, EntryKind::Income);
    }

    #[test]
    fn missing_amount_lowers_confidence() {
        let record = parse("晚餐吃拉麵");
        assert_eq!(record.amount, None);
        assert_eq!(record.category, "餐飲");
        assert_eq!(record.confidence, 0.5);
        assert!((0.0..=1.0).contains(&record.confidence));
    }

    #[test]
    fn zero_amount_is_not_an_amount() {
        let record = parse("雜七雜八 0元");
        assert_eq!(record.amount, None);
    }

    #[test]
    fn description_drops_date_keywords_and_amounts() {
        assert_eq!(clean_description("這個月 房租 12,000 元", None), "房租");
        assert_eq!(
            clean_description("12/20 聚餐 500元", Some(0..5)),
            "聚餐"
        );
        assert_eq!(clean_description("  ", None), "");
        assert_eq!(clean_description("晚餐 300", None), "晚餐");
    }

    #[test]
    fn date_phrase_overlapping_amount_leaves_no_unit() {
        let record = parse("上個月500元房租");
        assert_eq!(record.amount, Some(500.0));
        assert_eq!(record.date, NaiveDate::from_ymd_opt(2024, 2, 29).unwrap_or_default());
        assert_eq!(record.description, "房租");

        let numeral = parse("上個月一萬元房租");
        assert_eq!(numeral.amount, Some(10000.0));
        assert_eq!(numeral.description, "房租");
    }

    #[test]
    fn full_date_with_hao_suffix_is_stripped() {
        let record = parse("2024年12月20號 午餐 100元");
        assert_eq!(record.date, NaiveDate::from_ymd_opt(2024, 12, 20).unwrap_or_default());
        assert_eq!(record.amount, Some(100.0));
        assert_eq!(record.description, "午餐");
    }

    #[test]
    fn bare_number_amount_is_stripped_from_description() {
        let record = parse("晚餐 300");
        assert_eq!(record.amount, Some(300.0));
        assert_eq!(record.description, "晚餐");
    }

    #[test]
    fn full_width_record_parses_like_ascii() {
        let record = parse("昨天 午餐１２０元");
        assert_eq!(record.amount, Some(120.0));
        assert_eq!(record.date, NaiveDate::from_ymd_opt(2024, 3, 14).unwrap_or_default());
        assert_eq!(record.description, "午餐");
        assert_eq!(record.raw_text, "昨天 午餐１２０元");
        assert_eq!(record.confidence, 0.9);
    }

    #[test]
    fn parsing_is_repeatable() {
        assert_eq!(parse("上週五 看電影 NT$320"), parse("上週五 看電影 NT$320"));
    }
}
