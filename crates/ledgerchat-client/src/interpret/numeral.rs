//! Chinese numeral conversion.
//!
//! Handles the forms people type when keeping accounts: plain digit runs
//! (二零二四), positional forms with 十/百/千 (兩千三百, 十五) and 萬 sections
//! (一萬五千). Conversion is lenient: characters outside the numeral set are
//! skipped rather than rejected.

use std::borrow::Cow;

/// Every character [`to_number`] understands, for building regex classes.
pub const NUMERAL_CHARS: &str = "零〇一二三四五六七八九兩两十百千萬万";

pub fn digit_value(character: char) -> Option<u64> {
    match character {
        '零' | '〇' => Some(0),
        '一' => Some(1),
        '二' | '兩' | '两' => Some(2),
        '三' => Some(3),
        '四' => Some(4),
        '五' => Some(5),
        '六' => Some(6),
        '七' => Some(7),
        '八' => Some(8),
        '九' => Some(9),
        _ => None,
    }
}

fn magnitude_value(character: char) -> Option<u64> {
    match character {
        '十' => Some(10),
        '百' => Some(100),
        '千' => Some(1_000),
        '萬' | '万' => Some(10_000),
        _ => None,
    }
}

pub fn is_numeral_char(character: char) -> bool {
    digit_value(character).is_some() || magnitude_value(character).is_some()
}

pub fn to_number(text: &str) -> f64 {
    let mut total: u64 = 0;
    let mut section: u64 = 0;
    let mut pending: Option<u64> = None;

    for character in text.chars() {
        if let Some(digit) = digit_value(character) {
            pending = Some(match pending {
                Some(value) if value > 0 => value.saturating_mul(10).saturating_add(digit),
                _ => digit,
            });
        } else if let Some(magnitude) = magnitude_value(character) {
            if magnitude >= 10_000 {
                // 萬 closes the section so 一萬五千 does not become (1*10000+5)*1000.
                let unit = section.saturating_add(pending.take().unwrap_or(0));
                let unit = if unit == 0 { 1 } else { unit };
                total = total.saturating_add(unit.saturating_mul(magnitude));
                section = 0;
            } else {
                let multiplier = pending.take().unwrap_or(1);
                section = section.saturating_add(multiplier.saturating_mul(magnitude));
            }
        }
    }

    let value = total
        .saturating_add(section)
        .saturating_add(pending.unwrap_or(0));
    value as f64
}

/// Rewrites full-width digits and the full-width `＄ ． ／ －` to ASCII.
///
/// Returns the input borrowed when nothing needs folding, so folding text that
/// is already folded keeps byte offsets taken from it valid.
pub fn fold_width(text: &str) -> Cow<'_, str> {
    if text.chars().all(|character| fold_char(character) == character) {
        return Cow::Borrowed(text);
    }
    Cow::Owned(text.chars().map(fold_char).collect())
}

fn fold_char(character: char) -> char {
    match character {
        '０'..='９' => char::from_u32(u32::from(character) - 0xFEE0).unwrap_or(character),
        '＄' => '$',
        '．' => '.',
        '／' => '/',
        '－' => '-',
        _ => character,
    }
}

/// Parses a count written in Arabic digits or Chinese numerals.
pub fn parse_count(text: &str) -> Option<u32> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    if trimmed.chars().all(|character| character.is_ascii_digit()) {
        return trimmed.parse::<u32>().ok();
    }
    if !trimmed.chars().all(is_numeral_char) {
        return None;
    }
    let value = to_number(trimmed);
    if value > f64::from(u32::MAX) {
        return None;
    }
    Some(value as u32)
}

#[cfg(test)]
mod tests {
    use std::borrow::Cow;

    use super::{fold_width, is_numeral_char, parse_count, to_number};

    #[test]
    fn converts_positional_forms() {
        assert_eq!(to_number("五百"), 500.0);
        assert_eq!(to_number("兩千三百"), 2300.0);
        assert_eq!(to_number("两千三百"), 2300.0);
        assert_eq!(to_number("一萬"), 10000.0);
        assert_eq!(to_number("三十五"), 35.0);
    }

    #[test]
    fn leading_ten_has_implicit_one() {
        assert_eq!(to_number("十"), 10.0);
        assert_eq!(to_number("十五"), 15.0);
        assert_eq!(to_number("一十五"), 15.0);
    }

    #[test]
    fn wan_flushes_the_running_section() {
        assert_eq!(to_number("一萬五千"), 15000.0);
        assert_eq!(to_number("十萬"), 100000.0);
        assert_eq!(to_number("三萬兩千零五"), 32005.0);
        assert_eq!(to_number("萬"), 10000.0);
    }

    #[test]
    fn zero_placeholders_and_digit_runs() {
        assert_eq!(to_number("一千零五"), 1005.0);
        assert_eq!(to_number("二零二四"), 2024.0);
        assert_eq!(to_number("零"), 0.0);
    }

    #[test]
    fn unknown_characters_are_skipped() {
        assert_eq!(to_number("三百塊"), 300.0);
        assert_eq!(to_number("abc"), 0.0);
        assert_eq!(to_number(""), 0.0);
    }

    #[test]
    fn counts_accept_digits_and_numerals() {
        assert_eq!(parse_count("12"), Some(12));
        assert_eq!(parse_count("十二"), Some(12));
        assert_eq!(parse_count("兩"), Some(2));
        assert_eq!(parse_count("三天"), None);
        assert_eq!(parse_count(""), None);
        assert_eq!(parse_count("99999999999"), None);
    }

    #[test]
    fn numeral_class_covers_both_two_forms() {
        assert!(is_numeral_char('兩'));
        assert!(is_numeral_char('两'));
        assert!(is_numeral_char('萬'));
        assert!(!is_numeral_char('元'));
    }

    #[test]
    fn full_width_digits_fold_to_ascii() {
        assert_eq!(fold_width("午餐１２０元"), "午餐120元");
        assert_eq!(fold_width("＄６８０．５"), "$680.5");
        assert_eq!(fold_width("１２／２０"), "12/20");
        // Full-width commas stay punctuation.
        assert_eq!(fold_width("午餐，１２０"), "午餐，120");
    }

    #[test]
    fn ascii_text_is_borrowed() {
        assert!(matches!(fold_width("午餐 120 元"), Cow::Borrowed(_)));
        assert!(matches!(fold_width("１"), Cow::Owned(_)));
    }
}
