use std::ops::Range;
use std::sync::OnceLock;

use regex::Regex;

use crate::interpret::numeral::{self, NUMERAL_CHARS};

/// Extracts the monetary amount of a bookkeeping message.
///
/// Explicit currency markers beat Chinese numerals, which beat the first bare
/// number, so `12/20 午餐 120元` yields 120 rather than 12.
pub fn extract(text: &str) -> Option<f64> {
    let text = numeral::fold_width(text);
    marked_amount(&text).or_else(|| first_number(bare_number_regex(), &text))
}

/// Removes every amount phrase, for building record descriptions.
pub fn strip_amounts(text: &str) -> String {
    let text = numeral::fold_width(text);
    blank_spans(&text, &amount_spans(&text))
}

/// Byte ranges of the amount phrases in already width-folded `text`: every
/// currency-marked amount, or the bare number [`extract`] fell back to when
/// nothing is marked.
pub fn amount_spans(text: &str) -> Vec<Range<usize>> {
    let mut spans = [
        unit_amount_regex(),
        dollar_amount_regex(),
        chinese_amount_regex(),
    ]
    .into_iter()
    .flat_map(|pattern| pattern.find_iter(text).map(|found| found.range()))
    .collect::<Vec<_>>();
    if marked_amount(text).is_none()
        && let Some(found) = bare_number_regex().find(text)
    {
        spans.push(found.range());
    }
    spans
}

/// Replaces the union of `spans` with single spaces. Spans may overlap or
/// arrive unordered; ones that do not fit `text` are ignored.
pub fn blank_spans(text: &str, spans: &[Range<usize>]) -> String {
    let mut ordered = spans
        .iter()
        .filter(|span| {
            span.start < span.end
                && span.end <= text.len()
                && text.is_char_boundary(span.start)
                && text.is_char_boundary(span.end)
        })
        .cloned()
        .collect::<Vec<_>>();
    ordered.sort_by_key(|span| span.start);

    let mut merged: Vec<Range<usize>> = Vec::with_capacity(ordered.len());
    for span in ordered {
        match merged.last_mut() {
            Some(last) if span.start <= last.end => last.end = last.end.max(span.end),
            _ => merged.push(span),
        }
    }

    let mut output = String::with_capacity(text.len());
    let mut cursor = 0;
    for span in merged {
        output.push_str(&text[cursor..span.start]);
        output.push(' ');
        cursor = span.end;
    }
    output.push_str(&text[cursor..]);
    output
}

fn marked_amount(text: &str) -> Option<f64> {
    first_number(unit_amount_regex(), text)
        .or_else(|| first_number(dollar_amount_regex(), text))
        .or_else(|| chinese_amount(text))
}

fn chinese_amount(text: &str) -> Option<f64> {
    let captures = chinese_amount_regex().captures(text)?;
    let value = numeral::to_number(captures.get(1)?.as_str());
    // 零元 carries no amount; let the bare-number pass look further.
    if value > 0.0 { Some(value) } else { None }
}

fn first_number(pattern: &Regex, text: &str) -> Option<f64> {
    let captures = pattern.captures(text)?;
    let raw = captures.get(1)?.as_str();
    raw.replace(',', "").parse::<f64>().ok()
}

fn unit_amount_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"([0-9][0-9,]*(?:\.[0-9]+)?)\s*[元塊块錢钱]").expect("invalid unit amount regex")
    })
}

fn dollar_amount_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)(?:NT\$?|\$)\s*([0-9][0-9,]*(?:\.[0-9]+)?)")
            .expect("invalid dollar amount regex")
    })
}

fn chinese_amount_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(&format!(r"([{NUMERAL_CHARS}]+)\s*[元塊块錢钱]"))
            .expect("invalid chinese amount regex")
    })
}

fn bare_number_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"([0-9]+(?:\.[0-9]+)?)").expect("invalid number regex"))
}

#[cfg(test)]
mod tests {
    use super::{amount_spans, blank_spans, extract, strip_amounts};

    #[test]
    fn currency_markers_agree() {
        assert_eq!(extract("120元"), Some(120.0));
        assert_eq!(extract("$120"), Some(120.0));
        assert_eq!(extract("nt$120"), Some(120.0));
        assert_eq!(extract("NT 120"), Some(120.0));
        assert_eq!(extract("計程車 250 塊"), Some(250.0));
        assert_eq!(extract("咖啡 85.5元"), Some(85.5));
        assert_eq!(extract("房租 12,000 元"), Some(12000.0));
    }

    #[test]
    fn unit_marked_amount_beats_earlier_numbers() {
        assert_eq!(extract("12/20 午餐 120元"), Some(120.0));
        assert_eq!(extract("3天前 買書 $450"), Some(450.0));
    }

    #[test]
    fn chinese_numerals_need_a_unit() {
        assert_eq!(extract("午餐五百塊"), Some(500.0));
        assert_eq!(extract("紅包兩千三百元"), Some(2300.0));
        assert_eq!(extract("三個便當"), None);
    }

    #[test]
    fn falls_back_to_first_bare_number() {
        assert_eq!(extract("晚餐 300"), Some(300.0));
        assert_eq!(extract("12/20 晚餐 300"), Some(12.0));
        assert_eq!(extract("零元 便當 80"), Some(80.0));
        assert_eq!(extract("午餐"), None);
    }

    #[test]
    fn strips_marked_amounts_only() {
        let stripped = strip_amounts("午餐 120 元 $30 五百塊 第2份");
        assert!(!stripped.contains("120"));
        assert!(!stripped.contains("$30"));
        assert!(!stripped.contains("五百塊"));
        assert!(stripped.contains("午餐"));
        assert!(stripped.contains("第2份"));
    }

    #[test]
    fn bare_fallback_number_is_stripped_too() {
        assert_eq!(strip_amounts("晚餐 300").trim(), "晚餐");
        assert_eq!(amount_spans("晚餐 300"), vec![7..10]);
        // 零元 is stripped as a marked phrase while 80 is the amount used.
        let leftover = strip_amounts("零元 便當 80");
        assert_eq!(leftover.split_whitespace().collect::<Vec<_>>(), vec!["便當"]);
    }

    #[test]
    fn full_width_amounts_are_recognized() {
        assert_eq!(extract("午餐１２０元"), Some(120.0));
        assert_eq!(extract("晚餐 ＄６８０"), Some(680.0));
        assert_eq!(extract("咖啡 ８５．５塊"), Some(85.5));
        assert_eq!(strip_amounts("午餐１２０元").trim(), "午餐");
    }

    #[test]
    fn overlapping_spans_are_blanked_once() {
        assert_eq!(blank_spans("上個月500元房租", &[9..15, 0..12]), " 房租");
        assert_eq!(blank_spans("午餐", &[0..1, 0..99]), "午餐");
    }
}
