use std::ops::Range;
use std::sync::OnceLock;

use chrono::{Datelike, Days, Duration, NaiveDate};
use regex::{Captures, Regex};
use tracing::debug;

use crate::interpret::numeral::{self, NUMERAL_CHARS};

/// A resolved date plus the byte span of the phrase that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateHit {
    pub date: NaiveDate,
    pub span: Range<usize>,
}

pub struct DateRule {
    pub name: &'static str,
    pub apply: fn(&str, NaiveDate) -> Option<DateHit>,
}

/// Evaluated top to bottom; the first rule that yields a date wins.
pub const DATE_RULES: [DateRule; 7] = [
    DateRule {
        name: "literal",
        apply: literal_day,
    },
    DateRule {
        name: "days_ago",
        apply: days_ago,
    },
    DateRule {
        name: "relative_weekday",
        apply: relative_weekday,
    },
    DateRule {
        name: "previous_month_day",
        apply: previous_month_day,
    },
    DateRule {
        name: "current_month_day",
        apply: current_month_day,
    },
    DateRule {
        name: "month_day",
        apply: month_day,
    },
    DateRule {
        name: "full_date",
        apply: full_date,
    },
];

const LITERAL_OFFSETS: [(&str, i64); 8] = [
    ("今天", 0),
    ("今日", 0),
    ("昨天", -1),
    ("昨日", -1),
    ("大前天", -3),
    ("前天", -2),
    ("明天", 1),
    ("明日", 1),
];

pub fn resolve(text: &str, today: NaiveDate) -> Option<NaiveDate> {
    resolve_match(text, today).map(|hit| hit.date)
}

/// Like [`resolve`], but also reports where the phrase sits. The span indexes
/// [`numeral::fold_width`] of `text`, which is `text` itself when the caller
/// folded it already.
pub fn resolve_match(text: &str, today: NaiveDate) -> Option<DateHit> {
    let text = numeral::fold_width(text);
    for rule in &DATE_RULES {
        if let Some(hit) = (rule.apply)(&text, today) {
            debug!(rule = rule.name, date = %hit.date, "date rule matched");
            return Some(hit);
        }
    }
    None
}

pub fn format_iso_date(date: &NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

pub fn parse_iso_date(value: &str) -> Option<NaiveDate> {
    if !looks_like_iso_date(value) {
        return None;
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d").ok()
}

pub fn first_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

/// Last day of the month before `date`'s month.
pub fn end_of_previous_month(date: NaiveDate) -> NaiveDate {
    let first = first_of_month(date);
    first.pred_opt().unwrap_or(first)
}

pub fn first_of_previous_month(date: NaiveDate) -> NaiveDate {
    first_of_month(end_of_previous_month(date))
}

pub fn days_in_month(year: i32, month: u32) -> u32 {
    let next_first = if month >= 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    };
    next_first
        .and_then(|date| date.pred_opt())
        .map(|date| date.day())
        .unwrap_or(31)
}

/// Day `day` of the month containing `anchor`, clamped into the month.
pub fn clamped_day_in_month(anchor: NaiveDate, day: u32) -> NaiveDate {
    let last = days_in_month(anchor.year(), anchor.month());
    let clamped = day.clamp(1, last);
    NaiveDate::from_ymd_opt(anchor.year(), anchor.month(), clamped).unwrap_or(anchor)
}

fn literal_day(text: &str, today: NaiveDate) -> Option<DateHit> {
    for (marker, offset) in LITERAL_OFFSETS {
        if let Some(start) = text.find(marker) {
            let date = today.checked_add_signed(Duration::days(offset))?;
            return Some(DateHit {
                date,
                span: start..start + marker.len(),
            });
        }
    }
    None
}

fn days_ago(text: &str, today: NaiveDate) -> Option<DateHit> {
    let captures = days_ago_regex().captures(text)?;
    let whole = captures.get(0)?;
    let count = numeral::parse_count(captures.get(1)?.as_str())?;
    let date = today.checked_sub_days(Days::new(u64::from(count)))?;
    Some(DateHit {
        date,
        span: whole.range(),
    })
}

fn relative_weekday(text: &str, today: NaiveDate) -> Option<DateHit> {
    let captures = weekday_regex().captures(text)?;
    let whole = captures.get(0)?;
    let week_offset: i64 = match captures.get(1)?.as_str() {
        "上" => -1,
        "下" => 1,
        _ => 0,
    };
    let target = weekday_index(captures.get(2)?.as_str())?;
    let current = i64::from(today.weekday().num_days_from_monday());
    let days_diff = target - current + week_offset * 7;
    let date = today.checked_add_signed(Duration::days(days_diff))?;
    Some(DateHit {
        date,
        span: whole.range(),
    })
}

fn previous_month_day(text: &str, today: NaiveDate) -> Option<DateHit> {
    let captures = previous_month_day_regex().captures(text)?;
    let whole = captures.get(0)?;
    let day = day_number(captures.get(1)?.as_str());
    let date = clamped_day_in_month(end_of_previous_month(today), day);
    Some(DateHit {
        date,
        span: whole.range(),
    })
}

fn current_month_day(text: &str, today: NaiveDate) -> Option<DateHit> {
    for captures in current_month_day_regex().captures_iter(text) {
        let Some(whole) = captures.get(0) else {
            continue;
        };
        if is_part_of_longer_date(text, whole.start()) {
            continue;
        }
        let Some(raw_day) = captures.get(2).or_else(|| captures.get(3)) else {
            continue;
        };
        let date = clamped_day_in_month(today, day_number(raw_day.as_str()));
        return Some(DateHit {
            date,
            span: whole.range(),
        });
    }
    None
}

fn month_day(text: &str, today: NaiveDate) -> Option<DateHit> {
    for captures in month_day_regex().captures_iter(text) {
        let Some(whole) = captures.get(0) else {
            continue;
        };
        if is_part_of_longer_date(text, whole.start()) || is_followed_by_digit(text, whole.end())
        {
            continue;
        }
        let Some((month, day)) = capture_pair(&captures) else {
            continue;
        };
        if let Some(date) = NaiveDate::from_ymd_opt(today.year(), month, day) {
            return Some(DateHit {
                date,
                span: whole.range(),
            });
        }
    }
    None
}

fn full_date(text: &str, _today: NaiveDate) -> Option<DateHit> {
    for captures in full_date_regex().captures_iter(text) {
        let Some(whole) = captures.get(0) else {
            continue;
        };
        let Some(year) = captures
            .get(1)
            .and_then(|value| value.as_str().parse::<i32>().ok())
        else {
            continue;
        };
        let month = captures
            .get(2)
            .and_then(|value| value.as_str().parse::<u32>().ok());
        let day = captures
            .get(3)
            .and_then(|value| value.as_str().parse::<u32>().ok());
        if let (Some(month), Some(day)) = (month, day)
            && let Some(date) = NaiveDate::from_ymd_opt(year, month, day)
        {
            return Some(DateHit {
                date,
                span: whole.range(),
            });
        }
    }
    None
}

fn capture_pair(captures: &Captures<'_>) -> Option<(u32, u32)> {
    let month = captures.get(1)?.as_str().parse::<u32>().ok()?;
    let day = captures.get(2)?.as_str().parse::<u32>().ok()?;
    Some((month, day))
}

fn day_number(raw: &str) -> u32 {
    if raw.chars().all(|character| character.is_ascii_digit()) {
        // Oversized digit runs clamp to the month end like any other overflow.
        return raw.parse::<u32>().unwrap_or(u32::MAX);
    }
    numeral::parse_count(raw).unwrap_or(1)
}

fn weekday_index(raw: &str) -> Option<i64> {
    match raw {
        "一" => Some(0),
        "二" => Some(1),
        "三" => Some(2),
        "四" => Some(3),
        "五" => Some(4),
        "六" => Some(5),
        "日" | "天" => Some(6),
        _ => None,
    }
}

/// True when the number starting at `start` continues an earlier date
/// component, as in the `20日` of `12月20日` or the `12/20` of `2024/12/20`.
fn is_part_of_longer_date(text: &str, start: usize) -> bool {
    text[..start]
        .chars()
        .next_back()
        .is_some_and(|previous| {
            previous.is_ascii_digit() || matches!(previous, '月' | '年' | '/' | '-')
        })
}

fn is_followed_by_digit(text: &str, end: usize) -> bool {
    text[end..]
        .chars()
        .next()
        .is_some_and(|next| next.is_ascii_digit())
}

fn days_ago_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(&format!(r"([0-9]+|[{NUMERAL_CHARS}]+)\s*天前")).expect("invalid days-ago regex")
    })
}

fn weekday_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(上|這|这|下)[週周]([一二三四五六日天])").expect("invalid weekday regex")
    })
}

fn previous_month_day_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(&format!(r"上[個个]月([0-9]+|[{NUMERAL_CHARS}]+)[號号日]?"))
            .expect("invalid previous-month regex")
    })
}

fn current_month_day_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(&format!(
            r"(這個月|这个月)?(?:([0-9]+)[號号日]|([{NUMERAL_CHARS}]+)[號号])"
        ))
        .expect("invalid day-of-month regex")
    })
}

fn month_day_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"([0-9]{1,2})(?:[/\-]|月)([0-9]{1,2})").expect("invalid month-day regex")
    })
}

fn full_date_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"([0-9]{4})[年/\-]([0-9]{1,2})[月/\-]([0-9]{1,2})[日號号]?")
            .expect("invalid full-date regex")
    })
}

fn looks_like_iso_date(value: &str) -> bool {
    if value.len() != 10 {
        return false;
    }
    let bytes = value.as_bytes();
    if bytes[4] != b'-' || bytes[7] != b'-' {
        return false;
    }

    for index in [0usize, 1, 2, 3, 5, 6, 8, 9] {
        if !bytes[index].is_ascii_digit() {
            return false;
        }
    }
    true
}
