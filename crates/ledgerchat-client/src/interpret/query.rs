use std::sync::OnceLock;

use chrono::{Datelike, Days, NaiveDate};
use regex::Regex;
use tracing::debug;

use crate::interpret::date::{end_of_previous_month, first_of_month, first_of_previous_month};
use crate::interpret::numeral::{self, NUMERAL_CHARS};
use crate::interpret::table::CategoryKeywordTable;
use crate::interpret::types::{ChartHint, ParsedQuery, Period, QueryKind};

/// Month count used when `近X個月` spells X with several Chinese characters.
pub const AMBIGUOUS_MONTH_COUNT: u32 = 3;

struct PeriodRule {
    markers: &'static [&'static str],
    range: fn(NaiveDate) -> (Period, NaiveDate, NaiveDate),
}

const PERIOD_RULES: [PeriodRule; 5] = [
    PeriodRule {
        markers: &["今天", "今日"],
        range: |today| (Period::Day, today, today),
    },
    PeriodRule {
        markers: &["這週", "本週", "这周", "本周"],
        range: |today| {
            let offset = u64::from(today.weekday().num_days_from_monday());
            let monday = today.checked_sub_days(Days::new(offset)).unwrap_or(today);
            (Period::Week, monday, today)
        },
    },
    PeriodRule {
        markers: &["上個月", "上月", "上个月"],
        range: |today| {
            (
                Period::Month,
                first_of_previous_month(today),
                end_of_previous_month(today),
            )
        },
    },
    PeriodRule {
        markers: &["這個月", "本月", "这个月"],
        range: |today| (Period::Month, first_of_month(today), today),
    },
    PeriodRule {
        markers: &["今年"],
        range: |today| {
            let january_first = today.with_ordinal(1).unwrap_or(today);
            (Period::Year, january_first, today)
        },
    },
];

const CHART_RULES: [(&[&str], ChartHint); 3] = [
    (&["圓餅圖", "比例"], ChartHint::Pie),
    (&["折線圖", "趨勢"], ChartHint::Line),
    (&["長條圖", "柱狀圖"], ChartHint::Bar),
];

const KIND_RULES: [(&[&str], QueryKind); 2] = [
    (&["趨勢", "變化"], QueryKind::Trend),
    (&["比較", "對比"], QueryKind::Compare),
];

pub fn parse_query(text: &str, today: NaiveDate, table: &CategoryKeywordTable) -> ParsedQuery {
    let folded = numeral::fold_width(text);
    let text = folded.as_ref();
    let (period, mut start_date, end_date) = PERIOD_RULES
        .iter()
        .find(|rule| contains_any(text, rule.markers))
        .map(|rule| (rule.range)(today))
        .unwrap_or((Period::Month, first_of_month(today), today));

    if let Some(months) = recent_months(text) {
        start_date = months_back_start(today, months);
    }

    let category = table
        .categories()
        .iter()
        .find(|category| text.contains(category.name.as_str()))
        .map(|category| category.name.clone());

    let chart_hint = CHART_RULES
        .iter()
        .find(|(markers, _)| contains_any(text, markers))
        .map(|(_, hint)| *hint);

    let kind = KIND_RULES
        .iter()
        .find(|(markers, _)| contains_any(text, markers))
        .map(|(_, kind)| *kind)
        .unwrap_or(if category.is_some() {
            QueryKind::Category
        } else {
            QueryKind::Summary
        });

    let query = ParsedQuery {
        kind,
        category,
        period,
        start_date: start_date.min(end_date),
        end_date,
        chart_hint,
    };
    debug!(
        kind = query.kind.as_str(),
        period = query.period.as_str(),
        start = %query.start_date,
        end = %query.end_date,
        "parsed query"
    );
    query
}

/// The `N` of `近N個月`. Digits parse as written and one Chinese numeral goes
/// through the converter; longer Chinese runs such as 十二 fall back to
/// [`AMBIGUOUS_MONTH_COUNT`].
pub fn recent_months(text: &str) -> Option<u32> {
    let text = numeral::fold_width(text);
    let captures = recent_months_regex().captures(&text)?;
    let raw = captures.get(1)?.as_str();
    if raw.chars().all(|character| character.is_ascii_digit()) {
        return raw.parse::<u32>().ok();
    }
    if raw.chars().count() == 1 {
        return numeral::parse_count(raw);
    }
    Some(AMBIGUOUS_MONTH_COUNT)
}

/// First day of the month `months - 1` months before `today`'s month.
pub fn months_back_start(today: NaiveDate, months: u32) -> NaiveDate {
    let mut start = first_of_month(today);
    for _ in 1..months {
        let Some(previous_end) = start.pred_opt() else {
            break;
        };
        start = first_of_month(previous_end);
    }
    start
}

fn contains_any(text: &str, markers: &[&str]) -> bool {
    markers.iter().any(|marker| text.contains(marker))
}

fn recent_months_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(&format!(r"近\s*([0-9]+|[{NUMERAL_CHARS}]+)\s*[個个]?月"))
            .expect("invalid recent-months regex")
    })
}
