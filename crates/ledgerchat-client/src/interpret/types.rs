use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryKind {
    Income,
    Expense,
}

impl EntryKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Income => "收入",
            Self::Expense => "支出",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntentKind {
    Record,
    Query,
    Analysis,
}

impl IntentKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Record => "record",
            Self::Query => "query",
            Self::Analysis => "analysis",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateSource {
    /// A date phrase in the text resolved to the date.
    Explicit,
    /// Nothing resolved; the reference date was used.
    Reference,
}

impl DateSource {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Explicit => "explicit",
            Self::Reference => "reference",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParsedRecord {
    pub amount: Option<f64>,
    pub kind: EntryKind,
    pub category: String,
    pub category_matched: bool,
    pub date: NaiveDate,
    pub date_source: DateSource,
    pub description: String,
    pub confidence: f64,
    pub raw_text: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryKind {
    Summary,
    Trend,
    Category,
    Compare,
}

impl QueryKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Summary => "summary",
            Self::Trend => "trend",
            Self::Category => "category",
            Self::Compare => "compare",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Period {
    Day,
    Week,
    Month,
    Year,
}

impl Period {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Day => "day",
            Self::Week => "week",
            Self::Month => "month",
            Self::Year => "year",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartHint {
    Pie,
    Line,
    Bar,
}

impl ChartHint {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pie => "pie",
            Self::Line => "line",
            Self::Bar => "bar",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedQuery {
    pub kind: QueryKind,
    pub category: Option<String>,
    pub period: Period,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub chart_hint: Option<ChartHint>,
}
