use std::path::Path;

use chrono::{Local, NaiveDate};

use crate::catalog::{CatalogOptions, TableSource, load_keyword_table};
use crate::contracts::types::{QueryData, RecordData};
use crate::interpret::date::{format_iso_date, parse_iso_date};
use crate::interpret::{Interpreter, ParsedQuery, ParsedRecord};
use crate::{ClientError, ClientResult};

/// Shared knobs for every interpreting command.
#[derive(Debug, Default, Clone, Copy)]
pub struct InterpretOptions<'a> {
    /// Reference date as `YYYY-MM-DD`; defaults to the local calendar date.
    pub today: Option<&'a str>,
    pub keywords_path: Option<&'a Path>,
    pub home_override: Option<&'a Path>,
}

pub(crate) fn build_interpreter(
    options: &InterpretOptions<'_>,
) -> ClientResult<(Interpreter, TableSource)> {
    let loaded = load_keyword_table(CatalogOptions {
        keywords_path: options.keywords_path,
        home_override: options.home_override,
    })?;
    Ok((Interpreter::new(loaded.table), loaded.source))
}

pub(crate) fn require_text<'a>(text: &'a str, command: &str) -> ClientResult<&'a str> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(ClientError::empty_message(command));
    }
    Ok(trimmed)
}

pub(crate) fn resolve_today(today: Option<&str>, command: &str) -> ClientResult<NaiveDate> {
    match today {
        Some(value) => parse_iso_date(value).ok_or_else(|| {
            ClientError::invalid_argument_for_command(
                "`today` must use YYYY-MM-DD format with a real calendar date.",
                Some(command),
            )
        }),
        None => Ok(Local::now().date_naive()),
    }
}

pub(crate) fn record_data(record: &ParsedRecord, today: NaiveDate) -> RecordData {
    RecordData {
        text: record.raw_text.clone(),
        amount: record.amount,
        kind: record.kind.as_str().to_string(),
        category: record.category.clone(),
        category_matched: record.category_matched,
        date: format_iso_date(&record.date),
        date_source: record.date_source.as_str().to_string(),
        reference_date: format_iso_date(&today),
        description: record.description.clone(),
        confidence: record.confidence,
    }
}

pub(crate) fn query_data(text: &str, query: &ParsedQuery, today: NaiveDate) -> QueryData {
    QueryData {
        text: text.to_string(),
        query_kind: query.kind.as_str().to_string(),
        category: query.category.clone(),
        period: query.period.as_str().to_string(),
        start_date: format_iso_date(&query.start_date),
        end_date: format_iso_date(&query.end_date),
        chart_hint: query.chart_hint.map(|hint| hint.as_str().to_string()),
        reference_date: format_iso_date(&today),
    }
}
