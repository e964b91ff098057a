//! The bookkeeping-message interpreter.
//!
//! Raw Chinese text goes in, a typed descriptor comes out. Every function here
//! is pure: the only shared data is the immutable keyword table and the
//! segmenter built from it, so one [`Interpreter`] can serve any number of
//! threads without locking.

pub mod amount;
pub mod category;
pub mod date;
pub mod intent;
pub mod numeral;
pub mod query;
pub mod record;
pub mod segment;
pub mod table;
pub mod types;

use std::fmt;
use std::sync::Arc;

use chrono::NaiveDate;

pub use segment::{KeywordSegmenter, Segmenter};
pub use table::{CategoryKeywordTable, CategoryKeywords};
pub use types::{
    ChartHint, DateSource, EntryKind, IntentKind, ParsedQuery, ParsedRecord, Period, QueryKind,
};

#[derive(Clone)]
pub struct Interpreter {
    table: Arc<CategoryKeywordTable>,
    segmenter: Arc<dyn Segmenter>,
}

impl Interpreter {
    /// Uses a [`KeywordSegmenter`] whose dictionary is the table's keywords.
    pub fn new(table: Arc<CategoryKeywordTable>) -> Self {
        let segmenter: Arc<dyn Segmenter> = Arc::new(KeywordSegmenter::from_table(&table));
        Self { table, segmenter }
    }

    pub fn with_segmenter(table: Arc<CategoryKeywordTable>, segmenter: Arc<dyn Segmenter>) -> Self {
        Self { table, segmenter }
    }

    pub fn table(&self) -> &CategoryKeywordTable {
        &self.table
    }

    pub fn classify_intent(&self, text: &str) -> IntentKind {
        intent::classify(text)
    }

    pub fn classify_category(&self, text: &str) -> Option<String> {
        category::classify(text, &self.table, self.segmenter.as_ref())
    }

    pub fn parse_record(&self, text: &str, today: NaiveDate) -> ParsedRecord {
        record::parse_record(text, today, &self.table, self.segmenter.as_ref())
    }

    pub fn parse_query(&self, text: &str, today: NaiveDate) -> ParsedQuery {
        query::parse_query(text, today, &self.table)
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new(Arc::new(CategoryKeywordTable::builtin()))
    }
}

impl fmt::Debug for Interpreter {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("Interpreter")
            .field("categories", &self.table.categories().len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::NaiveDate;

    use super::{CategoryKeywordTable, IntentKind, Interpreter, Segmenter};

    struct CharSegmenter;

    impl Segmenter for CharSegmenter {
        fn segment(&self, text: &str) -> Vec<String> {
            text.chars().map(String::from).collect()
        }
    }

    #[test]
    fn interpreter_is_shareable_across_threads() {
        let interpreter = Interpreter::default();
        let today = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap_or_default();
        let expected = interpreter.parse_record("午餐 120 元", today);

        std::thread::scope(|scope| {
            let handles: Vec<_> = (0..4)
                .map(|_| scope.spawn(|| interpreter.parse_record("午餐 120 元", today)))
                .collect();
            for handle in handles {
                let joined = handle.join();
                assert!(joined.is_ok());
                if let Ok(record) = joined {
                    assert_eq!(record, expected);
                }
            }
        });
    }

    #[test]
    fn custom_segmenter_is_used_for_categories() {
        let table = Arc::new(CategoryKeywordTable::builtin());
        let interpreter = Interpreter::with_segmenter(table, Arc::new(CharSegmenter));
        assert_eq!(interpreter.classify_category("搭車"), Some("交通".to_string()));
        assert_eq!(interpreter.classify_intent("搭車 50"), IntentKind::Record);
    }
}
