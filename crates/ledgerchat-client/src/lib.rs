pub mod catalog;
pub mod commands;
pub mod contracts;
pub mod error;
pub mod interpret;

pub use contracts::envelope::{FailureEnvelope, SuccessEnvelope};
pub use error::{ClientError, ClientResult};
pub use interpret::{
    CategoryKeywordTable, IntentKind, Interpreter, KeywordSegmenter, ParsedQuery, ParsedRecord,
    Segmenter,
};

pub const API_VERSION: &str = env!("CARGO_PKG_VERSION");
