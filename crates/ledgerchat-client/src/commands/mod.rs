pub mod chat;
pub mod common;
pub mod intent;
pub mod keywords;
pub mod query;
pub mod record;
