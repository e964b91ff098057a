use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IsoDate(pub String);

impl IsoDate {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

pub fn parse_iso_date(value: &str) -> Result<IsoDate, String> {
    if value.len() != 10 {
        return Err("date must use YYYY-MM-DD format".to_string());
    }

    let bytes = value.as_bytes();
    if bytes[4] != b'-' || bytes[7] != b'-' {
        return Err("date must use YYYY-MM-DD format".to_string());
    }

    if [0usize, 1, 2, 3, 5, 6, 8, 9]
        .iter()
        .any(|index| !bytes[*index].is_ascii_digit())
    {
        return Err("date must use YYYY-MM-DD format".to_string());
    }

    if NaiveDate::parse_from_str(value, "%Y-%m-%d").is_err() {
        return Err("date must use valid calendar values".to_string());
    }

    Ok(IsoDate(value.to_string()))
}

/// Extended help shown after `ledgerchat record --help`.
pub const RECORD_AFTER_HELP: &str = "\
How a message is read:
  Amount:    120元, 50塊, $120, NT$120, 五百元, or a bare number as a last resort
  Date:      今天, 昨天, 前天, 大前天, 3天前, 上週五, 上個月5號, 15號, 12/20, 2024-01-05
             Messages without a date use --today (default: the local date).
  Category:  matched against the keyword table; see `ledgerchat keywords`

Examples:
  ledgerchat record \"午餐 120 元\"
  ledgerchat record \"昨天 晚餐 火鍋 $680\" --json
  ledgerchat record \"上週五 看電影 NT$320\" --today 2024-03-15
";

/// Extended help shown after `ledgerchat query --help`.
pub const QUERY_AFTER_HELP: &str = "\
Periods:
  今天 / 本週 / 這個月 (default) / 上個月 / 今年 / 近N個月

Examples:
  ledgerchat query \"上個月餐飲花多少\"
  ledgerchat query \"近6個月支出趨勢\" --json
";

#[derive(Debug, Parser)]
#[command(
    name = "ledgerchat",
    version,
    about = "natural-language bookkeeping interpreter",
    disable_help_subcommand = true
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Flags shared by every command that interprets a message.
#[derive(Debug, Clone, Args)]
pub struct InterpretArgs {
    /// The message, as one quoted argument
    pub text: String,
    /// Reference date for relative expressions (YYYY-MM-DD)
    #[arg(long, value_parser = parse_iso_date)]
    pub today: Option<IsoDate>,
    /// Keyword table JSON file (overrides LEDGERCHAT_KEYWORDS and the home file)
    #[arg(long, value_name = "PATH")]
    pub keywords: Option<PathBuf>,
    /// Emit structured JSON output for machine parsing
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Parse a bookkeeping message into an income or expense record
    #[command(after_help = RECORD_AFTER_HELP)]
    Record(InterpretArgs),
    /// Parse a spending question into a date range, category, and chart hint
    #[command(after_help = QUERY_AFTER_HELP)]
    Query(InterpretArgs),
    /// Classify a message as record, query, or analysis
    Intent {
        /// The message, as one quoted argument
        text: String,
        /// Emit structured JSON output for machine parsing
        #[arg(long)]
        json: bool,
    },
    /// Classify a message and run the matching parser
    Chat(InterpretArgs),
    /// Show the active keyword table and where it was loaded from
    Keywords {
        /// Keyword table JSON file (overrides LEDGERCHAT_KEYWORDS and the home file)
        #[arg(long, value_name = "PATH")]
        keywords: Option<PathBuf>,
        /// Emit structured JSON output for machine parsing
        #[arg(long)]
        json: bool,
    },
}

impl Commands {
    pub fn wants_json(&self) -> bool {
        match self {
            Self::Record(args) | Self::Query(args) | Self::Chat(args) => args.json,
            Self::Intent { json, .. } | Self::Keywords { json, .. } => *json,
        }
    }
}

#[cfg(test)]
pub fn parse_from<I, T>(itr: I) -> Result<Cli, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    Cli::try_parse_from(itr)
}
