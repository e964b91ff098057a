use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Deserialize;
use tracing::{info, warn};

use crate::interpret::table::{
    CategoryKeywordTable, CategoryKeywords, DEFAULT_FALLBACK_EXPENSE, DEFAULT_FALLBACK_INCOME,
    DEFAULT_INCOME_MARKER,
};
use crate::interpret::types::EntryKind;
use crate::{ClientError, ClientResult};

pub const KEYWORDS_ENV: &str = "LEDGERCHAT_KEYWORDS";
pub const HOME_ENV: &str = "LEDGERCHAT_HOME";
pub const KEYWORDS_FILE_NAME: &str = "keywords.json";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableSource {
    Builtin,
    File(PathBuf),
}

impl TableSource {
    pub fn describe(&self) -> String {
        match self {
            Self::Builtin => "builtin".to_string(),
            Self::File(path) => path.display().to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct LoadedTable {
    pub table: Arc<CategoryKeywordTable>,
    pub source: TableSource,
}

#[derive(Debug, Default, Clone, Copy)]
pub struct CatalogOptions<'a> {
    /// Explicit table file; must exist.
    pub keywords_path: Option<&'a Path>,
    /// Replaces `LEDGERCHAT_HOME` / `~/.ledgerchat` when looking for `keywords.json`.
    pub home_override: Option<&'a Path>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct KeywordTableFile {
    categories: Vec<KeywordCategoryFile>,
    #[serde(default = "default_fallback_expense")]
    fallback_expense: String,
    #[serde(default = "default_fallback_income")]
    fallback_income: String,
    #[serde(default = "default_income_markers")]
    income_markers: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct KeywordCategoryFile {
    name: String,
    kind: EntryKind,
    keywords: Vec<String>,
}

/// Resolves the keyword table in priority order: explicit path, then
/// `LEDGERCHAT_KEYWORDS`, then `<home>/keywords.json`, then the built-in table.
pub fn load_keyword_table(options: CatalogOptions<'_>) -> ClientResult<LoadedTable> {
    if let Some(path) = options.keywords_path {
        return load_required(path);
    }
    if let Some(env_path) = std::env::var_os(KEYWORDS_ENV) {
        return load_required(&PathBuf::from(env_path));
    }
    if let Some(home) = resolve_home(options.home_override) {
        let candidate = home.join(KEYWORDS_FILE_NAME);
        if candidate.is_file() {
            return load_required(&candidate);
        }
    }

    info!(source = "builtin", "using built-in keyword table");
    Ok(LoadedTable {
        table: Arc::new(CategoryKeywordTable::builtin()),
        source: TableSource::Builtin,
    })
}

pub fn resolve_home(home_override: Option<&Path>) -> Option<PathBuf> {
    match home_override {
        Some(path) => Some(path.to_path_buf()),
        None => {
            if let Some(override_path) = std::env::var_os(HOME_ENV) {
                Some(PathBuf::from(override_path))
            } else {
                home::home_dir().map(|home_path| home_path.join(".ledgerchat"))
            }
        }
    }
}

pub fn parse_keyword_table(body: &str, path: Option<&Path>) -> ClientResult<CategoryKeywordTable> {
    let file: KeywordTableFile = serde_json::from_str(body)
        .map_err(|error| ClientError::keyword_table_invalid(path, &error.to_string()))?;
    let categories = file
        .categories
        .into_iter()
        .map(|category| CategoryKeywords {
            name: category.name,
            kind: category.kind,
            keywords: category.keywords,
        })
        .collect();
    CategoryKeywordTable::new(
        categories,
        &file.fallback_expense,
        &file.fallback_income,
        file.income_markers,
    )
    .map_err(|error| match path {
        Some(location) => ClientError::keyword_table_invalid(
            Some(location),
            error
                .data
                .as_ref()
                .and_then(|data| data.get("detail"))
                .and_then(|detail| detail.as_str())
                .unwrap_or(error.message.as_str()),
        ),
        None => error,
    })
}

fn load_required(path: &Path) -> ClientResult<LoadedTable> {
    let body = fs::read_to_string(path).map_err(|error| {
        if error.kind() == std::io::ErrorKind::NotFound {
            ClientError::keyword_table_missing(path)
        } else {
            ClientError::keyword_table_invalid(Some(path), &error.to_string())
        }
    })?;
    let table = parse_keyword_table(&body, Some(path)).inspect_err(|error| {
        warn!(path = %path.display(), code = %error.code, "rejected keyword table");
    })?;
    info!(
        source = %path.display(),
        categories = table.categories().len(),
        "loaded keyword table"
    );
    Ok(LoadedTable {
        table: Arc::new(table),
        source: TableSource::File(path.to_path_buf()),
    })
}

fn default_fallback_expense() -> String {
    DEFAULT_FALLBACK_EXPENSE.to_string()
}

fn default_fallback_income() -> String {
    DEFAULT_FALLBACK_INCOME.to_string()
}

fn default_income_markers() -> Vec<String> {
    vec![DEFAULT_INCOME_MARKER.to_string()]
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::{TableSource, parse_keyword_table, resolve_home};
    use crate::interpret::types::EntryKind;

    #[test]
    fn parses_minimal_table_with_defaults() {
        let parsed = parse_keyword_table(
            r#"{"categories":[{"name":"寵物","kind":"expense","keywords":["貓砂","飼料"]}]}"#,
            None,
        );
        assert!(parsed.is_ok());
        if let Ok(table) = parsed {
            assert_eq!(table.categories().len(), 1);
            assert_eq!(table.kind_of("寵物"), Some(EntryKind::Expense));
            assert_eq!(table.fallback_expense(), "其他");
            assert_eq!(table.fallback_income(), "其他收入");
            assert_eq!(table.income_markers(), ["收入".to_string()]);
        }
    }

    #[test]
    fn rejects_unknown_kind_with_path_context() {
        let parsed = parse_keyword_table(
            r#"{"categories":[{"name":"寵物","kind":"asset","keywords":["貓砂"]}]}"#,
            Some(Path::new("/tmp/keywords.json")),
        );
        assert!(parsed.is_err());
        if let Err(error) = parsed {
            assert_eq!(error.code, "keyword_table_invalid");
            assert!(error.message.contains("/tmp/keywords.json"));
        }
    }

    #[test]
    fn validation_errors_keep_path_context() {
        let parsed = parse_keyword_table(
            r#"{"categories":[]}"#,
            Some(Path::new("/tmp/keywords.json")),
        );
        assert!(parsed.is_err());
        if let Err(error) = parsed {
            assert!(error.message.contains("/tmp/keywords.json"));
            assert!(error.message.contains("at least one category"));
        }
    }

    #[test]
    fn home_override_wins() {
        assert_eq!(
            resolve_home(Some(Path::new("/srv/ledgerchat"))),
            Some(Path::new("/srv/ledgerchat").to_path_buf())
        );
    }

    #[test]
    fn table_source_describes_itself() {
        assert_eq!(TableSource::Builtin.describe(), "builtin");
        assert_eq!(
            TableSource::File(Path::new("/a/keywords.json").to_path_buf()).describe(),
            "/a/keywords.json"
        );
    }
}
