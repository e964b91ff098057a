use crate::ClientResult;
use crate::commands::common::{InterpretOptions, build_interpreter};
use crate::contracts::envelope::{SuccessEnvelope, success};
use crate::contracts::types::{KeywordCategoryData, KeywordTableData};

pub fn run() -> ClientResult<SuccessEnvelope> {
    run_with_options(InterpretOptions::default())
}

#[doc(hidden)]
pub fn run_with_options(options: InterpretOptions<'_>) -> ClientResult<SuccessEnvelope> {
    let (interpreter, source) = build_interpreter(&options)?;
    let table = interpreter.table();
    let data = KeywordTableData {
        source: source.describe(),
        fallback_expense: table.fallback_expense().to_string(),
        fallback_income: table.fallback_income().to_string(),
        income_markers: table.income_markers().to_vec(),
        categories: table
            .categories()
            .iter()
            .map(|category| KeywordCategoryData {
                name: category.name.clone(),
                kind: category.kind.as_str().to_string(),
                keywords: category.keywords.clone(),
            })
            .collect(),
    };
    success("keywords", data)
}
