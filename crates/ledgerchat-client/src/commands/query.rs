use crate::ClientResult;
use crate::commands::common::{
    InterpretOptions, build_interpreter, query_data, require_text, resolve_today,
};
use crate::contracts::envelope::{SuccessEnvelope, success};

pub fn run(text: &str, today: Option<&str>) -> ClientResult<SuccessEnvelope> {
    run_with_options(
        text,
        InterpretOptions {
            today,
            ..InterpretOptions::default()
        },
    )
}

#[doc(hidden)]
pub fn run_with_options(
    text: &str,
    options: InterpretOptions<'_>,
) -> ClientResult<SuccessEnvelope> {
    let text = require_text(text, "query")?;
    let today = resolve_today(options.today, "query")?;
    let (interpreter, _source) = build_interpreter(&options)?;
    let query = interpreter.parse_query(text, today);
    success("query", query_data(text, &query, today))
}
