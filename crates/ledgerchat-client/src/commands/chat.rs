use tracing::debug;

use crate::commands::common::{
    InterpretOptions, build_interpreter, query_data, record_data, require_text, resolve_today,
};
use crate::contracts::envelope::{SuccessEnvelope, success};
use crate::contracts::types::{AnalysisData, ChatData};
use crate::interpret::IntentKind;
use crate::{ClientError, ClientResult};

pub const ANALYSIS_HANDOFF: &str = "external_summarizer";

/// Routes one free-form message through intent detection and then the
/// matching parser.
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
    let text = require_text(text, "chat")?;
    let today = resolve_today(options.today, "chat")?;
    let (interpreter, _source) = build_interpreter(&options)?;
    let intent = interpreter.classify_intent(text);
    debug!(intent = intent.as_str(), "routing chat message");

    let data = match intent {
        IntentKind::Record => {
            let record = interpreter.parse_record(text, today);
            if record.amount.is_none() {
                return Err(ClientError::amount_not_found(text));
            }
            ChatData {
                intent: intent.as_str().to_string(),
                response_type: "confirmation".to_string(),
                record: Some(record_data(&record, today)),
                query: None,
                analysis: None,
            }
        }
        IntentKind::Query => {
            let query = interpreter.parse_query(text, today);
            ChatData {
                intent: intent.as_str().to_string(),
                response_type: "query_result".to_string(),
                record: None,
                query: Some(query_data(text, &query, today)),
                analysis: None,
            }
        }
        IntentKind::Analysis => ChatData {
            intent: intent.as_str().to_string(),
            response_type: "analysis".to_string(),
            record: None,
            query: None,
            analysis: Some(AnalysisData {
                text: text.to_string(),
                handoff: ANALYSIS_HANDOFF.to_string(),
            }),
        },
    };
    success("chat", data)
}
