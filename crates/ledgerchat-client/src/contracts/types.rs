use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct RecordData {
    pub text: String,
    pub amount: Option<f64>,
    pub kind: String,
    pub category: String,
    pub category_matched: bool,
    pub date: String,
    pub date_source: String,
    pub reference_date: String,
    pub description: String,
    pub confidence: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct QueryData {
    pub text: String,
    pub query_kind: String,
    pub category: Option<String>,
    pub period: String,
    pub start_date: String,
    pub end_date: String,
    pub chart_hint: Option<String>,
    pub reference_date: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct IntentData {
    pub text: String,
    pub intent: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct AnalysisData {
    pub text: String,
    pub handoff: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChatData {
    pub intent: String,
    pub response_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub record: Option<RecordData>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query: Option<QueryData>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub analysis: Option<AnalysisData>,
}

#[derive(Debug, Clone, Serialize)]
pub struct KeywordCategoryData {
    pub name: String,
    pub kind: String,
    pub keywords: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct KeywordTableData {
    pub source: String,
    pub fallback_expense: String,
    pub fallback_income: String,
    pub income_markers: Vec<String>,
    pub categories: Vec<KeywordCategoryData>,
}
