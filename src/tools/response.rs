use serde::Serialize;

use crate::{
    edits::{EditOutcome, EditVerdict},
    error::GatewayError,
    feature::{FeatureRecord, QueryResult},
};

/// JSON body returned by every tool. `success` is always present; the other fields
/// depend on the operation.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_features: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub features: Option<Vec<FeatureRecord>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_updated: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub results: Option<Vec<EditOutcome>>,
}

impl ToolResponse {
    pub fn from_error(error: &GatewayError) -> Self {
        Self {
            success: false,
            error: Some(error.kind().to_string()),
            details: Some(error.to_string()),
            ..Default::default()
        }
    }

    pub fn to_text(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|err| {
            format!(
                "{{\n  \"success\": false,\n  \"error\": \"Internal\",\n  \"details\": \"{}\"\n}}",
                err.to_string().replace('"', "'")
            )
        })
    }
}

impl From<QueryResult> for ToolResponse {
    fn from(result: QueryResult) -> Self {
        Self {
            success: true,
            total_features: Some(result.total_features),
            features: Some(result.features),
            ..Default::default()
        }
    }
}

impl From<EditVerdict> for ToolResponse {
    fn from(verdict: EditVerdict) -> Self {
        let failure = verdict.failure();
        Self {
            success: verdict.success,
            error: failure.as_ref().map(|error| error.kind().to_string()),
            details: failure.as_ref().map(|error| error.to_string()),
            total_updated: Some(verdict.total_updated),
            results: Some(verdict.results),
            ..Default::default()
        }
    }
}
