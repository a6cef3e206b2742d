use serde::Serialize;

use crate::error::GatewayError;

use super::EditOutcome;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EditVerdict {
    pub success: bool,
    pub total_updated: usize,
    pub results: Vec<EditOutcome>,
}

impl EditVerdict {
    pub fn failure(&self) -> Option<GatewayError> {
        if self.success {
            return None;
        }
        if self.results.is_empty() {
            return Some(GatewayError::EditFailed(
                "the service returned no edit results".to_string(),
            ));
        }
        let failed = self.results.iter().filter(|outcome| !outcome.success).count();
        Some(GatewayError::PartialEditFailure {
            failed,
            total: self.results.len(),
        })
    }
}

/// Reduce per-feature outcomes to a single verdict.
///
/// The batch succeeds only when there is at least one outcome and every outcome
/// succeeded. All outcomes are kept in submission order either way.
pub fn interpret_outcomes(outcomes: Vec<EditOutcome>) -> EditVerdict {
    let has_results = !outcomes.is_empty();
    let all_succeeded = outcomes.iter().all(|outcome| outcome.success);
    EditVerdict {
        success: has_results && all_succeeded,
        total_updated: outcomes.len(),
        results: outcomes,
    }
}
