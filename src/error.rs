use thiserror::Error;

pub type GatewayResult<T> = Result<T, GatewayError>;

/// Everything that can go wrong inside one tool invocation.
///
/// None of these escape the tool boundary: dispatch renders each of them into a
/// `success: false` response body.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GatewayError {
    #[error("API key is required for executing this tool")]
    MissingCredential,

    #[error("Invalid argument '{field}': {reason}")]
    InvalidArgument { field: String, reason: String },

    #[error("'{field}' needs at least {required} coordinates, got {actual}")]
    InsufficientVertices {
        field: &'static str,
        required: usize,
        actual: usize,
    },

    #[error("Feature layer unavailable: {0}")]
    LayerUnavailable(String),

    #[error("Edit failed: {0}")]
    EditFailed(String),

    #[error("{failed} of {total} submitted edits failed")]
    PartialEditFailure { failed: usize, total: usize },

    #[error("Unknown tool: {0}")]
    UnknownTool(String),
}

impl GatewayError {
    pub fn invalid_argument(field: impl Into<String>, reason: impl Into<String>) -> Self {
        GatewayError::InvalidArgument {
            field: field.into(),
            reason: reason.into(),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            GatewayError::MissingCredential => "MissingCredential",
            GatewayError::InvalidArgument { .. } => "InvalidArgument",
            GatewayError::InsufficientVertices { .. } => "InsufficientVertices",
            GatewayError::LayerUnavailable(_) => "LayerUnavailable",
            GatewayError::EditFailed(_) => "EditFailed",
            GatewayError::PartialEditFailure { .. } => "PartialEditFailure",
            GatewayError::UnknownTool(_) => "UnknownTool",
        }
    }
}
