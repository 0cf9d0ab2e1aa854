//! Per-row failure taxonomy
//!
//! Every way a single reference row can fail, from bad input to a provider
//! error. A row failure never aborts its siblings.

use thiserror::Error;

/// Failure of one reference row within a submission.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RowError {
    /// Verse spec did not match the grammar. Detected before dispatch.
    #[error("malformed reference syntax: {reason}")]
    Parse { reason: String },

    /// Missing required field or unrecognized provider label. Detected
    /// before dispatch.
    #[error("invalid reference: {detail}")]
    Validation { detail: String },

    /// Network failure or undecodable response body.
    #[error("transport failure: {detail}")]
    Transport { detail: String },

    /// Provider responded with a non-success status; its error body is
    /// carried verbatim in `detail`.
    #[error("provider error: {detail}")]
    Remote { detail: String },
}

impl RowError {
    pub fn parse(reason: impl Into<String>) -> Self {
        RowError::Parse {
            reason: reason.into(),
        }
    }

    pub fn missing_fields(fields: &[&str]) -> Self {
        RowError::Validation {
            detail: format!("missing required field(s): {}", fields.join(", ")),
        }
    }

    /// Stable machine-readable kind for reports.
    pub fn kind(&self) -> &'static str {
        match self {
            RowError::Parse { .. } => "parse",
            RowError::Validation { .. } => "validation",
            RowError::Transport { .. } => "transport",
            RowError::Remote { .. } => "remote",
        }
    }
}
