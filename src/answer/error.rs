//! Error types for the answer module

use crate::error::Error as CrateError;
use thiserror::Error;

/// Why a single question could not be answered.
///
/// The variant says what kind of failure happened; [`AnswerError::placeholder`]
/// gives the fixed text written into the table in place of an answer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnswerError {
    /// The backend withheld its output for a content-policy reason
    #[error("response blocked by the model: {reason}")]
    Blocked {
        /// Block or finish reason reported by the backend
        reason: String,
    },

    /// The backend returned no candidate answers
    #[error("model returned no candidates")]
    NoCandidates,

    /// The backend returned an answer without any text
    #[error("model returned an empty response")]
    EmptyResponse,

    /// The request failed on the way to or from the backend
    #[error("transport error: {0}")]
    Transport(String),

    /// Anything else
    #[error("unexpected error: {0}")]
    Unknown(String),
}

impl AnswerError {
    /// Text recorded in the answer table for this failure
    pub fn placeholder(&self) -> String {
        match self {
            AnswerError::Blocked { .. } => "Response blocked due to copyrighted content.".to_string(),
            AnswerError::NoCandidates => "Response blocked or no valid output.".to_string(),
            AnswerError::EmptyResponse => "No valid response.".to_string(),
            AnswerError::Transport(message) => format!("Error: {}", message),
            AnswerError::Unknown(message) => format!("Unexpected error: {}", message),
        }
    }
}

impl From<CrateError> for AnswerError {
    fn from(err: CrateError) -> Self {
        match err {
            CrateError::Http(_) | CrateError::Api { .. } | CrateError::Auth(_) => {
                AnswerError::Transport(err.to_string())
            }
            _ => AnswerError::Unknown(err.to_string()),
        }
    }
}
