use thiserror::Error;

/// Errors raised while validating input to the index builders.
///
/// Every variant is a precondition violation detected before any construction
/// work starts. Broken internal invariants are assertion failures instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IndexError {
    #[error("invalid input: {reason}")]
    InvalidInput { reason: String },
}

impl IndexError {
    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        IndexError::InvalidInput {
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, IndexError>;
