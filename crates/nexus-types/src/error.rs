use thiserror::Error;

/// Failures surfaced by the message log and conversation aggregator.
#[derive(Debug, Error)]
pub enum LogError {
    /// Caller input was missing or malformed. Nothing was written.
    #[error("validation error: {0}")]
    Validation(String),

    /// The store could not complete the read or write.
    #[error("storage error: {0}")]
    Storage(String),
}

impl LogError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation",
            Self::Storage(_) => "storage",
        }
    }
}
