use thiserror::Error;

/// Ways a lookup can fail. Both variants are handled identically by the
/// cascade controller; the split only matters for logging.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    /// Network failure, unexpected status, or a payload that could not be read.
    #[error("lookup failed: {0}")]
    Failed(String),
    /// The server answered with an explicit error indicator.
    #[error("lookup rejected: {0}")]
    Rejected(String),
}

impl LookupError {
    pub fn failed(reason: impl Into<String>) -> Self {
        Self::Failed(reason.into())
    }

    pub fn rejected(message: impl Into<String>) -> Self {
        Self::Rejected(message.into())
    }

    pub fn is_rejected(&self) -> bool {
        matches!(self, Self::Rejected(_))
    }
}
