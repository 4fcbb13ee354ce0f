use thiserror::Error;

/// Error type that captures ledger, storage and configuration failures.
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("Storage error: {0}")]
    Storage(String),
    #[error("Storage quota exceeded: {needed} bytes requested, {quota} bytes allowed")]
    QuotaExceeded { needed: usize, quota: usize },
    #[error("Unsupported document version {found} (newest supported is {supported})")]
    UnsupportedVersion { found: u32, supported: u32 },
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Configuration error: {0}")]
    Config(String),
}

impl LedgerError {
    /// Returns `true` for failures raised by the key-value backend or document codec.
    pub fn is_persistence(&self) -> bool {
        matches!(
            self,
            LedgerError::Io(_)
                | LedgerError::Serde(_)
                | LedgerError::Storage(_)
                | LedgerError::QuotaExceeded { .. }
                | LedgerError::UnsupportedVersion { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, LedgerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quota_error_mentions_both_sizes() {
        let err = LedgerError::QuotaExceeded {
            needed: 2048,
            quota: 1024,
        };
        let message = err.to_string();
        assert!(message.contains("2048"));
        assert!(message.contains("1024"));
        assert!(err.is_persistence());
    }

    #[test]
    fn invalid_input_is_not_a_persistence_failure() {
        assert!(!LedgerError::InvalidInput("empty name".into()).is_persistence());
    }
}
