//! Error handling

use thiserror::Error;

pub type EngineResult<T> = Result<T, EngineError>;

#[derive(Debug, Error)]
pub enum EngineError {
    // Boundary errors
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Unknown location: {0}")]
    UnknownLocation(String),

    // Data errors
    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    // Sink errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl EngineError {
    /// Boundary-level rejection (caller mistake, not an engine fault)
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            EngineError::InvalidInput(_) | EngineError::UnknownLocation(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_error_classification() {
        assert!(EngineError::InvalidInput("x".into()).is_client_error());
        assert!(EngineError::UnknownLocation("raj_999".into()).is_client_error());
        assert!(!EngineError::InsufficientData("empty".into()).is_client_error());
    }

    #[test]
    fn test_io_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: EngineError = io.into();
        assert!(err.to_string().contains("gone"));
    }
}
