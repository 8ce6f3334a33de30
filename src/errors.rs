use thiserror::Error;

/// Failures outside of field validation. Invalid user input is reported
/// through [`crate::wizard::ErrorMap`], never through this type.
#[derive(Debug, Error)]
pub enum WizardError {
    #[error("Unknown field: `{0}`")]
    UnknownField(String),
    #[error("Step must be between 1 and 3, got {0}")]
    InvalidStep(u8),
    #[error("Submission consumer failed: {0}")]
    Consumer(String),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, WizardError>;
