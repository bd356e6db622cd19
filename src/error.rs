use thiserror::Error;

#[derive(Error, Debug)]
pub enum SigcomboError {
    #[error("Length mismatch for '{name}': expected {expected}, got {actual}")]
    LengthMismatch {
        name: String,
        expected: usize,
        actual: usize,
    },

    #[error("Non-binary value {value} in '{name}' at index {index}")]
    NonBinaryValue { name: String, index: usize, value: u8 },

    #[error("Unknown signal: {0}")]
    UnknownSignal(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serde error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("Config source error: {0}")]
    ConfigSource(#[from] ::config::ConfigError),
}

pub type Result<T> = std::result::Result<T, SigcomboError>;
