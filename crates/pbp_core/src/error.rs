use thiserror::Error;

/// Errors raised around the engine: feed parsing, configuration and response
/// encoding. Applying an event never fails.
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Feed error: {0}")]
    Feed(#[source] serde_json::Error),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(#[source] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl CoreError {
    /// Whether the caller can retry with corrected input rather than give up.
    pub fn is_input_error(&self) -> bool {
        match self {
            CoreError::Feed(_) => true,
            CoreError::Config(_) => true,
            CoreError::Serialization(_) => false,
            CoreError::Io(_) => false,
        }
    }
}

impl From<serde_yaml::Error> for CoreError {
    fn from(err: serde_yaml::Error) -> Self {
        CoreError::Config(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, CoreError>;
