use thiserror::Error;

pub type Result<T> = std::result::Result<T, CseError>;

#[derive(Debug, Error)]
pub enum CseError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Parse error: {0}")]
    Parse(String),
}

impl From<reqwest::Error> for CseError {
    fn from(err: reqwest::Error) -> Self {
        CseError::Network(err.to_string())
    }
}

impl From<serde_json::Error> for CseError {
    fn from(err: serde_json::Error) -> Self {
        CseError::Parse(err.to_string())
    }
}
