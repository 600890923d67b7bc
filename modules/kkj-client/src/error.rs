use thiserror::Error;

pub type Result<T> = std::result::Result<T, KkjError>;

#[derive(Debug, Error)]
pub enum KkjError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("XML parse error: {0}")]
    Parse(String),
}

impl From<reqwest::Error> for KkjError {
    fn from(err: reqwest::Error) -> Self {
        KkjError::Network(err.to_string())
    }
}

impl From<roxmltree::Error> for KkjError {
    fn from(err: roxmltree::Error) -> Self {
        KkjError::Parse(err.to_string())
    }
}
