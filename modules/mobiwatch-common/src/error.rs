use thiserror::Error;

#[derive(Error, Debug)]
pub enum MobiwatchError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Budget error: {0}")]
    Budget(String),

    /// A state file exists but cannot be parsed. Never silently reset:
    /// a reset would mark every query unrun and blow the daily quota.
    #[error("Corrupt state file {path}: {reason}")]
    CorruptState { path: String, reason: String },

    #[error("Persistence error: {0}")]
    Persistence(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}
