use thiserror::Error;

#[derive(Error, Debug)]
pub enum LeadError {
    #[error("Failed to fetch lead data: {0}")]
    Fetch(String),

    #[error("CSV error: {0}")]
    Csv(String),

    #[error("Snapshot error: {0}")]
    Snapshot(String),

    #[error("Invalid config: {0}")]
    Config(String),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Failures reported by a [`crate::store::KeyValueStore`]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StorageError {
    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    #[error("Storage read failed: {0}")]
    Read(String),

    #[error("Storage write failed: {0}")]
    Write(String),
}

impl From<csv::Error> for LeadError {
    fn from(err: csv::Error) -> Self {
        LeadError::Csv(err.to_string())
    }
}

impl From<serde_json::Error> for LeadError {
    fn from(err: serde_json::Error) -> Self {
        LeadError::Snapshot(err.to_string())
    }
}
