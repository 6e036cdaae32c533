use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TubeError {
    // Precondition errors
    #[error("Configuration missing or unusable at {path}: {reason}")]
    MissingConfiguration { path: PathBuf, reason: String },

    #[error("Downloader is not available: {0}")]
    DownloaderUnavailable(String),

    #[error("Transfer tool is not available: {0}")]
    TransferToolUnavailable(String),

    // Channel errors
    #[error("Invalid channel source: {0}")]
    InvalidSource(String),

    #[error("Feed unreachable: {0}")]
    FeedUnreachable(String),

    #[error("Feed malformed: {0}")]
    FeedMalformed(String),

    // Entry errors
    #[error("Download failed: {0}")]
    DownloadFailed(String),

    #[error("Transfer failed: {0}")]
    TransferFailed(String),

    // Storage errors
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl TubeError {
    /// Errors that stop a run before any channel is touched
    pub fn is_precondition(&self) -> bool {
        matches!(
            self,
            TubeError::MissingConfiguration { .. }
                | TubeError::DownloaderUnavailable(_)
                | TubeError::TransferToolUnavailable(_)
        )
    }
}

pub type TubeResult<T> = Result<T, TubeError>;
