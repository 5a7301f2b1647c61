//! Error types for repository operations

use thiserror::Error;

/// Repository operation errors
#[derive(Debug, Error)]
pub enum RepoError {
    // ============ Configuration Errors ============
    #[error("no repo named \"{name}\" found")]
    RepositoryNotFound { name: String },

    #[error("Invalid repository configuration: {message}")]
    InvalidConfig { message: String },

    #[error("Invalid repository URL: {url} - {reason}")]
    InvalidRepositoryUrl { url: String, reason: String },

    #[error("invalid file url: {uri} - {reason}")]
    InvalidUri { uri: String, reason: String },

    // ============ Network Errors ============
    #[error("Upload failed: {message}")]
    UploadTransport { message: String },

    #[error("Download failed: {message}")]
    DownloadTransport { message: String },

    #[error("Failed to read server response: {message}")]
    ResponseRead { message: String },

    /// The server answered but rejected the upload
    #[error("{status}: {message}")]
    ServerError { status: u16, message: String },

    // ============ IO Errors ============
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for repository operations
pub type Result<T> = std::result::Result<T, RepoError>;

impl RepoError {
    pub(crate) fn upload(e: impl std::fmt::Display) -> Self {
        RepoError::UploadTransport {
            message: e.to_string(),
        }
    }

    pub(crate) fn download(e: impl std::fmt::Display) -> Self {
        RepoError::DownloadTransport {
            message: e.to_string(),
        }
    }

    pub(crate) fn invalid_uri(uri: &str, reason: impl Into<String>) -> Self {
        RepoError::InvalidUri {
            uri: uri.to_string(),
            reason: reason.into(),
        }
    }
}
