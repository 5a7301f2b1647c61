//! Core error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Chart not found: {path}")]
    ChartNotFound { path: String },

    #[error("Failed to load chart from {path}: {message}")]
    ChartLoad { path: String, message: String },

    #[error("Failed to parse Chart.yaml: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("Invalid .helmignore pattern '{pattern}': {message}")]
    IgnorePattern { pattern: String, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to walk chart directory: {0}")]
    Walk(#[from] walkdir::Error),
}

impl CoreError {
    pub(crate) fn load(path: &std::path::Path, message: impl Into<String>) -> Self {
        Self::ChartLoad {
            path: path.display().to_string(),
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, CoreError>;
