//! helmpush repository access
//!
//! This crate covers everything between a parsed command line and the wire:
//!
//! - **Registry lookup**: repositories registered with `helm repo add`
//! - **Connection resolution**: flags merged with `HELM_REPO_*` variables
//! - **ChartMuseum client**: chart upload and file download
//! - **`cm://` targets**: turning a downloader URI into a repository request
//! - **Response handling**: classifying upload responses
//!
//! ## Example
//!
//! ```rust,no_run
//! use helmpush_repo::{ChartMuseumClient, ClientOptions};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = ChartMuseumClient::new(ClientOptions {
//!     url: "https://charts.example.com".to_string(),
//!     ..Default::default()
//! })?;
//!
//! let response = client
//!     .upload_chart_package(std::path::Path::new("mychart-0.1.0.tgz"))
//!     .await?;
//! response.interpret()?;
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod env;
pub mod error;
pub mod response;
pub mod target;

// Re-exports for convenience
pub use client::{Auth, ChartMuseumClient, ClientOptions};
pub use config::{Repository, RepositoryConfig};
pub use env::{EnvSource, InvocationParameters, ProcessEnv, ResolvedConnection};
pub use error::{RepoError, Result};
pub use response::UploadResponse;
pub use target::DownloadTarget;
