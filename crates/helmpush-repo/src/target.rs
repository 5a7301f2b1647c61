//! `cm://` download targets
//!
//! Helm hands the downloader a URI such as
//! `cm://charts.example.com/team/charts/mychart-0.1.0.tgz`. The last segment
//! is the file to fetch. When the segment before it is exactly `charts`, the
//! file lives under the repository's `charts/` path and both segments are
//! removed from the base URL; otherwise only the file name is.

use url::Url;

use crate::error::{RepoError, Result};

/// URI scheme handled by the downloader
pub const SCHEME: &str = "cm";

const CHARTS_SEGMENT: &str = "charts";

/// A parsed download request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadTarget {
    /// Host with optional `:port`
    pub host: String,
    /// Repository path without the segments consumed by `file_path`;
    /// empty or starting with `/`
    pub base_path: String,
    /// Path of the file relative to the repository
    pub file_path: String,
}

impl DownloadTarget {
    /// Whether `uri` is addressed to this downloader
    pub fn handles(uri: &str) -> bool {
        uri.strip_prefix(SCHEME)
            .is_some_and(|rest| rest.starts_with("://"))
    }

    /// Parse a `cm://` URI
    pub fn parse(uri: &str) -> Result<Self> {
        let parsed = Url::parse(uri).map_err(|e| RepoError::invalid_uri(uri, e.to_string()))?;

        let host = match parsed.host_str() {
            Some(host) if !host.is_empty() => host,
            _ => return Err(RepoError::invalid_uri(uri, "missing host")),
        };
        let host = match parsed.port() {
            Some(port) => format!("{}:{}", host, port),
            None => host.to_string(),
        };

        let path = parsed.path();
        let segments: Vec<&str> = path.strip_prefix('/').unwrap_or(path).split('/').collect();
        let count = segments.len();
        if count < 2 {
            return Err(RepoError::invalid_uri(uri, "no file name in path"));
        }

        let file_name = segments[count - 1];
        if file_name.is_empty() {
            return Err(RepoError::invalid_uri(uri, "no file name in path"));
        }

        let (file_path, consumed) = if segments[count - 2] == CHARTS_SEGMENT {
            (format!("{}/{}", CHARTS_SEGMENT, file_name), 2)
        } else {
            (file_name.to_string(), 1)
        };

        let remaining = &segments[..count - consumed];
        let base_path = if remaining.is_empty() {
            String::new()
        } else {
            format!("/{}", remaining.join("/"))
        };

        Ok(Self {
            host,
            base_path,
            file_path,
        })
    }

    /// Scheme used on the wire; the scheme of the input URI is never reused
    pub fn scheme(use_http: bool) -> &'static str {
        if use_http { "http" } else { "https" }
    }

    /// Base URL of the repository serving this file
    pub fn base_url(&self, use_http: bool) -> String {
        format!("{}://{}{}", Self::scheme(use_http), self.host, self.base_path)
    }
}
