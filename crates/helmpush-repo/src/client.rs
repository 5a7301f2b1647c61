//! ChartMuseum HTTP client
//!
//! Uploads go to `<contextPath>/api<repoPath>/charts` as a multipart form,
//! downloads come from `<contextPath><repoPath>/<file>`.
//!
//! Security notes:
//! - Redirects are never followed automatically
//! - Credentials are NOT forwarded when a download redirects to another origin

use std::path::Path;
use url::Url;

use crate::error::{RepoError, Result};
use crate::response::UploadResponse;

const MAX_REDIRECTS: u32 = 10;

/// Everything needed to talk to one repository
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientOptions {
    /// Repository URL, `http://` or `https://`
    pub url: String,
    pub username: String,
    pub password: String,
    pub access_token: String,
    /// Path prefix the server is mounted under
    pub context_path: String,
}

/// Authentication sent with each request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Auth {
    None,
    Basic { username: String, password: String },
    Bearer { token: String },
}

impl Auth {
    /// A token takes precedence over a username/password pair
    pub fn from_options(options: &ClientOptions) -> Self {
        if !options.access_token.is_empty() {
            Auth::Bearer {
                token: options.access_token.clone(),
            }
        } else if !options.username.is_empty() {
            Auth::Basic {
                username: options.username.clone(),
                password: options.password.clone(),
            }
        } else {
            Auth::None
        }
    }

    /// Authorization header value
    pub fn header(&self) -> Option<String> {
        match self {
            Auth::None => None,
            Auth::Basic { username, password } => {
                let encoded = base64::Engine::encode(
                    &base64::engine::general_purpose::STANDARD,
                    format!("{}:{}", username, password),
                );
                Some(format!("Basic {}", encoded))
            }
            Auth::Bearer { token } => Some(format!("Bearer {}", token)),
        }
    }
}

/// Client for a single ChartMuseum repository
pub struct ChartMuseumClient {
    client: reqwest::Client,
    base: Url,
    auth: Auth,
    context_path: String,
}

impl ChartMuseumClient {
    pub fn new(options: ClientOptions) -> Result<Self> {
        let base = Url::parse(&options.url).map_err(|e| RepoError::InvalidRepositoryUrl {
            url: options.url.clone(),
            reason: e.to_string(),
        })?;
        if !matches!(base.scheme(), "http" | "https") {
            return Err(RepoError::InvalidRepositoryUrl {
                url: options.url.clone(),
                reason: "URL must start with http:// or https://".to_string(),
            });
        }

        let client = reqwest::Client::builder()
            // Redirects are handled by hand so credentials never leak
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .map_err(|e| RepoError::InvalidConfig {
                message: e.to_string(),
            })?;

        Ok(Self {
            client,
            auth: Auth::from_options(&options),
            context_path: options.context_path,
            base,
        })
    }

    /// Upload endpoint, e.g. `https://host/ctx/api/team/charts`
    pub fn upload_url(&self) -> Url {
        let mut url = self.base.clone();
        url.set_path(&join_path(&[
            self.context_path.as_str(),
            "api",
            self.base.path(),
            "charts",
        ]));
        url
    }

    /// URL of a file inside the repository
    pub fn file_url(&self, file_path: &str) -> Url {
        let mut url = self.base.clone();
        url.set_path(&join_path(&[self.context_path.as_str(), self.base.path(), file_path]));
        url
    }

    /// Upload a packaged chart
    ///
    /// Returns whatever the server answered; classifying it is left to
    /// [`UploadResponse::interpret`].
    pub async fn upload_chart_package(&self, package: &Path) -> Result<UploadResponse> {
        let data = std::fs::read(package)?;
        let file_name = package
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "chart.tgz".to_string());

        let form = reqwest::multipart::Form::new().part(
            "chart",
            reqwest::multipart::Part::bytes(data).file_name(file_name),
        );

        let url = self.upload_url();
        tracing::debug!(%url, "uploading chart package");

        let mut request = self.client.post(url).multipart(form);
        if let Some(auth) = self.auth.header() {
            request = request.header("Authorization", auth);
        }

        let response = request.send().await.map_err(RepoError::upload)?;
        UploadResponse::read(response).await
    }

    /// Download a file from the repository
    pub async fn download_file(&self, file_path: &str) -> Result<Vec<u8>> {
        let url = self.file_url(file_path);
        let response = self.get_with_redirects(url).await?;

        let bytes = response.bytes().await.map_err(RepoError::download)?;
        Ok(bytes.to_vec())
    }

    async fn get_with_redirects(&self, url: Url) -> Result<reqwest::Response> {
        let original = url.clone();
        let mut current = url;
        let mut redirects = 0;

        loop {
            tracing::debug!(url = %current, "downloading");
            let mut request = self.client.get(current.clone());

            // Add auth ONLY if same origin as the original URL
            if same_origin(&original, &current) {
                if let Some(auth) = self.auth.header() {
                    request = request.header("Authorization", auth);
                }
            } else if self.auth != Auth::None {
                tracing::warn!(
                    "Cross-origin redirect from {} to {} - credentials not forwarded",
                    original,
                    current
                );
            }

            let response = request.send().await.map_err(RepoError::download)?;
            let status = response.status();

            if status.is_redirection() {
                redirects += 1;
                if redirects > MAX_REDIRECTS {
                    return Err(RepoError::download(format!(
                        "Too many redirects (max {})",
                        MAX_REDIRECTS
                    )));
                }

                let location = response
                    .headers()
                    .get("Location")
                    .and_then(|v| v.to_str().ok())
                    .ok_or_else(|| RepoError::download("Redirect without Location header"))?;

                current = current.join(location).map_err(RepoError::download)?;
                continue;
            }

            if !status.is_success() {
                return Err(RepoError::download(format!("{} from {}", status, current)));
            }

            return Ok(response);
        }
    }
}

/// Check if two URLs are same-origin (for redirect safety)
pub fn same_origin(a: &Url, b: &Url) -> bool {
    a.scheme() == b.scheme()
        && a.host() == b.host()
        && a.port_or_known_default() == b.port_or_known_default()
}

/// Join URL path fragments, dropping empty and `.` segments
///
/// The result always starts with `/`.
pub fn join_path(parts: &[&str]) -> String {
    let mut segments: Vec<&str> = Vec::new();
    for part in parts {
        for segment in part.split('/') {
            match segment {
                "" | "." => {}
                ".." => {
                    segments.pop();
                }
                s => segments.push(s),
            }
        }
    }
    format!("/{}", segments.join("/"))
}
