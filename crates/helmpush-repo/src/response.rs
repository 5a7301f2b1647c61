//! Upload response handling
//!
//! ChartMuseum answers a successful upload with `201 Created`. Failures carry
//! an optional JSON body `{"error": "<message>"}`.

use serde::Deserialize;

use crate::error::{RepoError, Result};

/// Status code of a successful upload
pub const UPLOAD_SUCCESS: u16 = 201;

/// Status and body of an upload response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: String,
}

impl UploadResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Capture a transport response. The body is only read when the upload
    /// was rejected.
    pub async fn read(response: reqwest::Response) -> Result<Self> {
        let status = response.status().as_u16();
        if status == UPLOAD_SUCCESS {
            return Ok(Self::new(status, Vec::new()));
        }

        let body = response.bytes().await.map_err(|e| RepoError::ResponseRead {
            message: e.to_string(),
        })?;
        Ok(Self::new(status, body.to_vec()))
    }

    /// Classify the response
    ///
    /// Anything but `201` is a `ServerError`. Its message is the `error`
    /// field of a JSON body, or the raw body text when that field is missing,
    /// empty or the body is not JSON.
    pub fn interpret(&self) -> Result<()> {
        if self.status == UPLOAD_SUCCESS {
            return Ok(());
        }

        let message = match serde_json::from_slice::<ErrorBody>(&self.body) {
            Ok(parsed) if !parsed.error.is_empty() => parsed.error,
            _ => String::from_utf8_lossy(&self.body).into_owned(),
        };

        Err(RepoError::ServerError {
            status: self.status,
            message,
        })
    }
}
