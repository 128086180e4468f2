use thiserror::Error;

/// Errors surfaced by the knowledge-graph backend client.
///
/// `Status` carries the backend's own structured error body verbatim
/// (§7: "any other backend error -> the backend's own error body, verbatim").
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("backend request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("backend returned {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: serde_json::Value,
    },

    #[error("invalid backend base URL: {0}")]
    InvalidBaseUrl(#[from] url::ParseError),

    #[error("failed to decode backend response: {0}")]
    Decode(#[from] serde_json::Error),
}

impl BackendError {
    /// True when the backend rejected the request as unauthenticated/expired.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, BackendError::Status { status, .. } if *status == reqwest::StatusCode::UNAUTHORIZED)
    }

    /// True when the backend reported a 404 for the given kind of lookup.
    pub fn is_not_found(&self) -> bool {
        matches!(self, BackendError::Status { status, .. } if *status == reqwest::StatusCode::NOT_FOUND)
    }

    /// The backend's raw error body, if this is a status error.
    pub fn body(&self) -> Option<&serde_json::Value> {
        match self {
            BackendError::Status { body, .. } => Some(body),
            _ => None,
        }
    }
}

pub type BackendResult<T> = Result<T, BackendError>;
