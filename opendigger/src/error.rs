use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },
    #[error("request to {url} timed out")]
    Timeout { url: String },
    #[error("network error requesting {url}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("unexpected payload from {url}: {reason}")]
    Decode { url: String, reason: String },
    #[error("every metric request for {project} failed")]
    AllFailed { project: String },
    #[error("invalid project {0:?}, expected org/repo")]
    InvalidProject(String),
    #[error("failed to build HTTP client")]
    Client(#[source] reqwest::Error),
}

impl FetchError {
    pub(crate) fn from_reqwest(url: &str, error: reqwest::Error) -> Self {
        let url = url.to_owned();
        if error.is_timeout() {
            FetchError::Timeout { url }
        } else if let Some(status) = error.status() {
            FetchError::Status {
                url,
                status: status.as_u16(),
            }
        } else if error.is_decode() {
            FetchError::Decode {
                url,
                reason: error.to_string(),
            }
        } else {
            FetchError::Network { url, source: error }
        }
    }

    /// Only network-level failures are worth retrying; HTTP error statuses
    /// and bad payloads are not.
    pub fn is_transient(&self) -> bool {
        matches!(self, FetchError::Timeout { .. } | FetchError::Network { .. })
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            FetchError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            FetchError::Status { .. } => "HTTP_ERROR",
            FetchError::Timeout { .. } => "TIMEOUT",
            FetchError::Network { .. } => "NETWORK_ERROR",
            FetchError::Decode { .. } => "DECODE_ERROR",
            FetchError::AllFailed { .. } => "ALL_FAILED",
            FetchError::InvalidProject(_) => "INVALID_PROJECT",
            FetchError::Client(_) => "CLIENT_ERROR",
        }
    }

    /// Message suitable for showing next to a retry button.
    pub fn user_message(&self) -> String {
        match self {
            FetchError::Timeout { .. } => {
                "The request was interrupted or timed out, please try again later".to_owned()
            }
            FetchError::Network { .. } => {
                "Network connection failed, please check your connection".to_owned()
            }
            FetchError::Status { status: 404, .. } => {
                "The project does not exist or is not accessible".to_owned()
            }
            FetchError::Status { status: 403, .. } => {
                "Access denied, this may be a permissions problem".to_owned()
            }
            FetchError::Status {
                status: 500..=599, ..
            } => "The server ran into an error, please try again later".to_owned(),
            other => other.to_string(),
        }
    }
}
