use std::fmt;

use pagewatch_core::{ArtifactCandidate, SearchRequest};

/// Everything a watcher needs to know about the search it is waiting on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchTarget {
    pub request: SearchRequest,
    pub candidate: ArtifactCandidate,
}

impl WatchTarget {
    pub fn new(request: SearchRequest, candidate: ArtifactCandidate) -> Self {
        Self { request, candidate }
    }
}

/// Response of the generic fetch primitive. Non-success statuses are not errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub final_url: String,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Body decoded to UTF-8 using the response charset or detection.
    pub fn text(&self) -> String {
        crate::decode::decode_body(&self.body, self.content_type.as_deref()).text
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct FetchError {
    pub kind: FailureKind,
    pub message: String,
}

impl FetchError {
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    Timeout,
    RedirectLimitExceeded,
    TooLarge { max_bytes: u64, actual: Option<u64> },
    Network,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::RedirectLimitExceeded => write!(f, "redirect limit exceeded"),
            FailureKind::TooLarge { max_bytes, actual } => {
                write!(f, "response too large (max {max_bytes}, actual {actual:?})")
            }
            FailureKind::Network => write!(f, "network error"),
        }
    }
}
