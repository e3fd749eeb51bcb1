use std::fmt;

use bytes::Bytes;

pub type JobId = u64;

/// The binary payload returned by the service for one compression job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompressedImage {
    pub bytes: Bytes,
    pub content_type: String,
}

/// Failure of a single compression request.
///
/// `message` is what the operator sees; for server failures it carries the
/// service-provided error text when one was parseable.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct CompressError {
    pub kind: FailureKind,
    pub message: String,
}

impl CompressError {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// The request could not reach the service.
    Network,
    /// The service answered with a non-success status.
    Server { status: u16 },
    /// Success status, but the body was not interpretable as image bytes.
    MalformedResponse,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::Network => write!(f, "network error"),
            FailureKind::Server { status } => write!(f, "server status {status}"),
            FailureKind::MalformedResponse => write!(f, "malformed response"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    JobSettled {
        job_id: JobId,
        result: Result<CompressedImage, CompressError>,
    },
}
