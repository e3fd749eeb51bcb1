use std::fmt;

use bytes::Bytes;

pub type JobId = u64;

/// The opaque blob returned by the compression service for one job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompressedImage {
    pub bytes: Bytes,
    pub content_type: String,
}

/// A settled compression failure as seen by the workflow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompressionFailure {
    pub kind: FailureKind,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// The request never reached the service.
    Network,
    /// The service responded with a non-success status.
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
