use std::fmt;

use crate::backend::{
    ChatResponse, ClientError, DeleteResponse, DocumentListResponse, HealthResponse,
    IngestResponse,
};
use crate::decode::DecodeError;

/// Progress of the in-flight capture pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureStage {
    Fetching,
    Extracting,
    Ingesting,
}

/// Everything the engine reports back to the driving surface.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    CaptureProgress {
        stage: CaptureStage,
    },
    CaptureCompleted {
        result: Result<IngestResponse, CaptureFailure>,
    },
    ChatCompleted {
        result: Result<ChatResponse, ClientError>,
    },
    DocumentsListed {
        result: Result<DocumentListResponse, ClientError>,
    },
    DocumentDeleted {
        id: String,
        result: Result<DeleteResponse, ClientError>,
    },
    HealthChecked {
        result: Result<HealthResponse, ClientError>,
    },
}

/// Why a capture attempt died. Local page acquisition failures are kept
/// apart from backend failures so the surface can word them differently.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CaptureFailure {
    #[error("page fetch failed: {0}")]
    Fetch(#[from] FetchError),
    #[error("page decode failed: {0}")]
    Decode(#[from] DecodeError),
    #[error(transparent)]
    Backend(#[from] ClientError),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct FetchError {
    pub kind: FetchFailureKind,
    pub message: String,
}

impl FetchError {
    pub(crate) fn new(kind: FetchFailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchFailureKind {
    InvalidUrl,
    HttpStatus(u16),
    Timeout,
    RedirectLimitExceeded,
    TooLarge { max_bytes: u64, actual: Option<u64> },
    UnsupportedContentType { content_type: String },
    Network,
}

impl fmt::Display for FetchFailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchFailureKind::InvalidUrl => write!(f, "invalid url"),
            FetchFailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FetchFailureKind::Timeout => write!(f, "timeout"),
            FetchFailureKind::RedirectLimitExceeded => write!(f, "redirect limit exceeded"),
            FetchFailureKind::TooLarge { max_bytes, actual } => {
                write!(f, "response too large (max {max_bytes}, actual {actual:?})")
            }
            FetchFailureKind::UnsupportedContentType { content_type } => {
                write!(f, "unsupported content type {content_type}")
            }
            FetchFailureKind::Network => write!(f, "network error"),
        }
    }
}

/// A fetched page: raw bytes plus what the transport knew about them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchOutput {
    pub bytes: Vec<u8>,
    pub metadata: FetchMetadata,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchMetadata {
    pub original_url: String,
    pub final_url: String,
    pub content_type: Option<String>,
    pub byte_len: u64,
}
