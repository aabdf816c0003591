//! PKS engine: content extraction, backend client and effect execution.
mod backend;
mod decode;
mod engine;
mod extract;
mod fetch;
mod message;
mod types;

pub use backend::{
    BackendSettings, ChatMessage, ChatRequest, ChatResponse, ClientError, DeleteResponse,
    DocumentInfo, DocumentListResponse, HealthResponse, IngestMetadata, IngestRequest,
    IngestResponse, KnowledgeBackend, RestBackend, SourceInfo, DEFAULT_BASE_URL,
};
pub use decode::{decode_page, DecodeError, DecodedPage};
pub use engine::{CaptureInput, EngineConfig, EngineError, EngineHandle, NowUtc};
pub use extract::{
    normalize_text, visible_text, CandidateRule, ExtractSettings, ExtractedContent, Extractor,
    PageExtractor, DEFAULT_MIN_CONTENT_CHARS,
};
pub use fetch::{FetchSettings, PageSource, ReqwestPageFetcher};
pub use message::{handle_content_request, ContentReply, ContentRequest};
pub use types::{
    CaptureFailure, CaptureStage, EngineEvent, FetchError, FetchFailureKind, FetchMetadata,
    FetchOutput,
};
