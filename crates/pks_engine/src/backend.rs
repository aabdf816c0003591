use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

pub const DEFAULT_BASE_URL: &str = "http://localhost:8100";

const API_PREFIX: &str = "/api/v1";

#[derive(Debug, Clone)]
pub struct BackendSettings {
    pub base_url: String,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
}

impl Default for BackendSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(60),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestMetadata {
    pub title: String,
    pub timestamp: String,
    pub source: String,
    /// Source URL for text ingests, so citations stay clickable.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    pub metadata: IngestMetadata,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestResponse {
    pub document_id: String,
    pub chunks_count: u32,
    pub point_ids: Vec<String>,
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub query: String,
    pub history: Vec<ChatMessage>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceInfo {
    pub title: String,
    #[serde(default)]
    pub url: String,
    pub source: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatResponse {
    pub response: String,
    pub sources: Vec<SourceInfo>,
    pub context_used: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentInfo {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub url: String,
    pub source: String,
    #[serde(default)]
    pub timestamp: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentListResponse {
    pub documents: Vec<DocumentInfo>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteResponse {
    pub status: String,
    pub deleted_count: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    #[serde(default)]
    pub qdrant_connected: bool,
    #[serde(default)]
    pub collection_name: String,
}

/// Client-side failure taxonomy: validation failures never reach the wire,
/// transport failures mean the backend could not be reached at all, backend
/// failures carry the server's detail message, parse failures mean the body
/// did not have the promised shape.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClientError {
    #[error("invalid request: {0}")]
    Validation(String),
    #[error("backend unreachable: {0}")]
    Transport(String),
    #[error("backend error ({status}): {detail}")]
    Backend { status: u16, detail: String },
    #[error("unexpected response from backend: {0}")]
    Parse(String),
}

// FastAPI error body shape.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    detail: String,
}

#[async_trait]
pub trait KnowledgeBackend: Send + Sync {
    async fn ingest(&self, request: IngestRequest) -> Result<IngestResponse, ClientError>;
    async fn chat(&self, request: ChatRequest) -> Result<ChatResponse, ClientError>;
    async fn list_documents(&self) -> Result<DocumentListResponse, ClientError>;
    async fn delete_document(&self, document_id: &str) -> Result<DeleteResponse, ClientError>;
    async fn health(&self) -> Result<HealthResponse, ClientError>;
}

/// JSON-over-HTTP client for the knowledge-base REST surface.
#[derive(Debug, Clone)]
pub struct RestBackend {
    settings: BackendSettings,
    client: reqwest::Client,
}

impl RestBackend {
    pub fn new(settings: BackendSettings) -> Result<Self, ClientError> {
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| ClientError::Transport(err.to_string()))?;
        Ok(Self { settings, client })
    }

    pub fn base_url(&self) -> &str {
        &self.settings.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        let base = self.settings.base_url.trim_end_matches('/');
        format!("{base}{API_PREFIX}{path}")
    }

    async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T, ClientError>
    where
        B: Serialize + Sync,
        T: DeserializeOwned,
    {
        let response = self
            .client
            .post(self.endpoint(path))
            .json(body)
            .send()
            .await
            .map_err(transport_error)?;
        interpret_response(response).await
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        let response = self
            .client
            .get(self.endpoint(path))
            .send()
            .await
            .map_err(transport_error)?;
        interpret_response(response).await
    }
}

#[async_trait]
impl KnowledgeBackend for RestBackend {
    async fn ingest(&self, request: IngestRequest) -> Result<IngestResponse, ClientError> {
        if request.url.is_none() && request.text.is_none() {
            return Err(ClientError::Validation(
                "either a url or text must be provided".to_string(),
            ));
        }
        self.post_json("/ingest", &request).await
    }

    async fn chat(&self, request: ChatRequest) -> Result<ChatResponse, ClientError> {
        if request.query.trim().is_empty() {
            return Err(ClientError::Validation("empty query".to_string()));
        }
        self.post_json("/chat", &request).await
    }

    async fn list_documents(&self) -> Result<DocumentListResponse, ClientError> {
        self.get_json("/documents").await
    }

    async fn delete_document(&self, document_id: &str) -> Result<DeleteResponse, ClientError> {
        let response = self
            .client
            .delete(self.endpoint(&format!("/documents/{document_id}")))
            .send()
            .await
            .map_err(transport_error)?;
        interpret_response(response).await
    }

    async fn health(&self) -> Result<HealthResponse, ClientError> {
        self.get_json("/health").await
    }
}

fn transport_error(err: reqwest::Error) -> ClientError {
    ClientError::Transport(err.to_string())
}

async fn interpret_response<T: DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, ClientError> {
    let status = response.status();
    let body = response.bytes().await.map_err(transport_error)?;
    if status.is_success() {
        return serde_json::from_slice(&body).map_err(|err| ClientError::Parse(err.to_string()));
    }
    // Prefer the server's own detail message; fall back to the bare status
    // when the body is not the expected shape.
    let detail = serde_json::from_slice::<ErrorBody>(&body)
        .map(|error| error.detail)
        .unwrap_or_else(|_| format!("http status {}", status.as_u16()));
    Err(ClientError::Backend {
        status: status.as_u16(),
        detail,
    })
}
