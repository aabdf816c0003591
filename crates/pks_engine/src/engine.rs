use std::sync::{mpsc, Arc, Mutex};
use std::thread;

use client_logging::client_error;
use scraper::Html;

use crate::backend::{
    BackendSettings, ChatMessage, ChatRequest, ClientError, IngestMetadata, IngestRequest,
    IngestResponse, KnowledgeBackend, RestBackend,
};
use crate::decode::decode_page;
use crate::extract::{ExtractSettings, Extractor, PageExtractor};
use crate::fetch::{FetchSettings, PageSource, ReqwestPageFetcher};
use crate::{CaptureFailure, CaptureStage, EngineEvent, FetchError};

/// Clock injected by the host so the engine never reads ambient time.
pub type NowUtc = Arc<dyn Fn() -> String + Send + Sync>;

pub struct EngineConfig {
    pub backend: BackendSettings,
    pub fetch: FetchSettings,
    pub extract: ExtractSettings,
    /// Recorded as `metadata.source` on every ingest.
    pub source_tag: String,
    pub now_utc: NowUtc,
}

impl EngineConfig {
    pub fn new(backend: BackendSettings, now_utc: NowUtc) -> Self {
        Self {
            backend,
            fetch: FetchSettings::default(),
            extract: ExtractSettings::default(),
            source_tag: "pks-cli".to_string(),
            now_utc,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error(transparent)]
    Backend(#[from] ClientError),
    #[error(transparent)]
    Fetch(#[from] FetchError),
}

/// What a capture command operates on, after the surface validated it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureInput {
    /// Hand the URL to the backend, which fetches and parses it.
    Url { url: String },
    /// Fetch and extract locally, then ingest the text.
    Page { url: String },
    /// Ingest raw text as-is.
    Text { text: String, url: Option<String> },
}

enum EngineCommand {
    Capture { input: CaptureInput, title: String },
    Chat { query: String, history: Vec<ChatMessage> },
    ListDocuments,
    DeleteDocument { id: String },
    CheckHealth,
}

struct EngineShared {
    backend: Arc<dyn KnowledgeBackend>,
    fetcher: Arc<dyn PageSource>,
    extractor: Arc<dyn Extractor>,
    source_tag: String,
    now_utc: NowUtc,
}

/// Handle to the engine worker: commands go in over a channel, events come
/// back over another. The worker owns its own tokio runtime so callers stay
/// synchronous.
#[derive(Clone)]
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    event_rx: Arc<Mutex<mpsc::Receiver<EngineEvent>>>,
}

impl EngineHandle {
    pub fn new(config: EngineConfig) -> Result<Self, EngineError> {
        let shared = Arc::new(EngineShared {
            backend: Arc::new(RestBackend::new(config.backend)?),
            fetcher: Arc::new(ReqwestPageFetcher::new(config.fetch)?),
            extractor: Arc::new(PageExtractor::new(config.extract)),
            source_tag: config.source_tag,
            now_utc: config.now_utc,
        });

        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel::<EngineEvent>();

        thread::spawn(move || {
            let runtime = tokio::runtime::Runtime::new().expect("tokio runtime");
            while let Ok(command) = cmd_rx.recv() {
                let shared = shared.clone();
                let event_tx = event_tx.clone();
                runtime.spawn(async move {
                    run_command(shared, command, event_tx).await;
                });
            }
        });

        Ok(Self {
            cmd_tx,
            event_rx: Arc::new(Mutex::new(event_rx)),
        })
    }

    pub fn capture(&self, input: CaptureInput, title: impl Into<String>) {
        self.send(EngineCommand::Capture {
            input,
            title: title.into(),
        });
    }

    pub fn chat(&self, query: impl Into<String>, history: Vec<ChatMessage>) {
        self.send(EngineCommand::Chat {
            query: query.into(),
            history,
        });
    }

    pub fn list_documents(&self) {
        self.send(EngineCommand::ListDocuments);
    }

    pub fn delete_document(&self, id: impl Into<String>) {
        self.send(EngineCommand::DeleteDocument { id: id.into() });
    }

    pub fn check_health(&self) {
        self.send(EngineCommand::CheckHealth);
    }

    pub fn try_recv(&self) -> Option<EngineEvent> {
        match self.event_rx.lock() {
            Ok(rx) => rx.try_recv().ok(),
            Err(_) => None,
        }
    }

    fn send(&self, command: EngineCommand) {
        if self.cmd_tx.send(command).is_err() {
            client_error!("engine worker is gone; dropping command");
        }
    }
}

async fn run_command(
    shared: Arc<EngineShared>,
    command: EngineCommand,
    event_tx: mpsc::Sender<EngineEvent>,
) {
    let event = match command {
        EngineCommand::Capture { input, title } => {
            let result = run_capture(&shared, input, title, event_tx.clone()).await;
            EngineEvent::CaptureCompleted { result }
        }
        EngineCommand::Chat { query, history } => EngineEvent::ChatCompleted {
            result: shared.backend.chat(ChatRequest { query, history }).await,
        },
        EngineCommand::ListDocuments => EngineEvent::DocumentsListed {
            result: shared.backend.list_documents().await,
        },
        EngineCommand::DeleteDocument { id } => {
            let result = shared.backend.delete_document(&id).await;
            EngineEvent::DocumentDeleted { id, result }
        }
        EngineCommand::CheckHealth => EngineEvent::HealthChecked {
            result: shared.backend.health().await,
        },
    };
    let _ = event_tx.send(event);
}

fn emit_progress(event_tx: &mpsc::Sender<EngineEvent>, stage: CaptureStage) {
    let _ = event_tx.send(EngineEvent::CaptureProgress { stage });
}

async fn run_capture(
    shared: &EngineShared,
    input: CaptureInput,
    title: String,
    event_tx: mpsc::Sender<EngineEvent>,
) -> Result<IngestResponse, CaptureFailure> {
    match input {
        CaptureInput::Url { url } => {
            emit_progress(&event_tx, CaptureStage::Ingesting);
            let request = ingest_request(shared, Some(url), None, title, None);
            Ok(shared.backend.ingest(request).await?)
        }
        CaptureInput::Page { url } => {
            emit_progress(&event_tx, CaptureStage::Fetching);
            let page = shared.fetcher.fetch_page(&url).await?;
            emit_progress(&event_tx, CaptureStage::Extracting);
            let decoded = decode_page(&page.bytes, page.metadata.content_type.as_deref())?;
            // Keep the parsed document scoped: it must not live across the
            // ingest await below.
            let extracted = {
                let doc = Html::parse_document(&decoded.html);
                shared.extractor.extract(&doc, &page.metadata.final_url)
            };
            let title = if title.trim().is_empty() {
                extracted.title
            } else {
                title
            };
            emit_progress(&event_tx, CaptureStage::Ingesting);
            let request = ingest_request(
                shared,
                None,
                Some(extracted.content),
                title,
                Some(extracted.url),
            );
            Ok(shared.backend.ingest(request).await?)
        }
        CaptureInput::Text { text, url } => {
            emit_progress(&event_tx, CaptureStage::Ingesting);
            let request = ingest_request(shared, None, Some(text), title, url);
            Ok(shared.backend.ingest(request).await?)
        }
    }
}

fn ingest_request(
    shared: &EngineShared,
    url: Option<String>,
    text: Option<String>,
    title: String,
    source_url: Option<String>,
) -> IngestRequest {
    IngestRequest {
        url,
        text,
        metadata: IngestMetadata {
            title,
            timestamp: (shared.now_utc)(),
            source: shared.source_tag.clone(),
            url: source_url,
        },
    }
}
