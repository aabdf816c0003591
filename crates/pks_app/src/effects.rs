use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use client_logging::client_info;
use pks_core::{
    CaptureError, CaptureErrorKind, CaptureReceipt, CaptureSource, CaptureStage, ChatReply,
    ChatTurn, DocumentRow, Effect, HealthView, Msg, Role, Source,
};
use pks_engine::{
    CaptureFailure, CaptureInput, ChatMessage, ChatResponse, ClientError, DocumentListResponse,
    EngineConfig, EngineEvent, EngineHandle, HealthResponse, IngestResponse,
};

/// Executes core effects against the engine and feeds engine events back
/// into the state machine as messages.
pub struct EffectRunner {
    engine: EngineHandle,
}

impl EffectRunner {
    pub fn new(config: EngineConfig, msg_tx: mpsc::Sender<Msg>) -> anyhow::Result<Self> {
        let engine = EngineHandle::new(config)?;
        spawn_event_loop(engine.clone(), msg_tx);
        Ok(Self { engine })
    }

    pub fn run(&self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::SendChat { query, history } => {
                    client_info!(
                        "chat request ({} history turns, {} query chars)",
                        history.len(),
                        query.len()
                    );
                    self.engine.chat(query, wire_history(&history));
                }
                Effect::SendCapture { source, title } => {
                    self.engine.capture(engine_input(source), title);
                }
                Effect::LoadDocuments => self.engine.list_documents(),
                Effect::DeleteDocument { id } => self.engine.delete_document(id),
                Effect::CheckHealth => self.engine.check_health(),
            }
        }
    }
}

fn spawn_event_loop(engine: EngineHandle, msg_tx: mpsc::Sender<Msg>) {
    thread::spawn(move || loop {
        if let Some(event) = engine.try_recv() {
            if msg_tx.send(map_event(event)).is_err() {
                break;
            }
        } else {
            thread::sleep(Duration::from_millis(20));
        }
    });
}

fn map_event(event: EngineEvent) -> Msg {
    match event {
        EngineEvent::CaptureProgress { stage } => Msg::CaptureProgress {
            stage: map_stage(stage),
        },
        EngineEvent::CaptureCompleted { result } => Msg::CaptureCompleted {
            result: result.map(to_receipt).map_err(to_capture_error),
        },
        EngineEvent::ChatCompleted { result } => Msg::ChatCompleted {
            result: result.map(to_reply).map_err(|err| err.to_string()),
        },
        EngineEvent::DocumentsListed { result } => Msg::DocumentsLoaded {
            result: result.map(to_rows).map_err(|err| err.to_string()),
        },
        EngineEvent::DocumentDeleted { id, result } => Msg::DocumentDeleted {
            id,
            result: result
                .map(|response| response.deleted_count as usize)
                .map_err(|err| err.to_string()),
        },
        EngineEvent::HealthChecked { result } => Msg::HealthChecked {
            result: result.map(to_health).map_err(|err| err.to_string()),
        },
    }
}

fn map_stage(stage: pks_engine::CaptureStage) -> CaptureStage {
    match stage {
        pks_engine::CaptureStage::Fetching => CaptureStage::Fetching,
        pks_engine::CaptureStage::Extracting => CaptureStage::Extracting,
        pks_engine::CaptureStage::Ingesting => CaptureStage::Ingesting,
    }
}

fn engine_input(source: CaptureSource) -> CaptureInput {
    match source {
        CaptureSource::Url { url } => CaptureInput::Url { url },
        CaptureSource::Page { url } => CaptureInput::Page { url },
        CaptureSource::Text { text, url } => CaptureInput::Text { text, url },
    }
}

fn wire_history(history: &[ChatTurn]) -> Vec<ChatMessage> {
    history
        .iter()
        .map(|turn| ChatMessage {
            role: match turn.role {
                Role::User => "user".to_string(),
                Role::Assistant => "assistant".to_string(),
            },
            content: turn.content.clone(),
        })
        .collect()
}

fn to_receipt(response: IngestResponse) -> CaptureReceipt {
    CaptureReceipt {
        document_id: response.document_id,
        chunks_count: response.chunks_count,
    }
}

fn to_capture_error(failure: CaptureFailure) -> CaptureError {
    match failure {
        CaptureFailure::Fetch(err) => CaptureError::new(CaptureErrorKind::Page, err.to_string()),
        CaptureFailure::Decode(err) => CaptureError::new(CaptureErrorKind::Page, err.to_string()),
        CaptureFailure::Backend(ClientError::Validation(message)) => {
            CaptureError::new(CaptureErrorKind::Validation, message)
        }
        CaptureFailure::Backend(ClientError::Transport(message)) => {
            CaptureError::new(CaptureErrorKind::Transport, message)
        }
        CaptureFailure::Backend(ClientError::Backend { detail, .. }) => {
            CaptureError::new(CaptureErrorKind::Backend, detail)
        }
        CaptureFailure::Backend(ClientError::Parse(message)) => {
            CaptureError::new(CaptureErrorKind::Parse, message)
        }
    }
}

fn to_reply(response: ChatResponse) -> ChatReply {
    ChatReply {
        answer: response.response,
        sources: response
            .sources
            .into_iter()
            .map(|source| Source {
                title: source.title,
                url: source.url,
                source: source.source,
            })
            .collect(),
    }
}

fn to_rows(listing: DocumentListResponse) -> Vec<DocumentRow> {
    listing
        .documents
        .into_iter()
        .map(|doc| DocumentRow {
            id: doc.id,
            title: doc.title,
            url: doc.url,
            source: doc.source,
            timestamp: doc.timestamp,
        })
        .collect()
}

fn to_health(response: HealthResponse) -> HealthView {
    HealthView {
        status: response.status,
        qdrant_connected: response.qdrant_connected,
        collection_name: response.collection_name,
    }
}
