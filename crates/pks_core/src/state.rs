use crate::view_model::{AppViewModel, StatusLine, StatusSeverity, TurnView};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Source {
    pub title: String,
    pub url: String,
    pub source: String,
}

/// One entry of the conversation transcript.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatTurn {
    pub role: Role,
    pub content: String,
    pub sources: Vec<Source>,
}

/// What the backend answered for one submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatReply {
    pub answer: String,
    pub sources: Vec<Source>,
}

/// The page value a capture surface hands in explicitly; there is no ambient
/// "current page" state anywhere in the machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureSource {
    /// Send the bare URL; the backend fetches and parses the page.
    Url { url: String },
    /// Fetch the page locally, extract its content and send the text.
    Page { url: String },
    /// Send raw text, optionally tied to a source URL.
    Text { text: String, url: Option<String> },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureStage {
    Fetching,
    Extracting,
    Ingesting,
}

/// Terminal confirmation of a successful ingestion. Surfaced once, not
/// retained beyond the status line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureReceipt {
    pub document_id: String,
    pub chunks_count: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureErrorKind {
    /// Rejected before any network call.
    Validation,
    /// Local page fetch or decode failed.
    Page,
    /// Backend unreachable.
    Transport,
    /// Backend answered with a non-success status.
    Backend,
    /// Backend answered with an unexpected body shape.
    Parse,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureError {
    pub kind: CaptureErrorKind,
    pub message: String,
}

impl CaptureError {
    pub fn new(kind: CaptureErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureStatus {
    InProgress { stage: CaptureStage },
    Saved(CaptureReceipt),
    Failed(CaptureError),
}

/// Read-only projection of one stored document, valid for one list-load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentRow {
    pub id: String,
    pub title: String,
    pub url: String,
    pub source: String,
    pub timestamp: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HealthView {
    pub status: String,
    pub qdrant_connected: bool,
    pub collection_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppState {
    query_input: String,
    transcript: Vec<ChatTurn>,
    chat_in_flight: bool,
    chat_error: Option<String>,
    capture_in_flight: bool,
    capture_status: Option<CaptureStatus>,
    documents: Vec<DocumentRow>,
    documents_in_flight: bool,
    documents_error: Option<String>,
    notice: Option<String>,
    health: Option<HealthView>,
    health_in_flight: bool,
    health_error: Option<String>,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view(&self) -> AppViewModel {
        AppViewModel {
            query_input: self.query_input.clone(),
            transcript: self
                .transcript
                .iter()
                .map(|turn| TurnView {
                    role: turn.role,
                    content: turn.content.clone(),
                    sources: turn.sources.clone(),
                })
                .collect(),
            chat_pending: self.chat_in_flight,
            chat_error: self.chat_error.clone(),
            capture_pending: self.capture_in_flight,
            capture_status: self.capture_status.as_ref().map(status_line),
            documents: self.documents.clone(),
            documents_pending: self.documents_in_flight,
            documents_error: self.documents_error.clone(),
            notice: self.notice.clone(),
            health: self.health.clone(),
            health_pending: self.health_in_flight,
            health_error: self.health_error.clone(),
            dirty: self.dirty,
        }
    }

    /// Returns the dirty flag and clears it. The render loop uses this to
    /// coalesce redraws.
    pub fn consume_dirty(&mut self) -> bool {
        let was_dirty = self.dirty;
        self.dirty = false;
        was_dirty
    }

    fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn query_input(&self) -> &str {
        &self.query_input
    }

    pub(crate) fn set_query_input(&mut self, text: String) {
        if self.query_input != text {
            self.query_input = text;
            self.mark_dirty();
        }
    }

    pub(crate) fn chat_in_flight(&self) -> bool {
        self.chat_in_flight
    }

    /// Optimistically appends the user turn and marks the submission as
    /// pending. Returns the query and the history snapshot taken *before*
    /// the append, so the fresh turn is never duplicated into history.
    pub(crate) fn begin_chat(&mut self) -> (String, Vec<ChatTurn>) {
        let query = self.query_input.trim().to_string();
        let history = self.transcript.clone();
        self.transcript.push(ChatTurn {
            role: Role::User,
            content: query.clone(),
            sources: Vec::new(),
        });
        self.query_input.clear();
        self.chat_error = None;
        self.chat_in_flight = true;
        self.mark_dirty();
        (query, history)
    }

    pub(crate) fn resolve_chat(&mut self, result: Result<ChatReply, String>) {
        if !self.chat_in_flight {
            return;
        }
        match result {
            Ok(reply) => {
                self.transcript.push(ChatTurn {
                    role: Role::Assistant,
                    content: reply.answer,
                    sources: reply.sources,
                });
            }
            Err(message) => {
                // The failure becomes part of the conversational record, and
                // is additionally kept for transient display.
                self.transcript.push(ChatTurn {
                    role: Role::Assistant,
                    content: format!("Error: {message}"),
                    sources: Vec::new(),
                });
                self.chat_error = Some(message);
            }
        }
        self.chat_in_flight = false;
        self.mark_dirty();
    }

    pub(crate) fn capture_in_flight(&self) -> bool {
        self.capture_in_flight
    }

    pub(crate) fn begin_capture(&mut self, stage: CaptureStage) {
        self.capture_in_flight = true;
        self.capture_status = Some(CaptureStatus::InProgress { stage });
        self.mark_dirty();
    }

    /// Terminal rejection before any effect was issued; the capture surface
    /// stays enabled.
    pub(crate) fn reject_capture(&mut self, message: String) {
        self.capture_status = Some(CaptureStatus::Failed(CaptureError::new(
            CaptureErrorKind::Validation,
            message,
        )));
        self.mark_dirty();
    }

    pub(crate) fn capture_progress(&mut self, stage: CaptureStage) {
        if !self.capture_in_flight {
            return;
        }
        self.capture_status = Some(CaptureStatus::InProgress { stage });
        self.mark_dirty();
    }

    pub(crate) fn resolve_capture(&mut self, result: Result<CaptureReceipt, CaptureError>) {
        if !self.capture_in_flight {
            return;
        }
        self.capture_status = Some(match result {
            Ok(receipt) => CaptureStatus::Saved(receipt),
            Err(error) => CaptureStatus::Failed(error),
        });
        // Unconditionally re-enable the capture surface so every failure is
        // retriable.
        self.capture_in_flight = false;
        self.mark_dirty();
    }

    pub(crate) fn dismiss_status(&mut self) {
        if self.capture_status.take().is_some() || self.notice.take().is_some() {
            self.mark_dirty();
        }
    }

    pub(crate) fn documents_in_flight(&self) -> bool {
        self.documents_in_flight
    }

    pub(crate) fn begin_documents_op(&mut self) {
        self.documents_in_flight = true;
        self.documents_error = None;
        self.notice = None;
        self.mark_dirty();
    }

    pub(crate) fn documents_loaded(&mut self, result: Result<Vec<DocumentRow>, String>) {
        if !self.documents_in_flight {
            return;
        }
        match result {
            Ok(documents) => self.documents = documents,
            Err(message) => self.documents_error = Some(message),
        }
        self.documents_in_flight = false;
        self.mark_dirty();
    }

    pub(crate) fn document_deleted(&mut self, id: &str, result: Result<usize, String>) {
        if !self.documents_in_flight {
            return;
        }
        match result {
            Ok(deleted_count) => {
                self.documents.retain(|row| row.id != id);
                self.notice = Some(format!("Deleted document ({deleted_count} chunks removed)"));
            }
            Err(message) => self.documents_error = Some(message),
        }
        self.documents_in_flight = false;
        self.mark_dirty();
    }

    pub(crate) fn health_in_flight(&self) -> bool {
        self.health_in_flight
    }

    pub(crate) fn begin_health_check(&mut self) {
        self.health_in_flight = true;
        self.health_error = None;
        self.mark_dirty();
    }

    pub(crate) fn health_checked(&mut self, result: Result<HealthView, String>) {
        if !self.health_in_flight {
            return;
        }
        match result {
            Ok(health) => self.health = Some(health),
            Err(message) => self.health_error = Some(message),
        }
        self.health_in_flight = false;
        self.mark_dirty();
    }
}

fn status_line(status: &CaptureStatus) -> StatusLine {
    match status {
        CaptureStatus::InProgress { stage } => StatusLine {
            severity: StatusSeverity::Pending,
            text: match stage {
                CaptureStage::Fetching => "Saving: fetching page".to_string(),
                CaptureStage::Extracting => "Saving: extracting content".to_string(),
                CaptureStage::Ingesting => "Saving: sending to backend".to_string(),
            },
        },
        CaptureStatus::Saved(receipt) => StatusLine {
            severity: StatusSeverity::Success,
            text: format!("Saved! ({} chunks)", receipt.chunks_count),
        },
        CaptureStatus::Failed(error) => StatusLine {
            severity: StatusSeverity::Error,
            text: match error.kind {
                CaptureErrorKind::Transport => {
                    "Failed to connect to the PKS backend".to_string()
                }
                _ => format!("Failed: {}", error.message),
            },
        },
    }
}
