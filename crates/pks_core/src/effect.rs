use crate::{CaptureSource, ChatTurn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Ask the backend a question. `history` is the transcript as of the end
    /// of the previous submission; the fresh user turn travels as `query`.
    SendChat {
        query: String,
        history: Vec<ChatTurn>,
    },
    /// Ingest a page or text into the knowledge base.
    SendCapture {
        source: CaptureSource,
        title: String,
    },
    /// Load the stored-document list.
    LoadDocuments,
    /// Delete one stored document and all of its chunks.
    DeleteDocument { id: String },
    /// Probe the backend health endpoint.
    CheckHealth,
}
