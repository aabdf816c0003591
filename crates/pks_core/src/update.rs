use url::Url;

use crate::{AppState, CaptureSource, CaptureStage, Effect, Msg};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::QueryInputChanged(text) => {
            state.set_query_input(text);
            Vec::new()
        }
        Msg::QuerySubmitted => {
            // Double-submission guard: exactly one chat request in flight.
            if state.chat_in_flight() || state.query_input().trim().is_empty() {
                return (state, Vec::new());
            }
            let (query, history) = state.begin_chat();
            vec![Effect::SendChat { query, history }]
        }
        Msg::ChatCompleted { result } => {
            state.resolve_chat(result);
            Vec::new()
        }
        Msg::CaptureRequested { source, title } => {
            if state.capture_in_flight() {
                return (state, Vec::new());
            }
            match checked_source(source) {
                Ok(source) => {
                    state.begin_capture(initial_stage(&source));
                    vec![Effect::SendCapture { source, title }]
                }
                Err(message) => {
                    // Rejected before any network call; the surface stays
                    // enabled for another attempt.
                    state.reject_capture(message);
                    Vec::new()
                }
            }
        }
        Msg::CaptureProgress { stage } => {
            state.capture_progress(stage);
            Vec::new()
        }
        Msg::CaptureCompleted { result } => {
            state.resolve_capture(result);
            Vec::new()
        }
        Msg::StatusDismissed => {
            state.dismiss_status();
            Vec::new()
        }
        Msg::DocumentsRequested => {
            if state.documents_in_flight() {
                return (state, Vec::new());
            }
            state.begin_documents_op();
            vec![Effect::LoadDocuments]
        }
        Msg::DocumentsLoaded { result } => {
            state.documents_loaded(result);
            Vec::new()
        }
        Msg::DocumentDeleteRequested { id } => {
            if state.documents_in_flight() || id.trim().is_empty() {
                return (state, Vec::new());
            }
            state.begin_documents_op();
            vec![Effect::DeleteDocument { id }]
        }
        Msg::DocumentDeleted { id, result } => {
            state.document_deleted(&id, result);
            Vec::new()
        }
        Msg::HealthRequested => {
            if state.health_in_flight() {
                return (state, Vec::new());
            }
            state.begin_health_check();
            vec![Effect::CheckHealth]
        }
        Msg::HealthChecked { result } => {
            state.health_checked(result);
            Vec::new()
        }
        Msg::NoOp => Vec::new(),
    };

    (state, effects)
}

/// Validates a capture source and returns its trimmed form.
fn checked_source(source: CaptureSource) -> Result<CaptureSource, String> {
    match source {
        CaptureSource::Url { url } => {
            Ok(CaptureSource::Url { url: checked_url(&url)? })
        }
        CaptureSource::Page { url } => {
            Ok(CaptureSource::Page { url: checked_url(&url)? })
        }
        CaptureSource::Text { text, url } => {
            if text.trim().is_empty() {
                return Err("no text to save".to_string());
            }
            let url = match url {
                Some(url) => Some(checked_url(&url)?),
                None => None,
            };
            Ok(CaptureSource::Text { text, url })
        }
    }
}

fn checked_url(url: &str) -> Result<String, String> {
    let trimmed = url.trim();
    if trimmed.is_empty() {
        return Err("no page to save".to_string());
    }
    Url::parse(trimmed)
        .map(|_| trimmed.to_string())
        .map_err(|err| format!("invalid url {trimmed:?}: {err}"))
}

fn initial_stage(source: &CaptureSource) -> CaptureStage {
    match source {
        // Local fetch + extraction happen before the ingest call.
        CaptureSource::Page { .. } => CaptureStage::Fetching,
        CaptureSource::Url { .. } | CaptureSource::Text { .. } => CaptureStage::Ingesting,
    }
}
