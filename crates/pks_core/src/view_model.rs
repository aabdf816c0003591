use crate::{DocumentRow, HealthView, Role, Source};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusSeverity {
    Pending,
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusLine {
    pub severity: StatusSeverity,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnView {
    pub role: Role,
    pub content: String,
    pub sources: Vec<Source>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppViewModel {
    pub query_input: String,
    pub transcript: Vec<TurnView>,
    pub chat_pending: bool,
    pub chat_error: Option<String>,
    pub capture_pending: bool,
    pub capture_status: Option<StatusLine>,
    pub documents: Vec<DocumentRow>,
    pub documents_pending: bool,
    pub documents_error: Option<String>,
    pub notice: Option<String>,
    pub health: Option<HealthView>,
    pub health_pending: bool,
    pub health_error: Option<String>,
    pub dirty: bool,
}
