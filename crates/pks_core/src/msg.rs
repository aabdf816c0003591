#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// User edited the chat input box.
    QueryInputChanged(String),
    /// User submitted the current chat input.
    QuerySubmitted,
    /// Backend chat call resolved.
    ChatCompleted {
        result: Result<crate::ChatReply, String>,
    },
    /// A capture surface asked for a page or text to be saved.
    CaptureRequested {
        source: crate::CaptureSource,
        title: String,
    },
    /// Engine progress for the in-flight capture.
    CaptureProgress { stage: crate::CaptureStage },
    /// Engine completion for the in-flight capture.
    CaptureCompleted {
        result: Result<crate::CaptureReceipt, crate::CaptureError>,
    },
    /// User dismissed the capture status banner.
    StatusDismissed,
    /// User asked for the stored-document list.
    DocumentsRequested,
    /// Backend document listing resolved.
    DocumentsLoaded {
        result: Result<Vec<crate::DocumentRow>, String>,
    },
    /// User asked for a stored document to be deleted.
    DocumentDeleteRequested { id: String },
    /// Backend deletion resolved; `Ok` carries the deleted chunk count.
    DocumentDeleted {
        id: String,
        result: Result<usize, String>,
    },
    /// User asked for a backend health check.
    HealthRequested,
    /// Backend health check resolved.
    HealthChecked {
        result: Result<crate::HealthView, String>,
    },
    /// Fallback for placeholder wiring.
    NoOp,
}
