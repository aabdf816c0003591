//! PKS core: pure state machine and view-model helpers.
mod effect;
mod msg;
mod state;
mod update;
mod view_model;

pub use effect::Effect;
pub use msg::Msg;
pub use state::{
    AppState, CaptureError, CaptureErrorKind, CaptureReceipt, CaptureSource, CaptureStage,
    CaptureStatus, ChatReply, ChatTurn, DocumentRow, HealthView, Role, Source,
};
pub use update::update;
pub use view_model::{AppViewModel, StatusLine, StatusSeverity, TurnView};
