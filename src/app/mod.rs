//! Application-Layer: Edit-Modi, Events, Guides und die Referenz-Session.

pub mod action_log;
pub mod edit_action;
pub mod events;
pub mod guides;
/// Edit-Modi
///
/// Jeder Modus übersetzt Zeiger-Events in Vorschau-Guides und `EditAction`s.
pub mod modes;
pub mod replay;
pub mod session;

pub use action_log::{ActionLog, ActionRecord};
pub use edit_action::{Cursor, EditAction, EditContext, EditType};
pub use events::{
    ClickEvent, EditHandlePick, Modifiers, Pick, PickedObject, PointerMoveEvent, SourceEvent,
    StartDraggingEvent, StopDraggingEvent,
};
pub use guides::GuideFeatureCollection;
pub use modes::{EditMode, ModeCallbacks, ModeKind, ModeManager, ModeProps, RecordingCallbacks};
pub use replay::{load_script, run_script, ReplayScript, ReplayStep};
pub use session::{EditorSession, RejectReason};
