//! Geo-Draw-Editor Library.
//! Edit-Mode-Engine für interaktives Zeichnen und Bearbeiten von
//! GeoJSON-Geometrien, als Library exportiert für Hosts und Tests.

pub mod app;
pub mod core;
pub mod shared;

pub use app::{
    ClickEvent, Cursor, EditAction, EditContext, EditMode, EditType, EditorSession,
    GuideFeatureCollection, ModeKind, ModeManager, Pick, PointerMoveEvent, StartDraggingEvent,
    StopDraggingEvent,
};
pub use core::{
    EditError, Feature, FeatureCollection, FeatureId, FeatureProperties, Geometry, Position,
    RenderType, Viewport,
};
pub use shared::EditorOptions;
