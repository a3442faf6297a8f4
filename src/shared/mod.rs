//! Geteilte Typen für layer-übergreifende Verträge.
//!
//! Enthält die Editor-Konfiguration, die von `app` und der Replay-Binary
//! gleichermaßen gelesen wird.

pub mod options;

pub use options::EditorOptions;
pub use options::{DEFAULT_ZOOM, MIN_PX_DISTANCE_BETWEEN_POINTS};
