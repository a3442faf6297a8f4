//! Nur-Lesen-Modus: ignoriert alle Events, keine Guides.

use super::{EditMode, ModeKind};

/// Standard-Modus einer Session.
#[derive(Debug, Clone, Default)]
pub struct ViewMode;

impl ViewMode {
    /// Erstellt den Modus.
    pub fn new() -> Self {
        Self
    }
}

impl EditMode for ViewMode {
    fn kind(&self) -> ModeKind {
        ModeKind::View
    }

    fn name(&self) -> &str {
        "Ansicht"
    }

    fn reset(&mut self) {}
}
