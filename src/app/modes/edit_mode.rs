//! EditMode-Trait: Schnittstelle für alle Edit-Modi.

use super::{ModeKind, ModeProps};
use crate::app::events::{ClickEvent, PointerMoveEvent, StartDraggingEvent, StopDraggingEvent};
use crate::app::guides::GuideFeatureCollection;

/// Schnittstelle für alle Edit-Modi (Zeichnen, Verschieben, Bearbeiten, …).
///
/// Modi sind zustandsbehaftet (Klick-Folge, Tentative-Geometrie, Drag-Baseline)
/// und melden Änderungen ausschließlich über `props.callbacks`. Pro Event wird
/// höchstens eine `EditAction` gemeldet.
pub trait EditMode: Send {
    /// Art des Modus
    fn kind(&self) -> ModeKind;

    /// Anzeigename
    fn name(&self) -> &str;

    /// Statustext (z.B. "Ersten Punkt klicken")
    fn status_text(&self) -> &str {
        ""
    }

    /// Klick verarbeiten.
    fn handle_click(&mut self, _event: &ClickEvent, _props: &mut ModeProps<'_>) {}

    /// Zeiger-Bewegung verarbeiten (auch während eines Drags).
    fn handle_pointer_move(&mut self, _event: &PointerMoveEvent, _props: &mut ModeProps<'_>) {}

    /// Drag-Beginn verarbeiten.
    fn handle_start_dragging(&mut self, _event: &StartDraggingEvent, _props: &mut ModeProps<'_>) {}

    /// Drag-Ende verarbeiten.
    fn handle_stop_dragging(&mut self, _event: &StopDraggingEvent, _props: &mut ModeProps<'_>) {}

    /// Vorschau-Features für den aktuellen Zustand.
    fn guides(&self, _props: &ModeProps<'_>) -> GuideFeatureCollection {
        GuideFeatureCollection::default()
    }

    /// Interaktions-Zustand verwerfen (Escape / Moduswechsel).
    fn reset(&mut self);

    /// Hat der Modus angefangene Eingaben?
    ///
    /// Wird für die stufenweise Escape-Logik benötigt:
    /// Modus zeichnet → Abbruch, Modus idle → Selektion aufheben.
    fn has_pending_input(&self) -> bool {
        false
    }
}
