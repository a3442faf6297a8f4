//! Lifecycle-Methoden des Draw90DegreePolygonMode (EditMode-Implementierung).

use super::super::{EditMode, ModeKind, ModeProps};
use super::Draw90DegreePolygonMode;
use crate::app::edit_action::Cursor;
use crate::app::events::{ClickEvent, PointerMoveEvent};
use crate::app::guides::{edit_handles_for_geometry, tentative_feature, GuideFeatureCollection};
use crate::core::{EditHandleType, RenderType};

impl EditMode for Draw90DegreePolygonMode {
    fn kind(&self) -> ModeKind {
        ModeKind::Draw90DegreePolygon
    }

    fn name(&self) -> &str {
        "90°-Polygon zeichnen"
    }

    fn status_text(&self) -> &str {
        match self.click_sequence.len() {
            0 => "Startpunkt klicken",
            1 | 2 => "Nächste Ecke klicken",
            _ => "Ersten oder letzten Punkt klicken zum Schließen",
        }
    }

    fn handle_pointer_move(&mut self, event: &PointerMoveEvent, props: &mut ModeProps<'_>) {
        props.callbacks.on_update_cursor(Some(Cursor::Cell));
        self.update_tentative(event.map_coords);
    }

    fn handle_click(&mut self, event: &ClickEvent, props: &mut ModeProps<'_>) {
        self.click_sequence.push(event.map_coords);
        self.try_finalize(&event.picks, props);

        // Sofortige Vorschau an der Klick-Position, damit die Handles
        // schon vor der nächsten Bewegung stimmen (Doppelklick)
        let fake_move = PointerMoveEvent::hover(event.map_coords);
        self.handle_pointer_move(&fake_move, props);
    }

    fn guides(&self, _props: &ModeProps<'_>) -> GuideFeatureCollection {
        let mut guides = GuideFeatureCollection::new();
        let Some(geometry) = self.tentative.as_ref() else {
            return guides;
        };

        let mut tentative = tentative_feature(geometry.clone(), RenderType::Polygon);
        tentative.id = self.tentative_id.clone();
        guides.features.push(tentative);

        // Das Handle an der Zeigerposition entfällt
        let mut handles = edit_handles_for_geometry(geometry, None, EditHandleType::Existing);
        handles.pop();
        guides.features.extend(handles);
        guides
    }

    fn reset(&mut self) {
        self.click_sequence.clear();
        self.tentative = None;
        self.tentative_id = None;
    }

    fn has_pending_input(&self) -> bool {
        !self.click_sequence.is_empty()
    }
}
