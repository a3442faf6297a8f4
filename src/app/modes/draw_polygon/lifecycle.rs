//! Lifecycle-Methoden des DrawPolygonMode (EditMode-Implementierung).

use super::super::{EditMode, ModeKind, ModeProps};
use super::DrawPolygonMode;
use crate::app::events::{ClickEvent, PointerMoveEvent, StartDraggingEvent, StopDraggingEvent};
use crate::app::guides::{cursor_edit_handle, edit_handles_for_geometry, GuideFeatureCollection};
use crate::core::{EditHandleType, Geometry};

impl EditMode for DrawPolygonMode {
    fn kind(&self) -> ModeKind {
        ModeKind::DrawPolygon
    }

    fn name(&self) -> &str {
        "Polygon zeichnen"
    }

    fn status_text(&self) -> &str {
        match self.vertices().len() {
            0 => "Ersten Punkt klicken oder freihand zeichnen",
            1 | 2 => "Weitere Punkte setzen",
            _ => "Ersten Punkt klicken zum Schließen",
        }
    }

    fn handle_click(&mut self, event: &ClickEvent, props: &mut ModeProps<'_>) {
        let pointer_down = props.is_pointer_down;
        self.place_vertex(event.map_coords, &event.picks, pointer_down, props);
    }

    fn handle_pointer_move(&mut self, event: &PointerMoveEvent, props: &mut ModeProps<'_>) {
        if event.is_dragging && props.is_pointer_down {
            self.place_vertex(event.map_coords, &event.picks, true, props);
        }
    }

    fn handle_start_dragging(&mut self, event: &StartDraggingEvent, props: &mut ModeProps<'_>) {
        // Freihand beginnt am Pointer-Down, nicht erst an der Schwelle
        let picks = event.pointer_down_picks.as_deref().unwrap_or(&event.picks);
        self.place_vertex(event.pointer_down_map_coords, picks, true, props);
    }

    fn handle_stop_dragging(&mut self, _event: &StopDraggingEvent, props: &mut ModeProps<'_>) {
        self.free_draw_closed = false;

        if props.is_pointer_down || !self.did_free_draw {
            return;
        }
        self.did_free_draw = false;
        if self.close_ring(props) {
            self.free_draw_closed = true;
        }
    }

    fn guides(&self, props: &ModeProps<'_>) -> GuideFeatureCollection {
        let mut guides = GuideFeatureCollection::new();
        let vertices = self.vertices();
        if vertices.is_empty() {
            return guides;
        }

        let handles = edit_handles_for_geometry(
            &Geometry::LineString(vertices.to_vec()),
            None,
            EditHandleType::Existing,
        );
        let handle_count = handles.len();

        match props.last_pointer_move_event {
            Some(event) => {
                let mut preview = vertices.to_vec();
                preview.push(event.map_coords);
                guides
                    .features
                    .push(self.tentative_guide(Geometry::LineString(preview)));
                guides.features.extend(handles);
                guides
                    .features
                    .push(cursor_edit_handle(event.map_coords, handle_count));
            }
            None => {
                let geometry = match vertices {
                    [single] => Geometry::Point(*single),
                    _ => Geometry::LineString(vertices.to_vec()),
                };
                guides.features.push(self.tentative_guide(geometry));
                guides.features.extend(handles);
            }
        }
        guides
    }

    fn reset(&mut self) {
        self.tentative = None;
        self.free_draw_closed = false;
        self.did_free_draw = false;
    }

    fn has_pending_input(&self) -> bool {
        self.tentative.is_some()
    }
}
