//! Translate-Modus: selektierte Features per Drag verschieben.
//!
//! Alle selektierten Features bekommen dieselbe Verschiebung (Distanz und
//! Richtung vom Drag-Start zum Zeiger). Gerechnet wird immer vom Stand beim
//! Drag-Start aus, damit sich Rundungsfehler nicht aufsummieren.

use super::{EditMode, ModeKind, ModeProps};
use crate::app::edit_action::{Cursor, EditAction, EditContext, EditType};
use crate::app::events::{Pick, PointerMoveEvent, StartDraggingEvent, StopDraggingEvent};
use crate::core::geo_math::{bearing, destination, haversine_distance_km};
use crate::core::{EditError, FeatureCollection, Position};

/// Verschiebe-Modus.
#[derive(Debug, Clone, Default)]
pub struct TranslateMode {
    /// Selektierte Features beim Drag-Start (Reihenfolge wie die Selektion)
    baseline: Option<FeatureCollection>,
    /// Letzte Bewegung lag über einem selektierten Feature oder ein Drag läuft
    is_translatable: bool,
}

impl TranslateMode {
    /// Erstellt den Modus ohne laufenden Drag.
    pub fn new() -> Self {
        Self::default()
    }

    /// Läuft gerade ein Verschiebe-Drag?
    pub fn is_dragging(&self) -> bool {
        self.baseline.is_some()
    }

    /// Baut die Action für die Verschiebung `start → current`.
    ///
    /// Gibt `None` zurück ohne Baseline oder Selektion; Fehler beim Ersetzen
    /// der Geometrie werden geloggt und verworfen.
    fn translate_action(
        &self,
        start: Position,
        current: Position,
        edit_type: EditType,
        props: &ModeProps<'_>,
    ) -> Option<EditAction> {
        let baseline = self.baseline.as_ref()?;
        if props.selected_indexes.is_empty() {
            return None;
        }
        match translated_data(props.data, baseline, props.selected_indexes, start, current) {
            Ok(updated_data) => Some(EditAction {
                updated_data,
                edit_type,
                edit_context: Some(EditContext::features(props.selected_indexes.to_vec())),
            }),
            Err(e) => {
                log::warn!("Verschieben fehlgeschlagen: {}", e);
                None
            }
        }
    }
}

/// Liegt einer der Picks auf einem selektierten Feature?
fn picks_selected_feature(picks: &[Pick], selected: &[usize]) -> bool {
    picks
        .iter()
        .filter_map(Pick::feature_index)
        .any(|i| selected.contains(&i))
}

/// Ersetzt die Geometrie jedes selektierten Features durch die verschobene
/// Baseline-Geometrie.
fn translated_data(
    data: &FeatureCollection,
    baseline: &FeatureCollection,
    selected: &[usize],
    start: Position,
    current: Position,
) -> Result<FeatureCollection, EditError> {
    let distance_km = haversine_distance_km(start, current);
    let direction = bearing(start, current);

    let mut updated = data.clone();
    for (feature_index, original) in selected.iter().zip(baseline.iter()) {
        let moved = original
            .geometry
            .map_positions(|p| destination(p, distance_km, direction));
        updated = updated.with_replaced_geometry(*feature_index, moved)?;
    }
    Ok(updated)
}

impl EditMode for TranslateMode {
    fn kind(&self) -> ModeKind {
        ModeKind::Translate
    }

    fn name(&self) -> &str {
        "Verschieben"
    }

    fn status_text(&self) -> &str {
        if self.baseline.is_some() {
            "Loslassen zum Übernehmen"
        } else {
            "Selektiertes Feature ziehen"
        }
    }

    fn handle_pointer_move(&mut self, event: &PointerMoveEvent, props: &mut ModeProps<'_>) {
        self.is_translatable = self.baseline.is_some()
            || picks_selected_feature(&event.picks, props.selected_indexes);
        props
            .callbacks
            .on_update_cursor(self.is_translatable.then_some(Cursor::Move));

        if !self.is_translatable {
            return;
        }
        let Some(start) = event.pointer_down_map_coords else {
            return;
        };
        if event.is_dragging {
            if let Some(action) =
                self.translate_action(start, event.map_coords, EditType::Translating, props)
            {
                props.callbacks.on_edit(action);
            }
        }
        // Karte nicht mitschieben, solange über der Selektion gedrückt ist
        props.callbacks.stop_propagation();
    }

    fn handle_start_dragging(&mut self, _event: &StartDraggingEvent, props: &mut ModeProps<'_>) {
        if !self.is_translatable || props.selected_indexes.is_empty() {
            return;
        }
        self.baseline = Some(props.data.subset(props.selected_indexes));
        log::debug!(
            "Verschieben von {} Feature(s) gestartet",
            props.selected_indexes.len()
        );
    }

    fn handle_stop_dragging(&mut self, event: &StopDraggingEvent, props: &mut ModeProps<'_>) {
        if self.baseline.is_none() {
            return;
        }
        if let Some(action) = self.translate_action(
            event.pointer_down_map_coords,
            event.map_coords,
            EditType::Translated,
            props,
        ) {
            props.callbacks.on_edit(action);
        }
        self.baseline = None;
    }

    fn reset(&mut self) {
        self.baseline = None;
        self.is_translatable = false;
    }

    fn has_pending_input(&self) -> bool {
        self.baseline.is_some()
    }
}
