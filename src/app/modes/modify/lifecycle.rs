//! Lifecycle-Methoden des ModifyMode (EditMode-Implementierung).

use super::super::{EditMode, ModeKind, ModeProps};
use super::{moved_data, position_action, DragState, ModifyMode};
use crate::app::edit_action::{Cursor, EditType};
use crate::app::events::{
    picked_edit_handle, ClickEvent, EditHandlePick, Pick, PointerMoveEvent, StartDraggingEvent,
    StopDraggingEvent,
};
use crate::app::guides::{
    edit_handle, edit_handles_for_geometry, tentative_feature, GuideFeatureCollection,
};
use crate::core::{EditHandleType, RenderType};

/// Existierendes Handle eines selektierten Features unter dem Zeiger.
fn picked_existing_handle<'p>(
    picks: &'p [Pick],
    selected: &[usize],
) -> Option<(usize, &'p EditHandlePick)> {
    let handle = picked_edit_handle(picks)?;
    let feature_index = handle.feature_index?;
    (handle.handle_type == EditHandleType::Existing && selected.contains(&feature_index))
        .then_some((feature_index, handle))
}

impl EditMode for ModifyMode {
    fn kind(&self) -> ModeKind {
        ModeKind::Modify
    }

    fn name(&self) -> &str {
        "Bearbeiten"
    }

    fn status_text(&self) -> &str {
        if self.drag.is_some() {
            "Loslassen zum Übernehmen"
        } else {
            "Punkt ziehen, Kante klicken zum Einfügen, Alt+Klick zum Löschen"
        }
    }

    fn handle_pointer_move(&mut self, event: &PointerMoveEvent, props: &mut ModeProps<'_>) {
        if let Some(drag) = self.drag.as_mut() {
            if event.is_dragging {
                match moved_data(
                    props.data,
                    drag.feature_index,
                    &drag.position_indexes,
                    event.map_coords,
                ) {
                    Ok(data) => {
                        if let Some(feature) = data.get(drag.feature_index) {
                            drag.preview = feature.geometry.clone();
                        }
                    }
                    Err(e) => log::warn!("Vorschau beim Verschieben fehlgeschlagen: {}", e),
                }
                props.callbacks.stop_propagation();
            }
            return;
        }

        let over_existing =
            picked_existing_handle(&event.picks, props.selected_indexes).is_some();
        self.intermediate = if over_existing || event.is_dragging {
            None
        } else {
            self.find_intermediate(event.map_coords, props)
        };

        let hovering = over_existing || self.intermediate.is_some();
        props
            .callbacks
            .on_update_cursor(hovering.then_some(Cursor::Pointer));
    }

    fn handle_click(&mut self, event: &ClickEvent, props: &mut ModeProps<'_>) {
        let Some(handle) = picked_edit_handle(&event.picks) else {
            return;
        };
        let Some(feature_index) = handle.feature_index else {
            return;
        };
        if !props.selected_indexes.contains(&feature_index) {
            return;
        }
        let position_indexes = handle.position_indexes.clone();

        match handle.handle_type {
            EditHandleType::Intermediate => {
                let position = self
                    .intermediate
                    .take()
                    .filter(|p| {
                        p.feature_index == feature_index && p.position_indexes == position_indexes
                    })
                    .map_or(event.map_coords, |p| p.position);
                match props
                    .data
                    .with_added_position(feature_index, &position_indexes, position)
                {
                    Ok(updated) => {
                        log::debug!(
                            "Position {:?} in Feature {} eingefügt",
                            position_indexes,
                            feature_index
                        );
                        props.callbacks.on_edit(position_action(
                            updated,
                            EditType::AddPosition,
                            feature_index,
                            position_indexes,
                            Some(position),
                        ));
                    }
                    Err(e) => log::warn!("Einfügen fehlgeschlagen: {}", e),
                }
            }
            EditHandleType::Existing if event.source_event.modifiers.alt => {
                let Some(feature) = props.data.get(feature_index) else {
                    return;
                };
                if feature.properties.render_type == Some(RenderType::Rectangle) {
                    log::debug!("Rechteck-Ecken werden nicht entfernt");
                    return;
                }
                let removed = feature.geometry.position_at(&position_indexes);
                match props
                    .data
                    .with_removed_position(feature_index, &position_indexes)
                {
                    Ok(updated) => props.callbacks.on_edit(position_action(
                        updated,
                        EditType::RemovePosition,
                        feature_index,
                        position_indexes,
                        removed,
                    )),
                    Err(e) => log::warn!("Entfernen fehlgeschlagen: {}", e),
                }
            }
            _ => {}
        }
    }

    fn handle_start_dragging(&mut self, event: &StartDraggingEvent, props: &mut ModeProps<'_>) {
        let picks = event.pointer_down_picks.as_deref().unwrap_or(&event.picks);
        let Some((feature_index, handle)) = picked_existing_handle(picks, props.selected_indexes)
        else {
            return;
        };
        let Some(feature) = props.data.get(feature_index) else {
            return;
        };
        log::debug!(
            "Verschieben von Position {:?} in Feature {} gestartet",
            handle.position_indexes,
            feature_index
        );
        self.drag = Some(DragState {
            feature_index,
            position_indexes: handle.position_indexes.clone(),
            preview: feature.geometry.clone(),
        });
        self.intermediate = None;
        props.callbacks.stop_propagation();
    }

    fn handle_stop_dragging(&mut self, event: &StopDraggingEvent, props: &mut ModeProps<'_>) {
        let Some(drag) = self.drag.take() else {
            return;
        };
        match moved_data(
            props.data,
            drag.feature_index,
            &drag.position_indexes,
            event.map_coords,
        ) {
            Ok(updated) => props.callbacks.on_edit(position_action(
                updated,
                EditType::FinishMovePosition,
                drag.feature_index,
                drag.position_indexes,
                Some(event.map_coords),
            )),
            Err(e) => log::warn!("Verschieben fehlgeschlagen: {}", e),
        }
    }

    fn guides(&self, props: &ModeProps<'_>) -> GuideFeatureCollection {
        let mut guides = GuideFeatureCollection::new();

        for &feature_index in props.selected_indexes {
            let Some(feature) = props.data.get(feature_index) else {
                continue;
            };
            let geometry = match self.drag.as_ref() {
                Some(drag) if drag.feature_index == feature_index => {
                    let render_type = feature.properties.render_type.unwrap_or(RenderType::Polygon);
                    guides
                        .features
                        .push(tentative_feature(drag.preview.clone(), render_type));
                    &drag.preview
                }
                _ => &feature.geometry,
            };
            guides.features.extend(edit_handles_for_geometry(
                geometry,
                Some(feature_index),
                EditHandleType::Existing,
            ));
        }

        if let Some(point) = self.intermediate.as_ref() {
            guides.features.push(edit_handle(
                point.position,
                EditHandleType::Intermediate,
                Some(point.feature_index),
                point.position_indexes.clone(),
            ));
        }
        guides
    }

    fn reset(&mut self) {
        self.intermediate = None;
        self.drag = None;
    }

    fn has_pending_input(&self) -> bool {
        self.drag.is_some()
    }
}
