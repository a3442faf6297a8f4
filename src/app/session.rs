//! Referenz-Host: hält die persistierten Daten und übersetzt Zeiger-Gesten
//! in Events für den aktiven Modus.
//!
//! Modi schlagen Änderungen nur vor; die Session entscheidet über die
//! Übernahme (Feature-Obergrenze, flache Polygone, optionale Vereinfachung)
//! und protokolliert übernommene Actions im [`ActionLog`].

use super::action_log::ActionLog;
use super::edit_action::{Cursor, EditAction, EditType};
use super::events::{
    ClickEvent, Modifiers, Pick, PointerMoveEvent, SourceEvent, StartDraggingEvent,
    StopDraggingEvent,
};
use super::guides::GuideFeatureCollection;
use super::modes::{EditMode, ModeKind, ModeManager, ModeProps, RecordingCallbacks};
use crate::core::geo_math::{is_line, nearest_point_on_segment, pixel_distance, point_in_ring};
use crate::core::viewport::zoom_or;
use crate::core::{simplify_polygon, FeatureCollection, Geometry, Position, Viewport};
use crate::shared::EditorOptions;
use glam::DVec2;
use indexmap::IndexSet;

/// Zustand zwischen Pointer-Down und Pointer-Up.
#[derive(Debug, Clone)]
struct PointerDownState {
    map_coords: Position,
    screen_coords: DVec2,
    picks: Vec<Pick>,
    /// Drag-Schwelle wurde überschritten
    is_dragging: bool,
}

/// Warum eine Action nicht übernommen wurde.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    /// Die Collection würde `max_features` überschreiten
    MaxFeaturesExceeded,
    /// Das neue Polygon ist flach (alle Punkte auf einer Linie)
    CollinearPolygon,
}

/// Editor-Sitzung mit Daten, Selektion, Viewport und Modus-Verwaltung.
pub struct EditorSession {
    data: FeatureCollection,
    /// Selektierte Feature-Indizes in Auswahl-Reihenfolge
    selection: IndexSet<usize>,
    cursor: Option<Cursor>,
    viewport: Option<Viewport>,
    options: EditorOptions,
    modes: ModeManager,
    mode_config: serde_json::Value,
    last_pointer_move: Option<PointerMoveEvent>,
    pointer_down: Option<PointerDownState>,
    /// Modifier für synthetisierte Events
    modifiers: Modifiers,
    /// Hat der Modus beim letzten Event `stop_propagation` gemeldet?
    propagation_stopped: bool,
    action_log: ActionLog,
    rejected: Vec<RejectReason>,
}

impl Default for EditorSession {
    fn default() -> Self {
        Self::new(EditorOptions::default())
    }
}

impl EditorSession {
    /// Erstellt eine leere Sitzung im View-Modus.
    pub fn new(options: EditorOptions) -> Self {
        Self {
            data: FeatureCollection::new(),
            selection: IndexSet::new(),
            cursor: None,
            viewport: None,
            options,
            modes: ModeManager::new(),
            mode_config: serde_json::Value::Null,
            last_pointer_move: None,
            pointer_down: None,
            modifiers: Modifiers::default(),
            propagation_stopped: false,
            action_log: ActionLog::new(),
            rejected: Vec::new(),
        }
    }

    // ── Zugriff ─────────────────────────────────────────────────────

    /// Persistierte Collection.
    pub fn data(&self) -> &FeatureCollection {
        &self.data
    }

    /// Ersetzt die Collection. Ungültige Selektions-Indizes fallen weg,
    /// laufende Interaktionen werden verworfen.
    pub fn set_data(&mut self, data: FeatureCollection) {
        let len = data.len();
        self.data = data;
        self.selection.retain(|&i| i < len);
        self.pointer_down = None;
        self.modes.reset_active();
        log::info!("{} Feature(s) geladen", len);
    }

    /// Aktive Editor-Optionen.
    pub fn options(&self) -> &EditorOptions {
        &self.options
    }

    /// Ersetzt die Editor-Optionen.
    pub fn set_options(&mut self, options: EditorOptions) {
        self.options = options;
    }

    /// Aktueller Viewport.
    pub fn viewport(&self) -> Option<&Viewport> {
        self.viewport.as_ref()
    }

    /// Setzt den Viewport (Zoom für Pixel-Umrechnungen, Bildschirm-Koordinaten).
    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = Some(viewport);
    }

    /// Vom Modus vorgeschlagener Cursor.
    pub fn cursor(&self) -> Option<Cursor> {
        self.cursor
    }

    /// Hat der Modus beim letzten Event das Karten-Panning unterbunden?
    pub fn propagation_stopped(&self) -> bool {
        self.propagation_stopped
    }

    /// Übernommene Actions.
    pub fn action_log(&self) -> &ActionLog {
        &self.action_log
    }

    /// Abgelehnte Actions in Reihenfolge.
    pub fn rejected(&self) -> &[RejectReason] {
        &self.rejected
    }

    /// Setzt die Modifier für alle folgenden synthetisierten Events.
    pub fn set_modifiers(&mut self, modifiers: Modifiers) {
        self.modifiers = modifiers;
    }

    // ── Modus ───────────────────────────────────────────────────────

    /// Aktiviert einen Modus mit freier Konfiguration.
    pub fn set_mode(&mut self, kind: ModeKind, mode_config: serde_json::Value) -> bool {
        if !self.modes.set_active(kind) {
            return false;
        }
        self.mode_config = mode_config;
        self.cursor = None;
        true
    }

    /// Art des aktiven Modus.
    pub fn mode_kind(&self) -> ModeKind {
        self.modes.active_kind()
    }

    /// Statuszeilen-Text des aktiven Modus.
    pub fn status_text(&self) -> &str {
        self.modes.active().status_text()
    }

    /// Hat der aktive Modus unbestätigte Eingaben?
    pub fn has_pending_input(&self) -> bool {
        self.modes.active().has_pending_input()
    }

    /// Verwirft die Interaktion des aktiven Modus (z.B. Escape).
    pub fn cancel_interaction(&mut self) {
        self.modes.reset_active();
        self.pointer_down = None;
    }

    // ── Selektion ───────────────────────────────────────────────────

    /// Selektierte Indizes in Auswahl-Reihenfolge.
    pub fn selected_indexes(&self) -> Vec<usize> {
        self.selection.iter().copied().collect()
    }

    /// Ersetzt die Selektion. Indizes außerhalb der Collection werden ignoriert.
    pub fn select(&mut self, indexes: impl IntoIterator<Item = usize>) {
        let len = self.data.len();
        self.selection = indexes.into_iter().filter(|&i| i < len).collect();
        log::debug!("Selektion: {:?}", self.selection);
    }

    /// Hebt die Selektion auf.
    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    // ── Guides & Picking ────────────────────────────────────────────

    /// Aktuelle Vorschau-Features des aktiven Modus.
    pub fn guides(&self) -> GuideFeatureCollection {
        let selected = self.selected_indexes();
        let mut sink = RecordingCallbacks::default();
        let props = ModeProps {
            data: &self.data,
            mode_config: &self.mode_config,
            selected_indexes: &selected,
            cursor: self.cursor,
            last_pointer_move_event: self.last_pointer_move.as_ref(),
            viewport: self.viewport.as_ref(),
            is_pointer_down: self.pointer_down.is_some(),
            options: &self.options,
            callbacks: &mut sink,
        };
        self.modes.active().guides(&props)
    }

    /// Hit-Test an einer Karten-Position.
    ///
    /// Edit-Handles im Pick-Radius zuerst (nächstes vorn), danach Features
    /// von oben (zuletzt hinzugefügt) nach unten.
    pub fn pick_at(&self, map_coords: Position) -> Vec<Pick> {
        let zoom = self.zoom();
        let radius = self.options.pick_radius_px;
        let guides = self.guides();

        let mut handle_hits: Vec<(f64, usize)> = guides
            .edit_handles()
            .filter_map(|(index, feature)| match feature.geometry {
                Geometry::Point(p) => {
                    let distance = pixel_distance(p, map_coords, zoom);
                    (distance <= radius).then_some((distance, index))
                }
                _ => None,
            })
            .collect();
        handle_hits.sort_by(|a, b| a.0.total_cmp(&b.0));

        let mut picks: Vec<Pick> = handle_hits
            .into_iter()
            .filter_map(|(_, index)| guides.edit_handle_pick(index))
            .collect();
        picks.extend(
            self.data
                .iter()
                .enumerate()
                .rev()
                .filter(|(_, f)| geometry_hit(&f.geometry, map_coords, zoom, radius))
                .map(|(index, _)| Pick::feature(index)),
        );
        picks
    }

    // ── Events ──────────────────────────────────────────────────────

    /// Reicht einen Klick an den aktiven Modus.
    pub fn click(&mut self, event: ClickEvent) {
        self.dispatch(|mode, props| mode.handle_click(&event, props));
    }

    /// Reicht eine Zeiger-Bewegung an den aktiven Modus.
    pub fn pointer_move(&mut self, event: PointerMoveEvent) {
        self.last_pointer_move = Some(event.clone());
        self.dispatch(|mode, props| mode.handle_pointer_move(&event, props));
    }

    /// Reicht den Drag-Start an den aktiven Modus.
    pub fn start_dragging(&mut self, event: StartDraggingEvent) {
        self.dispatch(|mode, props| mode.handle_start_dragging(&event, props));
    }

    /// Reicht das Drag-Ende an den aktiven Modus.
    pub fn stop_dragging(&mut self, event: StopDraggingEvent) {
        self.dispatch(|mode, props| mode.handle_stop_dragging(&event, props));
    }

    // ── Gesten ──────────────────────────────────────────────────────

    /// Zeiger gedrückt.
    pub fn pointer_down(&mut self, map_coords: Position) {
        self.pointer_down = Some(PointerDownState {
            map_coords,
            screen_coords: self.screen_coords(map_coords),
            picks: self.pick_at(map_coords),
            is_dragging: false,
        });
    }

    /// Zeiger bewegt (gedrückt oder nicht).
    ///
    /// Überschreitet ein gedrückter Zeiger die Drag-Schwelle, geht der
    /// Bewegung ein `StartDraggingEvent` voraus.
    pub fn pointer_move_to(&mut self, map_coords: Position) {
        let zoom = self.zoom();
        let threshold = self.options.drag_threshold_px;
        let screen_coords = self.screen_coords(map_coords);
        let picks = self.pick_at(map_coords);
        let source_event = self.source_event();

        let mut start = None;
        let mut down_info = None;
        if let Some(down) = self.pointer_down.as_mut() {
            if !down.is_dragging && pixel_distance(down.map_coords, map_coords, zoom) >= threshold
            {
                down.is_dragging = true;
                start = Some(StartDraggingEvent {
                    picks: picks.clone(),
                    screen_coords,
                    map_coords,
                    source_event,
                    pointer_down_picks: Some(down.picks.clone()),
                    pointer_down_screen_coords: down.screen_coords,
                    pointer_down_map_coords: down.map_coords,
                });
            }
            down_info = Some(down.clone());
        }

        if let Some(event) = start {
            self.start_dragging(event);
        }

        let event = match down_info {
            Some(down) => PointerMoveEvent {
                picks,
                screen_coords,
                map_coords,
                source_event,
                is_dragging: down.is_dragging,
                pointer_down_picks: Some(down.picks),
                pointer_down_screen_coords: Some(down.screen_coords),
                pointer_down_map_coords: Some(down.map_coords),
            },
            None => PointerMoveEvent {
                picks,
                screen_coords,
                source_event,
                ..PointerMoveEvent::hover(map_coords)
            },
        };
        self.pointer_move(event);
    }

    /// Zeiger losgelassen: Klick oder Drag-Ende.
    pub fn pointer_up(&mut self, map_coords: Position) {
        let Some(down) = self.pointer_down.take() else {
            return;
        };
        let picks = self.pick_at(map_coords);
        let screen_coords = self.screen_coords(map_coords);
        let source_event = self.source_event();

        if down.is_dragging {
            self.stop_dragging(StopDraggingEvent {
                picks,
                screen_coords,
                map_coords,
                source_event,
                pointer_down_picks: Some(down.picks),
                pointer_down_screen_coords: down.screen_coords,
                pointer_down_map_coords: down.map_coords,
            });
        } else {
            self.click(ClickEvent {
                picks,
                screen_coords,
                map_coords,
                source_event,
            });
        }
    }

    /// Klick ohne Bewegung an einer Position.
    pub fn tap(&mut self, map_coords: Position) {
        self.pointer_down(map_coords);
        self.pointer_up(map_coords);
    }

    // ── intern ──────────────────────────────────────────────────────

    fn zoom(&self) -> f64 {
        zoom_or(self.viewport.as_ref(), self.options.default_zoom)
    }

    fn screen_coords(&self, map_coords: Position) -> DVec2 {
        self.viewport
            .map(|v| v.project(map_coords))
            .unwrap_or(DVec2::ZERO)
    }

    fn source_event(&self) -> SourceEvent {
        SourceEvent {
            modifiers: self.modifiers,
        }
    }

    /// Baut `ModeProps` aus dem Session-Zustand, ruft den Modus auf und
    /// übernimmt danach Cursor, Propagation-Flag und Actions.
    fn dispatch(&mut self, handle: impl FnOnce(&mut dyn EditMode, &mut ModeProps<'_>)) {
        let selected = self.selected_indexes();
        let mut sink = RecordingCallbacks::default();
        {
            let mut props = ModeProps {
                data: &self.data,
                mode_config: &self.mode_config,
                selected_indexes: &selected,
                cursor: self.cursor,
                last_pointer_move_event: self.last_pointer_move.as_ref(),
                viewport: self.viewport.as_ref(),
                is_pointer_down: self.pointer_down.is_some(),
                options: &self.options,
                callbacks: &mut sink,
            };
            handle(self.modes.active_mut(), &mut props);
        }

        if let Some(&cursor) = sink.cursor_updates.last() {
            self.cursor = cursor;
        }
        self.propagation_stopped = sink.propagation_stopped;
        for action in sink.actions {
            self.apply_action(action);
        }
    }

    /// Prüft und übernimmt eine Action. Gibt `false` zurück, wenn sie
    /// abgelehnt wurde.
    pub fn apply_action(&mut self, mut action: EditAction) -> bool {
        if let Err(reason) = self.check_action(&action) {
            log::warn!("{} abgelehnt: {:?}", action.edit_type, reason);
            self.rejected.push(reason);
            return false;
        }

        if action.edit_type == EditType::AddFeature && self.options.simplify_on_add {
            self.simplify_added(&mut action);
        }

        if action.edit_type.is_intermediate() {
            log::debug!("{} übernommen", action.edit_type);
        } else {
            log::info!(
                "{} übernommen ({} Feature(s))",
                action.edit_type,
                action.updated_data.len()
            );
        }
        self.action_log.record(&action);
        self.data = action.updated_data;
        true
    }

    fn check_action(&self, action: &EditAction) -> Result<(), RejectReason> {
        let new_len = action.updated_data.len();
        if let Some(max) = self.options.max_features {
            if new_len > max && new_len > self.data.len() {
                return Err(RejectReason::MaxFeaturesExceeded);
            }
        }
        if action.edit_type == EditType::AddFeature && self.options.reject_collinear_polygons {
            let flat = added_index(action)
                .and_then(|i| action.updated_data.get(i))
                .is_some_and(|f| match &f.geometry {
                    Geometry::Polygon(rings) => rings.first().is_some_and(|ring| is_line(ring)),
                    _ => false,
                });
            if flat {
                return Err(RejectReason::CollinearPolygon);
            }
        }
        Ok(())
    }

    /// Vereinfacht das neu hinzugefügte Polygon zoom-abhängig.
    fn simplify_added(&self, action: &mut EditAction) {
        let Some(index) = added_index(action) else {
            return;
        };
        let Some(Geometry::Polygon(rings)) = action.updated_data.get(index).map(|f| &f.geometry)
        else {
            return;
        };
        let Some(ring) = rings.first() else {
            return;
        };
        let open = &ring[..ring.len().saturating_sub(1)];
        let simplified = simplify_polygon(
            open,
            self.zoom(),
            self.options.simplify_max_vertices,
            &self.options.simplify,
        );
        if simplified.len() < 4 {
            log::debug!("Vereinfachung verworfen ({} Positionen)", simplified.len());
            return;
        }
        let before = ring.len();
        let after = simplified.len();
        match action
            .updated_data
            .with_replaced_geometry(index, Geometry::polygon(simplified))
        {
            Ok(updated) => {
                log::info!("Polygon vereinfacht: {} → {} Positionen", before, after);
                action.updated_data = updated;
            }
            Err(e) => log::warn!("Vereinfachung fehlgeschlagen: {}", e),
        }
    }
}

/// Index des neu hinzugefügten Features einer `ADD_FEATURE`-Action.
fn added_index(action: &EditAction) -> Option<usize> {
    action
        .edit_context
        .as_ref()
        .and_then(|c| c.feature_indexes.first().copied())
        .or_else(|| action.updated_data.len().checked_sub(1))
}

/// Trifft `map_coords` die Geometrie (Pick-Radius in Pixeln)?
fn geometry_hit(geometry: &Geometry, map_coords: Position, zoom: f64, radius_px: f64) -> bool {
    let near_path = |path: &[Position]| {
        path.windows(2).any(|w| {
            let nearest = nearest_point_on_segment(w[0], w[1], map_coords);
            pixel_distance(nearest, map_coords, zoom) <= radius_px
        })
    };
    match geometry {
        Geometry::Point(p) => pixel_distance(*p, map_coords, zoom) <= radius_px,
        Geometry::LineString(line) => near_path(line),
        Geometry::Polygon(rings) => {
            let Some((outer, holes)) = rings.split_first() else {
                return false;
            };
            let inside = point_in_ring(map_coords, outer)
                && !holes.iter().any(|hole| point_in_ring(map_coords, hole));
            inside || rings.iter().any(|ring| near_path(ring))
        }
    }
}
