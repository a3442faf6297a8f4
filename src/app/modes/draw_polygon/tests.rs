use super::super::common::test_host::TestHost;
use super::super::EditMode;
use super::DrawPolygonMode;
use crate::app::edit_action::EditType;
use crate::app::events::{
    ClickEvent, EditHandlePick, Pick, PointerMoveEvent, SourceEvent, StartDraggingEvent,
    StopDraggingEvent,
};
use crate::core::{EditHandleType, Geometry, GuideType, RenderType};
use glam::DVec2;

fn click(x: f64, y: f64) -> ClickEvent {
    ClickEvent {
        picks: Vec::new(),
        screen_coords: DVec2::ZERO,
        map_coords: DVec2::new(x, y),
        source_event: SourceEvent::default(),
    }
}

fn click_on_handle(x: f64, y: f64, handle_index: usize) -> ClickEvent {
    let handle = EditHandlePick {
        handle_type: EditHandleType::Existing,
        feature_index: None,
        position_indexes: vec![handle_index],
    };
    ClickEvent {
        picks: vec![Pick::edit_handle(handle, Some(handle_index + 1))],
        ..click(x, y)
    }
}

fn drag_move(x: f64, y: f64) -> PointerMoveEvent {
    PointerMoveEvent {
        is_dragging: true,
        pointer_down_map_coords: Some(DVec2::ZERO),
        ..PointerMoveEvent::hover(DVec2::new(x, y))
    }
}

fn start_drag_at(x: f64, y: f64) -> StartDraggingEvent {
    StartDraggingEvent {
        picks: Vec::new(),
        screen_coords: DVec2::ZERO,
        map_coords: DVec2::new(x, y),
        source_event: SourceEvent::default(),
        pointer_down_picks: None,
        pointer_down_screen_coords: DVec2::ZERO,
        pointer_down_map_coords: DVec2::new(x, y),
    }
}

fn stop_drag_at(x: f64, y: f64) -> StopDraggingEvent {
    StopDraggingEvent {
        picks: Vec::new(),
        screen_coords: DVec2::ZERO,
        map_coords: DVec2::new(x, y),
        source_event: SourceEvent::default(),
        pointer_down_picks: None,
        pointer_down_screen_coords: DVec2::ZERO,
        pointer_down_map_coords: DVec2::ZERO,
    }
}

#[test]
fn test_click_flow_closes_polygon_on_first_handle() {
    let mut mode = DrawPolygonMode::new();
    let mut host = TestHost::new();

    mode.handle_click(&click(0.0, 0.0), &mut host.props());
    mode.handle_click(&click(0.0, 1.0), &mut host.props());
    mode.handle_click(&click(1.0, 1.0), &mut host.props());
    assert_eq!(mode.vertices().len(), 3);
    assert!(mode.has_pending_input());

    let tentative_id = mode.guides(&host.props()).tentative().and_then(|f| f.id.clone());
    assert!(tentative_id.is_some());

    mode.handle_click(&click_on_handle(0.0, 0.0, 0), &mut host.props());

    assert_eq!(host.sink.actions.len(), 1);
    let action = &host.sink.actions[0];
    assert_eq!(action.edit_type, EditType::AddFeature);
    let feature = action.updated_data.get(0).expect("neues Feature");
    assert_eq!(
        feature.geometry,
        Geometry::polygon(vec![
            DVec2::new(0.0, 0.0),
            DVec2::new(0.0, 1.0),
            DVec2::new(1.0, 1.0),
            DVec2::new(0.0, 0.0),
        ])
    );
    assert_eq!(feature.properties.render_type, Some(RenderType::Polygon));
    assert!(feature.properties.guide_type.is_none());
    assert_eq!(feature.id, tentative_id);
    assert!(!mode.has_pending_input());
}

#[test]
fn test_close_with_two_vertices_is_ignored() {
    let mut mode = DrawPolygonMode::new();
    let mut host = TestHost::new();

    mode.handle_click(&click(0.0, 0.0), &mut host.props());
    mode.handle_click(&click(0.0, 1.0), &mut host.props());
    mode.handle_click(&click_on_handle(0.0, 0.0, 0), &mut host.props());

    assert!(host.sink.actions.is_empty());
    assert_eq!(mode.vertices().len(), 2);
}

#[test]
fn test_click_on_other_handle_appends_vertex() {
    let mut mode = DrawPolygonMode::new();
    let mut host = TestHost::new();

    mode.handle_click(&click(0.0, 0.0), &mut host.props());
    mode.handle_click(&click(0.0, 1.0), &mut host.props());
    mode.handle_click(&click(1.0, 1.0), &mut host.props());
    mode.handle_click(&click_on_handle(0.0, 1.0, 1), &mut host.props());

    assert!(host.sink.actions.is_empty());
    assert_eq!(mode.vertices().len(), 4);
}

#[test]
fn test_free_draw_pixel_gate_drops_close_points() {
    let mut mode = DrawPolygonMode::new();
    let mut host = TestHost::new();
    host.is_pointer_down = true;

    mode.handle_start_dragging(&start_drag_at(0.0, 0.0), &mut host.props());
    // ~0.01 px bei Zoom 14: unter der Schwelle
    mode.handle_pointer_move(&drag_move(0.0, 0.000001), &mut host.props());
    assert_eq!(mode.vertices().len(), 1);

    // ~23 px: über der Schwelle
    mode.handle_pointer_move(&drag_move(0.0, 0.002), &mut host.props());
    assert_eq!(mode.vertices().len(), 2);
}

#[test]
fn test_mode_config_overrides_min_pixel_distance() {
    let mut mode = DrawPolygonMode::new();
    let mut host = TestHost::new();
    host.is_pointer_down = true;
    host.mode_config = serde_json::json!({ "minPixelDistance": 50.0 });

    mode.handle_start_dragging(&start_drag_at(0.0, 0.0), &mut host.props());
    mode.handle_pointer_move(&drag_move(0.0, 0.002), &mut host.props());
    assert_eq!(mode.vertices().len(), 1);
}

#[test]
fn test_free_draw_closes_on_stop_dragging() {
    let mut mode = DrawPolygonMode::new();
    let mut host = TestHost::new();
    host.is_pointer_down = true;

    mode.handle_start_dragging(&start_drag_at(0.0, 0.0), &mut host.props());
    mode.handle_pointer_move(&drag_move(0.0, 0.002), &mut host.props());
    mode.handle_pointer_move(&drag_move(0.002, 0.002), &mut host.props());
    mode.handle_pointer_move(&drag_move(0.002, 0.0), &mut host.props());

    host.is_pointer_down = false;
    mode.handle_stop_dragging(&stop_drag_at(0.002, 0.0), &mut host.props());

    assert_eq!(host.sink.actions.len(), 1);
    let ring = host.sink.actions[0]
        .updated_data
        .get(0)
        .and_then(|f| f.coordinates())
        .expect("Ring erwartet");
    assert_eq!(ring.len(), 5);
    assert_eq!(ring.first(), ring.last());
    assert!(!mode.has_pending_input());
}

#[test]
fn test_stop_dragging_without_free_draw_does_nothing() {
    let mut mode = DrawPolygonMode::new();
    let mut host = TestHost::new();

    mode.handle_click(&click(0.0, 0.0), &mut host.props());
    mode.handle_stop_dragging(&stop_drag_at(0.0, 0.0), &mut host.props());
    assert!(host.sink.actions.is_empty());
    assert_eq!(mode.vertices().len(), 1);
}

#[test]
fn test_guides_contain_handles_cursor_and_preview() {
    let mut mode = DrawPolygonMode::new();
    let mut host = TestHost::new();
    assert!(mode.guides(&host.props()).is_empty());

    mode.handle_click(&click(0.0, 0.0), &mut host.props());
    mode.handle_click(&click(0.0, 1.0), &mut host.props());
    host.last_move = Some(PointerMoveEvent::hover(DVec2::new(2.0, 2.0)));

    let guides = mode.guides(&host.props());
    // Tentative + 2 Handles + Cursor-Handle
    assert_eq!(guides.len(), 4);
    let tentative = guides.tentative().expect("Tentative erwartet");
    assert_eq!(
        tentative.geometry,
        Geometry::LineString(vec![DVec2::ZERO, DVec2::new(0.0, 1.0), DVec2::new(2.0, 2.0)])
    );
    assert_eq!(guides.edit_handles().count(), 2);
    let cursor = guides
        .features
        .iter()
        .find(|f| f.properties.guide_type == Some(GuideType::CursorEditHandle))
        .expect("Cursor-Handle erwartet");
    assert_eq!(cursor.properties.position_indexes, Some(vec![2]));
}

#[test]
fn test_guides_without_pointer_move_skip_cursor_parts() {
    let mut mode = DrawPolygonMode::new();
    let mut host = TestHost::new();
    mode.handle_click(&click(3.0, 4.0), &mut host.props());

    let guides = mode.guides(&host.props());
    assert_eq!(guides.len(), 2);
    assert_eq!(
        guides.tentative().map(|f| f.geometry.clone()),
        Some(Geometry::Point(DVec2::new(3.0, 4.0)))
    );
}

#[test]
fn test_reset_discards_tentative() {
    let mut mode = DrawPolygonMode::new();
    let mut host = TestHost::new();
    mode.handle_click(&click(0.0, 0.0), &mut host.props());
    mode.reset();
    assert!(!mode.has_pending_input());
    assert!(mode.guides(&host.props()).is_empty());
}
