//! Integrationstests für die Edit-Modi über die EditorSession:
//! - Polygon per Klick und Freihand
//! - 90°-Polygon mit rechtwinkliger Schluss-Ecke
//! - Verschieben der Selektion
//! - Vertex-Bearbeitung (Verschieben, Einfügen, Entfernen)
//! - Übernahme-Regeln (Feature-Obergrenze)

use approx::assert_relative_eq;
use geo_draw_editor::app::{Modifiers, RejectReason};
use geo_draw_editor::{
    EditType, EditorOptions, EditorSession, Feature, FeatureCollection, FeatureProperties,
    Geometry, ModeKind, RenderType,
};
use glam::DVec2;

fn session_in(mode: ModeKind) -> EditorSession {
    let mut session = EditorSession::default();
    assert!(session.set_mode(mode, serde_json::Value::Null));
    session
}

/// Bewegt den Zeiger an die Position und klickt dort.
fn tap(session: &mut EditorSession, at: DVec2) {
    session.pointer_move_to(at);
    session.tap(at);
}

/// Drückt bei `path[0]`, zieht über alle Punkte und lässt beim letzten los.
fn drag(session: &mut EditorSession, path: &[DVec2]) {
    session.pointer_move_to(path[0]);
    session.pointer_down(path[0]);
    for &at in &path[1..] {
        session.pointer_move_to(at);
    }
    session.pointer_up(path[path.len() - 1]);
}

fn ring(session: &EditorSession, index: usize) -> Vec<DVec2> {
    session
        .data()
        .get(index)
        .and_then(|f| f.coordinates())
        .expect("Feature mit Ring erwartet")
}

fn square(origin: DVec2, size: f64) -> Feature {
    Feature::new(
        Geometry::polygon(vec![
            origin,
            origin + DVec2::new(0.0, size),
            origin + DVec2::new(size, size),
            origin + DVec2::new(size, 0.0),
            origin,
        ]),
        FeatureProperties::with_render_type(RenderType::Polygon),
    )
}

// ─── Polygon zeichnen ────────────────────────────────────────────────────────

#[test]
fn test_click_polygon_closes_on_first_vertex() {
    let mut session = session_in(ModeKind::DrawPolygon);

    tap(&mut session, DVec2::new(0.0, 0.0));
    tap(&mut session, DVec2::new(0.0, 1.0));
    tap(&mut session, DVec2::new(1.0, 1.0));
    assert!(session.has_pending_input());
    assert!(session.data().is_empty());

    tap(&mut session, DVec2::new(0.0, 0.0));

    assert_eq!(session.data().len(), 1);
    assert_eq!(
        ring(&session, 0),
        vec![
            DVec2::new(0.0, 0.0),
            DVec2::new(0.0, 1.0),
            DVec2::new(1.0, 1.0),
            DVec2::new(0.0, 0.0),
        ]
    );
    assert_eq!(
        session.action_log().last().map(|e| e.edit_type),
        Some(EditType::AddFeature)
    );
    assert!(!session.has_pending_input());
}

#[test]
fn test_free_draw_polygon_respects_pixel_gate() {
    let mut session = session_in(ModeKind::DrawPolygon);

    drag(
        &mut session,
        &[
            DVec2::new(0.0, 0.0),
            DVec2::new(0.0, 0.002),
            // Bruchteil eines Pixels weiter: fällt unter den Mindestabstand
            DVec2::new(0.0, 0.00201),
            DVec2::new(0.002, 0.002),
            DVec2::new(0.002, 0.0),
        ],
    );

    assert_eq!(session.data().len(), 1, "Freihand-Polygon muss übernommen sein");
    let ring = ring(&session, 0);
    assert_eq!(ring.len(), 5);
    assert_eq!(ring.first(), ring.last());
    assert!(!ring.contains(&DVec2::new(0.0, 0.00201)));
}

#[test]
fn test_mode_switch_discards_tentative_polygon() {
    let mut session = session_in(ModeKind::DrawPolygon);
    tap(&mut session, DVec2::new(0.0, 0.0));
    tap(&mut session, DVec2::new(0.0, 1.0));
    assert!(session.has_pending_input());

    session.set_mode(ModeKind::View, serde_json::Value::Null);
    session.set_mode(ModeKind::DrawPolygon, serde_json::Value::Null);
    assert!(!session.has_pending_input());
    assert!(session.guides().is_empty());
}

// ─── 90°-Polygon ─────────────────────────────────────────────────────────────

#[test]
fn test_90_degree_polygon_gets_right_angle_corner() {
    let mut session = session_in(ModeKind::Draw90DegreePolygon);
    let a = DVec2::new(0.0, 0.0);

    tap(&mut session, a);
    tap(&mut session, DVec2::new(0.0, 0.002));
    tap(&mut session, DVec2::new(0.002, 0.0016));
    tap(&mut session, DVec2::new(0.002, 0.0006));
    assert!(session.data().is_empty());

    tap(&mut session, a);

    assert_eq!(session.data().len(), 1);
    let ring = ring(&session, 0);
    // A, B, C, D, Ecke, A
    assert_eq!(ring.len(), 6);
    assert_eq!(ring.first(), Some(&a));
    assert_eq!(ring.last(), Some(&a));
    assert_relative_eq!(ring[2].x, 0.002, epsilon = 1e-6);
    assert_relative_eq!(ring[2].y, 0.002, epsilon = 1e-6);
    assert_relative_eq!(ring[4].x, ring[3].x, epsilon = 1e-6);
    assert_relative_eq!(ring[4].y, 0.0, epsilon = 1e-6);
}

// ─── Verschieben ─────────────────────────────────────────────────────────────

#[test]
fn test_translate_moves_selection_by_same_displacement() {
    let mut session = session_in(ModeKind::Translate);
    session.set_data(FeatureCollection::from_features([
        square(DVec2::new(8.0, 47.0), 0.01),
        square(DVec2::new(8.05, 47.0), 0.01),
        square(DVec2::new(9.0, 48.0), 0.01),
    ]));
    session.select([0, 1]);
    let untouched = session.data().get(2).cloned();

    let from = DVec2::new(8.005, 47.005);
    let to = DVec2::new(8.025, 47.015);
    session.pointer_move_to(from);
    session.pointer_down(from);
    session.pointer_move_to(DVec2::new(8.015, 47.01));
    assert!(session.propagation_stopped(), "Karte darf beim Verschieben nicht mitlaufen");
    session.pointer_move_to(to);
    session.pointer_up(to);

    let types: Vec<_> = session
        .action_log()
        .entries()
        .iter()
        .map(|e| e.edit_type)
        .collect();
    assert_eq!(types.last(), Some(&EditType::Translated));
    assert!(types.contains(&EditType::Translating));

    let delta0 = ring(&session, 0)[0] - DVec2::new(8.0, 47.0);
    let delta1 = ring(&session, 1)[0] - DVec2::new(8.05, 47.0);
    assert_relative_eq!(delta0.x, 0.02, epsilon = 1e-4);
    assert_relative_eq!(delta0.y, 0.01, epsilon = 1e-4);
    assert_relative_eq!(delta0.x, delta1.x, epsilon = 1e-4);
    assert_relative_eq!(delta0.y, delta1.y, epsilon = 1e-4);
    assert_eq!(session.data().get(2).cloned(), untouched);
}

#[test]
fn test_translate_without_selection_changes_nothing() {
    let mut session = session_in(ModeKind::Translate);
    session.set_data(FeatureCollection::from_features([square(
        DVec2::new(8.0, 47.0),
        0.01,
    )]));
    let before = session.data().clone();

    drag(
        &mut session,
        &[DVec2::new(8.005, 47.005), DVec2::new(8.05, 47.05)],
    );

    assert_eq!(session.data(), &before);
    assert!(session.action_log().is_empty());
}

// ─── Vertex-Bearbeitung ──────────────────────────────────────────────────────

#[test]
fn test_modify_drag_vertex_then_insert_and_remove() {
    let mut session = session_in(ModeKind::Modify);
    session.set_data(FeatureCollection::from_features([square(DVec2::ZERO, 0.01)]));
    session.select([0]);

    // Ecke (0.01, 0.01) nach (0.015, 0.012) ziehen
    drag(
        &mut session,
        &[DVec2::new(0.01, 0.01), DVec2::new(0.012, 0.011), DVec2::new(0.015, 0.012)],
    );
    assert_eq!(
        session.action_log().last().map(|e| e.edit_type),
        Some(EditType::FinishMovePosition)
    );
    assert_eq!(ring(&session, 0)[2], DVec2::new(0.015, 0.012));

    // Auf der linken Kante einfügen
    let on_edge = DVec2::new(0.00002, 0.005);
    tap(&mut session, on_edge);
    assert_eq!(
        session.action_log().last().map(|e| e.edit_type),
        Some(EditType::AddPosition)
    );
    let ring_after_insert = ring(&session, 0);
    assert_eq!(ring_after_insert.len(), 6);
    assert_eq!(ring_after_insert[1], DVec2::new(0.0, 0.005));

    // Alt-Klick entfernt den eingefügten Punkt wieder
    session.set_modifiers(Modifiers {
        alt: true,
        ..Modifiers::default()
    });
    tap(&mut session, DVec2::new(0.0, 0.005));
    assert_eq!(
        session.action_log().last().map(|e| e.edit_type),
        Some(EditType::RemovePosition)
    );
    assert_eq!(ring(&session, 0).len(), 5);
}

// ─── Übernahme-Regeln ────────────────────────────────────────────────────────

#[test]
fn test_max_features_rejects_additional_polygon() {
    let mut session = EditorSession::new(EditorOptions {
        max_features: Some(1),
        ..EditorOptions::default()
    });
    session.set_mode(ModeKind::DrawPolygon, serde_json::Value::Null);

    for origin in [DVec2::new(0.0, 0.0), DVec2::new(5.0, 5.0)] {
        tap(&mut session, origin);
        tap(&mut session, origin + DVec2::new(0.0, 1.0));
        tap(&mut session, origin + DVec2::new(1.0, 1.0));
        tap(&mut session, origin);
    }

    assert_eq!(session.data().len(), 1);
    assert_eq!(session.rejected(), &[RejectReason::MaxFeaturesExceeded]);
}
