//! Douglas-Peucker-Vereinfachung für Linienzüge und Polygon-Ringe.

use super::geometry::Position;
use serde::{Deserialize, Serialize};

/// Parameter der zoom-adaptiven Polygon-Vereinfachung.
///
/// Toleranz = `base_tolerance * zoom_scale^(zoom - reference_zoom)`; ist das
/// Ergebnis zu lang, wird mit `toleranz + i * tolerance_step` erneut vereinfacht.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimplifyOptions {
    /// Basis-Toleranz in Grad bei `reference_zoom`
    pub base_tolerance: f64,
    /// Zoom, bei dem die Basis-Toleranz gilt
    pub reference_zoom: f64,
    /// Skalierungsfaktor pro Zoomstufe
    pub zoom_scale: f64,
    /// Toleranz-Zuwachs pro Wiederholung
    pub tolerance_step: f64,
    /// Maximale Anzahl Wiederholungen
    pub max_attempts: u32,
}

impl Default for SimplifyOptions {
    fn default() -> Self {
        Self {
            base_tolerance: 1e-4,
            reference_zoom: 12.0,
            zoom_scale: 0.75,
            tolerance_step: 1e-4,
            max_attempts: 15,
        }
    }
}

impl SimplifyOptions {
    /// Start-Toleranz für den gegebenen Zoom.
    pub fn tolerance_at_zoom(&self, zoom: f64) -> f64 {
        self.base_tolerance * self.zoom_scale.powf(zoom - self.reference_zoom)
    }
}

/// Senkrechter Abstand von `p` zur Geraden durch `a` und `b`.
///
/// Fallen `a` und `b` zusammen, wird der Abstand zu `a` verwendet.
fn perpendicular_distance(p: Position, a: Position, b: Position) -> f64 {
    let chord = b - a;
    let len = chord.length();
    if len == 0.0 {
        return p.distance(a);
    }
    (p - a).perp_dot(chord).abs() / len
}

/// Rekursive Douglas-Peucker-Reduktion.
///
/// Bis zu zwei Punkte bleiben unverändert. Punkte mit Abstand ≥ `tolerance`
/// zur Sehne bleiben erhalten.
pub fn douglas_peucker(points: &[Position], tolerance: f64) -> Vec<Position> {
    if points.len() <= 2 {
        return points.to_vec();
    }
    let first = points[0];
    let last = points[points.len() - 1];

    let mut max_distance = -1.0;
    let mut max_index = 0;
    for (i, &p) in points.iter().enumerate().take(points.len() - 1).skip(1) {
        let distance = perpendicular_distance(p, first, last);
        if distance > max_distance {
            max_distance = distance;
            max_index = i;
        }
    }

    if max_distance >= tolerance {
        let mut left = douglas_peucker(&points[..=max_index], tolerance);
        let right = douglas_peucker(&points[max_index..], tolerance);
        // Pivot steckt in beiden Hälften
        left.pop();
        left.extend(right);
        left
    } else {
        vec![first, last]
    }
}

/// Vereinfacht einen Pfad und schließt ihn wieder zum Ring.
///
/// Weicht der letzte Ergebnispunkt vom ersten Eingabepunkt ab, wird dieser
/// angehängt.
pub fn simplify_path(points: &[Position], tolerance: f64) -> Vec<Position> {
    let mut simplified = douglas_peucker(points, tolerance);
    if let Some(&first) = points.first() {
        if simplified.last() != Some(&first) {
            simplified.push(first);
        }
    }
    simplified
}

/// Zoom-adaptive Polygon-Vereinfachung mit Längenbegrenzung.
///
/// Liefert den letzten Versuch, auch wenn er `max_vertices` noch überschreitet.
pub fn simplify_polygon(
    points: &[Position],
    zoom: f64,
    max_vertices: usize,
    options: &SimplifyOptions,
) -> Vec<Position> {
    let tolerance = options.tolerance_at_zoom(zoom);
    let mut reduced = simplify_path(points, tolerance);

    let mut attempt = 0;
    while attempt < options.max_attempts && reduced.len() > max_vertices {
        attempt += 1;
        reduced = simplify_path(points, tolerance + f64::from(attempt) * options.tolerance_step);
    }
    log::debug!(
        "Polygon vereinfacht: {} → {} Punkte ({} Wiederholungen)",
        points.len(),
        reduced.len(),
        attempt
    );
    reduced
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use glam::DVec2;

    fn pts(raw: &[[f64; 2]]) -> Vec<Position> {
        raw.iter().map(|&[x, y]| DVec2::new(x, y)).collect()
    }

    #[test]
    fn short_inputs_are_unchanged() {
        let two = pts(&[[0.0, 0.0], [1.0, 1.0]]);
        assert_eq!(douglas_peucker(&two, 10.0), two);
        assert!(douglas_peucker(&[], 1.0).is_empty());
    }

    #[test]
    fn removes_point_close_to_chord() {
        let input = pts(&[[0.0, 0.0], [0.0, 1.0], [0.0, 2.0], [1.0, 2.0]]);
        let simplified = douglas_peucker(&input, 0.5);
        assert_eq!(simplified, pts(&[[0.0, 0.0], [0.0, 2.0], [1.0, 2.0]]));

        let closed = simplify_path(&input, 0.5);
        assert_eq!(closed, pts(&[[0.0, 0.0], [0.0, 2.0], [1.0, 2.0], [0.0, 0.0]]));
    }

    #[test]
    fn zero_tolerance_keeps_all_but_exactly_collinear_points() {
        let input = pts(&[[0.0, 0.0], [1.0, 0.5], [2.0, 0.0], [3.0, 0.0], [4.0, 1.0]]);
        let simplified = douglas_peucker(&input, 0.0);
        // Bei Toleranz 0 bleibt auch (3,0) erhalten (Abstand ≥ 0)
        assert_eq!(simplified, input);

        let tiny = douglas_peucker(&input, 1e-12);
        assert_eq!(tiny, pts(&[[0.0, 0.0], [1.0, 0.5], [2.0, 0.0], [3.0, 0.0], [4.0, 1.0]]));

        let collinear = pts(&[[0.0, 0.0], [1.0, 1.0], [2.0, 2.0]]);
        assert_eq!(douglas_peucker(&collinear, 1e-12), pts(&[[0.0, 0.0], [2.0, 2.0]]));
    }

    #[test]
    fn simplification_is_idempotent() {
        let input = pts(&[
            [0.0, 0.0],
            [0.1, 0.02],
            [0.2, 0.0],
            [0.3, 0.5],
            [0.4, 0.48],
            [0.5, 0.0],
            [0.0, 0.0],
        ]);
        let once = simplify_path(&input, 0.05);
        let twice = simplify_path(&once, 0.05);
        assert_eq!(once, twice);
        assert_eq!(once.first(), once.last());
    }

    #[test]
    fn degenerate_chord_uses_distance_to_start() {
        // Geschlossener Ring: Sehne hat Länge 0
        let ring = pts(&[[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 0.0]]);
        let simplified = simplify_path(&ring, 0.1);
        assert_eq!(simplified, ring);
        assert!(simplified.iter().all(|p| p.x.is_finite() && p.y.is_finite()));
    }

    #[test]
    fn polygon_tolerance_scales_with_zoom() {
        let options = SimplifyOptions::default();
        assert_relative_eq!(options.tolerance_at_zoom(12.0), 1e-4);
        assert_relative_eq!(options.tolerance_at_zoom(13.0), 0.75e-4);
        assert_relative_eq!(options.tolerance_at_zoom(11.0), 1e-4 / 0.75);
    }

    #[test]
    fn simplify_polygon_respects_max_vertices() {
        // Zickzack mit Amplitude 2e-4: bei Zoom 12 bleibt alles erhalten
        let mut input: Vec<Position> = (0..40)
            .map(|i| DVec2::new(f64::from(i) * 1e-3, if i % 2 == 0 { 0.0 } else { 2e-4 }))
            .collect();
        input.push(input[0]);
        let options = SimplifyOptions::default();

        let unlimited = simplify_polygon(&input, 12.0, usize::MAX, &options);
        assert_eq!(unlimited.len(), input.len());

        let limited = simplify_polygon(&input, 12.0, 10, &options);
        assert!(limited.len() <= 10);
        assert_eq!(limited.first(), limited.last());
    }
}
