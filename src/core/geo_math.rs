//! Rein-mathematische Geometrie-Hilfsfunktionen auf geographischen Positionen.
//!
//! Geodätische Funktionen rechnen auf einer Kugel (keine Ellipsoid-Korrektur);
//! ebene Funktionen behandeln Längen-/Breitengrad direkt als x/y.

use super::geometry::{Geometry, Position};
use glam::DVec2;

/// Mittlerer Erdradius in Kilometern.
pub const EARTH_RADIUS_KM: f64 = 6371.0088;
/// Meilen pro Pixel bei Zoom 0 (Web-Mercator-Kachelgröße 512, Äquator).
pub const MILES_PER_PIXEL_AT_ZOOM_0: f64 = 97.2618456;

/// Geodätische Distanz in Meilen (sphärischer Kosinussatz).
///
/// Identische Punkte liefern exakt 0.
pub fn distance_in_miles(p1: Position, p2: Position) -> f64 {
    if p1 == p2 {
        return 0.0;
    }
    let lat1 = p1.y.to_radians();
    let lat2 = p2.y.to_radians();
    let theta = (p1.x - p2.x).to_radians();

    let cos_dist = lat1.sin() * lat2.sin() + lat1.cos() * lat2.cos() * theta.cos();
    let dist = cos_dist.min(1.0).acos().to_degrees();
    // 1 Bogenminute = 1 Seemeile = 1.1515 Landmeilen
    dist * 60.0 * 1.1515
}

/// Rechnet eine Distanz in Meilen in Bildschirm-Pixel beim gegebenen Zoom um.
pub fn miles_to_pixels(zoom: f64, miles: f64) -> f64 {
    2f64.powf(zoom) * miles / MILES_PER_PIXEL_AT_ZOOM_0
}

/// Rechnet Pixel beim gegebenen Zoom in Meilen um (Umkehrung von [`miles_to_pixels`]).
pub fn pixels_to_miles(zoom: f64, pixels: f64) -> f64 {
    pixels * MILES_PER_PIXEL_AT_ZOOM_0 / 2f64.powf(zoom)
}

/// Pixel-Abstand zweier Positionen beim gegebenen Zoom.
pub fn pixel_distance(p1: Position, p2: Position, zoom: f64) -> f64 {
    miles_to_pixels(zoom, distance_in_miles(p1, p2))
}

/// Großkreis-Distanz in Kilometern (Haversine).
pub fn haversine_distance_km(p1: Position, p2: Position) -> f64 {
    let d_lat = (p2.y - p1.y).to_radians();
    let d_lon = (p2.x - p1.x).to_radians();
    let lat1 = p1.y.to_radians();
    let lat2 = p2.y.to_radians();

    let a = (d_lat / 2.0).sin().powi(2) + (d_lon / 2.0).sin().powi(2) * lat1.cos() * lat2.cos();
    2.0 * a.sqrt().atan2((1.0 - a).sqrt()) * EARTH_RADIUS_KM
}

/// Anfangs-Kurswinkel von `p1` nach `p2` in Grad, Bereich (-180, 180].
pub fn bearing(p1: Position, p2: Position) -> f64 {
    let lon1 = p1.x.to_radians();
    let lon2 = p2.x.to_radians();
    let lat1 = p1.y.to_radians();
    let lat2 = p2.y.to_radians();

    let a = (lon2 - lon1).sin() * lat2.cos();
    let b = lat1.cos() * lat2.sin() - lat1.sin() * lat2.cos() * (lon2 - lon1).cos();
    a.atan2(b).to_degrees()
}

/// Normalisiert einen Winkel in Grad auf (-180, 180].
pub fn normalize_bearing(degrees: f64) -> f64 {
    let wrapped = degrees.rem_euclid(360.0);
    if wrapped > 180.0 {
        wrapped - 360.0
    } else {
        wrapped
    }
}

/// Zielpunkt nach `distance_km` Kilometern auf Kurs `bearing_deg` (Großkreis).
pub fn destination(origin: Position, distance_km: f64, bearing_deg: f64) -> Position {
    let lon1 = origin.x.to_radians();
    let lat1 = origin.y.to_radians();
    let bearing = bearing_deg.to_radians();
    let delta = distance_km / EARTH_RADIUS_KM;

    let lat2 = (lat1.sin() * delta.cos() + lat1.cos() * delta.sin() * bearing.cos()).asin();
    let lon2 = lon1
        + (bearing.sin() * delta.sin() * lat1.cos()).atan2(delta.cos() - lat1.sin() * lat2.sin());

    DVec2::new(lon2.to_degrees(), lat2.to_degrees())
}

/// Prüft ob `p` im achsenparallelen Rechteck zwischen `p1` und `p2` liegt (inkl. Rand).
pub fn in_bounds(p1: Position, p2: Position, p: Position) -> bool {
    let min = p1.min(p2);
    let max = p1.max(p2);
    p.x >= min.x && p.x <= max.x && p.y >= min.y && p.y <= max.y
}

/// Lotfußpunkt von `p` auf die Gerade durch `p1`/`p2`, sofern er im Segment liegt.
///
/// `None` wenn der Lotfußpunkt außerhalb des Segments liegt.
pub fn closest_point_on_segment(p1: Position, p2: Position, p: Position) -> Option<Position> {
    let dir = p2 - p1;
    let len_sq = dir.length_squared();
    if len_sq == 0.0 {
        return (p == p1).then_some(p1);
    }
    let t = (p - p1).dot(dir) / len_sq;
    let q = p1 + dir * t;
    in_bounds(p1, p2, q).then_some(q)
}

/// Geodätische Distanz (km) von `p` zum Segment `a`–`b`.
///
/// Der nächste Segmentpunkt wird eben bestimmt (auf das Segment geklemmt),
/// die Distanz dann per Haversine gemessen.
pub fn point_to_segment_distance_km(p: Position, a: Position, b: Position) -> f64 {
    haversine_distance_km(p, nearest_point_on_segment(a, b, p))
}

/// Nächster Punkt des Segments `a`–`b` zu `p` (eben, auf das Segment geklemmt).
pub fn nearest_point_on_segment(a: Position, b: Position, p: Position) -> Position {
    let dir = b - a;
    let len_sq = dir.length_squared();
    if len_sq == 0.0 {
        return a;
    }
    let t = ((p - a).dot(dir) / len_sq).clamp(0.0, 1.0);
    a + dir * t
}

/// Liegt `p` innerhalb des Rings? (Ray-Casting, Rand zählt nicht garantiert)
pub fn point_in_ring(p: Position, ring: &[Position]) -> bool {
    let mut inside = false;
    let n = ring.len();
    if n < 3 {
        return false;
    }
    let mut j = n - 1;
    for i in 0..n {
        let (a, b) = (ring[i], ring[j]);
        if (a.y > p.y) != (b.y > p.y) && p.x < (b.x - a.x) * (p.y - a.y) / (b.y - a.y) + a.x {
            inside = !inside;
        }
        j = i;
    }
    inside
}

/// Schnittpunkt zweier Segmente `a1`–`a2` und `b1`–`b2` (inkl. Endpunkte).
///
/// Parallele oder kollineare Segmente liefern `None`.
pub fn segment_intersection(
    a1: Position,
    a2: Position,
    b1: Position,
    b2: Position,
) -> Option<Position> {
    let denom = (b2.y - b1.y) * (a2.x - a1.x) - (b2.x - b1.x) * (a2.y - a1.y);
    if denom == 0.0 {
        return None;
    }
    let nume_a = (b2.x - b1.x) * (a1.y - b1.y) - (b2.y - b1.y) * (a1.x - b1.x);
    let nume_b = (a2.x - a1.x) * (a1.y - b1.y) - (a2.y - a1.y) * (a1.x - b1.x);
    let u_a = nume_a / denom;
    let u_b = nume_b / denom;

    if (0.0..=1.0).contains(&u_a) && (0.0..=1.0).contains(&u_b) {
        Some(a1 + (a2 - a1) * u_a)
    } else {
        None
    }
}

/// Projiziert den Cursor rechtwinklig an das Segment `p1`–`p2`.
///
/// Liefert `[p3, p4]`: die um den Cursor-Abstand senkrecht verschobenen
/// Gegenstücke von `p2` bzw. `p1`, auf der Seite des Cursors. `p3` ist der
/// nächste Punkt eines rechtwinkligen Polygonzugs.
pub fn points_parallel_to_line(p1: Position, p2: Position, cursor: Position) -> [Position; 2] {
    let distance = point_to_segment_distance_km(cursor, p1, p2);
    let line_bearing = bearing(p1, p2);

    // Vorzeichen des Kreuzprodukts: Cursor links oder rechts der Linie
    let side = (cursor.x - p1.x) * (p2.y - p1.y) - (cursor.y - p1.y) * (p2.x - p1.x);
    let orthogonal_bearing = if side < 0.0 {
        line_bearing - 90.0
    } else {
        line_bearing - 270.0
    };

    [
        destination(p2, distance, orthogonal_bearing),
        destination(p1, distance, orthogonal_bearing),
    ]
}

/// Verschiebt eine Rechteck-Ecke und hält die beiden Nachbarecken rechtwinklig.
///
/// ```text
///   p0 ------ (p2.x, p0.y)
///   |              |
///   (p0.x, p2.y) - p2
/// ```
/// `p2` ist die verschobene Ecke, `p0` die gegenüberliegende. `None` wenn die
/// Geometrie weniger als vier Ecken hat.
pub fn update_rectangle_position(
    geometry: &Geometry,
    edit_handle_index: usize,
    map_coords: Position,
) -> Option<Geometry> {
    let coordinates = geometry.coordinates()?;
    if coordinates.len() < 4 {
        return None;
    }
    let mut points = [coordinates[0], coordinates[1], coordinates[2], coordinates[3]];
    let i = edit_handle_index;
    points[i % 4] = map_coords;

    let p0 = points[(i + 2) % 4];
    let p2 = points[i % 4];
    points[(i + 1) % 4] = DVec2::new(p2.x, p0.y);
    points[(i + 3) % 4] = DVec2::new(p0.x, p2.y);

    Some(match geometry {
        Geometry::Polygon(_) => {
            Geometry::polygon(vec![points[0], points[1], points[2], points[3], points[0]])
        }
        _ => Geometry::LineString(points.to_vec()),
    })
}

/// Liegt `pt` auf der Strecke `begin`–`end`?
fn is_point_between_points(pt: Position, begin: Position, end: Position) -> bool {
    let dc = pt - begin;
    let dl = end - begin;
    if dc.perp_dot(dl).abs() > f64::EPSILON {
        return false;
    }
    if dl.x.abs() >= dl.y.abs() {
        if dl.x > 0.0 {
            begin.x <= pt.x && pt.x <= end.x
        } else {
            end.x <= pt.x && pt.x <= begin.x
        }
    } else if dl.y > 0.0 {
        begin.y <= pt.y && pt.y <= end.y
    } else {
        end.y <= pt.y && pt.y <= begin.y
    }
}

/// Prüft ob alle Punkte auf einer einzigen Strecke liegen (entartetes Polygon).
///
/// Schluss-Punkte, die dem ersten Punkt gleichen, werden ignoriert. Leere
/// Listen und Listen identischer Punkte gelten als Linie.
pub fn is_line(points: &[Position]) -> bool {
    let Some(&first) = points.first() else {
        return true;
    };
    let Some(&last) = points.iter().rev().find(|&&p| p != first) else {
        return true;
    };
    points[1..points.len() - 1]
        .iter()
        .all(|&p| p == first || is_point_between_points(p, first, last))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn distance_in_miles_of_one_degree_latitude() {
        let miles = distance_in_miles(DVec2::new(0.0, 0.0), DVec2::new(0.0, 1.0));
        assert_relative_eq!(miles, 69.09, epsilon = 0.01);
        assert_eq!(distance_in_miles(DVec2::new(3.0, 4.0), DVec2::new(3.0, 4.0)), 0.0);
    }

    #[test]
    fn miles_to_pixels_doubles_per_zoom_level() {
        let at_12 = miles_to_pixels(12.0, 1.0);
        let at_13 = miles_to_pixels(13.0, 1.0);
        assert_relative_eq!(at_13, 2.0 * at_12);
        assert_relative_eq!(pixels_to_miles(12.0, at_12), 1.0);
    }

    #[test]
    fn haversine_matches_known_distance() {
        // Ein Breitengrad ≈ 111.195 km bei mittlerem Erdradius
        let km = haversine_distance_km(DVec2::new(10.0, 50.0), DVec2::new(10.0, 51.0));
        assert_relative_eq!(km, 111.195, epsilon = 0.01);
    }

    #[test]
    fn bearing_cardinal_directions() {
        let origin = DVec2::ZERO;
        assert_relative_eq!(bearing(origin, DVec2::new(0.0, 1.0)), 0.0, epsilon = 1e-9);
        assert_relative_eq!(bearing(origin, DVec2::new(1.0, 0.0)), 90.0, epsilon = 1e-9);
        assert_relative_eq!(bearing(origin, DVec2::new(0.0, -1.0)), 180.0, epsilon = 1e-9);
        assert_relative_eq!(bearing(origin, DVec2::new(-1.0, 0.0)), -90.0, epsilon = 1e-9);
    }

    #[test]
    fn destination_inverts_distance_and_bearing() {
        let start = DVec2::new(13.4, 52.5);
        let target = DVec2::new(13.5, 52.55);
        let d = haversine_distance_km(start, target);
        let b = bearing(start, target);
        let reached = destination(start, d, b);
        assert_relative_eq!(reached.x, target.x, epsilon = 1e-9);
        assert_relative_eq!(reached.y, target.y, epsilon = 1e-9);
    }

    #[test]
    fn normalize_bearing_wraps_into_half_open_range() {
        assert_relative_eq!(normalize_bearing(270.0), -90.0);
        assert_relative_eq!(normalize_bearing(180.0), 180.0);
        assert_relative_eq!(normalize_bearing(-190.0), 170.0);
    }

    #[test]
    fn closest_point_on_segment_inside_and_outside() {
        let a = DVec2::new(0.0, 0.0);
        let b = DVec2::new(2.0, 0.0);
        assert_eq!(
            closest_point_on_segment(a, b, DVec2::new(1.0, 1.0)),
            Some(DVec2::new(1.0, 0.0))
        );
        assert_eq!(closest_point_on_segment(a, b, DVec2::new(3.0, 1.0)), None);

        // Senkrechtes Segment
        let c = DVec2::new(0.0, 2.0);
        assert_eq!(
            closest_point_on_segment(a, c, DVec2::new(-1.0, 1.5)),
            Some(DVec2::new(0.0, 1.5))
        );
    }

    #[test]
    fn segment_intersection_crossing_and_parallel() {
        let hit = segment_intersection(
            DVec2::new(0.0, 0.0),
            DVec2::new(2.0, 2.0),
            DVec2::new(0.0, 2.0),
            DVec2::new(2.0, 0.0),
        );
        assert_eq!(hit, Some(DVec2::new(1.0, 1.0)));

        let parallel = segment_intersection(
            DVec2::new(0.0, 0.0),
            DVec2::new(1.0, 0.0),
            DVec2::new(0.0, 1.0),
            DVec2::new(1.0, 1.0),
        );
        assert!(parallel.is_none());

        let too_short = segment_intersection(
            DVec2::new(0.0, 0.0),
            DVec2::new(0.4, 0.4),
            DVec2::new(0.0, 2.0),
            DVec2::new(2.0, 0.0),
        );
        assert!(too_short.is_none());
    }

    #[test]
    fn parallel_points_are_perpendicular_to_segment() {
        // Segment nach Norden, Cursor östlich davon
        let p1 = DVec2::new(0.0, 0.0);
        let p2 = DVec2::new(0.0, 0.001);
        let cursor = DVec2::new(0.0005, 0.0013);
        let [p3, p4] = points_parallel_to_line(p1, p2, cursor);

        assert_relative_eq!(p3.y, p2.y, epsilon = 1e-7);
        assert_relative_eq!(p4.y, p1.y, epsilon = 1e-7);
        assert!(p3.x > 0.0);
        // Distanz entspricht dem Cursor-Abstand zum Segment (Klemmung auf p2)
        let expected = haversine_distance_km(cursor, p2);
        assert_relative_eq!(haversine_distance_km(p2, p3), expected, epsilon = 1e-9);
    }

    #[test]
    fn rectangle_corner_update_keeps_right_angles() {
        let rect = Geometry::polygon(vec![
            DVec2::new(0.0, 0.0),
            DVec2::new(1.0, 0.0),
            DVec2::new(1.0, 1.0),
            DVec2::new(0.0, 1.0),
            DVec2::new(0.0, 0.0),
        ]);
        let updated = update_rectangle_position(&rect, 2, DVec2::new(2.0, 3.0)).expect("Rechteck");
        assert_eq!(
            updated.coordinates().expect("Ring"),
            vec![
                DVec2::new(0.0, 0.0),
                DVec2::new(0.0, 3.0),
                DVec2::new(2.0, 3.0),
                DVec2::new(2.0, 0.0),
                DVec2::new(0.0, 0.0),
            ]
        );
        let ring = updated.coordinates().expect("Ring");
        assert_eq!(ring.first(), ring.last());
    }

    #[test]
    fn is_line_detects_collinear_rings() {
        let flat = [
            DVec2::new(0.0, 0.0),
            DVec2::new(1.0, 1.0),
            DVec2::new(2.0, 2.0),
            DVec2::new(0.0, 0.0),
        ];
        assert!(is_line(&flat));

        let triangle = [
            DVec2::new(0.0, 0.0),
            DVec2::new(1.0, 1.0),
            DVec2::new(2.0, 0.0),
            DVec2::new(0.0, 0.0),
        ];
        assert!(!is_line(&triangle));
        assert!(is_line(&[]));
        assert!(is_line(&[DVec2::ONE, DVec2::ONE]));
    }

    #[test]
    fn in_bounds_includes_edges() {
        let a = DVec2::new(1.0, 1.0);
        let b = DVec2::new(0.0, 0.0);
        assert!(in_bounds(a, b, DVec2::new(0.0, 0.5)));
        assert!(!in_bounds(a, b, DVec2::new(1.5, 0.5)));
    }

    #[test]
    fn nearest_point_on_segment_clamps_to_ends() {
        let a = DVec2::new(0.0, 0.0);
        let b = DVec2::new(2.0, 0.0);
        assert_eq!(nearest_point_on_segment(a, b, DVec2::new(1.0, 5.0)), DVec2::new(1.0, 0.0));
        assert_eq!(nearest_point_on_segment(a, b, DVec2::new(-3.0, 1.0)), a);
        assert_eq!(nearest_point_on_segment(a, a, DVec2::ONE), a);
    }

    #[test]
    fn point_in_ring_square() {
        let ring = [
            DVec2::new(0.0, 0.0),
            DVec2::new(0.0, 2.0),
            DVec2::new(2.0, 2.0),
            DVec2::new(2.0, 0.0),
            DVec2::new(0.0, 0.0),
        ];
        assert!(point_in_ring(DVec2::new(1.0, 1.0), &ring));
        assert!(!point_in_ring(DVec2::new(3.0, 1.0), &ring));
        assert!(!point_in_ring(DVec2::new(1.0, 1.0), &ring[..2]));
    }
}
