//! Rein-mathematische Funktionen des 90°-Modus (Eck-Suche beim Schließen).

use crate::core::geo_math::{
    bearing, destination, haversine_distance_km, normalize_bearing, segment_intersection,
};
use crate::core::Position;

/// Rechtwinkliger Schnittpunkt zwischen erster und letzter gesetzter Kante.
///
/// Von `p1` (erster Punkt) und `p3` (letzter geklickter Punkt) werden je drei
/// Strahlen im 90°-Raster zur jeweiligen Kante ausgesandt, Länge = Abstand
/// `p1`–`p3`. Der erste gefundene Schnittpunkt gewinnt (äußere Schleife über
/// die Strahlen von `p1`). Benötigt mehr als vier Koordinaten.
pub fn intermediate_point(coords: &[Position]) -> Option<Position> {
    let n = coords.len();
    if n <= 4 {
        return None;
    }
    let (p1, p2) = (coords[0], coords[1]);
    let (p3, p4) = (coords[n - 3], coords[n - 4]);

    let first_bearing = bearing(p1, p2);
    let second_bearing = bearing(p3, p4);
    let right_angles = |base: f64| [1.0, 2.0, 3.0].map(|k| normalize_bearing(base + k * 90.0));

    let distance = haversine_distance_km(p1, p3);
    for a1 in right_angles(first_bearing) {
        let end1 = destination(p1, distance, a1);
        for a2 in right_angles(second_bearing) {
            let end2 = destination(p3, distance, a2);
            if let Some(pt) = segment_intersection(p1, end1, p3, end2) {
                return Some(pt);
            }
        }
    }
    None
}

/// Ring für den Commit aus dem Tentative-Ring `[...klicks, hover, klicks[0]]`.
///
/// Die Hover-Position fällt weg. Gibt es einen rechtwinkligen Eckpunkt, wird
/// er vor dem Schluss-Punkt eingefügt; sonst wird der letzte Klick verworfen
/// und erneut gesucht. Ohne Treffer bleibt der Ring ohne Ecke geschlossen.
pub fn finalized_coordinates(coords: &[Position]) -> Vec<Position> {
    let n = coords.len();
    if n < 3 {
        return coords.to_vec();
    }
    let first = coords[0];
    let ring_with = |keep: usize, corner: Option<Position>| {
        let mut ring = coords[..keep].to_vec();
        ring.extend(corner);
        ring.push(first);
        ring
    };

    if let Some(pt) = intermediate_point(coords) {
        return ring_with(n - 2, Some(pt));
    }

    let mut without_last_click = coords.to_vec();
    without_last_click.remove(n - 3);
    if let Some(pt) = intermediate_point(&without_last_click) {
        log::debug!("90°-Ecke erst ohne letzten Klick gefunden");
        return ring_with(n - 3, Some(pt));
    }

    log::debug!("Keine 90°-Ecke gefunden, Ring wird ohne Ecke geschlossen");
    ring_with(n - 2, None)
}
