//! Geometrie-Primitiven: Punkt-in-Polygon, Linien-/Ring-Prädikate,
//! Großkreis-Distanz.
//!
//! Koordinaten in Grad (x = Länge, y = Breite), Distanzen in Metern.

use glam::DVec2;

/// Mittlerer Erdradius in Metern (IUGG).
pub const EARTH_RADIUS_M: f64 = 6_371_008.8;

/// Toleranz für degenerierte Geometrie-Vergleiche in Grad.
const DEGREE_EPSILON: f64 = 1e-12;

/// Großkreis-Distanz (Haversine) zwischen zwei Koordinaten in Metern.
pub fn haversine_m(a: DVec2, b: DVec2) -> f64 {
    let lat_a = a.y.to_radians();
    let lat_b = b.y.to_radians();
    let d_lat = (b.y - a.y).to_radians();
    let d_lng = (b.x - a.x).to_radians();

    let h = (d_lat / 2.0).sin().powi(2) + lat_a.cos() * lat_b.cos() * (d_lng / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_M * h.sqrt().asin()
}

/// Gesamtlänge eines Linienzugs als Summe der Segment-Großkreisdistanzen.
pub fn path_length_m(vertices: &[DVec2]) -> f64 {
    vertices
        .windows(2)
        .map(|pair| haversine_m(pair[0], pair[1]))
        .sum()
}

/// Entfernt einen duplizierten Schlusspunkt (erster == letzter Vertex).
pub fn normalize_ring(ring: &[DVec2]) -> Vec<DVec2> {
    let mut result: Vec<DVec2> = ring.to_vec();
    while result.len() > 1 {
        let first = result[0];
        let last = *result.last().expect("ring ist nicht leer");
        if (first - last).length_squared() < DEGREE_EPSILON {
            result.pop();
        } else {
            break;
        }
    }
    result
}

/// Gibt `true` zurück wenn der Ring mindestens 3 distinkte Vertices hat.
pub fn ring_is_valid(ring: &[DVec2]) -> bool {
    normalize_ring(ring).len() >= 3
}

/// Prüft ob ein Punkt auf einem Liniensegment liegt.
fn point_on_segment(point: DVec2, a: DVec2, b: DVec2) -> bool {
    let ab = b - a;
    let ap = point - a;
    let cross = ab.perp_dot(ap).abs();
    if cross > 1e-10 {
        return false;
    }

    let dot = ap.dot(ab);
    if dot < 0.0 {
        return false;
    }

    dot <= ab.length_squared()
}

/// Prüft ob ein Punkt innerhalb eines Rings liegt (Ray-Casting, Rand zählt als innen).
pub fn point_in_ring(point: DVec2, ring: &[DVec2]) -> bool {
    let ring = normalize_ring(ring);
    if ring.len() < 3 {
        return false;
    }

    let mut inside = false;
    let mut previous = *ring.last().expect("ring hat mindestens 3 Punkte");

    for &current in &ring {
        if point_on_segment(point, previous, current) {
            return true;
        }

        // Wenn die Y-Bedingung greift, ist previous.y != current.y garantiert.
        let intersect = ((current.y > point.y) != (previous.y > point.y))
            && (point.x
                < (previous.x - current.x) * (point.y - current.y) / (previous.y - current.y)
                    + current.x);

        if intersect {
            inside = !inside;
        }

        previous = current;
    }

    inside
}

/// Orientierungstest: >0 links, <0 rechts, 0 kollinear.
fn orientation(a: DVec2, b: DVec2, c: DVec2) -> f64 {
    (b - a).perp_dot(c - a)
}

/// Prüft ob sich zwei Segmente schneiden (inkl. Berührung).
pub fn segments_intersect(a1: DVec2, a2: DVec2, b1: DVec2, b2: DVec2) -> bool {
    let o1 = orientation(a1, a2, b1);
    let o2 = orientation(a1, a2, b2);
    let o3 = orientation(b1, b2, a1);
    let o4 = orientation(b1, b2, a2);

    if (o1 * o2) < 0.0 && (o3 * o4) < 0.0 {
        return true;
    }

    // Kollineare Berührungsfälle
    (o1.abs() < DEGREE_EPSILON && point_on_segment(b1, a1, a2))
        || (o2.abs() < DEGREE_EPSILON && point_on_segment(b2, a1, a2))
        || (o3.abs() < DEGREE_EPSILON && point_on_segment(a1, b1, b2))
        || (o4.abs() < DEGREE_EPSILON && point_on_segment(a2, b1, b2))
}

/// Prüft ob ein Linienzug eine Ring-Kante kreuzt.
pub fn line_crosses_ring(line: &[DVec2], ring: &[DVec2]) -> bool {
    let ring = normalize_ring(ring);
    if ring.len() < 3 || line.len() < 2 {
        return false;
    }

    for segment in line.windows(2) {
        let mut previous = *ring.last().expect("ring hat mindestens 3 Punkte");
        for &current in &ring {
            if segments_intersect(segment[0], segment[1], previous, current) {
                return true;
            }
            previous = current;
        }
    }

    false
}

/// Prüft ob ein Linienzug vollständig innerhalb des Rings liegt.
pub fn line_within_ring(line: &[DVec2], ring: &[DVec2]) -> bool {
    !line.is_empty() && line.iter().all(|&vertex| point_in_ring(vertex, ring))
}

/// Prüft ob ein Polygon vollständig innerhalb des Rings liegt.
pub fn polygon_within_ring(polygon: &[DVec2], ring: &[DVec2]) -> bool {
    let polygon = normalize_ring(polygon);
    if polygon.len() < 3 {
        return false;
    }
    polygon.iter().all(|&vertex| point_in_ring(vertex, ring))
        && !closed_rings_cross(&polygon, ring)
}

/// Prüft ob sich ein Polygon und der Ring überlappen
/// (Vertex-Inklusion in beide Richtungen oder Kanten-Schnitt).
pub fn polygon_overlaps_ring(polygon: &[DVec2], ring: &[DVec2]) -> bool {
    let polygon = normalize_ring(polygon);
    if polygon.len() < 3 {
        return false;
    }

    polygon.iter().any(|&vertex| point_in_ring(vertex, ring))
        || normalize_ring(ring)
            .iter()
            .any(|&vertex| point_in_ring(vertex, &polygon))
        || closed_rings_cross(&polygon, ring)
}

/// Prüft ob sich die Kanten zweier geschlossener Ringe schneiden.
fn closed_rings_cross(a: &[DVec2], b: &[DVec2]) -> bool {
    let b = normalize_ring(b);
    if a.len() < 3 || b.len() < 3 {
        return false;
    }

    let mut prev_a = *a.last().expect("ring a hat mindestens 3 Punkte");
    for &curr_a in a {
        let mut prev_b = *b.last().expect("ring b hat mindestens 3 Punkte");
        for &curr_b in &b {
            if segments_intersect(prev_a, curr_a, prev_b, curr_b) {
                return true;
            }
            prev_b = curr_b;
        }
        prev_a = curr_a;
    }

    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn unit_ring() -> Vec<DVec2> {
        vec![
            DVec2::new(0.0, 0.0),
            DVec2::new(1.0, 0.0),
            DVec2::new(1.0, 1.0),
            DVec2::new(0.0, 1.0),
        ]
    }

    #[test]
    fn haversine_equator_degree_is_about_111km() {
        let d = haversine_m(DVec2::new(0.0, 0.0), DVec2::new(1.0, 0.0));
        assert_relative_eq!(d, 111_195.0, max_relative = 0.01);
    }

    #[test]
    fn haversine_is_symmetric_and_zero_on_identity() {
        let a = DVec2::new(106.8, -6.2);
        let b = DVec2::new(106.9, -6.3);
        assert_relative_eq!(haversine_m(a, b), haversine_m(b, a));
        assert_eq!(haversine_m(a, a), 0.0);
    }

    #[test]
    fn path_length_sums_segment_distances() {
        let path = vec![
            DVec2::new(0.0, 0.0),
            DVec2::new(0.0, 1.0),
            DVec2::new(1.0, 1.0),
        ];
        let expected = haversine_m(path[0], path[1]) + haversine_m(path[1], path[2]);
        assert_relative_eq!(path_length_m(&path), expected);
    }

    #[test]
    fn point_in_ring_inside_outside_boundary() {
        let ring = unit_ring();
        assert!(point_in_ring(DVec2::new(0.5, 0.5), &ring));
        assert!(!point_in_ring(DVec2::new(1.5, 0.5), &ring));
        // Rand zählt als innen
        assert!(point_in_ring(DVec2::new(1.0, 0.5), &ring));
    }

    #[test]
    fn degenerate_ring_contains_nothing() {
        let ring = vec![DVec2::new(0.0, 0.0), DVec2::new(1.0, 0.0)];
        assert!(!point_in_ring(DVec2::new(0.5, 0.0), &ring));
        assert!(!ring_is_valid(&ring));
    }

    #[test]
    fn closed_ring_with_duplicate_endpoint_is_normalized() {
        let mut ring = unit_ring();
        ring.push(ring[0]);
        assert!(ring_is_valid(&ring));
        assert_eq!(normalize_ring(&ring).len(), 4);
    }

    #[test]
    fn line_crossing_and_containment() {
        let ring = unit_ring();
        let crossing = vec![DVec2::new(-0.5, 0.5), DVec2::new(0.5, 0.5)];
        let contained = vec![DVec2::new(0.2, 0.2), DVec2::new(0.8, 0.8)];
        let outside = vec![DVec2::new(2.0, 2.0), DVec2::new(3.0, 3.0)];

        assert!(line_crosses_ring(&crossing, &ring));
        assert!(line_within_ring(&contained, &ring));
        assert!(!line_crosses_ring(&outside, &ring));
        assert!(!line_within_ring(&outside, &ring));
    }

    #[test]
    fn polygon_within_and_overlap() {
        let ring = unit_ring();
        let inner = vec![
            DVec2::new(0.2, 0.2),
            DVec2::new(0.4, 0.2),
            DVec2::new(0.3, 0.4),
        ];
        let straddling = vec![
            DVec2::new(0.8, 0.8),
            DVec2::new(1.5, 0.8),
            DVec2::new(1.2, 1.5),
        ];
        let disjoint = vec![
            DVec2::new(3.0, 3.0),
            DVec2::new(4.0, 3.0),
            DVec2::new(3.5, 4.0),
        ];

        assert!(polygon_within_ring(&inner, &ring));
        assert!(polygon_overlaps_ring(&straddling, &ring));
        assert!(!polygon_within_ring(&straddling, &ring));
        assert!(!polygon_overlaps_ring(&disjoint, &ring));
    }
}
