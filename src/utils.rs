use crate::{
    triangulation::TriangulationError,
    types::{Circle, Float, Segment, SegmentIntersection, Vertex},
};

#[cfg(feature = "more_profile_traces")]
use tracing::{span, Level};

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Orientation {
    Colinear,
    Clockwise,
    CounterClockwise,
}

/// Returns the orientation of an ordered triplet (p, q, r).
pub fn triplet_orientation(p: Vertex, q: Vertex, r: Vertex) -> Orientation {
    let val = (q.y - p.y) * (r.x - q.x) - (q.x - p.x) * (r.y - q.y);

    if val == 0. {
        Orientation::Colinear
    } else if val > 0. {
        Orientation::Clockwise
    } else {
        Orientation::CounterClockwise
    }
}

/// Given three collinear points p, q, r, the function checks if point `q` lies on line segment 'pr'
#[inline]
pub fn on_segment(p: Vertex, q: Vertex, r: Vertex) -> bool {
    q.x <= p.x.max(r.x) && q.x >= p.x.min(r.x) && q.y <= p.y.max(r.y) && q.y >= p.y.min(r.y)
}

/// Signed area of the triangle `abc`. Positive when `abc` is in a counter-clockwise order, 0 when the points are collinear.
#[inline]
pub fn signed_area(a: Vertex, b: Vertex, c: Vertex) -> Float {
    (b - a).perp_dot(c - a) / 2.
}

/// Computes the circle passing through `a`, `b` and `c`.
///
/// Returns [None] if the three points are collinear (or if the circle cannot be represented, for extremely thin triangles).
///
/// The center is computed as an offset from `a` (intersection of the perpendicular bisectors of `ab` and `ac`).
pub fn circumcircle(a: Vertex, b: Vertex, c: Vertex) -> Option<Circle> {
    #[cfg(feature = "more_profile_traces")]
    let _span = span!(Level::TRACE, "circumcircle").entered();

    let ab = b - a;
    let ac = c - a;
    let d = 2. * ab.perp_dot(ac);
    if d == 0. {
        return None;
    }

    let ab_sq = ab.length_squared();
    let ac_sq = ac.length_squared();
    let offset = Vertex::new(
        (ac.y * ab_sq - ab.y * ac_sq) / d,
        (ab.x * ac_sq - ac.x * ab_sq) / d,
    );
    let center = a + offset;
    if !center.is_finite() {
        return None;
    }

    let radius_squared = offset.length_squared();
    Some(Circle {
        center,
        radius: radius_squared.sqrt(),
        radius_squared,
    })
}

/// Checks if vertex `p` is strictly inside the circumcircle of the triangle `abc`.
///
/// Returns `false` when `abc` has no circumcircle (collinear vertices). Points exactly on the circle are not inside.
#[inline]
pub fn is_vertex_in_circumcircle(a: Vertex, b: Vertex, c: Vertex, p: Vertex) -> bool {
    match circumcircle(a, b, c) {
        Some(circle) => circle.encloses(p),
        None => false,
    }
}

/// Checks if vertex `p` is inside the triangle `abc`, in any orientation.
///
/// Boundary inclusive: a vertex lying on an edge, or equal to one of the corners, is inside.
#[inline]
pub fn is_vertex_in_triangle(a: Vertex, b: Vertex, c: Vertex, p: Vertex) -> bool {
    let d1 = (b - a).perp_dot(p - a);
    let d2 = (c - b).perp_dot(p - b);
    let d3 = (a - c).perp_dot(p - c);

    let has_negative = d1 < 0. || d2 < 0. || d3 < 0.;
    let has_positive = d1 > 0. || d2 > 0. || d3 > 0.;
    !(has_negative && has_positive)
}

/// Returns the intersection points of two segments:
/// - no point if the segments do not intersect (parallel segments included)
/// - one point if they cross or touch. When this point is an endpoint of one of the segments, this endpoint is returned as is.
/// - the endpoints of the overlap if the segments are collinear and overlapping. Two collinear segments sharing only an endpoint return this endpoint.
///
/// source for the predicates: https://www.dcs.gla.ac.uk/~pat/52233/slides/Geometry1x1.pdf
pub fn segments_intersection(s1: &Segment, s2: &Segment) -> SegmentIntersection {
    #[cfg(feature = "more_profile_traces")]
    let _span = span!(Level::TRACE, "segments_intersection").entered();

    let mut points = SegmentIntersection::new();

    let orientation_1 = triplet_orientation(s1.p1, s1.p2, s2.p1);
    let orientation_2 = triplet_orientation(s1.p1, s1.p2, s2.p2);
    let orientation_3 = triplet_orientation(s2.p1, s2.p2, s1.p1);
    let orientation_4 = triplet_orientation(s2.p1, s2.p2, s1.p2);

    if orientation_1 == Orientation::Colinear
        && orientation_2 == Orientation::Colinear
        && orientation_3 == Orientation::Colinear
        && orientation_4 == Orientation::Colinear
    {
        collinear_overlap(s1, s2, &mut points);
        return points;
    }

    // General case
    if orientation_1 != orientation_2 && orientation_3 != orientation_4 {
        let point = if orientation_1 == Orientation::Colinear {
            Some(s2.p1)
        } else if orientation_2 == Orientation::Colinear {
            Some(s2.p2)
        } else if orientation_3 == Orientation::Colinear {
            Some(s1.p1)
        } else if orientation_4 == Orientation::Colinear {
            Some(s1.p2)
        } else {
            crossing_point(s1, s2)
        };
        points.extend(point);
        return points;
    }

    // Special Cases
    // s1.p1, s1.p2 and s2.p1 are collinear and s2.p1 lies on segment s1
    if orientation_1 == Orientation::Colinear && on_segment(s1.p1, s2.p1, s1.p2) {
        points.push(s2.p1);
    }
    // s1.p1, s1.p2 and s2.p2 are collinear and s2.p2 lies on segment s1
    else if orientation_2 == Orientation::Colinear && on_segment(s1.p1, s2.p2, s1.p2) {
        points.push(s2.p2);
    }
    // s2.p1, s2.p2 and s1.p1 are collinear and s1.p1 lies on segment s2
    else if orientation_3 == Orientation::Colinear && on_segment(s2.p1, s1.p1, s2.p2) {
        points.push(s1.p1);
    }
    // s2.p1, s2.p2 and s1.p2 are collinear and s1.p2 lies on segment s2
    else if orientation_4 == Orientation::Colinear && on_segment(s2.p1, s1.p2, s2.p2) {
        points.push(s1.p2);
    }

    points
}

/// Intersection of the supporting lines of two segments known to be crossing
#[inline]
fn crossing_point(s1: &Segment, s2: &Segment) -> Option<Vertex> {
    let d1 = s1.p2 - s1.p1;
    let d2 = s2.p2 - s2.p1;
    let denominator = d1.perp_dot(d2);
    if denominator == 0. {
        return None;
    }
    let t = (s2.p1 - s1.p1).perp_dot(d2) / denominator;
    Some(s1.p1 + d1 * t.clamp(0., 1.))
}

/// `s1` and `s2` MUST be collinear
fn collinear_overlap(s1: &Segment, s2: &Segment, points: &mut SegmentIntersection) {
    let candidates = [
        (s1.p1, s2),
        (s1.p2, s2),
        (s2.p1, s1),
        (s2.p2, s1),
    ];
    for (candidate, other) in candidates {
        if points.is_full() {
            break;
        }
        if on_segment(other.p1, candidate, other.p2) && !points.contains(&candidate) {
            points.push(candidate);
        }
    }
}

/// Checks that all the vertices have finite coordinates
pub fn validate_vertices(vertices: &[Vertex]) -> Result<(), TriangulationError> {
    for (index, vertex) in vertices.iter().enumerate() {
        if !vertex.is_finite() {
            return Err(TriangulationError::InvalidVertex {
                index,
                x: vertex.x as f64,
                y: vertex.y as f64,
            });
        }
    }
    Ok(())
}

///////////////////////////////////////////////////////////
///                                                     ///
///                        Tests                        ///
///                                                     ///
///////////////////////////////////////////////////////////
