use crate::{
    types::{Polygon, Segment, Vertex},
    vertex_merge::{UniqueVertices, VertexMerge},
};

#[cfg(feature = "profile_traces")]
use tracing::{span, Level};

/// Returns all the diagonals of `polygon`: one segment for each pair of non-adjacent vertices `(i, j)` with `i < j`.
///
/// A polygon with n vertices has n(n-3)/2 diagonals.
pub fn polygon_diagonals(polygon: &Polygon) -> Vec<Segment> {
    #[cfg(feature = "profile_traces")]
    let _span = span!(Level::TRACE, "polygon_diagonals").entered();

    let vertices = polygon.vertices();
    let n = vertices.len();
    if n < 4 {
        return Vec::new();
    }

    let mut diagonals = Vec::with_capacity(n * (n - 3) / 2);
    for i in 0..n {
        for j in (i + 1)..n {
            if polygon.is_diagonal(i, j) {
                diagonals.push(Segment::new(vertices[i], vertices[j]));
            }
        }
    }
    diagonals
}

/// Intersects every pair of diagonals.
///
/// Returns the set (with respect to `merge`) of all the intersection points, in the order they were found.
/// Diagonals sharing a polygon vertex intersect on this vertex, which is part of the result.
pub fn diagonals_intersections(diagonals: &[Segment], merge: VertexMerge) -> Vec<Vertex> {
    #[cfg(feature = "profile_traces")]
    let _span = span!(Level::TRACE, "diagonals_intersections").entered();

    let mut intersections = UniqueVertices::new(merge);
    for (index, d1) in diagonals.iter().enumerate() {
        for d2 in diagonals[index + 1..].iter() {
            intersections.extend(d1.intersection(d2));
        }
    }
    intersections.into_vec()
}

/// Converts a polygon into the set of points to triangulate: the polygon vertices, followed by the intersection points of its diagonals.
///
/// Vertices are merged according to `merge`. Returns an empty set for a polygon with less than 3 vertices.
///
/// The polygon edges are not kept: the triangulation of the resulting points will not necessarily conform to the polygon boundary.
pub fn preprocess_polygon(polygon: &Polygon, merge: VertexMerge) -> Vec<Vertex> {
    #[cfg(feature = "profile_traces")]
    let _span = span!(Level::TRACE, "preprocess_polygon").entered();

    if polygon.len() < 3 {
        return Vec::new();
    }

    let diagonals = polygon_diagonals(polygon);
    let intersections = diagonals_intersections(&diagonals, merge);

    let mut points = UniqueVertices::with_capacity(merge, polygon.len() + intersections.len());
    points.extend(polygon.vertices().iter().copied());
    points.extend(intersections);
    points.into_vec()
}

///////////////////////////////////////////////////////////
///                                                     ///
///                        Tests                        ///
///                                                     ///
///////////////////////////////////////////////////////////
