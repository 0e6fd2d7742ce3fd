use hashbrown::HashSet;
use thiserror::Error;
use tracing::debug;

use crate::{
    polygon::preprocess_polygon,
    types::{
        Circle, Node, Polygon, Triangle, TriangleId, TriangleKey, Vertex, Vertex2d, VertexId,
    },
    utils::validate_vertices,
    vertex_merge::{UniqueVertices, VertexMerge},
};

#[cfg(feature = "parallel_filtering")]
use rayon::iter::{IntoParallelIterator, ParallelIterator};

#[cfg(feature = "progress_log")]
use tracing::info;

#[cfg(feature = "debug_context")]
use crate::debug::{DebugConfiguration, DebugContext, Phase};

#[cfg(feature = "profile_traces")]
use tracing::{span, Level};

/// Point sets with at least this many vertices have their brute force candidates evaluated in parallel (with the `parallel_filtering` feature)
pub const DEFAULT_PARALLEL_VERTEX_COUNT_THRESHOLD: usize = 64;

#[derive(Clone, Debug)]
pub struct TriangulationConfiguration {
    /// Policy used to merge close vertices together, see [VertexMerge]
    pub vertex_merge: VertexMerge,
    /// Only used with the `parallel_filtering` feature
    pub parallel_vertex_count_threshold: usize,
    #[cfg(feature = "debug_context")]
    pub debug_config: DebugConfiguration,
}
impl Default for TriangulationConfiguration {
    fn default() -> Self {
        Self {
            vertex_merge: VertexMerge::default(),
            parallel_vertex_count_threshold: DEFAULT_PARALLEL_VERTEX_COUNT_THRESHOLD,
            #[cfg(feature = "debug_context")]
            debug_config: DebugConfiguration::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum TriangulationError {
    /// A vertex given to the triangulation has a NaN or infinite coordinate.
    ///
    /// `index` is the index of the vertex in the input slice, or the id the node would have had for [Triangulation::insert_vertex].
    #[error("vertex {index} has a non-finite coordinate: ({x}, {y})")]
    InvalidVertex { index: usize, x: f64, y: f64 },
}

/// A vertex lying strictly inside the circumcircle of a triangle
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct DelaunayViolation {
    pub triangle: TriangleId,
    pub vertex: VertexId,
}

/// Live triangle mesh.
///
/// Built from a polygon by [Triangulation::from_polygon], or from a point set by [Triangulation::from_2d_vertices],
/// and then updated by [Triangulation::insert_vertex].
#[derive(Debug)]
pub struct Triangulation {
    pub(crate) triangles: Vec<Triangle>,
    /// Vertex sets of all the triangles in `triangles`
    pub(crate) triangle_keys: HashSet<TriangleKey>,
    /// Point set the triangles were built from
    pub(crate) vertices: Vec<Vertex>,
    /// Inserted vertices, in insertion order
    pub(crate) nodes: Vec<Node>,
    pub(crate) vertex_merge: VertexMerge,

    #[cfg(feature = "debug_context")]
    pub debug_context: DebugContext,
}

impl Default for Triangulation {
    fn default() -> Self {
        Self::new(TriangulationConfiguration::default())
    }
}

impl Triangulation {
    /// Creates an empty triangulation. Vertices inserted in it will only be recorded as nodes.
    pub fn new(config: TriangulationConfiguration) -> Self {
        Self {
            triangles: Vec::new(),
            triangle_keys: HashSet::new(),
            vertices: Vec::new(),
            nodes: Vec::new(),
            vertex_merge: config.vertex_merge,
            #[cfg(feature = "debug_context")]
            debug_context: DebugContext::new(config.debug_config),
        }
    }

    /// Triangulates a polygon:
    /// 1. the polygon vertices and the intersections of its diagonals are triangulated by [brute_force_triangulation]
    /// 2. each polygon vertex, in the polygon order, is then inserted in the resulting mesh with [Triangulation::insert_vertex]
    ///
    /// A polygon with less than 3 vertices gives an empty triangulation (its vertices are still recorded as nodes).
    /// The triangulation covers the convex hull of the points, it does not conform to the polygon boundary.
    ///
    /// Complexity is O(n⁸) in the number of polygon vertices since a polygon can have O(n⁴) diagonals intersections.
    pub fn from_polygon(
        polygon: &Polygon,
        config: TriangulationConfiguration,
    ) -> Result<Self, TriangulationError> {
        #[cfg(feature = "profile_traces")]
        let _span = span!(Level::TRACE, "from_polygon").entered();

        validate_vertices(polygon.vertices())?;

        let points = preprocess_polygon(polygon, config.vertex_merge);
        debug!(
            "Polygon with {} vertices preprocessed into {} points",
            polygon.len(),
            points.len()
        );

        let mut triangulation = Self::from_points(points, config);

        for (_index, vertex) in polygon.vertices().iter().enumerate() {
            #[cfg(feature = "debug_context")]
            {
                let force_end = triangulation.debug_context.advance_step();
                if force_end {
                    break;
                }
            }

            triangulation.insert_vertex(*vertex)?;

            #[cfg(feature = "progress_log")]
            {
                if _index % ((polygon.len() / 50) + 1) == 0 {
                    let progress = 100. * _index as f32 / polygon.len() as f32;
                    info!(
                        "Insertion progress {}%: {}/{}",
                        progress,
                        _index,
                        polygon.len()
                    );
                }
            }
        }
        debug!(
            "Polygon triangulation done with {} triangles and {} nodes",
            triangulation.triangles.len(),
            triangulation.nodes.len()
        );

        Ok(triangulation)
    }

    /// Creates a triangulation whose triangles are the [brute_force_triangulation] of `vertices`, with no inserted nodes.
    pub fn from_2d_vertices<T: Vertex2d>(
        vertices: &[T],
        config: TriangulationConfiguration,
    ) -> Result<Self, TriangulationError> {
        let points: Vec<Vertex> = vertices.iter().map(|v| v.to_vertex()).collect();
        validate_vertices(&points)?;
        Ok(Self::from_points(points, config))
    }

    /// `points` must have been validated
    fn from_points(points: Vec<Vertex>, config: TriangulationConfiguration) -> Self {
        let points = unique_vertices(&points, config.vertex_merge);
        let triangles = brute_force_triangulation_of_unique_vertices(&points, &config);

        let mut triangulation = Self::new(config);
        triangulation.vertices = points;
        triangulation.triangle_keys = triangles.iter().map(|t| t.key()).collect();
        triangulation.triangles = triangles;

        #[cfg(feature = "debug_context")]
        {
            let ids: Vec<TriangleId> = (0..triangulation.triangles.len()).collect();
            triangulation.debug_context.push_snapshot(
                Phase::BruteForce,
                &triangulation.triangles,
                &ids,
            );
        }

        triangulation
    }

    #[inline]
    pub fn triangles(&self) -> &[Triangle] {
        &self.triangles
    }

    #[inline]
    pub fn into_triangles(self) -> Vec<Triangle> {
        self.triangles
    }

    #[inline]
    pub fn triangles_count(&self) -> usize {
        self.triangles.len()
    }

    /// Point set (deduplicated) the triangulation was built from
    #[inline]
    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    /// Inserted vertices, in insertion order
    #[inline]
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    #[inline]
    pub fn vertex_merge(&self) -> VertexMerge {
        self.vertex_merge
    }

    /// Circumcircles of the triangles, in the same order as [Triangulation::triangles]
    pub fn circumcircles(&self) -> impl Iterator<Item = Circle> + '_ {
        self.triangles.iter().map(|t| t.circumcircle())
    }

    /// Returns `true` if a triangle with the same vertices as `triangle` is in the triangulation
    #[inline]
    pub fn contains_triangle(&self, triangle: &Triangle) -> bool {
        self.triangle_keys.contains(&triangle.key())
    }

    /// Checks the triangles against the triangulation point set and the inserted nodes.
    ///
    /// The returned [DelaunayViolation::vertex] indexes the point set followed by the nodes.
    ///
    /// Always empty right after a brute force triangulation. Vertex insertions locate the triangles to replace by containment,
    /// and do not preserve the Delaunay property.
    pub fn delaunay_violations(&self) -> Vec<DelaunayViolation> {
        let mut vertices = self.vertices.clone();
        vertices.extend(self.nodes.iter().map(|n| n.vertex));
        delaunay_violations(&self.triangles, &vertices)
    }

    /// Adds `triangle` if no triangle with the same vertices exists. Returns `true` if it was added.
    pub(crate) fn add_triangle(&mut self, triangle: Triangle) -> bool {
        let added = self.triangle_keys.insert(triangle.key());
        if added {
            self.triangles.push(triangle);
        }
        added
    }
}

/// See [Triangulation::from_polygon]
pub fn triangulation_from_polygon<T: Vertex2d>(
    vertices: &[T],
    config: TriangulationConfiguration,
) -> Result<Triangulation, TriangulationError> {
    Triangulation::from_polygon(&Polygon::from_2d_vertices(vertices), config)
}

/// Delaunay triangulation of a point set, see [brute_force_triangulation]
pub fn triangulation_from_2d_vertices<T: Vertex2d>(
    vertices: &[T],
    config: TriangulationConfiguration,
) -> Result<Vec<Triangle>, TriangulationError> {
    let points: Vec<Vertex> = vertices.iter().map(|v| v.to_vertex()).collect();
    validate_vertices(&points)?;
    Ok(brute_force_triangulation(&points, &config))
}

/// Triangulates `points` by enumerating all the combinations of 3 points.
///
/// `points` are first deduplicated with the configured [VertexMerge]. Then, for each combination (in lexicographic order):
/// - collinear triplets are skipped
/// - a triangle is kept only if no other point lies strictly inside its circumcircle
///
/// Points lying exactly on a circumcircle do not invalidate the triangle: 4 cocircular points give 4 overlapping triangles.
///
/// Complexity is O(n⁴): C(n,3) candidates, each one checked against the n points. Only suitable for small point sets.
pub fn brute_force_triangulation(
    points: &[Vertex],
    config: &TriangulationConfiguration,
) -> Vec<Triangle> {
    let points = unique_vertices(points, config.vertex_merge);
    brute_force_triangulation_of_unique_vertices(&points, config)
}

fn unique_vertices(points: &[Vertex], merge: VertexMerge) -> Vec<Vertex> {
    let mut unique = UniqueVertices::with_capacity(merge, points.len());
    unique.extend(points.iter().copied());
    unique.into_vec()
}

fn brute_force_triangulation_of_unique_vertices(
    points: &[Vertex],
    _config: &TriangulationConfiguration,
) -> Vec<Triangle> {
    #[cfg(feature = "profile_traces")]
    let _span = span!(Level::TRACE, "brute_force_triangulation").entered();

    #[cfg(feature = "parallel_filtering")]
    if points.len() >= _config.parallel_vertex_count_threshold {
        let triangles: Vec<Triangle> = (0..points.len())
            .into_par_iter()
            .flat_map_iter(|first| delaunay_triangles_from_first_vertex(points, first))
            .collect();
        debug!(
            "Brute force triangulation of {} points kept {} triangles",
            points.len(),
            triangles.len()
        );
        return triangles;
    }

    let mut triangles = Vec::new();
    for first in 0..points.len() {
        triangles.extend(delaunay_triangles_from_first_vertex(points, first));

        #[cfg(feature = "progress_log")]
        {
            if first % ((points.len() / 50) + 1) == 0 {
                let progress = 100. * first as f32 / points.len() as f32;
                info!(
                    "Brute force progress {}%: {}/{}",
                    progress,
                    first,
                    points.len()
                );
            }
        }
    }
    debug!(
        "Brute force triangulation of {} points kept {} triangles",
        points.len(),
        triangles.len()
    );
    triangles
}

/// Delaunay triangles made of the vertex `first` and of two vertices with greater ids
fn delaunay_triangles_from_first_vertex(
    points: &[Vertex],
    first: VertexId,
) -> impl Iterator<Item = Triangle> + '_ {
    let n = points.len();
    ((first + 1)..n).flat_map(move |second| {
        ((second + 1)..n).filter_map(move |third| {
            // Collinear triplets have no circumcircle
            let candidate = Triangle::new(points[first], points[second], points[third])?;
            if has_empty_circumcircle(&candidate, points) {
                Some(candidate)
            } else {
                None
            }
        })
    })
}

#[inline]
fn has_empty_circumcircle(triangle: &Triangle, points: &[Vertex]) -> bool {
    points
        .iter()
        .all(|&p| triangle.has_vertex(p) || !triangle.circumcircle_contains(p))
}

/// Returns all the pairs (triangle, vertex) where the vertex is strictly inside the circumcircle of the triangle.
///
/// Vertices of a triangle are not checked against their own triangle.
pub fn delaunay_violations(triangles: &[Triangle], vertices: &[Vertex]) -> Vec<DelaunayViolation> {
    let mut violations = Vec::new();
    for (triangle_id, triangle) in triangles.iter().enumerate() {
        for (vertex_id, vertex) in vertices.iter().enumerate() {
            if !triangle.has_vertex(*vertex) && triangle.circumcircle_contains(*vertex) {
                violations.push(DelaunayViolation {
                    triangle: triangle_id,
                    vertex: vertex_id,
                });
            }
        }
    }
    violations
}

///////////////////////////////////////////////////////////
///                                                     ///
///                        Tests                        ///
///                                                     ///
///////////////////////////////////////////////////////////
