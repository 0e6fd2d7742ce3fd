use crate::utils::{circumcircle, is_vertex_in_triangle, segments_intersection, signed_area};

use arrayvec::ArrayVec;

#[cfg(not(feature = "f32"))]
pub mod f64;
#[cfg(not(feature = "f32"))]
pub use f64::*;

#[cfg(feature = "f32")]
pub mod f32;
#[cfg(feature = "f32")]
pub use f32::*;

pub mod vertex;
pub use vertex::Vertex2d;

pub type VertexId = usize;
pub type TriangleId = usize;
/// Insertion order of a [Node] in a triangulation
pub type NodeId = usize;

pub type TriangleVertexIndex = u8;
pub const VERT_1: TriangleVertexIndex = 0;
pub const VERT_2: TriangleVertexIndex = 1;
pub const VERT_3: TriangleVertexIndex = 2;

/// Bit patterns of the coordinates of a vertex, usable as a hash key.
///
/// Two vertices have the same key if and only if their coordinates are exactly equal.
pub type VertexKey = [FloatBits; 2];

/// Returns the [VertexKey] of `vertex`. `-0.` and `0.` share the same key.
#[inline]
pub fn vertex_key(vertex: Vertex) -> VertexKey {
    // Adding a positive zero turns a negative zero into a positive one and leaves any other value untouched
    [(vertex.x + 0.).to_bits(), (vertex.y + 0.).to_bits()]
}

#[derive(Debug, Copy, Clone, Eq, Hash, PartialEq)]
pub struct Edge {
    pub from: VertexId,
    pub to: VertexId,
}
impl Edge {
    #[inline]
    pub fn new(from: VertexId, to: VertexId) -> Self {
        Self { from, to }
    }

    #[inline]
    pub fn to_segment(&self, vertices: &[Vertex]) -> Segment {
        Segment::new(vertices[self.from], vertices[self.to])
    }
}

/// Intersection points of two segments, see [segments_intersection]
pub type SegmentIntersection = ArrayVec<Vertex, 2>;

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Segment {
    pub p1: Vertex,
    pub p2: Vertex,
}
impl Segment {
    #[inline]
    pub fn new(p1: Vertex, p2: Vertex) -> Self {
        Self { p1, p2 }
    }

    #[inline]
    pub fn midpoint(&self) -> Vertex {
        (self.p1 + self.p2) / 2.
    }

    /// See [segments_intersection]
    #[inline]
    pub fn intersection(&self, other: &Segment) -> SegmentIntersection {
        segments_intersection(self, other)
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Circle {
    pub center: Vertex,
    pub radius: Float,
    pub radius_squared: Float,
}
impl Circle {
    /// Returns `true` if `p` is strictly inside the circle. Points on the circle are not enclosed.
    #[inline]
    pub fn encloses(&self, p: Vertex) -> bool {
        self.center.distance_squared(p) < self.radius_squared
    }
}

/// A non-degenerate triangle, with its circumcircle.
///
/// The vertices order is the one given at creation, it can be clockwise or counter-clockwise.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Triangle {
    verts: [Vertex; 3],
    circumcircle: Circle,
}

impl Triangle {
    /// Returns [None] if the vertices are collinear (or not distinct), in which case they have no circumcircle.
    #[inline]
    pub fn new(v1: Vertex, v2: Vertex, v3: Vertex) -> Option<Self> {
        let circumcircle = circumcircle(v1, v2, v3)?;
        Some(Self {
            verts: [v1, v2, v3],
            circumcircle,
        })
    }

    #[inline]
    pub fn v1(&self) -> Vertex {
        self.verts[VERT_1 as usize]
    }
    #[inline]
    pub fn v2(&self) -> Vertex {
        self.verts[VERT_2 as usize]
    }
    #[inline]
    pub fn v3(&self) -> Vertex {
        self.verts[VERT_3 as usize]
    }

    #[inline]
    pub fn verts(&self) -> &[Vertex; 3] {
        &self.verts
    }

    #[inline]
    pub fn circumcircle(&self) -> Circle {
        self.circumcircle
    }

    #[inline]
    pub fn edges(&self) -> [Segment; 3] {
        [
            Segment::new(self.v1(), self.v2()),
            Segment::new(self.v2(), self.v3()),
            Segment::new(self.v3(), self.v1()),
        ]
    }

    /// Positive if the vertices are in a counter-clockwise order
    #[inline]
    pub fn signed_area(&self) -> Float {
        signed_area(self.v1(), self.v2(), self.v3())
    }

    #[inline]
    pub fn area(&self) -> Float {
        self.signed_area().abs()
    }

    /// Returns `true` if `p` is inside the triangle or on its boundary
    #[inline]
    pub fn contains(&self, p: Vertex) -> bool {
        is_vertex_in_triangle(self.v1(), self.v2(), self.v3(), p)
    }

    /// Returns `true` if `p` is strictly inside the circumcircle of the triangle
    #[inline]
    pub fn circumcircle_contains(&self, p: Vertex) -> bool {
        self.circumcircle.encloses(p)
    }

    /// Returns `true` if `p` is exactly equal to one of the triangle vertices
    #[inline]
    pub fn has_vertex(&self, p: Vertex) -> bool {
        self.verts.contains(&p)
    }

    /// Key identifying the triangle by its set of vertices, independently of their order
    #[inline]
    pub fn key(&self) -> TriangleKey {
        let mut keys = self.verts.map(vertex_key);
        keys.sort_unstable();
        TriangleKey(keys)
    }

    #[inline]
    pub fn same_vertices(&self, other: &Triangle) -> bool {
        self.key() == other.key()
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TriangleKey(pub [VertexKey; 3]);

/// Ordered, implicitly closed, ring of vertices
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Polygon {
    pub vertices: Vec<Vertex>,
}

impl Polygon {
    #[inline]
    pub fn new(vertices: Vec<Vertex>) -> Self {
        Self { vertices }
    }

    pub fn from_2d_vertices<T: Vertex2d>(vertices: &[T]) -> Self {
        Self {
            vertices: vertices.iter().map(|v| v.to_vertex()).collect(),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    #[inline]
    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    /// Returns `true` if the vertices `i` and `j` are not adjacent in the polygon ring.
    ///
    /// A polygon with less than 4 vertices has no diagonals.
    pub fn is_diagonal(&self, i: VertexId, j: VertexId) -> bool {
        let n = self.vertices.len();
        if n < 4 || i >= n || j >= n {
            return false;
        }
        let distance = (j + n - i) % n;
        distance >= 2 && distance <= n - 2
    }

    /// Boundary edges, the last one closing the ring
    pub fn edges(&self) -> impl Iterator<Item = Segment> + '_ {
        let n = self.vertices.len();
        (0..n).map(move |i| Segment::new(self.vertices[i], self.vertices[(i + 1) % n]))
    }
}

/// A vertex inserted in a [crate::Triangulation]
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Node {
    pub id: NodeId,
    pub vertex: Vertex,
}

impl Node {
    #[inline]
    pub fn new(id: NodeId, vertex: Vertex) -> Self {
        Self { id, vertex }
    }
}

///////////////////////////////////////////////////////////
///                                                     ///
///                        Tests                        ///
///                                                     ///
///////////////////////////////////////////////////////////
