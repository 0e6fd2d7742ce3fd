use hashbrown::HashSet;

use crate::types::{vertex_key, Float, Vertex, VertexKey};

/// Defines when two vertices are considered to be the same vertex.
///
/// Used whenever the triangulation builds a set of vertices: when merging the polygon vertices with the diagonals intersections,
/// when deduplicating the input of the brute force triangulation and when collecting the contour of the triangles removed by an insertion.
#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub enum VertexMerge {
    /// Vertices are merged only if their coordinates are exactly equal (`-0.` and `0.` are equal).
    ///
    /// Intersections computed with floating point arithmetic may land very close to an existing vertex without being merged with it.
    #[default]
    Exact,
    /// Vertices are merged if they are closer than the given distance on both axis
    Tolerance(Float),
}

impl VertexMerge {
    #[inline]
    pub fn are_merged(&self, v1: Vertex, v2: Vertex) -> bool {
        match self {
            VertexMerge::Exact => vertex_key(v1) == vertex_key(v2),
            VertexMerge::Tolerance(tolerance) => {
                let dist = v1 - v2;
                dist.x.abs() < *tolerance && dist.y.abs() < *tolerance
            }
        }
    }
}

/// Ordered set of vertices. The first inserted vertex of a group of merged vertices is the one kept.
#[derive(Debug, Clone)]
pub struct UniqueVertices {
    merge: VertexMerge,
    vertices: Vec<Vertex>,
    keys: HashSet<VertexKey>,
}

impl UniqueVertices {
    pub fn new(merge: VertexMerge) -> Self {
        Self {
            merge,
            vertices: Vec::new(),
            keys: HashSet::new(),
        }
    }

    pub fn with_capacity(merge: VertexMerge, capacity: usize) -> Self {
        Self {
            merge,
            vertices: Vec::with_capacity(capacity),
            keys: HashSet::with_capacity(capacity),
        }
    }

    /// Returns `true` if the vertex was added, `false` if it was merged with an existing one
    pub fn insert(&mut self, vertex: Vertex) -> bool {
        let inserted = match self.merge {
            VertexMerge::Exact => self.keys.insert(vertex_key(vertex)),
            // TODO Performance: bucket the vertices on a grid of cell size `tolerance` to avoid the linear search
            VertexMerge::Tolerance(_) => !self
                .vertices
                .iter()
                .any(|existing| self.merge.are_merged(*existing, vertex)),
        };
        if inserted {
            self.vertices.push(vertex);
        }
        inserted
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
    pub fn as_slice(&self) -> &[Vertex] {
        &self.vertices
    }

    #[inline]
    pub fn into_vec(self) -> Vec<Vertex> {
        self.vertices
    }
}

impl Extend<Vertex> for UniqueVertices {
    fn extend<I: IntoIterator<Item = Vertex>>(&mut self, iter: I) {
        for vertex in iter {
            self.insert(vertex);
        }
    }
}

///////////////////////////////////////////////////////////
///                                                     ///
///                        Tests                        ///
///                                                     ///
///////////////////////////////////////////////////////////
