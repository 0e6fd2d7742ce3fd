use tracing::trace;

use crate::{
    triangulation::{Triangulation, TriangulationError},
    types::{Node, NodeId, Triangle, TriangleId, Vertex, Vertex2d},
    vertex_merge::UniqueVertices,
};

#[cfg(feature = "debug_context")]
use crate::debug::Phase;

#[cfg(feature = "profile_traces")]
use tracing::{span, Level};

/// Summary of a [Triangulation::insert_vertex]
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Insertion {
    /// Id of the node created for the inserted vertex
    pub node: NodeId,
    pub removed_triangles: usize,
    pub created_triangles: usize,
}

impl Triangulation {
    /// Inserts a vertex in the mesh:
    /// 1. every triangle containing the vertex (boundary included) is removed
    /// 2. the vertices of the removed triangles are collected (merged with the configured [crate::vertex_merge::VertexMerge]),
    ///    and a new triangle is formed between each consecutive pair of them and the inserted vertex.
    ///    Degenerate triangles, triangles with a vertex merged with the inserted one and triangles already in the mesh are not added.
    /// 3. the vertex is recorded as a new [Node]
    ///
    /// If no triangle contains the vertex (empty mesh, or vertex outside of the mesh), only the node is recorded:
    /// the mesh is not extended.
    ///
    /// The triangles are located by containment and not by circumcircle, the result is not guaranteed to be a Delaunay triangulation.
    pub fn insert_vertex<T: Vertex2d>(&mut self, vertex: T) -> Result<Insertion, TriangulationError> {
        #[cfg(feature = "profile_traces")]
        let _span = span!(Level::TRACE, "insert_vertex").entered();

        let vertex = vertex.to_vertex();
        let node_id = self.nodes.len();
        if !vertex.is_finite() {
            return Err(TriangulationError::InvalidVertex {
                index: node_id,
                x: vertex.x as f64,
                y: vertex.y as f64,
            });
        }

        let located = self.locate_triangles(vertex);

        #[cfg(feature = "debug_context")]
        self.debug_context.push_snapshot(
            Phase::LocateTriangles(node_id),
            &self.triangles,
            &located,
        );

        let removed = self.remove_triangles(&located);
        let created_triangles = self.form_new_triangles(vertex, &removed);

        #[cfg(feature = "debug_context")]
        {
            let created_ids: Vec<TriangleId> =
                (self.triangles.len() - created_triangles..self.triangles.len()).collect();
            self.debug_context.push_snapshot(
                Phase::FanTriangles(node_id),
                &self.triangles,
                &created_ids,
            );
        }

        self.nodes.push(Node::new(node_id, vertex));

        Ok(Insertion {
            node: node_id,
            removed_triangles: removed.len(),
            created_triangles,
        })
    }

    /// Ids, in increasing order, of all the triangles containing `vertex` (boundary included)
    pub fn locate_triangles(&self, vertex: Vertex) -> Vec<TriangleId> {
        self.triangles
            .iter()
            .enumerate()
            .filter(|(_, triangle)| triangle.contains(vertex))
            .map(|(id, _)| id)
            .collect()
    }

    /// `ids` MUST be sorted in increasing order. The order of the remaining triangles is preserved.
    fn remove_triangles(&mut self, ids: &[TriangleId]) -> Vec<Triangle> {
        if ids.is_empty() {
            return Vec::new();
        }

        let mut removed = Vec::with_capacity(ids.len());
        let mut next_removed = 0;
        let mut id = 0;
        self.triangles.retain(|triangle| {
            let remove = next_removed < ids.len() && ids[next_removed] == id;
            id += 1;
            if remove {
                next_removed += 1;
                removed.push(*triangle);
            }
            !remove
        });
        for triangle in removed.iter() {
            self.triangle_keys.remove(&triangle.key());
        }
        removed
    }

    /// Connects `vertex` to the contour of the removed triangles. Returns the number of triangles created.
    ///
    /// The contour is the list of the removed triangles vertices in the order they are first encountered,
    /// it is not sorted around `vertex`.
    fn form_new_triangles(&mut self, vertex: Vertex, removed_triangles: &[Triangle]) -> usize {
        if removed_triangles.is_empty() {
            trace!(
                "Vertex ({}, {}) is not contained in any triangle",
                vertex.x,
                vertex.y
            );
            return 0;
        }

        let mut contour = UniqueVertices::with_capacity(self.vertex_merge, 3 * removed_triangles.len());
        for triangle in removed_triangles {
            contour.extend(triangle.verts().iter().copied());
        }
        let contour = contour.as_slice();

        let mut created = 0;
        for (index, &p1) in contour.iter().enumerate() {
            let p2 = contour[(index + 1) % contour.len()];
            // With a tolerance, the inserted vertex can be merged with a contour vertex without being equal to it
            if self.vertex_merge.are_merged(p1, vertex) || self.vertex_merge.are_merged(p2, vertex) {
                trace!(
                    "Skipping triangle ({}, {}) ({}, {}): vertex ({}, {}) is merged with one of them",
                    p1.x,
                    p1.y,
                    p2.x,
                    p2.y,
                    vertex.x,
                    vertex.y
                );
                continue;
            }
            let Some(triangle) = Triangle::new(p1, p2, vertex) else {
                trace!(
                    "Skipping degenerate triangle ({}, {}) ({}, {}) ({}, {})",
                    p1.x,
                    p1.y,
                    p2.x,
                    p2.y,
                    vertex.x,
                    vertex.y
                );
                continue;
            };
            if self.add_triangle(triangle) {
                created += 1;
            }
        }
        created
    }
}

///////////////////////////////////////////////////////////
///                                                     ///
///                        Tests                        ///
///                                                     ///
///////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use hashbrown::HashSet;
    use proptest::prelude::*;

    use crate::{
        insertion::Insertion,
        triangulation::{Triangulation, TriangulationConfiguration, TriangulationError},
        types::{Float, Node, Triangle, Vertex},
        vertex_merge::VertexMerge,
    };

    fn single_triangle() -> Triangulation {
        Triangulation::from_2d_vertices(
            &[[0., 0.], [4., 0.], [0., 4.]],
            TriangulationConfiguration::default(),
        )
        .expect("Triangulation should succeed")
    }

    fn total_area(triangles: &[Triangle]) -> Float {
        triangles.iter().map(|t| t.area()).sum()
    }

    #[test]
    fn insert_inside_triangle() {
        let mut triangulation = single_triangle();

        let insertion = triangulation
            .insert_vertex(Vertex::new(1., 1.))
            .expect("Insertion should succeed");

        assert_eq!(
            Insertion {
                node: 0,
                removed_triangles: 1,
                created_triangles: 3
            },
            insertion
        );
        assert_eq!(3, triangulation.triangles_count());
        assert_eq!(8., total_area(triangulation.triangles()));
        for triangle in triangulation.triangles() {
            assert!(triangle.has_vertex(Vertex::new(1., 1.)));
        }
        assert_eq!(
            &[Node::new(0, Vertex::new(1., 1.))],
            triangulation.nodes()
        );
    }

    #[test]
    fn insert_outside_is_a_no_op() {
        let mut triangulation = single_triangle();
        let before = triangulation.triangles().to_vec();

        let insertion = triangulation
            .insert_vertex([10., 10.])
            .expect("Insertion should succeed");

        assert_eq!(0, insertion.removed_triangles);
        assert_eq!(0, insertion.created_triangles);
        assert_eq!(before, triangulation.triangles());
        assert_eq!(1, triangulation.nodes().len());
    }

    #[test]
    fn insert_in_empty_triangulation() {
        let mut triangulation = Triangulation::default();

        triangulation
            .insert_vertex(Vertex::new(0., 0.))
            .expect("Insertion should succeed");
        triangulation
            .insert_vertex(Vertex::new(1., 0.))
            .expect("Insertion should succeed");

        assert_eq!(0, triangulation.triangles_count());
        assert_eq!(2, triangulation.nodes().len());
        assert_eq!(1, triangulation.nodes()[1].id);
    }

    #[test]
    fn insert_existing_vertex_rebuilds_same_triangle() {
        let mut triangulation = single_triangle();
        let before = triangulation.triangles()[0];

        let insertion = triangulation
            .insert_vertex(Vertex::new(0., 0.))
            .expect("Insertion should succeed");

        // The contour contains the inserted vertex: 2 of the 3 fan triangles are degenerate
        assert_eq!(1, insertion.removed_triangles);
        assert_eq!(1, insertion.created_triangles);
        assert_eq!(1, triangulation.triangles_count());
        assert!(triangulation.triangles()[0].same_vertices(&before));
    }

    #[test]
    fn insert_vertex_merged_with_contour_vertex() {
        let mut triangulation = Triangulation::from_2d_vertices(
            &[[0., 0.], [4., 0.], [0., 4.]],
            TriangulationConfiguration {
                vertex_merge: VertexMerge::Tolerance(1e-6),
                ..Default::default()
            },
        )
        .expect("Triangulation should succeed");

        let insertion = triangulation
            .insert_vertex(Vertex::new(1e-9, 1e-9))
            .expect("Insertion should succeed");

        // Only the triangle opposite to (0,0) is formed, no sliver triangle along (0,0)
        assert_eq!(1, insertion.removed_triangles);
        assert_eq!(1, insertion.created_triangles);
        assert_eq!(1, triangulation.triangles_count());
        for triangle in triangulation.triangles() {
            assert!(triangle.area() > 1.);
        }
    }

    #[test]
    fn insert_on_edge() {
        let mut triangulation = single_triangle();

        let insertion = triangulation
            .insert_vertex(Vertex::new(2., 0.))
            .expect("Insertion should succeed");

        // (0,0) (4,0) (2,0) is degenerate
        assert_eq!(2, insertion.created_triangles);
        assert_eq!(8., total_area(triangulation.triangles()));
    }

    #[test]
    fn insertion_does_not_preserve_delaunay_property() {
        let mut triangulation = Triangulation::from_2d_vertices(
            &[[0., 0.], [10., 0.], [5., 2.], [5., -20.]],
            TriangulationConfiguration::default(),
        )
        .expect("Triangulation should succeed");
        assert_eq!(2, triangulation.triangles_count());
        assert!(triangulation.delaunay_violations().is_empty());

        let insertion = triangulation
            .insert_vertex(Vertex::new(5., 0.1))
            .expect("Insertion should succeed");
        assert_eq!(1, insertion.removed_triangles);
        assert_eq!(3, insertion.created_triangles);

        // The circumcircle of the new thin triangle (0,0) (10,0) (5,0.1) contains (5,-20)
        let violations = triangulation.delaunay_violations();
        assert!(violations.iter().any(|violation| {
            triangulation.triangles()[violation.triangle].has_vertex(Vertex::new(5., 0.1))
                && triangulation.vertices().get(violation.vertex) == Some(&Vertex::new(5., -20.))
        }));
    }

    #[test]
    fn insert_invalid_vertex() {
        let mut triangulation = single_triangle();

        let result = triangulation.insert_vertex(Vertex::new(Float::NAN, 0.));

        assert!(matches!(
            result,
            Err(TriangulationError::InvalidVertex { index: 0, .. })
        ));
        assert!(triangulation.nodes().is_empty());
        assert_eq!(1, triangulation.triangles_count());
    }

    fn small_point_set() -> impl Strategy<Value = Vec<[f64; 2]>> {
        prop::collection::vec((-10i32..10, -10i32..10), 3..8).prop_map(|coords| {
            coords
                .into_iter()
                .map(|(x, y)| [x as f64, y as f64])
                .collect()
        })
    }

    proptest! {
        #[test]
        fn insertion_invariants(points in small_point_set(), inserted in prop::collection::vec((-10i32..10, -10i32..10), 1..5)) {
            let mut triangulation = Triangulation::from_2d_vertices(&points, TriangulationConfiguration::default()).unwrap();

            for (index, (x, y)) in inserted.iter().enumerate() {
                let insertion = triangulation.insert_vertex([*x as f64, *y as f64]).unwrap();
                prop_assert_eq!(index, insertion.node);

                for triangle in triangulation.triangles() {
                    prop_assert!(triangle.signed_area() != 0.);
                }
                let keys: HashSet<_> = triangulation.triangles().iter().map(|t| t.key()).collect();
                prop_assert_eq!(keys.len(), triangulation.triangles_count());
            }
            prop_assert_eq!(inserted.len(), triangulation.nodes().len());
        }
    }
}
