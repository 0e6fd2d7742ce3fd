pub mod insertion;
pub mod poly;
pub mod polygon;
pub mod triangulation;
pub mod types;
pub mod utils;
pub mod vertex_merge;

#[cfg(feature = "debug_context")]
pub mod debug;

pub use glam;
pub use hashbrown;

pub use insertion::Insertion;
pub use poly::{PolyFile, PolyFileError};
pub use polygon::preprocess_polygon;
pub use triangulation::{
    brute_force_triangulation, triangulation_from_2d_vertices, triangulation_from_polygon,
    Triangulation, TriangulationConfiguration, TriangulationError,
};
pub use vertex_merge::VertexMerge;

///////////////////////////////////////////////////////////
///                                                     ///
///                        Tests                        ///
///                                                     ///
///////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use hashbrown::HashSet;

    use crate::{
        poly::PolyFile,
        triangulation::TriangulationConfiguration,
        triangulation_from_polygon,
        types::{Float, Polygon, Triangle, Vertex},
        Triangulation,
    };

    fn total_area(triangles: &[Triangle]) -> Float {
        triangles.iter().map(|t| t.area()).sum()
    }

    #[test]
    fn unit_square_polygon() {
        // 3-------------2
        // |  \       /  |
        // |     \ /     |
        // |     / \     |
        // |  /       \  |
        // 0-------------1
        let square = Polygon::new(vec![
            Vertex::new(0., 0.),
            Vertex::new(1., 0.),
            Vertex::new(1., 1.),
            Vertex::new(0., 1.),
        ]);

        let triangulation =
            Triangulation::from_polygon(&square, TriangulationConfiguration::default())
                .expect("Triangulation should succeed");

        assert_eq!(5, triangulation.vertices().len());
        assert_eq!(4, triangulation.nodes().len());

        // The replay of (0,1) removes (c,01,00) and (01,c,11), giving the contour [c, 01, 00, 11].
        // Its fan pair (00, 11) spans the square diagonal and overlaps the 2 other triangles.
        let c = Vertex::new(0.5, 0.5);
        let [v0, v1, v2, v3] = [
            square.vertices[0],
            square.vertices[1],
            square.vertices[2],
            square.vertices[3],
        ];
        let verts: Vec<[Vertex; 3]> = triangulation
            .triangles()
            .iter()
            .map(|t| *t.verts())
            .collect();
        assert_eq!(
            vec![[c, v0, v1], [c, v1, v2], [v0, v2, v3], [v2, c, v3]],
            verts
        );
        assert_eq!(1.25, total_area(triangulation.triangles()));
        assert!(!triangulation.delaunay_violations().is_empty());

        for (id, node) in triangulation.nodes().iter().enumerate() {
            assert_eq!(id, node.id);
            assert_eq!(square.vertices[id], node.vertex);
        }
    }

    #[test]
    fn triangle_polygon() {
        let triangulation = triangulation_from_polygon(
            &[[0., 0.], [2., 0.], [1., 3.]],
            TriangulationConfiguration::default(),
        )
        .expect("Triangulation should succeed");

        assert_eq!(1, triangulation.triangles_count());
        assert_eq!(3., total_area(triangulation.triangles()));
        assert_eq!(3, triangulation.nodes().len());
    }

    #[test]
    fn degenerate_polygons() {
        for n in 0..3 {
            let vertices: Vec<[f64; 2]> = (0..n).map(|i| [i as f64, 0.]).collect();

            let triangulation =
                triangulation_from_polygon(&vertices, TriangulationConfiguration::default())
                    .expect("Triangulation should succeed");

            assert!(triangulation.triangles().is_empty());
            assert_eq!(n, triangulation.nodes().len());
        }
    }

    #[test]
    fn convex_pentagon() {
        //        3
        //     /     \
        //  4           2
        //  |           |
        //   0 ------- 1
        let pentagon = Polygon::new(vec![
            Vertex::new(0., 0.),
            Vertex::new(4., 0.),
            Vertex::new(5., 3.),
            Vertex::new(2., 5.),
            Vertex::new(-1., 3.),
        ]);

        let triangulation =
            Triangulation::from_polygon(&pentagon, TriangulationConfiguration::default())
                .expect("Triangulation should succeed");

        assert_eq!(10, triangulation.vertices().len());
        assert_eq!(5, triangulation.nodes().len());
        assert!(triangulation.triangles_count() > 0);
        let keys: HashSet<_> = triangulation.triangles().iter().map(|t| t.key()).collect();
        assert_eq!(keys.len(), triangulation.triangles_count());
        for triangle in triangulation.triangles() {
            assert!(triangle.signed_area() != 0.);
            for vertex in triangle.verts() {
                assert!(triangulation.vertices().contains(vertex));
            }
        }
    }

    #[test]
    fn polygon_with_invalid_vertex() {
        let result = triangulation_from_polygon(
            &[[0., 0.], [f64::NAN, 1.], [1., 1.]],
            TriangulationConfiguration::default(),
        );

        assert!(result.is_err());
    }

    #[test]
    fn poly_file_to_triangulation() {
        let poly = PolyFile::parse("4 2 0 0\n1 0 0\n2 4 0\n3 4 4\n4 0 4\n4 0\n1 1 2\n2 2 3\n3 3 4\n4 4 1\n0\n")
            .expect("Parsing should succeed");

        let triangulation =
            Triangulation::from_polygon(&poly.polygon(), TriangulationConfiguration::default())
                .expect("Triangulation should succeed");

        // Same replay as the unit square, scaled by 4
        assert_eq!(4, triangulation.triangles_count());
        assert_eq!(20., total_area(triangulation.triangles()));
    }
}
