use std::env;

use ghx_polygon_delaunay::{PolyFile, Triangulation, TriangulationConfiguration};
use tracing_subscriber::{layer::SubscriberExt, Registry};
use tracing_tracy::TracyLayer;

/// Usage: `cargo run --release --example poly_file -- <path/to/file.poly>`
fn main() {
    let subscriber = Registry::default().with(TracyLayer::default());
    tracing::subscriber::set_global_default(subscriber).expect("Failed to set subscriber");

    let path = env::args()
        .nth(1)
        .expect("Expected the path of a .poly file as argument");
    let poly = PolyFile::from_path(&path).expect("Failed to read poly file");

    let triangulation =
        Triangulation::from_polygon(&poly.polygon(), TriangulationConfiguration::default())
            .expect("Triangulation failed");

    println!(
        "{}: {} vertices, {} triangles, {} nodes",
        path,
        triangulation.vertices().len(),
        triangulation.triangles_count(),
        triangulation.nodes().len()
    );
}
