use ghx_polygon_delaunay::{triangulation_from_polygon, TriangulationConfiguration};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing_subscriber::{layer::SubscriberExt, Registry};
use tracing_tracy::TracyLayer;

pub const SEED: &[u8; 32] = b"\xfb\xdc\x4e\xa0\x30\xde\x82\xba\x69\x97\x3c\x52\x49\x4d\x00\xca
\x5c\x21\xa3\x8d\x5c\xf2\x34\x4e\x58\x7d\x80\x16\x66\x23\x30";

/// Star-shaped polygon: vertices sorted by angle around the origin, at a random distance from it
pub fn random_star_polygon(count: usize, seed: [u8; 32]) -> Vec<[f64; 2]> {
    let radius = rand::distributions::Uniform::new_inclusive(50., 100.);
    let mut rng = StdRng::from_seed(seed);
    let step = std::f64::consts::TAU / count as f64;
    (0..count)
        .map(|i| {
            let angle = i as f64 * step;
            let r = rng.sample(radius);
            [r * angle.cos(), r * angle.sin()]
        })
        .collect()
}

const VERTICES_COUNT: usize = 14;

fn main() {
    let subscriber = Registry::default().with(TracyLayer::default());
    tracing::subscriber::set_global_default(subscriber).expect("Failed to set subscriber");

    let polygon = random_star_polygon(VERTICES_COUNT, *SEED);

    let _triangulation = triangulation_from_polygon(
        &polygon,
        TriangulationConfiguration {
            parallel_vertex_count_threshold: 256,
            ..Default::default()
        },
    );
}
