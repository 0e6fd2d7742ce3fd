use rand::{rngs::StdRng, Rng, SeedableRng};

pub const SEED: &[u8; 32] = b"\xfb\xdc\x4e\xa0\x30\xde\x82\xba\x69\x97\x3c\x52\x49\x4d\x00\xca
\x5c\x21\xa3\x8d\x5c\xf2\x34\x4e\x58\x7d\x80\x16\x66\x23\x30";

/// Uniformly distributed points in `[-range, range]²`
pub fn uniform_points(count: usize, range: f64, seed: [u8; 32]) -> Vec<[f64; 2]> {
    let distribution = rand::distributions::Uniform::new_inclusive(-range, range);
    let mut rng = StdRng::from_seed(seed);
    (0..count)
        .map(|_| [rng.sample(distribution), rng.sample(distribution)])
        .collect()
}

/// Convex polygon with `count` vertices on a circle of radius `radius`, with a jitter on the angles
pub fn jittered_regular_polygon(count: usize, radius: f64, seed: [u8; 32]) -> Vec<[f64; 2]> {
    let step = std::f64::consts::TAU / count as f64;
    let jitter = rand::distributions::Uniform::new_inclusive(-0.25 * step, 0.25 * step);
    let mut rng = StdRng::from_seed(seed);
    (0..count)
        .map(|i| {
            let angle = i as f64 * step + rng.sample(jitter);
            [radius * angle.cos(), radius * angle.sin()]
        })
        .collect()
}
