use glam::Vec2;

/// The float type used in the algorithm's computations
pub type Float = f32;
/// The vertex type used in the algorithm's computations
pub type Vertex = Vec2;
/// Unsigned integer holding the bit pattern of a [Float]
pub type FloatBits = u32;
