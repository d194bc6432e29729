pub mod animation;
pub mod frame;
pub mod shaders;

/// Object-space positions, one `vec3` per vertex.
#[rustfmt::skip]
pub const TRIANGLE: [f32; 9] = [
    -1.0, -1.0, 0.0,
    1.0, -1.0, 0.0,
    0.0, 1.0, 0.0,
];

pub const TRIANGLE_VERTICES: usize = TRIANGLE.len() / 3;
