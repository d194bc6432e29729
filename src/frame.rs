use cgmath::Matrix4;

use crate::animation::Animation;
use crate::TRIANGLE_VERTICES;

pub const CLEAR_COLOR: [f32; 4] = [0.0, 0.0, 0.0, 1.0];

/// Everything the GL side needs to put one frame on screen.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Frame {
    pub clear_color: [f32; 4],
    pub model: Matrix4<f32>,
    pub vertices: usize,
}

impl Frame {
    pub fn new(animation: &Animation) -> Self {
        Self {
            clear_color: CLEAR_COLOR,
            model: animation.model_matrix(),
            vertices: TRIANGLE_VERTICES,
        }
    }

    /// Column-major, ready for `glUniformMatrix4fv` without transposing.
    pub fn model_columns(&self) -> &[f32; 16] {
        self.model.as_ref()
    }
}
