use gl::types::GLint;

use crate::geometry::Geometry;
use crate::program::Program;

#[derive(Default)]
pub struct GlRenderer {
    current_program: u32,
}

impl GlRenderer {
    pub fn new() -> Self {
        Self { current_program: 0 }
    }

    pub fn begin(&mut self, program: &Program) {
        let p_id = program.get_id();
        if self.current_program != p_id {
            unsafe { gl::UseProgram(p_id) }
            self.current_program = p_id;
        }
    }

    /// Uploads a column-major 4x4 matrix to the active program.
    pub fn set_matrix4(&self, location: GLint, matrix: &[f32; 16]) {
        unsafe {
            gl::UniformMatrix4fv(location, 1, gl::FALSE, matrix.as_ptr());
        }
    }

    pub fn draw(&self, geometry: &Geometry) {
        unsafe {
            gl::BindVertexArray(geometry.vao());
            gl::DrawArrays(gl::TRIANGLES, 0, geometry.vertices() as i32);
            gl::BindVertexArray(0);
        }
    }

    pub fn end(&mut self) {
        unsafe { gl::UseProgram(0) }
        self.current_program = 0;
    }

    pub fn resize(&self, width: u32, height: u32) {
        unsafe {
            gl::Viewport(0, 0, width as i32, height as i32);
        }
    }

    pub fn clear_color(&self, [r, g, b, a]: [f32; 4]) {
        unsafe {
            gl::ClearColor(r, g, b, a);
            gl::Clear(gl::COLOR_BUFFER_BIT);
        }
    }
}
