//! GLSL sources compiled at startup and the names both sides agree on.

pub const VERTEX_SHADER: &str = include_str!("gl_shaders/triangle.glsl");
pub const FRAGMENT_SHADER: &str = include_str!("gl_shaders/solid.glsl");

/// Uniform receiving the model matrix.
pub const MODEL_UNIFORM: &str = "model";
/// Attribute slot the vertex positions are bound to.
pub const POSITION_ATTRIBUTE: u32 = 0;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vertex_shader_matches_upload_layout() {
        assert!(VERTEX_SHADER.contains(&format!("uniform mat4 {MODEL_UNIFORM};")));
        assert!(VERTEX_SHADER.contains(&format!("layout (location = {POSITION_ATTRIBUTE}) in vec3")));
    }

    #[test]
    fn fragment_shader_is_solid_white() {
        assert!(FRAGMENT_SHADER.contains("color = vec4(1.0);"));
        assert!(!FRAGMENT_SHADER.contains("uniform"));
    }
}
