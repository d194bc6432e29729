use gl::types::{GLenum, GLint, GLuint};
use std::ffi::{c_char, CString};
use std::fmt;
use thiserror::Error;

/// Size of the buffer handed to the driver for info logs, one byte is kept
/// for the terminating NUL.
pub const INFO_LOG_LEN: usize = 1024;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl ShaderStage {
    pub fn gl_enum(&self) -> GLenum {
        match self {
            ShaderStage::Vertex => gl::VERTEX_SHADER,
            ShaderStage::Fragment => gl::FRAGMENT_SHADER,
        }
    }
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ShaderStage::Vertex => "vertex",
            ShaderStage::Fragment => "fragment",
        };

        write!(f, "{name} ({})", self.gl_enum())
    }
}

pub struct ProgramBuilder<'a> {
    vert: &'a str,
    frag: &'a str,
}

impl<'a> ProgramBuilder<'a> {
    pub fn new(vert_src: &'a str, frag_src: &'a str) -> Self {
        Self {
            vert: vert_src,
            frag: frag_src,
        }
    }

    pub fn build(self) -> Result<Program, PBError> {
        let id = unsafe { gl::CreateProgram() };
        if id == 0 {
            return Err(PBError::Creation);
        }

        // Dropping this deletes the GL program on every early return below.
        let program = Program { id };

        let vert = compile_shader(ShaderStage::Vertex, self.vert)?;
        let frag = match compile_shader(ShaderStage::Fragment, self.frag) {
            Ok(frag) => frag,
            Err(e) => {
                unsafe { gl::DeleteShader(vert) };
                return Err(e);
            }
        };

        let mut success: i32 = 0;

        unsafe {
            gl::AttachShader(program.id, vert);
            gl::AttachShader(program.id, frag);
            gl::LinkProgram(program.id);

            // Flagged for deletion, released together with the program.
            gl::DeleteShader(vert);
            gl::DeleteShader(frag);

            gl::GetProgramiv(program.id, gl::LINK_STATUS, (&mut success) as *mut i32);
        }
        if success != 1 {
            return Err(PBError::Linking(program_info_log(program.id)));
        }

        unsafe {
            gl::ValidateProgram(program.id);
            gl::GetProgramiv(program.id, gl::VALIDATE_STATUS, (&mut success) as *mut i32);
        }
        if success != 1 {
            return Err(PBError::Validation(program_info_log(program.id)));
        }

        tracing::debug!(program = program.id, "linked and validated shader program");

        Ok(program)
    }
}

/// Compiles a single stage. Only the compile status is checked, linking is
/// the program's job.
pub fn compile_shader(stage: ShaderStage, source: &str) -> Result<GLuint, PBError> {
    let source = CString::new(source).map_err(|_| PBError::InteriorNul)?;
    let mut success: i32 = 0;

    unsafe {
        let shader = gl::CreateShader(stage.gl_enum());
        if shader == 0 {
            return Err(PBError::Creation);
        }

        gl::ShaderSource(
            shader,
            1,
            (&source.as_ptr()) as *const *const c_char,
            std::ptr::null(),
        );

        gl::CompileShader(shader);
        gl::GetShaderiv(shader, gl::COMPILE_STATUS, (&mut success) as *mut i32);
        if success != 1 {
            let mut buf = [0_u8; INFO_LOG_LEN];

            gl::GetShaderInfoLog(
                shader,
                INFO_LOG_LEN as i32,
                std::ptr::null_mut(),
                buf.as_mut_ptr() as *mut c_char,
            );
            gl::DeleteShader(shader);

            return Err(PBError::Compilation {
                stage,
                log: info_log_from_buffer(&buf),
            });
        }

        Ok(shader)
    }
}

fn program_info_log(program: GLuint) -> String {
    let mut buf = [0_u8; INFO_LOG_LEN];

    unsafe {
        gl::GetProgramInfoLog(
            program,
            INFO_LOG_LEN as i32,
            std::ptr::null_mut(),
            buf.as_mut_ptr() as *mut c_char,
        );
    }

    info_log_from_buffer(&buf)
}

/// Cuts a driver log at its first NUL, never reading more than
/// `INFO_LOG_LEN - 1` characters.
pub fn info_log_from_buffer(buf: &[u8]) -> String {
    let limit = buf.len().min(INFO_LOG_LEN - 1);
    let data = buf[..limit].split(|a| *a == 0).next().unwrap_or_default();

    String::from_utf8_lossy(data).trim_end().to_string()
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PBError {
    #[error("Could not create shader object")]
    Creation,
    #[error("Shader source contains a NUL byte")]
    InteriorNul,
    #[error("Error compiling the {stage} shader: {log}")]
    Compilation { stage: ShaderStage, log: String },
    #[error("Error linking program: {0}")]
    Linking(String),
    #[error("Error validating program: {0}")]
    Validation(String),
}

pub struct Program {
    id: GLuint,
}

impl Program {
    pub fn get_id(&self) -> GLuint {
        self.id
    }

    /// Location of a uniform, -1 when the linker dropped or never saw it.
    pub fn uniform_location(&self, name: &str) -> Result<GLint, PBError> {
        let name = CString::new(name).map_err(|_| PBError::InteriorNul)?;
        let location = unsafe { gl::GetUniformLocation(self.id, name.as_ptr()) };

        if location == -1 {
            tracing::warn!(?name, "uniform is not active in program {}", self.id);
        }

        Ok(location)
    }
}

impl Drop for Program {
    fn drop(&mut self) {
        unsafe { gl::DeleteProgram(self.id) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_stops_at_nul() {
        let mut buf = [0_u8; INFO_LOG_LEN];
        let msg = b"0:3(1): error: syntax error\n";
        buf[..msg.len()].copy_from_slice(msg);

        assert_eq!(info_log_from_buffer(&buf), "0:3(1): error: syntax error");
        assert_eq!(info_log_from_buffer(&[0; 16]), "");
        assert_eq!(info_log_from_buffer(&[]), "");
    }

    #[test]
    fn log_is_capped() {
        let buf = [b'x'; INFO_LOG_LEN + 10];

        assert_eq!(info_log_from_buffer(&buf).len(), INFO_LOG_LEN - 1);
    }

    #[test]
    fn stage_names_carry_gl_code() {
        assert_eq!(ShaderStage::Vertex.gl_enum(), gl::VERTEX_SHADER);
        assert_eq!(ShaderStage::Fragment.to_string(), "fragment (35632)");

        let err = PBError::Compilation {
            stage: ShaderStage::Vertex,
            log: "oops".into(),
        };
        assert_eq!(
            err.to_string(),
            "Error compiling the vertex (35633) shader: oops"
        );
    }
}
