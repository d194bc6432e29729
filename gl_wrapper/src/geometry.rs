use std::ffi::c_void;
use thiserror::Error;

pub struct GeometryBuilder<'a> {
    attributes: Vec<VertexAttribute>,
    data: &'a [f32],
}

impl<'a> GeometryBuilder<'a> {
    pub fn new(data: &'a [f32]) -> Self {
        Self {
            data,
            attributes: Vec::new(),
        }
    }

    pub fn with_attribute(mut self, attr: VertexAttribute) -> Self {
        self.attributes.push(attr);
        self
    }

    /// Floats per vertex across all attributes.
    pub fn vertex_size(&self) -> usize {
        self.attributes.iter().map(|a| a.size()).sum()
    }

    /// Attribute pointers as they will be handed to `glVertexAttribPointer`.
    ///
    /// A lone attribute is tightly packed, so its stride is left at 0 and GL
    /// derives it. Interleaved attributes get an explicit byte stride.
    pub fn layout(&self) -> Vec<AttributePointer> {
        let float = std::mem::size_of::<f32>();
        let stride = if self.attributes.len() == 1 {
            0
        } else {
            self.vertex_size() * float
        };

        let mut offset = 0;

        self.attributes
            .iter()
            .enumerate()
            .map(|(i, attr)| {
                let pointer = AttributePointer {
                    index: i as u32,
                    components: attr.size(),
                    stride,
                    offset,
                };
                offset += attr.size() * float;
                pointer
            })
            .collect()
    }

    pub fn build(self) -> Result<Geometry, GBError> {
        let total_len = self.vertex_size();

        if total_len == 0 {
            return Err(GBError::NoAttributes);
        }

        if self.data.is_empty() || self.data.len() % total_len != 0 {
            return Err(GBError::InvalidDataLength);
        }

        let mut vao = 0;
        let mut vbo = 0;

        unsafe {
            gl::GenVertexArrays(1, (&mut vao) as *mut u32);
            gl::GenBuffers(1, (&mut vbo) as *mut u32);

            gl::BindVertexArray(vao);
            gl::BindBuffer(gl::ARRAY_BUFFER, vbo);

            gl::BufferData(
                gl::ARRAY_BUFFER,
                std::mem::size_of_val(self.data) as isize,
                self.data.as_ptr() as *const c_void,
                gl::STATIC_DRAW,
            );

            for pointer in self.layout() {
                gl::VertexAttribPointer(
                    pointer.index,
                    pointer.components as i32,
                    gl::FLOAT,
                    gl::FALSE,
                    pointer.stride as i32,
                    pointer.offset as *const c_void,
                );
                gl::EnableVertexAttribArray(pointer.index);
            }

            gl::BindBuffer(gl::ARRAY_BUFFER, 0);
            gl::BindVertexArray(0);
        }

        let vertices = self.data.len() / total_len;

        tracing::debug!(vao, vbo, vertices, "uploaded geometry");

        Ok(Geometry { vao, vbo, vertices })
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GBError {
    #[error("Geometry needs at least one vertex attribute")]
    NoAttributes,
    #[error("Invalid data length for given attributes")]
    InvalidDataLength,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum VertexAttribute {
    Float,
    Vec2,
    Vec3,
}

impl VertexAttribute {
    pub fn size(&self) -> usize {
        match self {
            VertexAttribute::Float => 1,
            VertexAttribute::Vec2 => 2,
            VertexAttribute::Vec3 => 3,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct AttributePointer {
    pub index: u32,
    pub components: usize,
    /// In bytes, 0 means tightly packed.
    pub stride: usize,
    /// In bytes from the start of a vertex.
    pub offset: usize,
}

pub struct Geometry {
    vao: u32,
    vbo: u32,
    vertices: usize,
}

impl Geometry {
    pub fn vao(&self) -> u32 {
        self.vao
    }
    pub fn vertices(&self) -> usize {
        self.vertices
    }
}

impl Drop for Geometry {
    fn drop(&mut self) {
        unsafe {
            gl::DeleteBuffers(1, (&self.vbo) as *const u32);
            gl::DeleteVertexArrays(1, (&self.vao) as *const u32);
        }
    }
}
