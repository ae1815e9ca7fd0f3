use std::ffi::c_void;
use thiserror::Error;

pub struct GeometryBuilder<'a> {
    attributes: Vec<VertexAttribute>,
    data: &'a [f32],
    primitive: Primitive,
}

impl<'a> GeometryBuilder<'a> {
    pub fn new(data: &'a [f32]) -> Self {
        Self {
            data,
            attributes: Vec::new(),
            primitive: Primitive::Triangles,
        }
    }

    pub fn with_attribute(mut self, attr: VertexAttribute) -> Self {
        self.attributes.push(attr);
        self
    }

    pub fn with_primitive(mut self, primitive: Primitive) -> Self {
        self.primitive = primitive;
        self
    }

    /// Checks the data against the attribute layout without touching the GPU.
    /// Returns the interleaved stride in floats and the vertex count.
    pub fn layout(&self) -> Result<(usize, usize), GBError> {
        let stride: usize = self.attributes.iter().map(|a| a.size()).sum();

        if stride == 0 {
            return Err(GBError::NoAttributes);
        }

        if self.data.len() % stride != 0 {
            return Err(GBError::InvalidDataLength);
        }

        let vertices = self.data.len() / stride;

        if vertices < self.primitive.min_vertices() {
            return Err(GBError::TooFewVertices {
                primitive: self.primitive,
                vertices,
            });
        }

        Ok((stride, vertices))
    }

    pub fn build(self) -> Result<Geometry, GBError> {
        let (stride, vertices) = self.layout()?;

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

            let mut offset = 0;

            for (i, attr) in self.attributes.iter().enumerate() {
                gl::VertexAttribPointer(
                    i as u32,
                    attr.size() as i32,
                    gl::FLOAT,
                    gl::FALSE,
                    (stride * std::mem::size_of::<f32>()) as i32,
                    (offset * std::mem::size_of::<f32>()) as *const c_void,
                );
                offset += attr.size();
                gl::EnableVertexAttribArray(i as u32);
            }

            gl::BindVertexArray(0);
            gl::BindBuffer(gl::ARRAY_BUFFER, 0);
        }

        Ok(Geometry {
            vao,
            vbo,
            vertices,
            primitive: self.primitive,
        })
    }
}

#[derive(Debug, Error)]
pub enum GBError {
    #[error("Invalid data length for given attributes")]
    InvalidDataLength,
    #[error("Geometry needs at least one vertex attribute")]
    NoAttributes,
    #[error("{vertices} vertices are not enough for {primitive:?}")]
    TooFewVertices {
        primitive: Primitive,
        vertices: usize,
    },
}

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

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Primitive {
    /// Every three vertices form an independent triangle.
    Triangles,
    /// Every vertex after the second closes a triangle with the two before it.
    TriangleStrip,
}

impl Primitive {
    pub fn gl_mode(&self) -> u32 {
        match self {
            Primitive::Triangles => gl::TRIANGLES,
            Primitive::TriangleStrip => gl::TRIANGLE_STRIP,
        }
    }

    pub fn min_vertices(&self) -> usize {
        3
    }

    /// Number of triangles rasterized for `vertices` vertices.
    pub fn triangle_count(&self, vertices: usize) -> usize {
        match self {
            Primitive::Triangles => vertices / 3,
            Primitive::TriangleStrip => vertices.saturating_sub(2),
        }
    }

    /// Vertex indices of every triangle, with strip winding already
    /// corrected so all triangles keep the orientation of the first one.
    pub fn triangles(&self, vertices: usize) -> Vec<[usize; 3]> {
        match self {
            Primitive::Triangles => (0..vertices / 3)
                .map(|t| [t * 3, t * 3 + 1, t * 3 + 2])
                .collect(),
            Primitive::TriangleStrip => (0..self.triangle_count(vertices))
                .map(|t| {
                    if t % 2 == 0 {
                        [t, t + 1, t + 2]
                    } else {
                        [t + 1, t, t + 2]
                    }
                })
                .collect(),
        }
    }
}

pub struct Geometry {
    vao: u32,
    vbo: u32,
    vertices: usize,
    primitive: Primitive,
}

impl Geometry {
    pub fn vao(&self) -> u32 {
        self.vao
    }
    pub fn vertices(&self) -> usize {
        self.vertices
    }
    pub fn primitive(&self) -> Primitive {
        self.primitive
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interleaved_layout() {
        let data = [0.0_f32; 18];
        let builder = GeometryBuilder::new(&data)
            .with_attribute(VertexAttribute::Vec3)
            .with_attribute(VertexAttribute::Vec3);

        assert_eq!(builder.layout().unwrap(), (6, 3));
    }

    #[test]
    fn layout_errors() {
        let data = [0.0_f32; 10];

        assert!(matches!(
            GeometryBuilder::new(&data).layout(),
            Err(GBError::NoAttributes)
        ));
        assert!(matches!(
            GeometryBuilder::new(&data)
                .with_attribute(VertexAttribute::Vec3)
                .layout(),
            Err(GBError::InvalidDataLength)
        ));
        assert!(matches!(
            GeometryBuilder::new(&data[..6])
                .with_attribute(VertexAttribute::Vec3)
                .with_primitive(Primitive::TriangleStrip)
                .layout(),
            Err(GBError::TooFewVertices { vertices: 2, .. })
        ));
    }

    #[test]
    fn triangle_counts() {
        assert_eq!(Primitive::Triangles.triangle_count(3), 1);
        assert_eq!(Primitive::Triangles.triangle_count(6), 2);
        assert_eq!(Primitive::TriangleStrip.triangle_count(4), 2);
        assert_eq!(Primitive::TriangleStrip.triangle_count(2), 0);
    }

    #[test]
    fn strip_triangles_keep_orientation() {
        assert_eq!(
            Primitive::TriangleStrip.triangles(4),
            vec![[0, 1, 2], [2, 1, 3]]
        );
        assert_eq!(Primitive::Triangles.triangles(3), vec![[0, 1, 2]]);
    }
}
