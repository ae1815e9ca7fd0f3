use crate::geometry::Geometry;
use crate::program::{Program, Uniform};

pub struct GlRenderer {
    current_program: u32,
}

impl GlRenderer {
    pub fn new() -> Self {
        unsafe {
            gl::Enable(gl::DEPTH_TEST);
            gl::DepthFunc(gl::LEQUAL);
        }

        Self { current_program: 0 }
    }

    pub fn use_program(&mut self, program: &Program) {
        let p_id = program.get_id();
        if self.current_program != p_id {
            unsafe { gl::UseProgram(p_id) }
            self.current_program = p_id;
        }
    }

    pub fn release_program(&mut self) {
        if self.current_program != 0 {
            unsafe { gl::UseProgram(0) }
            self.current_program = 0;
        }
    }

    /// Uploads a column-major 4x4 matrix to the bound program.
    pub fn set_mat4(&self, uniform: Uniform, matrix: &[f32; 16]) {
        unsafe {
            gl::UniformMatrix4fv(uniform.location(), 1, gl::FALSE, matrix.as_ptr());
        }
    }

    pub fn draw(&mut self, geometry: &Geometry, program: &Program) {
        self.use_program(program);

        unsafe {
            gl::BindVertexArray(geometry.vao());
            gl::DrawArrays(
                geometry.primitive().gl_mode(),
                0,
                geometry.vertices() as i32,
            );
            gl::BindVertexArray(0);
        }
    }

    pub fn resize(&self, width: u32, height: u32) {
        unsafe {
            gl::Viewport(0, 0, width as i32, height as i32);
        }
    }

    pub fn clear_color(&self, r: f32, g: f32, b: f32) {
        unsafe {
            gl::ClearColor(r, g, b, 1.0);
            gl::Clear(gl::COLOR_BUFFER_BIT | gl::DEPTH_BUFFER_BIT);
        }
    }
}
