use gl::types::{GLchar, GLint, GLuint};
use log::debug;
use std::ffi::{CStr, CString};
use std::fmt::{Display, Formatter};
use thiserror::Error;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl ShaderStage {
    fn gl_kind(&self) -> u32 {
        match self {
            ShaderStage::Vertex => gl::VERTEX_SHADER,
            ShaderStage::Fragment => gl::FRAGMENT_SHADER,
        }
    }
}

impl Display for ShaderStage {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ShaderStage::Vertex => write!(f, "vertex"),
            ShaderStage::Fragment => write!(f, "fragment"),
        }
    }
}

/// The subset of the GL shader API the program build sequence needs.
///
/// [`GlShaderApi`] forwards to the loaded GL functions, so a context must be
/// current on the calling thread.
pub trait ShaderApi {
    fn create_shader(&mut self, stage: ShaderStage) -> GLuint;
    /// Uploads the source, compiles it and returns the compile status.
    fn compile_shader(&mut self, shader: GLuint, src: &CStr) -> bool;
    fn shader_info_log(&mut self, shader: GLuint) -> String;
    fn delete_shader(&mut self, shader: GLuint);
    fn create_program(&mut self) -> GLuint;
    fn attach_shader(&mut self, program: GLuint, shader: GLuint);
    fn detach_shader(&mut self, program: GLuint, shader: GLuint);
    /// Links the program and returns the link status.
    fn link_program(&mut self, program: GLuint) -> bool;
    fn program_info_log(&mut self, program: GLuint) -> String;
    fn delete_program(&mut self, program: GLuint);
    fn uniform_location(&mut self, program: GLuint, name: &CStr) -> GLint;
}

pub struct GlShaderApi;

impl ShaderApi for GlShaderApi {
    fn create_shader(&mut self, stage: ShaderStage) -> GLuint {
        unsafe { gl::CreateShader(stage.gl_kind()) }
    }

    fn compile_shader(&mut self, shader: GLuint, src: &CStr) -> bool {
        let mut success: GLint = 0;

        unsafe {
            gl::ShaderSource(
                shader,
                1,
                (&src.as_ptr()) as *const *const GLchar,
                std::ptr::null(),
            );
            gl::CompileShader(shader);
            gl::GetShaderiv(shader, gl::COMPILE_STATUS, (&mut success) as *mut GLint);
        }

        success == gl::TRUE as GLint
    }

    fn shader_info_log(&mut self, shader: GLuint) -> String {
        let mut len: GLint = 0;
        unsafe { gl::GetShaderiv(shader, gl::INFO_LOG_LENGTH, (&mut len) as *mut GLint) };

        let mut buf = vec![0_u8; len.max(1) as usize];
        unsafe {
            gl::GetShaderInfoLog(
                shader,
                buf.len() as i32,
                std::ptr::null_mut(),
                buf.as_mut_ptr() as *mut GLchar,
            );
        }

        log_to_string(&buf)
    }

    fn delete_shader(&mut self, shader: GLuint) {
        unsafe { gl::DeleteShader(shader) }
    }

    fn create_program(&mut self) -> GLuint {
        unsafe { gl::CreateProgram() }
    }

    fn attach_shader(&mut self, program: GLuint, shader: GLuint) {
        unsafe { gl::AttachShader(program, shader) }
    }

    fn detach_shader(&mut self, program: GLuint, shader: GLuint) {
        unsafe { gl::DetachShader(program, shader) }
    }

    fn link_program(&mut self, program: GLuint) -> bool {
        let mut success: GLint = 0;

        unsafe {
            gl::LinkProgram(program);
            gl::GetProgramiv(program, gl::LINK_STATUS, (&mut success) as *mut GLint);
        }

        success == gl::TRUE as GLint
    }

    fn program_info_log(&mut self, program: GLuint) -> String {
        let mut len: GLint = 0;
        unsafe { gl::GetProgramiv(program, gl::INFO_LOG_LENGTH, (&mut len) as *mut GLint) };

        let mut buf = vec![0_u8; len.max(1) as usize];
        unsafe {
            gl::GetProgramInfoLog(
                program,
                buf.len() as i32,
                std::ptr::null_mut(),
                buf.as_mut_ptr() as *mut GLchar,
            );
        }

        log_to_string(&buf)
    }

    fn delete_program(&mut self, program: GLuint) {
        unsafe { gl::DeleteProgram(program) }
    }

    fn uniform_location(&mut self, program: GLuint, name: &CStr) -> GLint {
        unsafe { gl::GetUniformLocation(program, name.as_ptr()) }
    }
}

fn log_to_string(buf: &[u8]) -> String {
    let data = buf.split(|a| *a == 0).next().unwrap_or(buf);

    String::from_utf8_lossy(data).trim_end().to_string()
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
        let id = self.build_with(&mut GlShaderApi)?;

        Ok(Program { id })
    }

    /// Runs the compile and link sequence against `api` and returns the raw
    /// program name. Intermediate shader objects are always released; the
    /// program object is released as well when linking fails.
    pub fn build_with<A: ShaderApi>(self, api: &mut A) -> Result<GLuint, PBError> {
        let vert_src = to_c_source(self.vert, ShaderStage::Vertex)?;
        let frag_src = to_c_source(self.frag, ShaderStage::Fragment)?;

        let vert = compile_stage(api, ShaderStage::Vertex, &vert_src)?;
        let frag = match compile_stage(api, ShaderStage::Fragment, &frag_src) {
            Ok(frag) => frag,
            Err(e) => {
                api.delete_shader(vert);
                return Err(e);
            }
        };

        let program = api.create_program();
        api.attach_shader(program, vert);
        api.attach_shader(program, frag);

        let linked = api.link_program(program);

        api.detach_shader(program, vert);
        api.detach_shader(program, frag);
        api.delete_shader(vert);
        api.delete_shader(frag);

        if !linked {
            let log = api.program_info_log(program);
            api.delete_program(program);
            return Err(PBError::Linking(log));
        }

        debug!("Program {program} linked");

        Ok(program)
    }
}

fn to_c_source(src: &str, stage: ShaderStage) -> Result<CString, PBError> {
    CString::new(src).map_err(|_| PBError::InvalidSource(stage))
}

fn compile_stage<A: ShaderApi>(
    api: &mut A,
    stage: ShaderStage,
    src: &CStr,
) -> Result<GLuint, PBError> {
    let shader = api.create_shader(stage);

    if !api.compile_shader(shader, src) {
        let log = api.shader_info_log(shader);
        api.delete_shader(shader);
        return Err(PBError::Compilation { stage, log });
    }

    debug!("{stage} shader compiled");

    Ok(shader)
}

/// Looks up a uniform by name. Uniforms the compiler optimized out resolve
/// to -1 and are reported as missing.
pub fn resolve_uniform<A: ShaderApi>(
    api: &mut A,
    program: GLuint,
    name: &str,
) -> Result<Uniform, PBError> {
    let c_name = CString::new(name).map_err(|_| PBError::MissingUniform(name.to_string()))?;

    match api.uniform_location(program, &c_name) {
        loc if loc >= 0 => Ok(Uniform(loc)),
        _ => Err(PBError::MissingUniform(name.to_string())),
    }
}

#[derive(Debug, Error)]
pub enum PBError {
    #[error("{stage} shader failed to compile: {log}")]
    Compilation { stage: ShaderStage, log: String },
    #[error("program failed to link: {0}")]
    Linking(String),
    #[error("{0} shader source contains a NUL byte")]
    InvalidSource(ShaderStage),
    #[error("uniform `{0}` is not active in the program")]
    MissingUniform(String),
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Uniform(GLint);

impl Uniform {
    pub fn location(&self) -> GLint {
        self.0
    }
}

pub struct Program {
    id: GLuint,
}

impl Program {
    pub fn get_id(&self) -> GLuint {
        self.id
    }

    pub fn uniform(&self, name: &str) -> Result<Uniform, PBError> {
        resolve_uniform(&mut GlShaderApi, self.id, name)
    }
}

impl Drop for Program {
    fn drop(&mut self) {
        unsafe { gl::DeleteProgram(self.id) }
    }
}
