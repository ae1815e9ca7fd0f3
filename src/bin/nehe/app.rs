use glutin::config::{Config, ConfigTemplateBuilder};
use glutin::context::{
    ContextApi, ContextAttributesBuilder, NotCurrentGlContextSurfaceAccessor,
    PossiblyCurrentContext, Version,
};
use glutin::display::{GetGlDisplay, GlDisplay};
use glutin::surface::{GlSurface, Surface, SurfaceAttributesBuilder, SwapInterval, WindowSurface};

use glutin_winit::DisplayBuilder;

use raw_window_handle::HasRawWindowHandle;

use log::{debug, info, warn};

use std::ffi::{c_char, CStr, CString};
use std::num::NonZeroU32;
use std::time::Instant;

use thiserror::Error;

use winit::dpi::{PhysicalSize, Size};
use winit::event::{ElementState, Event, KeyboardInput, VirtualKeyCode, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::window::{Fullscreen, Window, WindowBuilder};

use gl_wrapper::geometry::{GBError, Geometry, GeometryBuilder, VertexAttribute};
use gl_wrapper::program::{PBError, Program, ProgramBuilder, Uniform};
use gl_wrapper::renderer::GlRenderer;

use nehe::config::{ConfigError, Settings};
use nehe::input::{Command, Key};
use nehe::scene::Mesh;
use nehe::shader_source::{ShaderSourceError, ShaderSources};
use nehe::{Tutorial, WindowMode};

const MVP_UNIFORM: &str = "MVP";

/// GPU side of a lesson: one linked program and one uploaded buffer per
/// scene object, in scene order.
struct GpuScene {
    program: Program,
    mvp: Uniform,
    objects: Vec<Geometry>,
}

pub struct App {
    // GL objects must be released while the context is still alive.
    gpu_scene: Option<GpuScene>,
    gl_renderer: GlRenderer,
    gl_context: PossiblyCurrentContext,
    gl_window: GlWindow,
    settings: Settings,
    tutorial: Tutorial,
    last_update: Instant,
}

impl App {
    pub fn new(settings: Settings, event_loop: &EventLoop<()>) -> Result<Self, AppError> {
        let window_builder = WindowBuilder::new()
            .with_inner_size(Size::Physical(PhysicalSize::new(
                settings.width,
                settings.height,
            )))
            .with_min_inner_size(Size::Physical(PhysicalSize::new(32, 32)))
            .with_title(settings.title());
        let display_builder = DisplayBuilder::new().with_window_builder(Some(window_builder));
        let template = ConfigTemplateBuilder::new().with_depth_size(24);

        // glutin only calls the picker with at least one matching config
        let (window, gl_config) = display_builder
            .build(event_loop, template, |mut configs| configs.next().unwrap())
            .map_err(|e| AppError::Display(e.to_string()))?;

        let window = window.ok_or(AppError::NoWindow)?;
        let handle = Some(window.raw_window_handle());
        let gl_display = gl_config.display();

        let context_attr = ContextAttributesBuilder::new()
            .with_context_api(ContextApi::OpenGl(Some(Version::new(3, 3))))
            .build(handle);

        let gl_window = GlWindow::new(window, &gl_config)?;

        let gl_context = unsafe { gl_display.create_context(&gl_config, &context_attr)? }
            .make_current(&gl_window.surface)?;

        gl::load_with(|s| match CString::new(s) {
            Ok(name) => gl_display.get_proc_address(name.as_c_str()).cast(),
            Err(_) => std::ptr::null(),
        });

        if let Some(version) = gl_string(gl::VERSION) {
            info!("OpenGL {version}");
        }

        let interval = if settings.vsync {
            SwapInterval::Wait(NonZeroU32::MIN)
        } else {
            SwapInterval::DontWait
        };
        if let Err(e) = gl_window.surface.set_swap_interval(&gl_context, interval) {
            warn!("Could not set swap interval: {e}");
        }

        let gl_renderer = GlRenderer::new();
        gl_renderer.resize(settings.width, settings.height);

        let tutorial = Tutorial::new(&settings)?;

        Ok(Self {
            gpu_scene: None,
            gl_renderer,
            gl_context,
            gl_window,
            settings,
            tutorial,
            last_update: Instant::now(),
        })
    }

    /// Uploads the scene geometry and builds the lesson's shader program.
    pub fn on_load(&mut self) -> Result<(), AppError> {
        let lesson = self.tutorial.lesson();

        if !lesson.draws_geometry() {
            info!("{} has nothing to upload", lesson.title());
            return Ok(());
        }

        let objects = self
            .tutorial
            .scene()
            .objects
            .iter()
            .map(|o| upload(&o.mesh))
            .collect::<Result<Vec<_>, _>>()?;

        let dir = self.settings.lesson_shader_dir();
        let sources = ShaderSources::load(&dir)?;
        let program = ProgramBuilder::new(&sources.vertex, &sources.fragment).build()?;
        info!("Shader program built from {dir:?}");

        let mvp = program.uniform(MVP_UNIFORM)?;

        self.gpu_scene = Some(GpuScene {
            program,
            mvp,
            objects,
        });

        Ok(())
    }

    pub fn on_render(&mut self) {
        let Some(frame) = self.tutorial.frame() else {
            return;
        };

        let [r, g, b] = frame.clear_color;
        self.gl_renderer.clear_color(r, g, b);

        if let Some(gpu) = &self.gpu_scene {
            self.gl_renderer.use_program(&gpu.program);

            for command in &frame.commands {
                self.gl_renderer.set_mat4(gpu.mvp, &command.mvp_array());
                self.gl_renderer
                    .draw(&gpu.objects[command.object], &gpu.program);
            }

            self.gl_renderer.release_program();
        }

        if let Err(e) = self.gl_window.surface.swap_buffers(&self.gl_context) {
            warn!("Buffer swap failed: {e}");
        }
    }

    fn on_resize(&mut self, size: PhysicalSize<u32>) {
        let (Some(width), Some(height)) =
            (NonZeroU32::new(size.width), NonZeroU32::new(size.height))
        else {
            return;
        };

        self.gl_window
            .surface
            .resize(&self.gl_context, width, height);
        self.gl_renderer.resize(size.width, size.height);
        self.tutorial.on_resize(size.width, size.height);

        debug!("Resized to {}x{}", size.width, size.height);
    }

    fn on_key(&mut self, input: KeyboardInput, control_flow: &mut ControlFlow) {
        let key = match input.virtual_keycode {
            Some(VirtualKeyCode::Escape) => Key::Escape,
            Some(VirtualKeyCode::F1) => Key::F1,
            _ => return,
        };

        match self
            .tutorial
            .on_key(key, input.state == ElementState::Pressed)
        {
            Some(Command::Quit) => control_flow.set_exit(),
            Some(Command::ToggleFullscreen) => {
                let fullscreen = match self.tutorial.window_mode() {
                    WindowMode::Fullscreen => Some(Fullscreen::Borderless(None)),
                    WindowMode::Windowed => None,
                };
                self.gl_window.window.set_fullscreen(fullscreen);
            }
            None => {}
        }
    }

    pub fn run(mut self, event_loop: EventLoop<()>) -> ! {
        event_loop.run(move |event, _window_target, control_flow| {
            *control_flow = ControlFlow::Poll;
            match event {
                Event::MainEventsCleared => {
                    let now = Instant::now();
                    self.tutorial.on_update(now - self.last_update);
                    self.last_update = now;

                    if self.tutorial.is_running() {
                        self.gl_window.window.request_redraw();
                    } else {
                        control_flow.set_exit();
                    }
                }
                Event::RedrawRequested(_) => self.on_render(),
                Event::WindowEvent { event, .. } => match event {
                    WindowEvent::Resized(size) => self.on_resize(size),
                    WindowEvent::KeyboardInput { input, .. } => self.on_key(input, control_flow),
                    WindowEvent::CloseRequested => {
                        self.tutorial.close();
                        control_flow.set_exit();
                    }
                    _ => (),
                },
                Event::LoopDestroyed => {
                    drop(self.gpu_scene.take());
                    info!("Rendered {} frames", self.tutorial.frames());
                }
                _ => (),
            }
        })
    }
}

fn upload(mesh: &Mesh) -> Result<Geometry, GBError> {
    let data = mesh.vertex_data();

    let mut builder = GeometryBuilder::new(&data)
        .with_attribute(VertexAttribute::Vec3)
        .with_primitive(mesh.primitive);

    if mesh.colors.is_some() {
        builder = builder.with_attribute(VertexAttribute::Vec3);
    }

    builder.build()
}

fn gl_string(name: u32) -> Option<String> {
    let ptr = unsafe { gl::GetString(name) };

    if ptr.is_null() {
        return None;
    }

    let s = unsafe { CStr::from_ptr(ptr as *const c_char) };

    Some(s.to_string_lossy().into_owned())
}

pub struct GlWindow {
    // XXX the surface must be dropped before the window.
    pub surface: Surface<WindowSurface>,
    pub window: Window,
}

impl GlWindow {
    pub fn new(window: Window, config: &Config) -> Result<Self, AppError> {
        let (width, height): (u32, u32) = window.inner_size().into();
        let raw_window_handle = window.raw_window_handle();
        let attrs = SurfaceAttributesBuilder::<WindowSurface>::new().build(
            raw_window_handle,
            NonZeroU32::new(width).ok_or(AppError::ZeroSizedWindow)?,
            NonZeroU32::new(height).ok_or(AppError::ZeroSizedWindow)?,
        );

        let surface = unsafe { config.display().create_window_surface(config, &attrs)? };

        Ok(Self { window, surface })
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("Could not open a GL display: {0}")]
    Display(String),
    #[error("Display did not create a window")]
    NoWindow,
    #[error("Window has no drawable area")]
    ZeroSizedWindow,
    #[error("GL context error: {0}")]
    Context(#[from] glutin::error::Error),
    #[error(transparent)]
    ShaderSource(#[from] ShaderSourceError),
    #[error(transparent)]
    Program(#[from] PBError),
    #[error(transparent)]
    Geometry(#[from] GBError),
}
