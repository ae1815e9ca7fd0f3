use std::time::Duration;

use cgmath::Matrix4;
use log::{debug, info};

use gl_wrapper::geometry::GBError;

use crate::config::Settings;
use crate::input::{Command, Controls, Key};
use crate::lesson::Lesson;
use crate::projection::{default_view, Projection};
use crate::scene::{DrawCommand, Scene};

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum WindowMode {
    Windowed,
    Fullscreen,
}

impl WindowMode {
    pub fn toggled(self) -> Self {
        match self {
            WindowMode::Windowed => WindowMode::Fullscreen,
            WindowMode::Fullscreen => WindowMode::Windowed,
        }
    }
}

/// Everything a frame needs, computed without touching the GPU.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub clear_color: [f32; 3],
    pub commands: Vec<DrawCommand>,
}

/// Window-independent lesson state driven by the event loop callbacks.
pub struct Tutorial {
    lesson: Lesson,
    clear_color: [f32; 3],
    projection: Projection,
    view: Matrix4<f32>,
    scene: Scene,
    controls: Controls,
    window_mode: WindowMode,
    running: bool,
    elapsed: Duration,
    frames: u64,
}

impl Tutorial {
    pub fn new(settings: &Settings) -> Result<Self, GBError> {
        Ok(Self {
            lesson: settings.lesson,
            clear_color: settings.clear_color,
            projection: settings.projection(),
            view: default_view(),
            scene: Scene::for_lesson(settings.lesson)?,
            controls: Controls::new(),
            window_mode: WindowMode::Windowed,
            running: true,
            elapsed: Duration::ZERO,
            frames: 0,
        })
    }

    pub fn lesson(&self) -> Lesson {
        self.lesson
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn projection(&self) -> &Projection {
        &self.projection
    }

    pub fn window_mode(&self) -> WindowMode {
        self.window_mode
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// The scenes are static; only the clock advances.
    pub fn on_update(&mut self, dt: Duration) {
        if self.running {
            self.elapsed += dt;
        }
    }

    pub fn on_resize(&mut self, width: u32, height: u32) -> bool {
        let changed = self.projection.resize(width, height);

        if changed {
            debug!("Projection aspect ratio now {}", self.projection.aspect());
        }

        changed
    }

    /// Applies the key to the lesson state and returns the command the window
    /// layer has to carry out, if any.
    pub fn on_key(&mut self, key: Key, pressed: bool) -> Option<Command> {
        if !self.running {
            return None;
        }

        let command = self.controls.on_key(key, pressed)?;

        match command {
            Command::Quit => {
                info!("Quit requested after {} frames", self.frames);
                self.running = false;
            }
            Command::ToggleFullscreen => {
                self.window_mode = self.window_mode.toggled();
                info!("Switching to {:?}", self.window_mode);
            }
        }

        Some(command)
    }

    pub fn close(&mut self) {
        self.running = false;
    }

    /// Builds the next frame, or `None` once the lesson has terminated.
    pub fn frame(&mut self) -> Option<Frame> {
        if !self.running {
            return None;
        }

        self.frames += 1;

        Some(Frame {
            clear_color: self.clear_color,
            commands: self
                .scene
                .draw_commands(self.projection.matrix(), self.view),
        })
    }
}
