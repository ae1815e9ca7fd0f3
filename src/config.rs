use std::path::{Path, PathBuf};

use cgmath::Deg;
use serde::Deserialize;
use thiserror::Error;

use crate::args::Args;
use crate::lesson::Lesson;
use crate::projection::Projection;

pub const CORNFLOWER_BLUE: [f32; 3] = [0.392, 0.584, 0.929];

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub lesson: Lesson,
    pub width: u32,
    pub height: u32,
    /// Defaults to the lesson title when unset.
    pub title: Option<String>,
    pub vsync: bool,
    pub clear_color: [f32; 3],
    pub shader_dir: PathBuf,
    pub fov_deg: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            lesson: Lesson::default(),
            width: 800,
            height: 600,
            title: None,
            vsync: true,
            clear_color: CORNFLOWER_BLUE,
            shader_dir: PathBuf::from("shaders"),
            fov_deg: 45.0,
            near: 0.1,
            far: 1000.0,
        }
    }
}

impl Settings {
    pub fn from_json5(src: &str) -> Result<Self, ConfigError> {
        let settings: Settings = json5::from_str(src).map_err(ConfigError::FormatError)?;
        settings.validate()?;

        Ok(settings)
    }

    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let src = std::fs::read_to_string(path).map_err(ConfigError::InputError)?;

        Self::from_json5(&src)
    }

    /// Settings from the optional config file, with command line flags on top.
    pub fn resolve(args: &Args) -> Result<Self, ConfigError> {
        let mut settings = match &args.config {
            Some(path) => Self::load_from_path(path)?,
            None => Self::default(),
        };

        if let Some(lesson) = args.lesson {
            settings.lesson = lesson;
        }
        if let Some(dir) = &args.shader_dir {
            settings.shader_dir = dir.clone();
        }
        if let Some(width) = args.width {
            settings.width = width;
        }
        if let Some(height) = args.height {
            settings.height = height;
        }

        settings.validate()?;

        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::Invalid(format!(
                "window size {}x{} must be non-zero",
                self.width, self.height
            )));
        }

        if !(self.fov_deg > 0.0 && self.fov_deg < 180.0) {
            return Err(ConfigError::Invalid(format!(
                "field of view {} must be between 0 and 180 degrees",
                self.fov_deg
            )));
        }

        let finite = self.near.is_finite() && self.far.is_finite();

        if !(finite && self.near > 0.0 && self.near < self.far) {
            return Err(ConfigError::Invalid(format!(
                "clip planes near {} / far {} must satisfy 0 < near < far",
                self.near, self.far
            )));
        }

        if self.clear_color.iter().any(|c| !(0.0..=1.0).contains(c)) {
            return Err(ConfigError::Invalid(format!(
                "clear color {:?} must be in 0..1",
                self.clear_color
            )));
        }

        Ok(())
    }

    pub fn title(&self) -> String {
        self.title.clone().unwrap_or_else(|| self.lesson.title())
    }

    pub fn lesson_shader_dir(&self) -> PathBuf {
        self.lesson.shader_dir(&self.shader_dir)
    }

    pub fn projection(&self) -> Projection {
        Projection::new(
            Deg(self.fov_deg),
            self.near,
            self.far,
            self.width,
            self.height,
        )
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Could not read settings file: {0}")]
    InputError(std::io::Error),
    #[error("Settings file is not valid JSON5: {0}")]
    FormatError(json5::Error),
    #[error("Invalid settings: {0}")]
    Invalid(String),
}
