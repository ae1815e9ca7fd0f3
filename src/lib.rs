pub mod args;
pub mod config;
pub mod input;
pub mod lesson;
pub mod projection;
pub mod scene;
pub mod shader_source;
pub mod state;

pub use lesson::Lesson;
pub use state::{Frame, Tutorial, WindowMode};
