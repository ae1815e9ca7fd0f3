use crate::lesson::Lesson;
use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Default, Parser)]
#[command(about = "NeHe OpenGL lessons")]
pub struct Args {
    /// Lesson to show, overrides the config file
    #[arg(short, long, value_enum)]
    pub lesson: Option<Lesson>,
    /// JSON5 settings file
    #[arg(short, long)]
    pub config: Option<PathBuf>,
    /// Directory holding one sub-directory of GLSL sources per lesson
    #[arg(long)]
    pub shader_dir: Option<PathBuf>,
    #[arg(long)]
    pub width: Option<u32>,
    #[arg(long)]
    pub height: Option<u32>,
}
