use clap::ValueEnum;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// The lessons this renderer can show, in increasing order of features.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, ValueEnum, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Lesson {
    /// Empty window cleared every frame.
    Blank,
    /// Triangle and square placed through a model-view-projection matrix.
    #[default]
    Shapes,
    /// Same scene with a per-vertex color attribute.
    Colors,
}

impl Lesson {
    pub const fn number(&self) -> u8 {
        match self {
            Lesson::Blank => 1,
            Lesson::Shapes => 2,
            Lesson::Colors => 3,
        }
    }

    pub const fn name(&self) -> &'static str {
        match self {
            Lesson::Blank => "blank",
            Lesson::Shapes => "shapes",
            Lesson::Colors => "colors",
        }
    }

    pub const fn has_vertex_colors(&self) -> bool {
        matches!(self, Lesson::Colors)
    }

    /// Whether the lesson uploads geometry and needs a shader program.
    pub const fn draws_geometry(&self) -> bool {
        !matches!(self, Lesson::Blank)
    }

    pub fn title(&self) -> String {
        format!("NeHe Lesson {}: {}", self.number(), self.name())
    }

    pub fn shader_dir(&self, root: &Path) -> PathBuf {
        root.join(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capabilities() {
        assert!(!Lesson::Blank.draws_geometry());
        assert!(Lesson::Shapes.draws_geometry());
        assert!(!Lesson::Shapes.has_vertex_colors());
        assert!(Lesson::Colors.has_vertex_colors());
    }

    #[test]
    fn titles_and_dirs() {
        assert_eq!(Lesson::Colors.title(), "NeHe Lesson 3: colors");
        assert_eq!(
            Lesson::Shapes.shader_dir(Path::new("shaders")),
            Path::new("shaders").join("shapes")
        );
    }
}
