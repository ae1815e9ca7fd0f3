use std::path::{Path, PathBuf};
use thiserror::Error;

pub const VERTEX_FILE: &str = "vertex.glsl";
pub const FRAGMENT_FILE: &str = "fragment.glsl";

/// GLSL text of both stages, read once at startup.
#[derive(Debug, Clone)]
pub struct ShaderSources {
    pub vertex: String,
    pub fragment: String,
}

impl ShaderSources {
    pub fn load<P: AsRef<Path>>(dir: P) -> Result<Self, ShaderSourceError> {
        let dir = dir.as_ref();

        Ok(Self {
            vertex: read(dir.join(VERTEX_FILE))?,
            fragment: read(dir.join(FRAGMENT_FILE))?,
        })
    }
}

fn read(path: PathBuf) -> Result<String, ShaderSourceError> {
    std::fs::read_to_string(&path).map_err(|source| ShaderSourceError { path, source })
}

#[derive(Debug, Error)]
#[error("could not read shader {path:?}: {source}")]
pub struct ShaderSourceError {
    pub path: PathBuf,
    #[source]
    pub source: std::io::Error,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lesson::Lesson;

    fn shipped(lesson: Lesson) -> ShaderSources {
        let root = Path::new(env!("CARGO_MANIFEST_DIR")).join("shaders");

        ShaderSources::load(lesson.shader_dir(&root)).unwrap()
    }

    #[test]
    fn shipped_shaders_declare_mvp() {
        for lesson in [Lesson::Shapes, Lesson::Colors] {
            let sources = shipped(lesson);

            assert!(sources.vertex.contains("uniform mat4 MVP"));
            assert!(sources.vertex.contains("void main()"));
            assert!(sources.fragment.contains("void main()"));
        }
    }

    #[test]
    fn color_shaders_pass_vertex_color() {
        let sources = shipped(Lesson::Colors);

        assert!(sources.vertex.contains("layout(location = 1) in vec3"));
        assert!(sources.fragment.contains("in vec3 vertexColor"));
    }

    #[test]
    fn missing_file_names_path() {
        let dir = std::env::temp_dir().join("nehe-missing-shaders");

        let err = ShaderSources::load(&dir).unwrap_err();

        assert_eq!(err.path, dir.join(VERTEX_FILE));
        assert_eq!(err.source.kind(), std::io::ErrorKind::NotFound);
    }
}
