use cgmath::{Matrix4, Vector3};

use gl_wrapper::geometry::{GBError, Primitive};

use crate::lesson::Lesson;

// All triangles are wound counter-clockwise when viewed from +Z.

#[rustfmt::skip]
pub const TRIANGLE: [f32; 9] = [
     0.0,  1.0, 0.0, // top
    -1.0, -1.0, 0.0, // bottom left
     1.0, -1.0, 0.0, // bottom right
];

#[rustfmt::skip]
pub const SQUARE: [f32; 12] = [
    -1.0, -1.0, 0.0, // bottom left
     1.0, -1.0, 0.0, // bottom right
    -1.0,  1.0, 0.0, // top left
     1.0,  1.0, 0.0, // top right
];

#[rustfmt::skip]
pub const TRIANGLE_COLORS: [f32; 9] = [
    1.0, 0.0, 0.0,
    0.0, 1.0, 0.0,
    0.0, 0.0, 1.0,
];

#[rustfmt::skip]
pub const SQUARE_COLORS: [f32; 12] = [
    0.5, 0.5, 1.0,
    0.5, 0.5, 1.0,
    0.5, 0.5, 1.0,
    0.5, 0.5, 1.0,
];

/// Vertex positions with optional parallel per-vertex colors.
#[derive(Debug, Clone)]
pub struct Mesh {
    pub positions: Vec<f32>,
    pub colors: Option<Vec<f32>>,
    pub primitive: Primitive,
}

impl Mesh {
    pub fn new(positions: &[f32], primitive: Primitive) -> Self {
        Self {
            positions: positions.to_vec(),
            colors: None,
            primitive,
        }
    }

    /// Attaches one RGB triple per vertex.
    pub fn with_colors(mut self, colors: &[f32]) -> Result<Self, GBError> {
        if colors.len() != self.positions.len() {
            return Err(GBError::InvalidDataLength);
        }

        self.colors = Some(colors.to_vec());

        Ok(self)
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len() / 3
    }

    /// Positions and colors interleaved per vertex, ready for upload.
    pub fn vertex_data(&self) -> Vec<f32> {
        match &self.colors {
            None => self.positions.clone(),
            Some(colors) => self
                .positions
                .chunks_exact(3)
                .zip(colors.chunks_exact(3))
                .flat_map(|(p, c)| p.iter().chain(c.iter()).copied())
                .collect(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SceneObject {
    pub mesh: Mesh,
    pub translation: Vector3<f32>,
}

impl SceneObject {
    pub fn model(&self) -> Matrix4<f32> {
        Matrix4::from_translation(self.translation)
    }
}

#[derive(Debug, Clone, Default)]
pub struct Scene {
    pub objects: Vec<SceneObject>,
}

impl Scene {
    pub fn new() -> Self {
        Self {
            objects: Vec::new(),
        }
    }

    pub fn push(mut self, item: SceneObject) -> Self {
        self.objects.push(item);

        self
    }

    /// Triangle on the left, square on the right, both six units in front
    /// of the viewer.
    pub fn for_lesson(lesson: Lesson) -> Result<Self, GBError> {
        if !lesson.draws_geometry() {
            return Ok(Self::new());
        }

        let mut triangle = Mesh::new(&TRIANGLE, Primitive::Triangles);
        let mut square = Mesh::new(&SQUARE, Primitive::TriangleStrip);

        if lesson.has_vertex_colors() {
            triangle = triangle.with_colors(&TRIANGLE_COLORS)?;
            square = square.with_colors(&SQUARE_COLORS)?;
        }

        let scene = Self::new()
            .push(SceneObject {
                mesh: triangle,
                translation: Vector3::new(-1.5, 0.0, -6.0),
            })
            .push(SceneObject {
                mesh: square,
                translation: Vector3::new(1.5, 0.0, -6.0),
            });

        Ok(scene)
    }

    pub fn draw_commands(
        &self,
        projection: Matrix4<f32>,
        view: Matrix4<f32>,
    ) -> Vec<DrawCommand> {
        let view_projection = projection * view;

        self.objects
            .iter()
            .enumerate()
            .map(|(object, o)| DrawCommand {
                object,
                mvp: view_projection * o.model(),
                primitive: o.mesh.primitive,
                vertices: o.mesh.vertex_count(),
            })
            .collect()
    }
}

/// One draw call of a frame: which uploaded object to bind and what to
/// upload to its MVP uniform.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawCommand {
    pub object: usize,
    pub mvp: Matrix4<f32>,
    pub primitive: Primitive,
    pub vertices: usize,
}

impl DrawCommand {
    pub fn mvp_array(&self) -> [f32; 16] {
        *AsRef::<[f32; 16]>::as_ref(&self.mvp)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::projection::{default_view, Projection};
    use cgmath::Vector4;

    fn signed_area(positions: &[f32], [a, b, c]: [usize; 3]) -> f32 {
        let p = |i: usize| (positions[i * 3], positions[i * 3 + 1]);
        let (ax, ay) = p(a);
        let (bx, by) = p(b);
        let (cx, cy) = p(c);

        ((bx - ax) * (cy - ay) - (by - ay) * (cx - ax)) / 2.0
    }

    #[test]
    fn shapes_draw_plan() {
        let scene = Scene::for_lesson(Lesson::Shapes).unwrap();
        let commands = scene.draw_commands(Projection::default().matrix(), default_view());

        assert_eq!(commands.len(), 2);

        assert_eq!(commands[0].primitive, Primitive::Triangles);
        assert_eq!(commands[0].vertices, 3);
        assert_eq!(commands[0].primitive.triangle_count(3), 1);

        assert_eq!(commands[1].primitive, Primitive::TriangleStrip);
        assert_eq!(commands[1].vertices, 4);
        assert_eq!(commands[1].primitive.triangle_count(4), 2);
    }

    #[test]
    fn blank_lesson_has_no_objects() {
        let scene = Scene::for_lesson(Lesson::Blank).unwrap();

        assert!(scene.objects.is_empty());
        assert!(scene
            .draw_commands(Projection::default().matrix(), default_view())
            .is_empty());
    }

    #[test]
    fn every_triangle_is_counter_clockwise() {
        for object in Scene::for_lesson(Lesson::Shapes).unwrap().objects {
            let mesh = object.mesh;

            for tri in mesh.primitive.triangles(mesh.vertex_count()) {
                assert!(signed_area(&mesh.positions, tri) > 0.0);
            }
        }
    }

    #[test]
    fn square_strip_covers_the_quad() {
        let tris = Primitive::TriangleStrip.triangles(4);
        let area: f32 = tris.iter().map(|t| signed_area(&SQUARE, *t)).sum();

        assert_eq!(area, 4.0);
    }

    #[test]
    fn colors_are_interleaved() {
        let scene = Scene::for_lesson(Lesson::Colors).unwrap();
        let triangle = &scene.objects[0].mesh;

        #[rustfmt::skip]
        let expected = vec![
             0.0,  1.0, 0.0, 1.0, 0.0, 0.0,
            -1.0, -1.0, 0.0, 0.0, 1.0, 0.0,
             1.0, -1.0, 0.0, 0.0, 0.0, 1.0,
        ];

        assert_eq!(triangle.vertex_data(), expected);
        assert_eq!(triangle.vertex_count(), 3);
        assert_eq!(
            Scene::for_lesson(Lesson::Shapes).unwrap().objects[1]
                .mesh
                .vertex_data(),
            SQUARE.to_vec()
        );
    }

    #[test]
    fn mvp_places_objects_in_front_of_viewer() {
        let projection = Projection::default().matrix();
        let commands = Scene::for_lesson(Lesson::Shapes)
            .unwrap()
            .draw_commands(projection, default_view());

        let origin = Vector4::new(0.0, 0.0, 0.0, 1.0);
        let left = commands[0].mvp * origin;
        let right = commands[1].mvp * origin;

        assert!(left.x / left.w < 0.0);
        assert!(right.x / right.w > 0.0);
        assert!((left.w - 6.0).abs() < 1e-5);

        let expected: [[f32; 4]; 4] =
            (projection * Matrix4::from_translation(Vector3::new(-1.5, 0.0, -6.0))).into();
        let actual: [[f32; 4]; 4] = commands[0].mvp.into();

        for (a, e) in actual.iter().flatten().zip(expected.iter().flatten()) {
            assert!((a - e).abs() < 1e-5);
        }
    }

    #[test]
    fn mismatched_colors_are_rejected() {
        let mesh = Mesh::new(&TRIANGLE, Primitive::Triangles);

        assert!(matches!(
            mesh.clone().with_colors(&SQUARE_COLORS),
            Err(GBError::InvalidDataLength)
        ));
        assert!(mesh.with_colors(&TRIANGLE_COLORS).is_ok());
    }

    #[test]
    fn mvp_array_is_column_major() {
        let command = DrawCommand {
            object: 0,
            mvp: Matrix4::from_translation(Vector3::new(1.0, 2.0, 3.0)),
            primitive: Primitive::Triangles,
            vertices: 3,
        };

        let arr = command.mvp_array();

        assert_eq!(&arr[12..15], &[1.0, 2.0, 3.0]);
        assert_eq!(arr[15], 1.0);
    }
}
