use cgmath::{perspective, Deg, Matrix4, Point3, Vector3};

/// Perspective projection that follows the window's aspect ratio.
#[derive(Debug, Clone, PartialEq)]
pub struct Projection {
    pub fov: Deg<f32>,
    pub near: f32,
    pub far: f32,
    aspect: f32,
    matrix: Matrix4<f32>,
}

impl Projection {
    pub fn new(fov: Deg<f32>, near: f32, far: f32, width: u32, height: u32) -> Self {
        let mut projection = Self {
            fov,
            near,
            far,
            aspect: 1.0,
            matrix: Matrix4::from_scale(1.0),
        };
        projection.resize(width, height);

        projection
    }

    /// Recomputes the matrix for a new framebuffer size. A zero-sized
    /// framebuffer (minimized window) keeps the previous aspect ratio.
    pub fn resize(&mut self, width: u32, height: u32) -> bool {
        if width == 0 || height == 0 {
            return false;
        }

        self.aspect = width as f32 / height as f32;
        self.matrix = perspective(self.fov, self.aspect, self.near, self.far);

        true
    }

    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    pub fn matrix(&self) -> Matrix4<f32> {
        self.matrix
    }
}

impl Default for Projection {
    fn default() -> Self {
        Self::new(Deg(45.0), 0.1, 1000.0, 800, 600)
    }
}

/// Viewer placed at the origin looking down -Z.
pub fn default_view() -> Matrix4<f32> {
    Matrix4::look_at_rh(
        Point3::new(0.0, 0.0, 0.0),
        Point3::new(0.0, 0.0, -1.0),
        Vector3::unit_y(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::SquareMatrix;

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-5
    }

    #[test]
    fn resize_only_changes_aspect_term() {
        let mut projection = Projection::default();
        let before = projection.matrix();

        assert!(projection.resize(1024, 768));
        let after = projection.matrix();

        assert!(approx(projection.aspect(), 1024.0 / 768.0));

        let f = 1.0 / (22.5_f32.to_radians()).tan();
        assert!(approx(after.x.x, f / (1024.0 / 768.0)));
        assert!(approx(before.x.x, f / (800.0 / 600.0)));

        assert!(approx(after.y.y, f));
        assert!(approx(after.y.y, before.y.y));
        assert!(approx(after.z.z, (1000.0 + 0.1) / (0.1 - 1000.0)));
        assert!(approx(after.z.z, before.z.z));
        assert!(approx(after.w.z, before.w.z));
        assert!(approx(after.z.w, -1.0));
    }

    #[test]
    fn zero_size_is_ignored() {
        let mut projection = Projection::default();
        let before = projection.clone();

        assert!(!projection.resize(0, 600));
        assert_eq!(projection, before);
    }

    #[test]
    fn default_view_is_identity() {
        let view: [[f32; 4]; 4] = default_view().into();
        let identity: [[f32; 4]; 4] = Matrix4::identity().into();

        for (a, b) in view.iter().flatten().zip(identity.iter().flatten()) {
            assert!(approx(*a, *b));
        }
    }
}
