/// Orbit camera and projection for the terminal viewer
use nalgebra::{Matrix4, Point3, Vector3};

/// Terminal cells are roughly twice as tall as they are wide
const CELL_ASPECT: f32 = 0.5;

/// Keep the camera off the poles so `up` stays meaningful
const MAX_PITCH: f32 = 1.5;

/// Projection mode for rendering
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ProjectionMode {
    Orthographic,
    Perspective,
}

/// Camera circling a target point
#[derive(Debug, Clone)]
pub struct OrbitCamera {
    pub target: Point3<f32>,
    pub distance: f32,
    /// Rotation around the vertical axis, 0 looking down -Z
    pub yaw: f32,
    /// Elevation above the horizontal plane
    pub pitch: f32,
    pub fov: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    pub mode: ProjectionMode,
}

impl OrbitCamera {
    pub fn new(width: u32, height: u32) -> Self {
        let mut camera = Self {
            target: Point3::origin(),
            distance: 1.0,
            yaw: 0.0,
            pitch: 0.0,
            fov: std::f32::consts::PI / 4.0, // 45 degrees
            aspect: 1.0,
            near: 0.01,
            far: 10.0,
            mode: ProjectionMode::Perspective,
        };
        camera.resize(width, height);
        camera.reset();
        camera
    }

    /// Look at the fractal from its default vantage point
    pub fn reset(&mut self) {
        self.look_from(Point3::new(1.5, 1.0, 1.5), Point3::new(0.0, 0.3, 0.0));
    }

    pub fn look_from(&mut self, position: Point3<f32>, target: Point3<f32>) {
        let offset = position - target;
        self.target = target;
        self.distance = offset.norm();
        self.yaw = offset.x.atan2(offset.z);
        self.pitch = (offset.y / self.distance).asin();
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.aspect = width.max(1) as f32 * CELL_ASPECT / height.max(1) as f32;
    }

    pub fn orbit(&mut self, d_yaw: f32, d_pitch: f32) {
        self.yaw += d_yaw;
        self.pitch = (self.pitch + d_pitch).clamp(-MAX_PITCH, MAX_PITCH);
    }

    pub fn zoom(&mut self, factor: f32) {
        self.distance = (self.distance * factor).clamp(self.near * 2.0, self.far / 2.0);
    }

    pub fn toggle_projection(&mut self) {
        self.mode = match self.mode {
            ProjectionMode::Perspective => ProjectionMode::Orthographic,
            ProjectionMode::Orthographic => ProjectionMode::Perspective,
        };
    }

    pub fn position(&self) -> Point3<f32> {
        let (sin_yaw, cos_yaw) = self.yaw.sin_cos();
        let (sin_pitch, cos_pitch) = self.pitch.sin_cos();
        self.target
            + Vector3::new(sin_yaw * cos_pitch, sin_pitch, cos_yaw * cos_pitch) * self.distance
    }

    /// Unit vector from the target towards the camera
    pub fn eye_direction(&self) -> Vector3<f32> {
        (self.position() - self.target).normalize()
    }

    /// Create the view matrix (camera transformation)
    pub fn view_matrix(&self) -> Matrix4<f32> {
        Matrix4::look_at_rh(&self.position(), &self.target, &Vector3::y())
    }

    /// Create the projection matrix
    pub fn projection_matrix(&self) -> Matrix4<f32> {
        match self.mode {
            ProjectionMode::Perspective => {
                Matrix4::new_perspective(self.aspect, self.fov, self.near, self.far)
            }
            ProjectionMode::Orthographic => {
                let height = self.distance * (self.fov / 2.0).tan() * 2.0;
                let width = height * self.aspect;
                Matrix4::new_orthographic(
                    -width / 2.0,
                    width / 2.0,
                    -height / 2.0,
                    height / 2.0,
                    self.near,
                    self.far,
                )
            }
        }
    }

    pub fn view_projection(&self) -> Matrix4<f32> {
        self.projection_matrix() * self.view_matrix()
    }

    /// Project a world-space point to screen space, returning `(x, y, depth)`
    /// with depth in `[-1, 1]`, or `None` when outside the view volume.
    pub fn project_to_screen(
        view_projection: &Matrix4<f32>,
        point: &Point3<f32>,
        width: u32,
        height: u32,
    ) -> Option<(f32, f32, f32)> {
        let ndc = view_projection.transform_point(point);
        if !ndc.z.is_finite() || ndc.z < -1.0 || ndc.z > 1.0 {
            return None;
        }

        let screen_x = (ndc.x + 1.0) * 0.5 * width as f32;
        let screen_y = (1.0 - ndc.y) * 0.5 * height as f32;
        Some((screen_x, screen_y, ndc.z))
    }
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self::new(80, 24)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_reset_position() {
        let camera = OrbitCamera::new(80, 24);
        assert_relative_eq!(camera.position(), Point3::new(1.5, 1.0, 1.5), epsilon = 1e-5);
        assert_relative_eq!(camera.target, Point3::new(0.0, 0.3, 0.0));
        assert_eq!(camera.mode, ProjectionMode::Perspective);
    }

    #[test]
    fn test_orbit_keeps_distance() {
        let mut camera = OrbitCamera::default();
        let distance = (camera.position() - camera.target).norm();
        camera.orbit(0.7, 10.0);
        assert_eq!(camera.pitch, MAX_PITCH);
        assert_relative_eq!((camera.position() - camera.target).norm(), distance, epsilon = 1e-5);
    }

    #[test]
    fn test_target_projects_to_center() {
        for mode in [ProjectionMode::Perspective, ProjectionMode::Orthographic] {
            let mut camera = OrbitCamera::new(80, 24);
            camera.mode = mode;
            let vp = camera.view_projection();
            let (x, y, _) = OrbitCamera::project_to_screen(&vp, &camera.target, 80, 24).unwrap();
            assert_relative_eq!(x, 40.0, epsilon = 1e-3);
            assert_relative_eq!(y, 12.0, epsilon = 1e-3);
        }
    }

    #[test]
    fn test_behind_camera_is_clipped() {
        let camera = OrbitCamera::default();
        let behind = camera.position() + camera.eye_direction();
        let vp = camera.view_projection();
        assert!(OrbitCamera::project_to_screen(&vp, &behind, 80, 24).is_none());
    }
}
