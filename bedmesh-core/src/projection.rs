/// Camera state and projection utilities
use nalgebra::{Matrix4, Point3, Vector3};

/// Where the camera sits and which way is up. It always looks at the origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraState {
    pub position: Point3<f32>,
    pub up: Vector3<f32>,
}

impl CameraState {
    pub fn new(position: Point3<f32>, up: Vector3<f32>) -> Self {
        Self { position, up }
    }

    /// World up used by every pose except the top view.
    pub fn default_up() -> Vector3<f32> {
        Vector3::y()
    }
}

/// Pose the viewer opens with, before any preset is applied.
impl Default for CameraState {
    fn default() -> Self {
        Self::new(Point3::new(0.8, 0.8, 0.8), Self::default_up())
    }
}

/// Anything a viewpoint preset can be applied to.
///
/// Renderers with orbit inertia implement `reset_motion` so a preset lands
/// exactly where it is defined.
pub trait CameraRig {
    fn reset_motion(&mut self);
    fn set_pose(&mut self, pose: CameraState);
    fn pose(&self) -> CameraState;
}

/// Projection mode for rendering
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ProjectionMode {
    Orthographic,
    Perspective,
}

/// Camera configuration for 3D rendering
#[derive(Debug, Clone)]
pub struct Camera {
    pub position: Point3<f32>,
    pub target: Point3<f32>,
    pub up: Vector3<f32>,
    pub fov: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    pub mode: ProjectionMode,
}

impl Camera {
    pub fn new(width: u32, height: u32) -> Self {
        let pose = CameraState::default();
        Self {
            position: pose.position,
            target: Point3::origin(),
            up: pose.up,
            fov: 50f32.to_radians(),
            aspect: width as f32 / height.max(1) as f32,
            near: 0.01,
            far: 100.0,
            mode: ProjectionMode::Perspective,
        }
    }

    pub fn state(&self) -> CameraState {
        CameraState::new(self.position, self.up)
    }

    pub fn set_state(&mut self, state: CameraState) {
        self.position = state.position;
        self.up = state.up;
        self.target = Point3::origin();
    }

    pub fn set_viewport(&mut self, width: u32, height: u32) {
        self.aspect = width as f32 / height.max(1) as f32;
    }

    /// Create the view matrix (camera transformation)
    pub fn view_matrix(&self) -> Matrix4<f32> {
        Matrix4::look_at_rh(&self.position, &self.target, &self.up)
    }

    /// Create the projection matrix
    pub fn projection_matrix(&self) -> Matrix4<f32> {
        match self.mode {
            ProjectionMode::Perspective => {
                Matrix4::new_perspective(self.aspect, self.fov, self.near, self.far)
            }
            ProjectionMode::Orthographic => {
                let height = (self.position - self.target).norm();
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

    /// Project a 3D point to 2D screen space
    ///
    /// Returns `(x, y, depth)` with depth in NDC, or `None` when the point is
    /// outside the view volume.
    pub fn project_to_screen(
        &self,
        point: &Point3<f32>,
        model_matrix: &Matrix4<f32>,
        width: u32,
        height: u32,
    ) -> Option<(f32, f32, f32)> {
        let mvp = self.projection_matrix() * self.view_matrix() * model_matrix;

        // Perspective divide happens inside transform_point.
        let ndc = mvp.transform_point(point);
        if !ndc.coords.iter().all(|c| c.is_finite()) {
            return None;
        }

        // Clip test
        if ndc.x < -1.0 || ndc.x > 1.0 || ndc.y < -1.0 || ndc.y > 1.0 || ndc.z < -1.0 || ndc.z > 1.0 {
            return None;
        }

        // Convert to screen space
        let screen_x = (ndc.x + 1.0) * 0.5 * width as f32;
        let screen_y = (1.0 - ndc.y) * 0.5 * height as f32;

        Some((screen_x, screen_y, ndc.z))
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(800, 600)
    }
}

impl CameraRig for Camera {
    /// A bare camera carries no inertia.
    fn reset_motion(&mut self) {}

    fn set_pose(&mut self, pose: CameraState) {
        self.set_state(pose);
    }

    fn pose(&self) -> CameraState {
        self.state()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_camera_opens_at_default_pose() {
        let camera = Camera::new(100, 0);
        assert_eq!(camera.mode, ProjectionMode::Perspective);
        // A zero-height viewport must not divide by zero.
        assert!(camera.aspect.is_finite());
        assert_eq!(camera.state(), CameraState::default());
    }

    #[test]
    fn test_view_matrix_moves_target_in_front() {
        let camera = Camera::new(80, 40);
        let eye_space = camera.view_matrix().transform_point(&Point3::origin());
        // Right-handed view space looks down -z.
        assert!(eye_space.z < 0.0);
        assert!((-eye_space.z - camera.position.coords.norm()).abs() < 1e-5);
    }

    #[test]
    fn test_set_pose_recenters_target() {
        let mut camera = Camera::new(80, 40);
        camera.target = Point3::new(1.0, 0.0, 0.0);
        let pose = CameraState::new(Point3::new(2.0, 0.0, 0.0), Vector3::y());
        camera.set_pose(pose);
        assert_eq!(camera.pose(), pose);
        assert_eq!(camera.target, Point3::origin());
    }

    #[test]
    fn test_orthographic_keeps_center() {
        let mut camera = Camera::new(80, 40);
        camera.mode = ProjectionMode::Orthographic;
        let (x, y, _) = camera
            .project_to_screen(&Point3::origin(), &Matrix4::identity(), 80, 40)
            .unwrap();
        assert!((x - 40.0).abs() < 1e-3 && (y - 20.0).abs() < 1e-3);
    }

    #[test]
    fn test_origin_projects_to_center() {
        let camera = Camera::new(80, 40);
        let (x, y, _) = camera
            .project_to_screen(&Point3::origin(), &Matrix4::identity(), 80, 40)
            .unwrap();
        assert!((x - 40.0).abs() < 1e-3);
        assert!((y - 20.0).abs() < 1e-3);
    }

    #[test]
    fn test_point_behind_camera_is_clipped() {
        let camera = Camera::new(80, 40);
        let behind = Point3::new(2.0, 2.0, 2.0);
        assert!(camera
            .project_to_screen(&behind, &Matrix4::identity(), 80, 40)
            .is_none());
    }
}
