/// Frame conversions and damped orbit control
use nalgebra::{Matrix4, Point3, Rotation3, Unit, Vector3};

use crate::projection::{CameraRig, CameraState};

/// Transform builder for moving surfaces into the world frame
pub struct Transform;

impl Transform {
    /// Surface space has Z as height; the world is Y-up. Tips the surface
    /// -90 degrees about X so heights point along +Y and row 0 ends up at -Z.
    pub fn surface_to_world() -> Matrix4<f32> {
        Matrix4::from_axis_angle(&Vector3::x_axis(), -std::f32::consts::FRAC_PI_2)
    }

    pub fn world_to_surface() -> Matrix4<f32> {
        Matrix4::from_axis_angle(&Vector3::x_axis(), std::f32::consts::FRAC_PI_2)
    }

    /// World-space pick position back into surface space.
    pub fn pick_to_surface(world: &Point3<f32>) -> Point3<f32> {
        Self::world_to_surface().transform_point(world)
    }
}

/// Fraction of pending rotation applied per update, like a damped orbit
/// controller in a browser viewer.
pub const DEFAULT_DAMPING: f32 = 0.05;
const MIN_RADIUS: f32 = 0.3;
const MAX_RADIUS: f32 = 10.0;
const SETTLED: f32 = 1e-5;

/// Orbit camera around the origin with inertia.
///
/// Input adds to a pending rotation; each `update` applies a `damping`
/// fraction of it, so motion eases out over several frames.
#[derive(Debug, Clone)]
pub struct OrbitControls {
    pose: CameraState,
    pending_azimuth: f32,
    pending_polar: f32,
    damping: f32,
}

impl OrbitControls {
    pub fn new(pose: CameraState) -> Self {
        Self {
            pose,
            pending_azimuth: 0.0,
            pending_polar: 0.0,
            damping: DEFAULT_DAMPING,
        }
    }

    /// Queue a rotation (radians) about the world height axis and the
    /// camera's horizontal axis.
    pub fn rotate(&mut self, azimuth: f32, polar: f32) {
        self.pending_azimuth += azimuth;
        self.pending_polar += polar;
    }

    /// Move toward (`factor < 1`) or away from the origin.
    pub fn dolly(&mut self, factor: f32) {
        let radius = self.pose.position.coords.norm();
        if radius <= f32::EPSILON {
            return;
        }
        let target = (radius * factor).clamp(MIN_RADIUS, MAX_RADIUS);
        self.pose.position = Point3::from(self.pose.position.coords * (target / radius));
    }

    pub fn is_moving(&self) -> bool {
        self.pending_azimuth.abs() > SETTLED || self.pending_polar.abs() > SETTLED
    }

    /// Advance one frame. Returns true while there is motion left.
    pub fn update(&mut self) -> bool {
        if !self.is_moving() {
            self.pending_azimuth = 0.0;
            self.pending_polar = 0.0;
            return false;
        }

        let azimuth = self.pending_azimuth * self.damping;
        let polar = self.pending_polar * self.damping;
        self.pending_azimuth -= azimuth;
        self.pending_polar -= polar;

        self.apply_rotation(Rotation3::from_axis_angle(&Vector3::y_axis(), azimuth));

        let forward = -self.pose.position.coords;
        if let Some(right) = Unit::try_new(forward.cross(&self.pose.up), f32::EPSILON) {
            self.apply_rotation(Rotation3::from_axis_angle(&right, polar));
        }
        true
    }

    fn apply_rotation(&mut self, rotation: Rotation3<f32>) {
        self.pose.position = rotation * self.pose.position;
        self.pose.up = rotation * self.pose.up;
    }
}

impl Default for OrbitControls {
    fn default() -> Self {
        Self::new(CameraState::default())
    }
}

impl CameraRig for OrbitControls {
    fn reset_motion(&mut self) {
        self.pending_azimuth = 0.0;
        self.pending_polar = 0.0;
    }

    fn set_pose(&mut self, pose: CameraState) {
        self.pose = pose;
    }

    fn pose(&self) -> CameraState {
        self.pose
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_surface_heights_point_up() {
        let up = Transform::surface_to_world().transform_vector(&Vector3::z());
        assert!((up - Vector3::y()).norm() < 1e-6);
        // Row 0 sits at +y in surface space and lands at -z in the world.
        let row0 = Transform::surface_to_world().transform_point(&Point3::new(0.0, 0.5, 0.0));
        assert!((row0.z + 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_round_trip() {
        let p = Point3::new(0.2, -0.3, 0.05);
        let world = Transform::surface_to_world().transform_point(&p);
        let back = Transform::pick_to_surface(&world);
        assert!((back - p).norm() < 1e-6);
    }

    #[test]
    fn test_damped_rotation_settles_at_full_angle() {
        let start = CameraState::new(Point3::new(1.0, 0.0, 0.0), Vector3::y());
        let mut orbit = OrbitControls::new(start);
        orbit.rotate(std::f32::consts::FRAC_PI_2, 0.0);

        let mut frames = 0;
        while orbit.update() {
            frames += 1;
            assert!(frames < 1000);
        }
        assert!(frames > 1);
        // Quarter turn about +Y takes +X to -Z.
        let end = orbit.pose().position;
        assert!((end - Point3::new(0.0, 0.0, -1.0)).norm() < 1e-3);
    }

    #[test]
    fn test_reset_motion_stops_inertia() {
        let mut orbit = OrbitControls::default();
        orbit.rotate(1.0, 0.5);
        orbit.update();
        orbit.reset_motion();
        assert!(!orbit.is_moving());
        let before = orbit.pose();
        assert!(!orbit.update());
        assert_eq!(orbit.pose(), before);
    }

    #[test]
    fn test_dolly_is_clamped() {
        let mut orbit = OrbitControls::default();
        orbit.dolly(0.0001);
        assert!((orbit.pose().position.coords.norm() - MIN_RADIUS).abs() < 1e-5);
        orbit.dolly(1e6);
        assert!((orbit.pose().position.coords.norm() - MAX_RADIUS).abs() < 1e-3);
    }
}
