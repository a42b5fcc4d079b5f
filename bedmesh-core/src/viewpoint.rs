/// Named camera presets
use std::fmt;
use std::str::FromStr;

use nalgebra::{Point3, Vector3};

use crate::error::ParseViewpointError;
use crate::projection::{CameraRig, CameraState};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Viewpoint {
    Isometric,
    Top,
    Side,
}

impl Viewpoint {
    pub const ALL: [Viewpoint; 3] = [Viewpoint::Isometric, Viewpoint::Top, Viewpoint::Side];

    /// Fixed pose for this preset.
    ///
    /// The top view looks straight down the world up axis, so it swaps in -Z
    /// as its up vector: row 0 at the top of the screen, column 0 on the left.
    pub fn pose(self) -> CameraState {
        match self {
            Viewpoint::Isometric => {
                CameraState::new(Point3::new(0.5, 0.8, 0.8), CameraState::default_up())
            }
            Viewpoint::Top => CameraState::new(Point3::new(0.0, 2.0, 0.0), -Vector3::z()),
            Viewpoint::Side => {
                CameraState::new(Point3::new(2.0, 0.0, 0.0), CameraState::default_up())
            }
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Viewpoint::Isometric => "isometric",
            Viewpoint::Top => "top",
            Viewpoint::Side => "side",
        }
    }
}

impl fmt::Display for Viewpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Viewpoint {
    type Err = ParseViewpointError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "isometric" | "iso" => Ok(Viewpoint::Isometric),
            "top" => Ok(Viewpoint::Top),
            "side" => Ok(Viewpoint::Side),
            _ => Err(ParseViewpointError(s.to_string())),
        }
    }
}

/// Applies presets to whatever camera the renderer exposes.
pub struct ViewpointController;

impl ViewpointController {
    /// Stop any orbit inertia, then jump to the preset pose. The result never
    /// depends on where the camera was before.
    pub fn apply<R: CameraRig + ?Sized>(viewpoint: Viewpoint, rig: &mut R) -> CameraState {
        let pose = viewpoint.pose();
        rig.reset_motion();
        rig.set_pose(pose);
        log::debug!("applied {viewpoint} viewpoint");
        pose
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::projection::Camera;
    use crate::transform::OrbitControls;

    #[test]
    fn test_top_then_isometric() {
        let mut camera = Camera::default();
        ViewpointController::apply(Viewpoint::Top, &mut camera);
        let top = camera.state();
        assert_eq!(top.position, Point3::new(0.0, 2.0, 0.0));
        assert_eq!(top.up, -Vector3::z());

        ViewpointController::apply(Viewpoint::Isometric, &mut camera);
        assert_eq!(camera.state().up, Vector3::y());
        assert_eq!(camera.state().position, Point3::new(0.5, 0.8, 0.8));
    }

    #[test]
    fn test_apply_ignores_prior_state() {
        let mut orbit = OrbitControls::default();
        orbit.rotate(0.7, 0.2);
        for _ in 0..10 {
            orbit.update();
        }
        ViewpointController::apply(Viewpoint::Side, &mut orbit);
        assert_eq!(orbit.pose(), Viewpoint::Side.pose());
        assert!(!orbit.is_moving());
        // Further frames do not drift away from the preset.
        orbit.update();
        assert_eq!(orbit.pose(), Viewpoint::Side.pose());
    }

    #[test]
    fn test_parse_names() {
        assert_eq!("iso".parse::<Viewpoint>(), Ok(Viewpoint::Isometric));
        assert_eq!(" Top ".parse::<Viewpoint>(), Ok(Viewpoint::Top));
        assert!("front".parse::<Viewpoint>().is_err());
        for viewpoint in Viewpoint::ALL {
            assert_eq!(viewpoint.name().parse::<Viewpoint>(), Ok(viewpoint));
        }
    }
}
