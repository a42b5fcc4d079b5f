/// bedmesh Core Library - bed mesh parsing and surface generation
///
/// This library provides the renderer-independent core of the bed mesh
/// viewer: parsing pasted grids, deriving value ranges, building colored
/// height surfaces, mapping picks back to grid points, camera presets and
/// interaction state.

pub mod color;
pub mod config;
pub mod error;
pub mod geometry;
pub mod grid;
pub mod interaction;
pub mod parser;
pub mod pick;
pub mod projection;
pub mod session;
pub mod stats;
pub mod surface;
pub mod transform;
pub mod viewpoint;

// Re-export commonly used types
pub use color::Rgb;
pub use config::{GridFormat, ParserConfig, SurfaceConfig, ViewerConfig};
pub use error::{FormatError, ParseViewpointError};
pub use geometry::{Footprint, SurfaceMesh};
pub use grid::{format_offset, GridPoint, Matrix};
pub use interaction::InteractionState;
pub use parser::{parse, GridParser};
pub use pick::PickHandler;
pub use projection::{Camera, CameraRig, CameraState, ProjectionMode};
pub use session::Session;
pub use stats::{GridSummary, ValueRange};
pub use surface::SurfaceGenerator;
pub use transform::{OrbitControls, Transform};
pub use viewpoint::{Viewpoint, ViewpointController};
