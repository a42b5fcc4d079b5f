/// One viewing session: the current grid and everything derived from it
use web_time::Instant;

use crate::config::ViewerConfig;
use crate::error::ParseResult;
use crate::geometry::SurfaceMesh;
use crate::grid::{GridPoint, Matrix};
use crate::interaction::InteractionState;
use crate::parser::GridParser;
use crate::pick::{self, PickHandler};
use crate::projection::{CameraRig, CameraState};
use crate::stats::{self, GridSummary, ValueRange};
use crate::surface::SurfaceGenerator;
use crate::viewpoint::{Viewpoint, ViewpointController};

/// Grid plus derived artifacts, replaced together.
#[derive(Debug, Clone)]
pub struct LoadedGrid {
    pub matrix: Matrix,
    pub range: ValueRange,
    pub mesh: SurfaceMesh,
}

/// Owns the grid, its surface, the interaction state and the camera pose.
///
/// UI components get a reference to the session instead of sharing globals.
/// A new grid rebuilds the surface and resets interaction and camera; pick
/// and hover callbacks only look things up.
#[derive(Debug, Clone)]
pub struct Session {
    config: ViewerConfig,
    parser: GridParser,
    generator: SurfaceGenerator,
    grid: Option<LoadedGrid>,
    interaction: InteractionState,
    camera: CameraState,
}

impl Session {
    pub fn new(config: ViewerConfig) -> Self {
        Self {
            parser: GridParser::new(config.parser),
            generator: SurfaceGenerator::new(config.surface),
            grid: None,
            interaction: InteractionState::new(config.help_timeout, Instant::now()),
            camera: CameraState::default(),
            config,
        }
    }

    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    /// Parse pasted text and load it. On error the current grid stays.
    ///
    /// Returns the same flag as [`Session::load`]: true when a new grid was
    /// swapped in and the camera pose was reset.
    pub fn submit(&mut self, text: &str, now: Instant) -> ParseResult<bool> {
        let matrix = self.parser.parse(text).inspect_err(|err| {
            log::info!("rejected grid input: {err}");
        })?;
        Ok(self.load(matrix, now))
    }

    /// Load a parsed grid. Returns false when it equals the current one and
    /// nothing had to be rebuilt.
    pub fn load(&mut self, matrix: Matrix, now: Instant) -> bool {
        if self.grid.as_ref().is_some_and(|grid| grid.matrix == matrix) {
            log::debug!("grid unchanged, keeping surface");
            return false;
        }

        // Build the replacement completely before swapping it in.
        let range = stats::range(&matrix);
        let mesh = self.generator.build(&matrix, &range);
        log::info!(
            "loaded {}x{} grid, range {:.3}..{:.3}",
            matrix.rows(),
            matrix.cols(),
            range.min,
            range.max
        );
        self.grid = Some(LoadedGrid {
            matrix,
            range,
            mesh,
        });

        self.interaction = InteractionState::new(self.config.help_timeout, now);
        self.camera = CameraState::default();
        true
    }

    pub fn grid(&self) -> Option<&LoadedGrid> {
        self.grid.as_ref()
    }

    pub fn matrix(&self) -> Option<&Matrix> {
        self.grid.as_ref().map(|grid| &grid.matrix)
    }

    pub fn mesh(&self) -> Option<&SurfaceMesh> {
        self.grid.as_ref().map(|grid| &grid.mesh)
    }

    pub fn summary(&self) -> Option<GridSummary> {
        self.matrix().map(stats::summarize)
    }

    pub fn interaction(&self) -> &InteractionState {
        &self.interaction
    }

    pub fn interaction_mut(&mut self) -> &mut InteractionState {
        &mut self.interaction
    }

    pub fn camera(&self) -> CameraState {
        self.camera
    }

    /// Apply a preset to the session's pose and return it.
    pub fn apply_viewpoint(&mut self, viewpoint: Viewpoint) -> CameraState {
        ViewpointController::apply(viewpoint, self)
    }

    /// Grid point under a row/column, e.g. from a table cell.
    pub fn point_at(&self, row: usize, col: usize) -> Option<GridPoint> {
        self.matrix().and_then(|matrix| pick::point_at(matrix, row, col))
    }

    pub fn point_for_vertex(&self, vertex_index: u32) -> Option<GridPoint> {
        self.matrix()
            .and_then(|matrix| pick::point_for_vertex(matrix, vertex_index))
    }

    /// Grid point nearest a surface-space position.
    pub fn nearest_to(&self, position: &nalgebra::Point3<f32>) -> Option<GridPoint> {
        self.grid
            .as_ref()
            .and_then(|grid| pick::nearest_to(position, &grid.mesh, &grid.matrix))
    }

    /// Advance timers. Returns true if anything visible changed.
    pub fn tick(&mut self, now: Instant) -> bool {
        self.interaction.tick(now)
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(ViewerConfig::default())
    }
}

impl PickHandler for Session {
    fn on_pick(&mut self, vertex_index: u32) {
        if let Some(point) = self.point_for_vertex(vertex_index) {
            self.interaction.select(point);
        }
    }

    fn on_hover_enter(&mut self, vertex_index: u32) {
        if let Some(point) = self.point_for_vertex(vertex_index) {
            self.interaction.hover(Some(point));
        }
    }

    fn on_hover_leave(&mut self) {
        self.interaction.hover(None);
    }
}

/// The session's pose has no inertia of its own; renderers with orbit
/// controls apply presets to those directly.
impl CameraRig for Session {
    fn reset_motion(&mut self) {}

    fn set_pose(&mut self, pose: CameraState) {
        self.camera = pose;
    }

    fn pose(&self) -> CameraState {
        self.camera
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FormatError;

    #[test]
    fn test_submit_builds_surface() {
        let mut session = Session::default();
        assert!(session.mesh().is_none());
        session.submit("+1.0 +2.0\n-1.0 -2.0", Instant::now()).unwrap();
        let grid = session.grid().unwrap();
        assert_eq!(grid.range, ValueRange::new(-2.0, 2.0));
        assert_eq!(grid.mesh.vertex_count(), 4);
        assert_eq!(grid.mesh.triangle_count(), 2);
    }

    #[test]
    fn test_failed_submit_keeps_previous_grid() {
        let mut session = Session::default();
        session.submit("+1.0 +2.0", Instant::now()).unwrap();
        let err = session.submit("+1.0 +2.0\n+1.0", Instant::now()).unwrap_err();
        assert!(matches!(err, FormatError::RaggedRows { .. }));
        assert_eq!(session.matrix().unwrap().cols(), 2);
    }

    #[test]
    fn test_pick_and_hover_callbacks() {
        let mut session = Session::default();
        session.submit("+1 +2 +3\n+4 +5 +6", Instant::now()).unwrap();
        session.on_hover_enter(4);
        assert_eq!(session.interaction().hovered(), Some(GridPoint::new(1, 1, 5.0)));
        session.on_pick(2);
        assert_eq!(session.interaction().selected(), Some(GridPoint::new(0, 2, 3.0)));
        session.on_hover_leave();
        assert_eq!(session.interaction().hovered(), None);
        // Out-of-range vertex is ignored.
        session.on_pick(99);
        assert_eq!(session.interaction().selected(), Some(GridPoint::new(0, 2, 3.0)));
    }

    #[test]
    fn test_new_grid_resets_interaction_and_camera() {
        let mut session = Session::default();
        session.submit("+1 +2\n+3 +4", Instant::now()).unwrap();
        session.on_pick(3);
        session.interaction_mut().toggle_labels();
        session.apply_viewpoint(Viewpoint::Top);

        session.submit("+1 +2 +3\n+3 +4 +5", Instant::now()).unwrap();
        assert_eq!(session.interaction().selected(), None);
        assert!(!session.interaction().labels_visible());
        assert_eq!(session.camera(), CameraState::default());
    }

    #[test]
    fn test_identical_grid_is_not_rebuilt() {
        let mut session = Session::default();
        let now = Instant::now();
        assert!(session.submit("+1 +2\n+3 +4", now).unwrap());
        session.on_pick(0);
        assert!(!session.submit("+1 +2\n+3 +4", now).unwrap());
        let matrix = session.matrix().unwrap().clone();
        assert!(!session.load(matrix, now));
        // Selection survives because nothing was replaced.
        assert!(session.interaction().selected().is_some());
    }

    #[test]
    fn test_apply_viewpoint_updates_pose() {
        let mut session = Session::default();
        let pose = session.apply_viewpoint(Viewpoint::Side);
        assert_eq!(session.camera(), pose);
        assert_eq!(pose, Viewpoint::Side.pose());
    }
}
