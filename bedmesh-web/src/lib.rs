/// bedmesh Web - WASM facade over a viewing session
///
/// The browser owns the canvas, the draw loop and orbit input. This module
/// parses the pasted grid, hands out flat geometry buffers and keeps the
/// interaction state, so the page only forwards events and redraws. Presets
/// and grid changes are pushed into the page's orbit controls through the
/// `CameraControls` interface.

use bedmesh_core::{
    CameraRig, CameraState, PickHandler, Session, Transform, Viewpoint, ViewerConfig,
    ViewpointController,
};
use nalgebra::Point3;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::HtmlTextAreaElement;
use web_time::Instant;

#[wasm_bindgen]
extern "C" {
    /// Page-side orbit controls, e.g. a wrapper around three.js OrbitControls.
    pub type CameraControls;

    /// Drop damping and any rotation still in flight.
    #[wasm_bindgen(method, js_name = resetMotion)]
    fn reset_motion(this: &CameraControls);

    /// Move the camera to `[px, py, pz, ux, uy, uz]`, looking at the origin.
    #[wasm_bindgen(method, js_name = setPose)]
    fn set_pose(this: &CameraControls, pose: &[f32]);
}

/// Lets presets drive the page's controls like any other rig.
struct ControlsRig<'a> {
    controls: &'a CameraControls,
    pose: CameraState,
}

impl CameraRig for ControlsRig<'_> {
    fn reset_motion(&mut self) {
        self.controls.reset_motion();
    }

    fn set_pose(&mut self, pose: CameraState) {
        self.pose = pose;
        self.controls.set_pose(&pose_buffer(pose));
    }

    fn pose(&self) -> CameraState {
        self.pose
    }
}

fn pose_buffer(pose: CameraState) -> Vec<f32> {
    vec![
        pose.position.x,
        pose.position.y,
        pose.position.z,
        pose.up.x,
        pose.up.y,
        pose.up.z,
    ]
}

#[wasm_bindgen]
pub struct MeshViewer {
    session: Session,
}

#[wasm_bindgen]
impl MeshViewer {
    #[wasm_bindgen(constructor)]
    pub fn new() -> MeshViewer {
        MeshViewer {
            session: Session::default(),
        }
    }

    /// Create a viewer from a JSON `ViewerConfig`; missing fields use defaults.
    #[wasm_bindgen(js_name = withConfig)]
    pub fn with_config(config_json: &str) -> Result<MeshViewer, JsValue> {
        let config: ViewerConfig = serde_json::from_str(config_json)
            .map_err(|err| JsValue::from_str(&format!("invalid viewer config: {err}")))?;
        Ok(MeshViewer {
            session: Session::new(config),
        })
    }

    /// Parse pasted text. Errors come back as user-facing message strings.
    ///
    /// Returns true when a new grid replaced the old one. The session camera
    /// is reset then, and `controls`, when given, are moved to match.
    pub fn submit(
        &mut self,
        text: &str,
        controls: Option<CameraControls>,
    ) -> Result<bool, JsValue> {
        let replaced = self
            .session
            .submit(text, Instant::now())
            .map_err(|err| JsValue::from_str(&err.to_string()))?;
        if let (true, Some(controls)) = (replaced, &controls) {
            self.reset_controls(controls);
        }
        Ok(replaced)
    }

    /// Read the text buffer of a `<textarea>` and submit it.
    #[wasm_bindgen(js_name = submitFromElement)]
    pub fn submit_from_element(
        &mut self,
        element_id: &str,
        controls: Option<CameraControls>,
    ) -> Result<bool, JsValue> {
        let document = web_sys::window()
            .and_then(|window| window.document())
            .ok_or_else(|| JsValue::from_str("no document available"))?;
        let textarea = document
            .get_element_by_id(element_id)
            .ok_or_else(|| JsValue::from_str(&format!("no element with id `{element_id}`")))?
            .dyn_into::<HtmlTextAreaElement>()
            .map_err(|_| JsValue::from_str(&format!("`{element_id}` is not a textarea")))?;
        self.submit(&textarea.value(), controls)
    }

    #[wasm_bindgen(js_name = hasGrid)]
    pub fn has_grid(&self) -> bool {
        self.session.grid().is_some()
    }

    /// Interleaved `x, y, z` vertex positions in surface space (Z is height).
    pub fn positions(&self) -> Vec<f32> {
        self.session
            .mesh()
            .map(|mesh| mesh.position_buffer())
            .unwrap_or_default()
    }

    /// Interleaved `r, g, b` vertex colors in `[0, 1]`.
    pub fn colors(&self) -> Vec<f32> {
        self.session
            .mesh()
            .map(|mesh| mesh.color_buffer())
            .unwrap_or_default()
    }

    /// Triangle vertex indices; empty for single-row or single-column grids.
    pub fn indices(&self) -> Vec<u32> {
        self.session
            .mesh()
            .map(|mesh| mesh.index_buffer())
            .unwrap_or_default()
    }

    /// Apply `isometric`, `top` or `side`; returns `[px, py, pz, ux, uy, uz]`.
    ///
    /// `controls`, when given, have their motion reset before taking the pose.
    #[wasm_bindgen(js_name = applyViewpoint)]
    pub fn apply_viewpoint(
        &mut self,
        name: &str,
        controls: Option<CameraControls>,
    ) -> Result<Vec<f32>, JsValue> {
        let viewpoint: Viewpoint = name
            .parse()
            .map_err(|err: bedmesh_core::ParseViewpointError| JsValue::from_str(&err.to_string()))?;
        let pose = self.session.apply_viewpoint(viewpoint);
        if let Some(controls) = &controls {
            ViewpointController::apply(viewpoint, &mut ControlsRig { controls, pose });
        }
        Ok(pose_buffer(pose))
    }

    /// Current session pose as `[px, py, pz, ux, uy, uz]`.
    #[wasm_bindgen(js_name = cameraPose)]
    pub fn camera_pose(&self) -> Vec<f32> {
        pose_buffer(self.session.camera())
    }

    /// Stop the controls' motion and move them to the session pose.
    #[wasm_bindgen(js_name = resetControls)]
    pub fn reset_controls(&self, controls: &CameraControls) {
        let mut rig = ControlsRig {
            controls,
            pose: self.session.camera(),
        };
        rig.reset_motion();
        rig.set_pose(self.session.camera());
    }

    #[wasm_bindgen(js_name = onPick)]
    pub fn on_pick(&mut self, vertex_index: u32) {
        self.session.on_pick(vertex_index);
    }

    /// Pick by world-space hit position, for renderers that report no vertex.
    #[wasm_bindgen(js_name = onPickPosition)]
    pub fn on_pick_position(&mut self, x: f32, y: f32, z: f32) -> bool {
        let surface = Transform::pick_to_surface(&Point3::new(x, y, z));
        match self.session.nearest_to(&surface) {
            Some(point) => {
                self.session.interaction_mut().select(point);
                true
            }
            None => false,
        }
    }

    #[wasm_bindgen(js_name = onHoverEnter)]
    pub fn on_hover_enter(&mut self, vertex_index: u32) {
        self.session.on_hover_enter(vertex_index);
    }

    #[wasm_bindgen(js_name = onHoverLeave)]
    pub fn on_hover_leave(&mut self) {
        self.session.on_hover_leave();
    }

    /// Select the cell at `(row, col)`, e.g. from the grid table.
    #[wasm_bindgen(js_name = selectCell)]
    pub fn select_cell(&mut self, row: usize, col: usize) {
        if let Some(point) = self.session.point_at(row, col) {
            self.session.interaction_mut().select(point);
        }
    }

    #[wasm_bindgen(js_name = toggleInteractive)]
    pub fn toggle_interactive(&mut self) -> bool {
        self.session.interaction_mut().toggle_interactive();
        self.session.interaction().is_interactive()
    }

    #[wasm_bindgen(js_name = toggleLabels)]
    pub fn toggle_labels(&mut self) -> bool {
        self.session.interaction_mut().toggle_labels();
        self.session.interaction().labels_visible()
    }

    #[wasm_bindgen(js_name = showHelp)]
    pub fn show_help(&mut self) {
        self.session.interaction_mut().show_help(Instant::now());
    }

    #[wasm_bindgen(js_name = dismissHelp)]
    pub fn dismiss_help(&mut self) {
        self.session.interaction_mut().dismiss_help();
    }

    #[wasm_bindgen(js_name = helpVisible)]
    pub fn help_visible(&self) -> bool {
        self.session.interaction().help_visible()
    }

    /// Call once per animation frame; returns true when the page must redraw.
    pub fn tick(&mut self) -> bool {
        self.session.tick(Instant::now())
    }

    /// Text for the point info box, e.g. `Point (2, 1) = +0.125`.
    #[wasm_bindgen(js_name = focusText)]
    pub fn focus_text(&self) -> Option<String> {
        self.session.interaction().focus().map(|point| point.to_string())
    }

    /// Grid dump for the side panel.
    #[wasm_bindgen(js_name = gridText)]
    pub fn grid_text(&self) -> Option<String> {
        self.session.matrix().map(|matrix| matrix.to_string())
    }

    /// `GridSummary` as JSON, or `null` before the first grid.
    #[wasm_bindgen(js_name = summaryJson)]
    pub fn summary_json(&self) -> Result<String, JsValue> {
        serde_json::to_string(&self.session.summary())
            .map_err(|err| JsValue::from_str(&err.to_string()))
    }
}

impl Default for MeshViewer {
    fn default() -> Self {
        Self::new()
    }
}

#[wasm_bindgen(start)]
pub fn main() -> Result<(), JsValue> {
    #[cfg(target_arch = "wasm32")]
    {
        std::panic::set_hook(Box::new(console_error_panic_hook::hook));
        // A second start (hot reload) finds the logger already set.
        let _ = console_log::init_with_level(log::Level::Info);
    }

    log::debug!("bedmesh web module ready");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buffers_after_submit() {
        let mut viewer = MeshViewer::new();
        assert!(viewer.positions().is_empty());
        viewer.session.submit("+1.0 +2.0\n-1.0 -2.0", Instant::now()).unwrap();
        assert!(viewer.has_grid());
        assert_eq!(viewer.positions().len(), 12);
        assert_eq!(viewer.colors().len(), 12);
        assert_eq!(viewer.indices().len(), 6);
    }

    #[test]
    fn test_select_cell_and_focus_text() {
        let mut viewer = MeshViewer::new();
        viewer.session.submit("+1.0 +2.0\n-1.0 -2.0", Instant::now()).unwrap();
        viewer.select_cell(1, 0);
        assert_eq!(viewer.focus_text().as_deref(), Some("Point (0, 1) = -1.000"));
        viewer.on_hover_leave();
        assert!(viewer.focus_text().is_some());
    }

    #[test]
    fn test_pick_by_world_position() {
        let mut viewer = MeshViewer::new();
        viewer.session.submit("+1.0 +2.0\n-1.0 -2.0", Instant::now()).unwrap();
        // Row 1, column 1 sits at surface (0.5, -0.5), world (0.5, z, 0.5).
        assert!(viewer.on_pick_position(0.48, -0.2, 0.52));
        assert_eq!(viewer.focus_text().as_deref(), Some("Point (1, 1) = -2.000"));
        assert!(!viewer.on_pick_position(5.0, 0.0, 5.0));
    }

    #[test]
    fn test_viewpoint_and_new_grid_update_pose() {
        let mut viewer = MeshViewer::new();
        viewer.submit("+1.0 +2.0\n-1.0 -2.0", None).unwrap();
        let top = viewer.apply_viewpoint("top", None).unwrap();
        assert_eq!(top, vec![0.0, 2.0, 0.0, 0.0, 0.0, -1.0]);
        assert_eq!(viewer.camera_pose(), top);

        // Resubmitting the same grid keeps the pose.
        assert!(!viewer.submit("+1.0 +2.0\n-1.0 -2.0", None).unwrap());
        assert_eq!(viewer.camera_pose(), top);

        assert!(viewer.submit("+1.0 +2.0 +3.0", None).unwrap());
        assert_eq!(viewer.camera_pose(), pose_buffer(CameraState::default()));
    }

    #[test]
    fn test_summary_json() {
        let mut viewer = MeshViewer::new();
        assert_eq!(viewer.summary_json().unwrap(), "null");
        viewer.session.submit("+5.0", Instant::now()).unwrap();
        let json = viewer.summary_json().unwrap();
        assert!(json.contains("\"rows\":1"));
    }
}
