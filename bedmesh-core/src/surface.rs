/// Height-mapped surface generation from a grid
use nalgebra::Point3;

use crate::color::value_color;
use crate::config::SurfaceConfig;
use crate::geometry::{Footprint, SurfaceMesh};
use crate::grid::Matrix;
use crate::stats::ValueRange;

/// Build a surface with the default configuration.
pub fn build(matrix: &Matrix, range: &ValueRange) -> SurfaceMesh {
    SurfaceGenerator::default().build(matrix, range)
}

/// Position of index `i` along an axis of `n` samples, in `[0, 1]`.
///
/// A single sample sits in the middle of the axis.
pub(crate) fn axis_position(i: usize, n: usize) -> f32 {
    if n > 1 {
        i as f32 / (n - 1) as f32
    } else {
        0.5
    }
}

/// Inverse of [`axis_position`]: nearest sample index for a position.
pub(crate) fn axis_index(t: f32, n: usize) -> Option<usize> {
    if !t.is_finite() {
        return None;
    }
    if n <= 1 {
        return (-0.5..=1.5).contains(&t).then_some(0);
    }
    let steps = (n - 1) as f32;
    let index = (t * steps).round();
    if index < 0.0 || index > steps {
        return None;
    }
    Some(index as usize)
}

/// Maps a grid to surface-space positions, colors and triangles.
///
/// Column 0 is at `-x`, row 0 at `+y` (rows run toward `-y`), so a top-down
/// view shows the grid in the same orientation as its text dump.
#[derive(Debug, Clone, Copy, Default)]
pub struct SurfaceGenerator {
    config: SurfaceConfig,
}

impl SurfaceGenerator {
    pub fn new(config: SurfaceConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SurfaceConfig {
        &self.config
    }

    pub fn build(&self, matrix: &Matrix, range: &ValueRange) -> SurfaceMesh {
        let rows = matrix.rows();
        let cols = matrix.cols();
        let footprint = Footprint::for_grid(rows, cols);

        let mut vertices = Vec::with_capacity(matrix.len());
        let mut colors = Vec::with_capacity(matrix.len());
        for point in matrix.points() {
            let x = (axis_position(point.col, cols) - 0.5) * footprint.width;
            let y = (0.5 - axis_position(point.row, rows)) * footprint.height;
            let z = point.value as f32 * self.config.height_scale;
            vertices.push(Point3::new(x, y, z));
            colors.push(value_color(range.normalize(point.value), &self.config));
        }

        let indices = triangulate(rows, cols);
        log::debug!(
            "built surface: {} vertices, {} triangles",
            vertices.len(),
            indices.len()
        );

        SurfaceMesh {
            vertices,
            colors,
            indices,
            rows,
            cols,
            footprint,
        }
    }
}

/// Two counter-clockwise (seen from +z) triangles per grid quad.
fn triangulate(rows: usize, cols: usize) -> Vec<[u32; 3]> {
    if rows < 2 || cols < 2 {
        return Vec::new();
    }

    let mut indices = Vec::with_capacity(2 * (rows - 1) * (cols - 1));
    for i in 0..rows - 1 {
        for j in 0..cols - 1 {
            let a = (i * cols + j) as u32;
            let b = a + 1;
            let c = a + cols as u32;
            let d = c + 1;
            indices.push([a, c, b]);
            indices.push([b, c, d]);
        }
    }
    indices
}
