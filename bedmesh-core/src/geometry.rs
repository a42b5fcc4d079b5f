/// Surface mesh buffers handed to renderers
use nalgebra::{Point3, Vector3};

use crate::color::Rgb;

/// Size of the surface footprint in the XY plane.
///
/// The longer grid axis is always 1 so every grid shape fits the same box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Footprint {
    pub width: f32,
    pub height: f32,
}

impl Footprint {
    /// Footprint for a grid of `rows` x `cols` preserving its aspect ratio.
    pub fn for_grid(rows: usize, cols: usize) -> Self {
        let aspect = cols as f32 / rows as f32;
        if aspect > 1.0 {
            Self {
                width: 1.0,
                height: 1.0 / aspect,
            }
        } else {
            Self {
                width: aspect,
                height: 1.0,
            }
        }
    }
}

/// Vertex, color and triangle buffers for one grid.
///
/// Vertices are row-major, one per grid cell, so vertex `i` is the cell at
/// row `i / cols`, column `i % cols`. Surface space has Z as height.
#[derive(Debug, Clone, PartialEq)]
pub struct SurfaceMesh {
    pub vertices: Vec<Point3<f32>>,
    pub colors: Vec<Rgb>,
    pub indices: Vec<[u32; 3]>,
    pub rows: usize,
    pub cols: usize,
    pub footprint: Footprint,
}

impl SurfaceMesh {
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len()
    }

    /// Single row or column: nothing to triangulate, draw points only.
    pub fn is_points_only(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn vertex_index(&self, row: usize, col: usize) -> Option<u32> {
        if row < self.rows && col < self.cols {
            u32::try_from(row * self.cols + col).ok()
        } else {
            None
        }
    }

    pub fn vertex_position(&self, row: usize, col: usize) -> Option<Point3<f32>> {
        self.vertex_index(row, col)
            .map(|index| self.vertices[index as usize])
    }

    /// Corner positions of triangle `index`.
    pub fn triangle(&self, index: usize) -> Option<[Point3<f32>; 3]> {
        self.indices
            .get(index)
            .map(|tri| tri.map(|vertex| self.vertices[vertex as usize]))
    }

    /// Face normal from the triangle's winding.
    pub fn face_normal(&self, index: usize) -> Option<Vector3<f32>> {
        let [v0, v1, v2] = self.triangle(index)?;

        let edge1 = v1 - v0;
        let edge2 = v2 - v0;

        edge1.cross(&edge2).try_normalize(f32::EPSILON)
    }

    /// Interleaved `[x, y, z, ...]` positions.
    pub fn position_buffer(&self) -> Vec<f32> {
        self.vertices
            .iter()
            .flat_map(|p| [p.x, p.y, p.z])
            .collect()
    }

    /// Interleaved `[r, g, b, ...]` colors.
    pub fn color_buffer(&self) -> Vec<f32> {
        self.colors.iter().flat_map(|c| [c.r, c.g, c.b]).collect()
    }

    /// Flattened triangle indices.
    pub fn index_buffer(&self) -> Vec<u32> {
        self.indices.iter().flatten().copied().collect()
    }
}
