/// ASCII rasterizer for terminal rendering of bed mesh surfaces
use crossterm::{
    style::{Attribute, Color, Print, ResetColor, SetAttribute, SetForegroundColor},
    QueueableCommand,
};
use nalgebra::{Matrix4, Vector3};
use std::io::Write;
use bedmesh_core::{Camera, Rgb, SurfaceMesh};

/// Character luminosity ramp for depth/shading (darkest to lightest)
const LUMINOSITY_RAMP: &[char] = &[' ', '.', ':', '-', '=', '+', '*', '#', '%', '@'];

/// Ambient share of the shading, so faces turned away stay visible.
const AMBIENT: f32 = 0.35;

/// Max distance (in cells, x halved for cell aspect) for a click to hit a vertex.
const PICK_RADIUS: f32 = 2.5;

/// How a vertex marker is drawn on top of the surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Marker {
    Point,
    Hovered,
    Selected,
}

impl Marker {
    fn glyph(self) -> char {
        match self {
            Marker::Point => 'o',
            Marker::Hovered => '+',
            Marker::Selected => 'X',
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Cell {
    character: char,
    color: Color,
    bold: bool,
}

const BLANK: Cell = Cell {
    character: ' ',
    color: Color::DarkGrey,
    bold: false,
};

/// ASCII renderer that converts surface meshes to terminal characters
pub struct AsciiRenderer {
    width: usize,
    height: usize,
    depth_buffer: Vec<f32>,
    cells: Vec<Cell>,
}

impl AsciiRenderer {
    pub fn new(width: usize, height: usize) -> Self {
        let size = width * height;
        Self {
            width,
            height,
            depth_buffer: vec![f32::INFINITY; size],
            cells: vec![BLANK; size],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn resize(&mut self, width: usize, height: usize) {
        *self = Self::new(width, height);
    }

    pub fn clear(&mut self) {
        self.depth_buffer.fill(f32::INFINITY);
        self.cells.fill(BLANK);
    }

    /// Rasterize every triangle, shaded by face normal and colored by value.
    pub fn render_surface(&mut self, mesh: &SurfaceMesh, model_matrix: &Matrix4<f32>, camera: &Camera) {
        let light_dir = Vector3::new(5.0, 5.0, 5.0).normalize();

        for (index, triangle) in mesh.indices.iter().enumerate() {
            // Project vertices to screen space
            let projected = triangle.map(|vertex| self.project(mesh, vertex, model_matrix, camera));
            let [Some(p0), Some(p1), Some(p2)] = projected else {
                // Triangle is clipped
                continue;
            };
            let screen_coords = [p0, p1, p2];

            // Surfaces are two-sided; light whichever side faces up.
            let Some(normal) = mesh.face_normal(index) else {
                continue;
            };
            let world_normal = model_matrix.transform_vector(&normal).normalize();
            let diffuse = world_normal.dot(&light_dir).abs();
            let brightness = AMBIENT + (1.0 - AMBIENT) * diffuse;

            let colors = triangle.map(|vertex| mesh.colors[vertex as usize]);
            self.rasterize_triangle(&screen_coords, &colors, brightness);
        }
    }

    /// Draw vertex markers; used for points-only grids and highlights.
    pub fn render_markers(
        &mut self,
        mesh: &SurfaceMesh,
        model_matrix: &Matrix4<f32>,
        camera: &Camera,
        markers: &[(u32, Marker)],
    ) {
        for &(vertex, marker) in markers {
            let Some((x, y, _)) = self.project(mesh, vertex, model_matrix, camera) else {
                continue;
            };
            let color = match marker {
                Marker::Point => rgb_color(mesh.colors[vertex as usize], 1.0),
                Marker::Hovered | Marker::Selected => Color::White,
            };
            self.put(
                x as usize,
                y as usize,
                Cell {
                    character: marker.glyph(),
                    color,
                    bold: marker != Marker::Point,
                },
            );
        }
    }

    /// Write text over the scene, ignoring depth.
    pub fn label(&mut self, x: usize, y: usize, text: &str, color: Color) {
        for (offset, character) in text.chars().enumerate() {
            self.put(
                x + offset,
                y,
                Cell {
                    character,
                    color,
                    bold: false,
                },
            );
        }
    }

    /// Screen position of a vertex, if it is on screen.
    pub fn vertex_screen_position(
        &self,
        mesh: &SurfaceMesh,
        vertex: u32,
        model_matrix: &Matrix4<f32>,
        camera: &Camera,
    ) -> Option<(usize, usize)> {
        self.project(mesh, vertex, model_matrix, camera)
            .map(|(x, y, _)| (x as usize, y as usize))
    }

    /// Vertex closest to a terminal cell, within a small radius.
    pub fn pick_vertex(
        &self,
        mesh: &SurfaceMesh,
        model_matrix: &Matrix4<f32>,
        camera: &Camera,
        column: u16,
        row: u16,
    ) -> Option<u32> {
        let (px, py) = (column as f32 + 0.5, row as f32 + 0.5);

        (0..mesh.vertex_count() as u32)
            .filter_map(|vertex| {
                let (x, y, depth) = self.project(mesh, vertex, model_matrix, camera)?;
                let distance = (((x - px) / 2.0).powi(2) + (y - py).powi(2)).sqrt();
                (distance <= PICK_RADIUS).then_some((vertex, distance, depth))
            })
            .min_by(|a, b| a.1.total_cmp(&b.1).then(a.2.total_cmp(&b.2)))
            .map(|(vertex, _, _)| vertex)
    }

    fn project(
        &self,
        mesh: &SurfaceMesh,
        vertex: u32,
        model_matrix: &Matrix4<f32>,
        camera: &Camera,
    ) -> Option<(f32, f32, f32)> {
        let position = mesh.vertices.get(vertex as usize)?;
        camera.project_to_screen(position, model_matrix, self.width as u32, self.height as u32)
    }

    fn put(&mut self, x: usize, y: usize, cell: Cell) {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x] = cell;
        }
    }

    fn rasterize_triangle(&mut self, coords: &[(f32, f32, f32); 3], colors: &[Rgb; 3], brightness: f32) {
        let (v0, v1, v2) = (coords[0], coords[1], coords[2]);

        // Bounding box
        let min_x = v0.0.min(v1.0).min(v2.0).floor() as i32;
        let max_x = v0.0.max(v1.0).max(v2.0).ceil() as i32;
        let min_y = v0.1.min(v1.1).min(v2.1).floor() as i32;
        let max_y = v0.1.max(v1.1).max(v2.1).ceil() as i32;

        // Clip to screen bounds
        let min_x = min_x.max(0);
        let max_x = max_x.min(self.width as i32 - 1);
        let min_y = min_y.max(0);
        let max_y = max_y.min(self.height as i32 - 1);

        let char_index = (brightness * (LUMINOSITY_RAMP.len() - 1) as f32) as usize;
        let character = LUMINOSITY_RAMP[char_index.clamp(1, LUMINOSITY_RAMP.len() - 1)];

        // Scanline rasterization
        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let px = x as f32 + 0.5;
                let py = y as f32 + 0.5;

                // Barycentric coordinates
                if let Some((w0, w1, w2)) = barycentric(
                    (v0.0, v0.1),
                    (v1.0, v1.1),
                    (v2.0, v2.1),
                    (px, py),
                ) {
                    if w0 >= 0.0 && w1 >= 0.0 && w2 >= 0.0 {
                        // Interpolate depth
                        let depth = w0 * v0.2 + w1 * v1.2 + w2 * v2.2;

                        let idx = y as usize * self.width + x as usize;
                        if depth < self.depth_buffer[idx] {
                            let color = Rgb::new(
                                w0 * colors[0].r + w1 * colors[1].r + w2 * colors[2].r,
                                w0 * colors[0].g + w1 * colors[1].g + w2 * colors[2].g,
                                w0 * colors[0].b + w1 * colors[1].b + w2 * colors[2].b,
                            );
                            self.depth_buffer[idx] = depth;
                            self.cells[idx] = Cell {
                                character,
                                color: rgb_color(color, brightness),
                                bold: false,
                            };
                        }
                    }
                }
            }
        }
    }

    pub fn draw<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        for y in 0..self.height {
            for x in 0..self.width {
                let cell = self.cells[y * self.width + x];
                writer.queue(SetForegroundColor(cell.color))?;
                if cell.bold {
                    writer.queue(SetAttribute(Attribute::Bold))?;
                }
                writer.queue(Print(cell.character))?;
                if cell.bold {
                    writer.queue(SetAttribute(Attribute::NormalIntensity))?;
                }
            }
            if y + 1 < self.height {
                writer.queue(Print("\r\n"))?;
            }
        }
        writer.queue(ResetColor)?;
        Ok(())
    }

    #[cfg(test)]
    fn char_at(&self, x: usize, y: usize) -> char {
        self.cells[y * self.width + x].character
    }
}

fn rgb_color(color: Rgb, brightness: f32) -> Color {
    let shade = Rgb::new(color.r * brightness, color.g * brightness, color.b * brightness);
    let (r, g, b) = shade.to_u8();
    Color::Rgb { r, g, b }
}

/// Calculate barycentric coordinates for a point in a triangle
fn barycentric(
    v0: (f32, f32),
    v1: (f32, f32),
    v2: (f32, f32),
    p: (f32, f32),
) -> Option<(f32, f32, f32)> {
    let denom = (v1.1 - v2.1) * (v0.0 - v2.0) + (v2.0 - v1.0) * (v0.1 - v2.1);

    if denom.abs() < 1e-6 {
        return None;
    }

    let w0 = ((v1.1 - v2.1) * (p.0 - v2.0) + (v2.0 - v1.0) * (p.1 - v2.1)) / denom;
    let w1 = ((v2.1 - v0.1) * (p.0 - v2.0) + (v0.0 - v2.0) * (p.1 - v2.1)) / denom;
    let w2 = 1.0 - w0 - w1;

    Some((w0, w1, w2))
}
