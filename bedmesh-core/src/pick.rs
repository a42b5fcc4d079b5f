/// Mapping pick and hover events back to grid points
use nalgebra::Point3;

use crate::geometry::SurfaceMesh;
use crate::grid::{GridPoint, Matrix};
use crate::surface::axis_index;

/// Callbacks a renderer fires when the pointer hits a surface vertex.
///
/// Every call must stay O(1); implementations never rebuild geometry.
pub trait PickHandler {
    fn on_pick(&mut self, vertex_index: u32);
    fn on_hover_enter(&mut self, vertex_index: u32);
    fn on_hover_leave(&mut self);
}

/// Grid point at `(row, col)`.
pub fn point_at(matrix: &Matrix, row: usize, col: usize) -> Option<GridPoint> {
    matrix
        .get(row, col)
        .map(|value| GridPoint::new(row, col, value))
}

/// Grid point for a row-major vertex index.
pub fn point_for_vertex(matrix: &Matrix, vertex_index: u32) -> Option<GridPoint> {
    let index = vertex_index as usize;
    point_at(matrix, index / matrix.cols(), index % matrix.cols())
}

/// Grid point whose vertex is closest to a surface-space position.
///
/// Only the XY footprint is considered; height is ignored. Positions more
/// than half a grid step outside the footprint hit nothing.
pub fn nearest_to(position: &Point3<f32>, mesh: &SurfaceMesh, matrix: &Matrix) -> Option<GridPoint> {
    if mesh.rows != matrix.rows() || mesh.cols != matrix.cols() {
        log::warn!(
            "pick against stale mesh ({}x{} vs {}x{})",
            mesh.rows,
            mesh.cols,
            matrix.rows(),
            matrix.cols()
        );
        return None;
    }

    let footprint = mesh.footprint;
    let col_t = position.x / footprint.width + 0.5;
    let row_t = 0.5 - position.y / footprint.height;

    let col = axis_index(col_t, matrix.cols())?;
    let row = axis_index(row_t, matrix.rows())?;
    point_at(matrix, row, col)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;
    use crate::stats::range;
    use crate::surface::build;

    #[test]
    fn test_point_at() {
        let m = parse("+1.0 +2.0\n-1.0 -2.0").unwrap();
        assert_eq!(point_at(&m, 1, 0), Some(GridPoint::new(1, 0, -1.0)));
        assert_eq!(point_at(&m, 2, 0), None);
    }

    #[test]
    fn test_vertex_index_round_trip() {
        let m = parse("+1 +2 +3\n+4 +5 +6").unwrap();
        let mesh = build(&m, &range(&m));
        for point in m.points() {
            let index = mesh.vertex_index(point.row, point.col).unwrap();
            assert_eq!(point_for_vertex(&m, index), Some(point));
        }
        assert_eq!(point_for_vertex(&m, 6), None);
    }

    #[test]
    fn test_nearest_to_vertex_positions() {
        let m = parse("+1 +2 +3 +4\n+5 +6 +7 +8\n+9 +0 -1 -2").unwrap();
        let mesh = build(&m, &range(&m));
        for point in m.points() {
            let position = mesh.vertex_position(point.row, point.col).unwrap();
            assert_eq!(nearest_to(&position, &mesh, &m), Some(point));
        }
    }

    #[test]
    fn test_nearest_to_snaps_and_rejects_outside() {
        let m = parse("+1 +2\n+3 +4").unwrap();
        let mesh = build(&m, &range(&m));
        // Just off the (0, 0) corner, which sits at (-0.5, 0.5).
        let near = Point3::new(-0.45, 0.4, 0.0);
        assert_eq!(nearest_to(&near, &mesh, &m), Some(GridPoint::new(0, 0, 1.0)));
        let far = Point3::new(3.0, 0.0, 0.0);
        assert_eq!(nearest_to(&far, &mesh, &m), None);
    }

    #[test]
    fn test_nearest_to_ignores_non_finite_positions() {
        let m = parse("+1 +2\n+3 +4").unwrap();
        let mesh = build(&m, &range(&m));
        let nan = Point3::new(f32::NAN, f32::NAN, 0.0);
        assert_eq!(nearest_to(&nan, &mesh, &m), None);
        let inf = Point3::new(f32::INFINITY, 0.0, 0.0);
        assert_eq!(nearest_to(&inf, &mesh, &m), None);
    }

    #[test]
    fn test_nearest_to_single_cell() {
        let m = parse("+5.0").unwrap();
        let mesh = build(&m, &range(&m));
        let hit = nearest_to(&mesh.vertices[0], &mesh, &m);
        assert_eq!(hit, Some(GridPoint::new(0, 0, 5.0)));
    }
}
