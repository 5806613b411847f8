//! Straight-segment path simplification
//!
//! Reduces a cell path to the minimal set of direction changes needed to
//! traverse the corridor found by the search. A waypoint is dropped when a
//! straight line from the last retained waypoint to the next candidate is
//! fully walkable, sampled against the grid at cell-size intervals.

use glam::Vec2;

use crate::grid::{Cell, WalkabilityGrid};

/// Distance below which two points are considered coincident
pub const COINCIDENT_EPSILON: f32 = 1e-3;

/// Convert a cell path to waypoints and simplify it.
///
/// The exact `start` and `goal` positions replace the snapped cell centers
/// at the ends, so the returned path always begins and ends at the true
/// world positions regardless of grid quantization.
#[must_use]
pub fn simplify(grid: &WalkabilityGrid, cells: &[Cell], start: Vec2, goal: Vec2) -> Vec<Vec2> {
    if start.distance_squared(goal) <= COINCIDENT_EPSILON * COINCIDENT_EPSILON {
        return vec![start];
    }

    if cells.len() < 2 {
        return vec![start, goal];
    }

    let mut points: Vec<Vec2> = cells.iter().map(|&c| grid.cell_to_world(c)).collect();
    let last = points.len() - 1;
    points[0] = start;
    points[last] = goal;

    simplify_points(grid, &points)
}

/// Greedy visibility pass over a waypoint list.
///
/// Keeps extending a "last visible" scan: while the segment from the last
/// retained waypoint to the candidate stays walkable the candidate's
/// predecessor is skipped; otherwise the predecessor is committed and the
/// scan restarts from it. Running this on an already-minimal path returns
/// it unchanged.
#[must_use]
pub fn simplify_points(grid: &WalkabilityGrid, points: &[Vec2]) -> Vec<Vec2> {
    if points.len() <= 2 {
        return points.to_vec();
    }

    let mut result = vec![points[0]];
    let mut anchor = 0;

    for i in 2..points.len() {
        if !segment_walkable(grid, points[anchor], points[i]) {
            result.push(points[i - 1]);
            anchor = i - 1;
        }
    }

    result.push(points[points.len() - 1]);
    result
}

/// Test a straight segment for walkability by sampling it against the grid
/// at cell-size intervals.
#[must_use]
pub fn segment_walkable(grid: &WalkabilityGrid, from: Vec2, to: Vec2) -> bool {
    let length = from.distance(to);
    if length <= COINCIDENT_EPSILON {
        return grid.is_walkable(grid.world_to_cell(from));
    }

    let steps = (length / grid.cell_size()).ceil().max(1.0) as usize;
    for step in 0..=steps {
        let t = step as f32 / steps as f32;
        let sample = from.lerp(to, t);
        if !grid.is_walkable(grid.world_to_cell(sample)) {
            return false;
        }
    }

    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Bounds;
    use crate::search::search;

    fn grid_from_fn(size: usize, blocked: impl Fn(usize, usize) -> bool) -> WalkabilityGrid {
        let bounds = Bounds::new(Vec2::ZERO, Vec2::splat(size as f32));
        WalkabilityGrid::build(bounds, 1.0, |p| {
            blocked(p.x.floor() as usize, p.y.floor() as usize)
        })
        .unwrap()
    }

    #[test]
    fn test_open_diagonal_collapses_to_endpoints() {
        let grid = grid_from_fn(10, |_, _| false);
        let cells = search(&grid, Cell::new(0, 0), Cell::new(9, 9)).unwrap();
        let start = Vec2::new(0.5, 0.5);
        let goal = Vec2::new(9.5, 9.5);

        let path = simplify(&grid, &cells, start, goal);

        assert_eq!(path, vec![start, goal]);
    }

    #[test]
    fn test_true_endpoints_are_preserved() {
        let grid = grid_from_fn(10, |_, _| false);
        let cells = search(&grid, Cell::new(0, 0), Cell::new(9, 0)).unwrap();
        // Off-center positions inside the end cells
        let start = Vec2::new(0.13, 0.71);
        let goal = Vec2::new(9.88, 0.19);

        let path = simplify(&grid, &cells, start, goal);

        assert_eq!(*path.first().unwrap(), start);
        assert_eq!(*path.last().unwrap(), goal);
    }

    #[test]
    fn test_corner_is_kept() {
        // L-shaped corridor around a solid block
        let grid = grid_from_fn(8, |x, y| x >= 2 && y >= 2 && x <= 5 && y <= 5);
        let cells = search(&grid, Cell::new(0, 0), Cell::new(7, 7)).unwrap();

        let path = simplify(&grid, &cells, Vec2::new(0.5, 0.5), Vec2::new(7.5, 7.5));

        assert!(
            path.len() > 2,
            "a path around a block needs at least one interior corner"
        );
        for pair in path.windows(2) {
            assert!(segment_walkable(&grid, pair[0], pair[1]));
        }
    }

    #[test]
    fn test_waypoints_never_exceed_cells() {
        let grid = grid_from_fn(10, |x, y| y == 5 && x != 5);
        let cells = search(&grid, Cell::new(0, 0), Cell::new(9, 9)).unwrap();

        let path = simplify(&grid, &cells, Vec2::new(0.5, 0.5), Vec2::new(9.5, 9.5));

        assert!(path.len() <= cells.len());
    }

    #[test]
    fn test_idempotent_on_minimal_path() {
        // Corner path around a solid block; the direct diagonal is blocked,
        // so neither interior waypoint can be removed.
        let grid = grid_from_fn(8, |x, y| x >= 2 && y >= 2 && x <= 5 && y <= 5);
        let path = vec![
            Vec2::new(0.5, 0.5),
            Vec2::new(6.5, 1.5),
            Vec2::new(6.5, 6.5),
            Vec2::new(7.5, 7.5),
        ];
        assert!(!segment_walkable(&grid, path[0], path[2]));
        assert!(segment_walkable(&grid, path[1], path[3]));

        let again = simplify_points(&grid, &path);

        // The scan from (0.5, 0.5) cannot see past (6.5, 1.5), and from
        // there the goal is visible, so (6.5, 6.5) is dropped once and the
        // result is then a fixed point.
        let minimal = vec![path[0], path[1], path[3]];
        assert_eq!(again, minimal);
        assert_eq!(simplify_points(&grid, &minimal), minimal);
    }

    #[test]
    fn test_coincident_endpoints_single_point() {
        let grid = grid_from_fn(5, |_, _| false);
        let point = Vec2::new(2.5, 2.5);

        let path = simplify(&grid, &[Cell::new(2, 2)], point, point);

        assert_eq!(path, vec![point]);
    }

    #[test]
    fn test_segment_walkable_detects_wall() {
        let grid = grid_from_fn(10, |_, y| y == 5);

        assert!(segment_walkable(
            &grid,
            Vec2::new(0.5, 0.5),
            Vec2::new(9.5, 0.5)
        ));
        assert!(!segment_walkable(
            &grid,
            Vec2::new(0.5, 0.5),
            Vec2::new(0.5, 9.5)
        ));
    }
}
