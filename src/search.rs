//! A* shortest-path search over the walkability grid
//!
//! Works on the 8-connected grid: cardinal steps cost 1.0, diagonal steps
//! cost sqrt(2). The heuristic is the Euclidean distance between cells,
//! which is admissible and consistent for this cost model, so the returned
//! path is optimal.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use crate::grid::{Cell, WalkabilityGrid};

/// Cost of a diagonal step, in cell units
pub const DIAGONAL_COST: f32 = std::f32::consts::SQRT_2;

/// A* frontier entry
#[derive(Debug, Clone, Copy)]
struct Node {
    cell: Cell,
    /// Cost from start
    g: f32,
    /// g plus heuristic
    f: f32,
    /// Discovery order, used to break f-cost ties (first discovered wins)
    seq: u64,
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        self.f == other.f && self.seq == other.seq
    }
}

impl Eq for Node {}

impl Ord for Node {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse for min-heap; on equal f the earlier discovery wins
        other
            .f
            .partial_cmp(&self.f)
            .unwrap_or(Ordering::Equal)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for Node {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Walkable neighbors of a cell with their step costs
fn neighbors(grid: &WalkabilityGrid, cell: Cell) -> SmallVec<[(Cell, f32); 8]> {
    let mut result = SmallVec::new();

    for dy in -1i64..=1 {
        for dx in -1i64..=1 {
            if dx == 0 && dy == 0 {
                continue;
            }
            let x = cell.x as i64 + dx;
            let y = cell.y as i64 + dy;
            if x < 0 || y < 0 {
                continue;
            }
            let neighbor = Cell::new(x as usize, y as usize);
            if !grid.is_walkable(neighbor) {
                continue;
            }
            let cost = if dx != 0 && dy != 0 {
                DIAGONAL_COST
            } else {
                1.0
            };
            result.push((neighbor, cost));
        }
    }

    result
}

/// Find the cheapest cell path from `start` to `goal`, both inclusive.
///
/// Both endpoints must be walkable; the navigator snaps them before calling.
/// Returns `None` when the frontier is exhausted without reaching the goal.
#[must_use]
pub fn search(grid: &WalkabilityGrid, start: Cell, goal: Cell) -> Option<Vec<Cell>> {
    if start == goal {
        return Some(vec![start]);
    }

    let mut open = BinaryHeap::new();
    let mut came_from: FxHashMap<Cell, Cell> = FxHashMap::default();
    let mut g_score: FxHashMap<Cell, f32> = FxHashMap::default();
    let mut seq = 0u64;

    g_score.insert(start, 0.0);
    open.push(Node {
        cell: start,
        g: 0.0,
        f: start.distance(goal),
        seq,
    });

    while let Some(current) = open.pop() {
        if current.cell == goal {
            return Some(reconstruct(&came_from, goal));
        }

        // Skip entries superseded by a cheaper relaxation
        if g_score.get(&current.cell).is_some_and(|&g| current.g > g) {
            continue;
        }

        for (neighbor, step_cost) in neighbors(grid, current.cell) {
            let tentative = current.g + step_cost;
            // Accept only strictly cheaper routes
            if tentative < *g_score.get(&neighbor).unwrap_or(&f32::MAX) {
                came_from.insert(neighbor, current.cell);
                g_score.insert(neighbor, tentative);
                seq += 1;
                open.push(Node {
                    cell: neighbor,
                    g: tentative,
                    f: tentative + neighbor.distance(goal),
                    seq,
                });
            }
        }
    }

    None
}

/// Walk the predecessor map back from the goal
fn reconstruct(came_from: &FxHashMap<Cell, Cell>, goal: Cell) -> Vec<Cell> {
    let mut path = vec![goal];
    let mut current = goal;

    while let Some(&prev) = came_from.get(&current) {
        path.push(prev);
        current = prev;
    }

    path.reverse();
    path
}

/// Total edge cost of a cell path
#[must_use]
pub fn path_cost(path: &[Cell]) -> f32 {
    path.windows(2)
        .map(|pair| {
            let dx = pair[0].x.abs_diff(pair[1].x);
            let dy = pair[0].y.abs_diff(pair[1].y);
            if dx == 1 && dy == 1 { DIAGONAL_COST } else { 1.0 }
        })
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Bounds;
    use glam::Vec2;

    fn grid_from_fn(size: usize, blocked: impl Fn(usize, usize) -> bool) -> WalkabilityGrid {
        let bounds = Bounds::new(Vec2::ZERO, Vec2::splat(size as f32));
        WalkabilityGrid::build(bounds, 1.0, |p| {
            blocked(p.x.floor() as usize, p.y.floor() as usize)
        })
        .unwrap()
    }

    /// Brute-force Dijkstra by repeated relaxation, for optimality checks
    fn dijkstra_cost(grid: &WalkabilityGrid, start: Cell, goal: Cell) -> Option<f32> {
        let mut dist: FxHashMap<Cell, f32> = FxHashMap::default();
        dist.insert(start, 0.0);

        loop {
            let mut changed = false;
            for cell in grid.iter_cells().collect::<Vec<_>>() {
                let Some(&d) = dist.get(&cell) else { continue };
                for (neighbor, cost) in neighbors(grid, cell) {
                    let candidate = d + cost;
                    if candidate + 1e-6 < *dist.get(&neighbor).unwrap_or(&f32::MAX) {
                        dist.insert(neighbor, candidate);
                        changed = true;
                    }
                }
            }
            if !changed {
                break;
            }
        }

        dist.get(&goal).copied()
    }

    #[test]
    fn test_open_grid_diagonal() {
        let grid = grid_from_fn(10, |_, _| false);

        let path = search(&grid, Cell::new(0, 0), Cell::new(9, 9)).unwrap();

        assert_eq!(path.len(), 10);
        assert!((path_cost(&path) - 9.0 * DIAGONAL_COST).abs() < 1e-4);
    }

    #[test]
    fn test_start_equals_goal() {
        let grid = grid_from_fn(5, |_, _| false);

        let path = search(&grid, Cell::new(2, 2), Cell::new(2, 2)).unwrap();

        assert_eq!(path, vec![Cell::new(2, 2)]);
    }

    #[test]
    fn test_path_endpoints() {
        let grid = grid_from_fn(8, |_, _| false);
        let start = Cell::new(1, 6);
        let goal = Cell::new(7, 0);

        let path = search(&grid, start, goal).unwrap();

        assert_eq!(*path.first().unwrap(), start);
        assert_eq!(*path.last().unwrap(), goal);
    }

    #[test]
    fn test_wall_with_gap_routes_through_gap() {
        // Solid wall on row 5 except a gap at column 5
        let grid = grid_from_fn(10, |x, y| y == 5 && x != 5);

        let path = search(&grid, Cell::new(0, 0), Cell::new(9, 9)).unwrap();

        assert!(path.contains(&Cell::new(5, 5)), "path must use the gap");
        for cell in &path {
            assert!(grid.is_walkable(*cell));
        }
    }

    #[test]
    fn test_no_path_when_disconnected() {
        // Wall with no gap splits the grid in two
        let grid = grid_from_fn(10, |_, y| y == 5);

        assert!(search(&grid, Cell::new(0, 0), Cell::new(9, 9)).is_none());
    }

    #[test]
    fn test_matches_dijkstra_on_scattered_obstacles() {
        // Deterministic pseudo-random obstacle placement
        let mut state = 0x2545_f491u32;
        let mut blocked = [[false; 12]; 12];
        for row in blocked.iter_mut() {
            for cell in row.iter_mut() {
                state = state.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
                *cell = state % 100 < 30;
            }
        }
        blocked[0][0] = false;
        blocked[11][11] = false;

        let grid = grid_from_fn(12, |x, y| blocked[y][x]);
        let start = Cell::new(0, 0);
        let goal = Cell::new(11, 11);

        match search(&grid, start, goal) {
            Some(path) => {
                let expected = dijkstra_cost(&grid, start, goal).unwrap();
                assert!(
                    (path_cost(&path) - expected).abs() < 1e-3,
                    "A* cost {} differs from Dijkstra cost {}",
                    path_cost(&path),
                    expected
                );
            }
            None => {
                assert!(dijkstra_cost(&grid, start, goal).is_none());
            }
        }
    }

    #[test]
    fn test_matches_dijkstra_on_corridors() {
        // Fixed maze-like layout with several equal-cost corridors
        let grid = grid_from_fn(9, |x, y| {
            (y == 2 && x < 7) || (y == 4 && x > 1) || (y == 6 && x < 7)
        });
        let start = Cell::new(0, 0);
        let goal = Cell::new(8, 8);

        let path = search(&grid, start, goal).unwrap();
        let expected = dijkstra_cost(&grid, start, goal).unwrap();

        assert!((path_cost(&path) - expected).abs() < 1e-3);
    }
}
