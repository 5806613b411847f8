//! Debug visualization hooks
//!
//! Gameplay never reads these; an external visualization tool implements
//! [`DebugDraw`] and gets the grid's walkability and a follower's current
//! waypoint path pushed into it.

use glam::Vec2;

use crate::grid::WalkabilityGrid;

/// Sink for debug geometry
pub trait DebugDraw {
    /// Draw one grid cell marker at its world-space center
    fn draw_cell(&mut self, center: Vec2, size: f32, walkable: bool);

    /// Draw one path segment
    fn draw_segment(&mut self, from: Vec2, to: Vec2);
}

/// Push every cell of the grid into the sink, colored by walkability
pub fn draw_grid(grid: &WalkabilityGrid, sink: &mut dyn DebugDraw) {
    for cell in grid.iter_cells() {
        sink.draw_cell(
            grid.cell_to_world(cell),
            grid.cell_size(),
            grid.is_walkable(cell),
        );
    }
}

/// Push a waypoint path into the sink as a segment chain
pub fn draw_path(path: &[Vec2], sink: &mut dyn DebugDraw) {
    for pair in path.windows(2) {
        sink.draw_segment(pair[0], pair[1]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Bounds;

    #[derive(Default)]
    struct RecordingSink {
        cells: Vec<(Vec2, bool)>,
        segments: Vec<(Vec2, Vec2)>,
    }

    impl DebugDraw for RecordingSink {
        fn draw_cell(&mut self, center: Vec2, _size: f32, walkable: bool) {
            self.cells.push((center, walkable));
        }

        fn draw_segment(&mut self, from: Vec2, to: Vec2) {
            self.segments.push((from, to));
        }
    }

    #[test]
    fn test_draw_grid_emits_every_cell() {
        let bounds = Bounds::new(Vec2::ZERO, Vec2::new(4.0, 3.0));
        let grid = WalkabilityGrid::build(bounds, 1.0, |p| p.x < 1.0).unwrap();
        let mut sink = RecordingSink::default();

        draw_grid(&grid, &mut sink);

        assert_eq!(sink.cells.len(), 12);
        let blocked = sink.cells.iter().filter(|(_, walkable)| !walkable).count();
        assert_eq!(blocked, 3);
    }

    #[test]
    fn test_draw_path_segments() {
        let path = [
            Vec2::new(0.0, 0.0),
            Vec2::new(1.0, 0.0),
            Vec2::new(1.0, 2.0),
        ];
        let mut sink = RecordingSink::default();

        draw_path(&path, &mut sink);

        assert_eq!(sink.segments.len(), 2);
        assert_eq!(sink.segments[1], (Vec2::new(1.0, 0.0), Vec2::new(1.0, 2.0)));
    }

    #[test]
    fn test_draw_path_single_point() {
        let mut sink = RecordingSink::default();

        draw_path(&[Vec2::ZERO], &mut sink);

        assert!(sink.segments.is_empty());
    }
}
