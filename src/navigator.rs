//! Navigation facade
//!
//! Single read-only entry point for path queries: snaps world positions to
//! walkable cells, runs the grid search, and simplifies the result. Holds
//! the grid behind an `Arc` so clones can be handed to background workers.

use std::sync::Arc;

use glam::Vec2;

use crate::grid::WalkabilityGrid;
use crate::search::search;
use crate::simplify::simplify;

/// Errors that can occur during a path query
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavError {
    /// No walkable corridor connects the start to the goal. Recoverable:
    /// the caller should hold position and may retry once the target moves.
    NoPathFound,
}

impl std::fmt::Display for NavError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoPathFound => write!(f, "no walkable path between start and goal"),
        }
    }
}

impl std::error::Error for NavError {}

/// Read-only path query service over a walkability grid.
///
/// Constructed once per scene and passed explicitly to every consumer that
/// needs it; there is no global instance.
#[derive(Debug, Clone)]
pub struct Navigator {
    grid: Arc<WalkabilityGrid>,
}

impl Navigator {
    /// Create a navigator over a built grid
    #[must_use]
    pub fn new(grid: Arc<WalkabilityGrid>) -> Self {
        Self { grid }
    }

    /// The underlying grid
    #[must_use]
    pub fn grid(&self) -> &WalkabilityGrid {
        &self.grid
    }

    /// Find a simplified waypoint path between two world positions.
    ///
    /// Both positions are clamped into the grid and snapped to the nearest
    /// walkable cell before searching, so a start inside solid geometry
    /// still resolves. The returned path starts at the exact `start` and
    /// ends at the exact `goal`.
    ///
    /// # Errors
    ///
    /// Returns [`NavError::NoPathFound`] when no walkable corridor exists.
    pub fn find_path(&self, start: Vec2, goal: Vec2) -> Result<Vec<Vec2>, NavError> {
        let start_cell = self
            .grid
            .nearest_walkable(self.grid.world_to_cell(start))
            .ok_or(NavError::NoPathFound)?;
        let goal_cell = self
            .grid
            .nearest_walkable(self.grid.world_to_cell(goal))
            .ok_or(NavError::NoPathFound)?;

        let cells = search(&self.grid, start_cell, goal_cell).ok_or(NavError::NoPathFound)?;
        log::debug!(
            "path found: {} cells from {:?} to {:?}",
            cells.len(),
            start_cell,
            goal_cell
        );

        Ok(simplify(&self.grid, &cells, start, goal))
    }
}
