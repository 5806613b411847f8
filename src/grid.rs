//! Walkability grid built from static collision geometry
//!
//! The grid discretizes a rectangular world region into square cells and
//! records, for each cell, whether an agent can stand there. It is built
//! once per scene and never mutated afterwards, so it can be queried from
//! any thread without locking.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::physics::PhysicsWorld;

/// An axis-aligned rectangular region in world space
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    /// Minimum corner
    pub min: Vec2,
    /// Maximum corner
    pub max: Vec2,
}

impl Bounds {
    /// Create bounds from two corners
    #[must_use]
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    /// Width and height of the region
    #[must_use]
    pub fn size(&self) -> Vec2 {
        self.max - self.min
    }

    /// Check if a point lies inside the region
    #[must_use]
    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.min.x
            && point.x <= self.max.x
            && point.y >= self.min.y
            && point.y <= self.max.y
    }

    /// Check if the region has zero or negative area
    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        let size = self.size();
        size.x <= 0.0 || size.y <= 0.0
    }
}

/// Integer coordinate of one grid cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cell {
    /// Column index
    pub x: usize,
    /// Row index
    pub y: usize,
}

impl Cell {
    /// Create a cell coordinate
    #[must_use]
    pub fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another cell, in cell units
    #[must_use]
    pub fn distance(self, other: Cell) -> f32 {
        let dx = self.x as f32 - other.x as f32;
        let dy = self.y as f32 - other.y as f32;
        (dx * dx + dy * dy).sqrt()
    }
}

/// Errors that can occur while building a grid
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GridError {
    /// Bounds have zero or negative area
    DegenerateBounds,
    /// Cell size is zero or negative
    InvalidCellSize,
}

impl std::fmt::Display for GridError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DegenerateBounds => write!(f, "grid bounds have zero or negative area"),
            Self::InvalidCellSize => write!(f, "grid cell size must be positive"),
        }
    }
}

impl std::error::Error for GridError {}

/// Immutable walkability map over a bounded rectangular region
#[derive(Debug, Clone)]
pub struct WalkabilityGrid {
    /// World-space region covered by the grid
    bounds: Bounds,
    /// Size of each cell in world units
    cell_size: f32,
    /// Width in cells
    width: usize,
    /// Height in cells
    height: usize,
    /// Walkable flags, row-major (true = walkable)
    cells: Vec<bool>,
}

impl WalkabilityGrid {
    /// Build a grid by probing every cell center with a caller-supplied
    /// blocked test. The cell is walkable iff the probe reports no solid
    /// geometry at its center.
    ///
    /// This is a one-shot synchronous operation; the probe typically calls
    /// into the physics world and must run on the thread that owns it.
    ///
    /// # Errors
    ///
    /// Returns an error for degenerate bounds or a non-positive cell size.
    /// These are scene configuration mistakes and should fail scene load.
    pub fn build(
        bounds: Bounds,
        cell_size: f32,
        mut is_blocked: impl FnMut(Vec2) -> bool,
    ) -> Result<Self, GridError> {
        if bounds.is_degenerate() {
            return Err(GridError::DegenerateBounds);
        }
        if cell_size <= 0.0 {
            return Err(GridError::InvalidCellSize);
        }

        let size = bounds.size() / cell_size;
        let width = size.x.round() as usize;
        let height = size.y.round() as usize;
        if width == 0 || height == 0 {
            return Err(GridError::DegenerateBounds);
        }

        let mut grid = Self {
            bounds,
            cell_size,
            width,
            height,
            cells: vec![false; width * height],
        };

        let mut walkable_count = 0usize;
        for y in 0..height {
            for x in 0..width {
                let cell = Cell::new(x, y);
                let walkable = !is_blocked(grid.cell_to_world(cell));
                grid.cells[y * width + x] = walkable;
                walkable_count += usize::from(walkable);
            }
        }

        log::info!(
            "built walkability grid: {}x{} cells ({} walkable), cell size {}",
            width,
            height,
            walkable_count,
            cell_size
        );

        Ok(grid)
    }

    /// Build a grid from a physics world using a circular overlap probe of
    /// `probe_radius` against solid (non-sensor) geometry at each cell center.
    ///
    /// # Errors
    ///
    /// Returns an error for degenerate bounds or a non-positive cell size.
    pub fn from_physics(
        physics: &PhysicsWorld,
        bounds: Bounds,
        cell_size: f32,
        probe_radius: f32,
    ) -> Result<Self, GridError> {
        Self::build(bounds, cell_size, |center| {
            physics.probe_circle(center, probe_radius)
        })
    }

    /// Width in cells
    #[must_use]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Height in cells
    #[must_use]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Size of each cell in world units
    #[must_use]
    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    /// World-space region covered by the grid
    #[must_use]
    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    /// Check if a cell is walkable
    #[must_use]
    pub fn is_walkable(&self, cell: Cell) -> bool {
        if cell.x >= self.width || cell.y >= self.height {
            return false;
        }
        self.cells[cell.y * self.width + cell.x]
    }

    /// Convert a world position to the containing cell, clamped into bounds
    #[must_use]
    pub fn world_to_cell(&self, point: Vec2) -> Cell {
        let local = point - self.bounds.min;
        let x = (local.x / self.cell_size).floor() as i64;
        let y = (local.y / self.cell_size).floor() as i64;
        Cell::new(
            x.clamp(0, self.width as i64 - 1) as usize,
            y.clamp(0, self.height as i64 - 1) as usize,
        )
    }

    /// Convert a cell to its center position in world space
    #[must_use]
    pub fn cell_to_world(&self, cell: Cell) -> Vec2 {
        self.bounds.min
            + Vec2::new(
                (cell.x as f32 + 0.5) * self.cell_size,
                (cell.y as f32 + 0.5) * self.cell_size,
            )
    }

    /// Iterate over all cell coordinates, row by row
    pub fn iter_cells(&self) -> impl Iterator<Item = Cell> + '_ {
        (0..self.height).flat_map(move |y| (0..self.width).map(move |x| Cell::new(x, y)))
    }

    /// Find the walkable cell nearest to `cell`, scanning outward in
    /// expanding rings and picking the candidate with the smallest
    /// Euclidean distance. Returns `None` if the grid has no walkable cell.
    #[must_use]
    pub fn nearest_walkable(&self, cell: Cell) -> Option<Cell> {
        if self.is_walkable(cell) {
            return Some(cell);
        }

        let max_ring = self.width.max(self.height);
        for ring in 1..max_ring {
            let mut best: Option<(Cell, f32)> = None;
            for candidate in self.ring_cells(cell, ring) {
                if !self.is_walkable(candidate) {
                    continue;
                }
                let dist = candidate.distance(cell);
                if best.is_none_or(|(_, d)| dist < d) {
                    best = Some((candidate, dist));
                }
            }
            if let Some((found, _)) = best {
                return Some(found);
            }
        }

        None
    }

    /// Cells at exactly Chebyshev distance `ring` from `center`, clipped to
    /// the grid.
    fn ring_cells(&self, center: Cell, ring: usize) -> Vec<Cell> {
        let r = ring as i64;
        let cx = center.x as i64;
        let cy = center.y as i64;
        let mut cells = Vec::new();

        let mut push = |x: i64, y: i64| {
            if x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height {
                cells.push(Cell::new(x as usize, y as usize));
            }
        };

        for x in (cx - r)..=(cx + r) {
            push(x, cy - r);
            push(x, cy + r);
        }
        for y in (cy - r + 1)..(cy + r) {
            push(cx - r, y);
            push(cx + r, y);
        }

        cells
    }
}
