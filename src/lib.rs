//! Grid-based navigation for 2D agents
//!
//! This crate provides:
//! - A walkability grid built once from static collision geometry
//! - A* shortest-path search with diagonal movement
//! - Line-of-sight path simplification
//! - A path-following controller with background path computation

pub mod config;
pub mod debug;
pub mod follower;
pub mod grid;
pub mod movement;
pub mod navigator;
pub mod physics;
pub mod search;
pub mod simplify;
pub mod worker;

// Re-exports for convenience
pub use glam;
pub use rapier2d;

/// Prelude module for common imports
pub mod prelude {
    pub use crate::config::{ConfigError, NavConfig};
    pub use crate::debug::{DebugDraw, draw_grid, draw_path};
    pub use crate::follower::{FollowerState, NavStats, PathFollower};
    pub use crate::grid::{Bounds, Cell, GridError, WalkabilityGrid};
    pub use crate::movement::{Facing, Movement};
    pub use crate::navigator::{NavError, Navigator};
    pub use crate::physics::{ColliderHandle, PhysicsWorld};
    pub use crate::worker::{PathOutcome, WorkerPool};
    pub use glam::Vec2;
}
