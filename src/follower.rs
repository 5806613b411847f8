//! Path-following controller
//!
//! Per-agent component that steers towards a moving target every simulation
//! tick. When the target is directly visible the follower steers straight
//! at it; when occluded it requests a waypoint path from the background
//! workers and walks it, periodically refreshing the path as the target
//! moves. Path computation never blocks the tick: at most one request is in
//! flight per follower, and its result is consumed on the first tick after
//! completion.

use std::sync::Arc;
use std::sync::mpsc::{Receiver, TryRecvError};

use glam::Vec2;

use crate::movement::Movement;
use crate::navigator::NavError;
use crate::physics::PhysicsWorld;
use crate::simplify::COINCIDENT_EPSILON;
use crate::worker::{PathOutcome, WorkerPool};

/// Default interval between path refreshes, in seconds
pub const DEFAULT_REFRESH_PERIOD: f32 = 0.5;

/// Default distance below which a waypoint counts as reached
pub const DEFAULT_ARRIVE_THRESHOLD: f32 = 0.1;

/// Pursuit state of a follower, exposed for debugging and game logic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FollowerState {
    /// No target, or the target coincides with the agent
    #[default]
    Idle,
    /// Target directly visible; steering straight at it
    DirectPursuit,
    /// Target occluded; walking (or waiting for) a waypoint path
    PathPursuit,
}

/// Counters for the debug surface
#[derive(Debug, Clone, Copy, Default)]
pub struct NavStats {
    /// Path requests submitted to the worker pool
    pub requests_issued: u64,
    /// Completed paths adopted
    pub paths_adopted: u64,
    /// Computations that ended with no path
    pub no_path_results: u64,
}

/// Steers one agent after a moving target.
///
/// The follower is the only writer of its agent's movement intent; it never
/// touches the agent's position directly.
pub struct PathFollower {
    /// Worker pool handle, shared with every other follower in the scene
    pool: Arc<WorkerPool>,
    /// Latest sampled target position, set by the AI collaborator
    target: Option<Vec2>,
    /// Cached waypoint path, replaced wholesale on adoption
    path: Option<Vec<Vec2>>,
    /// Cursor into the cached path
    path_index: usize,
    /// Target position used for the last adopted computation
    last_target_used: Vec2,
    /// Seconds of path pursuit since the last refresh
    elapsed: f32,
    /// In-flight computation, if any; doubles as the single-request latch
    pending: Option<Receiver<PathOutcome>>,
    /// Current pursuit state
    state: FollowerState,
    /// Interval between staleness-driven refreshes
    refresh_period: f32,
    /// Squared distance below which a waypoint counts as reached
    arrive_threshold_squared: f32,
    /// Debug counters
    stats: NavStats,
}

impl PathFollower {
    /// Create a follower using the scene's worker pool
    #[must_use]
    pub fn new(pool: Arc<WorkerPool>) -> Self {
        Self {
            pool,
            target: None,
            path: None,
            path_index: 0,
            // Sentinel far from any real position so the first request
            // always passes the target-unchanged guard
            last_target_used: Vec2::MAX,
            elapsed: 0.0,
            pending: None,
            state: FollowerState::Idle,
            refresh_period: DEFAULT_REFRESH_PERIOD,
            arrive_threshold_squared: DEFAULT_ARRIVE_THRESHOLD * DEFAULT_ARRIVE_THRESHOLD,
            stats: NavStats::default(),
        }
    }

    /// Set the refresh interval
    #[must_use]
    pub fn with_refresh_period(mut self, seconds: f32) -> Self {
        self.refresh_period = seconds;
        self
    }

    /// Set the waypoint arrival distance
    #[must_use]
    pub fn with_arrive_threshold(mut self, distance: f32) -> Self {
        self.arrive_threshold_squared = distance * distance;
        self
    }

    /// Set the pursued target's current position
    pub fn set_target(&mut self, position: Vec2) {
        self.target = Some(position);
    }

    /// Clear the target; the follower idles until a new one is set
    pub fn clear_target(&mut self) {
        self.target = None;
    }

    /// Current pursuit state
    #[must_use]
    pub fn state(&self) -> FollowerState {
        self.state
    }

    /// The cached waypoint path, if any (debug surface)
    #[must_use]
    pub fn current_path(&self) -> Option<&[Vec2]> {
        self.path.as_deref()
    }

    /// Debug counters
    #[must_use]
    pub fn stats(&self) -> NavStats {
        self.stats
    }

    /// Check if a computation is in flight
    #[must_use]
    pub fn is_computing(&self) -> bool {
        self.pending.is_some()
    }

    /// Advance the follower by one simulation tick.
    ///
    /// `position` is the agent's current world position and `movement` the
    /// agent's movement primitive; this method is its only writer. Never
    /// blocks on an in-flight computation.
    pub fn update(
        &mut self,
        position: Vec2,
        dt: f32,
        physics: &PhysicsWorld,
        movement: &mut Movement,
    ) {
        self.poll_pending();

        let Some(target) = self.target else {
            movement.stop();
            self.state = FollowerState::Idle;
            return;
        };

        if target.distance_squared(position) <= COINCIDENT_EPSILON * COINCIDENT_EPSILON {
            movement.stop();
            self.state = FollowerState::Idle;
            return;
        }

        if physics.line_of_sight(position, target) {
            self.path = None;
            self.path_index = 0;
            movement.move_toward(target, position);
            self.state = FollowerState::DirectPursuit;
            return;
        }

        // Target occluded
        self.state = FollowerState::PathPursuit;

        let exhausted = self
            .path
            .as_ref()
            .is_none_or(|path| path.is_empty() || self.path_index >= path.len());
        if exhausted {
            self.elapsed = 0.0;
            self.request_path(position, target);
            // Hold the last movement intent until a path arrives
            return;
        }

        self.elapsed += dt;
        if self.elapsed >= self.refresh_period {
            self.elapsed = 0.0;
            // The stale path keeps being followed until the new one lands
            self.request_path(position, target);
        }

        if let Some(path) = &self.path {
            let mut index = self.path_index;
            while index < path.len()
                && path[index].distance_squared(position) < self.arrive_threshold_squared
            {
                index += 1;
            }
            self.path_index = index;

            if index < path.len() {
                movement.move_toward(path[index], position);
            } else {
                movement.stop();
            }
        }
    }

    /// Submit a path request unless one is already in flight or the target
    /// has not moved since the last adopted computation.
    ///
    /// A skipped request leaves the cached path, cursor, and bookkeeping
    /// untouched.
    fn request_path(&mut self, position: Vec2, target: Vec2) {
        if self.pending.is_some() {
            return;
        }
        if target == self.last_target_used {
            return;
        }

        log::debug!("requesting path from {position} to {target}");
        self.pending = Some(self.pool.submit(position, target));
        self.stats.requests_issued += 1;
    }

    /// Consume a completed computation, if one has landed.
    ///
    /// A completed result is always adopted, even if the target has moved
    /// again meanwhile; the next tick's staleness check will request a
    /// fresher path without discarding this one.
    fn poll_pending(&mut self) {
        let Some(rx) = &self.pending else { return };

        match rx.try_recv() {
            Ok(outcome) => {
                self.pending = None;
                self.last_target_used = outcome.goal;
                match outcome.result {
                    Ok(waypoints) => {
                        // Skip the exact-start waypoint; steer at the first
                        // interior one
                        self.path_index = usize::from(waypoints.len() > 1);
                        self.path = Some(waypoints);
                        self.stats.paths_adopted += 1;
                    }
                    Err(NavError::NoPathFound) => {
                        self.path = None;
                        self.path_index = 0;
                        self.stats.no_path_results += 1;
                        log::debug!("target unreachable; holding position");
                    }
                }
            }
            Err(TryRecvError::Empty) => {}
            Err(TryRecvError::Disconnected) => {
                self.pending = None;
                log::warn!("path worker disconnected before replying");
            }
        }
    }
}
