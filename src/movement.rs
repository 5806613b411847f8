//! Agent movement primitive
//!
//! Separates "decide direction" from "apply motion": the follower (or any
//! other controller) writes a movement intent here, and the fixed-step
//! integration applies it to the agent's position. Surrounding game logic
//! reads the resulting velocity and facing to drive animation.

use glam::Vec2;

/// Speed below which the agent counts as standing still
pub const ZERO_SPEED_THRESHOLD: f32 = 1e-2;

/// Cardinal facing derived from velocity, with horizontal priority on
/// diagonals
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Facing {
    /// Not moving
    #[default]
    None,
    /// Moving left
    Left,
    /// Moving right
    Right,
    /// Moving up
    Up,
    /// Moving down
    Down,
}

/// Movement intent and derived velocity for one agent
#[derive(Debug, Clone, Copy)]
pub struct Movement {
    /// Maximum movement speed in world units per second
    pub speed: f32,
    /// Commanded direction (unit length or zero)
    direction: Vec2,
    /// Velocity applied on the last fixed step
    velocity: Vec2,
}

impl Movement {
    /// Create a movement primitive with a maximum speed
    #[must_use]
    pub fn new(speed: f32) -> Self {
        Self {
            speed,
            direction: Vec2::ZERO,
            velocity: Vec2::ZERO,
        }
    }

    /// Command movement in a direction. A zero direction stops the agent.
    pub fn move_in(&mut self, direction: Vec2) {
        self.direction = direction.normalize_or_zero();
    }

    /// Command movement from `from` towards `position`
    pub fn move_toward(&mut self, position: Vec2, from: Vec2) {
        self.move_in(position - from);
    }

    /// Stop movement
    pub fn stop(&mut self) {
        self.direction = Vec2::ZERO;
    }

    /// Fixed-step integration: update velocity from the current intent and
    /// advance the position
    pub fn apply(&mut self, position: &mut Vec2, dt: f32) {
        self.velocity = self.speed * self.direction;
        *position += self.velocity * dt;
    }

    /// Velocity applied on the last fixed step
    #[must_use]
    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }

    /// Check if the agent is standing still
    #[must_use]
    pub fn is_stopped(&self) -> bool {
        self.velocity.length_squared() < ZERO_SPEED_THRESHOLD * ZERO_SPEED_THRESHOLD
    }

    /// Facing direction for animation, preferring horizontal over vertical
    /// on diagonal movement
    #[must_use]
    pub fn facing(&self) -> Facing {
        if self.velocity.x < -ZERO_SPEED_THRESHOLD {
            return Facing::Left;
        }
        if self.velocity.x > ZERO_SPEED_THRESHOLD {
            return Facing::Right;
        }
        if self.velocity.y > ZERO_SPEED_THRESHOLD {
            return Facing::Up;
        }
        if self.velocity.y < -ZERO_SPEED_THRESHOLD {
            return Facing::Down;
        }
        Facing::None
    }
}
