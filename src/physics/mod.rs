//! Physics query module
//!
//! Built on top of rapier2d

mod world;

pub use world::{ColliderHandle, PhysicsWorld};
