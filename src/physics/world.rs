//! Static collision geometry and spatial queries using rapier2d
//!
//! The navigation subsystem only needs two queries against the scene's
//! static geometry: a circular overlap probe (grid building) and a segment
//! cast (follower line-of-sight). Sensor colliders stand in for trigger
//! zones and are excluded from both.

use glam::Vec2;
use rapier2d::prelude::*;

/// Handle to a collider in the physics world
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ColliderHandle(pub rapier2d::geometry::ColliderHandle);

/// Holds the scene's static collision geometry and answers spatial queries.
///
/// Owned by the simulation thread; the walkability grid is built from it
/// once and workers never touch it afterwards.
pub struct PhysicsWorld {
    /// Rigid body set (static geometry only, kept for query calls)
    bodies: RigidBodySet,
    /// Collider set
    colliders: ColliderSet,
    /// Query acceleration structure
    query_pipeline: QueryPipeline,
    /// Island manager, needed for collider removal
    islands: IslandManager,
}

impl PhysicsWorld {
    /// Create an empty physics world
    #[must_use]
    pub fn new() -> Self {
        Self {
            bodies: RigidBodySet::new(),
            colliders: ColliderSet::new(),
            query_pipeline: QueryPipeline::new(),
            islands: IslandManager::new(),
        }
    }

    /// Add a static axis-aligned box obstacle
    pub fn add_static_box(&mut self, center: Vec2, half_extents: Vec2) -> ColliderHandle {
        let collider = ColliderBuilder::cuboid(half_extents.x, half_extents.y)
            .translation(vector![center.x, center.y])
            .build();
        self.insert(collider)
    }

    /// Add a static circular obstacle
    pub fn add_static_circle(&mut self, center: Vec2, radius: f32) -> ColliderHandle {
        let collider = ColliderBuilder::ball(radius)
            .translation(vector![center.x, center.y])
            .build();
        self.insert(collider)
    }

    /// Add a box-shaped sensor (trigger) zone. Sensors are invisible to
    /// navigation queries.
    pub fn add_sensor_box(&mut self, center: Vec2, half_extents: Vec2) -> ColliderHandle {
        let collider = ColliderBuilder::cuboid(half_extents.x, half_extents.y)
            .translation(vector![center.x, center.y])
            .sensor(true)
            .build();
        self.insert(collider)
    }

    /// Remove a collider
    pub fn remove(&mut self, handle: ColliderHandle) {
        self.colliders
            .remove(handle.0, &mut self.islands, &mut self.bodies, false);
        self.query_pipeline.update(&self.colliders);
    }

    /// Number of colliders in the world
    #[must_use]
    pub fn collider_count(&self) -> usize {
        self.colliders.len()
    }

    /// Check if a circle overlaps any solid (non-sensor) geometry
    #[must_use]
    pub fn probe_circle(&self, center: Vec2, radius: f32) -> bool {
        let shape = Ball::new(radius);
        let position = Isometry::translation(center.x, center.y);

        self.query_pipeline
            .intersection_with_shape(
                &self.bodies,
                &self.colliders,
                &position,
                &shape,
                QueryFilter::from(QueryFilterFlags::EXCLUDE_SENSORS),
            )
            .is_some()
    }

    /// Check if the straight segment between two points is free of solid
    /// (non-sensor) geometry
    #[must_use]
    pub fn line_of_sight(&self, from: Vec2, to: Vec2) -> bool {
        let delta = to - from;
        let length = delta.length();
        if length <= f32::EPSILON {
            return true;
        }

        let direction = delta / length;
        let ray = Ray::new(point![from.x, from.y], vector![direction.x, direction.y]);

        self.query_pipeline
            .cast_ray(
                &self.bodies,
                &self.colliders,
                &ray,
                length,
                true,
                QueryFilter::from(QueryFilterFlags::EXCLUDE_SENSORS),
            )
            .is_none()
    }

    fn insert(&mut self, collider: Collider) -> ColliderHandle {
        let handle = ColliderHandle(self.colliders.insert(collider));
        self.query_pipeline.update(&self.colliders);
        handle
    }
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        Self::new()
    }
}
