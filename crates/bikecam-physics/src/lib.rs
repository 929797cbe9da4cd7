//! bikecam physics - Collision queries for the camera using rapier3d
//!
//! Provides the [`CollisionProbe`] interface and a rapier-backed scene that
//! answers layer-filtered raycasts.

mod probe;

pub use probe::{CollisionProbe, LayerMask, NoCollision, RaycastHit};

use glam::Vec3;
use nalgebra::Unit;
use rapier3d::prelude::*;

/// Collision scene holding static level geometry
pub struct PhysicsWorld {
    /// Rigid body storage (colliders may be parented to bodies)
    pub rigid_body_set: RigidBodySet,
    /// Collider storage
    pub collider_set: ColliderSet,
    /// Query pipeline for raycasts
    query_pipeline: QueryPipeline,
    /// Whether colliders changed since the last pipeline refresh
    dirty: bool,
}

impl PhysicsWorld {
    /// Create an empty collision scene
    pub fn new() -> Self {
        Self {
            rigid_body_set: RigidBodySet::new(),
            collider_set: ColliderSet::new(),
            query_pipeline: QueryPipeline::new(),
            dirty: false,
        }
    }

    fn groups_for(layer: LayerMask) -> InteractionGroups {
        InteractionGroups::new(Group::from_bits_truncate(layer.bits()), Group::ALL)
    }

    /// Add a static collider on the given layer
    pub fn add_static_collider(&mut self, collider: Collider, layer: LayerMask) -> ColliderHandle {
        let mut collider = collider;
        collider.set_collision_groups(Self::groups_for(layer));
        self.dirty = true;
        self.collider_set.insert(collider)
    }

    /// Get a collider by handle
    pub fn get_collider(&self, handle: ColliderHandle) -> Option<&Collider> {
        self.collider_set.get(handle)
    }

    /// Rebuild the query acceleration structure after colliders changed
    pub fn refresh_queries(&mut self) {
        if self.dirty {
            self.query_pipeline.update(&self.collider_set);
            self.dirty = false;
        }
    }

    /// Whether [`PhysicsWorld::refresh_queries`] has pending work
    pub fn needs_refresh(&self) -> bool {
        self.dirty
    }

    /// Cast a ray and get detailed hit information
    pub fn raycast(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
        mask: LayerMask,
    ) -> Option<RaycastHit> {
        let direction = direction.try_normalize()?;
        let ray = Ray::new(
            point![origin.x, origin.y, origin.z],
            vector![direction.x, direction.y, direction.z],
        );
        let filter =
            QueryFilter::default().groups(InteractionGroups::new(Group::ALL, Group::from_bits_truncate(mask.bits())));

        self.query_pipeline
            .cast_ray_and_get_normal(&self.rigid_body_set, &self.collider_set, &ray, max_distance, true, filter)
            .map(|(_handle, intersection)| RaycastHit {
                distance: intersection.time_of_impact,
                point: origin + direction * intersection.time_of_impact,
                normal: Vec3::new(
                    intersection.normal.x,
                    intersection.normal.y,
                    intersection.normal.z,
                ),
            })
    }

    /// Create a ground plane collider on the terrain layer
    pub fn create_ground(&mut self, y: f32) -> ColliderHandle {
        let normal = Unit::new_normalize(vector![0.0, 1.0, 0.0]);
        let ground = ColliderBuilder::halfspace(normal)
            .translation(vector![0.0, y, 0.0])
            .build();
        self.add_static_collider(ground, LayerMask::TERRAIN)
    }

    /// Create a static box collider on the given layer
    pub fn create_static_box(&mut self, half_extents: Vec3, position: Vec3, layer: LayerMask) -> ColliderHandle {
        let collider = ColliderBuilder::cuboid(half_extents.x, half_extents.y, half_extents.z)
            .translation(vector![position.x, position.y, position.z])
            .build();
        self.add_static_collider(collider, layer)
    }
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl CollisionProbe for PhysicsWorld {
    fn cast(&self, origin: Vec3, direction: Vec3, max_distance: f32, mask: LayerMask)
        -> Option<RaycastHit> {
        self.raycast(origin, direction, max_distance, mask)
    }
}
