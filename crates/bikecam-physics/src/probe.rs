//! Collision probe interface consumed by the pose solver

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Bit set of collision layers a probe should consider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LayerMask(pub u32);

impl LayerMask {
    /// Every layer
    pub const ALL: LayerMask = LayerMask(u32::MAX);
    /// No layer, probes never hit
    pub const NONE: LayerMask = LayerMask(0);
    /// Static level geometry
    pub const TERRAIN: LayerMask = LayerMask(1 << 0);
    /// Props and buildings
    pub const PROPS: LayerMask = LayerMask(1 << 1);
    /// The player vehicle and rider
    pub const PLAYER: LayerMask = LayerMask(1 << 2);
    /// What the camera collides against by default
    pub const CAMERA_DEFAULT: LayerMask = LayerMask((1 << 0) | (1 << 1));

    /// A mask holding a single layer index
    pub const fn layer(index: u32) -> Self {
        LayerMask(1 << index)
    }

    /// Raw bits
    pub const fn bits(self) -> u32 {
        self.0
    }

    /// Whether the two masks share at least one layer
    pub const fn intersects(self, other: LayerMask) -> bool {
        self.0 & other.0 != 0
    }
}

impl Default for LayerMask {
    fn default() -> Self {
        Self::CAMERA_DEFAULT
    }
}

impl std::ops::BitOr for LayerMask {
    type Output = LayerMask;

    fn bitor(self, rhs: Self) -> Self::Output {
        LayerMask(self.0 | rhs.0)
    }
}

/// Raycast hit information
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RaycastHit {
    /// Distance along the ray to the hit point
    pub distance: f32,
    /// World-space hit point
    pub point: Vec3,
    /// Surface normal at hit point
    pub normal: Vec3,
}

/// Something that can answer "what is the nearest obstruction along this ray".
pub trait CollisionProbe {
    /// Cast a ray and return the nearest hit on any layer in `mask`.
    ///
    /// `direction` does not need to be normalized.
    fn cast(&self, origin: Vec3, direction: Vec3, max_distance: f32, mask: LayerMask)
        -> Option<RaycastHit>;
}

/// Probe for hosts without collision geometry
#[derive(Debug, Clone, Copy, Default)]
pub struct NoCollision;

impl CollisionProbe for NoCollision {
    fn cast(&self, _origin: Vec3, _direction: Vec3, _max_distance: f32, _mask: LayerMask)
        -> Option<RaycastHit> {
        None
    }
}

impl<T: CollisionProbe + ?Sized> CollisionProbe for &T {
    fn cast(&self, origin: Vec3, direction: Vec3, max_distance: f32, mask: LayerMask)
        -> Option<RaycastHit> {
        (**self).cast(origin, direction, max_distance, mask)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layer_mask_intersects() {
        assert!(LayerMask::CAMERA_DEFAULT.intersects(LayerMask::TERRAIN));
        assert!(!LayerMask::CAMERA_DEFAULT.intersects(LayerMask::PLAYER));
        assert_eq!(LayerMask::layer(2), LayerMask::PLAYER);
        assert_eq!(LayerMask::TERRAIN | LayerMask::PROPS, LayerMask::CAMERA_DEFAULT);
    }

    #[test]
    fn test_no_collision_never_hits() {
        assert!(NoCollision.cast(Vec3::ZERO, Vec3::Z, 100.0, LayerMask::ALL).is_none());
    }
}
