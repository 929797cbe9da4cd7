//! Core types shared by the rig and its hosts
//!
//! Axis convention follows the host engine: +X right, +Y up, +Z forward.
//! Euler angles are in degrees and applied Z, then X, then Y.

use glam::{EulerRot, Quat, Vec3};
use serde::{Deserialize, Serialize};

use crate::angle::repeat;

/// Build a rotation from engine-style euler angles in degrees.
pub fn quat_from_euler(euler: Vec3) -> Quat {
    Quat::from_euler(
        EulerRot::YXZ,
        euler.y.to_radians(),
        euler.x.to_radians(),
        euler.z.to_radians(),
    )
}

/// Decompose a rotation into engine-style euler angles, each in `[0, 360)`.
pub fn euler_from_quat(rotation: Quat) -> Vec3 {
    let (y, x, z) = rotation.to_euler(EulerRot::YXZ);
    Vec3::new(
        repeat(x.to_degrees(), 360.0) % 360.0,
        repeat(y.to_degrees(), 360.0) % 360.0,
        repeat(z.to_degrees(), 360.0) % 360.0,
    )
}

/// World-space position and rotation of a scene object
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Quat,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
        }
    }
}

impl Transform {
    /// Create a new transform at the given position
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Create a new transform with position and rotation
    pub fn from_position_rotation(position: Vec3, rotation: Quat) -> Self {
        Self { position, rotation }
    }

    /// Create a new transform from a position and euler angles in degrees
    pub fn from_position_euler(position: Vec3, euler: Vec3) -> Self {
        Self {
            position,
            rotation: quat_from_euler(euler),
        }
    }

    /// Euler angles in degrees, each in `[0, 360)`
    pub fn euler_angles(&self) -> Vec3 {
        euler_from_quat(self.rotation)
    }

    /// Heading around the up axis in degrees
    pub fn yaw(&self) -> f32 {
        self.euler_angles().y
    }

    /// Get the forward direction (positive Z in local space)
    pub fn forward(&self) -> Vec3 {
        self.rotation * Vec3::Z
    }

    /// Get the right direction (positive X in local space)
    pub fn right(&self) -> Vec3 {
        self.rotation * Vec3::X
    }

    /// Get the up direction (positive Y in local space)
    pub fn up(&self) -> Vec3 {
        self.rotation * Vec3::Y
    }

    /// Translate by the given offset
    pub fn translate(&mut self, offset: Vec3) {
        self.position += offset;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: Vec3, b: Vec3) -> bool {
        (a - b).abs().max_element() < 1e-3
    }

    #[test]
    fn test_yaw_turns_forward_towards_right() {
        let transform = Transform::from_position_euler(Vec3::ZERO, Vec3::new(0.0, 90.0, 0.0));
        assert!(approx(transform.forward(), Vec3::X));
    }

    #[test]
    fn test_positive_pitch_looks_down() {
        let transform = Transform::from_position_euler(Vec3::ZERO, Vec3::new(30.0, 0.0, 0.0));
        assert!(transform.forward().y < 0.0);
    }

    #[test]
    fn test_euler_round_trip() {
        let euler = Vec3::new(20.0, 135.0, 10.0);
        let transform = Transform::from_position_euler(Vec3::ZERO, euler);
        assert!(approx(transform.euler_angles(), euler));
    }

    #[test]
    fn test_euler_angles_are_positive() {
        let transform = Transform::from_position_euler(Vec3::ZERO, Vec3::new(-10.0, -90.0, 0.0));
        assert!(approx(transform.euler_angles(), Vec3::new(350.0, 270.0, 0.0)));
    }
}
