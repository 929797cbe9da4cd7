//! bikecam core - Shared math and time types for the camera rig
//!
//! This crate provides the foundational pieces used by the other crates:
//! - Mathematical primitives (re-exported from glam)
//! - Transform with engine-style euler angles
//! - Angle helpers for the rotation accumulators
//! - Frame time with a freezable time scale

pub mod angle;
pub mod time;
pub mod types;

pub use angle::{clamp_angle, delta_angle, lerp, lerp_angle, signed_angle, wrap_angle};
pub use glam::{Quat, Vec2, Vec3};
pub use time::{FrameTime, TimeConfig};
pub use types::{euler_from_quat, quat_from_euler, Transform};
