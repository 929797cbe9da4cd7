//! Camera transform snapshots

use bikecam_core::Vec3;

use super::pose::CameraPose;
use crate::host::{ObjectHandle, SceneHost};

/// Tolerance for angle fields in [`CamPos::matches`]
pub const ANGLE_EPSILON: f64 = 1e-12;

/// Saved camera transform plus the rotation accumulators at capture time.
///
/// Snapshots live in memory only and are taken at mode transitions and shutter
/// presses.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CamPos {
    pub position: Vec3,
    pub euler: Vec3,
    pub local_euler: Vec3,
    pub rotation_horizontal: f32,
    pub rotation_vertical: f32,
    pub rotation_roll: f32,
}

impl CamPos {
    /// Read the camera's current state. `None` while the handle is stale.
    pub fn capture(host: &dyn SceneHost, camera: ObjectHandle, pose: &CameraPose) -> Option<Self> {
        Some(Self {
            position: host.position(camera)?,
            euler: host.euler_angles(camera)?,
            local_euler: host.local_euler_angles(camera)?,
            rotation_horizontal: pose.rotation_horizontal,
            rotation_vertical: pose.rotation_vertical,
            rotation_roll: pose.rotation_roll,
        })
    }

    /// Write the snapshot back verbatim
    pub fn restore(&self, host: &mut dyn SceneHost, camera: ObjectHandle, pose: &mut CameraPose) {
        host.set_position(camera, self.position);
        host.set_euler_angles(camera, self.euler);
        host.set_local_euler_angles(camera, self.local_euler);
        pose.rotation_horizontal = self.rotation_horizontal;
        pose.rotation_vertical = self.rotation_vertical;
        pose.rotation_roll = self.rotation_roll;
    }

    /// Vectors must be identical; angles may differ by [`ANGLE_EPSILON`]
    pub fn matches(&self, other: &CamPos) -> bool {
        self.position == other.position
            && self.euler == other.euler
            && self.local_euler == other.local_euler
            && angle_eq(self.rotation_horizontal, other.rotation_horizontal)
            && angle_eq(self.rotation_vertical, other.rotation_vertical)
            && angle_eq(self.rotation_roll, other.rotation_roll)
    }
}

fn angle_eq(a: f32, b: f32) -> bool {
    (f64::from(a) - f64::from(b)).abs() <= ANGLE_EPSILON
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::mock::MockHost;

    #[test]
    fn test_round_trip_after_mutation() {
        let mut host = MockHost::with_standard_scene();
        let camera = host.handle("MainCamera");
        let mut pose = CameraPose {
            rotation_horizontal: 12.5,
            rotation_vertical: -20.0,
            ..Default::default()
        };

        let saved = CamPos::capture(&host, camera, &pose).unwrap();

        host.set_position(camera, Vec3::new(9.0, 9.0, 9.0));
        host.set_euler_angles(camera, Vec3::new(1.0, 2.0, 3.0));
        pose.rotation_horizontal = 300.0;
        pose.rotation_roll = 45.0;
        assert!(!CamPos::capture(&host, camera, &pose).unwrap().matches(&saved));

        saved.restore(&mut host, camera, &mut pose);
        assert!(CamPos::capture(&host, camera, &pose).unwrap().matches(&saved));
    }

    #[test]
    fn test_vectors_compare_exactly() {
        let base = CamPos {
            position: Vec3::ZERO,
            euler: Vec3::ZERO,
            local_euler: Vec3::ZERO,
            rotation_horizontal: 0.0,
            rotation_vertical: 0.0,
            rotation_roll: 0.0,
        };
        let mut moved = base;
        moved.position.x = 1e-6;
        assert!(!base.matches(&moved));

        let mut turned = base;
        turned.rotation_horizontal = 1e-6;
        assert!(!base.matches(&turned));
        assert!(base.matches(&base));
    }

    #[test]
    fn test_capture_on_unloaded_scene() {
        let mut host = MockHost::with_standard_scene();
        let camera = host.handle("MainCamera");
        host.unload();
        assert!(CamPos::capture(&host, camera, &CameraPose::default()).is_none());
    }
}
