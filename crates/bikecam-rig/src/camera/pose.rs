//! Rotation and zoom accumulators

/// Mutable pose state driven by input
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CameraPose {
    /// Heading in degrees, wrapped to ±360 each frame
    pub rotation_horizontal: f32,
    /// Pitch in degrees, clamped to the active view's range. Negative looks down.
    pub rotation_vertical: f32,
    /// Roll in degrees, photo mode only
    pub rotation_roll: f32,
    /// Follow distance the user asked for
    pub zoom_wanted: f32,
    /// Follow distance after smoothing and collision
    pub zoom_applied: f32,
}

impl CameraPose {
    /// Set both zoom values at once, e.g. when a preset is applied
    pub fn snap_zoom(&mut self, distance: f32) {
        let distance = distance.max(0.0);
        self.zoom_wanted = distance;
        self.zoom_applied = distance;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_pose_is_level_and_unzoomed() {
        let pose = CameraPose::default();
        assert_eq!(pose.rotation_horizontal, 0.0);
        assert_eq!(pose.rotation_vertical, 0.0);
        assert_eq!(pose.rotation_roll, 0.0);
        assert_eq!(pose.zoom_wanted, 0.0);
        assert_eq!(pose.zoom_applied, 0.0);
    }

    #[test]
    fn test_snap_zoom_sets_both_and_rejects_negative() {
        let mut pose = CameraPose::default();
        pose.snap_zoom(3.5);
        assert_eq!((pose.zoom_wanted, pose.zoom_applied), (3.5, 3.5));
        pose.snap_zoom(-1.0);
        assert_eq!((pose.zoom_wanted, pose.zoom_applied), (0.0, 0.0));
    }
}
