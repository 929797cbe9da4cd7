//! Field of view and depth-of-field state

use bikecam_core::Vec3;
use serde::{Deserialize, Serialize};

use super::config::ViewTable;
use super::mode::ViewKind;

/// Closest focus distance handed to the depth-of-field effect
pub const MIN_FOCUS_DISTANCE: f32 = 0.1;

/// What the FoV keys adjust in photo mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FocusAdjustMode {
    FieldOfView,
    DepthOfField,
}

impl FocusAdjustMode {
    pub fn toggled(self) -> Self {
        match self {
            FocusAdjustMode::FieldOfView => FocusAdjustMode::DepthOfField,
            FocusAdjustMode::DepthOfField => FocusAdjustMode::FieldOfView,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            FocusAdjustMode::FieldOfView => "Field of view",
            FocusAdjustMode::DepthOfField => "Depth of field",
        }
    }
}

/// Per-view field of view, each clamped to its own range.
///
/// Survives view switches for the whole session.
#[derive(Debug, Clone, PartialEq)]
pub struct FovState {
    values: [f32; 3],
    ranges: [(f32, f32); 3],
}

impl FovState {
    pub fn new(table: &ViewTable) -> Self {
        let mut values = [0.0; 3];
        let mut ranges = [(0.0, 0.0); 3];
        for view in ViewKind::ALL {
            let preset = table.get(view);
            ranges[view.index()] = (preset.fov_min, preset.fov_max);
            values[view.index()] = clamp_fov(preset.fov, ranges[view.index()]);
        }
        Self { values, ranges }
    }

    pub fn get(&self, view: ViewKind) -> f32 {
        self.values[view.index()]
    }

    /// Set a view's FoV, clamped. Returns the stored value.
    pub fn set(&mut self, view: ViewKind, fov: f32) -> f32 {
        let value = clamp_fov(fov, self.ranges[view.index()]);
        self.values[view.index()] = value;
        value
    }

    pub fn adjust(&mut self, view: ViewKind, delta: f32) -> f32 {
        self.set(view, self.get(view) + delta)
    }
}

fn clamp_fov(fov: f32, (min, max): (f32, f32)) -> f32 {
    fov.max(min).min(max)
}

/// Photo-mode lens state driving the depth-of-field overrides
#[derive(Debug, Clone, PartialEq)]
pub struct FocusState {
    pub mode: FocusAdjustMode,
    pub focal_length: f32,
    /// Added to the camera-to-target distance
    pub focus_distance_offset: f32,
}

impl FocusState {
    pub fn new(base_focal_length: f32) -> Self {
        Self {
            mode: FocusAdjustMode::FieldOfView,
            focal_length: base_focal_length,
            focus_distance_offset: 0.0,
        }
    }

    /// Back to the base lens, keeping the adjust mode
    pub fn reset(&mut self, base_focal_length: f32) {
        self.focal_length = base_focal_length;
        self.focus_distance_offset = 0.0;
    }

    pub fn toggle_mode(&mut self) -> FocusAdjustMode {
        self.mode = self.mode.toggled();
        self.mode
    }

    pub fn adjust_focal_length(&mut self, delta: f32, min: f32, max: f32) -> f32 {
        self.focal_length = (self.focal_length + delta).max(min).min(max);
        self.focal_length
    }

    pub fn adjust_focus_distance(&mut self, delta: f32) {
        self.focus_distance_offset += delta;
    }

    /// Focus distance for a camera looking at `target`
    pub fn focus_distance(&self, camera: Vec3, target: Vec3) -> f32 {
        (camera.distance(target) + self.focus_distance_offset).max(MIN_FOCUS_DISTANCE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::CameraConfig;

    #[test]
    fn test_fov_clamped_per_view() {
        let mut fov = FovState::new(&ViewTable::from_config(&CameraConfig::default()));
        assert_eq!(fov.get(ViewKind::ThirdPerson), 60.0);

        assert_eq!(fov.adjust(ViewKind::ThirdPerson, 500.0), 100.0);
        assert_eq!(fov.set(ViewKind::FirstPerson, 0.0), 40.0);
        // other views untouched
        assert_eq!(fov.get(ViewKind::Original), 45.0);
    }

    #[test]
    fn test_out_of_range_default_is_clamped() {
        let mut config = CameraConfig::default();
        config.original.fov = 150.0;
        let fov = FovState::new(&ViewTable::from_config(&config));
        assert_eq!(fov.get(ViewKind::Original), 90.0);
    }

    #[test]
    fn test_focus_distance_floor() {
        let mut focus = FocusState::new(50.0);
        focus.adjust_focus_distance(-10.0);
        assert_eq!(focus.focus_distance(Vec3::ZERO, Vec3::new(0.0, 0.0, 3.0)), MIN_FOCUS_DISTANCE);

        focus.reset(50.0);
        assert_eq!(focus.focus_distance(Vec3::ZERO, Vec3::new(0.0, 0.0, 3.0)), 3.0);
    }

    #[test]
    fn test_focal_length_range() {
        let mut focus = FocusState::new(50.0);
        assert_eq!(focus.adjust_focal_length(-100.0, 10.0, 300.0), 10.0);
        assert_eq!(focus.toggle_mode(), FocusAdjustMode::DepthOfField);
    }
}
