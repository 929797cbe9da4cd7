//! Camera configuration

use bikecam_core::Vec3;
use bikecam_physics::LayerMask;
use serde::{Deserialize, Serialize};

use super::mode::ViewKind;

/// Whether horizontal rotation starts out following the target's heading
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AlignmentMode {
    /// Ease behind the target unless the invert key is held
    Auto,
    /// Stay where the user points the camera unless the invert key is held
    Manual,
}

/// How horizontal input is interpreted while not aligning
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ManualInputStyle {
    /// The accumulated angle is a world heading
    Free,
    /// The accumulated angle is an offset from the target's heading
    Follow,
}

/// Lens and follow settings for one view
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewPreset {
    /// Scene object the camera follows
    pub follow_target: String,
    /// Follow distance applied when the view is selected
    pub follow_distance: f32,
    /// Offset from the target, rotated by the target's heading
    pub offset: Vec3,
    /// Field of view in degrees when first selected
    pub fov: f32,
    pub fov_min: f32,
    pub fov_max: f32,
    /// Near clip plane distance
    pub near_clip: f32,
    /// Vertical rotation range in degrees
    pub vertical_min: f32,
    pub vertical_max: f32,
}

impl ViewPreset {
    fn validate(&self, view: &str, problems: &mut Vec<String>) {
        if self.fov_min > self.fov_max {
            problems.push(format!("{view}: FoV range {}..{} is reversed", self.fov_min, self.fov_max));
        } else if !(self.fov_min..=self.fov_max).contains(&self.fov) {
            problems.push(format!(
                "{view}: FoV {} is outside {}..{} and will be clamped",
                self.fov, self.fov_min, self.fov_max
            ));
        }
        if self.vertical_min > self.vertical_max {
            problems.push(format!(
                "{view}: vertical range {}..{} is reversed",
                self.vertical_min, self.vertical_max
            ));
        }
        if self.follow_distance < 0.0 {
            problems.push(format!("{view}: follow distance must not be negative"));
        }
        if self.follow_target.trim().is_empty() {
            problems.push(format!("{view}: follow target name is empty"));
        }
    }
}

/// Bike camera configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Name of the game's camera object
    pub camera_object: String,
    /// Name of the vehicle root whose heading auto-align follows
    pub player_object: String,
    /// The game's own camera (FoV only)
    pub original: ViewPreset,
    pub third_person: ViewPreset,
    pub first_person: ViewPreset,
    /// View selected once the scene is ready
    pub start_view: ViewKind,
    /// Distance change per zoom step
    pub zoom_step: f32,
    /// FoV change per key press in the bike views
    pub fov_step: f32,
    /// Gap kept between the camera and an obstruction
    pub collision_padding: f32,
    /// Fraction of the gap closed per frame when pulling in for a collision
    pub zoom_lerp_in: f32,
    /// Rate per second when easing back out
    pub zoom_lerp_out: f32,
    /// Rate per second for auto-align
    pub align_speed: f32,
    pub alignment: AlignmentMode,
    pub manual_style: ManualInputStyle,
    pub invert_horizontal: bool,
    /// Starting vertical rotation; 0 reads it from the camera instead
    pub initial_vertical_rotation: f32,
    /// Switch to the original camera while a game menu is open
    pub force_original_on_menu: bool,
    /// Layers the camera collides with
    pub collision_layers: LayerMask,
    /// Seconds during which a second photo-mode toggle is ignored
    pub mode_toggle_cooldown: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            camera_object: "MainCamera".to_string(),
            player_object: "Player".to_string(),
            original: ViewPreset {
                follow_target: "Player".to_string(),
                follow_distance: 0.0,
                offset: Vec3::ZERO,
                fov: 45.0,
                fov_min: 10.0,
                fov_max: 90.0,
                near_clip: 0.3,
                vertical_min: -89.0,
                vertical_max: 89.0,
            },
            third_person: ViewPreset {
                follow_target: "Bike".to_string(),
                follow_distance: 3.5,
                offset: Vec3::new(0.0, 1.2, 0.0),
                fov: 60.0,
                fov_min: 30.0,
                fov_max: 100.0,
                near_clip: 0.05,
                vertical_min: -70.0,
                vertical_max: 30.0,
            },
            first_person: ViewPreset {
                follow_target: "Head".to_string(),
                follow_distance: 0.0,
                offset: Vec3::new(0.0, 0.05, 0.1),
                fov: 75.0,
                fov_min: 40.0,
                fov_max: 110.0,
                near_clip: 0.01,
                vertical_min: -80.0,
                vertical_max: 70.0,
            },
            start_view: ViewKind::ThirdPerson,
            zoom_step: 0.5,
            fov_step: 1.0,
            collision_padding: 0.2,
            zoom_lerp_in: 0.5,
            zoom_lerp_out: 2.0,
            align_speed: 3.0,
            alignment: AlignmentMode::Auto,
            manual_style: ManualInputStyle::Free,
            invert_horizontal: false,
            initial_vertical_rotation: -20.0,
            force_original_on_menu: true,
            collision_layers: LayerMask::CAMERA_DEFAULT,
            mode_toggle_cooldown: 0.25,
        }
    }
}

impl CameraConfig {
    /// Human-readable problems with this configuration
    pub fn validate(&self) -> Vec<String> {
        let mut problems = Vec::new();
        self.original.validate("Original view", &mut problems);
        self.third_person.validate("Third-person view", &mut problems);
        self.first_person.validate("First-person view", &mut problems);

        if self.zoom_step <= 0.0 {
            problems.push("Zoom step must be positive".to_string());
        }
        if self.fov_step <= 0.0 {
            problems.push("FoV step must be positive".to_string());
        }
        if !(0.0..=1.0).contains(&self.zoom_lerp_in) || self.zoom_lerp_in == 0.0 {
            problems.push(format!("Zoom lerp-in {} should be in (0, 1]", self.zoom_lerp_in));
        }
        if self.collision_padding < 0.0 {
            problems.push("Collision padding must not be negative".to_string());
        }
        if self.camera_object.trim().is_empty() || self.player_object.trim().is_empty() {
            problems.push("Camera and player object names must be set".to_string());
        }
        problems
    }
}

/// Photo mode configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PhotoModeConfig {
    /// Fly speed in meters per second
    pub fly_speed: f32,
    /// Speed multiplier while sprinting
    pub sprint_multiplier: f32,
    /// Roll speed in degrees per second from the roll keys
    pub roll_speed: f32,
    /// Roll speed in degrees per second at full d-pad deflection
    pub dpad_roll_rate: f32,
    pub vertical_min: f32,
    pub vertical_max: f32,
    /// FoV change per key press
    pub fov_step: f32,
    /// Focal length change per scroll step (mm)
    pub focal_length_step: f32,
    /// Focus distance change per scroll step (m)
    pub focus_distance_step: f32,
    /// Focal length applied when photo mode starts (mm)
    pub base_focal_length: f32,
    pub focal_length_min: f32,
    pub focal_length_max: f32,
    /// Hide the game HUD on entry
    pub hide_hud: bool,
    /// Freeze game time on entry
    pub freeze_time: bool,
}

impl Default for PhotoModeConfig {
    fn default() -> Self {
        Self {
            fly_speed: 4.0,
            sprint_multiplier: 4.0,
            roll_speed: 45.0,
            dpad_roll_rate: 60.0,
            vertical_min: -89.0,
            vertical_max: 89.0,
            fov_step: 1.0,
            focal_length_step: 5.0,
            focus_distance_step: 0.25,
            base_focal_length: 50.0,
            focal_length_min: 10.0,
            focal_length_max: 300.0,
            hide_hud: true,
            freeze_time: true,
        }
    }
}

impl PhotoModeConfig {
    /// Human-readable problems with this configuration
    pub fn validate(&self) -> Vec<String> {
        let mut problems = Vec::new();
        if self.vertical_min > self.vertical_max {
            problems.push("Photo mode vertical range is reversed".to_string());
        }
        if self.focal_length_min > self.focal_length_max {
            problems.push("Photo mode focal length range is reversed".to_string());
        }
        if self.fly_speed < 0.0 || self.sprint_multiplier < 0.0 {
            problems.push("Photo mode speeds must not be negative".to_string());
        }
        problems
    }
}

/// Per-view presets, indexed by [`ViewKind`]. Built once and never mutated.
#[derive(Debug, Clone)]
pub struct ViewTable {
    presets: [ViewPreset; 3],
}

impl ViewTable {
    pub fn from_config(config: &CameraConfig) -> Self {
        Self {
            presets: [
                config.original.clone(),
                config.third_person.clone(),
                config.first_person.clone(),
            ],
        }
    }

    pub fn get(&self, view: ViewKind) -> &ViewPreset {
        &self.presets[view.index()]
    }

    /// `[min, max]` FoV for a view
    pub fn fov_range(&self, view: ViewKind) -> (f32, f32) {
        let preset = self.get(view);
        (preset.fov_min, preset.fov_max)
    }

    /// `[min, max]` vertical rotation for a view
    pub fn vertical_range(&self, view: ViewKind) -> (f32, f32) {
        let preset = self.get(view);
        (preset.vertical_min, preset.vertical_max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(CameraConfig::default().validate().is_empty());
        assert!(PhotoModeConfig::default().validate().is_empty());
    }

    #[test]
    fn test_reversed_ranges_are_reported() {
        let mut config = CameraConfig::default();
        config.third_person.vertical_min = 40.0;
        config.first_person.fov = 200.0;
        let problems = config.validate();
        assert_eq!(problems.len(), 2);
        assert!(problems[0].contains("Third-person"));
        assert!(problems[1].contains("First-person"));
    }

    #[test]
    fn test_view_table_lookup() {
        let table = ViewTable::from_config(&CameraConfig::default());
        assert_eq!(table.get(ViewKind::FirstPerson).follow_target, "Head");
        assert_eq!(table.vertical_range(ViewKind::ThirdPerson), (-70.0, 30.0));
        assert_eq!(table.fov_range(ViewKind::Original), (10.0, 90.0));
    }
}
