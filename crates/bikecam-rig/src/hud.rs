//! Read-only view of rig state for overlays

use bikecam_capture::ScreenshotResult;

use crate::camera::{FocusAdjustMode, OperatingMode, ViewKind};

/// Everything an overlay needs to draw one frame
#[derive(Debug, Clone, PartialEq)]
pub struct HudSnapshot {
    /// Scene objects resolved and rig initialized
    pub ready: bool,
    pub view: ViewKind,
    pub operating: OperatingMode,
    pub auto_align: bool,
    /// FoV of the current view in degrees
    pub field_of_view: f32,
    /// Focus distance handed to the depth-of-field effect, photo mode only
    pub depth_of_field_distance: Option<f32>,
    /// Focal length override in mm, photo mode only
    pub focal_length: Option<f32>,
    pub focus_adjust_mode: FocusAdjustMode,
    /// Last shutter result, cleared once the camera moves
    pub screenshot: Option<ScreenshotResult>,
    /// Overlay toggled on
    pub overlay_visible: bool,
}

impl HudSnapshot {
    pub fn in_photo_mode(&self) -> bool {
        self.operating == OperatingMode::PhotoCam
    }
}
