//! Text overlay
//!
//! Pulled by the host once per frame; builds plain lines from a
//! [`HudSnapshot`] and leaves drawing to the host.

use bikecam_rig::{FocusAdjustMode, HudSnapshot};

/// Lines to draw this frame. `validation` holds settings problems, shown until fixed.
pub fn render_frame(hud: &HudSnapshot, validation: &[String]) -> Vec<String> {
    let mut lines = Vec::new();

    for problem in validation {
        lines.push(format!("Config: {problem}"));
    }

    if !hud.ready {
        lines.push("bikecam: waiting for scene".to_string());
        return lines;
    }
    if !hud.overlay_visible {
        return lines;
    }

    if hud.in_photo_mode() {
        lines.push(format!(
            "Photo mode | FoV {:.1} | Keys adjust: {}",
            hud.field_of_view,
            hud.focus_adjust_mode.name()
        ));
        let mut lens = Vec::new();
        if let Some(focal_length) = hud.focal_length {
            lens.push(format!("Focal length {focal_length:.0} mm"));
        }
        if let Some(distance) = hud.depth_of_field_distance {
            let marker = if hud.focus_adjust_mode == FocusAdjustMode::DepthOfField {
                "*"
            } else {
                ""
            };
            lens.push(format!("Focus {distance:.2} m{marker}"));
        }
        if !lens.is_empty() {
            lines.push(lens.join(" | "));
        }
        if let Some(screenshot) = &hud.screenshot {
            lines.push(screenshot.status_line());
        }
    } else {
        lines.push(format!(
            "{} | Auto-align {} | FoV {:.1}",
            hud.view.name(),
            if hud.auto_align { "on" } else { "off" },
            hud.field_of_view
        ));
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use bikecam_capture::ScreenshotResult;
    use bikecam_rig::{OperatingMode, ViewKind};
    use chrono::Local;
    use std::path::PathBuf;

    fn snapshot() -> HudSnapshot {
        HudSnapshot {
            ready: true,
            view: ViewKind::ThirdPerson,
            operating: OperatingMode::BikeCam,
            auto_align: true,
            field_of_view: 60.0,
            depth_of_field_distance: None,
            focal_length: None,
            focus_adjust_mode: FocusAdjustMode::FieldOfView,
            screenshot: None,
            overlay_visible: true,
        }
    }

    #[test]
    fn test_bike_line() {
        let lines = render_frame(&snapshot(), &[]);
        assert_eq!(lines, vec!["Third person | Auto-align on | FoV 60.0".to_string()]);
    }

    #[test]
    fn test_waiting_and_validation() {
        let mut hud = snapshot();
        hud.ready = false;
        let lines = render_frame(&hud, &["Zoom step must be positive".to_string()]);
        assert_eq!(lines[0], "Config: Zoom step must be positive");
        assert_eq!(lines[1], "bikecam: waiting for scene");
    }

    #[test]
    fn test_photo_lines() {
        let mut hud = snapshot();
        hud.operating = OperatingMode::PhotoCam;
        hud.focal_length = Some(50.0);
        hud.depth_of_field_distance = Some(3.5);
        hud.focus_adjust_mode = FocusAdjustMode::DepthOfField;
        hud.screenshot = Some(ScreenshotResult {
            path: Some(PathBuf::from("shot.png")),
            error: None,
            timestamp: Local::now(),
        });

        let lines = render_frame(&hud, &[]);
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("Photo mode"));
        assert_eq!(lines[1], "Focal length 50 mm | Focus 3.50 m*");
        assert!(lines[2].contains("shot.png"));
    }

    #[test]
    fn test_hidden_overlay() {
        let mut hud = snapshot();
        hud.overlay_visible = false;
        assert!(render_frame(&hud, &[]).is_empty());
    }
}
