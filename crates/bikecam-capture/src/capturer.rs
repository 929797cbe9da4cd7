use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::CaptureError;
use crate::template::{detect_separator, expand_template, TemplateContext};
use crate::writer::{unique_path, write_frame, FrameImage, ShotFormat};

/// Where and how screenshots are written
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptureConfig {
    /// Output folder, created on first capture
    pub folder: PathBuf,
    /// Filename template, see [`crate::template`]
    pub filename_template: String,
    /// JPEG quality (1-100), ignored for PNG
    pub jpeg_quality: u8,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            folder: dirs::picture_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("bikecam"),
            filename_template: "bikecam_{d}_{t}_{cnt3}.png".to_string(),
            jpeg_quality: 92,
        }
    }
}

impl CaptureConfig {
    /// Human-readable problems with this configuration
    pub fn validate(&self) -> Vec<String> {
        let mut problems = Vec::new();
        if self.filename_template.trim().is_empty() {
            problems.push("Screenshot filename template is empty".to_string());
        } else if let Err(e) = ShotFormat::from_path(Path::new(&self.filename_template)) {
            problems.push(format!("Screenshot filename template: {e}"));
        }
        if !(1..=100).contains(&self.jpeg_quality) {
            problems.push(format!(
                "JPEG quality {} is outside 1-100 and will be clamped",
                self.jpeg_quality
            ));
        }
        problems
    }
}

/// Outcome of one shutter press, shown on the HUD
#[derive(Debug, Clone, PartialEq)]
pub struct ScreenshotResult {
    /// Where the file went (or was meant to go)
    pub path: Option<PathBuf>,
    /// Error message when the capture failed
    pub error: Option<String>,
    /// When the shutter was pressed
    pub timestamp: DateTime<Local>,
}

impl ScreenshotResult {
    /// Whether the file was written
    pub fn succeeded(&self) -> bool {
        self.error.is_none() && self.path.is_some()
    }

    /// One-line status for the HUD
    pub fn status_line(&self) -> String {
        let time = self.timestamp.format("%H:%M:%S");
        match (&self.error, &self.path) {
            (Some(error), _) => format!("[{time}] Screenshot failed: {error}"),
            (None, Some(path)) => format!("[{time}] Screenshot saved to {}", path.display()),
            (None, None) => format!("[{time}] Screenshot skipped"),
        }
    }
}

/// Names and writes screenshots, counting captures for the `{cntN}` placeholders.
#[derive(Debug, Clone)]
pub struct Screenshotter {
    config: CaptureConfig,
    counter: u32,
}

impl Screenshotter {
    pub fn new(config: CaptureConfig) -> Self {
        Self { config, counter: 0 }
    }

    pub fn config(&self) -> &CaptureConfig {
        &self.config
    }

    /// Number of successful captures this session
    pub fn count(&self) -> u32 {
        self.counter
    }

    /// Resolve the path the next capture of `frame` would use.
    pub fn next_path(&self, width: u32, height: u32, now: DateTime<Local>) -> Result<PathBuf, CaptureError> {
        let template = &self.config.filename_template;
        let name = expand_template(
            template,
            &TemplateContext {
                width,
                height,
                now,
                counter: self.counter + 1,
            },
        );
        let name = name.trim();
        if name.is_empty() || name.starts_with('.') {
            return Err(CaptureError::InvalidTemplate(template.clone()));
        }

        let path = self.config.folder.join(name);
        ShotFormat::from_path(&path)?;
        Ok(unique_path(&path, detect_separator(template), |p| p.exists()))
    }

    fn try_capture(&mut self, frame: &FrameImage, now: DateTime<Local>) -> (Option<PathBuf>, Result<(), CaptureError>) {
        let path = match self.next_path(frame.width, frame.height, now) {
            Ok(path) => path,
            Err(e) => return (None, Err(e)),
        };
        let written = write_frame(frame, &path, self.config.jpeg_quality);
        (Some(path), written)
    }

    /// Write `frame`, turning every failure into a status value.
    pub fn capture(&mut self, frame: &FrameImage, now: DateTime<Local>) -> ScreenshotResult {
        let (path, written) = self.try_capture(frame, now);
        match written {
            Ok(()) => {
                self.counter += 1;
                if let Some(path) = &path {
                    info!("Screenshot saved to {}", path.display());
                }
                ScreenshotResult {
                    path,
                    error: None,
                    timestamp: now,
                }
            }
            Err(e) => {
                warn!("Screenshot failed: {}", e);
                ScreenshotResult {
                    path,
                    error: Some(e.to_string()),
                    timestamp: now,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tempfile::TempDir;

    fn now() -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 5, 17, 14, 3, 9).unwrap()
    }

    fn shooter(dir: &TempDir, template: &str) -> Screenshotter {
        Screenshotter::new(CaptureConfig {
            folder: dir.path().to_path_buf(),
            filename_template: template.to_string(),
            jpeg_quality: 90,
        })
    }

    #[test]
    fn test_capture_png() {
        let dir = TempDir::new().unwrap();
        let mut shots = shooter(&dir, "shot_{w}x{h}_{cnt2}.png");
        let result = shots.capture(&FrameImage::solid(4, 2, [255, 0, 0, 255]), now());

        assert!(result.succeeded(), "{:?}", result.error);
        let path = result.path.unwrap();
        assert_eq!(path, dir.path().join("shot_4x2_01.png"));
        let decoded = image::open(&path).unwrap();
        assert_eq!(decoded.width(), 4);
        assert_eq!(shots.count(), 1);
    }

    #[test]
    fn test_capture_jpeg() {
        let dir = TempDir::new().unwrap();
        let mut shots = shooter(&dir, "shot_{cnt3}.jpg");
        let result = shots.capture(&FrameImage::solid(8, 8, [10, 20, 30, 255]), now());
        assert!(result.succeeded(), "{:?}", result.error);
        assert!(dir.path().join("shot_001.jpg").exists());
    }

    #[test]
    fn test_collision_never_overwrites() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("shot_01.png"), b"keep me").unwrap();

        let mut shots = shooter(&dir, "shot_{cnt2}.png");
        let result = shots.capture(&FrameImage::solid(2, 2, [0, 0, 0, 255]), now());

        assert_eq!(result.path.unwrap(), dir.path().join("shot_01_001.png"));
        assert_eq!(std::fs::read(dir.path().join("shot_01.png")).unwrap(), b"keep me");
    }

    #[test]
    fn test_collision_with_space_separator() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("shot 01.png"), b"x").unwrap();

        let mut shots = shooter(&dir, "shot {cnt2}.png");
        let result = shots.capture(&FrameImage::solid(2, 2, [0, 0, 0, 255]), now());
        assert_eq!(result.path.unwrap(), dir.path().join("shot 01 001.png"));
    }

    #[test]
    fn test_failure_becomes_result() {
        let dir = TempDir::new().unwrap();
        let mut shots = shooter(&dir, "shot_{cnt2}.bmp");
        let result = shots.capture(&FrameImage::solid(2, 2, [0, 0, 0, 255]), now());

        assert!(!result.succeeded());
        assert!(result.error.unwrap().contains("bmp"));
        assert_eq!(shots.count(), 0);
    }

    #[test]
    fn test_short_frame_buffer_becomes_result() {
        let dir = TempDir::new().unwrap();
        let mut shots = shooter(&dir, "shot.png");
        let frame = FrameImage {
            width: 4,
            height: 4,
            rgba: vec![0; 12],
        };

        let result = shots.capture(&frame, now());
        assert!(!result.succeeded());
        assert!(result.error.unwrap().contains("4x4"));
        assert!(!dir.path().join("shot.png").exists());
        assert_eq!(shots.count(), 0);

        let empty = FrameImage {
            width: 0,
            height: 0,
            rgba: Vec::new(),
        };
        assert!(shots.capture(&empty, now()).error.is_some());
    }

    #[test]
    fn test_unwritable_folder_becomes_result() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("not_a_dir");
        std::fs::write(&blocker, b"file").unwrap();

        let mut shots = Screenshotter::new(CaptureConfig {
            folder: blocker.join("inner"),
            filename_template: "shot.png".to_string(),
            jpeg_quality: 90,
        });
        let result = shots.capture(&FrameImage::solid(2, 2, [0, 0, 0, 255]), now());
        assert!(result.error.is_some());
        assert!(result.status_line().contains("failed"));
    }

    #[test]
    fn test_validate_flags_bad_extension() {
        let config = CaptureConfig {
            filename_template: "shot.gif".to_string(),
            ..CaptureConfig::default()
        };
        assert_eq!(config.validate().len(), 1);
        assert!(CaptureConfig::default().validate().is_empty());
    }
}
