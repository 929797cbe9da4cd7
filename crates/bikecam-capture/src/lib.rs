//! bikecam capture - Screenshot naming and encoding
//!
//! Expands filename templates, avoids overwriting existing files and encodes
//! frames as PNG or JPEG. Failures come back as [`ScreenshotResult`] values so the
//! frame loop never sees an error.

mod capturer;
mod error;
pub mod template;
mod writer;

pub use capturer::{CaptureConfig, ScreenshotResult, Screenshotter};
pub use error::CaptureError;
pub use template::{detect_separator, expand_template, TemplateContext};
pub use writer::{unique_path, write_frame, FrameImage, ShotFormat};
