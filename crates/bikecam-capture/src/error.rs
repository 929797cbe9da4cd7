use std::path::PathBuf;

/// Errors that can occur while writing a screenshot.
#[derive(Debug, thiserror::Error)]
pub enum CaptureError {
    #[error("filename template '{0}' does not produce a usable file name")]
    InvalidTemplate(String),

    #[error("unsupported screenshot extension '{0}' (expected png, jpg or jpeg)")]
    UnsupportedExtension(String),

    #[error("frame is {width}x{height} but carries {len} bytes of RGBA data")]
    BadFrame { width: u32, height: u32, len: usize },

    #[error("I/O error writing '{0}': {1}")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("failed to encode '{0}': {1}")]
    Encode(PathBuf, #[source] image::ImageError),
}
