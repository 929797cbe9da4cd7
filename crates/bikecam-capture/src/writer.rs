use std::fs;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use image::codecs::jpeg::JpegEncoder;
use image::{ExtendedColorType, ImageFormat, RgbaImage};

use crate::error::CaptureError;

/// Encoded output format, chosen from the file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShotFormat {
    Png,
    Jpeg,
}

impl ShotFormat {
    /// Pick the format for a path's extension (case-insensitive).
    pub fn from_path(path: &Path) -> Result<Self, CaptureError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();
        match ext.as_str() {
            "png" => Ok(Self::Png),
            "jpg" | "jpeg" => Ok(Self::Jpeg),
            _ => Err(CaptureError::UnsupportedExtension(ext)),
        }
    }
}

/// A rendered frame handed over by the host, tightly packed RGBA8.
#[derive(Debug, Clone)]
pub struct FrameImage {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

impl FrameImage {
    /// Wrap raw pixels, checking the buffer length.
    pub fn new(width: u32, height: u32, rgba: Vec<u8>) -> Result<Self, CaptureError> {
        let expected = width as usize * height as usize * 4;
        if rgba.len() != expected || expected == 0 {
            return Err(CaptureError::BadFrame {
                width,
                height,
                len: rgba.len(),
            });
        }
        Ok(Self { width, height, rgba })
    }

    /// A frame filled with one colour
    pub fn solid(width: u32, height: u32, rgba: [u8; 4]) -> Self {
        let pixels = (width as usize) * (height as usize);
        Self {
            width,
            height,
            rgba: rgba.repeat(pixels),
        }
    }
}

/// First free path for `path`, appending `{sep}001`, `{sep}002`, ... before the extension.
pub fn unique_path(path: &Path, separator: char, exists: impl Fn(&Path) -> bool) -> PathBuf {
    if !exists(path) {
        return path.to_path_buf();
    }

    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let ext = path.extension().map(|e| e.to_string_lossy().into_owned());

    let mut n: u32 = 1;
    loop {
        let name = match &ext {
            Some(ext) => format!("{stem}{separator}{n:03}.{ext}"),
            None => format!("{stem}{separator}{n:03}"),
        };
        let candidate = path.with_file_name(name);
        if !exists(&candidate) {
            return candidate;
        }
        n += 1;
    }
}

/// Encode `frame` into `path`, creating the parent directory when missing.
pub fn write_frame(frame: &FrameImage, path: &Path, jpeg_quality: u8) -> Result<(), CaptureError> {
    let format = ShotFormat::from_path(path)?;

    // encoders panic on a short buffer, so reject it here
    let expected = frame.width as usize * frame.height as usize * 4;
    if expected == 0 || frame.rgba.len() != expected {
        return Err(CaptureError::BadFrame {
            width: frame.width,
            height: frame.height,
            len: frame.rgba.len(),
        });
    }

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|e| CaptureError::Io(parent.to_path_buf(), e))?;
        }
    }

    match format {
        ShotFormat::Png => image::save_buffer_with_format(
            path,
            &frame.rgba,
            frame.width,
            frame.height,
            ExtendedColorType::Rgba8,
            ImageFormat::Png,
        )
        .map_err(|e| CaptureError::Encode(path.to_path_buf(), e)),
        ShotFormat::Jpeg => {
            let rgba = RgbaImage::from_raw(frame.width, frame.height, frame.rgba.clone()).ok_or(
                CaptureError::BadFrame {
                    width: frame.width,
                    height: frame.height,
                    len: frame.rgba.len(),
                },
            )?;
            let rgb = image::DynamicImage::ImageRgba8(rgba).to_rgb8();

            let file = fs::File::create(path).map_err(|e| CaptureError::Io(path.to_path_buf(), e))?;
            let mut writer = BufWriter::new(file);
            JpegEncoder::new_with_quality(&mut writer, jpeg_quality.clamp(1, 100))
                .encode(rgb.as_raw(), frame.width, frame.height, ExtendedColorType::Rgb8)
                .map_err(|e| CaptureError::Encode(path.to_path_buf(), e))
        }
    }
}
