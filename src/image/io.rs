//! I/O helpers for grayscale images and JSON.
//!
//! - `load_grayscale_image`: read a PNG/TIFF/etc. into a 16-bit `Image<u16>`.
//! - `save_plane_png`: write a working plane to a 16-bit grayscale PNG.
//! - `write_json_file`: pretty-print a serializable value to disk.
//!
//! These exist for the demo binary; the transform engine never touches disk.
use super::{Image, ImageView, Plane, WorkingFloat};
use crate::error::{Result, TransformError};
use image::{ImageBuffer, Luma};
use serde::Serialize;
use std::fs;
use std::path::Path;

/// Value mapping applied when writing a plane to an integer PNG.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PngRange {
    /// Values are clamped to `[0, 1]` (smoothed images, reconstructions).
    Clamp,
    /// The plane's own min..max is stretched to the full range (detail layers).
    Stretch,
}

/// Load an image from disk and convert to 16-bit grayscale.
pub fn load_grayscale_image(path: &Path) -> Result<Image<u16>> {
    let img = image::open(path)
        .map_err(|source| TransformError::ImageCodec {
            path: path.to_path_buf(),
            source,
        })?
        .into_luma16();
    let width = img.width() as usize;
    let height = img.height() as usize;
    Image::from_vec(width, height, img.into_raw())
}

/// Save a plane to a 16-bit grayscale PNG.
pub fn save_plane_png<F: WorkingFloat>(plane: &Plane<F>, path: &Path, range: PngRange) -> Result<()> {
    ensure_parent_dir(path)?;
    let (offset, scale) = match range {
        PngRange::Clamp => (0.0, 1.0),
        PngRange::Stretch => {
            let (lo, hi) = plane
                .data
                .iter()
                .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
                    (lo.min(v.widen()), hi.max(v.widen()))
                });
            let span = hi - lo;
            if span > 0.0 && span.is_finite() {
                (lo, 1.0 / span)
            } else {
                (0.0, 1.0)
            }
        }
    };
    let mut out: ImageBuffer<Luma<u16>, Vec<u16>> =
        ImageBuffer::new(plane.w as u32, plane.h as u32);
    for y in 0..plane.h {
        for (x, &px) in plane.row(y).iter().enumerate() {
            let v = ((px.widen() - offset) * scale).clamp(0.0, 1.0);
            out.put_pixel(x as u32, y as u32, Luma([(v * 65535.0).round() as u16]));
        }
    }
    out.save(path).map_err(|source| TransformError::ImageCodec {
        path: path.to_path_buf(),
        source,
    })
}

/// Serialize a value as pretty JSON to `path`, creating parent directories.
pub fn write_json_file<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    ensure_parent_dir(path)?;
    let json = serde_json::to_string_pretty(value).map_err(|source| TransformError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    fs::write(path, json).map_err(|source| TransformError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|source| TransformError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
    }
    Ok(())
}
