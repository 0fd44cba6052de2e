use image::imageops::{self, FilterType};

use crate::error::{PreconditionError, Result};
use crate::imaging::handle::{ImageHandle, PixelFormat};

/// Same resampling filter the studio uses for every resize.
pub const DOWNSCALE_FILTER: FilterType = FilterType::Lanczos3;

/// Checks that a `width x height` image may be shrunk to `target`.
///
/// Never upscales: the image must be square and strictly larger than `target`.
pub fn check_downscale(width: u32, height: u32, target: u32) -> std::result::Result<(), PreconditionError> {
    if target == 0 {
        return Err(PreconditionError::ZeroTarget);
    }
    if width != height {
        return Err(PreconditionError::NotSquare { width, height });
    }
    if width <= target {
        return Err(PreconditionError::AtOrBelowTarget { size: width, target });
    }
    Ok(())
}

/// Resizes a square image to exactly `target x target`, keeping its pixel format.
pub fn downscale_to_target(handle: ImageHandle, target: u32) -> Result<ImageHandle> {
    check_downscale(handle.width(), handle.height(), target)?;

    match handle.format() {
        PixelFormat::Rgb8 => {
            let resized = imageops::resize(&handle.into_rgb()?, target, target, DOWNSCALE_FILTER);
            ImageHandle::from_raw(target, target, PixelFormat::Rgb8, resized.into_raw())
        }
        PixelFormat::Rgba8 => {
            let resized = imageops::resize(&handle.into_rgba()?, target, target, DOWNSCALE_FILTER);
            ImageHandle::from_raw(target, target, PixelFormat::Rgba8, resized.into_raw())
        }
    }
}
