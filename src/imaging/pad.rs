use image::{imageops, RgbImage};

use crate::error::{Result, TransformError};
use crate::imaging::border::{estimate_fill_color, FillColor};
use crate::imaging::handle::ImageHandle;

/// Pixels added on each side to make an image square.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SquarePadding {
    pub top: u32,
    pub bottom: u32,
    pub left: u32,
    pub right: u32,
}

impl SquarePadding {
    pub fn side(&self, width: u32, height: u32) -> u32 {
        debug_assert_eq!(width + self.left + self.right, height + self.top + self.bottom);
        width + self.left + self.right
    }
}

/// Splits `max(w, h) - dim` on each axis into `floor(d/2)` leading and
/// `ceil(d/2)` trailing pixels.
pub fn square_padding(width: u32, height: u32) -> SquarePadding {
    let side = width.max(height);
    let dx = side - width;
    let dy = side - height;
    SquarePadding {
        top: dy / 2,
        bottom: dy - dy / 2,
        left: dx / 2,
        right: dx - dx / 2,
    }
}

/// Largest pixel buffer a padding step will allocate, matching the decoder's
/// default `max_alloc` of 512 MiB.
pub const MAX_CANVAS_BYTES: u64 = 512 * 1024 * 1024;

/// Allocates a `width x height` buffer of `pixel`, failing instead of
/// aborting when it is over `MAX_CANVAS_BYTES` or the allocator refuses.
fn alloc_canvas(width: u32, height: u32, pixel: &[u8]) -> Result<Vec<u8>> {
    let len = (width as u64)
        .checked_mul(height as u64)
        .and_then(|n| n.checked_mul(pixel.len() as u64))
        .filter(|&n| n <= MAX_CANVAS_BYTES)
        .ok_or_else(|| {
            TransformError::Processing(format!(
                "{}x{} canvas exceeds the {} byte limit",
                width, height, MAX_CANVAS_BYTES
            ))
        })? as usize;

    let mut buf = Vec::new();
    buf.try_reserve_exact(len).map_err(|e| {
        TransformError::Processing(format!("cannot allocate {}x{} canvas: {}", width, height, e))
    })?;
    for _ in 0..len / pixel.len().max(1) {
        buf.extend_from_slice(pixel);
    }
    Ok(buf)
}

fn rgb_from_raw(width: u32, height: u32, buf: Vec<u8>) -> Result<RgbImage> {
    RgbImage::from_raw(width, height, buf)
        .ok_or_else(|| TransformError::Processing("RGB canvas size mismatch".into()))
}

/// Composites any alpha over `fill`, producing a fully opaque RGB image.
pub fn flatten_onto(handle: ImageHandle, fill: FillColor) -> Result<RgbImage> {
    if !handle.format().has_alpha() {
        return handle.into_rgb();
    }

    let (width, height) = (handle.width(), handle.height());
    let fill = fill.rgb();
    let mut out = alloc_canvas(width, height, &fill)?;
    let blend = |c: u8, f: u8, a: u8| -> u8 {
        let a = a as u32;
        ((c as u32 * a + f as u32 * (255 - a) + 127) / 255) as u8
    };
    for (dst, src) in out.chunks_exact_mut(3).zip(handle.pixels().chunks_exact(4)) {
        let a = src[3];
        for c in 0..3 {
            dst[c] = blend(src[c], fill[c], a);
        }
    }
    rgb_from_raw(width, height, out)
}

/// Result of padding: the opaque square canvas and the color it was filled with.
#[derive(Debug)]
pub struct Padded {
    pub image: RgbImage,
    pub fill: FillColor,
    pub padding: SquarePadding,
}

/// Estimates the fill color and pads `handle` to a `max(w, h)` square,
/// centering the content unscaled.
///
/// An already-square image keeps its geometry; it is still flattened.
/// Canvases over `MAX_CANVAS_BYTES` are a `Processing` error.
pub fn pad_to_square(handle: ImageHandle) -> Result<Padded> {
    let fill = estimate_fill_color(handle.pixels(), handle.width(), handle.height(), handle.format());
    let padding = square_padding(handle.width(), handle.height());

    if handle.is_square() {
        return Ok(Padded { image: flatten_onto(handle, fill)?, fill, padding });
    }

    let side = padding.side(handle.width(), handle.height());
    let canvas = alloc_canvas(side, side, &fill.rgb())?;
    let mut canvas = rgb_from_raw(side, side, canvas)?;
    let content = flatten_onto(handle, fill)?;
    imageops::replace(&mut canvas, &content, padding.left as i64, padding.top as i64);

    Ok(Padded { image: canvas, fill, padding })
}
