use std::io::Cursor;

use image::{DynamicImage, ImageOutputFormat, RgbImage, RgbaImage};

use crate::error::{Result, TransformError};

/// Interleaved 8-bit pixel layout of an `ImageHandle`.
///
/// Grayscale and 16-bit sources are widened to one of these two on decode so
/// that every downstream step branches on exactly two cases.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelFormat {
    Rgb8,
    Rgba8,
}

impl PixelFormat {
    pub fn channels(self) -> usize {
        match self {
            PixelFormat::Rgb8 => 3,
            PixelFormat::Rgba8 => 4,
        }
    }

    pub fn has_alpha(self) -> bool {
        self == PixelFormat::Rgba8
    }
}

/// A decoded image owned by exactly one transform.
#[derive(Debug, Clone)]
pub struct ImageHandle {
    width: u32,
    height: u32,
    format: PixelFormat,
    pixels: Vec<u8>,
}

impl ImageHandle {
    /// Decodes JPEG / PNG / GIF / WebP bytes.
    pub fn decode(bytes: &[u8]) -> Result<ImageHandle> {
        let img = image::load_from_memory(bytes).map_err(TransformError::Decode)?;
        Ok(ImageHandle::from_dynamic(img))
    }

    pub fn from_dynamic(img: DynamicImage) -> ImageHandle {
        let (width, height) = (img.width(), img.height());
        if img.color().has_alpha() {
            ImageHandle { width, height, format: PixelFormat::Rgba8, pixels: img.to_rgba8().into_raw() }
        } else {
            ImageHandle { width, height, format: PixelFormat::Rgb8, pixels: img.to_rgb8().into_raw() }
        }
    }

    /// Wraps an already interleaved buffer. Fails if the length does not
    /// match `width * height * channels`.
    pub fn from_raw(width: u32, height: u32, format: PixelFormat, pixels: Vec<u8>) -> Result<ImageHandle> {
        let expected = width as usize * height as usize * format.channels();
        if pixels.len() != expected {
            return Err(TransformError::Processing(format!(
                "pixel buffer holds {} bytes, {}x{} {:?} needs {}",
                pixels.len(), width, height, format, expected
            )));
        }
        Ok(ImageHandle { width, height, format, pixels })
    }

    pub fn width(&self) -> u32 { self.width }
    pub fn height(&self) -> u32 { self.height }
    pub fn format(&self) -> PixelFormat { self.format }
    pub fn pixels(&self) -> &[u8] { &self.pixels }

    pub fn is_square(&self) -> bool {
        self.width == self.height
    }

    pub fn into_rgb(self) -> Result<RgbImage> {
        debug_assert_eq!(self.format, PixelFormat::Rgb8);
        RgbImage::from_raw(self.width, self.height, self.pixels)
            .ok_or_else(|| TransformError::Processing("RGB buffer size mismatch".into()))
    }

    pub fn into_rgba(self) -> Result<RgbaImage> {
        debug_assert_eq!(self.format, PixelFormat::Rgba8);
        RgbaImage::from_raw(self.width, self.height, self.pixels)
            .ok_or_else(|| TransformError::Processing("RGBA buffer size mismatch".into()))
    }

    pub fn into_dynamic(self) -> Result<DynamicImage> {
        match self.format {
            PixelFormat::Rgb8 => self.into_rgb().map(DynamicImage::ImageRgb8),
            PixelFormat::Rgba8 => self.into_rgba().map(DynamicImage::ImageRgba8),
        }
    }

    /// Encodes losslessly as PNG.
    pub fn encode_png(self) -> Result<Vec<u8>> {
        let img = self.into_dynamic()?;
        let mut out = Vec::new();
        img.write_to(&mut Cursor::new(&mut out), ImageOutputFormat::Png)
            .map_err(|e| TransformError::Processing(format!("PNG encoding failed: {}", e)))?;
        Ok(out)
    }
}
