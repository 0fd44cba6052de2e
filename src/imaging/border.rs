use serde::{Deserialize, Serialize};

use crate::imaging::handle::PixelFormat;

/// Width in pixels of the edge strips sampled by `estimate_fill_color`.
///
/// Tunable; 1 px has no documented rationale beyond being cheap.
pub const BORDER_WIDTH: u32 = 1;

/// Average border luminance at or above which the fill is white.
///
/// Tunable; kept at the historical 128.
pub const LUMINANCE_THRESHOLD: u32 = 128;

// Rec. 601 luma weights, in thousandths so the threshold comparison is exact.
const WEIGHT_R: u64 = 299;
const WEIGHT_G: u64 = 587;
const WEIGHT_B: u64 = 114;
const WEIGHT_SCALE: u64 = 1000;

/// Solid color used for padding and for flattening transparency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FillColor {
    Black,
    #[default]
    White,
}

impl FillColor {
    pub fn rgb(self) -> [u8; 3] {
        match self {
            FillColor::Black => [0, 0, 0],
            FillColor::White => [255, 255, 255],
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            FillColor::Black => "black",
            FillColor::White => "white",
        }
    }
}

/// Picks black or white from the average luminance of the image border.
///
/// The top, bottom, left and right strips are concatenated (corners are
/// therefore sampled twice) and every sampled pixel contributes
/// `0.299 R + 0.587 G + 0.114 B`; alpha is ignored. An average below
/// `LUMINANCE_THRESHOLD` gives black, anything else (ties included) white.
/// Images one pixel wide or tall, and empty samples, give white.
pub fn estimate_fill_color(pixels: &[u8], width: u32, height: u32, format: PixelFormat) -> FillColor {
    if width <= 1 || height <= 1 {
        return FillColor::default();
    }

    let channels = format.channels();
    let (w, h) = (width as usize, height as usize);
    let b = BORDER_WIDTH as usize;
    let rows = b.min(h);
    let cols = b.min(w);

    let mut total: u64 = 0;
    let mut samples: u64 = 0;
    let mut sample = |x: usize, y: usize| {
        let i = (y * w + x) * channels;
        if let Some(px) = pixels.get(i..i + 3) {
            total += WEIGHT_R * px[0] as u64 + WEIGHT_G * px[1] as u64 + WEIGHT_B * px[2] as u64;
            samples += 1;
        }
    };

    for y in (0..rows).chain(h - rows..h) {
        for x in 0..w {
            sample(x, y);
        }
    }
    for x in (0..cols).chain(w - cols..w) {
        for y in 0..h {
            sample(x, y);
        }
    }

    if samples == 0 {
        return FillColor::default();
    }

    if total < LUMINANCE_THRESHOLD as u64 * WEIGHT_SCALE * samples {
        FillColor::Black
    } else {
        FillColor::White
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solid(width: u32, height: u32, rgb: [u8; 3]) -> Vec<u8> {
        rgb.iter().copied().cycle().take(width as usize * height as usize * 3).collect()
    }

    #[test]
    fn white_border_gives_white() {
        let px = solid(8, 6, [255, 255, 255]);
        assert_eq!(estimate_fill_color(&px, 8, 6, PixelFormat::Rgb8), FillColor::White);
    }

    #[test]
    fn black_border_gives_black() {
        let px = solid(8, 6, [0, 0, 0]);
        assert_eq!(estimate_fill_color(&px, 8, 6, PixelFormat::Rgb8), FillColor::Black);
    }

    #[test]
    fn exactly_threshold_is_white() {
        let px = solid(4, 4, [128, 128, 128]);
        assert_eq!(estimate_fill_color(&px, 4, 4, PixelFormat::Rgb8), FillColor::White);
        let px = solid(4, 4, [127, 127, 127]);
        assert_eq!(estimate_fill_color(&px, 4, 4, PixelFormat::Rgb8), FillColor::Black);
    }

    #[test]
    fn interior_is_ignored() {
        // 5x5 white frame around a black 3x3 centre.
        let mut px = solid(5, 5, [255, 255, 255]);
        for y in 1..4 {
            for x in 1..4 {
                let i = (y * 5 + x) * 3;
                px[i..i + 3].copy_from_slice(&[0, 0, 0]);
            }
        }
        assert_eq!(estimate_fill_color(&px, 5, 5, PixelFormat::Rgb8), FillColor::White);
    }

    #[test]
    fn green_weighs_more_than_blue() {
        // 0.587 * 255 ~ 150 -> white, 0.114 * 255 ~ 29 -> black
        let green = solid(3, 3, [0, 255, 0]);
        let blue = solid(3, 3, [0, 0, 255]);
        assert_eq!(estimate_fill_color(&green, 3, 3, PixelFormat::Rgb8), FillColor::White);
        assert_eq!(estimate_fill_color(&blue, 3, 3, PixelFormat::Rgb8), FillColor::Black);
    }

    #[test]
    fn alpha_channel_is_skipped() {
        let px: Vec<u8> = [10, 10, 10, 255].iter().copied().cycle().take(4 * 4 * 4).collect();
        assert_eq!(estimate_fill_color(&px, 4, 4, PixelFormat::Rgba8), FillColor::Black);
    }

    #[test]
    fn degenerate_sizes_default_to_white() {
        let px = solid(1, 9, [0, 0, 0]);
        assert_eq!(estimate_fill_color(&px, 1, 9, PixelFormat::Rgb8), FillColor::White);
        let px = solid(9, 1, [0, 0, 0]);
        assert_eq!(estimate_fill_color(&px, 9, 1, PixelFormat::Rgb8), FillColor::White);
    }

    #[test]
    fn empty_buffer_defaults_to_white() {
        assert_eq!(estimate_fill_color(&[], 10, 10, PixelFormat::Rgb8), FillColor::White);
    }

    #[test]
    fn serializes_lowercase() {
        assert_eq!(serde_json::to_string(&FillColor::Black).unwrap(), "\"black\"");
    }
}
