//! Intensity normalization.

use image::{GrayImage, Luma};

use crate::grid::RawGrid;

/// Contrast-stretch a decoded grid to the full `0..=255` range.
///
/// Each pixel maps to `floor(255 * (v - lo) / (hi - lo))` using exact integer
/// arithmetic. A uniform grid has no contrast to stretch; it is filled with
/// its value rescaled against the declared maximum intensity instead.
pub fn normalize(raw: &RawGrid) -> GrayImage {
    let src = raw.pixels();
    let (w, h) = src.dimensions();
    let (lo, hi) = src
        .pixels()
        .fold((u16::MAX, u16::MIN), |(lo, hi), p| (lo.min(p[0]), hi.max(p[0])));

    if lo == hi {
        let v = 255 * u32::from(hi) / u32::from(raw.max_value());
        return GrayImage::from_pixel(w, h, Luma([v as u8]));
    }

    let span = u32::from(hi - lo);
    GrayImage::from_fn(w, h, |x, y| {
        let v = u32::from(src.get_pixel(x, y)[0] - lo);
        Luma([(255 * v / span) as u8])
    })
}
