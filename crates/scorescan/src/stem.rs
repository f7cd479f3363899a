//! Vertical stroke (stem) detection within a staff band.

use image::GrayImage;
use serde::{Deserialize, Serialize};

use crate::staff::Staff;

/// Configuration for stem detection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StemConfig {
    /// Run stem detection at all. Disabled, every note resolves without a stem.
    pub enable: bool,
    /// Pixels darker than this value count as ink.
    pub ink_threshold: u8,
    /// A stroke is a new stem only when more than this many columns past the previous one.
    pub min_separation: i32,
}

impl Default for StemConfig {
    fn default() -> Self {
        Self {
            enable: true,
            ink_threshold: 160,
            min_separation: 10,
        }
    }
}

/// A vertical stroke: its column and the rows `top..bottom` it covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Stem {
    pub column: i32,
    pub top: i32,
    pub bottom: i32,
}

impl Stem {
    pub fn length(&self) -> i32 {
        self.bottom - self.top
    }
}

/// Longest run of ink in column `x` between rows `top..bottom`; first wins on ties.
fn longest_ink_run(
    gray: &GrayImage,
    x: u32,
    top: i32,
    bottom: i32,
    threshold: u8,
) -> Option<(i32, i32)> {
    let mut best: Option<(i32, i32)> = None;
    let mut keep = |start: i32, end: i32| {
        if best.map_or(true, |(s, e)| end - start > e - s) {
            best = Some((start, end));
        }
    };

    let mut run_start = None;
    for y in top..bottom {
        let ink = gray.get_pixel(x, y as u32)[0] < threshold;
        match (ink, run_start) {
            (true, None) => run_start = Some(y),
            (false, Some(start)) => {
                keep(start, y);
                run_start = None;
            }
            _ => {}
        }
    }
    if let Some(start) = run_start {
        keep(start, bottom);
    }
    best
}

/// Detect stems in the rows spanned by the staff ladder, left to right.
///
/// A column qualifies when its longest ink run reaches the staff's minimum
/// stem length. Thick strokes qualify on several adjacent columns; only the
/// first column of each stroke is registered.
pub fn detect_stems(gray: &GrayImage, staff: &Staff, config: &StemConfig) -> Vec<Stem> {
    let (w, h) = gray.dimensions();
    let (first, last) = staff.ladder_bounds();
    let top = first.max(0);
    let bottom = last.min(h as i32);
    if bottom <= top {
        return Vec::new();
    }
    let min_length = staff.min_stem_length().max(1);

    let mut stems: Vec<Stem> = Vec::new();
    for x in 0..w {
        let Some((start, end)) = longest_ink_run(gray, x, top, bottom, config.ink_threshold) else {
            continue;
        };
        if end - start < min_length {
            continue;
        }
        let column = x as i32;
        if stems
            .last()
            .is_some_and(|prev| column - prev.column <= config.min_separation)
        {
            continue;
        }
        tracing::trace!("stem at column {} rows {}..{}", column, start, end);
        stems.push(Stem {
            column,
            top: start,
            bottom: end,
        });
    }
    stems
}
