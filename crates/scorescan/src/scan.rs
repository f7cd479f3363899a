//! Sliding-window note-head detection.
//!
//! A window `W` columns wide (first to fourth staff line) slides across the
//! page one column at a time. At every interior ladder row the window is split
//! into the box just above the row and the box just below it; a note head
//! centred on that row darkens both. When both boxes pass the fill threshold a
//! note is recorded for the window's start column.

use image::GrayImage;
use serde::{Deserialize, Serialize};

use crate::pitch::pitch_label;
use crate::sequence::{Note, Sequence, Slot};
use crate::staff::Staff;

/// Configuration for note scanning.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Pixels darker than this value count as ink.
    pub ink_cutoff: u8,
    /// Minimum fill percentage required in both boxes.
    pub pass_score: f64,
    /// Slots starting closer than `window_width * factor` columns are merged.
    pub slot_distance_factor: f64,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            ink_cutoff: 80,
            pass_score: 35.0,
            slot_distance_factor: 1.4,
        }
    }
}

/// Summed-area table over ink pixels.
struct InkTable {
    stride: usize,
    sums: Vec<u32>,
}

impl InkTable {
    fn new(gray: &GrayImage, cutoff: u8) -> Self {
        let (w, h) = gray.dimensions();
        let stride = w as usize + 1;
        let mut sums = vec![0u32; stride * (h as usize + 1)];
        for (y, row) in gray.rows().enumerate() {
            let mut row_ink = 0u32;
            for (x, p) in row.enumerate() {
                if p[0] < cutoff {
                    row_ink += 1;
                }
                sums[(y + 1) * stride + x + 1] = sums[y * stride + x + 1] + row_ink;
            }
        }
        Self { stride, sums }
    }

    /// Ink pixels in columns `x0..x1` and rows `y0..y1`.
    fn count(&self, x0: usize, x1: usize, y0: usize, y1: usize) -> u32 {
        let at = |x: usize, y: usize| self.sums[y * self.stride + x];
        at(x1, y1) + at(x0, y0) - at(x0, y1) - at(x1, y0)
    }
}

/// Interior ladder indices whose boxes lie inside the image and have height.
///
/// Indices are never renumbered: a skipped ledger position keeps the labels
/// of the remaining positions tied to the staff geometry. Near the top of
/// the page this labels ledger notes differently from scanners that drop
/// the off-page rows and shift the rest up.
fn scannable_keys(ladder: &[i32], rows: i32) -> Vec<usize> {
    (1..ladder.len().saturating_sub(1))
        .filter(|&k| {
            let (top, mid, bottom) = (ladder[k - 1], ladder[k], ladder[k + 1]);
            top >= 0 && bottom <= rows && top < mid && mid < bottom
        })
        .collect()
}

/// Fill score of the window at `col` around the ladder row `rows[1]`.
///
/// Both percentages are taken against the upper box area, and the lower
/// percentage is divided by that area again before weighting. Returns `None`
/// unless both boxes reach `pass_score`.
fn score_window(
    ink: &InkTable,
    col: i32,
    width: i32,
    rows: [i32; 3],
    pass_score: f64,
) -> Option<f64> {
    let [top, mid, bottom] = rows;
    let (x0, x1) = (col as usize, (col + width) as usize);
    let total = f64::from(width * (mid - top));

    let upper = f64::from(ink.count(x0, x1, top as usize, mid as usize)) / total * 100.0;
    let lower = f64::from(ink.count(x0, x1, mid as usize, bottom as usize)) / total * 100.0;

    (upper >= pass_score && lower >= pass_score).then(|| upper + lower / total * 200.0)
}

/// Scan one staff and aggregate detections into a sequence of slots.
pub fn scan_staff(gray: &GrayImage, staff: &Staff, config: &ScanConfig) -> Sequence {
    let (w, h) = gray.dimensions();
    let width = staff.window_width();
    let mut sequence = Sequence::for_window(width, config.slot_distance_factor);
    if width <= 0 {
        return sequence;
    }

    let ladder = staff.ladder();
    let keys = scannable_keys(ladder, h as i32);
    if keys.is_empty() {
        return sequence;
    }
    let ink = InkTable::new(gray, config.ink_cutoff);

    for col in 0..w as i32 - width {
        let mut slot = Slot::new(col, width);
        for &key in &keys {
            let rows = [ladder[key - 1], ladder[key], ladder[key + 1]];
            if let Some(fill) = score_window(&ink, col, width, rows, config.pass_score) {
                slot.push(Note::new(pitch_label(key), key, fill, col));
            }
        }
        if !slot.is_empty() {
            sequence.add(slot);
        }
    }

    tracing::debug!(
        "staff at row {}: {} slots, {} notes",
        staff.lines()[0],
        sequence.len(),
        sequence.note_count()
    );
    sequence
}
