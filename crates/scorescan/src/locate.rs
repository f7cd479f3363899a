//! Staff-line localization.
//!
//! Staff lines are long, near-uniformly dark horizontal strokes, so within a
//! vertical strip of the image their rows are dark in almost every sampled
//! column. Rows whose dark-pixel count comes close to the best row's count are
//! treated as staff-line rows; adjacent rows belonging to one thick line are
//! collapsed, and the survivors are grouped five at a time into staves.

use image::GrayImage;
use serde::{Deserialize, Serialize};

use crate::staff::{Staff, STAFF_LINES};

/// Configuration for staff-line localization.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StaffLocatorConfig {
    /// Pixels darker than this value count as staff ink.
    pub ink_threshold: u8,
    /// The image is split into this many vertical strips; the middle one is sampled.
    pub strip_count: u32,
    /// Rows whose count is within this many hits of the best row are kept.
    pub count_tolerance: usize,
    /// Kept rows closer than this are collapsed into one line.
    pub merge_gap: i32,
}

impl Default for StaffLocatorConfig {
    fn default() -> Self {
        Self {
            ink_threshold: 160,
            strip_count: 7,
            count_tolerance: 10,
            merge_gap: 3,
        }
    }
}

/// Reasons staff localization produced no staves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StaffDetectionFailure {
    /// The sampled strip contains no dark pixels.
    NoCandidateRows,
    /// The number of line rows cannot be split into groups of five.
    RowCountNotMultipleOfFive {
        /// Number of line rows found.
        rows: usize,
    },
}

impl std::fmt::Display for StaffDetectionFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoCandidateRows => write!(f, "no dark rows in the sampled strip"),
            Self::RowCountNotMultipleOfFive { rows } => {
                write!(f, "found {} staff-line rows, not a multiple of 5", rows)
            }
        }
    }
}

impl std::error::Error for StaffDetectionFailure {}

/// Count dark pixels per row over the middle vertical strip.
fn row_hits(gray: &GrayImage, config: &StaffLocatorConfig) -> Vec<usize> {
    let (w, h) = gray.dimensions();
    let strips = config.strip_count.max(1);
    let cut = w / strips;
    let first = cut * (strips / 2);

    let mut hits = vec![0usize; h as usize];
    for x in first..first + cut {
        for (y, count) in hits.iter_mut().enumerate() {
            if gray.get_pixel(x, y as u32)[0] < config.ink_threshold {
                *count += 1;
            }
        }
    }
    hits
}

/// Drop every row that is followed by another kept row less than `gap` below it.
fn collapse_adjacent(rows: &[i32], gap: i32) -> Vec<i32> {
    rows.iter()
        .enumerate()
        .filter(|&(i, &row)| !matches!(rows.get(i + 1), Some(&next) if next - row < gap))
        .map(|(_, &row)| row)
        .collect()
}

/// Find staff-line rows, ascending, one row per physical line.
pub fn staff_line_rows(
    gray: &GrayImage,
    config: &StaffLocatorConfig,
) -> Result<Vec<i32>, StaffDetectionFailure> {
    let hits = row_hits(gray, config);
    let top_count = hits.iter().copied().max().unwrap_or(0);
    if top_count == 0 {
        return Err(StaffDetectionFailure::NoCandidateRows);
    }

    let kept: Vec<i32> = hits
        .iter()
        .enumerate()
        .filter(|&(_, &count)| count > 0 && top_count - count < config.count_tolerance)
        .map(|(y, _)| y as i32)
        .collect();

    Ok(collapse_adjacent(&kept, config.merge_gap))
}

/// Locate every staff in a normalized image, top to bottom.
pub fn locate_staves(
    gray: &GrayImage,
    config: &StaffLocatorConfig,
) -> Result<Vec<Staff>, StaffDetectionFailure> {
    let rows = staff_line_rows(gray, config)?;
    if rows.len() % STAFF_LINES != 0 {
        return Err(StaffDetectionFailure::RowCountNotMultipleOfFive { rows: rows.len() });
    }

    let staves: Vec<Staff> = rows
        .chunks_exact(STAFF_LINES)
        .map(|c| Staff::from_lines([c[0], c[1], c[2], c[3], c[4]]))
        .collect();
    for staff in &staves {
        tracing::debug!("staff lines at rows {:?}", staff.lines());
    }
    Ok(staves)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{blank_page, draw_staff_lines};

    fn page_with_lines(rows: &[i32], thickness: u32) -> GrayImage {
        let mut img = blank_page(140, 200);
        draw_staff_lines(&mut img, rows, thickness);
        img
    }

    #[test]
    fn finds_single_staff() {
        let img = page_with_lines(&[20, 30, 40, 50, 60], 1);
        let staves = locate_staves(&img, &StaffLocatorConfig::default()).unwrap();
        assert_eq!(staves.len(), 1);
        assert_eq!(staves[0].lines(), &[20, 30, 40, 50, 60]);
    }

    #[test]
    fn finds_multiple_staves() {
        let rows: Vec<i32> = (0..15).map(|i| 10 + i * 12).collect();
        let img = page_with_lines(&rows, 1);
        let staves = locate_staves(&img, &StaffLocatorConfig::default()).unwrap();
        assert_eq!(staves.len(), 3);
        assert_eq!(staves[1].lines(), &[70, 82, 94, 106, 118]);

        let img = page_with_lines(&rows[..10], 1);
        let staves = locate_staves(&img, &StaffLocatorConfig::default()).unwrap();
        assert_eq!(staves.len(), 2);
    }

    #[test]
    fn thick_lines_collapse_to_their_last_row() {
        let img = page_with_lines(&[20, 30, 40, 50, 60], 2);
        let rows = staff_line_rows(&img, &StaffLocatorConfig::default()).unwrap();
        assert_eq!(rows, vec![21, 31, 41, 51, 61]);
    }

    #[test]
    fn short_strokes_are_not_staff_lines() {
        let mut img = page_with_lines(&[20, 30, 40, 50, 60], 1);
        // A vertical stroke inside the sampled strip hits each row once.
        crate::test_utils::draw_ink_box(&mut img, 70, 5, 2, 80);
        let rows = staff_line_rows(&img, &StaffLocatorConfig::default()).unwrap();
        assert_eq!(rows, vec![20, 30, 40, 50, 60]);
    }

    #[test]
    fn row_count_must_be_multiple_of_five() {
        let img = page_with_lines(&[20, 30, 40, 50], 1);
        let err = locate_staves(&img, &StaffLocatorConfig::default()).unwrap_err();
        assert_eq!(err, StaffDetectionFailure::RowCountNotMultipleOfFive { rows: 4 });
    }

    #[test]
    fn blank_page_has_no_candidates() {
        let img = blank_page(140, 50);
        let err = locate_staves(&img, &StaffLocatorConfig::default()).unwrap_err();
        assert_eq!(err, StaffDetectionFailure::NoCandidateRows);
    }

    #[test]
    fn collapse_keeps_last_of_each_run() {
        assert_eq!(collapse_adjacent(&[3, 4, 5, 10, 12, 20], 3), vec![5, 12, 20]);
        assert_eq!(collapse_adjacent(&[], 3), Vec::<i32>::new());
    }
}
