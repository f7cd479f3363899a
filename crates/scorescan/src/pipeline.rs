//! Recognition pipeline.
//!
//! Wires the stages together: normalize → locate staves → per staff
//! (scan → detect stems → resolve stems → resolve durations). Staves are
//! processed independently and reported top to bottom.

use image::GrayImage;
use serde::Serialize;

use crate::config::RecognizeConfig;
use crate::grid::RawGrid;
use crate::locate::{locate_staves, StaffDetectionFailure};
use crate::preprocess::normalize;
use crate::resolve::{resolve_durations, resolve_stems};
use crate::scan::scan_staff;
use crate::sequence::{Entry, Note, Sequence};
use crate::staff::Staff;
use crate::stem::{detect_stems, Stem};

/// Everything recognized on one staff.
#[derive(Debug, Clone, Serialize)]
pub struct StaffReading {
    pub staff: Staff,
    pub stems: Vec<Stem>,
    pub sequence: Sequence,
}

/// Full recognition result for one image.
#[derive(Debug, Clone, Serialize)]
pub struct Recognition {
    /// Image dimensions [width, height].
    pub image_size: [u32; 2],
    /// Staves top to bottom.
    pub staves: Vec<StaffReading>,
    /// Why no staves were found, when localization failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub staff_failure: Option<StaffDetectionFailure>,
}

impl Recognition {
    /// All sequence entries, staff after staff.
    pub fn entries(&self) -> impl Iterator<Item = &Entry> {
        self.staves.iter().flat_map(|s| s.sequence.entries())
    }

    pub fn notes(&self) -> impl Iterator<Item = &Note> {
        self.staves.iter().flat_map(|s| s.sequence.notes())
    }

    pub fn note_count(&self) -> usize {
        self.staves.iter().map(|s| s.sequence.note_count()).sum()
    }

    /// True when no note was recognized anywhere.
    pub fn is_empty(&self) -> bool {
        self.note_count() == 0
    }
}

fn read_staff(gray: &GrayImage, staff: Staff, config: &RecognizeConfig) -> StaffReading {
    let mut sequence = scan_staff(gray, &staff, &config.scan);
    let stems = if config.stem.enable {
        detect_stems(gray, &staff, &config.stem)
    } else {
        Vec::new()
    };
    resolve_stems(&mut sequence, &stems);
    resolve_durations(&mut sequence, &config.duration);

    tracing::debug!(
        "staff at row {}: {} notes, {} stems, {} measures",
        staff.lines()[0],
        sequence.note_count(),
        stems.len(),
        sequence.measure_count()
    );
    StaffReading {
        staff,
        stems,
        sequence,
    }
}

/// Run recognition on an already normalized image.
pub fn run_normalized(gray: &GrayImage, config: &RecognizeConfig) -> Recognition {
    let (w, h) = gray.dimensions();

    let (staves, staff_failure) = match locate_staves(gray, &config.staff) {
        Ok(staves) => (staves, None),
        Err(e) => {
            tracing::warn!("Staff detection failed: {}", e);
            (Vec::new(), Some(e))
        }
    };
    tracing::info!("{} staff/s detected", staves.len());

    let staves: Vec<StaffReading> = staves
        .into_iter()
        .map(|staff| read_staff(gray, staff, config))
        .collect();

    let result = Recognition {
        image_size: [w, h],
        staves,
        staff_failure,
    };
    tracing::info!("{} notes recognized", result.note_count());
    result
}

/// Normalize a decoded grid and run recognition on it.
pub fn run(raw: &RawGrid, config: &RecognizeConfig) -> Recognition {
    run_normalized(&normalize(raw), config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sequence::DurationType;
    use crate::test_utils::*;

    fn recognize(img: &GrayImage, config: &RecognizeConfig) -> Recognition {
        run(&RawGrid::from_gray(img).unwrap(), config)
    }

    fn single_note(result: &Recognition) -> &Note {
        assert_eq!(result.staves.len(), 1);
        let seq = &result.staves[0].sequence;
        assert_eq!(seq.slots().count(), 1);
        let slot = seq.slots().next().unwrap();
        assert_eq!(slot.len(), 1);
        &slot.notes()[0]
    }

    #[test]
    fn open_head_without_stem_is_whole() {
        let mut img = staff_page(200);
        draw_open_head(&mut img, 40);
        let result = recognize(&img, &RecognizeConfig::default());

        assert_eq!(result.staves[0].staff.lines(), &STAFF_ROWS);
        assert!(result.staves[0].stems.is_empty());
        let note = single_note(&result);
        assert_eq!(note.pitch, "C");
        assert_eq!(note.column, 31);
        assert!(!note.has_stem);
        assert_eq!(note.duration, DurationType::Whole);
    }

    #[test]
    fn open_head_with_stem_is_half() {
        let mut img = staff_page(200);
        draw_open_head(&mut img, 40);
        draw_stroke(&mut img, 59, 50, 40);
        let result = recognize(&img, &RecognizeConfig::default());

        assert_eq!(result.staves[0].stems.len(), 1);
        assert_eq!(result.staves[0].stems[0].column, 59);
        let note = single_note(&result);
        assert!(note.has_stem);
        assert_eq!(note.duration, DurationType::Half);
        assert_eq!(result.staves[0].sequence.measure_count(), 0);
    }

    #[test]
    fn disabled_stem_detection_keeps_whole() {
        let mut img = staff_page(200);
        draw_open_head(&mut img, 40);
        draw_stroke(&mut img, 59, 50, 40);
        let result = recognize(&img, &RecognizeConfig::without_stems());
        assert!(result.staves[0].stems.is_empty());
        assert_eq!(single_note(&result).duration, DurationType::Whole);
    }

    #[test]
    fn filled_head_is_quarter() {
        let mut img = staff_page(200);
        draw_filled_head(&mut img, 40, 14);
        draw_stroke(&mut img, 52, 50, 40);
        let result = recognize(&img, &RecognizeConfig::default());
        let note = single_note(&result);
        assert!(note.has_stem);
        assert_eq!(note.duration, DurationType::Quarter);
    }

    #[test]
    fn bar_line_after_note_becomes_measure() {
        let mut img = staff_page(200);
        draw_open_head(&mut img, 40);
        draw_stroke(&mut img, 150, 40, 41);
        let result = recognize(&img, &RecognizeConfig::default());

        let entries: Vec<&Entry> = result.entries().collect();
        assert_eq!(entries.len(), 2);
        assert!(entries[0].as_slot().is_some());
        assert!(entries[1].is_measure());
        assert_eq!(single_note(&result).duration, DurationType::Whole);
    }

    #[test]
    fn staff_failure_is_reported_not_fatal() {
        let mut img = blank_page(200, PAGE_HEIGHT);
        draw_staff_lines(&mut img, &STAFF_ROWS[..4], 1);
        let result = recognize(&img, &RecognizeConfig::default());
        assert!(result.staves.is_empty());
        assert!(result.is_empty());
        assert_eq!(
            result.staff_failure,
            Some(StaffDetectionFailure::RowCountNotMultipleOfFive { rows: 4 })
        );
    }

    #[test]
    fn empty_staff_yields_no_notes() {
        let result = recognize(&staff_page(200), &RecognizeConfig::default());
        assert_eq!(result.staves.len(), 1);
        assert!(result.staff_failure.is_none());
        assert!(result.is_empty());
        assert_eq!(result.image_size, [200, PAGE_HEIGHT]);
    }

    #[test]
    fn staves_are_read_independently_top_to_bottom() {
        // Second staff is the standard one shifted down by 130 rows.
        let lower_rows = STAFF_ROWS.map(|r| r + 130);
        let mut img = blank_page(200, 2 * PAGE_HEIGHT);
        draw_staff_lines(&mut img, &STAFF_ROWS, 1);
        draw_staff_lines(&mut img, &lower_rows, 1);
        draw_open_head(&mut img, 40);
        draw_stroke(&mut img, 59, 50, 40);
        draw_hollow_head(&mut img, 40, LEDGER_HEAD_TOP + 130, 21, 10, 2);

        let result = recognize(&img, &RecognizeConfig::default());
        assert_eq!(result.staves.len(), 2);
        assert_eq!(result.staves[0].staff.lines(), &STAFF_ROWS);
        assert_eq!(result.staves[1].staff.lines(), &lower_rows);
        assert_eq!(result.staves[0].stems.len(), 1);
        assert!(result.staves[1].stems.is_empty());

        let notes: Vec<&Note> = result.notes().collect();
        assert_eq!(notes.len(), 2);
        assert_eq!((notes[0].pitch.as_str(), notes[0].column), ("C", 31));
        assert_eq!((notes[1].pitch.as_str(), notes[1].column), ("C", 31));
        assert!(notes[0].has_stem);
        assert!(!notes[1].has_stem);
        assert_eq!(notes[0].duration, DurationType::Half);
        assert_eq!(notes[1].duration, DurationType::Whole);

        assert_eq!(
            crate::report::render_text(&result),
            "[Note: C, Type: half, Pos: 31]\n[Note: C, Type: whole, Pos: 31]\n"
        );
    }

    #[test]
    fn raw_grid_is_normalized_before_detection() {
        // Dark gray ink on light gray paper, 12-bit range.
        let mut img = staff_page(200);
        draw_open_head(&mut img, 40);
        let data: Vec<u16> = img
            .pixels()
            .map(|p| if p[0] == INK { 1200 } else { 3000 })
            .collect();
        let raw = RawGrid::new(200, PAGE_HEIGHT, 4095, data).unwrap();
        let result = run(&raw, &RecognizeConfig::default());
        assert_eq!(single_note(&result).pitch, "C");
    }
}
