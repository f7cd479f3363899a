//! Staff geometry and the pitch ladder.
//!
//! A detected staff is five horizontal line rows. Note heads sit either on a
//! line or in the gap between two lines, and the same holds for ledger
//! positions above and below the staff, so the scannable pitch positions are
//! spaced half a line-spacing apart. The ladder lists those positions from
//! top to bottom.

use serde::Serialize;

/// Number of line rows in one staff.
pub const STAFF_LINES: usize = 5;
/// Ledger positions added on each side of the staff.
pub const LEDGER_STEPS: i32 = 5;
/// Total ladder length: 5 above, 5 below, 4 interline rows, 5 lines.
pub const LADDER_LEN: usize = 19;

/// One staff instance with its pitch ladder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Staff {
    lines: [i32; STAFF_LINES],
    ladder: Vec<i32>,
    line_spacing: i32,
    min_stem_length: i32,
    measure_length: i32,
}

impl Staff {
    /// Build the ladder from five ascending line rows.
    pub fn from_lines(lines: [i32; STAFF_LINES]) -> Self {
        let dist = (lines[1] - lines[0]) / 2;

        let mut ladder = Vec::with_capacity(LADDER_LEN);
        for i in 1..=LEDGER_STEPS {
            ladder.push(lines[0] - dist * i);
            ladder.push(lines[STAFF_LINES - 1] + dist * i);
        }
        ladder.extend(lines[..STAFF_LINES - 1].iter().map(|&row| row + dist));
        ladder.extend_from_slice(&lines);
        ladder.sort_unstable();

        Self {
            lines,
            ladder,
            line_spacing: dist,
            min_stem_length: dist * 6,
            measure_length: dist * 8,
        }
    }

    /// Detected line rows, top to bottom.
    pub fn lines(&self) -> &[i32; STAFF_LINES] {
        &self.lines
    }

    /// Scannable pitch rows, ascending.
    pub fn ladder(&self) -> &[i32] {
        &self.ladder
    }

    /// Row step between adjacent ladder positions (half the line spacing).
    pub fn line_spacing(&self) -> i32 {
        self.line_spacing
    }

    /// Shortest vertical ink run accepted as a stem.
    pub fn min_stem_length(&self) -> i32 {
        self.min_stem_length
    }

    /// Nominal horizontal extent of a measure; reported, never enforced.
    pub fn measure_length(&self) -> i32 {
        self.measure_length
    }

    /// Width of the note-scanning window: first to fourth line.
    pub fn window_width(&self) -> i32 {
        self.lines[3] - self.lines[0]
    }

    /// Topmost and bottommost ladder rows.
    pub fn ladder_bounds(&self) -> (i32, i32) {
        match (self.ladder.first(), self.ladder.last()) {
            (Some(&top), Some(&bottom)) => (top, bottom),
            _ => (self.lines[0], self.lines[STAFF_LINES - 1]),
        }
    }
}
