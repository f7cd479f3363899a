//! scorescan: optical music recognition for single-voice staff notation.
//!
//! Reads plain-text grayscale rasters and recovers the notes on every
//! five-line staff. The pipeline stages are:
//!
//! 1. **Decode** – `P2` raster parsing into a [`RawGrid`].
//! 2. **Preprocess** – contrast stretch to the full 8-bit range.
//! 3. **Locate** – staff-line rows from a vertical strip of row ink counts,
//!    grouped into [`Staff`] records with their pitch ladder.
//! 4. **Scan** – sliding-window fill scoring on every ladder position;
//!    passing windows become notes, merged into column slots.
//! 5. **Stems** – longest vertical ink run per column inside the staff band.
//! 6. **Resolve** – stems aligned with slots by column: a stem inside a slot
//!    belongs to its notes, a stem between slots is a bar line.
//! 7. **Report** – duration classes and the text rendering.
//!
//! # Public API
//! - [`Recognizer`] as the primary entry point
//! - [`RecognizeConfig`] and the per-stage configs for tuning
//! - the stage functions for callers that drive the pipeline themselves

mod config;
mod grid;
mod locate;
pub mod pgm;
mod pipeline;
mod pitch;
mod preprocess;
mod recognizer;
mod report;
mod resolve;
mod scan;
mod sequence;
mod staff;
mod stem;

#[cfg(test)]
mod test_utils;

pub use config::RecognizeConfig;
pub use grid::{Gray16Image, GridError, RawGrid};
pub use locate::{locate_staves, staff_line_rows, StaffDetectionFailure, StaffLocatorConfig};
pub use pgm::PgmError;
pub use pipeline::{Recognition, StaffReading};
pub use pitch::pitch_label;
pub use preprocess::normalize;
pub use recognizer::Recognizer;
pub use report::{render_text, EMPTY_RESULT, MEASURE_MARKER};
pub use resolve::{classify_duration, resolve_durations, resolve_stems, DurationConfig};
pub use scan::{scan_staff, ScanConfig};
pub use sequence::{DurationType, Entry, Note, Sequence, Slot};
pub use staff::{Staff, LADDER_LEN, STAFF_LINES};
pub use stem::{detect_stems, Stem, StemConfig};
