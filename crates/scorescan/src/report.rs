//! Text rendering of recognition results.

use std::fmt;

use crate::pipeline::Recognition;
use crate::sequence::{Entry, Note, Slot};

/// Printed when no note was recognized.
pub const EMPTY_RESULT: &str = "No characters had been detected in the image.";
/// Printed for every measure boundary.
pub const MEASURE_MARKER: &str = "|Measure|";

impl fmt::Display for Note {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Note: {}, Type: {}, Pos: {}",
            self.pitch, self.duration, self.column
        )
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for note in self.notes() {
            write!(f, "{}", note)?;
        }
        f.write_str("]")
    }
}

impl fmt::Display for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Slot(slot) => write!(f, "{}", slot),
            Self::Measure => f.write_str(MEASURE_MARKER),
        }
    }
}

/// Render every entry on its own line, staff after staff.
pub fn render_text(result: &Recognition) -> String {
    if result.is_empty() {
        return EMPTY_RESULT.to_string();
    }
    result.entries().map(|e| format!("{}\n", e)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::StaffReading;
    use crate::sequence::{DurationType, Sequence};
    use crate::staff::Staff;

    fn note(pitch: &str, duration: DurationType, column: i32) -> Note {
        let mut n = Note::new(pitch.to_string(), 0, 50.0, column);
        n.duration = duration;
        n
    }

    fn recognition(sequence: Sequence) -> Recognition {
        Recognition {
            image_size: [100, 100],
            staves: vec![StaffReading {
                staff: Staff::from_lines([40, 50, 60, 70, 80]),
                stems: Vec::new(),
                sequence,
            }],
            staff_failure: None,
        }
    }

    #[test]
    fn renders_slots_and_measures() {
        let mut seq = Sequence::new(10);
        let mut chord = Slot::new(12, 30);
        chord.push(note("C", DurationType::Half, 12));
        chord.push(note("E", DurationType::Half, 13));
        seq.add(chord);
        let mut single = Slot::new(80, 30);
        single.push(note("G+", DurationType::Quarter, 80));
        seq.add(single);
        crate::resolve::resolve_stems(
            &mut seq,
            &[crate::stem::Stem {
                column: 60,
                top: 0,
                bottom: 40,
            }],
        );

        let text = render_text(&recognition(seq));
        assert_eq!(
            text,
            "[Note: C, Type: half, Pos: 12Note: E, Type: half, Pos: 13]\n\
             |Measure|\n\
             [Note: G+, Type: quarter, Pos: 80]\n"
        );
    }

    #[test]
    fn empty_result_message() {
        assert_eq!(render_text(&recognition(Sequence::new(10))), EMPTY_RESULT);
    }

    #[test]
    fn result_serializes_to_json() {
        let mut seq = Sequence::new(10);
        let mut slot = Slot::new(5, 30);
        slot.push(note("A", DurationType::Whole, 5));
        seq.add(slot);
        let json = serde_json::to_value(recognition(seq)).unwrap();
        let entry = &json["staves"][0]["sequence"]["entries"][0];
        assert_eq!(entry["kind"], "slot");
        assert_eq!(entry["notes"][0]["pitch"], "A");
        assert_eq!(entry["notes"][0]["duration"], "whole");
        assert!(json.get("staff_failure").is_none());
    }
}
