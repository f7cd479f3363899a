//! Stem-to-note alignment, measure insertion and duration resolution.
//!
//! Stems and slots are both ordered by column. Each stem is matched against
//! the slot spans by position: a stem inside a slot's column span belongs to
//! that slot's notes, while a stem that falls in the gap between two slots
//! (or after the last one) has no note head and marks a bar line.

use serde::{Deserialize, Serialize};

use crate::sequence::{DurationType, Entry, Note, Sequence};
use crate::stem::Stem;

/// Configuration for duration classification.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DurationConfig {
    /// Notes scoring at least this much are filled heads (quarters).
    pub quarter_fill: f64,
}

impl Default for DurationConfig {
    fn default() -> Self {
        Self { quarter_fill: 85.0 }
    }
}

/// What a stem turned out to be once aligned with the slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StemRole {
    /// Inside the span of slot `i`.
    Attached(usize),
    /// In the gap before slot `i`; `i == slot count` is past the last slot.
    BarBefore(usize),
}

/// Align ascending stems with ascending `(position, span_end)` spans.
///
/// The cursor only moves forward, skipping every slot that ends at or before
/// the stem. Any number of stems may land on one slot or in one gap.
fn align(spans: &[(i32, i32)], stems: &[Stem]) -> Vec<StemRole> {
    let mut cursor = 0;
    stems
        .iter()
        .map(|stem| {
            while cursor < spans.len() && spans[cursor].1 <= stem.column {
                cursor += 1;
            }
            match spans.get(cursor) {
                Some(&(position, _)) if stem.column >= position => StemRole::Attached(cursor),
                _ => StemRole::BarBefore(cursor),
            }
        })
        .collect()
}

fn push_measure(entries: &mut Vec<Entry>) {
    if !matches!(entries.last(), Some(Entry::Measure)) {
        entries.push(Entry::Measure);
    }
}

/// Attach stems to slots and insert measures, in place.
///
/// Several stems inside one slot attach once, and several stems in one gap
/// produce a single measure. Existing measures are kept.
pub fn resolve_stems(sequence: &mut Sequence, stems: &[Stem]) {
    let mut stems = stems.to_vec();
    stems.sort_by_key(|s| s.column);

    let spans: Vec<(i32, i32)> = sequence
        .slots()
        .map(|s| (s.position(), s.span_end()))
        .collect();
    let mut stemmed = vec![false; spans.len()];
    let mut bar_before = vec![false; spans.len() + 1];
    for (stem, role) in stems.iter().zip(align(&spans, &stems)) {
        match role {
            StemRole::Attached(i) => {
                tracing::trace!("attaching stem {} to slot at {}", stem.column, spans[i].0);
                stemmed[i] = true;
            }
            StemRole::BarBefore(i) => {
                tracing::trace!("stem {} has no note head: measure", stem.column);
                bar_before[i] = true;
            }
        }
    }

    let entries = std::mem::take(sequence.entries_mut());
    let mut resolved = Vec::with_capacity(entries.len() + bar_before.len());
    let mut slot_index = 0;
    for entry in entries {
        match entry {
            Entry::Measure => push_measure(&mut resolved),
            Entry::Slot(mut slot) => {
                if bar_before[slot_index] {
                    push_measure(&mut resolved);
                }
                if stemmed[slot_index] {
                    slot.attach_stem();
                }
                slot_index += 1;
                resolved.push(Entry::Slot(slot));
            }
        }
    }
    if bar_before[spans.len()] {
        push_measure(&mut resolved);
    }
    *sequence.entries_mut() = resolved;
}

/// Duration class of a single note.
pub fn classify_duration(note: &Note, config: &DurationConfig) -> DurationType {
    if note.fill_score >= config.quarter_fill {
        DurationType::Quarter
    } else if note.has_stem {
        DurationType::Half
    } else {
        DurationType::Whole
    }
}

/// Set the duration of every note in the sequence.
pub fn resolve_durations(sequence: &mut Sequence, config: &DurationConfig) {
    for slot in sequence.slots_mut() {
        for note in slot.notes_mut() {
            note.duration = classify_duration(note, config);
        }
    }
}
