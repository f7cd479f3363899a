//! Notes, slots and the per-staff sequence.
//!
//! The note scanner reports one [`Slot`] per window position that detected
//! anything. A physical note head triggers many neighbouring windows, so the
//! [`Sequence`] folds each incoming slot into the previous one when the two
//! start closer than `min_slot_distance` columns apart.

use serde::Serialize;

/// Duration class derived from fill and stem evidence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DurationType {
    /// Not resolved yet.
    #[default]
    Undetermined,
    Whole,
    Half,
    Quarter,
}

impl DurationType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Undetermined => "undetermined",
            Self::Whole => "whole",
            Self::Half => "half",
            Self::Quarter => "quarter",
        }
    }
}

impl std::fmt::Display for DurationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A detected note head.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Note {
    /// Pitch label, e.g. `C+`.
    pub pitch: String,
    /// Ladder index the head straddles.
    pub key: usize,
    /// Fill score of the strongest window that saw this head.
    pub fill_score: f64,
    /// Column where the detecting window started.
    pub column: i32,
    pub duration: DurationType,
    pub has_stem: bool,
}

impl Note {
    pub fn new(pitch: String, key: usize, fill_score: f64, column: i32) -> Self {
        Self {
            pitch,
            key,
            fill_score,
            column,
            duration: DurationType::Undetermined,
            has_stem: false,
        }
    }
}

/// Notes sharing one column region.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Slot {
    position: i32,
    span_end: i32,
    notes: Vec<Note>,
}

impl Slot {
    /// Empty slot for a scan window starting at `position` and `width` columns wide.
    pub fn new(position: i32, width: i32) -> Self {
        Self {
            position,
            span_end: position + width,
            notes: Vec::new(),
        }
    }

    /// Column where the first contributing window started.
    pub fn position(&self) -> i32 {
        self.position
    }

    /// Exclusive right edge of all windows merged into this slot.
    pub fn span_end(&self) -> i32 {
        self.span_end
    }

    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn notes_mut(&mut self) -> &mut [Note] {
        &mut self.notes
    }

    pub fn push(&mut self, note: Note) {
        self.notes.push(note);
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    /// Fold `other` into this slot.
    ///
    /// The slot holding more notes is the base (this one on ties). Notes with
    /// the same pitch collapse into the base note carrying the larger fill
    /// score; notes found on only one side are kept. Position stays put.
    pub fn merge(&mut self, other: Slot) {
        self.span_end = self.span_end.max(other.span_end);

        let (mut base, rest) = if self.notes.len() < other.notes.len() {
            (other.notes, std::mem::take(&mut self.notes))
        } else {
            (std::mem::take(&mut self.notes), other.notes)
        };
        for note in rest {
            match base.iter_mut().find(|b| b.pitch == note.pitch) {
                Some(b) => b.fill_score = b.fill_score.max(note.fill_score),
                None => base.push(note),
            }
        }
        self.notes = base;
    }

    /// Mark every note in the slot as stemmed.
    pub fn attach_stem(&mut self) {
        for note in &mut self.notes {
            note.has_stem = true;
        }
    }
}

/// One element of a resolved sequence.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Entry {
    Slot(Slot),
    /// Bar boundary.
    Measure,
}

impl Entry {
    pub fn as_slot(&self) -> Option<&Slot> {
        match self {
            Self::Slot(slot) => Some(slot),
            Self::Measure => None,
        }
    }

    pub fn is_measure(&self) -> bool {
        matches!(self, Self::Measure)
    }
}

/// Ordered slots (and, once stems are resolved, measures) for one staff.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Sequence {
    min_slot_distance: i32,
    entries: Vec<Entry>,
}

impl Sequence {
    pub fn new(min_slot_distance: i32) -> Self {
        Self {
            min_slot_distance,
            entries: Vec::new(),
        }
    }

    /// Sequence whose merge distance is `floor(window_width * factor)`.
    pub fn for_window(window_width: i32, factor: f64) -> Self {
        Self::new((f64::from(window_width) * factor).floor() as i32)
    }

    pub fn min_slot_distance(&self) -> i32 {
        self.min_slot_distance
    }

    /// Append a slot, or merge it into the last slot when the two start
    /// fewer than `min_slot_distance` columns apart.
    pub fn add(&mut self, slot: Slot) {
        if let Some(Entry::Slot(last)) = self.entries.last_mut() {
            if slot.position - last.position < self.min_slot_distance {
                last.merge(slot);
                return;
            }
        }
        self.entries.push(Entry::Slot(slot));
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub(crate) fn entries_mut(&mut self) -> &mut Vec<Entry> {
        &mut self.entries
    }

    pub fn slots(&self) -> impl Iterator<Item = &Slot> {
        self.entries.iter().filter_map(Entry::as_slot)
    }

    pub fn slots_mut(&mut self) -> impl Iterator<Item = &mut Slot> {
        self.entries.iter_mut().filter_map(|e| match e {
            Entry::Slot(slot) => Some(slot),
            Entry::Measure => None,
        })
    }

    pub fn notes(&self) -> impl Iterator<Item = &Note> {
        self.slots().flat_map(|s| s.notes.iter())
    }

    pub fn note_count(&self) -> usize {
        self.slots().map(Slot::len).sum()
    }

    pub fn measure_count(&self) -> usize {
        self.entries.iter().filter(|e| e.is_measure()).count()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
