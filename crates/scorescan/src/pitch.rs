//! Pitch labels for ladder positions.

/// Letter names cycling down the ladder, indexed by `key % 7`.
const PITCH_LETTERS: [char; 7] = ['D', 'C', 'B', 'A', 'G', 'F', 'E'];

/// Octave marker for a ladder index: higher positions get `+`, the lowest `-`.
fn octave_marker(key: usize) -> &'static str {
    match key {
        1 => "++",
        0..=8 => "+",
        16.. => "-",
        _ => "",
    }
}

/// Pitch label for ladder index `key` (0 is the topmost ladder row).
pub fn pitch_label(key: usize) -> String {
    let mut label = String::with_capacity(3);
    label.push(PITCH_LETTERS[key % PITCH_LETTERS.len()]);
    label.push_str(octave_marker(key));
    label
}
