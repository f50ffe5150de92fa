//! Note naming and equal-temperament tuning.
//!
//! Note indices run 0..=87, one per piano key, anchored at index 36 =
//! A4 = 440 Hz. The octave numbering is `ceil(index / 12)` - this is
//! not standard scientific pitch notation, but it is what authored
//! scores rely on, so it is preserved exactly.

/// Chromatic name cycle, starting at A.
const NOTE_NAMES: [&str; 12] = [
    "A", "A#", "B", "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#",
];

/// Reference pitch: note index 36 sounds at 440 Hz.
const A4_INDEX: f64 = 36.0;
const A4_HZ: f64 = 440.0;

/// A note's display name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NoteName {
    /// Letter plus accidental, e.g. `"A#"`.
    pub name: &'static str,
    /// Octave number, `ceil(index / 12)`.
    pub octave: u32,
}

impl std::fmt::Display for NoteName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.name, self.octave)
    }
}

/// Display name for a note index.
///
/// The caller guarantees `note < 88`; larger indices wrap through the
/// name cycle rather than failing.
pub fn note_name(note: u8) -> NoteName {
    NoteName {
        name: NOTE_NAMES[note as usize % 12],
        octave: (u32::from(note) + 11) / 12,
    }
}

/// Frequency in Hz for a note index, un-rounded.
///
/// `440 * 2^((note - 36) / 12)`. Callers that feed tone hardware round
/// to the nearest integer Hz at the call site.
pub fn note_frequency(note: u8) -> f64 {
    A4_HZ * 2f64.powf((f64::from(note) - A4_INDEX) / 12.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_octave_anchors() {
        assert_relative_eq!(note_frequency(36), 440.0);
        assert_relative_eq!(note_frequency(48), 880.0);
        assert_relative_eq!(note_frequency(24), 220.0);
        // Octave doubling every 12 steps, across the whole range.
        for note in 0..76u8 {
            assert_relative_eq!(
                note_frequency(note + 12),
                note_frequency(note) * 2.0,
                max_relative = 1e-12
            );
        }
    }

    #[test]
    fn test_rounded_extremes() {
        // Lowest and highest keys, rounded as the merger rounds them.
        assert_eq!(note_frequency(0).round() as u32, 55);
        assert_eq!(note_frequency(87).round() as u32, 8372);
    }

    #[test]
    fn test_name_table() {
        // Literal regression of the 12-name cycle and octave formula.
        let expected = [
            "A0", "A#1", "B1", "C1", "C#1", "D1", "D#1", "E1", "F1", "F#1", "G1", "G#1",
        ];
        for (note, want) in expected.iter().enumerate() {
            assert_eq!(note_name(note as u8).to_string(), *want);
        }
        assert_eq!(note_name(12).to_string(), "A1");
        assert_eq!(note_name(36).to_string(), "A3");
        assert_eq!(note_name(87).to_string(), "C8");
    }
}
