//! # Musical Tuning Module
//!
//! Converts detected frequencies into musical terms: a continuous note
//! index, a pitch-class name and octave, and the deviation from the
//! nearest equal-tempered note in cents.
//!
//! All operations are pure functions over the equal-tempered scale with
//! A4 = 440 Hz at note index 69 (the MIDI convention).

use once_cell::sync::Lazy;

/// The twelve pitch-class symbols, rooted at C.
pub const NOTE_NAMES: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];

/// Reference pitch: A4.
pub const REFERENCE_FREQUENCY: f32 = 440.0;

/// Note index of the reference pitch.
pub const REFERENCE_NOTE_INDEX: i32 = 69;

/// Statically computed equal-tempered frequencies for note indices 0-127.
///
/// Computed once on first use; `frequency_of` serves lookups from this
/// table and falls back to the closed formula outside the range.
static NOTE_FREQUENCIES: Lazy<Vec<f32>> = Lazy::new(|| {
    (0..128)
        .map(|index| equal_tempered_frequency(index))
        .collect()
});

fn equal_tempered_frequency(index: i32) -> f32 {
    REFERENCE_FREQUENCY * 2.0_f32.powf((index - REFERENCE_NOTE_INDEX) as f32 / 12.0)
}

/// Maps a frequency to its continuous note index.
///
/// Fractional semitones from C-1; 440 Hz maps to exactly 69.0. The
/// fractional part carries the sub-semitone (cents) information.
pub fn continuous_note_index(frequency: f32) -> f32 {
    12.0 * (frequency / REFERENCE_FREQUENCY).log2() + REFERENCE_NOTE_INDEX as f32
}

/// The nearest equal-tempered note index for a frequency.
pub fn nearest_note_index(frequency: f32) -> i32 {
    continuous_note_index(frequency).round() as i32
}

/// Pitch-class symbol for a note index.
pub fn note_name(index: i32) -> &'static str {
    NOTE_NAMES[index.rem_euclid(12) as usize]
}

/// Octave number for a note index. Index 69 (A4) sits in octave 4;
/// index 0 is C-1.
pub fn octave(index: i32) -> i32 {
    index.div_euclid(12) - 1
}

/// Equal-tempered frequency of a note index in Hz.
pub fn frequency_of(index: i32) -> f32 {
    if (0..128).contains(&index) {
        NOTE_FREQUENCIES[index as usize]
    } else {
        equal_tempered_frequency(index)
    }
}

/// Deviation of a frequency from a given note, in cents.
///
/// 100 cents = 1 semitone. Positive values mean the frequency is sharp
/// of the note, negative flat. No range clamp is applied.
pub fn cents_off_from_pitch(frequency: f32, index: i32) -> f32 {
    1200.0 * (frequency / frequency_of(index)).log2()
}

/// Detune magnitude as a percentage of the half-semitone span to the
/// adjacent note: 50 cents = 100. Auxiliary, used by UI meters only.
pub fn detune_percent(cents: f32) -> f32 {
    cents.abs() / 0.5
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn a4_maps_to_index_69() {
        assert!((continuous_note_index(440.0) - 69.0).abs() < 1e-6);
        assert_eq!(nearest_note_index(440.0), 69);
    }

    #[test]
    fn index_69_is_a4() {
        assert_eq!(note_name(69), "A");
        assert_eq!(octave(69), 4);
        assert!((frequency_of(69) - 440.0).abs() < 1e-4);
    }

    #[test]
    fn middle_c() {
        assert_eq!(note_name(60), "C");
        assert_eq!(octave(60), 4);
        assert!((frequency_of(60) - 261.626).abs() < 0.01);
    }

    #[test]
    fn octave_boundaries() {
        assert_eq!(note_name(59), "B");
        assert_eq!(octave(59), 3);
        assert_eq!(note_name(72), "C");
        assert_eq!(octave(72), 5);
        assert_eq!(note_name(0), "C");
        assert_eq!(octave(0), -1);
    }

    #[test]
    fn negative_indices_wrap() {
        assert_eq!(note_name(-1), "B");
        assert_eq!(octave(-1), -2);
    }

    #[test]
    fn cents_zero_at_exact_pitch() {
        assert!(cents_off_from_pitch(frequency_of(69), 69).abs() < 1e-4);
        assert!(cents_off_from_pitch(frequency_of(57), 57).abs() < 1e-3);
    }

    #[test]
    fn cents_sign_convention() {
        // Sharp of A4 is positive, flat is negative.
        assert!(cents_off_from_pitch(445.0, 69) > 0.0);
        assert!(cents_off_from_pitch(435.0, 69) < 0.0);
    }

    #[test]
    fn nearest_note_round_trip_within_half_semitone() {
        for &freq in &[27.5, 82.41, 196.0, 329.63, 466.16, 452.9, 1046.5, 3951.07] {
            let nearest = nearest_note_index(freq);
            let cents = cents_off_from_pitch(freq, nearest);
            assert!(cents.abs() <= 50.0, "{freq} Hz -> {cents} cents");
        }
    }

    #[test]
    fn detune_percent_scales_cents() {
        assert_eq!(detune_percent(0.0), 0.0);
        assert_eq!(detune_percent(25.0), 50.0);
        assert_eq!(detune_percent(-50.0), 100.0);
    }
}
