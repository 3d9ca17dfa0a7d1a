// trace-core/src/lib.rs

//! The core logic for the PitchTrace pitch tracer.
//! This crate is responsible for audio capture, fundamental-frequency
//! estimation, musical note mapping, and the cursor trajectory state
//! machine. It is completely headless and contains no GUI code.

pub mod analysis;
pub mod audio;
pub mod pitch;
pub mod trajectory;
pub mod tuning;

/// A complete pitch reading derived from a single analysis frame.
///
/// All fields are computed together from one detected frequency; an
/// estimate is published whole and never updated piecemeal.
#[derive(Debug, Clone)]
pub struct PitchEstimate {
    /// The detected fundamental frequency in Hz.
    pub frequency: f32,
    /// Continuous note index: fractional semitones from C-1, with A4 = 69.
    pub note_index: f32,
    /// The nearest equal-tempered note index.
    pub nearest_note: i32,
    /// Pitch-class symbol of the nearest note ("C" through "B").
    pub note_name: &'static str,
    /// Octave number of the nearest note (A4 sits in octave 4).
    pub octave: i32,
    /// Deviation from the nearest note in cents; positive when sharp.
    pub cents_offset: f32,
}
