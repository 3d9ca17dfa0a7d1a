//! # Frame Analysis Module
//!
//! Turns raw audio frames into published [`PitchEstimate`]s. The
//! [`Analyzer`] owns the latest estimate: a frame with no detectable
//! pitch is a normal, frequent outcome and leaves the previous estimate
//! in place, so downstream consumers never see a flicker on silence.

use crate::{PitchEstimate, audio::BUFFER_SIZE, pitch, tuning};

/// Per-stream analysis state: the sample rate and the most recently
/// published estimate.
#[derive(Debug)]
pub struct Analyzer {
    sample_rate: u32,
    last_estimate: Option<PitchEstimate>,
}

impl Analyzer {
    /// Creates an analyzer for a capture stream.
    ///
    /// # Panics
    /// Panics on a zero sample rate; that is a caller bug, not a runtime
    /// condition to recover from.
    pub fn new(sample_rate: u32) -> Self {
        assert!(sample_rate > 0, "sample rate must be positive");
        Self {
            sample_rate,
            last_estimate: None,
        }
    }

    /// The stream's sample rate in Hz.
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Analyzes one frame and publishes a new estimate if a pitch was
    /// found.
    ///
    /// Every field of the estimate (frequency, note index, name, octave,
    /// cents) is derived from the same detected frequency in this one
    /// call, so the published value is always internally consistent.
    ///
    /// Returns `None` on a silent or unvoiced frame; the previously
    /// published estimate stays available through [`Analyzer::last_estimate`].
    ///
    /// # Panics
    /// Panics when the frame is not exactly `BUFFER_SIZE` samples long.
    pub fn process_frame(&mut self, frame: &[f32]) -> Option<&PitchEstimate> {
        assert_eq!(
            frame.len(),
            BUFFER_SIZE,
            "analysis frame must be exactly BUFFER_SIZE samples"
        );

        let frequency = pitch::estimate_frequency(frame, self.sample_rate)?;
        let note_index = tuning::continuous_note_index(frequency);
        let nearest_note = note_index.round() as i32;

        self.last_estimate = Some(PitchEstimate {
            frequency,
            note_index,
            nearest_note,
            note_name: tuning::note_name(nearest_note),
            octave: tuning::octave(nearest_note),
            cents_offset: tuning::cents_off_from_pitch(frequency, nearest_note),
        });
        self.last_estimate.as_ref()
    }

    /// The most recently published estimate, if any frame has produced
    /// one yet.
    pub fn last_estimate(&self) -> Option<&PitchEstimate> {
        self.last_estimate.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sine(freq: f32, sample_rate: u32, len: usize, amplitude: f32) -> Vec<f32> {
        (0..len)
            .map(|i| {
                let t = i as f32 / sample_rate as f32;
                amplitude * (2.0 * std::f32::consts::PI * freq * t).sin()
            })
            .collect()
    }

    #[test]
    fn publishes_estimate_for_a4_frame() {
        let frame = sine(440.0, 44100, BUFFER_SIZE, 0.5);
        let mut analyzer = Analyzer::new(44100);

        let estimate = analyzer.process_frame(&frame).expect("should detect A4");
        assert!((estimate.frequency - 440.0).abs() / 440.0 < 0.01);
        assert_eq!(estimate.note_name, "A");
        assert_eq!(estimate.octave, 4);
        assert!(estimate.cents_offset.abs() < 10.0);
    }

    #[test]
    fn publishes_estimate_for_a_sharp_frame() {
        let frame = sine(466.16, 44100, BUFFER_SIZE, 0.5);
        let mut analyzer = Analyzer::new(44100);

        let estimate = analyzer.process_frame(&frame).expect("should detect A#4");
        assert_eq!(estimate.note_name, "A#");
        assert_eq!(estimate.octave, 4);
        assert!(estimate.cents_offset.abs() < 10.0);
    }

    #[test]
    fn silent_frame_retains_previous_estimate() {
        let mut analyzer = Analyzer::new(44100);
        analyzer
            .process_frame(&sine(440.0, 44100, BUFFER_SIZE, 0.5))
            .expect("should detect A4");

        let silence = vec![0.0; BUFFER_SIZE];
        assert!(analyzer.process_frame(&silence).is_none());

        let last = analyzer.last_estimate().expect("estimate should be retained");
        assert_eq!(last.note_name, "A");
        assert_eq!(last.octave, 4);
    }

    #[test]
    #[should_panic(expected = "BUFFER_SIZE")]
    fn wrong_frame_length_panics() {
        let mut analyzer = Analyzer::new(44100);
        let _ = analyzer.process_frame(&[0.0; 100]);
    }

    #[test]
    #[should_panic(expected = "sample rate")]
    fn zero_sample_rate_panics() {
        Analyzer::new(0);
    }
}
