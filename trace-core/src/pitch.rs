//! # Pitch Detection Module
//!
//! Implements fundamental-frequency estimation for live monophonic audio
//! using normalized time-domain autocorrelation with amplitude gating.
//!
//! ## Features
//! - RMS noise gate to reject silence and room noise
//! - Leading/trailing silence trim before correlation
//! - FFT-accelerated autocorrelation over the full lag range
//! - Parabolic interpolation for sub-sample period accuracy

use rustfft::{FftPlanner, num_complex::Complex};

/// Minimum RMS amplitude for pitch detection.
///
/// Buffers quieter than this are judged silent or too noisy to trust and
/// produce no estimate.
pub const AMPLITUDE_THRESHOLD: f32 = 0.01;

/// Trim threshold as a fraction of the buffer RMS. Samples below
/// `rms * TRIM_THRESHOLD_RATIO` at either end of the buffer are treated
/// as silence padding.
const TRIM_THRESHOLD_RATIO: f32 = 0.2;

/// Smallest trimmed span worth analyzing; anything shorter falls back to
/// the full buffer.
const MIN_TRIMMED_LEN: usize = 256;

/// Estimates the fundamental frequency of an audio buffer.
///
/// The estimator walks the autocorrelation of the (silence-trimmed)
/// signal: the first positive-to-negative crossing marks the end of the
/// zero-lag peak's influence, the correlation maximum beyond it gives the
/// period, and parabolic interpolation refines it to sub-sample accuracy.
///
/// # Arguments
/// * `signal` - Input audio samples in [-1, 1]
/// * `sample_rate` - Sample rate in Hz
///
/// # Returns
/// * `Some(frequency)` - Detected fundamental frequency in Hz
/// * `None` - No pitch detected (silence, noise, or no periodicity)
///
/// Pitches whose period exceeds the buffer length cannot win the peak
/// search and come out as octave-folded best-effort estimates; no
/// frequency-range clamp is applied.
pub fn estimate_frequency(signal: &[f32], sample_rate: u32) -> Option<f32> {
    if signal.is_empty() {
        return None;
    }

    // Noise gate: refuse to guess on quiet buffers.
    let rms = (signal.iter().map(|&s| s * s).sum::<f32>() / signal.len() as f32).sqrt();
    if rms < AMPLITUDE_THRESHOLD {
        return None;
    }

    let trimmed = trim_silence(signal, rms);
    let correlation = autocorrelation(trimmed);

    // The correlation starts at its zero-lag maximum; skip everything up
    // to the first descending zero-crossing before hunting for the peak.
    let crossing = correlation
        .iter()
        .skip(1)
        .position(|&value| value <= 0.0)
        .map(|offset| offset + 1)?;

    let (peak_lag, _) = correlation
        .iter()
        .enumerate()
        .skip(crossing)
        .fold((0, f32::MIN), |(best_lag, best), (lag, &value)| {
            if value > best { (lag, value) } else { (best_lag, best) }
        });
    if peak_lag == 0 {
        return None;
    }

    let period = refine_peak(&correlation, peak_lag);
    if !period.is_finite() || period <= 0.0 {
        return None;
    }

    let frequency = sample_rate as f32 / period;
    if frequency.is_finite() && frequency > 0.0 {
        Some(frequency)
    } else {
        None
    }
}

/// Strips low-energy padding from both ends of the buffer.
///
/// Scans inward (at most half the buffer from each side) for the first
/// sample whose magnitude reaches the trim threshold. Falls back to the
/// full buffer when the remaining span is too short to correlate.
fn trim_silence(signal: &[f32], rms: f32) -> &[f32] {
    let len = signal.len();
    let threshold = rms * TRIM_THRESHOLD_RATIO;

    let start = signal
        .iter()
        .take(len / 2)
        .position(|sample| sample.abs() >= threshold)
        .unwrap_or(0);
    let tail = signal
        .iter()
        .rev()
        .take(len / 2)
        .position(|sample| sample.abs() >= threshold)
        .unwrap_or(0);
    let end = len - tail;

    if end - start >= MIN_TRIMMED_LEN {
        &signal[start..end]
    } else {
        signal
    }
}

/// Computes the full linear autocorrelation `c[lag] = sum(x[i] * x[i+lag])`
/// for lag = 0..len-1.
///
/// Uses the FFT identity (zero-pad, forward transform, power spectrum,
/// inverse transform) so a 2048-sample frame stays well under a
/// millisecond of work.
fn autocorrelation(signal: &[f32]) -> Vec<f32> {
    let len = signal.len();
    // Padding to at least twice the length keeps the circular correlation
    // linear; the next power of two keeps the transform radix-2.
    let padded = (2 * len).next_power_of_two();

    let mut planner = FftPlanner::new();
    let forward = planner.plan_fft_forward(padded);
    let inverse = planner.plan_fft_inverse(padded);

    let mut buffer: Vec<Complex<f32>> = signal
        .iter()
        .map(|&sample| Complex { re: sample, im: 0.0 })
        .chain(std::iter::repeat(Complex { re: 0.0, im: 0.0 }))
        .take(padded)
        .collect();

    forward.process(&mut buffer);
    for bin in buffer.iter_mut() {
        *bin = Complex { re: bin.norm_sqr(), im: 0.0 };
    }
    inverse.process(&mut buffer);

    // rustfft's inverse transform is unscaled.
    let scale = 1.0 / padded as f32;
    buffer[..len].iter().map(|bin| bin.re * scale).collect()
}

/// Refines an integer peak lag with a parabola through its neighbors.
///
/// Returns the raw lag when the peak sits on the buffer edge or the
/// three points are collinear.
fn refine_peak(correlation: &[f32], lag: usize) -> f32 {
    if lag == 0 || lag + 1 >= correlation.len() {
        return lag as f32;
    }

    let y1 = correlation[lag - 1];
    let y2 = correlation[lag];
    let y3 = correlation[lag + 1];

    let denominator = y1 - 2.0 * y2 + y3;
    if denominator.abs() < f32::EPSILON {
        return lag as f32;
    }

    lag as f32 + (y1 - y3) / (2.0 * denominator)
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
    fn detects_a4_sine() {
        let buffer = sine(440.0, 44100, 2048, 0.5);
        let freq = estimate_frequency(&buffer, 44100).expect("sine should yield a pitch");
        assert!(
            (freq - 440.0).abs() / 440.0 < 0.01,
            "expected ~440 Hz, got {freq}"
        );
    }

    #[test]
    fn detects_a_sharp_4_sine() {
        let buffer = sine(466.16, 44100, 2048, 0.5);
        let freq = estimate_frequency(&buffer, 44100).expect("sine should yield a pitch");
        assert!(
            (freq - 466.16).abs() / 466.16 < 0.01,
            "expected ~466.16 Hz, got {freq}"
        );
    }

    #[test]
    fn detects_low_sine() {
        // ~5 periods of A2 fit in one frame.
        let buffer = sine(110.0, 44100, 2048, 0.5);
        let freq = estimate_frequency(&buffer, 44100).expect("sine should yield a pitch");
        assert!(
            (freq - 110.0).abs() / 110.0 < 0.01,
            "expected ~110 Hz, got {freq}"
        );
    }

    #[test]
    fn all_zero_buffer_yields_none() {
        let buffer = vec![0.0; 2048];
        assert_eq!(estimate_frequency(&buffer, 44100), None);
    }

    #[test]
    fn sub_threshold_signal_yields_none() {
        // Periodic content, but RMS below the noise floor.
        let buffer = sine(440.0, 44100, 2048, 0.005);
        assert_eq!(estimate_frequency(&buffer, 44100), None);
    }

    #[test]
    fn empty_buffer_yields_none() {
        assert_eq!(estimate_frequency(&[], 44100), None);
    }
}
