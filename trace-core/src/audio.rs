//! # Audio Capture Module
//!
//! Real-time microphone capture using CPAL (Cross-Platform Audio Library).
//! Opens the default input device and streams fixed-size frames of mono
//! f32 samples to the analysis thread.
//!
//! The device's raw capture stream is used as-is: no gain control,
//! filtering, or noise processing sits between the microphone and the
//! autocorrelator, so the waveform reaching the pitch pipeline is
//! unprocessed.

use anyhow::{Result, anyhow};
use cpal::SupportedStreamConfigRange;
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use crossbeam_channel::Sender;

/// Samples per analysis frame.
///
/// One frame is the window the autocorrelator sees. 2048 samples at
/// 44.1 kHz is ~46 ms of signal, several periods of anything above
/// ~65 Hz.
pub const BUFFER_SIZE: usize = 2048;

/// Preferred capture rate in Hz.
const TARGET_SAMPLE_RATE: u32 = 44100;

/// Starts capturing from the default input device.
///
/// Selects a mono f32 configuration as close to 44.1 kHz as the device
/// offers, then installs a callback that accumulates samples and sends
/// one `Vec<f32>` of exactly `BUFFER_SIZE` samples per completed frame.
///
/// # Arguments
/// * `sender` - Channel carrying completed frames to the analysis thread
///
/// # Returns
/// * `Ok((stream, sample_rate))` - Live stream handle and the actual
///   sample rate, fixed for the stream's lifetime
/// * `Err(e)` - No input device, no usable configuration, or the stream
///   failed to start. The caller must surface this; there is no dummy
///   fallback source.
pub fn start_capture(sender: Sender<Vec<f32>>) -> Result<(cpal::Stream, u32)> {
    let host = cpal::default_host();
    let device = host
        .default_input_device()
        .ok_or_else(|| anyhow!("no input device available"))?;

    eprintln!("[AUDIO] using input device: {}", device.name()?);

    let configs = device.supported_input_configs()?.collect::<Vec<_>>();
    let supported = pick_input_config(configs, TARGET_SAMPLE_RATE)
        .ok_or_else(|| anyhow!("no mono f32 input configuration found"))?;

    // The chosen range may not contain the target rate exactly.
    let rate = TARGET_SAMPLE_RATE.clamp(supported.min_sample_rate().0, supported.max_sample_rate().0);
    let config = supported.with_sample_rate(cpal::SampleRate(rate));

    let sample_rate = config.sample_rate().0;
    let config: cpal::StreamConfig = config.into();

    eprintln!("[AUDIO] capture rate: {sample_rate} Hz");

    let err_fn = |err| eprintln!("[AUDIO] stream error: {err}");

    // Accumulates callback data until a full analysis frame is ready.
    let mut pending = Vec::with_capacity(BUFFER_SIZE * 2);

    let stream = device.build_input_stream(
        &config,
        move |data: &[f32], _: &cpal::InputCallbackInfo| {
            pending.extend_from_slice(data);

            while pending.len() >= BUFFER_SIZE {
                let frame = pending[..BUFFER_SIZE].to_vec();

                // try_send keeps the real-time callback from ever blocking;
                // a full channel just drops the frame.
                let _ = sender.try_send(frame);

                pending.drain(..BUFFER_SIZE);
            }
        },
        err_fn,
        None,
    )?;

    stream.play()?;

    Ok((stream, sample_rate))
}

/// Picks the supported configuration closest to the target rate,
/// restricted to mono f32 input.
fn pick_input_config(
    configs: Vec<SupportedStreamConfigRange>,
    target_rate: u32,
) -> Option<SupportedStreamConfigRange> {
    configs
        .into_iter()
        .filter(|c| c.channels() == 1 && c.sample_format() == cpal::SampleFormat::F32)
        .min_by_key(|c| {
            let min_diff = (c.min_sample_rate().0 as i32 - target_rate as i32).abs();
            let max_diff = (c.max_sample_rate().0 as i32 - target_rate as i32).abs();
            min_diff.min(max_diff)
        })
}
