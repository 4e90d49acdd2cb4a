//! Sine-wave playback through the default audio output.
//!
//! The core hands over an ordered sequence of (frequency, sample count)
//! pairs; this module renders them into one sample buffer, streams it
//! with cpal, and blocks until the device has played it all.

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use std::sync::mpsc;
use tracing::debug;

use crate::tune::Tune;

/// Errors from audio device setup or streaming.
#[derive(Debug, thiserror::Error)]
pub enum PlaybackError {
    #[error("no output audio device available")]
    NoDevice,
    #[error("failed to get default output config: {0}")]
    Config(#[from] cpal::DefaultStreamConfigError),
    #[error("failed to build output stream: {0}")]
    BuildStream(#[from] cpal::BuildStreamError),
    #[error("failed to start playback: {0}")]
    PlayStream(#[from] cpal::PlayStreamError),
}

/// Output gain, well below clipping.
const AMPLITUDE: f64 = 0.3;
/// Samples faded in/out at each note boundary so edges do not click.
const FADE_SAMPLES: usize = 128;

/// Render every note of the tune into one contiguous mono buffer at the
/// given rate. Sample counts are computed at the same rate, so note
/// boundaries land exactly where the duration model says they do.
fn render(tune: &Tune, tempo_bpm: u32, sample_rate: u32) -> Vec<f32> {
    let rate = f64::from(sample_rate);
    let total: usize = tune
        .iter()
        .map(|n| n.sample_count(tempo_bpm, sample_rate))
        .sum();
    let mut samples = Vec::with_capacity(total);

    for note in tune {
        let count = note.sample_count(tempo_bpm, sample_rate);
        let freq = note.frequency();
        let fade = FADE_SAMPLES.min(count / 2);
        for i in 0..count {
            let mut value =
                (i as f64 * freq * 2.0 * std::f64::consts::PI / rate).sin() * AMPLITUDE;
            if i < fade {
                value *= i as f64 / fade as f64;
            } else if count - i <= fade {
                value *= (count - i) as f64 / fade as f64;
            }
            samples.push(value as f32);
        }
    }
    samples
}

/// Play a parsed tune through the default audio output, blocking until
/// the last note has finished.
pub fn play(tune: &Tune, tempo_bpm: u32) -> Result<(), PlaybackError> {
    let host = cpal::default_host();
    let device = host.default_output_device().ok_or(PlaybackError::NoDevice)?;
    let config = device.default_output_config()?;

    let sample_rate = config.sample_rate();
    let channels = config.channels() as usize;
    debug!(sample_rate, channels, "opened default output device");

    let samples = render(tune, tempo_bpm, sample_rate);
    debug!(total_samples = samples.len(), "rendered tune");

    // The callback signals here once it has written the final sample.
    let (done_tx, done_rx) = mpsc::channel::<()>();

    let mut pos = 0usize;
    let mut finished = false;
    let stream = device.build_output_stream(
        &config.into(),
        move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
            for frame in data.chunks_mut(channels) {
                let value = if pos < samples.len() {
                    let v = samples[pos];
                    pos += 1;
                    v
                } else {
                    0.0
                };
                for sample in frame.iter_mut() {
                    *sample = value;
                }
            }
            if pos >= samples.len() && !finished {
                finished = true;
                let _ = done_tx.send(());
            }
        },
        move |err| {
            tracing::error!("audio stream error: {}", err);
        },
        None,
    )?;

    stream.play()?;

    // Block until the buffer is exhausted, then give the device a moment
    // to drain what it already holds.
    let _ = done_rx.recv();
    std::thread::sleep(std::time::Duration::from_millis(100));

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_length_matches_sample_counts() {
        let tune = Tune::parse("C4 D4-8 E4-8 -4. D4 C4-1").unwrap();
        let expected: usize = tune.iter().map(|n| n.sample_count(88, 44100)).sum();
        assert_eq!(render(&tune, 88, 44100).len(), expected);
    }

    #[test]
    fn test_render_empty_tune_is_empty() {
        let tune = Tune::parse("").unwrap();
        assert!(render(&tune, 88, 44100).is_empty());
    }

    #[test]
    fn test_render_starts_and_ends_silent() {
        // Fade-in begins at zero and fade-out returns to ~zero.
        let tune = Tune::parse("A4-4").unwrap();
        let samples = render(&tune, 60, 44100);
        assert_eq!(samples[0], 0.0);
        assert!(samples.last().unwrap().abs() < 0.01);
    }

    #[test]
    fn test_render_stays_within_amplitude() {
        let tune = Tune::parse("A4-16 C5-16 E5-16").unwrap();
        let samples = render(&tune, 120, 48000);
        assert!(samples.iter().all(|s| s.abs() <= AMPLITUDE as f32 + 1e-6));
    }
}
