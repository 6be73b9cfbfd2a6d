//! Clip playback through the default audio output device.

use std::time::Duration;

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use thiserror::Error;
use tracing::error;

use crate::engine::Clip;

#[derive(Debug, Error)]
pub enum PlaybackError {
    #[error("no default audio output device available")]
    NoDevice,
    #[error("failed to fetch default output config: {0}")]
    Config(#[from] cpal::DefaultStreamConfigError),
    #[error("failed to build output stream: {0}")]
    BuildStream(#[from] cpal::BuildStreamError),
    #[error("failed to start output stream: {0}")]
    Play(#[from] cpal::PlayStreamError),
}

/// Play the clip on the default output device, blocking until it has run its
/// length. The stream scans the buffer forward from sample 0 and goes silent
/// past the end; the device rate is bridged by a fractional read cursor, no
/// resampling.
pub fn play_clip(clip: &Clip) -> Result<(), PlaybackError> {
    let host = cpal::default_host();
    let device = host.default_output_device().ok_or(PlaybackError::NoDevice)?;
    let supported = device.default_output_config()?;

    let channels = supported.channels() as usize;
    let device_rate = supported.sample_rate().0;
    let config: cpal::StreamConfig = supported.into();

    let samples: Vec<i8> = clip.samples().to_vec();
    let total = samples.len();
    let step = clip.sample_rate() as f64 / device_rate as f64;
    let mut cursor = 0.0f64;

    let stream = device.build_output_stream(
        &config,
        move |data: &mut [f32], _| {
            for frame in data.chunks_mut(channels) {
                let index = cursor as usize;
                let value = if index < total {
                    samples[index] as f32 / 128.0
                } else {
                    0.0
                };
                for out in frame.iter_mut() {
                    *out = value;
                }
                cursor += step;
            }
        },
        |err| error!("audio output error: {err}"),
        None,
    )?;

    stream.play()?;

    // Hold the stream open for the clip plus a short tail so the device
    // drains before the stream drops.
    let millis = (clip.duration_secs() * 1_000.0) as u64 + 250;
    std::thread::sleep(Duration::from_millis(millis));

    Ok(())
}
