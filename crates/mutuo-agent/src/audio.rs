//! Microphone capture and speaker playback for the terminal agent.
//!
//! Capture uses cpal and prefers a 16 kHz mono f32 input config; when the
//! device cannot provide one, multi-channel input is averaged to mono and
//! sinc-resampled down to 16 kHz with rubato. Playback goes through a rodio
//! `Sink` so agent audio chunks queue back to back without gaps.
//!
//! cpal's `Stream` and rodio's `OutputStream` are not `Send`, so each lives
//! on its own thread for the lifetime of the session; this struct holds only
//! sendable handles, which is what the session task needs.

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{Device, SampleFormat, StreamConfig};
use mutuo_convai::{AudioInterface, ConvaiError, SAMPLE_RATE};
use rodio::buffer::SamplesBuffer;
use rodio::{OutputStream, Sink};
use std::sync::mpsc as std_mpsc;
use std::thread;
use tokio::sync::mpsc;

pub struct DefaultAudioInterface {
    capture: Option<Capture>,
    playback: Option<Playback>,
}

impl DefaultAudioInterface {
    pub fn new() -> Self {
        Self {
            capture: None,
            playback: None,
        }
    }
}

impl AudioInterface for DefaultAudioInterface {
    fn start(&mut self, input_tx: mpsc::UnboundedSender<Vec<i16>>) -> Result<(), ConvaiError> {
        self.playback = Some(Playback::start()?);
        self.capture = Some(Capture::start(input_tx)?);
        Ok(())
    }

    fn play(&mut self, pcm: &[i16]) {
        if let Some(playback) = &self.playback {
            playback.append(pcm);
        }
    }

    fn stop_playback(&mut self) {
        if let Some(playback) = &self.playback {
            playback.clear();
        }
    }

    fn stop(&mut self) {
        self.capture = None;
        self.playback = None;
    }
}

// ---------------------------------------------------------------------------
// Capture
// ---------------------------------------------------------------------------

struct Capture {
    stop_tx: std_mpsc::Sender<()>,
}

impl Capture {
    /// Builds the input stream on a dedicated thread and hands back a stop
    /// handle. Stream construction errors are reported synchronously.
    fn start(input_tx: mpsc::UnboundedSender<Vec<i16>>) -> Result<Self, ConvaiError> {
        let (ready_tx, ready_rx) = std_mpsc::channel::<Result<(), ConvaiError>>();
        let (stop_tx, stop_rx) = std_mpsc::channel::<()>();

        thread::spawn(move || {
            let stream = match build_input_stream(input_tx) {
                Ok(stream) => {
                    let _ = ready_tx.send(Ok(()));
                    stream
                }
                Err(e) => {
                    let _ = ready_tx.send(Err(e));
                    return;
                }
            };
            // Keep the stream alive until stop is requested or the handle is
            // dropped, then let it fall out of scope.
            let _ = stop_rx.recv();
            drop(stream);
        });

        ready_rx
            .recv()
            .map_err(|_| ConvaiError::Audio("capture thread exited during setup".into()))??;
        Ok(Self { stop_tx })
    }
}

impl Drop for Capture {
    fn drop(&mut self) {
        let _ = self.stop_tx.send(());
    }
}

fn build_input_stream(
    input_tx: mpsc::UnboundedSender<Vec<i16>>,
) -> Result<cpal::Stream, ConvaiError> {
    let host = cpal::default_host();
    let device = host
        .default_input_device()
        .ok_or_else(|| ConvaiError::Audio("no default input device".into()))?;
    tracing::info!(
        device = %device.name().unwrap_or_default(),
        "using input device"
    );

    let config = find_capture_config(&device)?;
    let device_rate = config.sample_rate.0;
    let channels = config.channels as usize;
    tracing::info!(
        channels,
        device_rate,
        target_rate = SAMPLE_RATE,
        "capture config"
    );

    let stream = device
        .build_input_stream(
            &config,
            move |data: &[f32], _: &cpal::InputCallbackInfo| {
                let mono: Vec<f32> = if channels > 1 {
                    data.chunks(channels)
                        .map(|frame| frame.iter().sum::<f32>() / channels as f32)
                        .collect()
                } else {
                    data.to_vec()
                };
                let mono = if device_rate != SAMPLE_RATE {
                    resample(&mono, device_rate, SAMPLE_RATE)
                } else {
                    mono
                };
                let pcm: Vec<i16> = mono
                    .iter()
                    .map(|s| (s.clamp(-1.0, 1.0) * i16::MAX as f32) as i16)
                    .collect();
                // A send error just means the session already ended.
                let _ = input_tx.send(pcm);
            },
            |err| {
                tracing::error!(error = %err, "audio capture error");
            },
            None,
        )
        .map_err(|e| ConvaiError::Audio(e.to_string()))?;

    stream
        .play()
        .map_err(|e| ConvaiError::Audio(e.to_string()))?;

    Ok(stream)
}

/// Prefers a native 16 kHz mono f32 config, falling back to the device
/// default (converted in the capture callback).
fn find_capture_config(device: &Device) -> Result<StreamConfig, ConvaiError> {
    let supported = device
        .supported_input_configs()
        .map_err(|e| ConvaiError::Audio(e.to_string()))?;

    for range in supported {
        if range.channels() == 1
            && range.sample_format() == SampleFormat::F32
            && range.min_sample_rate().0 <= SAMPLE_RATE
            && SAMPLE_RATE <= range.max_sample_rate().0
        {
            return Ok(StreamConfig {
                channels: 1,
                sample_rate: cpal::SampleRate(SAMPLE_RATE),
                buffer_size: cpal::BufferSize::Default,
            });
        }
    }

    let default = device
        .default_input_config()
        .map_err(|e| ConvaiError::Audio(e.to_string()))?;
    Ok(default.into())
}

/// Sinc resampler for mono speech capture. The low-pass keeps device-rate
/// content above the 8 kHz target Nyquist from aliasing into the speech band.
fn resample(samples: &[f32], source_rate: u32, target_rate: u32) -> Vec<f32> {
    if source_rate == target_rate || samples.is_empty() {
        return samples.to_vec();
    }

    use rubato::{
        Resampler, SincFixedIn, SincInterpolationParameters, SincInterpolationType, WindowFunction,
    };

    let params = SincInterpolationParameters {
        sinc_len: 256,
        f_cutoff: 0.95,
        interpolation: SincInterpolationType::Linear,
        oversampling_factor: 256,
        window: WindowFunction::BlackmanHarris2,
    };

    match SincFixedIn::<f32>::new(
        target_rate as f64 / source_rate as f64,
        2.0,
        params,
        samples.len(),
        1,
    ) {
        Ok(mut resampler) => {
            let input = vec![samples.to_vec()];
            match resampler.process(&input, None) {
                Ok(output) => output.into_iter().next().unwrap_or_default(),
                Err(e) => {
                    tracing::warn!(error = %e, "resampling failed, passing samples through");
                    samples.to_vec()
                }
            }
        }
        Err(e) => {
            tracing::warn!(error = %e, "resampler init failed, passing samples through");
            samples.to_vec()
        }
    }
}

// ---------------------------------------------------------------------------
// Playback
// ---------------------------------------------------------------------------

struct Playback {
    // The Sink is sendable; the OutputStream it plays through lives on the
    // playback thread.
    sink: Sink,
    stop_tx: std_mpsc::Sender<()>,
}

impl Playback {
    fn start() -> Result<Self, ConvaiError> {
        let (ready_tx, ready_rx) = std_mpsc::channel::<Result<Sink, ConvaiError>>();
        let (stop_tx, stop_rx) = std_mpsc::channel::<()>();

        thread::spawn(move || {
            let stream = match OutputStream::try_default() {
                Ok((stream, handle)) => match Sink::try_new(&handle) {
                    Ok(sink) => {
                        let _ = ready_tx.send(Ok(sink));
                        stream
                    }
                    Err(e) => {
                        let _ = ready_tx.send(Err(ConvaiError::Audio(e.to_string())));
                        return;
                    }
                },
                Err(e) => {
                    let _ = ready_tx.send(Err(ConvaiError::Audio(e.to_string())));
                    return;
                }
            };
            let _ = stop_rx.recv();
            drop(stream);
        });

        let sink = ready_rx
            .recv()
            .map_err(|_| ConvaiError::Audio("playback thread exited during setup".into()))??;
        Ok(Self { sink, stop_tx })
    }

    fn append(&self, pcm: &[i16]) {
        let source = SamplesBuffer::new(1, SAMPLE_RATE, pcm.to_vec());
        self.sink.append(source);
    }

    /// Drops queued audio and the currently-playing chunk. clear() empties
    /// the queue but leaves the active source running; skip_one() drops it,
    /// and play() un-pauses so later appends are audible again.
    fn clear(&self) {
        self.sink.clear();
        self.sink.skip_one();
        self.sink.play();
    }
}

impl Drop for Playback {
    fn drop(&mut self) {
        let _ = self.stop_tx.send(());
    }
}

#[cfg(test)]
mod tests {
    use super::resample;

    fn tone(freq_hz: f32, sample_rate: u32, len: usize) -> Vec<f32> {
        (0..len)
            .map(|i| (2.0 * std::f32::consts::PI * freq_hz * i as f32 / sample_rate as f32).sin())
            .collect()
    }

    fn rms(samples: &[f32]) -> f32 {
        (samples.iter().map(|s| s * s).sum::<f32>() / samples.len() as f32).sqrt()
    }

    #[test]
    fn resample_noop_at_matching_rates() {
        let samples = vec![0.1, 0.2, 0.3];
        assert_eq!(resample(&samples, 16_000, 16_000), samples);
    }

    #[test]
    fn speech_band_tone_survives_downsampling() {
        // 1 kHz sits well inside the 16 kHz passband; a full-scale sine has
        // RMS ~0.707 and should come through near full power.
        let input = tone(1_000.0, 48_000, 9_600);
        let out = resample(&input, 48_000, 16_000);
        assert!(!out.is_empty());
        assert!(rms(&out) > 0.5, "passband RMS too low: {}", rms(&out));
    }

    #[test]
    fn content_above_target_nyquist_is_suppressed() {
        // 10 kHz is above the 8 kHz Nyquist of the 16 kHz target; without a
        // low-pass it would fold back onto 6 kHz at full power.
        let input = tone(10_000.0, 48_000, 9_600);
        let out = resample(&input, 48_000, 16_000);
        assert!(!out.is_empty());
        assert!(rms(&out) < 0.05, "aliased energy leaked: {}", rms(&out));
    }
}
