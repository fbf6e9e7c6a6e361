//! Audio seam for live sessions.
//!
//! The ConvAI socket speaks 16 kHz mono s16le PCM, base64-encoded inside JSON
//! frames. The session loop is device-agnostic: it pulls microphone chunks
//! from whatever [`AudioInterface`] was supplied and pushes agent audio back
//! into it. The cpal/rodio implementation lives in the agent binary so this
//! crate carries no audio-device dependencies.

use crate::error::ConvaiError;
use base64::Engine;
use tokio::sync::mpsc;

/// Sample rate expected on both directions of the conversation socket.
pub const SAMPLE_RATE: u32 = 16_000;

/// Local audio capture and playback for a live session.
pub trait AudioInterface: Send {
    /// Starts capturing microphone audio. Captured chunks (16 kHz mono s16le)
    /// are delivered through `input_tx` until [`stop`](Self::stop) is called.
    fn start(&mut self, input_tx: mpsc::UnboundedSender<Vec<i16>>) -> Result<(), ConvaiError>;

    /// Queues agent audio for playback.
    fn play(&mut self, pcm: &[i16]);

    /// Drops any queued playback. Called when the agent is interrupted.
    fn stop_playback(&mut self) {}

    /// Tears down capture and playback at the end of the session.
    fn stop(&mut self);
}

/// Encodes PCM samples as the base64 payload of a `user_audio_chunk` message.
pub fn pcm_to_base64(pcm: &[i16]) -> String {
    let mut bytes = Vec::with_capacity(pcm.len() * 2);
    for sample in pcm {
        bytes.extend_from_slice(&sample.to_le_bytes());
    }
    base64::engine::general_purpose::STANDARD.encode(bytes)
}

/// Decodes the base64 payload of an `audio` event into PCM samples.
///
/// A trailing odd byte is discarded rather than rejected; the upstream encoder
/// always emits whole samples.
pub fn base64_to_pcm(payload: &str) -> Result<Vec<i16>, ConvaiError> {
    let bytes = base64::engine::general_purpose::STANDARD
        .decode(payload)
        .map_err(|e| ConvaiError::Audio(format!("invalid base64 audio payload: {}", e)))?;
    Ok(bytes
        .chunks_exact(2)
        .map(|pair| i16::from_le_bytes([pair[0], pair[1]]))
        .collect())
}
