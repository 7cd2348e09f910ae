//! Decoding helpers for the narration service payload.

use crate::{Result, SpeechError};
use base64::Engine;

/// Fixed framing of the narration service output.
pub const NARRATION_SAMPLE_RATE_HZ: u32 = 24_000;
pub const NARRATION_CHANNELS: u16 = 1;

/// Decode the base64 payload returned by the narration service.
pub fn decode_base64(payload: &str) -> Result<Vec<u8>> {
    base64::engine::general_purpose::STANDARD
        .decode(payload)
        .map_err(|_| SpeechError::Decode("payload is not valid base64"))
}

/// Decode mono PCM16-LE bytes into normalized f32 samples.
///
/// Samples are divided by 32768 so the result lies in [-1.0, 1.0).
pub fn decode_pcm16(bytes: &[u8]) -> Result<Vec<f32>> {
    if bytes.len() % 2 != 0 {
        return Err(SpeechError::Decode("PCM16 payload has odd length"));
    }
    Ok(bytes
        .chunks_exact(2)
        .map(|pair| {
            let v = i16::from_le_bytes([pair[0], pair[1]]);
            v as f32 / 32768.0
        })
        .collect())
}

/// Encode f32 samples back to base64 PCM16-LE. Used by mocks and tests.
pub fn encode_pcm16(samples: &[f32]) -> String {
    let bytes: Vec<u8> = samples
        .iter()
        .flat_map(|s| {
            let v = (s.clamp(-1.0, 1.0) * 32768.0) as i32;
            let v = v.clamp(i16::MIN as i32, i16::MAX as i32) as i16;
            v.to_le_bytes()
        })
        .collect();
    base64::engine::general_purpose::STANDARD.encode(bytes)
}
