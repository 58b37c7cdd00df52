//! WAV renderer — renders a held vowel to a WAV byte buffer.

use super::synth::VowelSynth;
use crate::engine::AudioEngine;
use crate::error::RenderError;
use crate::playback::SynthesisParams;

/// Noise seed for offline renders, so previews are reproducible.
const RENDER_SEED: u64 = 0x5eed;

pub const MIN_SAMPLE_RATE: u32 = 8_000;
pub const MAX_SAMPLE_RATE: u32 = 192_000;
/// Longest preview, in seconds.
pub const MAX_SECONDS: f64 = 60.0;

/// Render `seconds` of a vowel with fixed parameters (16-bit mono PCM).
pub fn render_vowel_wav(
    params: &SynthesisParams,
    seconds: f64,
    sample_rate: u32,
) -> Result<Vec<u8>, RenderError> {
    if !(MIN_SAMPLE_RATE..=MAX_SAMPLE_RATE).contains(&sample_rate) {
        return Err(RenderError::SampleRate {
            rate: sample_rate,
            min: MIN_SAMPLE_RATE,
            max: MAX_SAMPLE_RATE,
        });
    }
    if !(0.0..=MAX_SECONDS).contains(&seconds) {
        return Err(RenderError::Duration {
            seconds,
            max: MAX_SECONDS,
        });
    }

    let mut synth = VowelSynth::new(sample_rate as f64, RENDER_SEED);
    synth.apply(params);
    synth.start();
    let count = (seconds * sample_rate as f64).round() as usize;
    let pcm: Vec<i16> = synth
        .render(count)
        .into_iter()
        .map(|s| (s.clamp(-1.0, 1.0) * i16::MAX as f64) as i16)
        .collect();
    synth.stop();

    log::debug!("rendered {count} samples at {sample_rate} Hz");
    Ok(encode_wav(&pcm, sample_rate))
}

/// RIFF/WAVE container around mono 16-bit PCM.
fn encode_wav(pcm: &[i16], sample_rate: u32) -> Vec<u8> {
    const FRAME_BYTES: u16 = 2;
    let data_len = (pcm.len() * FRAME_BYTES as usize) as u32;
    let header: [&[u8]; 12] = [
        b"RIFF",
        &(36 + data_len).to_le_bytes(),
        b"WAVEfmt ",
        &16u32.to_le_bytes(),
        &1u16.to_le_bytes(),
        &1u16.to_le_bytes(),
        &sample_rate.to_le_bytes(),
        &(sample_rate * FRAME_BYTES as u32).to_le_bytes(),
        &FRAME_BYTES.to_le_bytes(),
        &16u16.to_le_bytes(),
        b"data",
        &data_len.to_le_bytes(),
    ];
    let mut wav = header.concat();
    wav.reserve(data_len as usize);
    wav.extend(pcm.iter().flat_map(|s| s.to_le_bytes()));
    wav
}
