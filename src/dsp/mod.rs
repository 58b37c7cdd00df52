//! DSP module — native vowel synthesis for offline previews and tests.
//!
//! Mirrors the browser graph the host builds from [`SynthesisParams`]:
//! tone and noise sources into four parallel formant band-passes.
//!
//! [`SynthesisParams`]: crate::playback::SynthesisParams

pub mod filter;
pub mod oscillator;
pub mod renderer;
pub mod synth;

pub use renderer::render_vowel_wav;
pub use synth::VowelSynth;
