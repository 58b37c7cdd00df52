//! Offline vowel synthesizer.
//!
//! Signal graph: FM sawtooth tone + white noise, each with its own gain,
//! summed into four parallel formant band-passes, then soft-clipped.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use super::filter::FormantBank;
use super::oscillator::FmSawtooth;
use crate::engine::AudioEngine;
use crate::playback::{BANDPASS_Q, SynthesisParams, db_to_gain};

/// Output gain ahead of the clipper.
const MASTER_GAIN: f64 = 0.8;

/// An [`AudioEngine`] that renders samples on demand.
#[derive(Debug, Clone)]
pub struct VowelSynth {
    sample_rate: f64,
    tone: FmSawtooth,
    bank: FormantBank,
    rng: SmallRng,
    tone_gain: f64,
    noise_gain: f64,
    running: bool,
}

impl VowelSynth {
    pub fn new(sample_rate: f64, seed: u64) -> Self {
        VowelSynth {
            sample_rate,
            tone: FmSawtooth::new(110.0, sample_rate),
            bank: FormantBank::new([500.0, 1500.0, 2500.0, 3500.0], BANDPASS_Q, sample_rate),
            rng: SmallRng::seed_from_u64(seed),
            tone_gain: 0.0,
            noise_gain: 0.0,
            running: false,
        }
    }

    pub fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    pub fn next_sample(&mut self) -> f64 {
        if !self.running {
            return 0.0;
        }
        let tone = self.tone.next_sample() * self.tone_gain;
        let noise = white_noise(&mut self.rng) * self.noise_gain;
        soft_clip(self.bank.process(tone + noise) * MASTER_GAIN)
    }

    /// Render `count` samples. Silence while stopped.
    pub fn render(&mut self, count: usize) -> Vec<f64> {
        (0..count).map(|_| self.next_sample()).collect()
    }
}

impl AudioEngine for VowelSynth {
    fn apply(&mut self, params: &SynthesisParams) {
        self.bank.set(params.bandpass_frequencies(), params.bandpass_q);
        self.tone.frequency = params.oscillator_f0;
        self.tone.harmonicity = params.harmonicity;
        self.tone.modulation_index = params.modulation_index.unwrap_or(0.0);
        self.tone_gain = db_to_gain(params.tone_volume_db);
        self.noise_gain = db_to_gain(params.noise_volume_db);
    }

    fn start(&mut self) {
        if !self.running {
            self.tone.reset();
            self.bank.reset();
        }
        self.running = true;
    }

    fn stop(&mut self) {
        self.running = false;
    }

    fn is_running(&self) -> bool {
        self.running
    }
}

/// Uniform noise in -1 ..= 1.
fn white_noise<R: Rng>(rng: &mut R) -> f64 {
    rng.random_range(-1.0..=1.0)
}

fn soft_clip(x: f64) -> f64 {
    x.tanh()
}
