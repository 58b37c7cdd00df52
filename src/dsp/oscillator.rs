//! Glottal tone source: a PolyBLEP sawtooth carrier with optional FM.

use std::f64::consts::PI;

/// FM sawtooth, as in the browser FM oscillator: the modulator runs at
/// `frequency * harmonicity` and deviates the carrier by
/// `modulation_index * modulator frequency` Hz.
#[derive(Debug, Clone)]
pub struct FmSawtooth {
    pub frequency: f64,
    /// `None` runs the carrier unmodulated.
    pub harmonicity: Option<f64>,
    pub modulation_index: f64,
    carrier_phase: f64,
    modulator_phase: f64,
    sample_rate: f64,
}

impl FmSawtooth {
    pub fn new(frequency: f64, sample_rate: f64) -> Self {
        FmSawtooth {
            frequency,
            harmonicity: None,
            modulation_index: 0.0,
            carrier_phase: 0.0,
            modulator_phase: 0.0,
            sample_rate,
        }
    }

    /// Instantaneous carrier frequency for the current modulator phase.
    fn instantaneous_freq(&self) -> f64 {
        match self.harmonicity {
            Some(h) if self.modulation_index != 0.0 => {
                let deviation = self.modulation_index * self.frequency * h;
                self.frequency + deviation * (2.0 * PI * self.modulator_phase).sin()
            }
            _ => self.frequency,
        }
    }

    pub fn next_sample(&mut self) -> f64 {
        let inc = (self.instantaneous_freq() / self.sample_rate).abs();
        let sample = 2.0 * self.carrier_phase - 1.0 - poly_blep(self.carrier_phase, inc);

        self.carrier_phase = (self.carrier_phase + inc).fract();
        if let Some(h) = self.harmonicity {
            let step = self.frequency * h / self.sample_rate;
            self.modulator_phase = (self.modulator_phase + step).fract();
        }
        sample
    }

    pub fn reset(&mut self) {
        self.carrier_phase = 0.0;
        self.modulator_phase = 0.0;
    }
}

/// PolyBLEP correction around the sawtooth wrap.
///
/// `t` is the phase in [0, 1), `dt` the phase increment per sample.
fn poly_blep(t: f64, dt: f64) -> f64 {
    if dt <= 0.0 {
        0.0
    } else if t < dt {
        let t = t / dt;
        2.0 * t - t * t - 1.0
    } else if t > 1.0 - dt {
        let t = (t - 1.0) / dt;
        t * t + 2.0 * t + 1.0
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sawtooth_range() {
        let mut osc = FmSawtooth::new(110.0, 44100.0);
        for _ in 0..44100 {
            let s = osc.next_sample();
            assert!((-1.5..=1.5).contains(&s), "saw out of range: {s}");
        }
    }

    #[test]
    fn unmodulated_period_matches_frequency() {
        let mut osc = FmSawtooth::new(100.0, 44100.0);
        // count wraps over one second: one per period
        let mut wraps = 0;
        let mut prev = osc.next_sample();
        for _ in 1..44100 {
            let s = osc.next_sample();
            if s < prev - 0.5 {
                wraps += 1;
            }
            prev = s;
        }
        assert!((99..=101).contains(&wraps), "expected ~100 periods, got {wraps}");
    }

    #[test]
    fn fm_stays_finite_and_bounded() {
        let mut osc = FmSawtooth::new(180.0, 44100.0);
        osc.harmonicity = Some(0.8);
        osc.modulation_index = 0.08;
        for _ in 0..44100 {
            let s = osc.next_sample();
            assert!(s.is_finite() && s.abs() <= 1.5, "bad FM sample {s}");
        }
    }

    #[test]
    fn zero_index_is_plain_carrier() {
        let mut plain = FmSawtooth::new(110.0, 44100.0);
        let mut fm = FmSawtooth::new(110.0, 44100.0);
        fm.harmonicity = Some(1.0);
        fm.modulation_index = 0.0;
        for _ in 0..1000 {
            assert_eq!(plain.next_sample(), fm.next_sample());
        }
    }
}
