//! Formant band-pass filters, WebAudio `BiquadFilterNode` "bandpass" flavour.

use std::f64::consts::PI;

/// A 2nd-order band-pass with 0 dB peak gain at the centre frequency.
///
/// Direct Form II Transposed, coefficients from the Audio EQ Cookbook.
#[derive(Debug, Clone)]
pub struct Bandpass {
    frequency: f64,
    q: f64,

    b0: f64,
    b2: f64,
    a1: f64,
    a2: f64,

    z1: f64,
    z2: f64,

    sample_rate: f64,
}

impl Bandpass {
    pub fn new(frequency: f64, q: f64, sample_rate: f64) -> Self {
        let mut f = Bandpass {
            frequency,
            q,
            b0: 0.0,
            b2: 0.0,
            a1: 0.0,
            a2: 0.0,
            z1: 0.0,
            z2: 0.0,
            sample_rate,
        };
        f.update_coefficients();
        f
    }

    pub fn frequency(&self) -> f64 {
        self.frequency
    }

    pub fn q(&self) -> f64 {
        self.q
    }

    /// Retune. State is kept so moving the cursor does not click.
    pub fn set(&mut self, frequency: f64, q: f64) {
        if frequency == self.frequency && q == self.q {
            return;
        }
        self.frequency = frequency;
        self.q = q;
        self.update_coefficients();
    }

    fn update_coefficients(&mut self) {
        // keep the centre below Nyquist and Q positive, as WebAudio does
        let nyquist = self.sample_rate / 2.0;
        let freq = self.frequency.min(nyquist * 0.999).max(1.0);
        let q = self.q.max(1e-4);

        let w0 = 2.0 * PI * freq / self.sample_rate;
        let alpha = w0.sin() / (2.0 * q);
        let a0 = 1.0 + alpha;

        self.b0 = alpha / a0;
        self.b2 = -alpha / a0;
        self.a1 = -2.0 * w0.cos() / a0;
        self.a2 = (1.0 - alpha) / a0;
    }

    pub fn process(&mut self, input: f64) -> f64 {
        let output = self.b0 * input + self.z1;
        self.z1 = -self.a1 * output + self.z2;
        self.z2 = self.b2 * input - self.a2 * output;
        output
    }

    pub fn reset(&mut self) {
        self.z1 = 0.0;
        self.z2 = 0.0;
    }
}

/// Four parallel band-passes, one per formant, summed.
#[derive(Debug, Clone)]
pub struct FormantBank {
    filters: [Bandpass; 4],
}

impl FormantBank {
    pub fn new(frequencies: [f64; 4], q: [f64; 4], sample_rate: f64) -> Self {
        FormantBank {
            filters: std::array::from_fn(|i| Bandpass::new(frequencies[i], q[i], sample_rate)),
        }
    }

    pub fn set(&mut self, frequencies: [f64; 4], q: [f64; 4]) {
        for (i, f) in self.filters.iter_mut().enumerate() {
            f.set(frequencies[i], q[i]);
        }
    }

    pub fn filters(&self) -> &[Bandpass; 4] {
        &self.filters
    }

    pub fn process(&mut self, input: f64) -> f64 {
        self.filters.iter_mut().map(|f| f.process(input)).sum()
    }

    pub fn reset(&mut self) {
        self.filters.iter_mut().for_each(Bandpass::reset);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SR: f64 = 44100.0;

    fn sine_peak(filter: &mut Bandpass, freq: f64) -> f64 {
        let mut peak = 0.0_f64;
        for i in 0..8820 {
            let t = i as f64 / SR;
            let out = filter.process((2.0 * PI * freq * t).sin());
            if i > 4410 {
                peak = peak.max(out.abs());
            }
        }
        peak
    }

    #[test]
    fn unity_gain_at_centre() {
        let mut f = Bandpass::new(1000.0, 10.0, SR);
        let peak = sine_peak(&mut f, 1000.0);
        assert!((peak - 1.0).abs() < 0.02, "centre gain should be ~1, got {peak}");
    }

    #[test]
    fn attenuates_off_centre() {
        let mut f = Bandpass::new(500.0, 10.0, SR);
        let peak = sine_peak(&mut f, 3000.0);
        assert!(peak < 0.05, "3 kHz through a 500 Hz Q10 band-pass, got {peak}");
    }

    #[test]
    fn blocks_dc() {
        let mut f = Bandpass::new(700.0, 15.0, SR);
        let mut out = 1.0;
        for _ in 0..20000 {
            out = f.process(1.0);
        }
        assert!(out.abs() < 1e-3, "band-pass should block DC, got {out}");
    }

    #[test]
    fn out_of_band_frequency_stays_stable() {
        let mut f = Bandpass::new(40_000.0, 35.0, SR);
        for i in 0..10000 {
            let input = if i % 100 == 0 { 1.0 } else { 0.0 };
            let out = f.process(input);
            assert!(out.is_finite(), "output not finite at sample {i}");
        }
    }

    #[test]
    fn tiny_sample_rate_does_not_panic() {
        let mut f = Bandpass::new(500.0, 10.0, 1.0);
        assert!(f.process(1.0).is_finite());
    }

    #[test]
    fn bank_retunes_every_filter() {
        let q = [10.0, 15.0, 25.0, 35.0];
        let mut bank = FormantBank::new([500.0, 1500.0, 2500.0, 3500.0], q, SR);
        bank.set([342.0, 2322.0, 3000.0, 3657.0], q);
        let freqs: Vec<f64> = bank.filters().iter().map(Bandpass::frequency).collect();
        assert_eq!(freqs, vec![342.0, 2322.0, 3000.0, 3657.0]);
        assert_eq!(bank.filters()[3].q(), 35.0);
    }
}
