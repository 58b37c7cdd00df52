//! Playback parameter derivation.
//!
//! Turns the active formants and the voice-source mode into the settings
//! of the synthesis graph: four parallel band-pass filters fed by a
//! sawtooth/FM tone source and a white-noise source.

use serde::{Deserialize, Serialize};

use crate::catalog::ResolvedVowel;
use crate::range::{Formant, SpeakerCategory, default_f0};

/// Band-pass Q factor per formant (F1..F4).
pub const BANDPASS_Q: [f64; 4] = [10.0, 15.0, 25.0, 35.0];

/// Glottal source selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoiceSourceMode {
    #[default]
    Voiced,
    Whisper,
    Vibrato,
}

impl VoiceSourceMode {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "voiced" => Some(VoiceSourceMode::Voiced),
            "whisper" => Some(VoiceSourceMode::Whisper),
            "vibrato" => Some(VoiceSourceMode::Vibrato),
            _ => None,
        }
    }
}

/// Current synthesis targets, all in Hz.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ActiveFormants {
    pub f1: f64,
    pub f2: f64,
    pub f3: f64,
    pub f4: f64,
    pub f0: f64,
}

impl ActiveFormants {
    /// Neutral schwa (Fant 1960) at the speaker's default pitch.
    pub fn schwa(speaker: SpeakerCategory) -> Self {
        ActiveFormants {
            f1: 500.0,
            f2: 1500.0,
            f3: 2500.0,
            f4: 3500.0,
            f0: default_f0(speaker),
        }
    }

    pub fn set(&mut self, formant: Formant, value: f64) {
        match formant {
            Formant::F1 => self.f1 = value,
            Formant::F2 => self.f2 = value,
            Formant::F3 => self.f3 = value,
            Formant::F4 => self.f4 = value,
        }
    }

    pub fn get(&self, formant: Formant) -> f64 {
        match formant {
            Formant::F1 => self.f1,
            Formant::F2 => self.f2,
            Formant::F3 => self.f3,
            Formant::F4 => self.f4,
        }
    }

    /// Replace F1–F4 with a reference vowel's values. F0 is kept.
    pub fn snap_to(&mut self, vowel: &ResolvedVowel) {
        self.f1 = vowel.f1;
        self.f2 = vowel.f2;
        self.f3 = vowel.f3;
        self.f4 = vowel.f4;
    }
}

/// Everything the audio engine needs for one update.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SynthesisParams {
    pub bandpass_f1: f64,
    pub bandpass_f2: f64,
    pub bandpass_f3: f64,
    pub bandpass_f4: f64,
    pub bandpass_q: [f64; 4],
    pub oscillator_f0: f64,
    /// FM modulator/carrier ratio; absent when the tone source is muted.
    pub harmonicity: Option<f64>,
    pub modulation_index: Option<f64>,
    pub tone_volume_db: f64,
    pub noise_volume_db: f64,
}

impl SynthesisParams {
    pub fn bandpass_frequencies(&self) -> [f64; 4] {
        [
            self.bandpass_f1,
            self.bandpass_f2,
            self.bandpass_f3,
            self.bandpass_f4,
        ]
    }
}

struct SourceLevels {
    harmonicity: Option<f64>,
    modulation_index: Option<f64>,
    tone_db: f64,
    noise_db: f64,
}

fn source_levels(mode: VoiceSourceMode) -> SourceLevels {
    match mode {
        VoiceSourceMode::Voiced => SourceLevels {
            harmonicity: Some(1.0),
            modulation_index: Some(0.0),
            tone_db: 3.0,
            noise_db: -18.0,
        },
        VoiceSourceMode::Whisper => SourceLevels {
            harmonicity: None,
            modulation_index: None,
            tone_db: -40.0,
            noise_db: -12.0,
        },
        VoiceSourceMode::Vibrato => SourceLevels {
            harmonicity: Some(0.8),
            modulation_index: Some(0.08),
            tone_db: 0.0,
            noise_db: -18.0,
        },
    }
}

/// Derive synthesis parameters. Pure; never fails.
///
/// The oscillator runs at the active F0 when it is a usable frequency,
/// otherwise at `speaker_f0_default`.
pub fn derive(
    formants: &ActiveFormants,
    mode: VoiceSourceMode,
    speaker_f0_default: f64,
) -> SynthesisParams {
    let levels = source_levels(mode);
    let oscillator_f0 = if formants.f0.is_finite() && formants.f0 > 0.0 {
        formants.f0
    } else {
        speaker_f0_default
    };
    SynthesisParams {
        bandpass_f1: formants.f1,
        bandpass_f2: formants.f2,
        bandpass_f3: formants.f3,
        bandpass_f4: formants.f4,
        bandpass_q: BANDPASS_Q,
        oscillator_f0,
        harmonicity: levels.harmonicity,
        modulation_index: levels.modulation_index,
        tone_volume_db: levels.tone_db,
        noise_volume_db: levels.noise_db,
    }
}

/// Convert decibels to linear gain.
pub fn db_to_gain(db: f64) -> f64 {
    10f64.powf(db / 20.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn voiced_levels() {
        let formants = ActiveFormants::schwa(SpeakerCategory::Male);
        let p = derive(&formants, VoiceSourceMode::Voiced, 110.0);
        assert_eq!(p.harmonicity, Some(1.0));
        assert_eq!(p.modulation_index, Some(0.0));
        assert_eq!(p.tone_volume_db, 3.0);
        assert_eq!(p.noise_volume_db, -18.0);
    }

    #[test]
    fn whisper_levels_ignore_inputs() {
        let inputs = [
            ActiveFormants::schwa(SpeakerCategory::Male),
            ActiveFormants::schwa(SpeakerCategory::Female),
            ActiveFormants {
                f1: 900.0,
                f2: 800.0,
                f3: 0.0,
                f4: 10_000.0,
                f0: -5.0,
            },
        ];
        for formants in inputs {
            for default in [0.0, 110.0, 180.0] {
                let p = derive(&formants, VoiceSourceMode::Whisper, default);
                assert_eq!(p.tone_volume_db, -40.0);
                assert_eq!(p.noise_volume_db, -12.0);
                assert_eq!(p.harmonicity, None);
                assert_eq!(p.modulation_index, None);
            }
        }
    }

    #[test]
    fn vibrato_levels() {
        let formants = ActiveFormants::schwa(SpeakerCategory::Female);
        let p = derive(&formants, VoiceSourceMode::Vibrato, 180.0);
        assert_eq!(p.harmonicity, Some(0.8));
        assert_eq!(p.modulation_index, Some(0.08));
        assert_eq!(p.tone_volume_db, 0.0);
        assert_eq!(p.noise_volume_db, -18.0);
    }

    #[test]
    fn bandpass_follows_formants() {
        let formants = ActiveFormants {
            f1: 342.0,
            f2: 2322.0,
            f3: 3000.0,
            f4: 3657.0,
            f0: 120.0,
        };
        let p = derive(&formants, VoiceSourceMode::Voiced, 110.0);
        assert_eq!(p.bandpass_frequencies(), [342.0, 2322.0, 3000.0, 3657.0]);
        assert_eq!(p.bandpass_q, BANDPASS_Q);
        assert_eq!(p.oscillator_f0, 120.0);
    }

    #[test]
    fn unusable_f0_falls_back_to_default() {
        let mut formants = ActiveFormants::schwa(SpeakerCategory::Male);
        formants.f0 = 0.0;
        assert_eq!(derive(&formants, VoiceSourceMode::Voiced, 180.0).oscillator_f0, 180.0);
        formants.f0 = f64::NAN;
        assert_eq!(derive(&formants, VoiceSourceMode::Voiced, 110.0).oscillator_f0, 110.0);
    }

    #[test]
    fn set_and_get_fields() {
        let mut f = ActiveFormants::schwa(SpeakerCategory::Male);
        f.set(Formant::F3, 2700.0);
        assert_eq!(f.get(Formant::F3), 2700.0);
        assert_eq!(f.f0, 110.0);
    }

    #[test]
    fn db_conversion() {
        assert!((db_to_gain(0.0) - 1.0).abs() < 1e-12);
        assert!((db_to_gain(-20.0) - 0.1).abs() < 1e-12);
    }

    #[test]
    fn params_serialize_camel_case() {
        let formants = ActiveFormants::schwa(SpeakerCategory::Male);
        let p = derive(&formants, VoiceSourceMode::Whisper, 110.0);
        let json = serde_json::to_value(p).unwrap();
        assert_eq!(json["toneVolumeDb"], -40.0);
        assert_eq!(json["oscillatorF0"], 110.0);
        assert!(json["harmonicity"].is_null());
    }
}
