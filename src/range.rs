//! Acoustic range table — per-speaker formant bounds.
//!
//! The bounds define the corners of the vowel quadrilateral in formant
//! space. Values follow the classic adult vowel-space limits (Fant 1960,
//! Peterson & Barney 1952) and are fixed at compile time.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::RangeError;

/// Coarse voice type used to pick formant range defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpeakerCategory {
    #[default]
    Male,
    Female,
}

impl SpeakerCategory {
    pub const ALL: [SpeakerCategory; 2] = [SpeakerCategory::Male, SpeakerCategory::Female];

    pub fn as_str(self) -> &'static str {
        match self {
            SpeakerCategory::Male => "male",
            SpeakerCategory::Female => "female",
        }
    }

    /// Parse a selector value ("male" / "female").
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "male" => Some(SpeakerCategory::Male),
            "female" => Some(SpeakerCategory::Female),
            _ => None,
        }
    }
}

impl fmt::Display for SpeakerCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Formant bounds for one speaker category, all in Hz.
///
/// `f2_mid1` and `f2_mid2` are the F2 values at the front and back
/// corners of the open (bottom) edge of the quadrilateral.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AcousticRange {
    pub f1_min: f64,
    pub f1_max: f64,
    pub f2_min: f64,
    pub f2_mid1: f64,
    pub f2_mid2: f64,
    pub f2_max: f64,
    pub f3_min: f64,
    pub f3_max: f64,
    pub f4_min: f64,
    pub f4_max: f64,
}

pub const MALE_RANGE: AcousticRange = AcousticRange {
    f1_min: 250.0,
    f1_max: 750.0,
    f2_min: 500.0,
    f2_mid1: 1750.0,
    f2_mid2: 760.0,
    f2_max: 2500.0,
    f3_min: 1600.0,
    f3_max: 3100.0,
    f4_min: 3000.0,
    f4_max: 4200.0,
};

pub const FEMALE_RANGE: AcousticRange = AcousticRange {
    f1_min: 300.0,
    f1_max: 1100.0,
    f2_min: 800.0,
    f2_mid1: 2150.0,
    f2_mid2: 1020.0,
    f2_max: 3000.0,
    f3_min: 1900.0,
    f3_max: 3500.0,
    f4_min: 3500.0,
    f4_max: 4700.0,
};

/// Mean speaking pitch per category, used as the F0 default.
const MALE_F0_HZ: f64 = 110.0;
const FEMALE_F0_HZ: f64 = 180.0;

/// Offset added to F3 when a reference vowel has no measured F4.
const MALE_F4_OFFSET_HZ: f64 = 1000.0;
const FEMALE_F4_OFFSET_HZ: f64 = 1100.0;

/// Look up the acoustic range for a speaker category.
pub fn range_for(speaker: SpeakerCategory) -> AcousticRange {
    match speaker {
        SpeakerCategory::Male => MALE_RANGE,
        SpeakerCategory::Female => FEMALE_RANGE,
    }
}

/// Default fundamental frequency for a speaker category.
pub fn default_f0(speaker: SpeakerCategory) -> f64 {
    match speaker {
        SpeakerCategory::Male => MALE_F0_HZ,
        SpeakerCategory::Female => FEMALE_F0_HZ,
    }
}

/// F3 → F4 offset used when F4 must be derived.
pub fn f4_offset(speaker: SpeakerCategory) -> f64 {
    match speaker {
        SpeakerCategory::Male => MALE_F4_OFFSET_HZ,
        SpeakerCategory::Female => FEMALE_F4_OFFSET_HZ,
    }
}

/// Validate every entry of the table. Called once at session startup.
pub fn validate_table() -> Result<(), RangeError> {
    for speaker in SpeakerCategory::ALL {
        range_for(speaker).validate(speaker)?;
    }
    Ok(())
}

impl AcousticRange {
    pub fn validate(&self, speaker: SpeakerCategory) -> Result<(), RangeError> {
        let bounds = [
            ("F1", self.f1_min, self.f1_max),
            ("F2", self.f2_min, self.f2_max),
            ("F3", self.f3_min, self.f3_max),
            ("F4", self.f4_min, self.f4_max),
        ];
        for (formant, min, max) in bounds {
            if !(min.is_finite() && max.is_finite()) || min <= 0.0 || min >= max {
                return Err(RangeError::InvalidBounds {
                    speaker,
                    formant,
                    min,
                    max,
                });
            }
        }

        for mid in [self.f2_mid1, self.f2_mid2] {
            if !(mid > self.f2_min && mid < self.f2_max) {
                return Err(RangeError::PartitionOutOfRange { speaker, value: mid });
            }
        }
        // The open edge runs front (high F2) to back (low F2).
        if self.f2_mid2 >= self.f2_mid1 {
            return Err(RangeError::PartitionOrder {
                speaker,
                mid1: self.f2_mid1,
                mid2: self.f2_mid2,
            });
        }
        Ok(())
    }

    /// Width of the F1 interval in Hz.
    pub fn f1_span(&self) -> f64 {
        self.f1_max - self.f1_min
    }

    /// Width of the F2 interval in Hz.
    pub fn f2_span(&self) -> f64 {
        self.f2_max - self.f2_min
    }

    /// Bounds for a numeric input field, indexed 1–4.
    pub fn bounds(&self, formant: Formant) -> (f64, f64) {
        match formant {
            Formant::F1 => (self.f1_min, self.f1_max),
            Formant::F2 => (self.f2_min, self.f2_max),
            Formant::F3 => (self.f3_min, self.f3_max),
            Formant::F4 => (self.f4_min, self.f4_max),
        }
    }
}

/// Names one of the four editable formant fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Formant {
    F1,
    F2,
    F3,
    F4,
}

impl Formant {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "F1" | "f1" => Some(Formant::F1),
            "F2" | "f2" => Some(Formant::F2),
            "F3" | "f3" => Some(Formant::F3),
            "F4" | "f4" => Some(Formant::F4),
            _ => None,
        }
    }
}
