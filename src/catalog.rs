//! Reference vowel catalog.
//!
//! The catalog is a single declarative JSON asset keyed by reference
//! language and speaker category. Every set carries the published study it
//! was taken from. Missing F3/F4 values stay missing in the data and are
//! estimated on lookup.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::CatalogError;
use crate::range::{SpeakerCategory, f4_offset};

/// The built-in catalog asset.
pub const BUILTIN_CATALOG_JSON: &str = include_str!("../data/reference_vowels.json");

/// F2 at or below this value selects the back-vowel F3 regression.
pub const F3_BRANCH_F2_HZ: f64 = 1500.0;

// ── Catalog data (as stored) ────────────────────────────────

/// A vowel as measured in a published study. F3/F4 may be absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceVowel {
    pub label: String,
    pub f1: f64,
    pub f2: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub f3: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub f4: Option<f64>,
}

/// One ordered vowel list with its citation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VowelSetData {
    pub source: String,
    pub vowels: Vec<ReferenceVowel>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SpeakerSets {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub male: Option<VowelSetData>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub female: Option<VowelSetData>,
}

impl SpeakerSets {
    pub fn get(&self, speaker: SpeakerCategory) -> Option<&VowelSetData> {
        match speaker {
            SpeakerCategory::Male => self.male.as_ref(),
            SpeakerCategory::Female => self.female.as_ref(),
        }
    }
}

/// A reference language (or reference system such as the cardinal vowels).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Language {
    pub id: String,
    pub name: String,
    /// Languages that only exist for one speaker category always return
    /// that category's data.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub forced_speaker: Option<SpeakerCategory>,
    pub sets: SpeakerSets,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VowelCatalog {
    languages: Vec<Language>,
}

/// Summary of a language for selector widgets.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LanguageInfo {
    pub id: String,
    pub name: String,
    pub forced_speaker: Option<SpeakerCategory>,
}

// ── Lookup results ──────────────────────────────────────────

/// A reference vowel with all four formants resolved.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedVowel {
    pub label: String,
    pub f1: f64,
    pub f2: f64,
    pub f3: f64,
    pub f4: f64,
    pub f3_estimated: bool,
    pub f4_estimated: bool,
}

/// The result of [`VowelCatalog::vowels_for`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReferenceVowelSet {
    pub language: String,
    /// The category whose data was returned.
    pub speaker: SpeakerCategory,
    /// Set when the language forces a category; the caller should switch
    /// its speaker selection to it.
    pub suggested_speaker: Option<SpeakerCategory>,
    pub source: String,
    pub vowels: Vec<ResolvedVowel>,
}

impl ReferenceVowelSet {
    pub fn is_empty(&self) -> bool {
        self.vowels.is_empty()
    }

    pub fn len(&self) -> usize {
        self.vowels.len()
    }
}

// ── Estimation ──────────────────────────────────────────────

/// Estimate F3 from F1/F2 with the front/back regression.
pub fn estimate_f3(f1: f64, f2: f64) -> f64 {
    if f2 <= F3_BRANCH_F2_HZ {
        0.522 * f1 + 1.197 * f2 + 57.0
    } else {
        0.787 * f1 - 0.365 * f2 + 2341.0
    }
}

/// Derive F4 from F3 with the speaker-dependent offset.
pub fn derive_f4(f3: f64, speaker: SpeakerCategory) -> f64 {
    f3 + f4_offset(speaker)
}

impl ReferenceVowel {
    /// Fill in F3/F4 for `speaker`, estimating whatever is absent.
    pub fn resolve(&self, speaker: SpeakerCategory) -> ResolvedVowel {
        let f3 = self.f3.unwrap_or_else(|| estimate_f3(self.f1, self.f2));
        let f4 = self.f4.unwrap_or_else(|| derive_f4(f3, speaker));
        ResolvedVowel {
            label: self.label.clone(),
            f1: self.f1,
            f2: self.f2,
            f3,
            f4,
            f3_estimated: self.f3.is_none(),
            f4_estimated: self.f4.is_none(),
        }
    }

    fn check(&self) -> Result<(), String> {
        if self.label.trim().is_empty() {
            return Err("empty label".to_string());
        }
        let given = [Some(self.f1), Some(self.f2), self.f3, self.f4];
        if given
            .iter()
            .flatten()
            .any(|f| !f.is_finite() || *f <= 0.0)
        {
            return Err("formants must be finite and positive".to_string());
        }
        if self.f1 >= self.f2 {
            return Err(format!("F1 {} Hz is not below F2 {} Hz", self.f1, self.f2));
        }
        if let Some(f3) = self.f3 {
            if f3 <= self.f2 {
                return Err(format!("F3 {f3} Hz is not above F2 {} Hz", self.f2));
            }
        }
        if let Some(f4) = self.f4 {
            let floor = self.f3.unwrap_or(self.f2);
            if f4 <= floor {
                return Err(format!("F4 {f4} Hz is not above {floor} Hz"));
            }
        }
        Ok(())
    }
}

// ── Catalog ─────────────────────────────────────────────────

impl VowelCatalog {
    /// Load and validate the embedded catalog.
    pub fn builtin() -> Result<Self, CatalogError> {
        VowelCatalog::from_json(BUILTIN_CATALOG_JSON)
    }

    /// Parse and validate a catalog from JSON text.
    pub fn from_json(source: &str) -> Result<Self, CatalogError> {
        let catalog: VowelCatalog =
            serde_json::from_str(source).map_err(|e| CatalogError::Json {
                message: e.to_string(),
                line: e.line(),
                column: e.column(),
            })?;
        catalog.validate()?;
        log::info!(
            "loaded vowel catalog: {} languages, {} vowel sets",
            catalog.languages.len(),
            catalog
                .languages
                .iter()
                .map(|l| SpeakerCategory::ALL
                    .iter()
                    .filter(|s| l.sets.get(**s).is_some())
                    .count())
                .sum::<usize>()
        );
        Ok(catalog)
    }

    /// Build a catalog from already-parsed languages, validating it.
    pub fn new(languages: Vec<Language>) -> Result<Self, CatalogError> {
        let catalog = VowelCatalog { languages };
        catalog.validate()?;
        Ok(catalog)
    }

    pub fn validate(&self) -> Result<(), CatalogError> {
        if self.languages.is_empty() {
            return Err(CatalogError::EmptyCatalog);
        }
        let mut seen = HashSet::new();
        for lang in &self.languages {
            if lang.id.trim().is_empty() {
                return Err(CatalogError::EmptyLanguageId);
            }
            if !seen.insert(lang.id.as_str()) {
                return Err(CatalogError::DuplicateLanguage {
                    id: lang.id.clone(),
                });
            }

            let required: &[SpeakerCategory] = match &lang.forced_speaker {
                Some(forced) => std::slice::from_ref(forced),
                None => &SpeakerCategory::ALL,
            };
            for &speaker in required {
                if lang.sets.get(speaker).is_none() {
                    return Err(CatalogError::MissingSpeakerSet {
                        language: lang.id.clone(),
                        speaker,
                    });
                }
            }

            for speaker in SpeakerCategory::ALL {
                let Some(set) = lang.sets.get(speaker) else {
                    continue;
                };
                if set.vowels.is_empty() {
                    return Err(CatalogError::EmptyVowelSet {
                        language: lang.id.clone(),
                        speaker,
                    });
                }
                for vowel in &set.vowels {
                    vowel.check().map_err(|reason| CatalogError::InvalidVowel {
                        language: lang.id.clone(),
                        speaker,
                        label: vowel.label.clone(),
                        reason,
                    })?;
                }
            }
        }
        Ok(())
    }

    /// Languages in catalog order.
    pub fn languages(&self) -> Vec<LanguageInfo> {
        self.languages
            .iter()
            .map(|l| LanguageInfo {
                id: l.id.clone(),
                name: l.name.clone(),
                forced_speaker: l.forced_speaker,
            })
            .collect()
    }

    pub fn language(&self, id: &str) -> Option<&Language> {
        self.languages.iter().find(|l| l.id == id)
    }

    /// Reference vowels for a language and speaker, with F3/F4 resolved.
    ///
    /// A language with a forced speaker category ignores `speaker`, returns
    /// the forced category's data and reports it in `suggested_speaker`.
    /// Returns `None` for unknown languages.
    pub fn vowels_for(
        &self,
        language: &str,
        speaker: SpeakerCategory,
    ) -> Option<ReferenceVowelSet> {
        let lang = self.language(language)?;
        let effective = lang.forced_speaker.unwrap_or(speaker);
        let set = lang.sets.get(effective)?;
        Some(ReferenceVowelSet {
            language: lang.id.clone(),
            speaker: effective,
            suggested_speaker: lang.forced_speaker,
            source: set.source.clone(),
            vowels: set.vowels.iter().map(|v| v.resolve(effective)).collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn vowel(label: &str, f1: f64, f2: f64) -> ReferenceVowel {
        ReferenceVowel {
            label: label.to_string(),
            f1,
            f2,
            f3: None,
            f4: None,
        }
    }

    fn set(vowels: Vec<ReferenceVowel>) -> Option<VowelSetData> {
        Some(VowelSetData {
            source: "test".to_string(),
            vowels,
        })
    }

    #[test]
    fn builtin_catalog_loads() {
        let catalog = VowelCatalog::builtin().expect("built-in catalog should validate");
        let languages = catalog.languages();
        let ids: Vec<&str> = languages.iter().map(|l| l.id.as_str()).collect();
        assert_eq!(
            ids,
            vec![
                "cardinal",
                "english-pb",
                "english-hillenbrand",
                "english-pb-children"
            ]
        );
    }

    #[test]
    fn f3_boundary_takes_back_branch() {
        // 0.522*500 + 1.197*1500 + 57
        let f3 = estimate_f3(500.0, 1500.0);
        assert!((f3 - 2113.5).abs() < 1e-9, "got {f3}");
        assert!((estimate_f3(500.0, 1500.0001) - 2113.5).abs() > 1.0);
    }

    #[test]
    fn f3_front_branch() {
        // 0.787*300 - 0.365*2300 + 2341
        let f3 = estimate_f3(300.0, 2300.0);
        assert!((f3 - 1737.6).abs() < 1e-9, "got {f3}");
    }

    #[test]
    fn f4_offset_depends_on_speaker() {
        assert_eq!(derive_f4(2500.0, SpeakerCategory::Male), 3500.0);
        assert_eq!(derive_f4(2500.0, SpeakerCategory::Female), 3600.0);
    }

    #[test]
    fn resolve_keeps_measured_values() {
        let v = ReferenceVowel {
            label: "i".to_string(),
            f1: 342.0,
            f2: 2322.0,
            f3: Some(3000.0),
            f4: Some(3657.0),
        };
        let r = v.resolve(SpeakerCategory::Male);
        assert_eq!((r.f3, r.f4), (3000.0, 3657.0));
        assert!(!r.f3_estimated && !r.f4_estimated);
    }

    #[test]
    fn resolve_estimates_missing_values() {
        let r = vowel("ə", 500.0, 1500.0).resolve(SpeakerCategory::Female);
        assert!((r.f3 - 2113.5).abs() < 1e-9);
        assert!((r.f4 - 3213.5).abs() < 1e-9);
        assert!(r.f3_estimated && r.f4_estimated);
    }

    #[test]
    fn measured_f3_still_derives_f4() {
        let catalog = VowelCatalog::builtin().unwrap();
        let set = catalog
            .vowels_for("english-pb", SpeakerCategory::Male)
            .unwrap();
        let i = &set.vowels[0];
        assert_eq!(i.label, "i");
        assert_eq!(i.f3, 3010.0);
        assert_eq!(i.f4, 4010.0);
        assert!(!i.f3_estimated && i.f4_estimated);
    }

    #[test]
    fn vowels_keep_catalog_order() {
        let catalog = VowelCatalog::builtin().unwrap();
        let set = catalog
            .vowels_for("cardinal", SpeakerCategory::Male)
            .unwrap();
        let labels: Vec<&str> = set.vowels.iter().map(|v| v.label.as_str()).collect();
        assert_eq!(labels, vec!["i", "e", "ɛ", "a", "ɑ", "ɒ", "ɔ", "o", "u"]);
        assert_eq!(set.suggested_speaker, Some(SpeakerCategory::Male));
    }

    #[test]
    fn forced_language_overrides_speaker() {
        let catalog = VowelCatalog::builtin().unwrap();
        let set = catalog
            .vowels_for("english-pb-children", SpeakerCategory::Male)
            .unwrap();
        assert_eq!(set.speaker, SpeakerCategory::Female);
        assert_eq!(set.suggested_speaker, Some(SpeakerCategory::Female));
        assert_eq!(set.len(), 10);
    }

    #[test]
    fn unforced_language_follows_speaker() {
        let catalog = VowelCatalog::builtin().unwrap();
        let set = catalog
            .vowels_for("english-hillenbrand", SpeakerCategory::Female)
            .unwrap();
        assert_eq!(set.speaker, SpeakerCategory::Female);
        assert_eq!(set.suggested_speaker, None);
        assert_eq!(set.vowels[0].f1, 437.0);
    }

    #[test]
    fn unknown_language_is_none() {
        let catalog = VowelCatalog::builtin().unwrap();
        assert!(catalog.vowels_for("klingon", SpeakerCategory::Male).is_none());
    }

    #[test]
    fn json_syntax_error_carries_position() {
        let err = VowelCatalog::from_json("{\n  \"languages\": [\n    oops\n  ]\n}").unwrap_err();
        match err {
            CatalogError::Json { line, .. } => assert_eq!(line, 3),
            other => panic!("expected JSON error, got {other:?}"),
        }
    }

    #[test]
    fn rejects_missing_speaker_set() {
        let err = VowelCatalog::new(vec![Language {
            id: "x".to_string(),
            name: "X".to_string(),
            forced_speaker: None,
            sets: SpeakerSets {
                male: set(vec![vowel("a", 700.0, 1200.0)]),
                female: None,
            },
        }])
        .unwrap_err();
        assert!(matches!(
            err,
            CatalogError::MissingSpeakerSet {
                speaker: SpeakerCategory::Female,
                ..
            }
        ));
    }

    #[test]
    fn forced_language_needs_only_forced_set() {
        VowelCatalog::new(vec![Language {
            id: "x".to_string(),
            name: "X".to_string(),
            forced_speaker: Some(SpeakerCategory::Female),
            sets: SpeakerSets {
                male: None,
                female: set(vec![vowel("a", 900.0, 1500.0)]),
            },
        }])
        .expect("forced language with its set should validate");
    }

    #[test]
    fn rejects_duplicate_ids() {
        let lang = Language {
            id: "x".to_string(),
            name: "X".to_string(),
            forced_speaker: Some(SpeakerCategory::Male),
            sets: SpeakerSets {
                male: set(vec![vowel("a", 700.0, 1200.0)]),
                female: None,
            },
        };
        let err = VowelCatalog::new(vec![lang.clone(), lang]).unwrap_err();
        assert!(matches!(err, CatalogError::DuplicateLanguage { .. }));
    }

    #[test]
    fn rejects_inverted_formants() {
        let err = VowelCatalog::new(vec![Language {
            id: "x".to_string(),
            name: "X".to_string(),
            forced_speaker: Some(SpeakerCategory::Male),
            sets: SpeakerSets {
                male: set(vec![vowel("a", 1300.0, 1200.0)]),
                female: None,
            },
        }])
        .unwrap_err();
        assert!(matches!(err, CatalogError::InvalidVowel { .. }));
    }

    #[test]
    fn rejects_empty_set_and_label() {
        let empty = Language {
            id: "x".to_string(),
            name: "X".to_string(),
            forced_speaker: Some(SpeakerCategory::Male),
            sets: SpeakerSets {
                male: set(vec![]),
                female: None,
            },
        };
        assert!(matches!(
            VowelCatalog::new(vec![empty]),
            Err(CatalogError::EmptyVowelSet { .. })
        ));

        let blank = Language {
            id: "y".to_string(),
            name: "Y".to_string(),
            forced_speaker: Some(SpeakerCategory::Male),
            sets: SpeakerSets {
                male: set(vec![vowel("  ", 300.0, 900.0)]),
                female: None,
            },
        };
        assert!(matches!(
            VowelCatalog::new(vec![blank]),
            Err(CatalogError::InvalidVowel { .. })
        ));
    }
}
