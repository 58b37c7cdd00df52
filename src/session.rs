//! Session — the selections, active formants and per-frame pipeline.
//!
//! A `Session` owns all mutable state of the tool. Input events mutate it
//! through `&mut self`; [`Session::tick`] then runs the read-then-derive
//! pipeline once per animation frame:
//!
//! 1. resolve the speaker's range and geometry,
//! 2. map the pointer to (F1, F2),
//! 3. look up the nearest reference vowel and snap to it,
//! 4. derive synthesis parameters and push them to the engine.

use serde::{Deserialize, Serialize};

use crate::catalog::{LanguageInfo, ReferenceVowelSet, VowelCatalog};
use crate::engine::AudioEngine;
use crate::error::{ConfigError, VowelSpaceError};
use crate::geometry::{ChartFrame, Point, VowelSpaceGeometry};
use crate::locator::{DEFAULT_SNAP_RADIUS, is_snap_eligible, nearest};
use crate::mapper::CoordinateMapper;
use crate::playback::{ActiveFormants, SynthesisParams, VoiceSourceMode, derive};
use crate::range::{self, Formant, SpeakerCategory, default_f0, range_for};
use crate::scene::Scene;

// ── Configuration ───────────────────────────────────────────

/// Layout and interaction settings. Every field has a default, so a
/// host can pass a partial JSON object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SessionConfig {
    pub frame: ChartFrame,
    /// Pixels within which the cursor snaps to a reference vowel.
    pub snap_radius: f64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        SessionConfig {
            frame: ChartFrame::default(),
            snap_radius: DEFAULT_SNAP_RADIUS,
        }
    }
}

impl SessionConfig {
    pub fn from_json(source: &str) -> Result<Self, ConfigError> {
        let config: SessionConfig =
            serde_json::from_str(source).map_err(|e| ConfigError::Json(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.snap_radius.is_finite() || self.snap_radius < 0.0 {
            return Err(ConfigError::InvalidSnapRadius(self.snap_radius));
        }
        Ok(())
    }
}

// ── Events & frame output ───────────────────────────────────

/// Events raised by the UI controls.
#[derive(Debug, Clone, PartialEq)]
pub enum UiEvent {
    SpeakerChanged(SpeakerCategory),
    SourceChanged(VoiceSourceMode),
    /// `None` hides the reference overlay.
    ReferenceLanguageChanged(Option<String>),
    FormantFieldEdited(Formant, f64),
    F0FieldEdited(f64),
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CursorState {
    pub screen_x: f64,
    pub screen_y: f64,
    pub inside_quadrilateral: bool,
}

/// The reference vowel closest to the cursor this frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NearestMatch {
    pub index: usize,
    pub label: String,
    pub distance: f64,
    pub snapped: bool,
}

/// Result of one pipeline run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Frame {
    pub cursor: Option<CursorState>,
    pub speaker: SpeakerCategory,
    pub source: VoiceSourceMode,
    pub formants: ActiveFormants,
    pub manual_override: bool,
    pub nearest: Option<NearestMatch>,
    pub params: SynthesisParams,
    pub playing: bool,
    pub scene: Scene,
}

// ── Session ─────────────────────────────────────────────────

pub struct Session {
    catalog: VowelCatalog,
    config: SessionConfig,
    male: CoordinateMapper,
    female: CoordinateMapper,

    speaker: SpeakerCategory,
    source: VoiceSourceMode,
    language: Option<String>,
    /// Cached `vowels_for(language, speaker)`; refreshed on selection change.
    overlay: Option<ReferenceVowelSet>,

    formants: ActiveFormants,
    pointer: Option<Point>,
    /// The pointer moved since the last frame.
    pointer_dirty: bool,
    /// A numeric field edit owns the formants until the pointer moves
    /// inside the quadrilateral again.
    manual_override: bool,
    snapped: Option<usize>,
    last_applied: Option<SynthesisParams>,
}

impl Session {
    /// Session over the built-in catalog with default layout.
    pub fn new() -> Result<Self, VowelSpaceError> {
        Session::with_config(VowelCatalog::builtin()?, SessionConfig::default())
    }

    /// Validate the range table, config and geometry, then start in the
    /// male/voiced/no-overlay state on a schwa.
    pub fn with_config(
        catalog: VowelCatalog,
        config: SessionConfig,
    ) -> Result<Self, VowelSpaceError> {
        range::validate_table()?;
        config.validate()?;
        let geometry_for = |speaker| {
            let range = range_for(speaker);
            VowelSpaceGeometry::for_range(&config.frame, &range)
                .map(|geometry| CoordinateMapper::new(geometry, range))
        };
        let male = geometry_for(SpeakerCategory::Male)?;
        let female = geometry_for(SpeakerCategory::Female)?;

        let speaker = SpeakerCategory::default();
        Ok(Session {
            catalog,
            config,
            male,
            female,
            speaker,
            source: VoiceSourceMode::default(),
            language: None,
            overlay: None,
            formants: ActiveFormants::schwa(speaker),
            pointer: None,
            pointer_dirty: false,
            manual_override: false,
            snapped: None,
            last_applied: None,
        })
    }

    // ── accessors ──

    pub fn speaker(&self) -> SpeakerCategory {
        self.speaker
    }

    pub fn source(&self) -> VoiceSourceMode {
        self.source
    }

    pub fn language(&self) -> Option<&str> {
        self.language.as_deref()
    }

    pub fn formants(&self) -> &ActiveFormants {
        &self.formants
    }

    pub fn overlay(&self) -> Option<&ReferenceVowelSet> {
        self.overlay.as_ref()
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn is_manual_override(&self) -> bool {
        self.manual_override
    }

    pub fn languages(&self) -> Vec<LanguageInfo> {
        self.catalog.languages()
    }

    /// Mapper for the current speaker.
    pub fn mapper(&self) -> &CoordinateMapper {
        match self.speaker {
            SpeakerCategory::Male => &self.male,
            SpeakerCategory::Female => &self.female,
        }
    }

    /// Limits for a numeric formant field under the current speaker.
    pub fn field_bounds(&self, formant: Formant) -> (f64, f64) {
        self.mapper().range().bounds(formant)
    }

    // ── input events ──

    /// Apply a UI event. Returns the new speaker category when the event
    /// changed it, so the host can update its selector.
    pub fn handle_event(&mut self, event: UiEvent) -> Option<SpeakerCategory> {
        match event {
            UiEvent::SpeakerChanged(speaker) => {
                if speaker == self.speaker {
                    return None;
                }
                self.set_speaker(speaker);
                self.drop_conflicting_overlay();
                Some(speaker)
            }
            UiEvent::SourceChanged(source) => {
                log::debug!("source -> {source:?}");
                self.source = source;
                None
            }
            UiEvent::ReferenceLanguageChanged(language) => self.set_language(language),
            UiEvent::FormantFieldEdited(formant, value) => {
                self.formants.set(formant, value);
                self.manual_override = true;
                self.pointer_dirty = false;
                self.snapped = None;
                None
            }
            UiEvent::F0FieldEdited(value) => {
                self.formants.f0 = value;
                None
            }
        }
    }

    fn set_speaker(&mut self, speaker: SpeakerCategory) {
        log::debug!("speaker {} -> {}", self.speaker, speaker);
        self.speaker = speaker;
        // Formants are left as they are; the next pointer update maps
        // through the new range.
        self.formants.f0 = default_f0(speaker);
        self.snapped = None;
        self.refresh_overlay();
    }

    /// A reference that forces the other speaker category cannot be shown
    /// for the current one; hide it.
    fn drop_conflicting_overlay(&mut self) {
        let Some(forced) = self.overlay.as_ref().and_then(|set| set.suggested_speaker) else {
            return;
        };
        if forced != self.speaker {
            log::info!(
                "reference '{}' only has {forced} data, overlay disabled for {}",
                self.language.as_deref().unwrap_or_default(),
                self.speaker
            );
            self.overlay = None;
            self.language = None;
        }
    }

    fn set_language(&mut self, language: Option<String>) -> Option<SpeakerCategory> {
        self.language = language;
        self.snapped = None;
        self.refresh_overlay();
        let suggested = self.overlay.as_ref().and_then(|set| set.suggested_speaker)?;
        if suggested == self.speaker {
            return None;
        }
        log::debug!("reference language forces {suggested} data");
        self.set_speaker(suggested);
        Some(suggested)
    }

    fn refresh_overlay(&mut self) {
        self.overlay = match self.language.as_deref() {
            None => None,
            Some(id) => {
                let set = self.catalog.vowels_for(id, self.speaker);
                if set.is_none() {
                    log::warn!("unknown reference language '{id}', overlay disabled");
                }
                set
            }
        };
        if self.overlay.is_none() {
            self.language = None;
        }
    }

    pub fn pointer_moved(&mut self, x: f64, y: f64) {
        self.pointer = Some(Point::new(x, y));
        self.pointer_dirty = true;
    }

    /// Start playback if the pointer is inside the quadrilateral.
    pub fn pointer_pressed(&mut self, engine: &mut dyn AudioEngine) -> bool {
        let Some(cursor) = self.cursor_state().filter(|c| c.inside_quadrilateral) else {
            return false;
        };
        if self.pointer_dirty {
            self.pointer_dirty = false;
            self.update_from_pointer(Point::new(cursor.screen_x, cursor.screen_y));
        }
        let params = self.params();
        engine.apply(&params);
        self.last_applied = Some(params);
        engine.start();
        true
    }

    /// Stop playback. Always forwarded to the engine.
    pub fn pointer_released(&mut self, engine: &mut dyn AudioEngine) {
        engine.stop();
    }

    // ── per-frame pipeline ──

    fn cursor_state(&self) -> Option<CursorState> {
        self.pointer.map(|p| CursorState {
            screen_x: p.x,
            screen_y: p.y,
            inside_quadrilateral: self.mapper().geometry().contains(p),
        })
    }

    fn params(&self) -> SynthesisParams {
        derive(&self.formants, self.source, default_f0(self.speaker))
    }

    /// Pointer-driven formant update: map, then snap if a reference vowel
    /// is close enough.
    fn update_from_pointer(&mut self, p: Point) {
        let mapper = *self.mapper();
        let Some(mapped) = mapper.point_to_formants(p) else {
            return;
        };
        self.manual_override = false;
        self.formants.f1 = mapped.f1;
        self.formants.f2 = mapped.f2;
        self.snapped = None;

        let Some(set) = &self.overlay else {
            return;
        };
        if let Some(hit) = nearest(p, &set.vowels, &mapper) {
            if is_snap_eligible(hit.distance, self.config.snap_radius) {
                let vowel = &set.vowels[hit.index];
                log::debug!("snapped to [{}] at {:.1} px", vowel.label, hit.distance);
                self.formants.snap_to(vowel);
                self.snapped = Some(hit.index);
            }
        }
    }

    /// Run one frame of the pipeline and push changed parameters to the
    /// engine while it is running.
    pub fn tick(&mut self, engine: &mut dyn AudioEngine) -> Frame {
        let cursor = self.cursor_state();
        if self.pointer_dirty {
            self.pointer_dirty = false;
            if let Some(c) = cursor.filter(|c| c.inside_quadrilateral) {
                self.update_from_pointer(Point::new(c.screen_x, c.screen_y));
            }
        }

        let inside = cursor.filter(|c| c.inside_quadrilateral);
        let nearest_match = match (&self.overlay, inside) {
            (Some(set), Some(c)) => nearest(
                Point::new(c.screen_x, c.screen_y),
                &set.vowels,
                self.mapper(),
            )
            .map(|hit| NearestMatch {
                index: hit.index,
                label: set.vowels[hit.index].label.clone(),
                distance: hit.distance,
                snapped: self.snapped == Some(hit.index),
            }),
            _ => None,
        };

        let params = self.params();
        let playing = engine.is_running();
        if playing && self.last_applied != Some(params) {
            engine.apply(&params);
            self.last_applied = Some(params);
        }

        let scene = Scene::build(
            self.mapper(),
            inside.map(|c| Point::new(c.screen_x, c.screen_y)),
            &self.formants,
            self.overlay.as_ref(),
            self.snapped,
        );

        Frame {
            cursor,
            speaker: self.speaker,
            source: self.source,
            formants: self.formants,
            manual_override: self.manual_override,
            nearest: nearest_match,
            params,
            playing,
            scene,
        }
    }
}
