pub mod catalog;
pub mod dsp;
pub mod engine;
pub mod error;
pub mod geometry;
pub mod locator;
pub mod mapper;
pub mod playback;
pub mod range;
pub mod scene;
pub mod session;

use crate::catalog::VowelCatalog;
use crate::engine::CommandQueue;
use crate::error::CatalogError;
use crate::playback::{SynthesisParams, VoiceSourceMode};
use crate::range::{Formant, SpeakerCategory};
use crate::session::{Session, SessionConfig, UiEvent};
use wasm_bindgen::prelude::*;

/// The crate version, read from Cargo.toml at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// WASM-exposed: return the vowelspace-core version string.
#[wasm_bindgen]
pub fn core_version() -> String {
    VERSION.to_string()
}

fn js_err(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&format!("{e}"))
}

fn parse_speaker(s: &str) -> Result<SpeakerCategory, JsValue> {
    SpeakerCategory::parse(s).ok_or_else(|| js_err(format!("unknown speaker category '{s}'")))
}

fn catalog_err(e: CatalogError, source: &str) -> JsValue {
    match e {
        CatalogError::Json { .. } => JsValue::from_str(&e.report(source)),
        other => js_err(other),
    }
}

/// WASM-exposed: list the built-in reference languages.
#[wasm_bindgen]
pub fn reference_languages() -> Result<JsValue, JsValue> {
    let catalog = VowelCatalog::builtin().map_err(js_err)?;
    serde_wasm_bindgen::to_value(&catalog.languages()).map_err(js_err)
}

/// WASM-exposed: resolved vowels for a language and speaker, `undefined`
/// when the language is unknown.
#[wasm_bindgen]
pub fn reference_vowels(language: &str, speaker: &str) -> Result<JsValue, JsValue> {
    let speaker = parse_speaker(speaker)?;
    let catalog = VowelCatalog::builtin().map_err(js_err)?;
    serde_wasm_bindgen::to_value(&catalog.vowels_for(language, speaker)).map_err(js_err)
}

/// WASM-exposed: render a held vowel to WAV bytes (16-bit mono).
#[wasm_bindgen]
pub fn render_vowel_wav(
    params: JsValue,
    seconds: f64,
    sample_rate: u32,
) -> Result<Vec<u8>, JsValue> {
    let params: SynthesisParams = serde_wasm_bindgen::from_value(params).map_err(js_err)?;
    dsp::renderer::render_vowel_wav(&params, seconds, sample_rate).map_err(js_err)
}

/// WASM-exposed session: feed it input events, call `tick` once per
/// animation frame, and replay `drain_commands` on the Web Audio graph.
#[wasm_bindgen]
pub struct VowelSpace {
    session: Session,
    commands: CommandQueue,
}

impl VowelSpace {
    fn build(catalog: VowelCatalog, config: JsValue) -> Result<VowelSpace, JsValue> {
        let config = if config.is_undefined() || config.is_null() {
            SessionConfig::default()
        } else {
            serde_wasm_bindgen::from_value(config).map_err(js_err)?
        };
        let session = Session::with_config(catalog, config).map_err(js_err)?;
        Ok(VowelSpace {
            session,
            commands: CommandQueue::new(),
        })
    }
}

#[wasm_bindgen]
impl VowelSpace {
    /// `config` is an optional partial `SessionConfig` object.
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue) -> Result<VowelSpace, JsValue> {
        let catalog = VowelCatalog::builtin().map_err(js_err)?;
        VowelSpace::build(catalog, config)
    }

    /// Like `new`, with a caller-supplied catalog JSON document.
    #[wasm_bindgen(js_name = withCatalog)]
    pub fn with_catalog(catalog_json: &str, config: JsValue) -> Result<VowelSpace, JsValue> {
        let catalog =
            VowelCatalog::from_json(catalog_json).map_err(|e| catalog_err(e, catalog_json))?;
        VowelSpace::build(catalog, config)
    }

    pub fn pointer_moved(&mut self, x: f64, y: f64) {
        self.session.pointer_moved(x, y);
    }

    /// Returns whether playback started.
    pub fn pointer_pressed(&mut self) -> bool {
        self.session.pointer_pressed(&mut self.commands)
    }

    pub fn pointer_released(&mut self) {
        self.session.pointer_released(&mut self.commands);
    }

    pub fn set_speaker(&mut self, speaker: &str) -> Result<(), JsValue> {
        let speaker = parse_speaker(speaker)?;
        self.session.handle_event(UiEvent::SpeakerChanged(speaker));
        Ok(())
    }

    pub fn set_source(&mut self, source: &str) -> Result<(), JsValue> {
        let source = VoiceSourceMode::parse(source)
            .ok_or_else(|| js_err(format!("unknown voice source '{source}'")))?;
        self.session.handle_event(UiEvent::SourceChanged(source));
        Ok(())
    }

    /// Select a reference language (`"none"` or empty hides the overlay).
    /// Returns the speaker category now in effect.
    pub fn set_reference(&mut self, language: &str) -> String {
        let language = match language {
            "" | "none" => None,
            id => Some(id.to_string()),
        };
        self.session.handle_event(UiEvent::ReferenceLanguageChanged(language));
        self.session.speaker().as_str().to_string()
    }

    pub fn set_formant(&mut self, formant: &str, value: f64) -> Result<(), JsValue> {
        let formant =
            Formant::parse(formant).ok_or_else(|| js_err(format!("unknown formant '{formant}'")))?;
        self.session.handle_event(UiEvent::FormantFieldEdited(formant, value));
        Ok(())
    }

    pub fn set_f0(&mut self, value: f64) {
        self.session.handle_event(UiEvent::F0FieldEdited(value));
    }

    /// `[min, max]` for a numeric formant field under the current speaker.
    pub fn field_bounds(&self, formant: &str) -> Result<Vec<f64>, JsValue> {
        let formant =
            Formant::parse(formant).ok_or_else(|| js_err(format!("unknown formant '{formant}'")))?;
        let (min, max) = self.session.field_bounds(formant);
        Ok(vec![min, max])
    }

    pub fn tick(&mut self) -> Result<JsValue, JsValue> {
        let frame = self.session.tick(&mut self.commands);
        serde_wasm_bindgen::to_value(&frame).map_err(js_err)
    }

    pub fn drain_commands(&mut self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&self.commands.drain()).map_err(js_err)
    }
}
