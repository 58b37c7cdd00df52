use std::fmt;
use std::ops::Range;

use ariadne::{Config, IndexType, Label, Report, ReportKind, Source};

use crate::range::SpeakerCategory;

#[derive(Debug)]
pub enum VowelSpaceError {
    Catalog(CatalogError),
    Range(RangeError),
    Geometry(GeometryError),
    Config(ConfigError),
    Render(RenderError),
}

/// Malformed reference-vowel data, detected when the catalog is loaded.
#[derive(Debug)]
pub enum CatalogError {
    Json {
        message: String,
        line: usize,
        column: usize,
    },
    EmptyCatalog,
    DuplicateLanguage {
        id: String,
    },
    EmptyLanguageId,
    MissingSpeakerSet {
        language: String,
        speaker: SpeakerCategory,
    },
    EmptyVowelSet {
        language: String,
        speaker: SpeakerCategory,
    },
    InvalidVowel {
        language: String,
        speaker: SpeakerCategory,
        label: String,
        reason: String,
    },
}

/// An acoustic range table entry that breaks its invariants.
#[derive(Debug)]
pub enum RangeError {
    InvalidBounds {
        speaker: SpeakerCategory,
        formant: &'static str,
        min: f64,
        max: f64,
    },
    PartitionOutOfRange {
        speaker: SpeakerCategory,
        value: f64,
    },
    PartitionOrder {
        speaker: SpeakerCategory,
        mid1: f64,
        mid2: f64,
    },
}

#[derive(Debug)]
pub enum GeometryError {
    NonPositiveHeight { top: f64, bottom: f64 },
    InvertedEdge { edge: &'static str },
    OpenEdgeNotNarrower { top_width: f64, bottom_width: f64 },
}

/// Offline render request outside what the preview synth accepts.
#[derive(Debug)]
pub enum RenderError {
    SampleRate { rate: u32, min: u32, max: u32 },
    Duration { seconds: f64, max: f64 },
}

#[derive(Debug)]
pub enum ConfigError {
    Json(String),
    InvalidSnapRadius(f64),
}

impl fmt::Display for VowelSpaceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VowelSpaceError::Catalog(e) => write!(f, "Catalog error: {e}"),
            VowelSpaceError::Range(e) => write!(f, "Range error: {e}"),
            VowelSpaceError::Geometry(e) => write!(f, "Geometry error: {e}"),
            VowelSpaceError::Config(e) => write!(f, "Config error: {e}"),
            VowelSpaceError::Render(e) => write!(f, "Render error: {e}"),
        }
    }
}

impl std::error::Error for VowelSpaceError {}

impl fmt::Display for CatalogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogError::Json {
                message,
                line,
                column,
            } => write!(f, "Invalid catalog JSON at {line}:{column}: {message}"),
            CatalogError::EmptyCatalog => write!(f, "Catalog contains no languages"),
            CatalogError::DuplicateLanguage { id } => write!(f, "Duplicate language id '{id}'"),
            CatalogError::EmptyLanguageId => write!(f, "Language id must not be empty"),
            CatalogError::MissingSpeakerSet { language, speaker } => {
                write!(f, "Language '{language}' has no {speaker} vowel set")
            }
            CatalogError::EmptyVowelSet { language, speaker } => {
                write!(f, "Language '{language}' has an empty {speaker} vowel set")
            }
            CatalogError::InvalidVowel {
                language,
                speaker,
                label,
                reason,
            } => write!(
                f,
                "Invalid vowel '{label}' in {language}/{speaker}: {reason}"
            ),
        }
    }
}

impl std::error::Error for CatalogError {}

impl CatalogError {
    /// Render the error as an annotated report against the catalog source.
    ///
    /// JSON syntax errors point at the offending line and column; other
    /// errors fall back to their `Display` text.
    pub fn report(&self, source: &str) -> String {
        let CatalogError::Json {
            message,
            line,
            column,
        } = self
        else {
            return self.to_string();
        };

        let span = span_at(source, *line, *column);
        let mut out = Vec::new();
        let written = Report::build(ReportKind::Error, span.clone())
            .with_config(
                Config::default()
                    .with_color(false)
                    .with_index_type(IndexType::Byte),
            )
            .with_message("invalid reference vowel catalog")
            .with_label(Label::new(span).with_message(message))
            .finish()
            .write(Source::from(source), &mut out);

        match written {
            Ok(()) => String::from_utf8_lossy(&out).into_owned(),
            Err(_) => self.to_string(),
        }
    }
}

/// Byte span of the character at a 1-based line/column (serde_json style).
fn span_at(source: &str, line: usize, column: usize) -> Range<usize> {
    let line_start: usize = source
        .split_inclusive('\n')
        .take(line.saturating_sub(1))
        .map(str::len)
        .sum();
    let start = (line_start + column.saturating_sub(1)).min(source.len());
    let end = source[start..]
        .chars()
        .next()
        .map_or(start, |c| start + c.len_utf8());
    start..end
}

impl fmt::Display for RangeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RangeError::InvalidBounds {
                speaker,
                formant,
                min,
                max,
            } => write!(f, "{speaker} {formant} bounds invalid: min {min} Hz, max {max} Hz"),
            RangeError::PartitionOutOfRange { speaker, value } => write!(
                f,
                "{speaker} F2 partition {value} Hz is not strictly inside the F2 range"
            ),
            RangeError::PartitionOrder { speaker, mid1, mid2 } => write!(
                f,
                "{speaker} F2 partitions out of order: mid1 {mid1} Hz must exceed mid2 {mid2} Hz"
            ),
        }
    }
}

impl std::error::Error for RangeError {}

impl fmt::Display for GeometryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GeometryError::NonPositiveHeight { top, bottom } => {
                write!(f, "Quadrilateral height must be positive (top {top}, bottom {bottom})")
            }
            GeometryError::InvertedEdge { edge } => {
                write!(f, "Quadrilateral {edge} edge runs back to front")
            }
            GeometryError::OpenEdgeNotNarrower {
                top_width,
                bottom_width,
            } => write!(
                f,
                "Open edge ({bottom_width} px) must be narrower than close edge ({top_width} px)"
            ),
        }
    }
}

impl std::error::Error for GeometryError {}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Json(msg) => write!(f, "Invalid session config: {msg}"),
            ConfigError::InvalidSnapRadius(r) => {
                write!(f, "Snap radius must be finite and non-negative, got {r}")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderError::SampleRate { rate, min, max } => {
                write!(f, "Sample rate {rate} Hz outside {min}..={max} Hz")
            }
            RenderError::Duration { seconds, max } => {
                write!(f, "Duration {seconds} s outside 0..={max} s")
            }
        }
    }
}

impl std::error::Error for RenderError {}

impl From<CatalogError> for VowelSpaceError {
    fn from(e: CatalogError) -> Self {
        VowelSpaceError::Catalog(e)
    }
}

impl From<RangeError> for VowelSpaceError {
    fn from(e: RangeError) -> Self {
        VowelSpaceError::Range(e)
    }
}

impl From<GeometryError> for VowelSpaceError {
    fn from(e: GeometryError) -> Self {
        VowelSpaceError::Geometry(e)
    }
}

impl From<RenderError> for VowelSpaceError {
    fn from(e: RenderError) -> Self {
        VowelSpaceError::Render(e)
    }
}

impl From<ConfigError> for VowelSpaceError {
    fn from(e: ConfigError) -> Self {
        VowelSpaceError::Config(e)
    }
}
