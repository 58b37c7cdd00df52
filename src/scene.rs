//! Draw commands for the rendering collaborator.
//!
//! The core only decides what goes where; the host canvas does the
//! drawing.

use serde::Serialize;

use crate::catalog::ReferenceVowelSet;
use crate::geometry::{Point, VowelSpaceGeometry};
use crate::mapper::{CoordinateMapper, FormantPair};
use crate::playback::ActiveFormants;

pub const CURSOR_SYMBOL: &str = "+";
pub const CURSOR_SIZE: f64 = 22.0;
/// The glyph is drawn from its baseline-left corner; shift so its centre
/// lands on the pointer.
pub const CURSOR_OFFSET: Point = Point::new(-7.0, 7.0);
pub const READOUT_SIZE: f64 = 16.0;
pub const READOUT_LINE_HEIGHT: f64 = 20.0;
/// Read-outs sit just above the open edge.
const READOUT_RISE: f64 = 20.0;
pub const OVERLAY_SIZE: f64 = 18.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

pub const LINE_COLOR: Rgb = Rgb(10, 10, 10);
pub const TEXT_COLOR: Rgb = Rgb(16, 16, 16);
pub const OVERLAY_COLOR: Rgb = Rgb(8, 128, 160);
pub const HIGHLIGHT_COLOR: Rgb = Rgb(200, 60, 40);

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Label {
    pub text: String,
    pub position: Point,
    pub size: f64,
    pub color: Rgb,
}

/// Everything to draw for one frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Scene {
    pub quadrilateral: [Point; 4],
    pub line_color: Rgb,
    pub readouts: Vec<Label>,
    pub cursor: Option<Label>,
    pub overlay: Vec<Label>,
}

impl Scene {
    /// Build the frame's draw list.
    ///
    /// `highlight` is the index of the snapped overlay vowel, if any.
    pub fn build(
        mapper: &CoordinateMapper,
        cursor: Option<Point>,
        formants: &ActiveFormants,
        overlay: Option<&ReferenceVowelSet>,
        highlight: Option<usize>,
    ) -> Scene {
        let geometry = mapper.geometry();
        Scene {
            quadrilateral: geometry.polygon(),
            line_color: LINE_COLOR,
            readouts: readouts(geometry, formants),
            cursor: cursor.map(cursor_glyph),
            overlay: overlay
                .map(|set| overlay_labels(mapper, set, highlight))
                .unwrap_or_default(),
        }
    }
}

fn readouts(geometry: &VowelSpaceGeometry, formants: &ActiveFormants) -> Vec<Label> {
    let x = geometry.front_left_x();
    let y = geometry.bottom() - READOUT_RISE;
    [("F1", formants.f1), ("F2", formants.f2)]
        .into_iter()
        .enumerate()
        .map(|(i, (name, hz))| Label {
            text: format!("{name} = {} Hz", hz.round()),
            position: Point::new(x, y + i as f64 * READOUT_LINE_HEIGHT),
            size: READOUT_SIZE,
            color: TEXT_COLOR,
        })
        .collect()
}

fn cursor_glyph(p: Point) -> Label {
    Label {
        text: CURSOR_SYMBOL.to_string(),
        position: Point::new(p.x + CURSOR_OFFSET.x, p.y + CURSOR_OFFSET.y),
        size: CURSOR_SIZE,
        color: TEXT_COLOR,
    }
}

fn overlay_labels(
    mapper: &CoordinateMapper,
    set: &ReferenceVowelSet,
    highlight: Option<usize>,
) -> Vec<Label> {
    set.vowels
        .iter()
        .enumerate()
        .map(|(i, v)| Label {
            text: v.label.clone(),
            position: mapper.formants_to_point(FormantPair { f1: v.f1, f2: v.f2 }),
            size: OVERLAY_SIZE,
            color: if highlight == Some(i) {
                HIGHLIGHT_COLOR
            } else {
                OVERLAY_COLOR
            },
        })
        .collect()
}
