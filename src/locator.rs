//! Nearest reference vowel lookup in screen space.

use serde::Serialize;

use crate::catalog::ResolvedVowel;
use crate::geometry::Point;
use crate::mapper::{CoordinateMapper, FormantPair};

/// Default snap radius in pixels.
pub const DEFAULT_SNAP_RADIUS: f64 = 12.0;

/// The closest reference vowel to the cursor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NearestVowel {
    /// Index into the vowel set.
    pub index: usize,
    /// Where the vowel's glyph sits on screen.
    pub position: Point,
    /// Euclidean screen distance from the cursor.
    pub distance: f64,
}

/// Find the vowel whose mapped screen position is closest to `cursor`.
///
/// Ties keep the earlier vowel. Returns `None` for an empty set.
pub fn nearest(
    cursor: Point,
    vowels: &[ResolvedVowel],
    mapper: &CoordinateMapper,
) -> Option<NearestVowel> {
    let mut best: Option<NearestVowel> = None;
    for (index, vowel) in vowels.iter().enumerate() {
        let position = mapper.formants_to_point(FormantPair {
            f1: vowel.f1,
            f2: vowel.f2,
        });
        let distance = cursor.distance(position);
        // strict: equal distances keep the first occurrence
        if best.map_or(true, |b| distance < b.distance) {
            best = Some(NearestVowel {
                index,
                position,
                distance,
            });
        }
    }
    best
}

/// Snap policy: strictly inside the radius.
pub fn is_snap_eligible(distance: f64, threshold_radius: f64) -> bool {
    distance < threshold_radius
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{ChartFrame, VowelSpaceGeometry};
    use crate::range::MALE_RANGE;

    fn mapper() -> CoordinateMapper {
        let geometry = VowelSpaceGeometry::for_range(&ChartFrame::default(), &MALE_RANGE).unwrap();
        CoordinateMapper::new(geometry, MALE_RANGE)
    }

    fn vowel_at(m: &CoordinateMapper, label: &str, p: Point) -> ResolvedVowel {
        let f = m.affine_formants(p);
        ResolvedVowel {
            label: label.to_string(),
            f1: f.f1,
            f2: f.f2,
            f3: 2500.0,
            f4: 3500.0,
            f3_estimated: false,
            f4_estimated: false,
        }
    }

    #[test]
    fn empty_set_is_none() {
        assert_eq!(nearest(Point::new(300.0, 300.0), &[], &mapper()), None);
    }

    #[test]
    fn single_vowel_reports_true_distance() {
        let m = mapper();
        let v = vowel_at(&m, "ə", Point::new(310.0, 305.0));
        let n = nearest(Point::new(300.0, 300.0), &[v], &m).unwrap();
        assert_eq!(n.index, 0);
        assert!((n.distance - 125f64.sqrt()).abs() < 1e-9, "got {}", n.distance);
        assert!((n.distance - 11.18).abs() < 0.01);
    }

    #[test]
    fn picks_minimum_distance() {
        let m = mapper();
        let vowels = [
            vowel_at(&m, "i", Point::new(120.0, 120.0)),
            vowel_at(&m, "ə", Point::new(290.0, 310.0)),
            vowel_at(&m, "u", Point::new(480.0, 120.0)),
        ];
        let n = nearest(Point::new(300.0, 300.0), &vowels, &m).unwrap();
        assert_eq!(n.index, 1);
        assert_eq!(vowels[n.index].label, "ə");
    }

    #[test]
    fn ties_keep_first_occurrence() {
        let m = mapper();
        let vowels = [
            vowel_at(&m, "a", Point::new(310.0, 300.0)),
            vowel_at(&m, "b", Point::new(310.0, 300.0)),
        ];
        let n = nearest(Point::new(300.0, 300.0), &vowels, &m).unwrap();
        assert_eq!(n.index, 0);
    }

    #[test]
    fn snap_is_strict() {
        assert!(is_snap_eligible(11.9, 12.0));
        assert!(!is_snap_eligible(12.0, 12.0));
        assert!(!is_snap_eligible(30.0, 12.0));
    }
}
