//! Coordinate mapper — screen position ↔ (F1, F2).
//!
//! F1 follows the vertical axis (close vowels at the top, F1max at the
//! bottom edge). F2 follows the horizontal axis reversed, so the leftmost
//! x carries F2max (front vowels). Both maps are plain affine transforms;
//! only [`CoordinateMapper::point_to_formants`] is gated by the
//! quadrilateral.

use serde::{Deserialize, Serialize};

use crate::geometry::{Point, VowelSpaceGeometry};
use crate::range::AcousticRange;

/// A first/second formant pair in Hz.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FormantPair {
    pub f1: f64,
    pub f2: f64,
}

/// Affine mapping between the quadrilateral and one acoustic range.
#[derive(Debug, Clone, Copy)]
pub struct CoordinateMapper {
    geometry: VowelSpaceGeometry,
    range: AcousticRange,
}

impl CoordinateMapper {
    pub fn new(geometry: VowelSpaceGeometry, range: AcousticRange) -> Self {
        CoordinateMapper { geometry, range }
    }

    pub fn geometry(&self) -> &VowelSpaceGeometry {
        &self.geometry
    }

    pub fn range(&self) -> &AcousticRange {
        &self.range
    }

    /// Formants under a screen point, or `None` when the point is not
    /// strictly inside the quadrilateral.
    pub fn point_to_formants(&self, p: Point) -> Option<FormantPair> {
        self.geometry.contains(p).then(|| self.affine_formants(p))
    }

    /// The raw affine map, defined for every point. Never clamps.
    pub fn affine_formants(&self, p: Point) -> FormantPair {
        let g = &self.geometry;
        let r = &self.range;
        let f1 = map(p.y, g.top(), g.bottom(), r.f1_min, r.f1_max);
        let f2 = map(p.x, g.front_left_x(), g.back_right_x(), r.f2_max, r.f2_min);
        FormantPair { f1, f2 }
    }

    /// Inverse of [`Self::affine_formants`]; used to place overlay glyphs.
    pub fn formants_to_point(&self, formants: FormantPair) -> Point {
        let g = &self.geometry;
        let r = &self.range;
        let y = map(formants.f1, r.f1_min, r.f1_max, g.top(), g.bottom());
        let x = map(formants.f2, r.f2_max, r.f2_min, g.front_left_x(), g.back_right_x());
        Point::new(x, y)
    }
}

/// Linear re-mapping of `v` from [in_lo, in_hi] to [out_lo, out_hi]
/// without clamping.
fn map(v: f64, in_lo: f64, in_hi: f64, out_lo: f64, out_hi: f64) -> f64 {
    out_lo + (v - in_lo) * (out_hi - out_lo) / (in_hi - in_lo)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::ChartFrame;
    use crate::range::{FEMALE_RANGE, MALE_RANGE};

    fn mapper(range: AcousticRange) -> CoordinateMapper {
        let geometry = VowelSpaceGeometry::for_range(&ChartFrame::default(), &range).unwrap();
        CoordinateMapper::new(geometry, range)
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn top_and_bottom_edges_hit_f1_bounds() {
        let m = mapper(MALE_RANGE);
        let top = m.affine_formants(Point::new(300.0, 100.0));
        let bottom = m.affine_formants(Point::new(300.0, 500.0));
        assert_eq!(top.f1, 250.0);
        assert_eq!(bottom.f1, 750.0);
    }

    #[test]
    fn leftmost_is_front() {
        let m = mapper(MALE_RANGE);
        assert_eq!(m.affine_formants(Point::new(100.0, 300.0)).f2, 2500.0);
        assert_eq!(m.affine_formants(Point::new(500.0, 300.0)).f2, 500.0);
    }

    #[test]
    fn center_is_schwa() {
        let m = mapper(MALE_RANGE);
        let f = m.point_to_formants(Point::new(300.0, 300.0)).unwrap();
        assert!(close(f.f1, 500.0));
        assert!(close(f.f2, 1500.0));
    }

    #[test]
    fn outside_is_none() {
        let m = mapper(MALE_RANGE);
        assert_eq!(m.point_to_formants(Point::new(50.0, 300.0)), None);
        assert_eq!(m.point_to_formants(Point::new(300.0, 100.0)), None);
        assert_eq!(m.point_to_formants(Point::new(110.0, 480.0)), None);
    }

    #[test]
    fn affine_map_does_not_clamp() {
        let m = mapper(MALE_RANGE);
        let f = m.affine_formants(Point::new(0.0, 600.0));
        assert!(f.f1 > MALE_RANGE.f1_max);
        assert!(f.f2 > MALE_RANGE.f2_max);
        let p = m.formants_to_point(FormantPair { f1: 100.0, f2: 3000.0 });
        assert!(p.y < 100.0);
        assert!(p.x < 100.0);
    }

    #[test]
    fn round_trip_inside_quadrilateral() {
        for range in [MALE_RANGE, FEMALE_RANGE] {
            let m = mapper(range);
            let g = *m.geometry();
            for yi in 1..40 {
                let y = g.top() + g.height() * yi as f64 / 40.0;
                let (l, r) = (g.left_at(y), g.right_at(y));
                for xi in 1..20 {
                    let p = Point::new(l + (r - l) * xi as f64 / 20.0, y);
                    let f = m.point_to_formants(p).expect("point should be inside");
                    let back = m.formants_to_point(f);
                    assert!(
                        (back.x - p.x).abs() < 1e-9 && (back.y - p.y).abs() < 1e-9,
                        "round trip drifted: {p:?} -> {f:?} -> {back:?}"
                    );
                }
            }
        }
    }

    #[test]
    fn speaker_range_changes_mapping() {
        let p = Point::new(300.0, 300.0);
        let male = mapper(MALE_RANGE).affine_formants(p);
        let female = mapper(FEMALE_RANGE).affine_formants(p);
        assert!(close(female.f1, 700.0));
        assert!(close(female.f2, 1900.0));
        assert!(female.f1 > male.f1);
    }
}
