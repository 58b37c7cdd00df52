//! Screen-space geometry of the vowel quadrilateral.
//!
//! Screen coordinates follow the canvas convention: x grows to the right,
//! y grows downward. The close (high) vowels sit on the top edge, the
//! front vowels on the left.

use serde::{Deserialize, Serialize};

use crate::error::GeometryError;
use crate::range::AcousticRange;

/// A point in screen space (pixels).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Point { x, y }
    }

    /// Euclidean distance to another point.
    pub fn distance(self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// The rectangle the chart is laid out in. The close edge spans the full
/// width; the open edge corners are placed from the acoustic range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChartFrame {
    pub left: f64,
    pub right: f64,
    pub top: f64,
    pub bottom: f64,
}

impl Default for ChartFrame {
    fn default() -> Self {
        ChartFrame {
            left: 100.0,
            right: 500.0,
            top: 100.0,
            bottom: 500.0,
        }
    }
}

/// Trapezoid bounding the vowel space on screen.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VowelSpaceGeometry {
    pub front_top: Point,
    pub front_bottom: Point,
    pub back_bottom: Point,
    pub back_top: Point,
}

impl VowelSpaceGeometry {
    /// Build and validate a trapezoid from its four corners.
    ///
    /// Both top corners share `top`, both bottom corners share `bottom`.
    pub fn new(
        front_top: Point,
        front_bottom: Point,
        back_bottom: Point,
        back_top: Point,
    ) -> Result<Self, GeometryError> {
        let geometry = VowelSpaceGeometry {
            front_top,
            front_bottom,
            back_bottom,
            back_top,
        };
        geometry.validate()?;
        Ok(geometry)
    }

    /// Lay the trapezoid out inside `frame`: the top edge spans the frame,
    /// the bottom corners sit at the x positions of F2mid1 and F2mid2.
    pub fn for_range(frame: &ChartFrame, range: &AcousticRange) -> Result<Self, GeometryError> {
        let width = frame.right - frame.left;
        let x_of = |f2: f64| frame.left + (range.f2_max - f2) * width / range.f2_span();
        VowelSpaceGeometry::new(
            Point::new(frame.left, frame.top),
            Point::new(x_of(range.f2_mid1), frame.bottom),
            Point::new(x_of(range.f2_mid2), frame.bottom),
            Point::new(frame.right, frame.top),
        )
    }

    pub fn validate(&self) -> Result<(), GeometryError> {
        let (top, bottom) = (self.top(), self.bottom());
        if !(bottom > top)
            || self.front_top.y != self.back_top.y
            || self.front_bottom.y != self.back_bottom.y
        {
            return Err(GeometryError::NonPositiveHeight { top, bottom });
        }
        if !(self.front_top.x < self.back_top.x) {
            return Err(GeometryError::InvertedEdge { edge: "top" });
        }
        if !(self.front_bottom.x < self.back_bottom.x) {
            return Err(GeometryError::InvertedEdge { edge: "bottom" });
        }
        let top_width = self.back_top.x - self.front_top.x;
        let bottom_width = self.back_bottom.x - self.front_bottom.x;
        if !(bottom_width < top_width) {
            return Err(GeometryError::OpenEdgeNotNarrower {
                top_width,
                bottom_width,
            });
        }
        Ok(())
    }

    pub fn top(&self) -> f64 {
        self.front_top.y
    }

    pub fn bottom(&self) -> f64 {
        self.front_bottom.y
    }

    pub fn height(&self) -> f64 {
        self.bottom() - self.top()
    }

    /// Leftmost x of the trapezoid; maps to F2max.
    pub fn front_left_x(&self) -> f64 {
        self.front_top.x.min(self.front_bottom.x)
    }

    /// Rightmost x of the trapezoid; maps to F2min.
    pub fn back_right_x(&self) -> f64 {
        self.back_top.x.max(self.back_bottom.x)
    }

    /// Fraction of the way from the top edge to the bottom edge at `y`.
    fn depth(&self, y: f64) -> f64 {
        (y - self.top()) / self.height()
    }

    /// x of the front (left) side at height `y`.
    pub fn left_at(&self, y: f64) -> f64 {
        lerp(self.front_top.x, self.front_bottom.x, self.depth(y))
    }

    /// x of the back (right) side at height `y`.
    pub fn right_at(&self, y: f64) -> f64 {
        lerp(self.back_top.x, self.back_bottom.x, self.depth(y))
    }

    /// Strict inside test: points on any edge are outside.
    pub fn contains(&self, p: Point) -> bool {
        p.y > self.top()
            && p.y < self.bottom()
            && p.x > self.left_at(p.y)
            && p.x < self.right_at(p.y)
    }

    /// Corners in drawing order.
    pub fn polygon(&self) -> [Point; 4] {
        [self.front_top, self.front_bottom, self.back_bottom, self.back_top]
    }
}

fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}
