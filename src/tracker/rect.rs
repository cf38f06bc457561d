use std::fmt;

use nalgebra::Point2;
use serde::{Deserialize, Serialize};

/// A pixel position (x, y) in frame or crop coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    #[inline]
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another position, in pixels.
    #[inline]
    pub fn distance(&self, other: &Position) -> f64 {
        nalgebra::distance(&self.to_point(), &other.to_point())
    }

    #[inline]
    fn to_point(self) -> Point2<f64> {
        Point2::new(f64::from(self.x), f64::from(self.y))
    }
}

impl From<(i32, i32)> for Position {
    fn from((x, y): (i32, i32)) -> Self {
        Self::new(x, y)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Bounding box representation with format conversion utilities.
///
/// Stored as TLWH: Top-Left X, Top-Left Y, Width, Height.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    /// Top-left x coordinate
    pub x: f32,
    /// Top-left y coordinate
    pub y: f32,
    /// Width of the bounding box
    pub width: f32,
    /// Height of the bounding box
    pub height: f32,
}

impl Rect {
    /// Create a new Rect from top-left coordinates and dimensions (TLWH format).
    #[inline]
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Create a Rect from TLBR format (xmin, ymin, xmax, ymax).
    #[inline]
    pub fn from_tlbr(x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        Self {
            x: x1,
            y: y1,
            width: x2 - x1,
            height: y2 - y1,
        }
    }

    /// Convert to TLBR format: (xmin, ymin, xmax, ymax).
    #[inline]
    pub fn to_tlbr(&self) -> [f32; 4] {
        [self.x, self.y, self.x + self.width, self.y + self.height]
    }

    /// Stretch the box by `sx` horizontally and `sy` vertically about the origin.
    #[inline]
    pub fn scaled(&self, sx: f32, sy: f32) -> Self {
        Self::new(self.x * sx, self.y * sy, self.width * sx, self.height * sy)
    }

    /// Integer center used for tracking.
    ///
    /// Corners are truncated to whole pixels first, then the midpoint is
    /// floor-divided, so `(10.9, 20.0, 31.0, 41.0)` yields `(20, 30)`.
    pub fn center_point(&self) -> Position {
        let [x1, y1, x2, y2] = self.to_tlbr().map(|v| i64::from(v as i32));
        Position::new(midpoint(x1, x2), midpoint(y1, y2))
    }
}

// The midpoint of two i32 values always fits back into an i32.
#[inline]
fn midpoint(a: i64, b: i64) -> i32 {
    (a + b).div_euclid(2) as i32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_conversions() {
        let rect = Rect::new(10.0, 20.0, 30.0, 40.0);
        assert_eq!(rect.to_tlbr(), [10.0, 20.0, 40.0, 60.0]);
    }

    #[test]
    fn test_from_tlbr() {
        let rect = Rect::from_tlbr(10.0, 20.0, 40.0, 60.0);
        assert_eq!(rect, Rect::new(10.0, 20.0, 30.0, 40.0));
    }

    #[test]
    fn test_scaled() {
        let rect = Rect::from_tlbr(320.0, 320.0, 640.0, 640.0).scaled(0.5, 0.375);
        assert_eq!(rect.to_tlbr(), [160.0, 120.0, 320.0, 240.0]);
    }

    #[test]
    fn test_center_point_huge_box_does_not_overflow() {
        let rect = Rect::from_tlbr(f32::MAX / 2.0, 0.0, f32::MAX, 10.0);
        assert_eq!(rect.center_point(), Position::new(i32::MAX, 5));

        let rect = Rect::from_tlbr(f32::MIN, 0.0, f32::MIN / 2.0, 10.0);
        assert_eq!(rect.center_point(), Position::new(i32::MIN, 5));
    }

    #[test]
    fn test_center_point_truncates_then_floors() {
        let rect = Rect::from_tlbr(10.9, 20.0, 31.0, 41.0);
        assert_eq!(rect.center_point(), Position::new(20, 30));

        let rect = Rect::from_tlbr(0.0, 0.0, 5.0, 5.0);
        assert_eq!(rect.center_point(), Position::new(2, 2));
    }

    #[test]
    fn test_center_point_negative_coordinates_floor() {
        let rect = Rect::from_tlbr(-3.0, -3.0, 0.0, 0.0);
        assert_eq!(rect.center_point(), Position::new(-2, -2));
    }

    #[test]
    fn test_position_distance() {
        let a = Position::new(0, 0);
        let b = Position::new(3, 4);
        assert!((a.distance(&b) - 5.0).abs() < 1e-12);
        assert_eq!(a.distance(&a), 0.0);
    }
}
