//! Planar geometry primitives shared by the sweep and the graph layer
//!
//! All coordinates are `f64` and points are [`glam::DVec2`].

use glam::DVec2;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Result, VoronoiError};

/// Side tag of a half-edge or of a clipped segment endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    /// The opposite side
    #[inline]
    pub fn other(self) -> Side {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }
}

/// Axis-aligned rectangle `[min.x, max.x] × [min.y, max.y]`
///
/// Zero-area rectangles are valid; clipping against them produces no visible
/// segments.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub min: DVec2,
    pub max: DVec2,
}

impl Rect {
    /// Rectangle from its two corners. Callers are expected to pass `min <= max`;
    /// use [`Rect::try_new`] for unchecked input.
    pub fn new(min: DVec2, max: DVec2) -> Self {
        Self { min, max }
    }

    /// Rectangle from an origin and a size
    pub fn from_origin_size(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self::new(DVec2::new(x, y), DVec2::new(x + width, y + height))
    }

    /// Validating constructor
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if a coordinate is not finite or `min > max` on an axis.
    pub fn try_new(min: DVec2, max: DVec2) -> Result<Self> {
        if !min.is_finite() || !max.is_finite() {
            return Err(VoronoiError::InvalidInput(format!(
                "rectangle corners must be finite (got {} .. {})",
                min, max
            )));
        }
        if min.x > max.x || min.y > max.y {
            return Err(VoronoiError::InvalidInput(format!(
                "rectangle min must not exceed max (got {} .. {})",
                min, max
            )));
        }
        Ok(Self::new(min, max))
    }

    #[inline]
    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    #[inline]
    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    #[inline]
    pub fn size(&self) -> DVec2 {
        self.max - self.min
    }

    /// Length of the diagonal
    #[inline]
    pub fn diagonal(&self) -> f64 {
        self.size().length()
    }

    /// Whether `p` lies inside or on the boundary
    #[inline]
    pub fn contains(&self, p: DVec2) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }

    /// The four corners, counter-clockwise starting at `min`
    pub fn corners(&self) -> [DVec2; 4] {
        [
            self.min,
            DVec2::new(self.max.x, self.min.y),
            self.max,
            DVec2::new(self.min.x, self.max.y),
        ]
    }

    /// Whether `p` is within `epsilon` of at least one side
    pub fn is_near_side(&self, p: DVec2, epsilon: f64) -> bool {
        (p.x - self.min.x).abs() <= epsilon
            || (p.x - self.max.x).abs() <= epsilon
            || (p.y - self.min.y).abs() <= epsilon
            || (p.y - self.max.y).abs() <= epsilon
    }

    /// Affine scale + translate of `p` from this rectangle into `target`
    ///
    /// A degenerate axis maps every coordinate onto the target's minimum.
    pub fn map_point(&self, p: DVec2, target: &Rect) -> DVec2 {
        let scale = |offset: f64, from: f64, to: f64| if from == 0.0 { 0.0 } else { offset / from * to };
        DVec2::new(
            target.min.x + scale(p.x - self.min.x, self.width(), target.width()),
            target.min.y + scale(p.y - self.min.y, self.height(), target.height()),
        )
    }

    #[inline]
    pub fn perimeter(&self) -> f64 {
        2.0 * (self.width() + self.height())
    }

    /// Arc length from `min` to the projection of `p` onto the nearest side,
    /// walking counter-clockwise
    ///
    /// `corners()[i]` sits at position 0, w, w + h and 2w + h.
    pub fn perimeter_position(&self, p: DVec2) -> f64 {
        let (w, h) = (self.width(), self.height());
        let x = (p.x - self.min.x).clamp(0.0, w);
        let y = (p.y - self.min.y).clamp(0.0, h);
        let bottom = p.y - self.min.y;
        let right = self.max.x - p.x;
        let top = self.max.y - p.y;
        let left = p.x - self.min.x;

        let nearest = bottom.min(right).min(top).min(left);
        if nearest == bottom {
            x
        } else if nearest == right {
            w + y
        } else if nearest == top {
            w + h + (w - x)
        } else {
            2.0 * w + h + (h - y)
        }
    }
}

/// A straight segment between two points
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineSegment {
    pub p0: DVec2,
    pub p1: DVec2,
}

impl LineSegment {
    pub fn new(p0: DVec2, p1: DVec2) -> Self {
        Self { p0, p1 }
    }

    #[inline]
    pub fn length(&self) -> f64 {
        self.p0.distance(self.p1)
    }
}

/// Orientation of a closed polygon
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Winding {
    Clockwise,
    CounterClockwise,
    None,
}

/// Twice the signed area of a closed polygon (positive when counter-clockwise, y up)
pub fn signed_double_area(points: &[DVec2]) -> f64 {
    if points.len() < 3 {
        return 0.0;
    }
    points
        .iter()
        .zip(points.iter().cycle().skip(1))
        .map(|(a, b)| a.perp_dot(*b))
        .sum()
}

/// Unsigned area of a closed polygon
pub fn polygon_area(points: &[DVec2]) -> f64 {
    signed_double_area(points).abs() * 0.5
}

pub fn winding(points: &[DVec2]) -> Winding {
    let area = signed_double_area(points);
    if area < 0.0 {
        Winding::Clockwise
    } else if area > 0.0 {
        Winding::CounterClockwise
    } else {
        Winding::None
    }
}

/// Mean of a point set; `None` when empty
pub fn vertex_average(points: &[DVec2]) -> Option<DVec2> {
    if points.is_empty() {
        return None;
    }
    let sum: DVec2 = points.iter().copied().sum();
    Some(sum / points.len() as f64)
}

/// Area centroid of a closed polygon
///
/// Polygons with (near) zero area fall back to the vertex average.
pub fn polygon_centroid(points: &[DVec2]) -> Option<DVec2> {
    let double_area = signed_double_area(points);
    if double_area.abs() < 1e-12 {
        return vertex_average(points);
    }
    let mut c = DVec2::ZERO;
    for (a, b) in points.iter().zip(points.iter().cycle().skip(1)) {
        c += (*a + *b) * a.perp_dot(*b);
    }
    Some(c / (3.0 * double_area))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> Vec<DVec2> {
        vec![
            DVec2::new(0.0, 0.0),
            DVec2::new(2.0, 0.0),
            DVec2::new(2.0, 2.0),
            DVec2::new(0.0, 2.0),
        ]
    }

    #[test]
    fn test_rect_validation() {
        assert!(Rect::try_new(DVec2::ZERO, DVec2::new(1.0, 1.0)).is_ok());
        assert!(Rect::try_new(DVec2::ZERO, DVec2::ZERO).is_ok());
        assert!(Rect::try_new(DVec2::new(2.0, 0.0), DVec2::new(1.0, 1.0)).is_err());
        assert!(Rect::try_new(DVec2::new(f64::NAN, 0.0), DVec2::new(1.0, 1.0)).is_err());
    }

    #[test]
    fn test_map_point() {
        let source = Rect::from_origin_size(0.0, 0.0, 1.0, 1.0);
        let target = Rect::from_origin_size(100.0, 50.0, 512.0, 256.0);
        let p = source.map_point(DVec2::new(0.5, 0.25), &target);
        assert_eq!(p, DVec2::new(356.0, 114.0));
    }

    #[test]
    fn test_perimeter_position() {
        let r = Rect::from_origin_size(0.0, 0.0, 10.0, 5.0);
        assert_eq!(r.perimeter(), 30.0);
        let positions: Vec<f64> = r.corners().iter().map(|&c| r.perimeter_position(c)).collect();
        assert_eq!(positions, vec![0.0, 10.0, 15.0, 25.0]);

        assert_eq!(r.perimeter_position(DVec2::new(4.0, 0.0)), 4.0);
        assert_eq!(r.perimeter_position(DVec2::new(10.0, 2.0)), 12.0);
        assert_eq!(r.perimeter_position(DVec2::new(7.0, 5.0)), 18.0);
        assert_eq!(r.perimeter_position(DVec2::new(0.0, 1.0)), 29.0);
        // slightly off the left side still projects onto it
        assert_eq!(r.perimeter_position(DVec2::new(-1e-12, 3.0)), 27.0);
    }

    #[test]
    fn test_polygon_helpers() {
        let mut poly = square();
        assert_eq!(polygon_area(&poly), 4.0);
        assert_eq!(winding(&poly), Winding::CounterClockwise);
        assert_eq!(polygon_centroid(&poly), Some(DVec2::new(1.0, 1.0)));

        poly.reverse();
        assert_eq!(winding(&poly), Winding::Clockwise);
        assert_eq!(polygon_centroid(&poly), Some(DVec2::new(1.0, 1.0)));

        assert_eq!(polygon_centroid(&[]), None);
    }
}
