use serde::{Deserialize, Serialize};

use crate::error::MapError;

/// A point in either screen pixels or dataset (map) units, depending on use.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ZERO: Point = Point { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Point { x, y }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// Axis-aligned rectangle, origin at the top-left corner (SVG convention).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Rect {
            x,
            y,
            width,
            height,
        }
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Finite origin and strictly positive, finite size.
    pub fn is_valid(&self) -> bool {
        self.x.is_finite()
            && self.y.is_finite()
            && self.width.is_finite()
            && self.height.is_finite()
            && self.width > 0.0
            && self.height > 0.0
    }

    /// Parse an SVG `viewBox` attribute value (`"min-x min-y width height"`).
    ///
    /// Separators may be whitespace, commas, or both.
    pub fn parse_view_box(s: &str) -> Result<Self, MapError> {
        let invalid = || MapError::InvalidViewBox(s.to_string());
        let parts: Vec<f64> = s
            .split(|c: char| c.is_whitespace() || c == ',')
            .filter(|p| !p.is_empty())
            .map(|p| p.parse::<f64>().map_err(|_| invalid()))
            .collect::<Result<_, _>>()?;
        let [x, y, width, height] = parts[..] else {
            return Err(invalid());
        };
        let rect = Rect::new(x, y, width, height);
        if rect.is_valid() {
            Ok(rect)
        } else {
            Err(invalid())
        }
    }

    /// Format as an SVG `viewBox` attribute value.
    pub fn to_view_box(&self) -> String {
        format!("{} {} {} {}", self.x, self.y, self.width, self.height)
    }
}

/// Default rendered area used when nothing better is known.
pub const FALLBACK_RECT: Rect = Rect {
    x: 0.0,
    y: 0.0,
    width: 1000.0,
    height: 1000.0,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_view_box_spaces() {
        let r = Rect::parse_view_box("0 0 612 696").unwrap();
        assert_eq!(r, Rect::new(0.0, 0.0, 612.0, 696.0));
    }

    #[test]
    fn test_parse_view_box_commas_and_negatives() {
        let r = Rect::parse_view_box(" -10.5, 20,300.25 , 40 ").unwrap();
        assert_eq!(r, Rect::new(-10.5, 20.0, 300.25, 40.0));
    }

    #[test]
    fn test_parse_view_box_wrong_arity() {
        assert!(Rect::parse_view_box("0 0 100").is_err());
        assert!(Rect::parse_view_box("0 0 100 100 5").is_err());
        assert!(Rect::parse_view_box("").is_err());
    }

    #[test]
    fn test_parse_view_box_rejects_degenerate_size() {
        assert!(Rect::parse_view_box("0 0 0 100").is_err());
        assert!(Rect::parse_view_box("0 0 100 -1").is_err());
        assert!(Rect::parse_view_box("0 0 abc 100").is_err());
        assert!(Rect::parse_view_box("0 0 inf 100").is_err());
    }

    #[test]
    fn test_view_box_format_roundtrip() {
        let r = Rect::new(12.5, -3.0, 640.0, 480.125);
        assert_eq!(r.to_view_box(), "12.5 -3 640 480.125");
        assert_eq!(Rect::parse_view_box(&r.to_view_box()).unwrap(), r);
    }

    #[test]
    fn test_center() {
        let c = Rect::new(10.0, 20.0, 100.0, 50.0).center();
        assert!((c.x - 60.0).abs() < 1e-9);
        assert!((c.y - 45.0).abs() < 1e-9);
    }
}
