//! Region geometry shared by the OCR-backed media.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

/// An area to obscure: a word polygon from OCR or a detector bounding box.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Region {
    Polygon {
        points: Vec<Point>,
    },
    Box {
        x_min: f64,
        y_min: f64,
        x_max: f64,
        y_max: f64,
    },
}

impl Region {
    /// Build a box from the `[x_min, y_min, x_max, y_max]` layout detectors emit.
    pub fn from_xyxy([x_min, y_min, x_max, y_max]: [f64; 4]) -> Self {
        Region::Box {
            x_min,
            y_min,
            x_max,
            y_max,
        }
    }

    /// Axis-aligned bounds. An empty polygon has none.
    pub fn bounds(&self) -> Option<Bounds> {
        match self {
            Region::Polygon { points } => {
                let first = points.first()?;
                let seed = Bounds {
                    x_min: first.x,
                    y_min: first.y,
                    x_max: first.x,
                    y_max: first.y,
                };
                Some(points.iter().skip(1).fold(seed, |b, p| Bounds {
                    x_min: b.x_min.min(p.x),
                    y_min: b.y_min.min(p.y),
                    x_max: b.x_max.max(p.x),
                    y_max: b.y_max.max(p.y),
                }))
            }
            Region::Box {
                x_min,
                y_min,
                x_max,
                y_max,
            } => Some(Bounds {
                x_min: x_min.min(*x_max),
                y_min: y_min.min(*y_max),
                x_max: x_min.max(*x_max),
                y_max: y_min.max(*y_max),
            }),
        }
    }
}

/// Axis-aligned rectangle, `min <= max` on both axes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub x_min: f64,
    pub y_min: f64,
    pub x_max: f64,
    pub y_max: f64,
}

impl Bounds {
    pub fn width(&self) -> f64 {
        self.x_max - self.x_min
    }

    pub fn height(&self) -> f64 {
        self.y_max - self.y_min
    }
}

/// Page dimensions in whatever unit the producer uses.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageSize {
    pub width: f64,
    pub height: f64,
}

impl PageSize {
    /// US letter in PDF points.
    pub const LETTER: PageSize = PageSize {
        width: 612.0,
        height: 792.0,
    };

    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

impl FromStr for PageSize {
    type Err = String;

    /// Parse `WIDTHxHEIGHT`, e.g. `612x792`.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let (w, h) = s
            .split_once(['x', 'X'])
            .ok_or_else(|| format!("expected WIDTHxHEIGHT, got '{}'", s))?;
        let width: f64 = w.trim().parse().map_err(|_| format!("invalid width '{}'", w))?;
        let height: f64 = h.trim().parse().map_err(|_| format!("invalid height '{}'", h))?;
        if width <= 0.0 || height <= 0.0 {
            return Err(format!("page size must be positive, got '{}'", s));
        }
        Ok(Self { width, height })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_polygon_bounds() {
        let region = Region::Polygon {
            points: vec![
                Point::new(10.0, 10.0),
                Point::new(40.0, 12.0),
                Point::new(41.0, 20.0),
                Point::new(9.0, 21.0),
            ],
        };

        let bounds = region.bounds().unwrap();
        assert_eq!(bounds.x_min, 9.0);
        assert_eq!(bounds.y_min, 10.0);
        assert_eq!(bounds.x_max, 41.0);
        assert_eq!(bounds.y_max, 21.0);
    }

    #[test]
    fn test_box_bounds_are_normalized() {
        let region = Region::from_xyxy([50.0, 80.0, 10.0, 20.0]);
        let bounds = region.bounds().unwrap();

        assert_eq!(bounds.x_min, 10.0);
        assert_eq!(bounds.y_min, 20.0);
        assert_eq!(bounds.width(), 40.0);
        assert_eq!(bounds.height(), 60.0);
    }

    #[test]
    fn test_empty_polygon_has_no_bounds() {
        let region = Region::Polygon { points: vec![] };
        assert!(region.bounds().is_none());
    }

    #[test]
    fn test_page_size_parsing() {
        assert_eq!("612x792".parse::<PageSize>().unwrap(), PageSize::LETTER);
        assert_eq!(
            "595.3X841.9".parse::<PageSize>().unwrap(),
            PageSize::new(595.3, 841.9)
        );
        assert!("612".parse::<PageSize>().is_err());
        assert!("0x10".parse::<PageSize>().is_err());
    }
}
