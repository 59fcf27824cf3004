//! Pixel-space geometry for the temperature trend curves.
//!
//! The builder only produces points, labels and segments. Whatever draws
//! them (a widget, SVG, a terminal) supplies the x-positions and the
//! vertical center.

use serde::{Deserialize, Serialize};

use crate::{aqi::Rgb, model::DAY_COUNT};

/// Vertical pixels per degree Celsius in the reference layout.
pub const DEFAULT_SCALE: f64 = 1.2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CurveKind {
    High,
    Low,
}

impl CurveKind {
    /// Default stroke color of the curve.
    pub fn color(&self) -> Rgb {
        match self {
            CurveKind::High => Rgb(255, 170, 0),
            CurveKind::Low => Rgb(0, 255, 255),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurvePoint {
    pub x: i32,
    pub y: i32,
    pub label: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LineStyle {
    Dotted,
    Solid,
}

/// A line between two consecutive points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segment {
    pub from: (i32, i32),
    pub to: (i32, i32),
    pub style: LineStyle,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Curve {
    pub points: [CurvePoint; DAY_COUNT],
    /// `segments[0]` joins yesterday to today and is dotted; the rest are solid.
    pub segments: [Segment; DAY_COUNT - 1],
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurveBuilder {
    scale: f64,
}

impl CurveBuilder {
    pub fn new(scale: f64) -> Self {
        Self { scale }
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Place each value around `y_center`, offset from the truncated
    /// integer average by `scale` pixels per degree. Higher values go up.
    pub fn build(&self, values: &[i32; DAY_COUNT], xs: &[i32; DAY_COUNT], y_center: i32) -> Curve {
        // i64 so six extreme i32 readings can't overflow the sum or the diff.
        let average = values.iter().map(|&v| i64::from(v)).sum::<i64>() / DAY_COUNT as i64;

        let points: [CurvePoint; DAY_COUNT] = std::array::from_fn(|i| {
            let offset = ((i64::from(values[i]) - average) as f64 * self.scale).round();
            // f64 -> i32 `as` saturates at the i32 bounds.
            let y = (f64::from(y_center) - offset) as i32;
            CurvePoint { x: xs[i], y, label: format!("{}°C", values[i]) }
        });

        let segments = std::array::from_fn(|i| Segment {
            from: (points[i].x, points[i].y),
            to: (points[i + 1].x, points[i + 1].y),
            style: if i == 0 { LineStyle::Dotted } else { LineStyle::Solid },
        });

        Curve { points, segments }
    }
}

impl Default for CurveBuilder {
    fn default() -> Self {
        Self::new(DEFAULT_SCALE)
    }
}
