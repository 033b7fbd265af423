//! Cubic Bézier evaluation: position and unit tangent at a parameter `t`.
//!
//! Everything here is a pure function of the four control positions, so
//! renderers can sample freely without touching simulation state.

use serde::{Deserialize, Serialize};

/// A position (or displacement) in canvas pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ZERO: Point = Point { x: 0.0, y: 0.0 };

    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to `other`.
    pub fn distance(self, other: Point) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// Direction of the curve at some `t`.
///
/// `x`/`y` are normalised; `length` is the magnitude of the raw derivative
/// before normalisation.  When `length` is zero the derivative vanishes and
/// `x`/`y` are the raw (zero) components, never NaN.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Tangent {
    pub x: f64,
    pub y: f64,
    pub length: f64,
}

/// One evaluated point of a sampled curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Sample {
    pub t: f64,
    pub point: Point,
    pub tangent: Tangent,
}

/// Evaluate the curve at `t`.
///
/// `B(t) = (1-t)³P0 + 3(1-t)²t P1 + 3(1-t)t² P2 + t³P3`, per axis.
/// Values of `t` outside `[0, 1]` extrapolate.
pub fn point_at(p: &[Point; 4], t: f64) -> Point {
    let u = 1.0 - t;
    let tt = t * t;
    let uu = u * u;
    let uuu = uu * u;
    let ttt = tt * t;

    // Bernstein weights; at t = 0 and t = 1 every weight but one is exactly
    // zero, so the endpoints come back bit-for-bit.
    let w0 = uuu;
    let w1 = 3.0 * uu * t;
    let w2 = 3.0 * u * tt;
    let w3 = ttt;

    Point {
        x: w0 * p[0].x + w1 * p[1].x + w2 * p[2].x + w3 * p[3].x,
        y: w0 * p[0].y + w1 * p[1].y + w2 * p[2].y + w3 * p[3].y,
    }
}

/// Unit tangent of the curve at `t`.
///
/// `B'(t) = 3(1-t)²(P1-P0) + 6(1-t)t(P2-P1) + 3t²(P3-P2)`.
pub fn tangent_at(p: &[Point; 4], t: f64) -> Tangent {
    let u = 1.0 - t;

    #[inline]
    fn derivative(a: f64, b: f64, c: f64, d: f64, u: f64, t: f64) -> f64 {
        3.0 * u * u * (b - a) + 6.0 * u * t * (c - b) + 3.0 * t * t * (d - c)
    }

    let dx = derivative(p[0].x, p[1].x, p[2].x, p[3].x, u, t);
    let dy = derivative(p[0].y, p[1].y, p[2].y, p[3].y, u, t);

    let length = (dx * dx + dy * dy).sqrt();
    let divisor = if length == 0.0 { 1.0 } else { length };

    Tangent {
        x: dx / divisor,
        y: dy / divisor,
        length,
    }
}

/// Sample `segments + 1` evenly spaced points across `t ∈ [0, 1]`.
///
/// The first sample sits exactly at `t = 0` and the last exactly at `t = 1`.
/// `segments == 0` is treated as a single segment.
pub fn sample(p: &[Point; 4], segments: usize) -> Vec<Sample> {
    let segments = segments.max(1);
    (0..=segments)
        .map(|i| {
            let t = if i == segments {
                1.0
            } else {
                i as f64 / segments as f64
            };
            Sample {
                t,
                point: point_at(p, t),
                tangent: tangent_at(p, t),
            }
        })
        .collect()
}
