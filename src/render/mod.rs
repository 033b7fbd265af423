//! Renderers and the look they share.
//!
//! The GTK window draws with cairo and the headless loop writes SVG; both
//! take their colours and sizes from here so the two outputs match.

pub mod svg;

/// Length of a drawn tangent indicator, in pixels.
pub const TANGENT_LENGTH: f64 = 24.0;
/// Radius of a fixed endpoint marker.
pub const FIXED_RADIUS: f64 = 6.0;
/// Radius of a draggable control point marker.
pub const DYNAMIC_RADIUS: f64 = 9.0;
/// Radius of the ring drawn at a dragged point's target.
pub const TARGET_RADIUS: f64 = 4.0;
pub const CURVE_WIDTH: f64 = 3.0;
pub const HANDLE_WIDTH: f64 = 1.0;
pub const TANGENT_WIDTH: f64 = 1.5;

/// An RGB colour with components in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgb(pub f64, pub f64, pub f64);

impl Rgb {
    /// `#rrggbb` form for SVG/CSS.
    pub fn hex(self) -> String {
        let channel = |c: f64| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        format!("#{:02x}{:02x}{:02x}", channel(self.0), channel(self.1), channel(self.2))
    }
}

pub const BACKGROUND: Rgb = Rgb(0.07, 0.07, 0.09);
pub const HANDLE: Rgb = Rgb(0.4, 0.4, 0.45);
pub const CURVE: Rgb = Rgb(0.31, 0.76, 0.97);
pub const TANGENT: Rgb = Rgb(1.0, 0.72, 0.3);
pub const FIXED_POINT: Rgb = Rgb(0.88, 0.88, 0.88);
pub const DYNAMIC_POINT: Rgb = Rgb(0.94, 0.33, 0.31);
pub const DRAGGED_POINT: Rgb = Rgb(1.0, 0.92, 0.23);
