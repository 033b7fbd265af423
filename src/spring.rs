//! Spring-damper integrator for the dynamic control points.
//!
//! One call to [`step`] is one frame: there is no `dt` scaling, the
//! timestep is fixed at "one tick".  Per axis:
//!
//! ```text
//! force    = stiffness * (target - position)
//! velocity = (velocity + force) * damping      // DampingOrder::Coupled
//! position = position + velocity
//! ```
//!
//! A point without a target is left exactly as it is.  Nothing snaps to
//! zero: positions approach the target asymptotically.

use crate::curve::{ControlPoint, Role};
use log::warn;
use serde::{Deserialize, Serialize};

pub const DEFAULT_STIFFNESS: f64 = 0.1;
pub const DEFAULT_DAMPING: f64 = 0.95;

/// Smallest stiffness accepted at the configuration boundary.  Zero would
/// make the spring inert.
pub const MIN_STIFFNESS: f64 = 0.001;
pub const MAX_STIFFNESS: f64 = 1.0;
pub const MIN_DAMPING: f64 = 0.0;
pub const MAX_DAMPING: f64 = 1.0;

/// Where damping is applied within a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DampingOrder {
    /// `velocity = (velocity + force) * damping`.
    ///
    /// Damping also scales the spring term, which couples stiffness and
    /// damping into the observed settle time.
    #[default]
    Coupled,
    /// `velocity = velocity * damping + force`, the textbook form.
    ///
    /// Settles faster than `Coupled` for the same coefficients.
    Separate,
}

/// Spring coefficients read on every tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpringParameters {
    pub stiffness: f64,
    pub damping: f64,
    pub damping_order: DampingOrder,
}

impl Default for SpringParameters {
    fn default() -> Self {
        Self {
            stiffness: DEFAULT_STIFFNESS,
            damping: DEFAULT_DAMPING,
            damping_order: DampingOrder::Coupled,
        }
    }
}

impl SpringParameters {
    /// Copy of `self` with both coefficients clamped into range.
    ///
    /// Logs a warning for every coefficient that had to be moved.
    pub fn clamped(self) -> Self {
        let stiffness = clamp_stiffness(self.stiffness);
        let damping = clamp_damping(self.damping);
        if stiffness != self.stiffness {
            warn!("stiffness {} clamped to {}", self.stiffness, stiffness);
        }
        if damping != self.damping {
            warn!("damping {} clamped to {}", self.damping, damping);
        }
        Self {
            stiffness,
            damping,
            damping_order: self.damping_order,
        }
    }
}

/// Clamp `value` to `[MIN_STIFFNESS, MAX_STIFFNESS]`.
pub fn clamp_stiffness(value: f64) -> f64 {
    value.clamp(MIN_STIFFNESS, MAX_STIFFNESS)
}

/// Clamp `value` to `[MIN_DAMPING, MAX_DAMPING]`.
pub fn clamp_damping(value: f64) -> f64 {
    value.clamp(MIN_DAMPING, MAX_DAMPING)
}

#[inline]
fn step_axis(position: &mut f64, velocity: &mut f64, target: f64, params: &SpringParameters) {
    let force = params.stiffness * (target - *position);
    *velocity = match params.damping_order {
        DampingOrder::Coupled => (*velocity + force) * params.damping,
        DampingOrder::Separate => *velocity * params.damping + force,
    };
    *position += *velocity;
}

/// Advance one control point by a single tick.
///
/// Fixed points and points without a target are not touched.
pub fn step(point: &mut ControlPoint, params: &SpringParameters) {
    if point.role == Role::Fixed {
        return;
    }
    let Some(target) = point.target else {
        return;
    };
    step_axis(&mut point.position.x, &mut point.velocity.x, target.x, params);
    step_axis(&mut point.position.y, &mut point.velocity.y, target.y, params);
}
