//! The four control points of the simulated curve.
//!
//! [`Curve`] guarantees the layout `P0 P1 P2 P3` with fixed endpoints and
//! spring-driven interior points.  Storage is private: the only way to move
//! a point is to give a dynamic point a target and [`tick`](Curve::tick).

use crate::bezier::{self, Point, Sample, Tangent};
use crate::spring::{self, SpringParameters};
use serde::Serialize;

/// Default curve, restored by [`Curve::reset`].
pub const DEFAULT_POSITIONS: [Point; 4] = [
    Point::new(100.0, 300.0),
    Point::new(200.0, 100.0),
    Point::new(400.0, 100.0),
    Point::new(500.0, 300.0),
];

/// Indices of the spring-driven points, in hit-test priority order.
pub const DYNAMIC_INDICES: [usize; 2] = [1, 2];

/// Whether a control point can move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Role {
    /// Endpoint; never moves once set.
    Fixed,
    /// Interior point pulled toward its target by a spring.
    Dynamic,
}

/// One control point and its spring state.
///
/// For [`Role::Fixed`] points `velocity` stays zero and `target` stays
/// `None`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ControlPoint {
    pub position: Point,
    pub velocity: Point,
    /// Where the spring pulls.  `None` means the point is at rest.
    pub target: Option<Point>,
    pub role: Role,
}

impl ControlPoint {
    pub fn fixed(position: Point) -> Self {
        Self {
            position,
            velocity: Point::ZERO,
            target: None,
            role: Role::Fixed,
        }
    }

    pub fn dynamic(position: Point) -> Self {
        Self {
            position,
            velocity: Point::ZERO,
            target: None,
            role: Role::Dynamic,
        }
    }
}

/// Attempt to steer a point that is not spring-driven.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum CurveError {
    #[error("control point {0} is not dynamic (only P1 and P2 accept targets)")]
    NotDynamic(usize),
}

/// A cubic Bézier curve whose interior control points are springs.
#[derive(Debug, Clone, PartialEq)]
pub struct Curve {
    points: [ControlPoint; 4],
}

impl Default for Curve {
    fn default() -> Self {
        Self::new(DEFAULT_POSITIONS)
    }
}

impl Curve {
    /// Build a curve at rest from four positions.
    pub fn new(positions: [Point; 4]) -> Self {
        let [p0, p1, p2, p3] = positions;
        Self {
            points: [
                ControlPoint::fixed(p0),
                ControlPoint::dynamic(p1),
                ControlPoint::dynamic(p2),
                ControlPoint::fixed(p3),
            ],
        }
    }

    /// Control point `index`, or `None` past P3.
    pub fn point(&self, index: usize) -> Option<&ControlPoint> {
        self.points.get(index)
    }

    pub fn points(&self) -> &[ControlPoint; 4] {
        &self.points
    }

    /// Current positions of P0..P3.
    pub fn positions(&self) -> [Point; 4] {
        [
            self.points[0].position,
            self.points[1].position,
            self.points[2].position,
            self.points[3].position,
        ]
    }

    fn dynamic_mut(&mut self, index: usize) -> Result<&mut ControlPoint, CurveError> {
        match self.points.get_mut(index) {
            Some(point) if point.role == Role::Dynamic => Ok(point),
            _ => Err(CurveError::NotDynamic(index)),
        }
    }

    /// Point the spring of P`index` at `target`.
    pub fn set_target(&mut self, index: usize, target: Point) -> Result<(), CurveError> {
        self.dynamic_mut(index)?.target = Some(target);
        Ok(())
    }

    /// Release P`index`.  It keeps its position and velocity but no longer
    /// moves on [`tick`](Curve::tick) until it is targeted again.
    pub fn clear_target(&mut self, index: usize) -> Result<(), CurveError> {
        self.dynamic_mut(index)?.target = None;
        Ok(())
    }

    /// Advance every dynamic point by one frame.
    pub fn tick(&mut self, params: &SpringParameters) {
        for point in &mut self.points {
            spring::step(point, params);
        }
    }

    /// Restore the default curve: positions, velocities and targets are
    /// replaced in a single assignment.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// First dynamic point strictly within `radius` of `pointer`.
    pub fn hit_test(&self, pointer: Point, radius: f64) -> Option<usize> {
        DYNAMIC_INDICES
            .into_iter()
            .find(|&i| self.points[i].position.distance(pointer) < radius)
    }

    pub fn point_at(&self, t: f64) -> Point {
        bezier::point_at(&self.positions(), t)
    }

    pub fn tangent_at(&self, t: f64) -> Tangent {
        bezier::tangent_at(&self.positions(), t)
    }

    pub fn sample(&self, segments: usize) -> Vec<Sample> {
        bezier::sample(&self.positions(), segments)
    }
}
