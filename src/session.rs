//! The simulation session that ties the curve, spring parameters and drag
//! gesture together.
//!
//! [`Session`] owns all mutable state.  The host loop feeds it
//! [`Command`]s, calls [`tick`](Session::tick) once per frame and hands
//! [`frame`](Session::frame) snapshots to a renderer.  Everything happens on
//! one thread; no method yields part-way through.

use crate::bezier::{Point, Sample};
use crate::command::Command;
use crate::config::Config;
use crate::curve::{Curve, CurveError};
use crate::spring::{clamp_damping, clamp_stiffness, DampingOrder, SpringParameters};
use log::{debug, info, warn};
use serde::Serialize;

/// Pick-up radius around P1/P2, in pixels.
pub const DEFAULT_DRAG_RADIUS: f64 = 20.0;

/// Curve segments per frame snapshot.
pub const DEFAULT_SAMPLES: usize = 100;

/// Possible errors from the session.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SessionError {
    #[error(transparent)]
    Curve(#[from] CurveError),

    /// A live parameter update carried NaN or an infinity.
    #[error("{name} must be a finite number, got {value}")]
    InvalidParameter { name: &'static str, value: f64 },
}

/// An in-progress drag of P1 or P2.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragState {
    pub index: usize,
    pub pointer: Point,
}

/// Read-only snapshot handed to a [`Renderer`](crate::traits::Renderer).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Frame {
    /// Current positions of P0..P3.
    pub positions: [Point; 4],
    /// Targets of P0..P3 (always `None` for the endpoints).
    pub targets: [Option<Point>; 4],
    /// Evenly spaced samples across `t ∈ [0, 1]`.
    pub samples: Vec<Sample>,
    /// Index of the point being dragged, if any.
    pub dragging: Option<usize>,
    pub params: SpringParameters,
}

/// Interactive spring-driven curve.
///
/// # Typical usage
///
/// ```
/// use springbez::command::Command;
/// use springbez::session::Session;
///
/// let mut session = Session::default();
/// session.handle(Command::PointerDown { x: 200.0, y: 100.0 }).unwrap();
/// session.handle(Command::PointerMove { x: 250.0, y: 160.0 }).unwrap();
/// session.tick();
/// let frame = session.frame();
/// assert_eq!(frame.dragging, Some(1));
/// ```
#[derive(Debug, Clone)]
pub struct Session {
    curve: Curve,
    params: SpringParameters,
    drag: Option<DragState>,
    pointer: Point,
    drag_radius: f64,
    samples: usize,
}

impl Default for Session {
    fn default() -> Self {
        Self::new(SpringParameters::default(), DEFAULT_DRAG_RADIUS, DEFAULT_SAMPLES)
    }
}

impl Session {
    /// Create a session on the default curve.
    ///
    /// `params` is clamped into range.
    pub fn new(params: SpringParameters, drag_radius: f64, samples: usize) -> Self {
        Self {
            curve: Curve::default(),
            params: params.clamped(),
            drag: None,
            pointer: Point::ZERO,
            drag_radius,
            samples,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.spring_parameters(),
            config.interaction.drag_radius,
            config.render.samples,
        )
    }

    pub fn curve(&self) -> &Curve {
        &self.curve
    }

    pub fn params(&self) -> &SpringParameters {
        &self.params
    }

    pub fn drag(&self) -> Option<&DragState> {
        self.drag.as_ref()
    }

    /// Last pointer position seen, dragging or not.
    pub fn pointer(&self) -> Point {
        self.pointer
    }

    /// Process a single [`Command`].
    pub fn handle(&mut self, cmd: Command) -> Result<(), SessionError> {
        if cmd.is_pointer() {
            debug!("pointer: {:?}", cmd);
        } else {
            info!("command: {:?}", cmd);
        }

        match cmd {
            Command::PointerDown { x, y } => self.pointer_down(Point::new(x, y))?,
            Command::PointerMove { x, y } => self.pointer_move(Point::new(x, y))?,
            Command::PointerUp | Command::PointerLeave => self.end_drag()?,
            Command::SetStiffness(value) => self.set_stiffness(value)?,
            Command::SetDamping(value) => self.set_damping(value)?,
            Command::SetDampingOrder(order) => self.set_damping_order(order),
            Command::Reset => self.reset(),
            Command::Tick => self.tick(),
        }
        Ok(())
    }

    fn pointer_down(&mut self, pointer: Point) -> Result<(), SessionError> {
        self.pointer = pointer;
        if self.drag.is_some() {
            // A press without a matching release; drop the stale drag first.
            self.end_drag()?;
        }
        if let Some(index) = self.curve.hit_test(pointer, self.drag_radius) {
            self.curve.set_target(index, pointer)?;
            self.drag = Some(DragState { index, pointer });
            info!("drag start: P{} at ({:.1}, {:.1})", index, pointer.x, pointer.y);
        }
        Ok(())
    }

    fn pointer_move(&mut self, pointer: Point) -> Result<(), SessionError> {
        self.pointer = pointer;
        if let Some(drag) = self.drag.as_mut() {
            drag.pointer = pointer;
            self.curve.set_target(drag.index, pointer)?;
        }
        Ok(())
    }

    fn end_drag(&mut self) -> Result<(), SessionError> {
        if let Some(drag) = self.drag.take() {
            self.curve.clear_target(drag.index)?;
            info!("drag end: P{}", drag.index);
        }
        Ok(())
    }

    /// Set stiffness, clamped into range.  Non-finite values are rejected.
    pub fn set_stiffness(&mut self, value: f64) -> Result<(), SessionError> {
        if !value.is_finite() {
            return Err(SessionError::InvalidParameter {
                name: "stiffness",
                value,
            });
        }
        let clamped = clamp_stiffness(value);
        if clamped != value {
            warn!("stiffness {} clamped to {}", value, clamped);
        }
        self.params.stiffness = clamped;
        Ok(())
    }

    /// Set damping, clamped into `[0, 1]`.  Non-finite values are rejected.
    pub fn set_damping(&mut self, value: f64) -> Result<(), SessionError> {
        if !value.is_finite() {
            return Err(SessionError::InvalidParameter {
                name: "damping",
                value,
            });
        }
        let clamped = clamp_damping(value);
        if clamped != value {
            warn!("damping {} clamped to {}", value, clamped);
        }
        self.params.damping = clamped;
        Ok(())
    }

    pub fn set_damping_order(&mut self, order: DampingOrder) {
        self.params.damping_order = order;
    }

    /// Advance the simulation by one frame.
    pub fn tick(&mut self) {
        self.curve.tick(&self.params);
    }

    /// Restore the default curve and drop any drag, in one step.
    ///
    /// Spring parameters are left as they are.
    pub fn reset(&mut self) {
        self.curve.reset();
        self.drag = None;
        info!("curve reset");
    }

    /// Snapshot of everything a renderer needs.
    pub fn frame(&self) -> Frame {
        let points = self.curve.points();
        Frame {
            positions: self.curve.positions(),
            targets: [points[0].target, points[1].target, points[2].target, points[3].target],
            samples: self.curve.sample(self.samples),
            dragging: self.drag.map(|d| d.index),
            params: self.params,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curve::DEFAULT_POSITIONS;

    fn down(x: f64, y: f64) -> Command {
        Command::PointerDown { x, y }
    }

    fn mv(x: f64, y: f64) -> Command {
        Command::PointerMove { x, y }
    }

    #[test]
    fn press_on_p1_starts_drag() {
        let mut s = Session::default();
        s.handle(down(205.0, 95.0)).unwrap();
        assert_eq!(
            s.drag(),
            Some(&DragState {
                index: 1,
                pointer: Point::new(205.0, 95.0)
            })
        );
        assert_eq!(s.curve().point(1).unwrap().target, Some(Point::new(205.0, 95.0)));
        assert_eq!(s.curve().point(2).unwrap().target, None);
    }

    #[test]
    fn press_away_from_points_does_nothing() {
        let mut s = Session::default();
        s.handle(down(300.0, 300.0)).unwrap();
        assert!(s.drag().is_none());
        // Endpoints are never picked up.
        s.handle(down(100.0, 300.0)).unwrap();
        assert!(s.drag().is_none());
        assert_eq!(s.curve(), &Curve::default());
    }

    #[test]
    fn move_retargets_only_while_dragging() {
        let mut s = Session::default();
        s.handle(mv(400.0, 100.0)).unwrap();
        assert_eq!(s.curve().point(2).unwrap().target, None);
        assert_eq!(s.pointer(), Point::new(400.0, 100.0));

        s.handle(down(400.0, 100.0)).unwrap();
        s.handle(mv(420.0, 150.0)).unwrap();
        s.handle(mv(430.0, 170.0)).unwrap();
        assert_eq!(s.curve().point(2).unwrap().target, Some(Point::new(430.0, 170.0)));
        assert_eq!(s.drag().unwrap().pointer, Point::new(430.0, 170.0));
    }

    #[test]
    fn release_and_leave_clear_target() {
        for end in [Command::PointerUp, Command::PointerLeave] {
            let mut s = Session::default();
            s.handle(down(200.0, 100.0)).unwrap();
            s.handle(mv(260.0, 160.0)).unwrap();
            s.tick();
            s.handle(end).unwrap();
            assert!(s.drag().is_none());
            assert_eq!(s.curve().point(1).unwrap().target, None);

            let frozen = s.curve().point(1).unwrap().clone();
            for _ in 0..10 {
                s.tick();
            }
            assert_eq!(s.curve().point(1).unwrap(), &frozen);
        }
    }

    #[test]
    fn release_without_drag_is_harmless() {
        let mut s = Session::default();
        s.handle(Command::PointerUp).unwrap();
        s.handle(Command::PointerLeave).unwrap();
        assert_eq!(s.curve(), &Curve::default());
    }

    #[test]
    fn hit_test_uses_current_position() {
        let mut s = Session::default();
        s.handle(down(200.0, 100.0)).unwrap();
        s.handle(mv(300.0, 250.0)).unwrap();
        for _ in 0..400 {
            s.tick();
        }
        s.handle(Command::PointerUp).unwrap();

        // The original spot is empty now; the point sits near (300, 250).
        s.handle(down(200.0, 100.0)).unwrap();
        assert!(s.drag().is_none());
        s.handle(down(302.0, 248.0)).unwrap();
        assert_eq!(s.drag().map(|d| d.index), Some(1));
    }

    #[test]
    fn dragged_point_converges_to_pointer() {
        let mut s = Session::default();
        s.handle(down(400.0, 100.0)).unwrap();
        s.handle(mv(450.0, 100.0)).unwrap();
        let target = Point::new(450.0, 100.0);
        let mut ticks = 0;
        while s.curve().point(2).unwrap().position.distance(target) >= 1e-3 {
            s.tick();
            ticks += 1;
            assert!(ticks < 500);
        }
    }

    #[test]
    fn parameter_updates_are_clamped() {
        let mut s = Session::default();
        s.handle(Command::SetStiffness(0.25)).unwrap();
        s.handle(Command::SetDamping(0.8)).unwrap();
        assert_eq!(s.params().stiffness, 0.25);
        assert_eq!(s.params().damping, 0.8);

        s.handle(Command::SetStiffness(7.0)).unwrap();
        s.handle(Command::SetDamping(-3.0)).unwrap();
        assert_eq!(s.params().stiffness, 1.0);
        assert_eq!(s.params().damping, 0.0);

        s.handle(Command::SetStiffness(0.0)).unwrap();
        assert_eq!(s.params().stiffness, crate::spring::MIN_STIFFNESS);
    }

    #[test]
    fn non_finite_parameters_are_rejected() {
        let mut s = Session::default();
        let err = s.handle(Command::SetStiffness(f64::NAN)).unwrap_err();
        assert!(matches!(err, SessionError::InvalidParameter { name: "stiffness", .. }));
        let err = s.handle(Command::SetDamping(f64::INFINITY)).unwrap_err();
        assert!(matches!(err, SessionError::InvalidParameter { name: "damping", .. }));
        assert_eq!(s.params(), &SpringParameters::default());
    }

    #[test]
    fn damping_order_switch() {
        let mut s = Session::default();
        s.handle(Command::SetDampingOrder(DampingOrder::Separate)).unwrap();
        assert_eq!(s.params().damping_order, DampingOrder::Separate);
    }

    #[test]
    fn reset_restores_defaults_regardless_of_state() {
        let mut s = Session::default();
        s.handle(Command::SetStiffness(0.3)).unwrap();
        s.handle(down(200.0, 100.0)).unwrap();
        s.handle(mv(50.0, 50.0)).unwrap();
        for _ in 0..20 {
            s.tick();
        }
        s.handle(Command::Reset).unwrap();

        assert_eq!(s.curve(), &Curve::default());
        assert_eq!(s.curve().positions(), DEFAULT_POSITIONS);
        assert!(s.drag().is_none());
        assert_eq!(s.params().stiffness, 0.3);

        // A move after reset must not re-grab the released point.
        s.handle(mv(60.0, 60.0)).unwrap();
        assert_eq!(s.curve(), &Curve::default());
    }

    #[test]
    fn tick_command_advances() {
        let mut s = Session::default();
        s.handle(down(200.0, 100.0)).unwrap();
        s.handle(mv(300.0, 100.0)).unwrap();
        s.handle(Command::Tick).unwrap();
        assert!((s.curve().point(1).unwrap().position.x - 209.5).abs() < 1e-9);
    }

    #[test]
    fn stale_drag_released_on_second_press() {
        let mut s = Session::default();
        s.handle(down(200.0, 100.0)).unwrap();
        s.handle(down(400.0, 100.0)).unwrap();
        assert_eq!(s.drag().map(|d| d.index), Some(2));
        assert_eq!(s.curve().point(1).unwrap().target, None);
    }

    #[test]
    fn frame_snapshot() {
        let mut s = Session::new(SpringParameters::default(), DEFAULT_DRAG_RADIUS, 10);
        s.handle(down(400.0, 100.0)).unwrap();
        let frame = s.frame();
        assert_eq!(frame.positions, DEFAULT_POSITIONS);
        assert_eq!(frame.targets[2], Some(Point::new(400.0, 100.0)));
        assert_eq!(frame.targets[0], None);
        assert_eq!(frame.samples.len(), 11);
        assert_eq!(frame.samples[0].point, DEFAULT_POSITIONS[0]);
        assert_eq!(frame.samples[10].point, DEFAULT_POSITIONS[3]);
        assert_eq!(frame.dragging, Some(2));
        assert_eq!(frame.params, SpringParameters::default());
    }

    #[test]
    fn from_config_uses_sections() {
        let json = r#"{
            "spring": { "stiffness": 0.3, "damping": 2.0 },
            "interaction": { "drag_radius": 5.0 },
            "render": { "samples": 8 }
        }"#;
        let cfg: Config = serde_json::from_str(json).unwrap();
        let mut s = Session::from_config(&cfg);
        assert_eq!(s.params().stiffness, 0.3);
        assert_eq!(s.params().damping, 1.0);
        assert_eq!(s.frame().samples.len(), 9);
        // 7 px away: outside the 5 px radius.
        s.handle(down(207.0, 100.0)).unwrap();
        assert!(s.drag().is_none());
    }
}
