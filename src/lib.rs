//! **springbez**: an interactive cubic Bézier curve whose interior control
//! points follow the pointer on damped springs.
//!
//! The endpoints `P0` and `P3` are fixed.  Dragging `P1` or `P2` does not
//! move the point directly; it sets a *target*, and on every frame a
//! spring-damper step pulls the point toward it.
//!
//! # Architecture
//!
//! * [`bezier`] evaluates positions and unit tangents (pure functions).
//! * [`spring`] advances one control point by one tick.
//! * [`curve`] holds the four control points and enforces which may move.
//! * [`session`] owns all mutable state and reacts to [`command::Command`]s.
//!
//! Input and output go through the traits in [`traits`]:
//! [`traits::CommandSource`] (e.g. the Unix socket in [`ipc`]) and
//! [`traits::Renderer`] (e.g. the SVG writer in [`render`]).  The GTK
//! window in [`visualizer`] is the interactive host.

pub mod bezier;
pub mod command;
pub mod config;
pub mod curve;
pub mod ipc;
pub mod render;
pub mod session;
pub mod spring;
pub mod traits;
pub mod visualizer;
