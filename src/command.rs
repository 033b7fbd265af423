//! Commands understood by a [`Session`](crate::session::Session).
//!
//! Pointer events, live parameter changes and the reset action all travel
//! as [`Command`]s, whether they come from the GTK window or from the Unix
//! socket.  On the wire they are externally tagged JSON:
//!
//! ```json
//! {"PointerDown":{"x":205.0,"y":98.0}}
//! {"PointerMove":{"x":260.0,"y":140.0}}
//! "PointerUp"
//! {"SetStiffness":0.2}
//! {"SetDampingOrder":"separate"}
//! "Reset"
//! ```

use crate::spring::DampingOrder;
use serde::{Deserialize, Serialize};

/// Every input a session reacts to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Command {
    /// Primary button pressed at `(x, y)`.  Starts a drag if a dynamic
    /// control point is within the drag radius.
    PointerDown { x: f64, y: f64 },

    /// Pointer moved to `(x, y)`.  Retargets the dragged point, if any.
    PointerMove { x: f64, y: f64 },

    /// Primary button released.  Ends the drag.
    PointerUp,

    /// Pointer left the canvas.  Ends the drag like [`PointerUp`](Command::PointerUp).
    PointerLeave,

    /// Set spring stiffness.  Clamped into the accepted range.
    SetStiffness(f64),

    /// Set damping.  Clamped into `[0, 1]`.
    SetDamping(f64),

    /// Switch where damping is applied within a tick.
    SetDampingOrder(DampingOrder),

    /// Restore the default curve.
    Reset,

    /// Advance the simulation by one frame.
    ///
    /// Hosts with their own frame clock call
    /// [`Session::tick`](crate::session::Session::tick) directly; this is
    /// for scripted clients driving a paused simulation.
    Tick,
}

impl Command {
    /// Whether this is a pointer event (as opposed to configuration input).
    pub fn is_pointer(&self) -> bool {
        matches!(
            self,
            Command::PointerDown { .. }
                | Command::PointerMove { .. }
                | Command::PointerUp
                | Command::PointerLeave
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_wire_examples() {
        let cases = [
            (r#"{"PointerDown":{"x":205.0,"y":98.0}}"#, Command::PointerDown { x: 205.0, y: 98.0 }),
            (r#"{"PointerMove":{"x":260,"y":140}}"#, Command::PointerMove { x: 260.0, y: 140.0 }),
            (r#""PointerUp""#, Command::PointerUp),
            (r#""PointerLeave""#, Command::PointerLeave),
            (r#"{"SetStiffness":0.2}"#, Command::SetStiffness(0.2)),
            (r#"{"SetDamping":0.9}"#, Command::SetDamping(0.9)),
            (r#"{"SetDampingOrder":"separate"}"#, Command::SetDampingOrder(DampingOrder::Separate)),
            (r#""Reset""#, Command::Reset),
            (r#""Tick""#, Command::Tick),
        ];
        for (json, expected) in cases {
            let cmd: Command = serde_json::from_str(json).unwrap();
            assert_eq!(cmd, expected, "{}", json);
        }
    }

    #[test]
    fn unknown_command_is_rejected() {
        assert!(serde_json::from_str::<Command>(r#""Explode""#).is_err());
        assert!(serde_json::from_str::<Command>(r#"{"PointerDown":{"x":1.0}}"#).is_err());
    }

    #[test]
    fn pointer_classification() {
        assert!(Command::PointerDown { x: 0.0, y: 0.0 }.is_pointer());
        assert!(Command::PointerLeave.is_pointer());
        assert!(!Command::SetDamping(0.5).is_pointer());
        assert!(!Command::Reset.is_pointer());
    }
}
