//! Seams between the simulation and its host.
//!
//! A [`Session`](crate::session::Session) never talks to a window system
//! or a socket directly: input arrives through a [`CommandSource`], output
//! leaves through a [`Renderer`].

use crate::command::Command;
use crate::session::Frame;
use std::sync::mpsc;

/// A source of [`Command`]s.
///
/// Implementations listen on some transport (a Unix socket, a test
/// harness, …) and forward parsed commands into the provided
/// [`mpsc::Sender`].
///
/// # Contract
///
/// * [`run`](CommandSource::run) **blocks** until the source is exhausted or
///   an unrecoverable error occurs.
/// * Each received command must be sent through `sink` exactly once.
/// * Implementations must be [`Send`] so they can run on a dedicated thread.
pub trait CommandSource: Send {
    /// The error type produced by this source.
    type Error: std::error::Error + Send + 'static;

    /// Start listening and forward every incoming [`Command`] into `sink`.
    fn run(&mut self, sink: mpsc::Sender<Command>) -> Result<(), Self::Error>;
}

/// Draws a [`Frame`].
///
/// Rendering is read-only: a renderer only sees the snapshot and cannot
/// reach back into the session.
pub trait Renderer {
    /// The error type produced by this renderer.
    type Error: std::error::Error + Send + 'static;

    fn render(&mut self, frame: &Frame) -> Result<(), Self::Error>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bezier::Point;
    use crate::session::Session;

    #[derive(Debug, thiserror::Error)]
    #[error("mock error")]
    struct MockError;

    /// A test double that emits a fixed sequence of commands.
    struct MockSource {
        commands: Vec<Command>,
    }

    impl CommandSource for MockSource {
        type Error = MockError;

        fn run(&mut self, sink: mpsc::Sender<Command>) -> Result<(), MockError> {
            for cmd in self.commands.drain(..) {
                let _ = sink.send(cmd);
            }
            Ok(())
        }
    }

    /// A test double that records the dynamic point positions it was shown.
    #[derive(Default)]
    struct RecordingRenderer {
        seen: Vec<[Point; 4]>,
    }

    impl Renderer for RecordingRenderer {
        type Error = MockError;

        fn render(&mut self, frame: &Frame) -> Result<(), MockError> {
            self.seen.push(frame.positions);
            Ok(())
        }
    }

    #[test]
    fn mock_source_emits_commands() {
        let mut src = MockSource {
            commands: vec![Command::PointerDown { x: 200.0, y: 100.0 }, Command::PointerUp],
        };
        let (tx, rx) = mpsc::channel();
        src.run(tx).unwrap();
        let cmds: Vec<Command> = rx.try_iter().collect();
        assert_eq!(cmds, vec![Command::PointerDown { x: 200.0, y: 100.0 }, Command::PointerUp]);
    }

    #[test]
    fn source_drives_session_into_renderer() {
        let mut src = MockSource {
            commands: vec![
                Command::PointerDown { x: 200.0, y: 100.0 },
                Command::PointerMove { x: 260.0, y: 100.0 },
            ],
        };
        let (tx, rx) = mpsc::channel();
        src.run(tx).unwrap();

        let mut session = Session::default();
        let mut renderer = RecordingRenderer::default();
        for cmd in rx.try_iter() {
            session.handle(cmd).unwrap();
        }
        for _ in 0..3 {
            session.tick();
            renderer.render(&session.frame()).unwrap();
        }

        assert_eq!(renderer.seen.len(), 3);
        let xs: Vec<f64> = renderer.seen.iter().map(|p| p[1].x).collect();
        assert!(xs[0] > 200.0 && xs[0] < xs[1] && xs[1] < xs[2]);
        assert!(renderer.seen.iter().all(|p| p[0] == Point::new(100.0, 300.0)));
    }
}
