//! SVG output for headless sessions.
//!
//! [`to_svg`] turns a [`Frame`] into a standalone document.
//! [`SvgFileRenderer`] keeps one file on disk up to date with the latest
//! frame, rewriting it only when the picture actually changed.

use super::{
    Rgb, BACKGROUND, CURVE, CURVE_WIDTH, DRAGGED_POINT, DYNAMIC_POINT, DYNAMIC_RADIUS, FIXED_POINT,
    FIXED_RADIUS, HANDLE, HANDLE_WIDTH, TANGENT, TANGENT_LENGTH, TANGENT_WIDTH, TARGET_RADIUS,
};
use crate::bezier::Point;
use crate::config::RenderConfig;
use crate::session::Frame;
use crate::traits::Renderer;
use log::debug;
use std::fmt::Write;
use std::path::{Path, PathBuf};

fn line(out: &mut String, a: Point, b: Point, color: Rgb, width: f64) {
    let _ = writeln!(
        out,
        r#"  <line x1="{:.2}" y1="{:.2}" x2="{:.2}" y2="{:.2}" stroke="{}" stroke-width="{}"/>"#,
        a.x,
        a.y,
        b.x,
        b.y,
        color.hex(),
        width
    );
}

fn circle(out: &mut String, c: Point, r: f64, fill: Option<Rgb>, stroke: Option<Rgb>) {
    let fill = fill.map(Rgb::hex).unwrap_or_else(|| "none".into());
    let stroke = stroke.map(Rgb::hex).unwrap_or_else(|| "none".into());
    let _ = writeln!(
        out,
        r#"  <circle cx="{:.2}" cy="{:.2}" r="{}" fill="{}" stroke="{}"/>"#,
        c.x, c.y, r, fill, stroke
    );
}

/// Render `frame` as an SVG document sized by `config`.
///
/// Layers, bottom to top: background, control handles (P0–P1, P2–P3), the
/// sampled curve, tangent indicators on every `tangent_every`-th sample,
/// drag targets and the control-point markers.
pub fn to_svg(frame: &Frame, config: &RenderConfig) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
        w = config.width,
        h = config.height
    );
    let _ = writeln!(
        out,
        r#"  <rect width="100%" height="100%" fill="{}"/>"#,
        BACKGROUND.hex()
    );

    let p = &frame.positions;
    line(&mut out, p[0], p[1], HANDLE, HANDLE_WIDTH);
    line(&mut out, p[2], p[3], HANDLE, HANDLE_WIDTH);

    let polyline: Vec<String> = frame
        .samples
        .iter()
        .map(|s| format!("{:.2},{:.2}", s.point.x, s.point.y))
        .collect();
    let _ = writeln!(
        out,
        r#"  <polyline points="{}" fill="none" stroke="{}" stroke-width="{}"/>"#,
        polyline.join(" "),
        CURVE.hex(),
        CURVE_WIDTH
    );

    if config.tangent_every > 0 {
        for s in frame.samples.iter().step_by(config.tangent_every) {
            // A vanished derivative has no direction to draw.
            if s.tangent.length == 0.0 {
                continue;
            }
            let tip = Point::new(
                s.point.x + s.tangent.x * TANGENT_LENGTH,
                s.point.y + s.tangent.y * TANGENT_LENGTH,
            );
            line(&mut out, s.point, tip, TANGENT, TANGENT_WIDTH);
        }
    }

    for target in frame.targets.iter().flatten() {
        circle(&mut out, *target, TARGET_RADIUS, None, Some(DRAGGED_POINT));
    }

    for (i, pos) in p.iter().enumerate() {
        if i == 0 || i == 3 {
            circle(&mut out, *pos, FIXED_RADIUS, Some(FIXED_POINT), None);
        } else if frame.dragging == Some(i) {
            circle(&mut out, *pos, DYNAMIC_RADIUS, Some(DRAGGED_POINT), None);
        } else {
            circle(&mut out, *pos, DYNAMIC_RADIUS, Some(DYNAMIC_POINT), None);
        }
    }

    out.push_str("</svg>\n");
    out
}

/// Failure to write the SVG file.
#[derive(Debug, thiserror::Error)]
#[error("failed to write {path}: {source}")]
pub struct RenderError {
    path: String,
    #[source]
    source: std::io::Error,
}

/// A [`Renderer`] that mirrors the latest frame into an SVG file.
///
/// The file is replaced atomically (write to a sibling, then rename) so a
/// viewer never sees a half-written document.
pub struct SvgFileRenderer {
    path: PathBuf,
    config: RenderConfig,
    last: Option<([Point; 4], Option<usize>)>,
}

impl SvgFileRenderer {
    pub fn new(path: impl AsRef<Path>, config: RenderConfig) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            config,
            last: None,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write(&self, contents: &str) -> Result<(), std::io::Error> {
        let tmp = self.path.with_extension("svg.tmp");
        std::fs::write(&tmp, contents)?;
        std::fs::rename(&tmp, &self.path)
    }
}

impl Renderer for SvgFileRenderer {
    type Error = RenderError;

    fn render(&mut self, frame: &Frame) -> Result<(), RenderError> {
        let key = (frame.positions, frame.dragging);
        if self.last == Some(key) {
            return Ok(());
        }
        self.write(&to_svg(frame, &self.config))
            .map_err(|source| RenderError {
                path: self.path.display().to_string(),
                source,
            })?;
        debug!("wrote {}", self.path.display());
        self.last = Some(key);
        Ok(())
    }
}
