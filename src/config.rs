//! Application configuration.
//!
//! The configuration is loaded from `$XDG_CONFIG_HOME/springbez/config.json`.
//! Every section is optional and falls back to its compiled-in defaults;
//! unknown keys are ignored so the file can grow new sections later.
//!
//! # Example
//!
//! ```json
//! {
//!   "spring": { "stiffness": 0.1, "damping": 0.95, "damping_order": "coupled" },
//!   "interaction": { "drag_radius": 20.0 },
//!   "render": {
//!     "width": 900,
//!     "height": 600,
//!     "samples": 100,
//!     "tangent_every": 10,
//!     "frame_interval_ms": 16,
//!     "svg_path": "/tmp/springbez.svg"
//!   }
//! }
//! ```

use crate::session::{DEFAULT_DRAG_RADIUS, DEFAULT_SAMPLES};
use crate::spring::{DampingOrder, SpringParameters, DEFAULT_DAMPING, DEFAULT_STIFFNESS};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Initial spring coefficients.
    #[serde(default)]
    pub spring: SpringConfig,

    /// Pointer interaction settings.
    #[serde(default)]
    pub interaction: InteractionConfig,

    /// Canvas size, sampling density and frame pacing.
    #[serde(default)]
    pub render: RenderConfig,
}

/// Initial spring coefficients.  Values outside the accepted range are
/// clamped when the session is created.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SpringConfig {
    pub stiffness: f64,
    pub damping: f64,
    /// `"coupled"` (default) or `"separate"`.
    pub damping_order: DampingOrder,
}

impl Default for SpringConfig {
    fn default() -> Self {
        Self {
            stiffness: DEFAULT_STIFFNESS,
            damping: DEFAULT_DAMPING,
            damping_order: DampingOrder::Coupled,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InteractionConfig {
    /// How close (in pixels) a press must land to P1/P2 to pick it up.
    pub drag_radius: f64,
}

impl Default for InteractionConfig {
    fn default() -> Self {
        Self {
            drag_radius: DEFAULT_DRAG_RADIUS,
        }
    }
}

/// Rendering settings shared by the GTK window and the SVG renderer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Canvas width in pixels.
    pub width: u32,
    /// Canvas height in pixels.
    pub height: u32,
    /// Number of curve segments drawn per frame.
    pub samples: usize,
    /// Draw a tangent indicator on every n-th sample.  `0` disables them.
    pub tangent_every: usize,
    /// Tick interval of the headless loop (ms).  The GTK window follows
    /// the display's frame clock instead.
    pub frame_interval_ms: u64,
    /// Where the headless loop writes its SVG.  Defaults to
    /// `$XDG_RUNTIME_DIR/springbez.svg`.
    pub svg_path: Option<PathBuf>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 900,
            height: 600,
            samples: DEFAULT_SAMPLES,
            tangent_every: 10,
            frame_interval_ms: 16,
            svg_path: None,
        }
    }
}

impl Config {
    /// Load configuration from a JSON file at `path`.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError(format!("failed to read {}: {}", path.display(), e)))?;
        let config: Self = serde_json::from_str(&contents)
            .map_err(|e| ConfigError(format!("failed to parse {}: {}", path.display(), e)))?;
        Ok(config)
    }

    /// Spring parameters from the `spring` section, clamped into range.
    pub fn spring_parameters(&self) -> SpringParameters {
        SpringParameters {
            stiffness: self.spring.stiffness,
            damping: self.spring.damping,
            damping_order: self.spring.damping_order,
        }
        .clamped()
    }
}

/// Error from loading or parsing a configuration file.
#[derive(Debug, thiserror::Error)]
#[error("config error: {0}")]
pub struct ConfigError(String);
