//! Entry point for **springbez**.
//!
//! Starts the Unix-socket command listener on a background thread, then
//! runs either the GTK window (default, `visualizer-gtk` feature) or a
//! headless loop that ticks on a timer and mirrors the curve into an SVG
//! file (`--headless`, or when built without the feature).

use log::{error, info};
use springbez::command::Command;
use springbez::config::Config;
use springbez::ipc::listener::UnixSocketListener;
use springbez::render::svg::SvgFileRenderer;
use springbez::session::Session;
use springbez::traits::{CommandSource, Renderer};
use std::path::PathBuf;
use std::sync::mpsc;
use std::time::Duration;

fn runtime_dir() -> PathBuf {
    PathBuf::from(std::env::var("XDG_RUNTIME_DIR").unwrap_or_else(|_| "/tmp".into()))
}

/// Default socket path for the command listener.
fn default_socket_path() -> PathBuf {
    runtime_dir().join("springbez.sock")
}

/// Resolve the config directory (`$XDG_CONFIG_HOME/springbez`).
fn config_dir() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME").unwrap_or_else(|_| {
        let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".into());
        format!("{}/.config", home)
    });
    PathBuf::from(base).join("springbez")
}

/// Try to load the config from `$XDG_CONFIG_HOME/springbez/config.json`,
/// falling back to compiled-in defaults.
fn load_config() -> Config {
    let path = config_dir().join("config.json");
    match Config::load(&path) {
        Ok(cfg) => {
            info!("loaded config from {}", path.display());
            cfg
        }
        Err(e) => {
            info!("no config file ({}), using defaults", e);
            Config::default()
        }
    }
}

//  Main

fn main() {
    env_logger::init();

    let headless = std::env::args().any(|a| a == "--headless");
    let config = load_config();
    let session = Session::from_config(&config);

    let (cmd_tx, cmd_rx) = mpsc::channel::<Command>();
    spawn_command_sources(cmd_tx);

    if headless {
        run_headless(session, cmd_rx, config);
    } else {
        run_interactive(session, cmd_rx, config);
    }
}

#[cfg(feature = "visualizer-gtk")]
fn run_interactive(session: Session, cmd_rx: mpsc::Receiver<Command>, config: Config) {
    let css_path = config_dir().join("style.css");
    if let Err(e) = springbez::visualizer::gtk::run_main_loop(
        session,
        cmd_rx,
        Some(css_path),
        config.render,
    ) {
        error!("{}", e);
        std::process::exit(1);
    }
}

#[cfg(not(feature = "visualizer-gtk"))]
fn run_interactive(session: Session, cmd_rx: mpsc::Receiver<Command>, config: Config) {
    info!("built without `visualizer-gtk`, running headless");
    run_headless(session, cmd_rx, config);
}

/// Timer-driven loop: drain commands, tick, render.
fn run_headless(mut session: Session, cmd_rx: mpsc::Receiver<Command>, config: Config) {
    let svg_path = config
        .render
        .svg_path
        .clone()
        .unwrap_or_else(|| runtime_dir().join("springbez.svg"));
    let interval = Duration::from_millis(config.render.frame_interval_ms.max(1));
    let mut renderer = SvgFileRenderer::new(&svg_path, config.render);

    info!(
        "springbez running headless (frame every {}ms, SVG: {})",
        interval.as_millis(),
        renderer.path().display()
    );

    loop {
        loop {
            match cmd_rx.try_recv() {
                Ok(cmd) => {
                    if let Err(e) = session.handle(cmd) {
                        error!("command error: {}", e);
                    }
                }
                Err(mpsc::TryRecvError::Empty) => break,
                Err(mpsc::TryRecvError::Disconnected) => {
                    info!("all command sources closed, exiting");
                    return;
                }
            }
        }

        session.tick();
        if let Err(e) = renderer.render(&session.frame()) {
            error!("render error: {}", e);
        }
        std::thread::sleep(interval);
    }
}

//  Helpers

fn spawn_command_sources(tx: mpsc::Sender<Command>) {
    let path = default_socket_path();
    std::thread::spawn(move || {
        let mut source = UnixSocketListener::new(&path);
        if let Err(e) = source.run(tx) {
            error!("socket listener error: {}", e);
        }
    });
}
