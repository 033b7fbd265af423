//! GTK4 window that runs the interactive curve on the **main thread**.
//!
//! # Widget tree
//!
//! ```text
//! window
//! └ box (vertical)
//!     ├ .canvas        (GtkDrawingArea, cairo)
//!     └ .controls      (stiffness / damping sliders, reset button)
//! ```
//!
//! The drawing area's frame clock drives the simulation: every frame drains
//! pending socket commands, ticks the [`Session`] once and queues a redraw.
//! Pointer input reaches the session through the same [`Command`]s the
//! socket uses.

use crate::command::Command;
use crate::config::RenderConfig;
use crate::render::{
    Rgb, BACKGROUND, CURVE, CURVE_WIDTH, DRAGGED_POINT, DYNAMIC_POINT, DYNAMIC_RADIUS, FIXED_POINT,
    FIXED_RADIUS, HANDLE, HANDLE_WIDTH, TANGENT, TANGENT_LENGTH, TANGENT_WIDTH, TARGET_RADIUS,
};
use crate::session::{Frame, Session};
use crate::spring::{MAX_DAMPING, MAX_STIFFNESS, MIN_DAMPING, MIN_STIFFNESS};
use gtk4::prelude::*;
use gtk4::{cairo, gdk, glib};
use log::{error, info, warn};
use std::cell::RefCell;
use std::f64::consts::TAU;
use std::path::PathBuf;
use std::rc::Rc;
use std::sync::mpsc;

//  Default CSS

const DEFAULT_CSS: &str = r#"
.controls {
    padding: 8px 12px;
    background-color: #1b1b20;
}

.controls label {
    color: #d0d0d0;
}
"#;

/// Error from starting the GTK front-end.
#[derive(Debug, thiserror::Error)]
pub enum VisualizerError {
    #[error("failed to initialise GTK4: {0}")]
    Init(#[from] glib::BoolError),
}

//  Drawing

fn set_source(cr: &cairo::Context, color: Rgb) {
    cr.set_source_rgb(color.0, color.1, color.2);
}

fn dot(cr: &cairo::Context, x: f64, y: f64, radius: f64, color: Rgb) -> Result<(), cairo::Error> {
    set_source(cr, color);
    cr.arc(x, y, radius, 0.0, TAU);
    cr.fill()
}

fn draw_frame(cr: &cairo::Context, frame: &Frame, tangent_every: usize) -> Result<(), cairo::Error> {
    set_source(cr, BACKGROUND);
    cr.paint()?;

    let p = &frame.positions;

    // Handles
    set_source(cr, HANDLE);
    cr.set_line_width(HANDLE_WIDTH);
    cr.move_to(p[0].x, p[0].y);
    cr.line_to(p[1].x, p[1].y);
    cr.move_to(p[2].x, p[2].y);
    cr.line_to(p[3].x, p[3].y);
    cr.stroke()?;

    // Curve
    if let Some((first, rest)) = frame.samples.split_first() {
        set_source(cr, CURVE);
        cr.set_line_width(CURVE_WIDTH);
        cr.move_to(first.point.x, first.point.y);
        for s in rest {
            cr.line_to(s.point.x, s.point.y);
        }
        cr.stroke()?;
    }

    // Tangents
    if tangent_every > 0 {
        set_source(cr, TANGENT);
        cr.set_line_width(TANGENT_WIDTH);
        for s in frame.samples.iter().step_by(tangent_every) {
            if s.tangent.length == 0.0 {
                continue;
            }
            cr.move_to(s.point.x, s.point.y);
            cr.line_to(
                s.point.x + s.tangent.x * TANGENT_LENGTH,
                s.point.y + s.tangent.y * TANGENT_LENGTH,
            );
        }
        cr.stroke()?;
    }

    // Targets
    set_source(cr, DRAGGED_POINT);
    cr.set_line_width(1.0);
    for target in frame.targets.iter().flatten() {
        cr.new_sub_path();
        cr.arc(target.x, target.y, TARGET_RADIUS, 0.0, TAU);
    }
    cr.stroke()?;

    // Control points
    for (i, pos) in p.iter().enumerate() {
        let (radius, color) = match i {
            0 | 3 => (FIXED_RADIUS, FIXED_POINT),
            _ if frame.dragging == Some(i) => (DYNAMIC_RADIUS, DRAGGED_POINT),
            _ => (DYNAMIC_RADIUS, DYNAMIC_POINT),
        };
        dot(cr, pos.x, pos.y, radius, color)?;
    }
    Ok(())
}

//  Input plumbing

fn dispatch(session: &RefCell<Session>, cmd: Command) {
    if let Err(e) = session.borrow_mut().handle(cmd) {
        error!("command error: {}", e);
    }
}

fn labelled_scale(
    container: &gtk4::Box,
    label: &str,
    min: f64,
    max: f64,
    step: f64,
    value: f64,
) -> gtk4::Scale {
    container.append(&gtk4::Label::new(Some(label)));
    let scale = gtk4::Scale::with_range(gtk4::Orientation::Horizontal, min, max, step);
    scale.set_digits(3);
    // Keep socket-supplied values exact instead of rounding to the display.
    scale.set_round_digits(-1);
    scale.set_value(value);
    scale.set_draw_value(true);
    scale.set_hexpand(true);
    container.append(&scale);
    scale
}

/// Move a slider to `value` if something other than the slider changed it.
fn sync_scale(scale: &gtk4::Scale, value: f64) {
    if (scale.value() - value).abs() > 1e-9 {
        scale.set_value(value);
    }
}

//  Public API

/// Open the window and run the GLib main loop on the **current** thread
/// until the window is closed.
pub fn run_main_loop(
    session: Session,
    cmd_rx: mpsc::Receiver<Command>,
    css_path: Option<PathBuf>,
    render: RenderConfig,
) -> Result<(), VisualizerError> {
    gtk4::init()?;
    info!("GTK4 initialised on main thread");

    load_css(&css_path);

    let params = *session.params();
    let session = Rc::new(RefCell::new(session));

    let window = gtk4::Window::new();
    window.set_title(Some("springbez"));
    window.set_resizable(false);

    let root = gtk4::Box::new(gtk4::Orientation::Vertical, 0);
    window.set_child(Some(&root));

    //  Canvas
    let area = gtk4::DrawingArea::new();
    area.add_css_class("canvas");
    area.set_content_width(render.width as i32);
    area.set_content_height(render.height as i32);
    root.append(&area);

    {
        let session = session.clone();
        let tangent_every = render.tangent_every;
        area.set_draw_func(move |_, cr, _, _| {
            let frame = session.borrow().frame();
            if let Err(e) = draw_frame(cr, &frame, tangent_every) {
                warn!("draw failed: {}", e);
            }
        });
    }

    //  Pointer
    let drag = gtk4::GestureDrag::new();
    drag.set_button(gdk::BUTTON_PRIMARY);
    {
        let session = session.clone();
        drag.connect_drag_begin(move |_, x, y| dispatch(&session, Command::PointerDown { x, y }));
    }
    {
        let session = session.clone();
        drag.connect_drag_update(move |gesture, dx, dy| {
            if let Some((x, y)) = gesture.start_point() {
                dispatch(&session, Command::PointerMove { x: x + dx, y: y + dy });
            }
        });
    }
    {
        let session = session.clone();
        drag.connect_drag_end(move |_, _, _| dispatch(&session, Command::PointerUp));
    }
    area.add_controller(drag);

    let motion = gtk4::EventControllerMotion::new();
    {
        let session = session.clone();
        motion.connect_leave(move |_| dispatch(&session, Command::PointerLeave));
    }
    area.add_controller(motion);

    //  Controls
    let controls = gtk4::Box::new(gtk4::Orientation::Horizontal, 12);
    controls.add_css_class("controls");
    root.append(&controls);

    let stiffness = labelled_scale(
        &controls,
        "Stiffness",
        MIN_STIFFNESS,
        MAX_STIFFNESS,
        0.005,
        params.stiffness,
    );
    {
        let session = session.clone();
        stiffness.connect_value_changed(move |s| {
            dispatch(&session, Command::SetStiffness(s.value()))
        });
    }

    let damping = labelled_scale(&controls, "Damping", MIN_DAMPING, MAX_DAMPING, 0.005, params.damping);
    {
        let session = session.clone();
        damping.connect_value_changed(move |s| dispatch(&session, Command::SetDamping(s.value())));
    }

    let reset = gtk4::Button::with_label("Reset");
    {
        let session = session.clone();
        reset.connect_clicked(move |_| dispatch(&session, Command::Reset));
    }
    controls.append(&reset);

    //  Frame clock
    {
        let session = session.clone();
        area.add_tick_callback(move |area, _clock| {
            // 1. Drain socket commands.
            while let Ok(cmd) = cmd_rx.try_recv() {
                dispatch(&session, cmd);
            }

            // 2. Advance the springs.
            session.borrow_mut().tick();

            // 3. Follow parameter changes that arrived over the socket.
            //    The session borrow must be released before `set_value`
            //    re-enters `dispatch`.
            let params = *session.borrow().params();
            sync_scale(&stiffness, params.stiffness);
            sync_scale(&damping, params.damping);

            area.queue_draw();
            glib::ControlFlow::Continue
        });
    }

    let main_loop = glib::MainLoop::new(None, false);
    {
        let main_loop = main_loop.clone();
        window.connect_close_request(move |_| {
            info!("window closed");
            main_loop.quit();
            glib::Propagation::Proceed
        });
    }

    window.present();
    info!(
        "window ready ({}x{}, {} samples, CSS: {})",
        render.width,
        render.height,
        render.samples,
        css_path
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "<built-in>".into()),
    );

    info!("entering GLib main loop");
    main_loop.run();
    info!("GLib main loop exited");
    Ok(())
}

//  CSS loading

fn load_css(css_path: &Option<PathBuf>) {
    let provider = gtk4::CssProvider::new();

    let css_content = match css_path.as_ref().filter(|p| p.exists()) {
        Some(p) => match std::fs::read_to_string(p) {
            Ok(content) => {
                info!("user CSS: {} ({} bytes)", p.display(), content.len());
                content
            }
            Err(e) => {
                warn!("CSS read failed ({}): {}, using built-in", p.display(), e);
                DEFAULT_CSS.to_string()
            }
        },
        None => {
            info!("no user CSS, using built-in default");
            DEFAULT_CSS.to_string()
        }
    };

    #[allow(deprecated)]
    provider.load_from_data(&css_content);

    if let Some(display) = gdk::Display::default() {
        gtk4::style_context_add_provider_for_display(
            &display,
            &provider,
            gtk4::STYLE_PROVIDER_PRIORITY_APPLICATION,
        );
    } else {
        warn!("no GDK display, CSS will not be applied");
    }
}
