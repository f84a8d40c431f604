//! Render-loop driver shared by both binaries.
//!
//! [`launch`] loads the config, sets up logging and the window, builds a
//! [`Demo`] and hands it to [`run`], which draws frames until the window is
//! closed or Escape is pressed.

use std::{process::ExitCode, rc::Rc};

use gltut_core::{clock::FrameClock, config::DemoConfig, pipeline::FramePlan};
use sdl2::{event::Event, keyboard::Keycode};

use crate::{
    abs::{App, GlContext},
    error::SetupError,
    logging,
    render::executor::{self, Bindings},
};

/// A demo owns its GPU objects and describes each frame as a plan over them.
pub trait Demo: Bindings {
    fn name(&self) -> &str;

    /// The frame to draw `elapsed` seconds after the loop started.
    fn frame(&self, elapsed: f32) -> FramePlan;
}

/// Whether `event` ends the render loop.
pub fn is_exit_event(event: &Event) -> bool {
    matches!(
        event,
        Event::Quit { .. }
            | Event::KeyDown {
                keycode: Some(Keycode::Escape),
                ..
            }
    )
}

/// Draws frames of `demo` until an exit event arrives. Returns the number
/// of frames presented.
///
/// The first frame's plan is checked against the demo's bindings before the
/// loop starts, so the loop itself cannot fail.
pub fn run<D: Demo + ?Sized>(app: &mut App, demo: &D) -> Result<u64, SetupError> {
    executor::check_bindings(&demo.frame(0.0), demo)?;
    log::info!("running {}", demo.name());

    let clock = FrameClock::start();
    let mut frames = 0u64;

    'running: loop {
        for event in app.event_pump.poll_iter() {
            if is_exit_event(&event) {
                break 'running;
            }
        }

        let plan = demo.frame(clock.elapsed());
        executor::execute(&app.gl, demo, &plan);
        app.window.gl_swap_window();
        frames += 1;
    }

    log::info!(
        "{} stopped after {frames} frames ({:.1}s)",
        demo.name(),
        clock.elapsed()
    );
    Ok(frames)
}

/// Entry point of a demo binary. `build` creates the demo's GPU objects on
/// the window's context; the demo is dropped before the teardown report.
pub fn launch<D, F>(build: F) -> ExitCode
where
    D: Demo,
    F: FnOnce(&Rc<GlContext>, &DemoConfig) -> Result<D, SetupError>,
{
    let config = DemoConfig::from_env();
    let level = config
        .as_ref()
        .map_or(log::LevelFilter::Info, DemoConfig::level_filter);
    if let Err(e) = logging::init(level) {
        eprintln!("logging unavailable: {e}");
    }

    let result = config
        .map_err(SetupError::from)
        .and_then(|config| run_with(&config, build));

    match result {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn run_with<D, F>(config: &DemoConfig, build: F) -> Result<u64, SetupError>
where
    D: Demo,
    F: FnOnce(&Rc<GlContext>, &DemoConfig) -> Result<D, SetupError>,
{
    let mut app = App::new(&config.window)?;
    let result = build(&app.gl, config).and_then(|demo| run(&mut app, &demo));
    app.report_teardown();
    result
}

#[cfg(test)]
mod tests {
    use sdl2::keyboard::{Mod, Scancode};

    use super::*;

    fn key_down(keycode: Keycode, scancode: Scancode) -> Event {
        Event::KeyDown {
            timestamp: 0,
            window_id: 0,
            keycode: Some(keycode),
            scancode: Some(scancode),
            keymod: Mod::NOMOD,
            repeat: false,
        }
    }

    #[test]
    fn test_quit_exits() {
        assert!(is_exit_event(&Event::Quit { timestamp: 0 }));
    }

    #[test]
    fn test_escape_exits() {
        assert!(is_exit_event(&key_down(Keycode::Escape, Scancode::Escape)));
    }

    #[test]
    fn test_other_keys_do_not_exit() {
        assert!(!is_exit_event(&key_down(Keycode::Space, Scancode::Space)));
        assert!(!is_exit_event(&key_down(Keycode::Q, Scancode::Q)));
    }

    #[test]
    fn test_escape_release_does_not_exit() {
        let event = Event::KeyUp {
            timestamp: 0,
            window_id: 0,
            keycode: Some(Keycode::Escape),
            scancode: Some(Scancode::Escape),
            keymod: Mod::NOMOD,
            repeat: false,
        };
        assert!(!is_exit_event(&event));
    }
}
