//! SDL2 and OpenGL application management.
//!
//! This module defines the [`App`] struct which encapsulates the SDL2
//! and OpenGL context necessary for creating a windowed application.

use std::rc::Rc;

use gltut_core::config::WindowConfig;

use crate::{abs::GlContext, error::SetupError};

/// The [`App`] struct encapsulates the SDL2 and OpenGL context.
pub struct App {
    pub sdl: sdl2::Sdl,
    pub video_subsystem: sdl2::VideoSubsystem,
    pub window: sdl2::video::Window,
    pub gl_context: sdl2::video::GLContext,
    pub gl: Rc<GlContext>,
    pub event_pump: sdl2::EventPump,
}

impl App {
    /// Opens a fixed-size, non-resizable window with a forward-compatible
    /// core-profile context of the configured version.
    pub fn new(config: &WindowConfig) -> Result<Self, SetupError> {
        let sdl = sdl2::init().map_err(SetupError::Window)?;
        let video_subsystem = sdl.video().map_err(SetupError::Window)?;

        let gl_attr = video_subsystem.gl_attr();
        gl_attr.set_context_profile(sdl2::video::GLProfile::Core);
        gl_attr.set_context_version(config.gl_major, config.gl_minor);
        gl_attr.set_context_flags().forward_compatible().set();

        let window = video_subsystem
            .window(&config.title, config.width, config.height)
            .opengl()
            .build()
            .map_err(|e| SetupError::Window(e.to_string()))?;

        let gl_context = window.gl_create_context().map_err(SetupError::Context)?;
        window
            .gl_make_current(&gl_context)
            .map_err(SetupError::Context)?;

        if config.vsync {
            if let Err(e) = video_subsystem.gl_set_swap_interval(sdl2::video::SwapInterval::VSync) {
                log::warn!("vsync unavailable: {e}");
            }
        }

        let gl = unsafe {
            glow::Context::from_loader_function(|s| {
                video_subsystem.gl_get_proc_address(s) as *const _
            })
        };
        log::info!(
            "created {}x{} window with OpenGL {}.{} core context",
            config.width,
            config.height,
            config.gl_major,
            config.gl_minor
        );

        let event_pump = sdl.event_pump().map_err(SetupError::Window)?;
        let gl = Rc::new(GlContext::new(gl));

        Ok(Self {
            sdl,
            video_subsystem,
            window,
            gl_context,
            gl,
            event_pump,
        })
    }

    /// Logs the outcome of the GPU teardown. Call after every GPU object has
    /// been dropped.
    pub fn report_teardown(&self) {
        match self.gl.close_ledger() {
            Ok(report) => log::info!(
                "released {} GPU objects in reverse creation order",
                report.released.len()
            ),
            Err(err) => log::error!("teardown: {err}"),
        }
    }
}
