//! Module to work with OpenGL framebuffers.
//!
//! This module provides the offscreen render target: a color texture that
//! later passes can sample, plus a combined depth/stencil renderbuffer.

use std::rc::Rc;

use glow::HasContext;
use gltut_core::resources::{ResourceId, ResourceKind};

use crate::{
    abs::{GlContext, Texture},
    error::SetupError,
};

struct FramebufferObject {
    gl: Rc<GlContext>,
    id: glow::Framebuffer,
    ledger_id: ResourceId,
}

impl Drop for FramebufferObject {
    fn drop(&mut self) {
        unsafe {
            self.gl.delete_framebuffer(self.id);
        }
        self.gl.release(self.ledger_id);
    }
}

struct Renderbuffer {
    gl: Rc<GlContext>,
    id: glow::Renderbuffer,
    ledger_id: ResourceId,
}

impl Drop for Renderbuffer {
    fn drop(&mut self) {
        unsafe {
            self.gl.delete_renderbuffer(self.id);
        }
        self.gl.release(self.ledger_id);
    }
}

/// Represents an OpenGL framebuffer with a sampled color attachment and a
/// `DEPTH24_STENCIL8` renderbuffer.
pub struct Framebuffer {
    // declared in reverse creation order, so they drop in reverse too
    _depth_stencil: Renderbuffer,
    color: Texture,
    fbo: FramebufferObject,
}

impl Framebuffer {
    /// Creates a complete framebuffer of the given size.
    pub fn new(gl: &Rc<GlContext>, width: u32, height: u32) -> Result<Self, SetupError> {
        unsafe {
            let id = gl
                .create_framebuffer()
                .map_err(|e| SetupError::gl_create("framebuffer", e))?;
            let fbo = FramebufferObject {
                gl: Rc::clone(gl),
                id,
                ledger_id: gl.track(ResourceKind::Framebuffer, "offscreen"),
            };
            gl.bind_framebuffer(glow::FRAMEBUFFER, Some(fbo.id));

            let color = Texture::empty(gl, "offscreen/color", width, height)?;
            gl.framebuffer_texture_2d(
                glow::FRAMEBUFFER,
                glow::COLOR_ATTACHMENT0,
                glow::TEXTURE_2D,
                Some(color.id),
                0,
            );

            let id = gl
                .create_renderbuffer()
                .map_err(|e| SetupError::gl_create("renderbuffer", e))?;
            let depth_stencil = Renderbuffer {
                gl: Rc::clone(gl),
                id,
                ledger_id: gl.track(ResourceKind::Renderbuffer, "offscreen/depth-stencil"),
            };
            gl.bind_renderbuffer(glow::RENDERBUFFER, Some(depth_stencil.id));
            gl.renderbuffer_storage(
                glow::RENDERBUFFER,
                glow::DEPTH24_STENCIL8,
                width as i32,
                height as i32,
            );
            gl.framebuffer_renderbuffer(
                glow::FRAMEBUFFER,
                glow::DEPTH_STENCIL_ATTACHMENT,
                glow::RENDERBUFFER,
                Some(depth_stencil.id),
            );
            gl.bind_renderbuffer(glow::RENDERBUFFER, None);

            let status = gl.check_framebuffer_status(glow::FRAMEBUFFER);
            gl.bind_framebuffer(glow::FRAMEBUFFER, None);
            if status != glow::FRAMEBUFFER_COMPLETE {
                return Err(SetupError::IncompleteFramebuffer { status });
            }

            log::info!("created {width}x{height} offscreen target");
            Ok(Self {
                _depth_stencil: depth_stencil,
                color,
                fbo,
            })
        }
    }

    /// Binds the framebuffer for rendering. It is sized like the window, so
    /// the viewport stays as is.
    pub fn bind(&self) {
        unsafe {
            self.fbo.gl.bind_framebuffer(glow::FRAMEBUFFER, Some(self.fbo.id));
        }
    }

    /// Unbinds the framebuffer, reverting to the default framebuffer.
    pub fn unbind(gl: &glow::Context) {
        unsafe {
            gl.bind_framebuffer(glow::FRAMEBUFFER, None);
        }
    }

    /// Returns the color texture of the framebuffer.
    pub fn texture(&self) -> &Texture {
        &self.color
    }
}
