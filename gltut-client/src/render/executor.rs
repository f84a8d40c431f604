//! Frame plan execution.
//!
//! [`execute`] walks a [`FramePlan`] and issues the matching GL calls. The
//! GPU objects a plan refers to by id are looked up through [`Bindings`],
//! which every demo implements over the objects it owns.

use std::ops::Range;

use glow::HasContext;
use gltut_core::pipeline::{
    Capability, ClearMask, Command, CompareFunc, FramePlan, Geometry, ProgramId, StencilAction,
    Target, TextureSlot,
};

use crate::{
    abs::{Framebuffer, Mesh, ShaderProgram, Texture},
    error::SetupError,
    render::shaders,
};

/// Resolves the ids used in frame plans to live GPU objects.
pub trait Bindings {
    fn program(&self, id: ProgramId) -> Option<&ShaderProgram>;
    fn texture(&self, slot: TextureSlot) -> Option<&Texture>;
    /// The mesh holding `geometry`, and the vertex range to draw when it is
    /// only part of the mesh.
    fn geometry(&self, geometry: Geometry) -> Option<(&Mesh, Option<Range<usize>>)>;
    /// The offscreen target, if the demo has one.
    fn framebuffer(&self) -> Option<&Framebuffer> {
        None
    }
}

/// Checks that every id `plan` uses is bound, and that uniforms and draws
/// only happen with a program in use.
pub fn check_bindings<B: Bindings + ?Sized>(plan: &FramePlan, bindings: &B) -> Result<(), SetupError> {
    let mut program_in_use = false;
    for command in plan {
        match *command {
            Command::BindTarget(Target::Offscreen) if bindings.framebuffer().is_none() => {
                return Err(SetupError::MissingBinding("offscreen target".to_string()));
            }
            Command::UseProgram(id) => {
                if bindings.program(id).is_none() {
                    return Err(SetupError::MissingBinding(format!("program {id:?}")));
                }
                program_in_use = true;
            }
            Command::BindTexture { texture, .. } if bindings.texture(texture).is_none() => {
                return Err(SetupError::MissingBinding(format!("texture {texture:?}")));
            }
            Command::SetModel(_) | Command::SetOverrideColor(_) if !program_in_use => {
                return Err(SetupError::MissingBinding(
                    "program for uniform update".to_string(),
                ));
            }
            Command::Draw { geometry, role } => {
                if !program_in_use {
                    return Err(SetupError::MissingBinding(format!("program for {role} draw")));
                }
                if bindings.geometry(geometry).is_none() {
                    return Err(SetupError::MissingBinding(format!("geometry {geometry:?}")));
                }
            }
            _ => {}
        }
    }
    Ok(())
}

/// Issues the GL calls of `plan` in order.
///
/// Plans are expected to have passed [`check_bindings`]; unbound ids are
/// logged and skipped.
pub fn execute<B: Bindings + ?Sized>(gl: &glow::Context, bindings: &B, plan: &FramePlan) {
    let mut program: Option<&ShaderProgram> = None;

    for command in plan {
        match *command {
            Command::BindTarget(Target::Default) => Framebuffer::unbind(gl),
            Command::BindTarget(Target::Offscreen) => match bindings.framebuffer() {
                Some(framebuffer) => framebuffer.bind(),
                None => log::error!("no offscreen target bound"),
            },
            Command::UseProgram(id) => {
                program = bindings.program(id);
                match program {
                    Some(p) => p.use_program(),
                    None => log::error!("program {id:?} is not bound"),
                }
            }
            Command::BindTexture { unit, texture } => match bindings.texture(texture) {
                Some(t) => t.bind(unit),
                None => log::error!("texture {texture:?} is not bound"),
            },
            Command::Enable(capability) => unsafe { gl.enable(capability_enum(capability)) },
            Command::Disable(capability) => unsafe { gl.disable(capability_enum(capability)) },
            Command::ClearColor([r, g, b, a]) => unsafe { gl.clear_color(r, g, b, a) },
            Command::Clear(mask) => unsafe { gl.clear(clear_bits(mask)) },
            Command::StencilFunc { func, reference, mask } => unsafe {
                gl.stencil_func(compare_enum(func), reference, mask)
            },
            Command::StencilOp { stencil_fail, depth_fail, pass } => unsafe {
                gl.stencil_op(
                    stencil_action_enum(stencil_fail),
                    stencil_action_enum(depth_fail),
                    stencil_action_enum(pass),
                )
            },
            Command::StencilMask(mask) => unsafe { gl.stencil_mask(mask) },
            Command::DepthMask(write) => unsafe { gl.depth_mask(write) },
            Command::SetModel(model) => {
                if let Some(p) = program {
                    p.set_uniform(shaders::MODEL, model);
                }
            }
            Command::SetOverrideColor(color) => {
                if let Some(p) = program {
                    p.set_uniform(shaders::OVERRIDE_COLOR, color);
                }
            }
            Command::Draw { geometry, role } => match bindings.geometry(geometry) {
                Some((mesh, None)) => mesh.draw(),
                Some((mesh, Some(range))) => mesh.draw_range(range),
                None => log::error!("geometry {geometry:?} for {role} draw is not bound"),
            },
        }
    }
}

pub fn capability_enum(capability: Capability) -> u32 {
    match capability {
        Capability::DepthTest => glow::DEPTH_TEST,
        Capability::StencilTest => glow::STENCIL_TEST,
    }
}

pub fn compare_enum(func: CompareFunc) -> u32 {
    match func {
        CompareFunc::Always => glow::ALWAYS,
        CompareFunc::Equal => glow::EQUAL,
    }
}

pub fn stencil_action_enum(action: StencilAction) -> u32 {
    match action {
        StencilAction::Keep => glow::KEEP,
        StencilAction::Replace => glow::REPLACE,
    }
}

pub fn clear_bits(mask: ClearMask) -> u32 {
    let mut bits = 0;
    if mask.color {
        bits |= glow::COLOR_BUFFER_BIT;
    }
    if mask.depth {
        bits |= glow::DEPTH_BUFFER_BIT;
    }
    if mask.stencil {
        bits |= glow::STENCIL_BUFFER_BIT;
    }
    bits
}
