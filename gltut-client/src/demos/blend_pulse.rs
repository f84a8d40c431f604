use std::{ops::Range, rc::Rc};

use gltut_core::{
    config::DemoConfig,
    geometry::{QUAD_ELEMENTS, QUAD_VERTICES},
    pipeline::{self, FramePlan, Geometry, ProgramId, TextureSlot},
    transform::{self, Camera},
};

use crate::{
    abs::{GlContext, Mesh, ShaderProgram, Texture},
    driver::Demo,
    error::SetupError,
    render::{executor::Bindings, shaders},
};

/// A textured quad blending two images, spinning about Z at 180°/s while its
/// scale pulses between 0.5 and 1.0.
pub struct BlendPulse {
    // reverse creation order
    secondary: Texture,
    primary: Texture,
    quad: Mesh,
    program: ShaderProgram,
}

impl BlendPulse {
    pub fn new(gl: &Rc<GlContext>, config: &DemoConfig) -> Result<Self, SetupError> {
        let program = ShaderProgram::build(
            gl,
            "blend",
            shaders::BLEND_VERT,
            shaders::BLEND_FRAG,
            shaders::BLEND_UNIFORMS,
        )?;
        let quad = Mesh::new(gl, "quad", &program, &QUAD_VERTICES, Some(&QUAD_ELEMENTS))?;
        let primary = Texture::from_path(gl, &config.textures.primary)?;
        let secondary = Texture::from_path(gl, &config.textures.secondary)?;

        program.use_program();
        program.set_uniform(shaders::TEX_PRIMARY, 0);
        program.set_uniform(shaders::TEX_SECONDARY, 1);
        program.set_uniform(shaders::VIEW, Camera::QUAD.view());
        program.set_uniform(
            shaders::PROJ,
            transform::projection(config.window.width, config.window.height),
        );

        Ok(Self {
            secondary,
            primary,
            quad,
            program,
        })
    }
}

impl Bindings for BlendPulse {
    fn program(&self, id: ProgramId) -> Option<&ShaderProgram> {
        match id {
            ProgramId::Blend => Some(&self.program),
            _ => None,
        }
    }

    fn texture(&self, slot: TextureSlot) -> Option<&Texture> {
        match slot {
            TextureSlot::Primary => Some(&self.primary),
            TextureSlot::Secondary => Some(&self.secondary),
            TextureSlot::OffscreenColor => None,
        }
    }

    fn geometry(&self, geometry: Geometry) -> Option<(&Mesh, Option<Range<usize>>)> {
        match geometry {
            Geometry::Quad => Some((&self.quad, None)),
            _ => None,
        }
    }
}

impl Demo for BlendPulse {
    fn name(&self) -> &str {
        "blend-pulse"
    }

    fn frame(&self, elapsed: f32) -> FramePlan {
        pipeline::blend_pulse_frame(elapsed)
    }
}
