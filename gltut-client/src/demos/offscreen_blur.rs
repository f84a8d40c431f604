use std::{ops::Range, rc::Rc};

use glam::Vec3;
use gltut_core::{
    config::DemoConfig,
    geometry::{CUBE_RANGE, FLOOR_RANGE, SCENE_VERTICES, SCREEN_VERTICES},
    pipeline::{self, FramePlan, Geometry, ProgramId, TextureSlot},
    transform::{self, Camera},
};

use crate::{
    abs::{Framebuffer, GlContext, Mesh, ShaderProgram, Texture},
    driver::Demo,
    error::SetupError,
    render::{executor::Bindings, shaders},
};

/// A spinning cube above a floor that mirrors it, drawn into an offscreen
/// target which is then box-blurred onto the window.
pub struct OffscreenBlur {
    // reverse creation order
    framebuffer: Framebuffer,
    secondary: Texture,
    primary: Texture,
    screen_quad: Mesh,
    cube: Mesh,
    screen_program: ShaderProgram,
    scene_program: ShaderProgram,
}

impl OffscreenBlur {
    pub fn new(gl: &Rc<GlContext>, config: &DemoConfig) -> Result<Self, SetupError> {
        pipeline::validate_reflection(&pipeline::offscreen_frame(0.0))?;

        let scene_program = ShaderProgram::build(
            gl,
            "scene",
            shaders::SCENE_VERT,
            shaders::SCENE_FRAG,
            shaders::SCENE_UNIFORMS,
        )?;
        let screen_program = ShaderProgram::build(
            gl,
            "screen",
            shaders::SCREEN_VERT,
            &config.blur.fragment_source(),
            shaders::SCREEN_UNIFORMS,
        )?;
        log::debug!(
            "box blur: {0}x{0} kernel, step {1}x{2}",
            config.blur.size(),
            config.blur.step_h,
            config.blur.step_v
        );

        // cube and floor share one buffer
        let cube = Mesh::new(gl, "cube+floor", &scene_program, &SCENE_VERTICES, None)?;
        let screen_quad = Mesh::new(gl, "screen-quad", &screen_program, &SCREEN_VERTICES, None)?;
        let primary = Texture::from_path(gl, &config.textures.primary)?;
        let secondary = Texture::from_path(gl, &config.textures.secondary)?;
        let framebuffer = Framebuffer::new(gl, config.window.width, config.window.height)?;

        scene_program.use_program();
        scene_program.set_uniform(shaders::TEX_PRIMARY, 0);
        scene_program.set_uniform(shaders::TEX_SECONDARY, 1);
        scene_program.set_uniform(shaders::OVERRIDE_COLOR, Vec3::ONE);
        scene_program.set_uniform(shaders::VIEW, Camera::CUBE.view());
        scene_program.set_uniform(
            shaders::PROJ,
            transform::projection(config.window.width, config.window.height),
        );

        screen_program.use_program();
        screen_program.set_uniform(shaders::TEX_FRAMEBUFFER, 0);

        Ok(Self {
            framebuffer,
            secondary,
            primary,
            screen_quad,
            cube,
            screen_program,
            scene_program,
        })
    }
}

impl Bindings for OffscreenBlur {
    fn program(&self, id: ProgramId) -> Option<&ShaderProgram> {
        match id {
            ProgramId::Scene => Some(&self.scene_program),
            ProgramId::Screen => Some(&self.screen_program),
            ProgramId::Blend => None,
        }
    }

    fn texture(&self, slot: TextureSlot) -> Option<&Texture> {
        match slot {
            TextureSlot::Primary => Some(&self.primary),
            TextureSlot::Secondary => Some(&self.secondary),
            TextureSlot::OffscreenColor => Some(self.framebuffer.texture()),
        }
    }

    fn geometry(&self, geometry: Geometry) -> Option<(&Mesh, Option<Range<usize>>)> {
        match geometry {
            Geometry::Cube => Some((&self.cube, Some(CUBE_RANGE))),
            Geometry::Floor => Some((&self.cube, Some(FLOOR_RANGE))),
            Geometry::ScreenQuad => Some((&self.screen_quad, None)),
            Geometry::Quad => None,
        }
    }

    fn framebuffer(&self) -> Option<&Framebuffer> {
        Some(&self.framebuffer)
    }
}

impl Demo for OffscreenBlur {
    fn name(&self) -> &str {
        "offscreen-blur"
    }

    fn frame(&self, elapsed: f32) -> FramePlan {
        pipeline::offscreen_frame(elapsed)
    }
}
