//! Embedded GLSL sources and the uniform names the demos rely on.
//!
//! The screen program's fragment stage is not stored here; it is generated
//! from the configured kernel by [`BoxBlur::fragment_source`](gltut_core::blur::BoxBlur::fragment_source).

pub const BLEND_VERT: &str = include_str!("shaders/blend/vert.glsl");
pub const BLEND_FRAG: &str = include_str!("shaders/blend/frag.glsl");
pub const SCENE_VERT: &str = include_str!("shaders/scene/vert.glsl");
pub const SCENE_FRAG: &str = include_str!("shaders/scene/frag.glsl");
pub const SCREEN_VERT: &str = include_str!("shaders/screen/vert.glsl");

pub const MODEL: &str = "model";
pub const VIEW: &str = "view";
pub const PROJ: &str = "proj";
pub const OVERRIDE_COLOR: &str = "overrideColor";
pub const TEX_PRIMARY: &str = "texPrimary";
pub const TEX_SECONDARY: &str = "texSecondary";
pub const TEX_FRAMEBUFFER: &str = "texFramebuffer";

/// Uniforms resolved when linking the blend program.
pub const BLEND_UNIFORMS: &[&str] = &[MODEL, VIEW, PROJ, TEX_PRIMARY, TEX_SECONDARY];
/// Uniforms resolved when linking the scene program.
pub const SCENE_UNIFORMS: &[&str] = &[MODEL, VIEW, PROJ, OVERRIDE_COLOR, TEX_PRIMARY, TEX_SECONDARY];
/// Uniforms resolved when linking the screen program.
pub const SCREEN_UNIFORMS: &[&str] = &[TEX_FRAMEBUFFER];

#[cfg(test)]
mod tests {
    use gltut_core::{
        blur::BoxBlur,
        vertex::{QuadVertex, SceneVertex, ScreenVertex, Vertex, VertexLayout},
    };

    use super::*;
    use crate::abs::FRAG_OUTPUT;

    fn declares(source: &str, qualifier: &str, name: &str) -> bool {
        source.lines().any(|line| {
            let line = line.trim();
            line.starts_with(qualifier) && line.trim_end_matches(';').ends_with(&format!(" {name}"))
        })
    }

    fn assert_inputs(source: &str, layout: &VertexLayout) {
        for attribute in layout.attributes {
            assert!(
                declares(source, "in ", attribute.name),
                "attribute `{}` not declared",
                attribute.name
            );
        }
    }

    #[test]
    fn test_sources_target_glsl_150_core() {
        let screen_frag = BoxBlur::default().fragment_source();
        for source in [BLEND_VERT, BLEND_FRAG, SCENE_VERT, SCENE_FRAG, SCREEN_VERT, screen_frag.as_str()] {
            assert!(source.starts_with("#version 150 core"));
        }
    }

    #[test]
    fn test_vertex_stages_declare_layout_attributes() {
        assert_inputs(BLEND_VERT, &QuadVertex::LAYOUT);
        assert_inputs(SCENE_VERT, &SceneVertex::LAYOUT);
        assert_inputs(SCREEN_VERT, &ScreenVertex::LAYOUT);
    }

    #[test]
    fn test_fragment_stages_write_output() {
        let screen_frag = BoxBlur::default().fragment_source();
        for source in [BLEND_FRAG, SCENE_FRAG, screen_frag.as_str()] {
            assert!(declares(source, "out vec4", FRAG_OUTPUT));
        }
    }

    #[test]
    fn test_resolved_uniforms_are_declared() {
        let screen_frag = BoxBlur::default().fragment_source();
        let programs: [(&[&str], [&str; 2]); 3] = [
            (BLEND_UNIFORMS, [BLEND_VERT, BLEND_FRAG]),
            (SCENE_UNIFORMS, [SCENE_VERT, SCENE_FRAG]),
            (SCREEN_UNIFORMS, [SCREEN_VERT, screen_frag.as_str()]),
        ];
        for (uniforms, sources) in programs {
            for name in uniforms {
                assert!(
                    sources.iter().any(|s| declares(s, "uniform ", name)),
                    "uniform `{name}` not declared"
                );
            }
        }
    }
}
