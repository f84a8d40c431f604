use std::fmt;
use std::path::PathBuf;

use gltut_core::{config::ConfigError, pipeline::PlanError};

use crate::abs::ShaderStage;

/// Fatal errors raised while setting up a demo, before the render loop.
#[derive(Debug)]
pub enum SetupError {
    // ---- window / context ----
    Window(String),
    Context(String),

    // ---- shaders ----
    ShaderCompile { label: String, stage: ShaderStage, log: String },
    ProgramLink { label: String, log: String },
    MissingUniform { label: String, name: String },

    // ---- textures / targets ----
    TextureLoad { path: PathBuf, source: image::ImageError },
    GlCreate { what: String, msg: String },
    IncompleteFramebuffer { status: u32 },

    // ---- demo description ----
    Config(ConfigError),
    InvalidPlan(PlanError),
    MissingBinding(String),
}

impl fmt::Display for SetupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SetupError::Window(msg) => write!(f, "window creation failed: {msg}"),
            SetupError::Context(msg) => write!(f, "GL context creation failed: {msg}"),

            SetupError::ShaderCompile { label, stage, log } => {
                write!(f, "{stage} shader of `{label}` failed to compile: {log}")
            }
            SetupError::ProgramLink { label, log } => {
                write!(f, "program `{label}` failed to link: {log}")
            }
            SetupError::MissingUniform { label, name } => {
                write!(f, "program `{label}` has no active uniform `{name}`")
            }

            SetupError::TextureLoad { path, source } => {
                write!(f, "cannot load texture {}: {}", path.display(), source)
            }
            SetupError::GlCreate { what, msg } => write!(f, "cannot create {what}: {msg}"),
            SetupError::IncompleteFramebuffer { status } => {
                write!(f, "offscreen framebuffer incomplete (status {status:#x})")
            }

            SetupError::Config(err) => write!(f, "{err}"),
            SetupError::InvalidPlan(err) => write!(f, "invalid frame plan: {err}"),
            SetupError::MissingBinding(what) => write!(f, "frame plan uses unbound {what}"),
        }
    }
}

impl std::error::Error for SetupError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SetupError::TextureLoad { source, .. } => Some(source),
            SetupError::Config(err) => Some(err),
            SetupError::InvalidPlan(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ConfigError> for SetupError {
    fn from(err: ConfigError) -> Self {
        SetupError::Config(err)
    }
}

impl From<PlanError> for SetupError {
    fn from(err: PlanError) -> Self {
        SetupError::InvalidPlan(err)
    }
}

impl SetupError {
    pub(crate) fn gl_create(what: impl Into<String>, msg: String) -> Self {
        SetupError::GlCreate {
            what: what.into(),
            msg,
        }
    }
}
