//! OpenGL Shaders
//!
//! This module defines the [`Shader`] and [`ShaderProgram`] structs for managing OpenGL shaders.
//! This module also provides the [`Uniform`] trait for setting uniform variables in shader
//! programs.

use std::{collections::HashMap, fmt, rc::Rc};

use glam::{Mat4, Vec3};
use glow::HasContext;
use gltut_core::resources::{ResourceId, ResourceKind};

use crate::{
    abs::{GlContext, context::release_stack},
    error::SetupError,
};

/// Name of the fragment output every program writes to.
pub const FRAG_OUTPUT: &str = "outColor";

/// Pipeline stage of a shader.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl ShaderStage {
    pub fn gl_enum(self) -> u32 {
        match self {
            ShaderStage::Vertex => glow::VERTEX_SHADER,
            ShaderStage::Fragment => glow::FRAGMENT_SHADER,
        }
    }
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShaderStage::Vertex => f.write_str("vertex"),
            ShaderStage::Fragment => f.write_str("fragment"),
        }
    }
}

/// Represents an individual OpenGL shader.
pub struct Shader {
    gl: Rc<GlContext>,
    id: glow::Shader,
    ledger_id: ResourceId,
}

impl Shader {
    /// Compiles a new shader from the given source code.
    pub fn new(
        gl: &Rc<GlContext>,
        label: &str,
        stage: ShaderStage,
        source: &str,
    ) -> Result<Self, SetupError> {
        unsafe {
            let shader = gl
                .create_shader(stage.gl_enum())
                .map_err(|e| SetupError::gl_create(format!("{stage} shader"), e))?;
            gl.shader_source(shader, source);
            gl.compile_shader(shader);

            if !gl.get_shader_compile_status(shader) {
                let log = gl.get_shader_info_log(shader);
                gl.delete_shader(shader);
                return Err(SetupError::ShaderCompile {
                    label: label.to_string(),
                    stage,
                    log,
                });
            }

            let ledger_id = gl.track(ResourceKind::Shader, &format!("{label}/{stage}"));
            Ok(Self {
                gl: Rc::clone(gl),
                id: shader,
                ledger_id,
            })
        }
    }
}

impl Drop for Shader {
    fn drop(&mut self) {
        unsafe {
            self.gl.delete_shader(self.id);
        }
        self.gl.release(self.ledger_id);
    }
}

/// Represents a uniform variable in a shader program.
pub trait Uniform {
    /// Uploads the value to `location` of the program in use.
    fn set_uniform(&self, gl: &glow::Context, location: &glow::UniformLocation);
}

impl Uniform for i32 {
    fn set_uniform(&self, gl: &glow::Context, location: &glow::UniformLocation) {
        unsafe {
            gl.uniform_1_i32(Some(location), *self);
        }
    }
}

impl Uniform for Vec3 {
    fn set_uniform(&self, gl: &glow::Context, location: &glow::UniformLocation) {
        unsafe {
            gl.uniform_3_f32(Some(location), self.x, self.y, self.z);
        }
    }
}

impl Uniform for Mat4 {
    fn set_uniform(&self, gl: &glow::Context, location: &glow::UniformLocation) {
        unsafe {
            gl.uniform_matrix_4_f32_slice(Some(location), false, self.as_ref());
        }
    }
}

impl<T: Uniform> Uniform for &T {
    fn set_uniform(&self, gl: &glow::Context, location: &glow::UniformLocation) {
        (*self).set_uniform(gl, location);
    }
}

/// A linked vertex + fragment program.
///
/// Uniform locations are resolved once at link time. A requested uniform the
/// linker did not keep fails the build with [`SetupError::MissingUniform`].
pub struct ShaderProgram {
    gl: Rc<GlContext>,
    id: glow::Program,
    label: String,
    uniforms: HashMap<String, glow::UniformLocation>,
    // vertex then fragment; released in reverse after the program
    shaders: Vec<Shader>,
    ledger_id: ResourceId,
}

impl ShaderProgram {
    /// Compiles both stages, links them and resolves `uniforms`.
    pub fn build(
        gl: &Rc<GlContext>,
        label: &str,
        vertex_source: &str,
        fragment_source: &str,
        uniforms: &[&str],
    ) -> Result<Self, SetupError> {
        let vertex = Shader::new(gl, label, ShaderStage::Vertex, vertex_source)?;
        let fragment = Shader::new(gl, label, ShaderStage::Fragment, fragment_source)?;
        Self::new(gl, label, vec![vertex, fragment], uniforms)
    }

    /// Links a new shader program from the given shaders. The program keeps
    /// the shaders alive until it is dropped.
    pub fn new(
        gl: &Rc<GlContext>,
        label: &str,
        mut shaders: Vec<Shader>,
        uniforms: &[&str],
    ) -> Result<Self, SetupError> {
        unsafe {
            let program = match gl.create_program() {
                Ok(program) => program,
                Err(e) => {
                    release_stack(&mut shaders, drop);
                    return Err(SetupError::gl_create("program", e));
                }
            };

            for shader in &shaders {
                gl.attach_shader(program, shader.id);
            }

            gl.bind_frag_data_location(program, 0, FRAG_OUTPUT);
            gl.link_program(program);

            if !gl.get_program_link_status(program) {
                let log = gl.get_program_info_log(program);
                gl.delete_program(program);
                release_stack(&mut shaders, drop);
                return Err(SetupError::ProgramLink {
                    label: label.to_string(),
                    log,
                });
            }

            for shader in &shaders {
                gl.detach_shader(program, shader.id);
            }

            let ledger_id = gl.track(ResourceKind::Program, label);
            // From here on the program is owned, so an early return releases it.
            let mut this = Self {
                gl: Rc::clone(gl),
                id: program,
                label: label.to_string(),
                uniforms: HashMap::with_capacity(uniforms.len()),
                shaders,
                ledger_id,
            };

            for &name in uniforms {
                let location = gl.get_uniform_location(program, name).ok_or_else(|| {
                    SetupError::MissingUniform {
                        label: label.to_string(),
                        name: name.to_string(),
                    }
                })?;
                this.uniforms.insert(name.to_string(), location);
            }

            log::debug!("linked program `{label}` with {} uniforms", this.uniforms.len());
            Ok(this)
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Binds the shader program for use.
    pub fn use_program(&self) {
        unsafe {
            self.gl.use_program(Some(self.id));
        }
    }

    /// Sets a uniform resolved at link time. The program must be in use.
    pub fn set_uniform<T: Uniform>(&self, name: &str, value: T) {
        match self.uniforms.get(name) {
            Some(location) => value.set_uniform(&self.gl, location),
            None => log::warn!("program `{}` has no resolved uniform `{name}`", self.label),
        }
    }

    /// Location of a vertex attribute, `None` if the linker dropped it as unused.
    pub fn attrib_location(&self, name: &str) -> Option<u32> {
        unsafe { self.gl.get_attrib_location(self.id, name) }
    }
}

impl Drop for ShaderProgram {
    fn drop(&mut self) {
        unsafe {
            self.gl.delete_program(self.id);
        }
        self.gl.release(self.ledger_id);
        release_stack(&mut self.shaders, drop);
    }
}
