//! Mesh management module.
//!
//! This module defines the [`Mesh`] struct for managing static mesh data on the GPU side.
//! Vertices implement the [`Vertex`] trait, whose layout drives the attribute pointers.

use std::{ops::Range, rc::Rc};

use glow::HasContext;
use gltut_core::{
    resources::{ResourceId, ResourceKind},
    vertex::Vertex,
};

use crate::{
    abs::{GlContext, ShaderProgram, context::release_stack},
    error::SetupError,
};

enum GlObject {
    VertexArray(glow::VertexArray),
    Buffer(glow::Buffer),
}

/// The GL objects of one mesh, deleted in reverse creation order on drop,
/// including when setup fails halfway.
struct MeshObjects {
    gl: Rc<GlContext>,
    objects: Vec<(GlObject, ResourceId)>,
}

impl MeshObjects {
    fn push(&mut self, object: GlObject, kind: ResourceKind, label: &str) {
        let id = self.gl.track(kind, label);
        self.objects.push((object, id));
    }
}

impl Drop for MeshObjects {
    fn drop(&mut self) {
        let gl = Rc::clone(&self.gl);
        release_stack(&mut self.objects, |(object, id)| {
            unsafe {
                match object {
                    GlObject::VertexArray(vao) => gl.delete_vertex_array(vao),
                    GlObject::Buffer(buffer) => gl.delete_buffer(buffer),
                }
            }
            gl.release(id);
        });
    }
}

/// Represents a mesh stored on the GPU side: one vertex array, one vertex
/// buffer and an optional element buffer.
pub struct Mesh {
    objects: MeshObjects,
    draw_mode: u32,
    vao: glow::VertexArray,
    ebo: Option<glow::Buffer>,
    vertex_count: usize,
    index_count: usize,
}

fn as_bytes<T: Copy>(data: &[T]) -> &[u8] {
    unsafe { std::slice::from_raw_parts(data.as_ptr() as *const u8, std::mem::size_of_val(data)) }
}

impl Mesh {
    /// Uploads `vertices` (and `indices`, if any) and wires every attribute of
    /// `V`'s layout to the attribute of the same name in `program`. Attributes
    /// the program does not use are left disabled.
    pub fn new<V: Vertex>(
        gl: &Rc<GlContext>,
        label: &str,
        program: &ShaderProgram,
        vertices: &[V],
        indices: Option<&[u32]>,
    ) -> Result<Self, SetupError> {
        let layout = V::LAYOUT;

        unsafe {
            let mut objects = MeshObjects {
                gl: Rc::clone(gl),
                objects: Vec::with_capacity(3),
            };
            let vao = gl
                .create_vertex_array()
                .map_err(|e| SetupError::gl_create(format!("vertex array `{label}`"), e))?;
            objects.push(GlObject::VertexArray(vao), ResourceKind::VertexArray, label);
            let vbo = gl
                .create_buffer()
                .map_err(|e| SetupError::gl_create(format!("vertex buffer `{label}`"), e))?;
            objects.push(
                GlObject::Buffer(vbo),
                ResourceKind::Buffer,
                &format!("{label}/vertices"),
            );

            gl.bind_vertex_array(Some(vao));
            gl.bind_buffer(glow::ARRAY_BUFFER, Some(vbo));
            gl.buffer_data_u8_slice(glow::ARRAY_BUFFER, as_bytes(vertices), glow::STATIC_DRAW);

            let ebo = match indices {
                Some(indices) => {
                    let ebo = gl.create_buffer().map_err(|e| {
                        SetupError::gl_create(format!("element buffer `{label}`"), e)
                    })?;
                    objects.push(
                        GlObject::Buffer(ebo),
                        ResourceKind::Buffer,
                        &format!("{label}/elements"),
                    );
                    gl.bind_buffer(glow::ELEMENT_ARRAY_BUFFER, Some(ebo));
                    gl.buffer_data_u8_slice(
                        glow::ELEMENT_ARRAY_BUFFER,
                        as_bytes(indices),
                        glow::STATIC_DRAW,
                    );
                    Some(ebo)
                }
                None => None,
            };

            let stride = layout.stride_bytes() as i32;
            for (attribute, offset) in layout.iter() {
                let Some(location) = program.attrib_location(attribute.name) else {
                    log::debug!(
                        "`{}` has no active attribute `{}`, skipping",
                        program.label(),
                        attribute.name
                    );
                    continue;
                };
                gl.enable_vertex_attrib_array(location);
                gl.vertex_attrib_pointer_f32(
                    location,
                    attribute.components as i32,
                    glow::FLOAT,
                    false,
                    stride,
                    offset as i32,
                );
            }

            gl.bind_vertex_array(None);
            gl.bind_buffer(glow::ARRAY_BUFFER, None);
            if ebo.is_some() {
                gl.bind_buffer(glow::ELEMENT_ARRAY_BUFFER, None);
            }

            log::debug!(
                "uploaded mesh `{label}`: {} vertices, stride {stride} bytes",
                vertices.len()
            );

            Ok(Self {
                objects,
                draw_mode: glow::TRIANGLES,
                vao,
                ebo,
                vertex_count: vertices.len(),
                index_count: indices.map_or(0, <[u32]>::len),
            })
        }
    }

    /// Draws the whole mesh, through the element buffer if there is one.
    pub fn draw(&self) {
        let gl = &self.objects.gl;
        unsafe {
            gl.bind_vertex_array(Some(self.vao));
            if self.ebo.is_some() {
                gl.draw_elements(self.draw_mode, self.index_count as i32, glow::UNSIGNED_INT, 0);
            } else {
                gl.draw_arrays(self.draw_mode, 0, self.vertex_count as i32);
            }
        }
    }

    /// Draws a contiguous range of vertices, ignoring the element buffer.
    pub fn draw_range(&self, range: Range<usize>) {
        debug_assert!(range.end <= self.vertex_count);
        let gl = &self.objects.gl;
        unsafe {
            gl.bind_vertex_array(Some(self.vao));
            gl.draw_arrays(self.draw_mode, range.start as i32, range.len() as i32);
        }
    }

    /// Returns the number of vertices in the mesh.
    pub fn vertex_count(&self) -> usize {
        self.vertex_count
    }
}
