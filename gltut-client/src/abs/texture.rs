//! Structs and functions for handling textures.
//!
//! The module provides the [`Texture`] struct which is a CPU representation of a GPU texture.

use std::{path::Path, rc::Rc};

use glow::HasContext;
use gltut_core::resources::{ResourceId, ResourceKind};
use image::{DynamicImage, GenericImageView};

use crate::{abs::GlContext, error::SetupError};

/// Represents a texture stored on the GPU side.
pub struct Texture {
    gl: Rc<GlContext>,
    pub(super) id: glow::Texture,
    width: u32,
    height: u32,
    ledger_id: ResourceId,
}

impl Texture {
    /// Loads an image file as an RGB texture.
    pub fn from_path(gl: &Rc<GlContext>, path: &Path) -> Result<Self, SetupError> {
        let image = image::open(path).map_err(|source| SetupError::TextureLoad {
            path: path.to_path_buf(),
            source,
        })?;
        log::info!(
            "loaded {} ({}x{})",
            path.display(),
            image.width(),
            image.height()
        );
        Self::new(gl, &path.display().to_string(), &image)
    }

    /// Creates a new texture from the given [`image::DynamicImage`]. Alpha is dropped.
    pub fn new(gl: &Rc<GlContext>, label: &str, image: &DynamicImage) -> Result<Self, SetupError> {
        let (width, height) = image.dimensions();
        let data = image.to_rgb8().into_raw();
        Self::with_rgb(gl, label, width, height, Some(&data))
    }

    /// Creates an uninitialised RGB texture, e.g. as a color attachment.
    pub fn empty(gl: &Rc<GlContext>, label: &str, width: u32, height: u32) -> Result<Self, SetupError> {
        Self::with_rgb(gl, label, width, height, None)
    }

    fn with_rgb(
        gl: &Rc<GlContext>,
        label: &str,
        width: u32,
        height: u32,
        data: Option<&[u8]>,
    ) -> Result<Self, SetupError> {
        unsafe {
            let texture = gl
                .create_texture()
                .map_err(|e| SetupError::gl_create(format!("texture `{label}`"), e))?;
            gl.bind_texture(glow::TEXTURE_2D, Some(texture));
            // RGB rows are not 4-byte aligned in general
            gl.pixel_store_i32(glow::UNPACK_ALIGNMENT, 1);
            gl.tex_image_2d(
                glow::TEXTURE_2D,
                0,
                glow::RGB as i32,
                width as i32,
                height as i32,
                0,
                glow::RGB,
                glow::UNSIGNED_BYTE,
                glow::PixelUnpackData::Slice(data),
            );
            gl.tex_parameter_i32(
                glow::TEXTURE_2D,
                glow::TEXTURE_WRAP_S,
                glow::CLAMP_TO_EDGE as i32,
            );
            gl.tex_parameter_i32(
                glow::TEXTURE_2D,
                glow::TEXTURE_WRAP_T,
                glow::CLAMP_TO_EDGE as i32,
            );
            gl.tex_parameter_i32(
                glow::TEXTURE_2D,
                glow::TEXTURE_MIN_FILTER,
                glow::LINEAR as i32,
            );
            gl.tex_parameter_i32(
                glow::TEXTURE_2D,
                glow::TEXTURE_MAG_FILTER,
                glow::LINEAR as i32,
            );
            gl.bind_texture(glow::TEXTURE_2D, None);

            let ledger_id = gl.track(ResourceKind::Texture, label);
            Ok(Self {
                gl: Rc::clone(gl),
                id: texture,
                width,
                height,
                ledger_id,
            })
        }
    }

    /// Returns the width of the texture.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Returns the height of the texture.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Binds the texture to the specified texture unit.
    pub fn bind(&self, unit: u32) {
        unsafe {
            self.gl.active_texture(glow::TEXTURE0 + unit);
            self.gl.bind_texture(glow::TEXTURE_2D, Some(self.id));
        }
    }
}

impl Drop for Texture {
    fn drop(&mut self) {
        unsafe {
            self.gl.delete_texture(self.id);
        }
        self.gl.release(self.ledger_id);
    }
}
