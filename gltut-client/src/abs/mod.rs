//! This module contains the thin GPU layer of the demos: application setup,
//! the shared GL context, shader management, meshes, textures and framebuffers.
//!
//! Every wrapper owns its GL handle, registers it with the context's resource
//! ledger on creation and releases it in `Drop`.

pub mod app;
pub mod context;
pub mod framebuffer;
pub mod mesh;
pub mod shader;
pub mod texture;

pub use app::*;
pub use context::*;
pub use framebuffer::*;
pub use mesh::*;
pub use shader::*;
pub use texture::*;
