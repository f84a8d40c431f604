//! The GL-free half of the tutorial demos.
//!
//! This crate holds everything the demos compute without a GL context:
//! per-frame transforms, vertex layouts and static geometry, the box-blur
//! kernel, frame plans and their validation, the GPU resource ledger and the
//! configuration.

pub mod blur;
pub mod clock;
pub mod config;
pub mod geometry;
pub mod pipeline;
pub mod resources;
pub mod transform;
pub mod vertex;
