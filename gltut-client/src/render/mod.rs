//! Module for anything related to rendering.
//!
//! This module contains the embedded shaders and the executor that turns a
//! [`FramePlan`](gltut_core::pipeline::FramePlan) into GL calls.

pub mod executor;
pub mod shaders;
