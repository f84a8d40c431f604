//! GL side of the tutorial demos: window and context setup, RAII wrappers
//! over GPU objects, the frame-plan executor and the render-loop driver.

pub mod abs;
pub mod demos;
pub mod driver;
pub mod error;
pub mod logging;
pub mod render;
