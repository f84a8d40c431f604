//! The two demos: a pulsing blended quad, and a reflected cube rendered
//! offscreen and blurred onto the window.

pub mod blend_pulse;
pub mod offscreen_blur;

pub use blend_pulse::BlendPulse;
pub use offscreen_blur::OffscreenBlur;
