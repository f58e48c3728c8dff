//! Software rasterizer
//!
//! - Bresenham line drawing onto any [`RenderTarget`]
//! - Float color framebuffer
//! - Triangle outlines and mesh wireframes
//!
//! Triangle fill is not implemented.

mod math;
mod render;
mod types;

pub use math::*;
pub use render::*;
pub use types::*;
