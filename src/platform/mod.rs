//! Platform glue: window, input polling and presentation
//!
//! The renderer never reads globals; the window is handed an
//! [`InputHandler`] each frame and calls it directly.

mod input;
mod window;

pub use input::*;
pub use window::*;
