//! softrender: a small CPU renderer
//!
//! - `Image`: byte pixel buffer (gray, BGR, BGRA) with bottom-left origin
//! - TGA load/save, including RLE packets
//! - Bilinear resize and in-place flips
//! - Bresenham line drawing onto any render target
//! - Blits into a platform-owned 4-byte-per-pixel surface
//!
//! The windowing layer lives in the viewer binary; nothing here depends on it.

pub mod codec;
pub mod compositor;
pub mod error;
pub mod image;
pub mod rasterizer;

pub use crate::codec::{load_image, save_image, save_image_with, ImageFormat, TgaOptions};
pub use crate::compositor::{blit_frame, blit_image, blit_truecolor, ChannelOrder};
pub use crate::error::{ErrorKind, RenderError, Result};
pub use crate::image::Image;
pub use crate::rasterizer::{draw_line, Color, FrameBuffer, RenderTarget};
