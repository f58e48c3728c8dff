//! Blits into display surfaces
//!
//! Byte images store pixels in TGA order (B, G, R, A). A display surface is
//! a platform-owned 4-bytes-per-pixel buffer with top-left origin; the
//! channel order it wants is given per call.

use crate::error::{RenderError, Result};
use crate::image::Image;
use crate::rasterizer::{Color, FrameBuffer};
use serde::{Deserialize, Serialize};

/// Byte order of the first three destination channels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ChannelOrder {
    /// Blue, green, red (native TGA order, Win32 DIBs)
    #[default]
    Bgr,
    /// Red, green, blue (GL textures)
    Rgb,
}

impl ChannelOrder {
    /// Reorder a BGR triple for this destination
    #[inline]
    fn arrange(self, b: u8, g: u8, r: u8) -> [u8; 3] {
        match self {
            ChannelOrder::Bgr => [b, g, r],
            ChannelOrder::Rgb => [r, g, b],
        }
    }
}

/// First three channels of a source pixel as BGR; gray is replicated
#[inline]
fn source_bgr(pixel: &[u8]) -> (u8, u8, u8) {
    if pixel.len() >= 3 {
        (pixel[0], pixel[1], pixel[2])
    } else {
        (pixel[0], pixel[0], pixel[0])
    }
}

/// Alpha of a source pixel: 2- and 4-channel sources carry one, others are opaque
#[inline]
fn source_alpha(pixel: &[u8]) -> u8 {
    match pixel.len() {
        2 => pixel[1],
        4 => pixel[3],
        _ => 255,
    }
}

fn check_surface(dst: &[u8], width: usize, height: usize) -> Result<()> {
    if width == 0 || height == 0 || dst.len() != width * height * 4 {
        return Err(RenderError::invalid(format!(
            "surface of {} bytes does not match {}x{}x4",
            dst.len(),
            width,
            height
        )));
    }
    Ok(())
}

/// Copy the overlapping rectangle of `src` into a 3- or 4-channel `dst`.
///
/// `dst` is zeroed first, so anything outside the overlap ends up black.
/// Rows are copied as-is (both images share the bottom-left convention).
pub fn blit_truecolor(src: &Image, dst: &mut Image, order: ChannelOrder) -> Result<()> {
    if dst.channels() != 3 && dst.channels() != 4 {
        return Err(RenderError::invalid(format!(
            "blit destination needs 3 or 4 channels, has {}",
            dst.channels()
        )));
    }
    let width = src.width().min(dst.width());
    let height = src.height().min(dst.height());
    dst.reset();

    for y in 0..height {
        for x in 0..width {
            let s = src.trusted_pixel(x, y);
            let (b, g, r) = source_bgr(s);
            let alpha = source_alpha(s);
            let d = dst.trusted_pixel_mut(x, y);
            d[..3].copy_from_slice(&order.arrange(b, g, r));
            if d.len() == 4 {
                d[3] = alpha;
            }
        }
    }
    Ok(())
}

/// Present a byte image on a top-left surface of `width * height * 4` bytes.
///
/// Destination row `r` reads source row `src.height() - 1 - r`.
pub fn blit_image(src: &Image, dst: &mut [u8], width: usize, height: usize, order: ChannelOrder) -> Result<()> {
    check_surface(dst, width, height)?;
    dst.fill(0);
    let copy_w = src.width().min(width);
    let copy_h = src.height().min(height);

    for row in 0..copy_h {
        let src_row = src.height() - 1 - row;
        let line = &mut dst[row * width * 4..(row * width + copy_w) * 4];
        for (col, out) in line.chunks_exact_mut(4).enumerate() {
            let s = src.trusted_pixel(col, src_row);
            let (b, g, r) = source_bgr(s);
            out[..3].copy_from_slice(&order.arrange(b, g, r));
            out[3] = source_alpha(s);
        }
    }
    Ok(())
}

/// Present a float framebuffer on a top-left surface of `width * height * 4`
/// bytes. Components are scaled by 255 and truncated.
pub fn blit_frame(src: &FrameBuffer, dst: &mut [u8], width: usize, height: usize, order: ChannelOrder) -> Result<()> {
    check_surface(dst, width, height)?;
    dst.fill(0);
    let copy_w = src.width().min(width);
    let copy_h = src.height().min(height);

    for row in 0..copy_h {
        // framebuffer origin is bottom-left, surface origin is top-left
        let src_row = src.height() - 1 - row;
        let line = &mut dst[row * width * 4..(row * width + copy_w) * 4];
        for (col, out) in line.chunks_exact_mut(4).enumerate() {
            let c = src.trusted_pixel(col, src_row);
            let b = Color::component_to_u8(c.b);
            let g = Color::component_to_u8(c.g);
            let r = Color::component_to_u8(c.r);
            out[..3].copy_from_slice(&order.arrange(b, g, r));
            out[3] = Color::component_to_u8(c.a);
        }
    }
    Ok(())
}
