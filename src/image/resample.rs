//! Bilinear resize and in-place flips

use super::Image;
use crate::error::{RenderError, Result};
use log::debug;

#[inline]
fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

impl Image {
    /// Bilinear resample into a new image of the given size
    pub fn resized(&self, width: usize, height: usize) -> Result<Image> {
        if width == 0 || height == 0 {
            return Err(RenderError::invalid(format!(
                "resize target must be positive, got {}x{}",
                width, height
            )));
        }
        let mut target = Image::new(width, height, self.channels)?;

        let scale_row = self.height as f32 / height as f32;
        let scale_col = self.width as f32 / width as f32;
        let last_row = self.height - 1;
        let last_col = self.width - 1;

        for dst_row in 0..height {
            let mapped_r = dst_row as f32 * scale_row;
            let r0 = (mapped_r as usize).min(last_row);
            let r1 = (r0 + 1).min(last_row);
            let dr = mapped_r - r0 as f32;

            for dst_col in 0..width {
                let mapped_c = dst_col as f32 * scale_col;
                let c0 = (mapped_c as usize).min(last_col);
                let c1 = (c0 + 1).min(last_col);
                let dc = mapped_c - c0 as f32;

                let p00 = self.trusted_pixel(c0, r0);
                let p01 = self.trusted_pixel(c1, r0);
                let p10 = self.trusted_pixel(c0, r1);
                let p11 = self.trusted_pixel(c1, r1);
                let out = target.trusted_pixel_mut(dst_col, dst_row);

                for k in 0..out.len() {
                    let top = lerp(p00[k] as f32, p01[k] as f32, dc);
                    let bottom = lerp(p10[k] as f32, p11[k] as f32, dc);
                    out[k] = (lerp(top, bottom, dr) + 0.5) as u8;
                }
            }
        }

        Ok(target)
    }

    /// Bilinear resample in place
    pub fn resize(&mut self, width: usize, height: usize) -> Result<()> {
        debug!(
            "resize {}x{} -> {}x{} ({} channels)",
            self.width, self.height, width, height, self.channels
        );
        *self = self.resized(width, height)?;
        Ok(())
    }

    /// Mirror left and right
    pub fn flip_horizontal(&mut self) {
        let stride = self.width * self.channels;
        let channels = self.channels;
        let width = self.width;
        for row in self.data.chunks_exact_mut(stride) {
            for col in 0..width / 2 {
                let a = col * channels;
                let b = (width - 1 - col) * channels;
                for k in 0..channels {
                    row.swap(a + k, b + k);
                }
            }
        }
    }

    /// Mirror top and bottom
    pub fn flip_vertical(&mut self) {
        let stride = self.width * self.channels;
        let height = self.height;
        for row in 0..height / 2 {
            let flipped = height - 1 - row;
            let (upper, lower) = self.data.split_at_mut(flipped * stride);
            upper[row * stride..(row + 1) * stride].swap_with_slice(&mut lower[..stride]);
        }
    }
}
