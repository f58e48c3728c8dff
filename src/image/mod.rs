//! Byte pixel buffer
//!
//! Row-major storage, `channels` bytes per pixel. Row 0 is the bottom of the
//! picture; the codec normalises files to this on load and the compositor
//! flips when presenting to a top-left surface.

mod resample;

use crate::error::{RenderError, Result};

/// Owned pixel buffer. `data.len() == width * height * channels` always holds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Image {
    width: usize,
    height: usize,
    channels: usize,
    data: Vec<u8>,
}

fn check_dimensions(width: usize, height: usize, channels: usize) -> Result<()> {
    if width == 0 || height == 0 {
        return Err(RenderError::invalid(format!(
            "image dimensions must be positive, got {}x{}",
            width, height
        )));
    }
    if !(1..=4).contains(&channels) {
        return Err(RenderError::invalid(format!(
            "channel count must be 1-4, got {}",
            channels
        )));
    }
    Ok(())
}

/// Store size in bytes, or an error when it does not fit in `usize`
fn byte_len(width: usize, height: usize, channels: usize) -> Result<usize> {
    width
        .checked_mul(height)
        .and_then(|n| n.checked_mul(channels))
        .ok_or_else(|| {
            RenderError::invalid(format!(
                "{}x{}x{} image is too large to address",
                width, height, channels
            ))
        })
}

fn check_len(width: usize, height: usize, channels: usize, len: usize) -> Result<()> {
    let expected = byte_len(width, height, channels)?;
    if len != expected {
        return Err(RenderError::invalid(format!(
            "{}x{}x{} image needs {} bytes, got {}",
            width, height, channels, expected, len
        )));
    }
    Ok(())
}

impl Image {
    /// Zero-filled image. A store the allocator cannot provide is an
    /// error rather than an abort.
    pub fn new(width: usize, height: usize, channels: usize) -> Result<Self> {
        check_dimensions(width, height, channels)?;
        let len = byte_len(width, height, channels)?;
        let mut data = Vec::new();
        data.try_reserve_exact(len).map_err(|e| {
            RenderError::invalid(format!(
                "cannot allocate {}x{}x{} image: {}",
                width, height, channels, e
            ))
        })?;
        data.resize(len, 0);
        Ok(Self {
            width,
            height,
            channels,
            data,
        })
    }

    /// Adopt caller-provided bytes without copying
    pub fn from_bytes(width: usize, height: usize, channels: usize, data: Vec<u8>) -> Result<Self> {
        check_dimensions(width, height, channels)?;
        check_len(width, height, channels, data.len())?;
        Ok(Self {
            width,
            height,
            channels,
            data,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn channels(&self) -> usize {
        self.channels
    }

    /// Size of the store in bytes
    pub fn data_size(&self) -> usize {
        self.data.len()
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    pub fn into_raw(self) -> Vec<u8> {
        self.data
    }

    /// Replace dimensions and store in one step. The old store is dropped.
    /// On error the image is left untouched.
    pub fn set_data(&mut self, width: usize, height: usize, channels: usize, data: Vec<u8>) -> Result<()> {
        *self = Self::from_bytes(width, height, channels, data)?;
        Ok(())
    }

    /// Zero the store in place
    pub fn reset(&mut self) {
        self.data.fill(0);
    }

    fn contains(&self, x: usize, y: usize) -> bool {
        x < self.width && y < self.height
    }

    #[inline]
    fn offset(&self, x: usize, y: usize) -> usize {
        (y * self.width + x) * self.channels
    }

    /// Channel bytes of the pixel at column `x`, row `y`
    pub fn pixel(&self, x: usize, y: usize) -> Result<&[u8]> {
        if !self.contains(x, y) {
            return Err(self.out_of_range(x, y));
        }
        Ok(self.trusted_pixel(x, y))
    }

    pub fn pixel_mut(&mut self, x: usize, y: usize) -> Result<&mut [u8]> {
        if !self.contains(x, y) {
            return Err(self.out_of_range(x, y));
        }
        Ok(self.trusted_pixel_mut(x, y))
    }

    /// Pixel access for loops whose bounds are already established.
    ///
    /// # Panics
    /// Panics if the coordinate is outside the image.
    #[inline]
    pub fn trusted_pixel(&self, x: usize, y: usize) -> &[u8] {
        debug_assert!(self.contains(x, y), "pixel ({}, {}) outside {}x{}", x, y, self.width, self.height);
        let start = self.offset(x, y);
        &self.data[start..start + self.channels]
    }

    /// Mutable counterpart of [`Image::trusted_pixel`].
    #[inline]
    pub fn trusted_pixel_mut(&mut self, x: usize, y: usize) -> &mut [u8] {
        debug_assert!(self.contains(x, y), "pixel ({}, {}) outside {}x{}", x, y, self.width, self.height);
        let start = self.offset(x, y);
        let channels = self.channels;
        &mut self.data[start..start + channels]
    }

    /// Bytes of row `y`, `width * channels` long
    pub fn row(&self, y: usize) -> Result<&[u8]> {
        if y >= self.height {
            return Err(RenderError::invalid(format!(
                "row {} outside {}-row image",
                y, self.height
            )));
        }
        let stride = self.width * self.channels;
        Ok(&self.data[y * stride..(y + 1) * stride])
    }

    fn out_of_range(&self, x: usize, y: usize) -> RenderError {
        RenderError::invalid(format!(
            "pixel ({}, {}) outside {}x{} image",
            x, y, self.width, self.height
        ))
    }
}

impl Default for Image {
    fn default() -> Self {
        Self {
            width: 1,
            height: 1,
            channels: 4,
            data: vec![0; 4],
        }
    }
}
