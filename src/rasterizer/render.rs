//! Pixel targets and primitive drawing

use super::types::{Color, Mesh};
use crate::error::{RenderError, Result};
use crate::image::Image;

/// Anything lines can be drawn onto
pub trait RenderTarget {
    fn width(&self) -> usize;
    fn height(&self) -> usize;

    /// Write one pixel. Callers guarantee `x < width` and `y < height`.
    fn plot(&mut self, x: usize, y: usize, color: Color);
}

/// Float color buffer, indexed (x, y) with row 0 at the bottom
#[derive(Debug, Clone, PartialEq)]
pub struct FrameBuffer {
    width: usize,
    height: usize,
    pixels: Vec<Color>,
}

impl FrameBuffer {
    /// Black buffer of the given size
    pub fn new(width: usize, height: usize) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(RenderError::invalid(format!(
                "framebuffer dimensions must be positive, got {}x{}",
                width, height
            )));
        }
        Ok(Self {
            width,
            height,
            pixels: vec![Color::BLACK; width * height],
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn pixels(&self) -> &[Color] {
        &self.pixels
    }

    pub fn clear(&mut self, color: Color) {
        self.pixels.fill(color);
    }

    pub fn get_pixel(&self, x: usize, y: usize) -> Result<Color> {
        self.check(x, y)?;
        Ok(self.trusted_pixel(x, y))
    }

    pub fn put_pixel(&mut self, x: usize, y: usize, color: Color) -> Result<()> {
        self.check(x, y)?;
        self.trusted_put_pixel(x, y, color);
        Ok(())
    }

    /// Unchecked read for loops that already know their bounds.
    ///
    /// # Panics
    /// Panics if the coordinate is outside the buffer.
    #[inline]
    pub fn trusted_pixel(&self, x: usize, y: usize) -> Color {
        debug_assert!(x < self.width && y < self.height);
        self.pixels[y * self.width + x]
    }

    #[inline]
    pub fn trusted_put_pixel(&mut self, x: usize, y: usize, color: Color) {
        debug_assert!(x < self.width && y < self.height);
        self.pixels[y * self.width + x] = color;
    }

    fn check(&self, x: usize, y: usize) -> Result<()> {
        if x < self.width && y < self.height {
            Ok(())
        } else {
            Err(RenderError::invalid(format!(
                "pixel ({}, {}) outside {}x{} framebuffer",
                x, y, self.width, self.height
            )))
        }
    }
}

impl RenderTarget for FrameBuffer {
    fn width(&self) -> usize {
        self.width
    }

    fn height(&self) -> usize {
        self.height
    }

    fn plot(&mut self, x: usize, y: usize, color: Color) {
        self.trusted_put_pixel(x, y, color);
    }
}

/// Byte images take the color in their own layout: gray, gray+alpha,
/// BGR or BGRA.
impl RenderTarget for Image {
    fn width(&self) -> usize {
        Image::width(self)
    }

    fn height(&self) -> usize {
        Image::height(self)
    }

    fn plot(&mut self, x: usize, y: usize, color: Color) {
        let [r, g, b, a] = color.to_bytes();
        let gray = (color.luma() * 255.0 + 0.5) as u8;
        let pixel = self.trusted_pixel_mut(x, y);
        match pixel.len() {
            1 => pixel[0] = gray,
            2 => pixel.copy_from_slice(&[gray, a]),
            3 => pixel.copy_from_slice(&[b, g, r]),
            _ => pixel.copy_from_slice(&[b, g, r, a]),
        }
    }
}

fn check_endpoint<T: RenderTarget + ?Sized>(target: &T, x: i32, y: i32) -> Result<()> {
    if x < 0 || y < 0 || x as usize >= target.width() || y as usize >= target.height() {
        return Err(RenderError::invalid(format!(
            "line endpoint ({}, {}) outside {}x{} target",
            x,
            y,
            target.width(),
            target.height()
        )));
    }
    Ok(())
}

/// Draw a line from (x0, y0) to (x1, y1) using Bresenham's algorithm.
///
/// Exactly one pixel is written per step along the major axis. There is no
/// clipping: both endpoints must lie inside the target, and since the whole
/// segment stays within their bounding box nothing is written otherwise.
pub fn draw_line<T: RenderTarget + ?Sized>(
    target: &mut T,
    mut x0: i32,
    mut y0: i32,
    mut x1: i32,
    mut y1: i32,
    color: Color,
) -> Result<()> {
    check_endpoint(target, x0, y0)?;
    check_endpoint(target, x1, y1)?;

    // Steep lines are walked along y by swapping the axes
    let steep = (y1 - y0).abs() > (x1 - x0).abs();
    if steep {
        std::mem::swap(&mut x0, &mut y0);
        std::mem::swap(&mut x1, &mut y1);
    }
    if x0 > x1 {
        std::mem::swap(&mut x0, &mut x1);
        std::mem::swap(&mut y0, &mut y1);
    }

    let dx = x1 - x0;
    let dy = y1 - y0;
    let delta_error = dy.abs() * 2;
    let y_step = if dy > 0 { 1 } else { -1 };
    let mut error = 0;
    let mut y = y0;

    for x in x0..=x1 {
        if steep {
            target.plot(y as usize, x as usize, color);
        } else {
            target.plot(x as usize, y as usize, color);
        }

        error += delta_error;
        if error > dx {
            y += y_step;
            error -= 2 * dx;
        }
    }
    Ok(())
}

/// Outline a triangle with three lines
pub fn draw_triangle<T: RenderTarget + ?Sized>(
    target: &mut T,
    a: (i32, i32),
    b: (i32, i32),
    c: (i32, i32),
    color: Color,
) -> Result<()> {
    draw_line(target, a.0, a.1, b.0, b.1, color)?;
    draw_line(target, b.0, b.1, c.0, c.1, color)?;
    draw_line(target, c.0, c.1, a.0, a.1, color)
}

/// Outline every face of a mesh whose vertex x/y are already in pixels
pub fn draw_wireframe<T: RenderTarget + ?Sized>(target: &mut T, mesh: &Mesh, color: Color) -> Result<()> {
    let screen = |i: usize| {
        let p = mesh.vertices()[i].position;
        (p.x.round() as i32, p.y.round() as i32)
    };
    for face in mesh.faces() {
        let [a, b, c] = face.indices;
        draw_triangle(target, screen(a), screen(b), screen(c), color)?;
    }
    Ok(())
}
