//! Viewer state
//!
//! Owns the displayed image and the line-demo framebuffer, and turns input
//! events into buffer edits (resize, flip, load, save).

use crate::config::{ViewerConfig, CONFIG_FILE};
use crate::platform::{Button, InputHandler, KeyCode};
use log::{debug, error, info};
use softrender::rasterizer::{draw_triangle, draw_wireframe, Mesh, Vertex};
use softrender::{
    blit_frame, blit_image, draw_line, load_image, save_image, Color, FrameBuffer, Image, Result,
};
use std::path::{Path, PathBuf};

/// What the surface shows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewMode {
    Image,
    Lines,
}

pub struct ViewerState {
    pub image: Option<Image>,
    pub image_path: Option<PathBuf>,
    pub mode: ViewMode,
    pub zoom: u32,
    frame: FrameBuffer,
    demo_mesh: Mesh,
    config: ViewerConfig,
    cursor: (f32, f32),
}

/// Two triangles forming a quad in the lower-left of the demo
fn build_demo_mesh(width: usize, height: usize) -> Result<Mesh> {
    let w = width as f32;
    let h = height as f32;
    let mut mesh = Mesh::new();
    let a = mesh.add_vertex(Vertex::from_pos(w * 0.05, h * 0.05, 0.0));
    let b = mesh.add_vertex(Vertex::from_pos(w * 0.30, h * 0.05, 0.0));
    let c = mesh.add_vertex(Vertex::from_pos(w * 0.30, h * 0.30, 0.0));
    let d = mesh.add_vertex(Vertex::from_pos(w * 0.05, h * 0.30, 0.0));
    mesh.add_face(a, b, c)?;
    mesh.add_face(a, c, d)?;
    Ok(mesh)
}

impl ViewerState {
    pub fn new(config: &ViewerConfig) -> Result<Self> {
        Ok(Self {
            image: None,
            image_path: None,
            mode: ViewMode::Lines,
            zoom: config.zoom,
            frame: FrameBuffer::new(config.width, config.height)?,
            demo_mesh: build_demo_mesh(config.width, config.height)?,
            config: config.clone(),
            cursor: (0.0, 0.0),
        })
    }

    pub fn background(&self) -> [u8; 3] {
        self.config.background
    }

    /// Load an image and switch to image view
    pub fn open<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        let path = path.as_ref();
        let image = load_image(path)?;
        self.image = Some(image);
        self.image_path = Some(path.to_path_buf());
        self.mode = ViewMode::Image;
        Ok(())
    }

    /// Scale the image by `factor`, never below one pixel
    pub fn scale_image(&mut self, factor: f32) -> Result<()> {
        if let Some(image) = &mut self.image {
            let width = ((image.width() as f32 * factor) as usize).max(1);
            let height = ((image.height() as f32 * factor) as usize).max(1);
            image.resize(width, height)?;
            info!("Resized to {}x{}", width, height);
        }
        Ok(())
    }

    /// Where `save` writes: next to the source as `<stem>_edited.tga`
    pub fn output_path(&self) -> PathBuf {
        match &self.image_path {
            Some(path) => {
                let stem = path
                    .file_stem()
                    .map(|s| s.to_string_lossy().to_string())
                    .unwrap_or_else(|| "image".to_string());
                path.with_file_name(format!("{}_edited.tga", stem))
            }
            None => PathBuf::from("output.tga"),
        }
    }

    /// Save the current image, returning where it went
    pub fn save(&self) -> Result<Option<PathBuf>> {
        match &self.image {
            Some(image) => {
                let path = self.output_path();
                save_image(image, &path)?;
                Ok(Some(path))
            }
            None => Ok(None),
        }
    }

    /// Persist the current view settings to the config file
    fn write_config(&mut self) {
        self.config.zoom = self.zoom;
        self.config.image = self.image_path.clone();
        match self.config.save(CONFIG_FILE) {
            Ok(()) => info!("Wrote {}", CONFIG_FILE),
            Err(e) => error!("Failed to write {}: {}", CONFIG_FILE, e),
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn prompt_open(&mut self) {
        let dialog = rfd::FileDialog::new().add_filter("TGA image", &["tga"]);
        if let Some(path) = dialog.pick_file() {
            if let Err(e) = self.open(&path) {
                error!("Failed to open {}: {}", path.display(), e);
            }
        }
    }

    #[cfg(target_arch = "wasm32")]
    fn prompt_open(&mut self) {
        info!("Open is not available in the browser");
    }

    /// Redraw the line demo into the framebuffer
    pub fn draw_demo(&mut self) -> Result<()> {
        let [r, g, b] = self.config.background;
        self.frame.clear(Color::from_rgba8(r, g, b, 255));

        let w = self.frame.width() as i32;
        let h = self.frame.height() as i32;
        let (cx, cy) = (w / 2, h / 2);
        let radius = (w.min(h) / 2 - 1).max(0);
        let colors = [Color::WHITE, Color::RED, Color::CYAN];

        // Spokes at every octant and half-octant so all transpose/swap paths run
        for i in 0..16 {
            let angle = i as f32 * std::f32::consts::TAU / 16.0;
            let x = cx + (angle.cos() * radius as f32) as i32;
            let y = cy + (angle.sin() * radius as f32) as i32;
            draw_line(&mut self.frame, cx, cy, x, y, colors[i % colors.len()])?;
        }

        draw_wireframe(&mut self.frame, &self.demo_mesh, Color::GREEN)?;
        draw_triangle(
            &mut self.frame,
            (w * 7 / 10, h / 20),
            (w * 19 / 20, h / 20),
            (w * 33 / 40, h * 3 / 10),
            Color::BLUE,
        )
    }

    /// Fill a `width * height * 4` surface for presentation
    pub fn render(&mut self, surface: &mut [u8], width: usize, height: usize) -> Result<()> {
        let order = self.config.channel_order;
        match (&self.image, self.mode) {
            (Some(image), ViewMode::Image) => blit_image(image, surface, width, height, order),
            _ => {
                self.draw_demo()?;
                blit_frame(&self.frame, surface, width, height, order)
            }
        }
    }
}

impl InputHandler for ViewerState {
    fn on_key(&mut self, key: KeyCode, pressed: bool) {
        if !pressed {
            debug!("Key {:?} released", key);
            return;
        }
        let factor = self.config.resize_factor;
        let result = match key {
            KeyCode::A => self.scale_image(factor),
            KeyCode::D => self.scale_image(1.0 / factor),
            KeyCode::S => self.save().map(|saved| {
                if let Some(path) = saved {
                    info!("Saved {}", path.display());
                }
            }),
            KeyCode::O => {
                self.prompt_open();
                Ok(())
            }
            KeyCode::W => {
                self.write_config();
                Ok(())
            }
            KeyCode::Space => {
                self.mode = match self.mode {
                    ViewMode::Image => ViewMode::Lines,
                    ViewMode::Lines => ViewMode::Image,
                };
                Ok(())
            }
        };
        if let Err(e) = result {
            error!("{:?} failed: {}", key, e);
        }
    }

    fn on_button(&mut self, button: Button, pressed: bool) {
        if !pressed {
            debug!("{:?} released at ({}, {})", button, self.cursor.0, self.cursor.1);
            return;
        }
        if let Some(image) = &mut self.image {
            match button {
                Button::Left => image.flip_horizontal(),
                Button::Right => image.flip_vertical(),
            }
        }
    }

    fn on_scroll(&mut self, offset: f32) {
        let zoom = self.zoom as i32 + offset.signum() as i32;
        self.zoom = zoom.clamp(1, 8) as u32;
        debug!("Scroll {} -> zoom {}", offset, self.zoom);
    }

    fn on_cursor(&mut self, x: f32, y: f32) {
        self.cursor = (x, y);
    }
}
