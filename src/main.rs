//! softrender viewer: shows a TGA image or a line demo in a window
//!
//! - A / D: grow / shrink the image
//! - S: save as `<name>_edited.tga` next to the source
//! - O: open a TGA file
//! - W: write the current settings to `softrender.ron`
//! - Space: switch between image and line demo
//! - Left / right click: flip horizontally / vertically
//! - Scroll: zoom, Escape: quit

/// Version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

mod app;
mod config;
mod platform;

use app::ViewerState;
use config::{ViewerConfig, CONFIG_FILE};
use env_logger::Env;
use log::{error, info, warn};
use macroquad::prelude::*;
use platform::Window;

fn window_conf() -> Conf {
    let config = ViewerConfig::load_or_default(CONFIG_FILE);
    Conf {
        window_title: format!("{} v{}", config.title, VERSION),
        window_width: (config.width * config.zoom as usize) as i32,
        window_height: (config.height * config.zoom as usize) as i32,
        window_resizable: true,
        ..Default::default()
    }
}

#[macroquad::main(window_conf)]
async fn main() {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let config = ViewerConfig::load_or_default(CONFIG_FILE);
    let mut viewer = match ViewerState::new(&config) {
        Ok(viewer) => viewer,
        Err(e) => {
            error!("Failed to start viewer: {}", e);
            return;
        }
    };

    if let Some(path) = &config.image {
        if let Err(e) = viewer.open(path) {
            warn!("Failed to open {}: {}", path.display(), e);
        }
    }

    let mut window = Window::new(config.width, config.height);
    info!("=== softrender v{} ===", VERSION);

    loop {
        window.poll_events(&mut viewer);
        if window.should_close() {
            break;
        }

        let (surface, width, height) = window.surface_mut();
        if let Err(e) = viewer.render(surface, width, height) {
            error!("Render failed: {}", e);
            break;
        }
        window.present(viewer.zoom, viewer.background());

        next_frame().await;
    }
}
