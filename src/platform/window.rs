//! macroquad-backed window: polls input and presents a byte surface

use super::input::{Button, InputHandler, InputState, KeyCode};
use macroquad::color::Color as MqColor;
use macroquad::input::{
    is_key_pressed, is_key_released, is_mouse_button_pressed, is_mouse_button_released,
    mouse_position, mouse_wheel, KeyCode as MqKey, MouseButton,
};
use macroquad::math::vec2;
use macroquad::texture::{draw_texture_ex, DrawTextureParams, FilterMode, Texture2D};
use macroquad::window::clear_background;

fn platform_key(key: KeyCode) -> MqKey {
    match key {
        KeyCode::A => MqKey::A,
        KeyCode::D => MqKey::D,
        KeyCode::S => MqKey::S,
        KeyCode::W => MqKey::W,
        KeyCode::O => MqKey::O,
        KeyCode::Space => MqKey::Space,
    }
}

fn platform_button(button: Button) -> MouseButton {
    match button {
        Button::Left => MouseButton::Left,
        Button::Right => MouseButton::Right,
    }
}

/// Display surface (RGBA, top-left origin) plus input state
pub struct Window {
    width: usize,
    height: usize,
    surface: Vec<u8>,
    texture: Texture2D,
    input: InputState,
}

impl Window {
    pub fn new(width: usize, height: usize) -> Self {
        let surface = vec![0; width * height * 4];
        let texture = Texture2D::from_rgba8(width as u16, height as u16, &surface);
        texture.set_filter(FilterMode::Nearest);
        Self {
            width,
            height,
            surface,
            texture,
            input: InputState::default(),
        }
    }

    /// Escape closes the viewer
    pub fn should_close(&self) -> bool {
        is_key_pressed(MqKey::Escape)
    }

    /// Forward this frame's input to `handler`. Press and release events are
    /// delivered once each, even if the platform repeats them.
    pub fn poll_events(&mut self, handler: &mut dyn InputHandler) {
        for key in KeyCode::ALL {
            let mq = platform_key(key);
            if is_key_pressed(mq) && !self.input.key_down(key) {
                self.input.set_key(key, true);
                handler.on_key(key, true);
            }
            if is_key_released(mq) && self.input.key_down(key) {
                self.input.set_key(key, false);
                handler.on_key(key, false);
            }
        }

        let cursor = mouse_position();
        if cursor != self.input.cursor {
            self.input.cursor = cursor;
            handler.on_cursor(cursor.0, cursor.1);
        }

        for button in Button::ALL {
            let mq = platform_button(button);
            if is_mouse_button_pressed(mq) && !self.input.button_down(button) {
                self.input.set_button(button, true);
                handler.on_button(button, true);
            }
            if is_mouse_button_released(mq) && self.input.button_down(button) {
                self.input.set_button(button, false);
                handler.on_button(button, false);
            }
        }

        let (_, scroll) = mouse_wheel();
        if scroll != 0.0 {
            handler.on_scroll(scroll);
        }
    }

    /// The surface to blit into, with its dimensions
    pub fn surface_mut(&mut self) -> (&mut [u8], usize, usize) {
        (&mut self.surface, self.width, self.height)
    }

    /// Upload the surface and draw it at integer zoom
    pub fn present(&self, zoom: u32, background: [u8; 3]) {
        clear_background(MqColor::from_rgba(background[0], background[1], background[2], 255));
        self.texture
            .update_from_bytes(self.width as u32, self.height as u32, &self.surface);
        let scale = zoom as f32;
        draw_texture_ex(
            &self.texture,
            0.0,
            0.0,
            macroquad::color::WHITE,
            DrawTextureParams {
                dest_size: Some(vec2(self.width as f32 * scale, self.height as f32 * scale)),
                ..Default::default()
            },
        );
    }
}
