//! Input events delivered by the window to whoever owns the render loop

/// Keys the viewer reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    A = 0,
    D,
    S,
    W,
    O,
    Space,
}

impl KeyCode {
    pub const ALL: [KeyCode; 6] = [
        KeyCode::A,
        KeyCode::D,
        KeyCode::S,
        KeyCode::W,
        KeyCode::O,
        KeyCode::Space,
    ];
}

/// Mouse buttons
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Button {
    Left = 0,
    Right,
}

impl Button {
    pub const ALL: [Button; 2] = [Button::Left, Button::Right];
}

/// Receiver of input callbacks. The window calls these once per discrete
/// event, in the order the platform reported them.
pub trait InputHandler {
    fn on_key(&mut self, key: KeyCode, pressed: bool);
    fn on_button(&mut self, button: Button, pressed: bool);
    fn on_scroll(&mut self, offset: f32);
    fn on_cursor(&mut self, _x: f32, _y: f32) {}
}

/// Which keys and buttons are currently held, plus the cursor
#[derive(Debug, Clone, Copy, Default)]
pub struct InputState {
    keys: [bool; KeyCode::ALL.len()],
    buttons: [bool; Button::ALL.len()],
    pub cursor: (f32, f32),
}

impl InputState {
    pub fn key_down(&self, key: KeyCode) -> bool {
        self.keys[key as usize]
    }

    pub fn button_down(&self, button: Button) -> bool {
        self.buttons[button as usize]
    }

    pub fn set_key(&mut self, key: KeyCode, pressed: bool) {
        self.keys[key as usize] = pressed;
    }

    pub fn set_button(&mut self, button: Button, pressed: bool) {
        self.buttons[button as usize] = pressed;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn state_tracks_each_key_separately() {
        let mut state = InputState::default();
        state.set_key(KeyCode::Space, true);
        state.set_button(Button::Right, true);
        assert!(state.key_down(KeyCode::Space));
        assert!(!state.key_down(KeyCode::A));
        assert!(state.button_down(Button::Right));
        state.set_key(KeyCode::Space, false);
        assert!(!state.key_down(KeyCode::Space));
    }
}
