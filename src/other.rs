use std::collections::HashSet;

use glam::Vec2;
use sdl2::{event::Event, keyboard::Keycode, mouse::MouseButton};

/// The current state of the keyboard.
#[derive(Default)]
pub struct KeyboardState {
    pub down: HashSet<Keycode>,
    pub pressed: HashSet<Keycode>,
}

/// The current state of the mouse.
#[derive(Default)]
pub struct MouseState {
    pub delta: Vec2,
    pub scroll_delta: Vec2,
}

/// Keyboard and mouse state accumulated over one frame.
#[derive(Default)]
pub struct InputState {
    pub keyboard: KeyboardState,
    pub mouse: MouseState,
    /// Set once the first relative motion has been seen, so the initial warp is ignored.
    pub seen_mouse: bool,
}

impl InputState {
    /// Clears everything that only lives for a single frame.
    pub fn begin_frame(&mut self) {
        self.keyboard.pressed.clear();
        self.mouse.delta = Vec2::ZERO;
        self.mouse.scroll_delta = Vec2::ZERO;
    }

    /// Folds an SDL event into the state.
    pub fn handle_event(&mut self, event: &Event) {
        match event {
            Event::MouseMotion { xrel, yrel, .. } => self.mouse_motion(*xrel, *yrel),
            Event::MouseWheel { precise_x, precise_y, .. } => {
                self.mouse.scroll_delta += Vec2::new(*precise_x, *precise_y);
            }
            Event::MouseButtonDown { mouse_btn, .. } => log_button(*mouse_btn, "pressed"),
            Event::MouseButtonUp { mouse_btn, .. } => log_button(*mouse_btn, "released"),
            Event::KeyDown {
                keycode: Some(keycode),
                repeat: false,
                ..
            } => self.key_down(*keycode),
            Event::KeyUp {
                keycode: Some(keycode),
                ..
            } => self.key_up(*keycode),
            _ => {}
        }
    }

    fn mouse_motion(&mut self, xrel: i32, yrel: i32) {
        if !self.seen_mouse {
            self.seen_mouse = true;
            return;
        }
        // Screen y grows downwards, looking up wants a positive offset
        self.mouse.delta += Vec2::new(xrel as f32, -yrel as f32);
    }

    fn key_down(&mut self, keycode: Keycode) {
        self.keyboard.down.insert(keycode);
        self.keyboard.pressed.insert(keycode);
    }

    fn key_up(&mut self, keycode: Keycode) {
        self.keyboard.down.remove(&keycode);
    }

    /// Whether `key` is currently held.
    pub fn is_down(&self, key: Keycode) -> bool {
        self.keyboard.down.contains(&key)
    }
}

fn log_button(button: MouseButton, action: &str) {
    let name = match button {
        MouseButton::Left => "Left",
        MouseButton::Middle => "Middle",
        MouseButton::Right => "Right",
        _ => {
            log::info!("Unhandled mouse button event");
            return;
        }
    };
    log::info!("{} mouse button {}", name, action);
}
