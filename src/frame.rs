//! Per-frame state: timing, projection mode and the keyboard bindings that change them.

use std::time::Instant;

use sdl2::keyboard::Keycode;

use crate::{
    camera::{Camera, Movement},
    other::InputState,
    render::scene::ProjectionMode,
};

const MOVEMENT_KEYS: [(Keycode, Movement); 6] = [
    (Keycode::W, Movement::Forward),
    (Keycode::S, Movement::Backward),
    (Keycode::A, Movement::Left),
    (Keycode::D, Movement::Right),
    (Keycode::Q, Movement::Up),
    (Keycode::E, Movement::Down),
];

pub struct FrameState {
    pub delta_time: f32,
    pub projection: ProjectionMode,
    /// Toggled with H and J. Nothing in the scene reads it yet.
    pub fruit_visible: bool,
    last_frame: Instant,
}

impl Default for FrameState {
    fn default() -> Self {
        Self {
            delta_time: 0.0,
            projection: ProjectionMode::Perspective,
            fruit_visible: true,
            last_frame: Instant::now(),
        }
    }
}

impl FrameState {
    /// Measures the time since the previous call.
    pub fn tick(&mut self) -> f32 {
        let now = Instant::now();
        self.delta_time = now.duration_since(self.last_frame).as_secs_f32();
        self.last_frame = now;
        self.delta_time
    }

    /// Applies this frame's input to the camera and the frame toggles.
    pub fn apply_input(&mut self, input: &InputState, camera: &mut Camera) {
        for (key, movement) in MOVEMENT_KEYS {
            if input.is_down(key) {
                camera.process_keyboard(movement, self.delta_time);
            }
        }

        if input.is_down(Keycode::P) {
            self.projection = ProjectionMode::Perspective;
        }
        if input.is_down(Keycode::O) {
            self.projection = ProjectionMode::Orthographic;
        }

        if input.is_down(Keycode::H) && !self.fruit_visible {
            self.fruit_visible = true;
            log::debug!("Fruit toggled on");
        } else if input.is_down(Keycode::J) && self.fruit_visible {
            self.fruit_visible = false;
            log::debug!("Fruit toggled off");
        }

        let delta = input.mouse.delta;
        if delta.x != 0.0 || delta.y != 0.0 {
            camera.process_mouse_movement(delta.x, delta.y);
        }
        if input.mouse.scroll_delta.y != 0.0 {
            camera.process_mouse_scroll(input.mouse.scroll_delta.y);
        }
    }
}

#[cfg(test)]
mod tests {
    use glam::{Vec2, Vec3};

    use super::*;

    fn setup() -> (FrameState, InputState, Camera) {
        let frame = FrameState {
            delta_time: 0.5,
            ..FrameState::default()
        };
        (frame, InputState::default(), Camera::new(Vec3::ZERO, 2.0, 0.1))
    }

    #[test]
    fn test_held_keys_move_the_camera() {
        let (mut frame, mut input, mut camera) = setup();
        input.keyboard.down.insert(Keycode::W);
        input.keyboard.down.insert(Keycode::Q);
        frame.apply_input(&input, &mut camera);
        assert!(camera.position.abs_diff_eq(Vec3::new(0.0, 1.0, -1.0), 1e-5));
    }

    #[test]
    fn test_projection_keys() {
        let (mut frame, mut input, mut camera) = setup();
        input.keyboard.down.insert(Keycode::O);
        frame.apply_input(&input, &mut camera);
        assert_eq!(frame.projection, ProjectionMode::Orthographic);

        input.keyboard.down.clear();
        frame.apply_input(&input, &mut camera);
        assert_eq!(frame.projection, ProjectionMode::Orthographic);

        input.keyboard.down.insert(Keycode::P);
        frame.apply_input(&input, &mut camera);
        assert_eq!(frame.projection, ProjectionMode::Perspective);
    }

    #[test]
    fn test_fruit_toggle() {
        let (mut frame, mut input, mut camera) = setup();
        assert!(frame.fruit_visible);
        input.keyboard.down.insert(Keycode::J);
        frame.apply_input(&input, &mut camera);
        assert!(!frame.fruit_visible);

        input.keyboard.down.insert(Keycode::H);
        frame.apply_input(&input, &mut camera);
        assert!(frame.fruit_visible);
    }

    #[test]
    fn test_mouse_turns_and_zooms() {
        let (mut frame, mut input, mut camera) = setup();
        input.mouse.delta = Vec2::new(0.0, 100.0);
        input.mouse.scroll_delta = Vec2::new(0.0, 5.0);
        frame.apply_input(&input, &mut camera);
        assert_eq!(camera.pitch, 10.0);
        assert_eq!(camera.zoom, 40.0);
    }

    #[test]
    fn test_tick_measures_elapsed_time() {
        let mut frame = FrameState::default();
        std::thread::sleep(std::time::Duration::from_millis(5));
        let dt = frame.tick();
        assert!(dt >= 0.005);
        assert_eq!(frame.delta_time, dt);
    }
}
