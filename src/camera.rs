//! Free-fly camera driven by keyboard, mouse motion and the scroll wheel.

use glam::{Mat4, Vec3};

/// Pitch is kept just short of straight up or down so the look-at basis never degenerates.
pub const PITCH_LIMIT: f32 = 89.0;
/// Smallest field of view the scroll wheel can reach, in degrees.
pub const MIN_ZOOM: f32 = 1.0;
/// Largest field of view, also the starting value.
pub const MAX_ZOOM: f32 = 45.0;

/// Directions the camera can be moved in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Movement {
    Forward,
    Backward,
    Left,
    Right,
    Up,
    Down,
}

#[derive(Clone, Debug)]
pub struct Camera {
    pub position: Vec3,
    pub front: Vec3,
    pub up: Vec3,
    pub right: Vec3,
    pub world_up: Vec3,
    pub yaw: f32,
    pub pitch: f32,
    pub speed: f32,
    pub sensitivity: f32,
    pub zoom: f32,
}

impl Camera {
    /// Creates a camera at `position` looking down the negative Z axis.
    pub fn new(position: Vec3, speed: f32, sensitivity: f32) -> Self {
        let mut camera = Self {
            position,
            front: Vec3::NEG_Z,
            up: Vec3::Y,
            right: Vec3::X,
            world_up: Vec3::Y,
            yaw: -90.0,
            pitch: 0.0,
            speed,
            sensitivity,
            zoom: MAX_ZOOM,
        };
        camera.update_vectors();
        camera
    }

    /// Returns the view matrix for the current position and orientation.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.position + self.front, self.up)
    }

    /// Moves the camera along one of its axes, scaled by the frame time.
    pub fn process_keyboard(&mut self, direction: Movement, delta_time: f32) {
        let velocity = self.speed * delta_time;
        match direction {
            Movement::Forward => self.position += self.front * velocity,
            Movement::Backward => self.position -= self.front * velocity,
            Movement::Left => self.position -= self.right * velocity,
            Movement::Right => self.position += self.right * velocity,
            Movement::Up => self.position += self.up * velocity,
            Movement::Down => self.position -= self.up * velocity,
        }
    }

    /// Turns the camera by a mouse offset. Positive `y_offset` looks up.
    pub fn process_mouse_movement(&mut self, x_offset: f32, y_offset: f32) {
        self.yaw += x_offset * self.sensitivity;
        self.pitch = (self.pitch + y_offset * self.sensitivity).clamp(-PITCH_LIMIT, PITCH_LIMIT);
        self.update_vectors();
    }

    /// Narrows or widens the field of view.
    pub fn process_mouse_scroll(&mut self, y_offset: f32) {
        self.zoom = (self.zoom - y_offset).clamp(MIN_ZOOM, MAX_ZOOM);
    }

    fn update_vectors(&mut self) {
        let (yaw, pitch) = (self.yaw.to_radians(), self.pitch.to_radians());
        self.front = Vec3::new(yaw.cos() * pitch.cos(), pitch.sin(), yaw.sin() * pitch.cos())
            .normalize();
        self.right = self.front.cross(self.world_up).normalize();
        self.up = self.right.cross(self.front).normalize();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn camera() -> Camera {
        Camera::new(Vec3::new(0.0, 1.5, 10.0), 2.5, 0.1)
    }

    #[test]
    fn test_starts_looking_down_negative_z() {
        let camera = camera();
        assert!(camera.front.abs_diff_eq(Vec3::NEG_Z, 1e-6));
        assert!(camera.right.abs_diff_eq(Vec3::X, 1e-6));
        assert!(camera.up.abs_diff_eq(Vec3::Y, 1e-6));
        assert_eq!(camera.zoom, MAX_ZOOM);
    }

    #[test]
    fn test_pitch_is_clamped() {
        let mut camera = camera();
        for _ in 0..1000 {
            camera.process_mouse_movement(3.0, 10_000.0);
            assert!(camera.pitch <= PITCH_LIMIT);
        }
        assert_eq!(camera.pitch, PITCH_LIMIT);

        camera.process_mouse_movement(0.0, -f32::MAX);
        assert_eq!(camera.pitch, -PITCH_LIMIT);
        assert!(camera.front.is_finite());
        assert!(camera.up.y > 0.0);
    }

    #[test]
    fn test_movement_scales_with_delta_time() {
        let mut camera = camera();
        camera.process_keyboard(Movement::Forward, 2.0);
        assert!(camera.position.abs_diff_eq(Vec3::new(0.0, 1.5, 5.0), 1e-5));

        camera.process_keyboard(Movement::Right, 0.4);
        camera.process_keyboard(Movement::Up, 0.4);
        assert!(camera.position.abs_diff_eq(Vec3::new(1.0, 2.5, 5.0), 1e-5));

        camera.process_keyboard(Movement::Left, 0.4);
        camera.process_keyboard(Movement::Down, 0.4);
        camera.process_keyboard(Movement::Backward, 2.0);
        assert!(camera.position.abs_diff_eq(Vec3::new(0.0, 1.5, 10.0), 1e-5));
    }

    #[test]
    fn test_zoom_stays_in_bounds() {
        let mut camera = camera();
        camera.process_mouse_scroll(-10.0);
        assert_eq!(camera.zoom, MAX_ZOOM);
        camera.process_mouse_scroll(4.0);
        assert_eq!(camera.zoom, 41.0);
        camera.process_mouse_scroll(500.0);
        assert_eq!(camera.zoom, MIN_ZOOM);
    }

    #[test]
    fn test_view_matrix_moves_eye_to_origin() {
        let camera = camera();
        let eye = camera.view_matrix().transform_point3(camera.position);
        assert!(eye.abs_diff_eq(Vec3::ZERO, 1e-5));
        let ahead = camera.view_matrix().transform_point3(camera.position + camera.front);
        assert!(ahead.abs_diff_eq(Vec3::NEG_Z, 1e-5));
    }
}
