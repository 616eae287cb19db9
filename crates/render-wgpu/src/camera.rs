use glam::{Mat4, Vec2, Vec3};

const MIN_DISTANCE: f32 = 2.0;
const MAX_DISTANCE: f32 = 400.0;
// Just shy of the poles so look_at never degenerates.
const PITCH_LIMIT: f32 = 1.54;

/// Orbit camera: rotates around a fixed target at a clamped distance.
///
/// Pointer and scroll input is injected as pending deltas; `update()`
/// applies them to the transform state once per frame.
#[derive(Debug, Clone)]
pub struct OrbitCamera {
    pub target: Vec3,
    pub distance: f32,
    pub yaw: f32,
    pub pitch: f32,
    pub fov: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    pub sensitivity: f32,
    pub zoom_speed: f32,
    pending_rotate: Vec2,
    pending_zoom: f32,
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self {
            target: Vec3::ZERO,
            distance: 107.703, // sqrt(100^2 + 40^2): 100 up, 40 back from the origin
            yaw: std::f32::consts::FRAC_PI_2,
            pitch: 1.190, // atan(100 / 40)
            fov: 75.0_f32.to_radians(),
            aspect: 16.0 / 9.0,
            near: 0.1,
            far: 1000.0,
            sensitivity: 0.005,
            zoom_speed: 0.1,
            pending_rotate: Vec2::ZERO,
            pending_zoom: 0.0,
        }
    }
}

impl OrbitCamera {
    /// Queue a pointer-drag rotation, in pixels.
    pub fn inject_rotate(&mut self, dx: f32, dy: f32) {
        self.pending_rotate += Vec2::new(dx, dy);
    }

    /// Queue a scroll zoom, in scroll lines.
    pub fn inject_zoom(&mut self, delta: f32) {
        self.pending_zoom += delta;
    }

    /// Apply queued input to the transform state. Called once per frame.
    pub fn update(&mut self) {
        let rotate = std::mem::take(&mut self.pending_rotate);
        self.yaw += rotate.x * self.sensitivity;
        self.pitch = (self.pitch - rotate.y * self.sensitivity).clamp(-PITCH_LIMIT, PITCH_LIMIT);

        let zoom = std::mem::take(&mut self.pending_zoom);
        self.distance =
            (self.distance * (1.0 - zoom * self.zoom_speed)).clamp(MIN_DISTANCE, MAX_DISTANCE);
    }

    /// Camera position derived from yaw/pitch/distance around the target.
    pub fn eye(&self) -> Vec3 {
        let dir = Vec3::new(
            self.yaw.cos() * self.pitch.cos(),
            self.pitch.sin(),
            self.yaw.sin() * self.pitch.cos(),
        );
        self.target + dir * self.distance
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye(), self.target, Vec3::Y)
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov, self.aspect, self.near, self.far)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_camera_starts_above_and_behind() {
        let cam = OrbitCamera::default();
        let eye = cam.eye();
        assert!((eye.x - 0.0).abs() < 0.5);
        assert!((eye.y - 100.0).abs() < 0.5);
        assert!((eye.z - 40.0).abs() < 0.5);
        let vp = cam.view_projection();
        assert!(!vp.col(0).x.is_nan());
    }

    #[test]
    fn rotate_moves_the_eye() {
        let mut cam = OrbitCamera::default();
        let start = cam.eye();
        cam.inject_rotate(120.0, -40.0);
        cam.update();
        assert_ne!(cam.eye(), start);
        // Distance to target is preserved by rotation.
        assert!((cam.eye().distance(cam.target) - cam.distance).abs() < 1e-3);
    }

    #[test]
    fn pending_input_applies_once() {
        let mut cam = OrbitCamera::default();
        cam.inject_rotate(50.0, 0.0);
        cam.update();
        let after_first = cam.yaw;
        cam.update();
        assert_eq!(cam.yaw, after_first);
    }

    #[test]
    fn zoom_clamps_distance() {
        let mut cam = OrbitCamera::default();
        for _ in 0..200 {
            cam.inject_zoom(5.0);
            cam.update();
        }
        assert!(cam.distance >= MIN_DISTANCE);
        for _ in 0..200 {
            cam.inject_zoom(-5.0);
            cam.update();
        }
        assert!(cam.distance <= MAX_DISTANCE);
    }

    #[test]
    fn pitch_clamps_at_the_poles() {
        let mut cam = OrbitCamera::default();
        cam.inject_rotate(0.0, -100_000.0);
        cam.update();
        assert!(cam.pitch <= PITCH_LIMIT);
        cam.inject_rotate(0.0, 100_000.0);
        cam.update();
        assert!(cam.pitch >= -PITCH_LIMIT);
    }
}
