use glam::Vec2;

pub const MIN_ZOOM: f32 = 0.1;
pub const MAX_ZOOM: f32 = 10.0;
const WHEEL_ZOOM_STEP: f32 = 0.1;
const PAN_BASE_SCALE: f32 = 2.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraState {
    pub center_offset: Vec2,
    pub zoom_level: f32,
}

impl Default for CameraState {
    fn default() -> Self {
        Self {
            center_offset: Vec2::ZERO,
            zoom_level: 1.0,
        }
    }
}

impl CameraState {
    pub fn new(center_offset: Vec2, zoom_level: f32) -> Self {
        let mut cam = Self {
            center_offset,
            zoom_level: 1.0,
        };
        cam.set_zoom(zoom_level);
        cam
    }

    pub fn set_zoom(&mut self, zoom: f32) {
        self.zoom_level = if zoom.is_finite() {
            zoom.clamp(MIN_ZOOM, MAX_ZOOM)
        } else {
            1.0
        };
    }

    // Positive `direction` zooms out (larger view), matching a wheel scrolled towards the user.
    pub fn zoom_step(&mut self, direction: f32) {
        let delta = direction.signum() * WHEEL_ZOOM_STEP;
        self.set_zoom(self.zoom_level * (1.0 + delta));
    }

    // Screen-space drag in pixels; pans faster when zoomed out.
    pub fn pan_pixels(&mut self, dx: f32, dy: f32, viewport: Vec2) {
        let vw = viewport.x.max(1.0);
        let vh = viewport.y.max(1.0);
        let zoom_scale = self.zoom_level.powf(1.5);
        self.center_offset.x += dx / vw * PAN_BASE_SCALE * zoom_scale;
        self.center_offset.y -= dy / vh * PAN_BASE_SCALE * zoom_scale;
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    // Combined pan point in pre-zoom units, as consumed by the transform.
    pub fn center_point(&self, ui_center: Vec2) -> Vec2 {
        (ui_center + self.center_offset) / self.zoom_level
    }
}
