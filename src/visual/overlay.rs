use crate::mirror::MirrorPointSystem;
use glam::Vec2;

const MARKER_RGB: [f32; 3] = [0.0, 255.0, 163.0];
const ALPHA_ACTIVE: f32 = 0.8;
const ALPHA_HOVER: f32 = 0.6;
const ALPHA_IDLE: f32 = 0.3;
const ALPHA_RING: f32 = 0.4;
const ALPHA_FOLD_LINE: f32 = 0.3;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OverlayStyle {
    pub ring_radius: f32,
    pub dot_active: f32,
    pub dot_hover: f32,
    pub dot_idle: f32,
    pub handle: f32,
    pub line_width: f32,
}

impl OverlayStyle {
    pub fn from_ring_radius(ring_radius: f32) -> Self {
        let r = ring_radius.max(2.0);
        Self {
            ring_radius: r,
            dot_active: (r / 5.0).max(1.0),
            dot_hover: (r / 6.5).max(0.9),
            dot_idle: (r / 10.0).max(0.75),
            handle: (r / 5.0).max(1.0),
            line_width: (r / 20.0).max(0.6),
        }
    }
}

pub struct Canvas<'a> {
    buf: &'a mut [u8],
    w: usize,
    h: usize,
}

impl<'a> Canvas<'a> {
    pub fn new(buf: &'a mut [u8], w: usize, h: usize) -> Option<Self> {
        if w == 0 || h == 0 || buf.len() < w * h * 4 {
            return None;
        }
        Some(Self { buf, w, h })
    }

    fn blend(&mut self, x: i64, y: i64, alpha: f32) {
        if x < 0 || y < 0 || x >= self.w as i64 || y >= self.h as i64 {
            return;
        }
        let i = (y as usize * self.w + x as usize) * 4;
        let a = alpha.clamp(0.0, 1.0);
        for c in 0..3 {
            let dst = self.buf[i + c] as f32;
            self.buf[i + c] = (dst + (MARKER_RGB[c] - dst) * a).round() as u8;
        }
    }

    // Pixel centres sit at +0.5, matching the mouse mapping.
    fn for_each_in(&mut self, center: Vec2, reach: f32, mut f: impl FnMut(Vec2) -> Option<f32>) {
        let x0 = (center.x - reach).floor() as i64;
        let x1 = (center.x + reach).ceil() as i64;
        let y0 = (center.y - reach).floor() as i64;
        let y1 = (center.y + reach).ceil() as i64;
        for y in y0..=y1 {
            for x in x0..=x1 {
                let p = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
                if let Some(a) = f(p) {
                    self.blend(x, y, a);
                }
            }
        }
    }

    pub fn fill_disc(&mut self, center: Vec2, radius: f32, alpha: f32) {
        self.for_each_in(center, radius, |p| (p.distance(center) <= radius).then_some(alpha));
    }

    pub fn stroke_ring(&mut self, center: Vec2, radius: f32, width: f32, alpha: f32) {
        let reach = radius + width;
        self.for_each_in(center, reach, |p| {
            ((p.distance(center) - radius).abs() <= width * 0.5 + 0.35).then_some(alpha)
        });
    }

    pub fn stroke_segment(&mut self, from: Vec2, to: Vec2, width: f32, alpha: f32) {
        let mid = (from + to) * 0.5;
        let reach = from.distance(to) * 0.5 + width;
        let seg = to - from;
        let len_sq = seg.length_squared().max(1e-6);
        self.for_each_in(mid, reach, |p| {
            let t = ((p - from).dot(seg) / len_sq).clamp(0.0, 1.0);
            let d = p.distance(from + seg * t);
            (d <= width * 0.5 + 0.35).then_some(alpha)
        });
    }
}

// Draws every point, then the ring, handle and fold-line preview for the active one.
pub fn paint_mirror_points(
    buf: &mut [u8],
    w: usize,
    h: usize,
    system: &MirrorPointSystem,
    style: &OverlayStyle,
) {
    let Some(mut canvas) = Canvas::new(buf, w, h) else {
        return;
    };
    let active = system.active();
    let hover = system.hover();

    for (i, point) in system.points().iter().enumerate() {
        let pos = system.shader_to_screen(point.position());
        let (radius, alpha) = if Some(i) == active {
            (style.dot_active, ALPHA_ACTIVE)
        } else if Some(i) == hover {
            (style.dot_hover, ALPHA_HOVER)
        } else {
            (style.dot_idle, ALPHA_IDLE)
        };
        canvas.fill_disc(pos, radius, alpha);
    }

    let Some(point) = system.active_point() else {
        return;
    };
    let pos = system.shader_to_screen(point.position());
    canvas.stroke_ring(pos, style.ring_radius, style.line_width * 2.0, ALPHA_RING);

    let angle = point.rotation.to_radians();
    let dir = Vec2::new(angle.cos(), angle.sin());
    canvas.fill_disc(pos + dir * style.ring_radius, style.handle, ALPHA_ACTIVE);

    let folds = point.folds.max(1);
    for i in 0..folds {
        let a = angle + i as f32 * std::f32::consts::TAU / folds as f32;
        let end = pos + Vec2::new(a.cos(), a.sin()) * style.ring_radius * 1.5;
        canvas.stroke_segment(pos, end, style.line_width, ALPHA_FOLD_LINE);
    }
}
