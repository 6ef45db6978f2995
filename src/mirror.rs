use glam::Vec2;
use std::time::{Duration, Instant};

pub const MAX_MIRROR_POINTS: usize = 4;
pub const MIN_FOLDS: u32 = 2;
pub const MAX_FOLDS: u32 = 16;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MirrorPoint {
    pub x: f32,
    pub y: f32,
    pub rotation: f32,
    pub folds: u32,
    // Carried through scenes and share tokens; the transform does not consult it.
    pub is_pre_mirror: bool,
}

impl MirrorPoint {
    pub fn new(x: f32, y: f32) -> Self {
        Self {
            x: x.clamp(-1.0, 1.0),
            y: y.clamp(-1.0, 1.0),
            rotation: 0.0,
            folds: 6,
            is_pre_mirror: true,
        }
    }

    pub fn position(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    pub fn sanitized(self) -> Self {
        let finite = |v: f32, fallback: f32| if v.is_finite() { v } else { fallback };
        Self {
            x: finite(self.x, 0.0).clamp(-1.0, 1.0),
            y: finite(self.y, 0.0).clamp(-1.0, 1.0),
            rotation: finite(self.rotation, 0.0).rem_euclid(360.0),
            folds: self.folds.clamp(MIN_FOLDS, MAX_FOLDS),
            is_pre_mirror: self.is_pre_mirror,
        }
    }
}

// Ordered, fixed-capacity snapshot handed to the renderer each frame.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct MirrorSet {
    points: [Vec2; MAX_MIRROR_POINTS],
    len: usize,
}

impl MirrorSet {
    pub fn from_points(points: &[MirrorPoint]) -> Self {
        let mut set = Self::default();
        for p in points.iter().take(MAX_MIRROR_POINTS) {
            set.points[set.len] = p.position();
            set.len += 1;
        }
        set
    }

    pub fn as_slice(&self) -> &[Vec2] {
        &self.points[..self.len]
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct InteractionConfig {
    pub proximity: f32,
    pub ring_radius: f32,
    pub ring_tolerance: f32,
    pub long_press: Duration,
    pub long_press_slop: f32,
}

impl Default for InteractionConfig {
    fn default() -> Self {
        Self {
            proximity: 20.0,
            ring_radius: 40.0,
            ring_tolerance: 20.0,
            long_press: Duration::from_millis(500),
            long_press_slop: 10.0,
        }
    }
}

impl InteractionConfig {
    // Thresholds for a half-block terminal, where a cell is 1x2 pixels.
    pub fn terminal() -> Self {
        Self {
            proximity: 4.0,
            ring_radius: 10.0,
            ring_tolerance: 3.0,
            long_press: Duration::from_millis(500),
            long_press_slop: 2.5,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Gesture {
    Idle,
    PendingCreate { origin: Vec2, started: Instant },
    Dragging { index: usize },
    Rotating { index: usize },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerOutcome {
    None,
    Selected(usize),
    RotateStarted(usize),
    LongPressArmed,
}

pub struct MirrorPointSystem {
    points: Vec<MirrorPoint>,
    active: Option<usize>,
    hover: Option<usize>,
    gesture: Gesture,
    config: InteractionConfig,
    viewport: Vec2,
}

impl MirrorPointSystem {
    pub fn new(config: InteractionConfig) -> Self {
        Self {
            points: Vec::with_capacity(MAX_MIRROR_POINTS),
            active: None,
            hover: None,
            gesture: Gesture::Idle,
            config,
            viewport: Vec2::ONE,
        }
    }

    pub fn config(&self) -> &InteractionConfig {
        &self.config
    }

    pub fn set_viewport(&mut self, width: f32, height: f32) {
        self.viewport = Vec2::new(width.max(1.0), height.max(1.0));
    }

    pub fn viewport(&self) -> Vec2 {
        self.viewport
    }

    pub fn points(&self) -> &[MirrorPoint] {
        &self.points
    }

    pub fn active(&self) -> Option<usize> {
        self.active
    }

    pub fn active_point(&self) -> Option<&MirrorPoint> {
        self.active.and_then(|i| self.points.get(i))
    }

    pub fn hover(&self) -> Option<usize> {
        self.hover
    }

    pub fn gesture(&self) -> Gesture {
        self.gesture
    }

    pub fn is_full(&self) -> bool {
        self.points.len() >= MAX_MIRROR_POINTS
    }

    pub fn snapshot(&self) -> MirrorSet {
        MirrorSet::from_points(&self.points)
    }

    // Y grows upward in shader space and downward on screen.
    pub fn screen_to_shader(&self, pos: Vec2) -> Vec2 {
        Vec2::new(
            pos.x / self.viewport.x * 2.0 - 1.0,
            -(pos.y / self.viewport.y) * 2.0 + 1.0,
        )
    }

    pub fn shader_to_screen(&self, p: Vec2) -> Vec2 {
        Vec2::new(
            (p.x + 1.0) / 2.0 * self.viewport.x,
            (-p.y + 1.0) / 2.0 * self.viewport.y,
        )
    }

    pub fn nearest(&self, pos: Vec2) -> Option<(usize, f32)> {
        let mut best: Option<(usize, f32)> = None;
        for (i, p) in self.points.iter().enumerate() {
            let d = pos.distance(self.shader_to_screen(p.position()));
            if d < self.config.proximity && best.is_none_or(|(_, bd)| d < bd) {
                best = Some((i, d));
            }
        }
        best
    }

    fn on_active_ring(&self, pos: Vec2) -> Option<usize> {
        let idx = self.active?;
        let p = self.points.get(idx)?;
        let d = pos.distance(self.shader_to_screen(p.position()));
        ((d - self.config.ring_radius).abs() < self.config.ring_tolerance).then_some(idx)
    }

    pub fn insert(&mut self, point: MirrorPoint) -> Option<usize> {
        if self.is_full() {
            return None;
        }
        self.points.push(point.sanitized());
        Some(self.points.len() - 1)
    }

    // Inserts and selects; the keyboard and long-press paths both go through here.
    pub fn add_point(&mut self, point: MirrorPoint) -> Option<usize> {
        let idx = self.insert(point);
        match idx {
            Some(i) => {
                self.active = Some(i);
                log::debug!("mirror point {} created at ({:.3}, {:.3})", i, point.x, point.y);
            }
            None => log::debug!("mirror point limit reached ({MAX_MIRROR_POINTS})"),
        }
        idx
    }

    pub fn nudge_active(&mut self, delta: Vec2) -> Option<Vec2> {
        let idx = self.active?;
        let point = self.points.get_mut(idx)?;
        point.x = (point.x + delta.x).clamp(-1.0, 1.0);
        point.y = (point.y + delta.y).clamp(-1.0, 1.0);
        Some(point.position())
    }

    pub fn adjust_active_folds(&mut self, delta: i32) -> Option<u32> {
        let idx = self.active?;
        let point = self.points.get_mut(idx)?;
        point.folds = (point.folds as i64 + delta.signum() as i64)
            .clamp(MIN_FOLDS as i64, MAX_FOLDS as i64) as u32;
        Some(point.folds)
    }

    pub fn rotate_active(&mut self, degrees: f32) -> Option<f32> {
        let idx = self.active?;
        let point = self.points.get_mut(idx)?;
        point.rotation = (point.rotation + degrees).rem_euclid(360.0);
        Some(point.rotation)
    }

    pub fn replace_all(&mut self, points: &[MirrorPoint]) {
        self.points.clear();
        for p in points.iter().take(MAX_MIRROR_POINTS) {
            self.points.push(p.sanitized());
        }
        self.active = None;
        self.hover = None;
        self.gesture = Gesture::Idle;
    }

    pub fn pointer_down(&mut self, pos: Vec2, now: Instant) -> PointerOutcome {
        if let Some((idx, _)) = self.nearest(pos) {
            self.active = Some(idx);
            self.gesture = Gesture::Dragging { index: idx };
            return PointerOutcome::Selected(idx);
        }
        if let Some(idx) = self.on_active_ring(pos) {
            self.gesture = Gesture::Rotating { index: idx };
            self.rotate_towards(idx, pos);
            return PointerOutcome::RotateStarted(idx);
        }
        self.gesture = Gesture::PendingCreate {
            origin: pos,
            started: now,
        };
        PointerOutcome::LongPressArmed
    }

    pub fn pointer_move(&mut self, pos: Vec2) {
        match self.gesture {
            Gesture::Dragging { index } => {
                let p = self.screen_to_shader(pos);
                if let Some(point) = self.points.get_mut(index) {
                    point.x = p.x.clamp(-1.0, 1.0);
                    point.y = p.y.clamp(-1.0, 1.0);
                }
            }
            Gesture::Rotating { index } => self.rotate_towards(index, pos),
            Gesture::PendingCreate { origin, .. } => {
                if pos.distance(origin) > self.config.long_press_slop {
                    self.gesture = Gesture::Idle;
                }
            }
            Gesture::Idle => {}
        }
        self.hover = self.nearest(pos).map(|(i, _)| i);
    }

    pub fn pointer_up(&mut self) {
        self.gesture = Gesture::Idle;
    }

    // Fires a pending long-press once it has been held long enough.
    pub fn tick(&mut self, now: Instant) -> Option<usize> {
        let Gesture::PendingCreate { origin, started } = self.gesture else {
            return None;
        };
        if now.saturating_duration_since(started) < self.config.long_press {
            return None;
        }
        self.gesture = Gesture::Idle;
        let p = self.screen_to_shader(origin);
        self.add_point(MirrorPoint::new(p.x, p.y))
    }

    // Wheel over the active point or its ring adjusts folds; returns whether it was consumed.
    pub fn wheel(&mut self, pos: Vec2, delta: i32) -> bool {
        let Some(point) = self.active_point() else {
            return false;
        };
        let d = pos.distance(self.shader_to_screen(point.position()));
        if d > self.config.ring_radius + self.config.ring_tolerance {
            return false;
        }
        self.adjust_active_folds(delta).is_some()
    }

    pub fn delete_active(&mut self) -> Option<MirrorPoint> {
        let idx = self.active.take()?;
        if idx >= self.points.len() {
            return None;
        }
        self.gesture = Gesture::Idle;
        self.hover = None;
        let removed = self.points.remove(idx);
        log::debug!("mirror point {} deleted", idx);
        Some(removed)
    }

    pub fn toggle_pre_mirror(&mut self) -> Option<bool> {
        let idx = self.active?;
        let point = self.points.get_mut(idx)?;
        point.is_pre_mirror = !point.is_pre_mirror;
        Some(point.is_pre_mirror)
    }

    pub fn deselect(&mut self) {
        self.active = None;
    }

    fn rotate_towards(&mut self, index: usize, pos: Vec2) {
        let Some(point) = self.points.get(index) else {
            return;
        };
        let c = self.shader_to_screen(point.position());
        let angle = (pos.y - c.y).atan2(pos.x - c.x);
        if let Some(point) = self.points.get_mut(index) {
            point.rotation = (angle.to_degrees() + 360.0) % 360.0;
        }
    }
}
