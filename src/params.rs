use crate::visual::color::{Grading, Harmony};
use crate::visual::noise::{MAX_OCTAVES, NoiseType};
use glam::Vec2;

pub const PIXEL_SIDES: [u32; 3] = [3, 4, 6];

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RenderParameters {
    pub complexity: f32,
    pub speed: f32,
    pub color_speed: f32,
    pub size: f32,
    pub mirror_folds: f32,
    pub mirror_angle: f32,
    pub center: Vec2,
    pub palette: Harmony,
    pub saturation: f32,
    pub exposure: f32,
    pub hue_shift: f32,
    pub contrast: f32,
    pub shadows: f32,
    pub midtones: f32,
    pub highlights: f32,
    pub color_balance: f32,
    pub noise_type: NoiseType,
    pub noise_scale: f32,
    pub octaves: u32,
    pub persistence: f32,
    pub lacunarity: f32,
    pub domain_warp: f32,
    pub pixelation: bool,
    pub pixel_sides: u32,
    pub pixel_size: f32,
    pub pixel_aspect: f32,
    pub pixel_gap: f32,
    pub background: [u8; 3],
}

impl Default for RenderParameters {
    fn default() -> Self {
        let mut p = Self {
            complexity: 0.0,
            speed: 0.0,
            color_speed: 0.0,
            size: 0.0,
            mirror_folds: 0.0,
            mirror_angle: 0.0,
            center: Vec2::ZERO,
            palette: Harmony::Spectral,
            saturation: 0.0,
            exposure: 0.0,
            hue_shift: 0.0,
            contrast: 0.0,
            shadows: 0.0,
            midtones: 0.0,
            highlights: 0.0,
            color_balance: 0.0,
            noise_type: NoiseType::Sine,
            noise_scale: 0.0,
            octaves: 0,
            persistence: 0.0,
            lacunarity: 0.0,
            domain_warp: 0.0,
            pixelation: false,
            pixel_sides: 4,
            pixel_size: 0.0,
            pixel_aspect: 0.0,
            pixel_gap: 0.0,
            background: [0, 0, 0],
        };
        for id in ParamId::all() {
            p.set(id, id.default_value());
        }
        p
    }
}

impl RenderParameters {
    pub fn get(&self, id: ParamId) -> f32 {
        match id {
            ParamId::Complexity => self.complexity,
            ParamId::Speed => self.speed,
            ParamId::ColorSpeed => self.color_speed,
            ParamId::Size => self.size,
            ParamId::MirrorFolds => self.mirror_folds,
            ParamId::MirrorAngle => self.mirror_angle,
            ParamId::CenterX => self.center.x,
            ParamId::CenterY => self.center.y,
            ParamId::Saturation => self.saturation,
            ParamId::Exposure => self.exposure,
            ParamId::HueShift => self.hue_shift,
            ParamId::Contrast => self.contrast,
            ParamId::Shadows => self.shadows,
            ParamId::Midtones => self.midtones,
            ParamId::Highlights => self.highlights,
            ParamId::ColorBalance => self.color_balance,
            ParamId::NoiseScale => self.noise_scale,
            ParamId::Octaves => self.octaves as f32,
            ParamId::Persistence => self.persistence,
            ParamId::Lacunarity => self.lacunarity,
            ParamId::DomainWarp => self.domain_warp,
            ParamId::PixelSides => self.pixel_sides as f32,
            ParamId::PixelSize => self.pixel_size,
            ParamId::PixelAspect => self.pixel_aspect,
            ParamId::PixelGap => self.pixel_gap,
        }
    }

    pub fn set(&mut self, id: ParamId, value: f32) {
        let value = id.clamp(value);
        match id {
            ParamId::Complexity => self.complexity = value,
            ParamId::Speed => self.speed = value,
            ParamId::ColorSpeed => self.color_speed = value,
            ParamId::Size => self.size = value,
            ParamId::MirrorFolds => self.mirror_folds = value,
            ParamId::MirrorAngle => self.mirror_angle = value,
            ParamId::CenterX => self.center.x = value,
            ParamId::CenterY => self.center.y = value,
            ParamId::Saturation => self.saturation = value,
            ParamId::Exposure => self.exposure = value,
            ParamId::HueShift => self.hue_shift = value,
            ParamId::Contrast => self.contrast = value,
            ParamId::Shadows => self.shadows = value,
            ParamId::Midtones => self.midtones = value,
            ParamId::Highlights => self.highlights = value,
            ParamId::ColorBalance => self.color_balance = value,
            ParamId::NoiseScale => self.noise_scale = value,
            ParamId::Octaves => self.octaves = value as u32,
            ParamId::Persistence => self.persistence = value,
            ParamId::Lacunarity => self.lacunarity = value,
            ParamId::DomainWarp => self.domain_warp = value,
            ParamId::PixelSides => self.pixel_sides = value as u32,
            ParamId::PixelSize => self.pixel_size = value,
            ParamId::PixelAspect => self.pixel_aspect = value,
            ParamId::PixelGap => self.pixel_gap = value,
        }
    }

    pub fn nudge(&mut self, id: ParamId, steps: i32) {
        if id == ParamId::PixelSides {
            let cur = PIXEL_SIDES
                .iter()
                .position(|s| *s == self.pixel_sides)
                .unwrap_or(1) as i32;
            let n = PIXEL_SIDES.len() as i32;
            self.pixel_sides = PIXEL_SIDES[(cur + steps).rem_euclid(n) as usize];
            return;
        }
        let next = self.get(id) + id.step() * steps as f32;
        self.set(id, next);
    }

    // Re-applies every range clamp; used after bulk decoding.
    pub fn sanitized(mut self) -> Self {
        for id in ParamId::all() {
            let v = self.get(id);
            let v = if v.is_finite() { v } else { id.default_value() };
            self.set(id, v);
        }
        self
    }

    pub fn grading(&self) -> Grading {
        Grading {
            exposure: self.exposure,
            contrast: self.contrast,
            shadows: self.shadows,
            midtones: self.midtones,
            highlights: self.highlights,
            color_balance: self.color_balance,
            saturation: self.saturation,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ParamId {
    Complexity,
    Speed,
    ColorSpeed,
    Size,
    MirrorFolds,
    MirrorAngle,
    CenterX,
    CenterY,
    Saturation,
    Exposure,
    HueShift,
    Contrast,
    Shadows,
    Midtones,
    Highlights,
    ColorBalance,
    NoiseScale,
    Octaves,
    Persistence,
    Lacunarity,
    DomainWarp,
    PixelSides,
    PixelSize,
    PixelAspect,
    PixelGap,
}

impl ParamId {
    pub const fn all() -> [Self; 25] {
        [
            Self::Complexity,
            Self::Speed,
            Self::ColorSpeed,
            Self::Size,
            Self::MirrorFolds,
            Self::MirrorAngle,
            Self::CenterX,
            Self::CenterY,
            Self::Saturation,
            Self::Exposure,
            Self::HueShift,
            Self::Contrast,
            Self::Shadows,
            Self::Midtones,
            Self::Highlights,
            Self::ColorBalance,
            Self::NoiseScale,
            Self::Octaves,
            Self::Persistence,
            Self::Lacunarity,
            Self::DomainWarp,
            Self::PixelSides,
            Self::PixelSize,
            Self::PixelAspect,
            Self::PixelGap,
        ]
    }

    pub fn key(self) -> &'static str {
        match self {
            Self::Complexity => "complexity",
            Self::Speed => "speed",
            Self::ColorSpeed => "color_speed",
            Self::Size => "size",
            Self::MirrorFolds => "mirror_folds",
            Self::MirrorAngle => "mirror_angle",
            Self::CenterX => "center_x",
            Self::CenterY => "center_y",
            Self::Saturation => "saturation",
            Self::Exposure => "exposure",
            Self::HueShift => "hue_shift",
            Self::Contrast => "contrast",
            Self::Shadows => "shadows",
            Self::Midtones => "midtones",
            Self::Highlights => "highlights",
            Self::ColorBalance => "color_balance",
            Self::NoiseScale => "noise_scale",
            Self::Octaves => "octaves",
            Self::Persistence => "persistence",
            Self::Lacunarity => "lacunarity",
            Self::DomainWarp => "domain_warp",
            Self::PixelSides => "pixel_sides",
            Self::PixelSize => "pixel_size",
            Self::PixelAspect => "pixel_aspect",
            Self::PixelGap => "pixel_gap",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        let key = key.trim();
        Self::all().into_iter().find(|id| id.key() == key)
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Complexity => "Complexity",
            Self::Speed => "Speed",
            Self::ColorSpeed => "Color Speed",
            Self::Size => "Size",
            Self::MirrorFolds => "Mirror Folds",
            Self::MirrorAngle => "Mirror Angle",
            Self::CenterX => "Center X",
            Self::CenterY => "Center Y",
            Self::Saturation => "Saturation",
            Self::Exposure => "Exposure",
            Self::HueShift => "Hue Shift",
            Self::Contrast => "Contrast",
            Self::Shadows => "Shadows",
            Self::Midtones => "Midtones",
            Self::Highlights => "Highlights",
            Self::ColorBalance => "Color Balance",
            Self::NoiseScale => "Noise Scale",
            Self::Octaves => "Octaves",
            Self::Persistence => "Persistence",
            Self::Lacunarity => "Lacunarity",
            Self::DomainWarp => "Domain Warp",
            Self::PixelSides => "Pixel Sides",
            Self::PixelSize => "Pixel Size",
            Self::PixelAspect => "Pixel Aspect",
            Self::PixelGap => "Pixel Gap",
        }
    }

    pub fn range(self) -> (f32, f32) {
        match self {
            Self::Complexity => (1.0, 50.0),
            Self::Speed => (0.0, 5.0),
            Self::ColorSpeed => (0.0, 2.0),
            Self::Size => (0.1, 5.0),
            Self::MirrorFolds => (1.0, 24.0),
            Self::MirrorAngle => (0.0, 360.0),
            Self::CenterX | Self::CenterY => (-2.0, 2.0),
            Self::Saturation => (0.0, 200.0),
            Self::Exposure => (-3.0, 4.0),
            Self::HueShift => (0.0, 360.0),
            Self::Contrast => (0.2, 3.0),
            Self::Shadows | Self::Midtones | Self::Highlights | Self::ColorBalance => (-1.0, 1.0),
            Self::NoiseScale => (0.1, 10.0),
            Self::Octaves => (1.0, MAX_OCTAVES as f32),
            Self::Persistence => (0.0, 1.0),
            Self::Lacunarity => (1.0, 4.0),
            Self::DomainWarp => (0.0, 2.0),
            Self::PixelSides => (3.0, 6.0),
            Self::PixelSize => (0.005, 0.5),
            Self::PixelAspect => (0.25, 4.0),
            Self::PixelGap => (0.0, 0.9),
        }
    }

    pub fn step(self) -> f32 {
        match self {
            Self::Complexity | Self::MirrorFolds | Self::Octaves | Self::PixelSides => 1.0,
            Self::MirrorAngle | Self::HueShift => 5.0,
            Self::Saturation => 5.0,
            Self::Exposure | Self::Contrast | Self::Size | Self::NoiseScale => 0.1,
            Self::Lacunarity | Self::DomainWarp | Self::PixelAspect => 0.1,
            Self::PixelSize => 0.005,
            _ => 0.05,
        }
    }

    pub fn default_value(self) -> f32 {
        match self {
            Self::Complexity => 10.0,
            Self::Speed => 0.5,
            Self::ColorSpeed => 0.1,
            Self::Size => 1.0,
            Self::MirrorFolds => 6.0,
            Self::Saturation => 100.0,
            Self::Exposure => 0.5,
            Self::Contrast => 1.0,
            Self::NoiseScale => 1.0,
            Self::Octaves => 4.0,
            Self::Persistence => 0.5,
            Self::Lacunarity => 2.0,
            Self::PixelSides => 4.0,
            Self::PixelSize => 0.05,
            Self::PixelAspect => 1.0,
            _ => 0.0,
        }
    }

    pub fn clamp(self, value: f32) -> f32 {
        let (lo, hi) = self.range();
        match self {
            // Hue wraps instead of saturating.
            Self::HueShift => value.rem_euclid(360.0),
            Self::Octaves => value.round().clamp(lo, hi),
            Self::PixelSides => snap_pixel_sides(value) as f32,
            _ => value.clamp(lo, hi),
        }
    }

    pub fn next(self) -> Self {
        let all = Self::all();
        let idx = all.iter().position(|id| *id == self).unwrap_or(0);
        all[(idx + 1) % all.len()]
    }

    pub fn prev(self) -> Self {
        let all = Self::all();
        let idx = all.iter().position(|id| *id == self).unwrap_or(0);
        all[(idx + all.len() - 1) % all.len()]
    }
}

fn snap_pixel_sides(value: f32) -> u32 {
    let mut best = 4u32;
    let mut best_d = f32::INFINITY;
    for s in PIXEL_SIDES {
        let d = (s as f32 - value).abs();
        if d < best_d {
            best = s;
            best_d = d;
        }
    }
    best
}
