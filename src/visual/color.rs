use super::noise::fract;
use clap::ValueEnum;
use glam::Vec3;
use std::f32::consts::PI;

pub const LUMA_WEIGHTS: Vec3 = Vec3::new(0.2126, 0.7152, 0.0722);
pub const GAMMA: f32 = 2.2;
pub const CONTRAST_PIVOT: f32 = 0.18;
const BALANCE_TILT: f32 = 0.25;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum Harmony {
    #[default]
    #[value(alias = "rainbow")]
    Spectral,
    Complementary,
    Analogous,
    Triadic,
    #[value(name = "split-complementary")]
    SplitComplementary,
    Tetradic,
    #[value(alias = "mono")]
    Monochromatic,
    #[value(name = "analogous-complement")]
    AnalogousComplement,
    #[value(name = "split-analogous")]
    SplitAnalogous,
    #[value(name = "weighted-complement")]
    WeightedComplement,
    #[value(name = "dynamic-monochromatic")]
    DynamicMonochromatic,
    #[value(name = "compound-tertiary")]
    CompoundTertiary,
    #[value(name = "gradient-spectral")]
    GradientSpectral,
}

impl Harmony {
    pub const fn all() -> [Self; 13] {
        [
            Self::Spectral,
            Self::Complementary,
            Self::Analogous,
            Self::Triadic,
            Self::SplitComplementary,
            Self::Tetradic,
            Self::Monochromatic,
            Self::AnalogousComplement,
            Self::SplitAnalogous,
            Self::WeightedComplement,
            Self::DynamicMonochromatic,
            Self::CompoundTertiary,
            Self::GradientSpectral,
        ]
    }

    // Out-of-range indices resolve to the dual spectral blend.
    pub fn from_index(idx: i32) -> Self {
        usize::try_from(idx)
            .ok()
            .and_then(|i| Self::all().get(i).copied())
            .unwrap_or(Self::Spectral)
    }

    pub fn index(self) -> u8 {
        Self::all().iter().position(|h| *h == self).unwrap_or(0) as u8
    }

    pub fn key(self) -> &'static str {
        match self {
            Self::Spectral => "spectral",
            Self::Complementary => "complementary",
            Self::Analogous => "analogous",
            Self::Triadic => "triadic",
            Self::SplitComplementary => "split_complementary",
            Self::Tetradic => "tetradic",
            Self::Monochromatic => "monochromatic",
            Self::AnalogousComplement => "analogous_complement",
            Self::SplitAnalogous => "split_analogous",
            Self::WeightedComplement => "weighted_complement",
            Self::DynamicMonochromatic => "dynamic_monochromatic",
            Self::CompoundTertiary => "compound_tertiary",
            Self::GradientSpectral => "gradient_spectral",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        let key = key.trim().to_ascii_lowercase().replace('-', "_");
        Self::all().into_iter().find(|h| h.key() == key)
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Spectral => "Spectral",
            Self::Complementary => "Complementary",
            Self::Analogous => "Analogous",
            Self::Triadic => "Triadic",
            Self::SplitComplementary => "Split Complementary",
            Self::Tetradic => "Tetradic",
            Self::Monochromatic => "Monochromatic",
            Self::AnalogousComplement => "Analogous + Complement",
            Self::SplitAnalogous => "Split Analogous",
            Self::WeightedComplement => "Weighted Complement",
            Self::DynamicMonochromatic => "Dynamic Monochromatic",
            Self::CompoundTertiary => "Compound Tertiary",
            Self::GradientSpectral => "Gradient Spectral",
        }
    }

    pub fn next(self) -> Self {
        Self::from_index((self.index() as i32 + 1) % 13)
    }

    pub fn prev(self) -> Self {
        Self::from_index((self.index() as i32 + 12) % 13)
    }

    pub fn recipe(self) -> &'static Recipe {
        &RECIPES[self.index() as usize]
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BlendMode {
    Dual,
    Triple,
    Quad,
}

impl BlendMode {
    pub const fn arity(self) -> usize {
        match self {
            Self::Dual => 2,
            Self::Triple => 3,
            Self::Quad => 4,
        }
    }
}

// Hue is an offset from the palette parameter; saturation and value are absolute.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Anchor {
    pub hue: f32,
    pub sat: f32,
    pub val: f32,
}

const fn anchor(hue: f32, sat: f32, val: f32) -> Anchor {
    Anchor { hue, sat, val }
}

const UNUSED: Anchor = anchor(0.0, 0.0, 0.0);

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Recipe {
    pub blend: BlendMode,
    anchors: [Anchor; 4],
}

impl Recipe {
    pub fn anchors(&self) -> &[Anchor] {
        &self.anchors[..self.blend.arity()]
    }
}

const fn dual(a: Anchor, b: Anchor) -> Recipe {
    Recipe {
        blend: BlendMode::Dual,
        anchors: [a, b, UNUSED, UNUSED],
    }
}

const fn triple(a: Anchor, b: Anchor, c: Anchor) -> Recipe {
    Recipe {
        blend: BlendMode::Triple,
        anchors: [a, b, c, UNUSED],
    }
}

const fn quad(a: Anchor, b: Anchor, c: Anchor, d: Anchor) -> Recipe {
    Recipe {
        blend: BlendMode::Quad,
        anchors: [a, b, c, d],
    }
}

// Indexed by `Harmony::index`.
static RECIPES: [Recipe; 13] = [
    dual(anchor(0.0, 1.0, 1.0), anchor(0.15, 0.95, 0.98)),
    dual(anchor(0.12, 1.0, 1.0), anchor(0.62, 0.9, 0.95)),
    dual(anchor(0.45, 0.9, 1.0), anchor(0.55, 0.85, 0.95)),
    triple(
        anchor(0.0, 1.0, 1.0),
        anchor(0.33, 0.9, 0.95),
        anchor(0.66, 0.95, 0.9),
    ),
    triple(
        anchor(0.5, 1.0, 1.0),
        anchor(0.92, 0.9, 0.95),
        anchor(0.08, 0.95, 0.9),
    ),
    quad(
        anchor(0.0, 1.0, 1.0),
        anchor(0.25, 0.9, 0.95),
        anchor(0.5, 0.95, 0.9),
        anchor(0.75, 0.85, 0.95),
    ),
    triple(
        anchor(0.6, 0.2, 1.0),
        anchor(0.6, 0.4, 0.8),
        anchor(0.6, 0.6, 0.6),
    ),
    triple(
        anchor(0.95, 1.0, 1.0),
        anchor(0.05, 0.9, 0.95),
        anchor(0.45, 0.85, 0.9),
    ),
    quad(
        anchor(0.3, 1.0, 0.95),
        anchor(0.4, 0.9, 0.9),
        anchor(0.2, 0.85, 1.0),
        anchor(0.5, 0.7, 0.85),
    ),
    triple(
        anchor(0.6, 0.9, 1.0),
        anchor(0.1, 0.8, 0.9),
        anchor(0.65, 0.7, 0.95),
    ),
    triple(
        anchor(0.7, 0.9, 1.0),
        anchor(0.75, 0.7, 0.9),
        anchor(0.65, 0.5, 0.8),
    ),
    quad(
        anchor(0.08, 0.9, 1.0),
        anchor(0.95, 0.85, 0.9),
        anchor(0.45, 0.8, 0.85),
        anchor(0.2, 0.75, 0.95),
    ),
    triple(
        anchor(0.0, 0.9, 1.0),
        anchor(0.1, 0.85, 0.9),
        anchor(0.2, 0.8, 0.85),
    ),
];

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PaletteInfo {
    pub colors: [Vec3; 4],
    pub blend: BlendMode,
}

impl PaletteInfo {
    pub fn hsv(&self) -> &[Vec3] {
        &self.colors[..self.blend.arity()]
    }
}

pub fn palette_info(t: f32, harmony: Harmony) -> PaletteInfo {
    let recipe = harmony.recipe();
    let mut colors = [Vec3::ZERO; 4];
    for (slot, a) in colors.iter_mut().zip(recipe.anchors()) {
        *slot = Vec3::new(fract(t + a.hue), a.sat, a.val);
    }
    PaletteInfo {
        colors,
        blend: recipe.blend,
    }
}

pub fn blend_palette(info: &PaletteInfo, t: f32) -> Vec3 {
    let rgb = |i: usize| hsv_to_rgb(info.colors[i]);
    match info.blend {
        BlendMode::Dual => {
            let phase = (t * PI * 2.0).sin() * 0.5 + 0.5;
            rgb(0).lerp(rgb(1), phase)
        }
        BlendMode::Triple | BlendMode::Quad => {
            let n = info.blend.arity();
            let s = fract(t) * n as f32;
            let idx = (s.floor() as usize).min(n - 1);
            rgb(idx).lerp(rgb((idx + 1) % n), s - idx as f32)
        }
    }
}

pub fn hsv_to_rgb(c: Vec3) -> Vec3 {
    let k = Vec3::new(1.0, 2.0 / 3.0, 1.0 / 3.0);
    let h = Vec3::splat(c.x) + k;
    let p = ((h - h.floor()) * 6.0 - Vec3::splat(3.0)).abs();
    let ramp = (p - Vec3::ONE).clamp(Vec3::ZERO, Vec3::ONE);
    c.z * Vec3::ONE.lerp(ramp, c.y)
}

pub fn luminance(c: Vec3) -> f32 {
    c.dot(LUMA_WEIGHTS)
}

pub fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

pub fn aces_filmic(x: Vec3) -> Vec3 {
    const A: f32 = 2.51;
    const B: f32 = 0.03;
    const C: f32 = 2.43;
    const D: f32 = 0.59;
    const E: f32 = 0.14;
    let x = x.max(Vec3::ZERO);
    ((x * (A * x + Vec3::splat(B))) / (x * (C * x + Vec3::splat(D)) + Vec3::splat(E)))
        .clamp(Vec3::ZERO, Vec3::ONE)
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Grading {
    pub exposure: f32,
    pub contrast: f32,
    pub shadows: f32,
    pub midtones: f32,
    pub highlights: f32,
    pub color_balance: f32,
    pub saturation: f32,
}

impl Grading {
    pub const fn neutral() -> Self {
        Self {
            exposure: 0.5,
            contrast: 1.0,
            shadows: 0.0,
            midtones: 0.0,
            highlights: 0.0,
            color_balance: 0.0,
            saturation: 100.0,
        }
    }
}

impl Default for Grading {
    fn default() -> Self {
        Self::neutral()
    }
}

pub fn band_weights(luma: f32) -> (f32, f32, f32) {
    let shadow = smoothstep(0.0, 0.5, 1.0 - luma);
    let mid = (1.0 - (luma - 0.5).abs() * 2.0).max(0.0);
    let high = smoothstep(0.5, 1.0, luma);
    (shadow, mid, high)
}

// Display-referred rgb in, display-referred rgb out.
pub fn grade(rgb: Vec3, g: &Grading) -> Vec3 {
    let mut c = rgb.max(Vec3::ZERO).powf(GAMMA);

    c *= 2f32.powf(g.exposure - 0.5);

    c = CONTRAST_PIVOT * (c / CONTRAST_PIVOT).powf(g.contrast.max(0.0));

    let (ws, wm, wh) = band_weights(luminance(c).clamp(0.0, 1.0));
    let bands = (1.0 + g.shadows * ws) * (1.0 + g.midtones * wm) * (1.0 + g.highlights * wh);
    c *= bands.max(0.0);

    c.x *= (1.0 + g.color_balance * BALANCE_TILT).max(0.0);
    c.z *= (1.0 - g.color_balance * BALANCE_TILT).max(0.0);

    c = aces_filmic(c);
    c = c.powf(1.0 / GAMMA);

    let gray = Vec3::splat(luminance(c));
    gray.lerp(c, g.saturation / 100.0).clamp(Vec3::ZERO, Vec3::ONE)
}

pub fn palette_color(t: f32, harmony: Harmony, hue_shift_deg: f32, grading: &Grading) -> Vec3 {
    let t = fract(fract(t) + hue_shift_deg / 360.0);
    let info = palette_info(t, harmony);
    grade(blend_palette(&info, t), grading)
}
