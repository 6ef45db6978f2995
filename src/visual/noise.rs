use clap::ValueEnum;
use glam::{Vec2, Vec3};

pub const MAX_OCTAVES: u32 = 8;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum NoiseType {
    #[default]
    #[value(alias = "sin")]
    Sine,
    #[value(alias = "value")]
    Perlin,
    Simplex,
    #[value(alias = "cells", alias = "worley")]
    Voronoi,
}

impl NoiseType {
    pub const fn all() -> [Self; 4] {
        [Self::Sine, Self::Perlin, Self::Simplex, Self::Voronoi]
    }

    // Unknown indices fall back to the sine product.
    pub fn from_index(idx: i32) -> Self {
        match idx {
            1 => Self::Perlin,
            2 => Self::Simplex,
            3 => Self::Voronoi,
            _ => Self::Sine,
        }
    }

    pub fn index(self) -> u8 {
        match self {
            Self::Sine => 0,
            Self::Perlin => 1,
            Self::Simplex => 2,
            Self::Voronoi => 3,
        }
    }

    pub fn key(self) -> &'static str {
        match self {
            Self::Sine => "sine",
            Self::Perlin => "perlin",
            Self::Simplex => "simplex",
            Self::Voronoi => "voronoi",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        let key = key.trim().to_ascii_lowercase();
        Self::all().into_iter().find(|n| n.key() == key)
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Sine => "Sine",
            Self::Perlin => "Perlin",
            Self::Simplex => "Simplex",
            Self::Voronoi => "Voronoi",
        }
    }

    pub fn next(self) -> Self {
        Self::from_index((self.index() as i32 + 1) % 4)
    }

    // Gain applied to the normalized fBm output before the size multiplier.
    pub fn pattern_gain(self, complexity: f32) -> f32 {
        match self {
            Self::Sine => complexity / 20.0,
            Self::Perlin | Self::Simplex => complexity / 8.0,
            Self::Voronoi => complexity,
        }
    }
}

#[inline]
pub fn fract(x: f32) -> f32 {
    x - x.floor()
}

#[inline]
fn fract2(p: Vec2) -> Vec2 {
    p - p.floor()
}

pub fn hash2(p: Vec2) -> Vec2 {
    let q = Vec2::new(
        p.dot(Vec2::new(127.1, 311.7)),
        p.dot(Vec2::new(269.5, 183.3)),
    );
    let s = Vec2::new(q.x.sin(), q.y.sin()) * 43_758.547;
    Vec2::splat(-1.0) + 2.0 * fract2(s)
}

pub fn hash(p: Vec2) -> f32 {
    let mut q = fract2(p * Vec2::new(123.45, 678.90));
    q += Vec2::splat(q.dot(q + Vec2::splat(45.32)));
    fract(q.x * q.y)
}

pub fn perlin_noise(p: Vec2) -> f32 {
    let i = p.floor();
    let f = fract2(p);
    let u = f * f * (Vec2::splat(3.0) - 2.0 * f);

    let a = hash(i);
    let b = hash(i + Vec2::new(1.0, 0.0));
    let c = hash(i + Vec2::new(0.0, 1.0));
    let d = hash(i + Vec2::new(1.0, 1.0));

    let top = a + (b - a) * u.x;
    let bottom = c + (d - c) * u.x;
    top + (bottom - top) * u.y
}

pub fn simplex_noise(p: Vec2) -> f32 {
    const K1: f32 = 0.366_025_4;
    const K2: f32 = 0.211_324_87;

    let i = (p + Vec2::splat((p.x + p.y) * K1)).floor();
    let a = p - i + Vec2::splat((i.x + i.y) * K2);
    // step(a.yx, a.xy); both corners light up on the diagonal.
    let o = Vec2::new(
        if a.x >= a.y { 1.0 } else { 0.0 },
        if a.y >= a.x { 1.0 } else { 0.0 },
    );
    let b = a - o + Vec2::splat(K2);
    let c = a - Vec2::splat(1.0 - 2.0 * K2);

    let h = (Vec3::splat(0.5) - Vec3::new(a.dot(a), b.dot(b), c.dot(c))).max(Vec3::ZERO);
    let h4 = h * h * h * h;
    let n = h4
        * Vec3::new(
            a.dot(hash2(i)),
            b.dot(hash2(i + o)),
            c.dot(hash2(i + Vec2::ONE)),
        );
    n.dot(Vec3::splat(70.0))
}

pub fn voronoi_noise(p: Vec2) -> f32 {
    let i = p.floor();
    let f = fract2(p);

    let mut min_dist = 1.0f32;
    for y in -1..=1 {
        for x in -1..=1 {
            let neighbor = Vec2::new(x as f32, y as f32);
            let point = hash2(i + neighbor);
            let dist = (neighbor + point - f).length();
            min_dist = min_dist.min(dist);
        }
    }
    min_dist
}

pub fn get_noise(p: Vec2, noise: NoiseType) -> f32 {
    match noise {
        NoiseType::Sine => (p.x + p.y.cos()).sin() * (p.y + p.x.sin()).cos(),
        NoiseType::Perlin => perlin_noise(p),
        NoiseType::Simplex => simplex_noise(p),
        NoiseType::Voronoi => voronoi_noise(p),
    }
}

pub fn fbm(p: Vec2, noise: NoiseType, octaves: u32, persistence: f32, lacunarity: f32) -> f32 {
    let octaves = octaves.clamp(1, MAX_OCTAVES);
    let mut value = 0.0f32;
    let mut amplitude = 0.5f32;
    let mut frequency = 1.0f32;
    let mut max_value = 0.0f32;

    for _ in 0..octaves {
        value += amplitude * get_noise(p * frequency, noise);
        max_value += amplitude;
        frequency *= lacunarity;
        amplitude *= persistence;
    }

    value / max_value
}

// Two perlin lookups at `p + t`, the second offset by a fixed phase.
pub fn domain_warp(p: Vec2, t: f32, amount: f32) -> Vec2 {
    if amount <= 0.0 {
        return p;
    }
    let drift = p + Vec2::splat(t);
    let warp = Vec2::new(
        perlin_noise(drift),
        perlin_noise(drift + Vec2::new(43.84, 38.32)),
    );
    p + warp * amount
}
