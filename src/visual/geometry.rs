use glam::Vec2;
use std::f32::consts::PI;

const SQRT3_HALF: f32 = 0.866;
const DEGENERATE_EPS: f32 = 1e-12;

pub fn normalize_coord(frag: Vec2, resolution: Vec2) -> Vec2 {
    let short = resolution.x.min(resolution.y).max(1.0);
    (frag * 2.0 - resolution) / short
}

pub fn apply_camera(uv: Vec2, zoom_level: f32, center_point: Vec2) -> Vec2 {
    uv * zoom_level - center_point
}

#[inline]
pub fn glsl_mod(x: f32, y: f32) -> f32 {
    x - y * (x / y).floor()
}

// Unit normal of the mirror line through `point`; None for a point at the origin.
pub fn mirror_normal(point: Vec2) -> Option<Vec2> {
    let n = Vec2::new(point.y, -point.x);
    let len_sq = n.length_squared();
    if len_sq <= DEGENERATE_EPS || !len_sq.is_finite() {
        return None;
    }
    Some(n / len_sq.sqrt())
}

pub fn reflect_across(uv: Vec2, point: Vec2) -> Vec2 {
    let Some(normal) = mirror_normal(point) else {
        return uv;
    };
    let signed_dist = (uv - point).dot(normal);
    if signed_dist < 0.0 {
        uv - 2.0 * signed_dist * normal
    } else {
        uv
    }
}

// Order-sensitive: reflections run in insertion order.
pub fn apply_mirrors(uv: Vec2, points: &[Vec2]) -> Vec2 {
    points.iter().fold(uv, |acc, p| reflect_across(acc, *p))
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RadialFold {
    half_wedge: f32,
    cos: f32,
    sin: f32,
}

impl RadialFold {
    pub fn new(folds: f32, angle_deg: f32) -> Self {
        let angle = angle_deg * PI / 180.0;
        Self {
            half_wedge: PI / folds.max(1.0),
            cos: angle.cos(),
            sin: angle.sin(),
        }
    }

    pub fn half_wedge(&self) -> f32 {
        self.half_wedge
    }

    // Column-major mat2(cos, -sin, sin, cos) * v.
    pub fn rotate(&self, v: Vec2) -> Vec2 {
        Vec2::new(
            self.cos * v.x + self.sin * v.y,
            -self.sin * v.x + self.cos * v.y,
        )
    }

    pub fn fold_angle(&self, a: f32) -> f32 {
        let period = self.half_wedge * 2.0;
        let a = glsl_mod(a, period);
        if a > self.half_wedge { period - a } else { a }
    }

    pub fn apply(&self, uv: Vec2) -> Vec2 {
        let r = self.rotate(uv);
        let a = self.fold_angle(r.y.atan2(r.x));
        Vec2::new(a.cos(), a.sin()) * r.length()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PixelShape {
    Triangle,
    Square,
    Hexagon,
}

impl PixelShape {
    pub fn from_sides(sides: u32) -> Option<Self> {
        match sides {
            3 => Some(Self::Triangle),
            4 => Some(Self::Square),
            6 => Some(Self::Hexagon),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Pixelation {
    pub shape: Option<PixelShape>,
    pub cell: Vec2,
    pub gap: f32,
}

impl Pixelation {
    pub fn new(sides: u32, size: f32, aspect: f32, gap: f32) -> Self {
        Self {
            shape: PixelShape::from_sides(sides),
            cell: Vec2::new(size * aspect, size).max(Vec2::splat(1e-4)),
            gap: gap.clamp(0.0, 1.0),
        }
    }

    pub fn quantize(&self, uv: Vec2) -> Vec2 {
        match self.shape {
            Some(PixelShape::Square) => square_center(uv, self.cell),
            Some(PixelShape::Triangle) => triangle_center(uv, self.cell),
            Some(PixelShape::Hexagon) => hexagon_center(uv, self.cell),
            None => uv,
        }
    }

    // True when `uv` falls in the gutter around the cell centred at `center`.
    pub fn in_gap(&self, uv: Vec2, center: Vec2) -> bool {
        if self.gap <= 0.0 {
            return false;
        }
        let limit = 0.5 * (1.0 - self.gap);
        let d = uv - center;
        match self.shape {
            Some(PixelShape::Square) => {
                let n = (d / self.cell).abs();
                n.x.max(n.y) > limit
            }
            Some(PixelShape::Triangle) | Some(PixelShape::Hexagon) => {
                d.length() / self.cell.x > limit
            }
            None => false,
        }
    }
}

pub fn square_center(uv: Vec2, cell: Vec2) -> Vec2 {
    (uv / cell).floor() * cell + cell * 0.5
}

pub fn triangle_center(uv: Vec2, cell: Vec2) -> Vec2 {
    let tri_h = cell.y * SQRT3_HALF;
    let tri_w = cell.x;

    let row = (uv.y / tri_h).floor();
    let offset = glsl_mod(row, 2.0) * 0.5;
    let col = (uv.x / tri_w - offset).floor();
    let center = Vec2::new((col + offset + 0.5) * tri_w, (row + 0.5) * tri_h);

    let p = uv - center;
    let sextant = ((p.y.atan2(p.x) + PI) / (PI / 3.0)).floor();
    let angle = (sextant + 0.5) * (PI / 3.0);
    center + Vec2::new(angle.cos(), angle.sin()) * tri_w * 0.5
}

pub fn hexagon_center(uv: Vec2, cell: Vec2) -> Vec2 {
    let hex_w = cell.x * 1.5;
    let hex_h = cell.y * SQRT3_HALF * 2.0;
    let repeat = Vec2::new(hex_w * 2.0, hex_h);
    let offset = glsl_mod((uv.y / hex_h).floor(), 2.0) * hex_w;

    let coord = Vec2::new(uv.x - offset, uv.y);
    let mut center = Vec2::new(
        (coord.x / repeat.x).floor() * repeat.x + hex_w,
        (coord.y / repeat.y).floor() * repeat.y + hex_h * 0.5,
    );
    if offset != 0.0 {
        center.x += hex_w;
    }

    let d = uv - center;
    let angle = ((d.y.atan2(d.x) + PI) / (PI / 3.0)).floor() * (PI / 3.0);
    center + Vec2::new(angle.cos(), angle.sin()) * hex_w * 0.5
}
