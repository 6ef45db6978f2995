pub mod color;
pub mod geometry;
pub mod noise;
pub mod overlay;

use crate::camera::CameraState;
use crate::mirror::MirrorSet;
use crate::params::RenderParameters;
use glam::{Vec2, Vec3};

use color::{Grading, Harmony};
use geometry::{Pixelation, RadialFold};
use noise::NoiseType;

// Everything one frame reads, captured once before the pass starts.
#[derive(Clone, Copy, Debug)]
pub struct FrameInputs {
    pub time: f32,
    pub width: usize,
    pub height: usize,
    pub params: RenderParameters,
    pub camera: CameraState,
    pub mirrors: MirrorSet,
}

impl FrameInputs {
    pub fn new(
        time: f32,
        width: usize,
        height: usize,
        params: RenderParameters,
        camera: CameraState,
        mirrors: MirrorSet,
    ) -> Self {
        Self {
            time,
            width,
            height,
            params,
            camera,
            mirrors,
        }
    }
}

// Per-frame constants resolved on the host side before any pixel is shaded.
#[derive(Clone, Copy, Debug)]
pub struct Uniforms {
    pub resolution: Vec2,
    pub zoom_level: f32,
    pub center_point: Vec2,
    pub mirrors: MirrorSet,
    pub fold: RadialFold,
    pub pixelation: Option<Pixelation>,
    pub background: Vec3,
    pub noise: NoiseType,
    pub noise_scale: f32,
    pub octaves: u32,
    pub persistence: f32,
    pub lacunarity: f32,
    pub domain_warp: f32,
    pub pattern_gain: f32,
    pub harmony: Harmony,
    pub hue_shift: f32,
    pub grading: Grading,
    pub pattern_time: f32,
    pub color_time: f32,
}

impl Uniforms {
    pub fn new(inputs: &FrameInputs) -> Self {
        let p = &inputs.params;
        let pixelation = p.pixelation.then(|| {
            Pixelation::new(p.pixel_sides, p.pixel_size, p.pixel_aspect, p.pixel_gap)
        });
        let [r, g, b] = p.background;
        Self {
            resolution: Vec2::new(inputs.width as f32, inputs.height as f32),
            zoom_level: inputs.camera.zoom_level,
            center_point: inputs.camera.center_point(p.center),
            mirrors: inputs.mirrors,
            fold: RadialFold::new(p.mirror_folds, p.mirror_angle),
            pixelation,
            background: Vec3::new(r as f32, g as f32, b as f32) / 255.0,
            noise: p.noise_type,
            noise_scale: p.noise_scale,
            octaves: p.octaves,
            persistence: p.persistence,
            lacunarity: p.lacunarity,
            domain_warp: p.domain_warp,
            pattern_gain: p.noise_type.pattern_gain(p.complexity) * p.size,
            harmony: p.palette,
            hue_shift: p.hue_shift,
            grading: p.grading(),
            pattern_time: inputs.time * p.speed,
            color_time: inputs.time * p.color_speed,
        }
    }

    // Sampling coordinate for a fragment, or None when it lands in a pixelation gap.
    pub fn sample_coord(&self, frag: Vec2) -> Option<Vec2> {
        let uv = geometry::normalize_coord(frag, self.resolution);
        let uv = geometry::apply_camera(uv, self.zoom_level, self.center_point);
        let uv = geometry::apply_mirrors(uv, self.mirrors.as_slice());
        let folded = self.fold.apply(uv);
        match &self.pixelation {
            Some(px) => {
                let center = px.quantize(folded);
                if px.in_gap(folded, center) {
                    None
                } else {
                    Some(center)
                }
            }
            None => Some(folded),
        }
    }

    pub fn pattern(&self, coord: Vec2) -> f32 {
        let t = self.pattern_time;
        // Warp samples at base + t; the drift is added once, after warping.
        let base = coord * self.noise_scale;
        let noise_uv = noise::domain_warp(base, t, self.domain_warp) + Vec2::splat(t);
        noise::fbm(
            noise_uv,
            self.noise,
            self.octaves,
            self.persistence,
            self.lacunarity,
        ) * self.pattern_gain
    }

    pub fn shade(&self, frag: Vec2) -> Vec3 {
        let Some(coord) = self.sample_coord(frag) else {
            return self.background;
        };
        let pattern = self.pattern(coord);
        let c = color::palette_color(
            pattern * 0.5 + self.color_time,
            self.harmony,
            self.hue_shift,
            &self.grading,
        );
        if c.is_finite() { c } else { self.background }
    }
}

pub struct FrameDriver {
    front: Vec<u8>,
    w: usize,
    h: usize,
    frames: u64,
}

impl Default for FrameDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameDriver {
    pub fn new() -> Self {
        Self {
            front: Vec::new(),
            w: 0,
            h: 0,
            frames: 0,
        }
    }

    pub fn resize(&mut self, w: usize, h: usize) {
        self.w = w;
        self.h = h;
        let n = w.saturating_mul(h).saturating_mul(4);
        self.front.resize(n, 0);
        self.front.fill(0);
    }

    pub fn size(&self) -> (usize, usize) {
        (self.w, self.h)
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn frame(&self) -> &[u8] {
        &self.front
    }

    pub fn frame_mut(&mut self) -> &mut [u8] {
        &mut self.front
    }

    // One full pass: every pixel runs transform, noise and colour. Row 0 is the top of the
    // image while fragment y grows upward.
    pub fn render(&mut self, inputs: &FrameInputs) -> &[u8] {
        if inputs.width != self.w || inputs.height != self.h {
            self.resize(inputs.width, inputs.height);
        }
        if self.w == 0 || self.h == 0 {
            return &self.front;
        }

        let uniforms = Uniforms::new(inputs);
        let w = self.w;
        let h = self.h;
        for (y, row) in self.front.chunks_exact_mut(w * 4).enumerate() {
            let fy = (h - 1 - y) as f32 + 0.5;
            for (x, px) in row.chunks_exact_mut(4).enumerate() {
                let c = uniforms.shade(Vec2::new(x as f32 + 0.5, fy));
                px[0] = to_u8(c.x);
                px[1] = to_u8(c.y);
                px[2] = to_u8(c.z);
                px[3] = 255;
            }
        }
        self.frames = self.frames.wrapping_add(1);
        &self.front
    }
}

#[inline]
fn to_u8(v: f32) -> u8 {
    (v.clamp(0.0, 1.0) * 255.0 + 0.5) as u8
}
