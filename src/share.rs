use crate::camera::CameraState;
use crate::mirror::{MAX_MIRROR_POINTS, MirrorPoint};
use crate::params::{ParamId, RenderParameters};
use crate::scene::Scene;
use crate::visual::color::Harmony;
use crate::visual::noise::NoiseType;
use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use glam::Vec2;
use std::fmt;

pub const TOKEN_VERSION: u8 = 1;
const POS_SCALE: f32 = 1000.0;
const ROT_SCALE: f32 = 100.0;
const FLAG_PIXELATION: u8 = 0b0000_0001;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShareError {
    Base64(String),
    UnsupportedVersion(u8),
    Truncated { needed: usize, available: usize },
    TooManyMirrors(usize),
}

impl fmt::Display for ShareError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Base64(msg) => write!(f, "invalid share token encoding: {msg}"),
            Self::UnsupportedVersion(v) => write!(f, "unsupported share token version {v}"),
            Self::Truncated { needed, available } => write!(
                f,
                "share token truncated: needed {needed} bytes, {available} available"
            ),
            Self::TooManyMirrors(n) => write!(
                f,
                "share token lists {n} mirror points (max {MAX_MIRROR_POINTS})"
            ),
        }
    }
}

impl std::error::Error for ShareError {}

// Coarse fields (degrees, percentages, counts) keep two decimals; the rest keep three.
pub fn multiplier(id: ParamId) -> f32 {
    match id {
        ParamId::Complexity
        | ParamId::MirrorFolds
        | ParamId::MirrorAngle
        | ParamId::Saturation
        | ParamId::HueShift
        | ParamId::Octaves
        | ParamId::PixelSides => 100.0,
        _ => 1000.0,
    }
}

fn fixed(v: f32, scale: f32) -> i32 {
    let scaled = (v * scale).round();
    if scaled.is_finite() {
        scaled.clamp(i32::MIN as f32, i32::MAX as f32) as i32
    } else {
        0
    }
}

pub fn encode(scene: &Scene) -> String {
    let p = &scene.params;
    let mut buf: Vec<u8> = Vec::with_capacity(128);
    buf.push(TOKEN_VERSION);
    for id in ParamId::all() {
        buf.extend_from_slice(&fixed(p.get(id), multiplier(id)).to_le_bytes());
    }
    buf.push(p.palette.index());
    buf.push(p.noise_type.index());
    buf.push(if p.pixelation { FLAG_PIXELATION } else { 0 });
    buf.extend_from_slice(&p.background);

    let cam = &scene.camera;
    buf.extend_from_slice(&fixed(cam.center_offset.x, POS_SCALE).to_le_bytes());
    buf.extend_from_slice(&fixed(cam.center_offset.y, POS_SCALE).to_le_bytes());
    buf.extend_from_slice(&fixed(cam.zoom_level, POS_SCALE).to_le_bytes());

    let mirrors = &scene.mirrors[..scene.mirrors.len().min(MAX_MIRROR_POINTS)];
    buf.push(mirrors.len() as u8);
    for m in mirrors {
        buf.extend_from_slice(&fixed(m.x, POS_SCALE).to_le_bytes());
        buf.extend_from_slice(&fixed(m.y, POS_SCALE).to_le_bytes());
        buf.extend_from_slice(&fixed(m.rotation, ROT_SCALE).to_le_bytes());
        buf.push(m.folds.min(u8::MAX as u32) as u8);
        buf.push(m.is_pre_mirror as u8);
    }
    URL_SAFE_NO_PAD.encode(buf)
}

struct Reader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn take(&mut self, n: usize) -> Result<&'a [u8], ShareError> {
        let end = self.pos + n;
        if end > self.bytes.len() {
            return Err(ShareError::Truncated {
                needed: end,
                available: self.bytes.len(),
            });
        }
        let out = &self.bytes[self.pos..end];
        self.pos = end;
        Ok(out)
    }

    fn u8(&mut self) -> Result<u8, ShareError> {
        Ok(self.take(1)?[0])
    }

    fn i32(&mut self) -> Result<i32, ShareError> {
        let b = self.take(4)?;
        Ok(i32::from_le_bytes([b[0], b[1], b[2], b[3]]))
    }

    fn fixed(&mut self, scale: f32) -> Result<f32, ShareError> {
        Ok(self.i32()? as f32 / scale)
    }
}

pub fn decode(token: &str) -> Result<Scene, ShareError> {
    let bytes = URL_SAFE_NO_PAD
        .decode(token.trim())
        .map_err(|e| ShareError::Base64(e.to_string()))?;
    let mut r = Reader {
        bytes: &bytes,
        pos: 0,
    };

    let version = r.u8()?;
    if version != TOKEN_VERSION {
        return Err(ShareError::UnsupportedVersion(version));
    }

    let mut params = RenderParameters::default();
    for id in ParamId::all() {
        let v = r.fixed(multiplier(id))?;
        params.set(id, v);
    }
    params.palette = Harmony::from_index(r.u8()? as i32);
    params.noise_type = NoiseType::from_index(r.u8()? as i32);
    params.pixelation = r.u8()? & FLAG_PIXELATION != 0;
    let rgb = r.take(3)?;
    params.background = [rgb[0], rgb[1], rgb[2]];

    let offset = Vec2::new(r.fixed(POS_SCALE)?, r.fixed(POS_SCALE)?);
    let camera = CameraState::new(offset, r.fixed(POS_SCALE)?);

    let count = r.u8()? as usize;
    if count > MAX_MIRROR_POINTS {
        return Err(ShareError::TooManyMirrors(count));
    }
    let mut mirrors = Vec::with_capacity(count);
    for _ in 0..count {
        let x = r.fixed(POS_SCALE)?;
        let y = r.fixed(POS_SCALE)?;
        let rotation = r.fixed(ROT_SCALE)?;
        let folds = r.u8()? as u32;
        let is_pre_mirror = r.u8()? != 0;
        let point = MirrorPoint {
            x,
            y,
            rotation,
            folds,
            is_pre_mirror,
        };
        mirrors.push(point.sanitized());
    }

    Ok(Scene {
        params: params.sanitized(),
        camera,
        mirrors,
    })
}
