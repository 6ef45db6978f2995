use crate::camera::CameraState;
use crate::config::app_config_dir;
use crate::mirror::{MAX_MIRROR_POINTS, MirrorPoint};
use crate::params::{ParamId, RenderParameters};
use crate::visual::color::Harmony;
use crate::visual::noise::NoiseType;
use std::fmt;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Scene {
    pub params: RenderParameters,
    pub camera: CameraState,
    pub mirrors: Vec<MirrorPoint>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SceneError {
    Io(String),
    Parse { line: usize, message: String },
    TooManyMirrors { line: usize },
}

impl fmt::Display for SceneError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(msg) => write!(f, "I/O error: {msg}"),
            Self::Parse { line, message } => write!(f, "parse error at line {line}: {message}"),
            Self::TooManyMirrors { line } => write!(
                f,
                "line {line}: at most {MAX_MIRROR_POINTS} mirror points are supported"
            ),
        }
    }
}

impl std::error::Error for SceneError {}

impl Scene {
    pub fn load(path: &Path) -> Result<Self, SceneError> {
        let text = std::fs::read_to_string(path).map_err(|e| SceneError::Io(e.to_string()))?;
        Self::parse(&text)
    }

    pub fn parse(text: &str) -> Result<Self, SceneError> {
        let mut scene = Self::default();
        for (line_idx, raw) in text.lines().enumerate() {
            let line_no = line_idx + 1;
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let Some((key_raw, value_raw)) = line.split_once('=') else {
                return Err(parse_err(line_no, "expected <key>=<value>"));
            };
            scene.apply(line_no, key_raw.trim(), value_raw.trim())?;
        }
        Ok(scene)
    }

    fn apply(&mut self, line: usize, key: &str, value: &str) -> Result<(), SceneError> {
        if let Some(id) = ParamId::from_key(key) {
            let v = parse_f32(value).ok_or_else(|| {
                parse_err(line, &format!("{key} must be a number"))
            })?;
            self.params.set(id, v);
            return Ok(());
        }
        match key {
            "palette" => {
                self.params.palette = parse_harmony(value)
                    .ok_or_else(|| parse_err(line, &format!("unknown palette '{value}'")))?;
            }
            "noise_type" => {
                self.params.noise_type = parse_noise(value)
                    .ok_or_else(|| parse_err(line, &format!("unknown noise type '{value}'")))?;
            }
            "pixelation" => {
                self.params.pixelation = parse_bool(value)
                    .ok_or_else(|| parse_err(line, "pixelation must be true/false"))?;
            }
            "background" => {
                self.params.background = parse_rgb(value)
                    .ok_or_else(|| parse_err(line, "background must be r,g,b in 0..=255"))?;
            }
            "camera.offset_x" => {
                self.camera.center_offset.x = parse_f32(value)
                    .ok_or_else(|| parse_err(line, "camera.offset_x must be a number"))?;
            }
            "camera.offset_y" => {
                self.camera.center_offset.y = parse_f32(value)
                    .ok_or_else(|| parse_err(line, "camera.offset_y must be a number"))?;
            }
            "camera.zoom" => {
                let z = parse_f32(value)
                    .ok_or_else(|| parse_err(line, "camera.zoom must be a number"))?;
                self.camera.set_zoom(z);
            }
            "mirror" => {
                if self.mirrors.len() >= MAX_MIRROR_POINTS {
                    return Err(SceneError::TooManyMirrors { line });
                }
                let point = parse_mirror(value).ok_or_else(|| {
                    parse_err(line, "mirror must be x,y[,rotation,folds,pre]")
                })?;
                self.mirrors.push(point.sanitized());
            }
            _ => return Err(parse_err(line, &format!("unknown key '{key}'"))),
        }
        Ok(())
    }

    pub fn to_text(&self) -> String {
        let p = &self.params;
        let mut out = String::from("# kaleidoscope scene v1\n");
        for id in ParamId::all() {
            let _ = writeln!(out, "{}={}", id.key(), p.get(id));
        }
        let _ = writeln!(out, "palette={}", p.palette.key());
        let _ = writeln!(out, "noise_type={}", p.noise_type.key());
        let _ = writeln!(out, "pixelation={}", p.pixelation);
        let [r, g, b] = p.background;
        let _ = writeln!(out, "background={r},{g},{b}");
        let _ = writeln!(out, "camera.offset_x={}", self.camera.center_offset.x);
        let _ = writeln!(out, "camera.offset_y={}", self.camera.center_offset.y);
        let _ = writeln!(out, "camera.zoom={}", self.camera.zoom_level);
        for m in &self.mirrors {
            let _ = writeln!(
                out,
                "mirror={},{},{},{},{}",
                m.x, m.y, m.rotation, m.folds, m.is_pre_mirror
            );
        }
        out
    }

    pub fn save(&self, path: &Path) -> Result<(), SceneError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| SceneError::Io(e.to_string()))?;
            }
        }
        let tmp = path.with_extension("tmp");
        std::fs::write(&tmp, self.to_text()).map_err(|e| SceneError::Io(e.to_string()))?;
        std::fs::rename(&tmp, path).map_err(|e| SceneError::Io(e.to_string()))
    }
}

pub fn scene_storage_path() -> Option<PathBuf> {
    app_config_dir().map(|dir| dir.join("scene.txt"))
}

fn parse_err(line: usize, message: &str) -> SceneError {
    SceneError::Parse {
        line,
        message: message.to_string(),
    }
}

fn parse_f32(raw: &str) -> Option<f32> {
    raw.trim().parse::<f32>().ok().filter(|v| v.is_finite())
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

// Accepts a harmony name or its numeric index; out-of-range indices fall back like the renderer.
fn parse_harmony(raw: &str) -> Option<Harmony> {
    match raw.trim().parse::<i32>() {
        Ok(idx) => Some(Harmony::from_index(idx)),
        Err(_) => Harmony::from_key(raw),
    }
}

fn parse_noise(raw: &str) -> Option<NoiseType> {
    match raw.trim().parse::<i32>() {
        Ok(idx) => Some(NoiseType::from_index(idx)),
        Err(_) => NoiseType::from_key(raw),
    }
}

fn parse_rgb(raw: &str) -> Option<[u8; 3]> {
    let mut parts = raw.split(',').map(|s| s.trim().parse::<u8>());
    let r = parts.next()?.ok()?;
    let g = parts.next()?.ok()?;
    let b = parts.next()?.ok()?;
    if parts.next().is_some() {
        return None;
    }
    Some([r, g, b])
}

fn parse_mirror(raw: &str) -> Option<MirrorPoint> {
    let fields: Vec<&str> = raw.split(',').map(str::trim).collect();
    if !(2..=5).contains(&fields.len()) {
        return None;
    }
    let mut point = MirrorPoint::new(parse_f32(fields[0])?, parse_f32(fields[1])?);
    if let Some(rot) = fields.get(2) {
        point.rotation = parse_f32(rot)?;
    }
    if let Some(folds) = fields.get(3) {
        point.folds = folds.parse::<u32>().ok()?;
    }
    if let Some(pre) = fields.get(4) {
        point.is_pre_mirror = parse_bool(pre)?;
    }
    Some(point)
}
