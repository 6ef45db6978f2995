use crate::visual::color::Harmony;
use crate::visual::noise::NoiseType;
use clap::Parser;
use std::path::{Path, PathBuf};

#[derive(Parser, Debug, Clone)]
#[command(
    name = "kaleidoscope-tui",
    version,
    about = "Kaleidoscopic noise-field visualizer for true-colour terminals"
)]
pub struct Config {
    #[arg(long, default_value_t = 60)]
    pub fps: u32,

    // Scene file loaded at startup; `S` saves back to it.
    #[arg(long)]
    pub scene: Option<PathBuf>,

    // Share token produced by `c` (applied after the scene file).
    #[arg(long)]
    pub load: Option<String>,

    #[arg(long, value_enum)]
    pub palette: Option<Harmony>,

    #[arg(long, value_enum)]
    pub noise: Option<NoiseType>,

    #[arg(long, default_value_t = false)]
    pub pixelate: bool,

    #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
    pub sync_updates: bool,

    #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
    pub hud: bool,

    // Defaults to kaleidoscope_tui.log in the config directory.
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

const APP_DIR: &str = "kaleidoscope_tui";

// `$XDG_CONFIG_HOME/kaleidoscope_tui`, else `$HOME/.config/kaleidoscope_tui`.
pub fn config_dir_from(xdg_config_home: Option<&str>, home: Option<&str>) -> Option<PathBuf> {
    if let Some(xdg) = xdg_config_home.filter(|v| !v.trim().is_empty()) {
        return Some(PathBuf::from(xdg).join(APP_DIR));
    }
    let home = home.filter(|v| !v.trim().is_empty())?;
    Some(Path::new(home).join(".config").join(APP_DIR))
}

pub fn app_config_dir() -> Option<PathBuf> {
    let xdg = std::env::var("XDG_CONFIG_HOME").ok();
    let home = std::env::var("HOME").ok();
    config_dir_from(xdg.as_deref(), home.as_deref())
}

pub fn default_log_path() -> Option<PathBuf> {
    app_config_dir().map(|dir| dir.join("kaleidoscope_tui.log"))
}
