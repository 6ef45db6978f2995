use anyhow::{Context, Result};
use clap::Parser;
use kaleidoscope_tui::config::{Config, default_log_path};
use std::fs::{File, OpenOptions};
use std::path::Path;

fn open_log(path: &Path) -> Result<File> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create log directory {}", parent.display()))?;
    }
    OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(path)
        .with_context(|| format!("open log file {}", path.display()))
}

fn main() -> Result<()> {
    let cfg = Config::parse();

    let log_file = match (cfg.log_file.as_deref(), default_log_path()) {
        (Some(path), _) => Some(open_log(path)?),
        (None, Some(path)) => open_log(&path).ok(),
        (None, None) => None,
    };

    // The terminal is the frame: stderr only ever carries errors.
    let default_level = if log_file.is_some() { "warn" } else { "error" };
    let mut logger =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level));
    logger.format_timestamp_micros();
    if let Some(file) = log_file {
        logger.target(env_logger::Target::Pipe(Box::new(file)));
    }
    logger.init();

    log::info!(
        "starting kaleidoscope_tui (fps={}, scene={:?}, token={})",
        cfg.fps,
        cfg.scene,
        cfg.load.is_some()
    );
    kaleidoscope_tui::app::run(cfg)
}
