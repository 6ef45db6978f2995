use crate::camera::CameraState;
use crate::config::Config;
use crate::mirror::{InteractionConfig, MAX_MIRROR_POINTS, MirrorPoint, MirrorPointSystem};
use crate::params::{ParamId, RenderParameters};
use crate::render::{Frame, HalfBlockRenderer, Renderer};
use crate::scene::{Scene, scene_storage_path};
use crate::share;
use crate::terminal::TerminalGuard;
use crate::visual::overlay::{self, OverlayStyle};
use crate::visual::{FrameDriver, FrameInputs};
use anyhow::Context;
use crossterm::event::{
    self, Event, KeyCode, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use glam::Vec2;
use std::io::BufWriter;
use std::path::PathBuf;
use std::time::{Duration, Instant};

const TOAST_TTL: Duration = Duration::from_secs(3);
const KEY_PAN_FRACTION: f32 = 0.05;
const KEY_MIRROR_STEP: f32 = 0.05;
const KEY_ROTATE_DEGREES: f32 = 15.0;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Popup {
    None,
    Help,
    Share(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    None,
    Quit,
    Relayout,
}

// All state the event handlers mutate; rendering only reads a snapshot of it.
pub struct Session {
    pub params: RenderParameters,
    pub camera: CameraState,
    pub mirrors: MirrorPointSystem,
    pub selected: ParamId,
    pub show_hud: bool,
    pub popup: Popup,
    pub scene_path: Option<PathBuf>,
    toast: Option<(String, Instant)>,
    pan_anchor: Option<Vec2>,
}

impl Session {
    pub fn new(scene: Scene, interaction: InteractionConfig) -> Self {
        let mut mirrors = MirrorPointSystem::new(interaction);
        mirrors.replace_all(&scene.mirrors);
        Self {
            params: scene.params,
            camera: scene.camera,
            mirrors,
            selected: ParamId::Complexity,
            show_hud: true,
            popup: Popup::None,
            scene_path: None,
            toast: None,
            pan_anchor: None,
        }
    }

    pub fn scene(&self) -> Scene {
        Scene {
            params: self.params,
            camera: self.camera,
            mirrors: self.mirrors.points().to_vec(),
        }
    }

    pub fn share_token(&self) -> String {
        share::encode(&self.scene())
    }

    pub fn frame_inputs(&self, time: f32, width: usize, height: usize) -> FrameInputs {
        FrameInputs::new(
            time,
            width,
            height,
            self.params,
            self.camera,
            self.mirrors.snapshot(),
        )
    }

    pub fn set_viewport(&mut self, width: usize, height: usize) {
        self.mirrors.set_viewport(width as f32, height as f32);
    }

    pub fn toast(&self, now: Instant) -> Option<&str> {
        self.toast
            .as_ref()
            .filter(|(_, at)| now.saturating_duration_since(*at) < TOAST_TTL)
            .map(|(msg, _)| msg.as_str())
    }

    fn notify(&mut self, msg: impl Into<String>, now: Instant) {
        self.toast = Some((msg.into(), now));
    }

    pub fn handle_key(&mut self, code: KeyCode, mods: KeyModifiers, now: Instant) -> KeyAction {
        if mods.contains(KeyModifiers::CONTROL) && matches!(code, KeyCode::Char('c')) {
            return KeyAction::Quit;
        }

        match code {
            KeyCode::Esc => {
                if self.popup == Popup::None {
                    return KeyAction::Quit;
                }
                self.popup = Popup::None;
            }
            KeyCode::Char('q') | KeyCode::Char('Q') => return KeyAction::Quit,
            KeyCode::Delete | KeyCode::Backspace => {
                if self.mirrors.delete_active().is_some() {
                    self.notify("mirror point removed", now);
                }
            }
            KeyCode::Char(' ') => {
                if let Some(pre) = self.mirrors.toggle_pre_mirror() {
                    let label = if pre { "pre-fold" } else { "post-fold" };
                    self.notify(format!("mirror point set {label}"), now);
                }
            }
            KeyCode::Char('m') => {
                let msg = match self.mirrors.add_point(MirrorPoint::new(0.0, 0.0)) {
                    Some(idx) => format!("mirror point {} placed at centre", idx + 1),
                    None => format!("limit of {MAX_MIRROR_POINTS} mirror points"),
                };
                self.notify(msg, now);
            }
            KeyCode::Up if mods.contains(KeyModifiers::SHIFT) => self.nudge_mirror(0.0, 1.0),
            KeyCode::Down if mods.contains(KeyModifiers::SHIFT) => self.nudge_mirror(0.0, -1.0),
            KeyCode::Left if mods.contains(KeyModifiers::SHIFT) => self.nudge_mirror(-1.0, 0.0),
            KeyCode::Right if mods.contains(KeyModifiers::SHIFT) => self.nudge_mirror(1.0, 0.0),
            KeyCode::Char('I') => self.nudge_mirror(0.0, 1.0),
            KeyCode::Char('K') => self.nudge_mirror(0.0, -1.0),
            KeyCode::Char('J') => self.nudge_mirror(-1.0, 0.0),
            KeyCode::Char('L') => self.nudge_mirror(1.0, 0.0),
            KeyCode::Char('[') => {
                self.mirrors.adjust_active_folds(-1);
            }
            KeyCode::Char(']') => {
                self.mirrors.adjust_active_folds(1);
            }
            KeyCode::Char(',') => {
                self.mirrors.rotate_active(-KEY_ROTATE_DEGREES);
            }
            KeyCode::Char('.') => {
                self.mirrors.rotate_active(KEY_ROTATE_DEGREES);
            }
            KeyCode::Tab => self.selected = self.selected.next(),
            KeyCode::BackTab => self.selected = self.selected.prev(),
            KeyCode::Up => self.params.nudge(self.selected, 1),
            KeyCode::Down => self.params.nudge(self.selected, -1),
            KeyCode::Right => self.params.palette = self.params.palette.next(),
            KeyCode::Left => self.params.palette = self.params.palette.prev(),
            KeyCode::Char('n') => self.params.noise_type = self.params.noise_type.next(),
            KeyCode::Char('x') => self.params.pixelation = !self.params.pixelation,
            KeyCode::Char('+') | KeyCode::Char('=') => self.camera.zoom_step(-1.0),
            KeyCode::Char('-') | KeyCode::Char('_') => self.camera.zoom_step(1.0),
            KeyCode::Char('w') => self.pan_by_fraction(0.0, KEY_PAN_FRACTION),
            KeyCode::Char('s') => self.pan_by_fraction(0.0, -KEY_PAN_FRACTION),
            KeyCode::Char('a') => self.pan_by_fraction(KEY_PAN_FRACTION, 0.0),
            KeyCode::Char('d') => self.pan_by_fraction(-KEY_PAN_FRACTION, 0.0),
            KeyCode::Char('0') => self.camera.reset(),
            KeyCode::Char('r') => {
                self.params = RenderParameters::default();
                self.notify("parameters reset", now);
            }
            KeyCode::Char('R') => {
                self.params.set(self.selected, self.selected.default_value());
                self.notify(format!("{} reset", self.selected.label()), now);
            }
            KeyCode::Char('c') => {
                self.popup = if matches!(self.popup, Popup::Share(_)) {
                    Popup::None
                } else {
                    let token = self.share_token();
                    log::info!("share token: {token}");
                    Popup::Share(token)
                };
            }
            KeyCode::Char('S') => self.save_scene(now),
            KeyCode::Char('i') => {
                self.show_hud = !self.show_hud;
                return KeyAction::Relayout;
            }
            KeyCode::Char('?') | KeyCode::Char('h') | KeyCode::F(1) => {
                self.popup = if self.popup == Popup::Help {
                    Popup::None
                } else {
                    Popup::Help
                };
            }
            _ => {}
        }
        KeyAction::None
    }

    fn nudge_mirror(&mut self, dx: f32, dy: f32) {
        self.mirrors.nudge_active(Vec2::new(dx, dy) * KEY_MIRROR_STEP);
    }

    fn pan_by_fraction(&mut self, fx: f32, fy: f32) {
        let vp = self.mirrors.viewport();
        self.camera.pan_pixels(fx * vp.x, fy * vp.y, vp);
    }

    fn save_scene(&mut self, now: Instant) {
        let Some(path) = self.scene_path.clone().or_else(scene_storage_path) else {
            self.notify("no scene path available", now);
            return;
        };
        match self.scene().save(&path) {
            Ok(()) => {
                log::info!("scene saved to {}", path.display());
                self.notify(format!("saved {}", path.display()), now);
            }
            Err(err) => {
                log::warn!("scene save failed: {err}");
                self.notify(format!("save failed: {err}"), now);
            }
        }
    }

    pub fn handle_mouse(&mut self, ev: MouseEvent, visual_rows: u16, now: Instant) {
        let pos = cell_to_pixel(ev.column, ev.row);
        let in_frame = ev.row < visual_rows;
        match ev.kind {
            MouseEventKind::Down(MouseButton::Left) if in_frame => {
                self.mirrors.pointer_down(pos, now);
            }
            MouseEventKind::Drag(MouseButton::Left) | MouseEventKind::Moved => {
                self.mirrors.pointer_move(pos);
            }
            MouseEventKind::Up(MouseButton::Left) => self.mirrors.pointer_up(),
            MouseEventKind::Down(MouseButton::Right) if in_frame => self.pan_anchor = Some(pos),
            MouseEventKind::Drag(MouseButton::Right) => {
                if let Some(anchor) = self.pan_anchor {
                    let d = pos - anchor;
                    let vp = self.mirrors.viewport();
                    self.camera.pan_pixels(d.x, d.y, vp);
                    self.pan_anchor = Some(pos);
                }
            }
            MouseEventKind::Up(MouseButton::Right) => self.pan_anchor = None,
            MouseEventKind::ScrollUp if in_frame => {
                if !self.mirrors.wheel(pos, 1) {
                    self.camera.zoom_step(-1.0);
                }
            }
            MouseEventKind::ScrollDown if in_frame => {
                if !self.mirrors.wheel(pos, -1) {
                    self.camera.zoom_step(1.0);
                }
            }
            _ => {}
        }
    }

    // Fires the long-press timer; called once per frame.
    pub fn tick(&mut self, now: Instant) {
        if let Some(idx) = self.mirrors.tick(now) {
            self.notify(format!("mirror point {} placed", idx + 1), now);
        }
    }
}

// Centre of the cell in half-block pixel space: one column wide, two rows tall.
pub fn cell_to_pixel(column: u16, row: u16) -> Vec2 {
    Vec2::new(column as f32 + 0.5, row as f32 * 2.0 + 1.0)
}

// Defaults, then the scene file, then the share token, then explicit CLI flags.
pub fn initial_scene(cfg: &Config) -> Scene {
    let mut scene = Scene::default();
    if let Some(path) = cfg.scene.as_deref() {
        match Scene::load(path) {
            Ok(loaded) => {
                log::info!("loaded scene {}", path.display());
                scene = loaded;
            }
            Err(err) => log::warn!("ignoring scene {}: {err}", path.display()),
        }
    }
    if let Some(token) = cfg.load.as_deref() {
        match share::decode(token) {
            Ok(decoded) => {
                log::info!("loaded share token ({} mirror points)", decoded.mirrors.len());
                scene = decoded;
            }
            Err(err) => log::warn!("ignoring share token: {err}"),
        }
    }
    if let Some(palette) = cfg.palette {
        scene.params.palette = palette;
    }
    if let Some(noise) = cfg.noise {
        scene.params.noise_type = noise;
    }
    if cfg.pixelate {
        scene.params.pixelation = true;
    }
    scene
}

pub fn run(cfg: Config) -> anyhow::Result<()> {
    let mut session = Session::new(initial_scene(&cfg), InteractionConfig::terminal());
    session.show_hud = cfg.hud;
    session.scene_path = cfg.scene.clone();
    let style = OverlayStyle::from_ring_radius(session.mirrors.config().ring_radius);

    let _term = TerminalGuard::new()?;
    let mut out = BufWriter::new(TerminalGuard::stdout());
    let mut renderer: Box<dyn Renderer> = Box::new(HalfBlockRenderer::new());
    let mut driver = FrameDriver::new();

    let mut last_size = crossterm::terminal::size().context("get terminal size")?;
    if last_size.1 < 2 || last_size.0 < 4 {
        return Err(anyhow::anyhow!(
            "terminal too small (need at least 4x2, got {}x{})",
            last_size.0,
            last_size.1
        ));
    }
    let mut hud_rows = hud_rows_for_size(last_size, session.show_hud);
    resize_frame(&mut driver, &mut session, last_size, hud_rows);

    let start = Instant::now();
    let mut fps = FpsCounter::new();
    loop {
        let now = Instant::now();

        let mut relayout = false;
        let mut quit = false;
        while !quit && event::poll(Duration::from_millis(0))? {
            match event::read()? {
                Event::Key(k) if k.kind != KeyEventKind::Release => {
                    match session.handle_key(k.code, k.modifiers, now) {
                        KeyAction::Quit => quit = true,
                        KeyAction::Relayout => relayout = true,
                        KeyAction::None => {}
                    }
                }
                Event::Mouse(m) => {
                    let visual_rows = last_size.1.saturating_sub(hud_rows).max(1);
                    session.handle_mouse(m, visual_rows, now);
                }
                Event::Resize(c, r) => {
                    last_size = (c, r);
                    relayout = true;
                }
                _ => {}
            }
        }
        if quit {
            break;
        }

        // Resize events can be missed in some terminals.
        let sz = crossterm::terminal::size()?;
        if sz != last_size {
            last_size = sz;
            relayout = true;
        }
        if relayout {
            hud_rows = hud_rows_for_size(last_size, session.show_hud);
            resize_frame(&mut driver, &mut session, last_size, hud_rows);
            renderer.invalidate();
        }

        session.tick(now);

        let (w, h) = driver.size();
        let inputs = session.frame_inputs(start.elapsed().as_secs_f32(), w, h);
        driver.render(&inputs);
        overlay::paint_mirror_points(driver.frame_mut(), w, h, &session.mirrors, &style);

        let (term_cols, term_rows) = last_size;
        let visual_rows = term_rows.saturating_sub(hud_rows).max(1);
        let hud = if hud_rows > 0 {
            build_hud(&session, term_cols as usize, fps.fps(), now)
        } else {
            Vec::new()
        };
        let help = help_popup_text();
        let share_text;
        let popup = match &session.popup {
            Popup::None => None,
            Popup::Help => Some(help),
            Popup::Share(token) => {
                share_text = format!("Share token\n{token}\n\nRun with --load <token>. c or esc closes.");
                Some(share_text.as_str())
            }
        };

        let frame = Frame {
            term_cols,
            term_rows,
            visual_rows,
            pixel_width: w,
            pixel_height: h,
            pixels_rgba: driver.frame(),
            hud: &hud,
            hud_rows,
            popup,
            sync_updates: cfg.sync_updates,
        };
        renderer.render(&frame, &mut out)?;
        fps.tick();

        let target = Duration::from_secs_f32(1.0 / cfg.fps.max(1) as f32);
        let elapsed = now.elapsed();
        if elapsed < target {
            std::thread::sleep(target - elapsed);
        }
    }

    log::info!("exit share token: {}", session.share_token());
    Ok(())
}

fn resize_frame(driver: &mut FrameDriver, session: &mut Session, size: (u16, u16), hud_rows: u16) {
    let (cols, rows) = size;
    let visual_rows = rows.saturating_sub(hud_rows).max(1);
    let w = cols as usize;
    let h = (visual_rows as usize) * 2;
    driver.resize(w, h);
    session.set_viewport(w, h);
    log::debug!("resize: {}x{} cells, {}x{} px, hud rows {}", cols, rows, w, h, hud_rows);
}

fn hud_rows_for_size(size: (u16, u16), show_hud: bool) -> u16 {
    if !show_hud {
        return 0;
    }
    let rows = size.1;
    if rows <= 1 {
        return 0;
    }
    (rows - 1).min(3)
}

fn build_hud(session: &Session, cols: usize, fps: f32, now: Instant) -> Vec<String> {
    let p = &session.params;
    let id = session.selected;
    let (lo, hi) = id.range();
    let mirrors = &session.mirrors;
    let active = match (mirrors.active(), mirrors.active_point()) {
        (Some(i), Some(m)) => format!(
            "#{} rot {:>3.0} folds {} {}",
            i + 1,
            m.rotation,
            m.folds,
            if m.is_pre_mirror { "pre" } else { "post" }
        ),
        _ => "none".to_string(),
    };
    let logical_lines = vec![
        format!(
            "Param: {} = {:.3} [{}..{}] | Palette: {} | Noise: {} | Pixelate: {} | Zoom: {:.2} | FPS: {:>4.1}",
            id.label(),
            p.get(id),
            lo,
            hi,
            p.palette.label(),
            p.noise_type.label(),
            if p.pixelation { "on" } else { "off" },
            session.camera.zoom_level,
            fps,
        ),
        format!(
            "Mirrors: {}/{} | Active: {}{}",
            mirrors.points().len(),
            MAX_MIRROR_POINTS,
            active,
            session
                .toast(now)
                .map(|t| format!(" | {t}"))
                .unwrap_or_default(),
        ),
        "Keys: tab param | up/down adjust | R reset param | left/right palette | n noise | x pixelate | hold click or m add mirror | IJKL move mirror | c share | ? help | q quit".to_string(),
    ];
    logical_lines
        .iter()
        .flat_map(|l| hard_wrap_line(l, cols.max(1)))
        .collect()
}

fn hard_wrap_line(line: &str, width: usize) -> Vec<String> {
    if line.is_empty() {
        return vec![String::new()];
    }
    let chars: Vec<char> = line.chars().collect();
    chars
        .chunks(width.max(1))
        .map(|c| c.iter().collect())
        .collect()
}

fn help_popup_text() -> &'static str {
    "Kaleidoscope Hotkeys\n\
tab / shift-tab  select parameter\n\
up/down  adjust selected parameter\n\
left/right  previous/next palette\n\
n  cycle noise type\n\
x  toggle pixelation\n\
+/-  or mouse wheel  zoom\n\
w/a/s/d  or right-drag  pan\n\
0  reset camera\n\
r  reset parameters\n\
R  reset selected parameter\n\
hold left click or m  place mirror point (max 4)\n\
drag point  move it; drag its ring  rotate it\n\
I/J/K/L or shift+arrows  move active point\n\
wheel over active point or [ ]  folds -/+1\n\
, .  rotate active point 15 degrees\n\
space  toggle pre/post fold on active point\n\
delete/backspace  remove active point\n\
c  show share token\n\
S  save scene\n\
i  show/hide HUD\n\
? or h or F1  toggle this help\n\
q or esc  quit"
}

struct FpsCounter {
    last: Instant,
    frames: u32,
    fps: f32,
}

impl FpsCounter {
    fn new() -> Self {
        Self {
            last: Instant::now(),
            frames: 0,
            fps: 0.0,
        }
    }

    fn tick(&mut self) {
        self.frames += 1;
        let now = Instant::now();
        let dt = now.duration_since(self.last).as_secs_f32();
        if dt >= 0.5 {
            self.fps = self.frames as f32 / dt;
            self.frames = 0;
            self.last = now;
        }
    }

    fn fps(&self) -> f32 {
        self.fps
    }
}
