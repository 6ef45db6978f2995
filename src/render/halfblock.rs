use crate::render::{Frame, Renderer, draw_popup};
use std::io::Write;

const UPPER_HALF: char = '\u{2580}';

type Rgb = (u8, u8, u8);

// Upper half-block glyph: foreground paints the top pixel, background the bottom one.
// Rows identical to the previous frame are skipped.
pub struct HalfBlockRenderer {
    prev: Vec<u8>,
    prev_dims: (usize, usize),
    force_full: bool,
}

impl Default for HalfBlockRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl HalfBlockRenderer {
    pub fn new() -> Self {
        Self {
            prev: Vec::new(),
            prev_dims: (0, 0),
            force_full: true,
        }
    }

    fn row_changed(&self, pixels: &[u8], start: usize, end: usize) -> bool {
        self.force_full || self.prev.get(start..end) != pixels.get(start..end)
    }
}

fn rgb_at(px: &[u8], i: usize) -> Rgb {
    (px[i], px[i + 1], px[i + 2])
}

impl Renderer for HalfBlockRenderer {
    fn name(&self) -> &'static str {
        "halfblock"
    }

    fn invalidate(&mut self) {
        self.force_full = true;
    }

    fn render(&mut self, frame: &Frame<'_>, out: &mut dyn Write) -> anyhow::Result<()> {
        let cols = frame.term_cols as usize;
        let visual_rows = frame.visual_rows as usize;
        let w = frame.pixel_width;
        let h = frame.pixel_height;
        if cols == 0 || visual_rows == 0 || w != cols || h != visual_rows * 2 {
            return Ok(());
        }
        let need = w * h * 4;
        if frame.pixels_rgba.len() < need {
            return Ok(());
        }
        if self.prev_dims != (w, h) {
            self.force_full = true;
        }
        // A popup covers part of the frame, so the rows under it must be repainted once it goes.
        if frame.popup.is_some() {
            self.force_full = true;
        }

        if frame.sync_updates {
            out.write_all(b"\x1b[?2026h")?;
        }
        out.write_all(b"\x1b[0m\x1b[?7l")?;

        let px = frame.pixels_rgba;
        let row_bytes = w * 2 * 4;
        for row in 0..visual_rows {
            let start = row * row_bytes;
            if !self.row_changed(px, start, start + row_bytes) {
                continue;
            }
            write!(out, "\x1b[{};1H", row + 1)?;
            let mut fg: Option<Rgb> = None;
            let mut bg: Option<Rgb> = None;
            for x in 0..cols {
                let top = rgb_at(px, start + x * 4);
                let bot = rgb_at(px, start + (w + x) * 4);
                if fg != Some(top) {
                    write!(out, "\x1b[38;2;{};{};{}m", top.0, top.1, top.2)?;
                    fg = Some(top);
                }
                if bg != Some(bot) {
                    write!(out, "\x1b[48;2;{};{};{}m", bot.0, bot.1, bot.2)?;
                    bg = Some(bot);
                }
                write!(out, "{UPPER_HALF}")?;
            }
        }
        out.write_all(b"\x1b[0m")?;

        for i in 0..frame.hud_rows as usize {
            write!(out, "\x1b[{};1H\x1b[2K", visual_rows + i + 1)?;
            if let Some(line) = frame.hud.get(i) {
                let clipped: String = line.chars().take(cols).collect();
                write!(out, "{clipped}")?;
            }
        }

        if let Some(text) = frame.popup {
            draw_popup(out, frame.term_cols, frame.term_rows, text)?;
        }

        out.write_all(b"\x1b[?7h")?;
        if frame.sync_updates {
            out.write_all(b"\x1b[?2026l")?;
        }
        out.flush()?;

        self.prev.clear();
        self.prev.extend_from_slice(&px[..need]);
        self.prev_dims = (w, h);
        self.force_full = frame.popup.is_some();
        Ok(())
    }
}
