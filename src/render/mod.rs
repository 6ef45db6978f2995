mod halfblock;

pub use halfblock::HalfBlockRenderer;

use std::io::Write;

pub struct Frame<'a> {
    pub term_cols: u16,
    pub term_rows: u16,
    pub visual_rows: u16,
    pub pixel_width: usize,
    pub pixel_height: usize,
    pub pixels_rgba: &'a [u8],
    pub hud: &'a [String],
    pub hud_rows: u16,
    pub popup: Option<&'a str>,
    pub sync_updates: bool,
}

pub trait Renderer {
    fn name(&self) -> &'static str;
    fn render(&mut self, frame: &Frame<'_>, out: &mut dyn Write) -> anyhow::Result<()>;
    // Forces the next frame to repaint every row.
    fn invalidate(&mut self) {}
}

// Word-wraps `text` to `width` columns; words longer than a line are split.
pub fn wrap_words(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines = Vec::new();
    for raw in text.lines() {
        let mut cur = String::new();
        let mut cur_len = 0usize;
        for word in raw.split(' ') {
            let word_len = word.chars().count();
            let sep = usize::from(cur_len > 0);
            if cur_len + sep + word_len > width && cur_len > 0 {
                lines.push(std::mem::take(&mut cur));
                cur_len = 0;
            }
            if cur_len > 0 {
                cur.push(' ');
                cur_len += 1;
            }
            for ch in word.chars() {
                if cur_len >= width {
                    lines.push(std::mem::take(&mut cur));
                    cur_len = 0;
                }
                cur.push(ch);
                cur_len += 1;
            }
        }
        lines.push(cur);
    }
    lines
}

// Centred box over the current frame; the first line is drawn as the title.
pub fn draw_popup(
    out: &mut dyn Write,
    term_cols: u16,
    term_rows: u16,
    text: &str,
) -> anyhow::Result<()> {
    if text.trim().is_empty() {
        return Ok(());
    }
    let cols = term_cols as usize;
    let rows = term_rows as usize;
    if cols < 8 || rows < 4 {
        return Ok(());
    }

    let max_inner_w = cols.saturating_sub(6).max(1);
    let lines = wrap_words(text, max_inner_w);
    let inner_w = lines
        .iter()
        .map(|l| l.chars().count())
        .max()
        .unwrap_or(1)
        .clamp(1, max_inner_w);
    let body_h = lines.len().min(rows.saturating_sub(2).max(1));
    let box_w = inner_w + 4;
    let box_h = body_h + 2;
    let left = (cols.saturating_sub(box_w)) / 2 + 1;
    let top = (rows.saturating_sub(box_h)) / 2 + 1;

    let edge = format!("+{}+", "-".repeat(box_w - 2));
    out.write_all(b"\x1b[0m\x1b[38;2;226;255;242m\x1b[48;2;6;18;14m")?;
    write!(out, "\x1b[{};{}H{}", top, left, edge)?;
    for (i, line) in lines.iter().take(body_h).enumerate() {
        let pad = inner_w.saturating_sub(line.chars().count());
        write!(out, "\x1b[{};{}H| ", top + 1 + i, left)?;
        if i == 0 {
            write!(out, "\x1b[1m\x1b[38;2;0;255;163m{line}\x1b[22m\x1b[38;2;226;255;242m")?;
        } else {
            write!(out, "{line}")?;
        }
        write!(out, "{} |", " ".repeat(pad))?;
    }
    write!(out, "\x1b[{};{}H{}", top + box_h - 1, left, edge)?;
    out.write_all(b"\x1b[0m")?;
    Ok(())
}
