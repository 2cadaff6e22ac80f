//! Terminal output for game frames.
//!
//! Each frame is compared with the one on screen and only runs of changed
//! cells are written. The half-block board usually changes one color of a
//! cell at a time, so colors and attributes are emitted only when they differ
//! from what the terminal already has. Entering also turns on mouse capture
//! so board taps reach the input layer.

use std::io::{self, Write};

use anyhow::Result;
use crossterm::{
    cursor, event,
    style::{Attribute, Color, Print, ResetColor, SetAttribute, SetBackgroundColor, SetForegroundColor},
    terminal, QueueableCommand,
};

use crate::fb::{CellStyle, FrameBuffer, Rgb};

pub struct TerminalRenderer {
    stdout: io::Stdout,
    /// Frame currently on screen
    shown: FrameBuffer,
    /// Screen contents unknown (first frame, resize)
    dirty: bool,
    buf: Vec<u8>,
}

impl TerminalRenderer {
    pub fn new() -> Self {
        Self {
            stdout: io::stdout(),
            shown: FrameBuffer::new(0, 0),
            dirty: true,
            buf: Vec::with_capacity(64 * 1024),
        }
    }

    pub fn enter(&mut self) -> Result<()> {
        terminal::enable_raw_mode()?;
        self.buf.clear();
        self.buf.queue(terminal::EnterAlternateScreen)?;
        self.buf.queue(cursor::Hide)?;
        self.buf.queue(terminal::DisableLineWrap)?;
        self.buf.queue(event::EnableMouseCapture)?;
        self.flush()
    }

    pub fn exit(&mut self) -> Result<()> {
        self.buf.clear();
        self.buf.queue(event::DisableMouseCapture)?;
        self.buf.queue(ResetColor)?;
        self.buf.queue(SetAttribute(Attribute::Reset))?;
        self.buf.queue(terminal::EnableLineWrap)?;
        self.buf.queue(cursor::Show)?;
        self.buf.queue(terminal::LeaveAlternateScreen)?;
        self.flush()?;
        terminal::disable_raw_mode()?;
        Ok(())
    }

    /// Repaint everything on the next draw (call on resize).
    pub fn invalidate(&mut self) {
        self.dirty = true;
    }

    /// Write `fb` to the terminal, then swap it with the shown frame.
    ///
    /// After the call `fb` holds the previous frame, ready to be drawn over,
    /// so one pair of buffers serves the whole game.
    pub fn draw_swap(&mut self, fb: &mut FrameBuffer) -> Result<()> {
        let full = self.dirty || self.shown.width() != fb.width() || self.shown.height() != fb.height();
        self.buf.clear();
        encode_frame((!full).then_some(&self.shown), fb, &mut self.buf)?;
        self.flush()?;

        std::mem::swap(&mut self.shown, fb);
        self.dirty = false;
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        self.stdout.write_all(&self.buf)?;
        self.stdout.flush()?;
        Ok(())
    }
}

impl Default for TerminalRenderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Encode `next` into `out`, against `shown` when the screen holds it.
///
/// Without a shown frame the screen is cleared and every row is written.
pub fn encode_frame(shown: Option<&FrameBuffer>, next: &FrameBuffer, out: &mut Vec<u8>) -> Result<()> {
    let mut pen = Pen::default();
    match shown {
        Some(shown) => {
            for (x, y, len) in changed_runs(shown, next) {
                pen.write_run(out, next, x, y, len)?;
            }
        }
        None => {
            out.queue(terminal::Clear(terminal::ClearType::All))?;
            for y in 0..next.height() {
                pen.write_run(out, next, 0, y, next.width())?;
            }
        }
    }
    if pen.style.is_some() {
        out.queue(ResetColor)?;
        out.queue(SetAttribute(Attribute::Reset))?;
    }
    Ok(())
}

/// Terminal style state while encoding, so unchanged parts are not re-sent.
#[derive(Default)]
struct Pen {
    style: Option<CellStyle>,
}

impl Pen {
    fn write_run(&mut self, out: &mut Vec<u8>, fb: &FrameBuffer, x: u16, y: u16, len: u16) -> Result<()> {
        out.queue(cursor::MoveTo(x, y))?;
        for dx in 0..len {
            let cell = fb.get(x + dx, y).unwrap_or_default();
            self.set(out, cell.style)?;
            out.queue(Print(cell.ch))?;
        }
        Ok(())
    }

    fn set(&mut self, out: &mut Vec<u8>, style: CellStyle) -> Result<()> {
        let prev = self.style.replace(style);
        let attrs_changed = prev.map_or(true, |p| p.bold != style.bold || p.dim != style.dim);
        if attrs_changed {
            // Attribute reset also drops colors on some terminals.
            out.queue(SetAttribute(Attribute::Reset))?;
            if style.bold {
                out.queue(SetAttribute(Attribute::Bold))?;
            }
            if style.dim {
                out.queue(SetAttribute(Attribute::Dim))?;
            }
        }
        if attrs_changed || prev.map(|p| p.fg) != Some(style.fg) {
            out.queue(SetForegroundColor(color(style.fg)))?;
        }
        if attrs_changed || prev.map(|p| p.bg) != Some(style.bg) {
            out.queue(SetBackgroundColor(color(style.bg)))?;
        }
        Ok(())
    }
}

fn color(rgb: Rgb) -> Color {
    Color::Rgb {
        r: rgb.r,
        g: rgb.g,
        b: rgb.b,
    }
}

/// `(x, y, len)` runs of cells that differ between two same-sized frames.
fn changed_runs<'a>(
    shown: &'a FrameBuffer,
    next: &'a FrameBuffer,
) -> impl Iterator<Item = (u16, u16, u16)> + 'a {
    let w = next.width();
    (0..next.height()).flat_map(move |y| {
        let differs = move |x: u16| shown.get(x, y) != next.get(x, y);
        let mut x = 0;
        std::iter::from_fn(move || {
            while x < w && !differs(x) {
                x += 1;
            }
            if x >= w {
                return None;
            }
            let start = x;
            while x < w && differs(x) {
                x += 1;
            }
            Some((start, y, x - start))
        })
    })
}
