use crate::surface::{DisplaySurface, FrameBuffer, Rgb};
use crossterm::{
    cursor, execute, queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{
        self, BeginSynchronizedUpdate, Clear, ClearType, DisableLineWrap, EnableLineWrap,
        EndSynchronizedUpdate, EnterAlternateScreen, LeaveAlternateScreen,
    },
};
use std::io::{self, Write};

const UPPER_HALF: char = '▀';

impl Rgb {
    fn to_color(self) -> Color {
        Color::Rgb {
            r: self.r,
            g: self.g,
            b: self.b,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Cell {
    pub(crate) ch: char,
    pub(crate) fg: Rgb,
    pub(crate) bg: Rgb,
}

impl Default for Cell {
    fn default() -> Self {
        Self {
            ch: ' ',
            fg: Rgb::BLACK,
            bg: Rgb::BLACK,
        }
    }
}

/// Two pixel rows per terminal row: the upper half block takes the top pixel
/// as foreground and the bottom pixel as background.
pub(crate) fn half_blocks(fb: &FrameBuffer, cells: &mut [Cell]) {
    let (w, h) = fb.size();
    let rows = h.div_ceil(2);
    debug_assert_eq!(cells.len(), (w * rows) as usize);

    for cy in 0..rows {
        for x in 0..w {
            let top = fb.pixel(x, cy * 2).unwrap_or(Rgb::BLACK);
            let bottom = fb.pixel(x, cy * 2 + 1).unwrap_or(Rgb::BLACK);
            let ch = if top == bottom { ' ' } else { UPPER_HALF };
            cells[(cy * w + x) as usize] = Cell {
                ch,
                fg: top,
                bg: bottom,
            };
        }
    }
}

/// Draws into a pixel buffer and shows it in the middle of the terminal,
/// rewriting only the cells that changed since the last frame.
pub(crate) struct TerminalSurface {
    out: io::Stdout,
    fb: FrameBuffer,
    cols: u16,
    rows: u16,
    prev: Vec<Cell>,
    cur: Vec<Cell>,
    redraw: bool,
    active: bool,
}

impl TerminalSurface {
    pub(crate) fn begin(w: u32, h: u32) -> io::Result<Self> {
        let (cols, rows) = terminal::size()?;
        if (cols as u32) < w || (rows as u32) < h.div_ceil(2) {
            log::warn!(
                "Terminal is {}x{} but the lamp needs {}x{}; it will be cropped",
                cols,
                rows,
                w,
                h.div_ceil(2)
            );
        }

        let mut out = io::stdout();
        execute!(
            out,
            EnterAlternateScreen,
            cursor::Hide,
            DisableLineWrap,
            Clear(ClearType::All)
        )?;

        let n = (w * h.div_ceil(2)) as usize;
        Ok(Self {
            out,
            fb: FrameBuffer::new(w, h),
            cols,
            rows,
            prev: vec![Cell::default(); n],
            cur: vec![Cell::default(); n],
            redraw: true,
            active: true,
        })
    }

    pub(crate) fn end(&mut self) -> io::Result<()> {
        if !self.active {
            return Ok(());
        }
        self.active = false;
        queue!(
            self.out,
            ResetColor,
            Clear(ClearType::All),
            cursor::Show,
            EnableLineWrap,
            LeaveAlternateScreen
        )?;
        self.out.flush()
    }

    fn resize_if_needed(&mut self) -> io::Result<()> {
        let (c, r) = terminal::size()?;
        if c == self.cols && r == self.rows {
            return Ok(());
        }
        self.cols = c;
        self.rows = r;
        self.redraw = true;
        queue!(self.out, ResetColor, Clear(ClearType::All))?;
        Ok(())
    }
}

impl DisplaySurface for TerminalSurface {
    type Color = Rgb;

    fn create_color(&mut self, r: u8, g: u8, b: u8) -> Rgb {
        self.fb.create_color(r, g, b)
    }

    fn set_active_color(&mut self, color: Rgb) {
        self.fb.set_active_color(color);
    }

    fn clear(&mut self) {
        self.fb.clear();
    }

    fn fill_rect(&mut self, x: i32, y: i32, w: u32, h: u32) {
        self.fb.fill_rect(x, y, w, h);
    }

    fn present(&mut self) -> io::Result<()> {
        self.resize_if_needed()?;
        half_blocks(&self.fb, &mut self.cur);

        let (w, h) = self.fb.size();
        let img_cols = w as u16;
        let img_rows = h.div_ceil(2) as u16;
        let ox = self.cols.saturating_sub(img_cols) / 2;
        let oy = self.rows.saturating_sub(img_rows) / 2;

        queue!(self.out, BeginSynchronizedUpdate)?;

        let mut last_fg = None;
        let mut last_bg = None;

        for cy in 0..img_rows.min(self.rows.saturating_sub(oy)) {
            for cx in 0..img_cols.min(self.cols.saturating_sub(ox)) {
                let i = cy as usize * img_cols as usize + cx as usize;
                let c = self.cur[i];
                if !self.redraw && c == self.prev[i] {
                    continue;
                }

                queue!(self.out, cursor::MoveTo(ox + cx, oy + cy))?;

                if last_fg != Some(c.fg) {
                    queue!(self.out, SetForegroundColor(c.fg.to_color()))?;
                    last_fg = Some(c.fg);
                }
                if last_bg != Some(c.bg) {
                    queue!(self.out, SetBackgroundColor(c.bg.to_color()))?;
                    last_bg = Some(c.bg);
                }

                queue!(self.out, Print(c.ch))?;
            }
        }

        queue!(self.out, ResetColor, EndSynchronizedUpdate)?;
        self.out.flush()?;
        self.prev.copy_from_slice(&self.cur);
        self.redraw = false;
        self.fb.present()
    }

    fn size(&self) -> (u32, u32) {
        self.fb.size()
    }
}

impl Drop for TerminalSurface {
    fn drop(&mut self) {
        let _ = self.end();
    }
}
