/// Presentation layer: double-buffered, diff-based terminal renderer.
///
/// How it works:
///   1. Build the next frame into `front` buffer (array of Cell)
///   2. Compare each cell with `back` buffer (previous frame)
///   3. Only emit terminal commands for cells that changed
///   4. All commands are batched with `queue!`, flushed once at the end
///   5. Swap front/back
///
/// This eliminates flicker caused by full-screen redraws.
///
/// The screen is a centered three-row block: a status line (title and
/// best score), the play row (coin/clock prefix followed by the tile
/// window), and a key-help line. The rolling banner shown on the
/// title, game-over, and stage-clear screens lives here, not in the
/// simulation: it is pure presentation and keeps crawling even while
/// physics is suspended.

use std::io::{self, BufWriter, Write};

use crossterm::{
    cursor::{self, MoveTo},
    execute, queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{self, Clear, ClearType},
};

use crate::sim::view::{Scene, Snapshot};

// ── Cell: the unit of the back-buffer ──

#[derive(Clone, Copy, PartialEq, Eq)]
struct Cell {
    ch: [u8; 4], // one UTF-8 scalar (braille art, or an emoji like 💀)
    ch_len: u8,
    fg: Color,
    bg: Color,
    wide: bool, // true = this char occupies 2 terminal columns
    cont: bool, // true = continuation of previous wide char (skip render)
}

impl Cell {
    /// Explicit dark background for all "empty" terminal cells.
    ///
    /// On VTE-based Linux terminals (GNOME Terminal, etc.), the inter-row gap
    /// pixels use the background color from the last Clear or the terminal's
    /// configured default.  By using the SAME explicit RGB for both
    /// `Clear(ClearType::All)` and every cell's background, the gap color
    /// matches the cell color exactly, eliminating visible horizontal lines.
    const BASE_BG: Color = Color::Rgb { r: 22, g: 22, b: 35 };

    const BLANK: Cell = Cell {
        ch: [b' ', 0, 0, 0],
        ch_len: 1,
        fg: Color::White,
        bg: Cell::BASE_BG,
        wide: false,
        cont: false,
    };

    const WIDE_CONT: Cell = Cell {
        ch: [0; 4],
        ch_len: 0,
        fg: Color::White,
        bg: Cell::BASE_BG,
        wide: false,
        cont: true,
    };

    /// Sentinel cell used to invalidate the back buffer.
    /// Different from any real cell, so every position will be diff'd.
    const INVALID: Cell = Cell {
        ch: [b'?', 0, 0, 0],
        ch_len: 1,
        fg: Color::Magenta,
        bg: Color::Magenta,
        wide: false,
        cont: false,
    };

    /// Normalize bg: Color::Reset → BASE_BG so that every cell gets an
    /// explicit background color (never terminal-default).
    #[inline]
    fn norm_bg(bg: Color) -> Color {
        match bg {
            Color::Reset => Self::BASE_BG,
            other => other,
        }
    }

    fn from_char(c: char, fg: Color, bg: Color) -> Self {
        let mut cell = Self::BLANK;
        let len = c.encode_utf8(&mut cell.ch).len() as u8;
        cell.ch_len = len;
        cell.fg = fg;
        cell.bg = Self::norm_bg(bg);
        cell
    }

    fn from_char_wide(c: char, fg: Color, bg: Color) -> Self {
        let mut cell = Self::from_char(c, fg, bg);
        cell.wide = true;
        cell
    }

    fn as_str(&self) -> &str {
        if self.ch_len == 0 {
            return "";
        }
        unsafe { std::str::from_utf8_unchecked(&self.ch[..self.ch_len as usize]) }
    }
}

// ── FrameBuffer: a 2D grid of Cells ──

struct FrameBuffer {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl FrameBuffer {
    fn new(w: usize, h: usize) -> Self {
        FrameBuffer {
            width: w,
            height: h,
            cells: vec![Cell::BLANK; w * h],
        }
    }

    fn resize(&mut self, w: usize, h: usize) {
        if self.width != w || self.height != h {
            self.width = w;
            self.height = h;
            self.cells = vec![Cell::BLANK; w * h];
        }
    }

    fn clear(&mut self) {
        self.cells.fill(Cell::BLANK);
    }

    fn set(&mut self, x: usize, y: usize, cell: Cell) {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x] = cell;
        }
    }

    fn get(&self, x: usize, y: usize) -> Cell {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x]
        } else {
            Cell::BLANK
        }
    }

    /// Write a string at (x, y) with given colors. Each char occupies 1 column.
    fn put_str(&mut self, x: usize, y: usize, s: &str, fg: Color, bg: Color) {
        let mut cx = x;
        for ch in s.chars() {
            if cx >= self.width {
                break;
            }
            self.set(cx, y, Cell::from_char(ch, fg, bg));
            cx += 1;
        }
    }
}

// ── Renderer ──

/// Banner messages, braille-spaced so the text reads as part of the
/// strip it scrolls through.
const BANNER_TITLE: &str = "PRESS⠤UP⠤TO⠤START";
const BANNER_GAME_OVER: &str = "GAME⠤OVER⠤⠤⠤⠤⠤PRESS⠤R⠤TO⠤RESTART";
const BANNER_TIME_UP: &str = "TIME⠤UP⠤⠤⠤⠤PRESS⠤R⠤TO⠤RESTART";
const BANNER_CLEAR: &str = "STAGE⠤CLEAR⠤⠤⠤⠤⠤⚑⠤⠤⠤⠤⠤PRESS⠤R⠤TO⠤RESTART";

/// Banner crawl speed, cells per second.
const MARQUEE_SPEED: f32 = 6.0;

/// Terminal columns taken by the coin/clock prefix: 🟡 spans two,
/// everything else (NN ⠿ ⏱ NN) one each.
const HUD_COLS: usize = 8;

pub struct Renderer {
    writer: BufWriter<io::Stdout>,
    front: FrameBuffer,
    back: FrameBuffer,
    term_w: usize,
    term_h: usize,
    marquee_offset: f32,
}

impl Renderer {
    pub fn new() -> Self {
        Renderer {
            writer: BufWriter::with_capacity(16384, io::stdout()),
            front: FrameBuffer::new(0, 0),
            back: FrameBuffer::new(0, 0),
            term_w: 0,
            term_h: 0,
            marquee_offset: 0.0,
        }
    }

    pub fn init(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(
            self.writer,
            terminal::EnterAlternateScreen,
            cursor::Hide,
            SetBackgroundColor(Cell::BASE_BG),
            Clear(ClearType::All)
        )?;

        let (tw, th) = terminal::size().unwrap_or((80, 24));
        self.term_w = tw as usize;
        self.term_h = th as usize;
        self.front.resize(self.term_w, self.term_h);
        self.back.resize(self.term_w, self.term_h);
        // Force full repaint on first frame: back ≠ front for every cell.
        self.back.cells.fill(Cell::INVALID);

        Ok(())
    }

    pub fn cleanup(&mut self) -> io::Result<()> {
        execute!(
            self.writer,
            ResetColor,
            cursor::Show,
            terminal::LeaveAlternateScreen
        )?;
        terminal::disable_raw_mode()
    }

    pub fn render(&mut self, snap: &Snapshot, dt: f32) -> io::Result<()> {
        // The banner clock never pauses, whatever the session is doing.
        self.marquee_offset += MARQUEE_SPEED * dt;
        if self.marquee_offset > 1e9 {
            self.marquee_offset %= 1000.0;
        }

        // Detect terminal resize
        let (tw, th) = terminal::size().unwrap_or((80, 24));
        if tw as usize != self.term_w || th as usize != self.term_h {
            self.term_w = tw as usize;
            self.term_h = th as usize;
            self.front.resize(self.term_w, self.term_h);
            self.back.resize(self.term_w, self.term_h);
            // Force full repaint after resize.
            self.back.cells.fill(Cell::INVALID);
            queue!(
                self.writer,
                SetBackgroundColor(Cell::BASE_BG),
                Clear(ClearType::All)
            )?;
        }

        self.front.clear();
        self.compose(snap);
        self.flush_diff()?;

        // Swap: current front becomes next back
        std::mem::swap(&mut self.front, &mut self.back);

        Ok(())
    }

    // ── Diff flush: only write changed cells ──

    fn flush_diff(&mut self) -> io::Result<()> {
        let mut last_fg = Color::White;
        let mut last_bg = Cell::BASE_BG;
        let mut need_move = true;
        let mut last_x: usize = 0;
        let mut last_y: usize = 0;

        // Set explicit base colors at start of frame.
        // IMPORTANT: Do NOT use ResetColor here — it resets to the terminal's
        // native default, which may differ from BASE_BG and cause line artifacts.
        queue!(
            self.writer,
            SetForegroundColor(Color::White),
            SetBackgroundColor(Cell::BASE_BG),
        )?;

        for y in 0..self.front.height {
            let mut x = 0;
            while x < self.front.width {
                let cell = self.front.get(x, y);
                let prev = self.back.get(x, y);

                // Skip continuation cells (right half of wide emoji)
                if cell.cont {
                    if cell != prev {
                        need_move = true;
                    }
                    x += 1;
                    continue;
                }

                // For wide cells, also check if the continuation changed
                let cont_changed = cell.wide
                    && x + 1 < self.front.width
                    && self.front.get(x + 1, y) != self.back.get(x + 1, y);

                if cell == prev && !cont_changed {
                    need_move = true;
                    x += 1;
                    continue;
                }

                // Position cursor if needed
                if need_move || x != last_x + 1 || y != last_y {
                    queue!(self.writer, MoveTo(x as u16, y as u16))?;
                    need_move = false;
                }

                // Set colors only if changed
                if cell.fg != last_fg {
                    queue!(self.writer, SetForegroundColor(cell.fg))?;
                    last_fg = cell.fg;
                }
                if cell.bg != last_bg {
                    queue!(self.writer, SetBackgroundColor(cell.bg))?;
                    last_bg = cell.bg;
                }

                queue!(self.writer, Print(cell.as_str()))?;

                if cell.wide {
                    // Wide char printed: cursor advanced 2 columns
                    last_x = x + 1;
                    x += 2; // skip the continuation cell
                } else {
                    last_x = x;
                    x += 1;
                }
                last_y = y;
            }
        }

        self.writer.flush()
    }

    // ── Compose: build front buffer content ──

    fn compose(&mut self, snap: &Snapshot) {
        let scene_w = snap.cells.len();
        let total_w = HUD_COLS + scene_w;
        let x0 = self.term_w.saturating_sub(total_w) / 2;
        let mid = self.term_h / 2;
        let status_row = mid.saturating_sub(2);
        let strip_row = mid;
        let help_row = mid + 2;

        // ── Status line: title left, best score right ──
        self.front.put_str(
            x0,
            status_row,
            "PIPELINE PANIC",
            Color::Rgb { r: 255, g: 200, b: 50 },
            Color::Reset,
        );
        let best = format!("BEST {:02}", snap.best % 100);
        let bx = (x0 + total_w).saturating_sub(best.chars().count());
        self.front.put_str(bx, status_row, &best, Color::DarkGrey, Color::Reset);

        // ── Play row: coin/clock prefix, then the strip ──
        let mut x = x0;
        self.front
            .set(x, strip_row, Cell::from_char_wide('🟡', Color::Reset, Color::Reset));
        self.front.set(x + 1, strip_row, Cell::WIDE_CONT);
        x += 2;
        let coins = format!("{:02}", snap.coins % 100);
        self.front.put_str(x, strip_row, &coins, Color::White, Color::Reset);
        x += 2;
        self.front
            .set(x, strip_row, Cell::from_char('⠿', Color::DarkGrey, Color::Reset));
        x += 1;
        self.front
            .set(x, strip_row, Cell::from_char('⏱', Color::White, Color::Reset));
        x += 1;
        let clock = format!("{:02}", snap.time_left % 100);
        self.front.put_str(x, strip_row, &clock, Color::White, Color::Reset);
        x += 2;

        self.compose_strip(snap, x, strip_row);

        // ── Help line ──
        let help = help_text(snap);
        let hx = x0 + total_w.saturating_sub(help.chars().count()) / 2;
        self.front.put_str(hx, help_row, &help, Color::DarkGrey, Color::Reset);
    }

    /// Write the tile window at (x, row), banner overlaid to the right
    /// of the player when the session is on a banner screen.
    fn compose_strip(&mut self, snap: &Snapshot, x: usize, row: usize) {
        let mut cells = snap.cells.clone();

        // Overlay the rolled banner into the strip cells. The overlay is
        // cut at the window edge, never wrapped.
        let mut banner = (cells.len(), cells.len());
        if let Some(msg) = banner_text(snap.scene) {
            let rolled = self.rolled_banner(msg, cells.len());
            // The skull is double-width; start past its right half.
            let gap = if cells.get(snap.player_col) == Some(&'💀') { 2 } else { 1 };
            let start = (snap.player_col + gap).min(cells.len());
            let avail = cells.len() - start;
            let n = rolled.len().min(avail);
            cells[start..start + n].copy_from_slice(&rolled[..n]);
            banner = (start, start + n);
        }

        let mut i = 0;
        while i < cells.len() {
            let col = x + i;
            if col >= self.front.width {
                break;
            }
            let c = cells[i];
            if c == '💀' {
                self.front
                    .set(col, row, Cell::from_char_wide(c, Color::Reset, Color::Reset));
                self.front.set(col + 1, row, Cell::WIDE_CONT);
                i += 2; // emoji covers the neighbouring column too
                continue;
            }
            let fg = if i >= banner.0 && i < banner.1 {
                Color::Rgb { r: 255, g: 220, b: 120 }
            } else {
                scene_fg(c, i == snap.player_col, snap.underground)
            };
            self.front.set(col, row, Cell::from_char(c, fg, Color::Reset));
            i += 1;
        }
    }

    /// The banner is the message plus half a window of filler, rotated
    /// left by the running offset so the text crawls through the strip.
    fn rolled_banner(&self, msg: &str, width: usize) -> Vec<char> {
        let mut base: Vec<char> = msg.chars().collect();
        base.extend(std::iter::repeat('⠤').take(width / 2));
        let k = (self.marquee_offset as usize) % base.len();
        base.rotate_left(k);
        base
    }
}

fn banner_text(scene: Scene) -> Option<&'static str> {
    match scene {
        Scene::Title => Some(BANNER_TITLE),
        Scene::GameOver { timed_out: true } => Some(BANNER_TIME_UP),
        Scene::GameOver { timed_out: false } => Some(BANNER_GAME_OVER),
        Scene::Cleared => Some(BANNER_CLEAR),
        Scene::Playing => None,
    }
}

fn help_text(snap: &Snapshot) -> String {
    match snap.scene {
        Scene::Title => format!("{} · Press UP to start", snap.level_name),
        Scene::Playing => {
            String::from("Arrows run · UP jumps · DOWN enters pipes · R restarts · Q quits")
        }
        Scene::GameOver { timed_out: true } => String::from("Time Up · Press R to restart"),
        Scene::GameOver { timed_out: false } => String::from("Game Over · Press R to restart"),
        Scene::Cleared => String::from("Stage Clear · Press R to restart"),
    }
}

/// Foreground for one strip cell. The player cell wins over tile
/// coloring so the eye can always find it; enemies stay red even when
/// the player overlaps one mid-air.
fn scene_fg(c: char, is_player_cell: bool, underground: bool) -> Color {
    match c {
        'o' | 'ȯ' => Color::Rgb { r: 235, g: 95, b: 60 },
        _ if is_player_cell => Color::White,
        '⠥' => Color::Rgb { r: 255, g: 210, b: 60 },
        '⚑' => Color::Rgb { r: 255, g: 85, b: 70 },
        '_' => Color::DarkGrey,
        '⠿' => Color::Rgb { r: 150, g: 120, b: 200 },
        '⠶' | '⠭' | '⠯' | '⠬' | '⠴' | '⠲' => Color::Rgb { r: 90, g: 220, b: 100 },
        _ if underground => Color::Rgb { r: 110, g: 150, b: 220 },
        _ => Color::Rgb { r: 210, g: 150, b: 80 },
    }
}
