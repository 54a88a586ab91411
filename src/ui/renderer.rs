/// Presentation layer: double-buffered, diff-based terminal renderer.
///
/// How it works:
///   1. Build the next frame into `front` buffer (a grid of Cells)
///   2. Compare each cell with `back` buffer (previous frame)
///   3. Only emit terminal commands for cells that changed
///   4. All commands are batched with `queue!`, flushed once at the end
///   5. Swap front/back
///
/// This eliminates flicker caused by full-screen redraws. The renderer
/// only reads session state; it never mutates the simulation.

use std::io::{self, BufWriter, Write};

use crossterm::{
    cursor::{self, MoveTo},
    execute, queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{self, Clear, ClearType},
};

use crate::domain::agent::{Direction, PursuerId};
use crate::domain::grid::{Item, Pos, CELL_SIZE, HALF_CELL};
use crate::sim::session::{Outcome, Session};

use super::effects::Effects;

// ── Palette ──

const CYBER_BLUE: Color = Color::Rgb { r: 0, g: 255, b: 255 };
const NEON_PINK: Color = Color::Rgb { r: 255, g: 0, b: 255 };
const NEON_YELLOW: Color = Color::Rgb { r: 255, g: 255, b: 0 };
const NEON_PURPLE: Color = Color::Rgb { r: 128, g: 0, b: 255 };
const TERMINAL_GREEN: Color = Color::Rgb { r: 0, g: 255, b: 64 };
const DOT_COLOR: Color = Color::White;

fn pursuer_color(id: PursuerId) -> Color {
    match id {
        PursuerId::Red => Color::Rgb { r: 255, g: 0, b: 0 },
        PursuerId::Green => Color::Rgb { r: 0, g: 255, b: 0 },
        PursuerId::Pink => Color::Rgb { r: 255, g: 192, b: 203 },
        PursuerId::Magenta => NEON_PINK,
    }
}

// ── Cell: the unit of the back-buffer ──

#[derive(Clone, Copy, PartialEq, Eq)]
struct Cell {
    ch: char,
    fg: Color,
    bg: Color,
}

impl Cell {
    /// Explicit near-black background for every cell. Using the same color
    /// for Clear and cells keeps inter-row gap pixels seamless on
    /// VTE-based terminals.
    const BASE_BG: Color = Color::Rgb { r: 0, g: 0, b: 20 };

    const BLANK: Cell = Cell { ch: ' ', fg: Color::White, bg: Cell::BASE_BG };

    /// Sentinel used to invalidate the back buffer: differs from any real
    /// cell, so every position gets diff'd on the next frame.
    const INVALID: Cell = Cell { ch: '?', fg: Color::Magenta, bg: Color::Magenta };

    fn new(ch: char, fg: Color) -> Self {
        Cell { ch, fg, bg: Cell::BASE_BG }
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
        FrameBuffer { width: w, height: h, cells: vec![Cell::BLANK; w * h] }
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

    /// Write a string at (x, y); each char occupies one column.
    fn put_str(&mut self, x: usize, y: usize, s: &str, fg: Color) {
        for (i, ch) in s.chars().enumerate() {
            self.set(x + i, y, Cell::new(ch, fg));
        }
    }
}

// ── Renderer ──

/// Each maze cell spans 2 terminal columns and 1 row.
const CELL_W: usize = 2;
/// Top-left corner of the maze on screen.
const MAP_COL: usize = 1;
const MAP_ROW: usize = 1;

pub struct Renderer {
    writer: BufWriter<io::Stdout>,
    front: FrameBuffer,
    back: FrameBuffer,
    term_w: usize,
    term_h: usize,
    last_outcome: Option<Outcome>,
}

impl Renderer {
    pub fn new() -> Self {
        Renderer {
            writer: BufWriter::with_capacity(16384, io::stdout()),
            front: FrameBuffer::new(0, 0),
            back: FrameBuffer::new(0, 0),
            term_w: 0,
            term_h: 0,
            last_outcome: None,
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
        self.back.cells.fill(Cell::INVALID);

        Ok(())
    }

    pub fn cleanup(&mut self) -> io::Result<()> {
        execute!(self.writer, ResetColor, cursor::Show, terminal::LeaveAlternateScreen)?;
        terminal::disable_raw_mode()
    }

    /// Force a full repaint on the next frame (screen-mode switches).
    pub fn invalidate(&mut self) {
        self.back.cells.fill(Cell::INVALID);
    }

    // ── Game frame ──

    pub fn render(&mut self, session: &Session, effects: &Effects, now_ms: u64) -> io::Result<()> {
        self.sync_terminal_size()?;

        if self.last_outcome != Some(session.outcome) {
            self.invalidate();
            self.last_outcome = Some(session.outcome);
        }

        self.front.clear();
        self.compose_board(session, now_ms);
        self.compose_hud(session);
        match session.outcome {
            Outcome::GameOver => self.compose_overlay(session, "GAME OVER", "[R] RESTART"),
            Outcome::Victory => self.compose_overlay(session, "YOU WON!", "[R] PLAY AGAIN"),
            Outcome::Playing => {}
        }
        self.compose_effects(effects);

        self.flush_diff()
    }

    /// The pre-session level-select screen.
    pub fn render_menu(&mut self, names: &[String], cursor: usize) -> io::Result<()> {
        self.sync_terminal_size()?;
        self.last_outcome = None;

        self.front.clear();
        let cx = self.term_w / 2;
        self.front.put_str(cx.saturating_sub(8), 2, "MAINFRAME ACCESS", CYBER_BLUE);
        self.front.put_str(cx.saturating_sub(6), 4, "SELECT LEVEL", NEON_PINK);

        for (i, name) in names.iter().enumerate() {
            let row = 7 + i * 2;
            let color = if i == cursor { NEON_PURPLE } else { NEON_PINK };
            let marker = if i == cursor { '>' } else { ' ' };
            let label = format!("{} {}. {}", marker, i + 1, name);
            self.front.put_str(cx.saturating_sub(10), row, &label, color);
        }

        self.front.put_str(
            cx.saturating_sub(18),
            8 + names.len() * 2,
            "[1-3] or arrows + ENTER    [ESC] quit",
            CYBER_BLUE,
        );

        self.flush_diff()
    }

    // ── Composition ──

    fn sync_terminal_size(&mut self) -> io::Result<()> {
        let (tw, th) = terminal::size().unwrap_or((80, 24));
        if tw as usize != self.term_w || th as usize != self.term_h {
            self.term_w = tw as usize;
            self.term_h = th as usize;
            self.front.resize(self.term_w, self.term_h);
            self.back.resize(self.term_w, self.term_h);
            self.invalidate();
            queue!(self.writer, SetBackgroundColor(Cell::BASE_BG), Clear(ClearType::All))?;
        }
        Ok(())
    }

    /// Project a world position onto terminal (col, row). Horizontal
    /// resolution is half a cell, so sub-cell motion stays visible.
    fn project(pos: Pos) -> (usize, usize) {
        let col = MAP_COL + (pos.x / HALF_CELL) as usize;
        let row = MAP_ROW + (pos.y / CELL_SIZE) as usize;
        (col, row)
    }

    fn compose_board(&mut self, session: &Session, now_ms: u64) {
        let maze = session.maze();

        for cy in 0..maze.height() {
            for cx in 0..maze.width() {
                let col = MAP_COL + cx * CELL_W;
                let row = MAP_ROW + cy;
                if !maze.is_open(cx as i32, cy as i32) {
                    self.front.set(col, row, Cell::new('█', CYBER_BLUE));
                    self.front.set(col + 1, row, Cell::new('█', CYBER_BLUE));
                } else {
                    match session.items.item_at(cx, cy) {
                        Some(Item::Pellet) => {
                            self.front.set(col + 1, row, Cell::new('·', DOT_COLOR));
                        }
                        Some(Item::PowerPellet) => {
                            self.front.set(col + 1, row, Cell::new('●', NEON_PINK));
                        }
                        None => {}
                    }
                }
            }
        }

        // Pursuers under the player so a capture frame shows the player.
        for pursuer in &session.pursuers {
            let (col, row) = Self::project(pursuer.pos);
            let color = if pursuer.fleeing {
                // Flash between blue and white while fleeing.
                if now_ms % 200 < 100 {
                    Color::White
                } else {
                    Color::Blue
                }
            } else {
                pursuer_color(pursuer.id)
            };
            self.front.set(col, row, Cell::new('M', color));
        }

        let player = &session.player;
        let glyph = match player.heading {
            Some(Direction::Right) => '>',
            Some(Direction::Down) => 'v',
            Some(Direction::Left) => '<',
            Some(Direction::Up) => '^',
            None => 'C',
        };
        let color = if player.power_mode { CYBER_BLUE } else { NEON_YELLOW };
        let (col, row) = Self::project(player.pos);
        self.front.set(col, row, Cell::new(glyph, color));
    }

    fn compose_effects(&mut self, effects: &Effects) {
        for p in effects.particles() {
            if p.x < 0.0 || p.y < 0.0 {
                continue;
            }
            let (col, row) = Self::project(Pos::new(p.x, p.y));
            self.front.set(col, row, Cell::new(p.glyph, p.color));
        }
    }

    fn compose_hud(&mut self, session: &Session) {
        let row = MAP_ROW + session.maze().height() + 1;
        let credits = format!("CREDITS: {}", session.player.score);
        self.front.put_str(MAP_COL, row, &credits, TERMINAL_GREEN);

        let mut cores = String::from("BIO-CORES: ");
        for _ in 0..session.player.lives {
            cores.push('●');
        }
        self.front.put_str(MAP_COL + 18, row, &cores, NEON_PURPLE);

        let sector = format!(
            "SECTOR: 0x{:02X} {}",
            session.level_index() + 1,
            session.level().name
        );
        self.front.put_str(MAP_COL + 34, row, &sector, CYBER_BLUE);
    }

    fn compose_overlay(&mut self, session: &Session, title: &str, hint: &str) {
        let maze_w = session.maze().width() * CELL_W;
        let cx = MAP_COL + maze_w / 2;
        let cy = MAP_ROW + session.maze().height() / 2;

        let score = format!("FINAL SCORE: {}", session.player.score);
        self.front.put_str(cx - title.chars().count() / 2, cy - 2, title, NEON_PINK);
        self.front.put_str(cx - score.chars().count() / 2, cy, &score, CYBER_BLUE);
        self.front.put_str(cx - hint.chars().count() / 2, cy + 2, hint, NEON_YELLOW);
    }

    // ── Diff flush: only write changed cells ──

    fn flush_diff(&mut self) -> io::Result<()> {
        let mut last_fg = Color::White;
        let mut last_bg = Cell::BASE_BG;
        let mut cursor_at: Option<(usize, usize)> = None;

        // Explicit base colors at frame start; ResetColor would fall back
        // to the terminal default and cause artifacts.
        queue!(
            self.writer,
            SetForegroundColor(last_fg),
            SetBackgroundColor(last_bg)
        )?;

        for y in 0..self.front.height {
            for x in 0..self.front.width {
                let cell = self.front.get(x, y);
                if cell == self.back.get(x, y) {
                    continue;
                }
                if cursor_at != Some((x, y)) {
                    queue!(self.writer, MoveTo(x as u16, y as u16))?;
                }
                if cell.fg != last_fg {
                    queue!(self.writer, SetForegroundColor(cell.fg))?;
                    last_fg = cell.fg;
                }
                if cell.bg != last_bg {
                    queue!(self.writer, SetBackgroundColor(cell.bg))?;
                    last_bg = cell.bg;
                }
                queue!(self.writer, Print(cell.ch))?;
                cursor_at = Some((x + 1, y));
            }
        }

        self.writer.flush()?;
        std::mem::swap(&mut self.front, &mut self.back);
        Ok(())
    }
}
