use std::{
    io::{Stdout, Write},
    sync::{
        atomic::{AtomicBool, Ordering},
        mpsc::Receiver,
    },
    time::{Duration, Instant},
};

use crossterm::{
    QueueableCommand, cursor, queue,
    style::{self, Attribute, Color, StyledContent, Stylize},
    terminal::{self, ClearType},
};

use crate::{
    app::AppEvent,
    maze::{Cell, Coord, Direction, GridEvent},
};

/// Longest uninterrupted sleep while holding a frame
const HOLD_SLICE: Duration = Duration::from_millis(20);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RendererStatus {
    Completed,
    Cancelled,
}

/// Draws grid events onto the terminal as they arrive.
///
/// Every maze cell occupies the odd positions of a `(2w + 1) x (2h + 1)` character grid,
/// with the walls in between. The renderer keeps its own copy of the cells so that a
/// passage can be colored from the state of both cells it joins.
pub struct Renderer {
    /// Standard output handle to write to the terminal
    stdout: Stdout,
    /// Current maze dimensions (width, height) in cells
    dims: Option<(u8, u8)>,
    cells: Vec<Cell>,
    /// Time to wait after drawing each grid event
    delay: Duration,
}

impl Renderer {
    /// Number of terminal rows used below the maze for the status line.
    pub const NUM_STATUS_ROWS: u16 = 2;

    pub fn new(delay: Duration) -> Self {
        Self {
            stdout: std::io::stdout(),
            dims: None,
            cells: Vec::new(),
            delay,
        }
    }

    /// Terminal columns and rows needed to draw a maze of the given size.
    pub fn required_size(width: u8, height: u8) -> (u16, u16) {
        (
            (width as u16 * 2 + 1) * Cell::CELL_WIDTH,
            height as u16 * 2 + 1 + Renderer::NUM_STATUS_ROWS,
        )
    }

    /// Row just below the status line, where text can be printed after rendering.
    pub fn bottom_row(&self) -> u16 {
        match self.dims {
            Some((_, height)) => height as u16 * 2 + 1 + Renderer::NUM_STATUS_ROWS,
            None => 0,
        }
    }

    fn screen_position(x: u16, y: u16) -> (u16, u16) {
        (x * Cell::CELL_WIDTH, y)
    }

    fn index(&self, coord: Coord) -> Option<usize> {
        let (width, height) = self.dims?;
        (coord.0 < width && coord.1 < height)
            .then(|| coord.1 as usize * width as usize + coord.0 as usize)
    }

    fn neighbor(&self, coord: Coord, direction: Direction) -> Option<Coord> {
        let (dx, dy) = direction.offset();
        let next = (
            coord.0.wrapping_add_signed(dx),
            coord.1.wrapping_add_signed(dy),
        );
        self.index(next).map(|_| next)
    }

    fn cell_glyph(&self, coord: Coord, cell: &Cell) -> StyledContent<&'static str> {
        let Some((width, height)) = self.dims else {
            return cell.glyph();
        };
        let goal = (width.saturating_sub(1), height.saturating_sub(1));
        match coord {
            _ if cell.is_solution() => cell.glyph(),
            (0, 0) => "🟩".with(Color::Green),
            c if c == goal => "🟥".with(Color::Red),
            _ => cell.glyph(),
        }
    }

    /// Glyph for the slot between `cell` and its neighbor in `direction`.
    fn wall_slot_glyph(
        &self,
        coord: Coord,
        cell: &Cell,
        direction: Direction,
    ) -> StyledContent<&'static str> {
        if cell.has_wall(direction) {
            return Cell::wall_glyph();
        }
        let other = self
            .neighbor(coord, direction)
            .and_then(|n| self.index(n))
            .map(|i| self.cells[i]);
        match other {
            Some(other) if cell.is_solution() && other.is_solution() => cell.glyph(),
            Some(other) if cell.is_visited() && other.is_visited() && !other.is_solution() => {
                other.glyph()
            }
            _ => "  ".with(Color::Reset),
        }
    }

    /// Prints a glyph at lattice position `(x, y)`.
    fn print_at(&mut self, x: u16, y: u16, glyph: StyledContent<&str>) -> std::io::Result<()> {
        #[cfg(debug_assertions)]
        {
            use unicode_width::UnicodeWidthStr;
            assert_eq!(
                glyph.content().width(),
                Cell::CELL_WIDTH as usize,
                "Each glyph must occupy exactly two character widths."
            );
        }
        let (sx, sy) = Renderer::screen_position(x, y);
        queue!(
            self.stdout,
            cursor::MoveTo(sx, sy),
            style::PrintStyledContent(glyph)
        )
    }

    /// Draws a cell and the four wall slots around it.
    fn draw_cell(&mut self, coord: Coord, cell: Cell) -> std::io::Result<()> {
        if let Some(i) = self.index(coord) {
            self.cells[i] = cell;
        }
        let (cx, cy) = (coord.0 as u16 * 2 + 1, coord.1 as u16 * 2 + 1);
        let glyph = self.cell_glyph(coord, &cell);
        self.print_at(cx, cy, glyph)?;
        for direction in Direction::ALL {
            let (dx, dy) = direction.offset();
            let slot = (
                (cx as i32 + dx as i32) as u16,
                (cy as i32 + dy as i32) as u16,
            );
            let glyph = self.wall_slot_glyph(coord, &cell, direction);
            self.print_at(slot.0, slot.1, glyph)?;
        }
        Ok(())
    }

    fn draw_initial(&mut self, cell: Cell, width: u8, height: u8) -> std::io::Result<()> {
        self.dims = Some((width, height));
        self.cells = vec![cell; width as usize * height as usize];
        queue!(self.stdout, terminal::Clear(ClearType::All), cursor::MoveTo(0, 0))?;
        for _y in 0..height as u16 * 2 + 1 {
            for _x in 0..width as u16 * 2 + 1 {
                self.stdout.queue(style::PrintStyledContent(Cell::wall_glyph()))?;
            }
            self.stdout.queue(style::Print("\r\n"))?;
        }
        for y in 0..height {
            for x in 0..width {
                self.draw_cell((x, y), cell)?;
            }
        }
        self.stdout.flush()
    }

    fn draw_status(&mut self, status: &str) -> std::io::Result<()> {
        let row = match self.dims {
            Some((_, height)) => height as u16 * 2 + 1,
            None => 0,
        };
        queue!(
            self.stdout,
            cursor::MoveTo(0, row),
            terminal::Clear(ClearType::CurrentLine),
            style::PrintStyledContent(
                status
                    .to_string()
                    .with(Color::Yellow)
                    .attribute(Attribute::Bold)
            )
        )?;
        self.stdout.flush()
    }

    /// Renders a single grid event to the terminal
    fn render_grid_event(&mut self, event: &GridEvent) -> std::io::Result<()> {
        match *event {
            GridEvent::Initial {
                cell,
                width,
                height,
            } => self.draw_initial(cell, width, height),
            GridEvent::Update { coord, new, .. } => {
                // Skip updates that arrive before the grid dimensions are known
                if self.dims.is_none() {
                    return Ok(());
                }
                self.draw_cell(coord, new)?;
                self.stdout.flush()
            }
        }
    }

    /// Sleeps for `duration` in short slices. Returns `false` as soon as `cancel` is raised.
    fn hold(duration: Duration, cancel: &AtomicBool) -> bool {
        let deadline = Instant::now() + duration;
        loop {
            if cancel.load(Ordering::Relaxed) {
                return false;
            }
            let now = Instant::now();
            if now >= deadline {
                return true;
            }
            std::thread::sleep(HOLD_SLICE.min(deadline - now));
        }
    }

    /// Render loop that processes events until the channel closes or the user cancels.
    /// Returns `Cancelled` if rendering was cut short.
    pub fn render(
        &mut self,
        event_rx: Receiver<AppEvent>,
        cancel: &AtomicBool,
        done: &AtomicBool,
    ) -> std::io::Result<RendererStatus> {
        queue!(self.stdout, terminal::Clear(ClearType::All), cursor::Hide)?;
        self.stdout.flush()?;

        // Block and wait for the next event
        while let Ok(event) = event_rx.recv() {
            if cancel.load(Ordering::Relaxed) {
                tracing::debug!("[render] cancelled, exiting render loop");
                return Ok(RendererStatus::Cancelled);
            }
            match event {
                AppEvent::Grid(grid_event) => {
                    self.render_grid_event(&grid_event)?;
                    // Sleep a bit to make the animation visible
                    std::thread::sleep(self.delay);
                }
                AppEvent::Status(status) => self.draw_status(&status)?,
                AppEvent::Hold(duration) => {
                    if !Renderer::hold(duration, cancel) {
                        tracing::debug!("[render] cancelled during hold");
                        return Ok(RendererStatus::Cancelled);
                    }
                }
            }
        }
        // Move cursor below the maze after exiting
        let row = self.bottom_row();
        queue!(self.stdout, cursor::MoveTo(0, row), cursor::Show)?;
        self.stdout.flush()?;
        done.store(true, Ordering::Relaxed);
        tracing::debug!("[render] event channel closed, render loop finished");
        Ok(RendererStatus::Completed)
    }
}
