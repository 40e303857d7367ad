use crossterm::style::{Color, StyledContent, Stylize};

use crate::maze::Direction;

/// Wall and flag state for one position of the maze.
///
/// A fresh cell has all four walls standing and every flag cleared. Mutation goes
/// through [`crate::maze::Maze`] so that every change is reported to the grid sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    /// Indexed by [`Direction::index`]: top, right, bottom, left.
    walls: [bool; 4],
    generated: bool,
    visited: bool,
    is_solution: bool,
}

impl Default for Cell {
    fn default() -> Self {
        Cell::WALLED
    }
}

impl Cell {
    /// A cell with all walls present and no flags set.
    pub const WALLED: Cell = Cell {
        walls: [true; 4],
        generated: false,
        visited: false,
        is_solution: false,
    };
    /// The width of each cell when rendered, in character widths.
    pub const CELL_WIDTH: u16 = 2;

    pub fn has_wall(&self, direction: Direction) -> bool {
        self.walls[direction.index()]
    }

    /// Whether the maze generator has carved into this cell.
    pub fn is_generated(&self) -> bool {
        self.generated
    }

    /// Whether the current search run has popped this cell from its frontier.
    pub fn is_visited(&self) -> bool {
        self.visited
    }

    /// Whether path reconstruction marked this cell as part of the solution.
    pub fn is_solution(&self) -> bool {
        self.is_solution
    }

    pub(crate) fn remove_wall(&mut self, direction: Direction) {
        self.walls[direction.index()] = false;
    }

    pub(crate) fn set_generated(&mut self, generated: bool) {
        self.generated = generated;
    }

    pub(crate) fn set_visited(&mut self, visited: bool) {
        self.visited = visited;
    }

    pub(crate) fn set_solution(&mut self, is_solution: bool) {
        self.is_solution = is_solution;
    }

    /// Clears the per-search flags, leaving walls and the generation flag untouched.
    pub(crate) fn clear_search_flags(&mut self) {
        self.visited = false;
        self.is_solution = false;
    }

    /// Terminal glyph for the cell interior.
    pub fn glyph(&self) -> StyledContent<&'static str> {
        if self.is_solution {
            "██".with(Color::Green)
        } else if self.visited {
            "░░".with(Color::Cyan)
        } else if self.generated {
            "  ".with(Color::Reset)
        } else {
            "▒▒".with(Color::DarkGrey)
        }
    }

    /// Terminal glyph for a standing wall or a wall corner.
    pub fn wall_glyph() -> StyledContent<&'static str> {
        "██".with(Color::Magenta)
    }
}
