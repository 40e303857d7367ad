pub mod cell;
pub mod grid;

pub use cell::Cell;
pub use grid::{GridEvent, GridSink};

use crate::error::MazeError;
use grid::Grid;

/// Cell coordinate as `(x, y)`, with `x` the column and `y` the row.
pub type Coord = (u8, u8);

/// The four sides of a cell, in the fixed order used for neighbor enumeration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Top,
    Right,
    Bottom,
    Left,
}

impl Direction {
    /// Enumeration order for every neighbor query: top, right, bottom, left.
    pub const ALL: [Direction; 4] = [
        Direction::Top,
        Direction::Right,
        Direction::Bottom,
        Direction::Left,
    ];

    pub fn opposite(self) -> Direction {
        match self {
            Direction::Top => Direction::Bottom,
            Direction::Right => Direction::Left,
            Direction::Bottom => Direction::Top,
            Direction::Left => Direction::Right,
        }
    }

    pub(crate) fn index(self) -> usize {
        self as usize
    }

    /// Unit step `(dx, dy)` for this direction, with `y` growing downwards.
    pub fn offset(self) -> (i8, i8) {
        match self {
            Direction::Top => (0, -1),
            Direction::Right => (1, 0),
            Direction::Bottom => (0, 1),
            Direction::Left => (-1, 0),
        }
    }

    /// Direction leading from `from` to `to`, if the two cells share an edge.
    pub fn between(from: Coord, to: Coord) -> Option<Direction> {
        let dx = to.0 as i16 - from.0 as i16;
        let dy = to.1 as i16 - from.1 as i16;
        match (dx, dy) {
            (0, -1) => Some(Direction::Top),
            (1, 0) => Some(Direction::Right),
            (0, 1) => Some(Direction::Bottom),
            (-1, 0) => Some(Direction::Left),
            _ => None,
        }
    }
}

/// A fixed-size rectangular maze of walled cells.
///
/// Walls are always removed in pairs: the side of a cell facing a neighbor is open
/// exactly when the neighbor's side facing back is open.
pub struct Maze {
    grid: Grid,
}

impl Maze {
    /// Creates a maze with every wall standing and every flag cleared.
    pub fn new(width: u8, height: u8) -> Self {
        Maze {
            grid: Grid::new(width, height, Cell::WALLED, None),
        }
    }

    /// Creates a maze that reports every cell change to `sink`.
    pub fn with_sink<S>(width: u8, height: u8, sink: S) -> Self
    where
        S: GridSink + Send + 'static,
    {
        Maze {
            grid: Grid::new(width, height, Cell::WALLED, Some(Box::new(sink))),
        }
    }

    /// Returns the height of the maze in cells.
    pub fn height(&self) -> u8 {
        self.grid.height()
    }

    /// Returns the width of the maze in cells.
    pub fn width(&self) -> u8 {
        self.grid.width()
    }

    /// Checks if the maze has no cells at all.
    pub fn is_empty(&self) -> bool {
        self.width() == 0 || self.height() == 0
    }

    /// Number of cells in the maze.
    pub fn len(&self) -> usize {
        self.grid.data.len()
    }

    /// The top-left corner, where generation and every search start.
    pub fn start(&self) -> Coord {
        (0, 0)
    }

    /// The bottom-right corner, the goal of every search.
    pub fn goal(&self) -> Coord {
        (self.width().saturating_sub(1), self.height().saturating_sub(1))
    }

    /// Checks if the given coordinate is within the bounds of the maze.
    pub fn is_in_bounds(&self, coord: Coord) -> bool {
        coord.0 < self.width() && coord.1 < self.height()
    }

    /// Returns the cell at `coord`, or `None` when it lies outside the maze.
    pub fn cell(&self, coord: Coord) -> Option<&Cell> {
        self.is_in_bounds(coord).then(|| &self.grid[coord])
    }

    /// Like [`Maze::cell`], but reports out-of-bounds coordinates as an error.
    pub fn try_cell(&self, coord: Coord) -> Result<&Cell, MazeError> {
        self.cell(coord).ok_or(MazeError::OutOfBounds { coord })
    }

    /// Iterates over every coordinate, row by row.
    pub fn coords(&self) -> impl Iterator<Item = Coord> + use<> {
        let (width, height) = (self.width(), self.height());
        (0..height).flat_map(move |y| (0..width).map(move |x| (x, y)))
    }

    /// Coordinate one step from `coord` in `direction`, if it is inside the maze.
    pub fn neighbor(&self, coord: Coord, direction: Direction) -> Option<Coord> {
        if !self.is_in_bounds(coord) {
            return None;
        }
        let (dx, dy) = direction.offset();
        // NOTE: wrapping_add_signed turns 0 - 1 into u8::MAX, which the bounds check
        // rejects because the largest dimension is u8::MAX.
        let next = (
            coord.0.wrapping_add_signed(dx),
            coord.1.wrapping_add_signed(dy),
        );
        self.is_in_bounds(next).then_some(next)
    }

    /// In-bounds neighbors of `coord` with their direction, in top, right, bottom, left order.
    pub fn neighbors(&self, coord: Coord) -> impl Iterator<Item = (Direction, Coord)> + '_ {
        Direction::ALL
            .into_iter()
            .filter_map(move |d| self.neighbor(coord, d).map(|n| (d, n)))
    }

    /// Neighbors the generator has not carved into yet.
    pub fn unvisited_topology_neighbors(&self, coord: Coord) -> Vec<Coord> {
        self.neighbors(coord)
            .filter(|&(_, n)| !self.grid[n].is_generated())
            .map(|(_, n)| n)
            .collect()
    }

    /// Neighbors reachable through an open wall pair that the current search has not visited.
    pub fn open_search_neighbors(&self, coord: Coord) -> Vec<Coord> {
        self.neighbors(coord)
            .filter(|&(d, n)| self.has_passage(coord, d) && !self.grid[n].is_visited())
            .map(|(_, n)| n)
            .collect()
    }

    /// Whether both sides of the wall between `coord` and its neighbor in `direction` are open.
    pub fn has_passage(&self, coord: Coord, direction: Direction) -> bool {
        match self.neighbor(coord, direction) {
            Some(n) => {
                !self.grid[coord].has_wall(direction)
                    && !self.grid[n].has_wall(direction.opposite())
            }
            None => false,
        }
    }

    /// Removes the wall between two adjacent cells on both sides.
    ///
    /// # Panics
    /// If `a` and `b` are not adjacent cells of this maze.
    pub fn remove_wall_pair(&mut self, a: Coord, b: Coord) {
        if let Err(e) = self.try_remove_wall_pair(a, b) {
            panic!("{}", e);
        }
    }

    /// Removes the wall between two adjacent cells on both sides, or reports why it cannot.
    pub fn try_remove_wall_pair(&mut self, a: Coord, b: Coord) -> Result<(), MazeError> {
        self.try_cell(a)?;
        self.try_cell(b)?;
        let direction =
            Direction::between(a, b).ok_or(MazeError::NonAdjacentWallRemoval { a, b })?;
        self.grid.update(a, |cell| cell.remove_wall(direction));
        self.grid
            .update(b, |cell| cell.remove_wall(direction.opposite()));
        Ok(())
    }

    /// Marks `coord` as carved by the generator. `coord` must be inside the maze.
    pub(crate) fn set_generated(&mut self, coord: Coord) {
        self.grid.update(coord, |cell| cell.set_generated(true));
    }

    /// Marks `coord` as popped by the current search. `coord` must be inside the maze.
    pub(crate) fn set_visited(&mut self, coord: Coord) {
        self.grid.update(coord, |cell| cell.set_visited(true));
    }

    /// Marks `coord` as part of the reconstructed path. `coord` must be inside the maze.
    pub(crate) fn set_solution(&mut self, coord: Coord) {
        self.grid.update(coord, |cell| cell.set_solution(true));
    }

    /// Restores every wall and clears every flag, ready for a fresh generation.
    pub fn reset_generation(&mut self) {
        for coord in self.coords() {
            self.grid.update(coord, |cell| *cell = Cell::WALLED);
        }
    }

    /// Clears `visited` and `is_solution` on every cell. Must run before each search.
    pub fn reset_search(&mut self) {
        for coord in self.coords() {
            self.grid.update(coord, Cell::clear_search_flags);
        }
    }

    /// Number of open wall pairs, counting each shared wall once.
    pub fn passage_count(&self) -> usize {
        self.coords()
            .map(|c| {
                [Direction::Right, Direction::Bottom]
                    .into_iter()
                    .filter(|&d| self.has_passage(c, d))
                    .count()
            })
            .sum()
    }

    /// Number of cells the current search has visited.
    pub fn visited_count(&self) -> usize {
        self.grid.data.iter().filter(|c| c.is_visited()).count()
    }
}

impl std::ops::Index<Coord> for Maze {
    type Output = Cell;

    fn index(&self, index: Coord) -> &Self::Output {
        &self.grid[index]
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Checks that every shared wall is either open on both sides or closed on both.
    pub(crate) fn assert_wall_symmetry(maze: &Maze) {
        for coord in maze.coords() {
            for (d, n) in maze.neighbors(coord) {
                assert_eq!(
                    maze[coord].has_wall(d),
                    maze[n].has_wall(d.opposite()),
                    "asymmetric wall between {:?} and {:?}",
                    coord,
                    n
                );
            }
        }
    }

    #[test]
    fn test_maze_indexing() {
        let mut maze = Maze::new(5, 5);
        maze.set_visited((2, 3));
        assert!(maze[(2, 3)].is_visited());
        assert!(!maze[(3, 2)].is_visited());
    }

    #[test]
    fn test_out_of_bounds() {
        let maze = Maze::new(5, 4);
        assert!(maze.cell((5, 0)).is_none());
        assert!(maze.cell((0, 4)).is_none());
        assert!(maze.cell((4, 3)).is_some());
        assert_eq!(
            maze.try_cell((7, 7)),
            Err(MazeError::OutOfBounds { coord: (7, 7) })
        );
    }

    #[test]
    fn test_neighbors_order_and_bounds() {
        let maze = Maze::new(3, 3);
        let center = maze.neighbors((1, 1)).map(|(_, c)| c).collect::<Vec<_>>();
        assert_eq!(center, vec![(1, 0), (2, 1), (1, 2), (0, 1)]);
        let corner = maze.neighbors((0, 0)).map(|(_, c)| c).collect::<Vec<_>>();
        assert_eq!(corner, vec![(1, 0), (0, 1)]);
        let far_corner = maze.neighbors((2, 2)).map(|(_, c)| c).collect::<Vec<_>>();
        assert_eq!(far_corner, vec![(2, 1), (1, 2)]);
    }

    #[test]
    fn test_neighbors_at_max_dimension() {
        let maze = Maze::new(u8::MAX, 1);
        let edge = maze.neighbors((254, 0)).map(|(_, c)| c).collect::<Vec<_>>();
        assert_eq!(edge, vec![(253, 0)]);
    }

    #[test]
    fn test_unvisited_topology_neighbors() {
        let mut maze = Maze::new(3, 3);
        maze.set_generated((1, 0));
        maze.set_generated((0, 1));
        assert_eq!(maze.unvisited_topology_neighbors((1, 1)), vec![(2, 1), (1, 2)]);
        assert!(maze.unvisited_topology_neighbors((0, 0)).is_empty());
    }

    #[test]
    fn test_remove_wall_pair_is_symmetric() {
        let mut maze = Maze::new(3, 3);
        maze.remove_wall_pair((1, 1), (1, 0));
        maze.remove_wall_pair((1, 1), (2, 1));
        assert!(!maze[(1, 1)].has_wall(Direction::Top));
        assert!(!maze[(1, 0)].has_wall(Direction::Bottom));
        assert!(!maze[(1, 1)].has_wall(Direction::Right));
        assert!(!maze[(2, 1)].has_wall(Direction::Left));
        assert!(maze[(1, 1)].has_wall(Direction::Bottom));
        assert_wall_symmetry(&maze);
        assert_eq!(maze.passage_count(), 2);
    }

    #[test]
    fn test_open_search_neighbors() {
        let mut maze = Maze::new(3, 3);
        maze.remove_wall_pair((1, 1), (0, 1));
        maze.remove_wall_pair((1, 1), (1, 2));
        maze.remove_wall_pair((1, 1), (1, 0));
        assert_eq!(
            maze.open_search_neighbors((1, 1)),
            vec![(1, 0), (1, 2), (0, 1)]
        );
        maze.set_visited((1, 2));
        assert_eq!(maze.open_search_neighbors((1, 1)), vec![(1, 0), (0, 1)]);
    }

    #[test]
    fn test_try_remove_non_adjacent() {
        let mut maze = Maze::new(3, 3);
        assert_eq!(
            maze.try_remove_wall_pair((0, 0), (1, 1)),
            Err(MazeError::NonAdjacentWallRemoval {
                a: (0, 0),
                b: (1, 1)
            })
        );
        assert_eq!(
            maze.try_remove_wall_pair((0, 0), (0, 0)),
            Err(MazeError::NonAdjacentWallRemoval {
                a: (0, 0),
                b: (0, 0)
            })
        );
        assert_eq!(
            maze.try_remove_wall_pair((2, 2), (3, 2)),
            Err(MazeError::OutOfBounds { coord: (3, 2) })
        );
        assert_eq!(maze.passage_count(), 0);
    }

    #[test]
    #[should_panic(expected = "non-adjacent")]
    fn test_remove_wall_pair_panics_on_non_adjacent() {
        let mut maze = Maze::new(4, 4);
        maze.remove_wall_pair((0, 0), (2, 0));
    }

    #[test]
    fn test_resets() {
        let mut maze = Maze::new(2, 2);
        maze.remove_wall_pair((0, 0), (1, 0));
        maze.set_generated((0, 0));
        maze.set_visited((0, 0));
        maze.set_solution((0, 0));

        maze.reset_search();
        assert!(!maze[(0, 0)].is_visited());
        assert!(!maze[(0, 0)].is_solution());
        assert!(maze[(0, 0)].is_generated());
        assert_eq!(maze.passage_count(), 1);

        maze.reset_generation();
        assert!(!maze[(0, 0)].is_generated());
        assert_eq!(maze.passage_count(), 0);
        assert!(maze.coords().all(|c| maze[c] == Cell::WALLED));
    }

    #[test]
    fn test_corners() {
        let maze = Maze::new(24, 18);
        assert_eq!(maze.start(), (0, 0));
        assert_eq!(maze.goal(), (23, 17));
        assert_eq!(maze.len(), 24 * 18);
        assert_eq!(maze.coords().count(), maze.len());
    }

    #[test]
    fn test_sink_sees_wall_removal_on_both_cells() {
        let (tx, rx) = std::sync::mpsc::channel::<GridEvent>();
        let mut maze = Maze::with_sink(2, 1, tx);
        maze.remove_wall_pair((0, 0), (1, 0));
        let updated = rx
            .try_iter()
            .filter_map(|e| match e {
                GridEvent::Update { coord, .. } => Some(coord),
                GridEvent::Initial { .. } => None,
            })
            .collect::<Vec<_>>();
        assert_eq!(updated, vec![(0, 0), (1, 0)]);
    }
}
