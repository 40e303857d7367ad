use crate::maze::Coord;

/// Errors surfaced by the maze core.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MazeError {
    /// A coordinate outside the maze was used where a cell was required.
    #[error("coordinate {coord:?} is out of bounds")]
    OutOfBounds { coord: Coord },

    /// Walls can only be removed between two cells sharing an edge.
    #[error("cannot remove a wall between non-adjacent cells {a:?} and {b:?}")]
    NonAdjacentWallRemoval { a: Coord, b: Coord },

    /// Path reconstruction was asked for a cell the search never reached.
    #[error("cell {coord:?} has no recorded parent")]
    MissingParent { coord: Coord },
}
