//! Error types for maze construction and path compilation

use thiserror::Error;

use crate::grid::Coord;

/// Reasons a maze text cannot be turned into a [`GridMaze`](crate::GridMaze)
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MazeError {
    #[error("maze has no rows")]
    Empty,

    /// All rows must share the width of the first row.
    #[error("row {row} has length {len}, expected {expected}")]
    RaggedRow {
        row: usize,
        len: usize,
        expected: usize,
    },

    #[error("no start cell found in maze")]
    MissingStart,

    #[error("no end cell found in maze")]
    MissingEnd,

    #[error("multiple start cells found: {first} and {second}")]
    DuplicateStart { first: Coord, second: Coord },

    #[error("multiple end cells found: {first} and {second}")]
    DuplicateEnd { first: Coord, second: Coord },
}

/// Reasons a coordinate sequence cannot be compiled into instructions
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CompileError {
    #[error("path needs at least 2 coordinates, got {len}")]
    TooShort { len: usize },

    #[error("step {index} from {from} to {to} is not a single orthogonal move")]
    InvalidStep { index: usize, from: Coord, to: Coord },
}
