//! Grid maze model
//!
//! A maze is a rectangular grid of [`Cell`]s built once from text rows and
//! read-only afterwards. Every search in this crate borrows a [`GridMaze`]
//! and never mutates it.
//!
//! Directions use a clockwise index so relative turns are plain modular
//! arithmetic:
//!
//! | index | direction | (d_row, d_col) |
//! |-------|-----------|----------------|
//! | 0     | North     | (-1, 0)        |
//! | 1     | East      | (0, +1)        |
//! | 2     | South     | (+1, 0)        |
//! | 3     | West      | (0, -1)        |

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::MazeError;

/// State of a single grid cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cell {
    Wall,
    Path,
    Start,
    End,
}

impl Cell {
    /// Everything except a wall can be entered.
    pub fn is_passable(self) -> bool {
        self != Cell::Wall
    }
}

/// A (row, column) position in the grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Coord {
    pub row: usize,
    pub col: usize,
}

impl Coord {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// The adjacent position in `dir`, or `None` when it would leave the
    /// non-negative plane.
    pub fn step(self, dir: Direction) -> Option<Coord> {
        let (dr, dc) = dir.delta();
        let row = self.row.checked_add_signed(dr)?;
        let col = self.col.checked_add_signed(dc)?;
        Some(Coord { row, col })
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

impl From<(usize, usize)> for Coord {
    fn from((row, col): (usize, usize)) -> Self {
        Coord { row, col }
    }
}

/// Ordered coordinate sequence from start to end.
pub type Path = Vec<Coord>;

/// One of the four orthogonal unit moves
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    North = 0,
    East = 1,
    South = 2,
    West = 3,
}

/// Fixed preference order used when several neighbours are open.
pub const NEIGHBOR_ORDER: [Direction; 4] = [
    Direction::East,
    Direction::South,
    Direction::West,
    Direction::North,
];

impl Direction {
    const ALL: [Direction; 4] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];

    /// Clockwise heading index in `0..4`
    pub fn index(self) -> usize {
        self as usize
    }

    /// Heading for any index, taken modulo 4.
    pub fn from_index(index: usize) -> Self {
        Self::ALL[index % 4]
    }

    pub fn turn_right(self) -> Self {
        Self::from_index(self.index() + 1)
    }

    pub fn turn_left(self) -> Self {
        Self::from_index(self.index() + 3)
    }

    pub fn reverse(self) -> Self {
        Self::from_index(self.index() + 2)
    }

    /// Row and column offset of one step in this direction
    pub fn delta(self) -> (isize, isize) {
        match self {
            Direction::North => (-1, 0),
            Direction::East => (0, 1),
            Direction::South => (1, 0),
            Direction::West => (0, -1),
        }
    }

    /// Direction of a single orthogonal step from `from` to `to`.
    ///
    /// Returns `None` when the two coordinates are not exactly one
    /// orthogonal step apart.
    pub fn from_step(from: Coord, to: Coord) -> Option<Self> {
        Self::ALL.into_iter().find(|&dir| from.step(dir) == Some(to))
    }
}

/// Characters used to read and render maze text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MazeAlphabet {
    pub wall: char,
    pub path: char,
    pub start: char,
    pub end: char,
    /// Marker used by [`GridMaze::render_path`]
    pub trail: char,
}

impl Default for MazeAlphabet {
    fn default() -> Self {
        Self {
            wall: '#',
            path: ' ',
            start: 'S',
            end: 'E',
            trail: '*',
        }
    }
}

impl MazeAlphabet {
    fn cell_for(&self, ch: char) -> Option<Cell> {
        if ch == self.wall {
            Some(Cell::Wall)
        } else if ch == self.path {
            Some(Cell::Path)
        } else if ch == self.start {
            Some(Cell::Start)
        } else if ch == self.end {
            Some(Cell::End)
        } else {
            None
        }
    }

    fn char_for(&self, cell: Cell) -> char {
        match cell {
            Cell::Wall => self.wall,
            Cell::Path => self.path,
            Cell::Start => self.start,
            Cell::End => self.end,
        }
    }
}

/// Immutable rectangular maze with exactly one start and one end
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridMaze {
    cells: Vec<Cell>,
    height: usize,
    width: usize,
    start: Coord,
    end: Coord,
    alphabet: MazeAlphabet,
}

impl GridMaze {
    /// Parse maze rows using the default alphabet (`#`, space, `S`, `E`).
    ///
    /// # Errors
    /// Returns a [`MazeError`] for ragged rows or a missing/duplicate start
    /// or end cell. Unknown characters are read as walls and logged.
    pub fn parse<S: AsRef<str>>(rows: &[S]) -> Result<Self, MazeError> {
        Self::parse_with(rows, MazeAlphabet::default())
    }

    /// Parse maze rows with a custom alphabet.
    ///
    /// # Errors
    /// Same as [`GridMaze::parse`].
    pub fn parse_with<S: AsRef<str>>(rows: &[S], alphabet: MazeAlphabet) -> Result<Self, MazeError> {
        let height = rows.len();
        if height == 0 {
            return Err(MazeError::Empty);
        }
        let width = rows[0].as_ref().chars().count();

        let mut cells = Vec::with_capacity(height * width);
        let mut start: Option<Coord> = None;
        let mut end: Option<Coord> = None;

        for (row, line) in rows.iter().enumerate() {
            let line = line.as_ref();
            let len = line.chars().count();
            if len != width {
                return Err(MazeError::RaggedRow { row, len, expected: width });
            }

            for (col, ch) in line.chars().enumerate() {
                let here = Coord::new(row, col);
                let cell = match alphabet.cell_for(ch) {
                    Some(cell) => cell,
                    None => {
                        tracing::warn!("unrecognized character {:?} at {}, treating as wall", ch, here);
                        Cell::Wall
                    }
                };

                match cell {
                    Cell::Start => {
                        if let Some(first) = start {
                            return Err(MazeError::DuplicateStart { first, second: here });
                        }
                        start = Some(here);
                    }
                    Cell::End => {
                        if let Some(first) = end {
                            return Err(MazeError::DuplicateEnd { first, second: here });
                        }
                        end = Some(here);
                    }
                    Cell::Wall | Cell::Path => {}
                }
                cells.push(cell);
            }
        }

        let start = start.ok_or(MazeError::MissingStart)?;
        let end = end.ok_or(MazeError::MissingEnd)?;

        tracing::debug!("parsed {}x{} maze, start {}, end {}", height, width, start, end);

        Ok(Self {
            cells,
            height,
            width,
            start,
            end,
            alphabet,
        })
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn start(&self) -> Coord {
        self.start
    }

    pub fn end(&self) -> Coord {
        self.end
    }

    pub fn contains(&self, at: Coord) -> bool {
        at.row < self.height && at.col < self.width
    }

    /// Cell state at `at`, `None` outside the grid
    pub fn cell(&self, at: Coord) -> Option<Cell> {
        self.contains(at)
            .then(|| self.cells[at.row * self.width + at.col])
    }

    /// In bounds and not a wall
    pub fn is_passable(&self, at: Coord) -> bool {
        self.cell(at).is_some_and(Cell::is_passable)
    }

    /// The neighbour of `at` in `dir` if it can be entered.
    pub fn open_neighbor(&self, at: Coord, dir: Direction) -> Option<Coord> {
        at.step(dir).filter(|&next| self.is_passable(next))
    }

    /// Maze text in the alphabet it was parsed with.
    pub fn to_rows(&self) -> Vec<String> {
        self.cells
            .chunks(self.width.max(1))
            .take(self.height)
            .map(|row| row.iter().map(|&cell| self.alphabet.char_for(cell)).collect())
            .collect()
    }

    /// Maze text with every cell of `path` marked by the trail character.
    ///
    /// Start and end keep their own characters. Coordinates outside the
    /// grid are ignored.
    pub fn render_path(&self, path: &[Coord]) -> Vec<String> {
        let mut grid: Vec<Vec<char>> = self.to_rows().iter().map(|r| r.chars().collect()).collect();
        for &at in path {
            if let Some(cell) = self.cell(at) {
                if !matches!(cell, Cell::Start | Cell::End) {
                    grid[at.row][at.col] = self.alphabet.trail;
                }
            }
        }
        grid.into_iter().map(|row| row.into_iter().collect()).collect()
    }
}
