//! Perfect-maze generation (recursive backtracker)
//!
//! Produces mazes with exactly one simple route between any two cells,
//! which makes them good fixtures for the searches: a wall follower always
//! solves them and the enumerators find exactly one path.
//!
//! Algorithm, with an explicit stack:
//! 1. Mark cell (0, 0) visited and push it.
//! 2. Look at the unvisited neighbours of the top cell.
//!    - If any, pick one at random, knock down the wall between them,
//!      mark it visited and push it.
//!    - Otherwise pop.
//!
//! A maze of R x C cells renders to a (2R + 1) x (2C + 1) text grid with the
//! cell centres at odd coordinates. `S` sits on the first cell centre and
//! `E` on the last one.

use crate::error::MazeError;
use crate::grid::{Direction, GridMaze};
use crate::rng::ParkMiller;

#[derive(Debug, Clone, Copy)]
struct Room {
    /// Open sides, indexed by [`Direction::index`]
    open: [bool; 4],
    visited: bool,
}

/// A generated maze, before conversion to text
#[derive(Debug, Clone)]
pub struct Maze {
    rooms: Vec<Room>,
    rows: usize,
    cols: usize,
}

impl Maze {
    /// Generate a `rows` x `cols` perfect maze from `seed`.
    ///
    /// Both dimensions are clamped to at least 1. The same seed and
    /// dimensions always produce the same maze.
    pub fn generate(rows: usize, cols: usize, seed: u32) -> Self {
        let rows = rows.max(1);
        let cols = cols.max(1);
        let mut maze = Self {
            rooms: vec![Room { open: [false; 4], visited: false }; rows * cols],
            rows,
            cols,
        };
        maze.carve(&mut ParkMiller::new(seed));
        tracing::debug!("generated {}x{} maze from seed {}", rows, cols, seed);
        maze
    }

    fn room_mut(&mut self, row: usize, col: usize) -> &mut Room {
        &mut self.rooms[row * self.cols + col]
    }

    fn carve(&mut self, rng: &mut ParkMiller) {
        let mut stack = vec![(0usize, 0usize)];
        self.room_mut(0, 0).visited = true;

        while let Some(&(row, col)) = stack.last() {
            let options: Vec<(Direction, usize, usize)> = [
                Direction::North,
                Direction::East,
                Direction::South,
                Direction::West,
            ]
            .into_iter()
            .filter_map(|dir| {
                let (dr, dc) = dir.delta();
                let nr = row.checked_add_signed(dr)?;
                let nc = col.checked_add_signed(dc)?;
                (nr < self.rows && nc < self.cols && !self.rooms[nr * self.cols + nc].visited)
                    .then_some((dir, nr, nc))
            })
            .collect();

            if options.is_empty() {
                stack.pop();
                continue;
            }

            let (dir, nr, nc) = options[rng.below(options.len())];
            self.room_mut(row, col).open[dir.index()] = true;
            let next = self.room_mut(nr, nc);
            next.open[dir.reverse().index()] = true;
            next.visited = true;
            stack.push((nr, nc));
        }
    }

    /// Text rows in the default maze alphabet.
    pub fn to_rows(&self) -> Vec<String> {
        let height = self.rows * 2 + 1;
        let width = self.cols * 2 + 1;
        let mut grid = vec![vec!['#'; width]; height];

        for row in 0..self.rows {
            for col in 0..self.cols {
                let room = self.rooms[row * self.cols + col];
                let (gr, gc) = (row * 2 + 1, col * 2 + 1);
                grid[gr][gc] = ' ';
                if room.open[Direction::North.index()] {
                    grid[gr - 1][gc] = ' ';
                }
                if room.open[Direction::South.index()] {
                    grid[gr + 1][gc] = ' ';
                }
                if room.open[Direction::East.index()] {
                    grid[gr][gc + 1] = ' ';
                }
                if room.open[Direction::West.index()] {
                    grid[gr][gc - 1] = ' ';
                }
            }
        }

        grid[1][1] = 'S';
        if self.rows * self.cols > 1 {
            grid[height - 2][width - 2] = 'E';
        }

        grid.into_iter().map(|row| row.into_iter().collect()).collect()
    }

    /// Parse the rendered text into a [`GridMaze`].
    ///
    /// # Errors
    /// [`MazeError::MissingEnd`] for a 1x1 maze, which has no room for an end
    /// cell besides the start.
    pub fn to_grid_maze(&self) -> Result<GridMaze, MazeError> {
        GridMaze::parse(&self.to_rows())
    }
}
