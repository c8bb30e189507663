//! Path to motion-command compiler
//!
//! Turns a coordinate sequence into a string over `F` (one cell forward),
//! `L` (turn left 90 degrees) and `R` (turn right 90 degrees). The first
//! move is always a bare `F` that fixes the heading; each later move emits
//! the turn needed to face its direction followed by `F`:
//!
//! | heading change | emitted |
//! |----------------|---------|
//! | none           | `F`     |
//! | clockwise      | `RF`    |
//! | anticlockwise  | `LF`    |
//! | reversal       | `RRF`   |
//!
//! Together with the initial heading the string reproduces the path
//! exactly, see [`replay`].

use serde::{Deserialize, Serialize};

use crate::error::CompileError;
use crate::grid::{Coord, Direction};

pub const FORWARD: char = 'F';
pub const LEFT: char = 'L';
pub const RIGHT: char = 'R';

/// Heading of every step in `path`, validated.
fn headings(path: &[Coord]) -> Result<Vec<Direction>, CompileError> {
    if path.len() < 2 {
        return Err(CompileError::TooShort { len: path.len() });
    }
    path.windows(2)
        .enumerate()
        .map(|(index, pair)| {
            Direction::from_step(pair[0], pair[1]).ok_or(CompileError::InvalidStep {
                index,
                from: pair[0],
                to: pair[1],
            })
        })
        .collect()
}

/// Compile `path` into an instruction string.
///
/// # Errors
/// [`CompileError::TooShort`] for fewer than two coordinates and
/// [`CompileError::InvalidStep`] when two consecutive coordinates are not
/// one orthogonal step apart.
pub fn compile_path(path: &[Coord]) -> Result<String, CompileError> {
    let headings = headings(path)?;

    let mut out = String::with_capacity(headings.len() * 2);
    out.push(FORWARD);

    let mut current = headings[0];
    for &next in &headings[1..] {
        if next == current.turn_right() {
            out.push(RIGHT);
        } else if next == current.turn_left() {
            out.push(LEFT);
        } else if next == current.reverse() {
            out.push(RIGHT);
            out.push(RIGHT);
        }
        out.push(FORWARD);
        current = next;
    }

    Ok(out)
}

/// Heading of the first move of `path`, if it has one.
pub fn initial_heading(path: &[Coord]) -> Option<Direction> {
    match path {
        [first, second, ..] => Direction::from_step(*first, *second),
        _ => None,
    }
}

/// Walk `instructions` from `start` facing `heading` and return where the
/// walker ends up.
///
/// Symbols are case-insensitive. Returns `None` on an unknown symbol or if
/// a forward move would leave the non-negative plane.
pub fn replay(start: Coord, heading: Direction, instructions: &str) -> Option<Coord> {
    let mut here = start;
    let mut facing = heading;
    for symbol in instructions.chars() {
        match symbol.to_ascii_uppercase() {
            FORWARD => here = here.step(facing)?,
            LEFT => facing = facing.turn_left(),
            RIGHT => facing = facing.turn_right(),
            _ => return None,
        }
    }
    Some(here)
}

/// A straight run between two corners of a path
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segment {
    pub from: Coord,
    pub to: Coord,
    pub heading: Direction,
    pub steps: usize,
}

/// Split `path` into maximal straight runs.
///
/// # Errors
/// Same as [`compile_path`].
pub fn segments(path: &[Coord]) -> Result<Vec<Segment>, CompileError> {
    let headings = headings(path)?;

    let mut runs = Vec::new();
    let mut from = path[0];
    let mut steps = 0;
    for (i, &heading) in headings.iter().enumerate() {
        steps += 1;
        let is_last = i + 1 == headings.len();
        if is_last || headings[i + 1] != heading {
            let to = path[i + 1];
            runs.push(Segment { from, to, heading, steps });
            from = to;
            steps = 0;
        }
    }
    Ok(runs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::follower::{follow_wall, FollowOutcome, Hand};
    use crate::maze_gen::Maze;
    use proptest::prelude::*;

    fn coords(pairs: &[(usize, usize)]) -> Vec<Coord> {
        pairs.iter().copied().map(Coord::from).collect()
    }

    #[test]
    fn test_straight_step() {
        assert_eq!(compile_path(&coords(&[(0, 0), (0, 1)])).unwrap(), "F");
        assert_eq!(compile_path(&coords(&[(2, 0), (1, 0), (0, 0)])).unwrap(), "FF");
    }

    #[test]
    fn test_turns() {
        // East then south is a clockwise turn.
        assert_eq!(compile_path(&coords(&[(0, 0), (0, 1), (1, 1)])).unwrap(), "FRF");
        // East then north is anticlockwise.
        assert_eq!(compile_path(&coords(&[(1, 0), (1, 1), (0, 1)])).unwrap(), "FLF");
        // East then west is a reversal.
        assert_eq!(compile_path(&coords(&[(0, 0), (0, 1), (0, 0)])).unwrap(), "FRRF");
    }

    #[test]
    fn test_deterministic() {
        let path = coords(&[(1, 1), (1, 2), (2, 2), (3, 2), (3, 1), (2, 1)]);
        let first = compile_path(&path).unwrap();
        assert_eq!(first, compile_path(&path).unwrap());
        assert_eq!(first, "FRFFRFRF");
    }

    #[test]
    fn test_too_short() {
        assert_eq!(compile_path(&[]), Err(CompileError::TooShort { len: 0 }));
        assert_eq!(
            compile_path(&coords(&[(0, 0)])),
            Err(CompileError::TooShort { len: 1 })
        );
    }

    #[test]
    fn test_invalid_step() {
        let err = compile_path(&coords(&[(0, 0), (0, 1), (1, 2)])).unwrap_err();
        assert_eq!(
            err,
            CompileError::InvalidStep { index: 1, from: Coord::new(0, 1), to: Coord::new(1, 2) }
        );

        let err = compile_path(&coords(&[(0, 0), (0, 0)])).unwrap_err();
        assert!(matches!(err, CompileError::InvalidStep { index: 0, .. }));
    }

    #[test]
    fn test_replay() {
        let start = Coord::new(2, 2);
        assert_eq!(replay(start, Direction::North, "FRF"), Some(Coord::new(1, 3)));
        assert_eq!(replay(start, Direction::East, "frrf"), Some(start));
        assert_eq!(replay(start, Direction::North, "FFF"), None);
        assert_eq!(replay(start, Direction::North, "FX"), None);
    }

    #[test]
    fn test_segments() {
        let path = coords(&[(1, 1), (1, 2), (1, 3), (2, 3), (3, 3), (3, 2)]);
        let runs = segments(&path).unwrap();
        assert_eq!(
            runs,
            vec![
                Segment { from: Coord::new(1, 1), to: Coord::new(1, 3), heading: Direction::East, steps: 2 },
                Segment { from: Coord::new(1, 3), to: Coord::new(3, 3), heading: Direction::South, steps: 2 },
                Segment { from: Coord::new(3, 3), to: Coord::new(3, 2), heading: Direction::West, steps: 1 },
            ]
        );
        assert_eq!(runs.iter().map(|s| s.steps).sum::<usize>(), path.len() - 1);
    }

    #[test]
    fn test_follower_route_replays_to_end() {
        let maze = Maze::generate(6, 6, 2918957128).to_grid_maze().unwrap();
        let FollowOutcome::Reached { path, initial_heading } = follow_wall(&maze, Hand::Left) else {
            panic!("left follower failed on a perfect maze");
        };
        let instructions = compile_path(&path).unwrap();
        assert_eq!(replay(maze.start(), initial_heading, &instructions), Some(maze.end()));
    }

    proptest! {
        #[test]
        fn prop_replay_inverts_compile(moves in prop::collection::vec(0usize..4, 1..40)) {
            // Random walk far from the origin so no step underflows.
            let mut path = vec![Coord::new(100, 100)];
            for m in moves {
                let next = path.last().unwrap().step(Direction::from_index(m)).unwrap();
                path.push(next);
            }
            let instructions = compile_path(&path).unwrap();
            let heading = initial_heading(&path).unwrap();
            prop_assert_eq!(replay(path[0], heading, &instructions), Some(*path.last().unwrap()));
            prop_assert_eq!(instructions.matches(FORWARD).count(), path.len() - 1);
        }
    }
}
