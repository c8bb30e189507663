//! Maze model, path searches and the path-to-command compiler
//!
//! This crate is pure computation: it never touches I/O and every
//! operation finishes in bounded time. The host crate drives a device
//! with the instruction strings produced here.
//!
//! Flow:
//! 1. [`GridMaze::parse`] builds the read-only maze from text rows.
//! 2. [`follow_wall`] and [`enumerate_paths`] each produce coordinate paths.
//! 3. [`compile_path`] turns an accepted path into an `F`/`L`/`R` string.

pub mod compile;
pub mod enumerate;
pub mod error;
pub mod follower;
pub mod grid;
pub mod maze_gen;
pub mod rng;

pub use compile::{compile_path, initial_heading, replay, segments, Segment};
pub use enumerate::{bfs_paths, dfs_paths, enumerate_paths, PathSet, Strategy};
pub use error::{CompileError, MazeError};
pub use follower::{follow_wall, FollowOutcome, Hand};
pub use grid::{Cell, Coord, Direction, GridMaze, MazeAlphabet, Path, NEIGHBOR_ORDER};
pub use maze_gen::Maze;

#[cfg(test)]
mod tests {
    use super::*;

    const SCENARIO: [&str; 5] = ["#####E#", "# # # #", "#S# # #", "#   # #", "#######"];

    #[test]
    fn test_scenario_maze_markers() {
        let maze = GridMaze::parse(&SCENARIO).unwrap();
        assert_eq!(maze.start(), Coord::new(2, 1));
        assert_eq!(maze.end(), Coord::new(0, 5));
    }

    #[test]
    fn test_scenario_follower_gives_up() {
        // The end column is walled off from the start pocket, so the
        // follower runs out of steps instead of producing a route.
        let maze = GridMaze::parse(&SCENARIO).unwrap();
        assert!(matches!(
            follow_wall(&maze, Hand::Left),
            FollowOutcome::StepLimit { steps: 70, .. }
        ));
        assert!(enumerate_paths(&maze, Strategy::Bfs, 1, &PathSet::new()).is_empty());
    }

    #[test]
    fn test_scenario_with_opened_wall() {
        // Same maze with the wall at (3,4) removed: now solvable.
        let rows = ["#####E#", "# # # #", "#S# # #", "#     #", "#######"];
        let maze = GridMaze::parse(&rows).unwrap();
        let FollowOutcome::Reached { path, initial_heading } = follow_wall(&maze, Hand::Left) else {
            panic!("expected the left follower to reach the end");
        };
        assert_eq!(initial_heading, Direction::South);
        let instructions = compile_path(&path).unwrap();
        assert_eq!(replay(maze.start(), initial_heading, &instructions), Some(maze.end()));
    }
}
