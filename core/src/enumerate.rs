//! Multi-path enumeration
//!
//! Both searches grow partial paths from the start, one neighbour at a time
//! in [`NEIGHBOR_ORDER`]. A neighbour is only taken if it is in bounds, not a
//! wall, and not already on the partial path being extended, so every
//! emitted path is simple. There is no global visited set: a cell may sit on
//! many different candidate paths.
//!
//! A candidate that reaches the end is emitted unless its exact coordinate
//! sequence is in the caller's `known` set. The search stops as soon as
//! `max_count` new paths have been emitted, or when the path space runs out.
//!
//! The frontier holds one owned partial path per entry, so memory grows with
//! the number of live candidates. On open mazes that is exponential in the
//! branching factor; callers bound it through `max_count`.

use std::collections::{HashSet, VecDeque};

use serde::{Deserialize, Serialize};

use crate::grid::{Coord, GridMaze, Path, NEIGHBOR_ORDER};

/// Set of exact coordinate sequences already accepted.
pub type PathSet = HashSet<Path>;

/// Frontier discipline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// FIFO frontier: shorter new paths come out first.
    Bfs,
    /// LIFO frontier: paths come out in depth-first discovery order.
    Dfs,
}

impl std::fmt::Display for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Strategy::Bfs => write!(f, "bfs"),
            Strategy::Dfs => write!(f, "dfs"),
        }
    }
}

/// Enumerate up to `max_count` start-to-end paths not present in `known`.
pub fn enumerate_paths(
    maze: &GridMaze,
    strategy: Strategy,
    max_count: usize,
    known: &PathSet,
) -> Vec<Path> {
    let found = match strategy {
        Strategy::Bfs => bfs_paths(maze, max_count, known),
        Strategy::Dfs => dfs_paths(maze, max_count, known),
    };
    tracing::debug!("{} found {} new paths (requested {})", strategy, found.len(), max_count);
    found
}

/// Open neighbours of `here` that are not already on `partial`.
fn extensions<'a>(
    maze: &'a GridMaze,
    here: Coord,
    partial: &'a [Coord],
) -> impl Iterator<Item = Coord> + 'a {
    NEIGHBOR_ORDER
        .into_iter()
        .filter_map(move |dir| maze.open_neighbor(here, dir))
        .filter(move |next| !partial.contains(next))
}

/// Breadth-first enumeration.
///
/// A candidate is checked against the end when it is generated; only
/// candidates that do not close are queued.
pub fn bfs_paths(maze: &GridMaze, max_count: usize, known: &PathSet) -> Vec<Path> {
    let mut found = Vec::new();
    if max_count == 0 {
        return found;
    }

    let start = maze.start();
    let end = maze.end();
    let mut queue: VecDeque<Path> = VecDeque::from([vec![start]]);

    while let Some(partial) = queue.pop_front() {
        let here = partial[partial.len() - 1];
        for next in extensions(maze, here, &partial) {
            let mut candidate = partial.clone();
            candidate.push(next);

            if next == end {
                if !known.contains(&candidate) {
                    found.push(candidate);
                    if found.len() >= max_count {
                        return found;
                    }
                }
            } else {
                queue.push_back(candidate);
            }
        }
    }

    found
}

/// Depth-first enumeration with an explicit stack.
///
/// A candidate is checked against the end when it is popped.
pub fn dfs_paths(maze: &GridMaze, max_count: usize, known: &PathSet) -> Vec<Path> {
    let mut found = Vec::new();
    if max_count == 0 {
        return found;
    }

    let end = maze.end();
    let mut stack: Vec<Path> = vec![vec![maze.start()]];

    while let Some(partial) = stack.pop() {
        let here = partial[partial.len() - 1];

        if here == end {
            if !known.contains(&partial) {
                found.push(partial);
                if found.len() >= max_count {
                    return found;
                }
            }
            continue;
        }

        for next in extensions(maze, here, &partial) {
            let mut candidate = partial.clone();
            candidate.push(next);
            stack.push(candidate);
        }
    }

    found
}
