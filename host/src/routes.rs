//! Route discovery and selection
//!
//! Collects up to `max_routes` distinct routes for one maze, in this order:
//! left-hand follower, right-hand follower, breadth-first search for half
//! of the remaining quota, depth-first search for whatever is still
//! missing. A single [`PathSet`] is threaded through every stage so no
//! coordinate sequence is accepted twice.
//!
//! The resulting [`RouteBook`] is sorted by path length, shortest first,
//! and is what an operator picks from by rank.

use maze_core::{
    compile_path, enumerate_paths, follow_wall, segments, FollowOutcome, GridMaze, Hand, Path,
    PathSet, Segment, Strategy,
};
use serde::{Deserialize, Serialize};

use crate::command::Command;
use crate::error::{PilotError, SelectionError};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiscoveryConfig {
    pub max_routes: usize,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self { max_routes: 6 }
    }
}

/// Where a route came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "variant", rename_all = "lowercase")]
pub enum RouteSource {
    Follower(Hand),
    Search(Strategy),
}

/// A discovered route with its compiled instructions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Route {
    pub name: String,
    pub source: RouteSource,
    pub path: Path,
    pub instructions: String,
    pub segments: Vec<Segment>,
}

impl Route {
    fn new(name: String, source: RouteSource, path: Path) -> Result<Self, PilotError> {
        let instructions = compile_path(&path)?;
        let segments = segments(&path)?;
        Ok(Self {
            name,
            source,
            path,
            instructions,
            segments,
        })
    }

    /// Number of cells on the path, start and end included. Always at
    /// least 2, since a shorter path does not compile.
    pub fn cell_count(&self) -> usize {
        self.path.len()
    }
}

/// Routes sorted ascending by length
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteBook {
    routes: Vec<Route>,
}

impl RouteBook {
    /// Sorting is stable: routes of equal length keep discovery order.
    pub fn new(mut routes: Vec<Route>) -> Self {
        routes.sort_by_key(Route::cell_count);
        Self { routes }
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Route> {
        self.routes.iter()
    }

    /// Route at zero-based `rank`.
    ///
    /// # Errors
    /// [`SelectionError::RankOutOfRange`] unless `rank < self.len()`.
    pub fn get(&self, rank: usize) -> Result<&Route, SelectionError> {
        self.routes.get(rank).ok_or(SelectionError::RankOutOfRange {
            rank,
            count: self.routes.len(),
        })
    }

    /// The `!S` command that stores the route at `rank` on the device.
    ///
    /// # Errors
    /// Same as [`RouteBook::get`]; out-of-range ranks are never clamped.
    pub fn save_command(&self, rank: usize) -> Result<Command, SelectionError> {
        self.get(rank)
            .map(|route| Command::Save(route.instructions.clone()))
    }
}

struct Collector {
    max: usize,
    seen: PathSet,
    routes: Vec<Route>,
}

impl Collector {
    fn remaining(&self) -> usize {
        self.max.saturating_sub(self.routes.len())
    }

    /// Returns whether the path was new.
    fn accept(&mut self, name: String, source: RouteSource, path: Path) -> Result<bool, PilotError> {
        if self.remaining() == 0 || self.seen.contains(&path) {
            return Ok(false);
        }
        self.routes.push(Route::new(name, source, path.clone())?);
        self.seen.insert(path);
        Ok(true)
    }

    fn search(&mut self, maze: &GridMaze, strategy: Strategy, count: usize) -> Result<(), PilotError> {
        if count == 0 {
            return Ok(());
        }
        tracing::info!("searching for up to {} more routes with {}", count, strategy);
        let found = enumerate_paths(maze, strategy, count, &self.seen);
        tracing::info!("{} found {} new routes", strategy, found.len());
        for (i, path) in found.into_iter().enumerate() {
            self.accept(format!("{} {}", strategy, i + 1), RouteSource::Search(strategy), path)?;
        }
        Ok(())
    }
}

/// Discover up to `config.max_routes` distinct routes through `maze`.
///
/// Fewer routes than requested is not an error.
///
/// # Errors
/// Only if a discovered path fails to compile, which indicates a bug in a
/// search.
pub fn discover_routes(maze: &GridMaze, config: &DiscoveryConfig) -> Result<RouteBook, PilotError> {
    let mut collector = Collector {
        max: config.max_routes,
        seen: PathSet::new(),
        routes: Vec::new(),
    };

    for hand in [Hand::Left, Hand::Right] {
        if collector.remaining() == 0 {
            break;
        }
        match follow_wall(maze, hand) {
            FollowOutcome::Reached { path, .. } => {
                let len = path.len();
                if collector.accept(format!("{} wall", hand), RouteSource::Follower(hand), path)? {
                    tracing::info!("{} follower found a route of {} cells", hand, len);
                } else {
                    tracing::info!("{} follower route duplicates an earlier one", hand);
                }
            }
            outcome => tracing::info!("{} follower found no route: {:?}", hand, outcome),
        }
    }

    let bfs_quota = collector.remaining() / 2;
    collector.search(maze, Strategy::Bfs, bfs_quota)?;
    let dfs_quota = collector.remaining();
    collector.search(maze, Strategy::Dfs, dfs_quota)?;

    Ok(RouteBook::new(collector.routes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use maze_core::Coord;

    const LOOP: [&str; 5] = ["#####", "#S  #", "# # #", "#E  #", "#####"];

    #[test]
    fn test_loop_maze_has_two_routes() {
        let maze = GridMaze::parse(&LOOP).unwrap();
        let book = discover_routes(&maze, &DiscoveryConfig::default()).unwrap();
        assert_eq!(book.len(), 2);
        assert_eq!(book.get(0).unwrap().cell_count(), 3);
        assert_eq!(book.get(1).unwrap().cell_count(), 7);
        assert_eq!(book.get(0).unwrap().instructions, "FF");
    }

    #[test]
    fn test_followers_come_first() {
        let maze = GridMaze::parse(&LOOP).unwrap();
        let book = discover_routes(&maze, &DiscoveryConfig { max_routes: 1 }).unwrap();
        assert_eq!(book.len(), 1);
        // The left follower starts east and goes the long way round.
        let route = book.get(0).unwrap();
        assert_eq!(route.source, RouteSource::Follower(Hand::Left));
        assert_eq!(route.path.first(), Some(&Coord::new(1, 1)));
        assert_eq!(route.cell_count(), 7);
    }

    #[test]
    fn test_zero_quota() {
        let maze = GridMaze::parse(&LOOP).unwrap();
        let book = discover_routes(&maze, &DiscoveryConfig { max_routes: 0 }).unwrap();
        assert!(book.is_empty());
        assert_eq!(
            book.save_command(0),
            Err(SelectionError::RankOutOfRange { rank: 0, count: 0 })
        );
    }

    #[test]
    fn test_save_command_by_rank() {
        let maze = GridMaze::parse(&LOOP).unwrap();
        let book = discover_routes(&maze, &DiscoveryConfig::default()).unwrap();
        assert_eq!(book.save_command(0).unwrap().to_string(), "!SFF");
        assert_eq!(
            book.save_command(1).unwrap(),
            Command::Save(book.get(1).unwrap().instructions.clone())
        );
        assert_eq!(
            book.save_command(2),
            Err(SelectionError::RankOutOfRange { rank: 2, count: 2 })
        );
    }

    #[test]
    fn test_book_sorts_stably() {
        let short = Route::new("b".into(), RouteSource::Search(Strategy::Bfs), vec![Coord::new(0, 0), Coord::new(0, 1)]).unwrap();
        let long = Route::new(
            "a".into(),
            RouteSource::Search(Strategy::Dfs),
            vec![Coord::new(0, 0), Coord::new(1, 0), Coord::new(1, 1)],
        )
        .unwrap();
        let also_short = Route::new("c".into(), RouteSource::Search(Strategy::Dfs), vec![Coord::new(0, 0), Coord::new(1, 0)]).unwrap();

        let book = RouteBook::new(vec![long, short, also_short]);
        let names: Vec<&str> = book.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["b", "c", "a"]);
    }
}
