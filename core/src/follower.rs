//! Wall-following agent
//!
//! Simulates a single robot that keeps one hand on a wall. The robot first
//! steps into the first open neighbour of the start (in [`NEIGHBOR_ORDER`])
//! to get a heading, then at every cell tries its relative directions in a
//! fixed order and takes the first open one:
//!
//! - left hand:  left, straight, right, back
//! - right hand: right, straight, left, back
//!
//! The walk is capped at `2 * height * width` steps so it always terminates,
//! including on mazes where the hand rule circles an open area forever.

use serde::{Deserialize, Serialize};

use crate::grid::{Coord, Direction, GridMaze, Path, NEIGHBOR_ORDER};

/// Which wall the agent keeps its hand on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Hand {
    Left,
    Right,
}

impl Hand {
    /// Candidate headings for the next step, most preferred first.
    fn preference(self, facing: Direction) -> [Direction; 4] {
        match self {
            Hand::Left => [facing.turn_left(), facing, facing.turn_right(), facing.reverse()],
            Hand::Right => [facing.turn_right(), facing, facing.turn_left(), facing.reverse()],
        }
    }
}

impl std::fmt::Display for Hand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Hand::Left => write!(f, "left"),
            Hand::Right => write!(f, "right"),
        }
    }
}

/// Result of a wall-following walk
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FollowOutcome {
    /// The end was reached. The path may revisit cells.
    Reached { path: Path, initial_heading: Direction },
    /// Every neighbour of the start is a wall.
    Enclosed,
    /// No direction, not even back, was open at `at`.
    Stuck { at: Coord },
    /// The step ceiling ran out before the end was reached.
    StepLimit { steps: usize, at: Coord },
}

impl FollowOutcome {
    pub fn path(&self) -> Option<&Path> {
        match self {
            FollowOutcome::Reached { path, .. } => Some(path),
            _ => None,
        }
    }

    pub fn into_path(self) -> Option<Path> {
        match self {
            FollowOutcome::Reached { path, .. } => Some(path),
            _ => None,
        }
    }
}

/// Walk `maze` from start to end keeping `hand` on the wall.
pub fn follow_wall(maze: &GridMaze, hand: Hand) -> FollowOutcome {
    let start = maze.start();
    let end = maze.end();

    let Some((initial_heading, first)) = NEIGHBOR_ORDER
        .iter()
        .find_map(|&dir| maze.open_neighbor(start, dir).map(|next| (dir, next)))
    else {
        tracing::debug!("{} follower: start {} is enclosed", hand, start);
        return FollowOutcome::Enclosed;
    };

    let mut path = vec![start, first];
    let mut here = first;
    let mut facing = initial_heading;

    let max_steps = 2 * maze.height() * maze.width();
    let mut steps = 0;

    while here != end {
        if steps >= max_steps {
            tracing::debug!("{} follower: gave up at {} after {} steps", hand, here, steps);
            return FollowOutcome::StepLimit { steps, at: here };
        }
        steps += 1;

        let Some((dir, next)) = hand
            .preference(facing)
            .into_iter()
            .find_map(|dir| maze.open_neighbor(here, dir).map(|next| (dir, next)))
        else {
            return FollowOutcome::Stuck { at: here };
        };

        here = next;
        facing = dir;
        path.push(here);
    }

    tracing::debug!("{} follower: reached end in {} cells", hand, path.len());
    FollowOutcome::Reached { path, initial_heading }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::maze_gen::Maze;
    use proptest::prelude::*;

    fn is_connected_walk(path: &[Coord]) -> bool {
        path.windows(2).all(|w| Direction::from_step(w[0], w[1]).is_some())
    }

    #[test]
    fn test_straight_corridor() {
        let maze = GridMaze::parse(&["#####", "#S E#", "#####"]).unwrap();
        for hand in [Hand::Left, Hand::Right] {
            let outcome = follow_wall(&maze, hand);
            assert_eq!(
                outcome,
                FollowOutcome::Reached {
                    path: vec![Coord::new(1, 1), Coord::new(1, 2), Coord::new(1, 3)],
                    initial_heading: Direction::East,
                }
            );
        }
    }

    #[test]
    fn test_loop_maze_both_hands() {
        let maze = GridMaze::parse(&["#####", "#S  #", "# # #", "# E #", "#####"]).unwrap();
        let expected = vec![
            Coord::new(1, 1),
            Coord::new(1, 2),
            Coord::new(1, 3),
            Coord::new(2, 3),
            Coord::new(3, 3),
            Coord::new(3, 2),
        ];
        for hand in [Hand::Left, Hand::Right] {
            assert_eq!(follow_wall(&maze, hand).into_path(), Some(expected.clone()));
        }
    }

    #[test]
    fn test_hands_split_at_junction() {
        // The corridor forks at (2,3): a dead end north, the exit south.
        let maze = GridMaze::parse(&["#####", "### #", "#S  #", "### #", "###E#"]).unwrap();

        let left = follow_wall(&maze, Hand::Left).into_path().unwrap();
        assert_eq!(
            left,
            vec![
                Coord::new(2, 1),
                Coord::new(2, 2),
                Coord::new(2, 3),
                Coord::new(1, 3),
                Coord::new(2, 3),
                Coord::new(3, 3),
                Coord::new(4, 3),
            ]
        );

        let right = follow_wall(&maze, Hand::Right).into_path().unwrap();
        assert_eq!(
            right,
            vec![
                Coord::new(2, 1),
                Coord::new(2, 2),
                Coord::new(2, 3),
                Coord::new(3, 3),
                Coord::new(4, 3),
            ]
        );
    }

    #[test]
    fn test_hand_preference_order() {
        let facing = Direction::North;
        assert_eq!(
            Hand::Left.preference(facing),
            [Direction::West, Direction::North, Direction::East, Direction::South]
        );
        assert_eq!(
            Hand::Right.preference(facing),
            [Direction::East, Direction::North, Direction::West, Direction::South]
        );
    }

    #[test]
    fn test_dead_end_turns_back() {
        // First open neighbour is a dead end to the east.
        let maze = GridMaze::parse(&["######", "#E S #", "######"]).unwrap();
        let path = follow_wall(&maze, Hand::Left).into_path().unwrap();
        assert_eq!(
            path,
            vec![
                Coord::new(1, 3),
                Coord::new(1, 4),
                Coord::new(1, 3),
                Coord::new(1, 2),
                Coord::new(1, 1),
            ]
        );
    }

    #[test]
    fn test_enclosed_start() {
        let maze = GridMaze::parse(&["###", "#S#", "###", "E  "]).unwrap();
        assert_eq!(follow_wall(&maze, Hand::Left), FollowOutcome::Enclosed);
    }

    #[test]
    fn test_unreachable_end_hits_step_limit() {
        let maze = GridMaze::parse(&["#####E#", "# # # #", "#S# # #", "#   # #", "#######"]).unwrap();
        for hand in [Hand::Left, Hand::Right] {
            match follow_wall(&maze, hand) {
                FollowOutcome::StepLimit { steps, .. } => assert_eq!(steps, 2 * 5 * 7),
                other => panic!("expected step limit, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_open_room_circles_until_step_limit() {
        // Starting away from any wall, both hands orbit a 2x2 block.
        let maze = GridMaze::parse(&["#######", "#     #", "# S   #", "#     #", "###E###"]).unwrap();
        for hand in [Hand::Left, Hand::Right] {
            assert!(matches!(follow_wall(&maze, hand), FollowOutcome::StepLimit { steps: 70, .. }));
        }
    }

    proptest! {
        #[test]
        fn prop_follower_solves_perfect_mazes(rows in 2usize..8, cols in 2usize..8, seed in any::<u32>()) {
            let maze = Maze::generate(rows, cols, seed).to_grid_maze().unwrap();
            for hand in [Hand::Left, Hand::Right] {
                let path = follow_wall(&maze, hand).into_path();
                prop_assert!(path.is_some(), "{} follower failed on seed {}", hand, seed);
                let path = path.unwrap();
                prop_assert_eq!(path[0], maze.start());
                prop_assert_eq!(*path.last().unwrap(), maze.end());
                prop_assert!(is_connected_walk(&path));
            }
        }
    }
}
