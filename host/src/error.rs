use std::io;

use maze_core::{CompileError, MazeError};
use thiserror::Error;

/// Failures of a single send attempt. Read errors while draining feedback
/// are not reported here; they are logged and polling continues.
#[derive(Debug, Error)]
pub enum LinkError {
    #[error("link is not open")]
    NotOpen,

    #[error("failed to connect to {address}: {source}")]
    Connect {
        address: String,
        #[source]
        source: io::Error,
    },

    #[error("failed to open serial port {port}: {source}")]
    Open {
        port: String,
        #[source]
        source: serialport::Error,
    },

    #[error("failed to write command: {0}")]
    Write(#[source] io::Error),
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CommandError {
    #[error("empty command")]
    Empty,

    #[error("invalid instruction symbol {symbol:?} at position {position}")]
    InvalidSymbol { symbol: char, position: usize },
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SelectionError {
    #[error("route rank {rank} is out of range, {count} routes available")]
    RankOutOfRange { rank: usize, count: usize },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid maze: {0}")]
    Maze(#[from] MazeError),
}

/// Anything that can stop the route pipeline
#[derive(Debug, Error)]
pub enum PilotError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Compile(#[from] CompileError),

    #[error(transparent)]
    Selection(#[from] SelectionError),

    #[error(transparent)]
    Command(#[from] CommandError),

    #[error(transparent)]
    Link(#[from] LinkError),
}
