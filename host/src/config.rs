//! Runtime configuration
//!
//! Everything that used to be a hard-coded constant lives here and is
//! passed down explicitly. A JSON file named by `MAZE_PILOT_CONFIG`
//! overrides any subset of the defaults, e.g.
//!
//! ```json
//! { "link": { "port": "/dev/ttyUSB0", "slack_ms": 6000 },
//!   "discovery": { "max_routes": 10 } }
//! ```

use std::fs;
use std::path::Path;

use maze_core::{GridMaze, MazeAlphabet};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::link::LinkConfig;
use crate::routes::DiscoveryConfig;

pub const CONFIG_ENV: &str = "MAZE_PILOT_CONFIG";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PilotConfig {
    pub link: LinkConfig,
    pub discovery: DiscoveryConfig,
    pub alphabet: MazeAlphabet,
}

impl PilotConfig {
    /// # Errors
    /// [`ConfigError::Read`] or [`ConfigError::Parse`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        let config = serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })?;
        tracing::info!("loaded config from {}", path.display());
        Ok(config)
    }

    /// Load from the file named by `MAZE_PILOT_CONFIG`, or use defaults when
    /// the variable is unset.
    ///
    /// # Errors
    /// Same as [`PilotConfig::load`].
    pub fn from_env() -> Result<Self, ConfigError> {
        match std::env::var(CONFIG_ENV) {
            Ok(path) if !path.is_empty() => Self::load(path),
            _ => Ok(Self::default()),
        }
    }
}

/// Split maze text into rows. Line endings are stripped and trailing blank
/// lines dropped; spaces inside rows are significant.
pub fn maze_rows(text: &str) -> Vec<&str> {
    let mut rows: Vec<&str> = text.lines().collect();
    while rows.last().is_some_and(|row| row.is_empty()) {
        rows.pop();
    }
    rows
}

/// Read and parse a maze text file.
///
/// # Errors
/// [`ConfigError::Read`] if the file cannot be read and
/// [`ConfigError::Maze`] if the text is not a valid maze.
pub fn load_maze(path: impl AsRef<Path>, alphabet: MazeAlphabet) -> Result<GridMaze, ConfigError> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.display().to_string(),
        source,
    })?;
    let maze = GridMaze::parse_with(&maze_rows(&text), alphabet)?;
    tracing::info!(
        "loaded {}x{} maze from {} (start {}, end {})",
        maze.height(),
        maze.width(),
        path.display(),
        maze.start(),
        maze.end()
    );
    Ok(maze)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config: PilotConfig =
            serde_json::from_str(r#"{ "link": { "slack_ms": 6000 }, "discovery": { "max_routes": 2 } }"#).unwrap();
        assert_eq!(config.link.slack_ms, 6000);
        assert_eq!(config.link.forward_ms, 500);
        assert_eq!(config.discovery.max_routes, 2);
        assert_eq!(config.alphabet, MazeAlphabet::default());
    }

    #[test]
    fn test_serial_port_settings() {
        let config: PilotConfig =
            serde_json::from_str(r#"{ "link": { "port": "/dev/ttyACM0", "baud_rate": 115200 } }"#).unwrap();
        assert_eq!(config.link.port.as_deref(), Some("/dev/ttyACM0"));
        assert_eq!(config.link.baud_rate, 115_200);

        let defaults = PilotConfig::default();
        assert_eq!(defaults.link.port, None);
        assert_eq!(defaults.link.baud_rate, 9_600);
    }

    #[test]
    fn test_empty_config_is_default() {
        let config: PilotConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, PilotConfig::default());
    }

    #[test]
    fn test_maze_rows() {
        assert_eq!(maze_rows("#S#\r\n#E#\n\n\n"), vec!["#S#", "#E#"]);
        assert_eq!(maze_rows("S  \n  E\n"), vec!["S  ", "  E"]);
    }

    #[test]
    fn test_load_maze_from_file() {
        let path = std::env::temp_dir().join(format!("maze-pilot-test-{}.txt", std::process::id()));
        fs::write(&path, "#####\n#S E#\n#####\n").unwrap();
        let maze = load_maze(&path, MazeAlphabet::default()).unwrap();
        fs::remove_file(&path).unwrap();
        assert_eq!(maze.width(), 5);
        assert_eq!(maze.start().col, 1);

        assert!(matches!(
            load_maze("/nonexistent/maze.txt", MazeAlphabet::default()),
            Err(ConfigError::Read { .. })
        ));
    }
}
