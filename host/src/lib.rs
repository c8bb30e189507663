//! Host side of the maze robot
//!
//! Loads a maze, discovers candidate routes with `maze-core`, and drives the
//! robot over a [`CommandLink`]:
//!
//! ```no_run
//! use maze_pilot::{discover_routes, load_maze, CommandLink, PilotConfig, SerialTransport};
//!
//! let config = PilotConfig::from_env()?;
//! let maze = load_maze("maze.txt", config.alphabet)?;
//! let routes = discover_routes(&maze, &config.discovery)?;
//! let command = routes.save_command(0)?;
//!
//! let transport = SerialTransport::open("/dev/ttyUSB0", config.link.baud_rate)?;
//! let mut link = CommandLink::new(transport, config.link.clone());
//! for line in link.dispatch(&command.to_string())? {
//!     println!("robot: {}", line);
//! }
//! # Ok::<(), maze_pilot::PilotError>(())
//! ```

pub mod command;
pub mod config;
pub mod error;
pub mod link;
pub mod routes;
pub mod serial;
pub mod tcp;

pub use command::Command;
pub use config::{load_maze, maze_rows, PilotConfig, CONFIG_ENV};
pub use error::{CommandError, ConfigError, LinkError, PilotError, SelectionError};
pub use link::{CommandLink, Feedback, LinkConfig, Transport};
pub use routes::{discover_routes, DiscoveryConfig, Route, RouteBook, RouteSource};
pub use serial::SerialTransport;
pub use tcp::TcpTransport;
