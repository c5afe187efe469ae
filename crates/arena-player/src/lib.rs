//! # arena-player
//!
//! **Purpose**: Player process supervision for the Arena match runner
//!
//! Launches a competitor-supplied player executable, multiplexes its log
//! output to the match runner, and keeps the whole process tree under
//! control: cooperative suspend/resume for turn-based time budgets and
//! escalating teardown on timeout or game end.
//!
//! ## Features
//!
//! - **Launching**: platform-aware entry script lookup with a scoped launch environment
//! - **Log Streaming**: one drain task per output stream, raw line bytes to a caller sink
//! - **Suspend/Resume**: best-effort stop/continue across the whole process tree
//! - **Escalating Teardown**: graceful terminate, then forceful kill, with bounded waits
//!
//! ## Usage
//!
//! ```rust,no_run
//! use arena_player::{LaunchConfig, PlayerSupervisor, Rendezvous};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = LaunchConfig::new("players/red", Rendezvous::Tcp(16_147))
//!     .player_key("red-1");
//!
//! let mut player = PlayerSupervisor::new(config);
//! player.start().await?;
//! player.stream_logs(true, true, |line| {
//!     print!("{}", String::from_utf8_lossy(line));
//! })?;
//!
//! // Suspend while the other player takes a turn.
//! player.pause();
//! player.unpause();
//!
//! // Game over: tear the whole tree down.
//! player.destroy().await;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod reap;
pub mod stream;
pub mod supervisor;
pub mod suspend;
pub mod tree;

pub use config::{LaunchConfig, Rendezvous};
pub use error::{PlayerError, Result};
pub use supervisor::PlayerSupervisor;
