//! Launch configuration for a supervised player

use std::path::PathBuf;
use std::time::Duration;

use crate::reap::DEFAULT_REAP_TIMEOUT;

/// How the player rendezvouses with the match runner once it is up
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rendezvous {
    /// Unix-domain socket file the player should connect to
    Socket(PathBuf),
    /// Local TCP port the player should connect to
    Tcp(u16),
}

/// Configuration for launching a player process
#[derive(Debug, Clone)]
pub struct LaunchConfig {
    /// Directory containing the player's entry script; also becomes the
    /// process's working directory
    pub working_dir: PathBuf,
    /// Identity token handed to the player via `PLAYER_KEY`
    pub player_key: String,
    /// Rendezvous mode advertised to the player
    pub rendezvous: Rendezvous,
    /// Per-stage wait when tearing the player down
    pub reap_timeout: Duration,
}

impl LaunchConfig {
    /// Create a new launch configuration
    pub fn new(working_dir: impl Into<PathBuf>, rendezvous: Rendezvous) -> Self {
        Self {
            working_dir: working_dir.into(),
            player_key: String::new(),
            rendezvous,
            reap_timeout: DEFAULT_REAP_TIMEOUT,
        }
    }

    /// Set the player identity token
    pub fn player_key(mut self, key: impl Into<String>) -> Self {
        self.player_key = key.into();
        self
    }

    /// Set the per-stage teardown wait
    pub fn reap_timeout(mut self, timeout: Duration) -> Self {
        self.reap_timeout = timeout;
        self
    }
}

/// Per-platform launch policy, resolved once at `start`.
///
/// Unix strips the environment down to `PATH` plus the launch keys; some
/// toolchains (gcc among them) fail to locate dependencies with a fully
/// stripped environment, so `PATH` is always passed through. Windows keeps
/// the full inherited environment, which its toolchains require.
#[derive(Debug, Clone, Copy)]
pub(crate) struct PlatformLaunch {
    /// Entry script expected inside the working directory
    pub entry_script: &'static str,
    /// Interpreter the entry script is handed to, if any
    pub shell: Option<&'static str>,
    /// Whether the player inherits the full parent environment
    pub inherit_env: bool,
    /// Value advertised through `ARENA_PLATFORM`
    pub platform_tag: &'static str,
}

pub(crate) fn platform_launch() -> PlatformLaunch {
    if cfg!(windows) {
        PlatformLaunch {
            entry_script: "run.bat",
            shell: None,
            inherit_env: true,
            platform_tag: "WIN",
        }
    } else if cfg!(target_os = "macos") {
        PlatformLaunch {
            entry_script: "run.sh",
            shell: Some("sh"),
            inherit_env: false,
            platform_tag: "MACOS",
        }
    } else {
        PlatformLaunch {
            entry_script: "run.sh",
            shell: Some("sh"),
            inherit_env: false,
            platform_tag: "LINUX",
        }
    }
}
