//! Player supervisor - lifecycle facade for one player process

use std::process::Stdio;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::process::{Child, Command};
use tracing::{debug, info};

use crate::{
    config::{platform_launch, LaunchConfig, Rendezvous},
    error::{PlayerError, Result},
    reap,
    stream::{self, LineAction},
    suspend,
};

/// Supervises one player process: launch, log streaming, whole-tree
/// suspend/resume and escalating teardown.
///
/// The process handle is owned exclusively by the supervisor. Log-drain
/// tasks never touch it; they only watch the `live` flag, which `destroy`
/// clears before the first termination signal is sent. That single store
/// is the only cross-task synchronization point.
///
/// # Examples
/// ```no_run
/// use arena_player::{LaunchConfig, PlayerSupervisor, Rendezvous};
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let config = LaunchConfig::new("players/red", Rendezvous::Tcp(16_147))
///     .player_key("red-1");
/// let mut player = PlayerSupervisor::new(config);
/// player.start().await?;
/// player.stream_logs(true, true, |line| {
///     print!("{}", String::from_utf8_lossy(line));
/// })?;
/// // ... run the match ...
/// player.destroy().await;
/// # Ok(())
/// # }
/// ```
pub struct PlayerSupervisor {
    config: LaunchConfig,
    process: Option<Child>,
    /// Cleared by `destroy` before any signaling, so drain tasks stop
    /// forwarding lines.
    live: Arc<AtomicBool>,
    paused: bool,
    streaming: bool,
}

impl PlayerSupervisor {
    /// Create a supervisor for one player launch
    pub fn new(config: LaunchConfig) -> Self {
        Self {
            config,
            process: None,
            live: Arc::new(AtomicBool::new(false)),
            paused: false,
            streaming: false,
        }
    }

    /// Launch the player process.
    ///
    /// Resolves the platform launch policy, verifies the entry script is
    /// present in the working directory, builds the launch environment and
    /// spawns the script with the working directory as cwd and
    /// stdout/stderr captured. Called once per supervisor.
    pub async fn start(&mut self) -> Result<()> {
        let platform = platform_launch();
        let script = self.config.working_dir.join(platform.entry_script);
        if !script.is_file() {
            return Err(PlayerError::ScriptMissing(script));
        }

        let mut cmd = match platform.shell {
            Some(shell) => {
                let mut cmd = Command::new(shell);
                cmd.arg(&script);
                cmd
            }
            None => Command::new(&script),
        };

        if !platform.inherit_env {
            // Scoped environment: only PATH survives from the parent.
            cmd.env_clear();
            if let Ok(path) = std::env::var("PATH") {
                cmd.env("PATH", path);
            }
        }
        cmd.env("PLAYER_KEY", &self.config.player_key);
        cmd.env("RUST_BACKTRACE", "1");
        cmd.env("ARENA_PLATFORM", platform.platform_tag);
        match &self.config.rendezvous {
            Rendezvous::Socket(path) => cmd.env("SOCKET_FILE", path),
            Rendezvous::Tcp(port) => cmd.env("TCP_PORT", port.to_string()),
        };

        cmd.current_dir(&self.config.working_dir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        let child = cmd.spawn()?;
        info!(
            pid = ?child.id(),
            script = %script.display(),
            "player process started"
        );

        self.live.store(true, Ordering::Release);
        self.process = Some(child);
        Ok(())
    }

    /// Process id of the player, if it is running
    pub fn pid(&self) -> Option<u32> {
        self.process.as_ref().and_then(|child| child.id())
    }

    /// Whether the player process is still running
    pub fn is_running(&mut self) -> bool {
        match self.process.as_mut() {
            Some(child) => matches!(child.try_wait(), Ok(None)),
            None => false,
        }
    }

    /// Whether the player's tree is currently suspended
    pub fn paused(&self) -> bool {
        self.paused
    }

    /// Begin forwarding the player's log output to `line_action`.
    ///
    /// Spawns one drain task per requested stream; each invokes
    /// `line_action` with the raw bytes of every line (newline included)
    /// until its stream closes or the player is destroyed. Never blocks
    /// the caller. May be called at most once, after `start`.
    pub fn stream_logs<F>(&mut self, stdout: bool, stderr: bool, line_action: F) -> Result<()>
    where
        F: Fn(&[u8]) + Send + Sync + 'static,
    {
        if self.streaming {
            return Err(PlayerError::AlreadyStreaming);
        }
        let child = self.process.as_mut().ok_or(PlayerError::NotStarted)?;
        self.streaming = true;

        let line_action: Arc<LineAction> = Arc::new(line_action);
        if stdout {
            if let Some(out) = child.stdout.take() {
                stream::spawn_drain(out, "stdout", self.live.clone(), line_action.clone());
            }
        }
        if stderr {
            if let Some(err) = child.stderr.take() {
                stream::spawn_drain(err, "stderr", self.live.clone(), line_action);
            }
        }
        Ok(())
    }

    /// Suspend the whole player process tree. Idempotent; a no-op once
    /// the player has been destroyed.
    pub fn pause(&mut self) {
        if self.paused {
            return;
        }
        if let Some(pid) = self.pid() {
            suspend::suspend_tree(pid);
            self.paused = true;
        }
    }

    /// Resume a suspended player process tree. Idempotent.
    pub fn unpause(&mut self) {
        if !self.paused {
            return;
        }
        if let Some(pid) = self.pid() {
            suspend::resume_tree(pid);
        }
        self.paused = false;
    }

    /// Tear the player down: graceful terminate for descendants, forceful
    /// kill for stragglers, then an unconditional kill of the root.
    /// Idempotent and infallible; bounded by two reap-timeout windows.
    pub async fn destroy(&mut self) {
        let Some(child) = self.process.take() else {
            return;
        };
        // Cleared before any signal goes out, so the drain tasks observe
        // the player as gone and a shell's "Terminated" noise never
        // reaches the log sink.
        self.live.store(false, Ordering::Release);
        reap::reap(child, self.config.reap_timeout).await;
        debug!("player destroyed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn never_started() -> PlayerSupervisor {
        PlayerSupervisor::new(LaunchConfig::new("/nonexistent", Rendezvous::Tcp(16_147)))
    }

    #[tokio::test]
    async fn start_fails_without_an_entry_script() {
        let mut player = never_started();
        let err = player.start().await.unwrap_err();
        assert!(matches!(err, PlayerError::ScriptMissing(_)));
        assert!(player.pid().is_none());
    }

    #[test]
    fn stream_logs_requires_a_started_player() {
        let mut player = never_started();
        let err = player.stream_logs(true, true, |_| {}).unwrap_err();
        assert!(matches!(err, PlayerError::NotStarted));
    }

    #[test]
    fn pause_without_a_process_is_a_noop() {
        let mut player = never_started();
        player.pause();
        assert!(!player.paused());
        player.unpause();
        assert!(!player.paused());
    }

    #[tokio::test]
    async fn destroy_without_a_process_is_a_noop() {
        let mut player = never_started();
        player.destroy().await;
        player.destroy().await;
        assert!(!player.is_running());
    }
}
