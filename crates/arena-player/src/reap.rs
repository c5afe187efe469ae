//! Escalating teardown of a player's process tree

use std::time::Duration;

use tokio::process::Child;
use tracing::{debug, warn};

#[cfg(unix)]
use crate::tree;

/// Default per-stage wait when tearing a player down
pub const DEFAULT_REAP_TIMEOUT: Duration = Duration::from_secs(3);

/// Terminate `child` and everything it spawned.
///
/// Descendants get a graceful terminate first, then a forceful kill for
/// the stragglers, each stage bounded by `timeout`; total wall-clock time
/// is therefore bounded by roughly twice `timeout`. The root is
/// force-killed unconditionally at the end, even when every descendant
/// exited cleanly. Never fails: a process that survives the forceful kill
/// is logged and abandoned.
pub async fn reap(mut child: Child, timeout: Duration) {
    let Some(pid) = child.id() else {
        debug!("player process already reaped");
        return;
    };

    // Descendants must be enumerated while the root is still alive;
    // killing the root first would reparent them out of reach.
    #[cfg(unix)]
    {
        use nix::sys::signal::Signal;

        let procs = tree::descendants(pid);
        debug!(pid = %pid, descendants = procs.len(), "reaping player process tree");

        tree::signal_each(&procs, Signal::SIGTERM);
        let alive = tree::wait_for_exit(&procs, timeout).await;
        if !alive.is_empty() {
            tree::signal_each(&alive, Signal::SIGKILL);
            let alive = tree::wait_for_exit(&alive, timeout).await;
            for pid in alive {
                warn!(pid = %pid, "process survived forceful kill; giving up");
            }
        }
    }

    #[cfg(windows)]
    {
        // taskkill tears the whole tree down in one forceful pass.
        use tokio::process::Command;

        let _ = timeout;
        let killed = Command::new("taskkill")
            .args(["/t", "/f", "/pid", &pid.to_string()])
            .output()
            .await;
        if let Err(err) = killed {
            warn!(pid = %pid, error = %err, "taskkill failed");
        }
    }

    // The root always gets a forceful kill, even when every descendant
    // exited cleanly, and is reaped here.
    if let Err(err) = child.kill().await {
        debug!(pid = %pid, error = %err, "teardown failed; assuming player exited early");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::process::Command;

    #[tokio::test]
    async fn reap_handles_an_already_exited_player() {
        let child = Command::new("true").spawn().unwrap();
        tokio::time::sleep(Duration::from_millis(200)).await;
        reap(child, Duration::from_millis(500)).await;
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn reap_always_kills_the_root() {
        use nix::sys::signal::{kill, Signal};
        use nix::unistd::Pid;

        let child = Command::new("sleep").arg("30").spawn().unwrap();
        let pid = child.id().unwrap();

        reap(child, Duration::from_millis(500)).await;
        assert!(kill(Pid::from_raw(pid as i32), None::<Signal>).is_err());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn reap_time_is_bounded_by_two_stages() {
        use std::time::Instant;

        let child = Command::new("sh")
            .args(["-c", "sleep 30 & sleep 30 & wait"])
            .spawn()
            .unwrap();
        tokio::time::sleep(Duration::from_millis(200)).await;

        let start = Instant::now();
        reap(child, Duration::from_millis(500)).await;
        assert!(start.elapsed() < Duration::from_secs(2));
    }
}
