//! Process tree introspection and best-effort signaling

use std::time::{Duration, Instant};

use sysinfo::{Pid, ProcessStatus, System};
use tokio::time::sleep;

#[cfg(unix)]
use tracing::debug;

const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Enumerate every transitive descendant of `root`, root excluded.
///
/// Works from a single snapshot of the process table: processes forked
/// after the snapshot are missed, processes that exit after it show up as
/// stale pids. Callers treat the result as best-effort.
pub fn descendants(root: u32) -> Vec<u32> {
    let mut sys = System::new();
    sys.refresh_processes();

    let mut found = Vec::new();
    let mut frontier = vec![Pid::from_u32(root)];
    while let Some(parent) = frontier.pop() {
        for (pid, process) in sys.processes() {
            if process.parent() == Some(parent) {
                found.push(pid.as_u32());
                frontier.push(*pid);
            }
        }
    }
    found
}

/// Poll the process table until every pid in `pids` has exited (a zombie
/// entry counts as exited) or `timeout` elapses. Returns the stragglers
/// still alive.
pub async fn wait_for_exit(pids: &[u32], timeout: Duration) -> Vec<u32> {
    let deadline = Instant::now() + timeout;
    let mut sys = System::new();
    let mut alive: Vec<u32> = pids.to_vec();
    loop {
        sys.refresh_processes();
        alive.retain(|pid| {
            sys.processes()
                .get(&Pid::from_u32(*pid))
                .is_some_and(|process| process.status() != ProcessStatus::Zombie)
        });
        if alive.is_empty() || Instant::now() >= deadline {
            return alive;
        }
        sleep(POLL_INTERVAL).await;
    }
}

/// Deliver `signal` to each pid, best-effort.
///
/// A pid that exited between enumeration and delivery (ESRCH) is skipped
/// silently; any other failure is logged and the remaining pids are still
/// signaled. Returns the number of deliveries that succeeded.
#[cfg(unix)]
pub fn signal_each(pids: &[u32], signal: nix::sys::signal::Signal) -> usize {
    use nix::errno::Errno;
    use nix::sys::signal::kill;
    use nix::unistd::Pid;

    let mut delivered = 0;
    for &pid in pids {
        match kill(Pid::from_raw(pid as i32), signal) {
            Ok(()) => delivered += 1,
            Err(Errno::ESRCH) => {}
            Err(errno) => debug!(pid = %pid, errno = %errno, "signal delivery failed"),
        }
    }
    delivered
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::process::Stdio;
    use tokio::process::Command;

    #[tokio::test]
    async fn descendants_sees_forked_children() {
        let mut child = Command::new("sh")
            .args(["-c", "sleep 2 & sleep 2 & wait"])
            .stdout(Stdio::null())
            .spawn()
            .unwrap();
        let pid = child.id().unwrap();

        // Give the shell a moment to fork.
        sleep(Duration::from_millis(300)).await;
        let procs = descendants(pid);
        assert!(procs.len() >= 2, "expected sleep children, got {procs:?}");

        child.kill().await.unwrap();
        #[cfg(unix)]
        signal_each(&procs, nix::sys::signal::Signal::SIGKILL);
    }

    #[tokio::test]
    async fn wait_for_exit_returns_stragglers_on_timeout() {
        let mut child = Command::new("sleep").arg("5").spawn().unwrap();
        let pid = child.id().unwrap();

        let alive = wait_for_exit(&[pid], Duration::from_millis(200)).await;
        assert_eq!(alive, vec![pid]);

        child.kill().await.unwrap();
        let alive = wait_for_exit(&[pid], Duration::from_secs(2)).await;
        assert!(alive.is_empty());
    }

    #[tokio::test]
    async fn wait_for_exit_is_empty_for_exited_process() {
        let mut child = Command::new("true").spawn().unwrap();
        let pid = child.id().unwrap();
        child.wait().await.unwrap();

        let alive = wait_for_exit(&[pid], Duration::from_millis(200)).await;
        assert!(alive.is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn signal_each_skips_missing_processes() {
        use nix::sys::signal::Signal;
        // Nothing can be running with a pid beyond the kernel's pid range.
        assert_eq!(signal_each(&[900_000_000], Signal::SIGTERM), 0);
    }
}
