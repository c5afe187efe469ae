//! Cooperative suspend/resume of a player's process tree.
//!
//! Built on OS-level stop/continue delivery to every process in the tree.
//! A player running outside a container can still escape this by detaching
//! itself from process-group control; that is accepted at this layer.

#[cfg(unix)]
use std::time::Instant;

#[cfg(unix)]
use nix::sys::signal::Signal;
#[cfg(unix)]
use tracing::debug;

#[cfg(unix)]
use crate::tree;

/// Stop every process in the tree rooted at `pid`, descendants first.
/// Best-effort: a descendant that exited between enumeration and delivery
/// is skipped.
pub fn suspend_tree(pid: u32) {
    #[cfg(unix)]
    apply(pid, Signal::SIGSTOP, "suspended");

    #[cfg(windows)]
    {
        let _ = pid;
        tracing::warn!("suspending a process tree is not supported on windows");
    }
}

/// Continue every process in the tree rooted at `pid`, descendants first.
pub fn resume_tree(pid: u32) {
    #[cfg(unix)]
    apply(pid, Signal::SIGCONT, "resumed");

    #[cfg(windows)]
    {
        let _ = pid;
        tracing::warn!("resuming a process tree is not supported on windows");
    }
}

#[cfg(unix)]
fn apply(pid: u32, signal: Signal, verb: &'static str) {
    let start = Instant::now();
    let procs = tree::descendants(pid);
    let delivered = tree::signal_each(&procs, signal);
    tree::signal_each(&[pid], signal);
    debug!(
        pid = %pid,
        descendants = procs.len(),
        delivered = delivered,
        elapsed_ms = start.elapsed().as_millis() as u64,
        "{} process tree",
        verb
    );
}
