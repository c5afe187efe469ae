//! Log draining for player stdout/stderr

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::task::JoinHandle;
use tracing::debug;

/// Callback invoked with the raw bytes of each log line, newline included
pub type LineAction = dyn Fn(&[u8]) + Send + Sync;

/// Spawn a drain task for one output stream.
///
/// The task reads line by line and forwards each one to `line_action`
/// until the stream closes (the player exited and the pipe drained). A
/// line read after `live` has been cleared is dropped and the task stops:
/// once teardown begins, termination noise such as a shell printing
/// "Terminated" must not reach the sink.
///
/// No backpressure is applied; a slow `line_action` stalls only the
/// draining of its own stream.
pub(crate) fn spawn_drain<R>(
    stream: R,
    name: &'static str,
    live: Arc<AtomicBool>,
    line_action: Arc<LineAction>,
) -> JoinHandle<()>
where
    R: AsyncRead + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        let mut reader = BufReader::new(stream);
        let mut line = Vec::new();
        loop {
            line.clear();
            match reader.read_until(b'\n', &mut line).await {
                Ok(0) => break,
                Ok(_) => {
                    if !live.load(Ordering::Acquire) {
                        break;
                    }
                    line_action(&line);
                }
                Err(err) => {
                    debug!(stream = name, error = %err, "log stream read failed");
                    break;
                }
            }
        }
        debug!(stream = name, "log stream drained");
    })
}
