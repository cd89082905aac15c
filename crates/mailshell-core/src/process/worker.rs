//! Asynchronous command worker.
//!
//! Each invocation runs on its own tokio task. Stdout is read line by line
//! and every line is sent as a [`WorkerEventKind::Line`] as soon as it
//! arrives. When the process exits a single [`WorkerEventKind::Finished`] is
//! sent. For one worker, lines arrive in order and `Finished` is always last.
//!
//! Workers never touch caller state: everything goes through the event
//! channel, and the receiving side decides what to do with it.
//!
//! A program that cannot be started is reported as a failed `Finished` whose
//! output is the start error.
//!
//! [`WorkerHandle::cancel`] kills the child process. A cancelled worker sends
//! nothing further. Dropping the handle does not cancel; the command then
//! runs to completion.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::io::{AsyncBufReadExt, AsyncReadExt, BufReader};
use tokio::sync::{Notify, mpsc};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use super::{CommandId, Invocation, WorkerEvent, WorkerEventKind, decode};

/// Control handle for a running worker.
#[derive(Debug)]
pub struct WorkerHandle {
    cancel: Arc<Notify>,
    cancelled: Arc<AtomicBool>,
}

impl WorkerHandle {
    /// Kills the child process and suppresses any further events.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
        self.cancel.notify_one();
    }
}

/// Sends events unless the worker has been cancelled.
struct Emitter {
    id: CommandId,
    events: mpsc::UnboundedSender<WorkerEvent>,
    cancelled: Arc<AtomicBool>,
}

impl Emitter {
    fn emit(&self, kind: WorkerEventKind) {
        if self.cancelled.load(Ordering::SeqCst) {
            return;
        }
        // Receiver gone means nobody is listening any more.
        let _ = self.events.send(WorkerEvent { id: self.id, kind });
    }
}

/// Starts `invocation` on a new task, reporting to `events` under `id`.
///
/// Must be called from within a tokio runtime.
#[must_use = "dropping the handle gives up the ability to cancel"]
pub fn start(
    id: CommandId,
    invocation: Invocation,
    events: mpsc::UnboundedSender<WorkerEvent>,
) -> WorkerHandle {
    let cancel = Arc::new(Notify::new());
    let cancelled = Arc::new(AtomicBool::new(false));
    let emitter = Emitter {
        id,
        events,
        cancelled: Arc::clone(&cancelled),
    };
    tokio::spawn(drive(invocation, emitter, Arc::clone(&cancel)));
    WorkerHandle { cancel, cancelled }
}

async fn drive(invocation: Invocation, emitter: Emitter, cancel: Arc<Notify>) {
    debug!("Worker {} starting: {invocation}", emitter.id);

    let spawned = invocation
        .command()
        .and_then(|mut command| command.spawn().map_err(crate::Error::from));
    let mut child = match spawned {
        Ok(child) => child,
        Err(e) => {
            warn!("Worker {} failed to start {invocation}: {e}", emitter.id);
            emitter.emit(WorkerEventKind::Finished {
                success: false,
                output: e.to_string(),
                stderr: String::new(),
            });
            return;
        }
    };

    let stderr_task = child.stderr.take().map(|mut stderr| {
        tokio::spawn(async move {
            let mut bytes = Vec::new();
            let _ = stderr.read_to_end(&mut bytes).await;
            decode(bytes)
        })
    });

    let mut output = String::new();
    if let Some(stdout) = child.stdout.take() {
        let mut reader = BufReader::new(stdout);
        let mut buf = Vec::new();
        loop {
            buf.clear();
            tokio::select! {
                biased;
                () = cancel.notified() => {
                    kill(&mut child, stderr_task, emitter.id).await;
                    return;
                }
                read = reader.read_until(b'\n', &mut buf) => match read {
                    Ok(0) => break,
                    Ok(_) => {
                        let chunk = decode(std::mem::take(&mut buf));
                        output.push_str(&chunk);
                        let line = chunk.strip_suffix('\n').unwrap_or(&chunk);
                        let line = line.strip_suffix('\r').unwrap_or(line);
                        emitter.emit(WorkerEventKind::Line(line.to_string()));
                    }
                    Err(e) => {
                        warn!("Worker {} stopped reading output: {e}", emitter.id);
                        break;
                    }
                },
            }
        }
    }

    let status = tokio::select! {
        biased;
        () = cancel.notified() => {
            kill(&mut child, stderr_task, emitter.id).await;
            return;
        }
        status = child.wait() => status,
    };

    let stderr = match stderr_task {
        Some(task) => task.await.unwrap_or_default(),
        None => String::new(),
    };
    let success = match status {
        Ok(status) => status.success(),
        Err(e) => {
            warn!("Worker {} could not wait for child: {e}", emitter.id);
            false
        }
    };
    debug!("Worker {} finished, success={success}", emitter.id);
    emitter.emit(WorkerEventKind::Finished {
        success,
        output,
        stderr,
    });
}

async fn kill(
    child: &mut tokio::process::Child,
    stderr_task: Option<JoinHandle<String>>,
    id: CommandId,
) {
    debug!("Worker {id} cancelled, killing child");
    if let Err(e) = child.kill().await {
        warn!("Worker {id} failed to kill child: {e}");
    }
    if let Some(task) = stderr_task {
        task.abort();
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::time::Duration;

    use super::*;

    fn sh(script: &str) -> Invocation {
        Invocation::new(["sh", "-c", script])
    }

    async fn collect(mut rx: mpsc::UnboundedReceiver<WorkerEvent>) -> Vec<WorkerEvent> {
        let mut events = Vec::new();
        while let Some(event) = rx.recv().await {
            events.push(event);
        }
        events
    }

    #[tokio::test]
    async fn test_lines_then_completion() {
        let (tx, rx) = mpsc::unbounded_channel();
        let _handle = start(CommandId(1), sh("printf 'a\\nb\\n'"), tx);
        let events = collect(rx).await;

        let kinds: Vec<_> = events.iter().map(|e| e.kind.clone()).collect();
        assert_eq!(
            kinds,
            vec![
                WorkerEventKind::Line("a".into()),
                WorkerEventKind::Line("b".into()),
                WorkerEventKind::Finished {
                    success: true,
                    output: "a\nb\n".into(),
                    stderr: String::new(),
                },
            ]
        );
        assert!(events.iter().all(|e| e.id == CommandId(1)));
    }

    #[tokio::test]
    async fn test_nonzero_exit_reports_failure() {
        let (tx, rx) = mpsc::unbounded_channel();
        let _handle = start(CommandId(2), sh("echo partial; echo bad >&2; exit 7"), tx);
        let events = collect(rx).await;

        assert_eq!(events.len(), 2);
        assert_eq!(events[0].kind, WorkerEventKind::Line("partial".into()));
        assert_eq!(
            events[1].kind,
            WorkerEventKind::Finished {
                success: false,
                output: "partial\n".into(),
                stderr: "bad\n".into(),
            }
        );
    }

    #[tokio::test]
    async fn test_last_line_without_newline() {
        let (tx, rx) = mpsc::unbounded_channel();
        let _handle = start(CommandId(3), sh("printf 'x\\ny'"), tx);
        let events = collect(rx).await;
        assert_eq!(events[1].kind, WorkerEventKind::Line("y".into()));
        assert!(matches!(
            &events[2].kind,
            WorkerEventKind::Finished { output, .. } if output == "x\ny"
        ));
    }

    #[tokio::test]
    async fn test_spawn_failure_is_a_failed_completion() {
        let (tx, rx) = mpsc::unbounded_channel();
        let _handle = start(
            CommandId(4),
            Invocation::new(["/nonexistent/mailshell-tool"]),
            tx,
        );
        let events = collect(rx).await;
        assert_eq!(events.len(), 1);
        assert!(matches!(
            &events[0].kind,
            WorkerEventKind::Finished { success: false, output, .. } if output.contains("mailshell-tool")
        ));
    }

    #[tokio::test]
    async fn test_concurrent_workers_are_independent() {
        let (tx, rx) = mpsc::unbounded_channel();
        let _a = start(CommandId(10), sh("echo a1; echo a2"), tx.clone());
        let _b = start(CommandId(11), sh("echo b1; exit 1"), tx);
        let events = collect(rx).await;

        let for_id = |id| {
            events
                .iter()
                .filter(|e| e.id == CommandId(id))
                .map(|e| e.kind.clone())
                .collect::<Vec<_>>()
        };
        let a = for_id(10);
        assert_eq!(a.len(), 3);
        assert!(matches!(a[2], WorkerEventKind::Finished { success: true, .. }));
        let b = for_id(11);
        assert_eq!(b.len(), 2);
        assert!(matches!(b[1], WorkerEventKind::Finished { success: false, .. }));
    }

    #[tokio::test]
    async fn test_cancel_kills_and_suppresses_completion() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let handle = start(CommandId(5), sh("echo started; exec sleep 30"), tx);

        let first = rx.recv().await.unwrap();
        assert_eq!(first.kind, WorkerEventKind::Line("started".into()));

        handle.cancel();
        let rest = tokio::time::timeout(Duration::from_secs(10), rx.recv())
            .await
            .unwrap();
        assert!(rest.is_none(), "no events after cancel, got {rest:?}");
    }
}
