//! Run a command to completion and capture its output, or launch one and
//! forget about it.
//!
//! No timeout is applied: a tool that hangs keeps the caller waiting. Only
//! use [`run`] for short reads.

use tracing::debug;

use super::{CommandOutput, Invocation, decode};
use crate::error::{Error, Result};

/// Runs `invocation`, waits for it to exit, and returns its exit code and output.
///
/// # Errors
///
/// Returns an error if the command line is empty or the program cannot be
/// started. A non-zero exit is not an error; check [`CommandOutput::exit_code`].
pub async fn run(invocation: &Invocation) -> Result<CommandOutput> {
    debug!("Running: {invocation}");
    let mut command = invocation.command()?;
    let output = command.output().await.map_err(|source| Error::Spawn {
        program: invocation.argv().first().cloned().unwrap_or_default(),
        source,
    })?;

    let result = CommandOutput {
        exit_code: output.status.code().unwrap_or(-1),
        stdout: decode(output.stdout),
        stderr: decode(output.stderr),
    };
    if !result.stderr.is_empty() {
        debug!("stderr from {invocation}: {}", result.stderr.trim_end());
    }
    Ok(result)
}

/// Starts `invocation` without waiting for it.
///
/// The child inherits stdout and stderr, so whatever it prints shows up in
/// the shell's terminal. Its exit status is never looked at.
///
/// # Errors
///
/// Returns an error if the command line is empty or the program cannot be
/// started.
pub fn launch(invocation: &Invocation) -> Result<()> {
    let (program, args) = invocation.split()?;
    debug!("Launching: {invocation}");
    tokio::process::Command::new(program)
        .args(args)
        .stdin(std::process::Stdio::null())
        .spawn()
        .map_err(|source| Error::Spawn {
            program: program.to_string(),
            source,
        })?;
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn sh(script: &str) -> Invocation {
        Invocation::new(["sh", "-c", script])
    }

    #[tokio::test]
    async fn test_run_captures_stdout_and_exit_code() {
        let out = run(&sh("printf 'one\\ntwo\\n'")).await.unwrap();
        assert_eq!(out.exit_code, 0);
        assert!(out.is_success());
        assert_eq!(out.stdout, "one\ntwo\n");
        assert_eq!(out.stderr, "");
    }

    #[tokio::test]
    async fn test_run_reports_failure_with_stderr() {
        let out = run(&sh("echo oops >&2; echo partial; exit 3")).await.unwrap();
        assert_eq!(out.exit_code, 3);
        assert_eq!(out.stdout, "partial\n");
        assert_eq!(out.stderr, "oops\n");
    }

    #[tokio::test]
    async fn test_run_missing_program() {
        let err = run(&Invocation::new(["/nonexistent/mailshell-tool"]))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Spawn { .. }));
    }

    #[tokio::test]
    async fn test_launch_does_not_wait() {
        let dir = tempfile::tempdir().unwrap();
        let marker = dir.path().join("done");
        let script = format!("touch '{}'", marker.display());
        launch(&sh(&script)).unwrap();

        for _ in 0..100 {
            if marker.exists() {
                return;
            }
            tokio::time::sleep(std::time::Duration::from_millis(50)).await;
        }
        panic!("launched command never ran");
    }

    #[tokio::test]
    async fn test_launch_missing_program() {
        assert!(launch(&Invocation::new(["/nonexistent/mailshell-tool"])).is_err());
        assert!(matches!(
            launch(&Invocation::default()),
            Err(Error::EmptyCommand)
        ));
    }
}
