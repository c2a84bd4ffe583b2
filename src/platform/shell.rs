//! Command execution port.
//!
//! Runs a single script against the host shell's non-interactive,
//! policy-bypassing script mode with a timeout. The script body lands in a
//! uniquely named temp file which is removed on every exit path, and
//! stdout written before a failure or kill is still returned to the
//! caller.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use tokio::io::AsyncReadExt;
use tokio::process::Command;

use crate::error::{Result, VitalsError};

/// Suppresses PowerShell's own error interruption so one failed query in
/// a multi-step script does not abort the remaining steps.
const SCRIPT_PREFIX: &str =
    "$ErrorActionPreference = 'SilentlyContinue'\n$ProgressPreference = 'SilentlyContinue'\n";

/// Forces a success exit code; internal step failures are judged by their
/// output, not by the process status.
const SCRIPT_SUFFIX: &str = "\nexit 0\n";

static SCRIPT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Run a script body and return its trimmed stdout.
///
/// Timeouts and non-zero exits return whatever stdout was produced before
/// the failure (possibly empty). Only two failures surface as errors: the
/// script file or shell itself being unusable (`Io`), and access-denied
/// output from the underlying OS tool (`ElevationRequired`).
pub async fn run_script(body: &str, timeout: Duration) -> Result<String> {
    run_script_file(&next_script_path(), body, timeout).await
}

async fn run_script_file(path: &Path, body: &str, timeout: Duration) -> Result<String> {
    tokio::fs::write(path, wrap_body(body)).await?;
    let result = execute(path, timeout).await;
    // Best-effort removal on success, timeout, and error alike.
    let _ = tokio::fs::remove_file(path).await;
    result
}

async fn execute(path: &Path, timeout: Duration) -> Result<String> {
    let mut child = Command::new("powershell")
        .arg("-NoProfile")
        .arg("-NonInteractive")
        .arg("-ExecutionPolicy")
        .arg("Bypass")
        .arg("-File")
        .arg(path)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()?;

    // Drain the pipes on their own tasks so a timed-out child still
    // yields what it wrote before the kill.
    let mut stdout = child.stdout.take().expect("stdout piped");
    let mut stderr = child.stderr.take().expect("stderr piped");
    let stdout_task = tokio::spawn(async move {
        let mut buf = Vec::new();
        let _ = stdout.read_to_end(&mut buf).await;
        buf
    });
    let stderr_task = tokio::spawn(async move {
        let mut buf = Vec::new();
        let _ = stderr.read_to_end(&mut buf).await;
        buf
    });

    match tokio::time::timeout(timeout, child.wait()).await {
        Ok(Ok(status)) if !status.success() => {
            log::debug!("script {:?} exited with {}", path.file_name(), status);
        }
        Ok(Ok(_)) => {}
        Ok(Err(e)) => {
            log::warn!("script {:?} could not be awaited: {}", path.file_name(), e);
        }
        Err(_) => {
            log::warn!(
                "script {:?} timed out after {:?}, killing",
                path.file_name(),
                timeout
            );
            let _ = child.kill().await;
        }
    }

    let out = stdout_task.await.unwrap_or_default();
    let err = stderr_task.await.unwrap_or_default();

    let err_text = String::from_utf8_lossy(&err);
    if is_access_denied(&err_text) {
        return Err(VitalsError::elevation_required(
            err_text.lines().next().unwrap_or("access denied").to_string(),
        ));
    }

    Ok(String::from_utf8_lossy(&out).trim().to_string())
}

fn next_script_path() -> PathBuf {
    let seq = SCRIPT_SEQ.fetch_add(1, Ordering::Relaxed);
    std::env::temp_dir().join(format!("vitals-{}-{}.ps1", std::process::id(), seq))
}

fn wrap_body(body: &str) -> String {
    format!("{}{}{}", SCRIPT_PREFIX, body, SCRIPT_SUFFIX)
}

fn is_access_denied(text: &str) -> bool {
    let t = text.to_ascii_lowercase();
    t.contains("access is denied")
        || t.contains("unauthorizedaccess")
        || t.contains("permission denied")
}
