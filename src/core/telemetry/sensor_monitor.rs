//! Background hardware sensor monitor.
//!
//! Supervises one long-lived shell child that polls the hardware sensor
//! namespace and emits newline-terminated ASCII records. Each record is a
//! `|`-joined list of `KEY:VALUE` tokens, e.g.
//! `CPUT:55.2|GPUT:61.0|GPUL:42.0|VRU:2048|VRT:8192`. Keys: `CPUT`/`GPUT`
//! in °C, `GPUL` in percent, `VRU`/`VRT` in MiB. Values never contain the
//! delimiters and there is no escaping. Unknown keys are ignored; absent
//! keys leave the corresponding field at its last value. This grammar is
//! parsed here and nowhere else.
//!
//! Once a real CPU reading has ever arrived, `available` stays true for
//! the life of the process: a stale-but-present value beats snapping the
//! consumer back to "no data" when the child dies.

use std::path::Path;
use std::process::Stdio;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;
use tokio::io::AsyncReadExt;
use tokio::process::{Child, Command};

use crate::core::config::{MonitorConfig, RestartPolicy};
use crate::core::telemetry::snapshot::UNAVAILABLE;
use crate::error::{Result, VitalsError};

const RECORD_DELIMITER: char = '|';
const KEY_VALUE_DELIMITER: char = ':';

/// Temperatures outside this band are sensor glitches, not readings.
const PLAUSIBLE_TEMP_RANGE: std::ops::RangeInclusive<f64> = 5.0..=110.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonitorStatus {
    Stopped,
    Starting,
    Running,
    Exited,
}

/// Last-known sensor values. Fields hold [`UNAVAILABLE`] until the first
/// record that mentions them.
#[derive(Debug, Clone, Copy)]
pub struct SensorReadings {
    pub cpu_temp: f64,
    pub gpu_temp: f64,
    pub gpu_usage: f64,
    pub vram_used_mib: f64,
    pub vram_total_mib: f64,
}

impl Default for SensorReadings {
    fn default() -> Self {
        Self {
            cpu_temp: UNAVAILABLE,
            gpu_temp: UNAVAILABLE,
            gpu_usage: UNAVAILABLE,
            vram_used_mib: UNAVAILABLE,
            vram_total_mib: UNAVAILABLE,
        }
    }
}

/// Shared sensor state, written only by the monitor's line parser.
pub struct SensorState {
    readings: RwLock<SensorReadings>,
    available: AtomicBool,
}

impl SensorState {
    pub fn new() -> Self {
        Self {
            readings: RwLock::new(SensorReadings::default()),
            available: AtomicBool::new(false),
        }
    }

    pub fn latest(&self) -> SensorReadings {
        *self.readings.read()
    }

    /// True once a valid CPU temperature has ever arrived. Never cleared.
    pub fn available(&self) -> bool {
        self.available.load(Ordering::Acquire)
    }

    /// Apply one complete wire record. Malformed tokens, unknown keys and
    /// out-of-range values are dropped without touching the prior value;
    /// no input can make this panic.
    pub fn apply_line(&self, line: &str) {
        let mut readings = self.readings.write();
        for token in line.trim().split(RECORD_DELIMITER) {
            let Some((key, value)) = token.split_once(KEY_VALUE_DELIMITER) else {
                continue;
            };
            let Ok(value) = value.trim().parse::<f64>() else {
                continue;
            };
            if !value.is_finite() {
                continue;
            }
            match key.trim() {
                "CPUT" if PLAUSIBLE_TEMP_RANGE.contains(&value) => {
                    readings.cpu_temp = value;
                    self.available.store(true, Ordering::Release);
                }
                "GPUT" if PLAUSIBLE_TEMP_RANGE.contains(&value) => {
                    readings.gpu_temp = value;
                }
                "GPUL" => readings.gpu_usage = value.clamp(0.0, 100.0),
                "VRU" if value >= 0.0 => readings.vram_used_mib = value,
                "VRT" if value >= 0.0 => readings.vram_total_mib = value,
                _ => {}
            }
        }
    }
}

impl Default for SensorState {
    fn default() -> Self {
        Self::new()
    }
}

/// Splits a raw stdout stream into complete lines, retaining a trailing
/// partial line across reads.
pub struct LineAssembler {
    pending: String,
}

impl LineAssembler {
    pub fn new() -> Self {
        Self {
            pending: String::new(),
        }
    }

    /// Feed one chunk; returns the lines it completed, CR/LF stripped,
    /// empty lines dropped.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<String> {
        self.pending.push_str(&String::from_utf8_lossy(chunk));
        let mut lines = Vec::new();
        while let Some(pos) = self.pending.find('\n') {
            let line: String = self.pending.drain(..=pos).collect();
            let line = line.trim_end_matches(['\r', '\n']);
            if !line.is_empty() {
                lines.push(line.to_string());
            }
        }
        lines
    }
}

impl Default for LineAssembler {
    fn default() -> Self {
        Self::new()
    }
}

/// Owns the long-lived sensor child: writes its polling script, spawns
/// it, parses its stdout into [`SensorState`], and supervises restarts
/// according to the configured policy.
pub struct SensorMonitor {
    config: MonitorConfig,
    state: Arc<SensorState>,
    status: Arc<RwLock<MonitorStatus>>,
    child: Arc<tokio::sync::Mutex<Option<Child>>>,
    stopping: Arc<AtomicBool>,
}

impl SensorMonitor {
    pub fn new(config: MonitorConfig) -> Self {
        Self {
            config,
            state: Arc::new(SensorState::new()),
            status: Arc::new(RwLock::new(MonitorStatus::Stopped)),
            child: Arc::new(tokio::sync::Mutex::new(None)),
            stopping: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn status(&self) -> MonitorStatus {
        *self.status.read()
    }

    pub fn available(&self) -> bool {
        self.state.available()
    }

    pub fn latest(&self) -> SensorReadings {
        self.state.latest()
    }

    /// Write the persistent polling script and launch the supervised
    /// child. Calling again after the first start is a no-op.
    pub async fn start(&self) -> Result<()> {
        {
            let mut status = self.status.write();
            if *status != MonitorStatus::Stopped {
                return Ok(());
            }
            *status = MonitorStatus::Starting;
        }

        let script = polling_script(self.config.poll_interval_secs);
        if let Err(e) = tokio::fs::write(&self.config.script_path, script).await {
            *self.status.write() = MonitorStatus::Stopped;
            return Err(VitalsError::sensor_monitor(format!(
                "failed to write polling script {:?}: {}",
                self.config.script_path, e
            )));
        }

        tokio::spawn(supervise(
            self.config.clone(),
            self.state.clone(),
            self.status.clone(),
            self.child.clone(),
            self.stopping.clone(),
        ));
        Ok(())
    }

    /// Terminate the child if running and remove the polling script.
    /// Idempotent; safe to call even if the monitor never started.
    pub async fn stop(&self) {
        self.stopping.store(true, Ordering::Release);
        if let Some(mut child) = self.child.lock().await.take() {
            if let Err(e) = child.kill().await {
                log::debug!("sensor monitor kill: {}", e);
            }
            *self.status.write() = MonitorStatus::Exited;
        }
        let _ = tokio::fs::remove_file(&self.config.script_path).await;
    }
}

async fn supervise(
    config: MonitorConfig,
    state: Arc<SensorState>,
    status: Arc<RwLock<MonitorStatus>>,
    child_slot: Arc<tokio::sync::Mutex<Option<Child>>>,
    stopping: Arc<AtomicBool>,
) {
    let mut attempts: u32 = 0;
    loop {
        if stopping.load(Ordering::Acquire) {
            break;
        }

        let emitted = match spawn_child(&config.script_path) {
            Ok(mut child) => {
                let stdout = child.stdout.take();
                let stderr = child.stderr.take();
                *child_slot.lock().await = Some(child);
                if stopping.load(Ordering::Acquire) {
                    // stop() raced us between its take() and our store.
                    if let Some(mut child) = child_slot.lock().await.take() {
                        let _ = child.kill().await;
                    }
                    break;
                }

                if let Some(mut stderr) = stderr {
                    tokio::spawn(async move {
                        let mut sink = Vec::new();
                        let _ = stderr.read_to_end(&mut sink).await;
                    });
                }

                let emitted = match stdout {
                    Some(stdout) => pump_stdout(stdout, &state, &status).await,
                    None => false,
                };

                if let Some(mut child) = child_slot.lock().await.take() {
                    match child.wait().await {
                        Ok(exit) => log::warn!(
                            "sensor monitor exited with code {:?}; keeping last readings",
                            exit.code()
                        ),
                        Err(e) => log::warn!("sensor monitor exit status unavailable: {}", e),
                    }
                }
                emitted
            }
            Err(e) => {
                log::error!("failed to spawn sensor monitor: {}", e);
                false
            }
        };
        *status.write() = MonitorStatus::Exited;

        if stopping.load(Ordering::Acquire) {
            break;
        }
        if emitted {
            attempts = 0;
        }
        match config.restart {
            RestartPolicy::Never => break,
            RestartPolicy::OnExit {
                max_attempts,
                backoff,
            } => {
                attempts += 1;
                if attempts > max_attempts {
                    log::error!("sensor monitor gave up after {} restart attempts", max_attempts);
                    break;
                }
                let delay = backoff * 2u32.saturating_pow(attempts.min(6) - 1);
                log::info!(
                    "restarting sensor monitor in {:?} (attempt {}/{})",
                    delay,
                    attempts,
                    max_attempts
                );
                tokio::time::sleep(delay).await;
                *status.write() = MonitorStatus::Starting;
            }
        }
    }
}

/// Read stdout chunks until EOF, feeding complete lines to the parser.
/// Returns whether any output arrived at all.
async fn pump_stdout(
    mut stdout: tokio::process::ChildStdout,
    state: &SensorState,
    status: &RwLock<MonitorStatus>,
) -> bool {
    let mut assembler = LineAssembler::new();
    let mut chunk = [0u8; 2048];
    let mut emitted = false;
    loop {
        match stdout.read(&mut chunk).await {
            Ok(0) => break,
            Ok(n) => {
                if !emitted {
                    emitted = true;
                    *status.write() = MonitorStatus::Running;
                    log::info!("sensor monitor is emitting");
                }
                for line in assembler.push(&chunk[..n]) {
                    state.apply_line(&line);
                }
            }
            Err(e) => {
                log::warn!("sensor monitor stdout read failed: {}", e);
                break;
            }
        }
    }
    emitted
}

fn spawn_child(script_path: &Path) -> std::io::Result<Child> {
    Command::new("powershell")
        .arg("-NoProfile")
        .arg("-NonInteractive")
        .arg("-ExecutionPolicy")
        .arg("Bypass")
        .arg("-File")
        .arg(script_path)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
}

/// Body of the persistent polling script. Reads the hardware-monitor WMI
/// namespace and emits one record per interval.
fn polling_script(interval_secs: u32) -> String {
    const TEMPLATE: &str = r#"$interval = __INTERVAL__
while ($true) {
  $parts = @()
  $sensors = Get-CimInstance -Namespace root/LibreHardwareMonitor -ClassName Sensor -ErrorAction SilentlyContinue
  if (-not $sensors) {
    $sensors = Get-CimInstance -Namespace root/OpenHardwareMonitor -ClassName Sensor -ErrorAction SilentlyContinue
  }
  if ($sensors) {
    $cpuT = ($sensors | Where-Object { $_.SensorType -eq 'Temperature' -and $_.Identifier -like '*cpu*' } | Measure-Object -Property Value -Maximum).Maximum
    if ($cpuT) { $parts += "CPUT:$([math]::Round($cpuT, 1))" }
    $gpuT = ($sensors | Where-Object { $_.SensorType -eq 'Temperature' -and $_.Identifier -like '*gpu*' } | Measure-Object -Property Value -Maximum).Maximum
    if ($gpuT) { $parts += "GPUT:$([math]::Round($gpuT, 1))" }
    $gpuL = ($sensors | Where-Object { $_.SensorType -eq 'Load' -and $_.Name -eq 'GPU Core' } | Select-Object -First 1).Value
    if ($gpuL) { $parts += "GPUL:$([math]::Round($gpuL, 1))" }
    $vru = ($sensors | Where-Object { $_.SensorType -eq 'SmallData' -and $_.Name -eq 'GPU Memory Used' } | Select-Object -First 1).Value
    if ($vru) { $parts += "VRU:$([math]::Round($vru))" }
    $vrt = ($sensors | Where-Object { $_.SensorType -eq 'SmallData' -and $_.Name -eq 'GPU Memory Total' } | Select-Object -First 1).Value
    if ($vrt) { $parts += "VRT:$([math]::Round($vrt))" }
  }
  if ($parts.Count -gt 0) { Write-Output ($parts -join '|') }
  Start-Sleep -Seconds $interval
}
"#;
    TEMPLATE.replace("__INTERVAL__", &interval_secs.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assembler_retains_trailing_partial_lines() {
        let mut assembler = LineAssembler::new();
        assert!(assembler.push(b"CPUT:50").is_empty());
        let lines = assembler.push(b".5|GPUT:60\nGPUL:");
        assert_eq!(lines, vec!["CPUT:50.5|GPUT:60".to_string()]);
        let lines = assembler.push(b"42\n");
        assert_eq!(lines, vec!["GPUL:42".to_string()]);
    }

    #[test]
    fn assembler_handles_crlf_and_multiple_lines_per_chunk() {
        let mut assembler = LineAssembler::new();
        let lines = assembler.push(b"CPUT:51\r\nCPUT:52\r\n\r\nCPUT:53\r\n");
        assert_eq!(lines, vec!["CPUT:51", "CPUT:52", "CPUT:53"]);
    }

    #[test]
    fn valid_record_updates_all_fields_and_sets_available() {
        let state = SensorState::new();
        assert!(!state.available());

        state.apply_line("CPUT:55.2|GPUT:61.0|GPUL:42.0|VRU:2048|VRT:8192");
        let r = state.latest();
        assert_eq!(r.cpu_temp, 55.2);
        assert_eq!(r.gpu_temp, 61.0);
        assert_eq!(r.gpu_usage, 42.0);
        assert_eq!(r.vram_used_mib, 2048.0);
        assert_eq!(r.vram_total_mib, 8192.0);
        assert!(state.available());
    }

    #[test]
    fn absent_keys_leave_fields_at_their_last_value() {
        let state = SensorState::new();
        state.apply_line("CPUT:55.0|GPUT:60.0");
        state.apply_line("CPUT:56.0");
        let r = state.latest();
        assert_eq!(r.cpu_temp, 56.0);
        assert_eq!(r.gpu_temp, 60.0);
    }

    #[test]
    fn implausible_temperatures_are_rejected() {
        let state = SensorState::new();
        state.apply_line("CPUT:55.0");
        state.apply_line("CPUT:400|GPUT:-20");
        let r = state.latest();
        assert_eq!(r.cpu_temp, 55.0);
        assert_eq!(r.gpu_temp, UNAVAILABLE);
    }

    #[test]
    fn percentages_are_clamped_not_rejected() {
        let state = SensorState::new();
        state.apply_line("GPUL:120");
        assert_eq!(state.latest().gpu_usage, 100.0);
        state.apply_line("GPUL:-3");
        assert_eq!(state.latest().gpu_usage, 0.0);
    }

    #[test]
    fn malformed_input_is_dropped_without_panic() {
        let state = SensorState::new();
        for garbage in [
            "",
            "|||",
            "CPUT",
            "CPUT:",
            "CPUT:abc",
            "CPUT:NaN",
            ":55",
            "FOO:1|BAR:2",
            "CPUT:55.0:extra",
            "\u{0}\u{1}binary",
        ] {
            state.apply_line(garbage);
        }
        // Only untouched or rejected values; nothing became available.
        assert_eq!(state.latest().cpu_temp, UNAVAILABLE);
        assert!(!state.available());
    }

    #[test]
    fn unknown_keys_are_ignored_around_valid_ones() {
        let state = SensorState::new();
        state.apply_line("MYSTERY:9|CPUT:48.5|ALSONEW:2");
        assert_eq!(state.latest().cpu_temp, 48.5);
        assert!(state.available());
    }

    #[test]
    fn available_is_never_cleared() {
        let state = SensorState::new();
        state.apply_line("CPUT:48.5");
        assert!(state.available());
        state.apply_line("CPUT:9000");
        assert!(state.available());
        assert_eq!(state.latest().cpu_temp, 48.5);
    }

    #[test]
    fn polling_script_embeds_the_interval() {
        let script = polling_script(7);
        assert!(script.contains("$interval = 7"));
        assert!(script.contains("CPUT:"));
        assert!(script.contains("Start-Sleep -Seconds $interval"));
    }

    #[tokio::test]
    async fn stop_without_start_is_safe_and_idempotent() {
        let monitor = SensorMonitor::new(MonitorConfig::default());
        assert_eq!(monitor.status(), MonitorStatus::Stopped);
        monitor.stop().await;
        monitor.stop().await;
        assert!(!monitor.available());
    }

    #[tokio::test]
    async fn stop_removes_the_polling_script() {
        let dir = tempfile::tempdir().unwrap();
        let config = MonitorConfig {
            script_path: dir.path().join("sensor-loop.ps1"),
            ..Default::default()
        };
        let monitor = SensorMonitor::new(config.clone());
        // Start either spawns the child or fails on a host without the
        // shell; the script must exist after start and be gone after stop.
        monitor.start().await.unwrap();
        assert!(config.script_path.exists());
        monitor.stop().await;
        assert!(!config.script_path.exists());
    }

    #[tokio::test]
    async fn start_twice_is_a_no_op() {
        let dir = tempfile::tempdir().unwrap();
        let config = MonitorConfig {
            script_path: dir.path().join("sensor-loop.ps1"),
            ..Default::default()
        };
        let monitor = SensorMonitor::new(config);
        monitor.start().await.unwrap();
        monitor.start().await.unwrap();
        monitor.stop().await;
    }
}
