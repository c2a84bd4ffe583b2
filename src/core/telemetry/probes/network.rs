//! Network probe: adapter throughput and wireless details.
//!
//! Throughput comes from sampling the first up, non-virtual adapter's
//! cumulative byte counters twice with a short interval between samples;
//! the script emits `UP_BPS|||DOWN_BPS`. Wireless name and signal come
//! from a separate `netsh` query whose human-oriented output is parsed
//! here with anchored patterns.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::core::config::EngineConfig;
use crate::platform::shell;

use super::{numeric_field, FIELD_DELIMITER};

const SAMPLE_INTERVAL_MS: u32 = 500;

const WLAN_SCRIPT: &str = "netsh wlan show interfaces";

// "SSID" anchored after leading whitespace cannot match the BSSID line.
static SSID_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^\s*SSID\s*:\s*(.+?)\s*$").expect("ssid pattern"));
static SIGNAL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^\s*Signal\s*:\s*(\d+)\s*%").expect("signal pattern"));

#[derive(Debug, Clone, Default)]
pub struct NetworkReading {
    pub up_bytes_per_sec: Option<i64>,
    pub down_bytes_per_sec: Option<i64>,
    pub wifi_ssid: Option<String>,
    pub wifi_signal_percent: Option<i64>,
}

pub async fn collect(config: &EngineConfig) -> Option<NetworkReading> {
    let (up, down) = match shell::run_script(&rate_script(), config.network_probe_timeout).await {
        Ok(output) if !output.is_empty() => parse_rates(&output),
        Ok(_) => {
            log::debug!("network rate sample produced no output");
            (None, None)
        }
        Err(e) => {
            log::warn!("network rate sample failed: {}", e);
            (None, None)
        }
    };

    // Wireless details are optional on top of the rates; a wired-only
    // host simply yields nothing here.
    let (ssid, signal) = match shell::run_script(WLAN_SCRIPT, config.network_probe_timeout).await {
        Ok(output) if !output.is_empty() => parse_wlan(&output),
        Ok(_) => (None, None),
        Err(e) => {
            log::debug!("wlan query failed: {}", e);
            (None, None)
        }
    };

    if up.is_none() && down.is_none() && ssid.is_none() && signal.is_none() {
        return None;
    }
    Some(NetworkReading {
        up_bytes_per_sec: up,
        down_bytes_per_sec: down,
        wifi_ssid: ssid,
        wifi_signal_percent: signal,
    })
}

fn rate_script() -> String {
    format!(
        "$adapter = Get-NetAdapter | Where-Object {{ $_.Status -eq 'Up' -and -not $_.Virtual }} | Select-Object -First 1\n\
         if ($adapter) {{\n\
           $s1 = Get-NetAdapterStatistics -Name $adapter.Name\n\
           Start-Sleep -Milliseconds {interval}\n\
           $s2 = Get-NetAdapterStatistics -Name $adapter.Name\n\
           $up = [math]::Round((($s2.SentBytes - $s1.SentBytes) * 1000.0) / {interval})\n\
           $down = [math]::Round((($s2.ReceivedBytes - $s1.ReceivedBytes) * 1000.0) / {interval})\n\
           Write-Output \"$up{sep}$down\"\n\
         }}",
        interval = SAMPLE_INTERVAL_MS,
        sep = FIELD_DELIMITER,
    )
}

/// Parse `UP_BPS|||DOWN_BPS`; negative deltas (counter reset mid-sample)
/// are rejected.
pub fn parse_rates(line: &str) -> (Option<i64>, Option<i64>) {
    let mut fields = line.trim().split(FIELD_DELIMITER);
    let up = numeric_field::<i64>(fields.next()).filter(|v| *v >= 0);
    let down = numeric_field::<i64>(fields.next()).filter(|v| *v >= 0);
    (up, down)
}

/// Pull SSID and signal percent out of the wireless status listing.
pub fn parse_wlan(output: &str) -> (Option<String>, Option<i64>) {
    let ssid = SSID_RE
        .captures(output)
        .map(|c| c[1].to_string())
        .filter(|s| !s.is_empty());
    let signal = SIGNAL_RE
        .captures(output)
        .and_then(|c| c[1].parse::<i64>().ok())
        .filter(|v| (0..=100).contains(v));
    (ssid, signal)
}
