//! GPU vendor probe.
//!
//! Queries the vendor's own tool for utilization, temperature and VRAM.
//! The binary is optional equipment: hosts without it just leave the GPU
//! fields to the sensor monitor (or the sentinel).

use std::process::Stdio;

use tokio::process::Command;

use crate::core::config::EngineConfig;

const QUERY_FIELDS: &str = "utilization.gpu,temperature.gpu,memory.used,memory.total";

#[derive(Debug, Clone, Copy, Default)]
pub struct GpuProbeReading {
    pub usage_percent: Option<f64>,
    pub temp_celsius: Option<f64>,
    pub vram_used_mib: Option<f64>,
    pub vram_total_mib: Option<f64>,
}

pub async fn collect(config: &EngineConfig) -> Option<GpuProbeReading> {
    // Absence of the tool is not an error.
    let binary = which::which("nvidia-smi").ok()?;

    let mut command = Command::new(binary);
    command
        .arg(format!("--query-gpu={}", QUERY_FIELDS))
        .arg("--format=csv,noheader,nounits")
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .kill_on_drop(true);

    let output = match tokio::time::timeout(config.gpu_probe_timeout, command.output()).await {
        Ok(Ok(output)) => output,
        Ok(Err(e)) => {
            log::warn!("gpu vendor query failed to run: {}", e);
            return None;
        }
        Err(_) => {
            log::warn!(
                "gpu vendor query timed out after {:?}",
                config.gpu_probe_timeout
            );
            return None;
        }
    };
    if !output.status.success() {
        log::debug!("gpu vendor query exited with {}", output.status);
        return None;
    }
    parse(&String::from_utf8_lossy(&output.stdout))
}

/// Parse one CSV line: `42, 63, 2048, 8192`. Fields the tool reports as
/// `[N/A]` degrade individually.
pub fn parse(output: &str) -> Option<GpuProbeReading> {
    let line = output.trim().lines().next()?;
    let parts: Vec<&str> = line.split(',').collect();
    if parts.len() < 4 {
        return None;
    }
    let field = |i: usize| {
        parts[i]
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite() && *v >= 0.0)
    };
    Some(GpuProbeReading {
        usage_percent: field(0).map(|v| v.min(100.0)),
        temp_celsius: field(1),
        vram_used_mib: field(2),
        vram_total_mib: field(3),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn csv_line_parses_all_four_fields() {
        let r = parse("42, 63, 2048, 8192\n").unwrap();
        assert_eq!(r.usage_percent, Some(42.0));
        assert_eq!(r.temp_celsius, Some(63.0));
        assert_eq!(r.vram_used_mib, Some(2048.0));
        assert_eq!(r.vram_total_mib, Some(8192.0));
    }

    #[test]
    fn unsupported_fields_degrade_individually() {
        let r = parse("42, [N/A], 2048, 8192").unwrap();
        assert_eq!(r.usage_percent, Some(42.0));
        assert_eq!(r.temp_celsius, None);
        assert_eq!(r.vram_used_mib, Some(2048.0));
    }

    #[test]
    fn short_or_empty_output_is_no_reading() {
        assert!(parse("").is_none());
        assert!(parse("42, 63").is_none());
    }

    #[test]
    fn only_the_first_gpu_line_is_read() {
        let r = parse("42, 63, 2048, 8192\n7, 30, 100, 4096\n").unwrap();
        assert_eq!(r.temp_celsius, Some(63.0));
    }
}
