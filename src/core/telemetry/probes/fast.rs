//! Fast system probe: clock speed, RAM, process count, uptime, latency.
//!
//! Everything cheap enough to answer in one shot, packed into a single
//! `|||`-delimited line:
//! `CLOCK|||RAM_USED_GB|||RAM_TOTAL_GB|||PROCESSES|||UPTIME|||LATENCY_MS`.

use crate::core::config::EngineConfig;
use crate::platform::shell;

use super::{numeric_field, FIELD_DELIMITER};

#[derive(Debug, Clone, Default)]
pub struct FastReading {
    pub cpu_clock_mhz: Option<f64>,
    pub ram_used_gb: Option<f64>,
    pub ram_total_gb: Option<f64>,
    pub process_count: Option<i64>,
    pub uptime_text: Option<String>,
    pub latency_ms: Option<i64>,
}

pub async fn collect(config: &EngineConfig) -> Option<FastReading> {
    let script = script_body(&config.latency_target);
    match shell::run_script(&script, config.fast_probe_timeout).await {
        Ok(output) if !output.is_empty() => Some(parse(&output)),
        Ok(_) => {
            log::debug!("fast probe produced no output");
            None
        }
        Err(e) => {
            log::warn!("fast probe failed: {}", e);
            None
        }
    }
}

fn script_body(latency_target: &str) -> String {
    format!(
        "$clock = (Get-CimInstance -ClassName Win32_Processor | Select-Object -First 1).CurrentClockSpeed\n\
         $os = Get-CimInstance -ClassName Win32_OperatingSystem\n\
         $ramTotal = [math]::Round($os.TotalVisibleMemorySize / 1MB, 2)\n\
         $ramUsed = [math]::Round(($os.TotalVisibleMemorySize - $os.FreePhysicalMemory) / 1MB, 2)\n\
         $procs = (Get-Process).Count\n\
         $up = (Get-Date) - $os.LastBootUpTime\n\
         $upText = '{{0}}d {{1}}h {{2}}m' -f $up.Days, $up.Hours, $up.Minutes\n\
         $lat = (Test-Connection -ComputerName {target} -Count 1 -ErrorAction SilentlyContinue).ResponseTime\n\
         if ($null -eq $lat) {{ $lat = '' }}\n\
         Write-Output \"$clock{sep}$ramUsed{sep}$ramTotal{sep}$procs{sep}$upText{sep}$lat\"",
        target = latency_target,
        sep = FIELD_DELIMITER,
    )
}

/// Parse the 6-field line; each field degrades to `None` on its own.
pub fn parse(line: &str) -> FastReading {
    let mut fields = line.trim().split(FIELD_DELIMITER);
    let cpu_clock_mhz = numeric_field::<f64>(fields.next()).filter(|v| *v > 0.0);
    let ram_used_gb = numeric_field::<f64>(fields.next()).filter(|v| *v >= 0.0);
    let ram_total_gb = numeric_field::<f64>(fields.next()).filter(|v| *v > 0.0);
    let process_count = numeric_field::<i64>(fields.next()).filter(|v| *v >= 0);
    let uptime_text = fields
        .next()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string);
    let latency_ms = numeric_field::<i64>(fields.next()).filter(|v| *v >= 0);
    FastReading {
        cpu_clock_mhz,
        ram_used_gb,
        ram_total_gb,
        process_count,
        uptime_text,
        latency_ms,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_line_parses_every_field() {
        let r = parse("3701|||12.42|||31.89|||312|||3d 4h 12m|||18");
        assert_eq!(r.cpu_clock_mhz, Some(3701.0));
        assert_eq!(r.ram_used_gb, Some(12.42));
        assert_eq!(r.ram_total_gb, Some(31.89));
        assert_eq!(r.process_count, Some(312));
        assert_eq!(r.uptime_text.as_deref(), Some("3d 4h 12m"));
        assert_eq!(r.latency_ms, Some(18));
    }

    #[test]
    fn empty_latency_is_absent_not_zero() {
        let r = parse("3701|||12.42|||31.89|||312|||3d 4h 12m|||");
        assert_eq!(r.latency_ms, None);
        assert_eq!(r.process_count, Some(312));
    }

    #[test]
    fn failed_clock_query_degrades_only_the_clock() {
        let r = parse("|||12.42|||31.89|||312|||1d 0h 3m|||25");
        assert_eq!(r.cpu_clock_mhz, None);
        assert_eq!(r.ram_total_gb, Some(31.89));
        assert_eq!(r.latency_ms, Some(25));
    }

    #[test]
    fn negative_values_are_rejected() {
        let r = parse("-1|||-2|||0|||-4|||x|||-5");
        assert_eq!(r.cpu_clock_mhz, None);
        assert_eq!(r.ram_used_gb, None);
        assert_eq!(r.ram_total_gb, None);
        assert_eq!(r.process_count, None);
        assert_eq!(r.latency_ms, None);
    }

    #[test]
    fn script_pings_the_configured_target() {
        let script = script_body("1.1.1.1");
        assert!(script.contains("-ComputerName 1.1.1.1"));
    }
}
