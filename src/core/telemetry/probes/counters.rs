//! Counter probe: per-logical-processor utilization and disk byte rates.
//!
//! One `Get-Counter` invocation with a one-second sample window. Output
//! is `CORE0,CORE1,...|||READ_BPS|||WRITE_BPS` where the first field is a
//! comma-joined list ordered by processor index.

use crate::core::config::EngineConfig;
use crate::platform::shell;

use super::{numeric_field, FIELD_DELIMITER};

const SCRIPT: &str = "\
$counters = @(\n\
  '\\Processor(*)\\% Processor Time',\n\
  '\\PhysicalDisk(_Total)\\Disk Read Bytes/sec',\n\
  '\\PhysicalDisk(_Total)\\Disk Write Bytes/sec'\n\
)\n\
$sample = Get-Counter -Counter $counters -SampleInterval 1 -MaxSamples 1\n\
$cores = $sample.CounterSamples |\n\
  Where-Object { $_.Path -like '*\\processor(*' -and $_.InstanceName -ne '_total' } |\n\
  Sort-Object { [int]$_.InstanceName } |\n\
  ForEach-Object { [math]::Round($_.CookedValue, 1) }\n\
$read = ($sample.CounterSamples | Where-Object { $_.Path -like '*disk read bytes*' } | Select-Object -First 1).CookedValue\n\
$write = ($sample.CounterSamples | Where-Object { $_.Path -like '*disk write bytes*' } | Select-Object -First 1).CookedValue\n\
Write-Output (($cores -join ',') + '|||' + [math]::Round($read) + '|||' + [math]::Round($write))";

#[derive(Debug, Clone, Default)]
pub struct CounterReading {
    /// Ordered by logical processor index; empty when the sample failed.
    pub per_core_percent: Vec<f32>,
    pub disk_read_bytes_per_sec: Option<i64>,
    pub disk_write_bytes_per_sec: Option<i64>,
}

pub async fn collect(config: &EngineConfig) -> Option<CounterReading> {
    match shell::run_script(SCRIPT, config.counter_probe_timeout).await {
        Ok(output) if !output.is_empty() => Some(parse(&output)),
        Ok(_) => {
            log::debug!("counter probe produced no output");
            None
        }
        Err(e) => {
            log::warn!("counter probe failed: {}", e);
            None
        }
    }
}

/// Parse the 3-field line. Individual unparsable core entries are
/// skipped; counter readings slightly above 100 are clamped.
pub fn parse(line: &str) -> CounterReading {
    let mut fields = line.trim().split(FIELD_DELIMITER);
    let per_core_percent = fields
        .next()
        .map(|list| {
            list.split(',')
                .filter_map(|v| v.trim().parse::<f32>().ok())
                .filter(|v| v.is_finite() && *v >= 0.0)
                .map(|v| v.min(100.0))
                .collect()
        })
        .unwrap_or_default();
    let disk_read_bytes_per_sec = numeric_field::<f64>(fields.next())
        .filter(|v| *v >= 0.0)
        .map(|v| v as i64);
    let disk_write_bytes_per_sec = numeric_field::<f64>(fields.next())
        .filter(|v| *v >= 0.0)
        .map(|v| v as i64);
    CounterReading {
        per_core_percent,
        disk_read_bytes_per_sec,
        disk_write_bytes_per_sec,
    }
}
