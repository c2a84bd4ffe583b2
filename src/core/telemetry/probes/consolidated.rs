//! Consolidated CPU/RAM/Disk query for the basic aggregator.
//!
//! One script, one `|||`-delimited 3-field line: CPU load %, physical
//! memory %, primary-volume usage %.

use crate::core::config::EngineConfig;
use crate::platform::shell;

use super::{percent_field, FIELD_DELIMITER};

/// Parsed fields; `None` means the field was missing or invalid and the
/// caller should keep its previous value.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsolidatedReading {
    pub cpu_percent: Option<f64>,
    pub ram_percent: Option<f64>,
    pub disk_percent: Option<f64>,
}

pub async fn collect(config: &EngineConfig) -> Option<ConsolidatedReading> {
    let script = script_body(&config.primary_volume);
    match shell::run_script(&script, config.consolidated_timeout).await {
        Ok(output) if !output.is_empty() => Some(parse(&output)),
        Ok(_) => {
            log::debug!("consolidated query produced no output");
            None
        }
        Err(e) => {
            log::warn!("consolidated query failed: {}", e);
            None
        }
    }
}

fn script_body(volume: &str) -> String {
    format!(
        "$cpu = (Get-CimInstance -ClassName Win32_Processor | Measure-Object -Property LoadPercentage -Average).Average\n\
         $os = Get-CimInstance -ClassName Win32_OperatingSystem\n\
         $ram = [math]::Round((($os.TotalVisibleMemorySize - $os.FreePhysicalMemory) * 100.0) / $os.TotalVisibleMemorySize, 1)\n\
         $disk = Get-CimInstance -ClassName Win32_LogicalDisk -Filter \"DeviceID='{volume}'\"\n\
         $du = ''\n\
         if ($disk.Size -gt 0) {{ $du = [math]::Round((($disk.Size - $disk.FreeSpace) * 100.0) / $disk.Size, 1) }}\n\
         Write-Output \"$cpu{sep}$ram{sep}$du\"",
        volume = volume,
        sep = FIELD_DELIMITER,
    )
}

/// Parse the 3-field line. Each field is validated into [0, 100]
/// independently; a bad field never poisons its neighbors.
pub fn parse(line: &str) -> ConsolidatedReading {
    let mut fields = line.trim().split(FIELD_DELIMITER);
    ConsolidatedReading {
        cpu_percent: percent_field(fields.next()),
        ram_percent: percent_field(fields.next()),
        disk_percent: percent_field(fields.next()),
    }
}
