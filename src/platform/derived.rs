//! OS-reported figures used as the derived fallback tier.
//!
//! Everything here comes from sysinfo rather than an external query
//! process, so it stays available even when every probe fails. Values
//! from this module are second-tier by the fallback policy: a measured
//! probe result always wins.

use sysinfo::{MemoryRefreshKind, RefreshKind, System};

const BYTES_PER_GIB: f64 = (1024 * 1024 * 1024) as f64;

fn memory_refreshed() -> System {
    System::new_with_specifics(
        RefreshKind::nothing().with_memory(MemoryRefreshKind::everything()),
    )
}

/// Memory utilization computed from OS-reported total/used bytes.
pub fn ram_percent() -> Option<f64> {
    let sys = memory_refreshed();
    let total = sys.total_memory();
    if total == 0 {
        return None;
    }
    Some((sys.used_memory() as f64 / total as f64) * 100.0)
}

/// Memory used/total in GiB.
pub fn ram_used_total_gb() -> Option<(f64, f64)> {
    let sys = memory_refreshed();
    let total = sys.total_memory();
    if total == 0 {
        return None;
    }
    Some((
        sys.used_memory() as f64 / BYTES_PER_GIB,
        total as f64 / BYTES_PER_GIB,
    ))
}

/// Uptime rendered the way the fast probe reports it.
pub fn uptime_text() -> String {
    let secs = System::uptime();
    let days = secs / 86_400;
    let hours = (secs % 86_400) / 3_600;
    let minutes = (secs % 3_600) / 60;
    format!("{}d {}h {}m", days, hours, minutes)
}
