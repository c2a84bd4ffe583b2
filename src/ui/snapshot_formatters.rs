//! Terminal rendering for telemetry snapshots.
//!
//! Sentinel-aware: fields whose source produced nothing render as a
//! dimmed `n/a` instead of a fake zero.

use colored::{ColoredString, Colorize};
use humansize::{format_size, DECIMAL};

use crate::core::telemetry::{
    BasicSnapshot, ExtendedSnapshot, MonitorStatus, Provenance, SensorReadings,
};

pub fn print_basic(snap: &BasicSnapshot, sensors_available: bool) {
    println!("{}", "System".bold());
    println!("  CPU   {}", percent(snap.cpu_percent));
    println!("  RAM   {}", percent(snap.ram_percent));
    println!("  Disk  {}", percent(snap.disk_percent));
    println!(
        "  Temp  {} {}",
        temperature(snap.temperature_celsius),
        source_tag(snap.temperature_source)
    );
    if !sensors_available {
        println!("  {}", "sensor feed not yet available".dimmed());
    }
}

pub fn print_extended(snap: &ExtendedSnapshot, sensors_available: bool) {
    println!("{}", "Processor".bold());
    println!("  Clock    {}", clock(snap.cpu_clock_mhz));
    if snap.per_core_cpu_percent.is_empty() {
        println!("  Cores    {}", "n/a".dimmed());
    } else {
        let cores: Vec<String> = snap
            .per_core_cpu_percent
            .iter()
            .map(|v| format!("{:.0}", v))
            .collect();
        println!("  Cores    {} %", cores.join(" "));
    }

    println!("{}", "Memory".bold());
    if snap.ram_total_gb > 0.0 {
        println!(
            "  RAM      {:.1} / {:.1} GB",
            snap.ram_used_gb, snap.ram_total_gb
        );
    } else {
        println!("  RAM      {}", "n/a".dimmed());
    }

    println!("{}", "GPU".bold());
    println!("  Load     {}", percent(snap.gpu_usage_percent));
    println!("  Temp     {}", temperature(snap.gpu_temp_celsius));
    if snap.gpu_vram_total_mib > 0.0 {
        println!(
            "  VRAM     {:.0} / {:.0} MiB",
            snap.gpu_vram_used_mib.max(0.0),
            snap.gpu_vram_total_mib
        );
    } else {
        println!("  VRAM     {}", "n/a".dimmed());
    }

    println!("{}", "Network".bold());
    println!("  Up       {}", rate(snap.network_up_bytes_per_sec));
    println!("  Down     {}", rate(snap.network_down_bytes_per_sec));
    match (&snap.wifi_ssid, snap.wifi_signal_percent) {
        (Some(ssid), signal) if signal >= 0 => {
            println!("  Wi-Fi    {} ({}%)", ssid, signal)
        }
        (Some(ssid), _) => println!("  Wi-Fi    {}", ssid),
        (None, _) => {}
    }

    println!("{}", "Disk I/O".bold());
    println!("  Read     {}", rate(snap.disk_read_bytes_per_sec));
    println!("  Write    {}", rate(snap.disk_write_bytes_per_sec));

    println!("{}", "Host".bold());
    if snap.process_count >= 0 {
        println!("  Procs    {}", snap.process_count);
    }
    if !snap.system_uptime.is_empty() {
        println!("  Uptime   {}", snap.system_uptime);
    }
    if snap.latency_ms >= 0 {
        println!("  Ping     {} ms", snap.latency_ms);
    } else {
        println!("  Ping     {}", "n/a".dimmed());
    }
    if !sensors_available {
        println!("  {}", "sensor feed not yet available".dimmed());
    }
}

pub fn print_sensor_status(status: MonitorStatus, available: bool, readings: &SensorReadings) {
    let state = match status {
        MonitorStatus::Stopped => "stopped".dimmed(),
        MonitorStatus::Starting => "starting".yellow(),
        MonitorStatus::Running => "running".green(),
        MonitorStatus::Exited => "exited".red(),
    };
    println!("{} {}", "Sensor monitor:".bold(), state);
    println!("  Readings ever received: {}", if available { "yes" } else { "no" });
    println!("  CPU temp  {}", temperature(readings.cpu_temp));
    println!("  GPU temp  {}", temperature(readings.gpu_temp));
    println!("  GPU load  {}", percent(readings.gpu_usage));
}

fn percent(value: f64) -> ColoredString {
    if value < 0.0 {
        return "n/a".dimmed();
    }
    let text = format!("{:.1} %", value);
    if value >= 85.0 {
        text.red()
    } else if value >= 60.0 {
        text.yellow()
    } else {
        text.green()
    }
}

fn temperature(value: f64) -> ColoredString {
    if value < 0.0 {
        return "n/a".dimmed();
    }
    let text = format!("{:.1} °C", value);
    if value >= 85.0 {
        text.red()
    } else if value >= 70.0 {
        text.yellow()
    } else {
        text.normal()
    }
}

fn clock(value: f64) -> ColoredString {
    if value < 0.0 {
        return "n/a".dimmed();
    }
    format!("{:.0} MHz", value).normal()
}

fn rate(value: i64) -> ColoredString {
    if value < 0 {
        return "n/a".dimmed();
    }
    format!("{}/s", format_size(value as u64, DECIMAL)).normal()
}

fn source_tag(source: Provenance) -> ColoredString {
    match source {
        Provenance::Sensor => "(sensor)".normal(),
        Provenance::Derived => "(derived)".normal(),
        Provenance::Estimated => "(estimated)".dimmed(),
        Provenance::None => "".normal(),
    }
}
