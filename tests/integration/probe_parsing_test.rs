use vitals::core::telemetry::probes::{consolidated, counters, fast, gpu, network};

#[test]
fn consolidated_field_failure_degrades_only_that_field() {
    let reading = consolidated::parse("45|||70|||not-a-number");
    assert_eq!(reading.cpu_percent, Some(45.0));
    assert_eq!(reading.ram_percent, Some(70.0));
    assert_eq!(reading.disk_percent, None);
}

#[test]
fn consolidated_rejects_percentages_outside_the_valid_range() {
    let reading = consolidated::parse("100.5|||-1|||55");
    assert_eq!(reading.cpu_percent, None);
    assert_eq!(reading.ram_percent, None);
    assert_eq!(reading.disk_percent, Some(55.0));
}

#[test]
fn fast_probe_line_round_trips_every_field() {
    let reading = fast::parse("4200|||10.5|||32.0|||347|||12d 3h 9m|||9");
    assert_eq!(reading.cpu_clock_mhz, Some(4200.0));
    assert_eq!(reading.ram_used_gb, Some(10.5));
    assert_eq!(reading.ram_total_gb, Some(32.0));
    assert_eq!(reading.process_count, Some(347));
    assert_eq!(reading.uptime_text.as_deref(), Some("12d 3h 9m"));
    assert_eq!(reading.latency_ms, Some(9));
}

#[test]
fn fast_probe_with_unreachable_target_has_no_latency() {
    let reading = fast::parse("4200|||10.5|||32.0|||347|||12d 3h 9m|||");
    assert_eq!(reading.latency_ms, None);
}

#[test]
fn counter_probe_preserves_core_order() {
    let reading = counters::parse("5.0,99.2,0.1,42.8|||8192|||4096");
    assert_eq!(reading.per_core_percent, vec![5.0, 99.2, 0.1, 42.8]);
    assert_eq!(reading.disk_read_bytes_per_sec, Some(8192));
    assert_eq!(reading.disk_write_bytes_per_sec, Some(4096));
}

#[test]
fn network_rates_reject_counter_resets() {
    assert_eq!(
        network::parse_rates("-500|||1024"),
        (None, Some(1024))
    );
}

#[test]
fn wlan_listing_parses_ssid_and_signal_but_not_bssid() {
    let listing = "\
    State                  : connected\n\
    SSID                   : CoffeeShop Guest\n\
    BSSID                  : 12:34:56:78:9a:bc\n\
    Signal                 : 64%\n";
    let (ssid, signal) = network::parse_wlan(listing);
    assert_eq!(ssid.as_deref(), Some("CoffeeShop Guest"));
    assert_eq!(signal, Some(64));
}

#[test]
fn gpu_csv_parses_and_tolerates_unsupported_fields() {
    let reading = gpu::parse("17, 54, 1024, 12288").unwrap();
    assert_eq!(reading.usage_percent, Some(17.0));
    assert_eq!(reading.temp_celsius, Some(54.0));

    let partial = gpu::parse("17, [N/A], 1024, 12288").unwrap();
    assert_eq!(partial.temp_celsius, None);
    assert_eq!(partial.vram_total_mib, Some(12288.0));

    assert!(gpu::parse("").is_none());
}
