use vitals::core::config::MonitorConfig;
use vitals::core::telemetry::{LineAssembler, MonitorStatus, SensorMonitor, SensorState, UNAVAILABLE};

#[test]
fn chunked_wire_records_survive_arbitrary_read_boundaries() {
    let state = SensorState::new();
    let mut assembler = LineAssembler::new();

    // One record delivered in awkward chunks, as a pipe would.
    for chunk in [
        b"CPUT:55".as_slice(),
        b".2|GPUT:61.0|GP".as_slice(),
        b"UL:42.0\nCPUT:5".as_slice(),
    ] {
        for line in assembler.push(chunk) {
            state.apply_line(&line);
        }
    }

    let readings = state.latest();
    assert_eq!(readings.cpu_temp, 55.2);
    assert_eq!(readings.gpu_temp, 61.0);
    assert_eq!(readings.gpu_usage, 42.0);
    assert!(state.available());

    // The trailing partial record only lands once its newline arrives.
    for line in assembler.push(b"9.9\n") {
        state.apply_line(&line);
    }
    assert_eq!(state.latest().cpu_temp, 59.9);
}

#[test]
fn a_malformed_line_never_disturbs_prior_readings() {
    let state = SensorState::new();
    state.apply_line("CPUT:58.3|GPUT:63");
    state.apply_line("CPUT:|GPUT:nine|GPUL");
    state.apply_line("%$#@!|:::|123");

    let readings = state.latest();
    assert_eq!(readings.cpu_temp, 58.3);
    assert_eq!(readings.gpu_temp, 63.0);
    assert!(state.available());
}

#[test]
fn fields_missing_from_a_record_keep_their_last_value() {
    let state = SensorState::new();
    state.apply_line("CPUT:58.3|GPUT:63|GPUL:40|VRU:2048|VRT:8192");
    state.apply_line("CPUT:59.0");
    let readings = state.latest();
    assert_eq!(readings.cpu_temp, 59.0);
    assert_eq!(readings.gpu_temp, 63.0);
    assert_eq!(readings.vram_total_mib, 8192.0);
}

#[test]
fn readings_start_at_the_unavailable_sentinel() {
    let state = SensorState::new();
    let readings = state.latest();
    assert_eq!(readings.cpu_temp, UNAVAILABLE);
    assert_eq!(readings.gpu_temp, UNAVAILABLE);
    assert!(!state.available());
}

#[tokio::test]
async fn monitor_lifecycle_is_idempotent_on_both_ends() {
    let dir = tempfile::tempdir().unwrap();
    let config = MonitorConfig {
        script_path: dir.path().join("sensor-loop.ps1"),
        ..Default::default()
    };

    let monitor = SensorMonitor::new(config.clone());
    assert_eq!(monitor.status(), MonitorStatus::Stopped);

    // Stop before ever starting: must be a safe no-op.
    monitor.stop().await;

    let monitor = SensorMonitor::new(config.clone());
    monitor.start().await.unwrap();
    monitor.start().await.unwrap();
    assert!(config.script_path.exists());

    monitor.stop().await;
    monitor.stop().await;
    assert!(!config.script_path.exists());
}
