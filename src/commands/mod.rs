// Command handlers for the CLI binary

pub mod completions;
pub mod sensors;
pub mod snapshot;
pub mod watch;

/// Runtime shared by the telemetry commands. Two workers are plenty: the
/// probes are child processes, not CPU-bound tasks.
pub(crate) fn build_runtime() -> anyhow::Result<tokio::runtime::Runtime> {
    Ok(tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .thread_name("telemetry-worker")
        .build()?)
}
