//! sysmon — live memory and CPU indicators for a process metrics endpoint.
//!
//! Run with:  `RUST_LOG=info sysmon`

use anyhow::Result;
use std::sync::{Arc, Mutex, PoisonError};
use sysmon_client::HttpMetricsSource;
use sysmon_config::{default_path, load as load_config};
use sysmon_core::ResourceSnapshot;
use sysmon_model::{ModelOptions, ResourceModel};
use sysmon_widgets::{CpuIndicator, HighMemoryWatch, MemoryIndicator};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Structured logging — RUST_LOG controls verbosity (default: info).
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("sysmon v{} starting", env!("CARGO_PKG_VERSION"));

    let config = load_config(default_path())?;
    let source = Arc::new(HttpMetricsSource::new(&config.endpoint)?);
    info!("Polling {}", source.url());

    let options = ModelOptions::new(config.refresh_interval())
        .with_max_backoff(config.backoff_ceiling());
    let model = ResourceModel::new(options, source)?;

    // Seed the indicators before anyone subscribes.
    model.refresh().await?;

    let memory = MemoryIndicator::from_settings(&config.memory);
    let cpu = CpuIndicator::from_settings(&config.cpu);
    print_line(&memory, &cpu, &model.snapshot());

    let watch = Mutex::new(HighMemoryWatch::from_settings(&config.memory));
    model.changed().connect(move |snapshot| {
        print_line(&memory, &cpu, snapshot);

        let mut watch = watch.lock().unwrap_or_else(PoisonError::into_inner);
        if watch.check(&snapshot.history) {
            warn!("High memory usage");
        }
    });

    tokio::signal::ctrl_c().await?;
    info!("Shutting down");
    model.dispose();

    Ok(())
}

fn print_line(memory: &MemoryIndicator, cpu: &CpuIndicator, snapshot: &ResourceSnapshot) {
    let parts: Vec<String> = [cpu.text(snapshot), memory.text(snapshot)]
        .into_iter()
        .flatten()
        .collect();

    if parts.is_empty() {
        info!("Metrics not available");
    } else {
        info!("{}", parts.join("  "));
    }
}
