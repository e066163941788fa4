//! Prometheus metrics recorder for a single run.
//!
//! `run --metrics-file PATH` installs the recorder before the scenario starts
//! and writes the rendered exposition text once it finishes.
//!
//! # Usage
//!
//! ```ignore
//! let handle = install_metrics_recorder()?;
//! // ... run the scenario ...
//! write_metrics(&handle, Path::new("run.prom")).await?;
//! ```

use std::path::Path;

use anyhow::Result;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

/// Install the global metrics recorder.
///
/// This function should be called once per process. After calling this,
/// every `metrics::counter!()` and `metrics::histogram!()` call made by the
/// scenario is recorded and can be rendered through the returned handle.
///
/// # Errors
///
/// - Global recorder is already installed
pub fn install_metrics_recorder() -> Result<PrometheusHandle> {
    tracing::debug!("installing Prometheus metrics recorder");

    let handle = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| anyhow::anyhow!("failed to install metrics recorder: {}", e))?;

    // Register metric descriptions
    iam_lifecycle_core::metrics::describe_all();

    Ok(handle)
}

/// Render the recorded metrics and write them to `path`.
pub async fn write_metrics(handle: &PrometheusHandle, path: &Path) -> std::io::Result<()> {
    tokio::fs::write(path, handle.render()).await?;
    tracing::info!(path = %path.display(), "metrics written");
    Ok(())
}
