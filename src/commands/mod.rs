pub mod export;
pub mod sync;
pub mod validate;

use anyhow::{Context, Result, anyhow};
use chronos_client::ChronosClient;
use reconcile::{RemoteJobs, partition_remote};

use crate::config::RunOptions;
use crate::ui;

/// Build a client for the configured scheduler
pub fn connect(opts: &RunOptions) -> Result<ChronosClient> {
    let uri = opts.uri.as_deref().context("No Chronos URI given")?;
    ChronosClient::new(uri, opts.credentials.clone())
        .with_context(|| format!("Could not use Chronos URI '{uri}'"))
}

/// Fetch and classify the scheduler's current jobs.
///
/// The run can't go on without a snapshot, so failures here are fatal.
pub fn fetch_remote(client: &ChronosClient) -> Result<RemoteJobs> {
    log::info!("fetching jobs from {}", client.base());
    let records = client.fetch_jobs().map_err(|e| {
        let category = e.category();
        ui::error(&format!("{}: {e}", category.description()));
        ui::dim(category.advice());
        anyhow!(e).context(format!("Failed to fetch jobs from {}", client.base()))
    })?;

    let remote = partition_remote(records);
    log::info!(
        "chronos has {} scheduled and {} dependent jobs",
        remote.scheduled.len(),
        remote.dependent.len()
    );
    Ok(remote)
}
