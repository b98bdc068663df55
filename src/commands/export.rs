//! Write the scheduler's jobs into the local store

use anyhow::Result;

use super::{connect, fetch_remote};
use crate::config::RunOptions;
use crate::store;
use crate::ui;

pub fn run(opts: &RunOptions) -> Result<()> {
    let client = connect(opts)?;
    let remote = fetch_remote(&client)?;

    if opts.dry_run {
        for job in remote.iter() {
            ui::dim(&format!("would write {} job '{}'", job.kind(), job.name));
        }
        ui::info(&format!("Dry run: {} jobs not written", remote.len()));
        return Ok(());
    }

    let written = store::export(&opts.config_dir, &remote)?;
    if !opts.quiet {
        ui::success(&format!(
            "Exported {} jobs to {}",
            written.len(),
            opts.config_dir.display()
        ));
    }
    Ok(())
}
