//! Static check of the local declarations

use anyhow::{Result, bail};

use crate::config::RunOptions;
use crate::store;
use crate::ui;

pub fn run(opts: &RunOptions) -> Result<()> {
    let loaded = store::load(&opts.config_dir);
    let report = reconcile::validate(&loaded.records);

    for err in &loaded.errors {
        ui::error(&err.to_string());
    }
    for err in &report.errors {
        ui::error(&err.to_string());
    }

    if !loaded.is_clean() || !report.is_valid() {
        let failures = loaded.errors.len() + report.errors.len();
        bail!("There were validation errors ({failures})");
    }

    if !opts.quiet {
        ui::success(&format!(
            "{} jobs in {} are valid",
            loaded.records.len(),
            opts.config_dir.display()
        ));
    }
    Ok(())
}
