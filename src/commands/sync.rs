//! Push local declarations to the scheduler
//!
//! Order of business: fetch the snapshot, load and classify the local jobs,
//! reconcile, send creates/updates one at a time, then deal with jobs the
//! scheduler has that nobody declared.

use anyhow::{Context, Result, bail};
use colored::Colorize;
use dialoguer::Confirm;
use reconcile::{
    ApplyResult, ConfirmCallback, DiffSummary, ExecuteSummary, JobSpec, ProgressCallback,
    RemoteJobs, Scheduler, UpdateIntent, advise, apply_deletions, apply_updates, classify_local,
    normalize, reconcile,
};

use super::{connect, fetch_remote};
use crate::config::RunOptions;
use crate::store;
use crate::ui;

/// Outcome of one sync pass
#[derive(Debug, Default)]
pub struct SyncReport {
    /// Local declarations that couldn't be used
    pub load_errors: usize,
    /// Dependent jobs sent without their parents resolved
    pub unresolved: Vec<String>,
    pub updates: ExecuteSummary,
    pub deletions: ExecuteSummary,
}

impl SyncReport {
    pub fn is_success(&self) -> bool {
        self.load_errors == 0 && self.updates.is_success() && self.deletions.is_success()
    }
}

pub fn run(opts: &RunOptions) -> Result<()> {
    let client = connect(opts)?;
    let remote = fetch_remote(&client)?;

    let report = sync_with(opts, &client, &remote, &mut PromptConfirm);
    if !opts.quiet {
        print_summary(&report);
    }

    if report.load_errors > 0 {
        bail!("{} local job declarations could not be loaded", report.load_errors);
    }
    let failed = report.updates.failed + report.deletions.failed;
    if failed > 0 {
        bail!("{failed} requests to Chronos failed");
    }
    Ok(())
}

/// Reconcile the local store against `remote` and apply the result.
pub fn sync_with<S, C>(
    opts: &RunOptions,
    scheduler: &S,
    remote: &RemoteJobs,
    confirm: &mut C,
) -> SyncReport
where
    S: Scheduler + ?Sized,
    C: ConfirmCallback,
{
    let mut report = SyncReport::default();

    let loaded = store::load(&opts.config_dir);
    for err in &loaded.errors {
        ui::error(&err.to_string());
    }
    report.load_errors += loaded.errors.len();

    let (local, errors) = classify_local(loaded.records);
    for err in &errors {
        ui::error(&err.to_string());
        log::debug!("leaving '{}' out of this sync", err.job());
    }
    report.load_errors += errors.len();
    log::info!("{} local jobs declared", local.len());

    let result = reconcile(&local, remote, &opts.sync_options());
    if !result.unresolved.is_empty() {
        ui::warn(&format!(
            "Could not order {} dependent jobs after their parents (cycle?): {}",
            result.unresolved.len(),
            result.unresolved.join(", ")
        ));
    }
    report.unresolved = result.unresolved.clone();

    let exec = opts.execute_options();
    let mut progress = TerminalProgress { quiet: opts.quiet };

    let plan = DiffSummary::from_intents(&result.intents);
    if opts.skip_sync {
        if result.has_updates() {
            ui::info(&format!(
                "Skipping sync, {} jobs differ from Chronos",
                plan.total()
            ));
        }
    } else {
        if plan.has_changes() && !opts.quiet {
            ui::info(&format!(
                "{} jobs to create, {} to update",
                plan.creates, plan.updates
            ));
        }
        if !opts.quiet {
            for intent in &result.intents {
                show_intent(intent);
            }
        }
        report.updates = apply_updates(&result.intents, scheduler, &exec, &mut progress);
    }

    let advice = advise(&result.undeclared, opts.deletion);
    report.deletions = apply_deletions(&advice, scheduler, &exec, confirm, &mut progress);

    report
}

/// YAML rendering used for the old/new comparison
fn render(job: &JobSpec) -> String {
    serde_yaml::to_string(&normalize(job)).unwrap_or_else(|e| format!("<unprintable: {e}>\n"))
}

fn show_intent(intent: &UpdateIntent) {
    let name = intent.name();
    match &intent.old {
        None => {
            ui::header(&format!("About to create {} job {name}", intent.new.kind()));
            ui::show_diff("", &render(&intent.new));
        }
        Some(old) => {
            ui::header(&format!("About to update {} job {name}", intent.new.kind()));
            ui::show_diff(&render(old), &render(&intent.new));
        }
    }
}

fn print_summary(report: &SyncReport) {
    let updates = &report.updates;
    let deletions = &report.deletions;
    let mut combined = updates.clone();
    combined.merge(deletions);

    println!();
    if !report.is_success() {
        println!("  {} Sync finished with errors", "⚠".yellow().bold());
    } else if combined.total_changes() == 0 {
        println!("  {} Nothing to change in Chronos", "✓".green().bold());
    } else {
        println!("  {} Chronos is in sync", "✓".green().bold());
    }

    if updates.created > 0 {
        println!("    • {} jobs created", updates.created);
    }
    if updates.modified > 0 {
        println!("    • {} jobs updated", updates.modified);
    }
    if deletions.removed > 0 {
        println!("    • {} jobs deleted", deletions.removed);
    }
    if deletions.reported > 0 {
        println!("    • {} jobs not declared locally", deletions.reported);
    }
    let skipped = updates.skipped + deletions.skipped;
    if skipped > 0 {
        println!("    • {skipped} jobs skipped");
    }
    let failed = updates.failed + deletions.failed;
    if failed > 0 {
        println!("    • {} {} failed", failed, "requests".red());
    }
    if !report.unresolved.is_empty() {
        println!(
            "    • {} jobs sent without their parents resolved",
            report.unresolved.len()
        );
    }
    if report.load_errors > 0 {
        println!("    • {} {} rejected", report.load_errors, "declarations".red());
    }
}

// ============================================================================
// Terminal callbacks
// ============================================================================

struct TerminalProgress {
    quiet: bool,
}

impl ProgressCallback for TerminalProgress {
    fn on_batch_start(&mut self, count: usize, label: &str) {
        if !self.quiet {
            println!();
            println!("  {} Sending {count} {label} requests...", "→".cyan());
        }
    }

    fn on_job_start(&mut self, name: &str, action: &str) {
        log::info!("sending {action} for {name}");
    }

    fn on_job_complete(&mut self, name: &str, result: &ApplyResult) {
        match result {
            ApplyResult::Created => println!("    {} {name} created", "✓".green()),
            ApplyResult::Modified => println!("    {} {name} updated", "✓".green()),
            ApplyResult::Removed => println!("    {} {name} deleted", "✓".green()),
            ApplyResult::Failed { error } => ui::error(&format!("{name}: {error}")),
            ApplyResult::Skipped { reason } => {
                if !self.quiet {
                    ui::dim(&format!("{name} skipped ({reason})"));
                }
            }
            ApplyResult::Reported => {}
        }
    }

    fn on_undeclared(&mut self, name: &str) {
        ui::warn(&format!("{name} exists remotely, not declared locally"));
    }

    fn on_batch_complete(&mut self) {}
}

/// Ask on the terminal, defaulting to "no"
struct PromptConfirm;

impl ConfirmCallback for PromptConfirm {
    fn confirm(&mut self, prompt: &str) -> Result<bool> {
        Confirm::new()
            .with_prompt(prompt)
            .default(false)
            .interact()
            .context("Failed to read confirmation")
    }
}

// ============================================================================
// Tests
// ============================================================================
