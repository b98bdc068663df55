//! Execution engine - applies intents and deletions one request at a time
//!
//! Nothing here runs concurrently. Create/update requests are spaced by a
//! fixed delay so a large sync doesn't flood the scheduler. A failed request
//! is recorded and the batch moves on.

use crate::advisor::{DeletionAction, DeletionAdvice};
use crate::context::{ConfirmCallback, ProgressCallback, Scheduler};
use crate::types::{ApplyResult, ExecuteOptions, ExecuteSummary, UpdateIntent};

/// Submit every intent in order
///
/// # Arguments
/// * `intents` - Intents in application order
/// * `scheduler` - Where requests go
/// * `opts` - Dry run and request spacing
/// * `progress` - Progress callback
pub fn apply_updates<S, P>(
    intents: &[UpdateIntent],
    scheduler: &S,
    opts: &ExecuteOptions,
    progress: &mut P,
) -> ExecuteSummary
where
    S: Scheduler + ?Sized,
    P: ProgressCallback,
{
    let mut summary = ExecuteSummary::default();
    if intents.is_empty() {
        return summary;
    }

    progress.on_batch_start(intents.len(), "update");
    for (idx, intent) in intents.iter().enumerate() {
        let name = intent.name();
        if opts.dry_run {
            let result = ApplyResult::Skipped {
                reason: "Dry run".into(),
            };
            progress.on_job_complete(name, &result);
            summary.add_result(&result);
            continue;
        }

        progress.on_job_start(name, "POST");
        let result = match scheduler.submit(&intent.new) {
            Ok(()) if intent.is_create() => ApplyResult::Created,
            Ok(()) => ApplyResult::Modified,
            Err(e) => {
                log::warn!("error updating job {name}: {e:#}");
                ApplyResult::Failed {
                    error: format!("{e:#}"),
                }
            }
        };
        progress.on_job_complete(name, &result);
        summary.add_result(&result);

        if idx + 1 < intents.len() && !opts.request_delay.is_zero() {
            std::thread::sleep(opts.request_delay);
        }
    }
    progress.on_batch_complete();

    summary
}

/// Act on deletion advice
///
/// Reported jobs only reach the progress callback. Jobs that need
/// confirmation are deleted only when the callback agrees; a prompt that
/// fails counts as a "no".
pub fn apply_deletions<S, C, P>(
    advice: &[DeletionAdvice],
    scheduler: &S,
    opts: &ExecuteOptions,
    confirm: &mut C,
    progress: &mut P,
) -> ExecuteSummary
where
    S: Scheduler + ?Sized,
    C: ConfirmCallback,
    P: ProgressCallback,
{
    let mut summary = ExecuteSummary::default();
    if advice.is_empty() {
        return summary;
    }

    progress.on_batch_start(advice.len(), "delete");
    for item in advice {
        let name = item.name.as_str();
        let delete = match item.action {
            DeletionAction::Report => {
                progress.on_undeclared(name);
                summary.add_result(&ApplyResult::Reported);
                continue;
            }
            DeletionAction::Delete => true,
            DeletionAction::Confirm => {
                progress.on_undeclared(name);
                match confirm.confirm(&format!("Delete {name}?")) {
                    Ok(answer) => answer,
                    Err(e) => {
                        log::warn!("could not ask about {name}: {e:#}");
                        false
                    }
                }
            }
        };

        let result = if !delete {
            ApplyResult::Skipped {
                reason: "Not confirmed".into(),
            }
        } else if opts.dry_run {
            ApplyResult::Skipped {
                reason: "Dry run".into(),
            }
        } else {
            progress.on_job_start(name, "DELETE");
            match scheduler.delete(name) {
                Ok(()) => ApplyResult::Removed,
                Err(e) => {
                    log::warn!("error deleting job {name}: {e:#}");
                    ApplyResult::Failed {
                        error: format!("{e:#}"),
                    }
                }
            }
        };
        progress.on_job_complete(name, &result);
        summary.add_result(&result);
    }
    progress.on_batch_complete();

    summary
}
