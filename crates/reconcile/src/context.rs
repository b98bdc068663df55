//! Provider traits for the executor
//!
//! These traits allow the reconcile crate to be used without depending on a
//! specific HTTP client, terminal, or prompt implementation.

use crate::types::{ApplyResult, JobRecord, JobSpec};
use anyhow::Result;

/// Access to the remote scheduler
///
/// Implement this trait to talk to a real scheduler. Every call is a single
/// request; implementations should not retry.
pub trait Scheduler {
    /// Fetch every job the scheduler knows about
    fn fetch_jobs(&self) -> Result<Vec<JobRecord>>;

    /// Create or update a job
    fn submit(&self, job: &JobSpec) -> Result<()>;

    /// Delete a job by name
    fn delete(&self, name: &str) -> Result<()>;
}

/// Progress callback for execution operations
///
/// Implement this trait to receive progress updates during execution.
pub trait ProgressCallback {
    /// Called when starting a batch of requests
    fn on_batch_start(&mut self, count: usize, label: &str);

    /// Called right before a request for a job is sent
    fn on_job_start(&mut self, name: &str, action: &str);

    /// Called when a request completes
    fn on_job_complete(&mut self, name: &str, result: &ApplyResult);

    /// Called for an undeclared job that is only reported
    fn on_undeclared(&mut self, name: &str);

    /// Called when a batch completes
    fn on_batch_complete(&mut self);
}

/// Confirmation callback for user interaction
pub trait ConfirmCallback {
    /// Ask the user to confirm an action
    ///
    /// # Returns
    /// `true` if the user confirmed, `false` otherwise
    fn confirm(&mut self, prompt: &str) -> Result<bool>;
}

/// No-op progress callback
pub struct NoProgress;

impl ProgressCallback for NoProgress {
    fn on_batch_start(&mut self, _count: usize, _label: &str) {}
    fn on_job_start(&mut self, _name: &str, _action: &str) {}
    fn on_job_complete(&mut self, _name: &str, _result: &ApplyResult) {}
    fn on_undeclared(&mut self, _name: &str) {}
    fn on_batch_complete(&mut self) {}
}

/// Auto-confirm callback (always returns true)
pub struct AutoConfirm;

impl ConfirmCallback for AutoConfirm {
    fn confirm(&mut self, _prompt: &str) -> Result<bool> {
        Ok(true)
    }
}

/// Auto-decline callback (always returns false)
pub struct AutoDecline;

impl ConfirmCallback for AutoDecline {
    fn confirm(&mut self, _prompt: &str) -> Result<bool> {
        Ok(false)
    }
}
