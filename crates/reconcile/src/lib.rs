//! # Reconcile
//!
//! The core of a declarative job sync: compare locally declared jobs with a
//! scheduler snapshot and work out which requests bring the scheduler in
//! line, in an order the scheduler will accept.
//!
//! ## Core Concepts
//!
//! - **JobRecord**: A job as written down, open to fields this crate doesn't model
//! - **JobSpec**: A classified job, either scheduled or dependent
//! - **NormalizedJob**: Comparison form with runtime fields stripped and lists sorted
//! - **ReconciliationResult**: Ordered creates/updates plus undeclared remote jobs
//! - **Executor**: Sends intents and deletions one request at a time
//!
//! ## Example
//!
//! ```ignore
//! use reconcile::{
//!     classify_local, partition_remote, reconcile, advise, apply_updates,
//!     DeletionPolicy, ExecuteOptions, NoProgress, SyncOptions,
//! };
//!
//! let remote = partition_remote(scheduler.fetch_jobs()?);
//! let (local, errors) = classify_local(records);
//!
//! let result = reconcile(&local, &remote, &SyncOptions { force: false });
//! let summary = apply_updates(&result.intents, &scheduler, &ExecuteOptions::default(), &mut NoProgress);
//!
//! for advice in advise(&result.undeclared, DeletionPolicy::ReportOnly) {
//!     println!("{} exists remotely, not declared locally", advice.name);
//! }
//! ```
//!
//! ## Provider Traits
//!
//! - [`Scheduler`]: Fetches, submits and deletes jobs
//! - [`ProgressCallback`]: Receives progress updates
//! - [`ConfirmCallback`]: Handles deletion confirmations
//!
//! Everything except the executor is pure and works on in-memory data.

pub mod advisor;
pub mod classify;
pub mod context;
pub mod diff;
pub mod error;
pub mod executor;
pub mod normalize;
pub mod planner;
pub mod schedule;
pub mod types;
pub mod validate;

// Re-export main types at crate root
pub use advisor::{DeletionAction, DeletionAdvice, DeletionPolicy, advise, undeclared_names};
pub use classify::{JobMap, RemoteJobs, classify, classify_local, partition_remote};
pub use context::{
    AutoConfirm, AutoDecline, ConfirmCallback, NoProgress, ProgressCallback, Scheduler,
};
pub use diff::{DiffSummary, diff_class, diff_job};
pub use error::JobError;
pub use executor::{apply_deletions, apply_updates};
pub use normalize::{NormalizedJob, equivalent, normalize};
pub use planner::{MAX_ROUNDS, Ordering, order_dependents, reconcile};
pub use schedule::{Schedule, ScheduleError, strip_recurrence};
pub use types::{
    ApplyResult, ExecuteOptions, ExecuteSummary, JobKind, JobRecord, JobSpec, REQUEST_DELAY,
    RUNTIME_FIELDS, ReconciliationResult, SyncOptions, Trigger, UpdateIntent,
};
pub use validate::{ValidationReport, validate};
