//! Comparison-stable form of a job

use crate::schedule::strip_recurrence;
use crate::types::{JobSpec, RUNTIME_FIELDS, Trigger};
use serde::Serialize;
use std::ops::Deref;

/// A job with scheduler-managed fields stripped and list fields sorted.
///
/// Only meant for comparison and for export snapshots. Requests to the
/// scheduler always carry the job as declared.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct NormalizedJob(JobSpec);

impl NormalizedJob {
    /// Unwrap into the underlying spec
    pub fn into_inner(self) -> JobSpec {
        self.0
    }
}

impl Deref for NormalizedJob {
    type Target = JobSpec;

    fn deref(&self) -> &JobSpec {
        &self.0
    }
}

/// Normalize a job for comparison. Idempotent.
pub fn normalize(job: &JobSpec) -> NormalizedJob {
    let mut job = job.clone();
    for field in RUNTIME_FIELDS {
        job.extra.remove(field);
    }

    let mut uris = job.uris.take().unwrap_or_default();
    uris.sort();
    job.uris = Some(uris);

    if let Trigger::Parents(parents) = &mut job.trigger {
        parents.sort();
    }

    NormalizedJob(job)
}

/// Compare two jobs the way a sync does.
///
/// Both sides are normalized and the repetition count of a schedule is
/// masked, since the scheduler decrements it on its own. Start time and
/// interval still count.
pub fn equivalent(a: &JobSpec, b: &JobSpec) -> bool {
    masked(a) == masked(b)
}

fn masked(job: &JobSpec) -> JobSpec {
    let mut job = normalize(job).into_inner();
    if let Trigger::Schedule(schedule) = &mut job.trigger {
        *schedule = strip_recurrence(schedule).to_string();
    }
    job
}
