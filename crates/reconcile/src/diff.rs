//! Diff local declarations against the scheduler snapshot

use crate::classify::{JobMap, RemoteJobs};
use crate::normalize::equivalent;
use crate::types::{JobKind, JobSpec, SyncOptions, UpdateIntent};

/// Compute intents for one class of local jobs.
///
/// Intents come out in local map order. A job gets an intent when the
/// scheduler doesn't have it under the same class, when it differs, or when
/// `force` is set.
pub fn diff_class(
    local: &JobMap,
    remote: &RemoteJobs,
    kind: JobKind,
    opts: &SyncOptions,
) -> Vec<UpdateIntent> {
    local
        .values()
        .filter(|job| job.kind() == kind)
        .filter_map(|job| diff_job(job, remote.get(kind, &job.name), opts))
        .collect()
}

/// Decide whether a single job needs an update
pub fn diff_job(
    incoming: &JobSpec,
    existing: Option<&JobSpec>,
    opts: &SyncOptions,
) -> Option<UpdateIntent> {
    let Some(existing) = existing else {
        log::debug!("'{}' is not known to the scheduler", incoming.name);
        return Some(UpdateIntent {
            new: incoming.clone(),
            old: None,
        });
    };

    let comparable = drop_undeclared(existing, incoming);
    let changed = !equivalent(&comparable, incoming);
    if !changed && !opts.force {
        log::debug!("'{}' is up to date", incoming.name);
        return None;
    }

    log::debug!(
        "'{}' needs an update ({})",
        incoming.name,
        if changed { "changed" } else { "forced" }
    );
    Some(UpdateIntent {
        new: incoming.clone(),
        old: Some(existing.clone()),
    })
}

/// Remove from `existing` every optional field `incoming` doesn't declare.
///
/// A field dropped from a declaration counts as removed, so it must not
/// keep the two sides apart.
fn drop_undeclared(existing: &JobSpec, incoming: &JobSpec) -> JobSpec {
    let mut existing = existing.clone();
    if incoming.uris.is_none() {
        existing.uris = None;
    }
    existing
        .extra
        .retain(|key, _| incoming.extra.contains_key(key));
    existing
}

/// Diff summary statistics
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiffSummary {
    /// Number of jobs to create
    pub creates: usize,
    /// Number of jobs to update
    pub updates: usize,
}

impl DiffSummary {
    /// Create a summary from a list of intents
    pub fn from_intents(intents: &[UpdateIntent]) -> Self {
        let creates = intents.iter().filter(|i| i.is_create()).count();
        Self {
            creates,
            updates: intents.len() - creates,
        }
    }

    /// Total number of changes
    pub fn total(&self) -> usize {
        self.creates + self.updates
    }

    /// Check if there are any changes
    pub fn has_changes(&self) -> bool {
        self.total() > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::partition_remote;
    use crate::types::JobRecord;
    use crate::types::fixtures::{dependent, scheduled};
    use serde_json::Value;

    fn local(jobs: Vec<JobSpec>) -> JobMap {
        jobs.into_iter().map(|j| (j.name.clone(), j)).collect()
    }

    fn remote(jobs: Vec<JobSpec>) -> RemoteJobs {
        partition_remote(jobs.into_iter().map(JobRecord::from).collect())
    }

    #[test]
    fn test_create_when_missing() {
        let jobs = local(vec![scheduled("A", "R/2024-01-01T00:00:00Z/PT1H")]);
        let intents = diff_class(
            &jobs,
            &RemoteJobs::default(),
            JobKind::Scheduled,
            &SyncOptions::default(),
        );
        assert_eq!(intents.len(), 1);
        assert_eq!(intents[0].name(), "A");
        assert!(intents[0].is_create());
    }

    #[test]
    fn test_no_op_when_equal() {
        let job = scheduled("A", "R/2024-01-01T00:00:00Z/PT1H");
        let mut seen = scheduled("A", "R12/2024-01-01T00:00:00Z/PT1H");
        seen.extra.insert("successCount".into(), Value::from(12));
        seen.extra.insert("lastSuccess".into(), Value::from("2024-01-01T12:00:00Z"));

        let intents = diff_class(
            &local(vec![job]),
            &remote(vec![seen]),
            JobKind::Scheduled,
            &SyncOptions::default(),
        );
        assert!(intents.is_empty());
    }

    #[test]
    fn test_force_overrides_equality() {
        let job = dependent("B", &["A"]);
        let intents = diff_class(
            &local(vec![job.clone()]),
            &remote(vec![job]),
            JobKind::Dependent,
            &SyncOptions { force: true },
        );
        assert_eq!(intents.len(), 1);
        assert!(!intents[0].is_create());
    }

    #[test]
    fn test_update_keeps_declared_schedule() {
        let job = scheduled("A", "R/2024-02-01T00:00:00Z/PT1H");
        let seen = scheduled("A", "R4/2024-01-01T00:00:00Z/PT1H");
        let intents = diff_class(
            &local(vec![job]),
            &remote(vec![seen]),
            JobKind::Scheduled,
            &SyncOptions::default(),
        );
        assert_eq!(intents.len(), 1);
        assert_eq!(
            intents[0].new.schedule(),
            Some("R/2024-02-01T00:00:00Z/PT1H")
        );
        assert_eq!(
            intents[0].old.as_ref().and_then(JobSpec::schedule),
            Some("R4/2024-01-01T00:00:00Z/PT1H")
        );
    }

    #[test]
    fn test_fields_absent_locally_are_ignored() {
        let job = dependent("B", &["A"]);
        let mut seen = dependent("B", &["A"]);
        seen.uris = Some(vec!["s3://bucket/x".into()]);
        seen.extra.insert("epsilon".into(), Value::from("PT60S"));

        let intents = diff_class(
            &local(vec![job]),
            &remote(vec![seen]),
            JobKind::Dependent,
            &SyncOptions::default(),
        );
        assert!(intents.is_empty());
    }

    #[test]
    fn test_fields_added_locally_trigger_update() {
        let mut job = dependent("B", &["A"]);
        job.extra.insert("retries".into(), Value::from(3));
        let intents = diff_class(
            &local(vec![job]),
            &remote(vec![dependent("B", &["A"])]),
            JobKind::Dependent,
            &SyncOptions::default(),
        );
        assert_eq!(intents.len(), 1);
    }

    #[test]
    fn test_class_mismatch_is_a_create() {
        let job = scheduled("B", "R/2024-01-01T00:00:00Z/PT1H");
        let intents = diff_class(
            &local(vec![job]),
            &remote(vec![dependent("B", &["A"])]),
            JobKind::Scheduled,
            &SyncOptions::default(),
        );
        assert_eq!(intents.len(), 1);
        assert!(intents[0].is_create());
    }

    #[test]
    fn test_diff_summary() {
        let intents = vec![
            UpdateIntent {
                new: dependent("a", &[]),
                old: None,
            },
            UpdateIntent {
                new: dependent("b", &[]),
                old: Some(dependent("b", &["a"])),
            },
        ];
        let summary = DiffSummary::from_intents(&intents);
        assert_eq!(summary.creates, 1);
        assert_eq!(summary.updates, 1);
        assert!(summary.has_changes());
    }
}
