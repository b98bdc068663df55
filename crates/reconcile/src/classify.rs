//! Split job records into scheduled and dependent sets

use crate::error::JobError;
use crate::normalize::normalize;
use crate::types::{JobKind, JobRecord, JobSpec};
use std::collections::BTreeMap;

/// Jobs keyed by name
pub type JobMap = BTreeMap<String, JobSpec>;

/// A scheduler snapshot, split by class
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RemoteJobs {
    pub scheduled: JobMap,
    pub dependent: JobMap,
}

impl RemoteJobs {
    /// Look up a job of a given class
    pub fn get(&self, kind: JobKind, name: &str) -> Option<&JobSpec> {
        match kind {
            JobKind::Scheduled => self.scheduled.get(name),
            JobKind::Dependent => self.dependent.get(name),
        }
    }

    /// Number of jobs in both classes
    pub fn len(&self) -> usize {
        self.scheduled.len() + self.dependent.len()
    }

    /// Check if the snapshot is empty
    pub fn is_empty(&self) -> bool {
        self.scheduled.is_empty() && self.dependent.is_empty()
    }

    /// All jobs, dependent first, each class in name order
    pub fn iter(&self) -> impl Iterator<Item = &JobSpec> {
        self.dependent.values().chain(self.scheduled.values())
    }
}

/// Classify a locally declared record.
///
/// A declaration must carry exactly one of `schedule` or `parents`.
pub fn classify(record: JobRecord) -> Result<JobSpec, JobError> {
    JobSpec::try_from(record)
}

/// Classify a set of local records into a job map.
///
/// Records that fail are left out and their errors returned alongside.
pub fn classify_local(records: Vec<JobRecord>) -> (JobMap, Vec<JobError>) {
    let mut jobs = JobMap::new();
    let mut errors = Vec::new();
    for record in records {
        match classify(record) {
            Ok(job) => {
                if jobs.contains_key(&job.name) {
                    errors.push(JobError::structural(&job.name, "is declared more than once"));
                } else {
                    jobs.insert(job.name.clone(), job);
                }
            }
            Err(err) => errors.push(err),
        }
    }
    (jobs, errors)
}

/// Split a scheduler snapshot by class.
///
/// The scheduler is trusted here: a record with a schedule is scheduled,
/// anything else is dependent. Records are normalized on the way in.
pub fn partition_remote(records: Vec<JobRecord>) -> RemoteJobs {
    let mut remote = RemoteJobs::default();
    for record in records {
        let kind = if record.schedule.is_some() {
            JobKind::Scheduled
        } else {
            JobKind::Dependent
        };
        let job = normalize(&JobSpec::from_record_as(record, kind)).into_inner();
        log::debug!("remote {} job '{}'", kind, job.name);
        match kind {
            JobKind::Scheduled => remote.scheduled.insert(job.name.clone(), job),
            JobKind::Dependent => remote.dependent.insert(job.name.clone(), job),
        };
    }
    remote
}
