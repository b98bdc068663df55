//! Core types for job reconciliation

use crate::error::JobError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

/// Fields the scheduler maintains on its own as jobs run.
pub const RUNTIME_FIELDS: [&str; 5] = [
    "successCount",
    "errorCount",
    "lastSuccess",
    "lastError",
    "errorsSinceLastSuccess",
];

/// Fixed pause between consecutive requests to the scheduler
pub const REQUEST_DELAY: Duration = Duration::from_millis(100);

/// A job record as declared locally or as returned by the scheduler.
///
/// Only the fields the reconciler reasons about are typed. Everything else
/// lands in `extra` and is carried through untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobRecord {
    pub name: String,
    pub command: String,
    pub owner: String,
    pub cpus: f64,
    pub disk: f64,
    pub mem: f64,
    #[serde(rename = "runAsUser")]
    pub run_as_user: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uris: Option<Vec<String>>,
    #[serde(rename = "highPriority", default)]
    pub high_priority: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schedule: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parents: Option<Vec<String>>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// The two job classes the scheduler knows about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum JobKind {
    /// Triggered by an ISO-8601 repeating interval
    Scheduled,
    /// Triggered when all parents complete
    Dependent,
}

impl JobKind {
    /// Name of the declaration field that marks this class
    pub fn field(&self) -> &'static str {
        match self {
            Self::Scheduled => "schedule",
            Self::Dependent => "parents",
        }
    }

    /// Name of the field this class must not carry
    pub fn foreign_field(&self) -> &'static str {
        match self {
            Self::Scheduled => "parents",
            Self::Dependent => "schedule",
        }
    }
}

impl fmt::Display for JobKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scheduled => write!(f, "scheduled"),
            Self::Dependent => write!(f, "dependent"),
        }
    }
}

/// What makes a job run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Trigger {
    /// `R<n>/<start>/<interval>`
    Schedule(String),
    /// Names of jobs that must complete first
    Parents(Vec<String>),
}

/// A classified job: exactly one trigger, never both.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "JobRecord", into = "JobRecord")]
pub struct JobSpec {
    pub name: String,
    pub command: String,
    pub owner: String,
    pub cpus: f64,
    pub disk: f64,
    pub mem: f64,
    pub run_as_user: String,
    pub uris: Option<Vec<String>>,
    pub high_priority: bool,
    pub trigger: Trigger,
    pub extra: BTreeMap<String, Value>,
}

impl JobSpec {
    /// Class of this job
    pub fn kind(&self) -> JobKind {
        match self.trigger {
            Trigger::Schedule(_) => JobKind::Scheduled,
            Trigger::Parents(_) => JobKind::Dependent,
        }
    }

    /// Declared parents; empty for scheduled jobs
    pub fn parents(&self) -> &[String] {
        match &self.trigger {
            Trigger::Parents(parents) => parents,
            Trigger::Schedule(_) => &[],
        }
    }

    /// Schedule string, if this is a scheduled job
    pub fn schedule(&self) -> Option<&str> {
        match &self.trigger {
            Trigger::Schedule(schedule) => Some(schedule),
            Trigger::Parents(_) => None,
        }
    }

    /// Build a spec from a record, forcing the class.
    ///
    /// Used for scheduler snapshots, where a record without a schedule is
    /// treated as dependent even if it lists no parents.
    pub(crate) fn from_record_as(record: JobRecord, kind: JobKind) -> Self {
        let trigger = match kind {
            JobKind::Scheduled => Trigger::Schedule(record.schedule.unwrap_or_default()),
            JobKind::Dependent => Trigger::Parents(record.parents.unwrap_or_default()),
        };
        Self {
            name: record.name,
            command: record.command,
            owner: record.owner,
            cpus: record.cpus,
            disk: record.disk,
            mem: record.mem,
            run_as_user: record.run_as_user,
            uris: record.uris,
            high_priority: record.high_priority,
            trigger,
            extra: record.extra,
        }
    }
}

impl TryFrom<JobRecord> for JobSpec {
    type Error = JobError;

    fn try_from(record: JobRecord) -> Result<Self, Self::Error> {
        let kind = match (&record.schedule, &record.parents) {
            (Some(_), None) => JobKind::Scheduled,
            (None, Some(_)) => JobKind::Dependent,
            (Some(_), Some(_)) => {
                return Err(JobError::structural(
                    &record.name,
                    "has both a schedule and parents defined",
                ));
            }
            (None, None) => {
                return Err(JobError::structural(
                    &record.name,
                    "has neither a schedule nor parents defined",
                ));
            }
        };
        Ok(Self::from_record_as(record, kind))
    }
}

impl From<JobSpec> for JobRecord {
    fn from(spec: JobSpec) -> Self {
        let (schedule, parents) = match spec.trigger {
            Trigger::Schedule(schedule) => (Some(schedule), None),
            Trigger::Parents(parents) => (None, Some(parents)),
        };
        Self {
            name: spec.name,
            command: spec.command,
            owner: spec.owner,
            cpus: spec.cpus,
            disk: spec.disk,
            mem: spec.mem,
            run_as_user: spec.run_as_user,
            uris: spec.uris,
            high_priority: spec.high_priority,
            schedule,
            parents,
            extra: spec.extra,
        }
    }
}

/// A pending create or update.
///
/// `old` is `None` when the scheduler does not know the job yet.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UpdateIntent {
    pub new: JobSpec,
    pub old: Option<JobSpec>,
}

impl UpdateIntent {
    /// Name of the job this intent applies to
    pub fn name(&self) -> &str {
        &self.new.name
    }

    /// Check if this intent creates a job the scheduler doesn't have
    pub fn is_create(&self) -> bool {
        self.old.is_none()
    }
}

/// Output of a reconciliation run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReconciliationResult {
    /// Creates and updates, scheduled jobs first, dependents in dependency-safe order
    pub intents: Vec<UpdateIntent>,
    /// Jobs the scheduler has that are not declared locally
    pub undeclared: Vec<String>,
    /// Dependent jobs emitted without their parents resolved (cycles)
    pub unresolved: Vec<String>,
}

impl ReconciliationResult {
    /// Check if there is anything to create or update
    pub fn has_updates(&self) -> bool {
        !self.intents.is_empty()
    }
}

/// Immutable options for a reconciliation run
#[derive(Debug, Clone, Copy, Default)]
pub struct SyncOptions {
    /// Emit an update even when local and remote compare equal
    pub force: bool,
}

/// Result of a single request against the scheduler
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ApplyResult {
    /// Job was created
    Created,
    /// Job was updated
    Modified,
    /// Job was deleted
    Removed,
    /// Undeclared job was only reported
    Reported,
    /// Request failed
    Failed { error: String },
    /// Request was skipped
    Skipped { reason: String },
}

impl ApplyResult {
    /// Check if the result represents success (no failure)
    pub fn is_success(&self) -> bool {
        !matches!(self, Self::Failed { .. })
    }
}

/// Summary of execution results
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecuteSummary {
    pub created: usize,
    pub modified: usize,
    pub removed: usize,
    pub reported: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl ExecuteSummary {
    /// Total number of actual changes made
    pub fn total_changes(&self) -> usize {
        self.created + self.modified + self.removed
    }

    /// Check if execution was fully successful (no failures)
    pub fn is_success(&self) -> bool {
        self.failed == 0
    }

    /// Total number of jobs processed
    pub fn total(&self) -> usize {
        self.created + self.modified + self.removed + self.reported + self.skipped + self.failed
    }

    /// Merge another summary into this one
    pub fn merge(&mut self, other: &ExecuteSummary) {
        self.created += other.created;
        self.modified += other.modified;
        self.removed += other.removed;
        self.reported += other.reported;
        self.skipped += other.skipped;
        self.failed += other.failed;
    }

    /// Add a result to the summary
    pub fn add_result(&mut self, result: &ApplyResult) {
        match result {
            ApplyResult::Created => self.created += 1,
            ApplyResult::Modified => self.modified += 1,
            ApplyResult::Removed => self.removed += 1,
            ApplyResult::Reported => self.reported += 1,
            ApplyResult::Failed { .. } => self.failed += 1,
            ApplyResult::Skipped { .. } => self.skipped += 1,
        }
    }
}

/// Options for execution
#[derive(Debug, Clone)]
pub struct ExecuteOptions {
    /// Don't send anything, just show what would happen
    pub dry_run: bool,
    /// Pause between consecutive create/update requests
    pub request_delay: Duration,
}

impl Default for ExecuteOptions {
    fn default() -> Self {
        Self {
            dry_run: false,
            request_delay: REQUEST_DELAY,
        }
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub fn record(name: &str) -> JobRecord {
        JobRecord {
            name: name.to_string(),
            command: format!("echo {name}"),
            owner: "ops@example.com".to_string(),
            cpus: 0.5,
            disk: 256.0,
            mem: 512.0,
            run_as_user: "root".to_string(),
            uris: None,
            high_priority: false,
            schedule: None,
            parents: None,
            extra: BTreeMap::new(),
        }
    }

    pub fn scheduled(name: &str, schedule: &str) -> JobSpec {
        let mut rec = record(name);
        rec.schedule = Some(schedule.to_string());
        JobSpec::try_from(rec).unwrap()
    }

    pub fn dependent(name: &str, parents: &[&str]) -> JobSpec {
        let mut rec = record(name);
        rec.parents = Some(parents.iter().map(|p| (*p).to_string()).collect());
        JobSpec::try_from(rec).unwrap()
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;

    #[test]
    fn test_try_from_requires_exactly_one_trigger() {
        let mut both = record("both");
        both.schedule = Some("R/2024-01-01T00:00:00Z/PT1H".into());
        both.parents = Some(vec!["a".into()]);
        assert!(matches!(
            JobSpec::try_from(both),
            Err(JobError::Structural { .. })
        ));

        assert!(matches!(
            JobSpec::try_from(record("neither")),
            Err(JobError::Structural { .. })
        ));
    }

    #[test]
    fn test_kind_and_accessors() {
        let job = scheduled("a", "R/2024-01-01T00:00:00Z/PT1H");
        assert_eq!(job.kind(), JobKind::Scheduled);
        assert!(job.parents().is_empty());
        assert_eq!(job.schedule(), Some("R/2024-01-01T00:00:00Z/PT1H"));

        let job = dependent("b", &["a"]);
        assert_eq!(job.kind(), JobKind::Dependent);
        assert_eq!(job.parents(), ["a".to_string()]);
        assert_eq!(job.schedule(), None);
    }

    #[test]
    fn test_json_keeps_unknown_fields() {
        let json = r#"{
            "name": "a", "command": "true", "owner": "o", "cpus": 1, "disk": 10,
            "mem": 64.5, "runAsUser": "root", "schedule": "R/2024-01-01T00:00:00Z/PT1H",
            "epsilon": "PT60S", "retries": 2
        }"#;
        let job: JobSpec = serde_json::from_str(json).unwrap();
        assert_eq!(job.kind(), JobKind::Scheduled);
        assert!(!job.high_priority);
        assert_eq!(job.cpus, 1.0);
        assert_eq!(job.extra.get("epsilon"), Some(&Value::from("PT60S")));
        assert_eq!(job.extra.get("retries"), Some(&Value::from(2)));

        let back = serde_json::to_value(&job).unwrap();
        assert_eq!(back["runAsUser"], Value::from("root"));
        assert_eq!(back["retries"], Value::from(2));
        assert!(back.get("parents").is_none());
        assert!(back.get("uris").is_none());
    }

    #[test]
    fn test_json_rejects_two_triggers() {
        let json = r#"{
            "name": "a", "command": "true", "owner": "o", "cpus": 1, "disk": 10,
            "mem": 64, "runAsUser": "root", "schedule": "R/2024-01-01T00:00:00Z/PT1H",
            "parents": ["b"]
        }"#;
        assert!(serde_json::from_str::<JobSpec>(json).is_err());
    }

    #[test]
    fn test_summary_add_result() {
        let mut summary = ExecuteSummary::default();
        summary.add_result(&ApplyResult::Created);
        summary.add_result(&ApplyResult::Modified);
        summary.add_result(&ApplyResult::Failed {
            error: "boom".into(),
        });
        summary.add_result(&ApplyResult::Reported);
        assert_eq!(summary.total_changes(), 2);
        assert_eq!(summary.total(), 4);
        assert!(!summary.is_success());
    }

    #[test]
    fn test_apply_result_kinds() {
        assert!(ApplyResult::Reported.is_success());
        assert!(
            !ApplyResult::Failed {
                error: "boom".into()
            }
            .is_success()
        );
    }
}
