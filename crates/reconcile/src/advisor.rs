//! Decide what to do with jobs the scheduler has but nobody declared

use crate::classify::{JobMap, RemoteJobs};
use serde::{Deserialize, Serialize};

/// How undeclared remote jobs are handled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DeletionPolicy {
    /// Only print them
    #[default]
    ReportOnly,
    /// Ask before deleting each one
    Confirm,
    /// Delete without asking
    Force,
}

impl DeletionPolicy {
    /// Derive the policy from the `delete-missing` / `delete-force` switches.
    ///
    /// `delete_force` alone does nothing; deletion must be asked for.
    pub fn from_flags(delete_missing: bool, delete_force: bool) -> Self {
        match (delete_missing, delete_force) {
            (false, _) => Self::ReportOnly,
            (true, false) => Self::Confirm,
            (true, true) => Self::Force,
        }
    }
}

/// What to do with one undeclared job
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeletionAction {
    Report,
    Confirm,
    Delete,
}

/// A single deletion decision
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeletionAdvice {
    pub name: String,
    pub action: DeletionAction,
}

/// Names the scheduler has that are not in the local set.
///
/// Dependent jobs come first, then scheduled, each in name order.
pub fn undeclared_names(local: &JobMap, remote: &RemoteJobs) -> Vec<String> {
    remote
        .iter()
        .filter(|job| !local.contains_key(&job.name))
        .map(|job| job.name.clone())
        .collect()
}

/// Classify undeclared jobs under a policy
pub fn advise(undeclared: &[String], policy: DeletionPolicy) -> Vec<DeletionAdvice> {
    let action = match policy {
        DeletionPolicy::ReportOnly => DeletionAction::Report,
        DeletionPolicy::Confirm => DeletionAction::Confirm,
        DeletionPolicy::Force => DeletionAction::Delete,
    };
    undeclared
        .iter()
        .map(|name| DeletionAdvice {
            name: name.clone(),
            action,
        })
        .collect()
}
