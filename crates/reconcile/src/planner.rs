//! Reconciliation planner - builds the ordered list of intents
//!
//! Scheduled jobs have no ordering constraints and go first. Dependent jobs
//! can only be registered once all their parents exist, so they are
//! resolved in rounds: each round takes every pending job whose parents are
//! not pending themselves.

use crate::advisor::undeclared_names;
use crate::classify::{JobMap, RemoteJobs};
use crate::diff::diff_class;
use crate::types::{JobKind, ReconciliationResult, SyncOptions, UpdateIntent};
use std::collections::HashSet;

/// Upper bound on dependency resolution rounds
pub const MAX_ROUNDS: usize = 100;

/// Dependent intents in application order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Ordering {
    /// Every input intent, exactly once
    pub ordered: Vec<UpdateIntent>,
    /// Names appended without their parents resolved
    pub unresolved: Vec<String>,
}

/// Order dependent intents so parents are applied before children.
///
/// Eligibility in a round is checked against the names pending when the
/// round started, so a parent and child never go out in the same round.
/// Whatever is left after [`MAX_ROUNDS`] (cycles, self-references) is
/// appended in its current order and reported in `unresolved`.
pub fn order_dependents(intents: Vec<UpdateIntent>) -> Ordering {
    let mut pending = intents;
    let mut ordered = Vec::with_capacity(pending.len());

    for round in 1..=MAX_ROUNDS {
        if pending.is_empty() {
            break;
        }

        let blocked: HashSet<String> = pending.iter().map(|i| i.name().to_string()).collect();
        let (ready, rest): (Vec<_>, Vec<_>) = pending
            .into_iter()
            .partition(|intent| intent.new.parents().iter().all(|p| !blocked.contains(p)));
        pending = rest;

        log::debug!(
            "dependency round {round}: {} ready, {} pending",
            ready.len(),
            pending.len()
        );

        // A round without progress leaves the next one with the same snapshot
        if ready.is_empty() {
            break;
        }
        ordered.extend(ready);
    }

    let unresolved: Vec<String> = pending.iter().map(|i| i.name().to_string()).collect();
    if !unresolved.is_empty() {
        log::warn!(
            "could not resolve dependency order for: {}",
            unresolved.join(", ")
        );
    }
    ordered.extend(pending);

    Ordering {
        ordered,
        unresolved,
    }
}

/// Reconcile local declarations against a scheduler snapshot.
///
/// Produces scheduled intents in local order, then dependent intents in
/// dependency order, plus the names the scheduler has that are not
/// declared locally.
pub fn reconcile(local: &JobMap, remote: &RemoteJobs, opts: &SyncOptions) -> ReconciliationResult {
    let mut intents = diff_class(local, remote, JobKind::Scheduled, opts);
    let dependents = diff_class(local, remote, JobKind::Dependent, opts);

    let Ordering {
        ordered,
        unresolved,
    } = order_dependents(dependents);
    intents.extend(ordered);

    ReconciliationResult {
        intents,
        undeclared: undeclared_names(local, remote),
        unresolved,
    }
}
