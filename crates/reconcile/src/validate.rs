//! Static checks over a local job set, no scheduler involved

use crate::error::JobError;
use crate::schedule::Schedule;
use crate::types::JobRecord;
use std::collections::HashSet;

/// Every problem found in a job set
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    pub errors: Vec<JobError>,
}

impl ValidationReport {
    /// Check if no job failed
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Validate a set of declared records.
///
/// Each job needs exactly one of `schedule` or `parents`, a schedule must
/// parse, and every parent must be declared in the same set. All failures
/// are collected.
pub fn validate(records: &[JobRecord]) -> ValidationReport {
    let names: HashSet<&str> = records.iter().map(|r| r.name.as_str()).collect();
    let mut report = ValidationReport::default();
    let mut seen = HashSet::new();

    for record in records {
        if !seen.insert(record.name.as_str()) {
            report
                .errors
                .push(JobError::structural(&record.name, "is declared more than once"));
        }

        match (&record.schedule, &record.parents) {
            (Some(schedule), None) => {
                if let Err(source) = Schedule::parse(schedule) {
                    report.errors.push(JobError::ScheduleParse {
                        job: record.name.clone(),
                        source,
                    });
                }
            }
            (None, Some(parents)) => {
                for parent in parents {
                    if !names.contains(parent.as_str()) {
                        report.errors.push(JobError::DanglingReference {
                            job: record.name.clone(),
                            parent: parent.clone(),
                        });
                    }
                }
            }
            (Some(_), Some(_)) => report.errors.push(JobError::structural(
                &record.name,
                "has both a schedule and parents defined",
            )),
            (None, None) => report.errors.push(JobError::structural(
                &record.name,
                "has neither a schedule nor parents defined",
            )),
        }
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::ScheduleError;
    use crate::types::fixtures::record;

    fn scheduled(name: &str, schedule: &str) -> JobRecord {
        let mut rec = record(name);
        rec.schedule = Some(schedule.to_string());
        rec
    }

    fn dependent(name: &str, parents: &[&str]) -> JobRecord {
        let mut rec = record(name);
        rec.parents = Some(parents.iter().map(|p| (*p).to_string()).collect());
        rec
    }

    #[test]
    fn test_valid_set() {
        let report = validate(&[
            scheduled("a", "R/2024-01-01T00:00:00Z/PT1H"),
            dependent("b", &["a"]),
            dependent("c", &["a", "b"]),
        ]);
        assert!(report.is_valid(), "{:?}", report.errors);
    }

    #[test]
    fn test_both_schedule_and_parents() {
        let mut both = scheduled("both", "R/2024-01-01T00:00:00Z/PT1H");
        both.parents = Some(vec![]);
        let report = validate(&[both]);
        assert!(!report.is_valid());
        assert!(matches!(
            &report.errors[0],
            JobError::Structural { job, .. } if job == "both"
        ));
    }

    #[test]
    fn test_neither_schedule_nor_parents() {
        let report = validate(&[record("bare")]);
        assert!(matches!(&report.errors[..], [JobError::Structural { .. }]));
    }

    #[test]
    fn test_bad_schedule() {
        let report = validate(&[scheduled("a", "R/not-a-date/PT1H")]);
        assert_eq!(
            report.errors,
            [JobError::ScheduleParse {
                job: "a".into(),
                source: ScheduleError::Start("not-a-date".into()),
            }]
        );
    }

    #[test]
    fn test_collects_every_failure() {
        let report = validate(&[
            scheduled("a", "hourly"),
            dependent("b", &["a", "ghost"]),
            dependent("c", &["phantom"]),
            scheduled("a", "R/2024-01-01T00:00:00Z/PT1H"),
        ]);
        assert_eq!(report.errors.len(), 4);
        assert!(report.errors.contains(&JobError::DanglingReference {
            job: "b".into(),
            parent: "ghost".into(),
        }));
        assert!(report.errors.contains(&JobError::DanglingReference {
            job: "c".into(),
            parent: "phantom".into(),
        }));
    }
}
