//! Error types for job declarations
//!
//! Every check in this crate reports a typed error instead of bailing out,
//! so callers can collect all problems of a job set in one pass.

use crate::schedule::ScheduleError;
use thiserror::Error;

/// A problem with a single job declaration
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum JobError {
    /// Missing or conflicting fields, or a name that doesn't fit its file
    #[error("job '{job}' {message}")]
    Structural {
        /// Job name as declared (may be empty if the name itself is missing)
        job: String,
        /// What is wrong with it
        message: String,
    },

    /// The schedule doesn't follow `R<n>/<start>/<interval>`
    #[error("couldn't parse schedule for job '{job}': {source}")]
    ScheduleParse {
        job: String,
        #[source]
        source: ScheduleError,
    },

    /// A parent that isn't declared anywhere in the local set
    #[error("job '{job}' has parent '{parent}' which is not defined")]
    DanglingReference { job: String, parent: String },
}

impl JobError {
    /// Create a structural error
    pub fn structural(job: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Structural {
            job: job.into(),
            message: message.into(),
        }
    }

    /// Name of the job the error is about
    pub fn job(&self) -> &str {
        match self {
            Self::Structural { job, .. }
            | Self::ScheduleParse { job, .. }
            | Self::DanglingReference { job, .. } => job,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let err = JobError::structural("nightly", "is missing required field `parents`");
        assert_eq!(
            err.to_string(),
            "job 'nightly' is missing required field `parents`"
        );

        let err = JobError::DanglingReference {
            job: "report".into(),
            parent: "etl".into(),
        };
        assert_eq!(
            err.to_string(),
            "job 'report' has parent 'etl' which is not defined"
        );
        assert_eq!(err.job(), "report");
    }
}
