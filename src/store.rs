//! On-disk job declarations
//!
//! A config directory holds `scheduled/` and `dependent/`, one YAML file per
//! job named after the job. Loading never stops at the first bad file: every
//! problem is collected so the operator sees them all at once.

use anyhow::{Context, Result};
use reconcile::{JobError, JobKind, JobRecord, RemoteJobs};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

const CONFIG_DOCS: &str =
    "https://github.com/mesos/chronos/blob/master/README.md#job-configuration";

/// Problems with a single declaration file
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{}: {source}", path.display())]
    Walk {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("{}: invalid YAML: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("{}: {source}", path.display())]
    Invalid {
        path: PathBuf,
        #[source]
        source: JobError,
    },
}

/// Everything found under a config directory
#[derive(Debug, Default)]
pub struct LoadedJobs {
    pub records: Vec<JobRecord>,
    pub errors: Vec<LoadError>,
}

impl LoadedJobs {
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Directory a job class lives in
pub fn kind_dir(root: &Path, kind: JobKind) -> PathBuf {
    root.join(kind.to_string())
}

/// Turn a job name into a file stem.
///
/// Anything up to the last `/` or `\` is dropped, then every character
/// outside `[0-9A-Za-z.-]` becomes `_`.
pub fn sanitize_name(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or(name);
    base.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Whether a file stem is an acceptable home for a job name.
///
/// A name that already ends in `.yaml`/`.yml` may drop that suffix.
fn stem_matches(stem: &str, name: &str) -> bool {
    if stem == sanitize_name(name) {
        return true;
    }
    name.strip_suffix(".yaml")
        .or_else(|| name.strip_suffix(".yml"))
        .is_some_and(|bare| stem == sanitize_name(bare))
}

fn is_yaml(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e == "yaml" || e == "yml")
}

/// Load every declaration under `root`.
///
/// A missing class directory counts as empty. Later files declaring a name
/// already seen are reported and skipped.
pub fn load(root: &Path) -> LoadedJobs {
    let mut loaded = LoadedJobs::default();
    let mut seen = HashSet::new();

    for kind in [JobKind::Dependent, JobKind::Scheduled] {
        let dir = kind_dir(root, kind);
        if !dir.is_dir() {
            log::debug!("{} does not exist, no {kind} jobs", dir.display());
            continue;
        }

        for entry in WalkDir::new(&dir)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
        {
            let entry = match entry {
                Ok(e) => e,
                Err(source) => {
                    loaded.errors.push(LoadError::Walk {
                        path: dir.clone(),
                        source,
                    });
                    continue;
                }
            };
            let path = entry.path();
            if !entry.file_type().is_file() || !is_yaml(path) {
                continue;
            }

            match load_file(path, kind) {
                Ok(record) => {
                    if seen.insert(record.name.clone()) {
                        log::debug!("loaded {kind} job '{}' from {}", record.name, path.display());
                        loaded.records.push(record);
                    } else {
                        loaded.errors.push(LoadError::Invalid {
                            path: path.to_path_buf(),
                            source: JobError::structural(&record.name, "is declared more than once"),
                        });
                    }
                }
                Err(err) => loaded.errors.push(err),
            }
        }
    }

    loaded
}

fn load_file(path: &Path, kind: JobKind) -> Result<JobRecord, LoadError> {
    let content = fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let parse_err = |source: serde_yaml::Error| LoadError::Parse {
        path: path.to_path_buf(),
        source,
    };

    let value: serde_yaml::Value = serde_yaml::from_str(&content).map_err(parse_err)?;
    let name = value
        .get("name")
        .and_then(serde_yaml::Value::as_str)
        .unwrap_or("<unnamed>")
        .to_string();
    let invalid = |message: String| LoadError::Invalid {
        path: path.to_path_buf(),
        source: JobError::structural(&name, message),
    };

    if !value.is_mapping() {
        return Err(invalid("is not a mapping".into()));
    }
    if value.get(kind.field()).is_none() {
        return Err(invalid(format!("is missing '{}' for a {kind} job", kind.field())));
    }
    if value.get(kind.foreign_field()).is_some() {
        return Err(invalid(format!(
            "has '{}', which {kind} jobs can't have",
            kind.foreign_field()
        )));
    }

    let record: JobRecord = serde_yaml::from_value(value).map_err(parse_err)?;

    let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or_default();
    if !stem_matches(stem, &record.name) {
        return Err(invalid(format!(
            "should be in {}.yaml, not {}",
            sanitize_name(&record.name),
            path.file_name().and_then(|s| s.to_str()).unwrap_or_default()
        )));
    }

    Ok(record)
}

/// Comment block written above every exported job
fn export_header(name: &str) -> String {
    format!(
        "## This file was automatically generated by `chronos-sync`.\n\
         ## If you edit it, please remove these lines as a courtesy.\n\
         #\n\
         # Chronos configuration for `{name}`\n\
         #\n\
         # For details on Chronos configuration, see:\n\
         #  {CONFIG_DOCS}\n\
         #\n"
    )
}

/// Write every remote job into the store, one file per job.
///
/// Returns the paths written.
pub fn export(root: &Path, remote: &RemoteJobs) -> Result<Vec<PathBuf>> {
    let mut written = Vec::with_capacity(remote.len());

    for job in remote.iter() {
        let dir = kind_dir(root, job.kind());
        fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create {}", dir.display()))?;

        let path = dir.join(format!("{}.yaml", sanitize_name(&job.name)));
        let body = serde_yaml::to_string(&reconcile::normalize(job))
            .with_context(|| format!("Failed to serialize job '{}'", job.name))?;
        fs::write(&path, format!("{}{body}", export_header(&job.name)))
            .with_context(|| format!("Failed to write {}", path.display()))?;

        log::debug!("exported '{}' to {}", job.name, path.display());
        written.push(path);
    }

    Ok(written)
}

// ============================================================================
// Tests
// ============================================================================
