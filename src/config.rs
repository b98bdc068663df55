//! Run options resolved once from the command line

use anyhow::{Context, Result, bail};
use chronos_client::Credentials;
use reconcile::{DeletionPolicy, ExecuteOptions, REQUEST_DELAY, SyncOptions};
use std::path::PathBuf;

use crate::cli::Cli;

/// What a run does
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Check the local declarations only
    Validate,
    /// Write the scheduler's jobs to the local store
    Export,
    /// Push local declarations to the scheduler
    Sync,
}

/// Everything a command needs to know about this run
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub mode: Mode,
    pub uri: Option<String>,
    pub config_dir: PathBuf,
    pub credentials: Option<Credentials>,
    pub force: bool,
    pub skip_sync: bool,
    pub dry_run: bool,
    pub deletion: DeletionPolicy,
    pub quiet: bool,
}

impl RunOptions {
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let mode = if cli.validate {
            Mode::Validate
        } else if cli.update_from_chronos {
            Mode::Export
        } else {
            Mode::Sync
        };

        let uri = cli
            .uri
            .as_deref()
            .map(str::trim)
            .filter(|u| !u.is_empty())
            .map(ToString::to_string);
        if mode != Mode::Validate && uri.is_none() {
            bail!("--uri is required unless --validate is given");
        }

        let credentials = cli
            .http_auth
            .as_deref()
            .map(Credentials::parse)
            .transpose()
            .context("Invalid --http-auth value")?;

        Ok(Self {
            mode,
            uri,
            config_dir: expand(&cli.config),
            credentials,
            force: cli.force,
            skip_sync: cli.skip_sync,
            dry_run: cli.dry_run,
            deletion: DeletionPolicy::from_flags(cli.delete_missing, cli.delete_force),
            quiet: cli.quiet,
        })
    }

    pub fn sync_options(&self) -> SyncOptions {
        SyncOptions { force: self.force }
    }

    pub fn execute_options(&self) -> ExecuteOptions {
        ExecuteOptions {
            dry_run: self.dry_run,
            request_delay: REQUEST_DELAY,
        }
    }
}

/// Expand `~` and environment variables in a path
pub fn expand(path: &str) -> PathBuf {
    let expanded = shellexpand::full(path).unwrap_or(std::borrow::Cow::Borrowed(path));
    PathBuf::from(expanded.as_ref())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn options(args: &[&str]) -> Result<RunOptions> {
        let mut argv = vec!["chronos-sync"];
        argv.extend_from_slice(args);
        RunOptions::from_cli(&Cli::try_parse_from(argv)?)
    }

    #[test]
    fn test_validate_wins() {
        let opts = options(&["-p", "jobs", "-V", "-c", "-u", "http://chronos"]).unwrap();
        assert_eq!(opts.mode, Mode::Validate);
    }

    #[test]
    fn test_export_over_sync() {
        let opts = options(&["-p", "jobs", "-c", "-u", "http://chronos"]).unwrap();
        assert_eq!(opts.mode, Mode::Export);

        let opts = options(&["-p", "jobs", "-u", "http://chronos"]).unwrap();
        assert_eq!(opts.mode, Mode::Sync);
    }

    #[test]
    fn test_blank_uri_rejected() {
        assert!(options(&["-p", "jobs", "-u", "  "]).is_err());
    }

    #[test]
    fn test_deletion_policy() {
        let opts = options(&["-p", "jobs", "-u", "http://c"]).unwrap();
        assert_eq!(opts.deletion, DeletionPolicy::ReportOnly);

        let opts = options(&["-p", "jobs", "-u", "http://c", "--delete-missing"]).unwrap();
        assert_eq!(opts.deletion, DeletionPolicy::Confirm);

        let opts = options(&["-p", "jobs", "-u", "http://c", "--delete-missing", "-d"]).unwrap();
        assert_eq!(opts.deletion, DeletionPolicy::Force);

        let opts = options(&["-p", "jobs", "-u", "http://c", "-d"]).unwrap();
        assert_eq!(opts.deletion, DeletionPolicy::ReportOnly);
    }

    #[test]
    fn test_credentials_parsed() {
        let opts = options(&["-p", "jobs", "-u", "http://c", "--http-auth", " ops : pw "]).unwrap();
        let creds = opts.credentials.unwrap();
        assert_eq!(creds.user, "ops");
        assert_eq!(creds.password, "pw");

        assert!(options(&["-p", "jobs", "-u", "http://c", "--http-auth", "a:b:c"]).is_err());
    }

    #[test]
    fn test_expand_absolute() {
        assert_eq!(expand("/srv/jobs"), PathBuf::from("/srv/jobs"));
    }

    #[test]
    fn test_expand_unknown_var_unchanged() {
        assert_eq!(
            expand("$CHRONOS_SYNC_SURELY_UNSET/jobs"),
            PathBuf::from("$CHRONOS_SYNC_SURELY_UNSET/jobs")
        );
    }
}
