use clap::{ArgAction, Parser};

#[derive(Parser, Debug)]
#[command(name = "chronos-sync")]
#[command(author = "Alberto Cavalcante")]
#[command(about = "Sync locally declared jobs with a Chronos scheduler", long_about = None)]
#[command(version, disable_version_flag = true)]
pub struct Cli {
    /// URI for Chronos
    #[arg(short, long, env = "CHRONOS_URI", required_unless_present = "validate")]
    pub uri: Option<String>,

    /// Path to the job configuration (contains `scheduled/` and `dependent/`)
    #[arg(short = 'p', long = "config", env = "CHRONOS_SYNC_CONFIG", value_name = "PATH")]
    pub config: String,

    /// Update local job configuration from Chronos
    #[arg(short = 'c', long)]
    pub update_from_chronos: bool,

    /// Forcefully update data in Chronos from local configuration
    #[arg(short, long)]
    pub force: bool,

    /// Delete data in Chronos without asking
    #[arg(short, long)]
    pub delete_force: bool,

    /// Validate jobs, don't do anything else. Overrides other options.
    #[arg(short = 'V', long)]
    pub validate: bool,

    /// Authentication credentials in the user:password form
    #[arg(long, env = "CHRONOS_HTTP_AUTH", value_name = "CRED", hide_env_values = true)]
    pub http_auth: Option<String>,

    /// Delete missing jobs from Chronos. Prompts for confirmation unless --delete-force is also passed.
    #[arg(long)]
    pub delete_missing: bool,

    /// Skip syncing local jobs
    #[arg(long)]
    pub skip_sync: bool,

    /// Show what would be sent without sending it
    #[arg(long)]
    pub dry_run: bool,

    /// Verbosity level
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Suppress non-essential output
    #[arg(short, long)]
    pub quiet: bool,

    /// Print version
    #[allow(dead_code)]
    #[arg(long, action = ArgAction::Version)]
    version: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_uri_required_outside_validate() {
        assert!(Cli::try_parse_from(["chronos-sync", "-p", "jobs"]).is_err());
        let cli = Cli::try_parse_from(["chronos-sync", "-p", "jobs", "-V"]).unwrap();
        assert!(cli.validate);
        assert!(cli.uri.is_none());
    }

    #[test]
    fn test_config_required() {
        assert!(Cli::try_parse_from(["chronos-sync", "-u", "http://chronos"]).is_err());
    }

    #[test]
    fn test_short_flags() {
        let cli = Cli::try_parse_from([
            "chronos-sync",
            "-u",
            "http://chronos",
            "-p",
            "jobs",
            "-f",
            "-d",
            "--delete-missing",
            "--skip-sync",
            "--http-auth",
            "ops:secret",
        ])
        .unwrap();
        assert!(cli.force);
        assert!(cli.delete_force);
        assert!(cli.delete_missing);
        assert!(cli.skip_sync);
        assert_eq!(cli.http_auth.as_deref(), Some("ops:secret"));
        assert!(!cli.update_from_chronos);
    }
}
