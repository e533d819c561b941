//! Managed database cluster provisioning tool.
//!
//! Prompts for the master password, checks its length, and runs the cloud
//! CLI's `rds create-db-cluster` once with fixed deployment parameters. The
//! process exits with the cloud CLI's own status.
//!
//! # Security Guarantees
//! - Password read with terminal echo disabled
//! - Password never printed or logged
//! - No environment variables consulted

use anyhow::Context;
use clap::{Args, Parser};
use dbprovision_core::{
    ConfigOverrides, InvocationOutcome, Invoker, ProvisionConfig, ProvisionError, Result,
    SystemRunner, error::EXIT_FAILURE, exit_code_for, init_logging, security::stdin_source,
};
use std::path::PathBuf;
use tracing::debug;

#[derive(Parser, Debug)]
#[command(name = "dbprovision")]
#[command(about = "Provision a managed database cluster through the cloud CLI")]
#[command(version)]
#[command(long_about = "
dbprovision - Interactive database cluster provisioning

Prompts for the cluster's master password and runs
`aws rds create-db-cluster` once with the configured parameters.

SECURITY FEATURES:
- Password read without terminal echo
- Password never printed or logged
- Password memory zeroed after use

EXIT STATUS:
  0     cluster creation request succeeded
  1     password shorter than 16 characters, or invalid configuration
  126   cloud CLI found but could not be executed
  127   cloud CLI not found
  other the cloud CLI's own exit status

EXAMPLES:
  dbprovision
  dbprovision --profile ops --cluster-identifier chatham-prod
  dbprovision --config cluster.json --dry-run
")]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(flatten)]
    pub config: ConfigArgs,

    /// Validate and print the command without running it
    #[arg(
        long,
        help = "Validate the password and print the redacted command without running it"
    )]
    pub dry_run: bool,
}

#[derive(Args, Debug)]
pub struct ConfigArgs {
    /// JSON config file
    #[arg(
        long = "config",
        value_name = "FILE",
        help = "JSON file with provisioning parameters (missing fields use defaults)"
    )]
    pub config_file: Option<PathBuf>,

    #[arg(long, value_name = "PROGRAM", help = "Cloud CLI executable [default: aws]")]
    pub cli_program: Option<String>,

    #[arg(long, value_name = "NAME", help = "Named credential profile [default: delphis]")]
    pub profile: Option<String>,

    #[arg(
        long,
        value_name = "ID",
        help = "Cluster identifier [default: chatham-staging-aurora-pgsql]"
    )]
    pub cluster_identifier: Option<String>,

    #[arg(long, value_name = "ENGINE", help = "Database engine [default: aurora-postgresql]")]
    pub engine: Option<String>,

    #[arg(long, value_name = "VERSION", help = "Engine version [default: 11.6]")]
    pub engine_version: Option<String>,

    #[arg(long, value_name = "USER", help = "Master username [default: postgres]")]
    pub master_username: Option<String>,

    #[arg(long, value_name = "ZONE", help = "Availability zone [default: us-west-2a]")]
    pub availability_zone: Option<String>,

    #[arg(long, value_name = "NAME", help = "Initial database name [default: chatham]")]
    pub database_name: Option<String>,
}

impl ConfigArgs {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            cli_program: self.cli_program.clone(),
            profile: self.profile.clone(),
            cluster_identifier: self.cluster_identifier.clone(),
            engine: self.engine.clone(),
            engine_version: self.engine_version.clone(),
            master_username: self.master_username.clone(),
            availability_zone: self.availability_zone.clone(),
            database_name: self.database_name.clone(),
        }
    }
}

#[derive(Args, Debug)]
pub struct GlobalArgs {
    /// Increase verbosity
    #[arg(
        short,
        long,
        action = clap::ArgAction::Count,
        help = "Increase verbosity (-v, -vv, -vvv)"
    )]
    pub verbose: u8,

    /// Suppress output
    #[arg(short, long, help = "Suppress all log output except errors")]
    pub quiet: bool,
}

fn main() {
    let cli = Cli::parse();
    std::process::exit(run(&cli));
}

/// Runs the tool and returns the process exit status.
fn run(cli: &Cli) -> i32 {
    if let Err(e) = init_logging(cli.global.verbose, cli.global.quiet) {
        eprintln!("Error: {}", e);
        return EXIT_FAILURE;
    }

    let config = match build_config(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            return EXIT_FAILURE;
        }
    };

    let mut invoker = Invoker::new(config, SystemRunner::new()).with_dry_run(cli.dry_run);
    let mut source = stdin_source();
    let result = invoker.run(source.as_mut());
    report(&result);

    let code = exit_code_for(&result);
    debug!("Exiting with status {} ({:?})", code, invoker.state());
    code
}

/// Layers defaults, the optional config file, and per-field flags.
fn build_config(args: &ConfigArgs) -> anyhow::Result<ProvisionConfig> {
    let base = match &args.config_file {
        Some(path) => ProvisionConfig::from_json_file(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => ProvisionConfig::default(),
    };

    let config = base.apply_overrides(args.overrides());
    config
        .validate()
        .context("Invalid provisioning parameters")?;
    Ok(config)
}

/// Prints the operator-facing result line, if any.
///
/// The length diagnostic goes to stdout next to the prompt; other failures
/// go to stderr. A completed run prints nothing of its own, since the cloud
/// CLI already wrote its output.
fn report(result: &Result<InvocationOutcome>) {
    match result {
        Ok(InvocationOutcome::DryRun { command_line }) => println!("{}", command_line),
        Ok(InvocationOutcome::Completed(_)) => {}
        Err(e @ ProvisionError::Validation { .. }) => println!("{}", e),
        Err(e) => eprintln!("Error: {}", e),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::try_parse_from(["dbprovision"]).unwrap();
        assert!(!cli.dry_run);
        assert_eq!(cli.global.verbose, 0);
        assert!(cli.config.config_file.is_none());

        let config = build_config(&cli.config).unwrap();
        assert_eq!(config, ProvisionConfig::default());
    }

    #[test]
    fn test_cli_overrides_applied() {
        let cli = Cli::try_parse_from([
            "dbprovision",
            "--profile",
            "ops",
            "--cluster-identifier",
            "chatham-prod",
            "--availability-zone",
            "us-west-2c",
            "-vv",
            "--dry-run",
        ])
        .unwrap();

        assert!(cli.dry_run);
        assert_eq!(cli.global.verbose, 2);

        let config = build_config(&cli.config).unwrap();
        assert_eq!(config.profile, "ops");
        assert_eq!(config.cluster_identifier, "chatham-prod");
        assert_eq!(config.availability_zone, "us-west-2c");
        assert_eq!(config.engine, "aurora-postgresql");
    }

    #[test]
    fn test_flags_win_over_config_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"profile": "from-file", "database_name": "filedb"}}"#
        )
        .unwrap();

        let path = file.path().to_str().unwrap().to_string();
        let cli =
            Cli::try_parse_from(["dbprovision", "--config", &path, "--profile", "from-flag"])
                .unwrap();

        let config = build_config(&cli.config).unwrap();
        assert_eq!(config.profile, "from-flag");
        assert_eq!(config.database_name, "filedb");
    }

    #[test]
    fn test_invalid_config_file_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();

        let path = file.path().to_str().unwrap().to_string();
        let cli = Cli::try_parse_from(["dbprovision", "--config", &path]).unwrap();

        let error = build_config(&cli.config).unwrap_err();
        assert!(format!("{:#}", error).contains("Failed to load config"));
    }

    #[test]
    fn test_empty_override_rejected() {
        let cli = Cli::try_parse_from(["dbprovision", "--engine", ""]).unwrap();
        let error = build_config(&cli.config).unwrap_err();
        assert!(format!("{:#}", error).contains("engine must not be empty"));
    }

    #[test]
    fn test_no_password_flag_exists() {
        let result = Cli::try_parse_from(["dbprovision", "--master-user-password", "x"]);
        assert!(result.is_err());
    }
}
