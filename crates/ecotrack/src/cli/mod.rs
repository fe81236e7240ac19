//! Command-line interface for ecotrack.
//!
//! This module provides the CLI structure and command handlers for the
//! `ecotrac` binary.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use commands::{
    AchievementsCommand, CategoryArg, CategoryFilterArg, ConfigCommand, DifficultyArg,
    ExportCommand, FlightArg, FuelArg, LogCommand, LoginCommand, OutputFormat, ProfileCommand,
    RangeArg, RecommendCommand, RegisterCommand, ReportCommand, StatusCommand,
};

/// ecotrac - Track your personal carbon footprint
///
/// Logs emissions per activity, calculates amounts from activity details,
/// and reports your footprint against national and global baselines.
#[derive(Debug, Parser)]
#[command(name = "ecotrac")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to custom configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// The command to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Log in as a known user
    Login(LoginCommand),

    /// Register a new user and log in
    Register(RegisterCommand),

    /// Log out and clear the saved session
    Logout,

    /// Log an emission entry
    Log(LogCommand),

    /// Show the dashboard for the current user
    Status(StatusCommand),

    /// Report emissions over a time range
    Report(ReportCommand),

    /// Export filtered records as CSV
    Export(ExportCommand),

    /// List emission reduction recommendations
    Recommend(RecommendCommand),

    /// Show achievement progress
    Achievements(AchievementsCommand),

    /// Show or update the user profile
    Profile(ProfileCommand),

    /// View or validate configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

impl Cli {
    /// Get the verbosity level based on flags.
    #[must_use]
    pub fn verbosity(&self) -> crate::logging::Verbosity {
        if self.quiet {
            crate::logging::Verbosity::Quiet
        } else {
            match self.verbose {
                0 => crate::logging::Verbosity::Normal,
                1 => crate::logging::Verbosity::Verbose,
                _ => crate::logging::Verbosity::Trace,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_debug() {
        let cli = Cli::command();
        assert_eq!(cli.get_name(), "ecotrac");
    }

    #[test]
    fn test_verbosity_quiet() {
        let cli = Cli {
            config: None,
            verbose: 0,
            quiet: true,
            command: Command::Logout,
        };
        assert_eq!(cli.verbosity(), crate::logging::Verbosity::Quiet);
    }

    #[test]
    fn test_verbosity_normal() {
        let cli = Cli {
            config: None,
            verbose: 0,
            quiet: false,
            command: Command::Logout,
        };
        assert_eq!(cli.verbosity(), crate::logging::Verbosity::Normal);
    }

    #[test]
    fn test_verbosity_verbose() {
        let cli = Cli {
            config: None,
            verbose: 1,
            quiet: false,
            command: Command::Logout,
        };
        assert_eq!(cli.verbosity(), crate::logging::Verbosity::Verbose);
    }

    #[test]
    fn test_verbosity_trace() {
        let cli = Cli {
            config: None,
            verbose: 2,
            quiet: false,
            command: Command::Logout,
        };
        assert_eq!(cli.verbosity(), crate::logging::Verbosity::Trace);
    }

    #[test]
    fn test_cli_verify() {
        // Verify the CLI structure is valid
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_login() {
        let args = vec!["ecotrac", "login", "user@example.com", "-p", "demo2024"];
        let cli = Cli::try_parse_from(args).unwrap();
        match cli.command {
            Command::Login(cmd) => {
                assert_eq!(cmd.email, "user@example.com");
                assert_eq!(cmd.password, "demo2024");
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_register() {
        let args = vec![
            "ecotrac", "register", "-n", "Robin", "-e", "robin@example.com", "-p", "hunter22",
        ];
        let cli = Cli::try_parse_from(args).unwrap();
        assert!(matches!(cli.command, Command::Register(_)));
    }

    #[test]
    fn test_parse_logout() {
        let args = vec!["ecotrac", "logout"];
        let cli = Cli::try_parse_from(args).unwrap();
        assert!(matches!(cli.command, Command::Logout));
    }

    #[test]
    fn test_parse_log_calculated() {
        let args = vec![
            "ecotrac",
            "log",
            "--category",
            "transportation",
            "--type",
            "car",
            "--distance",
            "50",
            "--fuel",
            "petrol",
            "--description",
            "Commute",
        ];
        let cli = Cli::try_parse_from(args).unwrap();
        match cli.command {
            Command::Log(cmd) => {
                assert_eq!(cmd.category, CategoryArg::Transportation);
                assert_eq!(cmd.kind, "car");
                assert_eq!(cmd.amount, None);
                assert_eq!(cmd.distance, Some(50.0));
                assert_eq!(cmd.fuel, Some(FuelArg::Petrol));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_log_manual_amount() {
        let args = vec![
            "ecotrac",
            "log",
            "--category",
            "other",
            "-t",
            "shopping",
            "-a",
            "12.5",
            "--date",
            "2025-02-10",
            "--description",
            "New jacket",
        ];
        let cli = Cli::try_parse_from(args).unwrap();
        match cli.command {
            Command::Log(cmd) => {
                assert_eq!(cmd.amount, Some(12.5));
                assert_eq!(
                    cmd.date,
                    chrono::NaiveDate::from_ymd_opt(2025, 2, 10)
                );
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_status() {
        let args = vec!["ecotrac", "status"];
        let cli = Cli::try_parse_from(args).unwrap();
        assert!(matches!(cli.command, Command::Status(_)));
    }

    #[test]
    fn test_parse_report_with_filters() {
        let args = vec!["ecotrac", "report", "-r", "week", "--category", "food"];
        let cli = Cli::try_parse_from(args).unwrap();
        match cli.command {
            Command::Report(cmd) => {
                assert_eq!(cmd.range, Some(RangeArg::Week));
                assert_eq!(cmd.category, Some(CategoryFilterArg::Food));
                assert_eq!(cmd.format, OutputFormat::Plain);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_export_with_output() {
        let args = vec!["ecotrac", "export", "-o", "/tmp/out.csv"];
        let cli = Cli::try_parse_from(args).unwrap();
        match cli.command {
            Command::Export(cmd) => {
                assert_eq!(cmd.output, Some(PathBuf::from("/tmp/out.csv")));
                assert_eq!(cmd.range, None);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_recommend() {
        let args = vec!["ecotrac", "recommend", "--category", "energy", "-d", "easy"];
        let cli = Cli::try_parse_from(args).unwrap();
        match cli.command {
            Command::Recommend(cmd) => {
                assert_eq!(cmd.category, Some(CategoryArg::Energy));
                assert_eq!(cmd.difficulty, Some(DifficultyArg::Easy));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_achievements_json() {
        let args = vec!["ecotrac", "achievements", "--format", "json"];
        let cli = Cli::try_parse_from(args).unwrap();
        match cli.command {
            Command::Achievements(cmd) => assert_eq!(cmd.format, OutputFormat::Json),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_profile_update() {
        let args = vec!["ecotrac", "profile", "--email", "new@example.com"];
        let cli = Cli::try_parse_from(args).unwrap();
        match cli.command {
            Command::Profile(cmd) => {
                assert!(cmd.is_update());
                assert_eq!(cmd.email.as_deref(), Some("new@example.com"));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_config_path() {
        let args = vec!["ecotrac", "config", "path"];
        let cli = Cli::try_parse_from(args).unwrap();
        assert!(matches!(cli.command, Command::Config(ConfigCommand::Path)));
    }

    #[test]
    fn test_parse_with_config() {
        let args = vec!["ecotrac", "-c", "/custom/config.toml", "status"];
        let cli = Cli::try_parse_from(args).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("/custom/config.toml")));
    }

    #[test]
    fn test_parse_with_verbose() {
        let args = vec!["ecotrac", "-v", "status"];
        let cli = Cli::try_parse_from(args).unwrap();
        assert_eq!(cli.verbose, 1);
    }

    #[test]
    fn test_parse_with_quiet() {
        let args = vec!["ecotrac", "-q", "status"];
        let cli = Cli::try_parse_from(args).unwrap();
        assert!(cli.quiet);
    }
}
