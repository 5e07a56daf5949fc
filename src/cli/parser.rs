use crate::export::ExportFormat;
use clap::{Args, Parser, Subcommand};

/// Command-line interface definition for timekeeper
/// CLI dashboard over geofenced clock-in / clock-out records stored in SQLite
#[derive(Parser)]
#[command(
    name = "timekeeper",
    version = env!("CARGO_PKG_VERSION"),
    about = "Work-hours dashboard: filter, aggregate, correct and export clock-in/clock-out records",
    long_about = None
)]
pub struct Cli {
    /// Override database path (useful for tests or custom DB)
    #[arg(global = true, long = "db")]
    pub db: Option<String>,

    /// Owner id whose records are shown (overrides `owner_id` in the config)
    #[arg(global = true, long = "owner")]
    pub owner: Option<String>,

    /// Calendar zone: local, utc or an offset like +02:00 (overrides the config)
    #[arg(global = true, long = "tz")]
    pub tz: Option<String>,

    /// Print debug diagnostics on stderr
    #[arg(global = true, long = "verbose", short = 'v')]
    pub verbose: bool,

    /// Run in test mode (config file neither read nor written)
    #[arg(global = true, long = "test", hide = true)]
    pub test: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Time window shared by the dashboard views and export.
#[derive(Args, Debug, Clone, Default)]
pub struct PeriodArgs {
    #[arg(
        long,
        short,
        conflicts_with = "last",
        help = "Year, month, day or range: 2024, 2024-03, 2024-03-01, 2024-03-01:2024-03-07"
    )]
    pub period: Option<String>,

    #[arg(long, value_name = "DAYS", help = "Rolling window of the last N days")]
    pub last: Option<u32>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database and configuration
    Init,

    /// Manage the configuration file (view or edit)
    Config {
        #[arg(long = "print", help = "Print the current configuration")]
        print_config: bool,

        #[arg(
            long = "edit",
            help = "Edit the configuration file (default editor: $EDITOR, or nano/notepad)"
        )]
        edit_config: bool,

        #[arg(
            long = "editor",
            help = "Specify the editor to use (vim, nano, or custom path)"
        )]
        editor: Option<String>,
    },

    /// List the records of the period, newest first
    List {
        #[command(flatten)]
        range: PeriodArgs,
    },

    /// Show the stat cards for the period
    Stats {
        #[command(flatten)]
        range: PeriodArgs,
    },

    /// Show hours per day for the period
    Chart {
        #[command(flatten)]
        range: PeriodArgs,
    },

    /// Correct the clock-in or clock-out of a record
    Edit {
        /// Record id
        id: String,

        /// Field to correct: start (in) or end (out)
        field: String,

        /// New value: HH:MM, YYYY-MM-DD HH:MM or RFC3339
        value: String,

        #[arg(long, help = "Why the value was corrected")]
        reason: Option<String>,

        #[arg(
            long = "request-id",
            help = "Idempotency key: repeating a request with the same key is a no-op"
        )]
        request_id: Option<String>,
    },

    /// Export the work-hours report of the period
    Export {
        #[arg(long, value_enum, default_value = "xlsx", help = "Export format")]
        format: ExportFormat,

        #[arg(long, value_name = "FILE", help = "Output file (default: timekeeper-<start>-<end>.<ext>)")]
        file: Option<String>,

        #[command(flatten)]
        range: PeriodArgs,

        #[arg(long, help = "Overwrite an existing file without asking")]
        force: bool,
    },

    /// Import locations and records from a JSON file
    Import {
        /// JSON file with `locations` and `records` arrays
        file: String,
    },

    /// List the owner's locations
    Locations,

    /// Print or manage the internal log table
    Log {
        #[arg(long = "print", help = "Print rows from the internal log table")]
        print: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn period_and_last_conflict() {
        let r = Cli::try_parse_from(["timekeeper", "stats", "--period", "2024-03", "--last", "7"]);
        assert!(r.is_err());
    }

    #[test]
    fn edit_positional_arguments() {
        let cli = Cli::try_parse_from([
            "timekeeper", "--owner", "u1", "edit", "r1", "start", "08:15", "--reason", "late sync",
        ])
        .unwrap();
        match cli.command {
            Commands::Edit {
                id, field, value, reason, ..
            } => {
                assert_eq!((id.as_str(), field.as_str(), value.as_str()), ("r1", "start", "08:15"));
                assert_eq!(reason.as_deref(), Some("late sync"));
            }
            _ => panic!("expected edit"),
        }
    }
}
