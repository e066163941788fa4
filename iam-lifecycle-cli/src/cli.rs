//! CLI argument parsing using clap derive API
//!
//! This module defines the command-line interface structure using clap's derive macros.
//! It is purely declarative with no side effects or I/O.

use std::path::PathBuf;
use std::str::FromStr;

use clap::{Args, Parser, Subcommand, ValueEnum};

use iam_lifecycle_core::IamOperation;

/// iam-lifecycle -- IAM user/group lifecycle check with guaranteed cleanup.
///
/// Use `iam-lifecycle <COMMAND> --help` for subcommand details.
#[derive(Parser, Debug)]
#[command(name = "iam-lifecycle", version, about, long_about = None)]
pub struct Cli {
    /// Path to the iam-lifecycle.toml configuration file.
    ///
    /// Without this flag `./iam-lifecycle.toml` is used if present,
    /// otherwise built-in defaults.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Override log level (trace, debug, info, warn, error).
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Output format.
    #[arg(long, global = true, default_value = "text")]
    pub output: OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Supported output formats.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output.
    Text,
    /// Machine-readable JSON.
    Json,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the lifecycle scenario against the in-memory IAM service.
    Run(RunArgs),

    /// Print the ordered step plan.
    Steps,

    /// Manage configuration.
    Config(ConfigArgs),
}

// ---- run ----

/// Run the lifecycle scenario.
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Fixed prefix for the user and group names (default: generated per run).
    #[arg(long)]
    pub name_prefix: Option<String>,

    /// Fail the run when cleanup fails for a reason other than "not found".
    #[arg(long)]
    pub strict_cleanup: bool,

    /// Inject a service error into an IAM operation, e.g. `UpdateUser` or
    /// `delete-group:2` (only the 2nd call). Repeatable.
    #[arg(long = "fail", value_name = "OP[:N]", value_parser = parse_fault)]
    pub faults: Vec<FaultSpec>,

    /// Write the run's metrics in Prometheus text format to this file.
    #[arg(long, value_name = "PATH")]
    pub metrics_file: Option<PathBuf>,
}

/// Parsed `--fail` value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FaultSpec {
    pub operation: IamOperation,
    /// 1-based call number; `None` fails every call.
    pub nth_call: Option<usize>,
}

fn parse_fault(value: &str) -> Result<FaultSpec, String> {
    let (op, nth) = match value.split_once(':') {
        Some((op, nth)) => (op, Some(nth)),
        None => (value, None),
    };

    let operation = IamOperation::from_str(op)?;
    let nth_call = match nth {
        Some(n) => match n.parse::<usize>() {
            Ok(n) if n > 0 => Some(n),
            _ => return Err(format!("invalid call number '{n}' (expected a positive integer)")),
        },
        None => None,
    };

    Ok(FaultSpec {
        operation,
        nth_call,
    })
}

// ---- config ----

/// Manage iam-lifecycle configuration.
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Validate the configuration file and report errors.
    Validate,
    /// Show the effective configuration (file + env overrides + defaults).
    Show {
        /// Show only a specific section.
        #[arg(long)]
        section: Option<ConfigSection>,
    },
}

/// Top-level configuration sections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ConfigSection {
    General,
    Scenario,
    Backend,
}

impl ConfigSection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::General => "general",
            Self::Scenario => "scenario",
            Self::Backend => "backend",
        }
    }
}
