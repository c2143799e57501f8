use std::fmt::{self, Formatter};

use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum, Debug)]
pub(crate) enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            LogLevel::Debug => write!(f, "debug"),
            LogLevel::Info => write!(f, "info"),
            LogLevel::Warn => write!(f, "warn"),
            LogLevel::Error => write!(f, "error"),
        }
    }
}

#[derive(Parser)]
/// SkillenHub database utility - create, inspect and administer the SkillenHub tables
///
/// The database location is read from the configuration file, see `skillenhub config list`.
/// Without a configuration file the database is placed in the platform data directory.
#[command(author, version, about)] // Read from Cargo.toml
pub(crate) struct Opts {
    #[command(subcommand)]
    pub cmd: Command,

    #[arg(global = true, short, long)]
    pub verbosity: Option<LogLevel>,
}

#[derive(Subcommand)]
pub(crate) enum Command {
    /// Create the schema and load the seed user
    Init,
    /// Print the DDL of every table
    Schema,
    /// List registered users
    Users(Users),
    /// Print row counts of the platform
    Stats,
    /// Issue a one-time password for a user who forgot theirs
    PasswordReset(PasswordReset),
    /// Subcommands for configuration
    Config(Config),
}

#[derive(Args)]
pub(crate) struct Users {
    /// Maximum number of users to list
    #[arg(short, long)]
    pub limit: Option<usize>,
}

#[derive(Args)]
pub(crate) struct PasswordReset {
    /// E-mail address of the account
    #[arg(short, long, required = true)]
    pub email: String,
}

#[derive(Args)]
pub(crate) struct Config {
    #[command(subcommand)]
    pub cmd: ConfigCommand,
}

/// Create, modify or list the configuration file.
#[derive(Subcommand, Clone)]
pub(crate) enum ConfigCommand {
    /// Update the configuration file
    Update(UpdateConfiguration),
    /// write current configuration to standard output
    List,
    /// Remove the current configuration
    Remove,
}

#[derive(Args, Clone)]
pub(crate) struct UpdateConfiguration {
    /// Path to the Sqlite database file
    #[arg(short, long)]
    pub database: String,
    /// Load the demo user when the schema is created
    #[arg(long)]
    pub seed_demo_user: Option<bool>,
    /// Minutes a one-time password stays valid
    #[arg(long)]
    pub otp_expiry_minutes: Option<i64>,
}
