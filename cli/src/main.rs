//! # The SkillenHub Command Line Utility
//!
//! Creates the SkillenHub database and runs a few administrative queries against it.
//!
//! ## Configuration
//! Point the tool at a database file:
//! ```bash
//! skillenhub config update --database /var/lib/skillenhub/hub.db
//! ```
//!
//! ## Usage Examples
//!
//! Create the tables and load the seed user:
//! ```bash
//! skillenhub init
//! ```
//!
//! Print the DDL:
//! ```bash
//! skillenhub schema
//! ```
//!
//! List the first 20 users and the platform counts:
//! ```bash
//! skillenhub users --limit 20
//! skillenhub stats
//! ```
//!
//! Issue a one-time password:
//! ```bash
//! skillenhub password-reset --email ada@example.com
//! ```
//!
use clap::Parser;
use cli::{Command, LogLevel, Opts};
use commands::{configuration, init, password_reset, schema, stats, users};
use env_logger::Env;
use log::debug;
use std::env;
use std::fs::File;
use std::process::exit;

use skillenhub::{error::HubError, HubRuntime};

mod cli;
mod commands;

fn main() {
    let opts: Opts = Opts::parse();

    configure_logging(&opts); // Handles the -v option

    let result = match opts.cmd {
        Command::Init => init::execute(),
        Command::Schema => {
            schema::execute();
            Ok(())
        }
        Command::Users(args) => users::execute(&args),
        Command::Stats => stats::execute(),
        Command::PasswordReset(args) => password_reset::execute(&args),
        Command::Config(config) => {
            configuration::execute(config.cmd);
            Ok(())
        }
    };

    if let Err(err) = result {
        eprintln!("ERROR: {err}");
        exit(exit_code(&err));
    }
}

/// Creates the runtime from the configuration file, exiting if that fails
pub(crate) fn get_runtime() -> HubRuntime {
    match HubRuntime::new() {
        Ok(runtime) => runtime,
        Err(err) => {
            match err {
                HubError::ApplicationConfig { .. } | HubError::TomlParse { .. } => {
                    eprintln!(
                        "Unable to read the configuration file: '{err}'. Use 'skillenhub config update' to recreate it"
                    );
                }
                HubError::OpenDbms { .. } | HubError::CreateDir(_) => {
                    eprintln!("Unable to open the database: '{err}'");
                }
                _ => {
                    eprintln!("Failed to create runtime: '{err}'");
                }
            }

            exit(1);
        }
    }
}

fn exit_code(err: &HubError) -> i32 {
    match err {
        HubError::NotFound { .. } | HubError::ReferenceNotFound { .. } => 2,
        HubError::BadInput(_) | HubError::InvalidEnumValue { .. } => 3,
        _ => 1,
    }
}

fn configure_logging(opts: &Opts) {
    let mut tmp_dir = env::temp_dir();
    tmp_dir.push("skillenhub.log");

    if opts.verbosity.is_some() {
        println!("Logging to {}", &tmp_dir.to_string_lossy());
    }

    let target = match File::create(&tmp_dir) {
        Ok(file) => env_logger::Target::Pipe(Box::new(file)),
        Err(e) => {
            eprintln!("Can't create log file {}: {e}", tmp_dir.to_string_lossy());
            env_logger::Target::Stderr
        }
    };

    // If nothing else was specified in RUST_LOG, use 'warn'
    env_logger::Builder::from_env(Env::default().default_filter_or(
        opts.verbosity.map_or("warn", |lvl| match lvl {
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }),
    ))
    .target(target)
    .init();
    debug!("Logging started");
}
