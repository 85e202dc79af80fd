//! CLI definition and dispatch.

use clap::{ArgAction, Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use crate::domain::configuration::Configuration;
use crate::domain::error::ConfigError;
use crate::domain::value::ConfigValue;
use crate::loader::ConfigLoader;

#[derive(Parser, Debug)]
#[command(
    name = "harness-config",
    about = "Validate and inspect test harness configuration files",
    version
)]
pub struct Cli {
    /// More log output (-v info, -vv debug); RUST_LOG overrides
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Check that a configuration file loads
    Validate {
        #[arg(short, long)]
        config: PathBuf,
        /// Reject keys and sections outside the schema
        #[arg(long)]
        strict: bool,
    },
    /// Print the configuration with defaults filled in
    Show {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(short, long)]
        section: Option<String>,
    },
    /// Print a single value
    Get {
        #[arg(short, long)]
        config: PathBuf,
        section: String,
        key: String,
    },
}

pub fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

pub fn run(cli: Cli) -> ExitCode {
    match execute(&cli.command) {
        Ok(output) => {
            print!("{output}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

/// Runs `command` and returns what it would print on stdout.
pub fn execute(command: &Command) -> Result<String, ConfigError> {
    match command {
        Command::Validate { config, strict } => {
            let loaded = ConfigLoader::new().deny_unknown(*strict).load(config)?;
            Ok(validate_summary(config, &loaded))
        }
        Command::Show { config, section } => {
            let loaded = ConfigLoader::new().load(config)?;
            match section {
                None => Ok(loaded.to_string()),
                Some(name) => loaded
                    .render_section(name)
                    .ok_or_else(|| ConfigError::Unrecognized {
                        section: name.clone(),
                        key: None,
                    }),
            }
        }
        Command::Get {
            config,
            section,
            key,
        } => {
            let loaded = ConfigLoader::new().load(config)?;
            match loaded.get(section, key)? {
                ConfigValue::Unset => Err(ConfigError::missing(section, key)),
                value => Ok(format!("{value}\n")),
            }
        }
    }
}

fn validate_summary(path: &Path, config: &Configuration) -> String {
    let runtests = config.runtests();
    let autolog = config.autolog();
    format!(
        "{}: ok\n  runtests: time_out {}s, console {}, file {}\n  autolog: {} index {}, submit_log {}, include_pass {}\n",
        path.display(),
        runtests.time_out.as_secs(),
        runtests.console_level,
        runtests.file_level,
        autolog.es_server,
        autolog.index,
        autolog.submit_log,
        autolog.include_pass,
    )
}
