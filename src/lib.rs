//! harness-config — loader for the test harness configuration file.
//!
//! Hexagonal layout: typed configuration and validation rules in [`domain`],
//! the raw source trait in [`ports`], the INI file implementation in
//! [`adapters`]. [`loader`] wires them together; [`cli`] is the operator tool.

pub mod adapters;
pub mod cli;
pub mod domain;
pub mod loader;
pub mod ports;

pub use domain::configuration::{Autolog, ConfigSection, Configuration, EsServer, LogParser, RunTests};
pub use domain::error::{ConfigError, ErrorKind};
pub use domain::level::LogLevel;
pub use domain::value::ConfigValue;
pub use loader::{ConfigLoader, load};
