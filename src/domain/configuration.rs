//! The loaded, immutable configuration.
//!
//! A [`Configuration`] holds every section as typed [`ConfigValue`]s plus two
//! typed views, [`RunTests`] and [`Autolog`], for the collaborators that read
//! them. It is built once by [`crate::domain::resolve`] and handed to callers
//! by reference; nothing mutates it afterwards.

use crate::domain::error::ConfigError;
use crate::domain::level::LogLevel;
use crate::domain::value::ConfigValue;
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ConfigSection {
    values: BTreeMap<String, ConfigValue>,
}

impl ConfigSection {
    pub(crate) fn insert(&mut self, key: &str, value: ConfigValue) {
        self.values.insert(key.to_string(), value);
    }

    pub fn get(&self, key: &str) -> Option<&ConfigValue> {
        self.values.get(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ConfigValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Settings consumed by the test executor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunTests {
    pub xre_path: PathBuf,
    pub utility_path: PathBuf,
    pub minidump_stackwalk: Option<PathBuf>,
    pub androidprocname: Option<String>,
    pub console_level: LogLevel,
    pub file_level: LogLevel,
    pub time_out: Duration,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EsServer {
    pub host: String,
    pub port: u16,
}

/// Parses `host:port`; the port must fit in a `u16`.
impl FromStr for EsServer {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (host, port) = s
            .rsplit_once(':')
            .ok_or_else(|| format!("expected `host:port`, found `{s}`"))?;
        if host.is_empty() || host.contains(char::is_whitespace) {
            return Err(format!("invalid host in `{s}`"));
        }
        let port = port
            .parse::<u16>()
            .map_err(|_| format!("invalid port in `{s}`"))?;
        Ok(Self {
            host: host.to_string(),
            port,
        })
    }
}

impl fmt::Display for EsServer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogParser {
    Legacy,
    New,
}

/// Settings consumed by the result-submission client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Autolog {
    pub es_server: EsServer,
    pub rest_server: String,
    pub index: String,
    pub include_pass: bool,
    pub submit_log: bool,
    pub use_newparser: bool,
}

impl Autolog {
    pub fn log_parser(&self) -> LogParser {
        if self.use_newparser {
            LogParser::New
        } else {
            LogParser::Legacy
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Configuration {
    sections: BTreeMap<String, ConfigSection>,
    runtests: RunTests,
    autolog: Autolog,
}

impl Configuration {
    pub(crate) fn new(
        sections: BTreeMap<String, ConfigSection>,
        runtests: RunTests,
        autolog: Autolog,
    ) -> Self {
        Self {
            sections,
            runtests,
            autolog,
        }
    }

    pub fn runtests(&self) -> &RunTests {
        &self.runtests
    }

    pub fn autolog(&self) -> &Autolog {
        &self.autolog
    }

    pub fn sections(&self) -> impl Iterator<Item = &str> {
        self.sections.keys().map(String::as_str)
    }

    pub fn section(&self, name: &str) -> Option<&ConfigSection> {
        self.sections.get(name)
    }

    /// Any key that survived loading, including `Unset` optionals.
    pub fn get(&self, section: &str, key: &str) -> Result<&ConfigValue, ConfigError> {
        self.sections
            .get(section)
            .and_then(|s| s.get(key))
            .ok_or_else(|| ConfigError::missing(section, key))
    }

    pub fn get_str(&self, section: &str, key: &str) -> Result<&str, ConfigError> {
        match self.get(section, key)? {
            ConfigValue::Str(s) => Ok(s),
            ConfigValue::Unset => Err(ConfigError::missing(section, key)),
            other => Err(type_mismatch(section, key, "string", other)),
        }
    }

    pub fn get_int(&self, section: &str, key: &str) -> Result<i64, ConfigError> {
        let value = self.get(section, key)?;
        value
            .as_int()
            .ok_or_else(|| type_mismatch(section, key, "integer", value))
    }

    pub fn get_bool(&self, section: &str, key: &str) -> Result<bool, ConfigError> {
        let value = self.get(section, key)?;
        value
            .as_bool()
            .ok_or_else(|| type_mismatch(section, key, "boolean", value))
    }

    /// Canonical INI text for one section, `None` if it does not exist.
    pub fn render_section(&self, name: &str) -> Option<String> {
        let section = self.sections.get(name)?;
        let mut out = String::new();
        write_section(&mut out, name, section);
        Some(out)
    }
}

fn type_mismatch(section: &str, key: &str, expected: &str, found: &ConfigValue) -> ConfigError {
    ConfigError::invalid(
        section,
        key,
        format!("expected {expected}, found {}", found.type_name()),
    )
}

fn write_section(out: &mut String, name: &str, section: &ConfigSection) {
    out.push_str(&format!("[{name}]\n"));
    for (key, value) in section.iter() {
        if value.is_unset() {
            out.push_str(&format!("#{key} =\n"));
        } else {
            out.push_str(&format!("{key} = {value}\n"));
        }
    }
}

/// Canonical INI text: sorted sections and keys, defaults filled in, unset
/// optionals commented out. Loading the output yields an equal value.
impl fmt::Display for Configuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = String::new();
        for (i, (name, section)) in self.sections.iter().enumerate() {
            if i > 0 {
                out.push('\n');
            }
            write_section(&mut out, name, section);
        }
        f.write_str(&out)
    }
}
