//! Typed configuration scalars and their strict parsers.

use std::fmt;

/// A single typed value from a config section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigValue {
    Str(String),
    Int(i64),
    Bool(bool),
    /// Optional key that is absent and has no default.
    Unset,
}

impl ConfigValue {
    pub fn type_name(&self) -> &'static str {
        match self {
            ConfigValue::Str(_) => "string",
            ConfigValue::Int(_) => "integer",
            ConfigValue::Bool(_) => "boolean",
            ConfigValue::Unset => "unset",
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ConfigValue::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            ConfigValue::Int(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ConfigValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn is_unset(&self) -> bool {
        matches!(self, ConfigValue::Unset)
    }
}

/// Renders the value in its INI spelling; `Unset` renders empty.
impl fmt::Display for ConfigValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigValue::Str(s) => f.write_str(s),
            ConfigValue::Int(n) => write!(f, "{n}"),
            ConfigValue::Bool(true) => f.write_str("True"),
            ConfigValue::Bool(false) => f.write_str("False"),
            ConfigValue::Unset => Ok(()),
        }
    }
}

/// Accepts exactly `True` or `False`.
pub fn parse_bool(raw: &str) -> Result<bool, String> {
    match raw.trim() {
        "True" => Ok(true),
        "False" => Ok(false),
        other => Err(format!("expected `True` or `False`, found `{other}`")),
    }
}

pub fn parse_int(raw: &str) -> Result<i64, String> {
    let trimmed = raw.trim();
    trimmed
        .parse::<i64>()
        .map_err(|_| format!("expected an integer, found `{trimmed}`"))
}
