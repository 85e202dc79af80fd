//! Schema-driven typing, defaulting and validation.
//!
//! Turns the raw strings behind a [`ConfigPort`] into a [`Configuration`].
//! Every schema key ends up present: parsed from the source, filled from its
//! default, or `Unset` when optional. A required key with no value fails the
//! whole load.

use crate::domain::configuration::{Autolog, ConfigSection, Configuration, EsServer, RunTests};
use crate::domain::error::ConfigError;
use crate::domain::level::LogLevel;
use crate::domain::schema::{self, AUTOLOG, KeySpec, RUNTESTS, Requirement, ValueKind};
use crate::domain::value::{ConfigValue, parse_bool, parse_int};
use crate::ports::config_port::ConfigPort;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, Default)]
pub struct ResolveOptions {
    /// Reject keys and sections outside the schema instead of warning.
    pub deny_unknown: bool,
}

type Sections = BTreeMap<String, ConfigSection>;

pub fn resolve(
    port: &dyn ConfigPort,
    options: ResolveOptions,
) -> Result<Configuration, ConfigError> {
    let mut sections = collect_unknown(port, options)?;

    for spec in schema::SECTIONS.into_iter().flat_map(schema::keys_in) {
        let raw = port
            .get_string(spec.section, spec.key)
            .filter(|v| !v.trim().is_empty());
        let value = match (raw, spec.requirement) {
            (Some(raw), _) => {
                let line = port.line_of(spec.section, spec.key).unwrap_or_default();
                parse_value(spec, &raw, port.source_name(), line)?
            }
            (None, Requirement::Default(default)) => {
                parse_value(spec, default, port.source_name(), 0)?
            }
            (None, Requirement::Optional) => ConfigValue::Unset,
            (None, Requirement::Required) => {
                return Err(ConfigError::missing(spec.section, spec.key));
            }
        };
        sections
            .entry(spec.section.to_string())
            .or_default()
            .insert(spec.key, value);
    }

    let runtests = build_runtests(&sections)?;
    let autolog = build_autolog(&sections)?;
    debug!(
        source = port.source_name(),
        sections = sections.len(),
        "configuration resolved"
    );
    Ok(Configuration::new(sections, runtests, autolog))
}

/// Keys and sections the schema does not know, kept as plain strings.
fn collect_unknown(port: &dyn ConfigPort, options: ResolveOptions) -> Result<Sections, ConfigError> {
    let mut sections = Sections::new();

    for section in port.sections() {
        let known_section = schema::is_known_section(&section);
        if !known_section {
            if options.deny_unknown {
                return Err(ConfigError::Unrecognized {
                    section,
                    key: None,
                });
            }
            warn!(section = %section, "ignoring unrecognized config section");
        }

        for key in port.keys(&section) {
            if schema::lookup(&section, &key).is_some() {
                continue;
            }
            if known_section {
                if options.deny_unknown {
                    return Err(ConfigError::Unrecognized {
                        section,
                        key: Some(key),
                    });
                }
                warn!(section = %section, key = %key, "ignoring unrecognized config key");
            }
            let raw = port.get_string(&section, &key).unwrap_or_default();
            sections
                .entry(section.clone())
                .or_default()
                .insert(&key, ConfigValue::Str(raw.trim().to_string()));
        }
    }

    Ok(sections)
}

fn parse_value(
    spec: &KeySpec,
    raw: &str,
    file: &str,
    line: usize,
) -> Result<ConfigValue, ConfigError> {
    let raw = raw.trim();
    let syntax = |reason: String| ConfigError::Parse {
        file: file.to_string(),
        line,
        reason: format!("[{}] {}: {reason}", spec.section, spec.key),
    };

    match spec.kind {
        ValueKind::Text | ValueKind::Path => Ok(ConfigValue::Str(raw.to_string())),
        ValueKind::Integer => parse_int(raw).map(ConfigValue::Int).map_err(syntax),
        ValueKind::Boolean => parse_bool(raw).map(ConfigValue::Bool).map_err(syntax),
        ValueKind::Level => raw
            .parse::<LogLevel>()
            .map(|level| ConfigValue::Str(level.as_str().to_string()))
            .map_err(syntax),
        ValueKind::HostPort => raw
            .parse::<EsServer>()
            .map(|server| ConfigValue::Str(server.to_string()))
            .map_err(|reason| ConfigError::invalid(spec.section, spec.key, reason)),
        ValueKind::Url => check_url(raw)
            .map(|()| ConfigValue::Str(raw.to_string()))
            .map_err(|reason| ConfigError::invalid(spec.section, spec.key, reason)),
    }
}

fn check_url(raw: &str) -> Result<(), String> {
    let rest = raw
        .strip_prefix("http://")
        .or_else(|| raw.strip_prefix("https://"))
        .ok_or_else(|| format!("expected an http:// or https:// URL, found `{raw}`"))?;
    if rest.is_empty() || rest.starts_with('/') {
        return Err(format!("URL `{raw}` has no host"));
    }
    Ok(())
}

fn value<'a>(sections: &'a Sections, section: &str, key: &str) -> Option<&'a ConfigValue> {
    sections.get(section).and_then(|s| s.get(key))
}

fn text(sections: &Sections, section: &str, key: &str) -> Result<String, ConfigError> {
    optional_text(sections, section, key).ok_or_else(|| ConfigError::missing(section, key))
}

fn optional_text(sections: &Sections, section: &str, key: &str) -> Option<String> {
    value(sections, section, key)
        .and_then(ConfigValue::as_str)
        .map(str::to_string)
}

fn flag(sections: &Sections, section: &str, key: &str) -> Result<bool, ConfigError> {
    value(sections, section, key)
        .and_then(ConfigValue::as_bool)
        .ok_or_else(|| ConfigError::missing(section, key))
}

fn level(sections: &Sections, section: &str, key: &str) -> Result<LogLevel, ConfigError> {
    text(sections, section, key)?
        .parse()
        .map_err(|reason: String| ConfigError::invalid(section, key, reason))
}

fn build_runtests(sections: &Sections) -> Result<RunTests, ConfigError> {
    let time_out = value(sections, RUNTESTS, "time_out")
        .and_then(ConfigValue::as_int)
        .ok_or_else(|| ConfigError::missing(RUNTESTS, "time_out"))?;
    let time_out = u64::try_from(time_out)
        .ok()
        .filter(|secs| *secs > 0)
        .ok_or_else(|| {
            ConfigError::invalid(RUNTESTS, "time_out", "time_out must be a positive number of seconds")
        })?;

    Ok(RunTests {
        xre_path: PathBuf::from(text(sections, RUNTESTS, "xre_path")?),
        utility_path: PathBuf::from(text(sections, RUNTESTS, "utility_path")?),
        minidump_stackwalk: optional_text(sections, RUNTESTS, "minidump_stackwalk")
            .map(PathBuf::from),
        androidprocname: optional_text(sections, RUNTESTS, "androidprocname"),
        console_level: level(sections, RUNTESTS, "console_level")?,
        file_level: level(sections, RUNTESTS, "file_level")?,
        time_out: Duration::from_secs(time_out),
    })
}

fn build_autolog(sections: &Sections) -> Result<Autolog, ConfigError> {
    let es_server = text(sections, AUTOLOG, "es_server")?
        .parse::<EsServer>()
        .map_err(|reason| ConfigError::invalid(AUTOLOG, "es_server", reason))?;

    Ok(Autolog {
        es_server,
        rest_server: text(sections, AUTOLOG, "rest_server")?,
        index: text(sections, AUTOLOG, "index")?,
        include_pass: flag(sections, AUTOLOG, "include_pass")?,
        submit_log: flag(sections, AUTOLOG, "submit_log")?,
        use_newparser: flag(sections, AUTOLOG, "use_newparser")?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::file_config_adapter::FileConfigAdapter;

    const MINIMAL: &str = "[runtests]\nxre_path = /opt/xre\nutility_path = /opt/utils\ntime_out = 60\n\n[autolog]\nes_server = localhost:9200\nrest_server = http://localhost:8051/\n";

    fn resolve_str(content: &str) -> Result<Configuration, ConfigError> {
        let adapter = FileConfigAdapter::from_string(content)?;
        resolve(&adapter, ResolveOptions::default())
    }

    fn strict(content: &str) -> Result<Configuration, ConfigError> {
        let adapter = FileConfigAdapter::from_string(content)?;
        resolve(&adapter, ResolveOptions { deny_unknown: true })
    }

    #[test]
    fn minimal_config_gets_defaults() {
        let config = resolve_str(MINIMAL).unwrap();
        assert_eq!(config.runtests().console_level, LogLevel::Info);
        assert_eq!(config.runtests().file_level, LogLevel::Info);
        assert_eq!(config.autolog().index, "autophone");
        assert!(!config.autolog().include_pass);
        assert!(!config.autolog().submit_log);
        assert!(!config.autolog().use_newparser);
        assert_eq!(config.get_str("runtests", "console_level").unwrap(), "INFO");
        assert!(!config.get_bool("autolog", "submit_log").unwrap());
    }

    #[test]
    fn optional_keys_are_unset() {
        let config = resolve_str(MINIMAL).unwrap();
        assert_eq!(config.runtests().androidprocname, None);
        assert_eq!(config.runtests().minidump_stackwalk, None);
        assert!(config.get("runtests", "androidprocname").unwrap().is_unset());
        assert!(config.get("runtests", "minidump_stackwalk").unwrap().is_unset());
    }

    #[test]
    fn optional_key_is_read_when_present() {
        let config =
            resolve_str(&MINIMAL.replace("[autolog]", "androidprocname = org.mozilla.fennec\n[autolog]"))
                .unwrap();
        assert_eq!(
            config.runtests().androidprocname.as_deref(),
            Some("org.mozilla.fennec")
        );
    }

    #[test]
    fn each_required_key_is_enforced() {
        for (section, key) in [
            ("runtests", "xre_path"),
            ("runtests", "utility_path"),
            ("runtests", "time_out"),
            ("autolog", "es_server"),
            ("autolog", "rest_server"),
        ] {
            let content: String = MINIMAL
                .lines()
                .filter(|line| !line.starts_with(key))
                .map(|line| format!("{line}\n"))
                .collect();
            let err = resolve_str(&content).unwrap_err();
            assert!(
                matches!(&err, ConfigError::Missing { section: s, key: k } if s == section && k == key),
                "expected missing [{section}] {key}, got {err:?}"
            );
        }
    }

    #[test]
    fn empty_value_counts_as_missing() {
        let err = resolve_str(&MINIMAL.replace("time_out = 60", "time_out =")).unwrap_err();
        assert!(matches!(err, ConfigError::Missing { key, .. } if key == "time_out"));
    }

    #[test]
    fn empty_value_falls_back_to_default() {
        let config = resolve_str(&MINIMAL.replace("[autolog]", "console_level =\n[autolog]")).unwrap();
        assert_eq!(config.runtests().console_level, LogLevel::Info);
    }

    #[test]
    fn missing_section_reports_first_required_key() {
        let err = resolve_str("[runtests]\nxre_path = /a\nutility_path = /b\ntime_out = 1\n").unwrap_err();
        assert!(
            matches!(err, ConfigError::Missing { section, key } if section == "autolog" && key == "es_server")
        );
    }

    #[test]
    fn bad_boolean_is_a_parse_error_with_line() {
        let content = format!("{MINIMAL}include_pass = yes\n");
        let err = resolve_str(&content).unwrap_err();
        match err {
            ConfigError::Parse { line, reason, .. } => {
                assert_eq!(line, 9);
                assert!(reason.contains("include_pass"));
            }
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn bad_integer_is_a_parse_error_with_line() {
        let err = resolve_str(&MINIMAL.replace("time_out = 60", "time_out = sixty")).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { line: 4, .. }));
    }

    #[test]
    fn bad_level_is_a_parse_error() {
        let content = MINIMAL.replace("[autolog]", "file_level = verbose\n[autolog]");
        assert!(matches!(
            resolve_str(&content).unwrap_err(),
            ConfigError::Parse { .. }
        ));
    }

    #[test]
    fn trailing_comment_breaks_a_boolean() {
        let content = format!("{MINIMAL}include_pass = True # note\n");
        let err = resolve_str(&content).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { line: 9, .. }), "{err:?}");
    }

    #[test]
    fn comment_markers_survive_in_paths_and_urls() {
        let content = MINIMAL
            .replace("/opt/xre", "/opt/builds#7/xre")
            .replace("/opt/utils", "/opt/a;b#c")
            .replace("http://localhost:8051/", "http://localhost:8051/submit#frag");
        let config = resolve_str(&content).unwrap();
        assert_eq!(config.get_str("runtests", "xre_path").unwrap(), "/opt/builds#7/xre");
        assert_eq!(config.get_str("runtests", "utility_path").unwrap(), "/opt/a;b#c");
        assert_eq!(
            config.autolog().rest_server,
            "http://localhost:8051/submit#frag"
        );
    }

    #[test]
    fn non_positive_time_out_is_invalid() {
        for raw in ["0", "-30"] {
            let content = MINIMAL.replace("time_out = 60", &format!("time_out = {raw}"));
            let err = resolve_str(&content).unwrap_err();
            assert!(matches!(err, ConfigError::Invalid { key, .. } if key == "time_out"));
        }
    }

    #[test]
    fn es_server_needs_a_port() {
        let err = resolve_str(&MINIMAL.replace("localhost:9200", "localhost")).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key, .. } if key == "es_server"));
    }

    #[test]
    fn rest_server_needs_http_scheme() {
        for raw in ["localhost:8051", "ftp://localhost/", "http://"] {
            let content = MINIMAL.replace("http://localhost:8051/", raw);
            let err = resolve_str(&content).unwrap_err();
            assert!(
                matches!(&err, ConfigError::Invalid { key, .. } if key == "rest_server"),
                "{raw}: {err:?}"
            );
        }
        let https = MINIMAL.replace("http://", "https://");
        assert!(resolve_str(&https).is_ok());
    }

    #[test]
    fn unknown_keys_are_kept_as_strings() {
        let content = format!("{MINIMAL}retries = 3\n\n[extras]\nnote = hello\n");
        let config = resolve_str(&content).unwrap();
        assert_eq!(config.get_str("autolog", "retries").unwrap(), "3");
        assert_eq!(config.get_str("extras", "note").unwrap(), "hello");
    }

    #[test]
    fn deny_unknown_rejects_extra_key() {
        let err = strict(&format!("{MINIMAL}retries = 3\n")).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Unrecognized { section, key: Some(key) } if section == "autolog" && key == "retries"
        ));
    }

    #[test]
    fn deny_unknown_rejects_extra_section() {
        let err = strict(&format!("{MINIMAL}\n[extras]\nnote = hi\n")).unwrap_err();
        assert!(matches!(err, ConfigError::Unrecognized { key: None, .. }));
        assert!(strict(MINIMAL).is_ok());
    }

    #[test]
    fn schema_defaults_all_parse() {
        for spec in schema::SCHEMA {
            if let Requirement::Default(default) = spec.requirement {
                assert!(parse_value(spec, default, "defaults", 0).is_ok(), "{}", spec.key);
            }
        }
    }

    #[test]
    fn check_url_accepts_hosts_only() {
        assert!(check_url("http://localhost:8051/").is_ok());
        assert!(check_url("https://example.org").is_ok());
        assert!(check_url("http:///path").is_err());
    }
}
