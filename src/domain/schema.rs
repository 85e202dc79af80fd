//! Recognized sections and keys.

pub const RUNTESTS: &str = "runtests";
pub const AUTOLOG: &str = "autolog";

pub const SECTIONS: [&str; 2] = [RUNTESTS, AUTOLOG];

/// How the raw text of a key is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Text,
    Path,
    Integer,
    Boolean,
    Level,
    /// `host:port`
    HostPort,
    /// `http://` or `https://` URL
    Url,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Requirement {
    Required,
    /// Raw default text, parsed the same way as a value from the file.
    Default(&'static str),
    Optional,
}

#[derive(Debug, Clone, Copy)]
pub struct KeySpec {
    pub section: &'static str,
    pub key: &'static str,
    pub kind: ValueKind,
    pub requirement: Requirement,
}

const fn spec(
    section: &'static str,
    key: &'static str,
    kind: ValueKind,
    requirement: Requirement,
) -> KeySpec {
    KeySpec {
        section,
        key,
        kind,
        requirement,
    }
}

pub const SCHEMA: &[KeySpec] = &[
    spec(RUNTESTS, "xre_path", ValueKind::Path, Requirement::Required),
    spec(RUNTESTS, "utility_path", ValueKind::Path, Requirement::Required),
    spec(RUNTESTS, "minidump_stackwalk", ValueKind::Path, Requirement::Optional),
    spec(RUNTESTS, "androidprocname", ValueKind::Text, Requirement::Optional),
    spec(RUNTESTS, "console_level", ValueKind::Level, Requirement::Default("INFO")),
    spec(RUNTESTS, "file_level", ValueKind::Level, Requirement::Default("INFO")),
    spec(RUNTESTS, "time_out", ValueKind::Integer, Requirement::Required),
    spec(AUTOLOG, "es_server", ValueKind::HostPort, Requirement::Required),
    spec(AUTOLOG, "rest_server", ValueKind::Url, Requirement::Required),
    spec(AUTOLOG, "index", ValueKind::Text, Requirement::Default("autophone")),
    spec(AUTOLOG, "include_pass", ValueKind::Boolean, Requirement::Default("False")),
    spec(AUTOLOG, "submit_log", ValueKind::Boolean, Requirement::Default("False")),
    spec(AUTOLOG, "use_newparser", ValueKind::Boolean, Requirement::Default("False")),
];

pub fn lookup(section: &str, key: &str) -> Option<&'static KeySpec> {
    SCHEMA
        .iter()
        .find(|spec| spec.section == section && spec.key == key)
}

pub fn keys_in(section: &str) -> impl Iterator<Item = &'static KeySpec> + '_ {
    SCHEMA.iter().filter(move |spec| spec.section == section)
}

pub fn is_known_section(section: &str) -> bool {
    SECTIONS.contains(&section)
}
