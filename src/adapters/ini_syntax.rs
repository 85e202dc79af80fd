//! Strict line-level checks for INI text.
//!
//! `configparser` is lenient: a repeated key silently overwrites the first one
//! and its errors carry no structured position. This scanner runs first and
//! rejects anything ambiguous with the offending line number. It also records
//! where each section and key was defined, in file order, and produces the
//! normalized text handed to `configparser`.

use crate::domain::error::ConfigError;
use std::collections::HashMap;

const COMMENT_MARKERS: [char; 2] = ['#', ';'];

#[derive(Debug, Clone, Default)]
pub struct IniLayout {
    sections: Vec<SectionLayout>,
    normalized: String,
}

#[derive(Debug, Clone)]
struct SectionLayout {
    name: String,
    keys: Vec<(String, usize)>,
}

impl IniLayout {
    pub fn sections(&self) -> impl Iterator<Item = &str> {
        self.sections.iter().map(|s| s.name.as_str())
    }

    pub fn keys(&self, section: &str) -> Vec<String> {
        self.section(section)
            .map(|s| s.keys.iter().map(|(k, _)| k.clone()).collect())
            .unwrap_or_default()
    }

    pub fn line_of(&self, section: &str, key: &str) -> Option<usize> {
        self.section(section)?
            .keys
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, line)| *line)
    }

    /// The scanned text line for line, with comment lines blanked and
    /// section headers reduced to `[name]`.
    pub fn normalized(&self) -> &str {
        &self.normalized
    }

    fn section(&self, name: &str) -> Option<&SectionLayout> {
        self.sections.iter().find(|s| s.name == name)
    }
}

pub fn scan(content: &str, file: &str) -> Result<IniLayout, ConfigError> {
    let mut layout = IniLayout::default();
    let mut section_lines: HashMap<String, usize> = HashMap::new();
    let mut key_lines: HashMap<String, usize> = HashMap::new();

    for (idx, raw) in content.lines().enumerate() {
        let line = idx + 1;
        let trimmed = raw.trim();
        let fail = |reason: String| ConfigError::Parse {
            file: file.to_string(),
            line,
            reason,
        };

        if trimmed.is_empty() || trimmed.starts_with(COMMENT_MARKERS) {
            layout.normalized.push('\n');
            continue;
        }

        if let Some(rest) = trimmed.strip_prefix('[') {
            let (name, tail) = rest
                .split_once(']')
                .ok_or_else(|| fail(format!("unterminated section header `{trimmed}`")))?;
            let name = name.trim();
            let tail = tail.trim();
            if !tail.is_empty() && !tail.starts_with(COMMENT_MARKERS) {
                return Err(fail(format!("unexpected text after section header `{tail}`")));
            }
            if name.is_empty() {
                return Err(fail("empty section name".to_string()));
            }
            if let Some(first) = section_lines.get(name) {
                return Err(fail(format!(
                    "duplicate section [{name}] (first defined on line {first})"
                )));
            }
            section_lines.insert(name.to_string(), line);
            key_lines.clear();
            layout.normalized.push_str(&format!("[{name}]\n"));
            layout.sections.push(SectionLayout {
                name: name.to_string(),
                keys: Vec::new(),
            });
            continue;
        }

        let (key, _value) = trimmed
            .split_once('=')
            .ok_or_else(|| fail(format!("expected `key = value`, found `{trimmed}`")))?;
        let key = key.trim();
        if key.is_empty() {
            return Err(fail("empty key".to_string()));
        }
        let current = layout
            .sections
            .last_mut()
            .ok_or_else(|| fail(format!("key `{key}` appears before any section header")))?;
        if let Some(first) = key_lines.get(key) {
            return Err(fail(format!(
                "duplicate key `{key}` in section [{}] (first defined on line {first})",
                current.name
            )));
        }
        key_lines.insert(key.to_string(), line);
        current.keys.push((key.to_string(), line));
        layout.normalized.push_str(raw);
        layout.normalized.push('\n');
    }

    Ok(layout)
}
