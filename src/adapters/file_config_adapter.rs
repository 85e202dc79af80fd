//! INI file configuration adapter.

use crate::adapters::ini_syntax::{self, IniLayout};
use crate::domain::error::ConfigError;
use crate::ports::config_port::ConfigPort;
use configparser::ini::{Ini, IniDefault};
use std::fs;
use std::io;
use std::path::Path;

pub const STRING_SOURCE: &str = "<string>";

pub struct FileConfigAdapter {
    config: Ini,
    layout: IniLayout,
    source: String,
}

impl FileConfigAdapter {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => ConfigError::NotFound {
                path: path.to_path_buf(),
            },
            _ => ConfigError::Io(e),
        })?;
        Self::parse(&content, path.display().to_string())
    }

    pub fn from_string(content: &str) -> Result<Self, ConfigError> {
        Self::parse(content, STRING_SOURCE.to_string())
    }

    fn parse(content: &str, source: String) -> Result<Self, ConfigError> {
        let layout = ini_syntax::scan(content, &source)?;

        let mut defaults = IniDefault::default();
        defaults.case_sensitive = true;
        defaults.delimiters = vec!['='];
        defaults.comment_symbols = vec!['#', ';'];
        defaults.enable_inline_comments = false;
        let mut config = Ini::new_from_defaults(defaults);
        config
            .read(layout.normalized().to_string())
            .map_err(|reason| ConfigError::Ini {
                file: source.clone(),
                reason,
            })?;

        Ok(Self {
            config,
            layout,
            source,
        })
    }
}

impl ConfigPort for FileConfigAdapter {
    fn source_name(&self) -> &str {
        &self.source
    }

    fn sections(&self) -> Vec<String> {
        self.layout.sections().map(str::to_string).collect()
    }

    fn keys(&self, section: &str) -> Vec<String> {
        self.layout.keys(section)
    }

    fn get_string(&self, section: &str, key: &str) -> Option<String> {
        self.config.get(section, key)
    }

    fn line_of(&self, section: &str, key: &str) -> Option<usize> {
        self.layout.line_of(section, key)
    }
}
