//! Entry points for loading a [`Configuration`].

use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::domain::configuration::Configuration;
use crate::domain::error::ConfigError;
use crate::domain::resolve::{ResolveOptions, resolve};
use std::path::Path;
use tracing::debug;

#[derive(Debug, Clone, Default)]
pub struct ConfigLoader {
    options: ResolveOptions,
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail on keys and sections outside the schema instead of warning.
    pub fn deny_unknown(mut self, deny: bool) -> Self {
        self.options.deny_unknown = deny;
        self
    }

    pub fn load<P: AsRef<Path>>(&self, path: P) -> Result<Configuration, ConfigError> {
        let path = path.as_ref();
        debug!(path = %path.display(), "loading configuration");
        let adapter = FileConfigAdapter::from_file(path)?;
        resolve(&adapter, self.options)
    }

    pub fn load_str(&self, content: &str) -> Result<Configuration, ConfigError> {
        let adapter = FileConfigAdapter::from_string(content)?;
        resolve(&adapter, self.options)
    }
}

/// Load `path` with default options.
pub fn load<P: AsRef<Path>>(path: P) -> Result<Configuration, ConfigError> {
    ConfigLoader::new().load(path)
}
