//! `sqlobjects.toml` settings for the command-line tool.
//!
//! Every section and key is optional. A config path that does not exist
//! yields the defaults; a file that exists but fails to parse is an error.

use std::path::Path;

use serde::Deserialize;

use crate::error::SqlObjectError;
use crate::obfuscator::Obfuscator;

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SqlObjectsConfig {
    pub obfuscation: ObfuscationConfig,
    pub serializer: SerializerConfig,
    pub hasher: HasherConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ObfuscationConfig {
    /// Strings that are never rewritten, on top of the built-in set.
    pub extra_exempt: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SerializerConfig {
    pub pretty: bool,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HasherConfig {
    pub strict: bool,
}

impl Default for HasherConfig {
    fn default() -> Self {
        Self { strict: true }
    }
}

impl SqlObjectsConfig {
    /// Loads the config at `path`, or the defaults when the file is absent.
    pub fn load(path: &Path) -> Result<Self, SqlObjectError> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| {
            SqlObjectError::config(format!("{}: could not read file: {e}", path.display()), path.to_path_buf())
        })?;
        let config = Self::parse(&content).map_err(|e| {
            SqlObjectError::config(format!("{}: invalid syntax: {e}", path.display()), path.to_path_buf())
        })?;

        tracing::debug!(
            path = %path.display(),
            extra_exempt = config.obfuscation.extra_exempt.len(),
            pretty = config.serializer.pretty,
            strict = config.hasher.strict,
            "loaded config"
        );
        Ok(config)
    }

    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// A fresh obfuscation session honoring the configured exemptions.
    pub fn obfuscator(&self) -> Obfuscator {
        Obfuscator::with_exemptions(self.obfuscation.extra_exempt.iter().cloned())
    }
}
