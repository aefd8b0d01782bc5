//! Parser and serializer configuration.

use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::Path;

pub const DEFAULT_DIAGRAM_LANGUAGE: &str = "mermaid";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Fence info string that turns a code block into a diagram block.
    pub diagram_language: String,
    /// Spaces per nesting level for list items without a resolvable parent.
    pub list_indent: usize,
    pub bullet: char,
    pub front_matter: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("invalid config: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unsupported bullet marker {0:?}")]
    Bullet(char),
}

impl Default for Config {
    fn default() -> Self {
        Self {
            diagram_language: DEFAULT_DIAGRAM_LANGUAGE.to_string(),
            list_indent: 2,
            bullet: '-',
            front_matter: true,
        }
    }
}

impl Config {
    pub fn from_json_str(source: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_json::from_str(source)?;
        config.validate()
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    pub fn is_diagram_language(&self, language: &str) -> bool {
        language.eq_ignore_ascii_case(&self.diagram_language)
    }

    fn validate(self) -> Result<Self, ConfigError> {
        if !matches!(self.bullet, '-' | '*' | '+') {
            return Err(ConfigError::Bullet(self.bullet));
        }
        Ok(self)
    }
}
