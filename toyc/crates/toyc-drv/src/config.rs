//! Configuration for the toyc driver.
//!
//! Settings come from a `toyc.toml` file:
//!
//! ```toml
//! [codegen]
//! label_base = 100
//! strict = false
//!
//! [printer]
//! indent = 3
//! ```
//!
//! Command-line flags take precedence over the file.

use dirs::config_dir;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{DriverError, Result};

/// Default configuration file name.
pub const CONFIG_FILE_NAME: &str = "toyc.toml";

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub codegen: CodegenConfig,

    #[serde(default)]
    pub printer: PrinterConfig,
}

/// Code generation settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CodegenConfig {
    /// First branch label number.
    #[serde(default = "default_label_base")]
    pub label_base: u32,

    /// Treat malformed nodes as errors.
    #[serde(default)]
    pub strict: bool,
}

/// Tree dump settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PrinterConfig {
    /// Spaces per nesting level.
    #[serde(default = "default_indent")]
    pub indent: usize,
}

fn default_label_base() -> u32 {
    toyc_gen::DEFAULT_LABEL_BASE
}

fn default_indent() -> usize {
    toyc_ast::printer::DEFAULT_INDENT
}

impl Default for CodegenConfig {
    fn default() -> Self {
        Self {
            label_base: default_label_base(),
            strict: false,
        }
    }
}

impl Default for PrinterConfig {
    fn default() -> Self {
        Self {
            indent: default_indent(),
        }
    }
}

impl Config {
    /// Load configuration.
    ///
    /// An explicit path must exist. Without one, the current directory and
    /// then the user configuration directory are searched, falling back to
    /// defaults when neither has a config file.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load_from_path(path);
        }

        match Self::find_config_file() {
            Some(path) => Self::load_from_path(&path),
            None => Ok(Self::default()),
        }
    }

    /// Load configuration from a specific path.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(DriverError::Config(format!(
                "Configuration file not found: {}",
                path.display()
            )));
        }

        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content).map_err(|e| {
            DriverError::Config(format!("Failed to parse {}: {}", path.display(), e))
        })?;

        tracing::debug!(path = %path.display(), "loaded configuration");
        Ok(config)
    }

    /// Save configuration to a specific path.
    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self).map_err(|e| {
            DriverError::Config(format!("Failed to serialize configuration: {}", e))
        })?;

        std::fs::write(path, content)?;
        Ok(())
    }

    fn check_current_dir_config() -> Option<PathBuf> {
        let path = PathBuf::from(CONFIG_FILE_NAME);
        path.exists().then_some(path)
    }

    fn check_user_config() -> Option<PathBuf> {
        config_dir()
            .map(|dir| dir.join("toyc").join(CONFIG_FILE_NAME))
            .filter(|path| path.exists())
    }

    fn find_config_file() -> Option<PathBuf> {
        Self::check_current_dir_config().or_else(Self::check_user_config)
    }
}
