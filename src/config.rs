// Configuration module for find-imports
// Reads from environment variables with sensible defaults

use crate::stdlib::{DEFAULT_VERSION, PythonVersion};
use std::env;
use std::ffi::OsString;
use std::path::PathBuf;
use std::sync::OnceLock;
use tracing::warn;

/// Global configuration instance
static CONFIG: OnceLock<Config> = OnceLock::new();

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Standard library table used when no flag is given (FIND_IMPORTS_STDLIB_VERSION)
    pub stdlib_version: PythonVersion,

    /// Extra module search roots, searched before the project root (PYTHONPATH)
    pub search_path: Vec<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            stdlib_version: DEFAULT_VERSION,
            search_path: Vec::new(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    fn from_env() -> Self {
        Self::from_vars(
            env::var("FIND_IMPORTS_STDLIB_VERSION").ok(),
            env::var_os("PYTHONPATH"),
        )
    }

    fn from_vars(stdlib_version: Option<String>, python_path: Option<OsString>) -> Self {
        let mut config = Config::default();

        if let Some(val) = stdlib_version {
            match val.parse() {
                Ok(parsed) => config.stdlib_version = parsed,
                Err(err) => {
                    warn!(
                        "invalid FIND_IMPORTS_STDLIB_VERSION value: {}, using default: {}",
                        err, config.stdlib_version
                    );
                }
            }
        }

        if let Some(val) = python_path {
            config.search_path = env::split_paths(&val)
                .filter(|path| !path.as_os_str().is_empty())
                .collect();
        }

        config
    }

    /// Get the global configuration instance
    pub fn get() -> &'static Config {
        CONFIG.get_or_init(Config::from_env)
    }
}
