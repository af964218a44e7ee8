//! User settings, loaded from `<config_dir>/tilde/config.toml`.
//!
//! Every field has a default, so a missing file, an empty file, or a file
//! that sets only some keys all work. A file that fails to parse is an
//! [`Error::Config`]; the caller decides whether to fall back to defaults.
//!
//! ```toml
//! quit_times = 3
//! message_timeout_secs = 5
//! poll_timeout_ms = 100
//! log_level = "debug"
//! log_file = "/tmp/tilde.log"
//! ```

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::error::Result;

const APP_NAME: &str = "tilde";
const CONFIG_FILE: &str = "config.toml";
const LOG_FILE: &str = "tilde.log";

/// Editor settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Extra Ctrl-Q presses needed to quit with unsaved changes.
    pub quit_times: u32,

    /// How long a status message stays visible.
    pub message_timeout_secs: u64,

    /// How long one wait for input lasts before the editor checks for
    /// resize and message expiry. Also the Escape-key timeout.
    pub poll_timeout_ms: u64,

    /// `tracing` filter directive used when `TILDE_LOG` is unset.
    pub log_level: String,

    /// Where log output goes. `None` means `<cache_dir>/tilde/tilde.log`.
    pub log_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            quit_times: 3,
            message_timeout_secs: 5,
            poll_timeout_ms: 100,
            log_level: "warn".to_string(),
            log_file: None,
        }
    }
}

impl Config {
    /// Parse a config from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`](crate::error::Error::Config) if the text is
    /// not valid TOML or has a field of the wrong type.
    pub fn from_toml(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Load from `path`. A missing file yields the defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load_from(path: &Path) -> Result<Self> {
        match fs::read_to_string(path) {
            Ok(text) => Self::from_toml(&text),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(e.into()),
        }
    }

    /// Load from the standard location, or the defaults if there is no
    /// config directory on this platform.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load() -> Result<Self> {
        config_path().map_or_else(|| Ok(Self::default()), |path| Self::load_from(&path))
    }

    /// Status message lifetime as a [`Duration`].
    #[must_use]
    pub const fn message_timeout(&self) -> Duration {
        Duration::from_secs(self.message_timeout_secs)
    }

    /// Resolved log file path: the configured one, else the cache default.
    #[must_use]
    pub fn log_path(&self) -> Option<PathBuf> {
        self.log_file
            .clone()
            .or_else(|| dirs::cache_dir().map(|p| p.join(APP_NAME).join(LOG_FILE)))
    }
}

/// `<config_dir>/tilde/config.toml`, if the platform has a config directory.
#[must_use]
pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join(APP_NAME).join(CONFIG_FILE))
}
