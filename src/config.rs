//! Runtime tunables.
//!
//! There is no configuration file. Defaults can be overridden through
//! environment variables prefixed with `DUPMANAGER_`:
//!
//! | Variable                     | Default | Meaning                         |
//! |------------------------------|---------|---------------------------------|
//! | `DUPMANAGER_CHUNK_SIZE`      | 65536   | bytes read per hashing step     |
//! | `DUPMANAGER_SHOW_PROGRESS`   | true    | draw progress bars              |
//!
//! The quarantine and manifest names are deliberately absent: they are
//! constants in [`crate::quarantine`].

use figment::providers::{Env, Serialized};
use figment::Figment;
use serde::{Deserialize, Serialize};

use crate::scanner::DEFAULT_CHUNK_SIZE;

/// Prefix of the environment variables read by [`Config::load`].
pub const ENV_PREFIX: &str = "DUPMANAGER_";

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Bytes read per chunk while hashing (minimum 1).
    pub chunk_size: usize,
    /// Whether progress bars are drawn.
    pub show_progress: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            show_progress: true,
        }
    }
}

impl Config {
    /// Defaults layered under the environment.
    #[must_use]
    pub fn figment() -> Figment {
        Figment::from(Serialized::defaults(Self::default())).merge(Env::prefixed(ENV_PREFIX))
    }

    /// Extract a configuration from `figment`, clamping out-of-range values.
    ///
    /// # Errors
    ///
    /// Returns the figment error if a value has the wrong type.
    pub fn from_figment(figment: &Figment) -> Result<Self, figment::Error> {
        let mut config: Self = figment.extract()?;
        if config.chunk_size == 0 {
            log::warn!("chunk_size must be at least 1, using 1");
            config.chunk_size = 1;
        }
        Ok(config)
    }

    /// Load the configuration, falling back to defaults on invalid input.
    pub fn load() -> Self {
        match Self::from_figment(&Self::figment()) {
            Ok(config) => config,
            Err(e) => {
                log::warn!("Invalid {}* environment, using defaults: {}", ENV_PREFIX, e);
                Self::default()
            }
        }
    }
}
