use anyhow::{Context, Result};
use confyg::{env, Confygery};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use bookcover_core::placeholder::DEFAULT_PLACEHOLDER_URL;

use crate::provider::google_books::GOOGLE_BOOKS_URL;
use crate::provider::open_library::{OPEN_LIBRARY_COVERS_URL, OPEN_LIBRARY_URL};

const DEFAULT_TIMEOUT_SECS: u64 = 10;
const DEFAULT_ATTEMPT_DELAY_MS: u64 = 200;

/// Configuration for bookcover.
///
/// Configuration is loaded from multiple sources with the following priority:
/// 1. Environment variables (BOOKCOVER_* prefix)
/// 2. Config file (~/.config/bookcover/config.toml)
/// 3. Built-in defaults (lowest priority)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Google Books volumes search endpoint (primary source).
    pub google_books_url: String,

    /// Open Library search endpoint (secondary source).
    pub open_library_url: String,

    /// Open Library cover image host.
    pub covers_url: String,

    /// Placeholder image service used when no source has a cover.
    pub placeholder_url: String,

    /// Connect and read timeout for each request, in seconds.
    ///
    /// Can be set via:
    /// - ENV: BOOKCOVER_REQUEST_TIMEOUT_SECS
    /// - Config: request_timeout_secs = 10
    pub request_timeout_secs: u64,

    /// Pause after each provider attempt, in milliseconds. `0` disables it.
    pub attempt_delay_ms: u64,

    /// Overall deadline for one resolution, in seconds. Unset or `0`
    /// means no deadline beyond the per-request timeouts.
    pub deadline_secs: Option<u64>,

    /// User agent sent with every request.
    pub user_agent: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            google_books_url: GOOGLE_BOOKS_URL.to_string(),
            open_library_url: OPEN_LIBRARY_URL.to_string(),
            covers_url: OPEN_LIBRARY_COVERS_URL.to_string(),
            placeholder_url: DEFAULT_PLACEHOLDER_URL.to_string(),
            request_timeout_secs: DEFAULT_TIMEOUT_SECS,
            attempt_delay_ms: DEFAULT_ATTEMPT_DELAY_MS,
            deadline_secs: None,
            user_agent: default_user_agent(),
        }
    }
}

fn default_user_agent() -> String {
    format!("bookcover/{}", env!("CARGO_PKG_VERSION"))
}

impl Config {
    /// Load configuration from file and environment variables.
    ///
    /// Searches for config file at: ~/.config/bookcover/config.toml
    /// Reads environment variables with BOOKCOVER_ prefix.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed.
    pub fn load() -> Result<Self> {
        Self::load_from(&config_file_path())
    }

    /// Load configuration from a specific file (if it exists) and the
    /// environment.
    pub fn load_from(config_path: &Path) -> Result<Self> {
        let mut builder = Confygery::new().context("Failed to create config builder")?;

        if config_path.exists() {
            let path_str = config_path
                .to_str()
                .ok_or_else(|| anyhow::anyhow!("Config path contains invalid UTF-8"))?;
            builder
                .add_file(path_str)
                .context("Failed to load config file")?;
        }

        let env_opts = env::Options::with_top_level("bookcover");
        builder
            .add_env(env_opts)
            .context("Failed to load environment variables")?;

        let config: Self = builder.build().context("Failed to build configuration")?;

        Ok(config)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn attempt_delay(&self) -> Duration {
        Duration::from_millis(self.attempt_delay_ms)
    }

    pub fn deadline(&self) -> Option<Duration> {
        self.deadline_secs
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
    }
}

/// Get the config file path.
///
/// Returns:
/// - Linux: ~/.config/bookcover/config.toml
/// - macOS: ~/Library/Application Support/bookcover/config.toml
/// - Windows: %APPDATA%\bookcover\config.toml
pub fn config_file_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("bookcover")
        .join("config.toml")
}

/// Get the example config file content.
pub fn example_config() -> &'static str {
    r#"# Bookcover Configuration File
#
# Configuration is loaded from multiple sources with the following priority:
# 1. Environment variables (BOOKCOVER_* prefix)
# 2. This config file
# 3. Built-in defaults (lowest priority)

# Cover sources, consulted in this order
#google_books_url = "https://www.googleapis.com/books/v1/volumes"
#open_library_url = "https://openlibrary.org/search.json"
#covers_url = "https://covers.openlibrary.org"

# Placeholder image service used when no source has a cover
#placeholder_url = "https://placehold.co"

# Connect/read timeout for each request, in seconds
#
# Can also be set via:
# - Environment: BOOKCOVER_REQUEST_TIMEOUT_SECS=10
#request_timeout_secs = 10

# Pause after each source attempt, in milliseconds (0 disables)
#attempt_delay_ms = 200

# Give up on the sources and return the placeholder after this many seconds
#deadline_secs = 30
"#
}

/// Create default config file if it doesn't exist.
///
/// Returns true if a new file was created, false if it already existed.
pub fn ensure_config_file() -> Result<bool> {
    write_example_config(&config_file_path())
}

fn write_example_config(config_path: &Path) -> Result<bool> {
    if config_path.exists() {
        return Ok(false);
    }

    if let Some(parent) = config_path.parent() {
        std::fs::create_dir_all(parent).context("Failed to create config directory")?;
    }

    std::fs::write(config_path, example_config()).context("Failed to write config file")?;

    Ok(true)
}
