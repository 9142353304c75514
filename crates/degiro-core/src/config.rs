//! Configuration for the broker-rule constants used by the Normalizer and
//! the two-month-rule filter.
//!
//! These are the only values in the pipeline with any claim to being
//! configurable across jurisdictions or future rule changes; everything
//! else in the engine follows the CSV shape directly. Loading follows the
//! embedded-defaults-with-optional-override pattern: compiled-in defaults,
//! overridable by a `config.toml` in the current directory or the user's
//! config directory.

use serde::Deserialize;
use std::path::PathBuf;

static EMBEDDED_CONFIG: &str = include_str!("../data/config.toml");

#[derive(Debug, Clone, Deserialize)]
struct RawConfig {
    two_month_window_days: i64,
    #[serde(default)]
    option_month_tokens: Vec<String>,
}

/// Tunable broker-rule constants.
#[derive(Debug, Clone)]
pub struct Config {
    /// Width of the two-month-rule repurchase window, in days.
    pub two_month_window_days: i64,
    /// Description substrings that mark a row as an option contract.
    pub option_month_tokens: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self::embedded()
    }
}

impl Config {
    /// Load the embedded default configuration compiled into the binary.
    pub fn embedded() -> Self {
        Self::from_toml(EMBEDDED_CONFIG).unwrap_or_else(|e| {
            eprintln!("Warning: failed to parse embedded config: {e}");
            Self {
                two_month_window_days: 60,
                option_month_tokens: Vec::new(),
            }
        })
    }

    fn from_toml(content: &str) -> Result<Self, toml::de::Error> {
        let raw: RawConfig = toml::from_str(content)?;
        Ok(Self {
            two_month_window_days: raw.two_month_window_days,
            option_month_tokens: raw.option_month_tokens,
        })
    }

    /// Load configuration with override support.
    ///
    /// Checks, in order: `./config.toml`, then
    /// `~/.config/degiro-core/config.toml`. Override files are merged over
    /// the embedded defaults field-by-field.
    pub fn load_with_overrides() -> Self {
        let mut config = Self::embedded();

        for path in Self::override_paths() {
            if path.exists()
                && let Ok(content) = std::fs::read_to_string(&path)
                && let Ok(over) = Self::from_toml(&content)
            {
                config.two_month_window_days = over.two_month_window_days;
                if !over.option_month_tokens.is_empty() {
                    config.option_month_tokens = over.option_month_tokens;
                }
            }
        }

        config
    }

    fn override_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from("config.toml")];
        if let Some(home) = std::env::var_os("HOME").map(PathBuf::from) {
            paths.push(home.join(".config").join("degiro-core").join("config.toml"));
        }
        paths
    }
}
