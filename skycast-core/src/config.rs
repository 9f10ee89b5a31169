use anyhow::{Context, Result, anyhow};
use chrono::FixedOffset;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{env, fs, path::PathBuf};

use crate::provider::openweather::{DEFAULT_UTC_OFFSET_MINUTES, offset_from_minutes};
use crate::screen::DEFAULT_CITY;

/// Environment variable that takes precedence over the stored API key.
pub const API_KEY_ENV: &str = "OPENWEATHER_API_KEY";

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// api_key = "..."
/// default_city = "Izmir"
/// language = "tr"
/// utc_offset_minutes = 180
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Config {
    pub api_key: Option<String>,
    pub default_city: Option<String>,
    /// Provider language code for condition descriptions.
    pub language: Option<String>,
    /// Offset applied to forecast time labels.
    pub utc_offset_minutes: Option<i32>,
    /// Overrides the provider base URL (useful for proxies).
    pub base_url: Option<String>,
    pub timeout_secs: Option<u64>,
}

impl Config {
    /// Load config from disk, or return an empty default if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::parse(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    pub fn parse(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_file_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(&path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "skycast", "skycast")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    /// API key from the environment, falling back to the stored one.
    pub fn api_key(&self) -> Option<String> {
        pick_api_key(env::var(API_KEY_ENV).ok(), self.api_key.as_deref())
    }

    pub fn set_api_key(&mut self, api_key: &str) {
        let api_key = api_key.trim();
        self.api_key = (!api_key.is_empty()).then(|| api_key.to_string());
    }

    pub fn default_city(&self) -> &str {
        self.default_city
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .unwrap_or(DEFAULT_CITY)
    }

    pub fn label_offset(&self) -> Result<FixedOffset> {
        let minutes = self.utc_offset_minutes.unwrap_or(DEFAULT_UTC_OFFSET_MINUTES);
        offset_from_minutes(minutes).ok_or_else(|| {
            anyhow!("utc_offset_minutes = {minutes} is out of range (must be within ±1439)")
        })
    }
}

fn pick_api_key(from_env: Option<String>, stored: Option<&str>) -> Option<String> {
    from_env
        .filter(|k| !k.trim().is_empty())
        .or_else(|| stored.map(str::to_string))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        let cfg = Config::parse("").expect("empty config must parse");
        assert_eq!(cfg, Config::default());
        assert_eq!(cfg.default_city(), "Istanbul");
        assert_eq!(cfg.label_offset().unwrap().local_minus_utc(), 3 * 3600);
    }

    #[test]
    fn parses_all_fields() {
        let cfg = Config::parse(
            r#"
            api_key = "KEY"
            default_city = "Izmir"
            language = "en"
            utc_offset_minutes = -300
            base_url = "http://localhost:8080"
            timeout_secs = 5
            "#,
        )
        .unwrap();

        assert_eq!(cfg.api_key.as_deref(), Some("KEY"));
        assert_eq!(cfg.default_city(), "Izmir");
        assert_eq!(cfg.language.as_deref(), Some("en"));
        assert_eq!(cfg.label_offset().unwrap().local_minus_utc(), -5 * 3600);
        assert_eq!(cfg.timeout_secs, Some(5));
    }

    #[test]
    fn rejects_out_of_range_offset() {
        let cfg = Config { utc_offset_minutes: Some(1440), ..Config::default() };
        let err = cfg.label_offset().unwrap_err();
        assert!(err.to_string().contains("out of range"));
    }

    #[test]
    fn blank_default_city_falls_back() {
        let cfg = Config { default_city: Some("  ".into()), ..Config::default() };
        assert_eq!(cfg.default_city(), "Istanbul");
    }

    #[test]
    fn set_api_key_trims_and_clears() {
        let mut cfg = Config::default();
        cfg.set_api_key("  abc  ");
        assert_eq!(cfg.api_key.as_deref(), Some("abc"));

        cfg.set_api_key("   ");
        assert_eq!(cfg.api_key, None);
    }

    #[test]
    fn environment_key_wins_over_stored_key() {
        assert_eq!(pick_api_key(Some("ENV".into()), Some("FILE")).as_deref(), Some("ENV"));
        assert_eq!(pick_api_key(Some(" ".into()), Some("FILE")).as_deref(), Some("FILE"));
        assert_eq!(pick_api_key(None, Some("FILE")).as_deref(), Some("FILE"));
        assert_eq!(pick_api_key(None, None), None);
    }
}
