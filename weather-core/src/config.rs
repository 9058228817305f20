use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::provider::WeatherContext;

pub const DEFAULT_LOG_FILE: &str = "logs/weather-bot.log";

/// Credentials and endpoint for the weather provider.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ProviderConfig {
    pub api_key: String,

    /// Overrides the public OpenWeather endpoint.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// bot_token = "123456:ABC..."
/// log_file = "logs/weather-bot.log"
///
/// [openweather]
/// api_key = "..."
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bot_token: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_file: Option<PathBuf>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub openweather: Option<ProviderConfig>,
}

impl Config {
    /// Load config from the platform config dir, or an empty default if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_file_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            // First run: no config file, return empty.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to the platform config dir.
    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::config_file_path()?;
        self.save_to(&path)?;
        Ok(path)
    }

    /// Save config to `path`, creating parent directories as needed.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "weather-bot", "weather-bot")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Apply overrides from the process environment.
    pub fn apply_env(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Apply `BOT_TOKEN` (or `TELOXIDE_TOKEN`), `WEATHER_API_KEY`,
    /// `WEATHER_API_URL` and `WEATHER_BOT_LOG_FILE` on top of the file values.
    /// Empty values are ignored.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        if let Some(token) = get("BOT_TOKEN").or_else(|| get("TELOXIDE_TOKEN")) {
            self.bot_token = Some(token);
        }
        if let Some(api_key) = get("WEATHER_API_KEY") {
            self.upsert_provider_api_key(api_key);
        }
        if let Some(base_url) = get("WEATHER_API_URL") {
            self.openweather.get_or_insert_with(Default::default).base_url = Some(base_url);
        }
        if let Some(log_file) = get("WEATHER_BOT_LOG_FILE") {
            self.log_file = Some(PathBuf::from(log_file));
        }
    }

    pub fn bot_token(&self) -> Result<&str> {
        self.bot_token.as_deref().ok_or_else(|| {
            anyhow!(
                "No bot token configured.\n\
                 Hint: set BOT_TOKEN or run `weather-bot configure`."
            )
        })
    }

    pub fn set_bot_token(&mut self, token: String) {
        self.bot_token = Some(token);
    }

    /// Returns the provider API key, if present.
    pub fn provider_api_key(&self) -> Result<&str> {
        self.openweather
            .as_ref()
            .map(|cfg| cfg.api_key.as_str())
            .filter(|key| !key.is_empty())
            .ok_or_else(|| {
                anyhow!(
                    "No weather API key configured.\n\
                     Hint: set WEATHER_API_KEY or run `weather-bot configure`."
                )
            })
    }

    /// Set/replace the provider API key, keeping any custom base URL.
    pub fn upsert_provider_api_key(&mut self, api_key: String) {
        self.openweather.get_or_insert_with(Default::default).api_key = api_key;
    }

    pub fn log_file(&self) -> PathBuf {
        self.log_file
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_FILE))
    }

    /// Build the read-only context the weather client runs with.
    pub fn weather_context(&self) -> Result<WeatherContext> {
        let mut ctx = WeatherContext::new(self.provider_api_key()?);

        if let Some(base_url) = self.openweather.as_ref().and_then(|cfg| cfg.base_url.clone()) {
            ctx = ctx.with_base_url(base_url);
        }

        Ok(ctx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::DEFAULT_BASE_URL;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn missing_credentials_are_reported_with_hint() {
        let cfg = Config::default();

        let err = cfg.bot_token().unwrap_err();
        assert!(err.to_string().contains("No bot token configured"));

        let err = cfg.provider_api_key().unwrap_err();
        assert!(err.to_string().contains("Hint: set WEATHER_API_KEY"));
        assert!(cfg.weather_context().is_err());
    }

    #[test]
    fn env_overrides_file_values() {
        let mut cfg = Config {
            bot_token: Some("FILE_TOKEN".into()),
            log_file: None,
            openweather: Some(ProviderConfig {
                api_key: "FILE_KEY".into(),
                base_url: None,
            }),
        };

        cfg.apply_overrides(env(&[
            ("BOT_TOKEN", "ENV_TOKEN"),
            ("WEATHER_API_KEY", "ENV_KEY"),
            ("WEATHER_API_URL", "http://localhost:8080"),
            ("WEATHER_BOT_LOG_FILE", "/tmp/bot.log"),
        ]));

        assert_eq!(cfg.bot_token().unwrap(), "ENV_TOKEN");
        assert_eq!(cfg.provider_api_key().unwrap(), "ENV_KEY");
        assert_eq!(cfg.log_file(), PathBuf::from("/tmp/bot.log"));

        let ctx = cfg.weather_context().unwrap();
        assert_eq!(ctx.api_key, "ENV_KEY");
        assert_eq!(ctx.base_url, "http://localhost:8080");
    }

    #[test]
    fn empty_env_values_are_ignored() {
        let mut cfg = Config::default();
        cfg.set_bot_token("FILE_TOKEN".into());

        cfg.apply_overrides(env(&[("BOT_TOKEN", ""), ("TELOXIDE_TOKEN", "  ")]));

        assert_eq!(cfg.bot_token().unwrap(), "FILE_TOKEN");
    }

    #[test]
    fn teloxide_token_is_accepted_as_alias() {
        let mut cfg = Config::default();
        cfg.apply_overrides(env(&[("TELOXIDE_TOKEN", "ALIAS")]));
        assert_eq!(cfg.bot_token().unwrap(), "ALIAS");
    }

    #[test]
    fn defaults_for_log_file_and_base_url() {
        let mut cfg = Config::default();
        cfg.upsert_provider_api_key("KEY".into());

        assert_eq!(cfg.log_file(), PathBuf::from(DEFAULT_LOG_FILE));
        assert_eq!(cfg.weather_context().unwrap().base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn upsert_keeps_custom_base_url() {
        let mut cfg = Config::default();
        cfg.apply_overrides(env(&[("WEATHER_API_URL", "http://mirror")]));
        cfg.upsert_provider_api_key("KEY".into());

        let ctx = cfg.weather_context().unwrap();
        assert_eq!(ctx.base_url, "http://mirror");
    }

    #[test]
    fn save_and_load_from_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut cfg = Config::default();
        cfg.set_bot_token("TOKEN".into());
        cfg.upsert_provider_api_key("KEY".into());
        cfg.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.bot_token().unwrap(), "TOKEN");
        assert_eq!(loaded.provider_api_key().unwrap(), "KEY");
        assert!(loaded.log_file.is_none());
    }

    #[test]
    fn missing_file_loads_empty_default() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = Config::load_from(&dir.path().join("absent.toml")).unwrap();
        assert!(cfg.bot_token.is_none());
        assert!(cfg.openweather.is_none());
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "bot_token = [").unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
    }
}
