use async_trait::async_trait;
use std::fmt::Debug;

use crate::{WeatherResult, icons::IconTable};

pub mod openweather;

pub const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org/data/2.5";

/// Read-only settings shared by every lookup, built once at startup.
#[derive(Debug, Clone)]
pub struct WeatherContext {
    pub api_key: String,
    pub base_url: String,
    pub icons: &'static IconTable,
}

impl WeatherContext {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            icons: &crate::icons::RUSSIAN,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    /// Current conditions for `city`. Failures come back as
    /// [`WeatherResult::Failure`], never as an error or a panic.
    async fn fetch(&self, city: &str) -> WeatherResult;
}
