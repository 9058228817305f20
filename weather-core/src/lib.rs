//! Core library for the weather chat bot.
//!
//! This crate defines:
//! - The OpenWeather client and its failure classification
//! - The keyword → icon table
//! - Message routing and reply rendering
//! - Configuration & credentials handling
//!
//! The chat platform itself stays behind [`ChatPlatform`]; `weather-bot`
//! plugs Telegram in.

pub mod chat;
pub mod config;
pub mod icons;
pub mod model;
pub mod provider;
pub mod render;
pub mod router;

pub use chat::{ChatPlatform, MAIN_KEYBOARD, Reply, TextFormat};
pub use config::{Config, ProviderConfig};
pub use icons::IconTable;
pub use model::{CurrentWeather, FetchError, WeatherResult};
pub use provider::{WeatherContext, WeatherProvider, openweather::OpenWeatherClient};
pub use render::render;
pub use router::{MessageRouter, Route};
