use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, instrument, warn};

use crate::model::{CurrentWeather, FetchError, WeatherResult, hpa_to_mmhg};

use super::{WeatherContext, WeatherProvider};

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Message used when a non-2xx answer carries no usable `message`.
pub const GENERIC_PROVIDER_ERROR: &str = "unknown error";

/// Client for the OpenWeather "current weather" endpoint.
#[derive(Debug, Clone)]
pub struct OpenWeatherClient {
    context: WeatherContext,
    timeout: Duration,
    http: Client,
}

impl OpenWeatherClient {
    pub fn new(context: WeatherContext) -> Self {
        Self {
            context,
            timeout: DEFAULT_TIMEOUT,
            http: Client::new(),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn context(&self) -> &WeatherContext {
        &self.context
    }

    async fn fetch_current(&self, city: &str) -> Result<CurrentWeather, FetchError> {
        let url = format!("{}/weather", self.context.base_url.trim_end_matches('/'));

        let res = self
            .http
            .get(&url)
            .query(&[
                ("q", city),
                ("appid", self.context.api_key.as_str()),
                ("units", "metric"),
                ("lang", self.context.icons.lang),
            ])
            .timeout(self.timeout)
            .send()
            .await
            .map_err(classify_transport)?;

        let status = res.status();
        let body = res.text().await.map_err(classify_transport)?;

        if status != StatusCode::OK {
            let message = provider_message(&body);
            debug!(%status, %message, "OpenWeather returned an error");
            return Err(FetchError::Provider(message));
        }

        let parsed: OwCurrentResponse =
            serde_json::from_str(&body).map_err(|e| FetchError::Parse(e.to_string()))?;

        self.shape(parsed)
    }

    fn shape(&self, parsed: OwCurrentResponse) -> Result<CurrentWeather, FetchError> {
        let description = parsed
            .weather
            .into_iter()
            .next()
            .map(|w| w.description)
            .ok_or_else(|| FetchError::Parse("response has no weather description".into()))?;

        let icon = self.context.icons.icon_for(&description).to_string();

        Ok(CurrentWeather {
            city: parsed.name,
            country: parsed.sys.country,
            temperature_c: parsed.main.temp,
            feels_like_c: parsed.main.feels_like,
            humidity_pct: parsed.main.humidity.round().clamp(0.0, 100.0) as u8,
            pressure_mmhg: hpa_to_mmhg(parsed.main.pressure),
            wind_speed_ms: parsed.wind.speed,
            description,
            icon,
        })
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherClient {
    #[instrument(skip(self))]
    async fn fetch(&self, city: &str) -> WeatherResult {
        let result = self.fetch_current(city).await;
        if let Err(err) = &result {
            warn!(error = %err, "Weather lookup failed");
        }
        result.into()
    }
}

fn classify_transport(err: reqwest::Error) -> FetchError {
    if err.is_timeout() {
        FetchError::Timeout
    } else if err.is_decode() {
        FetchError::Parse(err.without_url().to_string())
    } else {
        // The URL carries the API key.
        FetchError::Network(err.without_url().to_string())
    }
}

fn provider_message(body: &str) -> String {
    serde_json::from_str::<OwErrorEnvelope>(body)
        .ok()
        .and_then(|envelope| envelope.message)
        .filter(|message| !message.is_empty())
        .unwrap_or_else(|| GENERIC_PROVIDER_ERROR.to_string())
}

#[derive(Debug, Deserialize)]
struct OwErrorEnvelope {
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    feels_like: f64,
    humidity: f64,
    pressure: f64,
}

#[derive(Debug, Deserialize)]
struct OwSys {
    country: String,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    description: String,
}

#[derive(Debug, Deserialize)]
struct OwWind {
    speed: f64,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    name: String,
    sys: OwSys,
    main: OwMain,
    weather: Vec<OwWeather>,
    wind: OwWind,
}
