use thiserror::Error;

/// hPa → mmHg.
pub const HPA_TO_MMHG: f64 = 0.750062;

/// Current conditions for one city, shaped for display.
#[derive(Debug, Clone, PartialEq)]
pub struct CurrentWeather {
    pub city: String,
    pub country: String,
    pub temperature_c: f64,
    pub feels_like_c: f64,
    pub humidity_pct: u8,
    pub pressure_mmhg: i64,
    pub wind_speed_ms: f64,
    pub description: String,
    pub icon: String,
}

/// Outcome of a single lookup. The client never returns anything else.
#[derive(Debug, Clone, PartialEq)]
pub enum WeatherResult {
    Success(CurrentWeather),
    Failure { message: String },
}

impl WeatherResult {
    pub fn failure(message: impl Into<String>) -> Self {
        WeatherResult::Failure {
            message: message.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, WeatherResult::Success(_))
    }
}

impl From<Result<CurrentWeather, FetchError>> for WeatherResult {
    fn from(value: Result<CurrentWeather, FetchError>) -> Self {
        match value {
            Ok(weather) => WeatherResult::Success(weather),
            Err(err) => WeatherResult::failure(err.to_string()),
        }
    }
}

/// Every way a lookup can fail. `Display` is the user-visible message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("timeout")]
    Timeout,

    #[error("network error: {0}")]
    Network(String),

    /// Non-2xx answer; carries the provider's own message.
    #[error("{0}")]
    Provider(String),

    #[error("unknown error: {0}")]
    Parse(String),
}

pub fn hpa_to_mmhg(hpa: f64) -> i64 {
    (hpa * HPA_TO_MMHG).round() as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pressure_is_rounded_to_nearest_mmhg() {
        assert_eq!(hpa_to_mmhg(1012.0), 759);
        assert_eq!(hpa_to_mmhg(1013.25), 760);
        assert_eq!(hpa_to_mmhg(980.0), 735);
    }

    #[test]
    fn fetch_errors_render_as_failure_messages() {
        assert_eq!(FetchError::Timeout.to_string(), "timeout");
        assert_eq!(
            FetchError::Network("connection refused".into()).to_string(),
            "network error: connection refused"
        );
        assert_eq!(
            FetchError::Provider("city not found".into()).to_string(),
            "city not found"
        );
        assert_eq!(
            FetchError::Parse("missing field `name`".into()).to_string(),
            "unknown error: missing field `name`"
        );
    }

    #[test]
    fn result_from_error_is_failure() {
        let result: WeatherResult = Err(FetchError::Timeout).into();
        assert_eq!(result, WeatherResult::failure("timeout"));
        assert!(!result.is_success());
    }
}
