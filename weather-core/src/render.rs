use crate::chat::TextFormat;
use crate::model::{CurrentWeather, WeatherResult};

pub const ERROR_GLYPH: &str = "❌";

/// Text for a lookup result. `Html` bolds the title line.
pub fn render(result: &WeatherResult, format: TextFormat) -> String {
    match result {
        WeatherResult::Success(weather) => render_weather(weather, format),
        WeatherResult::Failure { message } => format!("{ERROR_GLYPH} Error: {message}"),
    }
}

fn render_weather(w: &CurrentWeather, format: TextFormat) -> String {
    let title = match format {
        TextFormat::Plain => format!("Weather in {}, {}", w.city, w.country),
        TextFormat::Html => format!(
            "<b>Weather in {}, {}</b>",
            escape_html(&w.city),
            escape_html(&w.country)
        ),
    };
    let description = capitalize(&w.description);
    let description = match format {
        TextFormat::Plain => description,
        TextFormat::Html => escape_html(&description),
    };

    format!(
        "{icon} {title}\n\
         Temperature: {temp:.1}°C\n\
         Feels like: {feels:.1}°C\n\
         Humidity: {humidity}%\n\
         Pressure: {pressure} mmHg\n\
         Wind: {wind} m/s\n\
         {description}",
        icon = w.icon,
        temp = w.temperature_c,
        feels = w.feels_like_c,
        humidity = w.humidity_pct,
        pressure = w.pressure_mmhg,
        wind = w.wind_speed_ms,
    )
}

/// First character upper-cased, the rest lower-cased.
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}
