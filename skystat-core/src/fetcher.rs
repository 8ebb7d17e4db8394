use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::fmt::Debug;
use tracing::debug;

use crate::error::{Result, WeatherError};
use crate::model::WeatherRecord;

/// Current-weather endpoint of the OpenWeatherMap API.
pub const OPENWEATHER_URL: &str = "https://api.openweathermap.org/data/2.5/weather";

/// A source of current weather observations.
#[async_trait]
pub trait WeatherSource: Send + Sync + Debug {
    async fn current_weather(&self, city: &str) -> Result<WeatherRecord>;
}

/// Fetcher for the OpenWeatherMap current-weather API.
///
/// One outbound request per call; no retries, no caching.
#[derive(Debug, Clone)]
pub struct OpenWeatherFetcher {
    api_key: String,
    base_url: String,
    http: Client,
}

impl OpenWeatherFetcher {
    /// Create a fetcher for the given API key.
    ///
    /// Fails with a configuration error if the key is empty or whitespace.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(WeatherError::Configuration(
                "API key must be a non-empty string".into(),
            ));
        }

        Ok(Self {
            api_key,
            base_url: OPENWEATHER_URL.to_string(),
            http: Client::new(),
        })
    }

    /// Point the fetcher at a different endpoint. Used by tests to target a
    /// mock server.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Retrieve the current observation (temp, humidity, pressure) for `city`.
    pub async fn fetch_current_weather(&self, city: &str) -> Result<WeatherRecord> {
        if city.trim().is_empty() {
            return Err(WeatherError::InvalidInput(
                "city name must be a non-empty string".into(),
            ));
        }

        debug!(city, "requesting current weather");

        let res = self
            .http
            .get(&self.base_url)
            .query(&[
                ("q", city),
                ("appid", self.api_key.as_str()),
                ("units", "metric"),
            ])
            .send()
            .await
            .map_err(|e| {
                if e.is_connect() || e.is_timeout() {
                    WeatherError::WeatherData(format!("connection error: {e}"))
                } else {
                    WeatherError::WeatherData(format!(
                        "unexpected error while sending request: {e}"
                    ))
                }
            })?;

        let status = res.status();
        let body = res.text().await.map_err(|e| {
            WeatherError::WeatherData(format!("failed to read response body: {e}"))
        })?;

        if !status.is_success() {
            return Err(match status {
                StatusCode::NOT_FOUND => {
                    WeatherError::WeatherData(format!("city '{city}' not found (status 404)"))
                }
                StatusCode::UNAUTHORIZED => {
                    WeatherError::WeatherData("invalid API key (status 401)".into())
                }
                _ => WeatherError::WeatherData(format!(
                    "request failed with status {status}: {}",
                    truncate_body(&body),
                )),
            });
        }

        let parsed: OwCurrentResponse = serde_json::from_str(&body).map_err(|e| {
            WeatherError::WeatherData(format!("failed to parse response JSON: {e}"))
        })?;

        let main = parsed.main.ok_or_else(|| {
            WeatherError::WeatherData("response is missing 'main' weather data".into())
        })?;

        WeatherRecord::new(city, main.temp, main.humidity, main.pressure)
    }
}

#[async_trait]
impl WeatherSource for OpenWeatherFetcher {
    async fn current_weather(&self, city: &str) -> Result<WeatherRecord> {
        self.fetch_current_weather(city).await
    }
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    humidity: f64,
    pressure: f64,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    main: Option<OwMain>,
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() > MAX {
        format!("{}...", &body[..MAX])
    } else {
        body.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_rejects_blank_api_key() {
        for key in ["", "   "] {
            let err = OpenWeatherFetcher::new(key).unwrap_err();
            assert!(matches!(err, WeatherError::Configuration(_)));
        }
    }

    #[test]
    fn new_accepts_non_empty_api_key() {
        let fetcher = OpenWeatherFetcher::new("KEY").expect("fetcher must build");
        assert_eq!(fetcher.base_url, OPENWEATHER_URL);
    }

    #[test]
    fn truncate_body_caps_long_bodies() {
        let long = "x".repeat(500);
        let truncated = truncate_body(&long);
        assert!(truncated.len() < long.len());
        assert!(truncated.ends_with("..."));

        assert_eq!(truncate_body("short"), "short");
    }
}
