use anyhow::{Context, Result, anyhow};
use reqwest::Client;
use serde::Deserialize;

use crate::model::WeatherSnapshot;

const OPENWEATHER_URL: &str = "https://api.openweathermap.org/data/2.5/weather";

/// Temperatures in Celsius, wind in m/s.
const UNITS: &str = "metric";
/// Response language for condition descriptions.
const LANGUAGE: &str = "es";

/// Client for the OpenWeatherMap current-weather API.
#[derive(Debug, Clone)]
pub struct WeatherClient {
    api_key: String,
    base_url: String,
    http: Client,
}

impl WeatherClient {
    pub fn new(api_key: String) -> Self {
        Self::new_with_base_url(api_key, OPENWEATHER_URL)
    }

    /// Like [`WeatherClient::new`] but against a custom endpoint; used to
    /// point the client at a mock server in tests.
    pub fn new_with_base_url(api_key: String, base_url: &str) -> Self {
        Self { api_key, base_url: base_url.to_string(), http: Client::new() }
    }

    /// Fetch current conditions for a pair of coordinates.
    ///
    /// Any network or decoding failure is logged and degrades to `None`;
    /// callers render that as "weather unavailable" rather than failing.
    pub async fn resolve(&self, lat: f64, lon: f64) -> Option<WeatherSnapshot> {
        match self.fetch(lat, lon).await {
            Ok(snapshot) => Some(snapshot),
            Err(err) => {
                tracing::warn!("weather lookup for ({lat}, {lon}) failed: {err:#}");
                None
            }
        }
    }

    async fn fetch(&self, lat: f64, lon: f64) -> Result<WeatherSnapshot> {
        let lat = lat.to_string();
        let lon = lon.to_string();

        let res = self
            .http
            .get(&self.base_url)
            .query(&[
                ("appid", self.api_key.as_str()),
                ("units", UNITS),
                ("lang", LANGUAGE),
                ("lat", lat.as_str()),
                ("lon", lon.as_str()),
            ])
            .send()
            .await
            .context("Failed to send request to the weather service")?;

        let status = res.status();
        let body = res
            .text()
            .await
            .context("Failed to read weather response body")?;

        if !status.is_success() {
            return Err(anyhow!(
                "Weather request failed with status {}: {}",
                status,
                truncate_body(&body),
            ));
        }

        let parsed: OwResponse =
            serde_json::from_str(&body).context("Failed to parse weather JSON")?;

        let description = parsed
            .weather
            .into_iter()
            .next()
            .map(|condition| condition.description)
            .ok_or_else(|| anyhow!("Weather response contained no condition entries"))?;

        Ok(WeatherSnapshot {
            description,
            temp: parsed.main.temp,
            temp_min: parsed.main.temp_min,
            temp_max: parsed.main.temp_max,
        })
    }
}

#[derive(Debug, Deserialize)]
struct OwCondition {
    description: String,
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    temp_min: f64,
    temp_max: f64,
}

#[derive(Debug, Deserialize)]
struct OwResponse {
    weather: Vec<OwCondition>,
    main: OwMain,
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() <= MAX {
        return body.to_string();
    }

    // Back up to a char boundary so multibyte text cannot split mid-char.
    let mut end = MAX;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &body[..end])
}
