// Copyright 2025 Chris Custine
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Open-Meteo geocoding and forecast client.

use std::time::Duration;

use chrono::NaiveDateTime;
use log::debug;
use serde::Deserialize;

use super::{CityIntake, Coordinates, CurrentWeather, IntakeError};

pub const DEFAULT_GEOCODING_URL: &str = "https://geocoding-api.open-meteo.com/v1/search";
pub const DEFAULT_FORECAST_URL: &str = "https://api.open-meteo.com/v1/forecast";

const USER_AGENT: &str = concat!("weather-trails/", env!("CARGO_PKG_VERSION"));
const OBSERVATION_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M";

#[derive(Debug, Deserialize)]
struct GeocodingResponse {
    #[serde(default)]
    results: Option<Vec<GeocodingResult>>,
}

#[derive(Debug, Deserialize)]
struct GeocodingResult {
    latitude: f64,
    longitude: f64,
}

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    current_weather: CurrentWeatherPayload,
}

#[derive(Debug, Deserialize)]
struct CurrentWeatherPayload {
    temperature: f64,
    windspeed: f64,
    #[serde(default)]
    time: Option<String>,
}

/// Endpoints and limits for [`OpenMeteoClient`].
#[derive(Debug, Clone)]
pub struct OpenMeteoConfig {
    pub geocoding_url: String,
    pub forecast_url: String,
    pub timeout: Duration,
}

impl Default for OpenMeteoConfig {
    fn default() -> Self {
        Self {
            geocoding_url: DEFAULT_GEOCODING_URL.to_string(),
            forecast_url: DEFAULT_FORECAST_URL.to_string(),
            timeout: Duration::from_secs(10),
        }
    }
}

/// [`CityIntake`] backed by the public Open-Meteo APIs.
#[derive(Debug, Clone)]
pub struct OpenMeteoClient {
    http: reqwest::Client,
    config: OpenMeteoConfig,
}

impl OpenMeteoClient {
    pub fn new(config: OpenMeteoConfig) -> Result<Self, IntakeError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self { http, config })
    }

    async fn get_text(&self, url: &str, query: &[(&str, String)]) -> Result<String, IntakeError> {
        let response = self.http.get(url).query(query).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(IntakeError::NetworkFailure(format!("HTTP error: {status}")));
        }
        Ok(response.text().await?)
    }
}

impl CityIntake for OpenMeteoClient {
    async fn resolve_coordinates(&self, name: &str) -> Result<Coordinates, IntakeError> {
        let body = self
            .get_text(
                &self.config.geocoding_url,
                &[("name", name.to_string()), ("count", "1".to_string())],
            )
            .await?;
        debug!("Geocoding response for {name}: {body}");
        parse_geocoding(name, &body)
    }

    async fn fetch_current_weather(&self, latitude: f64, longitude: f64) -> Result<CurrentWeather, IntakeError> {
        let body = self
            .get_text(
                &self.config.forecast_url,
                &[
                    ("latitude", latitude.to_string()),
                    ("longitude", longitude.to_string()),
                    ("current_weather", "true".to_string()),
                ],
            )
            .await?;
        debug!("Forecast response for ({latitude}, {longitude}): {body}");
        parse_forecast(&body)
    }
}

/// First geocoding hit for `name`; an absent or empty result list is
/// [`IntakeError::NotFound`].
fn parse_geocoding(name: &str, body: &str) -> Result<Coordinates, IntakeError> {
    let response: GeocodingResponse = serde_json::from_str(body)
        .map_err(|e| IntakeError::NetworkFailure(format!("bad geocoding response: {e}")))?;

    response
        .results
        .and_then(|results| results.into_iter().next())
        .map(|hit| Coordinates {
            latitude: hit.latitude,
            longitude: hit.longitude,
        })
        .ok_or_else(|| IntakeError::NotFound(name.to_string()))
}

fn parse_forecast(body: &str) -> Result<CurrentWeather, IntakeError> {
    let response: ForecastResponse = serde_json::from_str(body)
        .map_err(|e| IntakeError::NetworkFailure(format!("bad forecast response: {e}")))?;
    let current = response.current_weather;

    Ok(CurrentWeather {
        temperature_c: current.temperature,
        wind_speed_kmh: current.windspeed,
        observed_at: current
            .time
            .as_deref()
            .and_then(|t| NaiveDateTime::parse_from_str(t, OBSERVATION_TIME_FORMAT).ok()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_geocoding_first_result() {
        let body = r#"{
            "results": [
                {"id": 2950159, "name": "Berlin", "latitude": 52.52437, "longitude": 13.41053, "country": "Germany"},
                {"id": 5083330, "name": "Berlin", "latitude": 44.46867, "longitude": -71.18508, "country": "United States"}
            ],
            "generationtime_ms": 0.9
        }"#;
        let coords = parse_geocoding("Berlin", body).unwrap();
        assert!((coords.latitude - 52.52437).abs() < 1e-9);
        assert!((coords.longitude - 13.41053).abs() < 1e-9);
    }

    #[test]
    fn test_parse_geocoding_no_results() {
        let err = parse_geocoding("Atlantis", r#"{"generationtime_ms": 0.3}"#).unwrap_err();
        assert!(matches!(err, IntakeError::NotFound(ref n) if n == "Atlantis"));

        let err = parse_geocoding("Atlantis", r#"{"results": []}"#).unwrap_err();
        assert!(matches!(err, IntakeError::NotFound(_)));
    }

    #[test]
    fn test_parse_geocoding_malformed() {
        let err = parse_geocoding("Berlin", "<html>502</html>").unwrap_err();
        assert!(matches!(err, IntakeError::NetworkFailure(_)));
    }

    #[test]
    fn test_parse_forecast() {
        let body = r#"{
            "latitude": 52.52,
            "longitude": 13.419998,
            "current_weather": {
                "temperature": 10.0,
                "windspeed": 20.0,
                "winddirection": 250,
                "weathercode": 3,
                "time": "2024-03-01T12:00"
            }
        }"#;
        let weather = parse_forecast(body).unwrap();
        assert!((weather.temperature_c - 10.0).abs() < f64::EPSILON);
        assert!((weather.wind_speed_kmh - 20.0).abs() < f64::EPSILON);
        assert_eq!(
            weather.observed_at.map(|t| t.format("%H:%M").to_string()),
            Some("12:00".to_string())
        );
    }

    #[test]
    fn test_parse_forecast_missing_block() {
        let err = parse_forecast(r#"{"latitude": 1.0}"#).unwrap_err();
        assert!(matches!(err, IntakeError::NetworkFailure(_)));
    }

    #[test]
    fn test_client_builds_with_defaults() {
        assert!(OpenMeteoClient::new(OpenMeteoConfig::default()).is_ok());
    }
}
