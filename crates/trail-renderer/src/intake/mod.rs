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

//! City intake: resolve a name to coordinates, then fetch current weather.
//!
//! The two lookups are behind the [`CityIntake`] trait so the overlay can be
//! fed from any source. [`intake_city`] runs them in order and only returns a
//! report once both have succeeded.

mod open_meteo;

pub use open_meteo::{OpenMeteoClient, OpenMeteoConfig};

use std::future::Future;

use chrono::NaiveDateTime;
use log::{info, warn};
use thiserror::Error;

use crate::city::{City, CityName};

/// Message shown to the user for any failed intake.
pub const NOT_FOUND_MESSAGE: &str = "City not found.";

/// Errors that can occur while taking in a city.
#[derive(Debug, Error)]
pub enum IntakeError {
    #[error("no geocoding result for '{0}'")]
    NotFound(String),

    #[error("network failure: {0}")]
    NetworkFailure(String),
}

impl IntakeError {
    /// The text shown to the user. Both variants read the same.
    #[must_use]
    pub fn user_message(&self) -> &'static str {
        NOT_FOUND_MESSAGE
    }
}

impl From<reqwest::Error> for IntakeError {
    fn from(e: reqwest::Error) -> Self {
        Self::NetworkFailure(e.to_string())
    }
}

/// Geographic position in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    /// Latitude within +-90 and longitude within +-180.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        (-90.0..=90.0).contains(&self.latitude) && (-180.0..=180.0).contains(&self.longitude)
    }
}

/// Current conditions at a location.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurrentWeather {
    pub temperature_c: f64,
    pub wind_speed_kmh: f64,
    /// Observation time as reported by the service
    pub observed_at: Option<NaiveDateTime>,
}

impl CurrentWeather {
    /// Finite temperature and finite, non-negative wind speed.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.temperature_c.is_finite() && self.wind_speed_kmh.is_finite() && self.wind_speed_kmh >= 0.0
    }
}

/// Everything needed to build a trail.
#[derive(Debug, Clone, PartialEq)]
pub struct CityReport {
    pub name: CityName,
    pub coordinates: Coordinates,
    pub weather: CurrentWeather,
}

impl From<CityReport> for City {
    fn from(report: CityReport) -> Self {
        City {
            name: report.name,
            latitude: report.coordinates.latitude,
            longitude: report.coordinates.longitude,
            temperature_c: report.weather.temperature_c,
            wind_speed_kmh: report.weather.wind_speed_kmh,
        }
    }
}

/// Source of coordinates and weather readings.
pub trait CityIntake {
    /// Resolve a city name. Zero matches is [`IntakeError::NotFound`].
    fn resolve_coordinates(&self, name: &str) -> impl Future<Output = Result<Coordinates, IntakeError>> + Send;

    fn fetch_current_weather(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> impl Future<Output = Result<CurrentWeather, IntakeError>> + Send;
}

/// Resolve a city and fetch its weather.
///
/// Returns a report only when both lookups succeed and their values are in
/// range; the weather lookup is skipped if geocoding fails.
pub async fn intake_city<I>(intake: &I, name: CityName) -> Result<CityReport, IntakeError>
where
    I: CityIntake + ?Sized,
{
    let coordinates = intake.resolve_coordinates(name.as_str()).await?;
    if !coordinates.is_valid() {
        warn!("Geocoder returned out-of-range position for {name}: {coordinates:?}");
        return Err(IntakeError::NetworkFailure(format!(
            "position out of range: {}, {}",
            coordinates.latitude, coordinates.longitude
        )));
    }

    let weather = intake
        .fetch_current_weather(coordinates.latitude, coordinates.longitude)
        .await?;
    if !weather.is_valid() {
        warn!("Weather service returned unusable reading for {name}: {weather:?}");
        return Err(IntakeError::NetworkFailure(format!(
            "unusable reading: {}°C, {} km/h",
            weather.temperature_c, weather.wind_speed_kmh
        )));
    }

    info!(
        "Resolved {} to ({:.3}, {:.3}): {:.1}°C, {:.1} km/h",
        name, coordinates.latitude, coordinates.longitude, weather.temperature_c, weather.wind_speed_kmh
    );

    Ok(CityReport {
        name,
        coordinates,
        weather,
    })
}
