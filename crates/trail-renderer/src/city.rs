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

//! City identity and the weather reading a trail is built from.

use std::fmt;

/// A trimmed, non-empty city name as typed by the user.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CityName(String);

impl CityName {
    /// Trim the input; blank input yields `None`.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_owned()))
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CityName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CityName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A city with the reading taken at intake time. Never re-fetched.
#[derive(Debug, Clone, PartialEq)]
pub struct City {
    pub name: CityName,
    /// Degrees, -90..=90
    pub latitude: f64,
    /// Degrees, -180..=180
    pub longitude: f64,
    pub temperature_c: f64,
    /// km/h, non-negative
    pub wind_speed_kmh: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_trims() {
        let name = CityName::parse("  Berlin \n").unwrap();
        assert_eq!(name.as_str(), "Berlin");
        assert_eq!(name.to_string(), "Berlin");
    }

    #[test]
    fn test_parse_rejects_blank() {
        assert!(CityName::parse("").is_none());
        assert!(CityName::parse(" \t  ").is_none());
    }
}
