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

//! Geospatial weather trail renderer.
//!
//! Each city on the map becomes an animated "smoke trail": a random walk
//! anchored at the city's projected position, colored by temperature and
//! jittered in proportion to wind speed. The crate is split into layers that
//! can be used on their own or together through [`WeatherOverlay`]:
//!
//! - **Projection**: latitude/longitude to viewport pixels ([`Projector`])
//! - **Palette**: temperature to color ([`Palette`])
//! - **Trails**: per-city random walk with bounded history ([`TrailState`])
//! - **Registry**: insertion-ordered trail store ([`TrailRegistry`])
//! - **Compositor**: base, marker and label layers drawn onto any [`Surface`]
//! - **Intake**: geocoding + weather lookup ([`CityIntake`], [`OpenMeteoClient`])
//!
//! # Quick Start
//!
//! ```
//! use std::time::Duration;
//!
//! use rand::rngs::StdRng;
//! use rand::SeedableRng;
//! use trail_renderer::{City, CityName, RecordingSurface, RendererConfig, Viewport, WeatherOverlay};
//!
//! let mut overlay = WeatherOverlay::new(
//!     RendererConfig::default(),
//!     Viewport::new(1400.0, 800.0),
//!     StdRng::seed_from_u64(42),
//! );
//!
//! overlay.add_city(
//!     City {
//!         name: CityName::parse("Berlin").unwrap(),
//!         latitude: 52.52,
//!         longitude: 13.405,
//!         temperature_c: 10.0,
//!         wind_speed_kmh: 20.0,
//!     },
//!     Duration::ZERO,
//! );
//!
//! overlay.tick(Duration::from_millis(16));
//!
//! let mut surface = RecordingSurface::new();
//! overlay.render(&mut surface);
//! assert!(surface.lines().count() >= 1);
//! ```

pub mod city;
pub mod compositor;
pub mod intake;
pub mod palette;
pub mod projection;
pub mod registry;
pub mod trail;

use std::time::Duration;

use rand::Rng;
use serde::{Deserialize, Serialize};

pub use city::{City, CityName};
pub use compositor::{
    Compositor, CompositorConfig, DrawCommand, PersistencePolicy, RecordingSurface, Surface, TextAlign,
};
pub use intake::{
    intake_city, CityIntake, CityReport, Coordinates, CurrentWeather, IntakeError, OpenMeteoClient,
    OpenMeteoConfig, NOT_FOUND_MESSAGE,
};
pub use palette::{ControlPoint, Palette, Rgb, Rgba};
pub use projection::{ProjectionBounds, Projector, ScreenPoint, Viewport};
pub use registry::{TrailId, TrailRegistry};
pub use trail::{TrailConfig, TrailPhase, TrailState, TrailStep, WindRemap, MAX_AMPLITUDE};

/// Every rendering knob in one place.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RendererConfig {
    #[serde(default)]
    pub projection: ProjectionBounds,
    #[serde(default)]
    pub palette: Palette,
    #[serde(default)]
    pub trail: TrailConfig,
    #[serde(default)]
    pub compositor: CompositorConfig,
}

/// The whole overlay: projection, palette, trails and compositor driven by
/// one random source.
///
/// Owned by the render loop. Cities are added with [`add_city`](Self::add_city)
/// and every animation tick calls [`tick`](Self::tick) then
/// [`render`](Self::render).
#[derive(Debug)]
pub struct WeatherOverlay<R> {
    projector: Projector,
    palette: Palette,
    trail_config: TrailConfig,
    registry: TrailRegistry,
    compositor: Compositor,
    rng: R,
}

impl<R: Rng> WeatherOverlay<R> {
    #[must_use]
    pub fn new(config: RendererConfig, viewport: Viewport, rng: R) -> Self {
        Self {
            projector: Projector::new(config.projection, viewport),
            palette: config.palette,
            trail_config: config.trail,
            registry: TrailRegistry::new(),
            compositor: Compositor::new(config.compositor),
            rng,
        }
    }

    /// Create a trail for `city`. Its anchor and color are fixed from the
    /// current viewport and palette; `now` is the animation clock.
    pub fn add_city(&mut self, city: City, now: Duration) -> TrailId {
        let trail = TrailState::new(city, &self.projector, &self.palette, &self.trail_config, now);
        self.registry.add(trail)
    }

    /// Advance every trail one step and rebuild the layers.
    pub fn tick(&mut self, now: Duration) {
        self.compositor.tick(&mut self.registry, now, &mut self.rng);
    }

    pub fn render<S: Surface + ?Sized>(&self, surface: &mut S) {
        self.compositor.render(surface);
    }

    /// Resize the projection for cities added from now on.
    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.projector.set_viewport(viewport);
    }

    pub fn toggle_labels(&mut self) -> bool {
        self.compositor.toggle_labels()
    }

    pub fn set_labels_visible(&mut self, visible: bool) {
        self.compositor.set_labels_visible(visible);
    }

    #[must_use]
    pub fn labels_visible(&self) -> bool {
        self.compositor.labels_visible()
    }

    #[must_use]
    pub fn projector(&self) -> &Projector {
        &self.projector
    }

    #[must_use]
    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    #[must_use]
    pub fn registry(&self) -> &TrailRegistry {
        &self.registry
    }

    #[must_use]
    pub fn compositor(&self) -> &Compositor {
        &self.compositor
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    struct Berlin;

    impl CityIntake for Berlin {
        async fn resolve_coordinates(&self, name: &str) -> Result<Coordinates, IntakeError> {
            if name == "Berlin" {
                Ok(Coordinates {
                    latitude: 52.52,
                    longitude: 13.405,
                })
            } else {
                Err(IntakeError::NotFound(name.to_string()))
            }
        }

        async fn fetch_current_weather(&self, _latitude: f64, _longitude: f64) -> Result<CurrentWeather, IntakeError> {
            Ok(CurrentWeather {
                temperature_c: 10.0,
                wind_speed_kmh: 20.0,
                observed_at: None,
            })
        }
    }

    fn overlay() -> WeatherOverlay<ChaCha8Rng> {
        WeatherOverlay::new(
            RendererConfig::default(),
            Viewport::new(1400.0, 800.0),
            ChaCha8Rng::seed_from_u64(2024),
        )
    }

    #[tokio::test]
    async fn test_berlin_end_to_end() {
        let mut overlay = overlay();
        let report = intake_city(&Berlin, CityName::parse(" Berlin ").unwrap())
            .await
            .unwrap();

        let id = overlay.add_city(report.into(), Duration::ZERO);
        assert_eq!(overlay.registry().len(), 1);

        let trail = overlay.registry().get(id).unwrap();
        let anchor = trail.anchor();
        assert!(overlay.projector().viewport().contains(anchor));
        assert_eq!(trail.color(), Rgb::new(255, 165, 0));

        overlay.tick(Duration::from_millis(16));
        let trail = overlay.registry().get(id).unwrap();
        let last = *trail.history().last().unwrap();
        let bound = RendererConfig::default().trail.wind.amplitude(20.0);
        assert!(!trail.history().is_empty());
        assert!((last.x - anchor.x).abs() <= bound + 1e-3);
        assert!((last.y - anchor.y).abs() <= bound + 1e-3);
    }

    #[tokio::test]
    async fn test_same_city_twice_diverges() {
        let mut overlay = overlay();
        for _ in 0..2 {
            let report = intake_city(&Berlin, CityName::parse("Berlin").unwrap())
                .await
                .unwrap();
            overlay.add_city(report.into(), Duration::ZERO);
        }
        for i in 0..10 {
            overlay.tick(Duration::from_millis(16 * i));
        }

        let trails: Vec<_> = overlay.registry().iter().map(|(_, t)| t).collect();
        assert_eq!(trails.len(), 2);
        assert_eq!(trails[0].anchor(), trails[1].anchor());
        assert_ne!(trails[0].history(), trails[1].history());
    }

    #[test]
    fn test_viewport_change_keeps_existing_anchors() {
        let mut overlay = overlay();
        let city = City {
            name: CityName::parse("Quito").unwrap(),
            latitude: -0.18,
            longitude: -78.47,
            temperature_c: 14.0,
            wind_speed_kmh: 8.0,
        };
        let first = overlay.add_city(city.clone(), Duration::ZERO);
        let before = overlay.registry().get(first).unwrap().anchor();

        overlay.set_viewport(Viewport::new(700.0, 400.0));
        let second = overlay.add_city(city, Duration::ZERO);

        assert_eq!(overlay.registry().get(first).unwrap().anchor(), before);
        assert_ne!(overlay.registry().get(second).unwrap().anchor(), before);
    }

    #[test]
    fn test_config_serde_defaults() {
        let config: RendererConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, RendererConfig::default());

        let config: RendererConfig =
            serde_json::from_str(r#"{"compositor": {"persistence": "accumulate"}, "trail": {"capacity": 60}}"#).unwrap();
        assert_eq!(config.compositor.persistence, PersistencePolicy::Accumulate);
        assert_eq!(config.compositor.stroke_alpha, 50);
        assert_eq!(config.trail.capacity, 60);
        assert_eq!(config.palette, Palette::reference());
    }

    #[test]
    fn test_label_toggle_through_overlay() {
        let mut overlay = overlay();
        assert!(!overlay.labels_visible());
        assert!(overlay.toggle_labels());
        overlay.set_labels_visible(false);
        assert!(!overlay.labels_visible());
    }
}
