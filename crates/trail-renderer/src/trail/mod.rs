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

//! Per-city animated trail state.
//!
//! A trail is a random walk that starts at the city's anchor. Every tick
//! appends one jittered point; once the history grows past its capacity it
//! collapses back to the anchor and starts over, so the trail pulses out
//! from the city marker instead of sliding.

mod wind;

pub use wind::{WindRemap, MAX_AMPLITUDE};

use std::time::Duration;

use log::trace;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::city::City;
use crate::palette::{Palette, Rgb};
use crate::projection::{Projector, ScreenPoint};

/// Default number of points a trail holds before snapping back.
pub const DEFAULT_TRAIL_CAPACITY: usize = 120;

/// Trail behaviour shared by every city.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrailConfig {
    /// Maximum history length before the trail resets
    #[serde(default = "default_capacity")]
    pub capacity: usize,

    /// Wind speed to jitter amplitude mapping
    #[serde(default)]
    pub wind: WindRemap,
}

fn default_capacity() -> usize {
    DEFAULT_TRAIL_CAPACITY
}

impl Default for TrailConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_TRAIL_CAPACITY,
            wind: WindRemap::default(),
        }
    }
}

/// Where a trail is in its grow/reset cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrailPhase {
    /// No points yet; the next tick seeds the anchor.
    Empty,
    /// Walking away from the anchor.
    Growing,
}

/// Segment produced by one tick, drawn in the trail's color.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrailStep {
    pub from: ScreenPoint,
    pub to: ScreenPoint,
    pub color: Rgb,
    /// History collapsed back to the anchor after this step
    pub reset: bool,
}

/// One city's trail.
#[derive(Debug, Clone)]
pub struct TrailState {
    city: City,
    anchor: ScreenPoint,
    color: Rgb,
    amplitude: f32,
    capacity: usize,
    created_at: Duration,
    history: Vec<ScreenPoint>,
}

impl TrailState {
    /// Build a trail for a city, projecting its anchor and picking its color
    /// once. `created_at` is on the animation clock.
    #[must_use]
    pub fn new(
        city: City,
        projector: &Projector,
        palette: &Palette,
        config: &TrailConfig,
        created_at: Duration,
    ) -> Self {
        let anchor = projector.project(city.latitude, city.longitude);
        let color = palette.color_for(city.temperature_c);
        let amplitude = config.wind.amplitude(city.wind_speed_kmh);
        let capacity = config.capacity.max(1);

        Self {
            city,
            anchor,
            color,
            amplitude,
            capacity,
            created_at,
            history: Vec::with_capacity(capacity + 1),
        }
    }

    #[must_use]
    pub fn city(&self) -> &City {
        &self.city
    }

    #[must_use]
    pub fn anchor(&self) -> ScreenPoint {
        self.anchor
    }

    #[must_use]
    pub fn color(&self) -> Rgb {
        self.color
    }

    /// Maximum per-axis displacement of one step.
    #[must_use]
    pub fn amplitude(&self) -> f32 {
        self.amplitude
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    #[must_use]
    pub fn created_at(&self) -> Duration {
        self.created_at
    }

    /// Time since creation, zero if `now` is earlier than creation.
    #[must_use]
    pub fn age(&self, now: Duration) -> Duration {
        now.saturating_sub(self.created_at)
    }

    #[must_use]
    pub fn history(&self) -> &[ScreenPoint] {
        &self.history
    }

    #[must_use]
    pub fn phase(&self) -> TrailPhase {
        if self.history.is_empty() {
            TrailPhase::Empty
        } else {
            TrailPhase::Growing
        }
    }

    /// Advance the random walk by one step.
    ///
    /// Seeds the anchor if the history is empty, appends a point jittered by
    /// up to `amplitude` on each axis, and collapses the history back to the
    /// anchor when it exceeds the capacity.
    pub fn tick<R: Rng + ?Sized>(&mut self, rng: &mut R) -> TrailStep {
        if self.history.is_empty() {
            self.history.push(self.anchor);
        }
        let from = self.history[self.history.len() - 1];

        let a = self.amplitude;
        let to = from.offset(rng.gen_range(-a..=a), rng.gen_range(-a..=a));
        self.history.push(to);

        let reset = self.history.len() > self.capacity;
        if reset {
            trace!("Trail for {} reached {} points, resetting", self.city.name, self.history.len());
            self.history.clear();
            self.history.push(self.anchor);
        }

        TrailStep {
            from,
            to,
            color: self.color,
            reset,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::city::CityName;
    use crate::projection::{ProjectionBounds, Viewport};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn berlin() -> City {
        City {
            name: CityName::parse("Berlin").unwrap(),
            latitude: 52.52,
            longitude: 13.405,
            temperature_c: 10.0,
            wind_speed_kmh: 20.0,
        }
    }

    fn trail() -> TrailState {
        let projector = Projector::new(ProjectionBounds::LINEAR, Viewport::new(1400.0, 800.0));
        TrailState::new(
            berlin(),
            &projector,
            &Palette::reference(),
            &TrailConfig::default(),
            Duration::ZERO,
        )
    }

    #[test]
    fn test_construction_fixes_anchor_and_color() {
        let trail = trail();
        assert_eq!(trail.color(), Rgb::new(255, 165, 0));
        assert!((trail.anchor().x - (193.405 / 360.0 * 1400.0) as f32).abs() < 1e-3);
        assert_eq!(trail.phase(), TrailPhase::Empty);
        assert!(trail.history().is_empty());
    }

    #[test]
    fn test_first_tick_seeds_and_steps() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let mut trail = trail();
        let step = trail.tick(&mut rng);

        assert_eq!(trail.history().len(), 2);
        assert_eq!(trail.history()[0], trail.anchor());
        assert_eq!(step.from, trail.anchor());
        assert_eq!(step.to, trail.history()[1]);
        assert!(!step.reset);
        assert_eq!(trail.phase(), TrailPhase::Growing);
    }

    #[test]
    fn test_step_within_amplitude() {
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let mut trail = trail();
        let bound = trail.amplitude();
        for _ in 0..500 {
            let step = trail.tick(&mut rng);
            assert!((step.to.x - step.from.x).abs() <= bound + 1e-3);
            assert!((step.to.y - step.from.y).abs() <= bound + 1e-3);
        }
    }

    #[test]
    fn test_resets_past_capacity() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let mut trail = trail();
        for _ in 0..DEFAULT_TRAIL_CAPACITY - 1 {
            assert!(!trail.tick(&mut rng).reset);
        }
        assert_eq!(trail.history().len(), DEFAULT_TRAIL_CAPACITY);

        let step = trail.tick(&mut rng);
        assert!(step.reset);
        assert_eq!(trail.history(), &[trail.anchor()]);

        // Regrows from the anchor
        let step = trail.tick(&mut rng);
        assert_eq!(step.from, trail.anchor());
        assert_eq!(trail.history().len(), 2);
    }

    #[test]
    fn test_history_never_exceeds_capacity() {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let mut trail = trail();
        for _ in 0..1000 {
            trail.tick(&mut rng);
            assert!(!trail.history().is_empty());
            assert!(trail.history().len() <= trail.capacity());
        }
    }

    #[test]
    fn test_huge_wind_output_still_ticks() {
        let config: TrailConfig = serde_json::from_str(
            r#"{"wind": {"input_min": 0.0, "input_max": 100.0, "output_min": 6.0, "output_max": 3.0e38}}"#,
        )
        .unwrap();
        let projector = Projector::new(ProjectionBounds::LINEAR, Viewport::new(1400.0, 800.0));
        let city = City {
            wind_speed_kmh: 100.0,
            ..berlin()
        };
        let mut trail = TrailState::new(city, &projector, &Palette::reference(), &config, Duration::ZERO);
        assert!((trail.amplitude() - MAX_AMPLITUDE).abs() < f32::EPSILON);

        let mut rng = ChaCha8Rng::seed_from_u64(13);
        for _ in 0..200 {
            let step = trail.tick(&mut rng);
            assert!(step.to.x.is_finite() && step.to.y.is_finite());
        }
    }

    #[test]
    fn test_calm_wind_uses_minimum_amplitude() {
        let projector = Projector::new(ProjectionBounds::LINEAR, Viewport::new(100.0, 100.0));
        let config = TrailConfig {
            wind: WindRemap {
                output_min: 0.0,
                ..WindRemap::default()
            },
            ..TrailConfig::default()
        };
        let city = City {
            wind_speed_kmh: 0.0,
            ..berlin()
        };
        let mut trail = TrailState::new(city, &projector, &Palette::reference(), &config, Duration::ZERO);
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let step = trail.tick(&mut rng);
        assert_eq!(step.from, step.to);
    }

    #[test]
    fn test_age_saturates() {
        let projector = Projector::new(ProjectionBounds::LINEAR, Viewport::new(100.0, 100.0));
        let trail = TrailState::new(
            berlin(),
            &projector,
            &Palette::reference(),
            &TrailConfig::default(),
            Duration::from_secs(5),
        );
        assert_eq!(trail.age(Duration::from_secs(2)), Duration::ZERO);
        assert_eq!(trail.age(Duration::from_secs(8)), Duration::from_secs(3));
    }
}
