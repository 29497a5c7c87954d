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

use serde::{Deserialize, Serialize};

/// Largest jitter amplitude, in pixels, a remap will ever produce.
pub const MAX_AMPLITUDE: f32 = 1_000.0;

/// Linear remap from wind speed (km/h) to jitter amplitude (pixels).
///
/// Wind outside the input range is clamped to it, so the amplitude always
/// stays between `output_min` and `output_max`. The result is always finite
/// and within `0..=MAX_AMPLITUDE`, whatever the configured outputs are.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WindRemap {
    pub input_min: f64,
    pub input_max: f64,
    pub output_min: f32,
    pub output_max: f32,
}

impl WindRemap {
    /// Jitter amplitude for the given wind speed.
    #[must_use]
    pub fn amplitude(&self, wind_speed_kmh: f64) -> f32 {
        let floor = bounded(self.output_min).unwrap_or(0.0);
        let span = self.input_max - self.input_min;
        if !span.is_finite() || span <= 0.0 || wind_speed_kmh.is_nan() {
            return floor;
        }
        let t = ((wind_speed_kmh - self.input_min) / span).clamp(0.0, 1.0) as f32;
        bounded(self.output_min + (self.output_max - self.output_min) * t).unwrap_or(floor)
    }
}

fn bounded(amplitude: f32) -> Option<f32> {
    amplitude.is_finite().then(|| amplitude.clamp(0.0, MAX_AMPLITUDE))
}

impl Default for WindRemap {
    fn default() -> Self {
        Self {
            input_min: 0.0,
            input_max: 100.0,
            output_min: 6.0,
            output_max: 24.0,
        }
    }
}
