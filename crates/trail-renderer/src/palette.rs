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

//! Temperature to color mapping.
//!
//! A [`Palette`] is a table of control points. Temperatures between two
//! consecutive points are linearly interpolated per channel; anything the
//! table does not cover maps to the fallback color.

use serde::{Deserialize, Serialize};

/// 8-bit sRGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const WHITE: Self = Self::new(255, 255, 255);
    pub const BLACK: Self = Self::new(0, 0, 0);

    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    #[must_use]
    pub const fn with_alpha(self, a: u8) -> Rgba {
        Rgba {
            r: self.r,
            g: self.g,
            b: self.b,
            a,
        }
    }

    fn lerp(self, other: Self, t: f64) -> Self {
        let channel = |a: u8, b: u8| {
            let v = f64::from(a) + (f64::from(b) - f64::from(a)) * t;
            v.round().clamp(0.0, 255.0) as u8
        };
        Self::new(
            channel(self.r, other.r),
            channel(self.g, other.g),
            channel(self.b, other.b),
        )
    }
}

/// 8-bit sRGB color with straight (unmultiplied) alpha.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

/// A (temperature, color) pair of the palette.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ControlPoint {
    /// Temperature in degrees Celsius
    pub temp_c: f64,
    pub color: Rgb,
}

impl ControlPoint {
    #[must_use]
    pub const fn new(temp_c: f64, color: Rgb) -> Self {
        Self { temp_c, color }
    }
}

/// Piecewise-linear temperature palette.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Palette {
    pub points: Vec<ControlPoint>,
    /// Returned for temperatures outside the table
    #[serde(default = "default_fallback")]
    pub fallback: Rgb,
}

fn default_fallback() -> Rgb {
    Rgb::WHITE
}

impl Palette {
    #[must_use]
    pub fn new(points: Vec<ControlPoint>, fallback: Rgb) -> Self {
        Self { points, fallback }
    }

    /// Reference table from -30 C (dark green) to 50 C (dark purple).
    #[must_use]
    pub fn reference() -> Self {
        Self::new(
            vec![
                ControlPoint::new(-30.0, Rgb::new(0, 100, 0)),
                ControlPoint::new(-20.0, Rgb::new(0, 175, 0)),
                ControlPoint::new(-10.0, Rgb::new(0, 255, 0)),
                ControlPoint::new(0.0, Rgb::new(255, 255, 0)),
                ControlPoint::new(10.0, Rgb::new(255, 165, 0)),
                ControlPoint::new(20.0, Rgb::new(255, 69, 0)),
                ControlPoint::new(30.0, Rgb::new(255, 0, 255)),
                ControlPoint::new(40.0, Rgb::new(128, 0, 128)),
                ControlPoint::new(50.0, Rgb::new(75, 0, 130)),
            ],
            Rgb::WHITE,
        )
    }

    /// Color for a temperature in degrees Celsius.
    ///
    /// Uses the first consecutive pair of control points that brackets the
    /// temperature. Never fails: out of range, NaN and gaps in an unsorted
    /// table all give the fallback color.
    #[must_use]
    pub fn color_for(&self, temp_c: f64) -> Rgb {
        for pair in self.points.windows(2) {
            let (lo, hi) = (pair[0], pair[1]);
            if temp_c >= lo.temp_c && temp_c <= hi.temp_c {
                let span = hi.temp_c - lo.temp_c;
                if span == 0.0 {
                    return lo.color;
                }
                return lo.color.lerp(hi.color, (temp_c - lo.temp_c) / span);
            }
        }
        self.fallback
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::reference()
    }
}
