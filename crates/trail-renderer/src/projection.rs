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

//! Linear equirectangular projection from geographic to screen coordinates.

use serde::{Deserialize, Serialize};

/// Latitude limit used by Web Mercator tile maps.
pub const MERCATOR_MAX_LATITUDE: f64 = 85.051_128_78;

/// A point in viewport pixels, origin at the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScreenPoint {
    pub x: f32,
    pub y: f32,
}

impl ScreenPoint {
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Point shifted by the given offset.
    #[must_use]
    pub fn offset(self, dx: f32, dy: f32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }
}

/// Size of the drawable area in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    #[must_use]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Whether a point lies inside the viewport, edges included.
    #[must_use]
    pub fn contains(&self, point: ScreenPoint) -> bool {
        (0.0..=self.width).contains(&point.x) && (0.0..=self.height).contains(&point.y)
    }
}

/// Geographic extent mapped onto the full viewport.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProjectionBounds {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}

impl ProjectionBounds {
    /// Whole globe, +-90 latitude.
    pub const LINEAR: Self = Self {
        min_lat: -90.0,
        max_lat: 90.0,
        min_lon: -180.0,
        max_lon: 180.0,
    };

    /// Latitude clamped to the Web Mercator limit.
    pub const MERCATOR_CLAMPED: Self = Self {
        min_lat: -MERCATOR_MAX_LATITUDE,
        max_lat: MERCATOR_MAX_LATITUDE,
        min_lon: -180.0,
        max_lon: 180.0,
    };
}

impl Default for ProjectionBounds {
    fn default() -> Self {
        Self::LINEAR
    }
}

/// Maps latitude/longitude onto a viewport.
///
/// Longitude maps linearly onto x, latitude linearly onto y with north at the
/// top. Coordinates outside the bounds land outside the viewport; callers
/// validate ranges upstream.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projector {
    bounds: ProjectionBounds,
    viewport: Viewport,
}

impl Projector {
    #[must_use]
    pub fn new(bounds: ProjectionBounds, viewport: Viewport) -> Self {
        Self { bounds, viewport }
    }

    #[must_use]
    pub fn bounds(&self) -> ProjectionBounds {
        self.bounds
    }

    #[must_use]
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Replace the viewport size. Already projected anchors are unaffected.
    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    /// Project a latitude/longitude pair (degrees) to screen pixels.
    #[must_use]
    pub fn project(&self, lat: f64, lon: f64) -> ScreenPoint {
        let b = &self.bounds;
        let x = (lon - b.min_lon) / (b.max_lon - b.min_lon) * f64::from(self.viewport.width);
        let y = (1.0 - (lat - b.min_lat) / (b.max_lat - b.min_lat))
            * f64::from(self.viewport.height);
        ScreenPoint::new(x as f32, y as f32)
    }
}
