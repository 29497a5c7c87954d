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

//! Layer compositing.
//!
//! Each tick the compositor advances the registry and rebuilds its layers:
//!
//! - **Base layer**: trail segments. Under [`PersistencePolicy::ClearEachFrame`]
//!   it is rebuilt from the current histories; under
//!   [`PersistencePolicy::Accumulate`] the new segments are appended to a
//!   retained ink buffer.
//! - **Markers**: a filled circle on the anchor of every trail younger than
//!   the highlight duration.
//! - **Labels**: name, temperature and wind below each anchor, only while the
//!   label layer is toggled on.
//!
//! Markers and labels are rebuilt from scratch every tick, so nothing stale
//! survives a toggle or an expired highlight.

mod surface;

pub use surface::{DrawCommand, RecordingSurface, Surface, TextAlign};

use std::collections::VecDeque;
use std::time::Duration;

use log::debug;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::palette::Rgb;
use crate::registry::{TrailId, TrailRegistry};
use crate::trail::TrailStep;

/// What happens to drawn trail segments between frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PersistencePolicy {
    /// Redraw each trail's current history every frame.
    #[default]
    ClearEachFrame,
    /// Keep every drawn segment as ink; only the logical history resets.
    Accumulate,
}

/// Styling and behaviour of the composed frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompositorConfig {
    #[serde(default)]
    pub persistence: PersistencePolicy,

    /// Trail stroke width in pixels
    #[serde(default = "default_stroke_width")]
    pub stroke_width: f32,

    /// Trail stroke alpha (0-255)
    #[serde(default = "default_stroke_alpha")]
    pub stroke_alpha: u8,

    /// How long a new city shows its marker, in milliseconds of animation time
    #[serde(default = "default_highlight_ms")]
    pub highlight_ms: u64,

    #[serde(default = "default_marker_radius")]
    pub marker_radius: f32,

    /// Label font size in points
    #[serde(default = "default_label_size")]
    pub label_size: f32,

    /// Distance from the anchor down to the first label line
    #[serde(default = "default_label_offset")]
    pub label_offset: f32,

    #[serde(default = "default_label_line_height")]
    pub label_line_height: f32,

    #[serde(default = "default_label_color")]
    pub label_color: Rgb,

    /// Maximum retained ink segments under `Accumulate`; oldest dropped first
    #[serde(default = "default_ink_limit")]
    pub ink_limit: usize,
}

fn default_stroke_width() -> f32 {
    4.0
}

fn default_stroke_alpha() -> u8 {
    50
}

fn default_highlight_ms() -> u64 {
    10_000
}

fn default_marker_radius() -> f32 {
    6.0
}

fn default_label_size() -> f32 {
    12.0
}

fn default_label_offset() -> f32 {
    12.0
}

fn default_label_line_height() -> f32 {
    14.0
}

fn default_label_color() -> Rgb {
    Rgb::BLACK
}

fn default_ink_limit() -> usize {
    50_000
}

impl Default for CompositorConfig {
    fn default() -> Self {
        Self {
            persistence: PersistencePolicy::default(),
            stroke_width: default_stroke_width(),
            stroke_alpha: default_stroke_alpha(),
            highlight_ms: default_highlight_ms(),
            marker_radius: default_marker_radius(),
            label_size: default_label_size(),
            label_offset: default_label_offset(),
            label_line_height: default_label_line_height(),
            label_color: default_label_color(),
            ink_limit: default_ink_limit(),
        }
    }
}

impl CompositorConfig {
    #[must_use]
    pub fn highlight(&self) -> Duration {
        Duration::from_millis(self.highlight_ms)
    }
}

/// Builds and renders the layered frame.
#[derive(Debug)]
pub struct Compositor {
    config: CompositorConfig,
    labels_visible: bool,
    base: VecDeque<DrawCommand>,
    markers: Vec<DrawCommand>,
    labels: Vec<DrawCommand>,
}

impl Compositor {
    #[must_use]
    pub fn new(config: CompositorConfig) -> Self {
        Self {
            config,
            labels_visible: false,
            base: VecDeque::new(),
            markers: Vec::new(),
            labels: Vec::new(),
        }
    }

    #[must_use]
    pub fn config(&self) -> &CompositorConfig {
        &self.config
    }

    #[must_use]
    pub fn labels_visible(&self) -> bool {
        self.labels_visible
    }

    pub fn set_labels_visible(&mut self, visible: bool) {
        self.labels_visible = visible;
    }

    /// Flip label visibility and return the new state.
    pub fn toggle_labels(&mut self) -> bool {
        self.labels_visible = !self.labels_visible;
        debug!("Label layer {}", if self.labels_visible { "shown" } else { "hidden" });
        self.labels_visible
    }

    /// Switch persistence policy. Retained ink is dropped.
    pub fn set_persistence(&mut self, policy: PersistencePolicy) {
        if self.config.persistence != policy {
            self.config.persistence = policy;
            self.base.clear();
        }
    }

    /// Advance every trail one step and rebuild the layers.
    ///
    /// `now` is the animation clock, compared against each trail's creation
    /// time for the marker highlight.
    pub fn tick<R: Rng + ?Sized>(&mut self, registry: &mut TrailRegistry, now: Duration, rng: &mut R) {
        let steps = registry.tick_all(rng);

        match self.config.persistence {
            PersistencePolicy::ClearEachFrame => self.rebuild_base(registry, &steps),
            PersistencePolicy::Accumulate => self.append_ink(&steps),
        }

        self.rebuild_markers(registry, now);
        self.labels.clear();
        if self.labels_visible {
            self.rebuild_labels(registry);
        }
    }

    /// Draw the composed frame: base layer, then markers, then labels.
    pub fn render<S: Surface + ?Sized>(&self, surface: &mut S) {
        surface.clear();
        for command in self.base.iter().chain(&self.markers).chain(&self.labels) {
            command.draw(surface);
        }
    }

    pub fn base_layer(&self) -> impl Iterator<Item = &DrawCommand> {
        self.base.iter()
    }

    #[must_use]
    pub fn markers(&self) -> &[DrawCommand] {
        &self.markers
    }

    #[must_use]
    pub fn labels(&self) -> &[DrawCommand] {
        &self.labels
    }

    fn segment(&self, step: &TrailStep) -> DrawCommand {
        DrawCommand::Line {
            from: step.from,
            to: step.to,
            color: step.color.with_alpha(self.config.stroke_alpha),
            width: self.config.stroke_width,
        }
    }

    fn rebuild_base(&mut self, registry: &TrailRegistry, steps: &[(TrailId, TrailStep)]) {
        self.base.clear();
        for ((_, trail), (_, step)) in registry.iter().zip(steps) {
            let color = trail.color().with_alpha(self.config.stroke_alpha);
            for pair in trail.history().windows(2) {
                self.base.push_back(DrawCommand::Line {
                    from: pair[0],
                    to: pair[1],
                    color,
                    width: self.config.stroke_width,
                });
            }
            // The step that triggered a reset is no longer in the history
            if step.reset {
                let segment = self.segment(step);
                self.base.push_back(segment);
            }
        }
    }

    fn append_ink(&mut self, steps: &[(TrailId, TrailStep)]) {
        for (_, step) in steps {
            let segment = self.segment(step);
            self.base.push_back(segment);
        }
        let excess = self.base.len().saturating_sub(self.config.ink_limit);
        if excess > 0 {
            self.base.drain(..excess);
        }
    }

    fn rebuild_markers(&mut self, registry: &TrailRegistry, now: Duration) {
        self.markers.clear();
        let highlight = self.config.highlight();
        for (_, trail) in registry.iter() {
            if trail.age(now) < highlight {
                self.markers.push(DrawCommand::Circle {
                    center: trail.anchor(),
                    radius: self.config.marker_radius,
                    color: trail.color().with_alpha(255),
                });
            }
        }
    }

    fn rebuild_labels(&mut self, registry: &TrailRegistry) {
        let color = self.config.label_color.with_alpha(255);
        for (_, trail) in registry.iter() {
            let city = trail.city();
            let lines = [
                city.name.to_string(),
                format!("{:.1}°C", city.temperature_c),
                format!("{:.1} km/h", city.wind_speed_kmh),
            ];
            let mut y = self.config.label_offset;
            for text in lines {
                self.labels.push(DrawCommand::Text {
                    anchor: trail.anchor().offset(0.0, y),
                    text,
                    size: self.config.label_size,
                    color,
                    align: TextAlign::Center,
                });
                y += self.config.label_line_height;
            }
        }
    }
}

impl Default for Compositor {
    fn default() -> Self {
        Self::new(CompositorConfig::default())
    }
}
