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

//! Insertion-ordered store of every active trail.

use log::info;
use rand::Rng;

use crate::trail::{TrailState, TrailStep};

/// Index of a trail in the registry. Stable for the whole session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TrailId(usize);

impl TrailId {
    #[must_use]
    pub fn index(self) -> usize {
        self.0
    }
}

/// Owns all trails. Trails are never removed; update and draw order is
/// insertion order.
#[derive(Debug, Default)]
pub struct TrailRegistry {
    trails: Vec<TrailState>,
}

impl TrailRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a trail. Duplicate cities are kept as independent trails.
    pub fn add(&mut self, trail: TrailState) -> TrailId {
        let id = TrailId(self.trails.len());
        info!(
            "Added trail #{} for {} ({:.1}°C, {:.1} km/h)",
            id.0,
            trail.city().name,
            trail.city().temperature_c,
            trail.city().wind_speed_kmh
        );
        self.trails.push(trail);
        id
    }

    #[must_use]
    pub fn get(&self, id: TrailId) -> Option<&TrailState> {
        self.trails.get(id.0)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.trails.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.trails.is_empty()
    }

    /// Trails in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (TrailId, &TrailState)> {
        self.trails.iter().enumerate().map(|(i, t)| (TrailId(i), t))
    }

    /// Visit every trail once, in insertion order, with mutable access.
    pub fn for_each_tick<F>(&mut self, mut f: F)
    where
        F: FnMut(TrailId, &mut TrailState),
    {
        for (i, trail) in self.trails.iter_mut().enumerate() {
            f(TrailId(i), trail);
        }
    }

    /// Advance every trail by one step and collect the steps.
    pub fn tick_all<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Vec<(TrailId, TrailStep)> {
        let mut steps = Vec::with_capacity(self.trails.len());
        self.for_each_tick(|id, trail| steps.push((id, trail.tick(&mut *rng))));
        steps
    }
}
