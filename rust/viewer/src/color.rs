// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Random tag colors, stable per key for the lifetime of the map.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rustc_hash::FxHashMap;
use sustainer_model::{Entity, KnownProperty};

/// Append-only map from a grouping key (material, element name) to a hex
/// color. A key gets a random color the first time it is seen and keeps it
/// until [`ColorMap::reset`].
#[derive(Debug, Clone)]
pub struct ColorMap {
    colors: FxHashMap<String, String>,
    rng: StdRng,
}

impl ColorMap {
    pub fn new() -> Self {
        Self {
            colors: FxHashMap::default(),
            rng: StdRng::from_entropy(),
        }
    }

    /// Map with a reproducible color sequence.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            colors: FxHashMap::default(),
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.colors.get(key).map(String::as_str)
    }

    /// Color of `key`, generating one if the key is new.
    pub fn get_or_insert(&mut self, key: &str) -> &str {
        if !self.colors.contains_key(key) {
            let color = random_hex_color(&mut self.rng);
            self.colors.insert(key.to_string(), color);
        }
        self.colors.get(key).map_or("", String::as_str)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.colors.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    pub fn reset(&mut self) {
        self.colors.clear();
    }

    /// Assigns a color to every material of `elements`. Elements without a
    /// material share the empty key. Unless `use_existing` is set the map is
    /// cleared first.
    pub fn setup_material_colors(&mut self, elements: &[Entity], use_existing: bool) {
        if !use_existing {
            self.reset();
        }
        for element in elements {
            self.get_or_insert(element.known(KnownProperty::Material).unwrap_or(""));
        }
    }
}

impl Default for ColorMap {
    fn default() -> Self {
        Self::new()
    }
}

fn random_hex_color(rng: &mut impl Rng) -> String {
    format!("#{:06x}", rng.gen_range(0..0xFF_FFFFu32))
}
