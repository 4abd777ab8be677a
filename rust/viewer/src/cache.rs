// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Versioned tag storage and rebuild ordering.
//!
//! Tags are expensive to create (each needs a geometry lookup), so they are
//! built once per element set and reused across marker updates. The cache
//! remembers the [`Fingerprint`] of the set it was built from; a different
//! set means the cache is stale and must be rebuilt, never patched.
//!
//! [`RebuildGuard`] hands out a ticket per rebuild. Only the latest ticket
//! may publish its result, so a slow rebuild that finishes after a newer one
//! is dropped instead of bringing old tags back.

use std::hash::{Hash, Hasher};

use nalgebra::Point3;
use rustc_hash::{FxHashMap, FxHasher};
use sustainer_model::{Entity, KnownProperty};

use crate::color::ColorMap;
use crate::tag::Tag;

/// Order-independent hash of a set of elements' global ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Fingerprint(u64);

impl Fingerprint {
    pub fn of(elements: &[Entity]) -> Self {
        let mut ids: Vec<&str> = elements.iter().map(Entity::global_id).collect();
        ids.sort_unstable();
        ids.dedup();

        // FxHasher is enough here, this is not a security boundary
        let mut hasher = FxHasher::default();
        ids.len().hash(&mut hasher);
        for id in ids {
            id.hash(&mut hasher);
        }
        Self(hasher.finish())
    }
}

/// Element tags keyed by global id, tied to the element set they came from.
#[derive(Debug, Default)]
pub struct TagCache {
    fingerprint: Option<Fingerprint>,
    tags: FxHashMap<String, Tag>,
}

impl TagCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fingerprint(&self) -> Option<Fingerprint> {
        self.fingerprint
    }

    /// Whether the cache was built from exactly this element set.
    pub fn is_built_for(&self, fingerprint: Fingerprint) -> bool {
        self.fingerprint == Some(fingerprint)
    }

    /// Drops every tag and creates one per element, colored by material.
    pub fn rebuild<F>(&mut self, elements: &[Entity], colors: &mut ColorMap, mut locate: F)
    where
        F: FnMut(&Entity) -> Option<Point3<f64>>,
    {
        self.tags.clear();
        for element in elements {
            let tag = element_tag(element, colors, &mut locate);
            self.tags.insert(element.global_id().to_string(), tag);
        }
        self.fingerprint = Some(Fingerprint::of(elements));
        tracing::debug!(tags = self.tags.len(), "Rebuilt tag cache");
    }

    pub fn get(&self, global_id: &str) -> Option<&Tag> {
        self.tags.get(global_id)
    }

    /// Tag of `element`, creating and caching it if it is missing.
    pub fn get_or_create<F>(&mut self, element: &Entity, colors: &mut ColorMap, mut locate: F) -> &Tag
    where
        F: FnMut(&Entity) -> Option<Point3<f64>>,
    {
        self.tags
            .entry(element.global_id().to_string())
            .or_insert_with(|| element_tag(element, colors, &mut locate))
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    pub fn clear(&mut self) {
        self.tags.clear();
        self.fingerprint = None;
    }
}

fn element_tag<F>(element: &Entity, colors: &mut ColorMap, locate: &mut F) -> Tag
where
    F: FnMut(&Entity) -> Option<Point3<f64>>,
{
    let material = element.known(KnownProperty::Material).unwrap_or("");
    let color = colors.get_or_insert(material).to_string();
    Tag::for_element(element, locate(element), color)
}

/// Proof that a rebuild was started, see [`RebuildGuard`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RebuildTicket {
    generation: u64,
    fingerprint: Fingerprint,
}

impl RebuildTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn fingerprint(&self) -> Fingerprint {
        self.fingerprint
    }
}

/// Generation counter that lets only the most recent rebuild publish.
#[derive(Debug, Default)]
pub struct RebuildGuard {
    latest: u64,
}

impl RebuildGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a rebuild, superseding every earlier ticket.
    pub fn begin(&mut self, fingerprint: Fingerprint) -> RebuildTicket {
        self.latest += 1;
        RebuildTicket {
            generation: self.latest,
            fingerprint,
        }
    }

    pub fn is_current(&self, ticket: &RebuildTicket) -> bool {
        ticket.generation == self.latest
    }
}
