// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Floating tags over the visible building elements.
//!
//! [`ModelTagger`] decides which elements get a tag, merges dense fastener
//! groups into cluster markers and keeps the scene in sync with that
//! decision. Markers and lines are rebuilt wholesale on every update.
//!
//! A rebuild runs in two steps. [`ModelTagger::prepare`] computes the tags
//! and takes a [`RebuildTicket`]; [`ModelTagger::apply`] publishes them only
//! if no newer rebuild was prepared in between.

use std::cell::Cell;
use std::rc::Rc;

use serde::{Deserialize, Serialize};
use sustainer_model::{Entity, Event, SubscriptionId};
use sustainer_tree::ModelViewManager;

use crate::actions::visible_elements;
use crate::cache::{Fingerprint, RebuildGuard, RebuildTicket, TagCache};
use crate::cluster::{cluster_markers, merge_by_model};
use crate::collaborators::{Hider, LineHandle, LineSegment, MarkerHandle, ModelCache, Viewer};
use crate::color::ColorMap;
use crate::config::TaggerConfig;
use crate::filter::filter_elements;
use crate::tag::Tag;

/// Which elements are tagged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TagVisibilityMode {
    /// Visible elements of the selected group.
    #[default]
    TagSelectionGroup,
    /// Every visible element.
    TagVisible,
}

/// Markers and lines computed by [`ModelTagger::prepare`].
#[derive(Debug, Clone)]
pub struct TagPlan {
    ticket: RebuildTicket,
    pub markers: Vec<Tag>,
    pub lines: Vec<LineSegment>,
}

impl TagPlan {
    pub fn ticket(&self) -> RebuildTicket {
        self.ticket
    }
}

#[derive(Debug, Clone, Copy)]
struct Subscriptions {
    visibility: SubscriptionId,
    elements: SubscriptionId,
}

/// Places tags for building elements and clusters nearby fasteners.
pub struct ModelTagger {
    config: TaggerConfig,
    enabled: bool,
    mode: TagVisibilityMode,
    colors: ColorMap,
    tags: TagCache,
    guard: RebuildGuard,
    markers: Vec<MarkerHandle>,
    lines: Vec<LineHandle>,
    subscriptions: Option<Subscriptions>,
    stale: Rc<Cell<bool>>,

    pub on_tag_added: Event<Tag>,
    pub on_configuration_set: Event<TaggerConfig>,
}

impl ModelTagger {
    pub fn new(config: TaggerConfig) -> Self {
        Self::with_colors(config, ColorMap::new())
    }

    /// Tagger drawing its colors from `colors`.
    pub fn with_colors(config: TaggerConfig, colors: ColorMap) -> Self {
        Self {
            config,
            enabled: false,
            mode: TagVisibilityMode::default(),
            colors,
            tags: TagCache::new(),
            guard: RebuildGuard::new(),
            markers: Vec::new(),
            lines: Vec::new(),
            subscriptions: None,
            stale: Rc::new(Cell::new(false)),
            on_tag_added: Event::new(),
            on_configuration_set: Event::new(),
        }
    }

    pub fn config(&self) -> &TaggerConfig {
        &self.config
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn mode(&self) -> TagVisibilityMode {
        self.mode
    }

    pub fn colors(&self) -> &ColorMap {
        &self.colors
    }

    pub fn tag_cache(&self) -> &TagCache {
        &self.tags
    }

    pub fn marker_count(&self) -> usize {
        self.markers.len()
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Whether a visibility or element change arrived since the last refresh.
    pub fn is_stale(&self) -> bool {
        self.stale.get()
    }

    pub fn set_mode(&mut self, mode: TagVisibilityMode) {
        if self.mode != mode {
            self.mode = mode;
            self.stale.set(true);
        }
    }

    /// Replaces the configuration and announces it. An enabled tagger is
    /// marked stale so the next refresh rebuilds with the new settings.
    pub fn set_configuration(&mut self, config: TaggerConfig) {
        tracing::info!(
            show_fasteners = config.show_fasteners,
            show_installations = config.show_installations,
            merge_fasteners = config.merge_fasteners,
            "Tagger configuration set"
        );
        self.config = config;
        if self.enabled {
            self.stale.set(true);
        }
        self.on_configuration_set.trigger(&self.config);
    }

    /// Starts following `manager`. Visibility and element changes mark the
    /// tagger stale.
    pub fn enable(&mut self, manager: &mut ModelViewManager<Entity>) {
        if self.enabled {
            return;
        }
        let stale = Rc::clone(&self.stale);
        let visibility = manager.on_visibility_updated.subscribe(move |_| stale.set(true));
        let stale = Rc::clone(&self.stale);
        let elements = manager
            .on_building_elements_changed
            .subscribe(move |_| stale.set(true));

        self.subscriptions = Some(Subscriptions { visibility, elements });
        self.enabled = true;
        self.stale.set(true);
        tracing::debug!("Tagger enabled");
    }

    /// Stops following `manager` and removes every marker and line.
    pub fn disable<V: Viewer>(&mut self, manager: &mut ModelViewManager<Entity>, viewer: &mut V) {
        if let Some(subs) = self.subscriptions.take() {
            manager.on_visibility_updated.unsubscribe(subs.visibility);
            manager.on_building_elements_changed.unsubscribe(subs.elements);
        }
        self.clear_scene(viewer);
        self.enabled = false;
        self.stale.set(false);
        tracing::debug!("Tagger disabled");
    }

    /// Assigns material colors and rebuilds the tag of every loaded element.
    pub fn setup<C: ModelCache>(&mut self, cache: &C) {
        let elements = cache.building_elements();
        self.colors.setup_material_colors(elements, true);
        self.tags
            .rebuild(elements, &mut self.colors, |e| cache.element_center(e));
    }

    /// Refreshes only if something changed since the last refresh.
    pub fn refresh_if_stale<C, H, V>(&mut self, manager: &ModelViewManager<Entity>, cache: &C, hider: &H, viewer: &mut V) -> bool
    where
        C: ModelCache,
        H: Hider,
        V: Viewer,
    {
        if !self.stale.get() {
            return false;
        }
        self.refresh(manager, cache, hider, viewer)
    }

    /// Tags the elements selected by the current [`TagVisibilityMode`].
    ///
    /// The tag cache is rebuilt first if the loaded element set changed.
    /// Returns `true` if the scene was updated.
    pub fn refresh<C, H, V>(&mut self, manager: &ModelViewManager<Entity>, cache: &C, hider: &H, viewer: &mut V) -> bool
    where
        C: ModelCache,
        H: Hider,
        V: Viewer,
    {
        if !self.enabled {
            return false;
        }
        self.stale.set(false);

        if !self.tags.is_built_for(Fingerprint::of(cache.building_elements())) {
            self.setup(cache);
        }

        let elements = match self.mode {
            TagVisibilityMode::TagVisible => visible_elements(cache.building_elements(), hider),
            TagVisibilityMode::TagSelectionGroup => match manager.selected_group() {
                Some(group) => visible_elements(&group.elements, hider),
                None => return false,
            },
        };
        self.update_markers(&elements, cache, viewer)
    }

    /// Replaces the scene's markers with tags for `elements`.
    pub fn update_markers<C: ModelCache, V: Viewer>(&mut self, elements: &[Entity], cache: &C, viewer: &mut V) -> bool {
        if !self.enabled {
            return false;
        }
        let plan = self.prepare(elements, cache);
        self.apply(plan, viewer)
    }

    /// Computes markers and lines for `elements` without touching the scene.
    pub fn prepare<C: ModelCache>(&mut self, elements: &[Entity], cache: &C) -> TagPlan {
        let ticket = self.guard.begin(Fingerprint::of(elements));
        let merge = self.config.merge_fasteners;
        let filtered = filter_elements(elements, &self.config);

        let mut markers: Vec<Tag> = Vec::new();
        for element in filtered.filtered {
            if merge && element.ifc_type() == self.config.mergeable_type {
                continue;
            }
            let tag = self
                .tags
                .get_or_create(element, &mut self.colors, |e| cache.element_center(e));
            markers.push(tag.clone());
        }

        let mut lines = Vec::new();
        if merge {
            for element in elements.iter().filter(|e| e.ifc_type() == self.config.mergeable_type) {
                self.tags
                    .get_or_create(element, &mut self.colors, |e| cache.element_center(e));
            }
            let groups = merge_by_model(elements, &self.tags, &self.config, &mut self.colors);
            let clustered = cluster_markers(&groups, self.config.cluster_label_offset);
            markers.extend(clustered.markers);
            lines = clustered.lines;
        }

        tracing::debug!(
            generation = ticket.generation(),
            elements = elements.len(),
            filtered_out = filtered.filtered_out.len(),
            markers = markers.len(),
            lines = lines.len(),
            "Prepared tags"
        );
        TagPlan { ticket, markers, lines }
    }

    /// Puts a prepared plan into the scene.
    ///
    /// Returns `false` and leaves the scene alone if a newer plan was
    /// prepared since, or the tagger is disabled.
    pub fn apply<V: Viewer>(&mut self, plan: TagPlan, viewer: &mut V) -> bool {
        if !self.guard.is_current(&plan.ticket) {
            tracing::debug!(generation = plan.ticket.generation(), "Dropping superseded tag rebuild");
            return false;
        }
        if !self.enabled {
            return false;
        }

        self.clear_scene(viewer);
        for tag in plan.markers.iter().filter(|t| t.is_placeable()) {
            self.markers.push(viewer.add_marker(tag));
            self.on_tag_added.trigger(tag);
        }
        for line in &plan.lines {
            self.lines.push(viewer.add_line(line));
        }
        true
    }

    fn clear_scene<V: Viewer>(&mut self, viewer: &mut V) {
        for marker in self.markers.drain(..) {
            viewer.remove_marker(marker);
        }
        for line in self.lines.drain(..) {
            viewer.remove_line(line);
        }
    }
}

impl std::fmt::Debug for ModelTagger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelTagger")
            .field("enabled", &self.enabled)
            .field("mode", &self.mode)
            .field("config", &self.config)
            .field("markers", &self.markers.len())
            .field("lines", &self.lines.len())
            .finish_non_exhaustive()
    }
}
