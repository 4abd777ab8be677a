// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Camera, selection and visibility actions on sets of elements.
//!
//! Elements can come from several models at once. Each action groups them by
//! model first, because fragment lookups are per model.

use sustainer_model::{group_by_model, Entity};

use crate::collaborators::{FragmentIdMap, Highlighter, Hider, ModelCache, Viewer};
use crate::error::{Error, Result};

/// Highlight channel used for the selection.
pub const SELECT_CHANNEL: &str = "select";

/// Fragment maps of `elements`, one per loaded model.
pub fn fragment_maps<C: ModelCache>(elements: &[Entity], cache: &C) -> Vec<FragmentIdMap> {
    group_by_model(elements)
        .into_iter()
        .filter_map(|(model, group)| {
            let ids: Vec<u32> = group.iter().map(Entity::express_id).collect();
            let map = cache.fragment_map(&model, &ids);
            if map.is_none() {
                tracing::debug!(model = %model, "Model not loaded, skipping");
            }
            map
        })
        .collect()
}

/// Fits the camera around `elements`.
///
/// The bounding sphere radius is scaled by `buffer`. An empty element list
/// does nothing; an empty or unbounded sphere is an error.
pub async fn zoom_to_elements<C, V>(elements: &[Entity], cache: &C, viewer: &mut V, animate: bool, buffer: f64) -> Result<()>
where
    C: ModelCache,
    V: Viewer,
{
    if elements.is_empty() {
        return Ok(());
    }
    let maps = fragment_maps(elements, cache);
    let mut sphere = viewer.bounding_sphere(&maps);
    if !sphere.is_bounded() {
        tracing::debug!(radius = sphere.radius, elements = elements.len(), "Cannot zoom, bounding sphere is invalid");
        return Err(Error::InvalidBoundingSphere { radius: sphere.radius });
    }
    sphere.radius *= buffer;
    viewer.fit_to_sphere(sphere, animate).await
}

/// Highlights `elements` on the selection channel, showing them if hidden.
pub async fn select<C, L, H>(elements: &[Entity], cache: &C, highlighter: &mut L, hider: &mut H, clear_previous: bool) -> Result<()>
where
    C: ModelCache,
    L: Highlighter,
    H: Hider,
{
    if elements.is_empty() {
        return Ok(());
    }
    if clear_previous {
        highlighter.clear(SELECT_CHANNEL).await?;
    }
    // The channel is cleared once above; clearing per model would drop the
    // highlights of the models before it.
    for map in fragment_maps(elements, cache) {
        highlighter
            .highlight_by_id(SELECT_CHANNEL, &map, false, false)
            .await?;
        hider.set(true, &map);
    }
    Ok(())
}

/// Hides everything except `elements` and returns the elements left visible.
pub fn isolate<C, H>(elements: &[Entity], cache: &C, hider: &mut H) -> Vec<Entity>
where
    C: ModelCache,
    H: Hider,
{
    if elements.is_empty() {
        return Vec::new();
    }
    // Fragment ids are unique across models, so one isolate call covers all.
    let mut combined = FragmentIdMap::default();
    for map in fragment_maps(elements, cache) {
        for (fragment, ids) in map {
            combined.entry(fragment).or_default().extend(ids);
        }
    }
    hider.isolate(&combined);
    cache.elements_by_fragment_map(&combined)
}

/// Shows or hides `elements` without touching selection state. Only elements
/// whose state differs are toggled. Returns how many were toggled.
pub fn set_visibility<C, H>(elements: &[Entity], cache: &C, hider: &mut H, visible: bool) -> usize
where
    C: ModelCache,
    H: Hider,
{
    let to_toggle: Vec<Entity> = elements
        .iter()
        .filter(|e| hider.is_hidden(e.model_id(), e.express_id()) == visible)
        .cloned()
        .collect();

    for map in fragment_maps(&to_toggle, cache) {
        hider.set(visible, &map);
    }
    tracing::debug!(visible, toggled = to_toggle.len(), "Set element visibility");
    to_toggle.len()
}

/// Elements of `elements` that are not hidden.
pub fn visible_elements<H: Hider>(elements: &[Entity], hider: &H) -> Vec<Entity> {
    elements
        .iter()
        .filter(|e| !hider.is_hidden(e.model_id(), e.express_id()))
        .cloned()
        .collect()
}
