// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! In-memory collaborators for integration tests.

#![allow(dead_code)]

use nalgebra::Point3;
use rustc_hash::{FxHashMap, FxHashSet};
use sustainer_model::{Entity, ModelId};
use sustainer_viewer::{
    Error, FragmentIdMap, Highlighter, Hider, LineHandle, LineSegment, MarkerHandle, ModelCache, Result, Sphere, Tag,
    Viewer,
};

pub fn element(id: &str, express_id: u32, name: &str, ifc_type: &str, model: &str) -> Entity {
    Entity::builder(id, express_id)
        .name(name)
        .ifc_type(ifc_type)
        .model(model)
        .fragment(format!("{model}-frag"))
        .property("Station", "1")
        .build()
        .unwrap()
}

pub fn bolt(id: &str, express_id: u32) -> Entity {
    element(id, express_id, "Bolt", "IFCMECHANICALFASTENER", "m1")
}

#[derive(Debug, Default)]
pub struct FakeCache {
    pub elements: Vec<Entity>,
    pub centers: FxHashMap<String, Point3<f64>>,
    pub unloaded: FxHashSet<ModelId>,
}

impl FakeCache {
    pub fn new(elements: Vec<Entity>) -> Self {
        Self {
            elements,
            ..Self::default()
        }
    }

    pub fn at(mut self, global_id: &str, x: f64, y: f64, z: f64) -> Self {
        self.centers.insert(global_id.to_string(), Point3::new(x, y, z));
        self
    }
}

impl ModelCache for FakeCache {
    fn building_elements(&self) -> &[Entity] {
        &self.elements
    }

    fn elements_by_express_id(&self, model: &ModelId, express_ids: &[u32]) -> Vec<Entity> {
        self.elements
            .iter()
            .filter(|e| e.model_id() == model && express_ids.contains(&e.express_id()))
            .cloned()
            .collect()
    }

    fn fragment_map(&self, model: &ModelId, express_ids: &[u32]) -> Option<FragmentIdMap> {
        if self.unloaded.contains(model) {
            return None;
        }
        let mut map = FragmentIdMap::default();
        for e in self.elements_by_express_id(model, express_ids) {
            map.entry(e.fragment_id().to_string()).or_default().insert(e.express_id());
        }
        Some(map)
    }

    fn elements_by_fragment_map(&self, map: &FragmentIdMap) -> Vec<Entity> {
        self.elements
            .iter()
            .filter(|e| map.get(e.fragment_id()).is_some_and(|ids| ids.contains(&e.express_id())))
            .cloned()
            .collect()
    }

    fn element_center(&self, element: &Entity) -> Option<Point3<f64>> {
        self.centers.get(element.global_id()).copied()
    }
}

#[derive(Debug)]
pub struct FakeViewer {
    pub sphere: Sphere,
    pub fits: Vec<(Sphere, bool)>,
    pub fail_camera: bool,
    pub markers: FxHashMap<u64, Tag>,
    pub lines: FxHashMap<u64, LineSegment>,
    pub removed_lines: usize,
    next: u64,
}

impl Default for FakeViewer {
    fn default() -> Self {
        Self {
            sphere: Sphere::new(Point3::new(1.0, 2.0, 3.0), 10.0),
            fits: Vec::new(),
            fail_camera: false,
            markers: FxHashMap::default(),
            lines: FxHashMap::default(),
            removed_lines: 0,
            next: 0,
        }
    }
}

impl FakeViewer {
    pub fn with_sphere(sphere: Sphere) -> Self {
        Self {
            sphere,
            ..Self::default()
        }
    }

    pub fn failing() -> Self {
        Self {
            fail_camera: true,
            ..Self::default()
        }
    }

    pub fn marker_texts(&self) -> Vec<String> {
        let mut texts: Vec<String> = self.markers.values().map(|t| t.text.clone()).collect();
        texts.sort();
        texts
    }
}

impl Viewer for FakeViewer {
    fn bounding_sphere(&self, _maps: &[FragmentIdMap]) -> Sphere {
        self.sphere
    }

    async fn fit_to_sphere(&mut self, sphere: Sphere, animate: bool) -> Result<()> {
        if self.fail_camera {
            return Err(Error::Collaborator("camera busy".into()));
        }
        self.fits.push((sphere, animate));
        Ok(())
    }

    fn add_marker(&mut self, tag: &Tag) -> MarkerHandle {
        self.next += 1;
        self.markers.insert(self.next, tag.clone());
        MarkerHandle(self.next)
    }

    fn remove_marker(&mut self, handle: MarkerHandle) {
        self.markers.remove(&handle.0);
    }

    fn add_line(&mut self, line: &LineSegment) -> LineHandle {
        self.next += 1;
        self.lines.insert(self.next, line.clone());
        LineHandle(self.next)
    }

    fn remove_line(&mut self, handle: LineHandle) {
        if self.lines.remove(&handle.0).is_some() {
            self.removed_lines += 1;
        }
    }
}

/// Highlighter that records its calls and keeps the highlighted fragments
/// per channel. `clear = true` drops the channel's earlier highlights.
#[derive(Debug, Default)]
pub struct FakeHighlighter {
    pub calls: Vec<String>,
    pub highlighted: FxHashMap<String, FxHashSet<String>>,
}

impl FakeHighlighter {
    pub fn fragments(&self, channel: &str) -> Vec<String> {
        let mut fragments: Vec<String> = self.highlighted.get(channel).into_iter().flatten().cloned().collect();
        fragments.sort();
        fragments
    }
}

impl Highlighter for FakeHighlighter {
    async fn clear(&mut self, channel: &str) -> Result<()> {
        self.calls.push(format!("clear:{channel}"));
        self.highlighted.remove(channel);
        Ok(())
    }

    async fn highlight_by_id(&mut self, channel: &str, map: &FragmentIdMap, clear: bool, _zoom: bool) -> Result<()> {
        let mut fragments: Vec<&String> = map.keys().collect();
        fragments.sort();
        self.calls.push(format!("highlight:{channel}:{fragments:?}:{clear}"));
        let entry = self.highlighted.entry(channel.to_string()).or_default();
        if clear {
            entry.clear();
        }
        entry.extend(map.keys().cloned());
        Ok(())
    }
}

/// Hider over a fixed element list. Elements are addressed by fragment id
/// and express id, like the real toolkit.
#[derive(Debug, Default)]
pub struct FakeHider {
    pub elements: Vec<(String, ModelId, u32)>,
    pub hidden: FxHashSet<(ModelId, u32)>,
    pub set_calls: usize,
}

impl FakeHider {
    pub fn new(elements: &[Entity]) -> Self {
        Self {
            elements: elements
                .iter()
                .map(|e| (e.fragment_id().to_string(), e.model_id().clone(), e.express_id()))
                .collect(),
            ..Self::default()
        }
    }

    pub fn hide(&mut self, element: &Entity) {
        self.hidden.insert((element.model_id().clone(), element.express_id()));
    }

    pub fn is_hidden_element(&self, element: &Entity) -> bool {
        self.hidden.contains(&(element.model_id().clone(), element.express_id()))
    }

    fn in_map(map: &FragmentIdMap, fragment: &str, express_id: u32) -> bool {
        map.get(fragment).is_some_and(|ids| ids.contains(&express_id))
    }
}

impl Hider for FakeHider {
    fn isolate(&mut self, map: &FragmentIdMap) {
        self.hidden = self
            .elements
            .iter()
            .filter(|(fragment, _, id)| !Self::in_map(map, fragment, *id))
            .map(|(_, model, id)| (model.clone(), *id))
            .collect();
    }

    fn set(&mut self, visible: bool, map: &FragmentIdMap) {
        self.set_calls += 1;
        for (fragment, model, id) in &self.elements {
            if Self::in_map(map, fragment, *id) {
                if visible {
                    self.hidden.remove(&(model.clone(), *id));
                } else {
                    self.hidden.insert((model.clone(), *id));
                }
            }
        }
    }

    fn is_hidden(&self, model: &ModelId, express_id: u32) -> bool {
        self.hidden.contains(&(model.clone(), express_id))
    }
}
