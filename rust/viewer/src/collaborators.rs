// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Interfaces to the rendering toolkit.
//!
//! The viewer never touches geometry itself. Element lookup, camera moves,
//! highlighting and hiding go through these traits so the toolkit can be
//! swapped (or faked in tests).

use nalgebra::Point3;
use rustc_hash::{FxHashMap, FxHashSet};
use sustainer_model::{Entity, ModelId};

use crate::error::Result;
use crate::tag::Tag;

/// Fragment id to the express ids drawn by that fragment.
pub type FragmentIdMap = FxHashMap<String, FxHashSet<u32>>;

/// Bounding sphere used for camera fitting.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sphere {
    pub center: Point3<f64>,
    pub radius: f64,
}

impl Sphere {
    pub fn new(center: Point3<f64>, radius: f64) -> Self {
        Self { center, radius }
    }

    /// A sphere is usable for fitting when it is finite and not empty.
    pub fn is_bounded(&self) -> bool {
        self.radius.is_finite() && self.radius != 0.0 && self.center.iter().all(|c| c.is_finite())
    }
}

/// A straight line drawn in the scene.
#[derive(Debug, Clone, PartialEq)]
pub struct LineSegment {
    pub start: Point3<f64>,
    pub end: Point3<f64>,
    /// Hex color, e.g. `#ff8800`.
    pub color: String,
}

/// Handle of a marker placed in the scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MarkerHandle(pub u64);

/// Handle of a line added to the scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LineHandle(pub u64);

/// Loaded models and the elements they contain.
pub trait ModelCache {
    /// Every building element of every loaded model.
    fn building_elements(&self) -> &[Entity];

    /// Elements of `model` with the given express ids.
    fn elements_by_express_id(&self, model: &ModelId, express_ids: &[u32]) -> Vec<Entity>;

    /// Fragments drawing the given elements, `None` if the model is not loaded.
    fn fragment_map(&self, model: &ModelId, express_ids: &[u32]) -> Option<FragmentIdMap>;

    /// Elements drawn by the fragments in `map`.
    fn elements_by_fragment_map(&self, map: &FragmentIdMap) -> Vec<Entity>;

    /// Center of the element's geometry, `None` if it has none.
    fn element_center(&self, element: &Entity) -> Option<Point3<f64>>;
}

/// Scene and camera of the 3D view.
#[allow(async_fn_in_trait)]
pub trait Viewer {
    /// Bounding sphere around the meshes of the given fragments.
    fn bounding_sphere(&self, maps: &[FragmentIdMap]) -> Sphere;

    /// Moves the camera so that `sphere` fills the view.
    async fn fit_to_sphere(&mut self, sphere: Sphere, animate: bool) -> Result<()>;

    fn add_marker(&mut self, tag: &Tag) -> MarkerHandle;

    fn remove_marker(&mut self, handle: MarkerHandle);

    fn add_line(&mut self, line: &LineSegment) -> LineHandle;

    /// Removes the line and releases its geometry.
    fn remove_line(&mut self, handle: LineHandle);
}

/// Highlight channels ("select", "hover", ...).
#[allow(async_fn_in_trait)]
pub trait Highlighter {
    async fn clear(&mut self, channel: &str) -> Result<()>;

    async fn highlight_by_id(&mut self, channel: &str, map: &FragmentIdMap, clear: bool, zoom: bool) -> Result<()>;
}

/// Per-element visibility of the scene.
pub trait Hider {
    /// Shows only the given fragments' elements.
    fn isolate(&mut self, map: &FragmentIdMap);

    fn set(&mut self, visible: bool, map: &FragmentIdMap);

    fn is_hidden(&self, model: &ModelId, express_id: u32) -> bool;
}
