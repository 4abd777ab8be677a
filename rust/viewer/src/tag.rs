// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Floating labels anchored to 3D positions.

use nalgebra::Point3;
use serde::{Deserialize, Serialize};
use sustainer_model::Entity;

/// Icon shown on cluster labels.
pub const CLUSTER_ICON: &str = "material-symbols:tools-power-drill-outline";

/// Identity of a tag.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TagKey {
    /// Tag of one element, keyed by its global id.
    Element(String),
    /// Synthetic tag of the n-th cluster of a merge pass.
    Merge(usize),
}

impl std::fmt::Display for TagKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Element(id) => f.write_str(id),
            Self::Merge(n) => write!(f, "MergeTag-{n}"),
        }
    }
}

/// One floating label.
#[derive(Debug, Clone, PartialEq)]
pub struct Tag {
    pub key: TagKey,
    pub text: String,
    /// `None` when the element has no geometry. Such tags are never placed.
    pub position: Option<Point3<f64>>,
    pub color: String,
    pub ifc_type: String,
    pub icon: Option<String>,
}

impl Tag {
    /// Tag labelled with the element's name.
    pub fn for_element(element: &Entity, position: Option<Point3<f64>>, color: impl Into<String>) -> Self {
        Self {
            key: TagKey::Element(element.global_id().to_string()),
            text: element.name().to_string(),
            position,
            color: color.into(),
            ifc_type: element.ifc_type().to_string(),
            icon: None,
        }
    }

    pub fn is_placeable(&self) -> bool {
        self.position.is_some()
    }

    /// Distance between the two anchors, `None` if either has no position.
    pub fn distance_to(&self, other: &Tag) -> Option<f64> {
        Some((self.position? - other.position?).norm())
    }

    /// Copy of this tag without text, marking the element under a cluster.
    pub fn companion(&self) -> Self {
        Self {
            text: String::new(),
            icon: None,
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn tag(x: f64) -> Tag {
        let bolt = Entity::builder("b", 1).name("Bolt").ifc_type("IFCMECHANICALFASTENER").build().unwrap();
        Tag::for_element(&bolt, Some(Point3::new(x, 0.0, 0.0)), "#ffffff")
    }

    #[test]
    fn element_tag_takes_name_and_type() {
        let t = tag(0.0);
        assert_eq!(t.key.to_string(), "b");
        assert_eq!(t.text, "Bolt");
        assert_eq!(t.ifc_type, "IFCMECHANICALFASTENER");
    }

    #[test]
    fn distance_needs_both_positions() {
        assert_relative_eq!(tag(0.0).distance_to(&tag(3.0)).unwrap(), 3.0);
        let mut unplaced = tag(0.0);
        unplaced.position = None;
        assert!(unplaced.distance_to(&tag(1.0)).is_none());
        assert!(!unplaced.is_placeable());
    }

    #[test]
    fn companion_keeps_key_and_drops_text() {
        let c = tag(1.0).companion();
        assert_eq!(c.key, TagKey::Element("b".into()));
        assert!(c.text.is_empty());
        assert_eq!(TagKey::Merge(3).to_string(), "MergeTag-3");
    }
}
