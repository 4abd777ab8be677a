// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # Sustainer Tree
//!
//! Navigable grouping hierarchies over flat collections of building elements.
//!
//! A [`Tree`] stores its nodes in a slot map and links them by key: children
//! are an ordered key list, the parent is a key, and a string id index gives
//! O(1) lookup. Nothing owns a parent, so the structure is a tree by
//! construction.
//!
//! Trees are built from a chain of grouping properties
//! ([`set_up_tree_from_properties`]), with each level sorted in natural order
//! ([`sort_grouped_elements`]). The [`navigator`] walks a built tree to find
//! the next or previous group, and [`ModelViewManager`] owns the current
//! selection and the per-node visibility derived from it.
//!
//! ```
//! use sustainer_model::{Entity, KnownProperty, PropertyKey};
//! use sustainer_tree::{set_up_tree_from_properties, TreeConfig};
//!
//! let elements = vec![
//!     Entity::builder("a", 1).name("Beam").property("Station", "2").build().unwrap(),
//!     Entity::builder("b", 2).name("Plate").property("Station", "1").build().unwrap(),
//! ];
//! let chain = [PropertyKey::from(KnownProperty::Station)];
//! let tree = set_up_tree_from_properties("stations", &elements, &chain, &TreeConfig::default()).unwrap();
//!
//! let stations: Vec<&str> = tree.root_node().children().iter()
//!     .filter_map(|&k| tree.node(k))
//!     .map(|n| n.name())
//!     .collect();
//! assert_eq!(stations, ["1", "2"]);
//! ```

pub mod builder;
pub mod config;
pub mod error;
pub mod grouping;
pub mod keys;
pub mod navigator;
pub mod selection;
pub mod traversal;
pub mod tree;
pub mod visibility;

pub use builder::set_up_tree_from_properties;
pub use config::TreeConfig;
pub use error::{Error, Result};
pub use grouping::{group_elements_by_property, natural_cmp, sort_grouped_elements, Groupable};
pub use keys::NodeKey;
pub use navigator::{adjacent_group, first_group, Direction, StepPolicy};
pub use selection::SelectionGroup;
pub use tree::{Tree, TreeNode};
pub use visibility::{ModelViewManager, VisibilityUpdate};
