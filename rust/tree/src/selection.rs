// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Selection groups: a tree node together with the elements beneath it.

use serde::{Deserialize, Serialize};
use sustainer_model::GroupType;

use crate::keys::NodeKey;
use crate::tree::Tree;

/// A node of a tree plus the flattened leaf payloads of its subtree.
///
/// The `id` matches the node id, so a group can be resolved against the tree
/// it came from (or a rebuilt one with the same ids).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectionGroup<T> {
    pub id: String,
    pub group_type: GroupType,
    pub group_name: String,
    pub elements: Vec<T>,
}

impl<T: Clone> SelectionGroup<T> {
    /// Builds the group for `key`, collecting its elements from the tree.
    pub fn from_node(tree: &Tree<T>, key: NodeKey) -> Option<Self> {
        let node = tree.node(key)?;
        Some(Self {
            id: node.id().to_string(),
            group_type: node.group_type().clone(),
            group_name: node.name().to_string(),
            elements: tree.building_elements(key).into_iter().cloned().collect(),
        })
    }

    /// Builds the group for the node with the given id.
    pub fn from_id(tree: &Tree<T>, id: &str) -> Option<Self> {
        Self::from_node(tree, tree.key_of(id)?)
    }
}
