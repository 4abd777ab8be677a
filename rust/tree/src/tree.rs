// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Arena-based storage for grouping trees.
//!
//! The [`Tree`] owns every node in a slot map. Parents are referenced by key
//! and children are an ordered key list, so child order is exactly the order
//! in which [`Tree::add_node`] was called. A string id index sits alongside
//! the arena for O(1) lookup by node id.

use rustc_hash::FxHashMap;
use slotmap::SlotMap;
use sustainer_model::GroupType;

use crate::error::{Error, Result};
use crate::keys::NodeKey;

/// A node in a grouping tree.
///
/// Only leaf nodes carry a payload; every other node is a pure grouping node.
#[derive(Debug, Clone)]
pub struct TreeNode<T> {
    pub(crate) id: String,
    pub(crate) name: String,
    pub(crate) group_type: GroupType,
    pub(crate) data: Option<T>,
    pub(crate) parent: Option<NodeKey>,
    pub(crate) children: Vec<NodeKey>,
}

impl<T> TreeNode<T> {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn group_type(&self) -> &GroupType {
        &self.group_type
    }

    /// The payload of a leaf node.
    pub fn data(&self) -> Option<&T> {
        self.data.as_ref()
    }

    pub fn parent(&self) -> Option<NodeKey> {
        self.parent
    }

    /// Child keys in creation order.
    pub fn children(&self) -> &[NodeKey] {
        &self.children
    }

    pub fn is_leaf(&self) -> bool {
        self.data.is_some()
    }

    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }
}

/// A grouping tree with a single `Project` root.
///
/// # Example
///
/// ```
/// use sustainer_model::GroupType;
/// use sustainer_tree::Tree;
///
/// let mut tree: Tree<u32> = Tree::new("model");
/// tree.add_node("model", "s1", "Station 1", GroupType::Station, None).unwrap();
/// tree.add_node("s1", "s1_0", "Beam", GroupType::BuildingElement, Some(7)).unwrap();
///
/// assert_eq!(tree.node_count(), 3);
/// assert!(tree.get_node("s1_0").unwrap().is_leaf());
/// ```
#[derive(Debug, Clone)]
pub struct Tree<T> {
    id: String,
    pub(crate) nodes: SlotMap<NodeKey, TreeNode<T>>,
    index: FxHashMap<String, NodeKey>,
    root: NodeKey,
}

impl<T> Tree<T> {
    /// Creates a tree holding only its root. The root's id is the tree id.
    pub fn new(id: impl Into<String>) -> Self {
        let id = id.into();
        let mut nodes = SlotMap::with_key();
        let root = nodes.insert(TreeNode {
            id: id.clone(),
            name: "Project".to_string(),
            group_type: GroupType::Project,
            data: None,
            parent: None,
            children: Vec::new(),
        });
        let mut index = FxHashMap::default();
        index.insert(id.clone(), root);

        Self {
            id,
            nodes,
            index,
            root,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn root(&self) -> NodeKey {
        self.root
    }

    pub fn root_node(&self) -> &TreeNode<T> {
        &self.nodes[self.root]
    }

    /// Adds a node under `parent_id`. Passing a payload makes it a leaf.
    ///
    /// Fails without touching the tree if the parent is missing or the id is
    /// already taken.
    pub fn add_node(
        &mut self,
        parent_id: &str,
        id: impl Into<String>,
        name: impl Into<String>,
        group_type: GroupType,
        data: Option<T>,
    ) -> Result<NodeKey> {
        let id = id.into();
        let Some(&parent) = self.index.get(parent_id) else {
            tracing::warn!(parent_id, node_id = %id, "Parent node not found, node not added");
            return Err(Error::ParentNotFound(parent_id.to_string()));
        };
        if self.index.contains_key(&id) {
            tracing::warn!(node_id = %id, "Node already exists, node not added");
            return Err(Error::DuplicateNode(id));
        }

        let key = self.nodes.insert(TreeNode {
            id: id.clone(),
            name: name.into(),
            group_type,
            data,
            parent: Some(parent),
            children: Vec::new(),
        });
        self.nodes[parent].children.push(key);
        self.index.insert(id, key);
        Ok(key)
    }

    /// Looks up a node by id.
    pub fn get_node(&self, id: &str) -> Option<&TreeNode<T>> {
        self.index.get(id).and_then(|&k| self.nodes.get(k))
    }

    /// Returns the key of the node with the given id.
    pub fn key_of(&self, id: &str) -> Option<NodeKey> {
        self.index.get(id).copied()
    }

    pub fn node(&self, key: NodeKey) -> Option<&TreeNode<T>> {
        self.nodes.get(key)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Number of nodes including the root.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_tree_has_project_root() {
        let tree: Tree<()> = Tree::new("t1");
        let root = tree.root_node();
        assert_eq!(root.id(), "t1");
        assert_eq!(root.group_type(), &GroupType::Project);
        assert!(root.parent().is_none());
        assert!(!root.is_leaf());
        assert_eq!(tree.node_count(), 1);
    }

    #[test]
    fn add_node_links_parent_and_child() {
        let mut tree: Tree<u8> = Tree::new("t");
        let s = tree
            .add_node("t", "s1", "1", GroupType::Station, None)
            .unwrap();
        let leaf = tree
            .add_node("s1", "s1_0", "Beam", GroupType::BuildingElement, Some(3))
            .unwrap();

        assert_eq!(tree.node(leaf).unwrap().parent(), Some(s));
        assert_eq!(tree.node(s).unwrap().children(), &[leaf]);
        assert_eq!(tree.get_node("s1_0").unwrap().data(), Some(&3));
    }

    #[test]
    fn children_keep_insertion_order() {
        let mut tree: Tree<()> = Tree::new("t");
        for id in ["c", "a", "b"] {
            tree.add_node("t", id, id, GroupType::Unknown, None).unwrap();
        }
        let names: Vec<&str> = tree
            .root_node()
            .children()
            .iter()
            .map(|&k| tree.node(k).unwrap().id())
            .collect();
        assert_eq!(names, ["c", "a", "b"]);
    }

    #[test]
    fn missing_parent_is_rejected() {
        let mut tree: Tree<()> = Tree::new("t");
        let err = tree
            .add_node("nope", "x", "x", GroupType::Unknown, None)
            .unwrap_err();
        assert_eq!(err, Error::ParentNotFound("nope".into()));
        assert_eq!(tree.node_count(), 1);
    }

    #[test]
    fn duplicate_id_is_rejected() {
        let mut tree: Tree<()> = Tree::new("t");
        tree.add_node("t", "x", "x", GroupType::Unknown, None).unwrap();
        let err = tree
            .add_node("t", "x", "other", GroupType::Unknown, None)
            .unwrap_err();
        assert_eq!(err, Error::DuplicateNode("x".into()));
        assert_eq!(tree.get_node("x").unwrap().name(), "x");
        assert_eq!(tree.root_node().children().len(), 1);
    }

    #[test]
    fn root_id_cannot_be_reused() {
        let mut tree: Tree<()> = Tree::new("t");
        assert!(tree.add_node("t", "t", "t", GroupType::Unknown, None).is_err());
    }
}
