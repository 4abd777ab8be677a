// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Traversal methods for navigating a grouping tree.
//!
//! Every query walks depth-first in pre-order, visiting children in creation
//! order. Identical construction input therefore always yields identical
//! result order, which the navigator relies on for "first", "next" and
//! "previous".

use crate::keys::NodeKey;
use crate::tree::{Tree, TreeNode};

/// Depth-first pre-order iterator over a subtree.
#[derive(Debug)]
pub struct PreOrder<'a, T> {
    tree: &'a Tree<T>,
    stack: Vec<NodeKey>,
}

impl<'a, T> Iterator for PreOrder<'a, T> {
    type Item = (NodeKey, &'a TreeNode<T>);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(key) = self.stack.pop() {
            if let Some(node) = self.tree.nodes.get(key) {
                self.stack.extend(node.children.iter().rev().copied());
                return Some((key, node));
            }
        }
        None
    }
}

// =============================================================================
// Downward traversal
// =============================================================================

impl<T> Tree<T> {
    /// Iterates `from` and all of its descendants in pre-order.
    pub fn pre_order(&self, from: NodeKey) -> PreOrder<'_, T> {
        PreOrder {
            tree: self,
            stack: vec![from],
        }
    }

    /// Returns every node in the tree that satisfies `predicate`.
    pub fn get_nodes<P>(&self, mut predicate: P) -> Vec<&TreeNode<T>>
    where
        P: FnMut(&TreeNode<T>) -> bool,
    {
        self.pre_order(self.root())
            .map(|(_, n)| n)
            .filter(|n| predicate(n))
            .collect()
    }

    /// Returns the keys of every node that satisfies `predicate`.
    pub fn get_node_keys<P>(&self, mut predicate: P) -> Vec<NodeKey>
    where
        P: FnMut(&TreeNode<T>) -> bool,
    {
        self.pre_order(self.root())
            .filter(|(_, n)| predicate(n))
            .map(|(k, _)| k)
            .collect()
    }

    /// Returns the first node in pre-order that satisfies `predicate`.
    pub fn first_node<P>(&self, mut predicate: P) -> Option<&TreeNode<T>>
    where
        P: FnMut(&TreeNode<T>) -> bool,
    {
        self.pre_order(self.root())
            .map(|(_, n)| n)
            .find(|n| predicate(n))
    }

    /// Returns the descendants of `key` (not `key` itself) that satisfy
    /// `predicate`.
    pub fn children<P>(&self, key: NodeKey, mut predicate: P) -> Vec<&TreeNode<T>>
    where
        P: FnMut(&TreeNode<T>) -> bool,
    {
        self.pre_order(key)
            .skip(1)
            .map(|(_, n)| n)
            .filter(|n| predicate(n))
            .collect()
    }

    /// Returns every leaf payload under `key`. A leaf returns its own payload.
    pub fn building_elements(&self, key: NodeKey) -> Vec<&T> {
        self.pre_order(key).filter_map(|(_, n)| n.data()).collect()
    }

    /// Returns the payloads of every leaf in the tree.
    pub fn all_building_elements(&self) -> Vec<&T> {
        self.building_elements(self.root())
    }

    // =========================================================================
    // Upward and sideways traversal
    // =========================================================================

    /// Returns the parent key of `key`.
    pub fn parent_of(&self, key: NodeKey) -> Option<NodeKey> {
        self.nodes.get(key).and_then(|n| n.parent)
    }

    /// Returns the ancestors of `key`, nearest first, up to and including the
    /// root.
    pub fn ancestors(&self, key: NodeKey) -> Vec<NodeKey> {
        let mut out = Vec::new();
        let mut current = self.parent_of(key);
        while let Some(k) = current {
            out.push(k);
            current = self.parent_of(k);
        }
        out
    }

    /// Returns the number of edges between `key` and the root.
    pub fn depth(&self, key: NodeKey) -> usize {
        self.ancestors(key).len()
    }

    /// Returns `key` and its siblings in creation order. The root has no
    /// siblings.
    pub fn siblings(&self, key: NodeKey) -> &[NodeKey] {
        self.parent_of(key)
            .and_then(|p| self.nodes.get(p))
            .map(|p| p.children.as_slice())
            .unwrap_or(&[])
    }

    /// Returns the position of `key` among its siblings.
    pub fn sibling_index(&self, key: NodeKey) -> Option<usize> {
        self.siblings(key).iter().position(|&k| k == key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sustainer_model::GroupType;

    /// t
    /// ├── s1
    /// │   ├── s1_b1
    /// │   │   ├── s1_b1_0 (leaf 1)
    /// │   │   └── s1_b1_1 (leaf 2)
    /// │   └── s1_b2
    /// │       └── s1_b2_0 (leaf 3)
    /// └── s2
    ///     └── s2_0 (leaf 4)
    fn sample() -> Tree<u32> {
        let mut tree = Tree::new("t");
        tree.add_node("t", "s1", "1", GroupType::Station, None).unwrap();
        tree.add_node("s1", "s1_b1", "1", GroupType::BuildingStep, None).unwrap();
        tree.add_node("s1_b1", "s1_b1_0", "a", GroupType::BuildingElement, Some(1)).unwrap();
        tree.add_node("s1_b1", "s1_b1_1", "b", GroupType::BuildingElement, Some(2)).unwrap();
        tree.add_node("s1", "s1_b2", "2", GroupType::BuildingStep, None).unwrap();
        tree.add_node("s1_b2", "s1_b2_0", "c", GroupType::BuildingElement, Some(3)).unwrap();
        tree.add_node("t", "s2", "2", GroupType::Station, None).unwrap();
        tree.add_node("s2", "s2_0", "d", GroupType::BuildingElement, Some(4)).unwrap();
        tree
    }

    #[test]
    fn pre_order_visits_parents_before_children() {
        let tree = sample();
        let ids: Vec<&str> = tree.pre_order(tree.root()).map(|(_, n)| n.id()).collect();
        assert_eq!(
            ids,
            ["t", "s1", "s1_b1", "s1_b1_0", "s1_b1_1", "s1_b2", "s1_b2_0", "s2", "s2_0"]
        );
    }

    #[test]
    fn get_nodes_filters_by_predicate() {
        let tree = sample();
        let steps: Vec<&str> = tree
            .get_nodes(|n| n.group_type() == &GroupType::BuildingStep)
            .iter()
            .map(|n| n.id())
            .collect();
        assert_eq!(steps, ["s1_b1", "s1_b2"]);
    }

    #[test]
    fn first_node_skips_root() {
        let tree = sample();
        let first = tree
            .first_node(|n| n.group_type() != &GroupType::Project)
            .unwrap();
        assert_eq!(first.id(), "s1");
        assert!(tree.first_node(|n| n.name() == "zzz").is_none());
    }

    #[test]
    fn children_excludes_start_node() {
        let tree = sample();
        let s1 = tree.key_of("s1").unwrap();
        let all = tree.children(s1, |_| true);
        assert_eq!(all.len(), 5);
        assert!(all.iter().all(|n| n.id() != "s1"));
    }

    #[test]
    fn building_elements_flattens_leaves() {
        let tree = sample();
        let s1 = tree.key_of("s1").unwrap();
        let elements: Vec<u32> = tree.building_elements(s1).into_iter().copied().collect();
        assert_eq!(elements, [1, 2, 3]);

        let leaf = tree.key_of("s2_0").unwrap();
        assert_eq!(tree.building_elements(leaf), [&4]);
        assert_eq!(tree.all_building_elements().len(), 4);
    }

    #[test]
    fn ancestors_and_depth() {
        let tree = sample();
        let leaf = tree.key_of("s1_b2_0").unwrap();
        let ids: Vec<&str> = tree
            .ancestors(leaf)
            .into_iter()
            .map(|k| tree.node(k).unwrap().id())
            .collect();
        assert_eq!(ids, ["s1_b2", "s1", "t"]);
        assert_eq!(tree.depth(leaf), 3);
        assert_eq!(tree.depth(tree.root()), 0);
    }

    #[test]
    fn siblings_and_index() {
        let tree = sample();
        let b2 = tree.key_of("s1_b2").unwrap();
        assert_eq!(tree.siblings(b2).len(), 2);
        assert_eq!(tree.sibling_index(b2), Some(1));
        assert!(tree.siblings(tree.root()).is_empty());
        assert_eq!(tree.sibling_index(tree.root()), None);
    }
}
