// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Moving the selection to the next or previous group.
//!
//! Navigation is stateless: every call takes the current group and the tree
//! and returns a fresh [`SelectionGroup`] whose elements are recomputed from
//! the tree.
//!
//! Two policies exist:
//!
//! - [`StepPolicy::StepOver`] cycles through every node of the current
//!   node's group type, across the whole tree, wrapping at both ends.
//! - [`StepPolicy::StepInto`] descends into the first child that has
//!   children of its own; otherwise it moves to the adjacent sibling, and
//!   failing that to the parent's adjacent sibling. It never wraps and only
//!   climbs one level, so it can run out of steps.

use serde::{Deserialize, Serialize};
use sustainer_model::GroupType;

use crate::keys::NodeKey;
use crate::selection::SelectionGroup;
use crate::tree::Tree;

/// Direction of a navigation step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Direction {
    #[default]
    Next,
    Previous,
}

/// Traversal policy of a navigation step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum StepPolicy {
    #[default]
    StepOver,
    StepInto,
}

/// Returns the group adjacent to `current`.
///
/// Without a current group, or when its id is not in the tree, this returns
/// [`first_group`].
pub fn adjacent_group<T, U>(
    current: Option<&SelectionGroup<U>>,
    tree: Option<&Tree<T>>,
    direction: Direction,
    policy: StepPolicy,
) -> Option<SelectionGroup<T>>
where
    T: Clone,
{
    let tree = tree?;
    let Some(current) = current else {
        return first_group(tree);
    };
    let Some(key) = tree.key_of(&current.id) else {
        tracing::debug!(group_id = %current.id, "Current group not in tree, starting from first group");
        return first_group(tree);
    };

    match policy {
        StepPolicy::StepOver => step_over(tree, key, direction),
        StepPolicy::StepInto => step_into(tree, key, direction),
    }
}

/// Returns the first non-root node in pre-order with all of its elements.
pub fn first_group<T: Clone>(tree: &Tree<T>) -> Option<SelectionGroup<T>> {
    if !tree.root_node().has_children() {
        tracing::debug!(tree_id = tree.id(), "Tree has no groups");
        return None;
    }
    let key = tree
        .pre_order(tree.root())
        .find(|(_, n)| n.group_type() != &GroupType::Project)
        .map(|(k, _)| k)?;
    SelectionGroup::from_node(tree, key)
}

fn step_over<T: Clone>(tree: &Tree<T>, current: NodeKey, direction: Direction) -> Option<SelectionGroup<T>> {
    let group_type = tree.node(current)?.group_type().clone();
    let same_type = tree.get_node_keys(|n| n.group_type() == &group_type);
    if same_type.is_empty() {
        return None;
    }

    let last = same_type.len() - 1;
    let index = same_type.iter().position(|&k| k == current);
    let adjacent = match (direction, index) {
        (Direction::Next, Some(i)) if i < last => i + 1,
        (Direction::Next, _) => 0,
        (Direction::Previous, Some(i)) if i > 0 => i - 1,
        (Direction::Previous, _) => last,
    };

    SelectionGroup::from_node(tree, same_type[adjacent])
}

fn step_into<T: Clone>(tree: &Tree<T>, current: NodeKey, direction: Direction) -> Option<SelectionGroup<T>> {
    let node = tree.node(current)?;

    let first_branch = node
        .children()
        .iter()
        .copied()
        .find(|&k| tree.node(k).is_some_and(|c| c.has_children()));
    if let Some(child) = first_branch {
        return SelectionGroup::from_node(tree, child);
    }

    let parent = node.parent()?;
    if let Some(sibling) = neighbor(tree, current, direction) {
        return SelectionGroup::from_node(tree, sibling);
    }

    // One level up only.
    let parent_sibling = neighbor(tree, parent, direction);
    if parent_sibling.is_none() {
        tracing::debug!(node_id = node.id(), "No group to step into");
    }
    SelectionGroup::from_node(tree, parent_sibling?)
}

/// Adjacent sibling of `key`, without wrapping.
fn neighbor<T>(tree: &Tree<T>, key: NodeKey, direction: Direction) -> Option<NodeKey> {
    let siblings = tree.siblings(key);
    let index = tree.sibling_index(key)?;
    let adjacent = match direction {
        Direction::Next => index.checked_add(1)?,
        Direction::Previous => index.checked_sub(1)?,
    };
    siblings.get(adjacent).copied()
}
