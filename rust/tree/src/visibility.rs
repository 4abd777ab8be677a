// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Selection and visibility state over a published tree.
//!
//! [`ModelViewManager`] owns the current [`SelectionGroup`] and a visibility
//! state per node id. A tree is published by swapping an `Arc`, so anyone
//! still holding the previous tree keeps a complete, consistent copy until
//! they drop it.
//!
//! Every change is announced on the manager's [`Event`] channels.

use std::sync::Arc;

use rustc_hash::FxHashMap;
use sustainer_model::{Event, VisibilityMode, VisibilityState};

use crate::error::{Error, Result};
use crate::keys::NodeKey;
use crate::navigator::{adjacent_group, Direction, StepPolicy};
use crate::selection::SelectionGroup;
use crate::tree::Tree;

/// Payload of [`ModelViewManager::on_visibility_updated`].
#[derive(Debug, Clone, PartialEq)]
pub struct VisibilityUpdate<T> {
    pub tree_id: String,
    /// Elements that are shown after the update.
    pub elements: Vec<T>,
}

/// Owner of the selected group and the per-node visibility map.
pub struct ModelViewManager<T> {
    tree: Option<Arc<Tree<T>>>,
    selected_group: Option<SelectionGroup<T>>,
    group_visibility: FxHashMap<String, VisibilityState>,

    pub on_visibility_updated: Event<VisibilityUpdate<T>>,
    pub on_building_elements_changed: Event<Vec<T>>,
    pub on_group_visibility_set: Event<FxHashMap<String, VisibilityState>>,
    pub on_selected_group_changed: Event<SelectionGroup<T>>,
}

impl<T: Clone> ModelViewManager<T> {
    pub fn new() -> Self {
        Self {
            tree: None,
            selected_group: None,
            group_visibility: FxHashMap::default(),
            on_visibility_updated: Event::new(),
            on_building_elements_changed: Event::new(),
            on_group_visibility_set: Event::new(),
            on_selected_group_changed: Event::new(),
        }
    }

    pub fn tree(&self) -> Option<&Arc<Tree<T>>> {
        self.tree.as_ref()
    }

    pub fn selected_group(&self) -> Option<&SelectionGroup<T>> {
        self.selected_group.as_ref()
    }

    pub fn group_visibility(&self) -> &FxHashMap<String, VisibilityState> {
        &self.group_visibility
    }

    /// Visibility of a node. Nodes the map does not know are visible.
    pub fn visibility(&self, node_id: &str) -> VisibilityState {
        self.group_visibility
            .get(node_id)
            .copied()
            .unwrap_or_default()
    }

    /// Publishes a new tree, replacing the previous one wholesale.
    ///
    /// Every node starts visible. A selected group whose id survives the
    /// rebuild is refreshed from the new tree; otherwise the selection is
    /// cleared.
    pub fn set_tree(&mut self, tree: impl Into<Arc<Tree<T>>>) {
        let tree: Arc<Tree<T>> = tree.into();

        self.group_visibility = tree
            .pre_order(tree.root())
            .map(|(_, n)| (n.id().to_string(), VisibilityState::Visible))
            .collect();
        self.selected_group = self
            .selected_group
            .take()
            .and_then(|g| SelectionGroup::from_id(&tree, &g.id));

        tracing::debug!(
            tree_id = tree.id(),
            nodes = tree.node_count(),
            "Published tree"
        );

        let elements: Vec<T> = tree.all_building_elements().into_iter().cloned().collect();
        self.tree = Some(tree);
        self.on_building_elements_changed.trigger(&elements);
        self.on_group_visibility_set.trigger(&self.group_visibility);
    }

    /// Selects `group` and applies `mode` to the visibility map.
    pub fn set_selected_group(&mut self, group: SelectionGroup<T>, mode: VisibilityMode) -> Result<()> {
        let tree = self.tree.clone().ok_or(Error::NoTree)?;
        let key = tree
            .key_of(&group.id)
            .ok_or_else(|| Error::NodeNotFound(group.id.clone()))?;

        self.on_selected_group_changed.trigger(&group);
        self.selected_group = Some(group);

        if let Some(map) = visibility_for_mode(&tree, key, mode) {
            self.group_visibility = map;
            self.announce_visibility(&tree);
        }
        Ok(())
    }

    pub fn clear_selection(&mut self) {
        self.selected_group = None;
    }

    /// Moves the selection to the adjacent group and applies `mode`.
    ///
    /// Returns the new selection, or `None` when there is no step to take.
    pub fn select_adjacent(
        &mut self,
        direction: Direction,
        policy: StepPolicy,
        mode: VisibilityMode,
    ) -> Result<Option<&SelectionGroup<T>>> {
        let next = adjacent_group(self.selected_group.as_ref(), self.tree.as_deref(), direction, policy);
        match next {
            Some(group) => {
                self.set_selected_group(group, mode)?;
                Ok(self.selected_group.as_ref())
            }
            None => Ok(None),
        }
    }

    /// Sets the visibility of one node.
    ///
    /// With `propagate`, every descendant gets the same state. Showing a node
    /// also shows its hidden ancestors, so the node is reachable.
    pub fn set_visibility(&mut self, node_id: &str, state: VisibilityState, propagate: bool) -> Result<()> {
        let tree = self.tree.clone().ok_or(Error::NoTree)?;
        let key = tree
            .key_of(node_id)
            .ok_or_else(|| Error::NodeNotFound(node_id.to_string()))?;

        if propagate {
            for (_, n) in tree.pre_order(key) {
                self.group_visibility.insert(n.id().to_string(), state);
            }
        } else {
            self.group_visibility.insert(node_id.to_string(), state);
        }

        if state.is_shown() {
            for ancestor in tree.ancestors(key) {
                if let Some(n) = tree.node(ancestor) {
                    let entry = self
                        .group_visibility
                        .entry(n.id().to_string())
                        .or_default();
                    if *entry == VisibilityState::Hidden {
                        *entry = VisibilityState::Visible;
                    }
                }
            }
        }

        self.announce_visibility(&tree);
        Ok(())
    }

    /// Elements whose leaf node is shown.
    pub fn visible_elements(&self) -> Vec<T> {
        let Some(tree) = &self.tree else {
            return Vec::new();
        };
        tree.pre_order(tree.root())
            .filter(|(_, n)| n.is_leaf() && self.visibility(n.id()).is_shown())
            .filter_map(|(_, n)| n.data().cloned())
            .collect()
    }

    fn announce_visibility(&mut self, tree: &Tree<T>) {
        self.on_group_visibility_set.trigger(&self.group_visibility);
        let update = VisibilityUpdate {
            tree_id: tree.id().to_string(),
            elements: self.visible_elements(),
        };
        tracing::debug!(
            tree_id = %update.tree_id,
            visible = update.elements.len(),
            "Visibility updated"
        );
        self.on_visibility_updated.trigger(&update);
    }
}

impl<T: Clone> Default for ModelViewManager<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> std::fmt::Debug for ModelViewManager<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelViewManager")
            .field("tree", &self.tree.as_ref().map(|t| t.id().to_string()))
            .field("selected_group", &self.selected_group.as_ref().map(|g| g.id.clone()))
            .field("nodes_with_state", &self.group_visibility.len())
            .finish_non_exhaustive()
    }
}

/// Visibility of every node after selecting `selected` under `mode`, or
/// `None` if the mode leaves visibility alone.
pub fn visibility_for_mode<T>(
    tree: &Tree<T>,
    selected: NodeKey,
    mode: VisibilityMode,
) -> Option<FxHashMap<String, VisibilityState>> {
    let shown_roots: Vec<NodeKey> = match mode {
        VisibilityMode::SelectGroup => return None,
        VisibilityMode::Isolate => vec![selected],
        VisibilityMode::ShowNeighbors => vec![tree.parent_of(selected).unwrap_or(selected)],
        VisibilityMode::ShowPrevious => {
            let siblings = tree.siblings(selected);
            match tree.sibling_index(selected) {
                Some(i) => siblings[..=i].to_vec(),
                None => vec![selected],
            }
        }
    };

    let mut map: FxHashMap<String, VisibilityState> = tree
        .pre_order(tree.root())
        .map(|(_, n)| (n.id().to_string(), VisibilityState::Hidden))
        .collect();

    for &root in &shown_roots {
        for (_, n) in tree.pre_order(root) {
            map.insert(n.id().to_string(), VisibilityState::Visible);
        }
        for ancestor in tree.ancestors(root) {
            if let Some(n) = tree.node(ancestor) {
                map.insert(n.id().to_string(), VisibilityState::Visible);
            }
        }
    }

    Some(map)
}
