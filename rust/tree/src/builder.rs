// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Building trees from a chain of grouping properties.
//!
//! Each property in the chain adds one tree level. At every level the
//! elements are grouped by that property's value and the groups are added in
//! natural order. Elements become leaves below the last level.
//!
//! Node ids are derived from the parent id, so the same input always yields
//! the same ids:
//!
//! - group node: `{parent}_{property}_{value}`
//! - leaf node: `{parent}_{index}`
//!
//! Property values may contain `_`, so a derived id can already be taken by
//! another node. Such ids get a `#{n}` suffix instead of failing the build.

use sustainer_model::{GroupType, PropertyKey, UNSPECIFIED};

use crate::config::TreeConfig;
use crate::error::Result;
use crate::grouping::{group_elements_by_property, sort_grouped_elements, Groupable};
use crate::tree::Tree;

/// Builds a tree with root id `id` by grouping `elements` along
/// `property_chain`.
///
/// Elements without a value for a level are either grouped under an
/// "Unspecified" node (when [`TreeConfig::allow_unspecified_as_node_name`]
/// is set) or passed on to the next level under the same parent, skipping a
/// tree level. An empty chain attaches every element directly to the root.
pub fn set_up_tree_from_properties<T>(
    id: &str,
    elements: &[T],
    property_chain: &[PropertyKey],
    config: &TreeConfig,
) -> Result<Tree<T>>
where
    T: Groupable + Clone,
{
    let mut tree = Tree::new(id);
    let builder = SubTreeBuilder {
        property_chain,
        config,
    };
    builder.build(&mut tree, id, elements, 0)?;

    tracing::debug!(
        tree_id = id,
        elements = elements.len(),
        levels = property_chain.len(),
        nodes = tree.node_count(),
        "Built grouping tree"
    );
    Ok(tree)
}

struct SubTreeBuilder<'a> {
    property_chain: &'a [PropertyKey],
    config: &'a TreeConfig,
}

impl SubTreeBuilder<'_> {
    fn build<T>(&self, tree: &mut Tree<T>, parent_id: &str, elements: &[T], level: usize) -> Result<()>
    where
        T: Groupable + Clone,
    {
        let Some(property) = self.property_chain.get(level) else {
            for (index, element) in elements.iter().enumerate() {
                let leaf_id = unique_id(tree, format!("{parent_id}_{index}"));
                tree.add_node(
                    parent_id,
                    leaf_id,
                    element.display_name(),
                    GroupType::BuildingElement,
                    Some(element.clone()),
                )?;
            }
            return Ok(());
        };

        let group_type = GroupType::for_property(property);
        let groups = sort_grouped_elements(group_elements_by_property(elements, property));

        for (value, group) in groups {
            if value == UNSPECIFIED && !self.config.allow_unspecified_as_node_name {
                self.build(tree, parent_id, &group, level + 1)?;
                continue;
            }

            let node_id = unique_id(tree, format!("{parent_id}_{property}_{value}"));
            tree.add_node(parent_id, node_id.as_str(), value, group_type.clone(), None)?;
            self.build(tree, &node_id, &group, level + 1)?;
        }

        Ok(())
    }
}

fn unique_id<T>(tree: &Tree<T>, id: String) -> String {
    if !tree.contains(&id) {
        return id;
    }
    let free = (2..)
        .map(|n| format!("{id}#{n}"))
        .find(|candidate| !tree.contains(candidate))
        .unwrap_or_default();
    tracing::warn!(id = %id, renamed = %free, "Derived node id already taken");
    free
}
