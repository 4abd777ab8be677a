// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Group levels and visibility vocabulary.

use serde::{Deserialize, Serialize};

use crate::property::{KnownProperty, PropertyKey};

/// Bucket name for elements that lack the grouping property.
pub const UNSPECIFIED: &str = "Unspecified";

/// The level a tree node represents.
///
/// `Station`, `BuildingStep` and `Assembly` are the construction-sequencing
/// levels; any other grouping property produces a `Custom` level named after
/// the property.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum GroupType {
    Project,
    Station,
    BuildingStep,
    Assembly,
    BuildingElement,
    Unknown,
    Custom(String),
}

impl GroupType {
    pub fn as_str(&self) -> &str {
        match self {
            GroupType::Project => "Project",
            GroupType::Station => "Station",
            GroupType::BuildingStep => "BuildingStep",
            GroupType::Assembly => "Assembly",
            GroupType::BuildingElement => "BuildingElement",
            GroupType::Unknown => "Unknown",
            GroupType::Custom(name) => name,
        }
    }

    /// Group level produced by grouping on `key`.
    pub fn for_property(key: &PropertyKey) -> Self {
        match key {
            PropertyKey::Known(KnownProperty::Station) => GroupType::Station,
            PropertyKey::Known(KnownProperty::BuildingStep) => GroupType::BuildingStep,
            PropertyKey::Known(KnownProperty::Assembly) => GroupType::Assembly,
            other => GroupType::Custom(other.as_str().to_string()),
        }
    }
}

impl From<&str> for GroupType {
    fn from(name: &str) -> Self {
        match name {
            "Project" => GroupType::Project,
            "Station" => GroupType::Station,
            "BuildingStep" => GroupType::BuildingStep,
            "Assembly" => GroupType::Assembly,
            "BuildingElement" => GroupType::BuildingElement,
            "Unknown" => GroupType::Unknown,
            other => GroupType::Custom(other.to_string()),
        }
    }
}

impl From<String> for GroupType {
    fn from(name: String) -> Self {
        GroupType::from(name.as_str())
    }
}

impl From<GroupType> for String {
    fn from(ty: GroupType) -> Self {
        ty.as_str().to_string()
    }
}

impl std::fmt::Display for GroupType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Visibility of a tree node and the elements under it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum VisibilityState {
    #[default]
    Visible,
    Hidden,
    Ghost,
}

impl VisibilityState {
    /// Ghosted elements are still drawn, only translucent.
    pub fn is_shown(&self) -> bool {
        !matches!(self, VisibilityState::Hidden)
    }
}

/// How selecting a group changes the visibility of the rest of the tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum VisibilityMode {
    /// Hide everything except the selection.
    Isolate,
    /// Within the selection's parent, show the siblings up to and including
    /// the selection.
    ShowPrevious,
    /// Show everything under the selection's parent.
    ShowNeighbors,
    /// Change the selection only.
    #[default]
    SelectGroup,
}
