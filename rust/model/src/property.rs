// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Element properties and the closed set of property keys the viewer knows.

use serde::{Deserialize, Serialize};

/// A single exported property: name, value and the property set it came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Property {
    pub name: String,
    pub value: String,
    #[serde(rename = "pSet", default)]
    pub pset: String,
}

impl Property {
    pub fn new(name: impl Into<String>, value: impl Into<String>, pset: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            pset: pset.into(),
        }
    }
}

/// Properties written by the IFC export that the viewer groups and filters on.
///
/// The string forms are the exported property names, which are Dutch for the
/// first four.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum KnownProperty {
    Count,
    BuildingNumber,
    ProductCode,
    Material,
    Station,
    Assembly,
    BuildingStep,
    /// Used by installation companies to group cables with their endings.
    PrefabNumber,
    Family,
}

impl KnownProperty {
    /// Every known property, in declaration order.
    pub const ALL: [KnownProperty; 9] = [
        KnownProperty::Count,
        KnownProperty::BuildingNumber,
        KnownProperty::ProductCode,
        KnownProperty::Material,
        KnownProperty::Station,
        KnownProperty::Assembly,
        KnownProperty::BuildingStep,
        KnownProperty::PrefabNumber,
        KnownProperty::Family,
    ];

    /// Returns the exported property name.
    pub fn as_str(&self) -> &'static str {
        match self {
            KnownProperty::Count => "Aantal",
            KnownProperty::BuildingNumber => "Bouwnummer",
            KnownProperty::ProductCode => "Productcode",
            KnownProperty::Material => "Materiaal",
            KnownProperty::Station => "Station",
            KnownProperty::Assembly => "Assembly",
            KnownProperty::BuildingStep => "BuildingStep",
            KnownProperty::PrefabNumber => "PrefabNumber",
            KnownProperty::Family => "Family",
        }
    }

    /// Resolves an exported property name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.as_str() == name)
    }
}

impl std::fmt::Display for KnownProperty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Key used to group or look up a property value.
///
/// Known properties resolve through the entity's typed index; custom names
/// fall back to the raw property list and exist for user-defined groupings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PropertyKey {
    Known(KnownProperty),
    Custom(String),
}

impl PropertyKey {
    pub fn as_str(&self) -> &str {
        match self {
            PropertyKey::Known(p) => p.as_str(),
            PropertyKey::Custom(name) => name,
        }
    }
}

impl From<KnownProperty> for PropertyKey {
    fn from(p: KnownProperty) -> Self {
        PropertyKey::Known(p)
    }
}

impl From<&str> for PropertyKey {
    fn from(name: &str) -> Self {
        match KnownProperty::from_name(name) {
            Some(p) => PropertyKey::Known(p),
            None => PropertyKey::Custom(name.to_string()),
        }
    }
}

impl From<String> for PropertyKey {
    fn from(name: String) -> Self {
        match KnownProperty::from_name(&name) {
            Some(p) => PropertyKey::Known(p),
            None => PropertyKey::Custom(name),
        }
    }
}

impl From<PropertyKey> for String {
    fn from(key: PropertyKey) -> Self {
        key.as_str().to_string()
    }
}

impl std::fmt::Display for PropertyKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
