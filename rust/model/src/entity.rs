// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Building elements as delivered by the model cache.
//!
//! An [`Entity`] is built from raw [`EntityData`] exactly once. Construction
//! indexes every [`KnownProperty`] so later lookups are a hash probe, and
//! rejects elements whose export contains contradictory values for the same
//! known property.

use std::borrow::Borrow;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::ordered::group_ordered;
use crate::property::{KnownProperty, Property, PropertyKey};

/// Identifier of a loaded model (one fragment group per IFC file).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct ModelId(pub String);

impl std::fmt::Display for ModelId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ModelId {
    fn from(id: &str) -> Self {
        ModelId(id.to_string())
    }
}

impl From<String> for ModelId {
    fn from(id: String) -> Self {
        ModelId(id)
    }
}

/// Raw, unvalidated element record in the exported JSON shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityData {
    /// Line number of the element in the `.ifc` file.
    #[serde(rename = "expressID")]
    pub express_id: u32,
    #[serde(rename = "GlobalID")]
    pub global_id: String,
    /// IFC type name, e.g. `IFCMECHANICALFASTENER`.
    #[serde(rename = "type")]
    pub ifc_type: String,
    pub name: String,
    #[serde(default)]
    pub properties: Vec<Property>,
    /// Fragment holding the instanced mesh of this element.
    #[serde(rename = "FragmentID", default)]
    pub fragment_id: String,
    #[serde(rename = "modelID", default)]
    pub model_id: ModelId,
    /// User assigned label, e.g. from a local database.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
}

/// A validated building element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "EntityData", into = "EntityData")]
pub struct Entity {
    data: EntityData,
    /// Known property → index into `data.properties`.
    known: FxHashMap<KnownProperty, usize>,
}

impl Entity {
    /// Validates raw element data and indexes its known properties.
    ///
    /// Empty values count as unset. A known property that appears more than
    /// once must carry the same value every time.
    pub fn new(data: EntityData) -> Result<Self> {
        if data.global_id.is_empty() {
            return Err(Error::MissingGlobalId(data.express_id));
        }

        let mut known: FxHashMap<KnownProperty, usize> = FxHashMap::default();
        for (i, prop) in data.properties.iter().enumerate() {
            let Some(kp) = KnownProperty::from_name(&prop.name) else {
                continue;
            };
            if prop.value.trim().is_empty() {
                continue;
            }
            match known.get(&kp) {
                Some(&prev) if data.properties[prev].value != prop.value => {
                    tracing::warn!(
                        global_id = %data.global_id,
                        property = %kp,
                        "Conflicting values for known property"
                    );
                    return Err(Error::ConflictingProperty {
                        global_id: data.global_id.clone(),
                        property: kp,
                        first: data.properties[prev].value.clone(),
                        second: prop.value.clone(),
                    });
                }
                Some(_) => {}
                None => {
                    known.insert(kp, i);
                }
            }
        }

        Ok(Self { data, known })
    }

    /// Starts building an entity with the given ids.
    pub fn builder(global_id: impl Into<String>, express_id: u32) -> EntityBuilder {
        EntityBuilder::new(global_id, express_id)
    }

    pub fn express_id(&self) -> u32 {
        self.data.express_id
    }

    pub fn global_id(&self) -> &str {
        &self.data.global_id
    }

    pub fn ifc_type(&self) -> &str {
        &self.data.ifc_type
    }

    pub fn name(&self) -> &str {
        &self.data.name
    }

    pub fn properties(&self) -> &[Property] {
        &self.data.properties
    }

    pub fn fragment_id(&self) -> &str {
        &self.data.fragment_id
    }

    pub fn model_id(&self) -> &ModelId {
        &self.data.model_id
    }

    pub fn alias(&self) -> Option<&str> {
        self.data.alias.as_deref()
    }

    /// Value of a known property, if set.
    pub fn known(&self, property: KnownProperty) -> Option<&str> {
        self.known
            .get(&property)
            .map(|&i| self.data.properties[i].value.as_str())
    }

    /// Value of any property, if set. Custom keys match the first raw
    /// property with that name and a non-empty value.
    pub fn property(&self, key: &PropertyKey) -> Option<&str> {
        match key {
            PropertyKey::Known(p) => self.known(*p),
            PropertyKey::Custom(name) => self
                .data
                .properties
                .iter()
                .find(|p| &p.name == name && !p.value.trim().is_empty())
                .map(|p| p.value.as_str()),
        }
    }

    /// Returns the raw data this entity was built from.
    pub fn data(&self) -> &EntityData {
        &self.data
    }
}

impl TryFrom<EntityData> for Entity {
    type Error = Error;

    fn try_from(data: EntityData) -> Result<Self> {
        Entity::new(data)
    }
}

impl From<Entity> for EntityData {
    fn from(entity: Entity) -> Self {
        entity.data
    }
}

/// Convenience builder for [`Entity`].
#[derive(Debug, Clone)]
pub struct EntityBuilder {
    data: EntityData,
}

impl EntityBuilder {
    pub fn new(global_id: impl Into<String>, express_id: u32) -> Self {
        Self {
            data: EntityData {
                express_id,
                global_id: global_id.into(),
                ifc_type: String::new(),
                name: String::new(),
                properties: Vec::new(),
                fragment_id: String::new(),
                model_id: ModelId::default(),
                alias: None,
            },
        }
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.data.name = name.into();
        self
    }

    pub fn ifc_type(mut self, ifc_type: impl Into<String>) -> Self {
        self.data.ifc_type = ifc_type.into();
        self
    }

    pub fn model(mut self, model_id: impl Into<ModelId>) -> Self {
        self.data.model_id = model_id.into();
        self
    }

    pub fn fragment(mut self, fragment_id: impl Into<String>) -> Self {
        self.data.fragment_id = fragment_id.into();
        self
    }

    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.data.alias = Some(alias.into());
        self
    }

    /// Adds a property in the default property set.
    pub fn property(self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.property_in("Sustainer", name, value)
    }

    pub fn property_in(
        mut self,
        pset: impl Into<String>,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.data.properties.push(Property::new(name, value, pset));
        self
    }

    pub fn build(self) -> Result<Entity> {
        Entity::new(self.data)
    }
}

/// Groups elements by model id, first-seen order. Used whenever work has to
/// be routed to the model (fragment group) that owns the element.
pub fn group_by_model<E>(elements: &[E]) -> Vec<(ModelId, Vec<E>)>
where
    E: Borrow<Entity> + Clone,
{
    group_ordered(elements.iter().cloned(), |e| e.borrow().model_id().clone())
}
