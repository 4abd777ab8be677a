// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # Sustainer Model
//!
//! Domain model shared by the Sustainer viewer crates.
//!
//! Building elements ([`Entity`]) are immutable records supplied by the model
//! cache. Their well-known properties ([`KnownProperty`]) are validated and
//! indexed once, at construction, so grouping code never searches a property
//! bag by name at runtime. Group levels are described by [`GroupType`] and UI
//! notifications travel through explicit [`Event`] registries.

pub mod entity;
pub mod error;
pub mod event;
pub mod group;
pub mod ordered;
pub mod property;

pub use entity::{group_by_model, Entity, EntityBuilder, EntityData, ModelId};
pub use error::{Error, Result};
pub use event::{Event, SubscriptionId};
pub use group::{GroupType, VisibilityMode, VisibilityState, UNSPECIFIED};
pub use ordered::group_ordered;
pub use property::{KnownProperty, Property, PropertyKey};
