// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for entity construction.

use crate::property::KnownProperty;

/// Result type alias for model operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building domain entities.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    /// A known property was supplied twice with different values.
    #[error("element {global_id}: property {property} has conflicting values {first:?} and {second:?}")]
    ConflictingProperty {
        global_id: String,
        property: KnownProperty,
        first: String,
        second: String,
    },

    /// An entity was built without a global id.
    #[error("element with express id {0} has no global id")]
    MissingGlobalId(u32),
}
