// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for tree operations.

/// Result type alias for tree operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building or querying a tree.
///
/// All of these are lookup misses: the tree is left unchanged when one is
/// returned.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// The parent of a new node does not exist.
    #[error("parent node not found: {0}")]
    ParentNotFound(String),

    /// A node with the same id already exists in the tree.
    #[error("node already exists: {0}")]
    DuplicateNode(String),

    /// A referenced node does not exist.
    #[error("node not found: {0}")]
    NodeNotFound(String),

    /// The operation needs a published tree.
    #[error("no tree has been published")]
    NoTree,
}
