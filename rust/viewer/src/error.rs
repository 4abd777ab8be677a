// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for viewer actions and tagging.

/// Result type alias for viewer operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while driving the viewer.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    /// A collaborator (camera, highlighter, ...) rejected a request.
    #[error("collaborator failed: {0}")]
    Collaborator(String),

    /// The bounding sphere of the requested elements is empty or unbounded.
    #[error("invalid bounding sphere (radius {radius})")]
    InvalidBoundingSphere { radius: f64 },
}
