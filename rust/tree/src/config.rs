// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Tree construction settings.

use serde::{Deserialize, Serialize};

/// Settings for [`set_up_tree_from_properties`](crate::set_up_tree_from_properties).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TreeConfig {
    /// Give elements without a grouping value their own "Unspecified" node.
    /// When unset they are attached one level up instead.
    pub allow_unspecified_as_node_name: bool,
}

impl TreeConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self {
            allow_unspecified_as_node_name: std::env::var("SUSTAINER_ALLOW_UNSPECIFIED_NODES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(false),
        }
    }
}
