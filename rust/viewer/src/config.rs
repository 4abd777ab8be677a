// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Tagger configuration loaded from defaults or environment variables.

use serde::{Deserialize, Serialize};

/// Element type merged into clusters.
pub const MECHANICAL_FASTENER: &str = "IFCMECHANICALFASTENER";

/// Type prefix of installation (HVAC, piping) elements.
pub const FLOW_TYPE: &str = "IFCFLOW";

/// Tagger settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TaggerConfig {
    /// Tag fasteners individually.
    pub show_fasteners: bool,
    /// Tag installation elements.
    pub show_installations: bool,
    /// Merge nearby fasteners with the same name into one cluster tag.
    pub merge_fasteners: bool,
    /// Maximum distance between two tags of one cluster, inclusive.
    pub merge_distance: f64,
    /// Height of a cluster label above its members' average position.
    pub cluster_label_offset: f64,
    /// Element type that takes part in clustering.
    pub mergeable_type: String,
    /// Type substring identifying installations.
    pub installation_type: String,
    /// Product code substring identifying installations.
    pub installation_product_code: String,
    /// Scale applied to the bounding sphere radius when zooming.
    pub zoom_buffer: f64,
}

impl Default for TaggerConfig {
    fn default() -> Self {
        Self {
            show_fasteners: false,
            show_installations: false,
            merge_fasteners: true,
            merge_distance: 0.45,
            cluster_label_offset: 0.5,
            mergeable_type: MECHANICAL_FASTENER.into(),
            installation_type: FLOW_TYPE.into(),
            installation_product_code: "TE".into(),
            zoom_buffer: 0.8,
        }
    }
}

impl TaggerConfig {
    /// Load configuration from environment variables, falling back to the
    /// defaults for anything unset or unparsable.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            show_fasteners: env_or("SUSTAINER_SHOW_FASTENERS", defaults.show_fasteners),
            show_installations: env_or("SUSTAINER_SHOW_INSTALLATIONS", defaults.show_installations),
            merge_fasteners: env_or("SUSTAINER_MERGE_FASTENERS", defaults.merge_fasteners),
            merge_distance: env_or("SUSTAINER_MERGE_DISTANCE", defaults.merge_distance),
            cluster_label_offset: env_or("SUSTAINER_CLUSTER_LABEL_OFFSET", defaults.cluster_label_offset),
            mergeable_type: std::env::var("SUSTAINER_MERGEABLE_TYPE").unwrap_or(defaults.mergeable_type),
            installation_type: std::env::var("SUSTAINER_INSTALLATION_TYPE").unwrap_or(defaults.installation_type),
            installation_product_code: std::env::var("SUSTAINER_INSTALLATION_PRODUCT_CODE")
                .unwrap_or(defaults.installation_product_code),
            zoom_buffer: env_or("SUSTAINER_ZOOM_BUFFER", defaults.zoom_buffer),
        }
    }
}

fn env_or<T: std::str::FromStr>(name: &str, default: T) -> T {
    std::env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_viewer_behaviour() {
        let config = TaggerConfig::default();
        assert!(!config.show_fasteners);
        assert!(config.merge_fasteners);
        assert_eq!(config.merge_distance, 0.45);
        assert_eq!(config.mergeable_type, "IFCMECHANICALFASTENER");
    }

    #[test]
    fn partial_json_fills_in_defaults() {
        let config: TaggerConfig = serde_json::from_str(r#"{"show_fasteners": true}"#).unwrap();
        assert!(config.show_fasteners);
        assert_eq!(config.installation_product_code, "TE");
        assert_eq!(config.zoom_buffer, 0.8);
    }
}
