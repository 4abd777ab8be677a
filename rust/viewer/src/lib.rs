// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # Sustainer Viewer
//!
//! Everything between the grouping tree and the 3D scene: camera and
//! visibility actions on element sets, and floating tags with distance-based
//! clustering of dense fastener groups.
//!
//! The rendering toolkit is reached only through the traits in
//! [`collaborators`]. Tags are cached per element set ([`TagCache`]) and
//! published through a generation guard ([`RebuildGuard`]), so a slow
//! rebuild can never overwrite a newer one.

pub mod actions;
pub mod cache;
pub mod cluster;
pub mod collaborators;
pub mod color;
pub mod config;
pub mod error;
pub mod filter;
pub mod tag;
pub mod tagger;

pub use actions::{fragment_maps, isolate, select, set_visibility, visible_elements, zoom_to_elements};
pub use cache::{Fingerprint, RebuildGuard, RebuildTicket, TagCache};
pub use cluster::{cluster_markers, merge_by_model, merge_tags_by_text, ClusterOutput, NameClusters};
pub use collaborators::{
    FragmentIdMap, Highlighter, Hider, LineHandle, LineSegment, MarkerHandle, ModelCache, Sphere, Viewer,
};
pub use color::ColorMap;
pub use config::TaggerConfig;
pub use error::{Error, Result};
pub use filter::{filter_elements, FilteredElements};
pub use tag::{Tag, TagKey};
pub use tagger::{ModelTagger, TagPlan, TagVisibilityMode};
