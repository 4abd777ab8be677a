// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Merging dense groups of same-name tags into cluster markers.
//!
//! Only tags of the mergeable type (fasteners by default) take part. They are
//! grouped by text, and within a text group clustered greedily in input
//! order: a tag joins the first existing cluster that has any member within
//! the merge distance, or starts a new cluster. Members are compared with
//! each other, never with a cluster center, so the result depends on input
//! order. That order comes from the tree and is deterministic.
//!
//! Clusters of two or more placed tags become one labelled marker above
//! their average position (`"3 x Bolt"`), plus a text-less companion marker
//! and a connecting line per member. Single tags stay as they are.

use nalgebra::{Point3, Vector3};
use sustainer_model::{group_by_model, group_ordered, Entity};

use crate::cache::TagCache;
use crate::collaborators::LineSegment;
use crate::color::ColorMap;
use crate::config::TaggerConfig;
use crate::tag::{Tag, TagKey, CLUSTER_ICON};

/// Clusters per tag text, in first-seen text order.
pub type NameClusters = Vec<(String, Vec<Vec<Tag>>)>;

/// Markers and lines produced by [`cluster_markers`].
#[derive(Debug, Clone, Default)]
pub struct ClusterOutput {
    pub markers: Vec<Tag>,
    pub lines: Vec<LineSegment>,
}

/// Groups the mergeable tags by text and clusters each group by distance.
///
/// Every tag of a text group gets that text's color from `colors`. Colors are
/// only generated for texts the map has not seen, so repeated passes color
/// identically.
pub fn merge_tags_by_text(
    tags: impl IntoIterator<Item = Tag>,
    mergeable_type: &str,
    merge_distance: f64,
    colors: &mut ColorMap,
) -> NameClusters {
    let mergeable = tags.into_iter().filter(|t| t.ifc_type == mergeable_type);

    group_ordered(mergeable, |t| t.text.clone())
        .into_iter()
        .map(|(text, group)| {
            let color = colors.get_or_insert(&text).to_string();
            let clusters = cluster_by_distance(group, &color, merge_distance);
            (text, clusters)
        })
        .collect()
}

fn cluster_by_distance(tags: Vec<Tag>, color: &str, merge_distance: f64) -> Vec<Vec<Tag>> {
    let mut clusters: Vec<Vec<Tag>> = Vec::new();

    for mut tag in tags {
        tag.color = color.to_string();

        if clusters.iter().flatten().any(|member| member.key == tag.key) {
            tracing::debug!(key = %tag.key, "Tag already in a cluster");
            continue;
        }

        let target = clusters.iter().position(|cluster| {
            cluster
                .iter()
                .any(|member| tag.distance_to(member).is_some_and(|d| d <= merge_distance))
        });
        match target {
            Some(index) => clusters[index].push(tag),
            None => clusters.push(vec![tag]),
        }
    }

    clusters
}

/// Clusters the cached tags of `elements` model by model and concatenates
/// the clusters of equal text across models.
///
/// Elements without a cached tag are skipped.
pub fn merge_by_model(
    elements: &[Entity],
    tags: &TagCache,
    config: &TaggerConfig,
    colors: &mut ColorMap,
) -> NameClusters {
    let mut per_model: Vec<(String, Vec<Tag>)> = Vec::new();

    for (model, model_elements) in group_by_model(elements) {
        let model_tags: Vec<Tag> = model_elements
            .iter()
            .filter_map(|e| tags.get(e.global_id()))
            .cloned()
            .collect();
        let merged = merge_tags_by_text(model_tags, &config.mergeable_type, config.merge_distance, colors);
        tracing::debug!(model = %model, names = merged.len(), "Merged tags by text");

        for (text, clusters) in merged {
            per_model.extend(clusters.into_iter().map(|c| (text.clone(), c)));
        }
    }

    group_ordered(per_model, |(text, _)| text.clone())
        .into_iter()
        .map(|(text, entries)| (text, entries.into_iter().map(|(_, c)| c).collect()))
        .collect()
}

/// Turns clusters into markers and connecting lines.
///
/// Cluster keys are numbered across the whole pass, so every
/// [`TagKey::Merge`] in the output is unique.
pub fn cluster_markers(groups: &NameClusters, label_offset: f64) -> ClusterOutput {
    let mut output = ClusterOutput::default();
    let mut next_key = 0;

    for cluster in groups.iter().flat_map(|(_, clusters)| clusters) {
        if cluster.len() < 2 {
            output.markers.extend(cluster.iter().cloned());
            continue;
        }
        let Some(average) = average_position(cluster) else {
            output.markers.extend(cluster.iter().cloned());
            continue;
        };

        let first = &cluster[0];
        let center = average + Vector3::y() * label_offset;
        let merged = Tag {
            key: TagKey::Merge(next_key),
            text: format!("{} x {}", cluster.len(), first.text),
            position: Some(center),
            color: first.color.clone(),
            ifc_type: first.ifc_type.clone(),
            icon: Some(CLUSTER_ICON.to_string()),
        };
        next_key += 1;

        output.lines.extend(cluster.iter().filter_map(|member| {
            Some(LineSegment {
                start: center,
                end: member.position?,
                color: merged.color.clone(),
            })
        }));
        output.markers.push(merged);
        output.markers.extend(cluster.iter().map(Tag::companion));
    }

    output
}

/// Unweighted mean of the placed tags' positions.
fn average_position(tags: &[Tag]) -> Option<Point3<f64>> {
    let positions: Vec<Point3<f64>> = tags.iter().filter_map(|t| t.position).collect();
    if positions.is_empty() {
        return None;
    }
    let sum = positions.iter().fold(Vector3::zeros(), |acc, p| acc + p.coords);
    Some(Point3::from(sum / positions.len() as f64))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const FASTENER: &str = "IFCMECHANICALFASTENER";

    fn tag(id: &str, text: &str, pos: Option<(f64, f64, f64)>) -> Tag {
        Tag {
            key: TagKey::Element(id.into()),
            text: text.into(),
            position: pos.map(|(x, y, z)| Point3::new(x, y, z)),
            color: "#000000".into(),
            ifc_type: FASTENER.into(),
            icon: None,
        }
    }

    fn sizes(groups: &NameClusters) -> Vec<usize> {
        groups.iter().flat_map(|(_, c)| c.iter().map(Vec::len)).collect()
    }

    fn merge(tags: Vec<Tag>, colors: &mut ColorMap) -> NameClusters {
        merge_tags_by_text(tags, FASTENER, 0.45, colors)
    }

    #[test]
    fn merge_distance_is_inclusive() {
        let mut colors = ColorMap::with_seed(1);
        let at = merge(vec![tag("a", "Bolt", Some((0.0, 0.0, 0.0))), tag("b", "Bolt", Some((0.45, 0.0, 0.0)))], &mut colors);
        assert_eq!(sizes(&at), [2]);

        let beyond = merge(vec![tag("a", "Bolt", Some((0.0, 0.0, 0.0))), tag("b", "Bolt", Some((0.451, 0.0, 0.0)))], &mut colors);
        assert_eq!(sizes(&beyond), [1, 1]);
    }

    #[test]
    fn coincident_tags_merge() {
        let mut colors = ColorMap::with_seed(1);
        let groups = merge(vec![tag("a", "Nut", Some((1.0, 1.0, 1.0))), tag("b", "Nut", Some((1.0, 1.0, 1.0)))], &mut colors);
        assert_eq!(sizes(&groups), [2]);
    }

    #[test]
    fn bolts_form_a_pair_and_a_single() {
        let mut colors = ColorMap::with_seed(1);
        let groups = merge(
            vec![
                tag("a", "Bolt", Some((0.0, 0.0, 0.0))),
                tag("b", "Bolt", Some((0.3, 0.0, 0.0))),
                tag("c", "Bolt", Some((5.0, 0.0, 0.0))),
            ],
            &mut colors,
        );
        assert_eq!(sizes(&groups), [2, 1]);

        let output = cluster_markers(&groups, 0.5);
        let merged = &output.markers[0];
        assert_eq!(merged.key, TagKey::Merge(0));
        assert_eq!(merged.text, "2 x Bolt");
        assert_eq!(merged.icon.as_deref(), Some(CLUSTER_ICON));
        let center = merged.position.unwrap();
        assert_relative_eq!(center.x, 0.15);
        assert_relative_eq!(center.y, 0.5);
        assert_relative_eq!(center.z, 0.0);

        // Two companions, then the untouched single.
        assert_eq!(output.markers.len(), 4);
        assert!(output.markers[1].text.is_empty() && output.markers[2].text.is_empty());
        assert_eq!(output.markers[3].text, "Bolt");
        assert_eq!(output.markers[3].key, TagKey::Element("c".into()));

        assert_eq!(output.lines.len(), 2);
        assert_eq!(output.lines[0].start, center);
        assert_eq!(output.lines[1].end, Point3::new(0.3, 0.0, 0.0));
    }

    #[test]
    fn clustering_is_greedy_and_order_dependent() {
        let mut colors = ColorMap::with_seed(1);
        // "c" is within range of both clusters and joins the first.
        let groups = merge(
            vec![
                tag("a", "Bolt", Some((0.0, 0.0, 0.0))),
                tag("b", "Bolt", Some((0.8, 0.0, 0.0))),
                tag("c", "Bolt", Some((0.4, 0.0, 0.0))),
            ],
            &mut colors,
        );
        let keys: Vec<Vec<String>> = groups[0]
            .1
            .iter()
            .map(|c| c.iter().map(|t| t.key.to_string()).collect())
            .collect();
        assert_eq!(keys, [vec!["a", "c"], vec!["b"]]);
    }

    #[test]
    fn repeated_passes_are_identical() {
        let tags = vec![
            tag("a", "Bolt", Some((0.0, 0.0, 0.0))),
            tag("b", "Bolt", Some((0.2, 0.0, 0.0))),
            tag("c", "Nut", Some((0.0, 0.0, 0.0))),
        ];
        let mut colors = ColorMap::with_seed(9);
        let first = merge(tags.clone(), &mut colors);
        let second = merge(tags, &mut colors);
        assert_eq!(first, second);
        assert_eq!(colors.len(), 2);
        assert_ne!(first[0].1[0][0].color, "#000000");
    }

    #[test]
    fn other_types_and_duplicates_are_skipped() {
        let mut colors = ColorMap::with_seed(1);
        let mut beam = tag("x", "Bolt", Some((0.0, 0.0, 0.0)));
        beam.ifc_type = "IFCBEAM".into();
        let groups = merge(
            vec![beam, tag("a", "Bolt", Some((9.0, 0.0, 0.0))), tag("a", "Bolt", Some((9.0, 0.0, 0.0)))],
            &mut colors,
        );
        assert_eq!(sizes(&groups), [1]);
        assert!(merge(vec![], &mut colors).is_empty());
    }

    #[test]
    fn unplaced_tags_stay_unmerged() {
        let mut colors = ColorMap::with_seed(1);
        let groups = merge(vec![tag("a", "Bolt", None), tag("b", "Bolt", None)], &mut colors);
        assert_eq!(sizes(&groups), [1, 1]);

        let no_positions: NameClusters = vec![("Bolt".into(), vec![vec![tag("a", "Bolt", None), tag("b", "Bolt", None)]])];
        let output = cluster_markers(&no_positions, 0.5);
        assert_eq!(output.markers.len(), 2);
        assert!(output.lines.is_empty());
        assert_eq!(output.markers[0].text, "Bolt");
    }

    #[test]
    fn merge_keys_are_unique_across_names() {
        let groups: NameClusters = vec![
            ("Bolt".into(), vec![vec![tag("a", "Bolt", Some((0.0, 0.0, 0.0))), tag("b", "Bolt", Some((0.1, 0.0, 0.0)))]]),
            ("Nut".into(), vec![vec![tag("c", "Nut", Some((0.0, 0.0, 0.0))), tag("d", "Nut", Some((0.1, 0.0, 0.0)))]]),
        ];
        let output = cluster_markers(&groups, 0.5);
        let merge_keys: Vec<&TagKey> = output
            .markers
            .iter()
            .map(|t| &t.key)
            .filter(|k| matches!(k, TagKey::Merge(_)))
            .collect();
        assert_eq!(merge_keys, [&TagKey::Merge(0), &TagKey::Merge(1)]);
    }

    #[test]
    fn clusters_of_equal_text_are_joined_across_models() {
        let element = |id: &str, model: &str| {
            Entity::builder(id, 1)
                .name("Bolt")
                .ifc_type(FASTENER)
                .model(model)
                .build()
                .unwrap()
        };
        let elements = vec![element("a", "m1"), element("b", "m2"), element("c", "m1")];
        let mut colors = ColorMap::with_seed(1);
        let mut cache = TagCache::new();
        // Same spot in both models: still separate clusters.
        cache.rebuild(&elements, &mut colors, |_| Some(Point3::origin()));

        let groups = merge_by_model(&elements, &cache, &TaggerConfig::default(), &mut colors);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].0, "Bolt");
        assert_eq!(sizes(&groups), [2, 1]);
    }
}
