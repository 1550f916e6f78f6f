//! Feature views applied to cached graphs at load time.

use crate::{common::*, GraphDict, BBOX_FEATURES};

/// The number of centroid-offset values that replace the bounding box in
/// the centroid view.
pub const EXTENT_FEATURES: usize = 3;

/// Selects which node and edge features a loaded graph exposes.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    AsRefStr,
    EnumString,
    EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ViewMode {
    /// Class-only nodes, all relations.
    Normal,
    /// Class-only nodes, contact and temporal relations.
    Contact,
    /// Class and box extent nodes, temporal relations only.
    Centroids,
}

impl ViewMode {
    pub fn apply(self, graph: GraphDict) -> Result<GraphDict> {
        graph.check_layout(ObjectClass::COUNT + BBOX_FEATURES)?;

        match self {
            Self::Normal => normal_view(graph),
            Self::Contact => contact_view(graph),
            Self::Centroids => centroids_view(graph),
        }
    }

    /// The length of node feature vectors after the view is applied.
    pub fn node_features(self) -> usize {
        match self {
            Self::Normal | Self::Contact => ObjectClass::COUNT,
            Self::Centroids => ObjectClass::COUNT + EXTENT_FEATURES,
        }
    }
}

fn normal_view(mut graph: GraphDict) -> Result<GraphDict> {
    strip_bboxes(&mut graph.nodes);
    Ok(graph)
}

fn contact_view(mut graph: GraphDict) -> Result<GraphDict> {
    censor_edges(&mut graph.edges, &[RelationKind::Contact, RelationKind::Temporal]);
    normal_view(graph)
}

fn centroids_view(mut graph: GraphDict) -> Result<GraphDict> {
    censor_edges(&mut graph.edges, &[RelationKind::Temporal]);

    graph.nodes.iter_mut().for_each(|node| {
        let offset = ObjectClass::COUNT;
        let extent = [
            node[offset + 1] - node[offset],
            node[offset + 3] - node[offset + 2],
            node[offset + 5] - node[offset + 4],
        ];
        node.truncate(offset);
        node.extend(extent);
    });

    Ok(graph)
}

/// Cuts the trailing bounding box values off every node.
fn strip_bboxes(nodes: &mut [Vec<f32>]) {
    nodes
        .iter_mut()
        .for_each(|node| node.truncate(ObjectClass::COUNT));
}

/// Zeroes every relation channel not listed in `keep`.
fn censor_edges(edges: &mut [Vec<f32>], keep: &[RelationKind]) {
    let censored: Vec<usize> = RelationKind::iter()
        .filter(|relation| !keep.contains(relation))
        .map(|relation| relation.index())
        .collect();

    edges.iter_mut().for_each(|edge| {
        censored.iter().for_each(|&index| edge[index] = 0.0);
    });
}
