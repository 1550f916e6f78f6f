//! Merging a window of consecutive frame graphs into one temporal graph.

use crate::{common::*, NodeId, SceneGraph};

/// Merges frame graphs, oldest first, into one graph.
///
/// Nodes are renumbered by frame and then by their original id. Every
/// spatial edge is kept as is. Each node is linked to the node of the
/// previous frame with the same instance name by an edge carrying only the
/// temporal relation. The actions are those of the most recent frame.
pub fn flatten(window: &[SceneGraph]) -> Result<SceneGraph> {
    let last = window
        .last()
        .ok_or_else(|| format_err!("cannot flatten an empty window"))?;

    let mut flat = SceneGraph {
        right_action: last.right_action,
        left_action: last.left_action,
        ..Default::default()
    };

    // (frame, original id) -> new id
    let mut id_map: HashMap<(usize, NodeId), NodeId> = HashMap::new();

    for (frame, graph) in window.iter().enumerate() {
        for (&id, node) in graph.nodes.iter().sorted_by_key(|(&id, _)| id) {
            let new_id = flat.nodes.len();
            id_map.insert((frame, id), new_id);
            flat.nodes.insert(new_id, node.clone());
        }
    }

    let remap = |frame: usize, id: NodeId| -> Result<NodeId> {
        id_map
            .get(&(frame, id))
            .copied()
            .ok_or_else(|| format_err!("frame {} has an edge to missing node {}", frame, id))
    };

    for (frame, graph) in window.iter().enumerate() {
        for (&(sender, receiver), relations) in &graph.edges {
            let pair = (remap(frame, sender)?, remap(frame, receiver)?);
            flat.edges.insert(pair, relations.clone());
        }
    }

    for (frame, (past, current)) in window.iter().tuple_windows().enumerate() {
        let frame = frame + 1;

        let current_nodes = current.nodes.iter().sorted_by_key(|(&id, _)| id);
        for (&id, node) in current_nodes {
            let matches = past
                .nodes
                .iter()
                .sorted_by_key(|(&id, _)| id)
                .filter(|(_, past_node)| past_node.instance_name == node.instance_name);

            for (&past_id, past_node) in matches {
                if past_node.class != node.class {
                    warn!(
                        "instance '{}' changes class from {} to {} at frame {} of the window",
                        node.instance_name,
                        past_node.class.as_ref(),
                        node.class.as_ref(),
                        frame
                    );
                }
                let pair = (remap(frame, id)?, remap(frame - 1, past_id)?);
                flat.edges.insert(pair, vec![RelationKind::Temporal]);
            }
        }
    }

    flat.check_integrity()?;
    Ok(flat)
}
