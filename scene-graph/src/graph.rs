//! The scene graph of one frame or one flattened window.

use crate::common::*;

pub type NodeId = usize;

/// An object node.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub class: ObjectClass,
    pub instance_name: String,
    /// `[x0, x1, y0, y1, z0, z1]`
    pub bbox: [f64; 6],
}

impl Node {
    pub fn new(class: ObjectClass, instance_name: impl Into<String>, bbox: [f64; 6]) -> Self {
        Self {
            class,
            instance_name: instance_name.into(),
            bbox,
        }
    }
}

impl From<&ObjectObservation> for Node {
    fn from(from: &ObjectObservation) -> Self {
        Self::new(from.class, from.instance_name.clone(), from.bbox.bounds())
    }
}

/// A directed multi-relational graph labelled with the actions of both hands.
///
/// Node ids must form the dense range `0..N`. The maps keep insertion order,
/// which is the order of nodes and edges in the encoded form. Equality does
/// not depend on that order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SceneGraph {
    pub right_action: Option<Action>,
    pub left_action: Option<Action>,
    pub nodes: IndexMap<NodeId, Node>,
    pub edges: IndexMap<(NodeId, NodeId), Vec<RelationKind>>,
}

impl SceneGraph {
    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    pub fn num_edges(&self) -> usize {
        self.edges.len()
    }

    pub fn check_integrity(&self) -> Result<()> {
        let num_nodes = self.nodes.len();

        if let Some(&id) = self.nodes.keys().find(|&&id| id >= num_nodes) {
            bail!(
                "node id {} breaks the dense id range 0..{}",
                id,
                num_nodes
            );
        }
        if let Some(&(sender, receiver)) = self
            .edges
            .keys()
            .find(|(sender, receiver)| {
                !self.nodes.contains_key(sender) || !self.nodes.contains_key(receiver)
            })
        {
            bail!(
                "edge ({}, {}) refers to a missing node",
                sender,
                receiver
            );
        }

        Ok(())
    }

    /// Swaps the hand actions, the hand classes and the left/right relations.
    ///
    /// Mirroring twice gives back the same graph.
    pub fn mirrored(&self) -> Self {
        let nodes = self
            .nodes
            .iter()
            .map(|(&id, node)| {
                let node = Node {
                    class: node.class.mirrored(),
                    ..node.clone()
                };
                (id, node)
            })
            .collect();
        let edges = self
            .edges
            .iter()
            .map(|(&pair, relations)| {
                let relations = relations
                    .iter()
                    .map(|relation| relation.mirrored())
                    .collect();
                (pair, relations)
            })
            .collect();

        Self {
            right_action: self.left_action,
            left_action: self.right_action,
            nodes,
            edges,
        }
    }

    /// Encodes the graph for the right hand, or for the left hand on the
    /// mirrored graph if `mirrored` is set.
    pub fn encode(&self, mirrored: bool) -> Result<GraphDict> {
        let graph = if mirrored {
            Cow::Owned(self.mirrored())
        } else {
            Cow::Borrowed(self)
        };

        let globals = one_hot(
            Action::COUNT,
            &graph.right_action.map(Action::index).into_iter().collect_vec(),
        )?;
        let nodes: Vec<_> = graph
            .nodes
            .values()
            .map(|node| -> Result<_> {
                let mut features = one_hot(ObjectClass::COUNT, &[node.class.index()])?;
                features.extend(node.bbox.iter().map(|&value| value as f32));
                Ok(features)
            })
            .try_collect()?;
        let edges: Vec<_> = graph
            .edges
            .values()
            .map(|relations| {
                let indices = relations.iter().map(|relation| relation.index()).collect_vec();
                one_hot(RelationKind::COUNT, &indices)
            })
            .try_collect()?;
        let (senders, receivers) = graph.edges.keys().copied().unzip();

        Ok(GraphDict {
            globals,
            nodes,
            edges,
            senders,
            receivers,
        })
    }
}

/// A vector of `length` zeros with ones at `indices`.
///
/// More than one index is allowed, giving a multi-hot vector.
pub fn one_hot(length: usize, indices: &[usize]) -> Result<Vec<f32>> {
    let mut output = vec![0.0; length];
    for &index in indices {
        ensure!(
            index < length,
            "index {} is out of range for a one-hot vector of length {}",
            index,
            length
        );
        output[index] = 1.0;
    }
    Ok(output)
}
