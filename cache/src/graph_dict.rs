use crate::common::*;
use std::io::Write as _;

/// The number of trailing bounding box values in a freshly encoded node.
pub const BBOX_FEATURES: usize = 6;

/// The flat tensor-dict form of a scene graph.
///
/// `senders[i]` and `receivers[i]` are the endpoints of `edges[i]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphDict {
    /// One-hot action vector, all zero if the action is unknown.
    pub globals: Vec<f32>,
    /// Per-node features, the one-hot class followed by view-dependent values.
    pub nodes: Vec<Vec<f32>>,
    /// Per-edge multi-hot relation vectors.
    pub edges: Vec<Vec<f32>>,
    pub senders: Vec<usize>,
    pub receivers: Vec<usize>,
}

impl GraphDict {
    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    pub fn num_edges(&self) -> usize {
        self.edges.len()
    }

    /// Checks the layout produced by the scene graph encoder.
    pub fn check_layout(&self, node_features: usize) -> Result<()> {
        let Self {
            globals,
            nodes,
            edges,
            senders,
            receivers,
        } = self;

        ensure!(
            globals.len() == Action::COUNT,
            "expect {} global features, but found {}",
            Action::COUNT,
            globals.len()
        );
        ensure!(
            senders.len() == edges.len() && receivers.len() == edges.len(),
            "senders ({}), receivers ({}) and edges ({}) must have equal lengths",
            senders.len(),
            receivers.len(),
            edges.len()
        );
        if let Some((index, node)) = nodes
            .iter()
            .enumerate()
            .find(|(_, node)| node.len() != node_features)
        {
            bail!(
                "node {} has {} features, but expect {}",
                index,
                node.len(),
                node_features
            );
        }
        if let Some((index, edge)) = edges
            .iter()
            .enumerate()
            .find(|(_, edge)| edge.len() != RelationKind::COUNT)
        {
            bail!(
                "edge {} has {} features, but expect {}",
                index,
                edge.len(),
                RelationKind::COUNT
            );
        }
        if let Some(&id) = senders
            .iter()
            .chain(receivers.iter())
            .find(|&&id| id >= nodes.len())
        {
            bail!(
                "edge endpoint {} refers to a missing node, the graph has {} nodes",
                id,
                nodes.len()
            );
        }

        Ok(())
    }

    pub fn read_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)
            .with_context(|| format!("failed to open '{}'", path.display()))?;
        let reader = BufReader::new(file);
        let graph = bincode::deserialize_from(reader)
            .with_context(|| format!("failed to decode '{}'", path.display()))?;
        Ok(graph)
    }

    pub fn write_to(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let file = File::create(path)
            .with_context(|| format!("failed to create '{}'", path.display()))?;
        let mut writer = BufWriter::new(file);
        bincode::serialize_into(&mut writer, self)
            .with_context(|| format!("failed to encode '{}'", path.display()))?;
        writer.flush()?;
        Ok(())
    }
}
