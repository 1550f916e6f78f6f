//! The raw observations and ground truth of one take.

use crate::{common::*, GroundTruth, Node, SceneGraph};

const OBJECTS_DIR: &str = "3d_objects";
const RELATIONS_DIR: &str = "spatial_relations";

/// The ground truth file of one take.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroundTruthFile {
    pub left_hand: GroundTruth,
    pub right_hand: GroundTruth,
}

impl GroundTruthFile {
    pub fn load(path: impl AsRef<Path>, policy: &RetryPolicy) -> Result<Self> {
        let path = path.as_ref();
        let text = policy.run(format!("reading '{}'", path.display()), || {
            Ok(fs::read_to_string(path)?)
        })?;
        let file = serde_json::from_str(&text)
            .with_context(|| format!("failed to parse ground truth '{}'", path.display()))?;
        Ok(file)
    }
}

/// Per-frame objects and relations of one take with the actions of both
/// hands.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recording {
    objects: Vec<Vec<ObjectObservation>>,
    relations: Vec<Vec<RelationObservation>>,
    ground_truth_left: GroundTruth,
    ground_truth_right: GroundTruth,
}

impl Recording {
    pub fn new(
        objects: Vec<Vec<ObjectObservation>>,
        relations: Vec<Vec<RelationObservation>>,
        ground_truth_left: GroundTruth,
        ground_truth_right: GroundTruth,
    ) -> Result<Self> {
        ensure!(
            objects.len() == relations.len(),
            "expect objects and relations for the same number of frames, but found {} and {}",
            objects.len(),
            relations.len()
        );

        Ok(Self {
            objects,
            relations,
            ground_truth_left,
            ground_truth_right,
        })
    }

    /// Loads a take from its derived data directory and ground truth file.
    ///
    /// The frame count is the number of files in `spatial_relations`.
    pub fn load(
        derived_data_dir: impl AsRef<Path>,
        ground_truth_file: impl AsRef<Path>,
        policy: &RetryPolicy,
    ) -> Result<Self> {
        let derived_data_dir = derived_data_dir.as_ref();
        let ground_truth_file = ground_truth_file.as_ref();
        ensure!(
            derived_data_dir.is_dir(),
            "derived data directory '{}' does not exist",
            derived_data_dir.display()
        );
        ensure!(
            ground_truth_file.is_file(),
            "ground truth file '{}' does not exist",
            ground_truth_file.display()
        );

        let relations_dir = derived_data_dir.join(RELATIONS_DIR);
        let frame_count = fs::read_dir(&relations_dir)
            .with_context(|| format!("failed to list '{}'", relations_dir.display()))?
            .count();
        debug!(
            "found {} frames in '{}'",
            frame_count,
            derived_data_dir.display()
        );

        let objects =
            load_series::<ObjectRecord, _>(&derived_data_dir.join(OBJECTS_DIR), frame_count, policy)?;
        let relations = load_series::<RelationRecord, _>(&relations_dir, frame_count, policy)?;
        let GroundTruthFile {
            left_hand,
            right_hand,
        } = GroundTruthFile::load(ground_truth_file, policy)?;

        Self::new(objects, relations, left_hand, right_hand)
    }

    pub fn frame_count(&self) -> usize {
        self.relations.len()
    }

    pub fn objects(&self, frame: usize) -> Option<&[ObjectObservation]> {
        self.objects.get(frame).map(|objects| objects.as_slice())
    }

    pub fn relations(&self, frame: usize) -> Option<&[RelationObservation]> {
        self.relations.get(frame).map(|relations| relations.as_slice())
    }

    pub fn ground_truth(&self, side: HandSide) -> &GroundTruth {
        match side {
            HandSide::Left => &self.ground_truth_left,
            HandSide::Right => &self.ground_truth_right,
        }
    }

    pub fn check_integrity(&self) -> Result<()> {
        let frame_count = self.frame_count();

        ensure!(
            self.objects.len() == frame_count,
            "expect objects for {} frames, but found {}",
            frame_count,
            self.objects.len()
        );
        for side in [HandSide::Left, HandSide::Right] {
            let gt = self.ground_truth(side);
            ensure!(
                gt.first() == 0,
                "expect {} ground truth to start at frame 0, but it starts at {}",
                side.as_ref(),
                gt.first()
            );
            let len = gt.len();
            ensure!(
                len == frame_count,
                "expect {} ground truth to cover {} frames, but it covers {}",
                side.as_ref(),
                frame_count,
                len
            );
        }

        for (frame, (objects, relations)) in self.objects.iter().zip(&self.relations).enumerate() {
            let mut names = HashSet::new();
            if let Some(obj) = objects
                .iter()
                .find(|obj| !names.insert(obj.instance_name.as_str()))
            {
                bail!(
                    "instance name '{}' appears twice in frame {}",
                    obj.instance_name,
                    frame
                );
            }

            for rel in relations {
                let (subject, object) = rel.pair();
                ensure!(
                    subject != object,
                    "relation '{}' of frame {} connects object {} to itself",
                    rel.relation().as_ref(),
                    frame,
                    subject
                );
                ensure!(
                    subject < objects.len() && object < objects.len(),
                    "relation ({}, {}) of frame {} refers to a missing object, the frame has {} objects",
                    subject,
                    object,
                    frame,
                    objects.len()
                );
            }
        }

        Ok(())
    }

    /// Builds the graph of one frame.
    ///
    /// Node ids are positions in the object list. Relations between the same
    /// ordered pair share one edge.
    pub fn to_scene_graph(&self, frame: usize) -> Result<SceneGraph> {
        self.check_frame(frame)?;

        let nodes = self.objects[frame]
            .iter()
            .enumerate()
            .map(|(id, obj)| (id, Node::from(obj)))
            .collect();
        let mut edges: IndexMap<_, Vec<_>> = IndexMap::new();
        for rel in &self.relations[frame] {
            edges.entry(rel.pair()).or_default().push(rel.relation());
        }

        Ok(SceneGraph {
            right_action: self.ground_truth_right.lookup(frame)?,
            left_action: self.ground_truth_left.lookup(frame)?,
            nodes,
            edges,
        })
    }

    /// The graphs of the last `history_size` frames up to `frame`, oldest
    /// first. Frames before the first one are left out, and a zero
    /// `history_size` gives no graphs.
    pub fn to_scene_graph_window(
        &self,
        frame: usize,
        history_size: usize,
    ) -> Result<Vec<SceneGraph>> {
        self.check_frame(frame)?;
        let first = (frame + 1).saturating_sub(history_size);
        (first..=frame)
            .map(|index| self.to_scene_graph(index))
            .try_collect()
    }

    fn check_frame(&self, frame: usize) -> Result<()> {
        ensure!(
            frame < self.frame_count(),
            "frame {} is out of range, the recording has {} frames",
            frame,
            self.frame_count()
        );
        Ok(())
    }
}

/// Loads `frame_{i}.json` for each frame of a directory and converts the
/// records.
fn load_series<R, T>(dir: &Path, frame_count: usize, policy: &RetryPolicy) -> Result<Vec<Vec<T>>>
where
    R: DeserializeOwned,
    T: TryFrom<R, Error = Error>,
{
    let frame_path = |frame: usize| dir.join(format!("frame_{}.json", frame));

    let series: Vec<Vec<T>> = (0..frame_count)
        .map(|frame| -> Result<_> {
            let path = frame_path(frame);
            let text = policy.run(format!("reading '{}'", path.display()), || {
                Ok(fs::read_to_string(&path)?)
            })?;
            let records: Vec<R> = serde_json::from_str(&text)
                .with_context(|| format!("failed to parse '{}'", path.display()))?;
            let items: Vec<T> = records
                .into_iter()
                .map(T::try_from)
                .try_collect()
                .with_context(|| format!("invalid record in '{}'", path.display()))?;
            Ok(items)
        })
        .try_collect()?;

    let extra = frame_path(frame_count);
    ensure!(
        !extra.exists(),
        "'{}' exists beyond the counted {} frames",
        extra.display(),
        frame_count
    );

    Ok(series)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bbox(x0: f64) -> Cuboid<f64> {
        Cuboid::try_from_bounds([x0, x0 + 1.0, 0.0, 1.0, 0.0, 1.0]).unwrap()
    }

    fn recording(frame_count: usize) -> Recording {
        let objects = (0..frame_count)
            .map(|_| {
                vec![
                    ObjectObservation::new(ObjectClass::RightHand, "right_hand_0")
                        .with_bbox(bbox(0.0)),
                    ObjectObservation::new(ObjectClass::Sponge, "sponge_1").with_bbox(bbox(2.0)),
                ]
            })
            .collect();
        let relations = (0..frame_count)
            .map(|_| {
                vec![
                    RelationObservation::new(0, 1, RelationKind::Contact).unwrap(),
                    RelationObservation::new(1, 0, RelationKind::Contact).unwrap(),
                    RelationObservation::new(0, 1, RelationKind::LeftOf).unwrap(),
                ]
            })
            .collect();
        let frames = vec![Some(Action::Wipe); frame_count];
        let gt = GroundTruth::from_frames(&frames).unwrap();
        Recording::new(objects, relations, gt.clone(), gt).unwrap()
    }

    #[test]
    fn relations_are_grouped_per_pair() {
        let graph = recording(3).to_scene_graph(1).unwrap();
        assert_eq!(graph.num_nodes(), 2);
        assert_eq!(graph.nodes[&1].instance_name, "sponge_1");
        assert_eq!(graph.nodes[&1].bbox, [2.0, 3.0, 0.0, 1.0, 0.0, 1.0]);
        assert_eq!(graph.edges.keys().copied().collect_vec(), vec![(0, 1), (1, 0)]);
        assert_eq!(
            graph.edges[&(0, 1)],
            vec![RelationKind::Contact, RelationKind::LeftOf]
        );
        assert_eq!(graph.right_action, Some(Action::Wipe));
        assert!(recording(3).to_scene_graph(3).is_err());
    }

    #[test]
    fn window_bounds() {
        let rec = recording(5);
        assert_eq!(rec.to_scene_graph_window(4, 3).unwrap().len(), 3);
        assert_eq!(rec.to_scene_graph_window(1, 3).unwrap().len(), 2);
        assert_eq!(rec.to_scene_graph_window(0, 10).unwrap().len(), 1);
        assert!(rec.to_scene_graph_window(5, 3).is_err());
    }

    #[test]
    fn zero_history_gives_empty_window() {
        let rec = recording(4);
        assert!(rec.to_scene_graph_window(2, 0).unwrap().is_empty());
        assert!(rec.to_scene_graph_window(0, 0).unwrap().is_empty());
        assert!(rec.to_scene_graph_window(4, 0).is_err());
    }

    #[test]
    fn integrity_checks() {
        recording(2).check_integrity().unwrap();

        let mut duplicated = recording(2);
        duplicated.objects[1][1].instance_name = "right_hand_0".into();
        assert!(duplicated.check_integrity().is_err());

        let mut dangling = recording(2);
        dangling.relations[0].push(RelationObservation::new(0, 2, RelationKind::Above).unwrap());
        assert!(dangling.check_integrity().is_err());

        let short_gt = GroundTruth::from_frames(&[None]).unwrap();
        let mut short = recording(2);
        short.ground_truth_left = short_gt;
        assert!(short.check_integrity().is_err());

        let late_gt = GroundTruth::new(vec![Some(1), Some(Action::Hold.index()), Some(2)]).unwrap();
        assert_eq!(late_gt.len(), 3);
        let mut late = recording(3);
        late.ground_truth_right = late_gt;
        assert!(late.check_integrity().is_err());

        let gt = short.ground_truth_right;
        assert!(Recording::new(vec![vec![]], vec![], gt.clone(), gt).is_err());
    }

    #[test]
    fn load_from_files() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let derived = dir.path().join("take_0");
        fs::create_dir_all(derived.join(OBJECTS_DIR))?;
        fs::create_dir_all(derived.join(RELATIONS_DIR))?;

        let object = r#"{
            "certainty": 1.0, "class_index": 10, "class_name": "sponge", "instance_name": "sponge_1",
            "bounding_box": {"x0": 0, "x1": 1, "y0": 0, "y1": 1, "z0": 0, "z1": 1},
            "past_bounding_box": {"x0": 0, "x1": 1, "y0": 0, "y1": 1, "z0": 0, "z1": 1}
        }"#;
        let hand = object
            .replace("\"sponge\"", "\"LeftHand\"")
            .replace("sponge_1", "LeftHand_0");
        for frame in 0..2 {
            fs::write(
                derived.join(OBJECTS_DIR).join(format!("frame_{}.json", frame)),
                format!("[{}, {}]", hand, object),
            )?;
            fs::write(
                derived.join(RELATIONS_DIR).join(format!("frame_{}.json", frame)),
                r#"[{"subject_index": 0, "object_index": 1, "relation_name": "getting close"}]"#,
            )?;
        }
        let gt_file = dir.path().join("take_0.json");
        fs::write(&gt_file, r#"{"left_hand": [0, 1, 1], "right_hand": [0, null, 1]}"#)?;

        let policy = RetryPolicy::fixed(1, std::time::Duration::from_millis(0));
        let rec = Recording::load(&derived, &gt_file, &policy)?;
        rec.check_integrity()?;
        assert_eq!(rec.frame_count(), 2);

        let graph = rec.to_scene_graph(1)?;
        assert_eq!(graph.nodes[&0].class, ObjectClass::LeftHand);
        assert_eq!(graph.nodes[&1].class, ObjectClass::Sponge);
        assert_eq!(graph.edges[&(0, 1)], vec![RelationKind::GettingClose]);
        assert_eq!(graph.left_action, Some(Action::Approach));
        assert_eq!(graph.right_action, None);

        // a frame beyond the counted ones means the count is wrong
        fs::write(derived.join(OBJECTS_DIR).join("frame_2.json"), "[]")?;
        assert!(Recording::load(&derived, &gt_file, &policy).is_err());

        assert!(Recording::load(dir.path().join("missing"), &gt_file, &policy).is_err());
        assert!(Recording::load(&derived, dir.path().join("missing.json"), &policy).is_err());
        Ok(())
    }
}
