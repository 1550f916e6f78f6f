//! Two-pass dataset generation.
//!
//! The symbolic pass loads every take into a [SymbolicDataset] and stores
//! it in one file. The windowed pass turns each frame of each take into a
//! flattened graph and writes its right and left hand encodings.

use crate::{common::*, flatten, Recording};
use std::io::Write as _;

const DERIVED_DATA_DIR: &str = "bimacs_derived_data";
const GROUND_TRUTH_DIR: &str = "bimacs_rgbd_data_ground_truth";
const CACHE_DIR: &str = "dataset_caches";
const SYMBOLIC_CACHE_FILE: &str = "symbolic_dataset.cache";
const STAGING_SUFFIX: &str = "partial";

/// Locations of the raw dataset and the generated caches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetLayout {
    /// The raw dataset root.
    pub dataset_dir: PathBuf,
    /// The directory receiving `dataset_caches`.
    pub base_dir: PathBuf,
}

impl DatasetLayout {
    pub fn new(dataset_dir: impl AsRef<Path>, base_dir: impl AsRef<Path>) -> Self {
        Self {
            dataset_dir: dataset_dir.as_ref().to_owned(),
            base_dir: base_dir.as_ref().to_owned(),
        }
    }

    pub fn derived_data_dir(&self, take_id: &TakeId) -> PathBuf {
        self.dataset_dir
            .join(DERIVED_DATA_DIR)
            .join(take_id.relative_dir())
    }

    pub fn ground_truth_file(&self, take_id: &TakeId) -> PathBuf {
        self.dataset_dir
            .join(GROUND_TRUTH_DIR)
            .join(take_id.relative_dir())
            .with_extension("json")
    }

    pub fn cache_root(&self) -> PathBuf {
        self.base_dir.join(CACHE_DIR)
    }

    pub fn symbolic_cache_file(&self) -> PathBuf {
        self.cache_root().join(SYMBOLIC_CACHE_FILE)
    }

    /// The directory of encoded graphs built with `history_size`.
    pub fn config_dir(&self, history_size: usize) -> PathBuf {
        self.cache_root()
            .join(cache::history_config_name(history_size))
    }

    /// The directory the windowed pass writes into before it is moved to
    /// [config_dir](Self::config_dir).
    pub fn staging_dir(&self, history_size: usize) -> PathBuf {
        self.cache_root().join(format!(
            "{}.{}",
            cache::history_config_name(history_size),
            STAGING_SUFFIX
        ))
    }
}

/// Recordings indexed by subject, task and take.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SymbolicDataset {
    recordings: IndexMap<Subject, IndexMap<Task, IndexMap<Take, Recording>>>,
}

impl SymbolicDataset {
    pub fn insert(&mut self, take_id: TakeId, recording: Recording) -> Option<Recording> {
        let TakeId {
            subject,
            task,
            take,
        } = take_id;
        self.recordings
            .entry(subject)
            .or_default()
            .entry(task)
            .or_default()
            .insert(take, recording)
    }

    pub fn get(&self, take_id: &TakeId) -> Option<&Recording> {
        self.recordings
            .get(&take_id.subject)?
            .get(&take_id.task)?
            .get(&take_id.take)
    }

    /// Iterates the recordings in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (TakeId, &Recording)> {
        self.recordings.iter().flat_map(|(&subject, tasks)| {
            tasks.iter().flat_map(move |(&task, takes)| {
                takes.iter().map(move |(&take, recording)| {
                    let take_id = TakeId {
                        subject,
                        task,
                        take,
                    };
                    (take_id, recording)
                })
            })
        })
    }

    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)
            .with_context(|| format!("failed to open '{}'", path.display()))?;
        let dataset = bincode::deserialize_from(BufReader::new(file))
            .with_context(|| format!("failed to decode symbolic dataset '{}'", path.display()))?;
        Ok(dataset)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let file = File::create(path)
            .with_context(|| format!("failed to create '{}'", path.display()))?;
        let mut writer = BufWriter::new(file);
        bincode::serialize_into(&mut writer, self)
            .with_context(|| format!("failed to encode symbolic dataset '{}'", path.display()))?;
        writer.flush()?;
        Ok(())
    }
}

/// Loads and checks the recordings of the given takes and stores them in the
/// symbolic cache file.
pub fn generate_symbolic<I>(
    layout: &DatasetLayout,
    take_ids: I,
    policy: &RetryPolicy,
) -> Result<SymbolicDataset>
where
    I: IntoIterator<Item = TakeId>,
{
    let mut dataset = SymbolicDataset::default();

    for take_id in take_ids {
        info!("loading recording {}", take_id);
        let recording = Recording::load(
            layout.derived_data_dir(&take_id),
            layout.ground_truth_file(&take_id),
            policy,
        )
        .with_context(|| format!("failed to load recording {}", take_id))?;
        recording
            .check_integrity()
            .with_context(|| format!("recording {} is invalid", take_id))?;
        dataset.insert(take_id, recording);
    }

    let cache_file = layout.symbolic_cache_file();
    fs::create_dir_all(layout.cache_root())?;
    dataset.save(&cache_file)?;
    info!(
        "saved {} recordings to '{}'",
        dataset.len(),
        cache_file.display()
    );

    Ok(dataset)
}

/// Opens the symbolic cache if present, otherwise generates it over every
/// take of the dataset.
pub fn load_or_generate_symbolic(
    layout: &DatasetLayout,
    policy: &RetryPolicy,
) -> Result<SymbolicDataset> {
    let cache_file = layout.symbolic_cache_file();

    if cache_file.is_file() {
        info!("loading symbolic dataset from '{}'", cache_file.display());
        SymbolicDataset::open(&cache_file)
    } else {
        generate_symbolic(layout, crawl(), policy)
    }
}

/// Writes the encoded graph of every frame of every take for one history
/// size, and returns the number of written files.
///
/// The history size directory must not exist yet. Files are written to a
/// staging directory that is renamed once every take is written, and removed
/// if any take fails.
pub fn generate_dataset(
    symbolic: &SymbolicDataset,
    layout: &DatasetLayout,
    history_size: usize,
    policy: &RetryPolicy,
) -> Result<usize> {
    ensure!(
        history_size > 0,
        "history size must be positive, a zero history gives empty windows"
    );
    let config_dir = layout.config_dir(history_size);
    ensure!(
        !config_dir.exists(),
        "'{}' already exists, refuse to overwrite it",
        config_dir.display()
    );

    let staging_dir = layout.staging_dir(history_size);
    ensure!(
        !staging_dir.exists(),
        "'{}' is left over from an interrupted run, remove it first",
        staging_dir.display()
    );
    fs::create_dir_all(&staging_dir)
        .with_context(|| format!("failed to create '{}'", staging_dir.display()))?;

    let num_files = match write_windows(symbolic, &staging_dir, history_size, policy) {
        Ok(num_files) => num_files,
        Err(err) => {
            if let Err(cleanup_err) = fs::remove_dir_all(&staging_dir) {
                warn!(
                    "failed to remove '{}': {}",
                    staging_dir.display(),
                    cleanup_err
                );
            }
            return Err(err);
        }
    };

    fs::rename(&staging_dir, &config_dir).with_context(|| {
        format!(
            "failed to move '{}' to '{}'",
            staging_dir.display(),
            config_dir.display()
        )
    })?;

    info!(
        "wrote {} files to '{}'",
        num_files,
        config_dir.display()
    );
    Ok(num_files)
}

fn write_windows(
    symbolic: &SymbolicDataset,
    output_dir: &Path,
    history_size: usize,
    policy: &RetryPolicy,
) -> Result<usize> {
    let mut num_files = 0;

    for (take_id, recording) in symbolic.iter().sorted_by_key(|(take_id, _)| *take_id) {
        recording
            .check_integrity()
            .with_context(|| format!("recording {} is invalid", take_id))?;
        info!(
            "writing {} frames of {}",
            recording.frame_count(),
            take_id
        );

        for frame in 0..recording.frame_count() {
            let encode = || -> Result<_> {
                let window = recording.to_scene_graph_window(frame, history_size)?;
                let graph = flatten(&window)?;
                graph.check_integrity()?;
                Ok([
                    (HandSide::Right, graph.encode(false)?),
                    (HandSide::Left, graph.encode(true)?),
                ])
            };
            let encoded = encode()
                .with_context(|| format!("failed to encode frame {} of {}", frame, take_id))?;

            for (side, dict) in encoded {
                let key = CacheKey {
                    take_id,
                    frame,
                    side,
                };
                cache::write_entry(output_dir, &key, &dict, policy)?;
                num_files += 1;
            }
        }
    }

    Ok(num_files)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn take_id(subject: usize, task: Task, take: usize) -> TakeId {
        TakeId {
            subject: Subject::new(subject).unwrap(),
            task,
            take: Take::new(take).unwrap(),
        }
    }

    #[test]
    fn layout_paths() {
        let layout = DatasetLayout::new("/data/bimacs", "/work");
        let id = take_id(2, Task::Wiping, 3);
        assert_eq!(
            layout.derived_data_dir(&id),
            Path::new("/data/bimacs/bimacs_derived_data/subject_2/task_4_k_wiping/take_3")
        );
        assert_eq!(
            layout.ground_truth_file(&id),
            Path::new("/data/bimacs/bimacs_rgbd_data_ground_truth/subject_2/task_4_k_wiping/take_3.json")
        );
        assert_eq!(
            layout.symbolic_cache_file(),
            Path::new("/work/dataset_caches/symbolic_dataset.cache")
        );
        assert_eq!(layout.config_dir(10), Path::new("/work/dataset_caches/h10"));
        assert_eq!(
            layout.staging_dir(10),
            Path::new("/work/dataset_caches/h10.partial")
        );
    }

    #[test]
    fn symbolic_dataset_is_nested_by_take() {
        let gt = crate::GroundTruth::from_frames(&[None]).unwrap();
        let recording = Recording::new(vec![vec![]], vec![vec![]], gt.clone(), gt).unwrap();

        let mut dataset = SymbolicDataset::default();
        assert!(dataset.is_empty());
        dataset.insert(take_id(1, Task::Cooking, 0), recording.clone());
        dataset.insert(take_id(1, Task::Cooking, 1), recording.clone());
        dataset.insert(take_id(4, Task::Sawing, 9), recording.clone());
        assert!(dataset
            .insert(take_id(1, Task::Cooking, 1), recording.clone())
            .is_some());

        assert_eq!(dataset.len(), 3);
        assert_eq!(dataset.get(&take_id(4, Task::Sawing, 9)), Some(&recording));
        assert_eq!(dataset.get(&take_id(4, Task::Sawing, 8)), None);
        assert_eq!(
            dataset.iter().map(|(id, _)| id).collect_vec(),
            vec![
                take_id(1, Task::Cooking, 0),
                take_id(1, Task::Cooking, 1),
                take_id(4, Task::Sawing, 9)
            ]
        );
    }

    fn one_cup_recording(ground_truth: crate::GroundTruth) -> Recording {
        let objects = vec![vec![ObjectObservation::new(ObjectClass::Cup, "cup_0")]; 3];
        Recording::new(objects, vec![vec![]; 3], ground_truth.clone(), ground_truth).unwrap()
    }

    #[test]
    fn failed_take_leaves_no_output() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let layout = DatasetLayout::new(dir.path(), dir.path());
        let policy = RetryPolicy::fixed(1, std::time::Duration::from_millis(0));
        let valid_gt = crate::GroundTruth::from_frames(&[Some(Action::Hold); 3])?;
        let late_gt = crate::GroundTruth::new(vec![Some(1), Some(Action::Hold.index()), Some(2)])?;

        let mut dataset = SymbolicDataset::default();
        dataset.insert(take_id(1, Task::Cooking, 0), one_cup_recording(valid_gt.clone()));
        dataset.insert(take_id(2, Task::Cooking, 0), one_cup_recording(late_gt));

        assert!(generate_dataset(&dataset, &layout, 2, &policy).is_err());
        assert!(!layout.config_dir(2).exists());
        assert!(!layout.staging_dir(2).exists());

        dataset.insert(take_id(2, Task::Cooking, 0), one_cup_recording(valid_gt));
        assert_eq!(generate_dataset(&dataset, &layout, 2, &policy)?, 2 * 3 * 2);
        assert!(layout.config_dir(2).is_dir());
        assert!(!layout.staging_dir(2).exists());
        Ok(())
    }

    #[test]
    fn leftover_staging_dir_is_refused() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let layout = DatasetLayout::new(dir.path(), dir.path());
        fs::create_dir_all(layout.staging_dir(3))?;

        let result = generate_dataset(
            &SymbolicDataset::default(),
            &layout,
            3,
            &RetryPolicy::write_default(),
        );
        assert!(result.is_err());
        assert!(layout.staging_dir(3).is_dir());
        assert!(!layout.config_dir(3).exists());
        Ok(())
    }

    #[test]
    fn zero_history_is_refused() {
        let dir = tempfile::tempdir().unwrap();
        let layout = DatasetLayout::new(dir.path(), dir.path());
        let result = generate_dataset(
            &SymbolicDataset::default(),
            &layout,
            0,
            &RetryPolicy::write_default(),
        );
        assert!(result.is_err());
        assert!(!layout.config_dir(0).exists());
    }
}
