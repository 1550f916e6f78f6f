//! Structured identity of takes and cache entries.
//!
//! [CacheKey::relative_path] and [CacheKey::from_path] are the only places
//! where the on-disk layout is spelled out.

use crate::common::*;

pub const NUM_SUBJECTS: usize = 6;
pub const NUM_TAKES: usize = 10;

static FRAME_FILE_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^frame_(\d+)_(left|right)\.cache$").unwrap());

/// A recorded person, numbered from 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Subject(usize);

impl Subject {
    pub fn new(id: usize) -> Result<Self> {
        ensure!(
            (1..=NUM_SUBJECTS).contains(&id),
            "invalid subject id {}, expect 1..={}",
            id,
            NUM_SUBJECTS
        );
        Ok(Self(id))
    }

    pub fn all() -> impl Iterator<Item = Self> + Clone {
        (1..=NUM_SUBJECTS).map(Self)
    }

    pub fn id(&self) -> usize {
        self.0
    }

    pub fn from_dir_name(name: &str) -> Result<Self> {
        let id = name
            .strip_prefix("subject_")
            .and_then(|id| id.parse().ok())
            .ok_or_else(|| format_err!("'{}' is not a subject directory", name))?;
        Self::new(id)
    }
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "subject_{}", self.0)
    }
}

/// A recording repetition, numbered from 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Take(usize);

impl Take {
    pub fn new(id: usize) -> Result<Self> {
        ensure!(
            id < NUM_TAKES,
            "invalid take id {}, expect 0..{}",
            id,
            NUM_TAKES
        );
        Ok(Self(id))
    }

    pub fn all() -> impl Iterator<Item = Self> + Clone {
        (0..NUM_TAKES).map(Self)
    }

    pub fn id(&self) -> usize {
        self.0
    }

    pub fn from_dir_name(name: &str) -> Result<Self> {
        let id = name
            .strip_prefix("take_")
            .and_then(|id| id.parse().ok())
            .ok_or_else(|| format_err!("'{}' is not a take directory", name))?;
        Self::new(id)
    }
}

impl fmt::Display for Take {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "take_{}", self.0)
    }
}

/// The kitchen and workshop tasks, named after their directories.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    AsRefStr,
    EnumString,
    EnumIter,
    EnumCount,
)]
pub enum Task {
    #[strum(serialize = "task_1_k_cooking")]
    Cooking,
    #[strum(serialize = "task_2_k_cooking_with_bowls")]
    CookingWithBowls,
    #[strum(serialize = "task_3_k_pouring")]
    Pouring,
    #[strum(serialize = "task_4_k_wiping")]
    Wiping,
    #[strum(serialize = "task_5_k_cereals")]
    Cereals,
    #[strum(serialize = "task_6_w_hard_drive")]
    HardDrive,
    #[strum(serialize = "task_7_w_free_hard_drive")]
    FreeHardDrive,
    #[strum(serialize = "task_8_w_hammering")]
    Hammering,
    #[strum(serialize = "task_9_w_sawing")]
    Sawing,
}

impl Vocabulary for Task {}

impl Task {
    /// The task number, counted from 1.
    pub fn id(self) -> usize {
        self.index() + 1
    }

    pub fn from_dir_name(name: &str) -> Result<Self> {
        Self::try_from_name(name)
    }
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

/// Identifies one take of the dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TakeId {
    pub subject: Subject,
    pub task: Task,
    pub take: Take,
}

impl TakeId {
    /// `subject_i/task_j_.../take_k`
    pub fn relative_dir(&self) -> PathBuf {
        [
            self.subject.to_string(),
            self.task.to_string(),
            self.take.to_string(),
        ]
        .iter()
        .collect()
    }
}

impl fmt::Display for TakeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} | {} | {}", self.subject, self.task, self.take)
    }
}

/// Enumerates every take of the dataset in subject, task, take order.
pub fn crawl() -> impl Iterator<Item = TakeId> {
    iproduct!(Subject::all(), Task::iter(), Take::all())
        .map(|(subject, task, take)| TakeId {
            subject,
            task,
            take,
        })
}

/// Identifies one encoded graph in the cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CacheKey {
    pub take_id: TakeId,
    pub frame: usize,
    pub side: HandSide,
}

impl CacheKey {
    pub fn file_name(&self) -> String {
        format!("frame_{}_{}.cache", self.frame, self.side.as_ref())
    }

    /// Path relative to a history configuration directory.
    pub fn relative_path(&self) -> PathBuf {
        self.take_id.relative_dir().join(self.file_name())
    }

    /// Recovers the key from a path ending in
    /// `subject_i/task_j_.../take_k/frame_f_side.cache`.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let parse = || -> Result<Self> {
            let names: Vec<&str> = path
                .iter()
                .rev()
                .take(4)
                .map(|name| {
                    name.to_str()
                        .ok_or_else(|| format_err!("path component is not valid UTF-8"))
                })
                .try_collect()?;
            let (file_name, take, task, subject) = match *names.as_slice() {
                [file_name, take, task, subject] => (file_name, take, task, subject),
                _ => bail!("expect subject, task, take and frame components"),
            };

            let captures = FRAME_FILE_REGEX
                .captures(file_name)
                .ok_or_else(|| format_err!("'{}' is not a frame cache file", file_name))?;
            let frame: usize = captures[1].parse()?;
            let side: HandSide = captures[2].parse()?;

            Ok(Self {
                take_id: TakeId {
                    subject: Subject::from_dir_name(subject)?,
                    task: Task::from_dir_name(task)?,
                    take: Take::from_dir_name(take)?,
                },
                frame,
                side,
            })
        };

        parse().with_context(|| format!("'{}' is not a valid cache file path", path.display()))
    }
}
