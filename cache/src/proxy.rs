use crate::{common::*, CacheError, CacheKey, GraphDict, Subject, Take, Task, ViewMode};

/// The delay before the cache file is decoded a second time.
const CORRUPTION_RETRY_DELAY: Duration = Duration::from_millis(100);

/// A lazy handle to one cached graph.
///
/// The handle holds only the path and the identity recovered from it. The
/// graph is read and transformed by [SceneGraphProxy::load].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SceneGraphProxy {
    path: PathBuf,
    key: CacheKey,
    view: ViewMode,
}

impl SceneGraphProxy {
    pub fn new(path: impl AsRef<Path>, view: ViewMode) -> Result<Self> {
        let path = path.as_ref();
        ensure!(
            path.is_file(),
            "'{}' is not a cache file",
            path.display()
        );
        let key = CacheKey::from_path(path)?;

        Ok(Self {
            path: path.to_owned(),
            key,
            view,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn key(&self) -> &CacheKey {
        &self.key
    }

    pub fn view(&self) -> ViewMode {
        self.view
    }

    pub fn subject(&self) -> Subject {
        self.key.take_id.subject
    }

    pub fn task(&self) -> Task {
        self.key.take_id.task
    }

    pub fn take(&self) -> Take {
        self.key.take_id.take
    }

    pub fn frame(&self) -> usize {
        self.key.frame
    }

    pub fn side(&self) -> HandSide {
        self.key.side
    }

    /// Reads the cached graph and applies the configured view.
    ///
    /// A file that fails to decode is read once more after a short delay.
    /// A second failure yields [CacheError::Corrupted].
    pub fn load(&self) -> Result<GraphDict> {
        let graph = match GraphDict::read_from(&self.path) {
            Ok(graph) => graph,
            Err(err) => {
                warn!(
                    "failed to load '{}', retrying once: {:#}",
                    self.path.display(),
                    err
                );
                thread::sleep(CORRUPTION_RETRY_DELAY);
                GraphDict::read_from(&self.path).map_err(|err| CacheError::Corrupted {
                    path: self.path.clone(),
                    reason: format!("{:#}", err),
                })?
            }
        };

        self.view.apply(graph).with_context(|| {
            format!(
                "failed to apply {:?} view to '{}'",
                self.view,
                self.path.display()
            )
        })
    }
}
