//! Listing, writing and splitting the encoded dataset.

use crate::{
    common::*, crawl, CacheKey, GraphDict, RetryPolicy, SceneGraphProxy, Subject, Take, ViewMode,
};

/// The name of the cache directory holding graphs built with the given
/// history size.
pub fn history_config_name(history_size: usize) -> String {
    format!("h{}", history_size)
}

/// Writes one encoded graph below `config_dir`, retrying on I/O failures.
pub fn write_entry(
    config_dir: impl AsRef<Path>,
    key: &CacheKey,
    graph: &GraphDict,
    policy: &RetryPolicy,
) -> Result<PathBuf> {
    let path = config_dir.as_ref().join(key.relative_path());

    policy.run(format!("writing '{}'", path.display()), || {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        graph.write_to(&path)
    })?;

    Ok(path)
}

/// Lists every cache file of a history configuration.
///
/// Takes without a directory are skipped, so caches built from a subset of
/// the dataset can be listed. The paths are sorted so that loading order
/// does not depend on the directory listing order of the file system.
pub fn list_cache_files(cache_root: impl AsRef<Path>, config_name: &str) -> Result<Vec<PathBuf>> {
    let config_dir = cache_root.as_ref().join(config_name);
    ensure!(
        config_dir.is_dir(),
        "dataset configuration '{}' does not exist in '{}'",
        config_name,
        cache_root.as_ref().display()
    );

    let mut paths = vec![];

    for take_id in crawl() {
        let take_dir = config_dir.join(take_id.relative_dir());
        if !take_dir.is_dir() {
            debug!("skip take {} without cache files", take_id);
            continue;
        }
        let num_files = fs::read_dir(&take_dir)
            .with_context(|| format!("failed to list '{}'", take_dir.display()))?
            .count();
        ensure!(
            num_files % HandSide::COUNT == 0,
            "expect one file per hand side and frame in '{}', but found {} files",
            take_dir.display(),
            num_files
        );

        let num_frames = num_files / HandSide::COUNT;
        paths.extend(
            iproduct!(0..num_frames, HandSide::iter())
                .map(|(frame, side)| CacheKey {
                    take_id,
                    frame,
                    side,
                })
                .map(|key| config_dir.join(key.relative_path())),
        );
    }

    paths.sort();
    Ok(paths)
}

/// Creates proxies for every cache file of a configuration, dropping those
/// for which `filter_out` returns true.
pub fn load_proxies<F>(
    cache_root: impl AsRef<Path>,
    config_name: &str,
    view: ViewMode,
    filter_out: F,
) -> Result<Vec<SceneGraphProxy>>
where
    F: Fn(&SceneGraphProxy) -> bool,
{
    let proxies: Vec<_> = list_cache_files(cache_root, config_name)?
        .into_iter()
        .map(|path| SceneGraphProxy::new(path, view))
        .filter_ok(|proxy| !filter_out(proxy))
        .try_collect()?;
    debug!(
        "loaded {} proxies from configuration '{}'",
        proxies.len(),
        config_name
    );
    Ok(proxies)
}

/// Leave-one-subject-out partition with a held out validation take.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaveOneOut {
    pub evaluation_subject: Subject,
    pub validation_take: Take,
}

/// Proxies partitioned by [LeaveOneOut].
#[derive(Debug, Clone, Default)]
pub struct Split {
    pub train: Vec<SceneGraphProxy>,
    pub valid: Vec<SceneGraphProxy>,
    pub test: Vec<SceneGraphProxy>,
}

impl LeaveOneOut {
    pub fn new(evaluation_subject: usize, validation_take: usize) -> Result<Self> {
        Ok(Self {
            evaluation_subject: Subject::new(evaluation_subject)?,
            validation_take: Take::new(validation_take)?,
        })
    }

    pub fn is_test(&self, key: &CacheKey) -> bool {
        key.take_id.subject == self.evaluation_subject
    }

    pub fn is_valid(&self, key: &CacheKey) -> bool {
        !self.is_test(key) && key.take_id.take == self.validation_take
    }

    pub fn is_train(&self, key: &CacheKey) -> bool {
        !self.is_test(key) && !self.is_valid(key)
    }

    pub fn split(&self, proxies: impl IntoIterator<Item = SceneGraphProxy>) -> Split {
        proxies
            .into_iter()
            .fold(Split::default(), |mut split, proxy| {
                if self.is_test(proxy.key()) {
                    split.test.push(proxy);
                } else if self.is_valid(proxy.key()) {
                    split.valid.push(proxy);
                } else {
                    split.train.push(proxy);
                }
                split
            })
    }
}
