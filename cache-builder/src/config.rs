//! Builder configuration format.

use crate::common::*;

/// The builder configuration.
///
/// Every field may be left out of the configuration file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// The raw dataset root holding the derived data and ground truth.
    pub dataset_dir: PathBuf,
    /// The directory receiving the dataset caches.
    pub base_dir: PathBuf,
    pub history_size: usize,
    pub read_retry: RetryPolicy,
    pub write_retry: RetryPolicy,
}

impl Config {
    pub fn open<P>(path: P) -> Result<Self>
    where
        P: AsRef<Path>,
    {
        let text = std::fs::read_to_string(path)?;
        let config = json5::from_str(&text)?;
        Ok(config)
    }

    pub fn layout(&self) -> DatasetLayout {
        DatasetLayout::new(&self.dataset_dir, &self.base_dir)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            dataset_dir: PathBuf::from("KIT_BIMACS_DATASET"),
            base_dir: PathBuf::from("."),
            history_size: 10,
            read_retry: RetryPolicy::read_default(),
            write_retry: RetryPolicy::write_default(),
        }
    }
}
