use crate::common::*;
use thiserror::Error;

/// Errors callers may want to tell apart from generic failures.
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("repeatedly failed to decode cache file '{}': {reason}", .path.display())]
    Corrupted { path: PathBuf, reason: String },
}
