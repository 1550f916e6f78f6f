pub use anyhow::{ensure, Context as _, Result};
pub use cache::{LeaveOneOut, RetryPolicy, SceneGraphProxy, ViewMode};
pub use clap::{Parser, Subcommand};
pub use label::HandSide;
pub use log::info;
pub use scene_graph::DatasetLayout;
pub use serde::{Deserialize, Serialize};
pub use std::path::{Path, PathBuf};
