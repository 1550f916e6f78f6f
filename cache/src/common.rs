pub use anyhow::{bail, ensure, format_err, Context as _, Result};
pub use itertools::{iproduct, Itertools as _};
pub use label::{Action, HandSide, ObjectClass, RelationKind, Vocabulary};
pub use log::{debug, info, warn};
pub use noisy_float::prelude::*;
pub use once_cell::sync::Lazy;
pub use regex::Regex;
pub use serde::{Deserialize, Serialize};
pub use std::{
    fmt,
    fs::{self, File},
    io::{BufReader, BufWriter},
    num::NonZeroUsize,
    path::{Path, PathBuf},
    thread,
    time::Duration,
};
pub use strum::{AsRefStr, EnumCount, EnumIter, EnumString, IntoEnumIterator};
