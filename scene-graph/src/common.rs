pub use anyhow::{bail, ensure, format_err, Context as _, Error, Result};
pub use bbox::Cuboid;
pub use cache::{
    crawl, CacheKey, GraphDict, RetryPolicy, Subject, Take, TakeId, Task, ViewMode,
};
pub use indexmap::{IndexMap, IndexSet};
pub use itertools::Itertools as _;
pub use label::{
    Action, HandSide, ObjectClass, ObjectObservation, ObjectRecord, RelationKind,
    RelationObservation, RelationRecord, Vocabulary,
};
pub use log::{debug, info, warn};
pub use serde::{de::DeserializeOwned, Deserialize, Serialize};
pub use std::{
    borrow::Cow,
    collections::{HashMap, HashSet},
    convert::TryFrom,
    fs::{self, File},
    io::{BufReader, BufWriter},
    path::{Path, PathBuf},
};
pub use strum::EnumCount;
