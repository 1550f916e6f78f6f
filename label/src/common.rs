pub use anyhow::{ensure, format_err, Context as _, Error, Result};
pub use bbox::{Cuboid, Cuboid_};
pub use noisy_float::prelude::*;
pub use serde::{Deserialize, Serialize};
pub use std::{
    convert::{TryFrom, TryInto},
    fmt::Debug,
    str::FromStr,
};
pub use strum::{AsRefStr, EnumCount, EnumIter, EnumString, IntoEnumIterator};
