pub use anyhow::{ensure, Result};
pub use num_traits::Num;
#[cfg(feature = "with-serde")]
pub use serde::{Deserialize, Serialize};
pub use std::convert::{TryFrom, TryInto};
