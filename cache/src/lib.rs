//! On-disk cache of encoded scene graphs.
//!
//! Encoded graphs are written once per frame and hand side by the dataset
//! generator and consumed lazily through [SceneGraphProxy].

mod common;

pub use dataset::*;
pub mod dataset;

pub use error::*;
pub mod error;

pub use graph_dict::*;
pub mod graph_dict;

pub use key::*;
pub mod key;

pub use proxy::*;
pub mod proxy;

pub use retry::*;
pub mod retry;

pub use view::*;
pub mod view;
