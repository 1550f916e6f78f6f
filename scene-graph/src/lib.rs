//! Scene graphs of bimanual manipulation recordings.
//!
//! A [Recording] holds the raw observations of one take. It produces one
//! [SceneGraph] per frame, and [flatten] merges a window of consecutive
//! frames into one graph linked by temporal edges. The [dataset] module
//! drives both steps over the whole dataset and writes the encoded graphs.

mod common;

pub use dataset::*;
pub mod dataset;

pub use flatten::*;
pub mod flatten;

pub use graph::*;
pub mod graph;

pub use ground_truth::*;
pub mod ground_truth;

pub use recording::*;
pub mod recording;
