//! Annotation vocabularies and per-frame observation records.

mod common;

pub use vocab::*;
pub mod vocab;

pub use observation::*;
pub mod observation;

pub use record::*;
pub mod record;
