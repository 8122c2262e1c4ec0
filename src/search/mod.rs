//! Relevance ranking across the full-text and vector back-ends
//!
//! - `fusion`: weighted, normalized merge of two rankings
//! - `adaptive`: probe quality scoring and derived weights
//! - `suggest`: query suggestions

pub mod adaptive;
pub mod fusion;
pub mod suggest;

pub use adaptive::{adaptive_weights, probe_quality, PROBE_SIZE};
pub use fusion::{fuse, FusedPage, BOOST_FACTOR};
pub use suggest::{suggestions, MAX_SUGGESTIONS};
