mod memory;
mod snapshot;
pub mod text;
mod traits;
mod vector;

pub use memory::InMemoryGraph;
pub use snapshot::{GraphSnapshot, LoadedGraph};
pub use text::InMemoryTextIndex;
pub use traits::{Embedder, FullTextIndex, GraphStore, VectorIndex};
pub use vector::InMemoryVectorIndex;
