pub mod error;
pub mod graph;
pub mod neighborhood;
pub mod search;

pub use error::{AppError, Result};
pub use graph::{Edge, EdgeType, Node, NodeType};
pub use neighborhood::{GraphEdge, GraphNeighborhood, GraphNode, GraphStatistics, ShortestPath};
pub use search::{FusionWeights, Page, SearchPage, SearchResponse, SearchResult, SearchType};
