use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::graph::{Node, NodeType};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchResult {
    pub id: String,

    #[serde(rename = "type", skip_serializing_if = "Option::is_none", default)]
    pub result_type: Option<NodeType>,

    pub title: String,

    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub snippet: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub highlighted_snippet: Option<String>,

    /// Raw back-end score until fusion rewrites it with the combined score.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub score: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub source_uri: Option<String>,

    #[serde(skip_serializing_if = "HashMap::is_empty", default)]
    pub metadata: HashMap<String, serde_json::Value>,

    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub created_at: Option<DateTime<Utc>>,

    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub updated_at: Option<DateTime<Utc>>,

    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub connection_count: Option<usize>,
}

impl SearchResult {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            result_type: None,
            title: title.into(),
            snippet: None,
            highlighted_snippet: None,
            score: None,
            source_uri: None,
            metadata: HashMap::new(),
            created_at: None,
            updated_at: None,
            connection_count: None,
        }
    }

    pub fn from_node(node: &Node) -> Self {
        Self {
            id: node.id.clone(),
            result_type: Some(node.node_type),
            title: node.name.clone(),
            snippet: None,
            highlighted_snippet: None,
            score: None,
            source_uri: node.source_uri.clone(),
            metadata: node.properties.clone(),
            created_at: Some(node.created_at),
            updated_at: Some(node.updated_at),
            connection_count: None,
        }
    }

    pub fn with_score(mut self, score: f64) -> Self {
        self.score = Some(score);
        self
    }

    pub fn with_highlight(mut self, highlighted: impl Into<String>) -> Self {
        self.highlighted_snippet = Some(highlighted.into());
        self
    }

    pub fn score_or_zero(&self) -> f64 {
        self.score.unwrap_or(0.0)
    }
}

/// One page of results from a collaborator, with the unpaged match count.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchPage {
    pub results: Vec<SearchResult>,
    pub total: usize,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SearchType {
    FullText,
    Vector,
    Hybrid,
}

/// Offset/limit window. `Page::of` converts a zero-based page number.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Page {
    pub offset: usize,
    pub size: usize,
}

impl Page {
    pub fn new(offset: usize, size: usize) -> Self {
        Self { offset, size }
    }

    pub fn of(number: usize, size: usize) -> Self {
        Self {
            offset: number.saturating_mul(size),
            size,
        }
    }

    pub fn number(&self) -> usize {
        if self.size == 0 {
            0
        } else {
            self.offset / self.size
        }
    }

    /// Number of results needed from a ranked source to fill this page.
    pub fn end(&self) -> usize {
        self.offset.saturating_add(self.size)
    }

    pub fn apply<T>(&self, items: impl IntoIterator<Item = T>) -> Vec<T> {
        items.into_iter().skip(self.offset).take(self.size).collect()
    }
}

impl Default for Page {
    fn default() -> Self {
        Self::of(0, 10)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct FusionWeights {
    pub fts: f64,
    pub vector: f64,
}

impl FusionWeights {
    pub fn new(fts: f64, vector: f64) -> Self {
        Self { fts, vector }
    }

    /// Rescale so the two weights sum to one. A non-positive total has no
    /// meaningful direction and falls back to an even split.
    pub fn normalized(&self) -> Self {
        let total = self.fts + self.vector;
        if !(total > 0.0) {
            return Self::new(0.5, 0.5);
        }
        Self::new(self.fts / total, self.vector / total)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchResponse {
    pub results: Vec<SearchResult>,
    pub total_elements: usize,
    pub total_pages: usize,
    pub current_page: usize,
    pub page_size: usize,
    pub query: String,
    pub search_type: SearchType,
    pub search_time_ms: u64,
    #[serde(skip_serializing_if = "BTreeMap::is_empty", default)]
    pub type_facets: BTreeMap<String, usize>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub min_score: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub max_score: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub weights: Option<FusionWeights>,
}

impl SearchResponse {
    pub fn new(
        query: &str,
        search_type: SearchType,
        results: Vec<SearchResult>,
        total_elements: usize,
        page: Page,
    ) -> Self {
        let total_pages = if page.size == 0 {
            0
        } else {
            total_elements.div_ceil(page.size)
        };
        Self {
            results,
            total_elements,
            total_pages,
            current_page: page.number(),
            page_size: page.size,
            query: query.to_string(),
            search_type,
            search_time_ms: 0,
            type_facets: BTreeMap::new(),
            min_score: None,
            max_score: None,
            weights: None,
        }
    }

    /// Fill `min_score`/`max_score` from the current results.
    pub fn with_score_range(mut self) -> Self {
        let scores = self.results.iter().map(SearchResult::score_or_zero);
        self.min_score = scores.clone().reduce(f64::min);
        self.max_score = scores.reduce(f64::max);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_of() {
        let page = Page::of(2, 5);
        assert_eq!(page.offset, 10);
        assert_eq!(page.number(), 2);
        assert_eq!(page.end(), 15);
    }

    #[test]
    fn test_page_bounds_saturate() {
        let page = Page::of(usize::MAX, 10);
        assert_eq!(page.offset, usize::MAX);
        assert_eq!(page.end(), usize::MAX);
        assert_eq!(Page::new(usize::MAX - 1, 10).end(), usize::MAX);
        assert!(page.apply(0..5).is_empty());
    }

    #[test]
    fn test_page_apply() {
        let page = Page::new(2, 3);
        assert_eq!(page.apply(0..10), vec![2, 3, 4]);
        assert_eq!(page.apply(0..3), vec![2]);
        assert!(page.apply(0..1).is_empty());
    }

    #[test]
    fn test_weights_normalized() {
        let w = FusionWeights::new(2.0, 3.0).normalized();
        assert!((w.fts - 0.4).abs() < 1e-12);
        assert!((w.vector - 0.6).abs() < 1e-12);

        let zero = FusionWeights::new(0.0, 0.0).normalized();
        assert_eq!(zero, FusionWeights::new(0.5, 0.5));
    }

    #[test]
    fn test_response_paging_metadata() {
        let results = vec![SearchResult::new("a", "A").with_score(0.2)];
        let resp = SearchResponse::new("q", SearchType::Hybrid, results, 11, Page::of(1, 5))
            .with_score_range();
        assert_eq!(resp.total_pages, 3);
        assert_eq!(resp.current_page, 1);
        assert_eq!(resp.min_score, Some(0.2));
        assert_eq!(resp.max_score, Some(0.2));
    }

    #[test]
    fn test_empty_response_has_no_score_range() {
        let resp =
            SearchResponse::new("q", SearchType::Vector, vec![], 0, Page::default()).with_score_range();
        assert!(resp.min_score.is_none());
        assert_eq!(resp.total_pages, 0);
    }
}
