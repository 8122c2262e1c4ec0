use std::collections::{HashMap, HashSet};

use async_trait::async_trait;

use super::FullTextIndex;
use crate::types::{Node, NodeType, Page, SearchPage, SearchResult};
use crate::Result;

const SNIPPET_MAX_CHARS: usize = 200;
const HIGHLIGHT_START: &str = "<b>";
const HIGHLIGHT_STOP: &str = "</b>";

/// Lowercased alphanumeric terms of `text`
pub fn tokenize(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(str::to_lowercase)
        .collect()
}

pub(crate) fn truncate_snippet(text: &str) -> String {
    if text.chars().count() <= SNIPPET_MAX_CHARS {
        return text.to_string();
    }
    let cut: String = text.chars().take(SNIPPET_MAX_CHARS).collect();
    format!("{}...", cut)
}

/// `key: value` pairs of the node's properties, or its name when it has none.
pub(crate) fn property_snippet(node: &Node) -> String {
    let mut keys: Vec<&String> = node
        .properties
        .iter()
        .filter(|(_, v)| !v.is_null())
        .map(|(k, _)| k)
        .collect();
    if keys.is_empty() {
        return node.name.clone();
    }
    keys.sort();

    let pairs: Vec<String> = keys
        .into_iter()
        .map(|k| match &node.properties[k] {
            serde_json::Value::String(s) => format!("{}: {}", k, s),
            other => format!("{}: {}", k, other),
        })
        .collect();
    truncate_snippet(&format!("{}.", pairs.join(". ")))
}

/// Wrap every word of `text` whose lowercase form is in `terms`.
fn highlight(text: &str, terms: &HashSet<String>) -> String {
    let mut out = String::with_capacity(text.len() + 16);
    let mut word = String::new();

    let flush = |word: &mut String, out: &mut String| {
        if word.is_empty() {
            return;
        }
        if terms.contains(&word.to_lowercase()) {
            out.push_str(HIGHLIGHT_START);
            out.push_str(word);
            out.push_str(HIGHLIGHT_STOP);
        } else {
            out.push_str(word);
        }
        word.clear();
    };

    for c in text.chars() {
        if c.is_alphanumeric() {
            word.push(c);
        } else {
            flush(&mut word, &mut out);
            out.push(c);
        }
    }
    flush(&mut word, &mut out);
    out
}

struct IndexedNode {
    node: Node,
    text: String,
    term_counts: HashMap<String, usize>,
    length: usize,
}

/// Conjunctive keyword index: a node matches when it contains every query
/// term. Rank is term frequency damped by document length.
#[derive(Default)]
pub struct InMemoryTextIndex {
    docs: Vec<IndexedNode>,
}

impl InMemoryTextIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_nodes<'a>(nodes: impl IntoIterator<Item = &'a Node>) -> Self {
        let mut index = Self::new();
        for node in nodes {
            index.insert(node.clone());
        }
        index
    }

    pub fn insert(&mut self, node: Node) {
        let text = node.searchable_text();
        let tokens = tokenize(&text);
        let mut term_counts = HashMap::new();
        for t in &tokens {
            *term_counts.entry(t.clone()).or_insert(0) += 1;
        }
        self.docs.retain(|d| d.node.id != node.id);
        self.docs.push(IndexedNode {
            node,
            text,
            term_counts,
            length: tokens.len(),
        });
    }

    pub fn len(&self) -> usize {
        self.docs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.docs.is_empty()
    }

    fn rank(&self, query: &str, type_filter: Option<NodeType>) -> Vec<(&IndexedNode, f64)> {
        let terms: Vec<String> = tokenize(query);
        if terms.is_empty() {
            return Vec::new();
        }

        let mut matches: Vec<(&IndexedNode, f64)> = self
            .docs
            .iter()
            .filter(|d| type_filter.map_or(true, |t| d.node.node_type == t))
            .filter_map(|d| {
                let mut hits = 0usize;
                for term in &terms {
                    let count = d.term_counts.get(term).copied().unwrap_or(0);
                    if count == 0 {
                        return None;
                    }
                    hits += count;
                }
                let score = hits as f64 / (1.0 + (d.length as f64).ln());
                Some((d, score))
            })
            .collect();

        matches.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.0.node.id.cmp(&b.0.node.id))
        });
        matches
    }
}

#[async_trait]
impl FullTextIndex for InMemoryTextIndex {
    async fn search(
        &self,
        query: &str,
        type_filter: Option<NodeType>,
        page: Page,
    ) -> Result<SearchPage> {
        let ranked = self.rank(query, type_filter);
        let total = ranked.len();
        let results = page
            .apply(ranked)
            .into_iter()
            .map(|(doc, score)| {
                let mut result = SearchResult::from_node(&doc.node).with_score(score);
                result.snippet = Some(property_snippet(&doc.node));
                result
            })
            .collect();
        Ok(SearchPage { results, total })
    }

    async fn search_with_highlight(&self, query: &str, page: Page) -> Result<SearchPage> {
        let terms: HashSet<String> = tokenize(query).into_iter().collect();
        let ranked = self.rank(query, None);
        let total = ranked.len();
        let results = page
            .apply(ranked)
            .into_iter()
            .map(|(doc, score)| {
                SearchResult::from_node(&doc.node)
                    .with_score(score)
                    .with_highlight(truncate_snippet(&highlight(&doc.text, &terms)))
            })
            .collect();
        Ok(SearchPage { results, total })
    }

    async fn type_facets(&self, query: &str) -> Result<HashMap<NodeType, usize>> {
        let mut facets = HashMap::new();
        for (doc, _) in self.rank(query, None) {
            *facets.entry(doc.node.node_type).or_insert(0) += 1;
        }
        Ok(facets)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn index() -> InMemoryTextIndex {
        let nodes = vec![
            Node::new("n1", NodeType::Person, "Ada Lovelace")
                .with_property("field", json!("mathematics")),
            Node::new("n2", NodeType::Organization, "Analytical Engine Society")
                .with_property("focus", json!("Ada and Babbage")),
            Node::new("n3", NodeType::Concept, "Graph theory"),
        ];
        InMemoryTextIndex::from_nodes(&nodes)
    }

    #[test]
    fn test_tokenize() {
        assert_eq!(tokenize("Hello, World-42!"), vec!["hello", "world", "42"]);
        assert!(tokenize("  ...  ").is_empty());
    }

    #[test]
    fn test_highlight_wraps_matching_words() {
        let terms: HashSet<String> = ["ada".to_string()].into_iter().collect();
        assert_eq!(highlight("Ada, ada!", &terms), "<b>Ada</b>, <b>ada</b>!");
    }

    #[test]
    fn test_truncate_snippet() {
        let long = "x".repeat(250);
        let snippet = truncate_snippet(&long);
        assert_eq!(snippet.chars().count(), 203);
        assert!(snippet.ends_with("..."));
        assert_eq!(truncate_snippet("short"), "short");
    }

    #[test]
    fn test_property_snippet() {
        let node = Node::new("n", NodeType::Item, "Lamp")
            .with_property("color", json!("red"))
            .with_property("watts", json!(40));
        assert_eq!(property_snippet(&node), "color: red. watts: 40.");
        assert_eq!(property_snippet(&Node::new("m", NodeType::Item, "Bare")), "Bare");
    }

    #[tokio::test]
    async fn test_search_requires_all_terms() {
        let idx = index();
        let page = idx.search("ada babbage", None, Page::default()).await.unwrap();
        assert_eq!(page.total, 1);
        assert_eq!(page.results[0].id, "n2");
    }

    #[tokio::test]
    async fn test_search_type_filter_and_facets() {
        let idx = index();
        let page = idx
            .search("ada", Some(NodeType::Person), Page::default())
            .await
            .unwrap();
        assert_eq!(page.total, 1);
        assert_eq!(page.results[0].id, "n1");

        let facets = idx.type_facets("ada").await.unwrap();
        assert_eq!(facets[&NodeType::Person], 1);
        assert_eq!(facets[&NodeType::Organization], 1);
    }

    #[tokio::test]
    async fn test_search_with_highlight() {
        let idx = index();
        let page = idx.search_with_highlight("graph", Page::default()).await.unwrap();
        assert_eq!(page.results.len(), 1);
        assert_eq!(
            page.results[0].highlighted_snippet.as_deref(),
            Some("<b>Graph</b> theory")
        );
        assert!(page.results[0].score.unwrap() > 0.0);
    }

    #[tokio::test]
    async fn test_blank_query_matches_nothing() {
        let idx = index();
        let page = idx.search("   ", None, Page::default()).await.unwrap();
        assert_eq!(page.total, 0);
    }
}
