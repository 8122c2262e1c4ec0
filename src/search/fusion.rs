//! Weighted score fusion for hybrid search
//!
//! Merges a full-text ranking and a vector ranking into one list. Each source
//! is normalized by its own maximum score, the two normalized scores are
//! combined with normalized weights, and results found by both sources get a
//! flat boost.

use std::cmp::Ordering;
use std::collections::HashMap;

use crate::types::{FusionWeights, Page, SearchResult};

/// Multiplier for results present in both rankings
pub const BOOST_FACTOR: f64 = 1.2;

/// Per-result bookkeeping while merging
#[derive(Debug, Clone)]
struct MergedResult {
    result: SearchResult,
    fts_score: f64,
    vector_score: f64,
    has_highlight: bool,
}

impl MergedResult {
    fn combined(&self, weights: FusionWeights) -> f64 {
        let score = self.fts_score * weights.fts + self.vector_score * weights.vector;
        if self.fts_score > 0.0 && self.vector_score > 0.0 {
            score * BOOST_FACTOR
        } else {
            score
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Source {
    FullText,
    Vector,
}

/// One fused page plus the number of distinct results before paging
#[derive(Debug, Clone, Default)]
pub struct FusedPage {
    pub results: Vec<SearchResult>,
    pub total: usize,
}

/// Largest raw score in a ranking, or 1.0 when it has no usable maximum.
fn max_score(results: &[SearchResult]) -> f64 {
    results
        .iter()
        .filter_map(|r| r.score)
        .reduce(f64::max)
        .filter(|max| *max > 0.0)
        .unwrap_or(1.0)
}

/// Fuse full-text and vector rankings and return the requested page.
///
/// When an id appears in both lists, the full-text copy is kept because it
/// carries highlights. The returned results have `score` rewritten to the
/// combined score. Ties are ordered by id.
pub fn fuse(
    fts_results: Vec<SearchResult>,
    vector_results: Vec<SearchResult>,
    weights: FusionWeights,
    page: Page,
) -> FusedPage {
    let weights = weights.normalized();
    let fts_max = max_score(&fts_results);
    let vector_max = max_score(&vector_results);

    let tagged = fts_results
        .into_iter()
        .map(|r| (Source::FullText, r))
        .chain(vector_results.into_iter().map(|r| (Source::Vector, r)));

    let merged = tagged.fold(
        HashMap::<String, MergedResult>::new(),
        |mut acc, (source, result)| {
            let normalized = match source {
                Source::FullText => result.score_or_zero() / fts_max,
                Source::Vector => result.score_or_zero() / vector_max,
            };
            let highlighted = result.highlighted_snippet.is_some();

            let entry = acc
                .entry(result.id.clone())
                .or_insert_with(|| MergedResult {
                    result,
                    fts_score: 0.0,
                    vector_score: 0.0,
                    has_highlight: false,
                });
            match source {
                Source::FullText => {
                    entry.fts_score = normalized;
                    entry.has_highlight = highlighted;
                }
                Source::Vector => entry.vector_score = normalized,
            }
            acc
        },
    );

    let total = merged.len();
    let mut scored: Vec<(f64, MergedResult)> = merged
        .into_values()
        .map(|m| (m.combined(weights), m))
        .collect();

    scored.sort_by(|a, b| {
        b.0.partial_cmp(&a.0)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.1.result.id.cmp(&b.1.result.id))
    });

    let results = page.apply(scored.into_iter().map(|(combined, merged)| {
        tracing::trace!(
            id = %merged.result.id,
            fts = merged.fts_score,
            vector = merged.vector_score,
            highlighted = merged.has_highlight,
            combined,
            "Fused result"
        );
        merged.result.with_score(combined)
    }));

    FusedPage { results, total }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hit(id: &str, score: f64) -> SearchResult {
        SearchResult::new(id, id.to_uppercase()).with_score(score)
    }

    fn ids(page: &FusedPage) -> Vec<&str> {
        page.results.iter().map(|r| r.id.as_str()).collect()
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_overlap_is_boosted() {
        let fused = fuse(
            vec![hit("x", 2.0), hit("y", 1.0)],
            vec![hit("x", 0.9), hit("z", 0.45)],
            FusionWeights::new(0.5, 0.5),
            Page::new(0, 10),
        );

        assert_eq!(fused.total, 3);
        let x = &fused.results[0];
        assert_eq!(x.id, "x");
        assert!(approx(x.score.unwrap(), (1.0 * 0.5 + 1.0 * 0.5) * BOOST_FACTOR));
    }

    #[test]
    fn test_single_source_never_boosted() {
        let fused = fuse(
            vec![hit("x", 4.0), hit("y", 2.0)],
            vec![hit("z", 0.8)],
            FusionWeights::new(0.5, 0.5),
            Page::new(0, 10),
        );

        let by_id: HashMap<_, _> = fused
            .results
            .iter()
            .map(|r| (r.id.as_str(), r.score.unwrap()))
            .collect();
        assert!(approx(by_id["x"], 0.5));
        assert!(approx(by_id["y"], 0.25));
        assert!(approx(by_id["z"], 0.5));
    }

    #[test]
    fn test_weights_are_normalized() {
        let fts = vec![hit("a", 3.0), hit("b", 1.0), hit("c", 2.0)];
        let vector = vec![hit("b", 0.9), hit("d", 0.8), hit("a", 0.1)];

        let raw = fuse(fts.clone(), vector.clone(), FusionWeights::new(2.0, 3.0), Page::new(0, 10));
        let unit = fuse(fts, vector, FusionWeights::new(0.4, 0.6), Page::new(0, 10));

        assert_eq!(ids(&raw), ids(&unit));
        for (r, u) in raw.results.iter().zip(&unit.results) {
            assert!(approx(r.score.unwrap(), u.score.unwrap()));
        }
    }

    #[test]
    fn test_pagination_returns_later_ranks() {
        let fts: Vec<_> = (0..12).map(|i| hit(&format!("r{:02}", i), 12.0 - i as f64)).collect();

        let all = fuse(fts.clone(), Vec::new(), FusionWeights::new(1.0, 0.0), Page::new(0, 12));
        let second = fuse(fts, Vec::new(), FusionWeights::new(1.0, 0.0), Page::new(5, 5));

        assert_eq!(second.total, 12);
        assert_eq!(ids(&second), ids(&all)[5..10].to_vec());
        assert_eq!(ids(&second), vec!["r05", "r06", "r07", "r08", "r09"]);
    }

    #[test]
    fn test_ties_broken_by_id() {
        let fused = fuse(
            vec![hit("m", 1.0), hit("b", 1.0)],
            vec![hit("k", 1.0)],
            FusionWeights::new(0.5, 0.5),
            Page::new(0, 10),
        );
        assert_eq!(ids(&fused), vec!["b", "k", "m"]);
    }

    #[test]
    fn test_fts_copy_is_carrier() {
        let fts = vec![hit("x", 1.0).with_highlight("<b>x</b>")];
        let mut vector_copy = hit("x", 0.5);
        vector_copy.title = "vector title".to_string();

        let fused = fuse(fts, vec![vector_copy], FusionWeights::new(0.5, 0.5), Page::default());
        assert_eq!(fused.results[0].title, "X");
        assert_eq!(fused.results[0].highlighted_snippet.as_deref(), Some("<b>x</b>"));
    }

    #[test]
    fn test_missing_and_non_positive_scores() {
        let mut unscored = hit("u", 0.0);
        unscored.score = None;

        let fused = fuse(
            vec![unscored, hit("n", -1.0)],
            vec![hit("v", 0.0)],
            FusionWeights::new(0.5, 0.5),
            Page::default(),
        );

        assert_eq!(fused.total, 3);
        assert!(fused.results.iter().all(|r| r.score.unwrap() <= 0.0));
    }

    #[test]
    fn test_empty_inputs() {
        let fused = fuse(Vec::new(), Vec::new(), FusionWeights::new(0.5, 0.5), Page::default());
        assert_eq!(fused.total, 0);
        assert!(fused.results.is_empty());
    }
}
