//! Probe-based weighting for hybrid search
//!
//! Each source answers a small probe first; the weight it gets in the full
//! hybrid search is proportional to how good its probe looked.

use crate::types::{FusionWeights, SearchResult};

/// Results requested from each source for the quality probe
pub const PROBE_SIZE: usize = 5;

/// Quality assigned to a probe that returned nothing
pub const EMPTY_PROBE_QUALITY: f64 = 0.1;

/// Score a probe in `[EMPTY_PROBE_QUALITY, 1]`.
///
/// Sums a count factor (0.2 per result, up to five), the average raw score
/// (clamped to `[0, 1]`) and half the score spread, then caps the total at 1.
pub fn probe_quality(results: &[SearchResult]) -> f64 {
    if results.is_empty() {
        return EMPTY_PROBE_QUALITY;
    }

    let scores: Vec<f64> = results.iter().map(SearchResult::score_or_zero).collect();
    let count_factor = scores.len().min(PROBE_SIZE) as f64 * 0.2;
    let avg = scores.iter().sum::<f64>() / scores.len() as f64;
    let spread_factor = score_spread(&scores) * 0.5;

    (count_factor + avg.clamp(0.0, 1.0) + spread_factor).clamp(EMPTY_PROBE_QUALITY, 1.0)
}

fn score_spread(scores: &[f64]) -> f64 {
    if scores.len() <= 1 {
        return 0.0;
    }
    let max = scores.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let min = scores.iter().copied().fold(f64::INFINITY, f64::min);
    ((max - min) * 2.0).min(1.0)
}

/// Weights proportional to the two probe qualities
pub fn adaptive_weights(fts_probe: &[SearchResult], vector_probe: &[SearchResult]) -> FusionWeights {
    let fts_quality = probe_quality(fts_probe);
    let vector_quality = probe_quality(vector_probe);
    let total = fts_quality + vector_quality;
    FusionWeights::new(fts_quality / total, vector_quality / total)
}
