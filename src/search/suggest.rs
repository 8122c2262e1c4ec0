use std::collections::HashSet;

pub const MAX_SUGGESTIONS: usize = 5;

const SYNONYMS: &[(&str, &[&str])] = &[
    ("person", &["people", "individual", "user"]),
    ("organization", &["company", "business", "corp"]),
    ("document", &["file", "paper", "report"]),
];

/// Alternative queries: the individual words of a multi-word query, then the
/// lowercased query with each known term swapped for its synonyms.
pub fn suggestions(query: &str) -> Vec<String> {
    let trimmed = query.trim();
    let lowered = trimmed.to_lowercase();

    let words = trimmed
        .split_whitespace()
        .filter(|_| trimmed.contains(char::is_whitespace))
        .map(str::to_string);

    let swaps = SYNONYMS
        .iter()
        .filter(|(term, _)| lowered.contains(term))
        .flat_map(|(term, alternatives)| {
            alternatives
                .iter()
                .map(|alt| lowered.replace(term, alt))
                .collect::<Vec<_>>()
        });

    let mut seen = HashSet::new();
    words
        .chain(swaps)
        .filter(|s| seen.insert(s.clone()))
        .take(MAX_SUGGESTIONS)
        .collect()
}
