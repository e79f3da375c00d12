//! Document-level aggregation of fused chunk results.
//!
//! Chunks are grouped by `doc_id` in ranked order, so a document's position
//! among groups is that of its best chunk. Each document keeps a bounded
//! number of fragments, and its excerpt is assembled sentence by sentence with
//! exact-duplicate sentences dropped and a hard cap on total length.
//!
//! A document scores as its best retained chunk (max aggregation).

use std::collections::{HashMap, HashSet};

use kbase_core::chunker::{collapse_whitespace, sentences};
use kbase_core::types::{DocumentMatch, SearchHit};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AggregationLimits {
    pub fragments_per_document: usize,
    pub max_excerpt_chars: usize,
}

impl Default for AggregationLimits {
    fn default() -> Self {
        Self { fragments_per_document: 3, max_excerpt_chars: 2000 }
    }
}

struct DocumentGroup<'a> {
    parts: Vec<SearchHit<'a>>,
}

/// Groups `ranked` hits by document and returns the best `k` documents.
pub fn aggregate_by_document(ranked: &[SearchHit<'_>], limits: AggregationLimits, k: usize) -> Vec<DocumentMatch> {
    let mut groups: Vec<DocumentGroup<'_>> = Vec::new();
    let mut slots: HashMap<&str, usize> = HashMap::new();
    for hit in ranked {
        let slot = *slots.entry(hit.chunk.doc_id.as_str()).or_insert_with(|| {
            groups.push(DocumentGroup { parts: Vec::new() });
            groups.len() - 1
        });
        let group = &mut groups[slot];
        if group.parts.len() < limits.fragments_per_document {
            group.parts.push(*hit);
        }
    }

    let mut docs: Vec<DocumentMatch> = groups
        .into_iter()
        .filter_map(|mut group| {
            group.parts.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
            let best = group.parts.first()?;
            Some(DocumentMatch {
                document_id: best.chunk.doc_id.clone(),
                title: best.chunk.title.clone(),
                text: build_excerpt(&group.parts, limits.max_excerpt_chars),
                score: round6(best.score),
            })
        })
        .collect();

    docs.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
    docs.truncate(k);
    docs
}

/// Joins the unique sentences of `parts` (best first) with newlines, stopping
/// at the first sentence that would push the excerpt past `max_chars`. Only
/// whole sentences are emitted, so an oversized leading sentence leaves the
/// excerpt empty.
pub fn build_excerpt(parts: &[SearchHit<'_>], max_chars: usize) -> String {
    let mut seen: HashSet<String> = HashSet::new();
    let mut excerpt = String::new();
    let mut len = 0usize;
    'parts: for part in parts {
        let compact = collapse_whitespace(&part.chunk.text);
        for segment in sentences(&compact) {
            let segment = segment.trim();
            if segment.is_empty() || seen.contains(segment) {
                continue;
            }
            let sep = usize::from(!excerpt.is_empty());
            let seg_len = segment.chars().count();
            if len + sep + seg_len > max_chars {
                break 'parts;
            }
            if sep == 1 {
                excerpt.push('\n');
            }
            excerpt.push_str(segment);
            len += sep + seg_len;
            seen.insert(segment.to_string());
        }
    }
    excerpt
}

/// Rounds to 6 decimal digits.
pub fn round6(score: f64) -> f64 {
    (score * 1e6).round() / 1e6
}
