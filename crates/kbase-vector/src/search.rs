use kbase_core::types::{Chunk, SearchHit, SourceKind};
use kbase_embed::cosine;

/// Lower bound on how many vector candidates go on to lexical rescoring.
pub const MIN_CANDIDATE_POOL: usize = 10;
/// Candidates kept per requested result.
pub const CANDIDATES_PER_RESULT: usize = 5;

/// Scores every chunk against `query_vec` and sorts best first. Ties keep
/// insertion order.
pub fn rank_by_cosine<'a>(query_vec: &[f32], chunks: &'a [Chunk]) -> Vec<SearchHit<'a>> {
    let mut hits: Vec<SearchHit<'a>> = chunks
        .iter()
        .map(|chunk| SearchHit { chunk, score: cosine(query_vec, &chunk.vector), source: SourceKind::Vector })
        .collect();
    hits.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
    hits
}

/// `max(10, k * 5)`, bounded by the number of chunks available.
pub fn candidate_pool_size(k: usize, total: usize) -> usize {
    MIN_CANDIDATE_POOL.max(k.saturating_mul(CANDIDATES_PER_RESULT)).min(total)
}
