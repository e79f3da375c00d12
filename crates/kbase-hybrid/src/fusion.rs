use kbase_core::types::{SearchHit, SourceKind};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FusionWeights {
    pub vector: f64,
    pub lexical: f64,
}

impl Default for FusionWeights {
    fn default() -> Self {
        Self { vector: 0.5, lexical: 0.5 }
    }
}

/// Combines each candidate's cosine score with its max-normalized BM25 score
/// (`lexical[i]` belongs to `pool[i]`) and re-sorts best first. Ties keep
/// the vector-stage order.
pub fn fuse<'a>(pool: &[SearchHit<'a>], lexical: &[f64], weights: FusionWeights) -> Vec<SearchHit<'a>> {
    let mut fused: Vec<SearchHit<'a>> = pool
        .iter()
        .zip(lexical)
        .map(|(hit, lex)| SearchHit {
            chunk: hit.chunk,
            score: weights.vector * hit.score + weights.lexical * lex,
            source: SourceKind::Fused,
        })
        .collect();
    fused.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
    fused
}
