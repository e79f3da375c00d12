//! BM25 keyword scoring.
//!
//! Statistics (document count, average token length, per-token document
//! frequency) are computed over the whole corpus of chunks, while scoring is
//! only applied to the candidates the vector stage shortlisted.
//!
//! `idf = ln((N - df + 0.5) / (df + 0.5) + 1)`; a query token never seen in the
//! corpus gets `df = 0.5`.

use std::collections::{HashMap, HashSet};

use kbase_embed::tokenize;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bm25Params {
    pub k1: f64,
    pub b: f64,
}

impl Default for Bm25Params {
    fn default() -> Self {
        Self { k1: 1.2, b: 0.75 }
    }
}

#[derive(Debug, Clone, Default)]
pub struct CorpusStats {
    doc_count: usize,
    total_tokens: usize,
    doc_freq: HashMap<String, usize>,
}

impl CorpusStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_texts<'a, I>(texts: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut stats = Self::new();
        for text in texts {
            stats.add_text(text);
        }
        stats
    }

    pub fn add_text(&mut self, text: &str) {
        let tokens = tokenize(text);
        self.doc_count += 1;
        self.total_tokens += tokens.len();
        let unique: HashSet<String> = tokens.into_iter().collect();
        for token in unique {
            *self.doc_freq.entry(token).or_insert(0) += 1;
        }
    }

    pub fn doc_count(&self) -> usize {
        self.doc_count
    }

    /// Average chunk length in tokens; 1 for an empty corpus.
    pub fn avg_len(&self) -> f64 {
        if self.doc_count == 0 {
            return 1.0;
        }
        self.total_tokens as f64 / self.doc_count as f64
    }

    pub fn doc_freq(&self, token: &str) -> Option<usize> {
        self.doc_freq.get(token).copied()
    }

    pub fn idf(&self, token: &str) -> f64 {
        let n = self.doc_count.max(1) as f64;
        let df = self.doc_freq(token).map_or(0.5, |d| d as f64);
        ((n - df + 0.5) / (df + 0.5) + 1.0).ln()
    }
}

/// Scores chunk texts against one query.
pub struct Bm25Scorer<'a> {
    stats: &'a CorpusStats,
    params: Bm25Params,
    query: Vec<(String, f64)>,
}

impl<'a> Bm25Scorer<'a> {
    pub fn new(stats: &'a CorpusStats, params: Bm25Params, query: &str) -> Self {
        // repeated query tokens count once per occurrence
        let query = tokenize(query)
            .into_iter()
            .map(|t| {
                let idf = stats.idf(&t);
                (t, idf)
            })
            .collect();
        Self { stats, params, query }
    }

    pub fn score(&self, text: &str) -> f64 {
        if self.query.is_empty() {
            return 0.0;
        }
        let tokens = tokenize(text);
        let dl = tokens.len().max(1) as f64;
        let mut tf: HashMap<&str, usize> = HashMap::new();
        for t in &tokens {
            *tf.entry(t.as_str()).or_insert(0) += 1;
        }
        let Bm25Params { k1, b } = self.params;
        let length_norm = 1.0 - b + b * (dl / self.stats.avg_len());
        self.query
            .iter()
            .map(|(token, idf)| {
                let tfv = tf.get(token.as_str()).copied().unwrap_or(0) as f64;
                let den = tfv + k1 * length_norm;
                if den == 0.0 { 0.0 } else { idf * (tfv * (k1 + 1.0)) / den }
            })
            .sum()
    }
}

/// Divides every score by the maximum so the best becomes 1; all zeros when
/// nothing scored above zero.
pub fn normalize_by_max(scores: &mut [f64]) {
    let max = scores.iter().cloned().fold(0.0f64, f64::max);
    for s in scores.iter_mut() {
        *s = if max > 0.0 { *s / max } else { 0.0 };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn corpus() -> CorpusStats {
        CorpusStats::from_texts([
            "the quick brown fox jumps over the lazy dog",
            "the lazy cat sleeps all day",
            "quick brown rabbits hop in the garden",
        ])
    }

    #[test]
    fn stats_track_lengths_and_document_frequency() {
        let stats = corpus();
        assert_eq!(stats.doc_count(), 3);
        assert!((stats.avg_len() - 22.0 / 3.0).abs() < 1e-12);
        assert_eq!(stats.doc_freq("the"), Some(3), "counted once per chunk");
        assert_eq!(stats.doc_freq("quick"), Some(2));
        assert_eq!(stats.doc_freq("zebra"), None);
    }

    #[test]
    fn empty_corpus_has_unit_average() {
        let stats = CorpusStats::new();
        assert_eq!(stats.avg_len(), 1.0);
        assert!(stats.idf("anything") > 0.0);
    }

    #[test]
    fn idf_matches_formula() {
        let stats = corpus();
        let expected = ((3.0 - 2.0 + 0.5) / (2.0 + 0.5) + 1.0f64).ln();
        assert!((stats.idf("quick") - expected).abs() < 1e-12);
        let unseen = ((3.0 - 0.5 + 0.5) / (0.5 + 0.5) + 1.0f64).ln();
        assert!((stats.idf("zebra") - unseen).abs() < 1e-12);
    }

    #[test]
    fn more_occurrences_score_higher() {
        let stats = CorpusStats::from_texts(["rust programming", "rust rust rust is a programming language", "python programming"]);
        let scorer = Bm25Scorer::new(&stats, Bm25Params::default(), "rust");
        let once = scorer.score("rust programming");
        let thrice = scorer.score("rust rust rust is a programming language");
        let none = scorer.score("python programming");
        assert!(thrice > once, "thrice={thrice} once={once}");
        assert_eq!(none, 0.0);
    }

    #[test]
    fn scoring_is_case_and_punctuation_insensitive() {
        let stats = corpus();
        let scorer = Bm25Scorer::new(&stats, Bm25Params::default(), "QUICK, Fox!");
        assert!(scorer.score("The quick brown fox jumps over the lazy dog") > 0.0);
    }

    #[test]
    fn empty_query_scores_zero() {
        let stats = corpus();
        let scorer = Bm25Scorer::new(&stats, Bm25Params::default(), "   ");
        assert_eq!(scorer.score("the quick brown fox"), 0.0);
    }

    #[test]
    fn normalize_by_max_scales_to_unit() {
        let mut scores = vec![2.0, 1.0, 0.0];
        normalize_by_max(&mut scores);
        assert_eq!(scores, vec![1.0, 0.5, 0.0]);

        let mut zeros = vec![0.0, 0.0];
        normalize_by_max(&mut zeros);
        assert_eq!(zeros, vec![0.0, 0.0]);
    }
}
