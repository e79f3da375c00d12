//! kbase-text
//!
//! Lexical relevance for the hybrid ranker: BM25 over the same tokenizer the
//! embedder uses, with corpus statistics maintained incrementally by the owner
//! of the index.

pub mod bm25;

pub use bm25::{normalize_by_max, Bm25Params, Bm25Scorer, CorpusStats};
