//! kbase-embed
//!
//! Model-free embeddings: tokens are feature-hashed into a fixed number of
//! buckets, counted, and the count vector is L2-normalized. Same text, same
//! vector, regardless of index state.

pub mod hash;
pub mod norm;
pub mod tokenize;

pub use hash::hash_token;
pub use norm::{cosine, l2_norm, l2_normalize};
pub use tokenize::tokenize;

use kbase_core::error::{Error, Result};
use kbase_core::traits::Embedder;

pub const DEFAULT_DIMS: usize = 1024;

/// Hashed bag-of-words of `text` in `dims` buckets. Collisions are accepted.
pub fn embed(text: &str, dims: usize) -> Vec<f32> {
    let mut v = vec![0f32; dims];
    if dims == 0 {
        return v;
    }
    for token in tokenize(text) {
        v[hash_token(&token, dims)] += 1.0;
    }
    l2_normalize(&mut v);
    v
}

#[derive(Debug, Clone, Copy)]
pub struct HashEmbedder {
    dims: usize,
}

impl HashEmbedder {
    pub fn new(dims: usize) -> Result<Self> {
        if dims == 0 {
            return Err(Error::InvalidConfig("embedding dimensions must be positive".into()));
        }
        Ok(Self { dims })
    }
}

impl Default for HashEmbedder {
    fn default() -> Self {
        Self { dims: DEFAULT_DIMS }
    }
}

impl Embedder for HashEmbedder {
    fn dim(&self) -> usize {
        self.dims
    }

    fn embed_text(&self, text: &str) -> Result<Vec<f32>> {
        Ok(embed(text, self.dims))
    }
}

pub fn get_default_embedder(dims: usize) -> Result<Box<dyn Embedder>> {
    Ok(Box::new(HashEmbedder::new(dims)?))
}
