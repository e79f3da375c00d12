use std::path::PathBuf;

use crate::error::Result;
use crate::types::{AddOutcome, IndexFile, IndexStats, NewDocument, SearchResponse};

pub trait Embedder: Send + Sync {
    fn dim(&self) -> usize;
    fn embed_text(&self, text: &str) -> Result<Vec<f32>>;

    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        texts.iter().map(|t| self.embed_text(t)).collect()
    }
}

/// Whole-index persistence. `load` returns `Ok(None)` when nothing has been
/// persisted yet and `Error::CorruptIndex` when the stored bytes do not parse.
pub trait IndexStore: Send + Sync {
    fn load(&self) -> Result<Option<IndexFile>>;
    fn save(&self, index: &IndexFile) -> Result<()>;

    /// Moves an unreadable index out of the way, returning where it went.
    fn quarantine(&self) -> Result<Option<PathBuf>> {
        Ok(None)
    }

    /// Human-readable location for logs.
    fn location(&self) -> String;
}

pub trait SearchEngine: Send + Sync {
    fn add_document(&self, doc: NewDocument) -> Result<AddOutcome>;
    fn search(&self, query: &str, k: Option<usize>) -> Result<SearchResponse>;
    fn stats(&self) -> Result<IndexStats>;
}
