//! Domain types shared by the embedding, storage and ranking crates.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::error::{Error, Result};

pub type ChunkId = String;
pub type DocumentId = String;

/// On-disk format tag written into every persisted index.
pub const INDEX_FORMAT_VERSION: u32 = 1;

/// A bounded slice of a document that is independently embedded and scored.
///
/// - `id`: unique chunk identifier, never reused
/// - `doc_id`: owning document; many chunks share one
/// - `title`: optional display label inherited from the document
/// - `text`: raw chunk content
/// - `vector`: L2-normalized hashed bag-of-words, all zero when the chunk had no tokens
///
/// Field names on disk follow the persisted index format (`docId`, `vec`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chunk {
    pub id: ChunkId,
    #[serde(rename = "docId")]
    pub doc_id: DocumentId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub text: String,
    #[serde(rename = "vec")]
    pub vector: Vec<f32>,
}

/// The persisted corpus. Chunks are append-ordered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexFile {
    pub version: u32,
    pub dims: usize,
    #[serde(default)]
    pub chunks: Vec<Chunk>,
}

impl IndexFile {
    pub fn empty(dims: usize) -> Self {
        Self { version: INDEX_FORMAT_VERSION, dims, chunks: Vec::new() }
    }

    /// Rejects an index written in another format version, or whose recorded
    /// `dims` or any stored vector differs from the dimensionality the caller
    /// embeds with.
    pub fn validate(&self, expected_dims: usize) -> Result<()> {
        if self.version != INDEX_FORMAT_VERSION {
            return Err(Error::UnsupportedVersion { expected: INDEX_FORMAT_VERSION, found: self.version });
        }
        if self.dims != expected_dims {
            return Err(Error::DimensionMismatch { expected: expected_dims, found: self.dims });
        }
        if let Some(bad) = self.chunks.iter().find(|c| c.vector.len() != expected_dims) {
            return Err(Error::DimensionMismatch { expected: expected_dims, found: bad.vector.len() });
        }
        Ok(())
    }

    pub fn stats(&self) -> IndexStats {
        let documents: HashSet<&str> = self.chunks.iter().map(|c| c.doc_id.as_str()).collect();
        IndexStats {
            dimensions: self.dims,
            chunk_count: self.chunks.len(),
            document_count: documents.len(),
        }
    }
}

/// Ingestion request for a single document.
#[derive(Debug, Clone, Default)]
pub struct NewDocument {
    pub id: Option<DocumentId>,
    pub title: Option<String>,
    pub text: String,
    pub chunk_size: Option<usize>,
}

impl NewDocument {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into(), ..Self::default() }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_id(mut self, id: impl Into<DocumentId>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = Some(chunk_size);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddOutcome {
    pub document_id: DocumentId,
    pub chunks_added: usize,
}

/// Indicates which ranking stage produced a score.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum SourceKind {
    Vector,
    Fused,
}

/// A chunk paired with a stage score. Higher is always better.
#[derive(Debug, Clone, Copy)]
pub struct SearchHit<'a> {
    pub chunk: &'a Chunk,
    pub score: f64,
    pub source: SourceKind,
}

/// One matched document with its assembled excerpt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentMatch {
    pub document_id: DocumentId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub text: String,
    pub score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResponse {
    pub query: String,
    pub items: Vec<DocumentMatch>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexStats {
    pub dimensions: usize,
    pub chunk_count: usize,
    pub document_count: usize,
}
