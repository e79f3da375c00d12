//! kbase-hybrid
//!
//! [`KnowledgeBase`] owns the in-memory index and its store. Ingestion chunks,
//! embeds, appends and persists under one write lock; search and stats take
//! read locks and can run side by side.
//!
//! Search pipeline: cosine over every chunk → shortlist of `max(10, 5k)` →
//! BM25 over the shortlist with whole-corpus statistics → max-normalize →
//! weighted fusion → per-document aggregation → top `k` documents.

pub mod aggregate;
pub mod fusion;

use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use kbase_core::chunker::{Chunker, ChunkingConfig};
use kbase_core::config::{CorruptIndexPolicy, RetrievalSettings};
use kbase_core::error::{Error, Result};
use kbase_core::traits::{Embedder, IndexStore, SearchEngine};
use kbase_core::types::{AddOutcome, Chunk, IndexFile, IndexStats, NewDocument, SearchResponse};
use kbase_embed::HashEmbedder;
use kbase_text::{normalize_by_max, Bm25Params, Bm25Scorer, CorpusStats};
use kbase_vector::{candidate_pool_size, rank_by_cosine, InMemoryStore, JsonFileStore};

pub use aggregate::{aggregate_by_document, AggregationLimits};
pub use fusion::{fuse, FusionWeights};

struct IndexState {
    index: IndexFile,
    corpus: CorpusStats,
}

impl IndexState {
    fn new(index: IndexFile) -> Self {
        let corpus = CorpusStats::from_texts(index.chunks.iter().map(|c| c.text.as_str()));
        Self { index, corpus }
    }
}

pub struct KnowledgeBase {
    store: Box<dyn IndexStore>,
    embedder: Box<dyn Embedder>,
    settings: RetrievalSettings,
    state: RwLock<IndexState>,
}

impl KnowledgeBase {
    /// Loads the index from `store`, creating an empty one when nothing is
    /// persisted yet. A corrupt index is handled per `settings.on_corrupt`;
    /// an index of another format version or dimensionality is refused.
    pub fn open(store: Box<dyn IndexStore>, embedder: Box<dyn Embedder>, settings: RetrievalSettings) -> Result<Self> {
        settings.validate()?;
        let dims = embedder.dim();
        let index = match store.load() {
            Ok(Some(index)) => index,
            Ok(None) => Self::fresh_index(store.as_ref(), dims)?,
            Err(Error::CorruptIndex(reason)) => match settings.on_corrupt {
                CorruptIndexPolicy::Fail => return Err(Error::CorruptIndex(reason)),
                CorruptIndexPolicy::Backup => {
                    let moved = store.quarantine()?;
                    warn!(location = %store.location(), backup = ?moved, %reason, "corrupt index moved aside; starting empty");
                    Self::fresh_index(store.as_ref(), dims)?
                }
                CorruptIndexPolicy::Reset => {
                    warn!(location = %store.location(), %reason, "corrupt index discarded; starting empty");
                    Self::fresh_index(store.as_ref(), dims)?
                }
            },
            Err(e) => return Err(e),
        };
        index.validate(dims)?;
        info!(location = %store.location(), dims, chunks = index.chunks.len(), "knowledge base opened");
        Ok(Self { store, embedder, settings, state: RwLock::new(IndexState::new(index)) })
    }

    /// JSON file at `settings.index_path` (resolved against the working
    /// directory) with a hash embedder of `settings.dimensions`.
    pub fn open_with_settings(settings: RetrievalSettings) -> Result<Self> {
        let cwd = std::env::current_dir()?;
        let store = JsonFileStore::new(settings.resolved_index_path(&cwd));
        let embedder = HashEmbedder::new(settings.dimensions)?;
        Self::open(Box::new(store), Box::new(embedder), settings)
    }

    pub fn in_memory(settings: RetrievalSettings) -> Result<Self> {
        let embedder = HashEmbedder::new(settings.dimensions)?;
        Self::open(Box::new(InMemoryStore::new()), Box::new(embedder), settings)
    }

    pub fn settings(&self) -> &RetrievalSettings {
        &self.settings
    }

    fn fresh_index(store: &dyn IndexStore, dims: usize) -> Result<IndexFile> {
        let index = IndexFile::empty(dims);
        store.save(&index)?;
        Ok(index)
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, IndexState>> {
        self.state.read().map_err(|_| Error::Poisoned)
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, IndexState>> {
        self.state.write().map_err(|_| Error::Poisoned)
    }

    /// Chunks, embeds and appends one document, then persists the index.
    ///
    /// The engine only rejects empty text; length limits belong to callers.
    /// If persisting fails the appended chunks are dropped again.
    #[instrument(skip_all, fields(text_len = doc.text.len()))]
    pub fn add_document(&self, doc: NewDocument) -> Result<AddOutcome> {
        let NewDocument { id, title, text, chunk_size } = doc;
        if text.is_empty() {
            return Err(Error::InvalidInput("document text is empty".into()));
        }
        let chunker = Chunker::new(ChunkingConfig::new(chunk_size.or(Some(self.settings.chunk_size))));
        let pieces = chunker.split(&text);
        let vectors = self.embedder.embed_batch(&pieces)?;
        let dims = self.embedder.dim();
        if let Some(bad) = vectors.iter().find(|v| v.len() != dims) {
            return Err(Error::DimensionMismatch { expected: dims, found: bad.len() });
        }
        let document_id = id.filter(|id| !id.is_empty()).unwrap_or_else(new_id);
        let chunks_added = pieces.len();

        let mut guard = self.write()?;
        let state = &mut *guard;
        let before = state.index.chunks.len();
        for (text, vector) in pieces.into_iter().zip(vectors) {
            state.index.chunks.push(Chunk { id: new_id(), doc_id: document_id.clone(), title: title.clone(), text, vector });
        }
        if let Err(e) = self.store.save(&state.index) {
            state.index.chunks.truncate(before);
            return Err(e);
        }
        for chunk in &state.index.chunks[before..] {
            state.corpus.add_text(&chunk.text);
        }
        info!(document_id = %document_id, chunks_added, total_chunks = state.index.chunks.len(), "document ingested");
        Ok(AddOutcome { document_id, chunks_added })
    }

    /// Top-`k` documents for `query`; `k` defaults to `default_k` and is
    /// clamped to `[1, max_k]`. An empty index yields no items.
    #[instrument(skip_all, fields(query_len = query.len()))]
    pub fn search(&self, query: &str, k: Option<usize>) -> Result<SearchResponse> {
        let k = k.unwrap_or(self.settings.default_k).clamp(1, self.settings.max_k);
        let query_vec = self.embedder.embed_text(query)?;

        let state = self.read()?;
        let ranked = rank_by_cosine(&query_vec, &state.index.chunks);
        let pool = &ranked[..candidate_pool_size(k, ranked.len())];

        let params = Bm25Params { k1: self.settings.bm25_k1, b: self.settings.bm25_b };
        let scorer = Bm25Scorer::new(&state.corpus, params, query);
        let mut lexical: Vec<f64> = pool.iter().map(|hit| scorer.score(&hit.chunk.text)).collect();
        normalize_by_max(&mut lexical);

        let weights = FusionWeights { vector: self.settings.vector_weight, lexical: self.settings.lexical_weight() };
        let fused = fuse(pool, &lexical, weights);
        let limits = AggregationLimits {
            fragments_per_document: self.settings.fragments_per_document,
            max_excerpt_chars: self.settings.max_excerpt_chars,
        };
        let items = aggregate_by_document(&fused, limits, k);
        debug!(k, pool = pool.len(), items = items.len(), "search complete");
        Ok(SearchResponse { query: query.to_string(), items })
    }

    pub fn stats(&self) -> Result<IndexStats> {
        Ok(self.read()?.index.stats())
    }
}

impl SearchEngine for KnowledgeBase {
    fn add_document(&self, doc: NewDocument) -> Result<AddOutcome> {
        Self::add_document(self, doc)
    }

    fn search(&self, query: &str, k: Option<usize>) -> Result<SearchResponse> {
        Self::search(self, query, k)
    }

    fn stats(&self) -> Result<IndexStats> {
        Self::stats(self)
    }
}

fn new_id() -> String {
    Uuid::new_v4().simple().to_string()
}
