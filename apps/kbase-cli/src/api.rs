//! Request/response types for the outer surface.
//!
//! Limits that the engine only documents (text length, result count) are
//! enforced here before anything reaches the index.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use kbase_core::error::Error as EngineError;
use kbase_core::traits::SearchEngine;
use kbase_core::types::{DocumentId, IndexStats, NewDocument, SearchResponse};

pub const MIN_TEXT_CHARS: usize = 10;
pub const MAX_TEXT_CHARS: usize = 200_000;
pub const DEFAULT_K: usize = 5;
pub const MAX_K: usize = 10;

#[derive(Debug, Error)]
pub enum RequestError {
    #[error("text_too_short: text must be at least 10 characters, got {0}")]
    TextTooShort(usize),
    #[error("text_too_long: text must be at most 200000 characters, got {0}")]
    TextTooLong(usize),
    #[error("missing_query: query must not be empty")]
    MissingQuery,
    #[error(transparent)]
    Engine(#[from] EngineError),
}

impl RequestError {
    /// Stable machine-readable code.
    pub fn code(&self) -> &'static str {
        match self {
            RequestError::TextTooShort(_) => "text_too_short",
            RequestError::TextTooLong(_) => "text_too_long",
            RequestError::MissingQuery => "missing_query",
            RequestError::Engine(_) => "engine_error",
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AddTextRequest {
    #[serde(default)]
    pub title: Option<String>,
    pub text: String,
}

impl AddTextRequest {
    pub fn new(text: impl Into<String>) -> Self {
        Self { title: None, text: text.into() }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn validate(&self) -> Result<(), RequestError> {
        let chars = self.text.chars().count();
        if chars < MIN_TEXT_CHARS {
            return Err(RequestError::TextTooShort(chars));
        }
        if chars > MAX_TEXT_CHARS {
            return Err(RequestError::TextTooLong(chars));
        }
        Ok(())
    }

    /// Validated document; a blank title is treated as absent.
    pub fn into_document(self) -> Result<NewDocument, RequestError> {
        self.validate()?;
        let mut doc = NewDocument::new(self.text);
        doc.title = self.title.filter(|t| !t.trim().is_empty());
        Ok(doc)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddTextResponse {
    pub document_id: DocumentId,
    pub chunks_added: usize,
    pub stats: IndexStats,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchRequest {
    pub query: String,
    #[serde(default)]
    pub k: Option<usize>,
}

impl SearchRequest {
    pub fn new(query: impl Into<String>, k: Option<usize>) -> Self {
        Self { query: query.into(), k }
    }

    /// Trimmed query and the clamped result count.
    pub fn normalized(&self) -> Result<(&str, usize), RequestError> {
        let query = self.query.trim();
        if query.is_empty() {
            return Err(RequestError::MissingQuery);
        }
        Ok((query, self.k.unwrap_or(DEFAULT_K).clamp(1, MAX_K)))
    }
}

pub fn add_text(engine: &dyn SearchEngine, req: AddTextRequest) -> Result<AddTextResponse, RequestError> {
    let outcome = engine.add_document(req.into_document()?)?;
    Ok(AddTextResponse { document_id: outcome.document_id, chunks_added: outcome.chunks_added, stats: engine.stats()? })
}

pub fn search(engine: &dyn SearchEngine, req: &SearchRequest) -> Result<SearchResponse, RequestError> {
    let (query, k) = req.normalized()?;
    Ok(engine.search(query, Some(k))?)
}

pub fn stats(engine: &dyn SearchEngine) -> Result<IndexStats, RequestError> {
    Ok(engine.stats()?)
}
