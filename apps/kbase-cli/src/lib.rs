//! Command-line front end for a kbase knowledge base: request validation at the
//! boundary ([`api`]) and bulk directory ingestion ([`ingest`]).

pub mod api;
pub mod ingest;
