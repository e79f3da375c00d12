//! kbase-core
//!
//! Domain types, error taxonomy, storage/embedding traits, configuration and
//! the sentence chunker shared by every other `kbase-*` crate.

pub mod chunker;
pub mod config;
pub mod error;
pub mod traits;
pub mod types;
