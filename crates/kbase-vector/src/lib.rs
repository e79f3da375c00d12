//! kbase-vector
//!
//! Exhaustive cosine ranking over stored chunk vectors, plus the stores that
//! persist the whole index: a JSON file on disk and an in-memory stand-in.

pub mod memory;
pub mod search;
pub mod store;

pub use memory::InMemoryStore;
pub use search::{candidate_pool_size, rank_by_cosine};
pub use store::JsonFileStore;
