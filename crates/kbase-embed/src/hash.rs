use std::hash::Hasher;
use twox_hash::XxHash32;

/// Bucket of `token` in a `dims`-wide vector.
///
/// xxHash32 (seed 0) over the UTF-8 bytes. Any deterministic, well-spread
/// hash would do, but it must never change for an index that already holds
/// vectors built with it.
pub fn hash_token(token: &str, dims: usize) -> usize {
    let mut hasher = XxHash32::with_seed(0);
    hasher.write(token.as_bytes());
    (hasher.finish() as u32 as usize) % dims
}
