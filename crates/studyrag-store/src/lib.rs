#![deny(warnings)]
#![deny(dead_code)]
#![deny(unused_variables)]
#![deny(unused_imports)]

//! Per-document collection store with exact cosine-similarity search.
//!
//! Each named collection owns three parallel sequences (vectors, texts,
//! metadata) and is persisted as one versioned blob under the store root.
//! Writes take a per-collection exclusive lock; reads see a consistent
//! point-in-time view. Collections are fully independent of each other.

mod collection;
mod persist;
pub mod search;
mod store;

pub use collection::Collection;
pub use store::{CollectionStats, CollectionStore};
