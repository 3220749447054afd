#![deny(warnings)]
#![deny(dead_code)]
#![deny(unused_variables)]
#![deny(unused_imports)]

//! Deterministic text chunking with overlap.
//!
//! Splits cleaned page text into fixed-size windows that prefer to end on a
//! sentence boundary. Chunking is independent of storage; page numbers and
//! document-wide ids are stamped by [`Chunker::chunk_pages`].

mod chunker;

pub use chunker::{clean_text, ChunkConfig, Chunker};
