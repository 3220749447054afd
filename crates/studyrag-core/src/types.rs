//! Domain types shared by the chunking, storage, and retrieval crates.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A bounded, possibly overlapping span of a document's cleaned text.
///
/// - `chunk_id`: unique across the whole document, monotonically increasing
///   across pages
/// - `start_char`/`end_char`: char offsets into the cleaned page text
/// - `char_count`: chars in `text` after trimming
/// - `page_number`: 1-based source page
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Chunk {
    pub chunk_id: u32,
    pub text: String,
    pub start_char: usize,
    pub end_char: usize,
    pub char_count: usize,
    pub page_number: u32,
}

/// Per-row metadata stored alongside each vector.
///
/// The known fields are a closed record; `tags` is the extension map for
/// caller-supplied values such as uploader or source filename. A tag named
/// like a closed field stays a tag and never overrides it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChunkMetadata {
    pub chunk_id: u32,
    pub page_number: u32,
    pub char_count: usize,
    #[serde(default)]
    pub tags: BTreeMap<String, String>,
}

/// One ranked row returned by a query. Ephemeral, never persisted.
///
/// `distance` is `1 - cosine_similarity`, in `[0, 2]`, lower is closer.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchResult {
    pub text: String,
    pub metadata: ChunkMetadata,
    pub distance: f32,
}

/// Raw text of one source page, as handed over by the external extractor.
#[derive(Debug, Clone)]
pub struct PageText {
    pub page_number: u32,
    pub text: String,
}

/// Who produced a conversation turn.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Role {
    Student,
    Assistant,
}

/// One entry of the ordered conversation log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: Role,
    pub content: String,
}

/// A fully assembled prompt plus generation parameters.
///
/// Handed to the caller's [`crate::traits::Generator`]; the kernel never
/// invokes generation itself.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub prompt: String,
    pub max_tokens: usize,
    pub temperature: f32,
}
