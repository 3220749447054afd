use serde::{Deserialize, Serialize};
use studyrag_core::types::ChunkMetadata;

/// Parallel rows of one document's retrievable chunks.
///
/// Invariant: the three sequences are equal in length at all times and
/// index `i` refers to the same logical chunk in each. The vector
/// dimensionality is fixed by the first appended row.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Collection {
    pub vectors: Vec<Vec<f32>>,
    pub documents: Vec<String>,
    pub metadatas: Vec<ChunkMetadata>,
}

impl Collection {
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Established dimensionality, `None` while the collection is empty.
    pub fn dim(&self) -> Option<usize> {
        self.vectors.first().map(Vec::len)
    }
}
