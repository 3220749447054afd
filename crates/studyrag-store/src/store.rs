use std::collections::{BTreeMap, HashMap};
use std::path::PathBuf;
use std::sync::{Arc, RwLock};

use tracing::{info, warn};

use studyrag_core::error::{Error, Result};
use studyrag_core::types::{Chunk, ChunkMetadata, SearchResult};

use crate::collection::Collection;
use crate::persist;
use crate::search;

/// Owns every named collection. One instance per process, passed by
/// reference to all consumers; there is no hidden global registry.
///
/// The outer map lock is held only to look up or insert a collection
/// handle. Row data sits behind a per-collection `RwLock`, so mutations of
/// one collection serialize against its readers without blocking any other
/// collection.
pub struct CollectionStore {
    root: PathBuf,
    collections: RwLock<HashMap<String, Arc<RwLock<Collection>>>>,
}

/// Snapshot counters for one collection. Never an error, even for names
/// that do not exist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionStats {
    pub name: String,
    pub count: usize,
    pub exists: bool,
}

impl CollectionStore {
    /// Open a store rooted at `root`, creating the directory if needed.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        std::fs::create_dir_all(&root).map_err(|source| Error::Persistence {
            path: root.clone(),
            source,
        })?;
        Ok(Self {
            root,
            collections: RwLock::new(HashMap::new()),
        })
    }

    /// Initialize an empty collection under `name`.
    pub fn create(&self, name: &str) -> Result<()> {
        validate_name(name)?;
        let mut map = write_map(&self.collections);
        if map.contains_key(name) || persist::blob_path(&self.root, name).exists() {
            return Err(Error::DuplicateCollection(name.to_string()));
        }
        map.insert(
            name.to_string(),
            Arc::new(RwLock::new(Collection::default())),
        );
        info!(collection = name, "created collection");
        Ok(())
    }

    /// Append chunk rows in order and persist the whole collection.
    ///
    /// `base_tags` (uploader identity, source filename, ...) are merged into
    /// every row's metadata tags; the closed per-chunk fields always come
    /// from the chunk itself. All validation happens before any mutation,
    /// so a failed append leaves the collection exactly as it was.
    pub fn append(
        &self,
        name: &str,
        chunks: &[Chunk],
        vectors: &[Vec<f32>],
        base_tags: &BTreeMap<String, String>,
    ) -> Result<usize> {
        let handle = self.handle(name)?;
        if chunks.len() != vectors.len() {
            return Err(Error::Embedding(format!(
                "embedder returned {} vectors for {} chunks",
                vectors.len(),
                chunks.len()
            )));
        }
        if chunks.is_empty() {
            return Ok(0);
        }

        let mut collection = write_collection(&handle);
        let expected = collection.dim().unwrap_or_else(|| vectors[0].len());
        for v in vectors {
            if v.len() != expected {
                return Err(Error::DimensionMismatch {
                    expected,
                    actual: v.len(),
                });
            }
        }

        for (chunk, vector) in chunks.iter().zip(vectors) {
            collection.vectors.push(vector.clone());
            collection.documents.push(chunk.text.clone());
            collection.metadatas.push(ChunkMetadata {
                chunk_id: chunk.chunk_id,
                page_number: chunk.page_number,
                char_count: chunk.char_count,
                tags: base_tags.clone(),
            });
        }
        info!(collection = name, appended = chunks.len(), total = collection.len(), "appended chunks");

        // A failed save must not disturb the in-memory rows, only surface.
        if let Err(e) = persist::save(&self.root, name, &collection) {
            warn!(collection = name, error = %e, "save after append failed");
            return Err(e);
        }
        Ok(chunks.len())
    }

    /// Rank the collection's rows against `query_vector`, best first.
    ///
    /// Loads the collection from durable storage transparently when it is
    /// not resident. An empty collection yields an empty result, not an
    /// error.
    pub fn query(&self, name: &str, query_vector: &[f32], k: usize) -> Result<Vec<SearchResult>> {
        let handle = self.handle(name)?;
        let collection = read_collection(&handle);
        if collection.is_empty() {
            return Ok(Vec::new());
        }
        let ranked = search::rank(&collection.vectors, query_vector, k)?;
        Ok(ranked
            .into_iter()
            .map(|r| SearchResult {
                text: collection.documents[r.index].clone(),
                metadata: collection.metadatas[r.index].clone(),
                distance: r.distance,
            })
            .collect())
    }

    /// All rows of one page, in chunk order. Structured alternative to
    /// re-querying with a "page N" keyword string.
    pub fn page_chunks(&self, name: &str, page_number: u32) -> Result<Vec<(String, ChunkMetadata)>> {
        let handle = self.handle(name)?;
        let collection = read_collection(&handle);
        Ok(collection
            .documents
            .iter()
            .zip(&collection.metadatas)
            .filter(|(_, meta)| meta.page_number == page_number)
            .map(|(text, meta)| (text.clone(), meta.clone()))
            .collect())
    }

    pub fn stats(&self, name: &str) -> CollectionStats {
        match self.handle(name) {
            Ok(handle) => {
                let collection = read_collection(&handle);
                CollectionStats {
                    name: name.to_string(),
                    count: collection.len(),
                    exists: true,
                }
            }
            Err(_) => CollectionStats {
                name: name.to_string(),
                count: 0,
                exists: false,
            },
        }
    }

    /// Remove both the in-memory and the durable copy. Idempotent: deleting
    /// a name that was never created succeeds.
    pub fn delete(&self, name: &str) -> Result<()> {
        validate_name(name)?;
        let removed = write_map(&self.collections).remove(name).is_some();
        persist::remove(&self.root, name)?;
        if removed {
            info!(collection = name, "deleted collection");
        }
        Ok(())
    }

    /// Resident handle for `name`, loading the durable blob on a miss.
    ///
    /// The disk read happens outside the map lock: a slow cold load of one
    /// collection must not block lookups of any other. Racing loaders may
    /// each read the blob; the first to insert wins and the losers discard
    /// their copy.
    fn handle(&self, name: &str) -> Result<Arc<RwLock<Collection>>> {
        validate_name(name)?;
        if let Some(handle) = read_map(&self.collections).get(name) {
            return Ok(Arc::clone(handle));
        }
        let loaded = persist::load(&self.root, name)?
            .ok_or_else(|| Error::CollectionNotFound(name.to_string()))?;
        let mut map = write_map(&self.collections);
        if let Some(handle) = map.get(name) {
            return Ok(Arc::clone(handle));
        }
        let handle = Arc::new(RwLock::new(loaded));
        map.insert(name.to_string(), Arc::clone(&handle));
        Ok(handle)
    }
}

/// Collection names become file names, so only a conservative character set
/// is accepted; anything with a path separator never reaches the fs layer.
fn validate_name(name: &str) -> Result<()> {
    let ok = !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
        && name != "."
        && name != "..";
    if ok {
        Ok(())
    } else {
        Err(Error::InvalidCollectionName(name.to_string()))
    }
}

// Lock poisoning only happens after a panic in another thread; recovering
// the inner data keeps readers usable instead of cascading the panic.
fn read_map(
    lock: &RwLock<HashMap<String, Arc<RwLock<Collection>>>>,
) -> std::sync::RwLockReadGuard<'_, HashMap<String, Arc<RwLock<Collection>>>> {
    lock.read().unwrap_or_else(std::sync::PoisonError::into_inner)
}

fn write_map(
    lock: &RwLock<HashMap<String, Arc<RwLock<Collection>>>>,
) -> std::sync::RwLockWriteGuard<'_, HashMap<String, Arc<RwLock<Collection>>>> {
    lock.write().unwrap_or_else(std::sync::PoisonError::into_inner)
}

fn read_collection(lock: &RwLock<Collection>) -> std::sync::RwLockReadGuard<'_, Collection> {
    lock.read().unwrap_or_else(std::sync::PoisonError::into_inner)
}

fn write_collection(lock: &RwLock<Collection>) -> std::sync::RwLockWriteGuard<'_, Collection> {
    lock.write().unwrap_or_else(std::sync::PoisonError::into_inner)
}
