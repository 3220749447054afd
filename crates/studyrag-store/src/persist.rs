//! Durable collection blobs.
//!
//! One self-contained JSON file per collection, named after it, holding a
//! version tag plus the three parallel sequences. Saves overwrite the whole
//! blob; there is no incremental form. The schema is deliberately explicit
//! so the on-disk format is not coupled to any runtime's object model.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use studyrag_core::error::{Error, Result};
use studyrag_core::types::ChunkMetadata;
use tracing::debug;

use crate::collection::Collection;

const BLOB_VERSION: u32 = 1;

#[derive(Serialize, Deserialize)]
struct CollectionBlob {
    version: u32,
    dim: usize,
    vectors: Vec<Vec<f32>>,
    documents: Vec<String>,
    metadatas: Vec<ChunkMetadata>,
}

pub fn blob_path(root: &Path, name: &str) -> PathBuf {
    root.join(format!("{name}.json"))
}

/// Whole-collection overwrite. Writes a sibling temp file first and renames
/// it into place so a failed save never truncates the previous blob.
pub fn save(root: &Path, name: &str, collection: &Collection) -> Result<()> {
    let blob = CollectionBlob {
        version: BLOB_VERSION,
        dim: collection.dim().unwrap_or(0),
        vectors: collection.vectors.clone(),
        documents: collection.documents.clone(),
        metadatas: collection.metadatas.clone(),
    };
    let body = serde_json::to_vec(&blob).map_err(|e| Error::Serialization(e.to_string()))?;

    let path = blob_path(root, name);
    let tmp = root.join(format!("{name}.json.tmp"));
    fs::write(&tmp, body).map_err(|source| Error::Persistence {
        path: tmp.clone(),
        source,
    })?;
    fs::rename(&tmp, &path).map_err(|source| Error::Persistence {
        path: path.clone(),
        source,
    })?;
    debug!(collection = name, rows = collection.len(), "saved blob");
    Ok(())
}

/// Load a collection blob; `Ok(None)` when no blob exists for `name`.
pub fn load(root: &Path, name: &str) -> Result<Option<Collection>> {
    let path = blob_path(root, name);
    let body = match fs::read(&path) {
        Ok(body) => body,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(source) => return Err(Error::Persistence { path, source }),
    };
    let blob: CollectionBlob =
        serde_json::from_slice(&body).map_err(|e| Error::Serialization(e.to_string()))?;
    if blob.version != BLOB_VERSION {
        return Err(Error::Serialization(format!(
            "unsupported blob version {} (expected {BLOB_VERSION})",
            blob.version
        )));
    }
    if blob.vectors.len() != blob.documents.len() || blob.documents.len() != blob.metadatas.len() {
        return Err(Error::Serialization(format!(
            "parallel sequences disagree: {} vectors, {} documents, {} metadatas",
            blob.vectors.len(),
            blob.documents.len(),
            blob.metadatas.len()
        )));
    }
    for v in &blob.vectors {
        if v.len() != blob.dim {
            return Err(Error::Serialization(format!(
                "vector of {} dims in a blob declaring dim {}",
                v.len(),
                blob.dim
            )));
        }
    }
    debug!(collection = name, rows = blob.documents.len(), "loaded blob");
    Ok(Some(Collection {
        vectors: blob.vectors,
        documents: blob.documents,
        metadatas: blob.metadatas,
    }))
}

/// Remove the durable copy. Missing blobs are not an error.
pub fn remove(root: &Path, name: &str) -> Result<()> {
    let path = blob_path(root, name);
    match fs::remove_file(&path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(source) => Err(Error::Persistence { path, source }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn populated() -> Collection {
        Collection {
            vectors: vec![vec![0.1, 0.2], vec![0.3, 0.4]],
            documents: vec!["first".to_string(), "second".to_string()],
            metadatas: vec![
                ChunkMetadata {
                    chunk_id: 0,
                    page_number: 1,
                    char_count: 5,
                    tags: BTreeMap::from([("filename".to_string(), "a.pdf".to_string())]),
                },
                ChunkMetadata {
                    chunk_id: 1,
                    page_number: 2,
                    char_count: 6,
                    tags: BTreeMap::new(),
                },
            ],
        }
    }

    #[test]
    fn save_then_load_round_trips_element_wise() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let original = populated();
        save(tmp.path(), "doc", &original).expect("save");
        let loaded = load(tmp.path(), "doc").expect("load").expect("present");
        assert_eq!(loaded, original);
    }

    #[test]
    fn missing_blob_loads_as_none() {
        let tmp = tempfile::tempdir().expect("tempdir");
        assert!(load(tmp.path(), "ghost").expect("load").is_none());
    }

    #[test]
    fn unsupported_version_is_rejected() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let body = r#"{"version":99,"dim":0,"vectors":[],"documents":[],"metadatas":[]}"#;
        fs::write(blob_path(tmp.path(), "doc"), body).expect("write");
        assert!(matches!(
            load(tmp.path(), "doc"),
            Err(Error::Serialization(_))
        ));
    }

    #[test]
    fn ragged_parallel_sequences_are_rejected() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let body = r#"{"version":1,"dim":2,"vectors":[[0.1,0.2]],"documents":[],"metadatas":[]}"#;
        fs::write(blob_path(tmp.path(), "doc"), body).expect("write");
        assert!(matches!(
            load(tmp.path(), "doc"),
            Err(Error::Serialization(_))
        ));
    }

    #[test]
    fn tampered_dim_field_is_rejected() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let body = concat!(
            r#"{"version":1,"dim":2,"vectors":[[0.1,0.2,0.3]],"documents":["a"],"#,
            r#""metadatas":[{"chunk_id":0,"page_number":1,"char_count":1}]}"#
        );
        fs::write(blob_path(tmp.path(), "doc"), body).expect("write");
        assert!(matches!(
            load(tmp.path(), "doc"),
            Err(Error::Serialization(_))
        ));
    }

    #[test]
    fn ragged_row_lengths_are_rejected() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let body = concat!(
            r#"{"version":1,"dim":2,"vectors":[[0.1,0.2],[0.3]],"documents":["a","b"],"#,
            r#""metadatas":[{"chunk_id":0,"page_number":1,"char_count":1},"#,
            r#"{"chunk_id":1,"page_number":1,"char_count":1}]}"#
        );
        fs::write(blob_path(tmp.path(), "doc"), body).expect("write");
        assert!(matches!(
            load(tmp.path(), "doc"),
            Err(Error::Serialization(_))
        ));
    }

    #[test]
    fn save_overwrites_the_previous_blob() {
        let tmp = tempfile::tempdir().expect("tempdir");
        save(tmp.path(), "doc", &populated()).expect("first save");
        let mut grown = populated();
        grown.vectors.push(vec![0.5, 0.6]);
        grown.documents.push("third".to_string());
        grown.metadatas.push(ChunkMetadata {
            chunk_id: 2,
            page_number: 2,
            char_count: 5,
            tags: BTreeMap::new(),
        });
        save(tmp.path(), "doc", &grown).expect("second save");
        let loaded = load(tmp.path(), "doc").expect("load").expect("present");
        assert_eq!(loaded.len(), 3);
        assert_eq!(loaded, grown);
    }
}
