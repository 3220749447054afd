//! Retrieval configuration.
//!
//! Uses Figment to merge built-in defaults, `studyrag.toml`, and `APP_*`
//! env vars. Retrieval depths and the history window are policy, not
//! mechanism, so they live here rather than in the engine code.

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalConfig {
    /// Directory holding one durable blob per collection.
    pub storage_dir: String,
    /// Maximum characters per chunk.
    pub chunk_size: usize,
    /// Characters shared between consecutive chunks.
    pub chunk_overlap: usize,
    /// Chunks retrieved for direct question answering.
    pub answer_k: usize,
    /// Chunks retrieved for a whole-document summary.
    pub summary_k: usize,
    /// Chunks retrieved for topic/quiz flows.
    pub topic_k: usize,
    /// Trailing conversation turns rendered into the prompt.
    pub history_turns: usize,
    /// Generation parameters forwarded to the external generator.
    pub max_tokens: usize,
    pub temperature: f32,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            storage_dir: "./collections".to_string(),
            chunk_size: 1000,
            chunk_overlap: 200,
            answer_k: 5,
            summary_k: 15,
            topic_k: 10,
            history_turns: 6,
            max_tokens: 4096,
            temperature: 0.7,
        }
    }
}

impl RetrievalConfig {
    pub fn load() -> anyhow::Result<Self> {
        let figment = Figment::from(Serialized::defaults(Self::default()))
            .merge(Toml::file("studyrag.toml"))
            .merge(Env::prefixed("APP_"));
        figment
            .extract()
            .map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }

    /// Storage directory with `~` and `${VAR}` expanded.
    pub fn storage_path(&self) -> PathBuf {
        expand_path(&self.storage_dir)
    }
}

/// Expand a user-provided path string:
/// - Expands leading '~' to the user's home directory
/// - Expands ${VAR} and $VAR environment variables
/// - Returns a PathBuf without attempting to canonicalize
pub fn expand_path<S: AsRef<str>>(input: S) -> PathBuf {
    let s = input.as_ref();
    let expanded_env = shellexpand::env(s).unwrap_or(std::borrow::Cow::Borrowed(s));
    let expanded = shellexpand::tilde(&expanded_env);
    PathBuf::from(expanded.as_ref())
}
