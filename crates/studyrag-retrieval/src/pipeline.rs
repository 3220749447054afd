use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::{debug, info};

use studyrag_chunk::{ChunkConfig, Chunker};
use studyrag_core::config::RetrievalConfig;
use studyrag_core::error::{Error, Result};
use studyrag_core::traits::Embedder;
use studyrag_core::types::{ChatTurn, GenerationRequest, PageText};
use studyrag_store::CollectionStore;

use crate::context::{self, RetrievedContext, SourceRef};
use crate::history;

/// Bias query for whole-document summaries.
const SUMMARY_QUERY: &str = "main topics and key points";
/// Bias query for quiz flows without an explicit topic.
const QUIZ_QUERY: &str = "key concepts and important information";

/// A context-grounded prompt ready for the caller's generator, with the
/// source attributions that belong in the final response.
#[derive(Debug, Clone)]
pub struct PreparedQuery {
    pub request: GenerationRequest,
    pub sources: Vec<SourceRef>,
}

/// Composes chunking, storage, and the external embedder into the
/// retrieval flows. Owns no collection data; the store is shared.
pub struct RetrievalPipeline {
    store: Arc<CollectionStore>,
    embedder: Box<dyn Embedder>,
    config: RetrievalConfig,
}

impl RetrievalPipeline {
    pub fn new(
        store: Arc<CollectionStore>,
        embedder: Box<dyn Embedder>,
        config: RetrievalConfig,
    ) -> Self {
        Self {
            store,
            embedder,
            config,
        }
    }

    pub fn config(&self) -> &RetrievalConfig {
        &self.config
    }

    /// Chunk a document's pages, embed them, and populate a fresh
    /// collection. Returns the number of stored chunks.
    pub fn ingest_document(
        &self,
        collection: &str,
        pages: &[PageText],
        base_tags: &BTreeMap<String, String>,
    ) -> Result<usize> {
        let chunk_config = ChunkConfig::new(self.config.chunk_size, self.config.chunk_overlap)?;
        let chunks = Chunker::new(chunk_config).chunk_pages(pages);
        info!(collection, pages = pages.len(), chunks = chunks.len(), "ingesting document");

        self.store.create(collection)?;
        if chunks.is_empty() {
            return Ok(0);
        }
        let texts: Vec<String> = chunks.iter().map(|c| c.text.clone()).collect();
        let vectors = self.embedder.embed_batch(&texts)?;
        self.store.append(collection, &chunks, &vectors, base_tags)
    }

    /// Top-`k` chunks for `query_vector`, joined into a generation-ready
    /// context with per-chunk source attribution.
    pub fn build_context(
        &self,
        collection: &str,
        query_vector: &[f32],
        k: usize,
    ) -> Result<RetrievedContext> {
        let results = self.store.query(collection, query_vector, k)?;
        debug!(collection, k, hits = results.len(), "built context");
        Ok(context::assemble(&results))
    }

    /// Trailing conversation turns rendered for the prompt; empty when the
    /// history is empty.
    pub fn conversation_window(&self, history: &[ChatTurn]) -> String {
        history::conversation_window(history, self.config.history_turns)
    }

    /// Prepare a direct question: embed it, retrieve `answer_k` chunks, and
    /// assemble the full prompt with the bounded conversation window.
    pub fn ask(
        &self,
        collection: &str,
        question: &str,
        history: &[ChatTurn],
    ) -> Result<PreparedQuery> {
        let query_vector = self.embed_one(question)?;
        let retrieved = self.build_context(collection, &query_vector, self.config.answer_k)?;
        let conversation = self.conversation_window(history);
        let prompt = answer_prompt(&retrieved.context, &conversation, question);
        Ok(PreparedQuery {
            request: GenerationRequest {
                prompt,
                max_tokens: self.config.max_tokens,
                temperature: self.config.temperature,
            },
            sources: retrieved.sources,
        })
    }

    /// Context for a summary. Whole document: retrieval biased by a fixed
    /// topical query at `summary_k` depth. Specific page: the store's
    /// page-indexed lookup, so page scope is a real filter rather than a
    /// keyword re-query.
    pub fn summary_context(
        &self,
        collection: &str,
        page: Option<u32>,
    ) -> Result<RetrievedContext> {
        match page {
            Some(page_number) => {
                let rows = self.store.page_chunks(collection, page_number)?;
                let context = rows
                    .iter()
                    .map(|(text, _)| text.as_str())
                    .collect::<Vec<_>>()
                    .join("\n\n");
                let sources = rows
                    .iter()
                    .map(|(text, meta)| SourceRef {
                        preview: context::preview(text),
                        page_number: meta.page_number,
                        // exact page match, not a similarity estimate
                        relevance: 1.0,
                        chunk_id: meta.chunk_id,
                    })
                    .collect();
                Ok(RetrievedContext { context, sources })
            }
            None => {
                let query_vector = self.embed_one(SUMMARY_QUERY)?;
                self.build_context(collection, &query_vector, self.config.summary_k)
            }
        }
    }

    /// Context for quiz generation, biased by `topic` when given.
    pub fn quiz_context(&self, collection: &str, topic: Option<&str>) -> Result<RetrievedContext> {
        let query = topic.unwrap_or(QUIZ_QUERY);
        let query_vector = self.embed_one(query)?;
        self.build_context(collection, &query_vector, self.config.topic_k)
    }

    fn embed_one(&self, text: &str) -> Result<Vec<f32>> {
        let mut vectors = self.embedder.embed_batch(&[text.to_string()])?;
        if vectors.is_empty() {
            return Err(Error::Embedding(
                "embedder returned no vector for query".to_string(),
            ));
        }
        Ok(vectors.remove(0))
    }
}

fn answer_prompt(context: &str, conversation: &str, question: &str) -> String {
    format!(
        "You are a helpful study assistant. Answer the student's question based on the \
         provided context from their study materials.\n\n\
         Context from the document:\n{context}{conversation}\n\
         Student's question: {question}\n\n\
         Provide a clear, accurate answer based on the context. If the context doesn't \
         contain enough information to fully answer the question, acknowledge this and \
         provide what information is available. If the student is asking a follow-up \
         question, use the previous conversation to provide a more contextual answer."
    )
}
