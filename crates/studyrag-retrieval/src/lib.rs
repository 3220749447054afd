#![deny(warnings)]
#![deny(dead_code)]
#![deny(unused_variables)]
#![deny(unused_imports)]

//! Retrieval orchestration.
//!
//! Composes the chunker, the collection store, and an external [`Embedder`]
//! into the flows the answer/summary/quiz layers consume: ingest a
//! document, build a ranked context with source attribution, render the
//! bounded conversation window, and assemble the final prompt. The
//! assembled [`GenerationRequest`] is handed to the caller's generator;
//! nothing here ever invokes generation.
//!
//! [`Embedder`]: studyrag_core::traits::Embedder
//! [`GenerationRequest`]: studyrag_core::types::GenerationRequest

pub mod context;
pub mod history;
mod pipeline;

pub use context::{RetrievedContext, SourceRef};
pub use pipeline::{PreparedQuery, RetrievalPipeline};
