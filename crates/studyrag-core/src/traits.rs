use crate::error::Result;
use crate::types::GenerationRequest;

/// External embedding function: text in, fixed-length vector out.
///
/// Output order matches input order and `dim()` is constant for a given
/// model configuration. Implementations may be slow and blocking; callers
/// schedule them off latency-sensitive paths.
pub trait Embedder: Send + Sync {
    fn dim(&self) -> usize;
    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;
}

/// External text generator. The kernel only produces [`GenerationRequest`]
/// values; it never inspects provider-specific response shapes.
pub trait Generator: Send + Sync {
    fn generate(&self, request: &GenerationRequest) -> Result<String>;
}
