//! Context assembly from ranked search results.

use studyrag_core::types::SearchResult;

/// Characters of a chunk shown in a source attribution preview.
pub const PREVIEW_CHARS: usize = 200;

/// Source attribution for one retrieved chunk.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceRef {
    /// First [`PREVIEW_CHARS`] chars of the chunk, `...`-suffixed if cut.
    pub preview: String,
    pub page_number: u32,
    /// `1 - distance`, rounded to 3 decimal places.
    pub relevance: f32,
    pub chunk_id: u32,
}

/// Ranked chunk texts joined for the generator, plus their attributions.
#[derive(Debug, Clone, Default)]
pub struct RetrievedContext {
    pub context: String,
    pub sources: Vec<SourceRef>,
}

impl RetrievedContext {
    pub fn chunk_count(&self) -> usize {
        self.sources.len()
    }
}

/// Join the chunk texts with blank lines and attach one [`SourceRef`] per
/// row, preserving rank order.
pub fn assemble(results: &[SearchResult]) -> RetrievedContext {
    let context = results
        .iter()
        .map(|r| r.text.as_str())
        .collect::<Vec<_>>()
        .join("\n\n");
    let sources = results
        .iter()
        .map(|r| SourceRef {
            preview: preview(&r.text),
            page_number: r.metadata.page_number,
            relevance: round3(1.0 - r.distance),
            chunk_id: r.metadata.chunk_id,
        })
        .collect();
    RetrievedContext { context, sources }
}

pub(crate) fn preview(text: &str) -> String {
    let mut iter = text.char_indices();
    match iter.nth(PREVIEW_CHARS) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}

fn round3(x: f32) -> f32 {
    (x * 1000.0).round() / 1000.0
}
