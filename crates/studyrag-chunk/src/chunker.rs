use studyrag_core::error::{Error, Result};
use studyrag_core::types::{Chunk, PageText};

/// Window size and overlap, validated at construction.
///
/// `overlap < size` is required: the advance step moves the window start by
/// `size - overlap` characters, so an overlap at or above the size would
/// never make forward progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkConfig {
    size: usize,
    overlap: usize,
}

impl ChunkConfig {
    pub fn new(size: usize, overlap: usize) -> Result<Self> {
        if size == 0 || overlap >= size {
            return Err(Error::InvalidChunkConfig { size, overlap });
        }
        Ok(Self { size, overlap })
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn overlap(&self) -> usize {
        self.overlap
    }
}

impl Default for ChunkConfig {
    fn default() -> Self {
        Self {
            size: 1000,
            overlap: 200,
        }
    }
}

/// Splits raw per-page text into overlapping fixed-size chunks.
#[derive(Debug, Clone, Copy, Default)]
pub struct Chunker {
    config: ChunkConfig,
}

/// Collapse whitespace runs to a single space, drop characters outside the
/// keep-set (word characters, space, and `. , ! ? ; : ( ) - '`), then trim.
pub fn clean_text(text: &str) -> String {
    let mut collapsed = String::with_capacity(text.len());
    let mut in_space = false;
    for c in text.chars() {
        if c.is_whitespace() {
            if !in_space {
                collapsed.push(' ');
                in_space = true;
            }
        } else {
            collapsed.push(c);
            in_space = false;
        }
    }
    let kept: String = collapsed.chars().filter(|&c| keep(c)).collect();
    kept.trim().to_string()
}

fn keep(c: char) -> bool {
    c.is_alphanumeric()
        || c == '_'
        || c == ' '
        || matches!(c, '.' | ',' | '!' | '?' | ';' | ':' | '(' | ')' | '-' | '\'')
}

/// Index of the nearest sentence boundary in `[start, end)`, scanning
/// backward from `end`. A boundary is `'. '`, `'! '`, `'? '` (index of the
/// punctuation char, with the space still inside the window) or a newline.
fn last_boundary(chars: &[char], start: usize, end: usize) -> Option<usize> {
    let mut i = end;
    while i > start {
        i -= 1;
        match chars[i] {
            '\n' => return Some(i),
            '.' | '!' | '?' if i + 1 < end && chars[i + 1] == ' ' => return Some(i),
            _ => {}
        }
    }
    None
}

impl Chunker {
    pub fn new(config: ChunkConfig) -> Self {
        Self { config }
    }

    /// Chunk one text. Ids start at 0 and `page_number` is 1; use
    /// [`Chunker::chunk_pages`] for multi-page documents.
    pub fn chunk(&self, text: &str) -> Vec<Chunk> {
        self.chunk_page(text, 1)
    }

    /// Chunk every page and stamp each chunk with its page number.
    ///
    /// `chunk_id` is unique across the whole document, monotonically
    /// increasing across pages, never reset per page.
    pub fn chunk_pages(&self, pages: &[PageText]) -> Vec<Chunk> {
        let mut all = Vec::new();
        let mut next_id = 0u32;
        for page in pages {
            for mut chunk in self.chunk_page(&page.text, page.page_number) {
                chunk.chunk_id = next_id;
                next_id += 1;
                all.push(chunk);
            }
        }
        all
    }

    fn chunk_page(&self, text: &str, page_number: u32) -> Vec<Chunk> {
        let cleaned = clean_text(text);
        let chars: Vec<char> = cleaned.chars().collect();
        let len = chars.len();
        let size = self.config.size;
        let overlap = self.config.overlap;

        let mut chunks = Vec::new();
        let mut chunk_id = 0u32;
        let mut start = 0usize;
        while start < len {
            let mut end = start + size;
            if end < len {
                // Snap only when the shortened window still advances the
                // next start past the current one; a boundary sitting right
                // at the window start must not stall the loop.
                if let Some(b) = last_boundary(&chars, start, end) {
                    if b + 1 > start + overlap {
                        end = b + 1;
                    }
                }
            }
            let slice_end = end.min(len);
            let body: String = chars[start..slice_end].iter().collect();
            let body = body.trim();
            if !body.is_empty() {
                chunks.push(Chunk {
                    chunk_id,
                    text: body.to_string(),
                    start_char: start,
                    end_char: slice_end,
                    char_count: body.chars().count(),
                    page_number,
                });
                chunk_id += 1;
            }
            start = end - overlap;
        }
        chunks
    }
}
