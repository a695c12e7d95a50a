//! Overlapping-window text chunker.
//!
//! Splits document text into windows of at most `chunk_size` characters with
//! `chunk_overlap` characters carried over between consecutive windows.
//! Cuts prefer semantic boundaries — paragraph, then line, then sentence,
//! then word — before giving up; a single token longer than the window is
//! kept whole rather than cut mid-word.
//!
//! Each chunk receives a deterministic id derived from its source path and
//! position, so repeated runs upsert the same ids.

use std::collections::HashMap;

use crate::models::{Chunk, Document};

/// Boundary preference order for cuts.
const SEPARATORS: [&str; 4] = ["\n\n", "\n", ". ", " "];

/// Configurable text splitter.
pub struct TextSplitter {
    chunk_size: usize,
    overlap: usize,
}

impl TextSplitter {
    /// Create a splitter. `overlap` must be smaller than `chunk_size`
    /// (enforced by config validation).
    pub fn new(chunk_size: usize, overlap: usize) -> Self {
        Self {
            chunk_size,
            overlap,
        }
    }

    /// Split every document, assigning per-source contiguous chunk indices.
    ///
    /// Documents from the same file (e.g. pages of one PDF) continue the same
    /// index sequence, keeping chunk ids unique per source. Chunk order
    /// within a document is monotonic.
    pub fn split_documents(&self, docs: &[Document]) -> Vec<Chunk> {
        let mut next_index: HashMap<&str, usize> = HashMap::new();
        let mut chunks = Vec::new();

        for doc in docs {
            let counter = next_index.entry(doc.source.as_str()).or_insert(0);
            for window in self.split_text(&doc.content) {
                chunks.push(Chunk::new(&doc.source, *counter, window));
                *counter += 1;
            }
        }

        chunks
    }

    /// Split text into overlapping windows. Whitespace-only input produces
    /// no windows.
    pub fn split_text(&self, text: &str) -> Vec<String> {
        let mut windows = Vec::new();
        let mut rest = text.trim();

        while !rest.is_empty() {
            if rest.len() <= self.chunk_size {
                windows.push(rest.to_string());
                break;
            }

            let cut = self.find_cut(rest);
            let piece = rest[..cut].trim();
            if !piece.is_empty() {
                windows.push(piece.to_string());
            }

            let start = self.next_start(rest, cut);
            rest = rest[start..].trim_start();
        }

        windows
    }

    /// Find the byte offset to cut at: the last preferred boundary within the
    /// first `chunk_size` characters. When the head of the text is a single
    /// token longer than the window, extend to the end of that token.
    fn find_cut(&self, text: &str) -> usize {
        let limit = floor_char_boundary(text, self.chunk_size);
        let window = &text[..limit];

        for sep in SEPARATORS {
            if let Some(pos) = window.rfind(sep) {
                if pos > 0 {
                    return pos + sep.len();
                }
            }
        }

        // No boundary inside the window: keep the oversized token whole.
        text[limit..]
            .find(char::is_whitespace)
            .map(|p| limit + p)
            .unwrap_or(text.len())
    }

    /// Where the next window starts: up to `overlap` characters before the
    /// cut, snapped forward to a word start so the overlap never replays a
    /// partial token.
    fn next_start(&self, text: &str, cut: usize) -> usize {
        if cut <= self.overlap {
            return cut;
        }

        let mut start = cut - self.overlap;
        while start > 0 && !text.is_char_boundary(start) {
            start -= 1;
        }
        if start == 0 {
            return cut;
        }

        let mid_word = !text[..start].ends_with(char::is_whitespace);
        if mid_word {
            match text[start..cut]
                .char_indices()
                .find(|(_, c)| c.is_whitespace())
            {
                Some((pos, c)) => start + pos + c.len_utf8(),
                None => cut,
            }
        } else {
            start
        }
    }
}

fn floor_char_boundary(text: &str, mut index: usize) -> usize {
    if index >= text.len() {
        return text.len();
    }
    while index > 0 && !text.is_char_boundary(index) {
        index -= 1;
    }
    index
}
