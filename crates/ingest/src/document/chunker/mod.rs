//! Overlapping-window text chunker.
//!
//! Splits extracted document text into an ordered sequence of bounded,
//! whitespace-normalized segments suitable for independent embedding.
//! Windows are cut at the rightmost sentence period or newline when one
//! exists, and consecutive windows re-read the last `overlap` characters
//! before the cut so passages spanning a boundary stay whole in at least
//! one chunk.


// ── Configuration ───────────────────────────────────────────────────────────

/// Chunker parameters. Sizes are in characters of the raw input text.
#[derive(Debug, Clone)]
pub struct ChunkConfig {
    /// Maximum characters per window (default: 1000).
    pub chunk_size: usize,
    /// Characters re-read at the start of the next window (default: 200).
    ///
    /// Callers must keep `overlap < chunk_size`. The algorithm does not
    /// validate this; a violation stalls the cursor instead of failing.
    pub overlap: usize,
}

impl Default for ChunkConfig {
    fn default() -> Self {
        Self {
            chunk_size: 1000,
            overlap: 200,
        }
    }
}

// ── Algorithm ───────────────────────────────────────────────────────────────

/// Split `text` into overlapping, whitespace-normalized chunks.
///
/// The scan runs over the raw text so the break-point search sees the
/// document's real punctuation; normalization (whitespace runs collapse to
/// one space, ends trimmed) applies only to each extracted chunk. Chunks
/// that normalize to the empty string are dropped. Empty input yields an
/// empty vec; input no longer than `chunk_size` yields exactly one chunk.
pub fn chunk_text(text: &str, config: &ChunkConfig) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    let mut chunks = Vec::new();
    let mut start = 0usize;

    while start < chars.len() {
        let window_start = start;
        let end = (start + config.chunk_size).min(chars.len());
        let cut;

        if start + config.chunk_size < chars.len() {
            // Not the final window: prefer the rightmost period or newline.
            match chars[start..end].iter().rposition(|&c| c == '.' || c == '\n') {
                Some(bp) => {
                    cut = window_start + bp + 1;
                    // Re-read the last `overlap` chars before the cut. Clamped
                    // so the cursor always advances when the break lands
                    // inside the overlap region.
                    start = cut.saturating_sub(config.overlap).max(window_start + 1);
                }
                None => {
                    cut = end;
                    // With overlap >= chunk_size (a contract violation) this
                    // advance is zero and the scan never terminates.
                    start += config.chunk_size.saturating_sub(config.overlap);
                }
            }
        } else {
            // Final window: take the remainder.
            cut = end;
            start += config.chunk_size;
        }

        let cleaned = normalize_whitespace(&chars[window_start..cut]);
        if !cleaned.is_empty() {
            chunks.push(cleaned);
        }
    }

    chunks
}

/// Collapse whitespace runs (including newlines) to single spaces and trim.
fn normalize_whitespace(chars: &[char]) -> String {
    let raw: String = chars.iter().collect();
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}
