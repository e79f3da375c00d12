//! Sentence-boundary chunking of raw document text.
//!
//! Text is cut after every delimiter (newlines and sentence-ending
//! punctuation, ASCII and CJK full-width). Segments accumulate into a buffer
//! that is emitted once it reaches the target size, so every chunk except the
//! document tail is at least `chunk_size` characters. Chunks concatenate back
//! to the exact input.

pub const DEFAULT_CHUNK_SIZE: usize = 800;
pub const MIN_CHUNK_SIZE: usize = 300;
pub const MAX_CHUNK_SIZE: usize = 1500;

const CHUNK_DELIMITERS: [char; 10] = ['\n', '\r', '。', '！', '？', '；', ';', '.', '?', '!'];
const SENTENCE_TERMINALS: [char; 9] = ['。', '；', ';', '.', '!', '?', '！', '？', '\n'];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkingConfig {
    pub chunk_size: usize,
}

impl ChunkingConfig {
    /// Target size in characters, clamped to `[MIN_CHUNK_SIZE, MAX_CHUNK_SIZE]`.
    pub fn new(chunk_size: Option<usize>) -> Self {
        let chunk_size = chunk_size.unwrap_or(DEFAULT_CHUNK_SIZE).clamp(MIN_CHUNK_SIZE, MAX_CHUNK_SIZE);
        Self { chunk_size }
    }
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self::new(None)
    }
}

#[derive(Debug, Default)]
pub struct Chunker {
    config: ChunkingConfig,
}

impl Chunker {
    pub fn new(config: ChunkingConfig) -> Self {
        Self { config }
    }

    pub fn chunk_size(&self) -> usize {
        self.config.chunk_size
    }

    pub fn split(&self, text: &str) -> Vec<String> {
        let mut chunks = Vec::new();
        let mut buf = String::new();
        let mut buf_chars = 0usize;
        for segment in text.split_inclusive(|c: char| CHUNK_DELIMITERS.contains(&c)) {
            buf.push_str(segment);
            buf_chars += segment.chars().count();
            if buf_chars >= self.config.chunk_size {
                chunks.push(std::mem::take(&mut buf));
                buf_chars = 0;
            }
        }
        if !buf.trim().is_empty() {
            chunks.push(buf);
        } else if let Some(last) = chunks.last_mut() {
            // blank tail stays attached to the previous chunk
            last.push_str(&buf);
        }
        chunks
    }
}

/// Splits text into sentence-like segments, each keeping its terminal character.
pub fn sentences(text: &str) -> impl Iterator<Item = &str> {
    text.split_inclusive(|c: char| SENTENCE_TERMINALS.contains(&c))
}

/// Collapses every whitespace run to a single space and trims both ends.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chunk_size_is_clamped() {
        assert_eq!(ChunkingConfig::new(None).chunk_size, 800);
        assert_eq!(ChunkingConfig::new(Some(10)).chunk_size, 300);
        assert_eq!(ChunkingConfig::new(Some(10_000)).chunk_size, 1500);
        assert_eq!(ChunkingConfig::new(Some(512)).chunk_size, 512);
    }

    #[test]
    fn short_text_is_one_chunk() {
        let text = "Paris is the capital of France. It is a large city.";
        let chunks = Chunker::default().split(text);
        assert_eq!(chunks, vec![text.to_string()]);
    }

    #[test]
    fn delimiter_stays_with_preceding_chunk() {
        let sentence = format!("{}.", "a".repeat(299));
        let text = format!("{sentence}{sentence}tail");
        let chunks = Chunker::new(ChunkingConfig::new(Some(300))).split(&text);
        assert_eq!(chunks.len(), 3);
        assert!(chunks[0].ends_with('.'));
        assert_eq!(chunks[0].chars().count(), 300);
        assert_eq!(chunks[2], "tail");
    }

    #[test]
    fn blank_tail_is_not_a_chunk_but_is_kept() {
        let sentence = format!("{}\n", "b".repeat(300));
        let text = format!("{sentence}  \n ");
        let chunks = Chunker::new(ChunkingConfig::new(Some(300))).split(&text);
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks.concat(), text);
    }

    #[test]
    fn counts_characters_not_bytes() {
        let text = "汉".repeat(299) + "。尾";
        let chunks = Chunker::new(ChunkingConfig::new(Some(300))).split(&text);
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[1], "尾");
    }

    #[test]
    fn whitespace_only_text_yields_no_chunks() {
        assert!(Chunker::default().split(" \n\t ").is_empty());
    }

    #[test]
    fn sentences_keep_terminals() {
        let parts: Vec<&str> = sentences("One. Two! Three").collect();
        assert_eq!(parts, vec!["One.", " Two!", " Three"]);
    }

    #[test]
    fn collapse_whitespace_matches_single_spacing() {
        assert_eq!(collapse_whitespace("  a \n\n b\tc  "), "a b c");
    }
}
