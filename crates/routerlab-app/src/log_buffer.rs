//! Compare output transcript

/// Append-only transcript of compare output.
///
/// Chunks are kept in arrival order next to their running concatenation, so
/// both the display and the host's `get_output` pull read the text without
/// rebuilding it.
#[derive(Debug, Clone, Default)]
pub struct LogBuffer {
    chunks: Vec<String>,
    text: String,
    /// Bumped on every clear, so observers can tell a reset from a quiet spell.
    generation: u64,
}

impl LogBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `chunk` after everything received so far.
    pub fn append(&mut self, chunk: impl Into<String>) {
        let chunk = chunk.into();
        self.text.push_str(&chunk);
        self.chunks.push(chunk);
    }

    pub fn clear(&mut self) {
        self.chunks.clear();
        self.text.clear();
        self.generation += 1;
    }

    /// The full transcript.
    pub fn snapshot(&self) -> &str {
        &self.text
    }

    pub fn chunks(&self) -> &[String] {
        &self.chunks
    }

    /// Number of chunks appended since the last clear.
    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// The last `max_lines` lines of the transcript.
    pub fn tail_lines(&self, max_lines: usize) -> Vec<&str> {
        let lines: Vec<&str> = self.text.lines().collect();
        let skip = lines.len().saturating_sub(max_lines);
        lines.into_iter().skip(skip).collect()
    }
}
