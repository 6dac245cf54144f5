use zigscope_diagnostics::Issue;

use crate::class::ByteClass;
use crate::scanner;

/// Normalized view of one file's bytes: line index plus a per-byte
/// classification into code / comment / string / char-literal (spec
/// §4.1).
///
/// Constructed once per analysis call and dropped on return (spec §3
/// Lifecycles) — nothing here is cached across calls.
pub struct SourceContext {
    bytes: Vec<u8>,
    file_path: String,
    /// Byte offset each 1-indexed line starts at; `line_starts[0] == 0`.
    line_starts: Vec<u32>,
    classes: Vec<ByteClass>,
}

impl SourceContext {
    /// Classifies `bytes` in one pass. Any unterminated string, char
    /// literal, or block comment is reported in the returned issue
    /// list rather than as an error: classification always succeeds on
    /// a best-effort basis (spec §4.1 Failure modes).
    pub fn new(bytes: Vec<u8>, file_path: impl Into<String>) -> (Self, Vec<Issue>) {
        let file_path = file_path.into();
        let (classes, line_starts, issues) = scanner::classify(&bytes, &file_path);
        (
            Self {
                bytes,
                file_path,
                line_starts,
                classes,
            },
            issues,
        )
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn file_path(&self) -> &str {
        &self.file_path
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// `true` if `offset` falls inside code (as opposed to a string,
    /// comment, or char literal). Out-of-range offsets are not code.
    pub fn is_in_code(&self, offset: usize) -> bool {
        self.classes.get(offset).is_some_and(ByteClass::is_code)
    }

    pub fn class_at(&self, offset: usize) -> Option<ByteClass> {
        self.classes.get(offset).copied()
    }

    /// Converts a byte offset to a 1-indexed `(line, column)` pair.
    pub fn offset_to_line_col(&self, offset: usize) -> (u32, u32) {
        let offset = offset.min(self.bytes.len()) as u32;
        let line_idx = self.line_starts.partition_point(|&start| start <= offset);
        let line_idx = line_idx.max(1) - 1;
        let line_start = self.line_starts[line_idx];
        (u32::try_from(line_idx).unwrap_or(u32::MAX) + 1, offset - line_start + 1)
    }

    /// Returns the bytes of `line` (1-indexed), excluding any trailing
    /// `\n`/`\r\n`.
    pub fn span_of_line(&self, line: u32) -> &[u8] {
        if line == 0 {
            return &[];
        }
        let idx = (line - 1) as usize;
        let Some(&start) = self.line_starts.get(idx) else {
            return &[];
        };
        let end = self
            .line_starts
            .get(idx + 1)
            .copied()
            .unwrap_or(self.bytes.len() as u32) as usize;
        let mut line_bytes = &self.bytes[start as usize..end];
        if line_bytes.last() == Some(&b'\n') {
            line_bytes = &line_bytes[..line_bytes.len() - 1];
        }
        if line_bytes.last() == Some(&b'\r') {
            line_bytes = &line_bytes[..line_bytes.len() - 1];
        }
        line_bytes
    }

    pub fn line_count(&self) -> u32 {
        self.line_starts.len() as u32
    }

    /// Iterates over `(offset, byte)` pairs restricted to code bytes,
    /// skipping strings/comments/char-literals without the caller
    /// having to check [`SourceContext::is_in_code`] itself.
    pub fn code_bytes(&self) -> impl Iterator<Item = (usize, u8)> + '_ {
        self.bytes
            .iter()
            .copied()
            .enumerate()
            .filter(|&(offset, _)| self.is_in_code(offset))
    }

    /// Returns the code text in `range`, verbatim including non-code
    /// bytes if the range straddles a boundary (callers that need a
    /// pure-code slice should pre-check with [`Self::is_in_code`]).
    pub fn text(&self, range: std::ops::Range<usize>) -> &str {
        std::str::from_utf8(&self.bytes[range]).unwrap_or_default()
    }
}
