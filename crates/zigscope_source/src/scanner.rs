use zigscope_diagnostics::{Issue, IssueKind, Severity};

use crate::class::ByteClass;

/// Scanner state while classifying bytes. Kept separate from
/// [`ByteClass`] because a block comment additionally tracks nesting
/// depth, which callers never need to see.
enum State {
    Code,
    LineComment,
    BlockComment { depth: u32, start: usize },
    StringLiteral { start: usize },
    CharLiteral { start: usize },
    /// Zig-style `\\...` multiline string line.
    MultilineString,
}

/// Single forward pass classifying every byte of `bytes` and locating
/// line starts, per spec §4.1.
///
/// Returns the per-byte classification array, the table of line-start
/// offsets (`line_starts[0] == 0`), and any `parse_failure` diagnostics
/// produced by unterminated constructs.
pub(crate) fn classify(
    bytes: &[u8],
    file_path: &str,
) -> (Vec<ByteClass>, Vec<u32>, Vec<Issue>) {
    let mut classes = Vec::with_capacity(bytes.len());
    let mut line_starts = vec![0u32];
    let mut issues = Vec::new();
    let mut state = State::Code;
    let mut i = 0usize;

    while i < bytes.len() {
        let b = bytes[i];
        match &mut state {
            State::Code => {
                if b == b'\n' {
                    classes.push(ByteClass::Code);
                    line_starts.push((i + 1) as u32);
                    i += 1;
                } else if b == b'/' && bytes.get(i + 1) == Some(&b'/') {
                    classes.push(ByteClass::LineComment);
                    classes.push(ByteClass::LineComment);
                    i += 2;
                    state = State::LineComment;
                } else if b == b'/' && bytes.get(i + 1) == Some(&b'*') {
                    classes.push(ByteClass::BlockComment);
                    classes.push(ByteClass::BlockComment);
                    let start = i;
                    i += 2;
                    state = State::BlockComment { depth: 1, start };
                } else if b == b'"' {
                    classes.push(ByteClass::StringLiteral);
                    let start = i;
                    i += 1;
                    state = State::StringLiteral { start };
                } else if b == b'\'' {
                    classes.push(ByteClass::CharLiteral);
                    let start = i;
                    i += 1;
                    state = State::CharLiteral { start };
                } else if b == b'\\'
                    && bytes.get(i + 1) == Some(&b'\\')
                    && at_line_start(bytes, &line_starts, i)
                {
                    classes.push(ByteClass::StringLiteral);
                    classes.push(ByteClass::StringLiteral);
                    i += 2;
                    state = State::MultilineString;
                } else {
                    classes.push(ByteClass::Code);
                    i += 1;
                }
            }
            State::LineComment => {
                if b == b'\n' {
                    classes.push(ByteClass::Code);
                    line_starts.push((i + 1) as u32);
                    i += 1;
                    state = State::Code;
                } else {
                    classes.push(ByteClass::LineComment);
                    i += 1;
                }
            }
            State::MultilineString => {
                if b == b'\n' {
                    classes.push(ByteClass::Code);
                    line_starts.push((i + 1) as u32);
                    i += 1;
                    state = State::Code;
                } else {
                    classes.push(ByteClass::StringLiteral);
                    i += 1;
                }
            }
            State::BlockComment { depth, start } => {
                if b == b'/' && bytes.get(i + 1) == Some(&b'*') {
                    classes.push(ByteClass::BlockComment);
                    classes.push(ByteClass::BlockComment);
                    *depth += 1;
                    i += 2;
                } else if b == b'*' && bytes.get(i + 1) == Some(&b'/') {
                    classes.push(ByteClass::BlockComment);
                    classes.push(ByteClass::BlockComment);
                    *depth -= 1;
                    i += 2;
                    if *depth == 0 {
                        state = State::Code;
                    }
                } else {
                    if b == b'\n' {
                        line_starts.push((i + 1) as u32);
                    }
                    classes.push(ByteClass::BlockComment);
                    i += 1;
                }
            }
            State::StringLiteral { start } => {
                if b == b'\\' && i + 1 < bytes.len() {
                    classes.push(ByteClass::StringLiteral);
                    classes.push(ByteClass::StringLiteral);
                    i += 2;
                } else if b == b'"' {
                    classes.push(ByteClass::StringLiteral);
                    i += 1;
                    state = State::Code;
                } else if b == b'\n' {
                    // Unterminated before end of line: treat as a
                    // best-effort failure at the opening quote.
                    issues.push(unterminated_issue(file_path, bytes, *start, "string literal"));
                    classes.push(ByteClass::StringLiteral);
                    line_starts.push((i + 1) as u32);
                    i += 1;
                    state = State::Code;
                } else {
                    classes.push(ByteClass::StringLiteral);
                    i += 1;
                }
            }
            State::CharLiteral { start } => {
                if b == b'\\' && i + 1 < bytes.len() {
                    classes.push(ByteClass::CharLiteral);
                    classes.push(ByteClass::CharLiteral);
                    i += 2;
                } else if b == b'\'' {
                    classes.push(ByteClass::CharLiteral);
                    i += 1;
                    state = State::Code;
                } else if b == b'\n' {
                    issues.push(unterminated_issue(file_path, bytes, *start, "char literal"));
                    classes.push(ByteClass::CharLiteral);
                    line_starts.push((i + 1) as u32);
                    i += 1;
                    state = State::Code;
                } else {
                    classes.push(ByteClass::CharLiteral);
                    i += 1;
                }
            }
        }
    }

    match state {
        State::StringLiteral { start } => {
            issues.push(unterminated_issue(file_path, bytes, start, "string literal"));
        }
        State::CharLiteral { start } => {
            issues.push(unterminated_issue(file_path, bytes, start, "char literal"));
        }
        State::BlockComment { start, .. } => {
            issues.push(unterminated_issue(file_path, bytes, start, "block comment"));
        }
        State::Code | State::LineComment | State::MultilineString => {}
    }

    debug_assert_eq!(classes.len(), bytes.len());
    (classes, line_starts, issues)
}

fn at_line_start(bytes: &[u8], line_starts: &[u32], offset: usize) -> bool {
    let Some(&last_start) = line_starts.last() else {
        return offset == 0;
    };
    (last_start as usize..offset).all(|j| matches!(bytes[j], b' ' | b'\t'))
}

fn unterminated_issue(file_path: &str, bytes: &[u8], offset: usize, what: &str) -> Issue {
    let (line, column) = line_col_of(bytes, offset);
    Issue::new(
        file_path,
        line,
        column,
        Severity::Error,
        IssueKind::ParseFailure,
        format!("unterminated {what}"),
    )
}

fn line_col_of(bytes: &[u8], offset: usize) -> (u32, u32) {
    let mut line = 1u32;
    let mut last_newline = None;
    for (i, &b) in bytes.iter().enumerate().take(offset) {
        if b == b'\n' {
            line += 1;
            last_newline = Some(i);
        }
    }
    let column = match last_newline {
        Some(nl) => (offset - nl) as u32,
        None => (offset + 1) as u32,
    };
    (line, column)
}
