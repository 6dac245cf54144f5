use zigscope_source::{ByteClass, SourceContext};

/// A single lexical token produced over code-classified bytes. This is
/// not a general-purpose lexer for the source language — it exists
/// only to give [`crate::builder`] enough structure (identifiers,
/// punctuation, string contents) to recognize declaration shapes
/// without building an AST (spec §1 Non-goals: "Full parsing to an
/// abstract syntax tree").
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum TokenKind {
    /// An identifier or keyword, e.g. `fn`, `const`, `allocator`.
    Ident(String),
    /// A dequoted string literal's contents, e.g. `unit: Foo: bar`.
    Str(String),
    /// Any other single code byte that isn't whitespace: punctuation,
    /// operators, digits of a number literal (numbers are never
    /// inspected by the scope tracker, so they're left unclassified).
    Punct(u8),
}

#[derive(Debug, Clone)]
pub(crate) struct Token {
    pub kind: TokenKind,
    /// Byte offset of the token's first byte in the source.
    pub offset: usize,
}

/// Tokenizes `ctx` into a flat list, skipping whitespace and comments
/// entirely and collapsing each string literal into one [`TokenKind::Str`]
/// token (its content, with surrounding quotes stripped and `\"`
/// un-escaped — good enough to recover a test-name literal; it is not
/// a general escape-sequence decoder).
pub(crate) fn tokenize(ctx: &SourceContext) -> Vec<Token> {
    let bytes = ctx.bytes();
    let mut tokens = Vec::new();
    let mut i = 0usize;

    while i < bytes.len() {
        let class = ctx.class_at(i).unwrap_or(ByteClass::Code);
        match class {
            ByteClass::Code => {
                let b = bytes[i];
                if b.is_ascii_whitespace() {
                    i += 1;
                } else if is_ident_start(b) {
                    let start = i;
                    let mut end = i + 1;
                    while end < bytes.len()
                        && ctx.class_at(end) == Some(ByteClass::Code)
                        && is_ident_continue(bytes[end])
                    {
                        end += 1;
                    }
                    let text = ctx.text(start..end).to_string();
                    tokens.push(Token {
                        kind: TokenKind::Ident(text),
                        offset: start,
                    });
                    i = end;
                } else {
                    tokens.push(Token {
                        kind: TokenKind::Punct(b),
                        offset: i,
                    });
                    i += 1;
                }
            }
            ByteClass::StringLiteral => {
                let start = i;
                let mut content = String::new();
                // Skip the opening quote (if present at this offset).
                if bytes[i] == b'"' {
                    i += 1;
                }
                while i < bytes.len() && ctx.class_at(i) == Some(ByteClass::StringLiteral) {
                    if bytes[i] == b'"' {
                        i += 1;
                        break;
                    }
                    if bytes[i] == b'\\' && i + 1 < bytes.len() {
                        content.push(bytes[i + 1] as char);
                        i += 2;
                        continue;
                    }
                    content.push(bytes[i] as char);
                    i += 1;
                }
                tokens.push(Token {
                    kind: TokenKind::Str(content),
                    offset: start,
                });
            }
            ByteClass::LineComment | ByteClass::BlockComment | ByteClass::CharLiteral => {
                i += 1;
            }
        }
    }

    tokens
}

fn is_ident_start(b: u8) -> bool {
    b.is_ascii_alphabetic() || b == b'_'
}

fn is_ident_continue(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}
