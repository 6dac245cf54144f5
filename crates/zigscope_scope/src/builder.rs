use zigscope_diagnostics::{Issue, IssueKind, Severity};
use zigscope_patterns::CompiledPatternSet;
use zigscope_source::SourceContext;

use crate::ids::ScopeId;
use crate::scope::{Scope, ScopeKind};
use crate::tokenizer::{tokenize, Token, TokenKind};
use crate::tree::ScopeTree;
use crate::variable::{AllocatorOrigin, VariableKind, VariableRecord};

/// A scope that has been triggered by a keyword (`fn`, `test`,
/// `struct`, `if`, ...) but whose body `{` hasn't been reached yet.
/// Consumed by the next [`Punct(b'{')`](TokenKind::Punct) the main
/// scan loop sees (spec §4.3 "Open triggers... on the matching
/// opening brace").
enum Pending {
    Function {
        name: Option<String>,
        return_type_text: Option<String>,
        params: Vec<(String, String, usize)>,
    },
    Test {
        name: Option<String>,
    },
    Named(ScopeKind, Option<String>),
    Plain(ScopeKind),
}

/// One entry of the brace stack. [`Frame::Scope`] corresponds to a
/// real [`Scope`] being built; [`Frame::Transparent`] matches a brace
/// pair that doesn't open a scope of its own — a `switch`'s outer
/// braces (spec §3 Scope kinds has `switch_case` but no bare
/// `switch`: the cases are the scopes, the switch body itself is not).
enum Frame {
    Scope(ScopeId),
    Transparent,
    /// A depth-limit-exceeded placeholder (spec §4.3 "Depth limit"):
    /// keeps brace matching balanced without allocating a real scope.
    Suppressed,
}

/// Builds a [`ScopeTree`] from one file's [`SourceContext`] in a
/// single forward scan over its token stream (spec §4.3 Algorithm).
pub(crate) struct Builder<'a> {
    ctx: &'a SourceContext,
    allocator_patterns: &'a CompiledPatternSet,
    max_depth: u32,
    /// Overrides `ctx.file_path()` in issues this builder raises itself
    /// (the depth-limit warning), set via
    /// [`crate::ScopeTrackerBuilder::with_file_name`].
    file_name: Option<&'a str>,
    scopes: Vec<Scope>,
    variables: Vec<VariableRecord>,
    stack: Vec<Frame>,
    issues: Vec<Issue>,
    depth_limit_reported: bool,
}

impl<'a> Builder<'a> {
    pub(crate) fn new(
        ctx: &'a SourceContext,
        allocator_patterns: &'a CompiledPatternSet,
        max_depth: u32,
        file_name: Option<&'a str>,
    ) -> Self {
        Self {
            ctx,
            allocator_patterns,
            max_depth,
            file_name,
            scopes: Vec::new(),
            variables: Vec::new(),
            stack: Vec::new(),
            issues: Vec::new(),
            depth_limit_reported: false,
        }
    }

    fn file_path(&self) -> &str {
        self.file_name.unwrap_or_else(|| self.ctx.file_path())
    }

    pub(crate) fn build(mut self) -> (ScopeTree, Vec<Issue>) {
        let file_id = self.push_scope(ScopeKind::File, None, None, 0);
        self.stack.push(Frame::Scope(file_id));

        let tokens = tokenize(self.ctx);
        let mut pending: Option<Pending> = None;
        let mut pending_bound_name: Option<String> = None;
        let mut pos = 0usize;

        while pos < tokens.len() {
            match &tokens[pos].kind {
                TokenKind::Ident(word) => match word.as_str() {
                    "fn" => {
                        let (p, pend) = self.parse_fn(&tokens, pos);
                        pending = Some(pend);
                        pos = p;
                    }
                    "test" => {
                        let (p, pend) = self.parse_test(&tokens, pos);
                        pending = Some(pend);
                        pos = p;
                    }
                    "struct" | "enum" | "union" => {
                        pending = Some(Pending::Named(
                            type_decl_kind(word),
                            pending_bound_name.take(),
                        ));
                        pos += 1;
                    }
                    "error" if punct_at(&tokens, pos + 1) == Some(b'{') => {
                        pending = Some(Pending::Named(ScopeKind::ErrorSet, pending_bound_name.take()));
                        pos += 1;
                    }
                    "if" => {
                        pos = self.skip_condition_header(&tokens, pos + 1);
                        pending = Some(Pending::Plain(ScopeKind::If));
                    }
                    "while" => {
                        pos = self.skip_condition_header(&tokens, pos + 1);
                        pending = Some(Pending::Plain(ScopeKind::While));
                    }
                    "for" => {
                        pos = self.skip_condition_header(&tokens, pos + 1);
                        pending = Some(Pending::Plain(ScopeKind::For));
                    }
                    "else" if self.inside_switch_body() => {
                        // A `else => ...` catch-all case label inside a
                        // `switch`, not an `if`/`else` control scope.
                        pos += 1;
                    }
                    "else" => {
                        if ident_at(&tokens, pos + 1).as_deref() == Some("if") {
                            pos = self.skip_condition_header(&tokens, pos + 2);
                            pending = Some(Pending::Plain(ScopeKind::If));
                        } else {
                            pending = Some(Pending::Plain(ScopeKind::Else));
                            pos += 1;
                        }
                    }
                    "switch" => {
                        pos = self.skip_condition_header(&tokens, pos + 1);
                        // The next `{` opens a transparent (non-scope)
                        // frame; cases inside push their own scopes.
                        pos = self.open_switch_body(&tokens, pos);
                    }
                    "const" | "var" => {
                        let (p, bound_name) = self.parse_declaration(&tokens, pos, word == "var");
                        pending_bound_name = bound_name;
                        pos = p;
                    }
                    _ => pos += 1,
                },
                TokenKind::Punct(b'{') => {
                    // Inside a switch body, `pattern => {` opens a
                    // switch_case scope; detected by looking two
                    // tokens back for a `=>` arrow.
                    if pending.is_none() && arrow_immediately_before(&tokens, pos) {
                        pending = Some(Pending::Plain(ScopeKind::SwitchCase));
                    }
                    pos = self.open_brace(&tokens, pos, pending.take());
                }
                TokenKind::Punct(b'}') => {
                    pos = self.close_brace(&tokens, pos);
                }
                TokenKind::Punct(b';') => {
                    // A statement ended without ever reaching a brace:
                    // a braceless `if`/`while`/`for`/`else` body (or a
                    // bare declaration). Whatever control header is
                    // still `pending` never gets a scope of its own;
                    // drop it so the next unrelated `{` — e.g. a
                    // struct-literal initializer in the following
                    // statement — isn't mistaken for that header's
                    // body.
                    pending = None;
                    pending_bound_name = None;
                    pos += 1;
                }
                _ => pos += 1,
            }
        }

        // Best-effort: force-close anything still open at EOF rather
        // than leaving a scope with no `end_offset` (malformed/partial
        // input, not one of spec §4.1's specified failure modes, so no
        // diagnostic is emitted for it).
        let eof = self.ctx.len() as u32;
        while let Some(frame) = self.stack.pop() {
            if let Frame::Scope(id) = frame {
                self.finalize_scope(id, eof);
            }
        }

        let tree = ScopeTree::new(self.scopes, self.variables);
        (tree, self.issues)
    }

    fn current_scope(&self) -> ScopeId {
        self.stack
            .iter()
            .rev()
            .find_map(|f| match f {
                Frame::Scope(id) => Some(*id),
                _ => None,
            })
            .expect("file scope is always on the stack")
    }

    /// `true` when the nearest non-suppressed frame is a `switch`'s
    /// transparent body, i.e. we're scanning case labels rather than
    /// statements.
    fn inside_switch_body(&self) -> bool {
        matches!(self.stack.last(), Some(Frame::Transparent))
    }

    fn scope_depth(&self) -> u32 {
        self.stack
            .iter()
            .filter(|f| matches!(f, Frame::Scope(_)))
            .count() as u32
    }

    fn push_scope(
        &mut self,
        kind: ScopeKind,
        name: Option<String>,
        return_type_text: Option<String>,
        start_offset: u32,
    ) -> ScopeId {
        let id = ScopeId::new(self.scopes.len());
        let (start_line, _) = self.ctx.offset_to_line_col(start_offset as usize);
        let parent = self.stack.iter().rev().find_map(|f| match f {
            Frame::Scope(pid) => Some(*pid),
            _ => None,
        });
        let depth = self.scope_depth();
        self.scopes.push(Scope {
            id,
            kind,
            parent,
            children: Vec::new(),
            start_offset,
            end_offset: start_offset,
            start_line,
            end_line: start_line,
            name,
            return_type_text,
            depth,
        });
        if let Some(parent) = parent {
            self.scopes[parent.index()].children.push(id);
        }
        id
    }

    fn finalize_scope(&mut self, id: ScopeId, end_offset: u32) {
        let (end_line, _) = self.ctx.offset_to_line_col(end_offset as usize);
        let scope = &mut self.scopes[id.index()];
        scope.end_offset = end_offset;
        scope.end_line = end_line;
    }

    fn open_brace(&mut self, tokens: &[Token], pos: usize, pending: Option<Pending>) -> usize {
        let offset = tokens[pos].offset as u32;

        let Some(pending) = pending else {
            if is_struct_literal_brace(tokens, pos) {
                // Not a scope: a `Type{ ... }` / `.{ ... }` value
                // literal. Skip its balanced contents so nested `{`
                // inside it never gets mistaken for a block.
                return skip_balanced(tokens, pos, b'{', b'}') + 1;
            }
            self.open_plain(ScopeKind::Block, offset);
            return pos + 1;
        };

        match pending {
            Pending::Function {
                name,
                return_type_text,
                params,
            } => {
                if self.scope_depth() >= self.max_depth {
                    self.report_depth_limit_once(offset);
                    self.stack.push(Frame::Suppressed);
                } else {
                    let id = self.push_scope(ScopeKind::Function, name, return_type_text, offset);
                    self.stack.push(Frame::Scope(id));
                    for (name, type_text, decl_offset) in params {
                        self.declare_parameter(id, name, type_text, decl_offset);
                    }
                }
            }
            Pending::Test { name } => {
                self.open_plain_named(ScopeKind::Test, name, offset);
            }
            Pending::Named(kind, name) => {
                self.open_plain_named(kind, name, offset);
            }
            Pending::Plain(kind) => {
                self.open_plain(kind, offset);
            }
        }
        pos + 1
    }

    fn open_plain(&mut self, kind: ScopeKind, offset: u32) {
        self.open_plain_named(kind, None, offset);
    }

    fn open_plain_named(&mut self, kind: ScopeKind, name: Option<String>, offset: u32) {
        if self.scope_depth() >= self.max_depth {
            self.report_depth_limit_once(offset);
            self.stack.push(Frame::Suppressed);
            return;
        }
        let id = self.push_scope(kind, name, None, offset);
        self.stack.push(Frame::Scope(id));
    }

    fn report_depth_limit_once(&mut self, offset: u32) {
        if self.depth_limit_reported {
            return;
        }
        self.depth_limit_reported = true;
        let (line, column) = self.ctx.offset_to_line_col(offset as usize);
        self.issues.push(Issue::new(
            self.file_path(),
            line,
            column,
            Severity::Warning,
            IssueKind::ParseFailure,
            "scope nesting exceeds configured max_depth; further scopes are not tracked",
        ));
    }

    fn open_switch_body(&mut self, tokens: &[Token], pos: usize) -> usize {
        match tokens.get(pos) {
            Some(t) if matches!(t.kind, TokenKind::Punct(b'{')) => {
                self.stack.push(Frame::Transparent);
                pos + 1
            }
            _ => pos,
        }
    }

    fn close_brace(&mut self, tokens: &[Token], pos: usize) -> usize {
        let offset = tokens_offset(tokens, pos) + 1;
        match self.stack.pop() {
            Some(Frame::Scope(id)) => self.finalize_scope(id, offset),
            Some(Frame::Transparent | Frame::Suppressed) | None => {}
        }
        pos + 1
    }

    /// Parses a `fn name(params) return_type {` header starting at the
    /// `fn` token, returning the index of the opening `{` and a
    /// [`Pending::Function`] describing what to push once it's seen.
    fn parse_fn(&mut self, tokens: &[Token], pos: usize) -> (usize, Pending) {
        let mut i = pos + 1;
        let name = ident_at(tokens, i);
        if name.is_some() {
            i += 1;
        }
        let Some(open_paren) = punct_index_at(tokens, i, b'(') else {
            return (i, Pending::Function {
                name,
                return_type_text: None,
                params: Vec::new(),
            });
        };
        let close_paren = skip_balanced(tokens, open_paren, b'(', b')');
        let params = self.parse_params(tokens, open_paren, close_paren);

        let mut j = close_paren + 1;
        while j < tokens.len() && !matches!(tokens[j].kind, TokenKind::Punct(b'{')) {
            j += 1;
        }
        let return_type_text = if j > close_paren + 1 {
            let start = tokens[close_paren + 1].offset;
            let end = tokens[j.min(tokens.len() - 1)].offset;
            let text = self.ctx.text(start..end).trim().to_string();
            (!text.is_empty()).then_some(text)
        } else {
            None
        };

        (
            j,
            Pending::Function {
                name,
                return_type_text,
                params,
            },
        )
    }

    /// Splits the token range strictly between `open_paren` and
    /// `close_paren` on top-level commas and extracts `(name, type,
    /// decl_offset)` for each parameter (spec §3 Variable Record,
    /// `kind = parameter`).
    fn parse_params(
        &self,
        tokens: &[Token],
        open_paren: usize,
        close_paren: usize,
    ) -> Vec<(String, String, usize)> {
        let mut params = Vec::new();
        if close_paren <= open_paren + 1 {
            return params;
        }
        let mut chunk_start = open_paren + 1;
        let mut depth = 0i32;
        let mut i = chunk_start;
        while i < close_paren {
            match tokens[i].kind {
                TokenKind::Punct(b'(') | TokenKind::Punct(b'[') | TokenKind::Punct(b'{') => {
                    depth += 1;
                }
                TokenKind::Punct(b')') | TokenKind::Punct(b']') | TokenKind::Punct(b'}') => {
                    depth -= 1;
                }
                TokenKind::Punct(b',') if depth == 0 => {
                    if let Some(p) = self.parse_one_param(tokens, chunk_start, i) {
                        params.push(p);
                    }
                    chunk_start = i + 1;
                }
                _ => {}
            }
            i += 1;
        }
        if let Some(p) = self.parse_one_param(tokens, chunk_start, close_paren) {
            params.push(p);
        }
        params
    }

    fn parse_one_param(
        &self,
        tokens: &[Token],
        start: usize,
        end: usize,
    ) -> Option<(String, String, usize)> {
        if start >= end {
            return None;
        }
        let start_offset = tokens[start].offset;
        let end_offset = tokens[end.min(tokens.len()) - 1].offset
            + token_len(&tokens[end.min(tokens.len()) - 1]);
        let text = self.ctx.text(start_offset..end_offset);
        let (name_part, type_part) = text.split_once(':').unwrap_or((text, ""));
        let name = name_part
            .trim()
            .trim_start_matches("comptime")
            .trim()
            .to_string();
        if name.is_empty() || name == "..." {
            return None;
        }
        Some((name, type_part.trim().to_string(), start_offset))
    }

    fn declare_parameter(&mut self, scope: ScopeId, name: String, type_text: String, offset: usize) {
        let (decl_line, decl_column) = self.ctx.offset_to_line_col(offset);
        let allocator_origin = is_allocator_type_text(&type_text).then_some(AllocatorOrigin::Parameter);
        self.variables.push(VariableRecord {
            name,
            declaring_scope: scope,
            decl_line,
            decl_column,
            kind: VariableKind::Parameter,
            type_text,
            allocator_origin,
        });
    }

    /// Parses `test "name" {` or `test name {`, returning the index of
    /// the opening `{`.
    fn parse_test(&mut self, tokens: &[Token], pos: usize) -> (usize, Pending) {
        let mut i = pos + 1;
        let name = match tokens.get(i).map(|t| &t.kind) {
            Some(TokenKind::Str(s)) => {
                i += 1;
                Some(s.clone())
            }
            Some(TokenKind::Ident(s)) => {
                i += 1;
                Some(s.clone())
            }
            _ => None,
        };
        while i < tokens.len() && !matches!(tokens[i].kind, TokenKind::Punct(b'{')) {
            i += 1;
        }
        (i, Pending::Test { name })
    }

    /// Skips a `(...)` condition header (and an optional `|capture|`
    /// binding after it, used by `if`/`while`/`for` payload captures),
    /// returning the index just past it.
    fn skip_condition_header(&mut self, tokens: &[Token], pos: usize) -> usize {
        let Some(open) = punct_index_at(tokens, pos, b'(') else {
            return pos;
        };
        let mut i = skip_balanced(tokens, open, b'(', b')') + 1;
        if matches!(tokens.get(i).map(|t| &t.kind), Some(TokenKind::Punct(b'|'))) {
            i = skip_to_next_byte(tokens, i + 1, b'|') + 1;
        }
        i
    }

    /// Parses `const name [: type] = initializer;` or `var name ...`.
    /// If the initializer is itself a type declaration keyword
    /// (`struct`/`enum`/`union`/`error{`), stops *before* consuming it
    /// and returns the bound name so the caller can attach it as that
    /// type's scope name. Otherwise fully consumes the initializer
    /// (balancing nested brackets) and registers a [`VariableRecord`].
    fn parse_declaration(
        &mut self,
        tokens: &[Token],
        pos: usize,
        is_var: bool,
    ) -> (usize, Option<String>) {
        let decl_offset = tokens[pos].offset;
        let mut i = pos + 1;
        let Some(name) = ident_at(tokens, i) else {
            return (i, None);
        };
        i += 1;

        let mut type_text = String::new();
        if matches!(tokens.get(i).map(|t| &t.kind), Some(TokenKind::Punct(b':'))) {
            let type_start_idx = i + 1;
            let mut j = type_start_idx;
            let mut depth = 0i32;
            while j < tokens.len() {
                match tokens[j].kind {
                    TokenKind::Punct(b'(') | TokenKind::Punct(b'[') => depth += 1,
                    TokenKind::Punct(b')') | TokenKind::Punct(b']') => depth -= 1,
                    TokenKind::Punct(b'=') if depth == 0 => break,
                    TokenKind::Punct(b';') if depth <= 0 => break,
                    _ => {}
                }
                j += 1;
            }
            if j > type_start_idx {
                let start = tokens[type_start_idx].offset;
                let end = tokens[j - 1].offset + token_len(&tokens[j - 1]);
                type_text = self.ctx.text(start..end).trim().to_string();
            }
            i = j;
        }

        if !matches!(tokens.get(i).map(|t| &t.kind), Some(TokenKind::Punct(b'='))) {
            // No initializer (e.g. a bare `var x: T;` field-less decl
            // or the end of the declaration). Register with no
            // allocator origin and stop at the statement end.
            let end = find_statement_end(tokens, i);
            self.register_variable(name, is_var, type_text, String::new(), decl_offset);
            return (end + 1, None);
        }

        // Type-declaration binding: `const Name = struct/enum/union/error{`.
        if let Some(TokenKind::Ident(next)) = tokens.get(i + 1).map(|t| &t.kind) {
            if matches!(next.as_str(), "struct" | "enum" | "union") {
                return (i + 1, Some(name));
            }
            if next == "error" && punct_at(tokens, i + 2) == Some(b'{') {
                return (i + 1, Some(name));
            }
        }

        let init_start = i + 1;
        let mut j = init_start;
        let mut depth = 0i32;
        while j < tokens.len() {
            match tokens[j].kind {
                TokenKind::Punct(b'(') | TokenKind::Punct(b'[') | TokenKind::Punct(b'{') => depth += 1,
                TokenKind::Punct(b')') | TokenKind::Punct(b']') | TokenKind::Punct(b'}') => depth -= 1,
                TokenKind::Punct(b';') if depth <= 0 => break,
                _ => {}
            }
            j += 1;
        }
        let init_text = if j > init_start {
            let start = tokens[init_start].offset;
            let end = tokens[j - 1].offset + token_len(&tokens[j - 1]);
            self.ctx.text(start..end).trim().to_string()
        } else {
            String::new()
        };

        self.register_variable(name, is_var, type_text, init_text, decl_offset);
        (j + 1, None)
    }

    fn register_variable(
        &mut self,
        name: String,
        is_var: bool,
        type_text: String,
        init_text: String,
        decl_offset: usize,
    ) {
        let scope = self.current_scope();
        let (decl_line, decl_column) = self.ctx.offset_to_line_col(decl_offset);
        let allocator_origin = self.classify_initializer(&type_text, &init_text, scope);
        self.variables.push(VariableRecord {
            name,
            declaring_scope: scope,
            decl_line,
            decl_column,
            kind: if is_var {
                VariableKind::LocalVar
            } else {
                VariableKind::LocalConst
            },
            type_text,
            allocator_origin,
        });
    }

    /// Classifies an allocator-bearing declaration per spec §4.3:
    /// arena derivation first, then named-instance pattern matching,
    /// falling back to `Unknown` only when the explicit type looks
    /// like an allocator but nothing else classified it.
    fn classify_initializer(
        &self,
        type_text: &str,
        init_text: &str,
        scope: ScopeId,
    ) -> Option<AllocatorOrigin> {
        if init_text.is_empty() {
            return is_allocator_type_text(type_text).then_some(AllocatorOrigin::Unknown);
        }
        if let Some(base) = derivation_base(init_text) {
            // We need access to the tree being built; since variables
            // declared so far are still in `self.variables`, walk them
            // directly rather than through `ScopeTree` (not built yet).
            if let Some(origin_scope) = self.find_allocator_bearing_var(&base, scope) {
                return Some(AllocatorOrigin::DerivedFromArena(origin_scope, base));
            }
        }
        if let Some(name) = self.allocator_patterns.classify(init_text) {
            return Some(AllocatorOrigin::NamedInstance(name.to_string()));
        }
        is_allocator_type_text(type_text).then_some(AllocatorOrigin::Unknown)
    }

    fn find_allocator_bearing_var(&self, name: &str, from: ScopeId) -> Option<ScopeId> {
        let mut current = Some(from);
        while let Some(id) = current {
            if let Some(var) = self
                .variables
                .iter()
                .rev()
                .find(|v| v.declaring_scope == id && v.name == name)
            {
                if var.allocator_origin.is_some() {
                    return Some(id);
                }
                return None;
            }
            current = self.scopes[id.index()].parent;
        }
        None
    }
}

fn type_decl_kind(word: &str) -> ScopeKind {
    match word {
        "struct" => ScopeKind::Struct,
        "enum" => ScopeKind::Enum,
        "union" => ScopeKind::Union,
        _ => unreachable!("only called for struct/enum/union"),
    }
}

fn is_allocator_type_text(type_text: &str) -> bool {
    !type_text.is_empty() && type_text.contains("Allocator")
}

/// `true` if `init_text` is exactly `<ident>.allocator()` (spec §4.3
/// "e.g., `<ident>.allocator()`"), returning the base identifier.
fn derivation_base(init_text: &str) -> Option<String> {
    let text = init_text.trim().trim_start_matches("try").trim();
    let rest = text.strip_suffix("()")?;
    let rest = rest.strip_suffix(".allocator")?;
    let base = rest.trim();
    is_simple_ident(base).then(|| base.to_string())
}

fn is_simple_ident(text: &str) -> bool {
    !text.is_empty()
        && text.chars().next().is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && text.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn ident_at(tokens: &[Token], pos: usize) -> Option<String> {
    match tokens.get(pos).map(|t| &t.kind) {
        Some(TokenKind::Ident(s)) => Some(s.clone()),
        _ => None,
    }
}

fn punct_at(tokens: &[Token], pos: usize) -> Option<u8> {
    match tokens.get(pos).map(|t| &t.kind) {
        Some(TokenKind::Punct(b)) => Some(*b),
        _ => None,
    }
}

fn punct_index_at(tokens: &[Token], pos: usize, want: u8) -> Option<usize> {
    (punct_at(tokens, pos) == Some(want)).then_some(pos)
}

/// Finds the matching close delimiter for the open delimiter at
/// `open_idx`, returning its index. Falls back to the last token if
/// the input is unbalanced (best-effort, spec §1 non-AST scanner).
fn skip_balanced(tokens: &[Token], open_idx: usize, open: u8, close: u8) -> usize {
    let mut depth = 0i32;
    let mut i = open_idx;
    while i < tokens.len() {
        match tokens[i].kind {
            TokenKind::Punct(b) if b == open => depth += 1,
            TokenKind::Punct(b) if b == close => {
                depth -= 1;
                if depth == 0 {
                    return i;
                }
            }
            _ => {}
        }
        i += 1;
    }
    tokens.len().saturating_sub(1)
}

/// Scans forward from `start` for the next token matching
/// `Punct(byte)`, with no nesting — used for `|capture|` bindings,
/// which can't contain another `|` (spec §4.3 payload captures).
/// Falls back to the last token if `byte` never recurs.
fn skip_to_next_byte(tokens: &[Token], start: usize, byte: u8) -> usize {
    let mut i = start;
    while i < tokens.len() {
        if matches!(tokens[i].kind, TokenKind::Punct(b) if b == byte) {
            return i;
        }
        i += 1;
    }
    tokens.len().saturating_sub(1)
}

fn find_statement_end(tokens: &[Token], pos: usize) -> usize {
    let mut i = pos;
    while i < tokens.len() && !matches!(tokens[i].kind, TokenKind::Punct(b';')) {
        i += 1;
    }
    i
}

fn token_len(token: &Token) -> usize {
    match &token.kind {
        TokenKind::Ident(s) => s.len(),
        TokenKind::Str(s) => s.len() + 2,
        TokenKind::Punct(_) => 1,
    }
}

fn tokens_offset(tokens: &[Token], pos: usize) -> u32 {
    tokens[pos].offset as u32
}

/// `true` when the `{` at `pos` is preceded by a token shape that only
/// ever introduces a struct/anonymous-literal value (`Type{...}` or
/// `.{...}`), as opposed to a statement-position block. A heuristic,
/// not a parser (spec §1 Non-goals) — see `DESIGN.md` for the rule and
/// its false-positive/negative tradeoffs.
fn is_struct_literal_brace(tokens: &[Token], pos: usize) -> bool {
    if pos == 0 {
        return false;
    }
    matches!(
        tokens[pos - 1].kind,
        TokenKind::Ident(_)
            | TokenKind::Punct(b'.')
            | TokenKind::Punct(b'(')
            | TokenKind::Punct(b',')
            | TokenKind::Punct(b'=')
    )
}

fn arrow_immediately_before(tokens: &[Token], pos: usize) -> bool {
    pos >= 1
        && matches!(tokens[pos - 1].kind, TokenKind::Punct(b'>'))
        && pos >= 2
        && matches!(tokens[pos - 2].kind, TokenKind::Punct(b'='))
}
