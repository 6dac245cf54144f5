//! Source normalization and byte classification (spec §4.1).
//!
//! Everything downstream — the scope tracker and both rule engines —
//! consults a [`SourceContext`] before trusting a pattern match
//! against raw bytes, so that the word `allocator` inside a doc
//! comment never triggers detection.

mod class;
mod context;
mod scanner;

pub use class::ByteClass;
pub use context::SourceContext;

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    #[test]
    fn classification_partitions_every_byte() {
        let src = b"const a = 1; // comment\n/* block */ \"str\\\"ing\" 'c'".to_vec();
        let (ctx, issues) = SourceContext::new(src.clone(), "t.zig");
        assert!(issues.is_empty());
        assert_eq!(ctx.len(), src.len());
        for i in 0..src.len() {
            assert!(ctx.class_at(i).is_some());
        }
    }

    #[test]
    fn word_inside_comment_is_not_code() {
        let src = b"// allocator\nconst x = 1;".to_vec();
        let (ctx, _) = SourceContext::new(src, "t.zig");
        let word_offset = 3; // inside "allocator"
        assert!(!ctx.is_in_code(word_offset));
        let x_offset = 19; // "x" in "const x"
        assert!(ctx.is_in_code(x_offset));
    }

    #[test]
    fn word_inside_string_is_not_code() {
        let src = br#"const s = "allocator";"#.to_vec();
        let (ctx, _) = SourceContext::new(src, "t.zig");
        assert!(!ctx.is_in_code(12));
    }

    #[test]
    fn nested_block_comments_track_depth() {
        let src = b"/* outer /* inner */ still comment */ code".to_vec();
        let (ctx, issues) = SourceContext::new(src.clone(), "t.zig");
        assert!(issues.is_empty());
        let code_start = src.len() - 4;
        assert!(ctx.is_in_code(code_start));
    }

    #[test]
    fn unterminated_string_emits_one_parse_failure_and_keeps_earlier_code_analyzable() {
        let src = b"const a = 1;\nconst b = \"oops".to_vec();
        let (ctx, issues) = SourceContext::new(src, "t.zig");
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].kind, zigscope_diagnostics::IssueKind::ParseFailure);
        assert!(ctx.is_in_code(6)); // "a" in the first, well-formed line
    }

    #[test]
    fn unterminated_block_comment_emits_one_parse_failure() {
        let (_, issues) = SourceContext::new(b"const a = 1; /* never closed".to_vec(), "t.zig");
        assert_eq!(issues.len(), 1);
    }

    #[test]
    fn empty_source_has_no_issues_and_one_line() {
        let (ctx, issues) = SourceContext::new(Vec::new(), "t.zig");
        assert!(issues.is_empty());
        assert_eq!(ctx.line_count(), 1);
    }

    #[test_case(0, 1, 1; "start of file")]
    #[test_case(5, 1, 6; "mid first line")]
    fn offset_to_line_col_first_line(offset: usize, expected_line: u32, expected_col: u32) {
        let (ctx, _) = SourceContext::new(b"const a = 1;\nconst b = 2;".to_vec(), "t.zig");
        assert_eq!(ctx.offset_to_line_col(offset), (expected_line, expected_col));
    }

    #[test]
    fn offset_to_line_col_second_line() {
        let (ctx, _) = SourceContext::new(b"const a = 1;\nconst b = 2;".to_vec(), "t.zig");
        // offset 13 is the 'c' of the second `const`.
        assert_eq!(ctx.offset_to_line_col(13), (2, 1));
    }

    #[test]
    fn span_of_line_strips_newline() {
        let (ctx, _) = SourceContext::new(b"first\nsecond\n".to_vec(), "t.zig");
        assert_eq!(ctx.span_of_line(1), b"first");
        assert_eq!(ctx.span_of_line(2), b"second");
    }
}
