/// `true` if `text` contains `ident` as a whole identifier, not as a
/// substring of a longer one (e.g. `d` must not match inside `data`).
pub(crate) fn text_mentions_ident(text: &str, ident: &str) -> bool {
    if ident.is_empty() {
        return false;
    }
    text.match_indices(ident).any(|(start, _)| {
        let before_ok = text[..start]
            .chars()
            .next_back()
            .is_none_or(|c| !is_ident_char(c));
        let end = start + ident.len();
        let after_ok = text[end..].chars().next().is_none_or(|c| !is_ident_char(c));
        before_ok && after_ok
    })
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}
