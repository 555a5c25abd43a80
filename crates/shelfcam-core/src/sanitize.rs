use std::fmt::Display;

/// Maps any displayable value to a name that is safe as a Dropbox path
/// component and as a local file name.
///
/// Word characters, `-`, `.`, `(` and `)` are kept, everything else becomes
/// `_`. Spaces are allowed by the first pass and then replaced by `_` too, so
/// the output never contains whitespace.
pub fn sanitize_filename(value: impl Display) -> String {
    value
        .to_string()
        .chars()
        .map(|character| if is_allowed(character) { character } else { '_' })
        .map(|character| if character == ' ' { '_' } else { character })
        .collect()
}

pub fn is_sanitized(value: &str) -> bool {
    value
        .chars()
        .all(|character| character != ' ' && is_allowed(character))
}

fn is_allowed(character: char) -> bool {
    character.is_alphanumeric() || matches!(character, '_' | '-' | '.' | '(' | ')' | ' ')
}
