//! Token classification.
//!
//! Pure functions shared by the definition parser and the resolver: whether
//! a call token is a flag, whether a definition word is a wildcard segment,
//! and flag-name normalization.

/// Marker character introducing flag tokens (`-q`, `--user=apa`).
pub(crate) const FLAG_MARKER: char = '-';

/// True for call tokens that are flags rather than path segments or
/// positional arguments.
pub fn is_flag_token(token: &str) -> bool {
    token.starts_with(FLAG_MARKER)
}

/// True for definition words that denote a wildcard path segment.
///
/// A wildcard is written as an all-uppercase word (`PROJECT`, `USER-ID`):
/// no lowercase characters, at least one uppercase one.
pub fn is_wildcard_segment(word: &str) -> bool {
    word.chars().any(|c| c.is_uppercase()) && !word.chars().any(|c| c.is_lowercase())
}

/// Normalize a flag alias or call-time flag name: strip leading markers and
/// map interior `-` to `_`, the convention flag bindings are keyed by in an
/// [`Invocation`](crate::Invocation).
pub(crate) fn normalize_flag_name(raw: &str) -> String {
    raw.trim_start_matches(FLAG_MARKER).replace('-', "_")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_flag_token() {
        assert!(is_flag_token("-q"));
        assert!(is_flag_token("--user=apa"));
        assert!(!is_flag_token("queue"));
        assert!(!is_flag_token(""));
    }

    #[test]
    fn test_is_wildcard_segment() {
        assert!(is_wildcard_segment("PROJECT"));
        assert!(is_wildcard_segment("WORD"));
        assert!(is_wildcard_segment("USER-ID"));
        assert!(!is_wildcard_segment("queue"));
        assert!(!is_wildcard_segment("Project"));
        assert!(!is_wildcard_segment("123"));
        assert!(!is_wildcard_segment(""));
    }

    #[test]
    fn test_normalize_flag_name() {
        assert_eq!(normalize_flag_name("--user-data"), "user_data");
        assert_eq!(normalize_flag_name("-q"), "q");
        assert_eq!(normalize_flag_name("quiet"), "quiet");
        assert_eq!(normalize_flag_name("--"), "");
    }
}
