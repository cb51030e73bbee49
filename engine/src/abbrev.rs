//! Exact-then-unique-prefix name resolution.
//!
//! Option and command names may be abbreviated when the parser configuration
//! allows it. Resolution order: an exact match always wins; otherwise a
//! token matching exactly one candidate as a prefix resolves to it; several
//! prefix candidates with no exact match are ambiguous.

/// Outcome of resolving a token against a candidate name set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AbbrevResolution {
    /// The token equals a candidate.
    Exact(String),
    /// The token is a prefix of exactly one candidate.
    Unique(String),
    /// The token is a prefix of several candidates and equals none.
    Ambiguous(Vec<String>),
    /// The token matches nothing.
    NoMatch,
}

/// Resolves `token` against `candidates`.
///
/// With `allow_abbreviation` off, only exact matches resolve.
///
/// # Examples
///
/// ```
/// use argot_engine::{AbbrevResolution, resolve_name};
///
/// let names = ["--foo", "--foobar"];
/// // Exact match wins over prefix ambiguity.
/// assert_eq!(
///     resolve_name("--foo", names.iter().copied(), true),
///     AbbrevResolution::Exact("--foo".into()),
/// );
/// // A shared prefix with no exact match is ambiguous.
/// assert!(matches!(
///     resolve_name("--fo", names.iter().copied(), true),
///     AbbrevResolution::Ambiguous(_),
/// ));
/// ```
pub fn resolve_name<'a>(
    token: &str,
    candidates: impl IntoIterator<Item = &'a str>,
    allow_abbreviation: bool,
) -> AbbrevResolution {
    let mut prefixed: Vec<&str> = Vec::new();

    for candidate in candidates {
        if candidate == token {
            return AbbrevResolution::Exact(candidate.to_string());
        }
        if allow_abbreviation && candidate.starts_with(token) {
            prefixed.push(candidate);
        }
    }

    match prefixed.as_slice() {
        [] => AbbrevResolution::NoMatch,
        [single] => AbbrevResolution::Unique(single.to_string()),
        many => AbbrevResolution::Ambiguous(many.iter().map(|c| c.to_string()).collect()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_wins_over_prefix() {
        let names = ["--foo", "--foobar"];
        assert_eq!(
            resolve_name("--foo", names, true),
            AbbrevResolution::Exact("--foo".to_string())
        );
    }

    #[test]
    fn test_unique_prefix_resolves() {
        let names = ["--foo", "--bar"];
        assert_eq!(
            resolve_name("--f", names, true),
            AbbrevResolution::Unique("--foo".to_string())
        );
    }

    #[test]
    fn test_shared_prefix_is_ambiguous() {
        let names = ["--foo", "--foobar"];
        assert_eq!(
            resolve_name("--fo", names, true),
            AbbrevResolution::Ambiguous(vec!["--foo".to_string(), "--foobar".to_string()])
        );
    }

    #[test]
    fn test_abbreviation_disabled_requires_exact() {
        let names = ["--foo", "--bar"];
        assert_eq!(resolve_name("--f", names, false), AbbrevResolution::NoMatch);
        assert_eq!(
            resolve_name("--bar", names, false),
            AbbrevResolution::Exact("--bar".to_string())
        );
    }
}
