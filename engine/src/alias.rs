//! Alias expansion with positional substitution and cycle detection.
//!
//! When the first token of a parse names an alias, it is replaced by the
//! alias's argument template before the state machine runs. Literal template
//! tokens copy verbatim; `$N` placeholders substitute the N-th token
//! (1-based) following the invocation. Tokens consumed by a placeholder are
//! removed from the tail; unreferenced tokens are appended in order, so
//! `e bob extra` with `e = simple --name $1` expands to
//! `simple --name bob extra`.

use std::collections::HashSet;

use argot_core::{AliasDescriptor, ParseError, ParserConfig};
use tracing::debug;

/// Expands a leading alias in `tokens`, recursively when chaining is
/// enabled.
///
/// `builtin_names` holds the CLI's command and group names; unless the
/// configuration allows aliases to override builtins, a first token naming a
/// builtin is left untouched. A visited set threads through chained
/// expansion and re-encountering an alias fails with
/// [`ParseError::AliasCircularReference`] naming the full chain.
pub fn expand_aliases(
    tokens: &[String],
    aliases: &[AliasDescriptor],
    config: &ParserConfig,
    builtin_names: &HashSet<String>,
) -> Result<Vec<String>, ParseError> {
    let mut visited: Vec<String> = Vec::new();
    expand_inner(tokens, aliases, config, builtin_names, &mut visited)
}

fn expand_inner(
    tokens: &[String],
    aliases: &[AliasDescriptor],
    config: &ParserConfig,
    builtin_names: &HashSet<String>,
    visited: &mut Vec<String>,
) -> Result<Vec<String>, ParseError> {
    let Some(first) = tokens.first() else {
        return Ok(tokens.to_vec());
    };
    let Some(alias) = aliases.iter().find(|a| &a.name == first) else {
        return Ok(tokens.to_vec());
    };
    if !config.aliases_override_builtins && builtin_names.contains(first) {
        return Ok(tokens.to_vec());
    }
    if visited.iter().any(|v| v == first) {
        let mut chain = visited.clone();
        chain.push(first.clone());
        return Err(ParseError::AliasCircularReference {
            alias: first.clone(),
            chain,
        });
    }
    visited.push(first.clone());

    let user_args = &tokens[1..];
    let mut used: HashSet<usize> = HashSet::new();
    let mut expanded: Vec<String> = Vec::new();

    for template in &alias.arguments {
        match placeholder_index(template) {
            Some(n) => match user_args.get(n - 1) {
                Some(value) => {
                    used.insert(n - 1);
                    expanded.push(value.clone());
                }
                // A placeholder with no corresponding token stays literal.
                None => expanded.push(template.clone()),
            },
            None => expanded.push(template.clone()),
        }
    }
    for (index, token) in user_args.iter().enumerate() {
        if !used.contains(&index) {
            expanded.push(token.clone());
        }
    }

    debug!(alias = %alias.name, expanded = ?expanded, "expanded alias");

    if config.alias_chaining {
        expand_inner(&expanded, aliases, config, builtin_names, visited)
    } else {
        Ok(expanded)
    }
}

/// Parses `$N` (N ≥ 1) into its 1-based index; anything else is a literal.
fn placeholder_index(token: &str) -> Option<usize> {
    let digits = token.strip_prefix('$')?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    match digits.parse::<usize>() {
        Ok(n) if n >= 1 => Some(n),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|t| t.to_string()).collect()
    }

    fn expand(
        raw: &[&str],
        aliases: &[AliasDescriptor],
        config: &ParserConfig,
    ) -> Result<Vec<String>, ParseError> {
        expand_aliases(&tokens(raw), aliases, config, &HashSet::new())
    }

    #[test]
    fn test_positional_substitution_and_tail_append() {
        let aliases = [AliasDescriptor::new("e", &["simple", "--name", "$1"])];
        let expanded = expand(&["e", "bob", "extra"], &aliases, &ParserConfig::default()).unwrap();
        assert_eq!(expanded, tokens(&["simple", "--name", "bob", "extra"]));
    }

    #[test]
    fn test_unsatisfied_placeholder_stays_literal() {
        let aliases = [AliasDescriptor::new("e", &["simple", "--name", "$1"])];
        let expanded = expand(&["e"], &aliases, &ParserConfig::default()).unwrap();
        assert_eq!(expanded, tokens(&["simple", "--name", "$1"]));
    }

    #[test]
    fn test_no_expansion_for_non_alias() {
        let aliases = [AliasDescriptor::new("e", &["simple"])];
        let expanded = expand(&["other", "x"], &aliases, &ParserConfig::default()).unwrap();
        assert_eq!(expanded, tokens(&["other", "x"]));
    }

    #[test]
    fn test_builtin_names_win_unless_overriding() {
        let aliases = [AliasDescriptor::new("fetch", &["simple"])];
        let builtins: HashSet<String> = ["fetch".to_string()].into_iter().collect();

        let kept = expand_aliases(
            &tokens(&["fetch"]),
            &aliases,
            &ParserConfig::default(),
            &builtins,
        )
        .unwrap();
        assert_eq!(kept, tokens(&["fetch"]));

        let mut config = ParserConfig::default();
        config.aliases_override_builtins = true;
        let replaced = expand_aliases(&tokens(&["fetch"]), &aliases, &config, &builtins).unwrap();
        assert_eq!(replaced, tokens(&["simple"]));
    }

    #[test]
    fn test_chaining_requires_opt_in() {
        let aliases = [
            AliasDescriptor::new("a", &["b", "--flag"]),
            AliasDescriptor::new("b", &["real"]),
        ];

        // Without chaining the expansion stops after one step.
        let once = expand(&["a"], &aliases, &ParserConfig::default()).unwrap();
        assert_eq!(once, tokens(&["b", "--flag"]));

        let mut config = ParserConfig::default();
        config.alias_chaining = true;
        let chained = expand(&["a"], &aliases, &config).unwrap();
        assert_eq!(chained, tokens(&["real", "--flag"]));
    }

    #[test]
    fn test_direct_cycle_is_detected() {
        let aliases = [AliasDescriptor::new("a", &["a", "--flag"])];
        let mut config = ParserConfig::default();
        config.alias_chaining = true;

        let error = expand(&["a"], &aliases, &config).unwrap_err();
        assert!(matches!(
            error,
            ParseError::AliasCircularReference { alias, chain }
                if alias == "a" && chain == vec!["a".to_string(), "a".to_string()]
        ));
    }

    #[test]
    fn test_transitive_cycle_names_the_chain() {
        let aliases = [
            AliasDescriptor::new("a", &["b"]),
            AliasDescriptor::new("b", &["c"]),
            AliasDescriptor::new("c", &["a"]),
        ];
        let mut config = ParserConfig::default();
        config.alias_chaining = true;

        let error = expand(&["a"], &aliases, &config).unwrap_err();
        assert!(matches!(
            error,
            ParseError::AliasCircularReference { alias, chain }
                if alias == "a" && chain.len() == 4
        ));
    }

    #[test]
    fn test_placeholder_parsing() {
        assert_eq!(placeholder_index("$1"), Some(1));
        assert_eq!(placeholder_index("$12"), Some(12));
        assert_eq!(placeholder_index("$0"), None);
        assert_eq!(placeholder_index("$x"), None);
        assert_eq!(placeholder_index("literal"), None);
    }
}
