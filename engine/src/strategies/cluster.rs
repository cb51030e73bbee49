//! Short-cluster strategy: bundled single-character flags (`-abc`).

use argot_core::{Arity, OptionDescriptor, ParseError, ParserConfig};
use tracing::debug;

use super::{ClaimedOption, OptionStrategy, StrategyOutcome, capture_values};

/// Recognizes `-abc` bundles of single-character flags. Every element but
/// the last must be a nullary flag; the final element may take values,
/// either inline from the remainder of the token (`-ovalue`) or from the
/// following tokens.
pub struct ShortClusterStrategy;

impl OptionStrategy for ShortClusterStrategy {
    fn name(&self) -> &'static str {
        "short-cluster"
    }

    fn claim(
        &self,
        tokens: &[String],
        scope: &[OptionDescriptor],
        config: &ParserConfig,
    ) -> Option<StrategyOutcome> {
        let token = tokens.first()?;
        let body = token.strip_prefix('-')?;
        if token.starts_with("--") || body.chars().count() < 2 {
            return None;
        }

        let mut claims: Vec<ClaimedOption> = Vec::new();
        let mut chars = body.char_indices();

        while let Some((offset, c)) = chars.next() {
            let short = format!("-{c}");
            let descriptor = scope.iter().find(|o| o.matches(&short))?;

            if descriptor.arity == Arity::Nullary {
                claims.push(ClaimedOption {
                    descriptor: descriptor.clone(),
                    raw_values: Vec::new(),
                    negated: false,
                });
                continue;
            }

            // A value-taking element ends the cluster. The rest of the token
            // (if any) is its first value; further values come from the
            // following tokens.
            let inline = &body[offset + c.len_utf8()..];
            return Some(claim_value_tail(
                descriptor, inline, tokens, claims, scope, config,
            ));
        }

        debug!(cluster = %token, flags = claims.len(), "short cluster claimed");
        Some(StrategyOutcome {
            consumed: 1,
            outcome: Ok(claims),
        })
    }
}

fn claim_value_tail(
    descriptor: &OptionDescriptor,
    inline: &str,
    tokens: &[String],
    mut claims: Vec<ClaimedOption>,
    scope: &[OptionDescriptor],
    config: &ParserConfig,
) -> StrategyOutcome {
    let mut raw_values: Vec<String> = Vec::new();
    if !inline.is_empty() {
        raw_values.push(inline.to_string());
    }

    let needed = match descriptor.arity {
        Arity::Exactly(n) => n.saturating_sub(raw_values.len()),
        Arity::Variable => usize::MAX,
        Arity::Nullary => 0,
    };

    let (tail, consumed_tail) = if needed == 0 {
        (Vec::new(), 0)
    } else {
        let mut remainder = descriptor.clone();
        remainder.arity = match descriptor.arity {
            Arity::Exactly(_) => Arity::Exactly(needed),
            other => other,
        };
        match capture_values(&remainder, &tokens[1..], scope, config) {
            Ok(captured) => captured,
            Err(_) => {
                return StrategyOutcome {
                    consumed: 1,
                    outcome: Err(ParseError::OptionMissingValue {
                        title: descriptor.title.clone(),
                    }),
                };
            }
        }
    };

    raw_values.extend(tail);
    debug!(option = %descriptor.title, values = raw_values.len(), "short cluster claimed value tail");
    claims.push(ClaimedOption {
        descriptor: descriptor.clone(),
        raw_values,
        negated: false,
    });
    StrategyOutcome {
        consumed: consumed_tail + 1,
        outcome: Ok(claims),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use argot_core::ValueType;

    fn scope() -> Vec<OptionDescriptor> {
        vec![
            OptionDescriptor::flag("all", &["-a", "--all"]),
            OptionDescriptor::flag("long", &["-l"]),
            OptionDescriptor::with_value("output", &["-o", "--output"], ValueType::Str),
        ]
    }

    fn tokens(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|t| t.to_string()).collect()
    }

    #[test]
    fn test_claims_flag_bundle() {
        let outcome = ShortClusterStrategy
            .claim(&tokens(&["-al"]), &scope(), &ParserConfig::default())
            .unwrap();
        assert_eq!(outcome.consumed, 1);
        let claims = outcome.outcome.unwrap();
        assert_eq!(claims.len(), 2);
        assert_eq!(claims[0].descriptor.title, "all");
        assert_eq!(claims[1].descriptor.title, "long");
    }

    #[test]
    fn test_final_element_takes_inline_value() {
        let outcome = ShortClusterStrategy
            .claim(&tokens(&["-aofile.txt"]), &scope(), &ParserConfig::default())
            .unwrap();
        let claims = outcome.outcome.unwrap();
        assert_eq!(claims.len(), 2);
        assert_eq!(claims[1].descriptor.title, "output");
        assert_eq!(claims[1].raw_values, vec!["file.txt"]);
    }

    #[test]
    fn test_final_element_takes_following_token() {
        let outcome = ShortClusterStrategy
            .claim(&tokens(&["-ao", "file.txt"]), &scope(), &ParserConfig::default())
            .unwrap();
        assert_eq!(outcome.consumed, 2);
        let claims = outcome.outcome.unwrap();
        assert_eq!(claims[1].raw_values, vec!["file.txt"]);
    }

    #[test]
    fn test_defers_when_any_element_is_unknown() {
        let outcome = ShortClusterStrategy.claim(&tokens(&["-ax"]), &scope(), &ParserConfig::default());
        assert!(outcome.is_none());
    }

    #[test]
    fn test_defers_on_single_character_and_long_tokens() {
        let config = ParserConfig::default();
        assert!(ShortClusterStrategy.claim(&tokens(&["-a"]), &scope(), &config).is_none());
        assert!(ShortClusterStrategy.claim(&tokens(&["--all"]), &scope(), &config).is_none());
    }
}
