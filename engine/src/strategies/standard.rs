//! Standard option strategy: `--name value...`, `--name=value`, negation.

use argot_core::{Arity, OptionDescriptor, ParseError, ParserConfig, ValueType};
use tracing::debug;

use super::{ClaimedOption, OptionStrategy, StrategyOutcome, capture_values, lookup_option};

/// Recognizes any declared option name followed by its arity of value
/// tokens, the inline `name=value` form for arity-1 options, and flag
/// negation (`--no-verbose`) when a negation prefix is configured.
pub struct StandardStrategy;

impl OptionStrategy for StandardStrategy {
    fn name(&self) -> &'static str {
        "standard"
    }

    fn claim(
        &self,
        tokens: &[String],
        scope: &[OptionDescriptor],
        config: &ParserConfig,
    ) -> Option<StrategyOutcome> {
        let token = tokens.first()?;

        // A declared name wins over every other reading of the token.
        match lookup_option(token, scope, config) {
            Ok(Some(descriptor)) => return Some(claim_named(descriptor, tokens, scope, config)),
            Ok(None) => {}
            Err(error) => {
                return Some(StrategyOutcome {
                    consumed: 1,
                    outcome: Err(error),
                });
            }
        }

        if let Some(outcome) = claim_negated(token, scope, config) {
            return Some(outcome);
        }

        claim_inline_value(token, scope, config)
    }
}

fn claim_named(
    descriptor: &OptionDescriptor,
    tokens: &[String],
    scope: &[OptionDescriptor],
    config: &ParserConfig,
) -> StrategyOutcome {
    debug!(option = %descriptor.title, "standard strategy claimed option name");
    match capture_values(descriptor, &tokens[1..], scope, config) {
        Ok((raw_values, consumed)) => StrategyOutcome {
            consumed: consumed + 1,
            outcome: Ok(vec![ClaimedOption {
                descriptor: descriptor.clone(),
                raw_values,
                negated: false,
            }]),
        },
        Err(error) => StrategyOutcome {
            // Skip the name token and whatever values were present so a
            // collect-all parse can continue past the short supply, without
            // swallowing the boundary token that interrupted capture.
            consumed: count_available_values(descriptor, tokens, scope, config) + 1,
            outcome: Err(error),
        },
    }
}

/// `--<prefix><name>` turns a boolean flag off.
fn claim_negated(
    token: &str,
    scope: &[OptionDescriptor],
    config: &ParserConfig,
) -> Option<StrategyOutcome> {
    let prefix = config.negation_prefix.as_deref()?;
    let stripped = token
        .strip_prefix("--")
        .and_then(|rest| rest.strip_prefix(prefix))?;
    let positive = format!("--{stripped}");

    let descriptor = match lookup_option(&positive, scope, config) {
        Ok(descriptor) => descriptor?,
        Err(_) => return None,
    };
    if descriptor.arity != Arity::Nullary || descriptor.value_type != ValueType::Bool {
        return None;
    }

    debug!(option = %descriptor.title, "standard strategy claimed negated flag");
    Some(StrategyOutcome {
        consumed: 1,
        outcome: Ok(vec![ClaimedOption {
            descriptor: descriptor.clone(),
            raw_values: Vec::new(),
            negated: true,
        }]),
    })
}

/// `name=value` supplies an arity-1 option inline in a single token.
fn claim_inline_value(
    token: &str,
    scope: &[OptionDescriptor],
    config: &ParserConfig,
) -> Option<StrategyOutcome> {
    if !token.starts_with('-') {
        return None;
    }
    let (name, value) = token.split_once('=')?;

    let descriptor = match lookup_option(name, scope, config) {
        Ok(descriptor) => descriptor?,
        Err(error) => {
            return Some(StrategyOutcome {
                consumed: 1,
                outcome: Err(error),
            });
        }
    };

    let outcome = if descriptor.arity == Arity::Exactly(1) {
        debug!(option = %descriptor.title, "standard strategy claimed inline value");
        Ok(vec![ClaimedOption {
            descriptor: descriptor.clone(),
            raw_values: vec![value.to_string()],
            negated: false,
        }])
    } else {
        Err(ParseError::OptionMissingValue {
            title: descriptor.title.clone(),
        })
    };
    Some(StrategyOutcome {
        consumed: 1,
        outcome,
    })
}

fn count_available_values(
    descriptor: &OptionDescriptor,
    tokens: &[String],
    scope: &[OptionDescriptor],
    config: &ParserConfig,
) -> usize {
    match descriptor.arity {
        Arity::Exactly(n) => tokens[1..]
            .iter()
            .take(n)
            .take_while(|t| !super::is_value_boundary(t, scope, config))
            .count(),
        _ => 0,
    }
}
