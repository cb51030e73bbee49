//! Pluggable tokenization strategies, one per option syntax shape.
//!
//! Strategies are tried in the order configured by
//! [`ParserConfig::strategies`]; the first to claim a prefix of the
//! remaining tokens wins. A strategy that does not recognize the leading
//! token defers with `None`, letting the state machine fall through to the
//! next strategy and finally to command/positional handling.

pub mod cluster;
pub mod keyvalue;
pub mod standard;

use argot_core::{Arity, OptionDescriptor, ParseError, ParserConfig, StrategyKind};

use crate::abbrev::{AbbrevResolution, resolve_name};

/// One matched option with the raw values it captured.
#[derive(Debug, Clone)]
pub struct ClaimedOption {
    pub descriptor: OptionDescriptor,
    /// Raw value tokens, one per arity slot. Empty for flags.
    pub raw_values: Vec<String>,
    /// A negated flag occurrence (`--no-verbose`).
    pub negated: bool,
}

/// Result of a strategy claiming a prefix of the token stream.
///
/// `consumed` is always authoritative: even when the claim failed (e.g. an
/// arity could not be satisfied), the machine advances past the consumed
/// tokens so a collect-all parse can continue.
#[derive(Debug)]
pub struct StrategyOutcome {
    pub consumed: usize,
    pub outcome: Result<Vec<ClaimedOption>, ParseError>,
}

/// Pluggable recognizer for one lexical option shape.
pub trait OptionStrategy {
    fn name(&self) -> &'static str;

    /// Attempts to claim a prefix of `tokens` against the options in scope.
    /// Returns `None` to defer to the next strategy.
    fn claim(
        &self,
        tokens: &[String],
        scope: &[OptionDescriptor],
        config: &ParserConfig,
    ) -> Option<StrategyOutcome>;
}

/// Instantiates the configured strategy list in priority order.
pub fn build_strategies(config: &ParserConfig) -> Vec<Box<dyn OptionStrategy>> {
    config
        .strategies
        .iter()
        .map(|kind| match kind {
            StrategyKind::Standard => {
                Box::new(standard::StandardStrategy) as Box<dyn OptionStrategy>
            }
            StrategyKind::ShortCluster => Box::new(cluster::ShortClusterStrategy),
            StrategyKind::DelimitedPair(delimiter) => {
                Box::new(keyvalue::DelimitedPairStrategy {
                    delimiter: *delimiter,
                })
            }
        })
        .collect()
}

/// Resolves a token to an in-scope option descriptor.
///
/// Exact matches consider every name, hidden options included; abbreviation
/// candidates exclude hidden options so a hidden name never makes a visible
/// prefix ambiguous.
pub(crate) fn lookup_option<'a>(
    token: &str,
    scope: &'a [OptionDescriptor],
    config: &ParserConfig,
) -> Result<Option<&'a OptionDescriptor>, ParseError> {
    for option in scope {
        if option.matches(token) {
            return Ok(Some(option));
        }
    }
    if !config.allow_option_abbreviation {
        return Ok(None);
    }

    let candidates = scope
        .iter()
        .filter(|o| !o.hidden)
        .flat_map(|o| o.names.iter().map(String::as_str));
    match resolve_name(token, candidates, true) {
        AbbrevResolution::Exact(name) | AbbrevResolution::Unique(name) => {
            Ok(scope.iter().find(|o| o.matches(&name)))
        }
        AbbrevResolution::Ambiguous(candidates) => Err(ParseError::AbbreviationAmbiguous {
            token: token.to_string(),
            candidates,
        }),
        AbbrevResolution::NoMatch => Ok(None),
    }
}

/// Whether a token terminates value capture: the arguments separator or any
/// exact option name in scope.
pub(crate) fn is_value_boundary(
    token: &str,
    scope: &[OptionDescriptor],
    config: &ParserConfig,
) -> bool {
    token == config.arguments_separator || scope.iter().any(|o| o.matches(token))
}

/// Captures value tokens for an option starting after its name token.
///
/// `Exactly(n)` consumes exactly `n` tokens, failing with
/// [`ParseError::OptionMissingValue`] when end of input or a value boundary
/// arrives first; `Variable` consumes until a boundary; `Nullary` consumes
/// nothing. Returns the captured values and how many tokens were consumed.
pub(crate) fn capture_values(
    descriptor: &OptionDescriptor,
    rest: &[String],
    scope: &[OptionDescriptor],
    config: &ParserConfig,
) -> Result<(Vec<String>, usize), ParseError> {
    match descriptor.arity {
        Arity::Nullary => Ok((Vec::new(), 0)),
        Arity::Exactly(n) => {
            let mut values = Vec::with_capacity(n);
            for token in rest.iter().take(n) {
                if is_value_boundary(token, scope, config) {
                    break;
                }
                values.push(token.clone());
            }
            if values.len() < n {
                return Err(ParseError::OptionMissingValue {
                    title: descriptor.title.clone(),
                });
            }
            Ok((values, n))
        }
        Arity::Variable => {
            let values: Vec<String> = rest
                .iter()
                .take_while(|t| !is_value_boundary(t, scope, config))
                .cloned()
                .collect();
            let consumed = values.len();
            Ok((values, consumed))
        }
    }
}
