//! Delimited-pair strategy: an arity-2 option fed by one `key=value` token.

use argot_core::{Arity, OptionDescriptor, ParserConfig};
use tracing::debug;

use super::{ClaimedOption, OptionStrategy, StrategyOutcome, lookup_option};

/// Recognizes `<name> key<delim>value` for arity-2 options, splitting the
/// second token on the delimiter into the two value slots. Defers when the
/// following token carries no delimiter, letting the standard strategy
/// capture two separate tokens instead.
pub struct DelimitedPairStrategy {
    pub delimiter: char,
}

impl OptionStrategy for DelimitedPairStrategy {
    fn name(&self) -> &'static str {
        "delimited-pair"
    }

    fn claim(
        &self,
        tokens: &[String],
        scope: &[OptionDescriptor],
        config: &ParserConfig,
    ) -> Option<StrategyOutcome> {
        let name = tokens.first()?;
        let pair = tokens.get(1)?;

        let descriptor = lookup_option(name, scope, config).ok().flatten()?;
        if descriptor.arity != Arity::Exactly(2) {
            return None;
        }
        let (key, value) = pair.split_once(self.delimiter)?;

        debug!(option = %descriptor.title, "delimited pair claimed");
        Some(StrategyOutcome {
            consumed: 2,
            outcome: Ok(vec![ClaimedOption {
                descriptor: descriptor.clone(),
                raw_values: vec![key.to_string(), value.to_string()],
                negated: false,
            }]),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use argot_core::ValueType;

    fn scope() -> Vec<OptionDescriptor> {
        vec![
            OptionDescriptor::with_value("define", &["-D", "--define"], ValueType::Str)
                .with_arity(Arity::Exactly(2)),
            OptionDescriptor::with_value("name", &["--name"], ValueType::Str),
        ]
    }

    fn tokens(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|t| t.to_string()).collect()
    }

    fn strategy() -> DelimitedPairStrategy {
        DelimitedPairStrategy { delimiter: '=' }
    }

    #[test]
    fn test_splits_pair_into_two_values() {
        let outcome = strategy()
            .claim(&tokens(&["-D", "key=val"]), &scope(), &ParserConfig::default())
            .unwrap();
        assert_eq!(outcome.consumed, 2);
        let claims = outcome.outcome.unwrap();
        assert_eq!(claims[0].raw_values, vec!["key", "val"]);
    }

    #[test]
    fn test_defers_without_delimiter() {
        let outcome = strategy().claim(
            &tokens(&["-D", "key", "val"]),
            &scope(),
            &ParserConfig::default(),
        );
        assert!(outcome.is_none());
    }

    #[test]
    fn test_defers_for_non_pair_options() {
        let outcome = strategy().claim(
            &tokens(&["--name", "a=b"]),
            &scope(),
            &ParserConfig::default(),
        );
        assert!(outcome.is_none());
    }
}
