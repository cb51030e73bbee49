//! Composable validation rules for options, arguments, and whole parses.
//!
//! A [`Restriction`] is a tagged variant; each variant participates only in
//! the phases it needs and the other phases are explicit no-ops. The engine
//! calls all three phases unconditionally:
//!
//! 1. **pre** ([`Restriction::pre_validate`]) — on the raw string right after
//!    lexical capture, before conversion.
//! 2. **post** ([`Restriction::post_validate`]) — on the converted value.
//! 3. **final** ([`final_validate`]) — once, after end of input with a
//!    command resolved.
//!
//! Tag-group rules (mutually-exclusive, require-only-one, require-some) link
//! options sharing a tag string and are evaluated once per tag over the
//! completed parse.

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::bound::BoundCommand;
use crate::error::{DefinitionError, ParseError, TagRule};
use crate::value::Value;

/// A single validation rule attached to an option, an arguments block, or
/// the global descriptor.
///
/// # Examples
///
/// ```
/// use argot_core::{Restriction, Value};
///
/// let range = Restriction::range(Value::Int(1), Value::Int(10));
/// assert!(range.post_validate("port", &Value::Int(5), 0).is_ok());
/// assert!(range.post_validate("port", &Value::Int(11), 0).is_err());
///
/// // Pre-phase rules see the raw string; the range rule ignores it.
/// assert!(range.pre_validate("port", "anything", 0).is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Restriction {
    /// Raw value must match the regex (pre phase).
    Pattern {
        pattern: String,
        case_insensitive: bool,
    },
    /// Raw value must be one of these strings (pre phase).
    AllowedRawValues { values: Vec<String> },
    /// Raw value must be at least this many characters (pre phase).
    MinLength { min: usize },
    /// Converted value must fall inside the bounds (post phase). `None`
    /// bounds are open ends.
    Range {
        min: Option<Value>,
        max: Option<Value>,
        min_inclusive: bool,
        max_inclusive: bool,
    },
    /// Converted value must equal one of these values (post phase).
    AllowedValues { values: Vec<Value> },
    /// Option must be supplied at least once (final phase).
    Required,
    /// Option must be supplied whenever any of the named options is
    /// (final phase).
    RequiredOnlyIf { titles: Vec<String> },
    /// At most one option sharing the tag may be supplied (final phase).
    MutuallyExclusive { tag: String },
    /// Exactly one option sharing the tag must be supplied (final phase).
    RequireOnlyOne { tag: String },
    /// At least one option sharing the tag must be supplied (final phase).
    RequireSome { tag: String },
    /// Occurrence count must fall inside `[min, max]` (final phase).
    Occurrences { min: usize, max: usize },
    /// At least one positional argument must be supplied (final phase,
    /// arguments scope).
    ArgumentsRequired,
    /// Applies `inner` only at the given 0-based value positions of a
    /// multi-value option (or positional-argument indices); other positions
    /// are unchecked.
    Partial {
        positions: Vec<usize>,
        inner: Box<Restriction>,
    },
}

impl Restriction {
    /// Convenience constructor for an inclusive range.
    pub fn range(min: Value, max: Value) -> Self {
        Restriction::Range {
            min: Some(min),
            max: Some(max),
            min_inclusive: true,
            max_inclusive: true,
        }
    }

    /// Checks the declaration itself; unsatisfiable rules fail descriptor
    /// validation rather than surfacing at parse time.
    pub fn validate_declaration(
        &self,
        title: &str,
        arity: Option<usize>,
    ) -> Result<(), DefinitionError> {
        let invalid = |detail: String| DefinitionError::InvalidRestriction {
            title: title.to_string(),
            detail,
        };

        match self {
            Restriction::Pattern { pattern, .. } => Regex::new(pattern)
                .map(|_| ())
                .map_err(|e| invalid(format!("unparsable pattern '{pattern}': {e}"))),
            Restriction::AllowedRawValues { values } if values.is_empty() => {
                Err(invalid("allowed raw value set is empty".to_string()))
            }
            Restriction::AllowedValues { values } if values.is_empty() => {
                Err(invalid("allowed value set is empty".to_string()))
            }
            Restriction::Range { min, max, .. } => match (min, max) {
                (Some(lo), Some(hi)) if lo.compare(hi) == Some(std::cmp::Ordering::Greater) => {
                    Err(invalid(format!("range minimum {lo} exceeds maximum {hi}")))
                }
                (None, None) => Err(invalid("range declares no bounds".to_string())),
                _ => Ok(()),
            },
            Restriction::Occurrences { min, max } if min > max => Err(invalid(format!(
                "minimum occurrences {min} exceeds maximum {max}"
            ))),
            Restriction::MutuallyExclusive { tag }
            | Restriction::RequireOnlyOne { tag }
            | Restriction::RequireSome { tag }
                if tag.is_empty() =>
            {
                Err(invalid("tag cannot be empty".to_string()))
            }
            Restriction::RequiredOnlyIf { titles } if titles.is_empty() => {
                Err(invalid("required-only-if names no options".to_string()))
            }
            Restriction::Partial { positions, inner } => {
                if positions.is_empty() {
                    return Err(invalid("partial restriction covers no positions".to_string()));
                }
                if let Some(limit) = arity {
                    if let Some(out) = positions.iter().find(|p| **p >= limit) {
                        return Err(invalid(format!(
                            "partial restriction position {out} is outside arity {limit}"
                        )));
                    }
                }
                inner.validate_declaration(title, arity)
            }
            _ => Ok(()),
        }
    }

    /// Phase 1: validates the raw string before conversion. Variants that do
    /// not participate return `Ok`.
    pub fn pre_validate(&self, title: &str, raw: &str, position: usize) -> Result<(), ParseError> {
        match self {
            Restriction::Pattern {
                pattern,
                case_insensitive,
            } => {
                let decorated = if *case_insensitive {
                    format!("(?i){pattern}")
                } else {
                    pattern.clone()
                };
                let regex = Regex::new(&decorated).map_err(|e| {
                    ParseError::Definition(DefinitionError::InvalidRestriction {
                        title: title.to_string(),
                        detail: format!("unparsable pattern '{pattern}': {e}"),
                    })
                })?;
                if regex.is_match(raw) {
                    Ok(())
                } else {
                    Err(ParseError::PatternMismatch {
                        title: title.to_string(),
                        value: raw.to_string(),
                        pattern: pattern.clone(),
                    })
                }
            }
            Restriction::AllowedRawValues { values } => {
                if values.iter().any(|v| v == raw) {
                    Ok(())
                } else {
                    Err(ParseError::IllegalValue {
                        title: title.to_string(),
                        value: raw.to_string(),
                        allowed: values.clone(),
                    })
                }
            }
            Restriction::MinLength { min } => {
                if raw.chars().count() >= *min {
                    Ok(())
                } else {
                    Err(ParseError::ValueTooShort {
                        title: title.to_string(),
                        value: raw.to_string(),
                        min: *min,
                    })
                }
            }
            Restriction::Partial { positions, inner } => {
                if positions.contains(&position) {
                    inner.pre_validate(title, raw, position)
                } else {
                    Ok(())
                }
            }
            _ => Ok(()),
        }
    }

    /// Phase 2: validates the converted value. Variants that do not
    /// participate return `Ok`.
    pub fn post_validate(
        &self,
        title: &str,
        value: &Value,
        position: usize,
    ) -> Result<(), ParseError> {
        match self {
            Restriction::Range {
                min,
                max,
                min_inclusive,
                max_inclusive,
            } => {
                use std::cmp::Ordering;

                let below = min.as_ref().is_some_and(|lo| {
                    match value.compare(lo) {
                        Some(Ordering::Less) => true,
                        Some(Ordering::Equal) => !min_inclusive,
                        _ => false,
                    }
                });
                let above = max.as_ref().is_some_and(|hi| {
                    match value.compare(hi) {
                        Some(Ordering::Greater) => true,
                        Some(Ordering::Equal) => !max_inclusive,
                        _ => false,
                    }
                });
                if below || above {
                    Err(ParseError::OutOfRange {
                        title: title.to_string(),
                        value: value.clone(),
                        bounds: describe_bounds(min, max, *min_inclusive, *max_inclusive),
                    })
                } else {
                    Ok(())
                }
            }
            Restriction::AllowedValues { values } => {
                if values.contains(value) {
                    Ok(())
                } else {
                    Err(ParseError::IllegalValue {
                        title: title.to_string(),
                        value: value.to_string(),
                        allowed: values.iter().map(Value::to_string).collect(),
                    })
                }
            }
            Restriction::Partial { positions, inner } => {
                if positions.contains(&position) {
                    inner.post_validate(title, value, position)
                } else {
                    Ok(())
                }
            }
            _ => Ok(()),
        }
    }

    /// The tag this restriction contributes to a tag group, if any.
    pub(crate) fn tag_rule(&self) -> Option<(TagRule, &str)> {
        match self {
            Restriction::MutuallyExclusive { tag } => Some((TagRule::MutuallyExclusive, tag)),
            Restriction::RequireOnlyOne { tag } => Some((TagRule::RequireOnlyOne, tag)),
            Restriction::RequireSome { tag } => Some((TagRule::RequireSome, tag)),
            _ => None,
        }
    }
}

fn describe_bounds(
    min: &Option<Value>,
    max: &Option<Value>,
    min_inclusive: bool,
    max_inclusive: bool,
) -> String {
    let lo = match min {
        Some(v) if min_inclusive => format!("[{v}"),
        Some(v) => format!("({v}"),
        None => "(-inf".to_string(),
    };
    let hi = match max {
        Some(v) if max_inclusive => format!("{v}]"),
        Some(v) => format!("{v})"),
        None => "+inf)".to_string(),
    };
    format!("{lo}, {hi}")
}

/// Phase 3: validates the completed parse.
///
/// Runs every final-capable restriction over the bound command: required and
/// dependent options, occurrence bounds, arguments presence, and tag groups
/// collected across the command's whole option scope plus the global
/// restrictions.
pub fn final_validate(bound: &BoundCommand) -> Vec<ParseError> {
    let mut errors = Vec::new();
    let mut tags: Vec<(TagRule, String, Vec<String>, usize)> = Vec::new();

    let mut note_tag = |rule: TagRule, tag: &str, title: &str, supplied: bool| {
        let index = match tags.iter().position(|(r, t, _, _)| *r == rule && t == tag) {
            Some(index) => index,
            None => {
                tags.push((rule, tag.to_string(), Vec::new(), 0));
                tags.len() - 1
            }
        };
        tags[index].2.push(title.to_string());
        if supplied {
            tags[index].3 += 1;
        }
    };

    for option in &bound.scope_options {
        let occurrences = bound.occurrences_of(&option.title);
        for restriction in &option.restrictions {
            match restriction {
                Restriction::Required => {
                    if occurrences == 0 {
                        errors.push(ParseError::OptionMissing {
                            title: option.title.clone(),
                        });
                    }
                }
                Restriction::RequiredOnlyIf { titles } => {
                    if occurrences == 0 {
                        if let Some(seen) = titles.iter().find(|t| bound.was_supplied(t)) {
                            errors.push(ParseError::DependentOptionMissing {
                                title: option.title.clone(),
                                seen: seen.clone(),
                            });
                        }
                    }
                }
                Restriction::Occurrences { min, max } => {
                    if occurrences < *min || occurrences > *max {
                        errors.push(ParseError::OccurrencesOutOfBounds {
                            title: option.title.clone(),
                            count: occurrences,
                            min: *min,
                            max: *max,
                        });
                    }
                }
                _ => {
                    if let Some((rule, tag)) = restriction.tag_rule() {
                        note_tag(rule, tag, &option.title, occurrences > 0);
                    }
                }
            }
        }
    }

    // Global restrictions: a tag rule declared at the CLI level governs the
    // scope options carrying that tag, whatever rule kind they declare it
    // through themselves.
    if let Some(global) = &bound.global {
        for restriction in &global.restrictions {
            if matches!(restriction, Restriction::ArgumentsRequired) {
                if let Some(arguments) = &bound.command.arguments {
                    if bound.arguments.is_empty() {
                        errors.push(ParseError::ArgumentsMissing {
                            titles: arguments.titles.clone(),
                        });
                    }
                }
                continue;
            }
            if let Some((rule, tag)) = restriction.tag_rule() {
                let mut members = Vec::new();
                let mut supplied = 0;
                for option in &bound.scope_options {
                    let tagged = option
                        .restrictions
                        .iter()
                        .any(|r| r.tag_rule().is_some_and(|(_, t)| t == tag));
                    if tagged {
                        members.push(option.title.clone());
                        if bound.was_supplied(&option.title) {
                            supplied += 1;
                        }
                    }
                }
                if !members.is_empty() {
                    note_tag_group(&mut tags, rule, tag, members, supplied);
                }
            }
        }
    }

    for (rule, tag, options, supplied) in tags {
        let violated = match rule {
            TagRule::MutuallyExclusive => supplied > 1,
            TagRule::RequireOnlyOne => supplied != 1,
            TagRule::RequireSome => supplied == 0,
        };
        if violated {
            errors.push(ParseError::TagGroupViolated {
                tag,
                rule,
                options,
                supplied,
            });
        }
    }

    if let Some(arguments) = &bound.command.arguments {
        let missing = arguments.required && bound.arguments.is_empty();
        let explicitly_required = arguments
            .restrictions
            .iter()
            .any(|r| matches!(r, Restriction::ArgumentsRequired));
        if missing || (explicitly_required && bound.arguments.is_empty()) {
            errors.push(ParseError::ArgumentsMissing {
                titles: arguments.titles.clone(),
            });
        }
        for restriction in &arguments.restrictions {
            if let Restriction::Occurrences { min, max } = restriction {
                let count = bound.arguments.len();
                if count < *min || count > *max {
                    errors.push(ParseError::OccurrencesOutOfBounds {
                        title: arguments.titles.join("/"),
                        count,
                        min: *min,
                        max: *max,
                    });
                }
            }
        }
    }

    errors
}

/// Adds a tag group unless the same (rule, tag) pair was already collected
/// from the option-level walk.
fn note_tag_group(
    tags: &mut Vec<(TagRule, String, Vec<String>, usize)>,
    rule: TagRule,
    tag: &str,
    members: Vec<String>,
    supplied: usize,
) {
    if tags.iter().any(|(r, t, _, _)| *r == rule && t == tag) {
        return;
    }
    tags.push((rule, tag.to_string(), members, supplied));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bound::ParsedOption;
    use crate::descriptor::{CommandDescriptor, OptionDescriptor};

    fn bound_with(
        options: Vec<OptionDescriptor>,
        parsed: Vec<ParsedOption>,
    ) -> BoundCommand {
        BoundCommand {
            global: None,
            group: None,
            command: CommandDescriptor::new("test"),
            scope_options: options,
            parsed,
            arguments: Vec::new(),
            unexpected: Vec::new(),
        }
    }

    fn supplied(title: &str) -> ParsedOption {
        ParsedOption {
            title: title.to_string(),
            values: vec![Value::Bool(true)],
        }
    }

    #[test]
    fn test_range_boundary_inclusivity() {
        let inclusive = Restriction::range(Value::Int(1), Value::Int(10));
        assert!(inclusive.post_validate("n", &Value::Int(1), 0).is_ok());
        assert!(inclusive.post_validate("n", &Value::Int(10), 0).is_ok());

        let exclusive = Restriction::Range {
            min: Some(Value::Int(1)),
            max: Some(Value::Int(10)),
            min_inclusive: false,
            max_inclusive: false,
        };
        assert!(exclusive.post_validate("n", &Value::Int(1), 0).is_err());
        assert!(exclusive.post_validate("n", &Value::Int(2), 0).is_ok());
        assert!(exclusive.post_validate("n", &Value::Int(10), 0).is_err());
    }

    #[test]
    fn test_pattern_pre_validation() {
        let pattern = Restriction::Pattern {
            pattern: "^[a-z]+$".to_string(),
            case_insensitive: false,
        };
        assert!(pattern.pre_validate("name", "abc", 0).is_ok());
        assert!(pattern.pre_validate("name", "ABC", 0).is_err());

        let relaxed = Restriction::Pattern {
            pattern: "^[a-z]+$".to_string(),
            case_insensitive: true,
        };
        assert!(relaxed.pre_validate("name", "ABC", 0).is_ok());
    }

    #[test]
    fn test_partial_applies_only_at_positions() {
        let partial = Restriction::Partial {
            positions: vec![1],
            inner: Box::new(Restriction::MinLength { min: 3 }),
        };
        // Position 0 unchecked, position 1 checked.
        assert!(partial.pre_validate("pair", "x", 0).is_ok());
        assert!(partial.pre_validate("pair", "x", 1).is_err());
        assert!(partial.pre_validate("pair", "xyz", 1).is_ok());
    }

    #[test]
    fn test_declaration_rejects_inverted_bounds() {
        let range = Restriction::range(Value::Int(10), Value::Int(1));
        assert!(matches!(
            range.validate_declaration("n", None),
            Err(DefinitionError::InvalidRestriction { .. })
        ));

        let occurrences = Restriction::Occurrences { min: 3, max: 1 };
        assert!(occurrences.validate_declaration("n", None).is_err());
    }

    #[test]
    fn test_declaration_rejects_partial_position_outside_arity() {
        let partial = Restriction::Partial {
            positions: vec![2],
            inner: Box::new(Restriction::MinLength { min: 1 }),
        };
        assert!(partial.validate_declaration("pair", Some(2)).is_err());
        assert!(partial.validate_declaration("pair", Some(3)).is_ok());
    }

    #[test]
    fn test_mutually_exclusive_tag_group() {
        let tagged = |title: &str| {
            OptionDescriptor::flag(title, &[&format!("--{title}")]).with_restriction(
                Restriction::MutuallyExclusive {
                    tag: "T".to_string(),
                },
            )
        };
        let options = vec![tagged("a"), tagged("b")];

        // Both supplied: violation naming the full tagged set.
        let both = bound_with(options.clone(), vec![supplied("a"), supplied("b")]);
        let errors = final_validate(&both);
        assert!(matches!(
            &errors[0],
            ParseError::TagGroupViolated { tag, supplied: 2, options, .. }
                if tag == "T" && options.len() == 2
        ));

        // One supplied: fine. None supplied: fine.
        assert!(final_validate(&bound_with(options.clone(), vec![supplied("a")])).is_empty());
        assert!(final_validate(&bound_with(options, vec![])).is_empty());
    }

    #[test]
    fn test_require_only_one_tag_group() {
        let tagged = |title: &str| {
            OptionDescriptor::flag(title, &[&format!("--{title}")]).with_restriction(
                Restriction::RequireOnlyOne {
                    tag: "mode".to_string(),
                },
            )
        };
        let options = vec![tagged("a"), tagged("b")];

        assert!(final_validate(&bound_with(options.clone(), vec![supplied("a")])).is_empty());
        assert_eq!(final_validate(&bound_with(options.clone(), vec![])).len(), 1);
        assert_eq!(
            final_validate(&bound_with(options, vec![supplied("a"), supplied("b")])).len(),
            1
        );
    }

    #[test]
    fn test_required_and_dependent_options() {
        let required = OptionDescriptor::flag("must", &["--must"])
            .with_restriction(Restriction::Required);
        let dependent = OptionDescriptor::flag("extra", &["--extra"]).with_restriction(
            Restriction::RequiredOnlyIf {
                titles: vec!["must".to_string()],
            },
        );

        let errors = final_validate(&bound_with(
            vec![required.clone(), dependent.clone()],
            vec![supplied("must")],
        ));
        assert!(matches!(
            &errors[0],
            ParseError::DependentOptionMissing { title, seen }
                if title == "extra" && seen == "must"
        ));

        let errors = final_validate(&bound_with(vec![required, dependent], vec![]));
        assert_eq!(errors.len(), 1);
        assert!(matches!(&errors[0], ParseError::OptionMissing { title } if title == "must"));
    }
}
