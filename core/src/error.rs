//! Error types for descriptor construction and parsing.
//!
//! Two layers mirror the two phases of the engine's lifecycle:
//!
//! - [`DefinitionError`] — structural problems in descriptors (bad option
//!   names, illegal overrides, invalid restriction declarations). These are
//!   reported when a descriptor set is validated or merged, never deferred to
//!   parse time.
//! - [`ParseError`] — everything that can go wrong while consuming an actual
//!   token stream. Every variant carries enough structured context (title,
//!   value, bounds, allowed set) for programmatic handling.

use thiserror::Error;

use crate::value::{Value, ValueType};

/// Errors raised while building or merging descriptors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DefinitionError {
    /// An option declares no names at all.
    #[error("option '{title}' must declare at least one name")]
    EmptyOptionNames { title: String },

    /// An option name does not start with a dash.
    #[error("option '{title}' has invalid name '{name}' (names must start with '-')")]
    InvalidOptionName { title: String, name: String },

    /// Two options in the same visibility scope share a name after merge.
    #[error("duplicate option name in scope: {name}")]
    DuplicateOptionName { name: String },

    /// A flag option (arity zero) declares a non-boolean value type.
    #[error("option '{title}' takes no values but declares type {value_type}")]
    NonBooleanFlag { title: String, value_type: ValueType },

    /// Two commands in the same scope share a name.
    #[error("duplicate command in scope: {name}")]
    DuplicateCommand { name: String },

    /// Two groups share a name.
    #[error("duplicate group: {name}")]
    DuplicateGroup { name: String },

    /// A default command names no command in its scope.
    #[error("default command '{name}' is not a command of scope '{scope}'")]
    UnknownDefaultCommand { scope: String, name: String },

    /// A derived option overlaps a base option without `overrides = true`.
    #[error("option '{title}' redefines an inherited option without declaring an override")]
    UnannouncedOverride { title: String },

    /// A derived option attempts to override a `sealed` base option.
    #[error("option '{title}' cannot be overridden: the base declaration is sealed")]
    SealedOptionOverride { title: String },

    /// An override changes the option's name set.
    #[error("override of option '{title}' changes its name set")]
    NameSetChanged { title: String },

    /// An override changes the option's arity.
    #[error("override of option '{title}' changes its arity")]
    ArityChanged { title: String },

    /// An override widens the declared value type.
    #[error("override of option '{title}' widens its type from {base} to {derived}")]
    TypeWidened {
        title: String,
        base: ValueType,
        derived: ValueType,
    },

    /// A restriction declaration is unsatisfiable or malformed
    /// (e.g. min > max, empty allowed set, unparsable pattern).
    #[error("invalid restriction on '{title}': {detail}")]
    InvalidRestriction { title: String, detail: String },

    /// The parser configuration itself is invalid (e.g. radix out of range).
    #[error("invalid parser configuration: {detail}")]
    InvalidConfiguration { detail: String },
}

/// Errors raised while parsing a token stream.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    /// End of input reached with no command resolved and no default command.
    #[error("no command specified")]
    CommandMissing,

    /// Input named something that is neither a command, group, nor option.
    #[error("unrecognized command input: {tokens:?}")]
    CommandUnrecognized { tokens: Vec<String> },

    /// An option's arity was not satisfied before end of input, another
    /// recognized option, or the arguments separator.
    #[error("option '{title}' is missing a required value")]
    OptionMissingValue { title: String },

    /// A required option was never supplied.
    #[error("required option '{title}' was not supplied")]
    OptionMissing { title: String },

    /// An option required by the presence of another option was not supplied.
    #[error("option '{title}' is required when '{seen}' is supplied")]
    DependentOptionMissing { title: String, seen: String },

    /// A token looked like an option but matched nothing in scope, or a bare
    /// token appeared where no positional arguments are accepted.
    #[error("unexpected token: {token}")]
    OptionUnexpected { token: String },

    /// A value failed an allowed-set restriction.
    #[error("illegal value '{value}' for '{title}' (allowed: {allowed:?})")]
    IllegalValue {
        title: String,
        value: String,
        allowed: Vec<String>,
    },

    /// A converted value fell outside a declared range.
    #[error("value {value} for '{title}' is out of range ({bounds})")]
    OutOfRange {
        title: String,
        value: Value,
        bounds: String,
    },

    /// A raw value did not match a declared pattern.
    #[error("value '{value}' for '{title}' does not match pattern '{pattern}'")]
    PatternMismatch {
        title: String,
        value: String,
        pattern: String,
    },

    /// A raw value was shorter than the declared minimum length.
    #[error("value '{value}' for '{title}' is shorter than {min} characters")]
    ValueTooShort {
        title: String,
        value: String,
        min: usize,
    },

    /// A tag-group rule over several options was violated.
    #[error("{rule} restriction on tag '{tag}' violated: {supplied} of {options:?} supplied")]
    TagGroupViolated {
        tag: String,
        rule: TagRule,
        options: Vec<String>,
        supplied: usize,
    },

    /// An option appeared fewer or more times than its occurrence bounds allow.
    #[error("option '{title}' supplied {count} times (expected between {min} and {max})")]
    OccurrencesOutOfBounds {
        title: String,
        count: usize,
        min: usize,
        max: usize,
    },

    /// Required positional arguments were absent.
    #[error("required arguments missing: {titles:?}")]
    ArgumentsMissing { titles: Vec<String> },

    /// Alias expansion re-entered an alias already being expanded.
    #[error("circular alias reference '{alias}' (chain: {chain:?})")]
    AliasCircularReference { alias: String, chain: Vec<String> },

    /// An alias configuration file existed but could not be read.
    #[error("alias configuration '{path}' could not be read: {detail}")]
    AliasConfigUnreadable { path: String, detail: String },

    /// A raw string could not be converted to the declared value type.
    #[error("cannot convert '{raw}' to {target} for '{title}'")]
    ConversionFailure {
        title: String,
        target: ValueType,
        raw: String,
    },

    /// A token abbreviated more than one name with no exact match.
    #[error("'{token}' is ambiguous (candidates: {candidates:?})")]
    AbbreviationAmbiguous {
        token: String,
        candidates: Vec<String>,
    },

    /// A definition error surfaced while resolving descriptors for a parse.
    /// Hosts that validate their descriptors at build time never see this.
    #[error(transparent)]
    Definition(#[from] DefinitionError),
}

/// Which tag-group rule a [`ParseError::TagGroupViolated`] refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagRule {
    /// At most one tagged option may be supplied.
    MutuallyExclusive,
    /// Exactly one tagged option must be supplied.
    RequireOnlyOne,
    /// At least one tagged option must be supplied.
    RequireSome,
}

impl std::fmt::Display for TagRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            TagRule::MutuallyExclusive => "mutually-exclusive",
            TagRule::RequireOnlyOne => "require-only-one",
            TagRule::RequireSome => "require-some",
        };
        f.write_str(label)
    }
}
