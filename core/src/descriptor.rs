//! Descriptor definitions for the command-line metadata model.
//!
//! This module defines the immutable metadata used to describe a CLI surface:
//! options, positional arguments, commands, groups, and the top-level CLI.
//! Descriptors are built once through the constructor/builder methods, are
//! serializable with [`serde`], and are never mutated by the parse engine.
//!
//! Structural validation ([`validate_global`], [`validate_command`]) catches
//! definition errors — empty name sets, malformed option names, duplicate
//! names in a visibility scope, unsatisfiable restrictions — before any
//! parse runs.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::convert::NumericSyntax;
use crate::error::DefinitionError;
use crate::merge::resolve_option_levels;
use crate::restrict::Restriction;
use crate::value::ValueType;

/// Number of value tokens an option consumes after its name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Arity {
    /// A flag: consumes no value tokens.
    #[default]
    Nullary,
    /// Consumes exactly this many value tokens.
    Exactly(usize),
    /// Consumes value tokens until a recognized option name or the
    /// arguments separator is encountered.
    Variable,
}

/// Descriptor for a single option.
///
/// An option has a non-empty set of names (e.g. `-n`, `--name`), a title used
/// for display and binding, an arity, a value type, and attached
/// [`Restriction`]s. The `overrides`/`sealed` flags drive the inheritance
/// merge rules (see [`resolve_option_levels`](crate::resolve_option_levels)).
///
/// # Examples
///
/// ```
/// use argot_core::{Arity, OptionDescriptor, ValueType};
///
/// let verbose = OptionDescriptor::flag("verbose", &["-v", "--verbose"])
///     .with_description("Enable verbose output");
/// assert_eq!(verbose.arity, Arity::Nullary);
/// assert!(verbose.matches("--verbose"));
///
/// let name = OptionDescriptor::with_value("name", &["-n", "--name"], ValueType::Str);
/// assert_eq!(name.arity, Arity::Exactly(1));
/// assert_eq!(name.canonical_name(), "--name");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptionDescriptor {
    /// All names this option answers to. Each must start with `-`.
    pub names: Vec<String>,
    /// Display/binding title.
    pub title: String,
    /// Description shown by external help renderers.
    pub description: Option<String>,
    /// How many value tokens the option consumes.
    pub arity: Arity,
    /// Declared type of each consumed value.
    pub value_type: ValueType,
    /// Hidden options parse normally but are excluded from abbreviation
    /// candidate sets (and from external help output).
    pub hidden: bool,
    /// Marks this declaration as deliberately overriding an inherited one.
    pub overrides: bool,
    /// A sealed declaration can never be overridden by a derived level.
    pub sealed: bool,
    /// Restrictions applied to this option's values and occurrences.
    pub restrictions: Vec<Restriction>,
    /// When set at an override site, inherited restrictions are cleared
    /// instead of carried over.
    pub clear_inherited_restrictions: bool,
}

impl OptionDescriptor {
    /// Creates a nullary boolean flag.
    pub fn flag(title: &str, names: &[&str]) -> Self {
        Self {
            names: names.iter().map(|n| n.to_string()).collect(),
            title: title.to_string(),
            description: None,
            arity: Arity::Nullary,
            value_type: ValueType::Bool,
            hidden: false,
            overrides: false,
            sealed: false,
            restrictions: Vec::new(),
            clear_inherited_restrictions: false,
        }
    }

    /// Creates an option consuming a single value of the given type.
    pub fn with_value(title: &str, names: &[&str], value_type: ValueType) -> Self {
        Self {
            value_type,
            arity: Arity::Exactly(1),
            ..Self::flag(title, names)
        }
    }

    /// Sets the arity.
    pub fn with_arity(mut self, arity: Arity) -> Self {
        self.arity = arity;
        self
    }

    /// Adds a description.
    pub fn with_description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }

    /// Hides the option from abbreviation candidates and help output.
    pub fn hide(mut self) -> Self {
        self.hidden = true;
        self
    }

    /// Declares this option as an override of an inherited declaration.
    pub fn overriding(mut self) -> Self {
        self.overrides = true;
        self
    }

    /// Forbids derived levels from overriding this option.
    pub fn seal(mut self) -> Self {
        self.sealed = true;
        self
    }

    /// Attaches a restriction.
    pub fn with_restriction(mut self, restriction: Restriction) -> Self {
        self.restrictions.push(restriction);
        self
    }

    /// Clears inherited restrictions at an override site.
    pub fn unrestricted(mut self) -> Self {
        self.clear_inherited_restrictions = true;
        self
    }

    /// Checks whether `name` is one of this option's names.
    pub fn matches(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    /// Returns the preferred display name (first `--` name, else first name).
    pub fn canonical_name(&self) -> &str {
        self.names
            .iter()
            .find(|n| n.starts_with("--"))
            .or_else(|| self.names.first())
            .map(String::as_str)
            .unwrap_or(&self.title)
    }

    /// Whether the two descriptors share at least one name.
    pub fn names_overlap(&self, other: &OptionDescriptor) -> bool {
        self.names.iter().any(|n| other.matches(n))
    }

    /// Whether the two descriptors declare exactly the same name set.
    pub fn names_equal(&self, other: &OptionDescriptor) -> bool {
        let a: HashSet<&str> = self.names.iter().map(String::as_str).collect();
        let b: HashSet<&str> = other.names.iter().map(String::as_str).collect();
        a == b
    }
}

/// Descriptor for a command's positional arguments.
///
/// # Examples
///
/// ```
/// use argot_core::ArgumentsDescriptor;
///
/// let args = ArgumentsDescriptor::new(&["source", "target"]).require();
/// assert!(args.required);
/// assert_eq!(args.titles.len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArgumentsDescriptor {
    /// Ordered display titles for the positional slots.
    pub titles: Vec<String>,
    pub description: Option<String>,
    /// Whether at least one positional argument must be supplied.
    pub required: bool,
    /// Restrictions applied to positional values (position-indexed through
    /// [`Restriction::Partial`]).
    pub restrictions: Vec<Restriction>,
}

impl ArgumentsDescriptor {
    pub fn new(titles: &[&str]) -> Self {
        Self {
            titles: titles.iter().map(|t| t.to_string()).collect(),
            description: None,
            required: false,
            restrictions: Vec::new(),
        }
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }

    pub fn require(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn with_restriction(mut self, restriction: Restriction) -> Self {
        self.restrictions.push(restriction);
        self
    }
}

/// Descriptor for a single command.
///
/// A command owns options, at most one positional-arguments block, and an
/// ordered stack of inherited option levels (`base_options`, most-base
/// first). The effective option set is produced by the override resolver.
///
/// # Examples
///
/// ```
/// use argot_core::{CommandDescriptor, OptionDescriptor, ValueType};
///
/// let cmd = CommandDescriptor::new("copy")
///     .with_option(OptionDescriptor::flag("force", &["-f", "--force"]))
///     .with_base_level(vec![OptionDescriptor::flag("verbose", &["-v"])]);
///
/// let effective = cmd.effective_options().unwrap();
/// assert_eq!(effective.len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct CommandDescriptor {
    pub name: String,
    pub description: Option<String>,
    /// Hidden commands parse normally but are excluded from abbreviation
    /// candidate sets.
    pub hidden: bool,
    /// Options declared directly on this command (the most derived level).
    pub options: Vec<OptionDescriptor>,
    /// Inherited option declarations, ordered most-base first.
    pub base_options: Vec<Vec<OptionDescriptor>>,
    pub arguments: Option<ArgumentsDescriptor>,
}

impl CommandDescriptor {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Default::default()
        }
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }

    pub fn hide(mut self) -> Self {
        self.hidden = true;
        self
    }

    pub fn with_option(mut self, option: OptionDescriptor) -> Self {
        self.options.push(option);
        self
    }

    /// Pushes an inherited declaration level. Levels are ordered most-base
    /// first; the command's own `options` always form the most derived level.
    pub fn with_base_level(mut self, options: Vec<OptionDescriptor>) -> Self {
        self.base_options.push(options);
        self
    }

    pub fn with_arguments(mut self, arguments: ArgumentsDescriptor) -> Self {
        self.arguments = Some(arguments);
        self
    }

    /// Resolves the inheritance stack into the effective option set.
    pub fn effective_options(&self) -> Result<Vec<OptionDescriptor>, DefinitionError> {
        let mut levels: Vec<&[OptionDescriptor]> =
            self.base_options.iter().map(Vec::as_slice).collect();
        levels.push(&self.options);
        resolve_option_levels(&levels)
    }
}

/// Descriptor for a command group.
///
/// Group names may contain whitespace to denote a nested sub-group path
/// (e.g. `"remote add"`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct GroupDescriptor {
    pub name: String,
    pub description: Option<String>,
    /// Command run when the group is named with no further command token.
    pub default_command: Option<String>,
    pub commands: Vec<CommandDescriptor>,
    /// Options available to every command in the group.
    pub options: Vec<OptionDescriptor>,
}

impl GroupDescriptor {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Default::default()
        }
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }

    pub fn with_default_command(mut self, name: &str) -> Self {
        self.default_command = Some(name.to_string());
        self
    }

    pub fn with_command(mut self, command: CommandDescriptor) -> Self {
        self.commands.push(command);
        self
    }

    pub fn with_option(mut self, option: OptionDescriptor) -> Self {
        self.options.push(option);
        self
    }

    pub fn find_command(&self, name: &str) -> Option<&CommandDescriptor> {
        self.commands.iter().find(|c| c.name == name)
    }
}

/// Top-level descriptor for an entire CLI.
///
/// # Examples
///
/// ```
/// use argot_core::*;
///
/// let cli = GlobalDescriptor::new("tool")
///     .with_option(OptionDescriptor::flag("debug", &["--debug"]))
///     .with_command(CommandDescriptor::new("run"))
///     .with_group(GroupDescriptor::new("remote").with_command(CommandDescriptor::new("add")));
///
/// assert!(cli.find_command("run").is_some());
/// assert!(cli.find_group("remote").is_some());
/// assert!(validate_global(&cli).is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct GlobalDescriptor {
    pub name: String,
    pub description: Option<String>,
    /// Command run when no command token is supplied.
    pub default_command: Option<String>,
    pub commands: Vec<CommandDescriptor>,
    pub groups: Vec<GroupDescriptor>,
    /// Options available to every command.
    pub options: Vec<OptionDescriptor>,
    /// Restrictions evaluated once per parse over the whole result.
    pub restrictions: Vec<Restriction>,
    pub parser: ParserConfig,
}

impl GlobalDescriptor {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Default::default()
        }
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }

    pub fn with_default_command(mut self, name: &str) -> Self {
        self.default_command = Some(name.to_string());
        self
    }

    pub fn with_command(mut self, command: CommandDescriptor) -> Self {
        self.commands.push(command);
        self
    }

    pub fn with_group(mut self, group: GroupDescriptor) -> Self {
        self.groups.push(group);
        self
    }

    pub fn with_option(mut self, option: OptionDescriptor) -> Self {
        self.options.push(option);
        self
    }

    pub fn with_restriction(mut self, restriction: Restriction) -> Self {
        self.restrictions.push(restriction);
        self
    }

    pub fn with_parser(mut self, parser: ParserConfig) -> Self {
        self.parser = parser;
        self
    }

    pub fn find_command(&self, name: &str) -> Option<&CommandDescriptor> {
        self.commands.iter().find(|c| c.name == name)
    }

    pub fn find_group(&self, name: &str) -> Option<&GroupDescriptor> {
        self.groups.iter().find(|g| g.name == name)
    }
}

/// One tokenization strategy in the configured priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StrategyKind {
    /// `--name value`, `--name=value`, flag negation, any declared name
    /// followed by its arity of value tokens.
    Standard,
    /// Bundled single-character flags (`-abc`), final element may take a
    /// value inline or from following tokens.
    ShortCluster,
    /// An arity-2 option supplied as a single `key=value` token after the
    /// option name, split on the configured delimiter.
    DelimitedPair(char),
}

/// Error handling policy for a parse run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ErrorPolicy {
    /// Abort on the first error.
    #[default]
    FailFast,
    /// Record recoverable errors and keep parsing to surface as many as
    /// possible in one pass. Structural errors still abort.
    CollectAll,
}

/// Where to look for a user alias configuration file.
///
/// Locations are probed in order; the first that exists wins. A location
/// starting with `file://` is used verbatim (scheme stripped), `~/` resolves
/// against the home directory, anything else against the working directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AliasSource {
    /// File name appended to each bare directory location.
    pub filename: String,
    pub locations: Vec<String>,
}

impl AliasSource {
    pub fn new(filename: &str) -> Self {
        Self {
            filename: filename.to_string(),
            locations: Vec::new(),
        }
    }

    pub fn with_location(mut self, location: &str) -> Self {
        self.locations.push(location.to_string());
        self
    }
}

/// A user- or CLI-defined alias: a name expanding to a token template.
///
/// Template tokens are literals except `$N` placeholders, which substitute
/// the N-th token (1-based) following the alias invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AliasDescriptor {
    pub name: String,
    pub arguments: Vec<String>,
}

impl AliasDescriptor {
    pub fn new(name: &str, arguments: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            arguments: arguments.iter().map(|a| a.to_string()).collect(),
        }
    }
}

/// Parser behavior configuration carried by a [`GlobalDescriptor`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParserConfig {
    pub allow_command_abbreviation: bool,
    pub allow_option_abbreviation: bool,
    /// Tokenization strategies tried in order; the first to claim wins.
    pub strategies: Vec<StrategyKind>,
    pub aliases: Vec<AliasDescriptor>,
    /// Whether an alias expansion may itself start with another alias.
    pub alias_chaining: bool,
    /// Whether an alias may shadow a built-in command or group name.
    pub aliases_override_builtins: bool,
    pub alias_file: Option<AliasSource>,
    /// Prefix turning a boolean flag off (`--no-verbose` for `--verbose`
    /// with prefix `no-`).
    pub negation_prefix: Option<String>,
    /// Token forcing all remaining tokens to be positional.
    pub arguments_separator: String,
    pub numeric_syntax: NumericSyntax,
    pub error_policy: ErrorPolicy,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            allow_command_abbreviation: false,
            allow_option_abbreviation: false,
            strategies: vec![StrategyKind::Standard, StrategyKind::ShortCluster],
            aliases: Vec::new(),
            alias_chaining: false,
            aliases_override_builtins: false,
            alias_file: None,
            negation_prefix: None,
            arguments_separator: "--".to_string(),
            numeric_syntax: NumericSyntax::Decimal,
            error_policy: ErrorPolicy::FailFast,
        }
    }
}

/// Validates a full CLI descriptor.
///
/// Checks option shapes in every scope, duplicate command/group names,
/// default-command references, name uniqueness across each command's
/// effective scope, restriction declarations, and the parser configuration.
/// Returns the errors found (empty when valid); validation short-circuits at
/// the first error per scope.
///
/// # Examples
///
/// ```
/// use argot_core::*;
///
/// let mut cli = GlobalDescriptor::new("tool")
///     .with_command(CommandDescriptor::new("run"));
/// assert!(validate_global(&cli).is_empty());
///
/// cli = cli.with_command(CommandDescriptor::new("run"));
/// let errors = validate_global(&cli);
/// assert!(matches!(errors[0], DefinitionError::DuplicateCommand { .. }));
/// ```
pub fn validate_global(global: &GlobalDescriptor) -> Vec<DefinitionError> {
    let mut errors = Vec::new();

    errors.extend(validate_options(&global.options));
    if !errors.is_empty() {
        return errors;
    }

    for restriction in &global.restrictions {
        if let Err(error) = restriction.validate_declaration(&global.name, None) {
            return vec![error];
        }
    }

    if let Err(error) = validate_parser_config(&global.parser) {
        return vec![error];
    }

    let mut seen_commands: HashSet<&str> = HashSet::new();
    for command in &global.commands {
        if !seen_commands.insert(command.name.as_str()) {
            return vec![DefinitionError::DuplicateCommand {
                name: command.name.clone(),
            }];
        }
        errors.extend(validate_command_in_scope(command, &[], global));
        if !errors.is_empty() {
            return errors;
        }
    }

    let mut seen_groups: HashSet<&str> = HashSet::new();
    for group in &global.groups {
        if !seen_groups.insert(group.name.as_str()) {
            return vec![DefinitionError::DuplicateGroup {
                name: group.name.clone(),
            }];
        }
        errors.extend(validate_options(&group.options));
        if !errors.is_empty() {
            return errors;
        }
        if let Some(default) = &group.default_command {
            if group.find_command(default).is_none() {
                return vec![DefinitionError::UnknownDefaultCommand {
                    scope: group.name.clone(),
                    name: default.clone(),
                }];
            }
        }
        let mut seen: HashSet<&str> = HashSet::new();
        for command in &group.commands {
            if !seen.insert(command.name.as_str()) {
                return vec![DefinitionError::DuplicateCommand {
                    name: command.name.clone(),
                }];
            }
            errors.extend(validate_command_in_scope(
                command,
                std::slice::from_ref(group),
                global,
            ));
            if !errors.is_empty() {
                return errors;
            }
        }
    }

    if let Some(default) = &global.default_command {
        if global.find_command(default).is_none() {
            return vec![DefinitionError::UnknownDefaultCommand {
                scope: global.name.clone(),
                name: default.clone(),
            }];
        }
    }

    errors
}

/// Validates a single command descriptor in isolation.
pub fn validate_command(command: &CommandDescriptor) -> Vec<DefinitionError> {
    validate_command_in_scope(command, &[], &GlobalDescriptor::default())
}

fn validate_command_in_scope(
    command: &CommandDescriptor,
    groups: &[GroupDescriptor],
    global: &GlobalDescriptor,
) -> Vec<DefinitionError> {
    let mut errors = Vec::new();

    for level in &command.base_options {
        errors.extend(validate_options(level));
        if !errors.is_empty() {
            return errors;
        }
    }
    errors.extend(validate_options(&command.options));
    if !errors.is_empty() {
        return errors;
    }

    let effective = match command.effective_options() {
        Ok(options) => options,
        Err(error) => return vec![error],
    };

    // Names must stay unique across the command's whole visibility scope:
    // merged own/inherited options plus group and global options.
    let mut seen: HashSet<&str> = HashSet::new();
    let group_options = groups
        .iter()
        .filter(|g| g.commands.iter().any(|c| c.name == command.name))
        .flat_map(|g| g.options.iter());
    for option in effective
        .iter()
        .chain(group_options)
        .chain(global.options.iter())
    {
        for name in &option.names {
            if !seen.insert(name.as_str()) {
                return vec![DefinitionError::DuplicateOptionName { name: name.clone() }];
            }
        }
    }

    if let Some(arguments) = &command.arguments {
        for restriction in &arguments.restrictions {
            if let Err(error) = restriction.validate_declaration(&command.name, None) {
                return vec![error];
            }
        }
    }

    errors
}

fn validate_options(options: &[OptionDescriptor]) -> Vec<DefinitionError> {
    let mut errors = Vec::new();
    let mut seen: HashSet<&str> = HashSet::new();

    for option in options {
        if option.names.is_empty() {
            return vec![DefinitionError::EmptyOptionNames {
                title: option.title.clone(),
            }];
        }

        for name in &option.names {
            if !name.starts_with('-') || name.len() < 2 {
                return vec![DefinitionError::InvalidOptionName {
                    title: option.title.clone(),
                    name: name.clone(),
                }];
            }
            if !seen.insert(name.as_str()) {
                return vec![DefinitionError::DuplicateOptionName { name: name.clone() }];
            }
        }

        if option.arity == Arity::Nullary && option.value_type != ValueType::Bool {
            return vec![DefinitionError::NonBooleanFlag {
                title: option.title.clone(),
                value_type: option.value_type.clone(),
            }];
        }

        let arity_limit = match option.arity {
            Arity::Exactly(n) => Some(n),
            _ => None,
        };
        for restriction in &option.restrictions {
            if let Err(error) = restriction.validate_declaration(&option.title, arity_limit) {
                errors.push(error);
                return errors;
            }
        }
    }

    errors
}

fn validate_parser_config(config: &ParserConfig) -> Result<(), DefinitionError> {
    if config.arguments_separator.is_empty() {
        return Err(DefinitionError::InvalidConfiguration {
            detail: "arguments separator cannot be empty".to_string(),
        });
    }
    if let Some(prefix) = &config.negation_prefix {
        if prefix.is_empty() {
            return Err(DefinitionError::InvalidConfiguration {
                detail: "negation prefix cannot be empty".to_string(),
            });
        }
    }
    if config.strategies.is_empty() {
        return Err(DefinitionError::InvalidConfiguration {
            detail: "at least one parsing strategy must be configured".to_string(),
        });
    }
    config.numeric_syntax.validate()
}
