//! Parse engine for declarative CLI descriptors.
//!
//! This crate consumes the metadata model from [`argot_core`] and turns a
//! raw token stream into a validated [`BoundCommand`] or a structured list
//! of [`ParseError`]s:
//!
//! 1. If aliases are configured, the leading token is expanded (with
//!    positional `$N` substitution and optional chaining) before anything
//!    else runs.
//! 2. The state machine offers the remaining tokens to the configured
//!    tokenization strategies in priority order, resolving group and command
//!    names along the way.
//! 3. Every captured value passes through the three-phase restriction
//!    pipeline (raw pre-validation, conversion, post-validation); final
//!    validation runs once end of input is reached.
//!
//! # Main entry points
//!
//! - [`parse`] — parse against a full CLI descriptor.
//! - [`parse_command`] — single-command surface, no group/global resolution.
//! - [`parse_with_report`] — same as [`parse`], plus run diagnostics.
//!
//! # Example
//!
//! ```
//! use argot_core::*;
//! use argot_engine::parse;
//!
//! let cli = GlobalDescriptor::new("tool")
//!     .with_option(OptionDescriptor::flag("verbose", &["-v", "--verbose"]))
//!     .with_command(
//!         CommandDescriptor::new("greet")
//!             .with_option(OptionDescriptor::with_value("name", &["--name"], ValueType::Str)),
//!     );
//!
//! let bound = parse(&cli, ["-v", "greet", "--name", "bob"]).unwrap();
//! assert_eq!(bound.command.name, "greet");
//! assert!(bound.flag("verbose"));
//! assert_eq!(bound.single("name").and_then(Value::as_str), Some("bob"));
//! ```

mod abbrev;
mod alias;
mod alias_file;
mod machine;
mod state;
pub mod strategies;

use std::collections::HashSet;

use serde::Serialize;
use tracing::debug;

use argot_core::{
    AliasDescriptor, BoundCommand, CommandDescriptor, ConverterRegistry, ErrorPolicy,
    GlobalDescriptor, ParseError, ParserConfig, final_validate,
};

pub use abbrev::{AbbrevResolution, resolve_name};
pub use alias::expand_aliases;
pub use alias_file::{load_aliases, parse_alias_lines};
pub use state::{ParseContext, ParseState};

use machine::Machine;

/// Parses `args` against a full CLI descriptor.
///
/// Returns the populated command, or every error found (a single error under
/// the fail-fast policy).
pub fn parse<I, T>(global: &GlobalDescriptor, args: I) -> Result<BoundCommand, Vec<ParseError>>
where
    I: IntoIterator<Item = T>,
    T: Into<String>,
{
    parse_with_registry(global, None, args)
}

/// Like [`parse`], with a host converter registry for custom value types.
pub fn parse_with_registry<I, T>(
    global: &GlobalDescriptor,
    registry: Option<&ConverterRegistry>,
    args: I,
) -> Result<BoundCommand, Vec<ParseError>>
where
    I: IntoIterator<Item = T>,
    T: Into<String>,
{
    run_global(global, registry, collect_tokens(args)).result
}

/// Like [`parse`], additionally returning run diagnostics.
pub fn parse_with_report<I, T>(global: &GlobalDescriptor, args: I) -> ParseRun
where
    I: IntoIterator<Item = T>,
    T: Into<String>,
{
    run_global(global, None, collect_tokens(args))
}

/// Parses `args` against a single command with a default configuration.
pub fn parse_command<I, T>(
    command: &CommandDescriptor,
    args: I,
) -> Result<BoundCommand, Vec<ParseError>>
where
    I: IntoIterator<Item = T>,
    T: Into<String>,
{
    parse_command_with_config(command, &ParserConfig::default(), args)
}

/// Parses `args` against a single command under an explicit configuration.
pub fn parse_command_with_config<I, T>(
    command: &CommandDescriptor,
    config: &ParserConfig,
    args: I,
) -> Result<BoundCommand, Vec<ParseError>>
where
    I: IntoIterator<Item = T>,
    T: Into<String>,
{
    let tokens = collect_tokens(args);

    let scope = match command.effective_options() {
        Ok(scope) => scope,
        Err(error) => return Err(vec![ParseError::Definition(error)]),
    };

    let machine = Machine::new(None, config, None);
    let mut initial = ParseState::new();
    initial.scope = scope;
    initial.command = Some(command.clone());
    initial.context = ParseContext::Command;

    let state = machine.run(&tokens, initial);
    bind(None, state, config.error_policy)
}

/// Diagnostics for one parse run.
#[derive(Debug, Clone, Serialize)]
pub struct ParseReport {
    /// CLI name the parse ran under.
    pub cli: String,
    /// Resolved command name, if any.
    pub command: Option<String>,
    /// Resolved group name, if any.
    pub group: Option<String>,
    /// Token stream after alias expansion.
    pub expanded_tokens: Vec<String>,
    /// Configured strategy names in priority order.
    pub strategies: Vec<String>,
    /// Tokens nothing claimed.
    pub unexpected: Vec<String>,
    /// Rendered error messages (empty on success).
    pub errors: Vec<String>,
}

/// Result plus report, as returned by [`parse_with_report`].
#[derive(Debug)]
pub struct ParseRun {
    pub result: Result<BoundCommand, Vec<ParseError>>,
    pub report: ParseReport,
}

fn collect_tokens<I, T>(args: I) -> Vec<String>
where
    I: IntoIterator<Item = T>,
    T: Into<String>,
{
    args.into_iter().map(Into::into).collect()
}

fn run_global(
    global: &GlobalDescriptor,
    registry: Option<&ConverterRegistry>,
    tokens: Vec<String>,
) -> ParseRun {
    let config = &global.parser;
    let machine = Machine::new(Some(global), config, registry);
    let strategies: Vec<String> = machine
        .strategy_names()
        .iter()
        .map(|n| n.to_string())
        .collect();

    let report_for = |expanded: &[String], result: &Result<BoundCommand, Vec<ParseError>>| {
        let (command, group, unexpected) = match result {
            Ok(bound) => (
                Some(bound.command.name.clone()),
                bound.group.as_ref().map(|g| g.name.clone()),
                bound.unexpected.clone(),
            ),
            Err(_) => (None, None, Vec::new()),
        };
        ParseReport {
            cli: global.name.clone(),
            command,
            group,
            expanded_tokens: expanded.to_vec(),
            strategies: strategies.clone(),
            unexpected,
            errors: match result {
                Ok(_) => Vec::new(),
                Err(errors) => errors.iter().map(ParseError::to_string).collect(),
            },
        }
    };

    let expanded = match expand_for(global, &tokens) {
        Ok(expanded) => expanded,
        Err(error) => {
            let result = Err(vec![error]);
            let report = report_for(&tokens, &result);
            return ParseRun { result, report };
        }
    };
    if expanded != tokens {
        debug!(expanded = ?expanded, "alias expansion rewrote the token stream");
    }

    let mut initial = ParseState::new();
    initial.scope = global.options.clone();
    let state = machine.run(&expanded, initial);

    let result = bind(Some(global), state, config.error_policy);
    let report = report_for(&expanded, &result);
    ParseRun { result, report }
}

/// Assembles the effective alias table (inline definitions win over
/// file-loaded ones) and expands a leading alias.
fn expand_for(global: &GlobalDescriptor, tokens: &[String]) -> Result<Vec<String>, ParseError> {
    let config = &global.parser;
    let mut aliases: Vec<AliasDescriptor> = config.aliases.clone();
    if let Some(source) = &config.alias_file {
        for loaded in load_aliases(source)? {
            if !aliases.iter().any(|a| a.name == loaded.name) {
                aliases.push(loaded);
            }
        }
    }
    if aliases.is_empty() {
        return Ok(tokens.to_vec());
    }

    let builtins: HashSet<String> = global
        .commands
        .iter()
        .map(|c| c.name.clone())
        .chain(global.groups.iter().map(|g| g.name.clone()))
        .collect();
    expand_aliases(tokens, &aliases, config, &builtins)
}

/// Builds the bound command from the terminal state and runs final
/// validation.
fn bind(
    global: Option<&GlobalDescriptor>,
    state: ParseState,
    policy: ErrorPolicy,
) -> Result<BoundCommand, Vec<ParseError>> {
    let mut errors = state.errors;

    let Some(command) = state.command else {
        if errors.is_empty() {
            errors.push(ParseError::CommandMissing);
        }
        return Err(trim_for_policy(errors, policy));
    };

    let bound = BoundCommand {
        global: global.cloned(),
        group: state.group,
        command,
        scope_options: state.scope,
        parsed: state.parsed,
        arguments: state.arguments,
        unexpected: state.unexpected,
    };

    errors.extend(final_validate(&bound));
    if errors.is_empty() {
        Ok(bound)
    } else {
        Err(trim_for_policy(errors, policy))
    }
}

fn trim_for_policy(mut errors: Vec<ParseError>, policy: ErrorPolicy) -> Vec<ParseError> {
    if policy == ErrorPolicy::FailFast {
        errors.truncate(1);
    }
    errors
}
