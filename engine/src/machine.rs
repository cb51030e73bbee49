//! The parse state machine.
//!
//! Drives the configured strategies over the token stream, resolving group
//! and command names, capturing option values through the three-phase
//! restriction pipeline, collecting positional arguments, and substituting
//! the default command at end of input.

use argot_core::{
    Arity, CommandDescriptor, ConvertContext, ConverterRegistry, DefinitionError,
    GlobalDescriptor, GroupDescriptor, OptionDescriptor, ParseError, ParsedOption, ParserConfig,
    Value, convert,
};
use tracing::debug;

use crate::abbrev::{AbbrevResolution, resolve_name};
use crate::state::ParseState;
use crate::strategies::{ClaimedOption, OptionStrategy, StrategyOutcome, build_strategies};

pub(crate) struct Machine<'a> {
    global: Option<&'a GlobalDescriptor>,
    config: &'a ParserConfig,
    strategies: Vec<Box<dyn OptionStrategy>>,
    registry: Option<&'a ConverterRegistry>,
}

impl<'a> Machine<'a> {
    pub(crate) fn new(
        global: Option<&'a GlobalDescriptor>,
        config: &'a ParserConfig,
        registry: Option<&'a ConverterRegistry>,
    ) -> Self {
        Self {
            global,
            config,
            strategies: build_strategies(config),
            registry,
        }
    }

    /// Names of the configured strategies, for reporting.
    pub(crate) fn strategy_names(&self) -> Vec<&'static str> {
        self.strategies.iter().map(|s| s.name()).collect()
    }

    /// Consumes the token stream and returns the terminal state.
    pub(crate) fn run(&self, tokens: &[String], mut state: ParseState) -> ParseState {
        let mut index = 0;

        while index < tokens.len() {
            let token = &tokens[index];

            if state.separator_seen {
                state = state.with_raw_argument(token);
                index += 1;
                continue;
            }
            if *token == self.config.arguments_separator {
                debug!("arguments separator seen; remaining tokens are positional");
                state = state.with_separator();
                index += 1;
                continue;
            }

            if let Some(outcome) = self.offer(&tokens[index..], &state) {
                index += outcome.consumed.max(1);
                state = self.apply_outcome(state, outcome);
                if self.should_abort(&state) {
                    return state;
                }
                continue;
            }

            if state.command.is_none() {
                let (next, fatal) = self.resolve_command_token(state, token);
                state = next;
                if fatal {
                    return state;
                }
                index += 1;
                continue;
            }

            let accepts_arguments = state
                .command
                .as_ref()
                .is_some_and(|c| c.arguments.is_some());
            if accepts_arguments {
                state = state.with_raw_argument(token);
            } else {
                state = state
                    .with_unexpected(token)
                    .with_error(ParseError::OptionUnexpected {
                        token: token.clone(),
                    });
                if self.should_abort(&state) {
                    return state;
                }
            }
            index += 1;
        }

        self.finish(state)
    }

    fn offer(&self, rest: &[String], state: &ParseState) -> Option<StrategyOutcome> {
        for strategy in &self.strategies {
            if let Some(outcome) = strategy.claim(rest, &state.scope, self.config) {
                debug!(
                    strategy = strategy.name(),
                    consumed = outcome.consumed,
                    "strategy claimed tokens"
                );
                return Some(outcome);
            }
        }
        None
    }

    fn apply_outcome(&self, mut state: ParseState, outcome: StrategyOutcome) -> ParseState {
        match outcome.outcome {
            Ok(claims) => {
                for claim in claims {
                    state = self.apply_claim(state, claim);
                }
                state
            }
            Err(error) => state.with_error(error),
        }
    }

    fn apply_claim(&self, mut state: ParseState, claim: ClaimedOption) -> ParseState {
        let descriptor = claim.descriptor;
        let title = descriptor.title.clone();

        if claim.negated {
            return state.with_option(ParsedOption {
                title,
                values: vec![Value::Bool(false)],
            });
        }
        if descriptor.arity == Arity::Nullary {
            return state.with_option(ParsedOption {
                title,
                values: vec![Value::Bool(true)],
            });
        }

        let ctx = ConvertContext {
            numeric: self.config.numeric_syntax,
            registry: self.registry,
        };
        let mut values = Vec::with_capacity(claim.raw_values.len());
        for (position, raw) in claim.raw_values.iter().enumerate() {
            match validate_and_convert(&descriptor, raw, position, &ctx) {
                Ok(value) => values.push(value),
                Err(error) => state = state.with_error(error),
            }
        }
        state.with_option(ParsedOption { title, values })
    }

    /// Handles a token that no strategy claimed while no command is
    /// resolved: a group name, a command name, or unrecognized input.
    /// Returns the next state and whether the parse must stop.
    fn resolve_command_token(&self, state: ParseState, token: &str) -> (ParseState, bool) {
        let Some(global) = self.global else {
            return (
                state.with_error(ParseError::CommandUnrecognized {
                    tokens: vec![token.to_string()],
                }),
                true,
            );
        };
        let allow = self.config.allow_command_abbreviation;

        if state.group.is_none() && !global.groups.is_empty() {
            let candidates = global.groups.iter().map(|g| g.name.as_str());
            match resolve_name(token, candidates, allow) {
                AbbrevResolution::Exact(name) | AbbrevResolution::Unique(name) => {
                    if let Some(group) = global.find_group(&name) {
                        debug!(group = %name, "entered group");
                        let mut scope = global.options.clone();
                        scope.extend(group.options.iter().cloned());
                        return (state.with_group(group.clone(), scope), false);
                    }
                }
                AbbrevResolution::Ambiguous(candidates) => {
                    return (
                        state.with_error(ParseError::AbbreviationAmbiguous {
                            token: token.to_string(),
                            candidates,
                        }),
                        true,
                    );
                }
                AbbrevResolution::NoMatch => {}
            }
        }

        // A whitespace-separated group name denotes a nested sub-group: with
        // "remote" entered, the token "add" may descend into "remote add".
        if let Some(current) = &state.group {
            let prefix = format!("{} ", current.name);
            let segments: Vec<&str> = global
                .groups
                .iter()
                .filter_map(|g| g.name.strip_prefix(&prefix))
                .filter(|rest| !rest.contains(' '))
                .collect();
            match resolve_name(token, segments.iter().copied(), allow) {
                AbbrevResolution::Exact(segment) | AbbrevResolution::Unique(segment) => {
                    let path = format!("{prefix}{segment}");
                    if let Some(group) = global.find_group(&path) {
                        debug!(group = %path, "descended into sub-group");
                        let mut scope = state.scope.clone();
                        scope.extend(group.options.iter().cloned());
                        return (state.with_group(group.clone(), scope), false);
                    }
                }
                AbbrevResolution::Ambiguous(candidates) => {
                    return (
                        state.with_error(ParseError::AbbreviationAmbiguous {
                            token: token.to_string(),
                            candidates,
                        }),
                        true,
                    );
                }
                AbbrevResolution::NoMatch => {}
            }
        }

        let commands: Vec<&CommandDescriptor> = match &state.group {
            Some(group) => group.commands.iter().collect(),
            None => global.commands.iter().collect(),
        };

        // Hidden commands still match exactly but never by prefix.
        if let Some(command) = commands.iter().find(|c| c.name == token) {
            let command = (*command).clone();
            return self.enter_command(state, &command);
        }
        let candidates = commands.iter().filter(|c| !c.hidden).map(|c| c.name.as_str());
        match resolve_name(token, candidates, allow) {
            AbbrevResolution::Exact(name) | AbbrevResolution::Unique(name) => {
                match commands.iter().find(|c| c.name == name) {
                    Some(command) => {
                        let command = (*command).clone();
                        self.enter_command(state, &command)
                    }
                    None => (
                        state.with_error(ParseError::CommandUnrecognized {
                            tokens: vec![token.to_string()],
                        }),
                        true,
                    ),
                }
            }
            AbbrevResolution::Ambiguous(candidates) => (
                state.with_error(ParseError::AbbreviationAmbiguous {
                    token: token.to_string(),
                    candidates,
                }),
                true,
            ),
            AbbrevResolution::NoMatch => (
                state.with_error(ParseError::CommandUnrecognized {
                    tokens: vec![token.to_string()],
                }),
                true,
            ),
        }
    }

    fn enter_command(
        &self,
        state: ParseState,
        command: &CommandDescriptor,
    ) -> (ParseState, bool) {
        match self.command_scope(command, state.group.as_ref()) {
            Ok(scope) => {
                debug!(command = %command.name, options = scope.len(), "resolved command");
                (state.with_command(command.clone(), scope), false)
            }
            Err(error) => (state.with_error(ParseError::Definition(error)), true),
        }
    }

    /// A command's effective scope: merged own/inherited options plus the
    /// surrounding group and global options.
    fn command_scope(
        &self,
        command: &CommandDescriptor,
        group: Option<&GroupDescriptor>,
    ) -> Result<Vec<OptionDescriptor>, DefinitionError> {
        let mut scope = command.effective_options()?;
        if let Some(group) = group {
            scope.extend(group.options.iter().cloned());
        }
        if let Some(global) = self.global {
            scope.extend(global.options.iter().cloned());
        }
        Ok(scope)
    }

    /// End-of-input handling: default-command substitution, then positional
    /// conversion and validation against the final command.
    fn finish(&self, mut state: ParseState) -> ParseState {
        if state.command.is_none() {
            let default = state
                .group
                .as_ref()
                .and_then(|g| g.default_command.clone())
                .or_else(|| self.global.and_then(|g| g.default_command.clone()));
            let Some(name) = default else {
                return state.with_error(ParseError::CommandMissing);
            };

            let command = state
                .group
                .as_ref()
                .and_then(|g| g.find_command(&name))
                .cloned()
                .or_else(|| self.global.and_then(|g| g.find_command(&name)).cloned());
            let Some(command) = command else {
                return state.with_error(ParseError::CommandMissing);
            };

            debug!(command = %command.name, "substituted default command");
            let (next, fatal) = self.enter_command(state, &command);
            state = next;
            if fatal {
                return state;
            }
        }

        self.convert_positionals(state)
    }

    fn convert_positionals(&self, mut state: ParseState) -> ParseState {
        let Some(command) = state.command.clone() else {
            return state;
        };

        let Some(arguments) = &command.arguments else {
            for raw in state.raw_arguments.clone() {
                state = state
                    .with_unexpected(&raw)
                    .with_error(ParseError::OptionUnexpected { token: raw.clone() });
            }
            return state;
        };

        for (position, raw) in state.raw_arguments.clone().iter().enumerate() {
            let title = arguments
                .titles
                .get(position)
                .or_else(|| arguments.titles.last())
                .map(String::as_str)
                .unwrap_or("arguments");

            let mut failed = false;
            for restriction in &arguments.restrictions {
                if let Err(error) = restriction.pre_validate(title, raw, position) {
                    state.errors.push(error);
                    failed = true;
                    break;
                }
            }
            if failed {
                continue;
            }

            let value = Value::Str(raw.clone());
            for restriction in &arguments.restrictions {
                if let Err(error) = restriction.post_validate(title, &value, position) {
                    state.errors.push(error);
                    failed = true;
                    break;
                }
            }
            if !failed {
                state.arguments.push(value);
            }
        }

        state
    }

    fn should_abort(&self, state: &ParseState) -> bool {
        self.config.error_policy == argot_core::ErrorPolicy::FailFast && !state.errors.is_empty()
    }
}

fn validate_and_convert(
    descriptor: &OptionDescriptor,
    raw: &str,
    position: usize,
    ctx: &ConvertContext<'_>,
) -> Result<Value, ParseError> {
    for restriction in &descriptor.restrictions {
        restriction.pre_validate(&descriptor.title, raw, position)?;
    }
    let value = convert(&descriptor.title, &descriptor.value_type, raw, ctx)?;
    for restriction in &descriptor.restrictions {
        restriction.post_validate(&descriptor.title, &value, position)?;
    }
    Ok(value)
}
