//! Immutable parse state threaded through the state machine.

use argot_core::{
    CommandDescriptor, GroupDescriptor, OptionDescriptor, ParseError, ParsedOption, Value,
};

/// Where the machine currently is in `GLOBAL → (GROUP)? → COMMAND → OPTION*`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParseContext {
    #[default]
    Global,
    Group,
    Command,
    Option,
}

/// Persistent snapshot of one parse in progress.
///
/// States are never mutated in place: every transition consumes the current
/// snapshot and returns the next one via a `with_*` method. Option
/// occurrences and positional arguments keep encounter order.
#[derive(Debug, Clone, Default)]
pub struct ParseState {
    pub context: ParseContext,
    pub group: Option<GroupDescriptor>,
    pub command: Option<CommandDescriptor>,
    /// Options currently in scope for the strategies.
    pub scope: Vec<OptionDescriptor>,
    /// Parsed option occurrences in encounter order.
    pub parsed: Vec<ParsedOption>,
    /// Raw positional tokens in encounter order (converted and validated
    /// once the command is final).
    pub raw_arguments: Vec<String>,
    /// Converted positional arguments.
    pub arguments: Vec<Value>,
    /// Tokens that matched nothing.
    pub unexpected: Vec<String>,
    /// Errors collected so far.
    pub errors: Vec<ParseError>,
    /// Set once the arguments separator is seen; everything after is
    /// positional unconditionally.
    pub separator_seen: bool,
}

impl ParseState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_group(mut self, group: GroupDescriptor, scope: Vec<OptionDescriptor>) -> Self {
        self.group = Some(group);
        self.scope = scope;
        self.context = ParseContext::Group;
        self
    }

    pub fn with_command(mut self, command: CommandDescriptor, scope: Vec<OptionDescriptor>) -> Self {
        self.command = Some(command);
        self.scope = scope;
        self.context = ParseContext::Command;
        self
    }

    pub fn with_option(mut self, option: ParsedOption) -> Self {
        self.parsed.push(option);
        if self.command.is_some() {
            self.context = ParseContext::Option;
        }
        self
    }

    pub fn with_raw_argument(mut self, token: &str) -> Self {
        self.raw_arguments.push(token.to_string());
        self
    }

    pub fn with_unexpected(mut self, token: &str) -> Self {
        self.unexpected.push(token.to_string());
        self
    }

    pub fn with_error(mut self, error: ParseError) -> Self {
        self.errors.push(error);
        self
    }

    pub fn with_separator(mut self) -> Self {
        self.separator_seen = true;
        self
    }
}
