//! The populated result of a successful parse.
//!
//! A [`BoundCommand`] is what the engine hands back: the resolved command
//! descriptor, injected group/CLI metadata for introspection, every parsed
//! option occurrence in encounter order, and the positional arguments. Hosts
//! bind it to their own representation by name-matching titles through the
//! accessors.

use serde::{Deserialize, Serialize};

use crate::descriptor::{CommandDescriptor, GlobalDescriptor, GroupDescriptor, OptionDescriptor};
use crate::value::Value;

/// One occurrence of an option with the values it captured.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedOption {
    /// Title of the option descriptor this occurrence belongs to.
    pub title: String,
    /// Converted values, one per arity slot (empty for a bare flag error
    /// recovery; a healthy flag occurrence records a single boolean).
    pub values: Vec<Value>,
}

/// A validated, populated command produced by the parse entry points.
///
/// # Examples
///
/// ```
/// use argot_core::*;
///
/// let bound = BoundCommand {
///     global: None,
///     group: None,
///     command: CommandDescriptor::new("greet"),
///     scope_options: vec![OptionDescriptor::with_value("name", &["--name"], ValueType::Str)],
///     parsed: vec![ParsedOption {
///         title: "name".into(),
///         values: vec![Value::Str("bob".into())],
///     }],
///     arguments: vec![],
///     unexpected: vec![],
/// };
///
/// assert_eq!(bound.single("name").and_then(Value::as_str), Some("bob"));
/// assert_eq!(bound.occurrences_of("name"), 1);
/// assert!(!bound.was_supplied("other"));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoundCommand {
    /// The CLI descriptor the parse ran under, when parsing started from a
    /// [`GlobalDescriptor`]. Injected for introspection by the bound command.
    pub global: Option<GlobalDescriptor>,
    /// The group the command was resolved through, if any.
    pub group: Option<GroupDescriptor>,
    /// The resolved command.
    pub command: CommandDescriptor,
    /// The command's full effective option scope: merged own/inherited
    /// options plus group and global options.
    pub scope_options: Vec<OptionDescriptor>,
    /// Parsed option occurrences in encounter order.
    pub parsed: Vec<ParsedOption>,
    /// Positional arguments in encounter order.
    pub arguments: Vec<Value>,
    /// Tokens that matched nothing (populated under the collect-all policy).
    pub unexpected: Vec<String>,
}

impl BoundCommand {
    /// All values captured for the titled option, flattened across
    /// occurrences in encounter order.
    pub fn option_values(&self, title: &str) -> Vec<&Value> {
        self.parsed
            .iter()
            .filter(|p| p.title == title)
            .flat_map(|p| p.values.iter())
            .collect()
    }

    /// The first captured value for the titled option, if any.
    pub fn single(&self, title: &str) -> Option<&Value> {
        self.parsed
            .iter()
            .find(|p| p.title == title)
            .and_then(|p| p.values.first())
    }

    /// Whether a boolean flag ended up set. The last occurrence wins, so a
    /// negated flag after a plain one reads as `false`.
    pub fn flag(&self, title: &str) -> bool {
        self.parsed
            .iter()
            .rev()
            .find(|p| p.title == title)
            .and_then(|p| p.values.first())
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }

    /// Number of times the titled option was supplied.
    pub fn occurrences_of(&self, title: &str) -> usize {
        self.parsed.iter().filter(|p| p.title == title).count()
    }

    pub fn was_supplied(&self, title: &str) -> bool {
        self.occurrences_of(title) > 0
    }

    /// Looks up a descriptor in the effective scope by title.
    pub fn find_scope_option(&self, title: &str) -> Option<&OptionDescriptor> {
        self.scope_options.iter().find(|o| o.title == title)
    }

    /// Positional arguments as raw strings (positionals always convert as
    /// strings).
    pub fn argument_strings(&self) -> Vec<&str> {
        self.arguments.iter().filter_map(Value::as_str).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bound() -> BoundCommand {
        BoundCommand {
            global: None,
            group: None,
            command: CommandDescriptor::new("test"),
            scope_options: Vec::new(),
            parsed: vec![
                ParsedOption {
                    title: "verbose".into(),
                    values: vec![Value::Bool(true)],
                },
                ParsedOption {
                    title: "include".into(),
                    values: vec![Value::Str("a".into())],
                },
                ParsedOption {
                    title: "include".into(),
                    values: vec![Value::Str("b".into())],
                },
                ParsedOption {
                    title: "verbose".into(),
                    values: vec![Value::Bool(false)],
                },
            ],
            arguments: vec![Value::Str("input.txt".into())],
            unexpected: Vec::new(),
        }
    }

    #[test]
    fn test_option_values_flatten_in_encounter_order() {
        let bound = bound();
        let values: Vec<&str> = bound
            .option_values("include")
            .into_iter()
            .filter_map(Value::as_str)
            .collect();
        assert_eq!(values, vec!["a", "b"]);
        assert_eq!(bound.occurrences_of("include"), 2);
    }

    #[test]
    fn test_last_flag_occurrence_wins() {
        let bound = bound();
        assert!(!bound.flag("verbose"));
        assert!(!bound.flag("absent"));
    }

    #[test]
    fn test_argument_strings() {
        assert_eq!(bound().argument_strings(), vec!["input.txt"]);
    }
}
