//! Core metadata model and validation rules for declarative CLI parsing.
//!
//! This crate defines the foundational types the parse engine consumes:
//!
//! - [`GlobalDescriptor`] — a whole CLI: commands, groups, global options,
//!   global restrictions, and the [`ParserConfig`].
//! - [`CommandDescriptor`] / [`GroupDescriptor`] — commands with their own
//!   options, inherited option levels, and positional arguments.
//! - [`OptionDescriptor`] / [`ArgumentsDescriptor`] — the option and
//!   positional-argument metadata, with attached [`Restriction`]s.
//! - [`Value`] / [`ValueType`] and [`convert`] — typed value conversion with
//!   pluggable numeric syntax ([`NumericSyntax`]) and a host
//!   [`ConverterRegistry`] for custom types.
//! - [`resolve_option_levels`] — the override/merge resolver for inherited
//!   option declarations.
//! - [`BoundCommand`] — the populated result the engine produces.
//!
//! Validation ([`validate_global`], [`validate_command`]) catches structural
//! definition errors — malformed option names, duplicate names in scope,
//! illegal overrides, unsatisfiable restrictions — before any parse runs.
//!
//! # Example
//!
//! ```
//! use argot_core::*;
//!
//! let cli = GlobalDescriptor::new("tool")
//!     .with_option(OptionDescriptor::flag("verbose", &["-v", "--verbose"]))
//!     .with_command(
//!         CommandDescriptor::new("fetch")
//!             .with_option(
//!                 OptionDescriptor::with_value("depth", &["--depth"], ValueType::Int(IntWidth::I32))
//!                     .with_restriction(Restriction::range(Value::Int(0), Value::Int(100))),
//!             ),
//!     );
//!
//! assert!(validate_global(&cli).is_empty());
//! assert!(cli.find_command("fetch").is_some());
//! ```

mod bound;
mod convert;
mod descriptor;
mod error;
mod merge;
mod registry;
mod restrict;
mod value;

pub use bound::{BoundCommand, ParsedOption};
pub use convert::{ConvertContext, NumericSyntax, convert};
pub use descriptor::{
    AliasDescriptor, AliasSource, ArgumentsDescriptor, Arity, CommandDescriptor, ErrorPolicy,
    GlobalDescriptor, GroupDescriptor, OptionDescriptor, ParserConfig, StrategyKind,
    validate_command, validate_global,
};
pub use error::{DefinitionError, ParseError, TagRule};
pub use merge::resolve_option_levels;
pub use registry::{Converter, ConverterRegistry};
pub use restrict::{Restriction, final_validate};
pub use value::{FloatWidth, IntWidth, UintWidth, Value, ValueType};
