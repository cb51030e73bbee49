//! Option merging across an inheritance chain of declarations.
//!
//! Commands may inherit option declarations from an ordered stack of base
//! levels. [`resolve_option_levels`] reconciles the stack into a single
//! deduplicated set of effective descriptors, enforcing the override rules:
//! exact duplicates collapse, deliberate overrides may narrow the value type
//! but never widen it or change the name set, and sealed declarations can
//! never be overridden.
//!
//! # Example
//!
//! ```
//! use argot_core::*;
//!
//! let base = vec![OptionDescriptor::with_value(
//!     "count", &["-c", "--count"], ValueType::Int(IntWidth::I64),
//! )];
//! let derived = vec![OptionDescriptor::with_value(
//!     "count", &["-c", "--count"], ValueType::Int(IntWidth::I32),
//! )
//! .overriding()];
//!
//! let resolved = resolve_option_levels(&[base.as_slice(), derived.as_slice()]).unwrap();
//! assert_eq!(resolved.len(), 1);
//! assert_eq!(resolved[0].value_type, ValueType::Int(IntWidth::I32));
//! ```

use crate::descriptor::OptionDescriptor;
use crate::error::DefinitionError;

/// Resolves ordered declaration levels (most-base first) into the effective
/// option set.
///
/// The result keeps first-encounter order of logical options, and every
/// level of the hierarchy observes the same merged descriptor: parsing any
/// name in the set populates the single merged field set.
pub fn resolve_option_levels(
    levels: &[&[OptionDescriptor]],
) -> Result<Vec<OptionDescriptor>, DefinitionError> {
    let mut resolved: Vec<OptionDescriptor> = Vec::new();

    for level in levels {
        for declared in *level {
            let existing = resolved
                .iter()
                .position(|option| option.names_overlap(declared));
            let Some(index) = existing else {
                resolved.push(declared.clone());
                continue;
            };

            let base = &resolved[index];
            if is_exact_duplicate(base, declared) {
                continue;
            }

            resolved[index] = merge_override(base, declared)?;
        }
    }

    Ok(resolved)
}

/// Identical name set, arity, and type collapse silently; the earlier
/// declaration is kept.
fn is_exact_duplicate(base: &OptionDescriptor, declared: &OptionDescriptor) -> bool {
    base.names_equal(declared)
        && base.arity == declared.arity
        && base.value_type == declared.value_type
}

fn merge_override(
    base: &OptionDescriptor,
    derived: &OptionDescriptor,
) -> Result<OptionDescriptor, DefinitionError> {
    if base.sealed {
        return Err(DefinitionError::SealedOptionOverride {
            title: derived.title.clone(),
        });
    }
    if !derived.overrides {
        return Err(DefinitionError::UnannouncedOverride {
            title: derived.title.clone(),
        });
    }
    if !base.names_equal(derived) {
        return Err(DefinitionError::NameSetChanged {
            title: derived.title.clone(),
        });
    }
    if base.arity != derived.arity {
        return Err(DefinitionError::ArityChanged {
            title: derived.title.clone(),
        });
    }
    if !derived.value_type.narrows(&base.value_type) {
        return Err(DefinitionError::TypeWidened {
            title: derived.title.clone(),
            base: base.value_type.clone(),
            derived: derived.value_type.clone(),
        });
    }

    // Derived metadata replaces the base's. Restrictions are inherited when
    // the override declares none, unless the override site is explicitly
    // unrestricted.
    let mut merged = derived.clone();
    if merged.clear_inherited_restrictions {
        merged.restrictions.clear();
    } else if merged.restrictions.is_empty() {
        merged.restrictions = base.restrictions.clone();
    }
    Ok(merged)
}
