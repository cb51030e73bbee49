//! Alias configuration file loading.
//!
//! Alias files are line-oriented: `name = token1 token2 $1` defines one
//! alias; blank lines and lines starting with `#` are ignored; lines with no
//! `=` are skipped. An [`AliasSource`] names an ordered list of locations to
//! probe; the first location holding an existing file wins.

use std::path::PathBuf;

use argot_core::{AliasDescriptor, AliasSource, ParseError};
use tracing::debug;

/// Probes the source's locations in order and loads the first existing file.
///
/// A missing file is not an error (the result is simply empty); a file that
/// exists but cannot be read is [`ParseError::AliasConfigUnreadable`].
pub fn load_aliases(source: &AliasSource) -> Result<Vec<AliasDescriptor>, ParseError> {
    for location in &source.locations {
        let Some(path) = resolve_location(location, &source.filename) else {
            continue;
        };
        if !path.is_file() {
            continue;
        }

        let content =
            std::fs::read_to_string(&path).map_err(|e| ParseError::AliasConfigUnreadable {
                path: path.display().to_string(),
                detail: e.to_string(),
            })?;
        let aliases = parse_alias_lines(&content);
        debug!(path = %path.display(), count = aliases.len(), "loaded alias file");
        return Ok(aliases);
    }

    Ok(Vec::new())
}

/// Resolves one configured location to a concrete path.
///
/// `file://` forces an explicit file lookup (the filename is not appended);
/// `~/` resolves against the home directory; anything else is a directory
/// relative to the working directory.
fn resolve_location(location: &str, filename: &str) -> Option<PathBuf> {
    if let Some(explicit) = location.strip_prefix("file://") {
        return Some(PathBuf::from(explicit));
    }
    if let Some(home_relative) = location.strip_prefix("~/") {
        let home = std::env::var_os("HOME")?;
        return Some(PathBuf::from(home).join(home_relative).join(filename));
    }
    Some(PathBuf::from(location).join(filename))
}

/// Parses alias file content into descriptors.
pub fn parse_alias_lines(content: &str) -> Vec<AliasDescriptor> {
    let mut aliases = Vec::new();

    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let Some((name, template)) = line.split_once('=') else {
            continue;
        };
        let name = name.trim();
        if name.is_empty() || name.contains(char::is_whitespace) {
            continue;
        }

        let arguments: Vec<&str> = template.split_whitespace().collect();
        aliases.push(AliasDescriptor::new(name, &arguments));
    }

    aliases
}
