//! Config operations: template generation, key lookup, listing, and result types.
//!
//! Provides the logic behind `config list`, `config gen`, `config get`, and the
//! `ConfigResult` enum that callers use to display results.

use std::fmt;
use std::path::PathBuf;

use crate::configuration::Configuration;
use crate::document::{Document, normalize_option};
use crate::entry::Entry;
use crate::error::IniformError;

/// Result of a config operation. Returned to the caller for display.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigResult {
    /// A generated INI template string.
    Template(String),
    /// Confirmation that a template was written to a file.
    TemplateWritten { path: PathBuf },
    /// A key's resolved value and its comment lines.
    KeyValue {
        key: String,
        value: String,
        doc: Vec<String>,
    },
    /// Confirmation that a value was persisted.
    ValueSet { key: String, value: String },
    /// Confirmation that a value was removed.
    ValueUnset { key: String },
    /// All resolved `section:option` pairs.
    Listing { entries: Vec<(String, String)> },
    /// The inquire flow finished and the answers were written.
    Inquired { path: PathBuf },
}

impl fmt::Display for ConfigResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigResult::Template(t) => write!(f, "{t}"),
            ConfigResult::TemplateWritten { path } => {
                write!(f, "Config template written to {}", path.display())
            }
            ConfigResult::KeyValue { key, value, doc } => {
                for line in doc {
                    writeln!(f, "# {line}")?;
                }
                write!(f, "{key} = {value}")
            }
            ConfigResult::ValueSet { key, value } => write!(f, "Set {key} = {value}"),
            ConfigResult::ValueUnset { key } => write!(f, "Unset {key}"),
            ConfigResult::Listing { entries } => {
                for (i, (key, value)) in entries.iter().enumerate() {
                    if i > 0 {
                        writeln!(f)?;
                    }
                    write!(f, "{key} = {value}")?;
                }
                Ok(())
            }
            ConfigResult::Inquired { path } => {
                write!(f, "Configuration written to {}", path.display())
            }
        }
    }
}

/// Split `section:option` on the last colon. Section names may themselves
/// contain colons; option names may not.
pub fn parse_key(key: &str) -> Result<(&str, &str), IniformError> {
    match key.rsplit_once(':') {
        Some((section, option)) if !section.trim().is_empty() && !option.trim().is_empty() => {
            Ok((section.trim(), option.trim()))
        }
        _ => Err(IniformError::InvalidKey(key.to_string())),
    }
}

/// A document holding every entry's default and comment, in the same settings
/// as `like`.
pub fn template(entries: &[Entry], like: &Document) -> Result<Document, IniformError> {
    let mut doc = like.empty_like();
    for entry in entries {
        doc.ensure_section(entry.section())?;
        doc.set(
            entry.section(),
            entry.option(),
            entry.default_raw(),
            Some(&entry.comment()),
        )?;
    }
    Ok(doc)
}

/// Render [`template`] as text.
pub fn generate_template(entries: &[Entry], like: &Document) -> Result<String, IniformError> {
    template(entries, like).map(|doc| doc.to_string())
}

/// Get a value by `section:option`, including its comment.
///
/// Declared entries fall back to their default; other keys must exist in the
/// loaded document.
pub fn get_value(config: &Configuration, key: &str) -> Result<ConfigResult, IniformError> {
    let (section, option) = parse_key(key)?;

    let (value, comment) = match config.entry(key) {
        Some(entry) => (config.value(entry)?, Some(entry.comment())),
        None => {
            let doc = config.document();
            if !doc.has_option(section, option) {
                return Err(IniformError::KeyNotFound(key.to_string()));
            }
            (
                doc.get(section, option)?,
                doc.get_comment(section, Some(option)).map(str::to_string),
            )
        }
    };

    Ok(ConfigResult::KeyValue {
        key: format!("{section}:{}", normalize_option(option)),
        value,
        doc: comment
            .map(|c| c.lines().map(str::to_string).collect())
            .unwrap_or_default(),
    })
}

/// Every declared entry with its effective value, followed by the other keys
/// of the loaded document.
pub fn list_values(config: &Configuration) -> Result<ConfigResult, IniformError> {
    let mut entries: Vec<(String, String)> = Vec::new();
    for entry in config.entries() {
        entries.push((entry.key(), config.value(entry)?));
    }

    let doc = config.document();
    for section in doc.sections() {
        for (option, value) in doc.items(section)? {
            let key = format!("{section}:{option}");
            if !entries.iter().any(|(k, _)| *k == key) {
                entries.push((key, value));
            }
        }
    }

    Ok(ConfigResult::Listing { entries })
}
