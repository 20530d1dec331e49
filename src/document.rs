//! The comment-aware INI document.
//!
//! A [`Document`] holds ordered sections of raw option values plus the
//! comments that were attached to them, and writes both back out. Values are
//! stored raw; [`Document::get`] runs them through the configured
//! [`Interpolation`] on the way out.
//!
//! Reading several sources layers them: later sources override earlier values
//! key by key, and later comments replace earlier ones for the same construct.

use std::fmt;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, warn};

use crate::comments::CommentStore;
use crate::error::IniformError;
use crate::grammar;
use crate::interpolate::{EnvInterpolation, Interpolation};
use crate::matcher::{LineMatcher, add_prefix};

/// Name of the section whose options every other section inherits.
pub const DEFAULT_SECTION: &str = "DEFAULT";

pub const DEFAULT_DELIMITERS: [&str; 2] = ["=", ":"];
pub const DEFAULT_COMMENT_PREFIXES: [&str; 2] = ["#", ";"];

/// Option names are case-insensitive and stored lower-cased.
pub fn normalize_option(option: &str) -> String {
    option.to_lowercase()
}

/// A named block of options in file order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Section {
    name: String,
    options: Vec<(String, String)>,
}

impl Section {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            options: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// `(option, raw value)` pairs in file order.
    pub fn options(&self) -> impl Iterator<Item = (&str, &str)> {
        self.options.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn get(&self, option: &str) -> Option<&str> {
        self.options
            .iter()
            .find(|(k, _)| k == option)
            .map(|(_, v)| v.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }

    pub fn len(&self) -> usize {
        self.options.len()
    }

    fn set(&mut self, option: String, value: String) {
        match self.options.iter_mut().find(|(k, _)| *k == option) {
            Some(slot) => slot.1 = value,
            None => self.options.push((option, value)),
        }
    }

    fn remove(&mut self, option: &str) -> bool {
        let before = self.options.len();
        self.options.retain(|(k, _)| k != option);
        self.options.len() != before
    }
}

/// Parsed INI text with its comments.
#[derive(Debug, Clone)]
pub struct Document {
    sections: Vec<Section>,
    defaults: Section,
    comments: CommentStore,
    matcher: LineMatcher,
    strict: bool,
    space_around_delimiters: bool,
    interpolation: Arc<dyn Interpolation>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// An empty document with `=`/`:` delimiters, `#`/`;` comments, strict
    /// parsing and [`EnvInterpolation`].
    pub fn new() -> Self {
        Self {
            sections: Vec::new(),
            defaults: Section::new(DEFAULT_SECTION),
            comments: CommentStore::new(),
            matcher: LineMatcher::standard(),
            strict: true,
            space_around_delimiters: true,
            interpolation: Arc::new(EnvInterpolation::default()),
        }
    }

    pub fn with_interpolation(self, interpolation: impl Interpolation + 'static) -> Self {
        self.with_shared_interpolation(Arc::new(interpolation))
    }

    pub fn with_shared_interpolation(mut self, interpolation: Arc<dyn Interpolation>) -> Self {
        self.interpolation = interpolation;
        self
    }

    /// Replace the option delimiters. The first one is used when writing.
    /// Fails with [`IniformError::InvalidMarkers`] on an empty list.
    pub fn with_delimiters<D: AsRef<str>>(mut self, delimiters: &[D]) -> Result<Self, IniformError> {
        self.matcher = LineMatcher::new(delimiters, self.matcher.comment_prefixes())?;
        Ok(self)
    }

    /// Replace the comment prefixes. The first one is used when writing.
    /// Fails with [`IniformError::InvalidMarkers`] on an empty list.
    pub fn with_comment_prefixes<P: AsRef<str>>(mut self, prefixes: &[P]) -> Result<Self, IniformError> {
        self.matcher = LineMatcher::new(self.matcher.delimiters(), prefixes)?;
        Ok(self)
    }

    /// Reject repeated sections and options within one source (default on).
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Write `key = value` (default) instead of `key=value`.
    pub fn space_around_delimiters(mut self, space: bool) -> Self {
        self.space_around_delimiters = space;
        self
    }

    /// A document with the same settings and no content.
    pub fn empty_like(&self) -> Self {
        Self {
            sections: Vec::new(),
            defaults: Section::new(DEFAULT_SECTION),
            comments: CommentStore::new(),
            matcher: self.matcher.clone(),
            strict: self.strict,
            space_around_delimiters: self.space_around_delimiters,
            interpolation: Arc::clone(&self.interpolation),
        }
    }

    pub fn interpolation(&self) -> &dyn Interpolation {
        self.interpolation.as_ref()
    }

    pub fn matcher(&self) -> &LineMatcher {
        &self.matcher
    }

    pub fn comments(&self) -> &CommentStore {
        &self.comments
    }

    // -- Reading --------------------------------------------------------------

    /// Read one file. A missing file is an error.
    pub fn read_file(&mut self, path: impl AsRef<Path>) -> Result<(), IniformError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                IniformError::MissingFile {
                    path: path.to_path_buf(),
                }
            } else {
                IniformError::IoError {
                    path: path.to_path_buf(),
                    source: e,
                }
            }
        })?;
        self.read_str(&text, &path.display().to_string())
    }

    /// Read every existing file of `paths` in order and return the ones read.
    /// Missing files are skipped with a warning.
    pub fn read<I, P>(&mut self, paths: I) -> Result<Vec<PathBuf>, IniformError>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        let mut read = Vec::new();
        for path in paths {
            let path = path.as_ref();
            match self.read_file(path) {
                Ok(()) => read.push(path.to_path_buf()),
                Err(IniformError::MissingFile { .. }) => {
                    warn!(
                        event = "document.read_skipped",
                        path = %path.display(),
                        "config file not found, skipping"
                    );
                }
                Err(e) => return Err(e),
            }
        }
        Ok(read)
    }

    /// Parse `text` and layer it over the current content. `origin` names the
    /// source in error messages. On error the document is left unchanged.
    pub fn read_str(&mut self, text: &str, origin: &str) -> Result<(), IniformError> {
        let parsed = grammar::parse(&self.matcher, text, origin, self.strict)?;
        debug!(
            event = "document.read",
            origin = %origin,
            sections = parsed.len()
        );

        for parsed_section in parsed {
            let target = if parsed_section.name == DEFAULT_SECTION {
                &mut self.defaults
            } else {
                let idx = self.section_index_or_insert(&parsed_section.name);
                &mut self.sections[idx]
            };
            for (option, value) in parsed_section.options {
                target.set(option, value);
            }
        }

        for m in self.matcher.matches(text.lines()) {
            self.comments.apply(m);
        }
        Ok(())
    }

    fn section_index_or_insert(&mut self, name: &str) -> usize {
        match self.sections.iter().position(|s| s.name == name) {
            Some(idx) => idx,
            None => {
                self.sections.push(Section::new(name));
                self.sections.len() - 1
            }
        }
    }

    // -- Lookup ---------------------------------------------------------------

    /// Section names in order, without `DEFAULT`.
    pub fn sections(&self) -> impl Iterator<Item = &str> {
        self.sections.iter().map(|s| s.name.as_str())
    }

    pub fn section(&self, name: &str) -> Option<&Section> {
        if name == DEFAULT_SECTION {
            return Some(&self.defaults);
        }
        self.sections.iter().find(|s| s.name == name)
    }

    fn section_mut(&mut self, name: &str) -> Option<&mut Section> {
        if name == DEFAULT_SECTION {
            return Some(&mut self.defaults);
        }
        self.sections.iter_mut().find(|s| s.name == name)
    }

    /// `DEFAULT` is never reported as a section.
    pub fn has_section(&self, name: &str) -> bool {
        name != DEFAULT_SECTION && self.sections.iter().any(|s| s.name == name)
    }

    /// True if the option is set in the section or inherited from `DEFAULT`.
    pub fn has_option(&self, section: &str, option: &str) -> bool {
        self.lookup_raw(section, option).is_some()
    }

    /// Option names of a section, own options first, then inherited ones.
    pub fn options(&self, section: &str) -> Result<Vec<String>, IniformError> {
        Ok(self
            .raw_items(section)?
            .into_iter()
            .map(|(k, _)| k.to_string())
            .collect())
    }

    /// Raw value of an option, falling back to `DEFAULT`. `None` for an
    /// unknown section.
    pub fn lookup_raw(&self, section: &str, option: &str) -> Option<&str> {
        let option = normalize_option(option);
        let own = self.section(section)?;
        own.get(&option).or_else(|| self.defaults.get(&option))
    }

    pub fn get_raw(&self, section: &str, option: &str) -> Result<&str, IniformError> {
        if self.section(section).is_none() {
            return Err(IniformError::NoSection(section.to_string()));
        }
        self.lookup_raw(section, option)
            .ok_or_else(|| IniformError::NoOption {
                section: section.to_string(),
                option: normalize_option(option),
            })
    }

    /// The interpolated value of an option.
    pub fn get(&self, section: &str, option: &str) -> Result<String, IniformError> {
        let raw = self.get_raw(section, option)?;
        self.interpolate(section, option, raw)
    }

    /// Like [`get`](Self::get), returning `fallback` unchanged when the
    /// section or option does not exist. Interpolation errors still fail.
    pub fn get_or(&self, section: &str, option: &str, fallback: &str) -> Result<String, IniformError> {
        match self.lookup_raw(section, option) {
            Some(raw) => self.interpolate(section, option, raw),
            None => Ok(fallback.to_string()),
        }
    }

    /// `true`, `yes`, `on` and `1` (any case) are true; anything else is false.
    pub fn get_bool(&self, section: &str, option: &str) -> Result<bool, IniformError> {
        self.get(section, option).map(|v| truthy(&v))
    }

    /// Split the value on `delimiter`, trimming items and dropping empty ones.
    pub fn get_list(
        &self,
        section: &str,
        option: &str,
        delimiter: &str,
    ) -> Result<Vec<String>, IniformError> {
        self.get(section, option).map(|v| split_list(&v, delimiter))
    }

    /// Resolve the value as a path. Relative paths are joined onto `root_dir`
    /// when given, then made absolute against the working directory and
    /// normalized. With `create_dir` the directory is created.
    pub fn get_abs_path(
        &self,
        section: &str,
        option: &str,
        root_dir: Option<&Path>,
        create_dir: bool,
    ) -> Result<PathBuf, IniformError> {
        let value = PathBuf::from(self.get(section, option)?);
        let joined = match root_dir {
            Some(root) if value.is_relative() => root.join(value),
            _ => value,
        };
        let absolute = std::path::absolute(&joined).map_err(|e| IniformError::IoError {
            path: joined.clone(),
            source: e,
        })?;
        let path = normalize_path(&absolute);

        if create_dir && !path.exists() {
            std::fs::create_dir_all(&path).map_err(|e| IniformError::IoError {
                path: path.clone(),
                source: e,
            })?;
        }
        Ok(path)
    }

    /// Interpolated `(option, value)` pairs, own options first, then those
    /// inherited from `DEFAULT`.
    pub fn items(&self, section: &str) -> Result<Vec<(String, String)>, IniformError> {
        self.raw_items(section)?
            .into_iter()
            .map(|(k, raw)| Ok((k.to_string(), self.interpolate(section, k, raw)?)))
            .collect()
    }

    fn raw_items(&self, section: &str) -> Result<Vec<(&str, &str)>, IniformError> {
        let own = self
            .section(section)
            .ok_or_else(|| IniformError::NoSection(section.to_string()))?;
        let mut items: Vec<(&str, &str)> = own.options().collect();
        if section != DEFAULT_SECTION {
            for (k, v) in self.defaults.options() {
                if own.get(k).is_none() {
                    items.push((k, v));
                }
            }
        }
        Ok(items)
    }

    /// Run a raw value through the interpolation strategy.
    pub fn interpolate(&self, section: &str, option: &str, raw: &str) -> Result<String, IniformError> {
        self.interpolation
            .before_get(self, section, &normalize_option(option), raw)
    }

    // -- Mutation -------------------------------------------------------------

    /// Set a raw value. The section must exist. A non-empty `comment`
    /// replaces the option comment; `None` keeps the current one.
    pub fn set(
        &mut self,
        section: &str,
        option: &str,
        value: &str,
        comment: Option<&str>,
    ) -> Result<(), IniformError> {
        let option = normalize_option(option);
        let target = self
            .section_mut(section)
            .ok_or_else(|| IniformError::NoSection(section.to_string()))?;
        target.set(option.clone(), value.to_string());
        if let Some(comment) = comment
            && !comment.trim().is_empty()
        {
            self.comments.set_option(section, &option, comment);
        }
        Ok(())
    }

    /// Add a new section, optionally with a comment.
    pub fn add_section(&mut self, name: &str, comment: Option<&str>) -> Result<(), IniformError> {
        validate_section_name(name)?;
        if self.has_section(name) {
            return Err(IniformError::SectionExists(name.to_string()));
        }
        self.sections.push(Section::new(name));
        if let Some(comment) = comment {
            self.comments.set_section(name, comment);
        }
        Ok(())
    }

    /// Add the section unless it already exists. `DEFAULT` always exists.
    pub fn ensure_section(&mut self, name: &str) -> Result<(), IniformError> {
        if name == DEFAULT_SECTION || self.has_section(name) {
            return Ok(());
        }
        self.add_section(name, None)
    }

    /// Remove a section with its options and comments. Returns whether it
    /// existed.
    pub fn remove_section(&mut self, name: &str) -> bool {
        let before = self.sections.len();
        self.sections.retain(|s| s.name != name);
        let removed = self.sections.len() != before;
        if removed {
            self.comments.remove_section(name);
        }
        removed
    }

    /// Remove an option and its comment. Returns whether it existed.
    pub fn remove_option(&mut self, section: &str, option: &str) -> Result<bool, IniformError> {
        let option = normalize_option(option);
        let target = self
            .section_mut(section)
            .ok_or_else(|| IniformError::NoSection(section.to_string()))?;
        let removed = target.remove(&option);
        if removed {
            self.comments.remove_option(section, &option);
        }
        Ok(removed)
    }

    // -- Comments -------------------------------------------------------------

    /// Comment of a section (`option` is `None`) or of an option.
    pub fn get_comment(&self, section: &str, option: Option<&str>) -> Option<&str> {
        match option {
            Some(option) => self.comments.option(section, option),
            None => self.comments.section(section),
        }
    }

    /// Set the comment of a section or option. An empty comment removes it.
    pub fn set_comment(&mut self, section: &str, option: Option<&str>, comment: &str) {
        match option {
            Some(option) => self.comments.set_option(section, option, comment),
            None => self.comments.set_section(section, comment),
        }
    }

    pub fn top_comment(&self) -> Option<&str> {
        self.comments.top()
    }

    pub fn set_top_comment(&mut self, comment: Option<&str>) {
        self.comments.set_top(comment);
    }

    pub fn end_comment(&self) -> Option<&str> {
        self.comments.end()
    }

    pub fn set_end_comment(&mut self, comment: Option<&str>) {
        self.comments.set_end(comment);
    }

    // -- Writing --------------------------------------------------------------

    /// Write the rendered document to `path`, creating parent directories.
    pub fn write_to_path(&self, path: impl AsRef<Path>) -> Result<(), IniformError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(|e| IniformError::IoError {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }
        std::fs::write(path, self.to_string()).map_err(|e| IniformError::IoError {
            path: path.to_path_buf(),
            source: e,
        })?;
        debug!(event = "document.written", path = %path.display());
        Ok(())
    }

    fn write_section(&self, f: &mut fmt::Formatter<'_>, section: &Section) -> fmt::Result {
        let prefix = self.comment_prefix();
        let delimiter = self.delimiter();

        if let Some(comment) = self.comments.section(&section.name) {
            writeln!(f, "{}", add_prefix(comment, prefix))?;
        }
        writeln!(f, "[{}]", section.name)?;
        for (key, raw) in section.options() {
            let value = self
                .interpolation
                .before_write(self, &section.name, key, raw);
            if let Some(comment) = self.comments.option(&section.name, key) {
                writeln!(f, "{}", add_prefix(comment, prefix))?;
            }
            if value.is_empty() {
                writeln!(f, "{key}{}", delimiter.trim_end())?;
            } else {
                writeln!(f, "{key}{delimiter}{}", indent_continuations(&value))?;
            }
        }
        writeln!(f)
    }

    fn delimiter(&self) -> String {
        let d = self
            .matcher
            .delimiters()
            .first()
            .map(String::as_str)
            .unwrap_or("=");
        if self.space_around_delimiters {
            format!(" {d} ")
        } else {
            d.to_string()
        }
    }

    fn comment_prefix(&self) -> &str {
        self.matcher
            .comment_prefixes()
            .first()
            .map(String::as_str)
            .unwrap_or("#")
    }
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let prefix = self.comment_prefix();
        if let Some(top) = self.comments.top() {
            writeln!(f, "{}\n", add_prefix(top, prefix))?;
        }
        if !self.defaults.is_empty() {
            self.write_section(f, &self.defaults)?;
        }
        for section in &self.sections {
            self.write_section(f, section)?;
        }
        if let Some(end) = self.comments.end() {
            // A lone leading block reads back as the top comment, so an end
            // comment with nothing before it gets an empty block in front.
            let nothing_before = self.comments.top().is_none()
                && self.defaults.is_empty()
                && self.sections.is_empty();
            if nothing_before {
                writeln!(f, "{}
", prefix.trim())?;
            }
            writeln!(f, "{}", add_prefix(end, prefix))?;
        }
        Ok(())
    }
}

/// Continuation lines are written tab-indented; empty lines stay empty.
fn indent_continuations(value: &str) -> String {
    value
        .split('\n')
        .enumerate()
        .map(|(i, line)| {
            if i == 0 || line.is_empty() {
                line.to_string()
            } else {
                format!("\t{line}")
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn validate_section_name(name: &str) -> Result<(), IniformError> {
    let invalid = name.trim().is_empty()
        || name == DEFAULT_SECTION
        || name.contains(['[', ']', '\n', '\r']);
    if invalid {
        return Err(IniformError::InvalidSection(name.to_string()));
    }
    Ok(())
}

pub(crate) fn truthy(value: &str) -> bool {
    matches!(
        value.trim().to_lowercase().as_str(),
        "true" | "yes" | "1" | "on"
    )
}

/// Split on the trimmed delimiter (whitespace when the delimiter is only
/// whitespace), trim items, drop empty ones.
pub(crate) fn split_list(value: &str, delimiter: &str) -> Vec<String> {
    let sep = delimiter.trim();
    let items: Vec<&str> = if sep.is_empty() {
        value.split_whitespace().collect()
    } else {
        value.split(sep).collect()
    };
    items
        .into_iter()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

/// Lexically resolve `.` and `..` components.
fn normalize_path(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::test::{CONFIG1, CONFIG1_CHANGED, CONFIG1_WRITTEN};
    use crate::interpolate::NoInterpolation;
    use tempfile::TempDir;

    fn parse(text: &str) -> Document {
        let mut doc = Document::new().with_interpolation(NoInterpolation);
        doc.read_str(text, "<test>").unwrap();
        doc
    }

    /// Compare ignoring blank lines and per-line surrounding whitespace.
    fn assert_same_lines(actual: &str, expected: &str) {
        let clean = |s: &str| -> Vec<String> {
            s.lines()
                .map(|l| l.trim().to_string())
                .filter(|l| !l.is_empty())
                .collect()
        };
        assert_eq!(clean(actual), clean(expected), "\n--- actual ---\n{actual}");
    }

    #[test]
    fn read_collects_comments() {
        let doc = parse(CONFIG1);
        assert_eq!(doc.sections().collect::<Vec<_>>(), vec!["Section.A"]);
        assert_eq!(doc.top_comment(), Some("Top Comment 1\nTop Comment 2"));
        assert_eq!(doc.end_comment(), Some("End of file comment"));
        assert_eq!(doc.get_comment("Section.A", None), Some("Section Comment"));
        assert_eq!(
            doc.get_comment("Section.A", Some("Option1")),
            Some("Single line comment")
        );
        assert_eq!(
            doc.get_comment("Section.A", Some("option2")),
            Some("Multiline\ncomment")
        );
        assert_eq!(doc.get_comment("Section.A", Some("option3")), None);
    }

    #[test]
    fn read_values() {
        let doc = parse(CONFIG1);
        assert_eq!(doc.get("Section.A", "Option1").unwrap(), "Value1");
        assert_eq!(doc.get_raw("Section.A", "option3").unwrap(), "a,\nb,\nc");
        assert_eq!(
            doc.get_list("Section.A", "option3", ",").unwrap(),
            vec!["a", "b", "c"]
        );
    }

    #[test]
    fn write_matches_expected_text() {
        let doc = parse(CONFIG1);
        assert_same_lines(&doc.to_string(), CONFIG1_WRITTEN);
    }

    #[test]
    fn display_equals_file_contents() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.ini");
        let doc = parse(CONFIG1);
        doc.write_to_path(&path).unwrap();
        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(written, doc.to_string());
    }

    #[test]
    fn round_trip_preserves_values_and_comments() {
        let first = parse(CONFIG1);
        let second = parse(&first.to_string());
        assert_eq!(first.to_string(), second.to_string());
        assert_eq!(second.get_raw("Section.A", "option3").unwrap(), "a,\nb,\nc");
        assert_eq!(second.top_comment(), first.top_comment());
        assert_eq!(second.end_comment(), first.end_comment());
        assert_eq!(
            second.get_comment("Section.A", Some("option2")),
            Some("Multiline\ncomment")
        );
    }

    #[test]
    fn change_comments_and_add_section() {
        let mut doc = parse(CONFIG1);
        doc.add_section("Section.New", Some("New Section")).unwrap();
        doc.set(
            "Section.New",
            "new_option",
            "new_value",
            Some("New value with new comment"),
        )
        .unwrap();
        doc.set_comment("Section.A", None, "New Section Comment");
        doc.set_comment("Section.A", Some("option2"), "New option2 comment");
        assert_same_lines(&doc.to_string(), CONFIG1_CHANGED);
    }

    #[test]
    fn set_requires_section() {
        let mut doc = Document::new();
        let err = doc.set("Nope", "a", "1", None).unwrap_err();
        assert!(matches!(err, IniformError::NoSection(s) if s == "Nope"));
    }

    #[test]
    fn set_without_comment_keeps_existing() {
        let mut doc = parse(CONFIG1);
        doc.set("Section.A", "Option1", "changed", None).unwrap();
        assert_eq!(doc.get_raw("Section.A", "option1").unwrap(), "changed");
        assert_eq!(
            doc.get_comment("Section.A", Some("option1")),
            Some("Single line comment")
        );
    }

    #[test]
    fn add_section_rejects_duplicates_and_bad_names() {
        let mut doc = Document::new();
        doc.add_section("S", None).unwrap();
        assert!(matches!(
            doc.add_section("S", None),
            Err(IniformError::SectionExists(_))
        ));
        assert!(matches!(
            doc.add_section("DEFAULT", None),
            Err(IniformError::InvalidSection(_))
        ));
        assert!(matches!(
            doc.add_section("a]b", None),
            Err(IniformError::InvalidSection(_))
        ));
        doc.ensure_section("S").unwrap();
        doc.ensure_section("DEFAULT").unwrap();
        assert_eq!(doc.sections().count(), 1);
    }

    #[test]
    fn remove_option_and_section_drop_comments() {
        let mut doc = parse(CONFIG1);
        assert!(doc.remove_option("Section.A", "OPTION1").unwrap());
        assert!(!doc.remove_option("Section.A", "option1").unwrap());
        assert!(!doc.has_option("Section.A", "option1"));
        assert_eq!(doc.get_comment("Section.A", Some("option1")), None);

        assert!(doc.remove_section("Section.A"));
        assert!(!doc.has_section("Section.A"));
        assert_eq!(doc.get_comment("Section.A", None), None);
        assert!(!doc.remove_section("Section.A"));
    }

    #[test]
    fn missing_lookups() {
        let doc = parse("[S]\na = 1\n");
        assert!(matches!(doc.get("T", "a"), Err(IniformError::NoSection(_))));
        assert!(matches!(doc.get("S", "b"), Err(IniformError::NoOption { .. })));
        assert_eq!(doc.get_or("S", "b", "fallback").unwrap(), "fallback");
        assert_eq!(doc.get_or("T", "a", "fallback").unwrap(), "fallback");
        assert_eq!(doc.get_or("S", "a", "fallback").unwrap(), "1");
    }

    #[test]
    fn default_section_is_inherited() {
        let doc = parse("[DEFAULT]\nshared = yes\n\n[S]\nown = 1\n");
        assert!(!doc.has_section("DEFAULT"));
        assert_eq!(doc.sections().collect::<Vec<_>>(), vec!["S"]);
        assert!(doc.get_bool("S", "shared").unwrap());
        assert_eq!(
            doc.items("S").unwrap(),
            vec![
                ("own".to_string(), "1".to_string()),
                ("shared".to_string(), "yes".to_string()),
            ]
        );
        assert!(doc.to_string().starts_with("[DEFAULT]\nshared = yes\n"));
    }

    #[test]
    fn later_sources_override() {
        let mut doc = Document::new().with_interpolation(NoInterpolation);
        doc.read_str("# base top\n\n[S]\n# base\na = 1\nb = 2\n", "base").unwrap();
        doc.read_str("[S]\n# user\na = 10\n[T]\nc = 3\n", "user").unwrap();
        assert_eq!(doc.get("S", "a").unwrap(), "10");
        assert_eq!(doc.get("S", "b").unwrap(), "2");
        assert_eq!(doc.get("T", "c").unwrap(), "3");
        assert_eq!(doc.get_comment("S", Some("a")), Some("user"));
        assert_eq!(doc.top_comment(), Some("base top"));
    }

    #[test]
    fn failed_read_leaves_document_untouched() {
        let mut doc = parse("[S]\na = 1\n");
        let err = doc.read_str("[S]\na = 2\nbroken\n", "bad").unwrap_err();
        assert!(matches!(err, IniformError::ParseError { line: 3, .. }));
        assert_eq!(doc.get("S", "a").unwrap(), "1");
    }

    #[test]
    fn read_skips_missing_files() {
        let dir = TempDir::new().unwrap();
        let base = dir.path().join("base.ini");
        std::fs::write(&base, "[S]\na = 1\n").unwrap();
        let missing = dir.path().join("missing.ini");

        let mut doc = Document::new();
        let read = doc.read([&base, &missing]).unwrap();
        assert_eq!(read, vec![base.clone()]);
        assert_eq!(doc.get("S", "a").unwrap(), "1");

        let err = doc.read_file(&missing).unwrap_err();
        assert!(matches!(err, IniformError::MissingFile { .. }));
    }

    #[test]
    fn write_without_spaces() {
        let mut doc = Document::new().space_around_delimiters(false);
        doc.add_section("S", None).unwrap();
        doc.set("S", "a", "1", None).unwrap();
        doc.set("S", "empty", "", None).unwrap();
        assert_eq!(doc.to_string(), "[S]\na=1\nempty=\n\n");
    }

    #[test]
    fn custom_delimiters_and_prefixes() {
        let mut doc = Document::new()
            .with_delimiters(&[":"])
            .unwrap()
            .with_comment_prefixes(&[";"])
            .unwrap();
        doc.read_str("; about\n[S]\n; opt\nkey: value\n", "<test>").unwrap();
        assert_eq!(doc.to_string(), "; about\n[S]\n; opt\nkey : value\n\n");
    }

    #[test]
    fn end_comment_alone_round_trips() {
        let mut doc = parse("[S]\na = 1\n\n# end\n");
        assert!(doc.remove_section("S"));
        let text = doc.to_string();
        assert_eq!(text, "#\n\n# end\n");

        let again = parse(&text);
        assert_eq!(again.top_comment(), None);
        assert_eq!(again.end_comment(), Some("end"));

        let mut empty = Document::new().with_interpolation(NoInterpolation);
        empty.set_end_comment(Some("bye"));
        let again = parse(&empty.to_string());
        assert_eq!(again.end_comment(), Some("bye"));
        assert_eq!(again.to_string(), empty.to_string());
    }

    #[test]
    fn indented_comment_attaches_to_next_option() {
        let doc = parse("[S]\na = 1\n\n  # about b (indented)\nb = 2\n");
        assert_eq!(doc.get_raw("S", "a").unwrap(), "1");
        assert_eq!(doc.get_comment("S", Some("b")), Some("about b (indented)"));
    }

    #[test]
    fn empty_marker_lists_are_rejected() {
        let none: [&str; 0] = [];
        assert!(matches!(
            Document::new().with_comment_prefixes(&none),
            Err(IniformError::InvalidMarkers(_))
        ));
        assert!(matches!(
            Document::new().with_delimiters(&none),
            Err(IniformError::InvalidMarkers(_))
        ));
    }

    #[test]
    fn blank_lines_inside_values_round_trip() {
        let doc = parse("[S]\ntext = one\n\n  two\n");
        let again = parse(&doc.to_string());
        assert_eq!(again.get_raw("S", "text").unwrap(), "one\n\ntwo");
    }

    #[test]
    fn abs_path_joins_root_and_normalizes() {
        let dir = TempDir::new().unwrap();
        let doc = parse("[Dirs]\ndata = sub/../data\nabs = /opt/tool\n");

        let data = doc
            .get_abs_path("Dirs", "data", Some(dir.path()), true)
            .unwrap();
        assert_eq!(data, normalize_path(&dir.path().join("data")));
        assert!(data.is_dir());

        let abs = doc.get_abs_path("Dirs", "abs", Some(dir.path()), false).unwrap();
        assert_eq!(abs, PathBuf::from("/opt/tool"));
    }

    #[test]
    fn split_list_tolerates_whitespace() {
        assert_eq!(split_list("a, b,\n c", ", "), vec!["a", "b", "c"]);
        assert_eq!(split_list("", ", "), Vec::<String>::new());
        assert_eq!(split_list("a b\nc", "\n"), vec!["a", "b", "c"]);
    }

    #[test]
    fn truthy_values() {
        for v in ["true", "Yes", "1", "ON", " yes "] {
            assert!(truthy(v), "{v}");
        }
        for v in ["false", "no", "0", "", "maybe"] {
            assert!(!truthy(v), "{v}");
        }
    }
}
