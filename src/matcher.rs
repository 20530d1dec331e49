//! Line classification and comment extraction.
//!
//! The structural grammar drops comments on the floor. This module runs a
//! second pass over the same text and works out which section or option each
//! comment block belongs to, so the writer can put it back in the right place.
//!
//! # Attachment rules
//!
//! A comment block attaches to the construct that immediately follows it:
//!
//! ```text
//! # Top comment           <- file top (followed by a blank line)
//!
//! # About the section     <- section "Server"
//! [Server]
//! # About the port        <- option ("Server", "port")
//! port = 8080
//!
//! # End of file           <- file end
//! ```
//!
//! A block followed by a blank line before anything else was seen becomes the
//! top comment. Once content has started, a blank line discards the pending
//! block. Whatever is still pending at the end of input is the end comment.
//!
//! Lines indented deeper than an open option line are continuation lines of
//! that option's value. Full-line comments are checked first, so an indented
//! comment is still a comment.

use std::sync::LazyLock;

use regex::Regex;

use crate::document::{DEFAULT_COMMENT_PREFIXES, DEFAULT_DELIMITERS};
use crate::error::IniformError;

static DEFAULT_MATCHER: LazyLock<LineMatcher> = LazyLock::new(|| {
    LineMatcher::new(&DEFAULT_DELIMITERS, &DEFAULT_COMMENT_PREFIXES)
        .expect("default line markers are valid")
});

/// What a single raw line looks like, before any state is taken into account.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind<'a> {
    Blank,
    Comment,
    Section(&'a str),
    Option { name: &'a str, value: &'a str },
    Other,
}

/// Classifies raw lines using the configured delimiters and comment prefixes.
#[derive(Debug, Clone)]
pub struct LineMatcher {
    delimiters: Vec<String>,
    comment_prefixes: Vec<String>,
    comment_re: Regex,
    section_re: Regex,
    option_re: Regex,
}

impl LineMatcher {
    /// Build a matcher. Both lists must be non-empty and hold no empty
    /// strings, otherwise every line would look like a comment or an option.
    pub fn new<D, P>(delimiters: &[D], comment_prefixes: &[P]) -> Result<Self, IniformError>
    where
        D: AsRef<str>,
        P: AsRef<str>,
    {
        let delimiters: Vec<String> = delimiters.iter().map(|d| d.as_ref().to_string()).collect();
        let comment_prefixes: Vec<String> = comment_prefixes
            .iter()
            .map(|p| p.as_ref().to_string())
            .collect();

        check_markers("delimiters", &delimiters)?;
        check_markers("comment prefixes", &comment_prefixes)?;

        let r_delimiters = alternation(&delimiters);
        let r_prefixes = alternation(&comment_prefixes);

        let comment_re = compile(&format!(r"^\s*(?:{r_prefixes})(.*)$"))?;
        let section_re = compile(r"^\s*\[([^\]]+)\]\s*$")?;
        let option_re = compile(&format!(r"^\s*(\S.*?)\s*(?:{r_delimiters})"))?;

        Ok(Self {
            delimiters,
            comment_prefixes,
            comment_re,
            section_re,
            option_re,
        })
    }

    /// A matcher for `=`/`:` delimiters and `#`/`;` comments.
    pub fn standard() -> Self {
        DEFAULT_MATCHER.clone()
    }

    pub fn delimiters(&self) -> &[String] {
        &self.delimiters
    }

    pub fn comment_prefixes(&self) -> &[String] {
        &self.comment_prefixes
    }

    pub fn is_comment(&self, line: &str) -> bool {
        self.comment_re.is_match(line)
    }

    /// Return the section name if the line is a section header.
    pub fn section<'a>(&self, line: &'a str) -> Option<&'a str> {
        let caps = self.section_re.captures(line)?;
        let name = caps.get(1)?.as_str().trim();
        (!name.is_empty()).then_some(name)
    }

    /// Return the option name if the line is an option assignment.
    pub fn option<'a>(&self, line: &'a str) -> Option<&'a str> {
        self.option_with_value(line).map(|(name, _)| name)
    }

    fn option_with_value<'a>(&self, line: &'a str) -> Option<(&'a str, &'a str)> {
        let caps = self.option_re.captures(line)?;
        let whole = caps.get(0)?;
        let name = caps.get(1)?.as_str().trim();
        Some((name, line[whole.end()..].trim()))
    }

    /// Classify a line. Comments are checked first because they may contain
    /// delimiters or brackets.
    pub fn classify<'a>(&self, line: &'a str) -> LineKind<'a> {
        if line.trim().is_empty() {
            return LineKind::Blank;
        }
        if self.is_comment(line) {
            return LineKind::Comment;
        }
        if let Some(name) = self.section(line) {
            return LineKind::Section(name);
        }
        if let Some((name, value)) = self.option_with_value(line) {
            return LineKind::Option { name, value };
        }
        LineKind::Other
    }

    /// Lazily yield the comment blocks found in `lines`, in order.
    pub fn matches<I, S>(&self, lines: I) -> CommentMatches<'_, I::IntoIter>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        CommentMatches {
            matcher: self,
            lines: lines.into_iter(),
            started: false,
            section: None,
            value_indent: None,
            buffer: Vec::new(),
            finished: false,
        }
    }

    /// Strip one comment prefix and one following space from every line.
    pub fn clean_prefix(&self, text: &str) -> String {
        clean_prefix(text, &self.comment_prefixes)
    }
}

/// A comment block together with the construct it precedes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentMatch {
    /// Comment lines as they appeared, prefixes included.
    pub raw: String,
    /// Comment text with prefixes removed.
    pub comment: String,
    /// Section the comment precedes, or `None` for file-level comments.
    pub section: Option<String>,
    /// Option the comment precedes, or `None` for section/file-level comments.
    pub option: Option<String>,
    /// `true` when this is the trailing comment of the file.
    pub at_end: bool,
}

impl CommentMatch {
    /// File-level comments carry neither a section nor an option.
    pub fn is_file_level(&self) -> bool {
        self.section.is_none() && self.option.is_none()
    }
}

/// Iterator returned by [`LineMatcher::matches`].
pub struct CommentMatches<'m, I> {
    matcher: &'m LineMatcher,
    lines: I,
    started: bool,
    section: Option<String>,
    value_indent: Option<usize>,
    buffer: Vec<String>,
    finished: bool,
}

impl<I, S> Iterator for CommentMatches<'_, I>
where
    I: Iterator<Item = S>,
    S: AsRef<str>,
{
    type Item = CommentMatch;

    fn next(&mut self) -> Option<CommentMatch> {
        while let Some(line) = self.lines.next() {
            if let Some(m) = self.step(line.as_ref()) {
                return Some(m);
            }
        }

        if self.finished || self.buffer.is_empty() {
            self.finished = true;
            return None;
        }
        self.finished = true;
        let at_end = self.started;
        Some(self.flush(None, None, at_end))
    }
}

impl<I> CommentMatches<'_, I> {
    fn step(&mut self, line: &str) -> Option<CommentMatch> {
        let kind = self.matcher.classify(line);

        if kind == LineKind::Blank {
            if !self.buffer.is_empty() && !self.started {
                self.started = true;
                return Some(self.flush(None, None, false));
            }
            self.buffer.clear();
            return None;
        }

        // Full-line comments never belong to a value, however indented.
        if kind == LineKind::Comment {
            self.buffer.push(line.trim().to_string());
            return None;
        }

        if let Some(indent) = self.value_indent
            && indent_of(line) > indent
        {
            return None;
        }
        self.value_indent = None;

        match kind {
            LineKind::Section(name) => {
                self.started = true;
                self.section = Some(name.to_string());
                if self.buffer.is_empty() {
                    return None;
                }
                Some(self.flush(Some(name.to_string()), None, false))
            }
            LineKind::Option { name, .. } => {
                self.started = true;
                self.value_indent = Some(indent_of(line));
                if self.buffer.is_empty() {
                    return None;
                }
                let section = self.section.clone();
                Some(self.flush(section, Some(name.to_string()), false))
            }
            LineKind::Blank | LineKind::Comment | LineKind::Other => None,
        }
    }

    fn flush(
        &mut self,
        section: Option<String>,
        option: Option<String>,
        at_end: bool,
    ) -> CommentMatch {
        let raw = std::mem::take(&mut self.buffer).join("\n");
        let comment = clean_prefix(&raw, &self.matcher.comment_prefixes);
        CommentMatch {
            raw,
            comment,
            section,
            option,
            at_end,
        }
    }
}

/// Number of leading whitespace bytes.
pub(crate) fn indent_of(line: &str) -> usize {
    line.len() - line.trim_start().len()
}

/// Strip one comment prefix and one following space from every line.
pub fn clean_prefix<P: AsRef<str>>(text: &str, comment_prefixes: &[P]) -> String {
    text.split('\n')
        .map(|line| {
            let line = line.trim_start();
            let stripped = comment_prefixes
                .iter()
                .find_map(|p| line.strip_prefix(p.as_ref()))
                .unwrap_or(line);
            let stripped = stripped.strip_prefix(' ').unwrap_or(stripped);
            stripped.trim_end().to_string()
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Prefix every line of `text` with `prefix` and a space. Empty lines get the
/// bare prefix so they stay comment lines.
pub fn add_prefix(text: &str, prefix: &str) -> String {
    let prefix = prefix.trim();
    text.split('\n')
        .map(|line| {
            if line.is_empty() {
                prefix.to_string()
            } else {
                format!("{prefix} {line}")
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn check_markers(what: &str, items: &[String]) -> Result<(), IniformError> {
    if items.is_empty() {
        return Err(IniformError::InvalidMarkers(format!("no {what} given")));
    }
    if items.iter().any(|s| s.trim().is_empty()) {
        return Err(IniformError::InvalidMarkers(format!("empty entry in {what}")));
    }
    Ok(())
}

fn compile(pattern: &str) -> Result<Regex, IniformError> {
    Regex::new(pattern).map_err(|e| IniformError::InvalidMarkers(e.to_string()))
}

fn alternation(items: &[String]) -> String {
    items
        .iter()
        .map(|s| regex::escape(s))
        .collect::<Vec<_>>()
        .join("|")
}
