use std::collections::HashMap;

use crate::matcher::CommentMatch;

/// Comments of a document, keyed by the construct they precede.
///
/// Option names are normalized to lowercase, matching how the document stores
/// option keys. Empty comments are never stored; setting one removes the entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommentStore {
    top: Option<String>,
    end: Option<String>,
    sections: HashMap<String, String>,
    options: HashMap<String, HashMap<String, String>>,
}

impl CommentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn top(&self) -> Option<&str> {
        self.top.as_deref()
    }

    pub fn end(&self) -> Option<&str> {
        self.end.as_deref()
    }

    pub fn set_top(&mut self, comment: Option<&str>) {
        self.top = non_empty(comment);
    }

    pub fn set_end(&mut self, comment: Option<&str>) {
        self.end = non_empty(comment);
    }

    pub fn section(&self, section: &str) -> Option<&str> {
        self.sections.get(section).map(String::as_str)
    }

    pub fn option(&self, section: &str, option: &str) -> Option<&str> {
        self.options
            .get(section)?
            .get(&option.to_lowercase())
            .map(String::as_str)
    }

    pub fn set_section(&mut self, section: &str, comment: &str) {
        match non_empty(Some(comment)) {
            Some(c) => {
                self.sections.insert(section.to_string(), c);
            }
            None => {
                self.sections.remove(section);
            }
        }
    }

    pub fn set_option(&mut self, section: &str, option: &str, comment: &str) {
        let option = option.to_lowercase();
        match non_empty(Some(comment)) {
            Some(c) => {
                self.options
                    .entry(section.to_string())
                    .or_default()
                    .insert(option, c);
            }
            None => {
                if let Some(opts) = self.options.get_mut(section) {
                    opts.remove(&option);
                }
            }
        }
    }

    /// Drop the section comment and every option comment of `section`.
    pub fn remove_section(&mut self, section: &str) {
        self.sections.remove(section);
        self.options.remove(section);
    }

    pub fn remove_option(&mut self, section: &str, option: &str) {
        self.set_option(section, option, "");
    }

    /// Record a comment found by the line matcher.
    ///
    /// File-level comments replace the top or end comment depending on where
    /// they were found. A match naming an option but no section is ignored.
    pub fn apply(&mut self, m: CommentMatch) {
        match (m.section, m.option) {
            (None, None) if m.at_end => self.set_end(Some(&m.comment)),
            (None, None) => self.set_top(Some(&m.comment)),
            (Some(section), None) => self.set_section(&section, &m.comment),
            (Some(section), Some(option)) => self.set_option(&section, &option, &m.comment),
            (None, Some(_)) => {}
        }
    }
}

fn non_empty(comment: Option<&str>) -> Option<String> {
    comment
        .filter(|c| !c.trim().is_empty())
        .map(|c| c.to_string())
}
