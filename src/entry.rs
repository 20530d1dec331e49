//! Declared configuration entries.
//!
//! An [`Entry`] binds a `(section, option)` pair to a default, a prompt
//! message and a kind that decides how the raw string is decoded and how the
//! user is asked for it. Entries are registered explicitly on the
//! configuration builder, either one by one or grouped in an [`EntryGroup`]
//! tree.
//!
//! ```ignore
//! let dirs = SectionDecl::new("Dirs");
//! let root = dirs.option("root", "~/data", "Root data directory");
//! let verbose = Entry::confirm("Log", "verbose", false, "Verbose logging?");
//! ```

use std::fmt;
use std::sync::Arc;

use crate::document::{Document, split_list, truthy};
use crate::prompt::{PromptKind, PromptRequest, PromptResponse};

pub const DEFAULT_LIST_DELIMITER: &str = ", ";

const MULTISELECT_HINT: &str = "Select values with <space> and confirm with <enter>.";

/// How an entry's raw value is interpreted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryKind {
    Text,
    Confirm,
    Select {
        choices: Vec<String>,
        multiselect: bool,
        delimiter: String,
    },
}

/// A decoded entry value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryValue {
    Text(String),
    Bool(bool),
    List(Vec<String>),
}

impl fmt::Display for EntryValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntryValue::Text(s) => write!(f, "{s}"),
            EntryValue::Bool(b) => write!(f, "{}", bool_str(*b)),
            EntryValue::List(items) => write!(f, "{}", items.join(DEFAULT_LIST_DELIMITER)),
        }
    }
}

/// Whether an entry is asked for during inquiry.
#[derive(Clone)]
pub enum InquireCondition {
    Always,
    Never,
    When(Arc<dyn Fn(&Document) -> bool + Send + Sync>),
}

impl fmt::Debug for InquireCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InquireCondition::Always => write!(f, "Always"),
            InquireCondition::Never => write!(f, "Never"),
            InquireCondition::When(_) => write!(f, "When(<fn>)"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Entry {
    section: String,
    option: String,
    default: String,
    message: String,
    kind: EntryKind,
    instruction: Option<String>,
    long_instruction: Option<String>,
    inquire: InquireCondition,
    required: bool,
    raw: bool,
}

impl Entry {
    fn new(section: &str, option: &str, default: String, message: &str, kind: EntryKind) -> Self {
        Self {
            section: escape_whitespace(section),
            option: escape_whitespace(option),
            default,
            message: message.to_string(),
            kind,
            instruction: None,
            long_instruction: None,
            inquire: InquireCondition::Always,
            required: false,
            raw: false,
        }
    }

    /// A free-text entry.
    pub fn text(section: &str, option: &str, default: impl Into<String>, message: &str) -> Self {
        Self::new(section, option, default.into(), message, EntryKind::Text)
    }

    /// A yes/no entry. Stored as `Yes` or `No`.
    pub fn confirm(section: &str, option: &str, default: bool, message: &str) -> Self {
        Self::new(
            section,
            option,
            bool_str(default).to_string(),
            message,
            EntryKind::Confirm,
        )
    }

    /// Pick exactly one of `choices`.
    pub fn select<I, S>(
        section: &str,
        option: &str,
        choices: I,
        default: impl Into<String>,
        message: &str,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let kind = EntryKind::Select {
            choices: choices.into_iter().map(Into::into).collect(),
            multiselect: false,
            delimiter: DEFAULT_LIST_DELIMITER.to_string(),
        };
        Self::new(section, option, default.into(), message, kind)
    }

    /// Pick any subset of `choices`. Stored joined with the list delimiter
    /// (`", "` unless changed with [`delimiter`](Self::delimiter)).
    pub fn multi_select<I, S, D, T>(
        section: &str,
        option: &str,
        choices: I,
        default: D,
        message: &str,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
        D: IntoIterator<Item = T>,
        T: Into<String>,
    {
        let default: Vec<String> = default.into_iter().map(Into::into).collect();
        let kind = EntryKind::Select {
            choices: choices.into_iter().map(Into::into).collect(),
            multiselect: true,
            delimiter: DEFAULT_LIST_DELIMITER.to_string(),
        };
        Self::new(
            section,
            option,
            default.join(DEFAULT_LIST_DELIMITER),
            message,
            kind,
        )
    }

    // -- Modifiers --------------------------------------------------------------

    /// Short hint shown next to the prompt and written into the comment.
    pub fn instruction(mut self, text: &str) -> Self {
        self.instruction = Some(text.to_string());
        self
    }

    /// Longer help shown above the prompt and written into the comment.
    pub fn long_instruction(mut self, text: &str) -> Self {
        self.long_instruction = Some(text.to_string());
        self
    }

    /// Loading fails when a required entry has neither a value nor a
    /// non-empty default.
    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    /// Raw entries are never interpolated.
    pub fn raw(mut self, raw: bool) -> Self {
        self.raw = raw;
        self
    }

    pub fn inquire(mut self, inquire: bool) -> Self {
        self.inquire = if inquire {
            InquireCondition::Always
        } else {
            InquireCondition::Never
        };
        self
    }

    /// Only ask when `condition` holds for the document at inquiry time.
    pub fn inquire_when<F>(mut self, condition: F) -> Self
    where
        F: Fn(&Document) -> bool + Send + Sync + 'static,
    {
        self.inquire = InquireCondition::When(Arc::new(condition));
        self
    }

    /// List delimiter for multi-select entries. A delimiter containing a
    /// newline, e.g. `",\n    "`, stores one item per continuation line.
    /// The default is re-encoded with the new delimiter.
    pub fn delimiter(mut self, delimiter: &str) -> Self {
        if let EntryKind::Select {
            delimiter: current,
            multiselect: true,
            ..
        } = &mut self.kind
        {
            let items = split_list(&self.default, current);
            *current = delimiter.to_string();
            self.default = items.join(delimiter);
        }
        self
    }

    // -- Accessors --------------------------------------------------------------

    pub fn section(&self) -> &str {
        &self.section
    }

    pub fn option(&self) -> &str {
        &self.option
    }

    /// `section:option`, the key used by config operations.
    pub fn key(&self) -> String {
        format!("{}:{}", self.section, self.option)
    }

    /// The default, already encoded as a raw string.
    pub fn default_raw(&self) -> &str {
        &self.default
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn kind(&self) -> &EntryKind {
        &self.kind
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    pub fn is_raw(&self) -> bool {
        self.raw
    }

    pub fn should_inquire(&self, doc: &Document) -> bool {
        match &self.inquire {
            InquireCondition::Always => true,
            InquireCondition::Never => false,
            InquireCondition::When(condition) => condition(doc),
        }
    }

    /// The comment written above the option.
    pub fn comment(&self) -> String {
        let mut comment = self.message.clone();
        if let Some(instruction) = &self.instruction {
            comment.push_str(&format!("\nInstruction: {instruction}"));
        }
        if let Some(long) = &self.long_instruction {
            comment.push_str(&format!("\nLong Instruction: {long}"));
        }
        comment
    }

    /// The message trimmed of whitespace and trailing `:`/`.`, ending in `:`.
    pub fn prompt_message(&self) -> String {
        let msg = self.message.trim().trim_matches([':', '.']);
        format!("{msg}:")
    }

    // -- Encoding ---------------------------------------------------------------

    pub fn decode(&self, raw: &str) -> EntryValue {
        match &self.kind {
            EntryKind::Text => EntryValue::Text(raw.to_string()),
            EntryKind::Confirm => EntryValue::Bool(truthy(raw)),
            EntryKind::Select {
                multiselect: false,
                ..
            } => EntryValue::Text(raw.trim().to_string()),
            EntryKind::Select { delimiter, .. } => EntryValue::List(split_list(raw, delimiter)),
        }
    }

    pub fn encode(&self, value: &EntryValue) -> String {
        match value {
            EntryValue::Text(s) => s.clone(),
            EntryValue::Bool(b) => bool_str(*b).to_string(),
            EntryValue::List(items) => items.join(self.list_delimiter()),
        }
    }

    pub fn default_value(&self) -> EntryValue {
        self.decode(&self.default)
    }

    fn list_delimiter(&self) -> &str {
        match &self.kind {
            EntryKind::Select { delimiter, .. } => delimiter,
            _ => DEFAULT_LIST_DELIMITER,
        }
    }

    // -- Prompting --------------------------------------------------------------

    /// Build the prompt for this entry, pre-filled from `current_raw`.
    pub fn prompt_request(&self, current_raw: &str) -> PromptRequest {
        let kind = match &self.kind {
            EntryKind::Text => PromptKind::Text {
                default: current_raw.to_string(),
            },
            EntryKind::Confirm => PromptKind::Confirm {
                default: truthy(current_raw),
            },
            EntryKind::Select {
                choices,
                multiselect,
                ..
            } => {
                let selected = match self.decode(current_raw) {
                    EntryValue::List(items) => items,
                    EntryValue::Text(s) if !s.is_empty() => vec![s],
                    _ => Vec::new(),
                };
                PromptKind::Select {
                    choices: choices.clone(),
                    selected,
                    multiselect: *multiselect,
                }
            }
        };

        let long_instruction = match (&self.long_instruction, &self.kind) {
            (Some(long), _) => Some(long.clone()),
            (
                None,
                EntryKind::Select {
                    multiselect: true, ..
                },
            ) => Some(MULTISELECT_HINT.to_string()),
            (None, _) => None,
        };

        PromptRequest {
            message: self.prompt_message(),
            kind,
            instruction: self.instruction.clone(),
            long_instruction,
        }
    }

    /// Turn a prompt answer into a value of this entry's kind.
    pub fn response_value(&self, response: PromptResponse) -> EntryValue {
        match (response, &self.kind) {
            (
                PromptResponse::Selected(mut picked),
                EntryKind::Select {
                    multiselect: false,
                    ..
                },
            ) => EntryValue::Text(if picked.is_empty() {
                String::new()
            } else {
                picked.swap_remove(0)
            }),
            (PromptResponse::Selected(picked), _) => EntryValue::List(picked),
            (PromptResponse::Confirm(b), _) => EntryValue::Bool(b),
            (PromptResponse::Text(s), EntryKind::Confirm) => EntryValue::Bool(truthy(&s)),
            (PromptResponse::Text(s), _) => EntryValue::Text(s),
        }
    }
}

impl fmt::Display for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{} = {}", self.section, self.option, self.default)
    }
}

/// Creates entries that share a section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionDecl {
    name: String,
}

impl SectionDecl {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn option(&self, option: &str, default: impl Into<String>, message: &str) -> Entry {
        Entry::text(&self.name, option, default, message)
    }

    pub fn confirm(&self, option: &str, default: bool, message: &str) -> Entry {
        Entry::confirm(&self.name, option, default, message)
    }

    pub fn select<I, S>(
        &self,
        option: &str,
        choices: I,
        default: impl Into<String>,
        message: &str,
    ) -> Entry
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Entry::select(&self.name, option, choices, default, message)
    }

    pub fn multi_select<I, S, D, T>(&self, option: &str, choices: I, default: D, message: &str) -> Entry
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
        D: IntoIterator<Item = T>,
        T: Into<String>,
    {
        Entry::multi_select(&self.name, option, choices, default, message)
    }
}

/// A node of the entry tree.
#[derive(Debug, Clone)]
pub enum EntryNode {
    Entry(Entry),
    Group(EntryGroup),
}

impl From<Entry> for EntryNode {
    fn from(entry: Entry) -> Self {
        EntryNode::Entry(entry)
    }
}

impl From<EntryGroup> for EntryNode {
    fn from(group: EntryGroup) -> Self {
        EntryNode::Group(group)
    }
}

/// A named group of entries and nested groups.
#[derive(Debug, Clone, Default)]
pub struct EntryGroup {
    name: String,
    nodes: Vec<EntryNode>,
}

impl EntryGroup {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            nodes: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn entry(mut self, entry: Entry) -> Self {
        self.nodes.push(EntryNode::Entry(entry));
        self
    }

    pub fn group(mut self, group: EntryGroup) -> Self {
        self.nodes.push(EntryNode::Group(group));
        self
    }

    pub fn push(&mut self, node: impl Into<EntryNode>) {
        self.nodes.push(node.into());
    }

    pub fn nodes(&self) -> &[EntryNode] {
        &self.nodes
    }

    /// Entries depth-first in declaration order.
    pub fn flatten(&self) -> Vec<&Entry> {
        let mut out = Vec::new();
        collect(&self.nodes, &mut out);
        out
    }

    pub fn into_entries(self) -> Vec<Entry> {
        let mut out = Vec::new();
        collect_owned(self.nodes, &mut out);
        out
    }
}

fn collect<'a>(nodes: &'a [EntryNode], out: &mut Vec<&'a Entry>) {
    for node in nodes {
        match node {
            EntryNode::Entry(e) => out.push(e),
            EntryNode::Group(g) => collect(&g.nodes, out),
        }
    }
}

fn collect_owned(nodes: Vec<EntryNode>, out: &mut Vec<Entry>) {
    for node in nodes {
        match node {
            EntryNode::Entry(e) => out.push(e),
            EntryNode::Group(g) => collect_owned(g.nodes, out),
        }
    }
}

/// Whitespace becomes `_`; leading and trailing `_` are dropped.
pub fn escape_whitespace(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_whitespace() { '_' } else { c })
        .collect::<String>()
        .trim_matches('_')
        .to_string()
}

fn bool_str(value: bool) -> &'static str {
    if value { "Yes" } else { "No" }
}
