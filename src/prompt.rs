//! The prompt collaborator used by the inquire flow.
//!
//! The core never talks to a terminal directly. It builds a [`PromptRequest`]
//! per entry and hands it to a [`Prompter`]. Three implementations ship with
//! the crate:
//!
//! - [`ScriptedPrompter`]: answers from a queue, falling back to the request's
//!   default. Used in tests and non-interactive runs.
//! - [`LinePrompter`]: plain line-based prompts over any `BufRead`/`Write` pair.
//! - `TerminalPrompter` (feature `terminal`): interactive widgets via
//!   [dialoguer](https://docs.rs/dialoguer).

use std::collections::VecDeque;
use std::io::{BufRead, Write};

use crate::document::truthy;
use crate::error::IniformError;

/// A single question for the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptRequest {
    pub message: String,
    pub kind: PromptKind,
    pub instruction: Option<String>,
    pub long_instruction: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptKind {
    Text {
        default: String,
    },
    Confirm {
        default: bool,
    },
    /// `selected` holds the pre-selected choices.
    Select {
        choices: Vec<String>,
        selected: Vec<String>,
        multiselect: bool,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptResponse {
    Text(String),
    Confirm(bool),
    Selected(Vec<String>),
}

impl PromptRequest {
    /// The answer given when the user accepts the default.
    pub fn default_response(&self) -> PromptResponse {
        match &self.kind {
            PromptKind::Text { default } => PromptResponse::Text(default.clone()),
            PromptKind::Confirm { default } => PromptResponse::Confirm(*default),
            PromptKind::Select {
                choices,
                selected,
                multiselect,
            } => {
                if *multiselect {
                    PromptResponse::Selected(selected.clone())
                } else {
                    let pick = selected.first().or(choices.first());
                    PromptResponse::Selected(pick.cloned().into_iter().collect())
                }
            }
        }
    }
}

/// Asks the user for values.
pub trait Prompter {
    fn prompt(&mut self, request: &PromptRequest) -> Result<PromptResponse, IniformError>;
}

/// Answers from a fixed queue. Once the queue is empty every request gets its
/// default answer. All requests are recorded.
#[derive(Debug, Clone, Default)]
pub struct ScriptedPrompter {
    answers: VecDeque<PromptResponse>,
    asked: Vec<PromptRequest>,
}

impl ScriptedPrompter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn answer(mut self, response: PromptResponse) -> Self {
        self.answers.push_back(response);
        self
    }

    pub fn text(self, value: &str) -> Self {
        self.answer(PromptResponse::Text(value.to_string()))
    }

    pub fn confirm(self, value: bool) -> Self {
        self.answer(PromptResponse::Confirm(value))
    }

    pub fn select<I, S>(self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.answer(PromptResponse::Selected(
            values.into_iter().map(Into::into).collect(),
        ))
    }

    /// Requests seen so far, in order.
    pub fn asked(&self) -> &[PromptRequest] {
        &self.asked
    }

    pub fn remaining(&self) -> usize {
        self.answers.len()
    }
}

impl Prompter for ScriptedPrompter {
    fn prompt(&mut self, request: &PromptRequest) -> Result<PromptResponse, IniformError> {
        self.asked.push(request.clone());
        Ok(self
            .answers
            .pop_front()
            .unwrap_or_else(|| request.default_response()))
    }
}

/// Line-based prompts: one question per line, one answer per line.
///
/// An empty answer or end of input takes the default. Invalid answers are
/// asked again.
#[derive(Debug)]
pub struct LinePrompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> LinePrompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn into_inner(self) -> (R, W) {
        (self.input, self.output)
    }

    fn read_answer(&mut self) -> Result<Option<String>, IniformError> {
        self.output.flush().map_err(prompt_io)?;
        let mut line = String::new();
        let n = self.input.read_line(&mut line).map_err(prompt_io)?;
        if n == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    fn header(&mut self, request: &PromptRequest) -> Result<(), IniformError> {
        if let Some(long) = &request.long_instruction {
            writeln!(self.output, "{long}").map_err(prompt_io)?;
        }
        write!(self.output, "? {}", request.message).map_err(prompt_io)?;
        if let Some(instruction) = &request.instruction {
            write!(self.output, " ({instruction})").map_err(prompt_io)?;
        }
        Ok(())
    }

    fn ask_text(&mut self, request: &PromptRequest, default: &str) -> Result<PromptResponse, IniformError> {
        self.header(request)?;
        if !default.is_empty() {
            write!(self.output, " [{default}]").map_err(prompt_io)?;
        }
        write!(self.output, " ").map_err(prompt_io)?;
        Ok(match self.read_answer()? {
            Some(answer) if !answer.is_empty() => PromptResponse::Text(answer),
            _ => PromptResponse::Text(default.to_string()),
        })
    }

    fn ask_confirm(&mut self, request: &PromptRequest, default: bool) -> Result<PromptResponse, IniformError> {
        loop {
            self.header(request)?;
            let hint = if default { "Y/n" } else { "y/N" };
            write!(self.output, " [{hint}] ").map_err(prompt_io)?;
            let Some(answer) = self.read_answer()? else {
                return Ok(PromptResponse::Confirm(default));
            };
            match answer.to_lowercase().as_str() {
                "" => return Ok(PromptResponse::Confirm(default)),
                "y" | "n" | "no" | "false" | "off" | "0" => {
                    return Ok(PromptResponse::Confirm(answer.eq_ignore_ascii_case("y")));
                }
                other if truthy(other) => return Ok(PromptResponse::Confirm(true)),
                _ => writeln!(self.output, "Please answer yes or no.").map_err(prompt_io)?,
            }
        }
    }

    fn ask_select(
        &mut self,
        request: &PromptRequest,
        choices: &[String],
        selected: &[String],
        multiselect: bool,
    ) -> Result<PromptResponse, IniformError> {
        loop {
            self.header(request)?;
            writeln!(self.output).map_err(prompt_io)?;
            for (i, choice) in choices.iter().enumerate() {
                let mark = if selected.contains(choice) { "x" } else { " " };
                writeln!(self.output, "  [{mark}] {}) {choice}", i + 1).map_err(prompt_io)?;
            }
            let hint = if multiselect {
                "numbers separated by spaces or commas"
            } else {
                "number"
            };
            write!(self.output, "  {hint}: ").map_err(prompt_io)?;

            let answer = match self.read_answer()? {
                Some(a) if !a.is_empty() => a,
                _ => return Ok(request.default_response()),
            };

            match parse_selection(&answer, choices, multiselect) {
                Some(picked) => return Ok(PromptResponse::Selected(picked)),
                None => writeln!(self.output, "Invalid selection: {answer}").map_err(prompt_io)?,
            }
        }
    }
}

impl<R: BufRead, W: Write> Prompter for LinePrompter<R, W> {
    fn prompt(&mut self, request: &PromptRequest) -> Result<PromptResponse, IniformError> {
        match &request.kind {
            PromptKind::Text { default } => self.ask_text(request, default),
            PromptKind::Confirm { default } => self.ask_confirm(request, *default),
            PromptKind::Select {
                choices,
                selected,
                multiselect,
            } => self.ask_select(request, choices, selected, *multiselect),
        }
    }
}

/// 1-based indices into `choices`. `None` on any bad index, or on more than
/// one index for a single select.
fn parse_selection(answer: &str, choices: &[String], multiselect: bool) -> Option<Vec<String>> {
    let mut picked: Vec<String> = Vec::new();
    for token in answer.split([',', ' ']).filter(|t| !t.is_empty()) {
        let idx: usize = token.parse().ok()?;
        let choice = choices.get(idx.checked_sub(1)?)?;
        if !picked.contains(choice) {
            picked.push(choice.clone());
        }
    }
    if !multiselect && picked.len() != 1 {
        return None;
    }
    Some(picked)
}

fn prompt_io(e: std::io::Error) -> IniformError {
    IniformError::PromptError(e.to_string())
}
