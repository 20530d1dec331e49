//! Interactive terminal prompts via dialoguer. Requires the `terminal`
//! feature.

use dialoguer::theme::ColorfulTheme;
use dialoguer::{Confirm, Input, MultiSelect, Select};

use crate::error::IniformError;
use crate::prompt::{PromptKind, PromptRequest, PromptResponse, Prompter};

/// Prompts on the controlling terminal using dialoguer widgets.
pub struct TerminalPrompter {
    theme: ColorfulTheme,
}

impl Default for TerminalPrompter {
    fn default() -> Self {
        Self::new()
    }
}

impl TerminalPrompter {
    pub fn new() -> Self {
        Self {
            theme: ColorfulTheme::default(),
        }
    }
}

impl Prompter for TerminalPrompter {
    fn prompt(&mut self, request: &PromptRequest) -> Result<PromptResponse, IniformError> {
        if let Some(long) = &request.long_instruction {
            eprintln!("{long}");
        }
        let message = match &request.instruction {
            Some(instruction) => format!("{} ({instruction})", request.message),
            None => request.message.clone(),
        };

        match &request.kind {
            PromptKind::Text { default } => Input::<String>::with_theme(&self.theme)
                .with_prompt(message)
                .default(default.clone())
                .allow_empty(true)
                .interact_text()
                .map(PromptResponse::Text)
                .map_err(dialog_error),
            PromptKind::Confirm { default } => Confirm::with_theme(&self.theme)
                .with_prompt(message)
                .default(*default)
                .interact()
                .map(PromptResponse::Confirm)
                .map_err(dialog_error),
            PromptKind::Select {
                choices,
                selected,
                multiselect: true,
            } => {
                let checked: Vec<bool> = choices.iter().map(|c| selected.contains(c)).collect();
                let picked = MultiSelect::with_theme(&self.theme)
                    .with_prompt(message)
                    .items(choices.as_slice())
                    .defaults(&checked)
                    .interact()
                    .map_err(dialog_error)?;
                Ok(PromptResponse::Selected(
                    picked.into_iter().map(|i| choices[i].clone()).collect(),
                ))
            }
            PromptKind::Select {
                choices, selected, ..
            } => {
                let start = selected
                    .first()
                    .and_then(|s| choices.iter().position(|c| c == s))
                    .unwrap_or(0);
                let picked = Select::with_theme(&self.theme)
                    .with_prompt(message)
                    .items(choices.as_slice())
                    .default(start)
                    .interact()
                    .map_err(dialog_error)?;
                Ok(PromptResponse::Selected(vec![choices[picked].clone()]))
            }
        }
    }
}

fn dialog_error(e: dialoguer::Error) -> IniformError {
    IniformError::PromptError(e.to_string())
}
