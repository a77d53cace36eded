//! Interactive prompts shared by `-i` modes and the shell

use dialoguer::{theme::ColorfulTheme, Confirm, Input};
use miette::{IntoDiagnostic, Result};

use crate::cli::helpers::parse_id_list;

/// Prompt for a required line of text
pub fn text(prompt: &str) -> Result<String> {
    Input::<String>::with_theme(&ColorfulTheme::default())
        .with_prompt(prompt)
        .interact_text()
        .into_diagnostic()
}

/// Prompt for text that may be left empty
pub fn optional_text(prompt: &str) -> Result<String> {
    Input::<String>::with_theme(&ColorfulTheme::default())
        .with_prompt(prompt)
        .allow_empty(true)
        .interact_text()
        .into_diagnostic()
}

/// Prompt for text, pre-filled with the current value
pub fn text_with_default(prompt: &str, current: &str) -> Result<String> {
    Input::<String>::with_theme(&ColorfulTheme::default())
        .with_prompt(prompt)
        .default(current.to_string())
        .allow_empty(true)
        .interact_text()
        .into_diagnostic()
}

pub fn quantity(prompt: &str, current: Option<i64>) -> Result<i64> {
    let theme = ColorfulTheme::default();
    let mut input = Input::<i64>::with_theme(&theme).with_prompt(prompt);
    if let Some(current) = current {
        input = input.default(current);
    }
    input.interact_text().into_diagnostic()
}

pub fn price(prompt: &str, current: Option<f64>) -> Result<f64> {
    let theme = ColorfulTheme::default();
    let mut input = Input::<f64>::with_theme(&theme).with_prompt(prompt);
    if let Some(current) = current {
        input = input.default(current);
    }
    input.interact_text().into_diagnostic()
}

/// Prompt for a comma-separated id list, possibly empty
pub fn id_list(prompt: &str) -> Result<Vec<String>> {
    let raw = optional_text(&format!("{} (comma-separated, optional)", prompt))?;
    parse_id_list(&raw)
}

/// Prompt for an optional caller-supplied id
pub fn optional_id(prompt: &str) -> Result<Option<String>> {
    let raw = optional_text(&format!("{} (blank to generate)", prompt))?;
    let raw = raw.trim();
    Ok(if raw.is_empty() {
        None
    } else {
        Some(raw.to_string())
    })
}

pub fn confirm(prompt: &str) -> Result<bool> {
    Confirm::with_theme(&ColorfulTheme::default())
        .with_prompt(prompt)
        .default(false)
        .interact()
        .into_diagnostic()
}
