//! Input handling for the daily entry: flags, stdin, $EDITOR and prompts.

use std::io::{self, IsTerminal, Read};
use std::process::Command;
use std::time::{SystemTime, UNIX_EPOCH};

use dialoguer::theme::ColorfulTheme;
use dialoguer::{Confirm, Input, MultiSelect};

use habitlog_core::storage::validation::MIN_IMPROVE_CHARS;
use habitlog_core::storage::{split_gratitude, Habit};

use crate::errors::CliError;

/// Read the improvement note from `--improve`, stdin, $EDITOR or a prompt.
pub fn read_improve(
    no_input: bool,
    improve: Option<String>,
    editor_override: Option<&str>,
) -> anyhow::Result<String> {
    if let Some(value) = improve {
        if value.trim().is_empty() {
            return Err(CliError::invalid_input("--improve cannot be empty").into());
        }
        return Ok(value);
    }

    if !io::stdin().is_terminal() {
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .map_err(|e| anyhow::anyhow!("Failed to read stdin: {}", e))?;
        let trimmed = buffer.trim().to_string();
        if trimmed.is_empty() {
            return Err(CliError::invalid_input("No input provided on stdin").into());
        }
        return Ok(trimmed);
    }

    if no_input {
        return Err(CliError::invalid_input(
            "--no-input requires --improve or content on stdin",
        )
        .into());
    }

    let editor = editor_override
        .map(str::to_string)
        .or_else(|| std::env::var("EDITOR").ok().filter(|e| !e.trim().is_empty()));
    match editor {
        Some(editor) => read_from_editor(&editor),
        None => Input::<String>::with_theme(&ColorfulTheme::default())
            .with_prompt("One thing to improve")
            .validate_with(|value: &String| -> Result<(), String> {
                if value.trim().chars().count() >= MIN_IMPROVE_CHARS {
                    Ok(())
                } else {
                    Err(format!("Use at least {} characters", MIN_IMPROVE_CHARS))
                }
            })
            .interact_text()
            .map_err(|e| anyhow::anyhow!("Failed to read input: {}", e)),
    }
}

/// Prompt for gratitude items (comma or newline separated).
pub fn prompt_gratitude() -> anyhow::Result<Vec<String>> {
    let text: String = Input::with_theme(&ColorfulTheme::default())
        .with_prompt("Grateful for (comma separated)")
        .validate_with(|value: &String| -> Result<(), &str> {
            if split_gratitude(value).is_empty() {
                Err("Enter at least one item")
            } else {
                Ok(())
            }
        })
        .interact_text()
        .map_err(|e| anyhow::anyhow!("Failed to read input: {}", e))?;
    Ok(split_gratitude(&text))
}

/// Let the user tick completed habits; returns their ids.
pub fn prompt_habits(habits: &[Habit], preselected: &[String]) -> anyhow::Result<Vec<String>> {
    if habits.is_empty() {
        return Ok(Vec::new());
    }
    let labels: Vec<&str> = habits.iter().map(|h| h.label.as_str()).collect();
    let defaults: Vec<bool> = habits
        .iter()
        .map(|h| preselected.iter().any(|id| id == &h.id))
        .collect();
    let chosen = MultiSelect::with_theme(&ColorfulTheme::default())
        .with_prompt("Habits completed (space to toggle)")
        .items(&labels)
        .defaults(&defaults)
        .interact()
        .map_err(|e| anyhow::anyhow!("Failed to read selection: {}", e))?;
    Ok(chosen.into_iter().map(|i| habits[i].id.clone()).collect())
}

/// Ask for confirmation unless `--yes` was given.
///
/// Without a TTY the answer is "no", so scripts must pass `--yes`.
pub fn confirm(prompt: &str, assume_yes: bool) -> anyhow::Result<bool> {
    if assume_yes {
        return Ok(true);
    }
    if !io::stdin().is_terminal() {
        return Err(CliError::invalid_input(format!("{} Pass --yes to confirm.", prompt)).into());
    }
    Confirm::with_theme(&ColorfulTheme::default())
        .with_prompt(prompt)
        .default(false)
        .interact()
        .map_err(|e| anyhow::anyhow!("Failed to read confirmation: {}", e))
}

fn read_from_editor(editor: &str) -> anyhow::Result<String> {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|e| anyhow::anyhow!("System time error: {}", e))?
        .as_nanos();
    let filename = format!("habitlog_improve_{}_{}.md", std::process::id(), nanos);
    let path = std::env::temp_dir().join(filename);

    std::fs::write(&path, "").map_err(|e| anyhow::anyhow!("Failed to create temp file: {}", e))?;

    let mut parts = editor.split_whitespace();
    let program = parts
        .next()
        .ok_or_else(|| CliError::invalid_input("Editor command is empty"))?;
    let status = Command::new(program)
        .args(parts)
        .arg(&path)
        .status()
        .map_err(|e| anyhow::anyhow!("Failed to launch editor: {}", e))?;
    if !status.success() {
        let _ = std::fs::remove_file(&path);
        return Err(anyhow::anyhow!("Editor exited with failure"));
    }

    let contents = std::fs::read_to_string(&path)
        .map_err(|e| anyhow::anyhow!("Failed to read temp file: {}", e))?;
    let _ = std::fs::remove_file(&path);

    let trimmed = contents.trim().to_string();
    if trimmed.is_empty() {
        return Err(CliError::invalid_input("Improvement note is empty").into());
    }
    Ok(trimmed)
}
