//! Thin wrappers over `inquire`, one per interaction the menu loop needs.

use anyhow::Result;
use inquire::validator::ValueRequiredValidator;
use inquire::{Password, PasswordDisplayMode, Select, Text};

use clima_core::PlaceCandidate;

/// Top-level menu actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    Search,
    History,
    Exit,
}

impl MenuChoice {
    const fn all() -> [MenuChoice; 3] {
        [MenuChoice::Search, MenuChoice::History, MenuChoice::Exit]
    }
}

impl std::fmt::Display for MenuChoice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            MenuChoice::Search => "1. Search city",
            MenuChoice::History => "2. History",
            MenuChoice::Exit => "0. Exit",
        };
        f.write_str(label)
    }
}

pub fn main_menu() -> Result<MenuChoice> {
    let choice = Select::new("What would you like to do?", MenuChoice::all().to_vec()).prompt()?;
    Ok(choice)
}

/// Free-text prompt that re-prompts until the user enters something.
pub fn read_required(message: &str) -> Result<String> {
    let value = Text::new(message)
        .with_validator(ValueRequiredValidator::new("Please enter a value"))
        .prompt()?;
    Ok(value)
}

/// Masked prompt for API credentials.
pub fn read_secret(message: &str) -> Result<String> {
    let value = Password::new(message)
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .with_validator(ValueRequiredValidator::new("Please enter a value"))
        .prompt()?;
    Ok(value)
}

/// Present the candidates with a leading cancel row. Returns `None` when the
/// user cancels.
pub fn pick_place<'a>(candidates: &'a [PlaceCandidate]) -> Result<Option<&'a PlaceCandidate>> {
    let mut options = vec!["0. Cancel".to_string()];
    options.extend(
        candidates
            .iter()
            .enumerate()
            .map(|(i, place)| format!("{}. {}", i + 1, place.name)),
    );

    let selection = Select::new("Select a place:", options).raw_prompt()?;
    if selection.index == 0 {
        return Ok(None);
    }

    Ok(candidates.get(selection.index - 1))
}

/// Block until the user presses enter.
pub fn pause() -> Result<()> {
    println!();
    Text::new("Press enter to continue").prompt()?;
    Ok(())
}
