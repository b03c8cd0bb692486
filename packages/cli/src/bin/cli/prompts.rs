// ABOUTME: Interactive password prompts for the usuario subcommands
// ABOUTME: Passwords are masked and never echoed back

use anyhow::{bail, Context};
use inquire::{Password, PasswordDisplayMode};

pub fn current_password() -> anyhow::Result<String> {
    Password::new("Current password:")
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .prompt()
        .context("Password input cancelled")
}

/// Prompt for a new password twice
pub fn new_password(message: &str) -> anyhow::Result<String> {
    let password = Password::new(message)
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .with_help_message("At least 6 characters")
        .prompt()
        .context("Password input cancelled")?;

    let confirm = Password::new("Confirm password:")
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .prompt()
        .context("Password confirmation cancelled")?;

    if password != confirm {
        bail!("Passwords do not match");
    }
    Ok(password)
}
