// ABOUTME: CLI commands for the account settings form and email confirmation
// ABOUTME: Prints field errors and notices the same way the form reports them

use anyhow::bail;
use clap::Args;
use colored::*;
use usuario_cli::accounts::find_user;
use usuario_cli::AppContext;
use usuario_core::UserId;
use usuario_settings::{ConfirmStatus, EmailChangeConfirmation, SettingsForm, SettingsInput};

use super::prompts;

#[derive(Args)]
pub struct SettingsArgs {
    /// User id
    user_id: UserId,
    /// New username
    #[arg(long)]
    username: Option<String>,
    /// New email address (goes through the configured email change strategy)
    #[arg(long)]
    email: Option<String>,
    /// Prompt for a new password
    #[arg(long)]
    change_password: bool,
    /// Current password (prompted when omitted)
    #[arg(long)]
    current_password: Option<String>,
}

impl SettingsArgs {
    pub async fn execute(&self, context: &AppContext) -> anyhow::Result<()> {
        let user = find_user(&context.services, self.user_id).await?;

        let mut input = SettingsInput::from_user(&user);
        if let Some(username) = &self.username {
            input.username = username.clone();
        }
        if let Some(email) = &self.email {
            input.email = email.clone();
        }
        if self.change_password {
            input.new_password = Some(prompts::new_password("New password:")?);
        }
        input.current_password = match &self.current_password {
            Some(password) => password.clone(),
            None => prompts::current_password()?,
        };

        let mut form = SettingsForm::for_user(context.services.clone(), user, input);
        let saved = form.save().await?;

        if !form.errors().is_empty() {
            for (_, message) in form.errors().iter() {
                eprintln!("{} {}", "✗".red().bold(), message);
            }
            bail!("Settings were not saved");
        }

        for notice in form.notices() {
            println!("{} {}", "ℹ".blue().bold(), notice);
        }
        if saved {
            println!("{} Settings saved", "✓".green().bold());
        } else {
            println!("{}", "Nothing to save".yellow());
        }
        Ok(())
    }
}

#[derive(Args)]
pub struct ConfirmEmailArgs {
    /// User id from the confirmation link
    #[arg(long)]
    user: UserId,
    /// Code from the confirmation link
    #[arg(long)]
    code: String,
}

impl ConfirmEmailArgs {
    pub async fn execute(&self, context: &AppContext) -> anyhow::Result<()> {
        let result = EmailChangeConfirmation::new(&context.services)
            .confirm(self.user, self.code.trim())
            .await?;

        match result.status {
            ConfirmStatus::Changed => {
                println!("{} {}", "✓".green().bold(), result.notice);
                Ok(())
            }
            ConfirmStatus::PartiallyConfirmed => {
                println!("{} {}", "ℹ".blue().bold(), result.notice);
                Ok(())
            }
            ConfirmStatus::InvalidToken
            | ConfirmStatus::NothingPending
            | ConfirmStatus::EmailTaken
            | ConfirmStatus::NotApplied => bail!("{}", result.notice),
        }
    }
}
