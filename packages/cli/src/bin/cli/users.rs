// ABOUTME: CLI commands for creating and inspecting user accounts
// ABOUTME: Accounts are created directly with a confirmed email address

use clap::Subcommand;
use colored::*;
use comfy_table::{modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL, ContentArrangement, Table};
use usuario_cli::accounts::{create_user, find_user};
use usuario_cli::AppContext;
use usuario_core::{EmailChangeFlags, UserId};

use super::prompts;

#[derive(Subcommand)]
pub enum UsersCommands {
    /// Create a new account
    Create {
        /// Login name
        #[arg(long)]
        username: String,
        /// Email address
        #[arg(long)]
        email: String,
    },
    /// Show an account and any pending email change
    Show {
        /// User id
        id: UserId,
    },
}

impl UsersCommands {
    pub async fn execute(&self, context: &AppContext) -> anyhow::Result<()> {
        match self {
            UsersCommands::Create { username, email } => {
                let password = prompts::new_password("Password:")?;
                let user = create_user(&context.services, username, email, &password).await?;
                println!(
                    "{} Created user {} (id {})",
                    "✓".green().bold(),
                    user.username.cyan(),
                    user.id
                );
                Ok(())
            }
            UsersCommands::Show { id } => {
                let user = find_user(&context.services, *id).await?;

                let mut table = Table::new();
                table
                    .load_preset(UTF8_FULL)
                    .apply_modifier(UTF8_ROUND_CORNERS)
                    .set_content_arrangement(ContentArrangement::Dynamic);
                table.set_header(vec!["Field", "Value"]);
                table.add_row(vec!["ID".to_string(), user.id.to_string()]);
                table.add_row(vec!["Username".to_string(), user.username.clone()]);
                table.add_row(vec!["Email".to_string(), user.email.clone()]);
                table.add_row(vec![
                    "Pending email".to_string(),
                    user.unconfirmed_email.clone().unwrap_or_else(|| "—".to_string()),
                ]);
                table.add_row(vec![
                    "Confirmed".to_string(),
                    confirmed_text(user.flags),
                ]);
                table.add_row(vec!["Updated".to_string(), user.updated_at.to_rfc3339()]);

                println!("{table}");
                Ok(())
            }
        }
    }
}

fn confirmed_text(flags: EmailChangeFlags) -> String {
    let mut parts = Vec::new();
    if flags.contains(EmailChangeFlags::NEW_EMAIL_CONFIRMED) {
        parts.push("new address");
    }
    if flags.contains(EmailChangeFlags::OLD_EMAIL_CONFIRMED) {
        parts.push("old address");
    }
    if parts.is_empty() {
        "—".to_string()
    } else {
        parts.join(", ")
    }
}
