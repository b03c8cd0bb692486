use clap::{Parser, Subcommand};
use colored::*;
use std::process;
use tracing_subscriber::EnvFilter;

mod cli;

use cli::settings::{ConfirmEmailArgs, SettingsArgs};
use cli::users::UsersCommands;
use usuario_cli::{AppContext, ContextSettings};

#[derive(Parser)]
#[command(name = "usuario")]
#[command(about = "Usuario CLI - account settings and email change management")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the account database if it does not exist
    Init,
    /// Manage user accounts
    #[command(subcommand)]
    Users(UsersCommands),
    /// Change a user's username, email or password
    Settings(SettingsArgs),
    /// Complete a pending email change with a confirmation code
    ConfirmEmail(ConfirmEmailArgs),
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse();

    if let Err(e) = handle_command(cli.command).await {
        eprintln!("{} {}", "Error:".red().bold(), e);
        process::exit(1);
    }
}

async fn handle_command(command: Commands) -> anyhow::Result<()> {
    let settings = ContextSettings::from_env()?;
    let context = AppContext::open(&settings).await?;

    match command {
        Commands::Init => {
            println!(
                "{} Account database ready at {}",
                "✓".green().bold(),
                settings.database_url.cyan()
            );
            println!(
                "  Email change strategy: {}",
                settings.module.email_change_strategy.to_string().yellow()
            );
            Ok(())
        }
        Commands::Users(command) => command.execute(&context).await,
        Commands::Settings(args) => args.execute(&context).await,
        Commands::ConfirmEmail(args) => args.execute(&context).await,
    }
}
