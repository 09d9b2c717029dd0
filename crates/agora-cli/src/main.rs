//! Agora CLI - Command-line client for forum discussions.

use agora_cli::commands;
use agora_cli::{Cli, Command, Config, Formatter};
use clap::Parser;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    // Logs go to stderr so they never mix with command output
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("AGORA_LOG")
                .or_else(|_| EnvFilter::try_from_default_env())
                .unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> agora_cli::Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Load or create config
    let mut config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Could not load config, using defaults");
            Config::default()
        }),
    };

    // Override profile if specified
    if let Some(profile_name) = cli.profile {
        config.switch_profile(profile_name)?;
    }

    // Determine output format
    let format = cli
        .format
        .map(Into::into)
        .unwrap_or(config.settings.format);

    // Determine color setting
    let color_enabled = !cli.no_color && config.settings.color;

    // Create formatter
    let formatter = Formatter::new(format, color_enabled);

    // Handle commands
    match cli.command {
        Command::Profile(args) => {
            commands::execute_profile(args, &mut config, &formatter).await?;
        }
        cmd => {
            // Commands that require a database
            let client = commands::open_client(&config)?;

            match cmd {
                Command::Thread(args) => commands::execute_thread(args, &client, &formatter).await?,
                Command::Comment(args) => commands::execute_comment(args, &client, &formatter).await?,
                Command::Vote(args) => commands::execute_vote(args, &client, &formatter).await?,
                Command::Tally(args) => commands::execute_tally(args, &client, &formatter).await?,
                Command::Watch(args) => commands::execute_watch(args, &client, &formatter).await?,
                Command::Post(args) => commands::execute_post(args, &client, &formatter).await?,
                Command::Community(args) => {
                    commands::execute_community(args, &client, &formatter).await?
                }
                Command::Profile(_) => unreachable!(),
            }
        }
    }

    Ok(())
}
