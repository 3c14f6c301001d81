use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use tripguide::cli::{Cli, Commands, HistoryCommand};
use tripguide::service;
use tripguide::ui::Output;

#[tokio::main]
async fn main() {
    init_tracing();

    let cli = Cli::parse();
    if let Err(e) = run(cli).await {
        Output::new().error(&format!("{:#}", e));
        std::process::exit(1);
    }
}

/// Logs go to stderr so stdout carries only the conversation
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Init { local } => service::init::initialize(local)?,
        Commands::Chat {
            model,
            local,
            global,
        } => service::chat::chat(model, local, global).await?,
        Commands::Ask {
            query,
            model,
            local,
            global,
        } => service::ask::ask(&query, model, local, global).await?,
        Commands::Platforms { query } => service::platforms::platforms(&query),
        Commands::History {
            action,
            local,
            global,
        } => match action {
            HistoryCommand::List => service::history::list(local, global).await?,
            HistoryCommand::Show { id } => service::history::show(&id, local, global).await?,
            HistoryCommand::Delete { id, force } => {
                service::history::delete(&id, local, global, force).await?
            }
        },
    }

    Ok(())
}
