use clap::{Parser, Subcommand};

use crate::llm::ChatModel;

#[derive(Parser)]
#[command(name = "tripguide")]
#[command(version)]
#[command(about = "Travel guide chatbot with booking platform suggestions", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Write config.toml and providers.toml templates")]
    Init {
        /// Initialize in local directory (./.tripguide) instead of global (~/.tripguide)
        #[arg(short, long)]
        local: bool,
    },

    #[command(about = "Start an interactive travel chat")]
    Chat {
        /// Chat model (fast or advanced); defaults to the configured model
        #[arg(short, long, value_enum)]
        model: Option<ChatModel>,

        /// Use local config (./.tripguide)
        #[arg(short, long)]
        local: bool,

        /// Use global config (~/.tripguide)
        #[arg(short, long)]
        global: bool,
    },

    #[command(about = "Ask a single question and save it to history")]
    Ask {
        query: String,

        #[arg(short, long, value_enum)]
        model: Option<ChatModel>,

        #[arg(short, long)]
        local: bool,

        #[arg(short, long)]
        global: bool,
    },

    #[command(about = "Show booking platforms matching a query (offline)")]
    Platforms { query: String },

    #[command(about = "Browse saved conversations")]
    History {
        #[command(subcommand)]
        action: HistoryCommand,

        #[arg(short, long, global = true)]
        local: bool,

        #[arg(short, long, global = true)]
        global: bool,
    },
}

#[derive(Subcommand)]
pub enum HistoryCommand {
    #[command(about = "List recent conversations")]
    List,

    #[command(about = "Print a saved conversation")]
    Show { id: String },

    #[command(about = "Delete a saved conversation")]
    Delete {
        id: String,

        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },
}
