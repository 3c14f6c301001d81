use anyhow::Result;
use dialoguer::Input;

use crate::catalog::Category;
use crate::engine::GuideEngine;
use crate::llm::ChatModel;
use crate::session::ChatSession;
use crate::ui::Output;

use super::bootstrap::{self, Runtime};

const HELP: &str = "\
/new             start a new conversation
/clear           clear the current conversation
/history         list recent conversations
/load <id>       continue a saved conversation
/delete <id>     delete a saved conversation
/model [name]    show or switch the model (fast, advanced)
/hotels /flights /trains /buses
                 show booking platforms for a category
/help            show this help
/quit            leave the chat";

/// A line starting with '/'
#[derive(Debug, Clone, PartialEq)]
enum SlashCommand<'a> {
    New,
    Clear,
    History,
    Load(Option<&'a str>),
    Delete(Option<&'a str>),
    Model(Option<&'a str>),
    QuickLinks(Category),
    Help,
    Quit,
    Unknown(&'a str),
}

/// `None` when the line is a travel query rather than a command
fn parse_command(line: &str) -> Option<SlashCommand<'_>> {
    let rest = line.strip_prefix('/')?;
    let mut parts = rest.split_whitespace();
    let name = parts.next().unwrap_or("");
    let arg = parts.next();

    let command = match name.to_lowercase().as_str() {
        "new" => SlashCommand::New,
        "clear" => SlashCommand::Clear,
        "history" => SlashCommand::History,
        "load" => SlashCommand::Load(arg),
        "delete" => SlashCommand::Delete(arg),
        "model" => SlashCommand::Model(arg),
        "hotels" => SlashCommand::QuickLinks(Category::Hotels),
        "flights" => SlashCommand::QuickLinks(Category::FlightTickets),
        "trains" => SlashCommand::QuickLinks(Category::TrainTickets),
        "buses" => SlashCommand::QuickLinks(Category::BusTickets),
        "help" | "?" => SlashCommand::Help,
        "quit" | "exit" | "q" => SlashCommand::Quit,
        _ => SlashCommand::Unknown(name),
    };
    Some(command)
}

enum Flow {
    Continue,
    Quit,
}

pub async fn chat(model: Option<ChatModel>, force_local: bool, force_global: bool) -> Result<()> {
    let output = Output::new();
    let runtime = bootstrap::prepare(force_local, force_global, &output).await?;

    let mut session = ChatSession::new(model.unwrap_or(runtime.config.model));
    output.status("Model", session.model().label());
    output.note("Type /help for commands");
    eprintln!();
    show_transcript(&session, &output);

    loop {
        let line = match Input::<String>::new().with_prompt("You").interact_text() {
            Ok(line) => line,
            Err(e) => {
                // EOF or a closed terminal ends the chat
                tracing::debug!("Input closed: {}", e);
                break;
            }
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        println!();

        match parse_command(line) {
            Some(command) => {
                if let Flow::Quit = run_command(command, &runtime, &mut session, &output).await {
                    break;
                }
            }
            None => run_turn(&runtime.engine, &mut session, line, &output).await,
        }
    }

    output.status("Finished", "chat");
    Ok(())
}

async fn run_turn(engine: &GuideEngine, session: &mut ChatSession, query: &str, output: &Output) {
    let outcome = engine.handle_turn(session, query).await;

    if let Some(reply) = session.messages().last() {
        output.message(reply);
    }
    if !outcome.suggestions.is_empty() {
        output.platform_suggestions(&outcome.suggestions);
        println!();
    }
    if let Some(notice) = outcome.notice {
        output.warning(&notice);
    }
    tracing::debug!(
        "Turn finished (context used: {}, {} categories)",
        outcome.context_used,
        outcome.suggestions.len()
    );
}

async fn run_command(
    command: SlashCommand<'_>,
    runtime: &Runtime,
    session: &mut ChatSession,
    output: &Output,
) -> Flow {
    let engine = &runtime.engine;

    match command {
        SlashCommand::New => {
            session.start_new();
            output.status("New", &format!("conversation {}", session.conversation_id()));
            show_transcript(session, output);
        }
        SlashCommand::Clear => {
            session.clear();
            show_transcript(session, output);
        }
        SlashCommand::History => {
            match engine
                .recent_conversations(runtime.config.history.recent_limit)
                .await
            {
                Ok(conversations) => {
                    output.history_list(&conversations, runtime.config.history.display_limit)
                }
                Err(e) => output.warning(&format!("Failed to list conversations: {:#}", e)),
            }
            println!();
        }
        SlashCommand::Load(Some(id)) => match engine.load_conversation(session, id).await {
            Some(notice) => output.warning(&notice),
            None => {
                output.status("Loaded", &format!("conversation {}", id));
                output.status("Model", session.model().label());
                println!();
                show_transcript(session, output);
            }
        },
        SlashCommand::Delete(Some(id)) => {
            let was_active = session.conversation_id() == id;
            match engine.delete_conversation(session, id).await {
                Some(notice) => output.warning(&notice),
                None => {
                    output.status("Deleted", &format!("conversation {}", id));
                    if was_active {
                        show_transcript(session, output);
                    }
                }
            }
        }
        SlashCommand::Load(None) | SlashCommand::Delete(None) => {
            output.warning("A conversation id is required, see /history");
        }
        SlashCommand::Model(None) => {
            output.status("Model", session.model().label());
            for model in ChatModel::ALL {
                output.info(&format!("{} ({})", model.label(), model.id()));
            }
        }
        SlashCommand::Model(Some(name)) => match name.parse::<ChatModel>() {
            Ok(model) => {
                session.set_model(model);
                output.status("Model", model.label());
            }
            Err(e) => output.warning(&e.to_string()),
        },
        SlashCommand::QuickLinks(category) => {
            output.category_platforms(category, category.platforms());
            println!();
        }
        SlashCommand::Help => println!("{}\n", HELP),
        SlashCommand::Quit => return Flow::Quit,
        SlashCommand::Unknown(name) => {
            output.warning(&format!("Unknown command '/{}', try /help", name));
        }
    }

    Flow::Continue
}

fn show_transcript(session: &ChatSession, output: &Output) {
    for message in session.messages() {
        output.message(message);
    }
}
