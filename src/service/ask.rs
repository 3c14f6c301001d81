use anyhow::Result;

use crate::llm::ChatModel;
use crate::session::ChatSession;
use crate::ui::Output;

use super::bootstrap;

/// Answer one query, print it with its booking suggestions and save it
pub async fn ask(
    query: &str,
    model: Option<ChatModel>,
    force_local: bool,
    force_global: bool,
) -> Result<()> {
    let output = Output::new();
    let runtime = bootstrap::prepare(force_local, force_global, &output).await?;

    let mut session = ChatSession::new(model.unwrap_or(runtime.config.model));
    output.status("Asking", session.model().label());
    eprintln!();

    let outcome = runtime.engine.handle_turn(&mut session, query).await;

    println!("{}", outcome.reply);
    if !outcome.suggestions.is_empty() {
        println!();
        output.platform_suggestions(&outcome.suggestions);
    }

    eprintln!();
    match outcome.notice {
        Some(notice) => output.warning(&notice),
        None => output.status("Saved", &format!("conversation {}", session.conversation_id())),
    }

    Ok(())
}
