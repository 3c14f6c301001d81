use anyhow::Result;

use tripguide_types::ConversationStore;

use crate::config::AppConfig;
use crate::ui::Output;

use super::bootstrap::open_store;

pub async fn list(force_local: bool, force_global: bool) -> Result<()> {
    let output = Output::new();
    let config = AppConfig::load_with_scope(force_local, force_global)?;
    let store = open_store(&config).await?;

    output.resource_action("Reading", "history", store.dir());
    eprintln!();

    let conversations = store.list_recent(config.history.recent_limit).await?;
    output.history_list(&conversations, config.history.display_limit);

    Ok(())
}

pub async fn show(id: &str, force_local: bool, force_global: bool) -> Result<()> {
    let output = Output::new();
    let config = AppConfig::load_with_scope(force_local, force_global)?;
    let store = open_store(&config).await?;

    let conversation = store.load(id).await?;
    output.conversation(&conversation);

    Ok(())
}

pub async fn delete(
    id: &str,
    force_local: bool,
    force_global: bool,
    skip_confirm: bool,
) -> Result<()> {
    let output = Output::new();
    let config = AppConfig::load_with_scope(force_local, force_global)?;
    let scope = AppConfig::get_scope_name(force_local, force_global);
    let store = open_store(&config).await?;

    // Fails early with NotFound instead of asking about a missing conversation
    let conversation = store.load(id).await?;

    output.warning(&format!(
        "this will permanently delete \"{}\" ({})",
        conversation.title, id
    ));

    if !skip_confirm && !output.confirm("Delete this conversation?")? {
        output.info("Operation cancelled");
        return Ok(());
    }

    output.begin_operation("Deleting", &format!("conversation {}", id));
    store.delete(id).await?;

    output.finish("delete", scope);

    Ok(())
}
