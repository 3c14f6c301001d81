use tripguide_provider::{ChatOptions, ChatProvider};

use super::model::ChatModel;

/// Prefix of replies produced from a failed completion
pub const ERROR_MARKER: &str = "⚠️";

/// Ask the chat provider, turning any failure into a visible reply
pub async fn generate_reply(
    chat: &dyn ChatProvider,
    model: ChatModel,
    prompt: &str,
    options: &ChatOptions,
) -> String {
    match chat.chat(model.id(), prompt, options).await {
        Ok(reply) => reply,
        Err(e) => {
            tracing::warn!("Chat completion failed: {:#}", e);
            format!("{} Error: {:#}", ERROR_MARKER, e)
        }
    }
}
