use anyhow::Result;

use tripguide_provider::{ChatOptions, ChatProvider};
use tripguide_types::{Conversation, ConversationStore, ConversationSummary};

use crate::catalog::{match_platforms, PlatformMatches};
use crate::llm::{build_prompt, generate_reply};
use crate::rag::ContextAssembler;
use crate::session::ChatSession;

/// Result of one user submission
#[derive(Debug, Clone)]
pub struct TurnOutcome {
    pub reply: String,
    pub suggestions: PlatformMatches,
    /// Whether dataset snippets were placed into the prompt
    pub context_used: bool,
    /// Non-fatal problem worth telling the user about
    pub notice: Option<String>,
}

/// Wires retrieval, platform matching, the chat model and history together
pub struct GuideEngine {
    assembler: ContextAssembler,
    chat: Box<dyn ChatProvider>,
    store: Box<dyn ConversationStore>,
    options: ChatOptions,
    top_k: usize,
}

impl GuideEngine {
    pub fn new(
        assembler: ContextAssembler,
        chat: Box<dyn ChatProvider>,
        store: Box<dyn ConversationStore>,
        options: ChatOptions,
        top_k: usize,
    ) -> Self {
        Self {
            assembler,
            chat,
            store,
            options,
            top_k,
        }
    }

    /// Answer one query and record both sides of the exchange
    ///
    /// Retrieval, completion and save failures all degrade; the turn itself
    /// always produces a reply.
    pub async fn handle_turn(&self, session: &mut ChatSession, query: &str) -> TurnOutcome {
        session.push_user(query);

        let suggestions = match_platforms(query);

        let context = match self.assembler.assemble_context(query, self.top_k).await {
            Ok(context) => context,
            Err(e) => {
                tracing::warn!("Retrieval failed, answering without dataset: {:#}", e);
                String::new()
            }
        };

        let prompt = build_prompt(&context, query);
        let reply = generate_reply(self.chat.as_ref(), session.model(), &prompt, &self.options).await;
        session.push_assistant(reply.clone());

        let notice = match self.save(session).await {
            Ok(()) => None,
            Err(e) => {
                tracing::warn!("Failed to save conversation: {:#}", e);
                Some(format!("Conversation could not be saved: {:#}", e))
            }
        };

        TurnOutcome {
            reply,
            suggestions,
            context_used: !context.is_empty(),
            notice,
        }
    }

    /// Persist the session unless it only holds the greeting
    pub async fn save(&self, session: &ChatSession) -> Result<()> {
        if !session.should_persist() {
            return Ok(());
        }
        self.store.save(&session.to_conversation()).await
    }

    pub async fn recent_conversations(&self, limit: usize) -> Result<Vec<ConversationSummary>> {
        self.store.list_recent(limit).await
    }

    pub async fn load(&self, id: &str) -> Result<Conversation> {
        self.store.load(id).await
    }

    /// Switch the session to a stored conversation
    ///
    /// Returns a notice instead of failing; the session is untouched on error.
    pub async fn load_conversation(&self, session: &mut ChatSession, id: &str) -> Option<String> {
        match self.store.load(id).await {
            Ok(conversation) => {
                session.adopt(conversation);
                None
            }
            Err(e) => {
                tracing::warn!("Failed to load conversation {}: {:#}", id, e);
                Some("Failed to load conversation".to_string())
            }
        }
    }

    /// Delete a stored conversation; deleting the active one starts a new conversation
    pub async fn delete_conversation(&self, session: &mut ChatSession, id: &str) -> Option<String> {
        match self.store.delete(id).await {
            Ok(()) => {
                if session.conversation_id() == id {
                    session.start_new();
                }
                None
            }
            Err(e) => {
                tracing::warn!("Failed to delete conversation {}: {:#}", id, e);
                Some("Failed to delete".to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Category;
    use crate::llm::ChatModel;
    use crate::rag::VectorIndex;
    use crate::testing::{sample_chunks, FailingEmbedder, KeywordEmbedder, ScriptedChat};
    use std::path::Path;
    use tripguide_local::LocalConversationStore;
    use tripguide_types::{Role, StoreConfig};

    const OPTIONS: ChatOptions = ChatOptions {
        temperature: 0.4,
        max_tokens: 900,
    };

    async fn store(dir: &Path) -> Box<dyn ConversationStore> {
        Box::new(
            LocalConversationStore::open(&StoreConfig {
                path: dir.to_path_buf(),
            })
            .await
            .unwrap(),
        )
    }

    async fn grounded_assembler() -> ContextAssembler {
        let embedder = KeywordEmbedder;
        let index = VectorIndex::build(sample_chunks(), &embedder, 32)
            .await
            .unwrap();
        ContextAssembler::new(index, Box::new(embedder))
    }

    #[tokio::test]
    async fn test_turn_returns_reply_suggestions_and_saves() {
        let tmp = tempfile::tempdir().unwrap();
        let engine = GuideEngine::new(
            grounded_assembler().await,
            Box::new(ScriptedChat::replying("Stay near Baga beach.")),
            store(tmp.path()).await,
            OPTIONS,
            2,
        );
        let mut session = ChatSession::new(ChatModel::Fast);

        let outcome = engine
            .handle_turn(&mut session, "flight and hotel to Goa")
            .await;

        assert_eq!(outcome.reply, "Stay near Baga beach.");
        assert!(outcome.context_used);
        assert!(outcome.notice.is_none());
        assert_eq!(
            outcome.suggestions.keys().copied().collect::<Vec<_>>(),
            vec![Category::Hotels, Category::FlightTickets]
        );

        let stored = engine.load(session.conversation_id()).await.unwrap();
        assert_eq!(stored.messages, session.messages());
        assert_eq!(stored.title, "flight and hotel to Goa");
    }

    #[tokio::test]
    async fn test_no_keywords_no_suggestions() {
        let tmp = tempfile::tempdir().unwrap();
        let engine = GuideEngine::new(
            ContextAssembler::ungrounded(),
            Box::new(ScriptedChat::replying("Hi!")),
            store(tmp.path()).await,
            OPTIONS,
            2,
        );
        let mut session = ChatSession::new(ChatModel::Fast);

        let outcome = engine.handle_turn(&mut session, "hello there").await;

        assert!(outcome.suggestions.is_empty());
        assert!(!outcome.context_used);
    }

    #[tokio::test]
    async fn test_llm_failure_keeps_both_messages() {
        let tmp = tempfile::tempdir().unwrap();
        let engine = GuideEngine::new(
            ContextAssembler::ungrounded(),
            Box::new(ScriptedChat::failing("rate limited")),
            store(tmp.path()).await,
            OPTIONS,
            2,
        );
        let mut session = ChatSession::new(ChatModel::Fast);

        let outcome = engine.handle_turn(&mut session, "train to Jaipur").await;

        assert!(outcome.reply.starts_with("⚠️ Error:"));
        let messages = session.messages();
        assert_eq!(messages.len(), 3);
        assert_eq!(messages[1].role, Role::User);
        assert_eq!(messages[1].content, "train to Jaipur");
        assert_eq!(messages[2].content, outcome.reply);

        let stored = engine.load(session.conversation_id()).await.unwrap();
        assert_eq!(stored.messages.len(), 3);
    }

    #[tokio::test]
    async fn test_retrieval_failure_degrades_to_ungrounded_reply() {
        let tmp = tempfile::tempdir().unwrap();
        let index = VectorIndex::build(sample_chunks(), &KeywordEmbedder, 32)
            .await
            .unwrap();
        let engine = GuideEngine::new(
            ContextAssembler::new(index, Box::new(FailingEmbedder)),
            Box::new(ScriptedChat::replying("General advice")),
            store(tmp.path()).await,
            OPTIONS,
            2,
        );
        let mut session = ChatSession::new(ChatModel::Fast);

        let outcome = engine.handle_turn(&mut session, "goa").await;

        assert_eq!(outcome.reply, "General advice");
        assert!(!outcome.context_used);
    }

    #[tokio::test]
    async fn test_save_failure_is_a_notice() {
        let tmp = tempfile::tempdir().unwrap();
        let history = tmp.path().join("history");
        let engine = GuideEngine::new(
            ContextAssembler::ungrounded(),
            Box::new(ScriptedChat::replying("ok")),
            store(&history).await,
            OPTIONS,
            2,
        );
        std::fs::remove_dir_all(&history).unwrap();
        let mut session = ChatSession::new(ChatModel::Fast);

        let outcome = engine.handle_turn(&mut session, "bus to Pune").await;

        assert_eq!(outcome.reply, "ok");
        assert!(outcome.notice.is_some());
        assert_eq!(session.messages().len(), 3);
    }

    #[tokio::test]
    async fn test_welcome_only_session_is_not_saved() {
        let tmp = tempfile::tempdir().unwrap();
        let engine = GuideEngine::new(
            ContextAssembler::ungrounded(),
            Box::new(ScriptedChat::replying("ok")),
            store(tmp.path()).await,
            OPTIONS,
            2,
        );

        engine.save(&ChatSession::new(ChatModel::Fast)).await.unwrap();

        assert!(engine.recent_conversations(20).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_active_conversation_starts_new_one() {
        let tmp = tempfile::tempdir().unwrap();
        let engine = GuideEngine::new(
            ContextAssembler::ungrounded(),
            Box::new(ScriptedChat::replying("ok")),
            store(tmp.path()).await,
            OPTIONS,
            2,
        );
        let mut session = ChatSession::new(ChatModel::Fast);
        engine.handle_turn(&mut session, "hotel in Delhi").await;
        let id = session.conversation_id().to_string();

        // Ids are millisecond timestamps; make sure the replacement differs
        std::thread::sleep(std::time::Duration::from_millis(5));
        let notice = engine.delete_conversation(&mut session, &id).await;

        assert!(notice.is_none());
        assert_ne!(session.conversation_id(), id);
        assert_eq!(session.messages().len(), 1);
        assert!(engine.recent_conversations(20).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_other_conversation_keeps_session() {
        let tmp = tempfile::tempdir().unwrap();
        let engine = GuideEngine::new(
            ContextAssembler::ungrounded(),
            Box::new(ScriptedChat::replying("ok")),
            store(tmp.path()).await,
            OPTIONS,
            2,
        );
        let mut old = ChatSession::new(ChatModel::Fast);
        engine.handle_turn(&mut old, "flight to Goa").await;

        std::thread::sleep(std::time::Duration::from_millis(5));
        let mut session = ChatSession::new(ChatModel::Fast);
        engine.handle_turn(&mut session, "bus to Goa").await;
        let active = session.conversation_id().to_string();

        let notice = engine
            .delete_conversation(&mut session, old.conversation_id())
            .await;

        assert!(notice.is_none());
        assert_eq!(session.conversation_id(), active);
        let remaining = engine.recent_conversations(20).await.unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].id, active);
    }

    #[tokio::test]
    async fn test_load_and_delete_failures_are_notices() {
        let tmp = tempfile::tempdir().unwrap();
        let engine = GuideEngine::new(
            ContextAssembler::ungrounded(),
            Box::new(ScriptedChat::replying("ok")),
            store(tmp.path()).await,
            OPTIONS,
            2,
        );
        let mut session = ChatSession::new(ChatModel::Fast);
        let before = session.conversation_id().to_string();

        assert_eq!(
            engine.load_conversation(&mut session, "nope").await.as_deref(),
            Some("Failed to load conversation")
        );
        assert_eq!(
            engine.delete_conversation(&mut session, "nope").await.as_deref(),
            Some("Failed to delete")
        );
        assert_eq!(session.conversation_id(), before);
    }

    #[tokio::test]
    async fn test_load_conversation_resumes_it() {
        let tmp = tempfile::tempdir().unwrap();
        let engine = GuideEngine::new(
            ContextAssembler::ungrounded(),
            Box::new(ScriptedChat::replying("ok")),
            store(tmp.path()).await,
            OPTIONS,
            2,
        );
        let mut first = ChatSession::new(ChatModel::Advanced);
        engine.handle_turn(&mut first, "Tourist places in Kerala").await;

        let mut session = ChatSession::new(ChatModel::Fast);
        let notice = engine
            .load_conversation(&mut session, first.conversation_id())
            .await;

        assert!(notice.is_none());
        assert_eq!(session.conversation_id(), first.conversation_id());
        assert_eq!(session.messages(), first.messages());
        assert_eq!(session.model(), ChatModel::Advanced);
    }
}
