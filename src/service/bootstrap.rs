use anyhow::Result;
use std::path::Path;

use tripguide_local::LocalConversationStore;
use tripguide_provider::{create_chat_provider, create_embed_provider, ChatOptions};
use tripguide_types::StoreConfig;

use crate::config::{AppConfig, ProvidersConfig, PROVIDERS_FILE};
use crate::engine::GuideEngine;
use crate::rag::{load_all, ContextAssembler, KnowledgeSources, VectorIndex};
use crate::ui::Output;

/// Everything a chat command needs, built once at startup
pub struct Runtime {
    pub config: AppConfig,
    pub engine: GuideEngine,
}

/// Load configuration, the knowledge base and the providers
///
/// Only configuration problems fail here; a missing dataset or an unreachable
/// embedding service leaves the assistant answering without grounding.
pub async fn prepare(force_local: bool, force_global: bool, output: &Output) -> Result<Runtime> {
    let config = AppConfig::load_with_scope(force_local, force_global)?;
    let config_dir = AppConfig::get_config_dir(force_local, force_global);
    let providers = load_providers(&config_dir)?;

    let llm = config.resolve_llm(&providers)?;
    let chat = create_chat_provider(&llm.to_provider_config())?;
    tracing::debug!("Chat provider: {} ({})", llm.provider_name, llm.base_url);

    let store = open_store(&config).await?;
    let assembler = build_assembler(&config, &providers, output).await;
    output.knowledge_info(assembler.chunk_count(), &config.embedding);

    let options = ChatOptions {
        temperature: config.generation.temperature,
        max_tokens: config.generation.max_tokens,
    };
    let engine = GuideEngine::new(
        assembler,
        chat,
        Box::new(store),
        options,
        config.retrieval.top_k,
    );

    Ok(Runtime { config, engine })
}

pub async fn open_store(config: &AppConfig) -> Result<LocalConversationStore> {
    LocalConversationStore::open(&StoreConfig {
        path: config.get_history_path(),
    })
    .await
}

/// providers.toml from the scope directory, else the global one
fn load_providers(config_dir: &Path) -> Result<ProvidersConfig> {
    let global_dir = AppConfig::global_dir();
    if !config_dir.join(PROVIDERS_FILE).exists() && config_dir != global_dir {
        tracing::debug!(
            "No {} in {}, using {}",
            PROVIDERS_FILE,
            config_dir.display(),
            global_dir.display()
        );
        return ProvidersConfig::load(&global_dir);
    }
    ProvidersConfig::load(config_dir)
}

async fn build_assembler(
    config: &AppConfig,
    providers: &ProvidersConfig,
    output: &Output,
) -> ContextAssembler {
    output.status("Loading", &config.data_dir.display().to_string());
    let chunks = load_all(&KnowledgeSources {
        csv: config.csv_path(),
        pdf: config.pdf_path(),
    });

    if chunks.is_empty() {
        return ContextAssembler::ungrounded();
    }

    let embedder = match config
        .resolve_embedding(providers)
        .and_then(|service| create_embed_provider(&service.to_provider_config()))
    {
        Ok(embedder) => embedder,
        Err(e) => {
            tracing::warn!("Embedding service unavailable, answering without dataset: {:#}", e);
            return ContextAssembler::ungrounded();
        }
    };

    output.status("Embedding", &format!("{} chunks", chunks.len()));
    match VectorIndex::build(chunks, embedder.as_ref(), config.retrieval.batch_size).await {
        Ok(index) => ContextAssembler::new(index, embedder),
        Err(e) => {
            tracing::warn!("Failed to index knowledge base, answering without dataset: {:#}", e);
            ContextAssembler::ungrounded()
        }
    }
}
