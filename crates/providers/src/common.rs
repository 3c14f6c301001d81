//! Shared OpenAI compatible implementations (OpenAI, Groq, Ollama)

use anyhow::{Context, Result};
use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::config::ProviderConfig;
use crate::traits::{ChatOptions, ChatProvider, EmbedProvider};

static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid regex"));

/// Text normalization before embedding
pub(crate) fn normalize_for_embedding(text: &str) -> String {
    WHITESPACE.replace_all(text.trim(), " ").to_string()
}

fn authorized(request: reqwest::RequestBuilder, api_key: &str) -> reqwest::RequestBuilder {
    if api_key.is_empty() {
        request
    } else {
        request.header("Authorization", format!("Bearer {}", api_key))
    }
}

/// OpenAI compatible Embed
pub struct OpenaiCompatibleEmbed {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
    dimension: usize,
    request_dimensions: bool,
}

#[derive(Debug, Serialize)]
struct OpenaiEmbedRequest {
    model: String,
    input: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    dimensions: Option<usize>,
}

#[derive(Debug, Deserialize)]
struct OpenaiEmbedResponse {
    data: Vec<OpenaiEmbedData>,
}

#[derive(Debug, Deserialize)]
struct OpenaiEmbedData {
    embedding: Vec<f32>,
}

impl OpenaiCompatibleEmbed {
    pub fn new(config: &ProviderConfig, dimension: usize, request_dimensions: bool) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .context("Failed to build HTTP client")?;

        tracing::debug!(
            "Created embed provider {}: model={}, dimension={}, base_url={}",
            config.provider_name,
            config.model,
            dimension,
            config.base_url
        );

        Ok(Self {
            client,
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            dimension,
            request_dimensions,
        })
    }

    fn build_request(&self, texts: &[&str]) -> OpenaiEmbedRequest {
        OpenaiEmbedRequest {
            model: self.model.clone(),
            input: texts.iter().map(|t| normalize_for_embedding(t)).collect(),
            dimensions: self.request_dimensions.then_some(self.dimension),
        }
    }
}

#[async_trait]
impl EmbedProvider for OpenaiCompatibleEmbed {
    async fn encode(&self, text: &str) -> Result<Vec<f32>> {
        self.encode_batch(&[text])
            .await?
            .into_iter()
            .next()
            .context("No embedding returned")
    }

    async fn encode_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let request = self.build_request(texts);
        let url = format!("{}/embeddings", self.base_url);

        let response = authorized(self.client.post(&url), &self.api_key)
            .json(&request)
            .send()
            .await
            .context("Failed to send embedding request")?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            tracing::error!("Embed API error ({}): {}", status, error_text);
            anyhow::bail!("Embed API error ({}): {}", status, error_text);
        }

        let embed_response: OpenaiEmbedResponse = response
            .json()
            .await
            .context("Failed to parse embedding response")?;

        let embeddings: Vec<Vec<f32>> = embed_response
            .data
            .into_iter()
            .map(|d| d.embedding)
            .collect();

        if embeddings.len() != texts.len() {
            anyhow::bail!(
                "Embed API returned {} vectors for {} inputs",
                embeddings.len(),
                texts.len()
            );
        }

        Ok(embeddings)
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}

/// OpenAI compatible `/chat/completions` client
pub struct OpenaiCompatibleChat {
    client: Client,
    api_key: String,
    base_url: String,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    temperature: f32,
    max_tokens: u32,
    stream: bool,
}

#[derive(Debug, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

impl OpenaiCompatibleChat {
    pub fn new(config: &ProviderConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .context("Failed to build HTTP client")?;

        tracing::debug!(
            "Created chat provider {}: base_url={}",
            config.provider_name,
            config.base_url
        );

        Ok(Self {
            client,
            api_key: config.api_key.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }
}

fn build_chat_request<'a>(model: &'a str, prompt: &str, options: &ChatOptions) -> ChatRequest<'a> {
    ChatRequest {
        model,
        messages: vec![ChatMessage {
            role: "user".to_string(),
            content: Some(prompt.to_string()),
        }],
        temperature: options.temperature,
        max_tokens: options.max_tokens,
        stream: false,
    }
}

fn first_choice_text(response: ChatResponse) -> Result<String> {
    response
        .choices
        .into_iter()
        .next()
        .context("LLM response has no choices")?
        .message
        .content
        .context("LLM response choice has no content")
}

#[async_trait]
impl ChatProvider for OpenaiCompatibleChat {
    async fn chat(&self, model: &str, prompt: &str, options: &ChatOptions) -> Result<String> {
        let request = build_chat_request(model, prompt, options);
        let url = format!("{}/chat/completions", self.base_url);

        let response = authorized(self.client.post(&url), &self.api_key)
            .json(&request)
            .send()
            .await
            .context("Failed to send LLM request")?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            anyhow::bail!("LLM API error ({}): {}", status, error_text);
        }

        let chat_response: ChatResponse = response
            .json()
            .await
            .context("Failed to parse LLM response")?;

        first_choice_text(chat_response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> ProviderConfig {
        ProviderConfig {
            provider_name: "openai".to_string(),
            api_key: String::new(),
            base_url: "http://localhost:11434/v1/".to_string(),
            model: "nomic-embed-text".to_string(),
            dimension: Some(768),
        }
    }

    #[test]
    fn test_normalize_collapses_whitespace() {
        assert_eq!(
            normalize_for_embedding("  Goa \n\n beaches\tand   forts "),
            "Goa beaches and forts"
        );
    }

    #[test]
    fn test_embed_request_dimensions_optional() {
        let with_dims = OpenaiCompatibleEmbed::new(&config(), 768, true).unwrap();
        let json = serde_json::to_value(with_dims.build_request(&["a  b"])).unwrap();
        assert_eq!(json["dimensions"], 768);
        assert_eq!(json["input"][0], "a b");

        let without = OpenaiCompatibleEmbed::new(&config(), 768, false).unwrap();
        let json = serde_json::to_value(without.build_request(&["a"])).unwrap();
        assert!(json.get("dimensions").is_none());
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let embed = OpenaiCompatibleEmbed::new(&config(), 768, false).unwrap();
        assert_eq!(embed.base_url, "http://localhost:11434/v1");
    }

    #[test]
    fn test_chat_request_shape() {
        let options = ChatOptions {
            temperature: 0.4,
            max_tokens: 900,
        };
        let json =
            serde_json::to_value(build_chat_request("llama-3.1-8b-instant", "hi", &options))
                .unwrap();

        assert_eq!(json["model"], "llama-3.1-8b-instant");
        assert_eq!(json["messages"][0]["role"], "user");
        assert_eq!(json["messages"][0]["content"], "hi");
        assert_eq!(json["max_tokens"], 900);
        assert_eq!(json["stream"], false);
        assert!((json["temperature"].as_f64().unwrap() - 0.4).abs() < 1e-6);
    }

    #[test]
    fn test_first_choice_text() {
        let response: ChatResponse = serde_json::from_str(
            r#"{"choices":[{"message":{"role":"assistant","content":"Visit Munnar"}},
                           {"message":{"role":"assistant","content":"ignored"}}]}"#,
        )
        .unwrap();
        assert_eq!(first_choice_text(response).unwrap(), "Visit Munnar");

        let empty: ChatResponse = serde_json::from_str(r#"{"choices":[]}"#).unwrap();
        assert!(first_choice_text(empty).is_err());
    }
}
