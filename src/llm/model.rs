use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Supported chat models
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
pub enum ChatModel {
    #[default]
    #[serde(rename = "llama-3.1-8b-instant")]
    #[value(alias = "llama-3.1-8b-instant")]
    Fast,
    #[serde(rename = "llama-3.1-70b-versatile")]
    #[value(alias = "llama-3.1-70b-versatile")]
    Advanced,
}

impl ChatModel {
    pub const ALL: [ChatModel; 2] = [ChatModel::Fast, ChatModel::Advanced];

    /// Identifier sent to the chat completion API
    pub fn id(self) -> &'static str {
        match self {
            ChatModel::Fast => "llama-3.1-8b-instant",
            ChatModel::Advanced => "llama-3.1-70b-versatile",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ChatModel::Fast => "⚡ Fast (8B)",
            ChatModel::Advanced => "🧠 Advanced (70B)",
        }
    }
}

impl fmt::Display for ChatModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for ChatModel {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        ChatModel::ALL
            .into_iter()
            .find(|m| m.id() == s || format!("{:?}", m).eq_ignore_ascii_case(s))
            .ok_or_else(|| {
                anyhow::anyhow!(
                    "Unknown model '{}'. Use 'fast', 'advanced' or a full model id",
                    s
                )
            })
    }
}
