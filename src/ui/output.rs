use anyhow::Result;
use console::Style;
use dialoguer::Confirm;
use std::path::Path;

use tripguide_types::{Conversation, ConversationSummary, Message, Role};

use crate::catalog::{Category, PlatformMatches, PlatformRecord};

const HISTORY_TITLE_CHARS: usize = 30;

/// Cargo-style terminal output
///
/// Status lines go to stderr; conversation text goes to stdout.
pub struct Output {
    green: Style,
    cyan: Style,
    bold: Style,
    dim: Style,
}

impl Output {
    pub fn new() -> Self {
        Self {
            green: Style::new().green().bold(),
            cyan: Style::new().cyan().bold(),
            bold: Style::new().bold(),
            dim: Style::new().dim(),
        }
    }

    /// Status line with the verb right-aligned to 12 columns, e.g. "     Loading travel.csv"
    pub fn status(&self, action: &str, target: &str) {
        eprintln!("{:>12} {}", self.green.apply_to(action), target);
    }

    /// Status line preceded by a blank line, marking the start of an operation
    pub fn begin_operation(&self, action: &str, target: &str) {
        eprintln!();
        self.status(action, target);
    }

    /// "    Creating config at /path/to/config.toml"
    pub fn resource_action(&self, action: &str, resource: &str, path: &Path) {
        eprintln!(
            "{:>12} {} at {}",
            self.green.apply_to(action),
            resource,
            path.display()
        );
    }

    /// "   Knowledge 42 chunks (ollama.embed)"
    pub fn knowledge_info(&self, chunk_count: usize, embedding: &str) {
        eprintln!(
            "{:>12} {} {}",
            self.green.apply_to("Knowledge"),
            if chunk_count == 0 {
                "none loaded, answering from general knowledge".to_string()
            } else {
                format!("{} chunks", chunk_count)
            },
            self.dim.apply_to(format!("({})", embedding))
        );
    }

    pub fn finish(&self, action: &str, scope: &str) {
        eprintln!();
        eprintln!(
            "{:>12} {} for {} scope",
            self.green.apply_to("Finished"),
            action,
            scope
        );
    }

    pub fn note(&self, message: &str) {
        eprintln!("{:>12} {}", self.dim.apply_to("Note"), message);
    }

    pub fn warning(&self, message: &str) {
        eprintln!(
            "{:>12} {}",
            Style::new().yellow().bold().apply_to("Warning"),
            message
        );
    }

    pub fn error(&self, message: &str) {
        eprintln!(
            "{:>12} {}",
            Style::new().red().bold().apply_to("Error"),
            message
        );
    }

    /// Indented informational line on stdout
    pub fn info(&self, message: &str) {
        println!("{:>12} {}", "", message);
    }

    /// Yes/no prompt, defaulting to no
    pub fn confirm(&self, prompt: &str) -> Result<bool> {
        let confirmed = Confirm::new()
            .with_prompt(prompt)
            .default(false)
            .interact()?;
        Ok(confirmed)
    }

    /// One chat message with a role header
    pub fn message(&self, message: &Message) {
        let header = match message.role {
            Role::User => self.bold.apply_to("🧑 You"),
            Role::Assistant => self.cyan.apply_to("🤖 Guide"),
        };
        println!("{}", header);
        println!("{}", message.content);
        println!();
    }

    /// Full transcript of a stored conversation
    pub fn conversation(&self, conversation: &Conversation) {
        println!(
            "{} {}",
            self.bold.apply_to(&conversation.title),
            self.dim.apply_to(format!(
                "({}, {}, {})",
                conversation.id,
                conversation.timestamp.format("%Y-%m-%d %H:%M"),
                conversation.model
            ))
        );
        println!();
        for message in &conversation.messages {
            self.message(message);
        }
    }

    /// Booking platforms grouped by category, numbered within each group
    pub fn platform_suggestions(&self, suggestions: &PlatformMatches) {
        if suggestions.is_empty() {
            return;
        }

        println!("{}", self.bold.apply_to("🔗 Booking Platforms 👇"));
        for (category, platforms) in suggestions {
            println!();
            self.category_platforms(*category, platforms);
        }
        println!();
        println!(
            "{}",
            self.dim
                .apply_to("💡 Click the links above to book directly on official websites!")
        );
    }

    pub fn category_platforms(&self, category: Category, platforms: &[PlatformRecord]) {
        println!("{} {}:", category.icon(), self.bold.apply_to(category.name()));
        for (idx, platform) in platforms.iter().enumerate() {
            println!("  {}. {}", idx + 1, self.bold.apply_to(platform.name));
            println!("     📝 {}", self.dim.apply_to(platform.description));
            println!("     🔗 {}", self.green.apply_to(platform.url));
        }
    }

    /// Recent conversations, newest first, at most `limit` entries
    pub fn history_list(&self, conversations: &[ConversationSummary], limit: usize) {
        if conversations.is_empty() {
            self.info("📝 No chat history yet");
            return;
        }

        println!("{}", self.bold.apply_to("📚 Recent Chats"));
        for summary in conversations.iter().take(limit) {
            println!(
                "  💬 {} {}",
                history_title(&summary.title),
                self.dim.apply_to(format!(
                    "({}, {} messages)",
                    summary.id, summary.message_count
                ))
            );
        }
    }
}

impl Default for Output {
    fn default() -> Self {
        Self::new()
    }
}

/// Titles longer than 30 characters become the first 27 plus "..."
pub fn history_title(title: &str) -> String {
    if title.chars().count() > HISTORY_TITLE_CHARS {
        let head: String = title.chars().take(HISTORY_TITLE_CHARS - 3).collect();
        format!("{}...", head)
    } else {
        title.to_string()
    }
}
