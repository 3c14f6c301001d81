use chrono::Local;

use tripguide_types::{Conversation, Message};

use crate::llm::ChatModel;

pub const WELCOME_MESSAGE: &str = "🏨 **Welcome to Travel Guide Chatbot!** ✈️\n\n\
I'm here to help with:\n\n\
🏨 Hotel Booking • ✈️ Flights • 🚂 Trains • 🚌 Buses • 🗺️ Tourist Places • 📋 Trip Planning\n\n\
💡 Example queries:\n\
- \"Book hotel in Mumbai\"\n\
- \"Flight tickets Delhi to Bangalore\"\n\
- \"Plan a 5-day trip to Goa\"\n\
- \"Tourist places in Kerala\"\n\n\
What would you like to book or plan? 🌍";

pub const CLEARED_MESSAGE: &str = "✨ Chat cleared! Ready for your next travel query. 🌍";

/// Timestamp-derived conversation id, e.g. `20261019_093012_345`
pub fn new_conversation_id() -> String {
    Local::now().format("%Y%m%d_%H%M%S_%3f").to_string()
}

/// State of the one active conversation, owned by the interaction loop
#[derive(Debug, Clone)]
pub struct ChatSession {
    conversation_id: String,
    messages: Vec<Message>,
    model: ChatModel,
}

impl ChatSession {
    pub fn new(model: ChatModel) -> Self {
        Self {
            conversation_id: new_conversation_id(),
            messages: vec![Message::assistant(WELCOME_MESSAGE)],
            model,
        }
    }

    pub fn conversation_id(&self) -> &str {
        &self.conversation_id
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn model(&self) -> ChatModel {
        self.model
    }

    pub fn set_model(&mut self, model: ChatModel) {
        self.model = model;
    }

    pub fn push_user(&mut self, content: impl Into<String>) {
        self.messages.push(Message::user(content));
    }

    pub fn push_assistant(&mut self, content: impl Into<String>) {
        self.messages.push(Message::assistant(content));
    }

    /// Replace the active conversation with a fresh one
    pub fn start_new(&mut self) {
        self.conversation_id = new_conversation_id();
        self.messages = vec![Message::assistant(WELCOME_MESSAGE)];
    }

    /// Drop the messages but keep the conversation id
    pub fn clear(&mut self) {
        self.messages = vec![Message::assistant(CLEARED_MESSAGE)];
    }

    /// Continue a stored conversation
    pub fn adopt(&mut self, conversation: Conversation) {
        if let Ok(model) = conversation.model.parse::<ChatModel>() {
            self.model = model;
        }
        self.conversation_id = conversation.id;
        self.messages = conversation.messages;
    }

    /// A greeting on its own is not worth saving
    pub fn should_persist(&self) -> bool {
        self.messages.len() > 1
    }

    pub fn to_conversation(&self) -> Conversation {
        Conversation {
            id: self.conversation_id.clone(),
            title: Conversation::title_from_messages(&self.messages),
            timestamp: Local::now().into(),
            messages: self.messages.clone(),
            model: self.model.id().to_string(),
        }
    }
}
