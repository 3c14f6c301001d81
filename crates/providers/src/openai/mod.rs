pub mod chat;
pub mod embed;
