//! Travel guide chat assistant
//!
//! Answers travel questions with an LLM, grounds replies in a local CSV/PDF
//! knowledge base and suggests booking platforms for the detected needs.

pub mod catalog;
pub mod cli;
pub mod config;
pub mod engine;
pub mod llm;
pub mod rag;
pub mod service;
pub mod session;
pub mod ui;

#[cfg(test)]
mod testing;
