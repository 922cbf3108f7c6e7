//! OpenAI chat-completions integration.

mod client;
mod types;

pub use client::OpenAiClient;
