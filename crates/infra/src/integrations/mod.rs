//! External service integrations.

pub mod composio;
pub mod openai;

pub use composio::ComposioClient;
pub use openai::OpenAiClient;
