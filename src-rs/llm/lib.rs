pub mod openai_adapter;
pub mod router;
pub mod types;

pub use openai_adapter::OpenAIAdapter;
pub use router::LLMRouter;
pub use types::{CompletionRequest, LLMResponse, Message, ProviderAdapter, ProviderError, Role, ToolCall};
