//! Language model adapters

mod chat_api;

pub use chat_api::ChatCompletionClient;
