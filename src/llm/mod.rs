//! Chat backend integration: request building, client, history

pub mod client;
pub mod history;
pub mod prompts;
pub mod request;
