//! Chat transport
//!
//! Sends a conversation (ordered history plus advertised tool catalog)
//! to the chat backend and decodes its newline-delimited JSON reply
//! into a single [`crate::types::ChatOutcome`].

mod error;
mod mock;
mod ollama;
mod traits;

pub use error::{TransportError, TransportResult};
pub use mock::MockTransport;
pub use ollama::OllamaTransport;
pub use traits::{ChatOptions, ChatTransport};
