//! Orchestrator error types

use thiserror::Error;

/// Errors surfaced by the agent
///
/// Tool failures and unresolved tool names are deliberately absent:
/// they become result text inside the conversation so the model can
/// react, and never fail a turn.
#[derive(Error, Debug)]
pub enum AgentError {
    /// The chat backend could not be reached during setup; the only
    /// non-recoverable condition
    #[error("chat backend unreachable: {0}")]
    BackendUnreachable(String),

    /// The backend produced no usable answer for this turn
    #[error("no response obtained from the chat backend")]
    NoResponse,

    /// The model kept requesting tools past the configured bound
    #[error("tool turn limit of {limit} exceeded")]
    TurnLimitExceeded { limit: usize },
}

pub type AgentResult<T> = Result<T, AgentError>;
