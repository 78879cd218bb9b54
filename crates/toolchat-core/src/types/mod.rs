//! Core types for the conversation orchestrator
//!
//! This module contains the shared wire-shape types used across
//! the transport, gateway and agent.

mod message;
mod outcome;
mod tool;

pub use message::{Message, Role};
pub use outcome::ChatOutcome;
pub use tool::{ArgMap, FunctionCall, ToolArguments, ToolCallRecord, ToolSpec};
