//! Local tool trait definition

use async_trait::async_trait;
use thiserror::Error;

use crate::types::{ArgMap, ToolSpec};

/// Errors from local tool handlers
#[derive(Error, Debug)]
pub enum ToolError {
    #[error("missing argument: {0}")]
    MissingArgument(&'static str),

    #[error("invalid argument {argument}: {reason}")]
    InvalidArgument {
        argument: &'static str,
        reason: String,
    },

    #[error("{0}")]
    Failed(String),
}

/// A locally registered tool
///
/// Handlers receive already-normalized arguments and answer with a
/// result string; a failure is descriptive, never fatal to the session
/// (the agent injects it as the tool's result text).
#[async_trait]
pub trait LocalTool: Send + Sync {
    /// The descriptor advertised to the model
    fn spec(&self) -> ToolSpec;

    /// Execute with normalized arguments
    async fn call(&self, args: &ArgMap) -> Result<String, ToolError>;
}
