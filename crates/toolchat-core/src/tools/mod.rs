//! Tool management
//!
//! Local tools implement [`LocalTool`] and live in the registry's
//! dispatch table. The registry merges them with the descriptors
//! discovered from a remote tool-provider into one [`ToolCatalog`]:
//! remote descriptors are advertised under a namespaced wire name, and
//! every catalog entry carries an explicit [`ToolOrigin`] tag so
//! dispatch is a match on a variant, never string parsing.

mod builtin;
mod local;
mod registry;

pub use builtin::{CurrentWeather, Lcm, SumTwoNumbers};
pub use local::{LocalTool, ToolError};
pub use registry::{
    CatalogEntry, ToolCatalog, ToolOrigin, ToolRegistry, REMOTE_TOOL_PREFIX,
};
