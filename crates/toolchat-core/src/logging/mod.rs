//! Logging abstractions
//!
//! Every component takes its logger at construction, so destinations
//! and verbosity are testable per component rather than process-wide.

mod console;
mod noop;
mod traits;

pub use console::{ConsoleLogger, LogLevel};
pub use noop::NoOpLogger;
pub use traits::Logger;
