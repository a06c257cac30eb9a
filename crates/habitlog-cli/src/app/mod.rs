//! Application-level utilities for the habitlog CLI.
//!
//! - Application context for unified CLI + config handling
//! - Path resolution for config and store files
//! - The clock handed to the derivation engine

mod clock;
mod context;
mod resolver;

pub use clock::parse_timezone;
pub use context::AppContext;
pub use resolver::resolve_config_path;
