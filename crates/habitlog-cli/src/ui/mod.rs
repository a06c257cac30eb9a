//! UI primitives for the habitlog CLI.
//!
//! - **Context**: Environment detection (TTY, width, color, unicode)
//! - **Mode**: Output mode resolution (json, plain, pretty)
//! - **Theme**: Badges, marks and styles
//! - **Render**: Tables, headers, receipts, hints
//! - **Format**: String utilities

mod context;
pub mod format;
mod mode;
pub mod render;
pub mod theme;

pub use context::UiContext;
pub use mode::{OutputFormat, OutputMode};
pub use theme::Badge;

pub use render::{
    badge, blank_line, header, hint, kv, print, print_error, receipt, section, simple_table,
    table, Column,
};
