//! UI primitives for the LiftLog CLI.
//!
//! This module provides:
//! - **Context**: Environment detection (TTY, width, color, unicode)
//! - **Mode**: Output mode resolution (json, plain, pretty)
//! - **Theme**: Badge tokens, styles, symbols
//! - **Render**: Tables, headers, receipts, hints, bars
//! - **Format**: Number and string helpers
//!
//! # Usage
//!
//! ```ignore
//! use crate::ui::{UiContext, Badge};
//! use crate::ui::render::{header, simple_table, hint};
//!
//! let ctx = UiContext::from_env(args.json, cli.no_color, cli.ascii);
//!
//! if ctx.mode.is_json() {
//!     // Handle JSON output separately
//!     return Ok(());
//! }
//!
//! println!("{}", header(&ctx, "log show", Some("2024-05-01")));
//! println!("{}", simple_table(&ctx, &columns, &rows));
//! println!("{}", hint(&ctx, "liftlog log save 2024-05-01 --set ..."));
//! ```

mod context;
pub mod format;
mod mode;
pub mod render;
pub mod theme;

pub use context::UiContext;
pub use mode::OutputMode;
pub use theme::Badge;

pub use render::{
    badge, bar, blank_line, divider, header, hint, kv, print, receipt, simple_table, Column,
};

pub use format::{format_kg, format_optional, truncate};
