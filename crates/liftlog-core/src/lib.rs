//! # LiftLog Core
//!
//! Core library for LiftLog - a local-first training log for weightlifters.
//!
//! This crate provides the domain logic, storage abstractions, and data models
//! independent of the CLI interface.
//!
//! ## Architecture
//!
//! - **catalog**: Seeded exercise catalog and personal-best lift codes
//! - **classify**: Exercise name to body part rules
//! - **tonnage**: Set validation and tonnage aggregation
//! - **storage**: Log store trait and the SQLite implementation
//! - **calendar**: Month window and date-to-log lookup
//! - **analysis**: Period totals, body-part breakdown, tonnage trend
//! - **export**: Two-sheet spreadsheet export
//! - **nutrition**: Meal photo analysis client and summary type
//! - **accounts**: Sign-up rules, password hashing, sign-in

pub mod accounts;
pub mod analysis;
pub mod calendar;
pub mod catalog;
pub mod classify;
pub mod error;
pub mod export;
pub mod fs;
pub mod nutrition;
pub mod storage;
pub mod tonnage;

pub use classify::{classify, BodyPart};
pub use error::{LiftLogError, Result};
pub use storage::{LogStore, SqliteStore, UserContext};
pub use tonnage::{aggregate, RawSet};

/// Core version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
