//! Command handlers, one module per top-level command.

pub mod account;
pub mod analysis;
pub mod calendar;
pub mod exercises;
pub mod export;
pub mod init;
pub mod logs;
pub mod maintenance;
pub mod misc;
pub mod nutrition;
pub mod pb;
