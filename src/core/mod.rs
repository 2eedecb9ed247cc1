//! Core business logic for the file manager.
//!
//! This module provides:
//! - [`path`] lexical path resolution
//! - [`commands`] the command table, grammar and handlers
//! - [`operations`] recursive copy and delete with conflict prompts
//! - [`filesystem`] the [`FsOps`] seam over the local disk
//! - [`session`], [`listing`] and [`inspect`] for what the screen shows

pub mod commands;
pub mod error;
pub mod filesystem;
pub mod inspect;
pub mod listing;
pub mod operations;
pub mod path;
pub mod session;

pub use commands::{CommandContext, CommandResult, CommandTable};
pub use filesystem::{FsOps, LocalFs};
pub use path::{PathStyle, ResolvedPath};
pub use session::{SessionState, SessionStore};
