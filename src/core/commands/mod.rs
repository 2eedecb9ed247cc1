//! Command matching and dispatch.
//!
//! This module provides:
//! - [`CommandTable`] - the ordered command definitions and their handlers
//! - [`CommandContext`] - what a handler may read (and the prompt it may ask)
//! - [`CommandResult`] - what a handler returns
//!
//! # Architecture
//!
//! A raw line is matched against each definition in table order. The first
//! match extracts [`ParsedArguments`] and runs the handler; no match yields
//! a single warning and runs nothing.

mod execute;
pub mod grammar;
mod result;

pub use grammar::{CommandDefinition, OptionSpec, ParsedArguments, RequiredArg, ValuePattern};
pub use result::{CommandResult, Navigation};

use tracing::{debug, info};

use crate::core::filesystem::FsOps;
use crate::core::operations::ConflictPrompt;
use crate::core::path::{self, PathStyle, ResolvedPath};
use crate::models::Notification;

/// Shown when no definition matches a line.
pub const NOT_RECOGNIZED: &str = "Command not recognized. The command may not exist, \
     or one or more arguments have the wrong format.";

/// Everything a handler needs from the outside world.
pub struct CommandContext<'a> {
    /// `None` when no directory could be restored
    pub current_dir: Option<&'a ResolvedPath>,
    pub style: PathStyle,
    pub fs: &'a dyn FsOps,
    pub prompt: &'a mut dyn ConflictPrompt,
}

impl CommandContext<'_> {
    /// Resolve a typed path against the current directory.
    pub fn resolve(&self, raw: &str) -> Option<ResolvedPath> {
        path::resolve(raw, self.current_dir, self.style)
    }
}

/// A command handler.
pub type Handler = fn(&ParsedArguments, &mut CommandContext<'_>) -> CommandResult;

struct Entry {
    definition: CommandDefinition,
    handler: Handler,
}

/// The ordered command table.
pub struct CommandTable {
    entries: Vec<Entry>,
}

impl CommandTable {
    /// Build the standard commands for paths of `style`.
    pub fn new(style: PathStyle) -> Result<Self, regex::Error> {
        use grammar::ValuePattern::{Bool, Int, LiteralTrue};

        let table: [(&'static str, &[RequiredArg], &[OptionSpec], Handler); 5] = [
            (
                "gotd",
                &[RequiredArg::ANY],
                &[OptionSpec::new("p", Int)],
                execute::go_to_directory,
            ),
            (
                "cpy",
                &[RequiredArg::NON_EMPTY, RequiredArg::ANY],
                &[OptionSpec::new("rf", Bool)],
                execute::copy,
            ),
            (
                "del",
                &[RequiredArg::ANY],
                &[OptionSpec::new("r", LiteralTrue)],
                execute::delete,
            ),
            ("info", &[RequiredArg::ANY], &[], execute::info),
            ("exit", &[], &[], execute::exit),
        ];

        let entries = table
            .into_iter()
            .map(|(name, required, optional, handler)| {
                Ok(Entry {
                    definition: CommandDefinition::new(name, required, optional, style)?,
                    handler,
                })
            })
            .collect::<Result<_, regex::Error>>()?;

        Ok(Self { entries })
    }

    /// Command names in table order.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|e| e.definition.name())
    }

    /// First definition matching `line`, with its extracted arguments.
    pub fn find(&self, line: &str) -> Option<(&CommandDefinition, ParsedArguments)> {
        self.entries.iter().find_map(|entry| {
            entry
                .definition
                .parse(line)
                .map(|args| (&entry.definition, args))
        })
    }

    /// Match `line` and run its handler.
    pub fn execute_line(&self, line: &str, ctx: &mut CommandContext<'_>) -> CommandResult {
        let matched = self.entries.iter().find_map(|entry| {
            entry.definition.parse(line).map(|args| (entry, args))
        });

        match matched {
            Some((entry, args)) => {
                info!(command = entry.definition.name(), "executing command");
                debug!(?args, "parsed arguments");
                (entry.handler)(&args, ctx)
            }
            None => {
                debug!(line, "no command matched");
                CommandResult::notify(Notification::warning(NOT_RECOGNIZED))
            }
        }
    }
}
