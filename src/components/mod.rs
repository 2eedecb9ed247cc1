//! Console UI components built with crossterm.
//!
//! - [`Window`] - Listing, notification window and input prompt
//! - [`ConsolePrompt`] - Conflict questions answered on the console

mod prompt;
mod window;

pub use prompt::ConsolePrompt;
pub use window::Window;
