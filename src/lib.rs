//! fmsh - a paged console file manager.
//!
//! The library holds everything but process setup so the command layer
//! can be driven from tests without a terminal.

pub mod app;
pub mod components;
pub mod config;
pub mod core;
pub mod models;
pub mod utils;
