//! Katalyst Console - terminal dashboard and command line for the Katalyst
//! GitHub analytics backend.
//!
//! With no subcommand `katalyst` opens the interactive dashboard; every page
//! is also reachable as a one-shot subcommand that prints text or JSON.

pub mod app;
pub mod cli;
pub mod commands;
pub mod console;
pub mod logging;
pub mod palette;
pub mod render;

pub use app::{App, AppEvent};
pub use cli::{Cli, Commands};
