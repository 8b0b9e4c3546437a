// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! CLI module for previewing datasets.
//!
//! This module contains the command-line interface logic, including argument parsing,
//! terminal logging and the `preview` command implementation.

// Modules
/// CLI arguments.
pub mod args;

/// Terminal logging macros.
pub mod logging;

/// Preview logic.
pub mod preview;
