//! Command-line interface module
//!
//! Argument definitions and one handler per command.

pub mod args;
pub mod images;
pub mod init;
pub mod presets;
pub mod prompt;

pub use args::*;
