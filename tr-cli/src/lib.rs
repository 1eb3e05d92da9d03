//! TeensyROM command-line tool.
//!
//! Exposes the CLI pieces for use in tests: argument parsing, settings
//! loading, connection and the subcommand handlers.

pub mod cli;
pub mod commands;
pub mod config;
pub mod connect;
pub mod messages;
