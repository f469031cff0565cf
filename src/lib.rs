//! Small habit tracker for the terminal. Activities and their completions live in memory for the
//! length of a session, and every change goes through a single store as a command.
//!

pub mod activities;
pub mod cli;
pub mod session;
pub mod utils;
