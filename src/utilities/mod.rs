//! Shared utilities: errors, file handling, console colors.

pub mod errors;
pub mod file_handler;
pub mod printer;
