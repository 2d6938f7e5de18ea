//! Request-handling side: CSV codecs and the command-line surface.

pub mod cli;
pub mod csv;
